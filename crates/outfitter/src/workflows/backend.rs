//! Error taxonomy shared by the marketplace backend abstractions.
//!
//! The REST transport itself lives outside this crate; workflows talk to the
//! backend through the `ListingBackend` trait in `listing::backend` and the
//! `HostBackend` trait in `host::service`, and every failure funnels into
//! [`BackendError`]. A transition
//! whose backend call fails is treated as not-applied: callers keep their
//! local state and surface the error.

/// Failure reported by a backend collaborator.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Bearer credential missing, invalid, or expired. The identity
    /// collaborator owns session cleanup; the workflow only propagates.
    #[error("authentication failed; session credential is invalid or expired")]
    Unauthorized,
    #[error("record not found")]
    NotFound,
    #[error("not permitted for the current account")]
    Forbidden,
    /// Backend accepted the request but refused the operation.
    #[error("backend refused the request: {0}")]
    Refused(String),
    /// Network failure or non-success status with no better classification.
    #[error("backend transport failure: {0}")]
    Transport(String),
}
