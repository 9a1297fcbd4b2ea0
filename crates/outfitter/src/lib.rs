//! Core workflows for the hunting-property marketplace: the listing
//! draft/submission lifecycle and the host application path.
//!
//! The crate is transport-agnostic at its center (pure state machine,
//! validation, and payload shaping) and exposes axum routers at the edge so
//! the API service only has to wire infrastructure.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
