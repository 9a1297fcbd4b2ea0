//! Abstraction over the marketplace REST backend for listings.
//!
//! The concrete transport (paths, bearer credential, retries) lives outside
//! this crate; workflows and tests program against this trait. Completing a
//! draft is deliberately a separate operation from updating, mirroring the
//! backend's API.

use super::domain::{ListingId, ListingRecord, ProviderId};
use super::payload::{DraftPayload, ListingPayload};
use crate::workflows::backend::BackendError;

pub trait ListingBackend: Send + Sync {
    /// Create a phase-one draft; the returned record is in `Draft` status.
    fn create_draft(
        &self,
        provider: ProviderId,
        payload: DraftPayload,
    ) -> Result<ListingRecord, BackendError>;

    /// Persist partial draft data without any status change. `phase` records
    /// which draft phase the provider has completed so far.
    fn save_draft(
        &self,
        id: ListingId,
        payload: DraftPayload,
        phase: u8,
    ) -> Result<ListingRecord, BackendError>;

    /// Create a fully-assembled listing directly into pending review.
    fn create_listing(
        &self,
        provider: ProviderId,
        payload: ListingPayload,
    ) -> Result<ListingRecord, BackendError>;

    /// Complete a draft into pending review. Distinct from `update_listing`.
    fn complete_draft(
        &self,
        id: ListingId,
        payload: ListingPayload,
    ) -> Result<ListingRecord, BackendError>;

    /// Plain update of a non-draft listing.
    fn update_listing(
        &self,
        id: ListingId,
        payload: ListingPayload,
    ) -> Result<ListingRecord, BackendError>;

    /// Flip marketplace visibility; returns the new listed flag.
    fn toggle_listing(&self, id: ListingId) -> Result<bool, BackendError>;

    fn delete_listing(&self, id: ListingId) -> Result<(), BackendError>;

    fn fetch(&self, id: ListingId) -> Result<Option<ListingRecord>, BackendError>;

    fn for_provider(
        &self,
        provider: ProviderId,
        include_drafts: bool,
    ) -> Result<Vec<ListingRecord>, BackendError>;

    /// Admin: listings awaiting review.
    fn pending_review(&self) -> Result<Vec<ListingRecord>, BackendError>;

    /// Admin: approve a pending listing, optionally with feedback.
    fn approve(
        &self,
        id: ListingId,
        feedback: Option<String>,
    ) -> Result<ListingRecord, BackendError>;

    /// Admin: reject a pending listing with mandatory feedback.
    fn reject(&self, id: ListingId, feedback: String) -> Result<ListingRecord, BackendError>;
}
