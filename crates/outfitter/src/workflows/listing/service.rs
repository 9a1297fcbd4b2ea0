//! Orchestration of the listing lifecycle against the backend.
//!
//! The service runs every guard locally before a backend call is issued, so a
//! failed transition costs no round trip and leaves the persisted record
//! untouched. Backend failures likewise propagate without mutating anything
//! locally; there is no automatic retry.

use std::sync::Arc;

use serde_json::Value;

use super::backend::ListingBackend;
use super::domain::{
    DraftPhase, ListingId, ListingRecord, ListingStatus, PropertyListingForm, ProviderId,
};
use super::lifecycle::{self, GuardViolation, SaveOperation};
use super::payload::{build_draft_payload, build_payload, PayloadError};
use super::sanitize::sanitize_form;
use super::validate::{validate_property_form, SubmissionMode};

/// Failures surfaced to the caller of the listing workflow.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Guard(#[from] GuardViolation),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Backend(#[from] crate::workflows::backend::BackendError),
    #[error("listing not found")]
    NotFound,
    #[error("listing belongs to a different provider")]
    NotOwner,
}

/// The listing workflow facade consumed by the router and the API service.
pub struct ListingWorkflow<B> {
    backend: Arc<B>,
}

impl<B: ListingBackend> ListingWorkflow<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Normalize a persisted record into the canonical form shape. Applied on
    /// load so the rest of the workflow never sees historical field names.
    pub fn load_form(&self, stored: &Value) -> PropertyListingForm {
        sanitize_form(stored)
    }

    fn owned(&self, provider: ProviderId, id: ListingId) -> Result<ListingRecord, WorkflowError> {
        let record = self.backend.fetch(id)?.ok_or(WorkflowError::NotFound)?;
        if record.provider != provider {
            return Err(WorkflowError::NotOwner);
        }
        Ok(record)
    }

    /// Start a new draft from phase-one data.
    pub fn create_draft(
        &self,
        provider: ProviderId,
        form: &PropertyListingForm,
    ) -> Result<ListingRecord, WorkflowError> {
        lifecycle::create_draft(form)?;
        let payload = build_draft_payload(form);
        Ok(self.backend.create_draft(provider, payload)?)
    }

    /// Persist partial draft data. No validation: drafts may be incomplete.
    /// `phase` is the phase the provider has completed so far; advancing from
    /// one to two passes the phase-one gate first.
    pub fn save_draft(
        &self,
        provider: ProviderId,
        id: ListingId,
        form: &PropertyListingForm,
        phase: Option<DraftPhase>,
    ) -> Result<ListingRecord, WorkflowError> {
        let record = self.owned(provider, id)?;
        let stored = match record.status {
            ListingStatus::Draft { phase } => phase,
            ref other => {
                return Err(GuardViolation::WrongStatus {
                    action: "save a draft for",
                    status: other.label(),
                }
                .into())
            }
        };
        let phase = match phase {
            Some(DraftPhase::Two) if stored == DraftPhase::One => {
                lifecycle::advance_draft(&record.status, form)?;
                DraftPhase::Two
            }
            Some(requested) => requested,
            None => stored,
        };
        let payload = build_draft_payload(form);
        Ok(self.backend.save_draft(id, payload, phase.number())?)
    }

    /// Phase gate only; no backend call is ever made for a phase toggle. The
    /// new phase is persisted with the next draft save.
    pub fn advance_phase(
        &self,
        record: &ListingRecord,
    ) -> Result<ListingStatus, GuardViolation> {
        lifecycle::advance_draft(&record.status, &record.form)
    }

    /// Submit the form, selecting the backend operation from current status:
    /// no id creates a listing, a phase-two draft completes, and pending,
    /// rejected, or approved records update in place.
    pub fn submit(
        &self,
        provider: ProviderId,
        id: Option<ListingId>,
        form: &PropertyListingForm,
    ) -> Result<ListingRecord, WorkflowError> {
        let Some(id) = id else {
            let report = validate_property_form(form, SubmissionMode::New);
            if !report.valid {
                return Err(GuardViolation::Invalid {
                    errors: report.errors,
                }
                .into());
            }
            let payload = build_payload(form)?;
            return Ok(self.backend.create_listing(provider, payload)?);
        };

        let record = self.owned(provider, id)?;
        match lifecycle::save_operation(Some(&record.status)) {
            SaveOperation::CompleteDraft => {
                lifecycle::complete_draft(&record.status, form)?;
                let payload = build_payload(form)?;
                Ok(self.backend.complete_draft(id, payload)?)
            }
            SaveOperation::UpdateListing => {
                if let ListingStatus::Approved { .. } = record.status {
                    let changed = lifecycle::locked_field_changes(&record.form, form);
                    if !changed.is_empty() {
                        return Err(GuardViolation::LockedFields { fields: changed }.into());
                    }
                }
                if let ListingStatus::Rejected { .. } = record.status {
                    lifecycle::resubmit(&record.status, form)?;
                } else {
                    let report = validate_property_form(form, SubmissionMode::Edit);
                    if !report.valid {
                        return Err(GuardViolation::Invalid {
                            errors: report.errors,
                        }
                        .into());
                    }
                }
                let payload = build_payload(form)?;
                Ok(self.backend.update_listing(id, payload)?)
            }
            SaveOperation::CreateListing => {
                unreachable!("records fetched by id always have a status")
            }
        }
    }

    /// Flip marketplace visibility of an approved listing.
    pub fn toggle_listing(
        &self,
        provider: ProviderId,
        id: ListingId,
    ) -> Result<bool, WorkflowError> {
        let record = self.owned(provider, id)?;
        lifecycle::toggle_listing(&record.status)?;
        Ok(self.backend.toggle_listing(id)?)
    }

    /// Delete a listing. The caller must have collected explicit confirmation.
    pub fn delete(
        &self,
        provider: ProviderId,
        id: ListingId,
        confirmed: bool,
    ) -> Result<(), WorkflowError> {
        if !confirmed {
            return Err(GuardViolation::ConfirmationRequired.into());
        }
        self.owned(provider, id)?;
        Ok(self.backend.delete_listing(id)?)
    }

    /// Provider dashboard fetch.
    pub fn my_listings(
        &self,
        provider: ProviderId,
        include_drafts: bool,
    ) -> Result<Vec<ListingRecord>, WorkflowError> {
        Ok(self.backend.for_provider(provider, include_drafts)?)
    }

    /// Fetch a single listing. Owners see their record in any status; anyone
    /// else only sees approved-and-listed records.
    pub fn fetch(
        &self,
        viewer: Option<ProviderId>,
        id: ListingId,
    ) -> Result<ListingRecord, WorkflowError> {
        let record = self.backend.fetch(id)?.ok_or(WorkflowError::NotFound)?;
        let is_owner = viewer.is_some_and(|viewer| viewer == record.provider);
        if is_owner || record.publicly_visible() {
            Ok(record)
        } else {
            Err(WorkflowError::NotOwner)
        }
    }

    /// Admin: queue of listings awaiting review.
    pub fn pending_review(&self) -> Result<Vec<ListingRecord>, WorkflowError> {
        Ok(self.backend.pending_review()?)
    }

    /// Admin: approve a pending listing. The result is approved but unlisted;
    /// the provider lists it explicitly.
    pub fn approve(
        &self,
        id: ListingId,
        feedback: Option<String>,
    ) -> Result<ListingRecord, WorkflowError> {
        let record = self.backend.fetch(id)?.ok_or(WorkflowError::NotFound)?;
        lifecycle::approve(&record.status)?;
        Ok(self.backend.approve(id, feedback)?)
    }

    /// Admin: reject a pending listing with feedback for the provider.
    pub fn reject(&self, id: ListingId, feedback: String) -> Result<ListingRecord, WorkflowError> {
        let record = self.backend.fetch(id)?.ok_or(WorkflowError::NotFound)?;
        lifecycle::reject(&record.status, &feedback)?;
        Ok(self.backend.reject(id, feedback)?)
    }
}
