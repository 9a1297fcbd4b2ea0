use std::sync::Arc;

use super::cache::StatusCache;
use super::domain::{
    ApplicantId, ApplicationId, HostApplicationForm, HostApplicationRecord, HostApplicationStatus,
};
use super::projector::{next_action, HostAction};
use crate::workflows::backend::BackendError;

/// Abstraction over the backend's host application endpoints.
pub trait HostBackend: Send + Sync {
    fn fetch_application(
        &self,
        applicant: ApplicantId,
    ) -> Result<Option<HostApplicationRecord>, BackendError>;

    fn submit_application(
        &self,
        applicant: ApplicantId,
        form: HostApplicationForm,
    ) -> Result<HostApplicationRecord, BackendError>;

    /// Admin: applications awaiting review.
    fn pending_applications(&self) -> Result<Vec<HostApplicationRecord>, BackendError>;

    /// Admin: decide an application.
    fn review_application(
        &self,
        id: ApplicationId,
        status: HostApplicationStatus,
        comment: Option<String>,
    ) -> Result<HostApplicationRecord, BackendError>;
}

/// Failures surfaced by the host application workflow.
#[derive(Debug, thiserror::Error)]
pub enum HostWorkflowError {
    #[error("application is incomplete: missing {}", missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },
    #[error("an application is already {0}")]
    AlreadyDecided(&'static str),
    #[error("application not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Host application workflow: submission, review, and the cached projection
/// behind the "Become a Host" entry point.
pub struct HostWorkflow<B> {
    backend: Arc<B>,
    cache: StatusCache,
}

impl<B: HostBackend> HostWorkflow<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            cache: StatusCache::default(),
        }
    }

    /// Decide what "Become a Host" should do. Served from the cache when
    /// possible; at most one backend fetch per applicant between mutations.
    pub fn become_host_action(
        &self,
        applicant: ApplicantId,
    ) -> Result<HostAction, HostWorkflowError> {
        let cached = match self.cache.get(applicant) {
            Some(cached) => cached,
            None => {
                let status = self
                    .backend
                    .fetch_application(applicant)?
                    .map(|record| record.status.token().to_string());
                self.cache.put(applicant, status.clone());
                status
            }
        };

        Ok(next_action(cached.as_deref()))
    }

    /// Current application for the applicant, bypassing the cache.
    pub fn application(
        &self,
        applicant: ApplicantId,
    ) -> Result<Option<HostApplicationRecord>, HostWorkflowError> {
        Ok(self.backend.fetch_application(applicant)?)
    }

    fn check_form(form: &HostApplicationForm) -> Result<(), HostWorkflowError> {
        let mut missing = Vec::new();
        if form.phone.trim().is_empty() {
            missing.push("phone");
        }
        if form.address.trim().is_empty() {
            missing.push("address");
        }
        if form.bio.trim().is_empty() {
            missing.push("bio");
        }
        if form.document_urls.is_empty() {
            missing.push("verification documents");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(HostWorkflowError::Incomplete { missing })
        }
    }

    /// Submit a new application. Allowed when no application exists or the
    /// previous one was rejected; a fresh submission supersedes it. The
    /// cached status is invalidated once the backend accepts.
    pub fn submit(
        &self,
        applicant: ApplicantId,
        form: HostApplicationForm,
    ) -> Result<HostApplicationRecord, HostWorkflowError> {
        Self::check_form(&form)?;

        match self.backend.fetch_application(applicant)? {
            Some(existing) => match existing.status {
                HostApplicationStatus::Pending => {
                    return Err(HostWorkflowError::AlreadyDecided("under review"))
                }
                HostApplicationStatus::Approved => {
                    return Err(HostWorkflowError::AlreadyDecided("approved"))
                }
                HostApplicationStatus::Rejected => {}
            },
            None => {}
        }

        let record = self.backend.submit_application(applicant, form)?;
        self.cache.invalidate(applicant);
        Ok(record)
    }

    /// Admin: queue of pending applications.
    pub fn pending(&self) -> Result<Vec<HostApplicationRecord>, HostWorkflowError> {
        Ok(self.backend.pending_applications()?)
    }

    /// Admin: approve or reject. Invalidates the applicant's cached status so
    /// the next "Become a Host" click reflects the decision.
    pub fn review(
        &self,
        id: ApplicationId,
        applicant: ApplicantId,
        status: HostApplicationStatus,
        comment: Option<String>,
    ) -> Result<HostApplicationRecord, HostWorkflowError> {
        let record = self.backend.review_application(id, status, comment)?;
        self.cache.invalidate(applicant);
        Ok(record)
    }
}
