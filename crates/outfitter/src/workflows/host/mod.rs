//! The "Become a Host" workflow: application submission, admin review, and
//! the cached status projection that decides where the entry point sends the
//! user.

pub mod cache;
pub mod domain;
pub mod projector;
pub mod router;
pub mod service;

pub use cache::StatusCache;
pub use domain::{
    ApplicantId, ApplicationId, HostApplicationForm, HostApplicationRecord, HostApplicationStatus,
    HostApplicationStatusView,
};
pub use projector::{next_action, HostAction, HostDestination};
pub use router::host_router;
pub use service::{HostBackend, HostWorkflow, HostWorkflowError};
