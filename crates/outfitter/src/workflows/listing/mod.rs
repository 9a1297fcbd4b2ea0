//! The property listing workflow: canonical form model, persisted-record
//! sanitization, validation, draft progress, the lifecycle state machine,
//! wire-payload shaping, and the backend-facing service.

pub mod backend;
pub mod domain;
pub mod lifecycle;
pub mod payload;
pub mod progress;
pub mod router;
pub mod sanitize;
pub mod service;
pub mod validate;

pub use backend::ListingBackend;
pub use domain::{
    AccommodationOption, AccommodationStatus, AcreageBreakdown, DraftPhase, HuntingPackage,
    ImageSet, ListingId, ListingRecord, ListingStatus, ListingStatusView, PropertyImage,
    PropertyListingForm, ProviderId, WildlifeInfo,
};
pub use lifecycle::{is_field_locked, save_operation, GuardViolation, SaveOperation, LOCKED_FIELDS};
pub use payload::{build_draft_payload, build_payload, DraftPayload, ListingPayload, PayloadError};
pub use progress::draft_progress;
pub use router::listing_router;
pub use sanitize::{
    sanitize_accommodation, sanitize_acreage, sanitize_form, sanitize_package, sanitize_wildlife,
};
pub use service::{ListingWorkflow, WorkflowError};
pub use validate::{
    validate_hunting_packages, validate_property_form, SubmissionMode, ValidationReport,
};
