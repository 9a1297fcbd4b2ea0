//! The listing lifecycle state machine.
//!
//! Transitions are pure functions over [`ListingStatus`]: a guard failure
//! returns an error and produces no new state, so a caller can never move a
//! record without passing the guard. Backend persistence happens after the
//! transition is decided, never as part of it.

use super::domain::{DraftPhase, ListingStatus, PropertyListingForm};
use super::validate::{validate_property_form, SubmissionMode};

/// Guard failure for an attempted transition. Local-only: the listing's
/// persisted status is untouched and nothing was sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardViolation {
    #[error("listing is not valid for submission: {}", errors.join("; "))]
    Invalid { errors: Vec<String> },
    #[error("cannot {action} a listing in status {status}")]
    WrongStatus {
        action: &'static str,
        status: &'static str,
    },
    #[error("phase one is incomplete: missing {}", missing.join(", "))]
    PhaseIncomplete { missing: Vec<&'static str> },
    #[error("fields locked after approval cannot change: {}", fields.join(", "))]
    LockedFields { fields: Vec<&'static str> },
    #[error("rejecting a listing requires reviewer feedback")]
    FeedbackRequired,
    #[error("deleting a listing requires explicit confirmation")]
    ConfirmationRequired,
}

/// Which backend operation a save must use, derived from current status.
/// Completing a draft is a distinct operation from a plain update even though
/// both carry the same payload shape. Draft creation never routes through
/// here; it has its own explicit trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOperation {
    CreateListing,
    CompleteDraft,
    UpdateListing,
}

pub fn save_operation(status: Option<&ListingStatus>) -> SaveOperation {
    match status {
        None => SaveOperation::CreateListing,
        Some(ListingStatus::Draft { .. }) => SaveOperation::CompleteDraft,
        Some(ListingStatus::Pending)
        | Some(ListingStatus::Approved { .. })
        | Some(ListingStatus::Rejected { .. }) => SaveOperation::UpdateListing,
    }
}

fn missing_basics(form: &PropertyListingForm) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if form.property_name.trim().is_empty() {
        missing.push("property name");
    }
    if form.description.trim().is_empty() {
        missing.push("description");
    }
    if form.address.trim().is_empty() {
        missing.push("address");
    }
    if form.total_acres <= 0.0 {
        missing.push("total acreage");
    }
    if !form.images.has_uploads() {
        missing.push("profile image");
    }
    missing
}

/// Entry transition: a brand-new draft requires the phase-one basics and at
/// least one uploaded image.
pub fn create_draft(form: &PropertyListingForm) -> Result<ListingStatus, GuardViolation> {
    let missing = missing_basics(form);
    if missing.is_empty() {
        Ok(ListingStatus::Draft {
            phase: DraftPhase::One,
        })
    } else {
        Err(GuardViolation::PhaseIncomplete { missing })
    }
}

/// Move a phase-one draft to phase two. This is a UI gate only: advancing is
/// allowed with incomplete nested data, no backend call is involved, and a
/// failure is non-fatal.
pub fn advance_draft(
    status: &ListingStatus,
    form: &PropertyListingForm,
) -> Result<ListingStatus, GuardViolation> {
    match status {
        ListingStatus::Draft {
            phase: DraftPhase::One,
        } => {
            let missing = missing_basics(form);
            if missing.is_empty() {
                Ok(ListingStatus::Draft {
                    phase: DraftPhase::Two,
                })
            } else {
                Err(GuardViolation::PhaseIncomplete { missing })
            }
        }
        other => Err(GuardViolation::WrongStatus {
            action: "advance",
            status: other.label(),
        }),
    }
}

/// Complete-and-submit: a phase-two draft becomes pending review once the
/// full validation pass succeeds.
pub fn complete_draft(
    status: &ListingStatus,
    form: &PropertyListingForm,
) -> Result<ListingStatus, GuardViolation> {
    match status {
        ListingStatus::Draft {
            phase: DraftPhase::Two,
        } => {
            let report = validate_property_form(form, SubmissionMode::Edit);
            if report.valid {
                Ok(ListingStatus::Pending)
            } else {
                Err(GuardViolation::Invalid {
                    errors: report.errors,
                })
            }
        }
        other => Err(GuardViolation::WrongStatus {
            action: "complete",
            status: other.label(),
        }),
    }
}

/// Edit-and-resubmit a rejected listing; full validation applies again.
pub fn resubmit(
    status: &ListingStatus,
    form: &PropertyListingForm,
) -> Result<ListingStatus, GuardViolation> {
    match status {
        ListingStatus::Rejected { .. } => {
            let report = validate_property_form(form, SubmissionMode::Edit);
            if report.valid {
                Ok(ListingStatus::Pending)
            } else {
                Err(GuardViolation::Invalid {
                    errors: report.errors,
                })
            }
        }
        other => Err(GuardViolation::WrongStatus {
            action: "resubmit",
            status: other.label(),
        }),
    }
}

/// Admin sign-off. Approval does not list the property; the provider flips
/// visibility explicitly afterwards.
pub fn approve(status: &ListingStatus) -> Result<ListingStatus, GuardViolation> {
    match status {
        ListingStatus::Pending => Ok(ListingStatus::Approved { listed: false }),
        other => Err(GuardViolation::WrongStatus {
            action: "approve",
            status: other.label(),
        }),
    }
}

/// Admin rejection; feedback for the provider is mandatory.
pub fn reject(status: &ListingStatus, feedback: &str) -> Result<ListingStatus, GuardViolation> {
    if feedback.trim().is_empty() {
        return Err(GuardViolation::FeedbackRequired);
    }
    match status {
        ListingStatus::Pending => Ok(ListingStatus::Rejected {
            feedback: feedback.trim().to_string(),
        }),
        other => Err(GuardViolation::WrongStatus {
            action: "reject",
            status: other.label(),
        }),
    }
}

/// Flip marketplace visibility. Only approved listings can be toggled; no
/// other field is touched.
pub fn toggle_listing(status: &ListingStatus) -> Result<ListingStatus, GuardViolation> {
    match status {
        ListingStatus::Approved { listed } => Ok(ListingStatus::Approved { listed: !listed }),
        other => Err(GuardViolation::WrongStatus {
            action: "toggle listing for",
            status: other.label(),
        }),
    }
}

/// Status after a plain update is persisted: rejected listings resubmit to
/// pending, everything else keeps its state (approved keeps its listed flag).
pub fn post_update_status(prior: &ListingStatus) -> ListingStatus {
    match prior {
        ListingStatus::Rejected { .. } => ListingStatus::Pending,
        other => other.clone(),
    }
}

/// Identity and location fields freeze once a listing is approved.
pub const LOCKED_FIELDS: &[&str] = &[
    "property_name",
    "address",
    "city",
    "state",
    "zip_code",
    "country",
    "latitude",
    "longitude",
];

/// Presentation contract for the form layer: is `field` read-only in the
/// given status?
pub fn is_field_locked(field: &str, status: &ListingStatus) -> bool {
    matches!(status, ListingStatus::Approved { .. }) && LOCKED_FIELDS.contains(&field)
}

/// Input-validation side of the locking policy: which locked fields would an
/// update change? Non-empty means the edit must be refused.
pub fn locked_field_changes(
    current: &PropertyListingForm,
    update: &PropertyListingForm,
) -> Vec<&'static str> {
    let pairs: [(&str, &str, &str); 8] = [
        ("property_name", &current.property_name, &update.property_name),
        ("address", &current.address, &update.address),
        ("city", &current.city, &update.city),
        ("state", &current.state, &update.state),
        ("zip_code", &current.zip_code, &update.zip_code),
        ("country", &current.country, &update.country),
        ("latitude", &current.latitude, &update.latitude),
        ("longitude", &current.longitude, &update.longitude),
    ];

    LOCKED_FIELDS
        .iter()
        .zip(pairs.iter())
        .filter(|(_, (_, before, after))| before.trim() != after.trim())
        .map(|(field, _)| *field)
        .collect()
}
