//! Pure projection from a cached application status to the "Become a Host"
//! behavior. Deliberately network-free: an older design polled the backend on
//! every click just to decide navigation.

use serde::Serialize;

/// Where the UI should send the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostDestination {
    ApplicationForm,
    StatusPage,
    Dashboard,
}

/// What clicking "Become a Host" should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HostAction {
    /// No application on record: open the application form.
    Apply,
    /// Application under review: notify and show the status page.
    UnderReview,
    /// Approved host: straight to the dashboard.
    OpenDashboard,
    /// Rejected: notify and reopen the form for resubmission.
    Reapply,
    /// Unrecognized status token: surface it verbatim on the status page.
    ShowStatus { status: String },
}

impl HostAction {
    pub const fn destination(&self) -> HostDestination {
        match self {
            HostAction::Apply | HostAction::Reapply => HostDestination::ApplicationForm,
            HostAction::UnderReview | HostAction::ShowStatus { .. } => HostDestination::StatusPage,
            HostAction::OpenDashboard => HostDestination::Dashboard,
        }
    }

    /// Notice text for the UI, when one applies.
    pub fn notice(&self) -> Option<String> {
        match self {
            HostAction::Apply | HostAction::OpenDashboard => None,
            HostAction::UnderReview => {
                Some("Your host application is under review.".to_string())
            }
            HostAction::Reapply => {
                Some("Your previous application was rejected. You may apply again.".to_string())
            }
            HostAction::ShowStatus { status } => {
                Some(format!("Application status: {status}"))
            }
        }
    }
}

/// Decision table over the cached status value. `None` means the user has
/// never applied.
pub fn next_action(cached: Option<&str>) -> HostAction {
    match cached.map(|status| status.trim().to_ascii_lowercase()) {
        None => HostAction::Apply,
        Some(status) if status.is_empty() => HostAction::Apply,
        Some(status) if status == "pending" => HostAction::UnderReview,
        Some(status) if status == "approved" => HostAction::OpenDashboard,
        Some(status) if status == "rejected" => HostAction::Reapply,
        Some(status) => HostAction::ShowStatus { status },
    }
}
