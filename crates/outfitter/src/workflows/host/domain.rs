use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account applying for hosting rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub u64);

/// Identifier of a stored application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

/// Review state of a host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl HostApplicationStatus {
    pub const fn token(self) -> &'static str {
        match self {
            HostApplicationStatus::Pending => "pending",
            HostApplicationStatus::Approved => "approved",
            HostApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn from_token(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(HostApplicationStatus::Pending),
            "approved" => Some(HostApplicationStatus::Approved),
            "rejected" => Some(HostApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// Applicant-supplied content of a host application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostApplicationForm {
    pub phone: String,
    pub address: String,
    pub bio: String,
    /// URLs of verification documents already uploaded to object storage.
    pub document_urls: Vec<String>,
}

/// A host application as held by the backend. A rejected application may be
/// superseded by a fresh submission; no history chaining is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct HostApplicationRecord {
    pub id: ApplicationId,
    pub applicant: ApplicantId,
    pub form: HostApplicationForm,
    pub status: HostApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub admin_comment: Option<String>,
}

impl HostApplicationRecord {
    pub fn status_view(&self) -> HostApplicationStatusView {
        HostApplicationStatusView {
            id: self.id,
            applicant_id: self.applicant.0,
            status: self.status.token(),
            admin_comment: self.admin_comment.clone(),
        }
    }
}

/// Flattened projection for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct HostApplicationStatusView {
    pub id: ApplicationId,
    pub applicant_id: u64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_comment: Option<String>,
}
