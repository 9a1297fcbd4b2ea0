use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the backend once a listing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub u64);

/// Provider (host) account that owns a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub u64);

/// Which half of the two-phase draft flow a listing has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftPhase {
    One,
    Two,
}

impl DraftPhase {
    pub const fn number(self) -> u8 {
        match self {
            DraftPhase::One => 1,
            DraftPhase::Two => 2,
        }
    }

    /// Old records may carry 0 or junk; anything below 2 reads as phase one.
    pub const fn from_number(value: u8) -> Self {
        if value >= 2 {
            DraftPhase::Two
        } else {
            DraftPhase::One
        }
    }
}

/// Lifecycle state of a listing, as a single sum type.
///
/// The stored representation spreads this over three independent columns
/// (`status`, `draft_completed_phase`, `is_listed`), which permits nonsense
/// like a listed draft. Decoding funnels through [`ListingStatus::from_wire`]
/// so those combinations cannot exist in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStatus {
    Draft { phase: DraftPhase },
    Pending,
    Approved { listed: bool },
    Rejected { feedback: String },
}

impl ListingStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            ListingStatus::Draft { .. } => "DRAFT",
            ListingStatus::Pending => "PENDING",
            ListingStatus::Approved { .. } => "APPROVED",
            ListingStatus::Rejected { .. } => "REJECTED",
        }
    }

    pub const fn draft_phase(&self) -> Option<u8> {
        match self {
            ListingStatus::Draft { phase } => Some(phase.number()),
            _ => None,
        }
    }

    pub const fn is_listed(&self) -> bool {
        matches!(self, ListingStatus::Approved { listed: true })
    }

    pub fn admin_feedback(&self) -> Option<&str> {
        match self {
            ListingStatus::Rejected { feedback } => Some(feedback.as_str()),
            _ => None,
        }
    }

    /// Rebuild the sum type from the stored triple. Unknown status tokens and
    /// stray flags degrade to the nearest sensible state rather than failing,
    /// since historical records predate the stricter model.
    pub fn from_wire(status: &str, draft_phase: Option<u8>, listed: bool, feedback: Option<String>) -> Self {
        match status.trim().to_ascii_uppercase().as_str() {
            "PENDING" => ListingStatus::Pending,
            "APPROVED" => ListingStatus::Approved { listed },
            "REJECTED" => ListingStatus::Rejected {
                feedback: feedback.unwrap_or_default(),
            },
            _ => ListingStatus::Draft {
                phase: DraftPhase::from_number(draft_phase.unwrap_or(1)),
            },
        }
    }
}

/// Whether lodging comes bundled with a hunting package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccommodationStatus {
    Included,
    Extra,
    #[default]
    Without,
}

impl AccommodationStatus {
    pub const fn token(self) -> &'static str {
        match self {
            AccommodationStatus::Included => "included",
            AccommodationStatus::Extra => "extra",
            AccommodationStatus::Without => "without",
        }
    }

    pub fn from_token(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "included" => Some(AccommodationStatus::Included),
            "extra" => Some(AccommodationStatus::Extra),
            "without" => Some(AccommodationStatus::Without),
            _ => None,
        }
    }
}

/// A bookable hunt bundle offered against a listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuntingPackage {
    pub name: String,
    pub hunting_type: String,
    #[serde(rename = "duration")]
    pub duration_days: u32,
    pub price: f64,
    pub max_hunters: u32,
    pub description: String,
    pub included_items: Vec<String>,
    pub accommodation_status: AccommodationStatus,
    pub default_accommodation: String,
}

/// A lodging unit associable with one or more packages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccommodationOption {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub capacity: u32,
    /// 0 means the cost is bundled into a package.
    pub price_per_night: f64,
    pub amenities: Vec<String>,
}

/// One slice of the property's total acreage by terrain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcreageBreakdown {
    pub acres: f64,
    pub terrain_type: String,
}

/// Species present on the property and how dense the population is (0-100).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WildlifeInfo {
    pub species: String,
    pub population_density: u32,
}

/// An uploaded property photo. Only URLs cross this workflow's boundary;
/// bytes live with the object-storage collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyImage {
    pub url: String,
    pub filename: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

/// Images attached to the form. `selected_count` tracks photos the user has
/// picked, which may run ahead of `uploaded` while transfers are in flight;
/// submission is blocked until the two agree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSet {
    pub selected_count: usize,
    pub uploaded: Vec<PropertyImage>,
}

impl ImageSet {
    pub fn from_uploaded(uploaded: Vec<PropertyImage>) -> Self {
        Self {
            selected_count: uploaded.len(),
            uploaded,
        }
    }

    pub fn uploads_complete(&self) -> bool {
        self.selected_count <= self.uploaded.len()
    }

    pub fn has_uploads(&self) -> bool {
        !self.uploaded.is_empty()
    }
}

/// Canonical in-memory shape of the listing form across both draft phases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyListingForm {
    pub property_name: String,
    pub description: String,

    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    /// Kept as the raw form input; parsed on validation and serialization.
    pub latitude: String,
    pub longitude: String,

    pub total_acres: f64,
    pub acreage_breakdown: Vec<AcreageBreakdown>,
    pub wildlife_info: Vec<WildlifeInfo>,

    pub hunting_packages: Vec<HuntingPackage>,
    pub accommodations: Vec<AccommodationOption>,
    pub facilities: Vec<String>,

    pub rules: Option<String>,
    pub safety_info: Option<String>,
    pub license_requirements: Option<String>,
    pub season_info: Option<String>,

    pub images: ImageSet,
    pub profile_image_index: usize,
}

impl PropertyListingForm {
    pub fn accommodation_names(&self) -> impl Iterator<Item = &str> {
        self.accommodations.iter().map(|option| option.name.as_str())
    }
}

/// A listing as held by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub id: ListingId,
    pub provider: ProviderId,
    pub form: PropertyListingForm,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListingRecord {
    /// Approval and listing are independent axes; only both together make a
    /// record visible on the marketplace.
    pub fn publicly_visible(&self) -> bool {
        matches!(self.status, ListingStatus::Approved { listed: true })
    }

    pub fn status_view(&self) -> ListingStatusView {
        ListingStatusView {
            id: self.id,
            status: self.status.label(),
            draft_completed_phase: self.status.draft_phase(),
            is_listed: self.status.is_listed(),
            admin_feedback: self.status.admin_feedback().map(str::to_string),
        }
    }
}

/// Flattened status projection for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ListingStatusView {
    pub id: ListingId,
    pub status: &'static str,
    pub draft_completed_phase: Option<u8>,
    pub is_listed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_feedback: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_decoding_rejects_inconsistent_combinations() {
        // A stored draft flagged as listed collapses to a plain draft.
        let status = ListingStatus::from_wire("DRAFT", Some(1), true, None);
        assert_eq!(
            status,
            ListingStatus::Draft {
                phase: DraftPhase::One
            }
        );
        assert!(!status.is_listed());
    }

    #[test]
    fn wire_decoding_preserves_listed_flag_for_approved() {
        let status = ListingStatus::from_wire("approved", None, true, None);
        assert_eq!(status, ListingStatus::Approved { listed: true });
        assert_eq!(status.label(), "APPROVED");
    }

    #[test]
    fn unknown_status_token_degrades_to_draft_phase_one() {
        let status = ListingStatus::from_wire("archived", None, false, None);
        assert_eq!(status.label(), "DRAFT");
        assert_eq!(status.draft_phase(), Some(1));
    }

    #[test]
    fn rejected_status_carries_feedback() {
        let status =
            ListingStatus::from_wire("REJECTED", None, false, Some("blurry photos".to_string()));
        assert_eq!(status.admin_feedback(), Some("blurry photos"));
    }

    #[test]
    fn image_set_tracks_upload_backlog() {
        let mut images = ImageSet::from_uploaded(vec![PropertyImage {
            url: "https://cdn.example/1.jpg".to_string(),
            ..PropertyImage::default()
        }]);
        assert!(images.uploads_complete());

        images.selected_count = 3;
        assert!(!images.uploads_complete());
        assert!(images.has_uploads());
    }
}
