//! Shaping the canonical form into the backend's wire payloads.
//!
//! The wire contract is a flat snake_case JSON object. Optional free-text
//! fields always serialize as strings (empty when absent), wildlife entries
//! carry exactly their two canonical keys, and image entries get positional
//! filenames when the upload did not record one.

use serde::Serialize;

use super::domain::{
    AccommodationOption, AcreageBreakdown, HuntingPackage, PropertyImage, PropertyListingForm,
    WildlifeInfo,
};

/// Why a payload could not be assembled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// Uploads are still in flight; submission is blocked until every
    /// selected image has a URL.
    #[error("only {uploaded} of {selected} selected images have finished uploading")]
    ImagesNotUploaded { selected: usize, uploaded: usize },
    #[error("latitude '{0}' is not a number")]
    InvalidLatitude(String),
    #[error("longitude '{0}' is not a number")]
    InvalidLongitude(String),
}

/// Wildlife entry restricted to the two canonical wire fields. Building this
/// from [`WildlifeInfo`] drops any deprecated keys an old record carried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WildlifePayload {
    pub species: String,
    pub population_density: u32,
}

impl From<&WildlifeInfo> for WildlifePayload {
    fn from(info: &WildlifeInfo) -> Self {
        Self {
            species: info.species.clone(),
            population_density: info.population_density,
        }
    }
}

/// Image entry as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePayload {
    pub url: String,
    pub filename: String,
    pub uploaded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub size: Option<u64>,
}

/// Complete listing payload for create, complete, and update operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPayload {
    pub property_name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub total_acres: f64,
    pub acreage_breakdown: Vec<AcreageBreakdown>,
    pub wildlife_info: Vec<WildlifePayload>,
    pub hunting_packages: Vec<HuntingPackage>,
    pub accommodations: Vec<AccommodationOption>,
    pub facilities: Vec<String>,
    pub rules: String,
    pub safety_info: String,
    pub license_requirements: String,
    pub season_info: String,
    pub property_images: Vec<ImagePayload>,
    pub profile_image_index: usize,
}

/// Draft payload for draft creation and draft saves. Coordinates stay
/// optional because partial drafts are permitted; everything else the form
/// carries is persisted so a draft save never drops entered data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftPayload {
    pub property_name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub total_acres: f64,
    pub acreage_breakdown: Vec<AcreageBreakdown>,
    pub wildlife_info: Vec<WildlifePayload>,
    pub hunting_packages: Vec<HuntingPackage>,
    pub accommodations: Vec<AccommodationOption>,
    pub facilities: Vec<String>,
    pub rules: String,
    pub safety_info: String,
    pub license_requirements: String,
    pub season_info: String,
    pub property_images: Vec<ImagePayload>,
    pub profile_image_index: usize,
}

fn assemble_images(images: &[PropertyImage]) -> Vec<ImagePayload> {
    images
        .iter()
        .enumerate()
        .map(|(index, image)| ImagePayload {
            url: image.url.clone(),
            filename: image
                .filename
                .clone()
                .unwrap_or_else(|| format!("property_image_{}", index + 1)),
            uploaded_at: image.uploaded_at,
            size: image.size,
        })
        .collect()
}

fn wildlife(form: &PropertyListingForm) -> Vec<WildlifePayload> {
    form.wildlife_info.iter().map(WildlifePayload::from).collect()
}

/// Build the full submission payload. Refuses while any selected image still
/// lacks an uploaded URL; coordinates must parse because full validation has
/// already run by the time a submission is assembled.
pub fn build_payload(form: &PropertyListingForm) -> Result<ListingPayload, PayloadError> {
    if !form.images.uploads_complete() {
        return Err(PayloadError::ImagesNotUploaded {
            selected: form.images.selected_count,
            uploaded: form.images.uploaded.len(),
        });
    }

    let latitude = form
        .latitude
        .trim()
        .parse::<f64>()
        .map_err(|_| PayloadError::InvalidLatitude(form.latitude.clone()))?;
    let longitude = form
        .longitude
        .trim()
        .parse::<f64>()
        .map_err(|_| PayloadError::InvalidLongitude(form.longitude.clone()))?;

    Ok(ListingPayload {
        property_name: form.property_name.clone(),
        description: form.description.clone(),
        address: form.address.clone(),
        city: form.city.clone(),
        state: form.state.clone(),
        zip_code: form.zip_code.clone(),
        country: form.country.clone(),
        latitude,
        longitude,
        total_acres: form.total_acres,
        acreage_breakdown: form.acreage_breakdown.clone(),
        wildlife_info: wildlife(form),
        hunting_packages: form.hunting_packages.clone(),
        accommodations: form.accommodations.clone(),
        facilities: form.facilities.clone(),
        rules: form.rules.clone().unwrap_or_default(),
        safety_info: form.safety_info.clone().unwrap_or_default(),
        license_requirements: form.license_requirements.clone().unwrap_or_default(),
        season_info: form.season_info.clone().unwrap_or_default(),
        property_images: assemble_images(&form.images.uploaded),
        profile_image_index: form.profile_image_index,
    })
}

/// Build the lenient draft payload. Never fails: unparseable coordinates are
/// omitted rather than rejected, since drafts may be partial.
pub fn build_draft_payload(form: &PropertyListingForm) -> DraftPayload {
    DraftPayload {
        property_name: form.property_name.clone(),
        description: form.description.clone(),
        address: form.address.clone(),
        city: form.city.clone(),
        state: form.state.clone(),
        zip_code: form.zip_code.clone(),
        country: form.country.clone(),
        latitude: form.latitude.trim().parse().ok(),
        longitude: form.longitude.trim().parse().ok(),
        total_acres: form.total_acres,
        acreage_breakdown: form.acreage_breakdown.clone(),
        wildlife_info: wildlife(form),
        hunting_packages: form.hunting_packages.clone(),
        accommodations: form.accommodations.clone(),
        facilities: form.facilities.clone(),
        rules: form.rules.clone().unwrap_or_default(),
        safety_info: form.safety_info.clone().unwrap_or_default(),
        license_requirements: form.license_requirements.clone().unwrap_or_default(),
        season_info: form.season_info.clone().unwrap_or_default(),
        property_images: assemble_images(&form.images.uploaded),
        profile_image_index: form.profile_image_index,
    }
}
