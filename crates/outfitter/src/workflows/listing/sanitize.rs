//! Normalization of persisted records into the canonical form shape.
//!
//! Stored listings span two historical field-naming conventions (camelCase
//! from the original form code, snake_case from the wire format), so every
//! lookup tries both keys. Nothing in here can fail: malformed or missing
//! fields degrade to fixed defaults so that loading an old record never
//! breaks, at the accepted cost of masking corrupt data.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::domain::{
    AccommodationOption, AccommodationStatus, AcreageBreakdown, HuntingPackage, ImageSet,
    PropertyImage, PropertyListingForm, WildlifeInfo,
};

pub const DEFAULT_DURATION_DAYS: u32 = 3;
pub const DEFAULT_PRICE: f64 = 100.0;
pub const DEFAULT_MAX_HUNTERS: u32 = 4;
pub const DEFAULT_POPULATION_DENSITY: u32 = 50;
pub const DEFAULT_CAPACITY: u32 = 1;
pub const DEFAULT_COUNTRY: &str = "United States";

fn field<'a>(record: &'a Value, camel: &str, snake: &str) -> Option<&'a Value> {
    let map = record.as_object()?;
    map.get(camel)
        .or_else(|| map.get(snake))
        .filter(|value| !value.is_null())
}

fn number_or(record: &Value, camel: &str, snake: &str, default: f64) -> f64 {
    match field(record, camel, snake) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

fn count_or(record: &Value, camel: &str, snake: &str, default: u32) -> u32 {
    let value = number_or(record, camel, snake, default as f64);
    if value.is_finite() && value >= 0.0 {
        value as u32
    } else {
        default
    }
}

fn text_or(record: &Value, camel: &str, snake: &str, default: &str) -> String {
    match field(record, camel, snake) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

fn optional_text(record: &Value, camel: &str, snake: &str) -> Option<String> {
    match field(record, camel, snake) {
        // The wire contract stores absent free text as "", so blank strings
        // load back as absent rather than Some("").
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn string_list_or(record: &Value, camel: &str, snake: &str) -> Vec<String> {
    match field(record, camel, snake) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn entries<'a>(record: &'a Value, camel: &str, snake: &str) -> Vec<&'a Value> {
    match field(record, camel, snake) {
        Some(Value::Array(items)) => items.iter().collect(),
        _ => Vec::new(),
    }
}

/// Canonicalize one stored hunting package.
pub fn sanitize_package(raw: &Value) -> HuntingPackage {
    let accommodation_status = field(raw, "accommodationStatus", "accommodation_status")
        .and_then(Value::as_str)
        .and_then(AccommodationStatus::from_token)
        .unwrap_or(AccommodationStatus::Without);

    // Stale default accommodations survive status flips in old records;
    // clear unconditionally whenever lodging is not bundled.
    let default_accommodation = match accommodation_status {
        AccommodationStatus::Without => String::new(),
        _ => text_or(raw, "defaultAccommodation", "default_accommodation", ""),
    };

    HuntingPackage {
        name: text_or(raw, "name", "name", ""),
        hunting_type: text_or(raw, "huntingType", "hunting_type", ""),
        duration_days: count_or(raw, "durationDays", "duration", DEFAULT_DURATION_DAYS),
        price: number_or(raw, "price", "price", DEFAULT_PRICE),
        max_hunters: count_or(raw, "maxHunters", "max_hunters", DEFAULT_MAX_HUNTERS),
        description: text_or(raw, "description", "description", ""),
        included_items: string_list_or(raw, "includedItems", "included_items"),
        accommodation_status,
        default_accommodation,
    }
}

/// Canonicalize one stored accommodation option.
pub fn sanitize_accommodation(raw: &Value) -> AccommodationOption {
    AccommodationOption {
        kind: text_or(raw, "type", "type", ""),
        name: text_or(raw, "name", "name", ""),
        bedrooms: count_or(raw, "bedrooms", "bedrooms", 0),
        bathrooms: number_or(raw, "bathrooms", "bathrooms", 0.0).max(0.0),
        capacity: count_or(raw, "capacity", "capacity", DEFAULT_CAPACITY),
        price_per_night: number_or(raw, "pricePerNight", "price_per_night", 0.0),
        amenities: string_list_or(raw, "amenities", "amenities"),
    }
}

/// Canonicalize one stored acreage slice.
pub fn sanitize_acreage(raw: &Value) -> AcreageBreakdown {
    AcreageBreakdown {
        acres: number_or(raw, "acres", "acres", 0.0),
        terrain_type: text_or(raw, "terrainType", "terrain_type", ""),
    }
}

/// Canonicalize one stored wildlife entry, clamping density into 0-100.
pub fn sanitize_wildlife(raw: &Value) -> WildlifeInfo {
    WildlifeInfo {
        species: text_or(raw, "species", "species", ""),
        population_density: count_or(
            raw,
            "populationDensity",
            "population_density",
            DEFAULT_POPULATION_DENSITY,
        )
        .min(100),
    }
}

/// Canonicalize one stored image. The oldest records stored bare URL strings
/// instead of objects.
pub fn sanitize_image(raw: &Value) -> PropertyImage {
    if let Value::String(url) = raw {
        return PropertyImage {
            url: url.clone(),
            ..PropertyImage::default()
        };
    }

    let uploaded_at = field(raw, "uploadedAt", "uploaded_at")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    PropertyImage {
        url: text_or(raw, "url", "url", ""),
        filename: optional_text(raw, "filename", "filename"),
        uploaded_at,
        size: field(raw, "size", "size").and_then(Value::as_u64),
    }
}

/// Rebuild the full canonical form from a persisted record.
pub fn sanitize_form(raw: &Value) -> PropertyListingForm {
    let uploaded: Vec<PropertyImage> = entries(raw, "propertyImages", "property_images")
        .into_iter()
        .map(sanitize_image)
        .filter(|image| !image.url.is_empty())
        .collect();

    let profile_image_index = {
        let index = count_or(raw, "profileImageIndex", "profile_image_index", 0) as usize;
        if index < uploaded.len() {
            index
        } else {
            0
        }
    };

    PropertyListingForm {
        property_name: text_or(raw, "propertyName", "property_name", ""),
        description: text_or(raw, "description", "description", ""),
        address: text_or(raw, "address", "address", ""),
        city: text_or(raw, "city", "city", ""),
        state: text_or(raw, "state", "state", ""),
        zip_code: text_or(raw, "zipCode", "zip_code", ""),
        country: text_or(raw, "country", "country", DEFAULT_COUNTRY),
        latitude: text_or(raw, "latitude", "latitude", ""),
        longitude: text_or(raw, "longitude", "longitude", ""),
        total_acres: number_or(raw, "totalAcres", "total_acres", 0.0),
        acreage_breakdown: entries(raw, "acreageBreakdown", "acreage_breakdown")
            .into_iter()
            .map(sanitize_acreage)
            .collect(),
        wildlife_info: entries(raw, "wildlifeInfo", "wildlife_info")
            .into_iter()
            .map(sanitize_wildlife)
            .collect(),
        hunting_packages: entries(raw, "huntingPackages", "hunting_packages")
            .into_iter()
            .map(sanitize_package)
            .collect(),
        accommodations: entries(raw, "accommodations", "accommodations")
            .into_iter()
            .map(sanitize_accommodation)
            .collect(),
        facilities: string_list_or(raw, "facilities", "facilities"),
        rules: optional_text(raw, "rules", "rules"),
        safety_info: optional_text(raw, "safetyInfo", "safety_info"),
        license_requirements: optional_text(raw, "licenseRequirements", "license_requirements"),
        season_info: optional_text(raw, "seasonInfo", "season_info"),
        images: ImageSet::from_uploaded(uploaded),
        profile_image_index,
    }
}
