//! Full-form validation for submission.
//!
//! Every rule is checked independently and all failures are collected, so the
//! caller can render the complete list instead of fixing one field at a time.

use std::collections::HashMap;

use super::domain::{AccommodationStatus, HuntingPackage, PropertyListingForm};

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_DESCRIPTION_LEN: usize = 20;
pub const MIN_PACKAGE_DESCRIPTION_LEN: usize = 10;

/// Whether the form describes a brand-new listing or an edit of a persisted
/// one. Edits waive the image requirement: the stored record already has them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionMode {
    New,
    Edit,
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Validate every package individually and the name-uniqueness rule across
/// the set. Messages are prefixed with the package's 1-based position.
pub fn validate_hunting_packages(
    packages: &[HuntingPackage],
    accommodation_names: &[&str],
) -> Vec<String> {
    let mut errors = Vec::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for (index, package) in packages.iter().enumerate() {
        let position = index + 1;

        if package.name.trim().len() < MIN_NAME_LEN {
            errors.push(format!(
                "Package {position}: name must be at least {MIN_NAME_LEN} characters"
            ));
        }
        if package.duration_days < 1 {
            errors.push(format!("Package {position}: duration must be at least 1 day"));
        }
        if package.price <= 0.0 {
            errors.push(format!("Package {position}: price must be greater than 0"));
        }
        if package.max_hunters < 1 {
            errors.push(format!(
                "Package {position}: must allow at least 1 hunter"
            ));
        }
        if package.description.trim().len() < MIN_PACKAGE_DESCRIPTION_LEN {
            errors.push(format!(
                "Package {position}: description must be at least {MIN_PACKAGE_DESCRIPTION_LEN} characters"
            ));
        }

        if package.accommodation_status == AccommodationStatus::Included {
            let target = package.default_accommodation.trim();
            if target.is_empty() {
                errors.push(format!(
                    "Package {position}: a default accommodation is required when lodging is included"
                ));
            } else if !accommodation_names
                .iter()
                .any(|name| name_key(name) == name_key(target))
            {
                errors.push(format!(
                    "Package {position}: default accommodation '{target}' does not match any accommodation option"
                ));
            }
        }

        let key = name_key(&package.name);
        if !key.is_empty() {
            match first_seen.get(&key) {
                Some(original) => errors.push(format!(
                    "Package {position}: name '{}' duplicates package {original}",
                    package.name.trim()
                )),
                None => {
                    first_seen.insert(key, position);
                }
            }
        }
    }

    errors
}

fn check_coordinate(raw: &str, label: &str, bound: f64, errors: &mut Vec<String>) {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.abs() <= bound => {}
        Ok(_) => errors.push(format!("{label} must be between -{bound} and {bound}")),
        Err(_) => errors.push(format!("{label} must be a number")),
    }
}

/// Validate a fully-assembled form for submission, reporting every violation.
pub fn validate_property_form(form: &PropertyListingForm, mode: SubmissionMode) -> ValidationReport {
    let mut errors = Vec::new();

    if form.property_name.trim().len() < MIN_NAME_LEN {
        errors.push(format!(
            "Property name must be at least {MIN_NAME_LEN} characters"
        ));
    }
    if form.description.trim().len() < MIN_DESCRIPTION_LEN {
        errors.push(format!(
            "Description must be at least {MIN_DESCRIPTION_LEN} characters"
        ));
    }

    check_coordinate(&form.latitude, "Latitude", 90.0, &mut errors);
    check_coordinate(&form.longitude, "Longitude", 180.0, &mut errors);

    if form.total_acres < 1.0 {
        errors.push("Total acreage must be at least 1".to_string());
    }

    if form.hunting_packages.is_empty() {
        errors.push("At least one hunting package is required".to_string());
    } else {
        let names: Vec<&str> = form.accommodation_names().collect();
        errors.extend(validate_hunting_packages(&form.hunting_packages, &names));
    }

    if form.accommodations.is_empty() {
        errors.push("At least one accommodation option is required".to_string());
    } else {
        for (index, option) in form.accommodations.iter().enumerate() {
            if option.name.trim().len() < MIN_NAME_LEN {
                errors.push(format!(
                    "Accommodation {}: name must be at least {MIN_NAME_LEN} characters",
                    index + 1
                ));
            }
        }
    }

    if mode == SubmissionMode::New && !form.images.has_uploads() {
        errors.push("At least one property image is required".to_string());
    }

    ValidationReport::from_errors(errors)
}
