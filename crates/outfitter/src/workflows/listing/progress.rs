//! Draft completion percentage for the progress bar.
//!
//! Pure function of the current form state; callers recompute on every field
//! change rather than caching.

use super::domain::PropertyListingForm;

const FIELD_POINTS: u8 = 4;
const IMAGE_POINTS: u8 = 10;
const PACKAGE_POINTS: u8 = 25;
const ACCOMMODATION_POINTS: u8 = 25;
// 9 scalar fields plus the three collection bonuses.
const MAX_POINTS: u32 =
    9 * FIELD_POINTS as u32 + IMAGE_POINTS as u32 + PACKAGE_POINTS as u32 + ACCOMMODATION_POINTS as u32;

/// Completion of a draft as an integer percentage in 0-100. Raw points are
/// normalized against the maximum so a fully-populated draft reads exactly
/// 100.
pub fn draft_progress(form: &PropertyListingForm) -> u8 {
    let filled = [
        !form.property_name.trim().is_empty(),
        !form.description.trim().is_empty(),
        !form.address.trim().is_empty(),
        !form.city.trim().is_empty(),
        !form.state.trim().is_empty(),
        !form.zip_code.trim().is_empty(),
        !form.latitude.trim().is_empty(),
        !form.longitude.trim().is_empty(),
        form.total_acres > 0.0,
    ];

    let mut score: u32 = filled
        .iter()
        .filter(|present| **present)
        .count() as u32
        * FIELD_POINTS as u32;

    if form.images.has_uploads() {
        score += IMAGE_POINTS as u32;
    }
    if !form.hunting_packages.is_empty() {
        score += PACKAGE_POINTS as u32;
    }
    if !form.accommodations.is_empty() {
        score += ACCOMMODATION_POINTS as u32;
    }

    (score * 100 / MAX_POINTS).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::listing::domain::{
        AccommodationOption, HuntingPackage, ImageSet, PropertyImage,
    };

    fn full_form() -> PropertyListingForm {
        PropertyListingForm {
            property_name: "Big Buck Ranch".to_string(),
            description: "Hill country whitetail hunting.".to_string(),
            address: "1 Ranch Rd".to_string(),
            city: "Dripping Springs".to_string(),
            state: "TX".to_string(),
            zip_code: "78620".to_string(),
            latitude: "30.27".to_string(),
            longitude: "-98.68".to_string(),
            total_acres: 640.0,
            hunting_packages: vec![HuntingPackage::default()],
            accommodations: vec![AccommodationOption::default()],
            images: ImageSet::from_uploaded(vec![PropertyImage {
                url: "https://cdn.example/a.jpg".to_string(),
                ..PropertyImage::default()
            }]),
            ..PropertyListingForm::default()
        }
    }

    #[test]
    fn empty_draft_scores_zero() {
        assert_eq!(draft_progress(&PropertyListingForm::default()), 0);
    }

    #[test]
    fn complete_draft_scores_exactly_one_hundred() {
        assert_eq!(draft_progress(&full_form()), 100);
    }

    #[test]
    fn progress_is_monotone_as_fields_fill_in() {
        let mut form = PropertyListingForm::default();
        let mut last = draft_progress(&form);

        form.property_name = "Big Buck Ranch".to_string();
        let next = draft_progress(&form);
        assert!(next >= last);
        last = next;

        form.description = "Hill country whitetail.".to_string();
        form.address = "1 Ranch Rd".to_string();
        let next = draft_progress(&form);
        assert!(next >= last);
        last = next;

        form.images = ImageSet::from_uploaded(vec![PropertyImage {
            url: "https://cdn.example/a.jpg".to_string(),
            ..PropertyImage::default()
        }]);
        form.hunting_packages.push(HuntingPackage::default());
        form.accommodations.push(AccommodationOption::default());
        let next = draft_progress(&form);
        assert!(next >= last);
    }

    #[test]
    fn only_the_full_form_reaches_one_hundred() {
        let mut form = full_form();
        form.accommodations.clear();
        assert!(draft_progress(&form) < 100);

        let mut form = full_form();
        form.zip_code.clear();
        assert!(draft_progress(&form) < 100);
    }
}
