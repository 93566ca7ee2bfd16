//! Shape raw RIDB records into the output documents campvue serves
//!
//! Everything here is a pure function of already-validated records from
//! [`crate::ridb`].

mod campsite;
mod facility;

pub use campsite::{
    max_vehicle_length, normalize_campsite, normalize_equipment, normalize_media,
    vehicle_lengths, CampsiteOutput, EquipmentOutput, MediaOutput, SiteLength, VehicleLengths,
};
pub use facility::{
    normalize_campground_name, normalize_facility, park_type, reservations_url, FacilityOutput,
};

use serde::Serialize;

use crate::attributes::{classify, ClassifiedAttribute};
use crate::ridb::{RidbActivity, RidbAttribute};
use crate::text::title_case;

/// Normalized record, optionally paired with the upstream record it came from
#[derive(Debug, Clone, Serialize)]
pub struct Shaped<R, N> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<R>,
    pub normalized: N,
}

impl<R, N> Shaped<R, N> {
    pub fn new(raw: R, normalized: N, include_raw: bool) -> Self {
        Self {
            raw: include_raw.then_some(raw),
            normalized,
        }
    }
}

/// Activity output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityOutput {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

pub fn normalize_activity(activity: &RidbActivity) -> ActivityOutput {
    ActivityOutput {
        id: activity.activity_id,
        name: activity.activity_name.as_deref().map(title_case),
    }
}

pub fn normalize_activities(activities: &[RidbActivity]) -> Vec<ActivityOutput> {
    activities.iter().map(normalize_activity).collect()
}

/// RIDB answers unknown activity ids with a zeroed record instead of a 404
pub fn is_missing_activity(activity: &RidbActivity) -> bool {
    activity.activity_id == 0 && activity.activity_name.is_none()
}

/// Classify a list of raw attributes, preserving order
pub fn classify_attributes(attributes: &[RidbAttribute]) -> Vec<ClassifiedAttribute> {
    attributes
        .iter()
        .map(|attribute| classify(attribute.as_raw()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeScope, AttributeValue};
    use serde_json::json;

    fn activity(id: u64, name: Option<&str>) -> RidbActivity {
        RidbActivity {
            activity_id: id,
            activity_name: name.map(str::to_string),
            activity_level: None,
            activity_parent_id: None,
        }
    }

    #[test]
    fn test_normalize_activity_title_cases_name() {
        let output = normalize_activity(&activity(9, Some("HORSEBACK RIDING")));
        assert_eq!(
            output,
            ActivityOutput {
                id: 9,
                name: Some("Horseback Riding".to_string())
            }
        );
    }

    #[test]
    fn test_normalize_activity_without_name() {
        let output = normalize_activity(&activity(4, None));
        assert_eq!(serde_json::to_value(&output).unwrap(), json!({"id": 4}));
    }

    #[test]
    fn test_is_missing_activity() {
        assert!(is_missing_activity(&activity(0, None)));
        assert!(!is_missing_activity(&activity(0, Some("CAMPING"))));
        assert!(!is_missing_activity(&activity(9, None)));
    }

    #[test]
    fn test_classify_attributes_preserves_order() {
        let attributes = vec![
            RidbAttribute {
                attribute_name: "Max Num of People".to_string(),
                attribute_value: "8".to_string(),
            },
            RidbAttribute {
                attribute_name: "Pets Allowed".to_string(),
                attribute_value: "Yes".to_string(),
            },
        ];

        let classified = classify_attributes(&attributes);

        assert_eq!(classified[0].key, "max_num_of_people");
        assert_eq!(classified[0].value, AttributeValue::Number(8.0));
        assert_eq!(classified[0].scope, AttributeScope::Campsite);
        assert_eq!(classified[1].key, "pets_allowed");
        assert_eq!(classified[1].value, AttributeValue::Boolean(true));
    }

    #[test]
    fn test_shaped_include_raw() {
        let raw = activity(9, Some("CAMPING"));
        let normalized = normalize_activity(&raw);

        let without = Shaped::new(raw.clone(), normalized.clone(), false);
        assert_eq!(
            serde_json::to_value(&without).unwrap(),
            json!({"normalized": {"id": 9, "name": "Camping"}})
        );

        let with = Shaped::new(raw, normalized, true);
        assert_eq!(
            serde_json::to_value(&with).unwrap()["raw"],
            json!({"ActivityID": 9, "ActivityName": "CAMPING"})
        );
    }
}
