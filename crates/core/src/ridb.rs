//! Wire types for the Recreation Information Database (RIDB) API
//!
//! RIDB wraps every list response in an envelope:
//!
//! ```json
//! { "RECDATA": [ ... ], "METADATA": { "RESULTS": { "TOTAL_COUNT": 123 } } }
//! ```
//!
//! Record fields are loosely typed upstream (ids arrive as strings or numbers,
//! lengths as numbers or numeric strings), so the deserializers here coerce what
//! can be coerced and reject the rest. [`validate_page`] and [`validate_record`]
//! are the structural gate every payload passes through before anything else
//! looks at it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::attributes::RawAttribute;

/// Decoded JSON that does not have the expected structure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("unexpected payload shape: {0}")]
    Shape(String),

    #[error("Incomplete or malformed RIDB response (missing {0})")]
    MissingField(&'static str),
}

// =============================================================================
// Envelope
// =============================================================================

/// List envelope shared by every paginated RIDB endpoint
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RidbEnvelope<T> {
    #[serde(rename = "RECDATA", default = "Vec::new")]
    pub recdata: Vec<T>,
    #[serde(rename = "METADATA", default)]
    pub metadata: Option<RidbMetadata>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RidbMetadata {
    #[serde(rename = "RESULTS", default)]
    pub results: Option<RidbResults>,
    #[serde(rename = "SEARCH_PARAMETERS", default)]
    pub search_parameters: Option<RidbSearchParameters>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RidbResults {
    #[serde(rename = "CURRENT_COUNT", default)]
    pub current_count: Option<u64>,
    #[serde(rename = "TOTAL_COUNT", default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RidbSearchParameters {
    #[serde(rename = "LIMIT", default)]
    pub limit: Option<u64>,
    #[serde(rename = "OFFSET", default)]
    pub offset: Option<u64>,
    #[serde(rename = "QUERY", default)]
    pub query: Option<String>,
}

/// One fetched page: records in upstream order plus the reported total, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total_count: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, total_count: Option<u64>) -> Self {
        Self {
            records,
            total_count,
        }
    }

    pub fn returned_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> From<RidbEnvelope<T>> for Page<T> {
    fn from(envelope: RidbEnvelope<T>) -> Self {
        let total_count = envelope
            .metadata
            .and_then(|metadata| metadata.results)
            .and_then(|results| results.total_count);

        Page::new(envelope.recdata, total_count)
    }
}

/// Check a decoded list payload against the envelope shape
pub fn validate_page<T: DeserializeOwned>(value: serde_json::Value) -> Result<Page<T>, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::Shape(format!(
            "expected an object envelope, got {}",
            json_kind(&value)
        )));
    }

    serde_json::from_value::<RidbEnvelope<T>>(value)
        .map(Page::from)
        .map_err(|e| ValidationError::Shape(e.to_string()))
}

/// Check a decoded single-record payload
pub fn validate_record<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(|e| ValidationError::Shape(e.to_string()))
}

/// Facility payloads are sometimes truncated upstream; reject those before
/// attempting a full decode so the failure says what is missing.
pub fn validate_facility(value: serde_json::Value) -> Result<RidbFacility, ValidationError> {
    if value.get("FacilityID").is_none() {
        return Err(ValidationError::MissingField("FacilityID"));
    }
    validate_record(value)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// =============================================================================
// Coercing deserializers
// =============================================================================

/// Accept `"123"` or `123`; reject blank ids
fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Number(serde_json::Number),
    }

    let id = match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(text) => text.trim().to_string(),
        IdRepr::Number(number) => number.to_string(),
    };

    if id.is_empty() {
        return Err(serde::de::Error::custom("ID must be non-empty"));
    }
    Ok(id)
}

/// Accept `12.5` or `"12.5"`; reject anything that is not a finite number
fn numberish<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberRepr {
        Number(f64),
        Text(String),
    }

    let number = match NumberRepr::deserialize(deserializer)? {
        NumberRepr::Number(number) => number,
        NumberRepr::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom("Must be a valid number"))?,
    };

    if !number.is_finite() {
        return Err(serde::de::Error::custom("Must be a valid number"));
    }
    Ok(number)
}

/// A nested list that fails validation degrades to an empty list instead of
/// failing the whole record.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let text = String::deserialize(deserializer)?;
    if text.is_empty() {
        return Err(serde::de::Error::custom("must not be empty"));
    }
    Ok(text)
}

// =============================================================================
// Records
// =============================================================================

/// Activity record (`/activities`, `/facilities/{id}/activities`)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RidbActivity {
    #[serde(rename = "ActivityID")]
    pub activity_id: u64,
    #[serde(rename = "ActivityName", default, skip_serializing_if = "Option::is_none")]
    pub activity_name: Option<String>,
    #[serde(rename = "ActivityLevel", default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<u64>,
    #[serde(rename = "ActivityParentID", default, skip_serializing_if = "Option::is_none")]
    pub activity_parent_id: Option<u64>,
}

/// Free-form campsite attribute; no schema beyond name and value
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RidbAttribute {
    #[serde(rename = "AttributeName")]
    pub attribute_name: String,
    #[serde(rename = "AttributeValue")]
    pub attribute_value: String,
}

impl RidbAttribute {
    pub fn as_raw(&self) -> RawAttribute<'_> {
        RawAttribute {
            name: &self.attribute_name,
            value: &self.attribute_value,
        }
    }
}

/// Equipment a campsite accepts, with its maximum length in feet
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RidbEquipment {
    #[serde(rename = "EquipmentName", deserialize_with = "non_empty")]
    pub equipment_name: String,
    #[serde(rename = "MaxLength", deserialize_with = "numberish")]
    pub max_length: f64,
}

/// Image or other media attached to an entity
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RidbMedia {
    #[serde(rename = "Credits", default)]
    pub credits: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Height", deserialize_with = "numberish")]
    pub height: f64,
    #[serde(rename = "Width", deserialize_with = "numberish")]
    pub width: f64,
    #[serde(rename = "IsGallery", default)]
    pub is_gallery: bool,
    #[serde(rename = "IsPreview", default)]
    pub is_preview: bool,
    #[serde(rename = "IsPrimary", default)]
    pub is_primary: bool,
    #[serde(rename = "MediaType", default)]
    pub media_type: Option<String>,
    #[serde(rename = "Subtitle", default)]
    pub subtitle: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "URL")]
    pub url: String,
}

/// Campsite record (`/facilities/{id}/campsites`, `/campsites/{id}`)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RidbCampsite {
    #[serde(rename = "FacilityID", deserialize_with = "id_as_string")]
    pub facility_id: String,
    #[serde(rename = "CampsiteID", deserialize_with = "id_as_string")]
    pub campsite_id: String,
    #[serde(rename = "CampsiteName", deserialize_with = "id_as_string")]
    pub campsite_name: String,
    #[serde(rename = "CampsiteAccessible", default)]
    pub campsite_accessible: bool,
    #[serde(rename = "CampsiteReservable", default)]
    pub campsite_reservable: bool,
    #[serde(rename = "CampsiteLongitude", default)]
    pub campsite_longitude: Option<f64>,
    #[serde(rename = "CampsiteLatitude", default)]
    pub campsite_latitude: Option<f64>,
    #[serde(rename = "CreatedDate", default)]
    pub created_date: Option<String>,
    #[serde(rename = "LastUpdatedDate", default)]
    pub last_updated_date: Option<String>,
    #[serde(rename = "CampsiteType")]
    pub campsite_type: String,
    #[serde(rename = "Loop")]
    pub loop_name: String,
    #[serde(rename = "TypeOfUse", default)]
    pub type_of_use: Option<String>,
    #[serde(rename = "ATTRIBUTES", default)]
    pub attributes: Vec<RidbAttribute>,
    #[serde(rename = "PERMITTEDEQUIPMENT", default, deserialize_with = "lenient_list")]
    pub permitted_equipment: Vec<RidbEquipment>,
    #[serde(rename = "ENTITYMEDIA", default, deserialize_with = "lenient_list")]
    pub entity_media: Vec<RidbMedia>,
}

/// Recreation area a facility belongs to
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RidbRecArea {
    #[serde(rename = "RecAreaName")]
    pub rec_area_name: String,
}

/// Facility record (`/facilities/{id}?full=true`)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RidbFacility {
    #[serde(rename = "FacilityID", deserialize_with = "id_as_string")]
    pub facility_id: String,
    #[serde(rename = "FacilityName")]
    pub facility_name: String,
    #[serde(rename = "FacilityDescription", default)]
    pub facility_description: Option<String>,
    #[serde(rename = "FacilityLatitude", default)]
    pub facility_latitude: Option<f64>,
    #[serde(rename = "FacilityLongitude", default)]
    pub facility_longitude: Option<f64>,
    #[serde(rename = "FacilityTypeDescription", default)]
    pub facility_type_description: Option<String>,
    #[serde(rename = "RECAREA", default)]
    pub rec_areas: Option<Vec<RidbRecArea>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn campsite_json() -> serde_json::Value {
        json!({
            "FacilityID": 232490,
            "CampsiteID": "1045",
            "CampsiteName": "007",
            "CampsiteReservable": true,
            "CampsiteType": "STANDARD NONELECTRIC",
            "Loop": "A",
            "CampsiteLatitude": 44.1,
            "ATTRIBUTES": [
                {"AttributeName": "Pets Allowed", "AttributeValue": "Yes"}
            ],
            "PERMITTEDEQUIPMENT": [
                {"EquipmentName": "Trailer", "MaxLength": "32"},
                {"EquipmentName": "Tent", "MaxLength": 0}
            ],
            "ENTITYMEDIA": []
        })
    }

    #[test]
    fn test_validate_page_reads_total_count() {
        let page: Page<RidbAttribute> = validate_page(json!({
            "RECDATA": [
                {"AttributeName": "Shade", "AttributeValue": "Yes"},
                {"AttributeName": "Max Num of People", "AttributeValue": "6"}
            ],
            "METADATA": {"RESULTS": {"CURRENT_COUNT": 2, "TOTAL_COUNT": 14}}
        }))
        .unwrap();

        assert_eq!(page.returned_count(), 2);
        assert_eq!(page.total_count, Some(14));
        assert_eq!(page.records[0].attribute_name, "Shade");
    }

    #[test]
    fn test_validate_page_tolerates_missing_metadata_and_recdata() {
        let page: Page<RidbActivity> = validate_page(json!({})).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_count, None);

        let page: Page<RidbActivity> =
            validate_page(json!({"RECDATA": [{"ActivityID": 4}], "METADATA": {}})).unwrap();
        assert_eq!(page.returned_count(), 1);
        assert_eq!(page.total_count, None);
    }

    #[test]
    fn test_validate_page_rejects_wrong_record_shape() {
        let result: Result<Page<RidbActivity>, _> =
            validate_page(json!({"RECDATA": [{"ActivityID": "four"}]}));
        assert!(matches!(result, Err(ValidationError::Shape(_))));
    }

    #[test]
    fn test_validate_page_rejects_non_object() {
        let result: Result<Page<RidbActivity>, _> = validate_page(json!([1, 2, 3]));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_campsite_coerces_ids_and_lengths() {
        let campsite: RidbCampsite = validate_record(campsite_json()).unwrap();

        assert_eq!(campsite.facility_id, "232490");
        assert_eq!(campsite.campsite_name, "007");
        assert!(campsite.campsite_reservable);
        assert!(!campsite.campsite_accessible);
        assert_eq!(campsite.permitted_equipment.len(), 2);
        assert_eq!(campsite.permitted_equipment[0].max_length, 32.0);
        assert_eq!(campsite.attributes[0].as_raw().name, "Pets Allowed");
    }

    #[test]
    fn test_campsite_invalid_equipment_degrades_to_empty() {
        let mut value = campsite_json();
        value["PERMITTEDEQUIPMENT"] = json!([{"EquipmentName": "", "MaxLength": "long"}]);
        value["ENTITYMEDIA"] = json!("not a list");

        let campsite: RidbCampsite = validate_record(value).unwrap();

        assert!(campsite.permitted_equipment.is_empty());
        assert!(campsite.entity_media.is_empty());
    }

    #[test]
    fn test_campsite_rejects_blank_id() {
        let mut value = campsite_json();
        value["CampsiteID"] = json!("   ");

        let result: Result<RidbCampsite, _> = validate_record(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_facility_requires_facility_id() {
        let result = validate_facility(json!({"FacilityName": "FISH CREEK"}));
        assert_eq!(result, Err(ValidationError::MissingField("FacilityID")));

        let facility = validate_facility(json!({
            "FacilityID": "232490",
            "FacilityName": "FISH CREEK CAMPGROUND",
            "FacilityLatitude": null,
            "FacilityLongitude": -113.9,
            "RECAREA": [{"RecAreaName": "Glacier National Park"}]
        }))
        .unwrap();
        assert_eq!(facility.facility_id, "232490");
        assert_eq!(facility.facility_latitude, None);
        assert_eq!(facility.rec_areas.unwrap()[0].rec_area_name, "Glacier National Park");
    }

    #[test]
    fn test_raw_records_serialize_with_upstream_names() {
        let activity = RidbActivity {
            activity_id: 9,
            activity_name: Some("CAMPING".to_string()),
            activity_level: None,
            activity_parent_id: None,
        };

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json, json!({"ActivityID": 9, "ActivityName": "CAMPING"}));
    }
}
