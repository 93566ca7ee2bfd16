use serde::Serialize;

use crate::attributes::{serialize_number, ClassifiedAttribute};
use crate::ridb::{RidbCampsite, RidbEquipment, RidbMedia};
use crate::text::normalize_site_number;

use super::classify_attributes;

/// Campsite output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampsiteOutput {
    pub features: Vec<ClassifiedAttribute>,
    pub equipment: Vec<EquipmentOutput>,
    pub media: Vec<MediaOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentOutput {
    pub name: String,
    #[serde(serialize_with = "serialize_number")]
    pub max_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaOutput {
    pub attribution: Option<String>,
    pub description: Option<String>,
    #[serde(serialize_with = "serialize_number")]
    pub height: f64,
    #[serde(serialize_with = "serialize_number")]
    pub width: f64,
    pub is_gallery: bool,
    pub is_preview: bool,
    pub is_primary: bool,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub subtitle: Option<String>,
    pub title: Option<String>,
    pub url: String,
}

pub fn normalize_campsite(campsite: &RidbCampsite) -> CampsiteOutput {
    CampsiteOutput {
        features: classify_attributes(&campsite.attributes),
        equipment: normalize_equipment(&campsite.permitted_equipment),
        media: normalize_media(&campsite.entity_media),
    }
}

pub fn normalize_equipment(equipment: &[RidbEquipment]) -> Vec<EquipmentOutput> {
    equipment
        .iter()
        .map(|item| EquipmentOutput {
            name: item.equipment_name.clone(),
            max_length: item.max_length,
        })
        .collect()
}

pub fn normalize_media(media: &[RidbMedia]) -> Vec<MediaOutput> {
    media
        .iter()
        .map(|item| MediaOutput {
            attribution: item.credits.clone(),
            description: item.description.clone(),
            height: item.height,
            width: item.width,
            is_gallery: item.is_gallery,
            is_preview: item.is_preview,
            is_primary: item.is_primary,
            media_type: item.media_type.as_deref().map(str::to_lowercase),
            subtitle: item.subtitle.clone(),
            title: item.title.clone(),
            url: item.url.clone(),
        })
        .collect()
}

/// Longest vehicle a single site accepts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteLength {
    pub ridb_site_id: String,
    pub site_number: String,
    #[serde(serialize_with = "serialize_number")]
    pub max_length: f64,
}

/// Longest vehicle a facility accepts, with the per-site breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLengths {
    pub facility_id: String,
    #[serde(serialize_with = "serialize_number")]
    pub max_length: f64,
    pub sites: Vec<SiteLength>,
}

/// Largest permitted length across a site's equipment, ignoring tents.
/// Zero when nothing qualifies.
pub fn max_vehicle_length(equipment: &[RidbEquipment]) -> f64 {
    equipment
        .iter()
        .filter(|item| !item.equipment_name.trim().to_lowercase().contains("tent"))
        .map(|item| item.max_length)
        .filter(|length| length.is_finite())
        .fold(0.0, f64::max)
}

/// Per-site and facility-wide vehicle lengths. `reservable` keeps only sites
/// whose reservable flag matches.
pub fn vehicle_lengths(
    facility_id: &str,
    campsites: &[RidbCampsite],
    reservable: Option<bool>,
) -> VehicleLengths {
    let sites: Vec<SiteLength> = campsites
        .iter()
        .filter(|campsite| reservable.map_or(true, |flag| campsite.campsite_reservable == flag))
        .map(|campsite| SiteLength {
            ridb_site_id: campsite.campsite_id.clone(),
            site_number: normalize_site_number(&campsite.campsite_name),
            max_length: max_vehicle_length(&campsite.permitted_equipment),
        })
        .collect();

    let max_length = sites.iter().map(|site| site.max_length).fold(0.0, f64::max);

    VehicleLengths {
        facility_id: facility_id.to_string(),
        max_length,
        sites,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ridb::validate_record;
    use serde_json::json;

    fn equipment(name: &str, max_length: f64) -> RidbEquipment {
        RidbEquipment {
            equipment_name: name.to_string(),
            max_length,
        }
    }

    fn campsite(id: &str, name: &str, reservable: bool, lengths: &[(&str, f64)]) -> RidbCampsite {
        let equipment: Vec<_> = lengths
            .iter()
            .map(|(name, length)| json!({"EquipmentName": name, "MaxLength": length}))
            .collect();

        validate_record(json!({
            "FacilityID": "232490",
            "CampsiteID": id,
            "CampsiteName": name,
            "CampsiteReservable": reservable,
            "CampsiteType": "STANDARD NONELECTRIC",
            "Loop": "A",
            "PERMITTEDEQUIPMENT": equipment,
        }))
        .unwrap()
    }

    #[test]
    fn test_max_vehicle_length_ignores_tents() {
        let items = vec![
            equipment("Tent", 60.0),
            equipment("Large Tent Over 9X12`", 80.0),
            equipment("Trailer", 32.0),
            equipment("RV", 28.0),
        ];
        assert_eq!(max_vehicle_length(&items), 32.0);
    }

    #[test]
    fn test_max_vehicle_length_defaults_to_zero() {
        assert_eq!(max_vehicle_length(&[]), 0.0);
        assert_eq!(max_vehicle_length(&[equipment("Tent", 40.0)]), 0.0);
    }

    #[test]
    fn test_vehicle_lengths() {
        let campsites = vec![
            campsite("1", "001", true, &[("Trailer", 24.0)]),
            campsite("2", "B02", false, &[("RV", 40.0), ("Tent", 90.0)]),
            campsite("3", "003", true, &[("Tent", 0.0)]),
        ];

        let lengths = vehicle_lengths("232490", &campsites, None);

        assert_eq!(lengths.max_length, 40.0);
        assert_eq!(lengths.sites.len(), 3);
        assert_eq!(lengths.sites[0].site_number, "1");
        assert_eq!(lengths.sites[1].site_number, "B2");
        assert_eq!(lengths.sites[2].max_length, 0.0);
    }

    #[test]
    fn test_vehicle_lengths_reservable_filter() {
        let campsites = vec![
            campsite("1", "001", true, &[("Trailer", 24.0)]),
            campsite("2", "002", false, &[("RV", 40.0)]),
        ];

        let reservable = vehicle_lengths("232490", &campsites, Some(true));
        assert_eq!(reservable.sites.len(), 1);
        assert_eq!(reservable.max_length, 24.0);

        let walk_up = vehicle_lengths("232490", &campsites, Some(false));
        assert_eq!(walk_up.sites[0].ridb_site_id, "2");
    }

    #[test]
    fn test_vehicle_lengths_serialization() {
        let campsites = vec![campsite("1045", "007", true, &[("Trailer", 32.0)])];

        assert_eq!(
            serde_json::to_value(vehicle_lengths("232490", &campsites, None)).unwrap(),
            json!({
                "facilityId": "232490",
                "maxLength": 32,
                "sites": [{"ridbSiteId": "1045", "siteNumber": "7", "maxLength": 32}]
            })
        );
    }

    #[test]
    fn test_normalize_campsite() {
        let record: RidbCampsite = validate_record(json!({
            "FacilityID": 232490,
            "CampsiteID": 1045,
            "CampsiteName": "7",
            "CampsiteType": "STANDARD NONELECTRIC",
            "Loop": "A",
            "ATTRIBUTES": [{"AttributeName": "Shade", "AttributeValue": "Full"}],
            "PERMITTEDEQUIPMENT": [{"EquipmentName": "Trailer", "MaxLength": "32.5"}],
            "ENTITYMEDIA": [{
                "Height": 480,
                "Width": 640,
                "IsPrimary": true,
                "MediaType": "Image",
                "URL": "https://cdn.recreation.gov/site.jpg",
                "Credits": "USFS"
            }]
        }))
        .unwrap();

        let output = normalize_campsite(&record);

        assert_eq!(output.features.len(), 1);
        assert_eq!(output.equipment[0].max_length, 32.5);
        assert_eq!(output.media[0].media_type.as_deref(), Some("image"));
        assert_eq!(output.media[0].attribution.as_deref(), Some("USFS"));

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["equipment"][0], json!({"name": "Trailer", "maxLength": 32.5}));
        assert_eq!(json["media"][0]["type"], "image");
        assert_eq!(json["media"][0]["height"], 480);
        assert_eq!(json["media"][0]["isPrimary"], true);
    }
}
