use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::ridb::RidbFacility;
use crate::text::{embedding_text, html_to_text, smart_title_case, EMBEDDING_MAX_CHARS};

const UNKNOWN_PARK: &str = "Unknown";

const ACRONYMS: &[&str] = &["RV", "BLM", "NPS", "USFS", "BIA"];

/// Facility output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityOutput {
    pub ridb_id: String,
    pub name: String,
    pub park: String,
    pub park_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "type")]
    pub facility_type: Option<String>,
    pub reservations: String,
    pub description_raw_html: Option<String>,
    pub description: Option<String>,
    pub description_for_embedding: Option<String>,
}

pub fn normalize_facility(facility: &RidbFacility) -> FacilityOutput {
    let park = facility
        .rec_areas
        .as_ref()
        .and_then(|areas| areas.first())
        .map(|area| area.rec_area_name.trim().to_string())
        .unwrap_or_else(|| UNKNOWN_PARK.to_string());

    let description_raw_html = facility
        .facility_description
        .clone()
        .filter(|html| !html.is_empty());

    FacilityOutput {
        ridb_id: facility.facility_id.clone(),
        name: normalize_campground_name(&facility.facility_name),
        park_type: park_type(&park).map(str::to_string),
        park,
        latitude: facility.facility_latitude,
        longitude: facility.facility_longitude,
        facility_type: facility
            .facility_type_description
            .as_deref()
            .map(str::to_lowercase),
        reservations: reservations_url(&facility.facility_id),
        description: description_raw_html.as_deref().map(html_to_text),
        description_for_embedding: description_raw_html
            .as_deref()
            .map(|html| embedding_text(html, EMBEDDING_MAX_CHARS)),
        description_raw_html,
    }
}

pub fn reservations_url(facility_id: &str) -> String {
    format!("https://www.recreation.gov/camping/campgrounds/{facility_id}")
}

/// Classify a recreation area name
pub fn park_type(park: &str) -> Option<&'static str> {
    let name = park.to_lowercase();

    if name.contains("national forest") {
        Some("national forest")
    } else if name.contains("national monument") {
        Some("national monument")
    } else if name.contains("national park") {
        Some("national")
    } else {
        None
    }
}

/// Turn an upstream facility name into a display label.
///
/// `"FISH CREEK CAMPGROUND"` becomes `"Fish Creek"`, `"MATHER CAMPGROUND LOOP B"`
/// becomes `"Mather Loop B"`. Acronyms such as RV and BLM stay uppercase.
pub fn normalize_campground_name(raw: &str) -> String {
    static RE_SEPARATOR: OnceLock<Regex> = OnceLock::new();
    static RE_CAMPGROUND: OnceLock<Regex> = OnceLock::new();
    static RE_TRAILING_QUALIFIER: OnceLock<Regex> = OnceLock::new();

    if raw.is_empty() {
        return String::new();
    }

    let re_separator =
        RE_SEPARATOR.get_or_init(|| Regex::new(r"\s*[-/|]\s*").expect("valid regex"));
    let re_campground = RE_CAMPGROUND.get_or_init(|| {
        Regex::new(r"(?i)\b(?:camp\s*ground|campground|campgrounds|cg|cmpg|cmpgd|campgrnd|campg?d)\b")
            .expect("valid regex")
    });
    let re_trailing_qualifier = RE_TRAILING_QUALIFIER
        .get_or_init(|| Regex::new(r"(?i)\b(?:area|park)\b\s*$").expect("valid regex"));

    let name = squish(&raw.nfc().collect::<String>());
    let name = name.replace(['–', '—'], "-");
    let name = re_separator.replace_all(&name, " ");
    let name = squish(&name.replace(['(', ')'], "").replace(',', " "));
    let name = squish(&re_campground.replace_all(&name, " "));
    let name = re_trailing_qualifier.replace(&name, "");

    smart_title_case(name.trim())
        .split(' ')
        .map(|word| {
            let upper = word.to_uppercase();
            if ACRONYMS.contains(&upper.as_str()) {
                upper
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn squish(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
