//! Campsite attribute classification
//!
//! RIDB describes campsites with free-form `AttributeName`/`AttributeValue` string
//! pairs. Nothing upstream says which attributes are flags, which are counts, or
//! whether an attribute describes the whole campground or a single site. This
//! module answers those questions from a handful of static, hand-curated name
//! tables.
//!
//! Classification is a total function: an attribute nobody has seen before comes
//! out as `{ scope: unknown, valueType: string }` with its raw value untouched.
//!
//! All table lookups use the *normalized* attribute name (see [`normalize_name`]):
//! `" Pets_Allowed "` and `"pets allowed"` are the same attribute.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::text::title_case;

const CAMPGROUND_SCOPE: &[&str] = &[
    "grills",
    "drinking water",
    "water spigots",
    "water spigot",
    "campfire rings",
    "fire rings",
    "campfires",
    "picnic tables",
    "tables",
    "toilets",
    "flush toilets",
    "vault toilets",
    "showers",
    "pets",
    "pets allowed",
    "campfire allowed",
    "checkin time",
    "checkout time",
];

const CAMPSITE_SCOPE: &[&str] = &[
    "equipment",
    "is equipment mandatory",
    "picnic table",
    "fire ring",
    "shade",
    "site access",
    "bbq",
    "grill",
    "capacity/size rating",
    "driveway entry",
    "driveway grade",
    "driveway surface",
    "fire pit",
    "max num of people",
    "max num of vehicles",
    "max vehicle length",
    "min num of people",
    "min num of vehicles",
    "map x coordinate",
    "map y coordinate",
    "placed on map",
];

const AMENITIES: &[&str] = &[
    "picnic table",
    "picnic tables",
    "grill",
    "grills",
    "fire ring",
    "fire rings",
    "fire pit",
    "fire pits",
    "campfire ring",
    "campfire rings",
    "flush toilets",
    "vault toilets",
    "showers",
    "drinking water",
    "shade",
    "bbq",
];

const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "is equipment mandatory",
    "grills",
    "drinking water",
    "campfire rings",
    "picnic tables",
    "flush toilets",
    "pets allowed",
    "picnic table",
    "shade",
    "bbq",
    "campfire allowed",
    "fire pit",
    "placed on map",
];

const NUMERIC_ATTRIBUTES: &[&str] = &[
    "max num of people",
    "max num of vehicles",
    "max vehicle length",
    "min num of people",
    "min num of vehicles",
    "map x coordinate",
    "map y coordinate",
];

const TRUE_VALUES: &[&str] = &["y", "yes", "true", "1"];
const FALSE_VALUES: &[&str] = &["n", "no", "false", "none", "0"];

/// The tables used for RIDB campsite attributes
pub const RIDB_TABLES: AttributeTables = AttributeTables {
    campground_scope: CAMPGROUND_SCOPE,
    campsite_scope: CAMPSITE_SCOPE,
    amenities: AMENITIES,
    boolean: BOOLEAN_ATTRIBUTES,
    numeric: NUMERIC_ATTRIBUTES,
};

/// Attribute as received: two strings, no type information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAttribute<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// What an attribute describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeScope {
    Campground,
    Campsite,
    Unknown,
}

/// Type tag of an [`AttributeValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Boolean,
    Number,
    String,
}

/// Typed attribute value. Serializes as `{"valueType": ..., "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "valueType", content = "value", rename_all = "lowercase")]
pub enum AttributeValue {
    Boolean(bool),
    #[serde(serialize_with = "serialize_number")]
    Number(f64),
    #[serde(rename = "string")]
    Text(String),
}

impl AttributeValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            AttributeValue::Boolean(_) => ValueType::Boolean,
            AttributeValue::Number(_) => ValueType::Number,
            AttributeValue::Text(_) => ValueType::String,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Boolean(flag) => write!(f, "{}", if *flag { "yes" } else { "no" }),
            AttributeValue::Number(number) => write!(f, "{number}"),
            AttributeValue::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Whole numbers serialize without a fractional part (`6`, not `6.0`)
pub(crate) fn serialize_number<S: Serializer>(number: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*number as i64)
    } else {
        serializer.serialize_f64(*number)
    }
}

/// Attribute after classification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedAttribute {
    pub key: String,
    pub label: String,
    pub scope: AttributeScope,
    pub is_amenity: bool,
    #[serde(flatten)]
    pub value: AttributeValue,
}

impl ClassifiedAttribute {
    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }
}

/// Name tables driving classification. Immutable; share freely.
#[derive(Debug, Clone, Copy)]
pub struct AttributeTables {
    pub campground_scope: &'static [&'static str],
    pub campsite_scope: &'static [&'static str],
    pub amenities: &'static [&'static str],
    pub boolean: &'static [&'static str],
    pub numeric: &'static [&'static str],
}

impl AttributeTables {
    pub fn classify(&self, raw: RawAttribute<'_>) -> ClassifiedAttribute {
        let normalized = normalize_name(raw.name);

        ClassifiedAttribute {
            key: canonical_key(&normalized),
            label: title_case(raw.name),
            scope: self.scope_of(&normalized),
            is_amenity: self.amenities.contains(&normalized.as_str()),
            value: self.typed_value(&normalized, raw.value),
        }
    }

    /// Campground scope is checked first, so it wins if both tables list a name
    pub fn scope_of(&self, normalized: &str) -> AttributeScope {
        if self.campground_scope.contains(&normalized) {
            AttributeScope::Campground
        } else if self.campsite_scope.contains(&normalized) {
            AttributeScope::Campsite
        } else {
            AttributeScope::Unknown
        }
    }

    /// Boolean, then numeric, then the raw string
    fn typed_value(&self, normalized: &str, raw_value: &str) -> AttributeValue {
        if self.boolean.contains(&normalized) {
            if let Some(flag) = parse_boolean(raw_value, normalized) {
                return AttributeValue::Boolean(flag);
            }
        }

        if self.numeric.contains(&normalized) {
            if let Some(number) = parse_number(raw_value) {
                return AttributeValue::Number(number);
            }
        }

        AttributeValue::Text(raw_value.to_string())
    }
}

/// Classify with the RIDB tables
pub fn classify(raw: RawAttribute<'_>) -> ClassifiedAttribute {
    RIDB_TABLES.classify(raw)
}

/// Lookup form of an attribute name: trimmed, lowercase, underscores as spaces,
/// whitespace runs collapsed to one space.
///
/// Trimming happens before underscores become spaces, so `"Shade_"` keeps a
/// trailing space and matches no table entry.
pub fn normalize_name(name: &str) -> String {
    static RE_WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re_whitespace =
        RE_WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

    let lowered = name.trim().to_lowercase().replace('_', " ");
    re_whitespace.replace_all(&lowered, " ").into_owned()
}

/// Machine identifier: every run of non-alphanumeric characters becomes a single
/// underscore, with none at either end.
pub fn canonical_key(normalized: &str) -> String {
    let mut key = String::with_capacity(normalized.len());
    let mut pending_separator = false;

    for c in normalized.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !key.is_empty() {
                key.push('_');
            }
            pending_separator = false;
            key.push(c);
        } else {
            pending_separator = true;
        }
    }

    key
}

/// Only called for names in the boolean table. A value that repeats the
/// attribute's own name (`Showers: "Showers"`) marks the flag as present.
fn parse_boolean(raw_value: &str, normalized_name: &str) -> Option<bool> {
    let value = raw_value.trim().to_lowercase();

    if TRUE_VALUES.contains(&value.as_str()) {
        return Some(true);
    }
    if FALSE_VALUES.contains(&value.as_str()) {
        return Some(false);
    }
    if value == normalized_name {
        return Some(true);
    }
    None
}

fn parse_number(raw_value: &str) -> Option<f64> {
    let trimmed = raw_value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw<'a>(name: &'a str, value: &'a str) -> RawAttribute<'a> {
        RawAttribute { name, value }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Pets_Allowed "), "pets allowed");
        assert_eq!(normalize_name("Max   Num\tof People"), "max num of people");
        assert_eq!(normalize_name("Capacity/Size Rating"), "capacity/size rating");
        assert_eq!(normalize_name("Shade_"), "shade ");
        assert_eq!(normalize_name("_Pets__Allowed"), " pets allowed");
    }

    #[test]
    fn test_trailing_underscore_matches_no_table() {
        let classified = classify(RawAttribute {
            name: "Shade_",
            value: "Yes",
        });

        assert_eq!(classified.key, "shade");
        assert_eq!(classified.scope, AttributeScope::Unknown);
        assert!(!classified.is_amenity);
        assert_eq!(classified.value, AttributeValue::Text("Yes".to_string()));
    }

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("max num of people"), "max_num_of_people");
        assert_eq!(canonical_key("capacity/size rating"), "capacity_size_rating");
        assert_eq!(canonical_key("--checkin time!"), "checkin_time");
        assert_eq!(canonical_key("***"), "");
    }

    #[test]
    fn test_boolean_self_reference() {
        let attribute = classify(raw("Pets Allowed", "Pets Allowed"));

        assert_eq!(attribute.value, AttributeValue::Boolean(true));
        assert_eq!(attribute.value_type(), ValueType::Boolean);
        assert_eq!(attribute.scope, AttributeScope::Campground);
        assert_eq!(attribute.key, "pets_allowed");
        assert_eq!(attribute.label, "Pets Allowed");
    }

    #[test]
    fn test_boolean_truthy_and_falsy_values() {
        for value in ["Y", "yes", " TRUE ", "1"] {
            assert_eq!(
                classify(raw("Shade", value)).value,
                AttributeValue::Boolean(true),
                "{value}"
            );
        }
        for value in ["N", "No", "false", "None", "0"] {
            assert_eq!(
                classify(raw("Shade", value)).value,
                AttributeValue::Boolean(false),
                "{value}"
            );
        }
    }

    #[test]
    fn test_unparseable_boolean_falls_back_to_string() {
        let attribute = classify(raw("Drinking Water", "Seasonal"));

        assert_eq!(attribute.value, AttributeValue::Text("Seasonal".to_string()));
        assert_eq!(attribute.value_type(), ValueType::String);
        assert!(attribute.is_amenity);
    }

    #[test]
    fn test_boolean_parsing_only_applies_to_boolean_names() {
        let attribute = classify(raw("Site Access", "Yes"));
        assert_eq!(attribute.value, AttributeValue::Text("Yes".to_string()));
        assert_eq!(attribute.scope, AttributeScope::Campsite);
    }

    #[test]
    fn test_numeric_attribute() {
        let attribute = classify(raw("Max Num of People", " 8 "));

        assert_eq!(attribute.value, AttributeValue::Number(8.0));
        assert_eq!(attribute.value_type(), ValueType::Number);
        assert_eq!(attribute.scope, AttributeScope::Campsite);
        assert_eq!(attribute.label, "Max Num Of People");
    }

    #[test]
    fn test_numeric_fallback() {
        let attribute = classify(raw("Max Num Of People", "abc"));
        assert_eq!(attribute.value, AttributeValue::Text("abc".to_string()));
        assert_eq!(attribute.value_type(), ValueType::String);
    }

    #[test]
    fn test_numeric_rejects_blank_and_non_finite() {
        for value in ["", "   ", "inf", "NaN"] {
            assert_eq!(
                classify(raw("Map X Coordinate", value)).value_type(),
                ValueType::String,
                "{value:?}"
            );
        }
    }

    #[test]
    fn test_string_fallback_keeps_raw_value_untouched() {
        let attribute = classify(raw("Driveway Surface", "  Gravel "));
        assert_eq!(attribute.value, AttributeValue::Text("  Gravel ".to_string()));
    }

    #[test]
    fn test_unknown_attribute() {
        let attribute = classify(raw("Hammock Hooks", "2"));

        assert_eq!(attribute.scope, AttributeScope::Unknown);
        assert!(!attribute.is_amenity);
        assert_eq!(attribute.value, AttributeValue::Text("2".to_string()));
        assert_eq!(attribute.key, "hammock_hooks");
    }

    #[test]
    fn test_underscored_names_resolve_like_spaced_names() {
        let attribute = classify(raw("FLUSH_TOILETS", "y"));

        assert_eq!(attribute.scope, AttributeScope::Campground);
        assert!(attribute.is_amenity);
        assert_eq!(attribute.value, AttributeValue::Boolean(true));
        assert_eq!(attribute.label, "Flush_toilets");
    }

    #[test]
    fn test_scope_precedence_prefers_campground() {
        const BOTH: &[&str] = &["showers"];
        let tables = AttributeTables {
            campground_scope: BOTH,
            campsite_scope: BOTH,
            ..RIDB_TABLES
        };

        assert_eq!(tables.scope_of("showers"), AttributeScope::Campground);
        assert_eq!(
            tables.classify(raw("Showers", "Showers")).scope,
            AttributeScope::Campground
        );
    }

    #[test]
    fn test_boolean_takes_precedence_over_numeric() {
        const LENGTH: &[&str] = &["max vehicle length"];
        let tables = AttributeTables {
            boolean: LENGTH,
            ..RIDB_TABLES
        };

        assert_eq!(
            tables.classify(raw("Max Vehicle Length", "1")).value,
            AttributeValue::Boolean(true)
        );
        assert_eq!(
            tables.classify(raw("Max Vehicle Length", "35")).value,
            AttributeValue::Number(35.0)
        );
    }

    #[test]
    fn test_ridb_scope_tables_are_disjoint() {
        for name in CAMPGROUND_SCOPE {
            assert!(!CAMPSITE_SCOPE.contains(name), "{name} is in both scopes");
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let input = raw("Max Vehicle Length", "35");
        assert_eq!(classify(input), classify(input));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(classify(raw("Max Num of People", "6"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "key": "max_num_of_people",
                "label": "Max Num Of People",
                "scope": "campsite",
                "isAmenity": false,
                "valueType": "number",
                "value": 6
            })
        );

        let json = serde_json::to_value(classify(raw("Checkin Time", "2:00 PM"))).unwrap();
        assert_eq!(json["valueType"], "string");
        assert_eq!(json["value"], "2:00 PM");

        let json = serde_json::to_value(classify(raw("Map X Coordinate", "12.5"))).unwrap();
        assert_eq!(json["value"], 12.5);
    }
}
