//! Request parameter validation
//!
//! Every limit, offset and page budget is checked here before a request is built,
//! so an out-of-range value never reaches the network layer. The `parse_*`
//! helpers accept raw query-string values (as received by the HTTP surface);
//! [`PageRequest::new`] accepts already-typed values (as received from the CLI).

use serde::Serialize;

/// Largest page RIDB will return for a single request
pub const MAX_PAGE_SIZE: usize = 50;

/// Page budgets used when paging through a whole resource
pub const ACTIVITIES_MAX_PAGES: usize = 10;
pub const FACILITY_ACTIVITIES_MAX_PAGES: usize = 10;
pub const CAMPSITE_ATTRIBUTES_MAX_PAGES: usize = 100;
pub const FACILITY_CAMPSITES_MAX_PAGES: usize = 600;
pub const VEHICLE_LENGTHS_MAX_PAGES: usize = 1000;

/// Caller-supplied parameter out of range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    #[error("Invalid 'limit' query parameter. Must be an integer between 1 and {}.", MAX_PAGE_SIZE)]
    Limit,

    #[error("Invalid 'offset' query parameter. Must be a non-negative integer.")]
    Offset,

    #[error("Invalid 'take' query parameter. Must be a non-negative integer.")]
    Take,

    #[error("Invalid 'maxPages' parameter. Must be a positive integer.")]
    MaxPages,

    #[error("Missing required query parameter: '{0}'")]
    Missing(&'static str),
}

/// One page worth of records starting at `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    /// Validate a limit/offset pair
    pub fn new(limit: usize, offset: usize) -> Result<Self, ParameterError> {
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(ParameterError::Limit);
        }
        Ok(Self { limit, offset })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: MAX_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Parse a raw numeric query value the way a browser would: surrounding
/// whitespace is ignored, a blank value counts as 0 and `"5.0"` counts as the
/// integer 5.
fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }

    let number: f64 = raw.parse().ok()?;
    if !number.is_finite() || number.fract() != 0.0 {
        return None;
    }
    Some(number as i64)
}

/// Parse an optional `limit` value, defaulting to [`MAX_PAGE_SIZE`]
pub fn parse_limit(raw: Option<&str>) -> Result<usize, ParameterError> {
    match raw {
        None => Ok(MAX_PAGE_SIZE),
        Some(raw) => match parse_integer(raw) {
            Some(limit) if (1..=MAX_PAGE_SIZE as i64).contains(&limit) => Ok(limit as usize),
            _ => Err(ParameterError::Limit),
        },
    }
}

/// Parse an optional `offset` value, defaulting to 0
pub fn parse_offset(raw: Option<&str>) -> Result<usize, ParameterError> {
    match raw {
        None => Ok(0),
        Some(raw) => match parse_integer(raw) {
            Some(offset) if offset >= 0 => Ok(offset as usize),
            _ => Err(ParameterError::Offset),
        },
    }
}

/// Parse `limit` and `offset` together
pub fn parse_page_request(
    limit: Option<&str>,
    offset: Option<&str>,
) -> Result<PageRequest, ParameterError> {
    PageRequest::new(parse_limit(limit)?, parse_offset(offset)?)
}

/// Parse an optional `take` value. Zero means "no cap".
pub fn parse_take(raw: Option<&str>) -> Result<Option<usize>, ParameterError> {
    match raw {
        None => Ok(None),
        Some(raw) => match parse_integer(raw) {
            Some(0) => Ok(None),
            Some(take) if take > 0 => Ok(Some(take as usize)),
            _ => Err(ParameterError::Take),
        },
    }
}

/// Resolve a page budget.
///
/// Missing, zero and unparseable values fall back to `default`; anything else is
/// clamped to at least one page. Fractional budgets round up.
pub fn resolve_max_pages(raw: Option<&str>, default: usize) -> usize {
    let Some(raw) = raw else {
        return default.max(1);
    };
    match raw.trim().parse::<f64>() {
        Ok(pages) if pages.is_nan() || pages == 0.0 => default.max(1),
        Ok(pages) if pages < 1.0 => 1,
        Ok(pages) if pages.is_infinite() => usize::MAX,
        Ok(pages) => pages.ceil() as usize,
        Err(_) => default.max(1),
    }
}

/// Validate an already-typed page budget
pub fn check_max_pages(max_pages: usize) -> Result<usize, ParameterError> {
    if max_pages == 0 {
        return Err(ParameterError::MaxPages);
    }
    Ok(max_pages)
}

/// Only the literal `"true"` enables a flag
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

/// Tri-state flag: `"true"`, `"false"`, or unset
pub fn parse_optional_flag(raw: Option<&str>) -> Option<bool> {
    match raw {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Trim a substring filter; blank filters are dropped
pub fn normalize_query(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|query| !query.is_empty())
        .map(str::to_string)
}

/// Require a non-empty identifier
pub fn require_id<'a>(raw: Option<&'a str>, name: &'static str) -> Result<&'a str, ParameterError> {
    match raw {
        Some(id) if !id.trim().is_empty() => Ok(id.trim()),
        _ => Err(ParameterError::Missing(name)),
    }
}
