//! The RIDB resources campvue reads.
//!
//! | resource            | path                          | paged |
//! |---------------------|-------------------------------|-------|
//! | activities          | `activities`                  | page or all |
//! | activity            | `activities/{id}`             | no |
//! | facility            | `facilities/{id}?full=true`   | no |
//! | facility activities | `facilities/{id}/activities`  | all, from a starting page |
//! | facility campsites  | `facilities/{id}/campsites`   | page or all |
//! | campsite            | `campsites/{id}`              | no |
//! | campsite attributes | `campsites/{id}/attributes`   | page or all |

use campvue_core::normalize::{is_missing_activity, vehicle_lengths, VehicleLengths};
use campvue_core::pagination::{Aggregated, AggregationPlan};
use campvue_core::query::{PageRequest, FACILITY_ACTIVITIES_MAX_PAGES, MAX_PAGE_SIZE};
use campvue_core::ridb::{
    validate_facility, Page, RidbActivity, RidbAttribute, RidbCampsite, RidbFacility,
};
use indicatif::ProgressBar;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{aggregate, Endpoint, RidbClient, RidbPages};
use crate::prelude::*;

/// How much of a list endpoint to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// One page at the given limit/offset
    Page(PageRequest),
    /// Every page from offset 0 at the largest page size, up to `max_pages` requests
    All { max_pages: usize },
}

/// Records read from a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    pub records: Vec<T>,
    pub total_count: Option<u64>,
    /// The page budget ran out before the records did
    pub truncated: bool,
}

impl<T> From<Page<T>> for Listing<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            records: page.records,
            total_count: page.total_count,
            truncated: false,
        }
    }
}

impl<T> From<Aggregated<T>> for Listing<T> {
    fn from(aggregated: Aggregated<T>) -> Self {
        Self {
            truncated: aggregated.is_truncated(),
            total_count: aggregated.known_total,
            records: aggregated.items,
        }
    }
}

async fn list<T>(
    client: &RidbClient,
    endpoint: Endpoint,
    paging: Paging,
    spinner: Option<&ProgressBar>,
) -> Result<Listing<T>, Error>
where
    T: DeserializeOwned + Send + 'static,
{
    match paging {
        Paging::Page(request) => Ok(client.fetch_page::<T>(&endpoint, request).await?.into()),
        Paging::All { max_pages } => {
            let plan = AggregationPlan::new(MAX_PAGE_SIZE, 0, max_pages)?;
            let source = RidbPages::new(client, endpoint);
            Ok(aggregate::<T, _>(&source, plan, spinner).await?.into())
        }
    }
}

pub async fn activities(
    client: &RidbClient,
    paging: Paging,
    spinner: Option<&ProgressBar>,
) -> Result<Listing<RidbActivity>, Error> {
    list(client, Endpoint::new("activities", &["activities"]), paging, spinner).await
}

/// RIDB answers unknown ids with a zeroed record, which becomes `NotFound`
pub async fn activity(client: &RidbClient, id: &str) -> Result<RidbActivity, Error> {
    let activity: RidbActivity = client
        .fetch_record(&Endpoint::new("activityById", &["activities", id]))
        .await?;

    if is_missing_activity(&activity) {
        return Err(Error::NotFound(format!(
            "Activity with id '{id}' not found in RIDB"
        )));
    }

    Ok(activity)
}

pub async fn facility(client: &RidbClient, id: &str) -> Result<RidbFacility, Error> {
    let endpoint = Endpoint::new("facility", &["facilities", id]).with_query("full", "true");
    log::debug!("GET {}", endpoint.path);

    Ok(validate_facility(client.get_json(&endpoint, &[]).await?)?)
}

/// Every activity offered at a facility, starting at `start` and stopping once
/// the reported total is reached. `take` caps the result.
pub async fn facility_activities(
    client: &RidbClient,
    id: &str,
    start: PageRequest,
    take: Option<usize>,
) -> Result<Vec<RidbActivity>, Error> {
    let plan = AggregationPlan::from_request(start, FACILITY_ACTIVITIES_MAX_PAGES)?;
    let source = RidbPages::new(
        client,
        Endpoint::new("activitiesById", &["facilities", id, "activities"]),
    );

    let mut records = aggregate::<RidbActivity, _>(&source, plan, None).await?.items;
    if let Some(take) = take {
        records.truncate(take);
    }

    Ok(records)
}

pub async fn facility_campsites(
    client: &RidbClient,
    id: &str,
    paging: Paging,
    query: Option<&str>,
    spinner: Option<&ProgressBar>,
) -> Result<Listing<RidbCampsite>, Error> {
    let endpoint = Endpoint::new("campsites", &["facilities", id, "campsites"])
        .with_optional_query("query", query);

    list(client, endpoint, paging, spinner).await
}

/// RIDB returns a single campsite wrapped in a list
pub async fn campsite(client: &RidbClient, id: &str) -> Result<RidbCampsite, Error> {
    let campsites: Vec<RidbCampsite> = client
        .fetch_record(&Endpoint::new("campsite", &["campsites", id]))
        .await?;

    campsites
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(format!("Campsite with id '{id}' not found in RIDB")))
}

pub async fn campsite_attributes(
    client: &RidbClient,
    id: &str,
    paging: Paging,
    query: Option<&str>,
    spinner: Option<&ProgressBar>,
) -> Result<Listing<RidbAttribute>, Error> {
    let endpoint = Endpoint::new("campsite attributes", &["campsites", id, "attributes"])
        .with_optional_query("query", query);

    list(client, endpoint, paging, spinner).await
}

/// Longest permitted vehicle per site across every campsite of a facility
pub async fn facility_vehicle_lengths(
    client: &RidbClient,
    id: &str,
    reservable: Option<bool>,
    max_pages: usize,
    spinner: Option<&ProgressBar>,
) -> Result<VehicleLengths, Error> {
    let campsites =
        facility_campsites(client, id, Paging::All { max_pages }, None, spinner).await?;

    Ok(vehicle_lengths(id, &campsites.records, reservable))
}
