//! HTTP surface over the RIDB resources.
//!
//! Every route answers `GET` with query-string parameters and replies with JSON.
//! Failures come back as `{"error": ...}` with status 400, 404 or 500; upstream
//! failures carry a `details` field as well.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use campvue_core::normalize::{
    classify_attributes, normalize_activities, normalize_activity, normalize_campsite,
    normalize_facility, CampsiteOutput, Shaped,
};
use campvue_core::query::{
    normalize_query, parse_flag, parse_optional_flag, parse_page_request, parse_take,
    require_id, resolve_max_pages, ACTIVITIES_MAX_PAGES, CAMPSITE_ATTRIBUTES_MAX_PAGES,
    FACILITY_CAMPSITES_MAX_PAGES, VEHICLE_LENGTHS_MAX_PAGES,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::prelude::{eprintln, *};
use crate::ridb::resources::{self, Paging};
use crate::ridb::RidbClient;

#[derive(Debug, clap::Args, Clone)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "CAMPVUE_PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "CAMPVUE_HOST", default_value = "127.0.0.1")]
    host: String,
}

/// State shared by every route.
///
/// A configuration problem does not stop the server; each request that needs
/// RIDB answers with a 500 instead.
#[derive(Debug)]
pub struct ServeState {
    client: Result<RidbClient, String>,
}

impl ServeState {
    pub fn new(client: Result<RidbClient, Error>) -> Self {
        Self {
            client: client.map_err(|err| match err {
                Error::Config(message) => message,
                other => other.to_string(),
            }),
        }
    }

    fn client(&self) -> Result<&RidbClient, Error> {
        self.client
            .as_ref()
            .map_err(|message| Error::Config(message.clone()))
    }
}

type Params = Query<HashMap<String, String>>;
type ApiResult = Result<Json<Value>, ApiError>;

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let client = global.ridb_client();
    if let Err(err) = &client {
        log::error!("RIDB client unavailable: {err}");
    }

    let addr = format!("{}:{}", options.host, options.port);
    let router = router(Arc::new(ServeState::new(client)));

    if global.verbose {
        eprintln!("campvue listening on http://{}", addr);
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

pub fn router(state: Arc<ServeState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/activities", get(activities))
        .route("/api/activitiesById", get(facility_activities))
        .route("/api/v1/ridb/activityById", get(activity))
        .route("/api/v1/ridb/facility", get(facility))
        .route("/api/v1/ridb/campsitesByFacilityId", get(facility_campsites))
        .route("/api/v1/ridb/campsiteById", get(campsite))
        .route("/api/v1/ridb/attributesByCampsiteId", get(campsite_attributes))
        .route("/api/v1/campvue/vehicleLengths", get(vehicle_lengths))
        .layer(cors)
        .with_state(state)
}

/// Error response with its status and JSON body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    /// Map a failure to a response. `resource` names what was being fetched.
    fn new(resource: &str, err: Error) -> Self {
        let (status, body) = match &err {
            Error::InvalidParameter(_) => (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() })),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": err.to_string() })),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": err.to_string() }),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": format!("Failed to fetch {resource} from RIDB"),
                    "details": err.to_string(),
                }),
            ),
        };

        if err.is_client_error() {
            log::debug!("rejected {resource} request: {err}");
        } else {
            log::error!("RIDB {resource} fetch error ({}): {err}", err.kind());
        }

        Self { status, body }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str)
}

/// Run one request and turn its outcome into a response
async fn respond<T, F>(resource: &str, work: F) -> ApiResult
where
    T: serde::Serialize,
    F: Future<Output = Result<T, Error>>,
{
    let data = work.await.map_err(|err| ApiError::new(resource, err))?;

    serde_json::to_value(&data)
        .map(Json)
        .map_err(|err| ApiError::new(resource, Error::Generic(err.to_string())))
}

/// `getAll=true` reads every page up to `maxPages`; otherwise one page by
/// `limit`/`offset`
fn parse_paging(
    params: &HashMap<String, String>,
    default_max_pages: usize,
) -> Result<Paging, Error> {
    if parse_flag(param(params, "getAll")) {
        return Ok(Paging::All {
            max_pages: resolve_max_pages(param(params, "maxPages"), default_max_pages),
        });
    }

    Ok(Paging::Page(parse_page_request(
        param(params, "limit"),
        param(params, "offset"),
    )?))
}

async fn activities(State(state): State<Arc<ServeState>>, Query(params): Params) -> ApiResult {
    respond("activities", async {
        let client = state.client()?;
        let paging = parse_paging(&params, ACTIVITIES_MAX_PAGES)?;

        let listing = resources::activities(client, paging, None).await?;
        Ok::<_, Error>(normalize_activities(&listing.records))
    })
    .await
}

async fn facility_activities(
    State(state): State<Arc<ServeState>>,
    Query(params): Params,
) -> ApiResult {
    respond("activitiesById", async {
        let id = require_id(param(&params, "id"), "id")?;
        let client = state.client()?;
        let start = parse_page_request(param(&params, "limit"), param(&params, "offset"))?;
        let take = parse_take(param(&params, "take"))?;

        let activities = resources::facility_activities(client, id, start, take).await?;
        Ok::<_, Error>(normalize_activities(&activities))
    })
    .await
}

async fn activity(State(state): State<Arc<ServeState>>, Query(params): Params) -> ApiResult {
    respond("activityById", async {
        let id = require_id(param(&params, "id"), "id")?;
        let client = state.client()?;
        let include_raw = parse_flag(param(&params, "includeRaw"));

        let raw = resources::activity(client, id).await?;
        let normalized = normalize_activity(&raw);
        Ok::<_, Error>(Shaped::new(raw, normalized, include_raw))
    })
    .await
}

async fn facility(State(state): State<Arc<ServeState>>, Query(params): Params) -> ApiResult {
    respond("facility", async {
        let id = require_id(param(&params, "id"), "id")?;
        let client = state.client()?;

        let raw = resources::facility(client, id).await?;
        Ok::<_, Error>(normalize_facility(&raw))
    })
    .await
}

async fn facility_campsites(
    State(state): State<Arc<ServeState>>,
    Query(params): Params,
) -> ApiResult {
    respond("campsites", async {
        let id = require_id(param(&params, "id"), "id")?;
        let client = state.client()?;
        let paging = parse_paging(&params, FACILITY_CAMPSITES_MAX_PAGES)?;
        let query = normalize_query(param(&params, "query"));
        let include_raw = parse_flag(param(&params, "includeRaw"));

        let listing =
            resources::facility_campsites(client, id, paging, query.as_deref(), None).await?;
        let normalized: Vec<CampsiteOutput> =
            listing.records.iter().map(normalize_campsite).collect();
        Ok::<_, Error>(Shaped::new(listing.records, normalized, include_raw))
    })
    .await
}

async fn campsite(State(state): State<Arc<ServeState>>, Query(params): Params) -> ApiResult {
    respond("campsite", async {
        let id = require_id(param(&params, "id"), "id")?;
        let client = state.client()?;

        let raw = resources::campsite(client, id).await?;
        Ok::<_, Error>(json!({ "normalized": normalize_campsite(&raw) }))
    })
    .await
}

async fn campsite_attributes(
    State(state): State<Arc<ServeState>>,
    Query(params): Params,
) -> ApiResult {
    respond("campsite attributes", async {
        let id = require_id(param(&params, "id"), "id")?;
        let client = state.client()?;
        let paging = parse_paging(&params, CAMPSITE_ATTRIBUTES_MAX_PAGES)?;
        let query = normalize_query(param(&params, "query"));
        let include_raw = parse_flag(param(&params, "includeRaw"));

        let listing =
            resources::campsite_attributes(client, id, paging, query.as_deref(), None).await?;
        let classified = classify_attributes(&listing.records);
        Ok::<_, Error>(Shaped::new(listing.records, classified, include_raw))
    })
    .await
}

async fn vehicle_lengths(State(state): State<Arc<ServeState>>, Query(params): Params) -> ApiResult {
    respond("vehicle lengths", async {
        let id = require_id(param(&params, "id"), "id")?;
        let client = state.client()?;
        let reservable = parse_optional_flag(param(&params, "isReservable"));

        resources::facility_vehicle_lengths(client, id, reservable, VEHICLE_LENGTHS_MAX_PAGES, None)
            .await
    })
    .await
}

#[cfg(test)]
mod tests {
    use axum::extract::Path;
    use serde_json::json;

    use super::*;
    use crate::ridb::test_support::{client_for, envelope, spawn_upstream};

    fn campsite_json(id: usize, reservable: bool) -> Value {
        json!({
            "FacilityID": "232490",
            "CampsiteID": id.to_string(),
            "CampsiteName": format!("{id:03}"),
            "CampsiteReservable": reservable,
            "CampsiteType": "STANDARD NONELECTRIC",
            "Loop": "A",
            "ATTRIBUTES": [{"AttributeName": "Pets Allowed", "AttributeValue": "Yes"}],
            "PERMITTEDEQUIPMENT": [{"EquipmentName": "RV", "MaxLength": 30 + id}]
        })
    }

    fn upstream() -> Router {
        Router::new()
            .route(
                "/activities",
                get(|| async {
                    Json(envelope(
                        vec![json!({"ActivityID": 9, "ActivityName": "CAMPING"})],
                        Some(1),
                    ))
                }),
            )
            .route(
                "/activities/{id}",
                get(|Path(id): Path<String>| async move {
                    match id.as_str() {
                        "9" => Json(json!({"ActivityID": 9, "ActivityName": "CAMPING"})),
                        _ => Json(json!({"ActivityID": 0})),
                    }
                }),
            )
            .route(
                "/facilities/232490",
                get(|| async {
                    Json(json!({
                        "FacilityID": "232490",
                        "FacilityName": "MATHER CAMPGROUND",
                        "FacilityDescription": "<p>Near the rim</p>",
                        "RECAREA": [{"RecAreaName": "Grand Canyon National Park"}]
                    }))
                }),
            )
            .route(
                "/facilities/999",
                get(|| async { Json(json!({"FacilityName": "TRUNCATED"})) }),
            )
            .route(
                "/facilities/232490/campsites",
                get(|| async {
                    Json(envelope(
                        vec![campsite_json(1, true), campsite_json(2, false)],
                        Some(2),
                    ))
                }),
            )
            .route(
                "/campsites/1045/attributes",
                get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
            )
    }

    /// Serve the campvue router against a mock RIDB and return its base URL
    async fn spawn_app() -> String {
        let ridb = spawn_upstream(upstream()).await;
        let state = ServeState::new(Ok(client_for(&ridb)));
        spawn_upstream(router(Arc::new(state))).await
    }

    async fn get_json(url: String) -> (u16, Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_activities_route() {
        let app = spawn_app().await;

        let (status, body) = get_json(format!("{app}/api/activities")).await;
        assert_eq!(status, 200);
        assert_eq!(body, json!([{"id": 9, "name": "Camping"}]));

        let (status, body) = get_json(format!("{app}/api/activities?limit=0")).await;
        assert_eq!(status, 400);
        assert_eq!(
            body["error"],
            "Invalid 'limit' query parameter. Must be an integer between 1 and 50."
        );
    }

    #[tokio::test]
    async fn test_activity_by_id_route() {
        let app = spawn_app().await;

        let (status, body) =
            get_json(format!("{app}/api/v1/ridb/activityById?id=9&includeRaw=true")).await;
        assert_eq!(status, 200);
        assert_eq!(body["normalized"], json!({"id": 9, "name": "Camping"}));
        assert_eq!(body["raw"]["ActivityName"], "CAMPING");

        let (status, body) = get_json(format!("{app}/api/v1/ridb/activityById?id=0")).await;
        assert_eq!(status, 404);
        assert_eq!(body, json!({"error": "Activity with id '0' not found in RIDB"}));

        let (status, body) = get_json(format!("{app}/api/v1/ridb/activityById")).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "Missing required query parameter: 'id'"}));
    }

    #[tokio::test]
    async fn test_facility_route() {
        let app = spawn_app().await;

        let (status, body) = get_json(format!("{app}/api/v1/ridb/facility?id=232490")).await;

        assert_eq!(status, 200);
        assert_eq!(body["ridbId"], "232490");
        assert_eq!(body["name"], "Mather");
        assert_eq!(body["park"], "Grand Canyon National Park");
        assert_eq!(body["description"], "Near the rim");
    }

    #[tokio::test]
    async fn test_facility_without_id_is_reported_as_incomplete() {
        let app = spawn_app().await;

        let (status, body) = get_json(format!("{app}/api/v1/ridb/facility?id=999")).await;

        assert_eq!(status, 500);
        assert_eq!(
            body,
            json!({
                "error": "Failed to fetch facility from RIDB",
                "details": "Incomplete or malformed RIDB response (missing FacilityID)"
            })
        );
    }

    #[tokio::test]
    async fn test_campsites_route_include_raw() {
        let app = spawn_app().await;

        let (status, body) = get_json(format!(
            "{app}/api/v1/ridb/campsitesByFacilityId?id=232490&getAll=true"
        ))
        .await;
        assert_eq!(status, 200);
        assert!(body.get("raw").is_none());
        assert_eq!(body["normalized"].as_array().unwrap().len(), 2);
        assert_eq!(body["normalized"][0]["features"][0]["key"], "pets_allowed");

        let (_, body) = get_json(format!(
            "{app}/api/v1/ridb/campsitesByFacilityId?id=232490&includeRaw=true"
        ))
        .await;
        assert_eq!(body["raw"][1]["CampsiteID"], "2");
    }

    #[tokio::test]
    async fn test_vehicle_lengths_route() {
        let app = spawn_app().await;

        let (status, body) = get_json(format!(
            "{app}/api/v1/campvue/vehicleLengths?id=232490&isReservable=false"
        ))
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["facilityId"], "232490");
        assert_eq!(body["maxLength"], 32);
        assert_eq!(
            body["sites"],
            json!([{"ridbSiteId": "2", "siteNumber": "2", "maxLength": 32}])
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500_with_details() {
        let app = spawn_app().await;

        let (status, body) = get_json(format!(
            "{app}/api/v1/ridb/attributesByCampsiteId?id=1045"
        ))
        .await;

        assert_eq!(status, 500);
        assert_eq!(body["error"], "Failed to fetch campsite attributes from RIDB");
        assert_eq!(body["details"], "RIDB API responded with 502 Bad Gateway");
    }

    #[tokio::test]
    async fn test_misconfigured_server() {
        let state = ServeState::new(Err(Error::Config("missing RIDB_API_KEY".to_string())));
        let app = spawn_upstream(router(Arc::new(state))).await;

        let (status, body) = get_json(format!("{app}/api/v1/ridb/facility?id=232490")).await;
        assert_eq!(status, 500);
        assert_eq!(body, json!({"error": "Server misconfigured: missing RIDB_API_KEY"}));

        let (status, _) = get_json(format!("{app}/api/v1/ridb/facility")).await;
        assert_eq!(status, 400);
    }
}
