//! In-memory stand-in for the parts of GeoServer the client core talks to:
//! workspaces, one coverage, and the GeoWebCache seed and layer endpoints.
//!
//! Every route sits below `/geoserver` and requires basic credentials
//! `admin:geoserver`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "geoserver";

/// `Basic base64(admin:geoserver)`.
const AUTHORIZATION: &str = "Basic YWRtaW46Z2Vvc2VydmVy";

/// Status code GeoWebCache reports for a running task.
pub const TASK_RUNNING: i64 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
    #[serde(default)]
    pub isolated: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkspaceBody {
    pub workspace: Workspace,
}

/// `{"long-array-array": [[processed, total, remaining, id, status], ...]}`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskTable {
    #[serde(rename = "long-array-array")]
    pub rows: Vec<[i64; 5]>,
}

#[derive(Default)]
pub struct Catalog {
    workspaces: HashMap<String, Workspace>,
    /// Seeding tasks keyed by qualified layer name.
    tasks: HashMap<String, Vec<[i64; 5]>>,
    /// Cached-layer XML documents keyed by qualified layer name.
    gwc_layers: HashMap<String, String>,
    next_task_id: i64,
}

pub type Db = Arc<RwLock<Catalog>>;

pub fn app() -> Router {
    let mut catalog = Catalog::default();
    catalog.workspaces.insert(
        "sf".to_string(),
        Workspace {
            name: "sf".to_string(),
            isolated: false,
        },
    );
    let db: Db = Arc::new(RwLock::new(catalog));

    let api = Router::new()
        .route("/rest/workspaces", post(create_workspace))
        .route(
            "/rest/workspaces/{workspace}",
            get(get_workspace).put(update_workspace).delete(delete_workspace),
        )
        .route(
            "/rest/workspaces/{workspace}/coveragestores/{store}/coverages/{coverage}",
            get(get_coverage),
        )
        .route("/gwc/rest/seed/{target}", get(list_tasks).post(seed))
        .route("/gwc/rest/layers/{layer}", get(get_gwc_layer).put(put_gwc_layer))
        .layer(middleware::from_fn(require_auth))
        .with_state(db);

    Router::new().nest("/geoserver", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_auth(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == AUTHORIZATION);
    if !authorized {
        warn!(uri = %request.uri(), "rejected unauthenticated request");
        return (StatusCode::UNAUTHORIZED, "HTTP 401 Unauthorized").into_response();
    }
    next.run(request).await
}

/// The JSON error object GeoServer sends for some failures.
fn structured_error(status: StatusCode, message: String, url: &str) -> Response {
    let body = json!({
        "message": message,
        "url": url,
        "status": status.as_u16().to_string(),
        "servlet": "dispatcher",
    });
    (status, Json(body)).into_response()
}

fn xml(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

/// GeoWebCache seed command, `<seedRequest>`.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename = "seedRequest", rename_all = "camelCase")]
pub struct SeedCommand {
    pub grid_set_id: String,
    pub zoom_start: u32,
    pub zoom_stop: u32,
    pub format: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub thread_count: u32,
}

/// The part of a `<GeoServerLayer>` document the server checks.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename = "GeoServerLayer")]
pub struct LayerDocument {
    pub name: String,
}

fn bad_xml(what: &str, err: quick_xml::DeError) -> Response {
    (StatusCode::BAD_REQUEST, format!("Unable to parse {what}: {err}")).into_response()
}

async fn create_workspace(State(db): State<Db>, Json(input): Json<WorkspaceBody>) -> Response {
    let mut catalog = db.write().await;
    let name = input.workspace.name.clone();
    if catalog.workspaces.contains_key(&name) {
        return (StatusCode::CONFLICT, format!("Workspace '{name}' already exists")).into_response();
    }
    catalog.workspaces.insert(name.clone(), input.workspace);
    info!(workspace = %name, "workspace created");
    (StatusCode::CREATED, name).into_response()
}

async fn get_workspace(State(db): State<Db>, Path(workspace): Path<String>) -> Response {
    let catalog = db.read().await;
    match catalog.workspaces.get(&workspace) {
        Some(found) => Json(WorkspaceBody {
            workspace: found.clone(),
        })
        .into_response(),
        None => structured_error(
            StatusCode::NOT_FOUND,
            format!("No such workspace: '{workspace}' found"),
            &format!("/geoserver/rest/workspaces/{workspace}"),
        ),
    }
}

async fn update_workspace(
    State(db): State<Db>,
    Path(workspace): Path<String>,
    Json(input): Json<WorkspaceBody>,
) -> Response {
    let mut catalog = db.write().await;
    if catalog.workspaces.remove(&workspace).is_none() {
        return (StatusCode::NOT_FOUND, format!("Can't change a non existent workspace ({workspace})")).into_response();
    }
    let renamed = input.workspace;
    info!(from = %workspace, to = %renamed.name, "workspace updated");
    catalog.workspaces.insert(renamed.name.clone(), renamed);
    StatusCode::OK.into_response()
}

async fn delete_workspace(State(db): State<Db>, Path(workspace): Path<String>) -> Response {
    let mut catalog = db.write().await;
    match catalog.workspaces.remove(&workspace) {
        Some(_) => StatusCode::OK.into_response(),
        None => (StatusCode::NOT_FOUND, format!("Workspace '{workspace}' not found")).into_response(),
    }
}

async fn get_coverage(Path((workspace, store, coverage)): Path<(String, String, String)>) -> Response {
    if (workspace.as_str(), store.as_str(), coverage.as_str()) != ("sf", "sfdem", "sfdem") {
        return (
            StatusCode::NOT_FOUND,
            format!("No such coverage: {workspace},{store},{coverage}"),
        )
            .into_response();
    }
    Json(sfdem_coverage()).into_response()
}

fn sfdem_coverage() -> Value {
    json!({
        "coverage": {
            "name": "sfdem",
            "nativeName": "sfdem",
            "namespace": {"name": "sf", "href": "http://localhost:8080/geoserver/rest/namespaces/sf.json"},
            "title": "sfdem is a Tagged Image File Format with Geographic information",
            "keywords": {"string": ["WCS", "sfdem"]},
            "nativeCRS": {"@class": "projected", "$": "PROJCS[\"NAD27 / UTM zone 13N\"]"},
            "srs": "EPSG:26713",
            "nativeBoundingBox": {"minx": 589980, "maxx": 609000, "miny": 4913700, "maxy": 4928010, "crs": {"@class": "projected", "$": "EPSG:26713"}},
            "latLonBoundingBox": {"minx": -103.87, "maxx": -103.62, "miny": 44.37, "maxy": 44.5, "crs": "EPSG:4326"},
            "projectionPolicy": "REPROJECT_TO_DECLARED",
            "enabled": true,
            "store": {"@class": "coverageStore", "name": "sf:sfdem"},
            "grid": {
                "@dimension": "2",
                "range": {"low": "0 0", "high": "634 477"},
                "transform": {"scaleX": 30, "scaleY": -30, "shearX": 0, "shearY": 0, "translateX": 589995, "translateY": 4927995},
                "crs": "EPSG:26713"
            }
        }
    })
}

async fn list_tasks(State(db): State<Db>, Path(target): Path<String>) -> Response {
    let Some(layer) = target.strip_suffix(".json") else {
        return (StatusCode::BAD_REQUEST, "task status is only available as JSON").into_response();
    };
    let catalog = db.read().await;
    let rows = catalog.tasks.get(layer).cloned().unwrap_or_default();
    Json(TaskTable { rows }).into_response()
}

async fn seed(State(db): State<Db>, Path(target): Path<String>, body: String) -> Response {
    let Some(layer) = target.strip_suffix(".xml") else {
        return (StatusCode::BAD_REQUEST, "seed requests must be XML").into_response();
    };
    let command: SeedCommand = match quick_xml::de::from_str(&body) {
        Ok(command) => command,
        Err(e) => return bad_xml("seed request", e),
    };
    let mut catalog = db.write().await;
    match command.kind.as_str() {
        "seed" | "reseed" => {
            catalog.next_task_id += 1;
            let row = [0, 100, 100, catalog.next_task_id, TASK_RUNNING];
            catalog.tasks.entry(layer.to_string()).or_default().push(row);
        }
        "truncate" => {
            catalog.tasks.remove(layer);
        }
        other => {
            return (StatusCode::BAD_REQUEST, format!("Unknown seed type {other}")).into_response();
        }
    }
    info!(
        layer,
        kind = %command.kind,
        gridset = %command.grid_set_id,
        zoom_start = command.zoom_start,
        zoom_stop = command.zoom_stop,
        "seed request accepted"
    );
    StatusCode::OK.into_response()
}

async fn get_gwc_layer(State(db): State<Db>, Path(layer): Path<String>) -> Response {
    let catalog = db.read().await;
    match catalog.gwc_layers.get(&layer) {
        Some(document) => xml(document.clone()),
        None => (StatusCode::NOT_FOUND, format!("Unknown layer: {layer}")).into_response(),
    }
}

async fn put_gwc_layer(State(db): State<Db>, Path(layer): Path<String>, body: String) -> Response {
    let document: LayerDocument = match quick_xml::de::from_str(&body) {
        Ok(document) => document,
        Err(e) => return bad_xml("layer configuration", e),
    };
    if document.name != layer {
        return (StatusCode::BAD_REQUEST, format!("layer name does not match {layer}")).into_response();
    }
    db.write().await.gwc_layers.insert(layer.clone(), body);
    info!(layer = %layer, "cached layer configured");
    (StatusCode::OK, "layer saved").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_table_serializes_to_wire_shape() {
        let table = TaskTable {
            rows: vec![[0, 100, 100, 1, TASK_RUNNING]],
        };
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, json!({"long-array-array": [[0, 100, 100, 1, 1]]}));
    }

    #[test]
    fn empty_task_table() {
        let json = serde_json::to_string(&TaskTable::default()).unwrap();
        assert_eq!(json, r#"{"long-array-array":[]}"#);
    }

    #[test]
    fn seed_command_parses_from_xml() {
        let doc = "<seedRequest><gridSetId>EPSG:4326</gridSetId><zoomStart>0</zoomStart>\
<zoomStop>4</zoomStop><format>image/png</format><type>reseed</type><threadCount>2</threadCount></seedRequest>";
        let command: SeedCommand = quick_xml::de::from_str(doc).unwrap();
        assert_eq!(command.kind, "reseed");
        assert_eq!(command.format, "image/png");
        assert_eq!(command.zoom_stop, 4);
        assert_eq!(command.thread_count, 2);
    }

    #[test]
    fn seed_command_rejects_missing_fields_and_broken_xml() {
        assert!(quick_xml::de::from_str::<SeedCommand>("<seedRequest><type>seed</type></seedRequest>").is_err());
        assert!(quick_xml::de::from_str::<SeedCommand>("<seedRequest><type>seed</seedRequest>").is_err());
    }

    #[test]
    fn layer_document_ignores_other_elements() {
        let doc = "<GeoServerLayer><id>x</id><name>topp:states</name><gutter>0</gutter></GeoServerLayer>";
        let layer: LayerDocument = quick_xml::de::from_str(doc).unwrap();
        assert_eq!(layer.name, "topp:states");
    }

    #[test]
    fn workspace_isolated_defaults_to_false() {
        let input: WorkspaceBody = serde_json::from_str(r#"{"workspace":{"name":"ws1"}}"#).unwrap();
        assert_eq!(input.workspace.name, "ws1");
        assert!(!input.workspace.isolated);
    }

    #[test]
    fn workspace_body_rejects_missing_name() {
        let result: Result<WorkspaceBody, _> = serde_json::from_str(r#"{"workspace":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn coverage_fixture_carries_string_range() {
        let coverage = sfdem_coverage();
        assert_eq!(coverage["coverage"]["grid"]["range"]["high"], "634 477");
    }
}
