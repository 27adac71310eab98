//! GeoWebCache tile-cache operations: seeding, task status and per-layer
//! cache configuration.
//!
//! # Design
//! This subsystem speaks XML for its commands and layer configuration but
//! JSON for the task table. The layer configuration is read as XML on
//! purpose: its JSON read and write schemas differ, the XML ones do not.
//!
//! Each operation is a `build_*` method producing an `HttpRequest`, a
//! `parse_*` method consuming the `HttpResponse`, and a convenience method
//! that dispatches between the two.

use serde::{Deserialize, Serialize};

use crate::client::{check_status, GeoServer};
use crate::codec;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::tasks::{decode_tasks, TaskRecord};

/// What a seed request does to the tile cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    /// Generate missing tiles.
    Seed,
    /// Regenerate all tiles.
    Reseed,
    /// Remove tiles.
    Truncate,
}

impl SeedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SeedKind::Seed => "seed",
            SeedKind::Reseed => "reseed",
            SeedKind::Truncate => "truncate",
        }
    }
}

impl std::str::FromStr for SeedKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "seed" => Ok(SeedKind::Seed),
            "reseed" => Ok(SeedKind::Reseed),
            "truncate" => Ok(SeedKind::Truncate),
            other => Err(ApiError::InvalidRequest(format!(
                "seed type `{other}` is not one of seed, reseed, truncate"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRequest {
    /// Gridset to seed, e.g. `EPSG:900913`.
    pub gridset_id: String,
    pub zoom_start: u32,
    pub zoom_stop: u32,
    /// Tile format, e.g. `image/jpeg`.
    pub format: String,
    pub kind: SeedKind,
    /// Values below 1 are sent as 1.
    pub thread_count: u32,
}

impl SeedRequest {
    pub fn new(kind: SeedKind, gridset_id: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            gridset_id: gridset_id.into(),
            zoom_start: 0,
            zoom_stop: 0,
            format: format.into(),
            kind,
            thread_count: 1,
        }
    }

    pub fn zoom(mut self, start: u32, stop: u32) -> Self {
        self.zoom_start = start;
        self.zoom_stop = stop;
        self
    }

    pub fn threads(mut self, count: u32) -> Self {
        self.thread_count = count;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.gridset_id.is_empty() {
            return Err(ApiError::InvalidRequest(
                "gridset id should name an available gridset, for example `EPSG:900913`".to_string(),
            ));
        }
        if self.format.is_empty() {
            return Err(ApiError::InvalidRequest(
                "format should name an available tile format, for example `image/jpeg`".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename = "seedRequest", rename_all = "camelCase")]
struct SeedRequestXml<'a> {
    grid_set_id: &'a str,
    zoom_start: u32,
    zoom_stop: u32,
    format: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    thread_count: u32,
}

impl<'a> From<&'a SeedRequest> for SeedRequestXml<'a> {
    fn from(request: &'a SeedRequest) -> Self {
        Self {
            grid_set_id: &request.gridset_id,
            zoom_start: request.zoom_start,
            zoom_stop: request.zoom_stop,
            format: &request.format,
            kind: request.kind.as_str(),
            thread_count: request.thread_count.max(1),
        }
    }
}

/// Tile cache configuration of one layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "GeoServerLayer", rename_all = "camelCase")]
pub struct GwcLayer {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub in_memory_cached: bool,
    /// Qualified layer name, `workspace:layer`.
    pub name: String,
    #[serde(default)]
    pub mime_formats: StringList,
    #[serde(default)]
    pub grid_subsets: GridSubsets,
    #[serde(default)]
    pub meta_width_height: IntList,
    #[serde(default)]
    pub expire_cache: i64,
    #[serde(default)]
    pub expire_clients: i64,
    #[serde(default)]
    pub parameter_filters: ParameterFilters,
    #[serde(default)]
    pub gutter: i64,
    /// Cache warnings that do not disable caching, e.g. `Default`.
    #[serde(default, skip_serializing_if = "WarningList::is_empty")]
    pub cache_warning_skips: WarningList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringList {
    #[serde(rename = "string", default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarningList {
    #[serde(rename = "warning", default)]
    pub values: Vec<String>,
}

impl WarningList {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntList {
    #[serde(rename = "int", default)]
    pub values: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSubsets {
    #[serde(rename = "gridSubset", default)]
    pub subsets: Vec<GridSubset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSubset {
    pub grid_set_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub coords: Coords,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    #[serde(rename = "double", default)]
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_parameter_filter: Option<StyleParameterFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleParameterFilter {
    pub key: String,
    #[serde(default)]
    pub default_value: String,
}

fn qualified(workspace: &str, layer: &str) -> String {
    if workspace.is_empty() {
        layer.to_string()
    } else {
        format!("{workspace}:{layer}")
    }
}

impl GeoServer {
    pub fn build_seed(&self, workspace: &str, layer: &str, request: &SeedRequest) -> Result<HttpRequest> {
        request.validate()?;
        let url = self.target(&["gwc", "rest", "seed", &format!("{}.xml", qualified(workspace, layer))])?;
        let body = codec::to_xml(&SeedRequestXml::from(request))?;
        Ok(HttpRequest::post(url).xml_body(body))
    }

    pub fn parse_seed(&self, response: HttpResponse) -> Result<()> {
        check_status(&response, 200)
    }

    /// Start seeding, reseeding or truncating the tile cache of a layer.
    pub fn seed(&self, workspace: &str, layer: &str, request: &SeedRequest) -> Result<()> {
        let req = self.build_seed(workspace, layer, request)?;
        self.parse_seed(self.execute(&req))
    }

    pub fn build_tasks(&self, workspace: &str, layer: &str) -> Result<HttpRequest> {
        let url = self.target(&["gwc", "rest", "seed", &format!("{}.json", qualified(workspace, layer))])?;
        Ok(HttpRequest::get(url).accept(codec::JSON))
    }

    pub fn parse_tasks(&self, response: HttpResponse) -> Result<Vec<TaskRecord>> {
        check_status(&response, 200)?;
        decode_tasks(&response.body)
    }

    /// Seeding tasks of a layer. Empty when nothing is running.
    pub fn tasks(&self, workspace: &str, layer: &str) -> Result<Vec<TaskRecord>> {
        let req = self.build_tasks(workspace, layer)?;
        self.parse_tasks(self.execute(&req))
    }

    pub fn build_gwc_layer(&self, workspace: &str, layer: &str) -> Result<HttpRequest> {
        let url = self.target(&["gwc", "rest", "layers", &qualified(workspace, layer)])?;
        Ok(HttpRequest::get(url).accept(codec::XML))
    }

    pub fn parse_gwc_layer(&self, response: HttpResponse) -> Result<GwcLayer> {
        check_status(&response, 200)?;
        codec::from_xml(&response.body)
    }

    pub fn gwc_layer(&self, workspace: &str, layer: &str) -> Result<GwcLayer> {
        let req = self.build_gwc_layer(workspace, layer)?;
        self.parse_gwc_layer(self.execute(&req))
    }

    pub fn build_update_gwc_layer(&self, layer: &GwcLayer) -> Result<HttpRequest> {
        if layer.name.is_empty() {
            return Err(ApiError::InvalidRequest("GWC layer name is empty".to_string()));
        }
        let url = self.target(&["gwc", "rest", "layers", &layer.name])?;
        let body = codec::to_xml(layer)?;
        Ok(HttpRequest::put(url).xml_body(body))
    }

    pub fn parse_update_gwc_layer(&self, response: HttpResponse) -> Result<()> {
        check_status(&response, 200)
    }

    /// Create or replace the cache configuration of `layer.name`.
    pub fn update_gwc_layer(&self, layer: &GwcLayer) -> Result<()> {
        let req = self.build_update_gwc_layer(layer)?;
        self.parse_update_gwc_layer(self.execute(&req))
    }
}
