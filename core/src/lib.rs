//! Synchronous client core for the GeoServer REST and GeoWebCache APIs.
//!
//! # Overview
//! A `GeoServer` catalog composes resource URLs below a configured endpoint,
//! describes each exchange as an `HttpRequest`, dispatches it over a blocking
//! HTTP agent and interprets the `HttpResponse`: the expected status goes
//! through the JSON/XML codec, anything else through the error normalizer.
//!
//! # Design
//! - `GeoServer` is immutable after construction and safe to share between
//!   threads. All I/O lives in `dispatch`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so both halves are testable without a
//!   server.
//! - The wire quirks of the REST API (CRS objects, integer ranges sent as
//!   strings, the task status table) are absorbed by dedicated serde types
//!   in `crs`, `range` and `tasks`.

pub mod client;
pub mod codec;
pub mod config;
pub mod crs;
pub mod dispatch;
pub mod error;
pub mod gwc;
pub mod http;
pub mod normalize;
pub mod range;
pub mod target;
pub mod tasks;
pub mod types;

pub use client::{check_status, GeoServer, Query};
pub use config::CatalogConfig;
pub use crs::Crs;
pub use error::{ApiError, Result};
pub use gwc::{GwcLayer, SeedKind, SeedRequest};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use normalize::{normalize, DecodedError};
pub use range::GridRange;
pub use target::compose_url;
pub use tasks::{decode_tasks, TaskRecord, TaskStatus};
pub use types::{BoundingBox, Coverage, CoverageBody, Grid, Keywords, Resource, Transform};
