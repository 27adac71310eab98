//! The GeoServer catalog: configuration, target composition and the generic
//! JSON request helpers that resource operations are built on.
//!
//! # Design
//! `GeoServer` holds an immutable `CatalogConfig` and a `Dispatcher` and
//! carries no mutable state between calls, so one instance can be cloned or
//! shared across threads freely. Operations follow a build/execute/parse
//! shape: compose the target, describe the request as an `HttpRequest`,
//! dispatch it, then route the `HttpResponse` either through the codec (on
//! the expected status) or through the error normalizer.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use crate::codec;
use crate::config::CatalogConfig;
use crate::dispatch::Dispatcher;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::normalize::normalize;
use crate::target::compose_url;

/// Query parameters for the generic helpers.
pub type Query = BTreeMap<String, String>;

/// Synchronous client for a GeoServer instance.
#[derive(Debug, Clone)]
pub struct GeoServer {
    config: CatalogConfig,
    dispatcher: Dispatcher,
}

impl GeoServer {
    pub fn new(config: CatalogConfig) -> Self {
        let dispatcher = Dispatcher::new(&config);
        Self { config, dispatcher }
    }

    /// Catalog for `server_url` (e.g. `http://localhost:8080/geoserver/`)
    /// using basic credentials.
    pub fn connect(server_url: &str, username: &str, password: &str) -> Self {
        Self::new(CatalogConfig::new(server_url, username, password))
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Absolute URL of a resource below the configured endpoint.
    pub fn target(&self, segments: &[&str]) -> Result<String> {
        compose_url(&self.config.server_url, segments)
    }

    /// Dispatch a request as-is. Status interpretation is left to the caller.
    pub fn execute(&self, request: &HttpRequest) -> HttpResponse {
        self.dispatcher.dispatch(request)
    }

    pub fn build_get_json(&self, segments: &[&str], query: Query) -> Result<HttpRequest> {
        Ok(HttpRequest::get(self.target(segments)?).accept(codec::JSON).queries(query))
    }

    pub fn parse_json<T: DeserializeOwned>(&self, response: HttpResponse, expected: u16) -> Result<T> {
        check_status(&response, expected)?;
        codec::from_json(&response.body)
    }

    /// GET a resource and decode its JSON body.
    pub fn get_json<T: DeserializeOwned>(&self, segments: &[&str], query: Query) -> Result<T> {
        let req = self.build_get_json(segments, query)?;
        self.parse_json(self.execute(&req), 200)
    }

    pub fn build_post_json<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<HttpRequest> {
        let body = codec::to_json(body)?;
        Ok(HttpRequest::post(self.target(segments)?).accept(codec::JSON).json_body(body))
    }

    /// POST a JSON body to create a resource. Expects `201 Created`.
    pub fn post_json<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<HttpResponse> {
        let req = self.build_post_json(segments, body)?;
        let response = self.execute(&req);
        check_status(&response, 201)?;
        Ok(response)
    }

    pub fn build_put_json<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B, query: Query) -> Result<HttpRequest> {
        let body = codec::to_json(body)?;
        Ok(HttpRequest::put(self.target(segments)?)
            .accept(codec::JSON)
            .queries(query)
            .json_body(body))
    }

    /// PUT a JSON body to modify a resource. Expects `200 OK`.
    pub fn put_json<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B, query: Query) -> Result<()> {
        let req = self.build_put_json(segments, body, query)?;
        check_status(&self.execute(&req), 200)
    }

    pub fn build_delete(&self, segments: &[&str], query: Query) -> Result<HttpRequest> {
        Ok(HttpRequest::delete(self.target(segments)?).accept(codec::JSON).queries(query))
    }

    /// DELETE a resource. Expects `200 OK`.
    pub fn delete(&self, segments: &[&str], query: Query) -> Result<()> {
        let req = self.build_delete(segments, query)?;
        check_status(&self.execute(&req), 200)
    }
}

/// Map anything but the `expected` status to an error: status 0 becomes
/// `ApiError::Transport`, every other status goes through the normalizer.
pub fn check_status(response: &HttpResponse, expected: u16) -> Result<()> {
    if response.status == expected {
        return Ok(());
    }
    if response.is_transport_failure() {
        return Err(ApiError::Transport {
            url: response.url.clone(),
            message: response.text(),
        });
    }
    let decoded = normalize(response.status, &response.body, &response.url);
    error!(
        status = decoded.status,
        url = %decoded.url,
        message = %decoded.message,
        "unexpected response status"
    );
    Err(ApiError::UnexpectedStatus(decoded))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::http::HttpMethod;

    fn client() -> GeoServer {
        GeoServer::connect("http://localhost:8080/geoserver/", "admin", "geoserver")
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Workspace {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        isolated: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct WorkspaceBody {
        workspace: Workspace,
    }

    #[test]
    fn catalog_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<GeoServer>();
    }

    #[test]
    fn target_joins_configured_endpoint() {
        let url = client().target(&["rest", "workspaces", "", "ws1"]).unwrap();
        assert_eq!(url, "http://localhost:8080/geoserver/rest/workspaces/ws1");
    }

    #[test]
    fn invalid_endpoint_fails_before_network() {
        let bad = GeoServer::connect("localhost:8080 geoserver", "", "");
        assert!(matches!(
            bad.build_get_json(&["rest"], Query::new()),
            Err(ApiError::Configuration { .. })
        ));
    }

    #[test]
    fn build_get_json_produces_correct_request() {
        let query = Query::from([("list".to_string(), "all".to_string())]);
        let req = client()
            .build_get_json(&["rest", "workspaces", "sf", "coveragestores", "sfdem", "coverages"], query)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "http://localhost:8080/geoserver/rest/workspaces/sf/coveragestores/sfdem/coverages"
        );
        assert_eq!(req.accept.as_deref(), Some("application/json"));
        assert_eq!(req.query.get("list").map(String::as_str), Some("all"));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_post_json_produces_correct_request() {
        let body = WorkspaceBody {
            workspace: Workspace {
                name: "ws1".to_string(),
                isolated: None,
            },
        };
        let req = client().build_post_json(&["rest", "workspaces"], &body).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.content_type.as_deref(), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"workspace":{"name":"ws1"}}"#));
    }

    #[test]
    fn build_put_json_carries_query() {
        let query = Query::from([("recalculate".to_string(), "nativebbox".to_string())]);
        let req = client()
            .build_put_json(&["rest", "workspaces", "sf"], &serde_json::json!({"workspace": {"name": "sf2"}}), query)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.query.len(), 1);
    }

    #[test]
    fn build_delete_has_no_body() {
        let query = Query::from([("recurse".to_string(), "true".to_string())]);
        let req = client().build_delete(&["rest", "workspaces", "sf"], query).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
        assert_eq!(
            req.resolved_url().unwrap().as_str(),
            "http://localhost:8080/geoserver/rest/workspaces/sf?recurse=true"
        );
    }

    #[test]
    fn parse_json_success() {
        let response = HttpResponse::new(200, r#"{"workspace":{"name":"sf","isolated":false}}"#);
        let body: WorkspaceBody = client().parse_json(response, 200).unwrap();
        assert_eq!(body.workspace.name, "sf");
        assert_eq!(body.workspace.isolated, Some(false));
    }

    #[test]
    fn parse_json_bad_body() {
        let response = HttpResponse::new(200, "<html>login</html>");
        let err = client().parse_json::<WorkspaceBody>(response, 200).unwrap_err();
        match err {
            ApiError::Decode { target, preview, .. } => {
                assert_eq!(target, "WorkspaceBody");
                assert_eq!(preview, "<html>login</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_json_not_found() {
        let response = HttpResponse::new(404, "No such workspace: 'nope' found").with_url("http://h/rest/workspaces/nope");
        let err = client().parse_json::<WorkspaceBody>(response, 200).unwrap_err();
        assert!(err.is_not_found());
        match err {
            ApiError::UnexpectedStatus(decoded) => {
                assert_eq!(decoded.label, "Not Found");
                assert!(decoded.message.contains("No such workspace"));
                assert_eq!(decoded.url, "http://h/rest/workspaces/nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_zero_is_transport_error() {
        let response = HttpResponse::transport_failure("http://h/rest", "connection refused");
        let err = check_status(&response, 200).unwrap_err();
        match err {
            ApiError::Transport { url, message } => {
                assert_eq!(url, "http://h/rest");
                assert_eq!(message, "connection refused");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_success_status_is_unexpected() {
        let response = HttpResponse::new(200, "");
        let err = check_status(&response, 201).unwrap_err();
        assert_eq!(err.status(), Some(200));
        assert!(err.to_string().contains("Unexpected Error with status code 200"));
    }
}
