//! Turns a non-success status code and its body into a `DecodedError`.
//!
//! GeoServer answers most failures with plain text, but some (for example a
//! REST path assembled from an empty resource name) come back as a JSON
//! object `{message, url, status, servlet}`. The normalizer tries the
//! structured form first and always pairs the result with a canned label
//! looked up from the status code, so a reader gets both the known condition
//! and whatever the server said.

use std::borrow::Cow;

use serde::Deserialize;
use thiserror::Error;

/// A server-reported failure, normalized for display.
///
/// The `status` field of a structured body is ignored: the HTTP status of
/// the exchange is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label} (HTTP {status}): {message}")]
pub struct DecodedError {
    pub status: u16,
    /// Canned description of the status code, e.g. `Not Found`.
    pub label: String,
    /// Structured message when the body carried one, the raw body otherwise.
    pub message: String,
    pub url: String,
    /// Server component that produced the error, when reported.
    pub servlet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StructuredError {
    message: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    servlet: Option<String>,
}

/// Canned label for a status code.
pub fn status_label(status: u16) -> Cow<'static, str> {
    match status {
        401 => Cow::Borrowed("Unauthorized"),
        403 => Cow::Borrowed("Forbidden"),
        404 => Cow::Borrowed("Not Found"),
        405 => Cow::Borrowed("Method Not Allowed"),
        500 => Cow::Borrowed("Internal Server Error"),
        other => Cow::Owned(format!("Unexpected Error with status code {other}")),
    }
}

/// Build a `DecodedError` from a status code, a response body and the URL
/// the request was sent to.
pub fn normalize(status: u16, body: &[u8], url: &str) -> DecodedError {
    let label = status_label(status).into_owned();
    match serde_json::from_slice::<StructuredError>(body) {
        Ok(structured) => DecodedError {
            status,
            label,
            message: structured.message,
            url: structured
                .url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| url.to_string()),
            servlet: structured.servlet.filter(|s| !s.is_empty()),
        },
        Err(_) => DecodedError {
            status,
            label,
            message: String::from_utf8_lossy(body).trim().to_string(),
            url: url.to_string(),
            servlet: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_body_keeps_label_and_raw_text() {
        let err = normalize(404, b"No such layer: topp:states", "http://h/gs/rest/layers/x");
        assert_eq!(err.label, "Not Found");
        assert!(err.message.contains("No such layer: topp:states"));
        assert_eq!(err.url, "http://h/gs/rest/layers/x");
        assert!(err.servlet.is_none());
        let rendered = err.to_string();
        assert!(rendered.contains("Not Found"));
        assert!(rendered.contains("No such layer"));
    }

    #[test]
    fn structured_body_uses_server_message() {
        let err = normalize(404, br#"{"message":"no such workspace"}"#, "http://h/gs");
        assert_eq!(err.label, "Not Found");
        assert_eq!(err.message, "no such workspace");
        assert_eq!(err.url, "http://h/gs");
    }

    #[test]
    fn structured_body_fills_origin_fields() {
        let body = br#"{"message":"boom","url":"/geoserver/rest/workspaces/","status":"500","servlet":"dispatcher"}"#;
        let err = normalize(500, body, "http://h/geoserver/rest/workspaces/");
        assert_eq!(err.label, "Internal Server Error");
        assert_eq!(err.message, "boom");
        assert_eq!(err.url, "/geoserver/rest/workspaces/");
        assert_eq!(err.servlet.as_deref(), Some("dispatcher"));
    }

    #[test]
    fn numeric_status_in_body_is_accepted() {
        let err = normalize(403, br#"{"message":"nope","status":403}"#, "u");
        assert_eq!(err.label, "Forbidden");
        assert_eq!(err.message, "nope");
    }

    #[test]
    fn json_without_message_falls_back_to_raw_body() {
        let err = normalize(405, br#"{"error":"x"}"#, "u");
        assert_eq!(err.label, "Method Not Allowed");
        assert_eq!(err.message, r#"{"error":"x"}"#);
    }

    #[test]
    fn unknown_status_gets_generic_label() {
        let err = normalize(418, b"teapot", "u");
        assert_eq!(err.label, "Unexpected Error with status code 418");
        assert!(err.to_string().contains("teapot"));
    }

    #[test]
    fn http_status_wins_over_body_status() {
        let err = normalize(401, br#"{"message":"denied","status":"500"}"#, "u");
        assert_eq!(err.status, 401);
        assert_eq!(err.label, "Unauthorized");
    }
}
