//! HTTP exchanges described as plain data.
//!
//! # Design
//! `HttpRequest` is the descriptor a caller hands to the dispatcher and
//! `HttpResponse` is what comes back: raw body bytes and a status code, with
//! no interpretation. Building and parsing stay deterministic and testable
//! without a network; only `Dispatcher` touches the wire.
//!
//! A status of 0 marks a transport failure. The body then holds the failure
//! description instead of server output.

use std::collections::BTreeMap;

use url::Url;

use crate::codec;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether the method carries a request body.
    pub fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// An HTTP request described as plain data.
///
/// Constructed with `get`/`post`/`put`/`delete` and refined with the
/// consuming builder methods; not meant to be mutated once issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub accept: Option<String>,
    pub query: BTreeMap<String, String>,
    pub body: Option<String>,
    pub content_type: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            accept: None,
            query: BTreeMap::new(),
            body: None,
            content_type: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn accept(mut self, content_type: &str) -> Self {
        self.accept = Some(content_type.to_string());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn queries(mut self, query: BTreeMap<String, String>) -> Self {
        self.query.extend(query);
        self
    }

    pub fn body(mut self, body: String, content_type: &str) -> Self {
        self.body = Some(body);
        self.content_type = Some(content_type.to_string());
        self
    }

    pub fn json_body(self, body: String) -> Self {
        self.body(body, codec::JSON)
    }

    pub fn xml_body(self, body: String) -> Self {
        self.body(body, codec::XML)
    }

    /// The target with query parameters merged in. Keys set on the request
    /// replace same-named keys already present in the target.
    pub fn resolved_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.url)?;
        if self.query.is_empty() {
            return Ok(url);
        }

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !self.query.contains_key(key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept.iter())
            .extend_pairs(self.query.iter());
        Ok(url)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Server status, or 0 when the exchange failed before a response.
    pub status: u16,
    pub body: Vec<u8>,
    /// URL the request was sent to, after query merging.
    pub url: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            url: String::new(),
        }
    }

    pub fn transport_failure(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            status: 0,
            body: description.into().into_bytes(),
            url: url.into(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status == 0
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
