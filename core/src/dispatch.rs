//! Executes `HttpRequest` descriptors over the network.
//!
//! # Design
//! The dispatcher owns the only I/O in the crate. It never interprets the
//! response: any status the server sends back, including 4xx/5xx, is
//! returned as data. Failures that prevent a response altogether are folded
//! into an `HttpResponse` with status 0 so that callers handle every outcome
//! through the same value.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{info, warn};
use ureq::{Agent, RequestBuilder};

use crate::config::CatalogConfig;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Blocking HTTP executor bound to one set of credentials.
#[derive(Clone)]
pub struct Dispatcher {
    agent: Agent,
    authorization: Option<String>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(config: &CatalogConfig) -> Self {
        // Status codes are data here, never errors.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_recv_response(Some(config.response_header_timeout()))
            .build()
            .new_agent();
        let authorization = config
            .has_credentials()
            .then(|| basic_authorization(&config.username, &config.password));
        Self { agent, authorization }
    }

    /// Perform the exchange. Never fails: transport errors come back as a
    /// status-0 response whose body describes the failure.
    pub fn dispatch(&self, request: &HttpRequest) -> HttpResponse {
        let url = match request.resolved_url() {
            Ok(url) => url.to_string(),
            Err(e) => {
                let description = format!("malformed request URL `{}`: {e}", request.url);
                warn!(url = %request.url, method = request.method.as_str(), error = %description, "request not sent");
                return HttpResponse::transport_failure(&request.url, description);
            }
        };

        let result = match request.method {
            HttpMethod::Get => self.headers(self.agent.get(url.as_str()), request).call(),
            HttpMethod::Delete => self.headers(self.agent.delete(url.as_str()), request).call(),
            HttpMethod::Post => self.send_with_body(self.agent.post(url.as_str()), request),
            HttpMethod::Put => self.send_with_body(self.agent.put(url.as_str()), request),
        };

        let response = match result {
            Ok(mut response) => {
                let status = response.status().as_u16();
                // Read to completion; the agent's default cap is 10 MiB.
                match response.body_mut().with_config().limit(u64::MAX).read_to_vec() {
                    Ok(body) => HttpResponse::new(status, body).with_url(&url),
                    Err(e) => HttpResponse::transport_failure(&url, format!("failed to read response body: {e}")),
                }
            }
            Err(e) => HttpResponse::transport_failure(&url, e.to_string()),
        };

        if response.is_transport_failure() {
            warn!(url = %url, method = request.method.as_str(), error = %response.text(), "request failed");
        } else {
            info!(url = %url, method = request.method.as_str(), status = response.status, "request completed");
        }
        response
    }

    fn headers<B>(&self, mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
        if let Some(accept) = &request.accept {
            builder = builder.header("Accept", accept.as_str());
        }
        if let Some(authorization) = &self.authorization {
            builder = builder.header("Authorization", authorization.as_str());
        }
        builder
    }

    fn send_with_body(
        &self,
        builder: RequestBuilder<ureq::typestate::WithBody>,
        request: &HttpRequest,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let builder = self.headers(builder, request);
        match (&request.body, &request.content_type) {
            (Some(body), Some(content_type)) => builder.content_type(content_type.as_str()).send(body.as_bytes()),
            (Some(body), None) => builder.send(body.as_bytes()),
            (None, _) => builder.send_empty(),
        }
    }
}

fn basic_authorization(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}
