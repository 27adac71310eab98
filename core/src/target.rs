//! Request target composition.

use url::Url;

use crate::error::{ApiError, Result};

/// Join `segments` onto the path of `base`.
///
/// Empty segments are skipped and separators are collapsed, so
/// `http://host/geoserver/` + `["rest", "workspaces", "", "ws1"]` becomes
/// `http://host/geoserver/rest/workspaces/ws1`. A segment may itself contain
/// `/` (`"workspaces/ws1/"`); it is split like any other path. Characters not
/// allowed in a URL path are percent-encoded.
pub fn compose_url(base: &str, segments: &[&str]) -> Result<String> {
    let mut url = Url::parse(base).map_err(|e| configuration(base, e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(configuration(base, "URL has no hierarchical path".to_string()));
    }

    let existing = url.path().to_string();
    let parts: Vec<&str> = existing
        .split('/')
        .chain(segments.iter().flat_map(|segment| segment.split('/')))
        .filter(|part| !part.is_empty())
        .collect();
    url.set_path(&format!("/{}", parts.join("/")));
    Ok(url.into())
}

fn configuration(base: &str, reason: String) -> ApiError {
    ApiError::Configuration {
        base: base.to_string(),
        reason,
    }
}
