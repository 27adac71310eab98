//! JSON and XML body encoding and decoding.
//!
//! # Design
//! Every response body passes through `from_json` or `from_xml`, which turn
//! a schema mismatch into `ApiError::Decode` with a bounded preview of the
//! offending body instead of the full payload. Request bodies are produced
//! strictly from the serde field mapping of the value; optional fields are
//! left out with `skip_serializing_if` on the types themselves.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Result};

pub const JSON: &str = "application/json";
pub const XML: &str = "application/xml";

/// Maximum number of characters of a body quoted in a decode error.
pub const PREVIEW_LEN: usize = 256;

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| ApiError::Encode(e.to_string()))
}

pub fn to_xml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    quick_xml::se::to_string(value).map_err(|e| ApiError::Encode(e.to_string()))
}

pub fn from_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| decode_error::<T>(e.to_string(), body))
}

pub fn from_xml<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let text = std::str::from_utf8(body).map_err(|e| decode_error::<T>(e.to_string(), body))?;
    quick_xml::de::from_str(text).map_err(|e| decode_error::<T>(e.to_string(), body))
}

/// Build a decode error naming the target type and quoting at most
/// `PREVIEW_LEN` characters of the body.
pub fn decode_error<T: ?Sized>(reason: impl Into<String>, body: &[u8]) -> ApiError {
    ApiError::Decode {
        target: short_type_name::<T>().to_string(),
        reason: reason.into(),
        preview: preview(body),
    }
}

pub fn preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut chars = text.char_indices();
    match chars.nth(PREVIEW_LEN) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.into_owned(),
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

/// Integers that GeoServer transmits as JSON strings (`"@dimension": "2"`).
///
/// Decodes from either a string or a number, encodes back as a string.
pub mod lenient_int {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Int(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        match Option::<Wire>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Wire::Int(v)) => Ok(Some(v)),
            Some(Wire::Text(text)) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected an integer, found `{text}`"))),
        }
    }
}
