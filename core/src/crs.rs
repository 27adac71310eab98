//! Coordinate reference system field.
//!
//! GeoServer writes a CRS either as a tagged object
//! `{"@class": "projected", "$": "EPSG:26713"}` or as a plain string
//! `"EPSG:4326"`, and the same field may take either shape between two
//! responses. `Crs` models that as a closed two-variant type whose decoder
//! inspects the JSON shape before picking a variant.

use std::fmt;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

const CLASS_KEY: &str = "@class";
const VALUE_KEY: &str = "$";

/// Class tag that is written back as a plain string.
pub const STRING_CLASS: &str = "string";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Crs {
    /// Tagged object form.
    Labeled { class: String, value: String },
    /// Plain string form.
    Bare(String),
}

impl Crs {
    pub fn labeled(class: impl Into<String>, value: impl Into<String>) -> Self {
        Crs::Labeled {
            class: class.into(),
            value: value.into(),
        }
    }

    pub fn bare(value: impl Into<String>) -> Self {
        Crs::Bare(value.into())
    }

    /// The CRS text regardless of shape.
    pub fn value(&self) -> &str {
        match self {
            Crs::Labeled { value, .. } => value,
            Crs::Bare(value) => value,
        }
    }

    pub fn class(&self) -> Option<&str> {
        match self {
            Crs::Labeled { class, .. } => Some(class),
            Crs::Bare(_) => None,
        }
    }

    fn from_value(raw: Value) -> Result<Self, String> {
        match raw {
            Value::Object(map) => {
                if let (Some(Value::String(class)), Some(Value::String(value))) =
                    (map.get(CLASS_KEY), map.get(VALUE_KEY))
                {
                    return Ok(Crs::labeled(class.as_str(), value.as_str()));
                }
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                Err(format!(
                    "malformed CRS object, expected string `{CLASS_KEY}` and `{VALUE_KEY}`, found keys {keys:?}"
                ))
            }
            Value::String(text) => Ok(Crs::Bare(text)),
            Value::Null => Ok(Crs::Bare(String::new())),
            Value::Array(items) => Err(format!("CRS cannot be an array ({} items)", items.len())),
            scalar => Ok(Crs::Bare(scalar.to_string())),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl<'de> Deserialize<'de> for Crs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Crs::from_value(raw).map_err(D::Error::custom)
    }
}

impl Serialize for Crs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Crs::Bare(value) => serializer.serialize_str(value),
            // Legacy shape: a string-classed label is normalized back to a plain string.
            Crs::Labeled { class, value } if class == STRING_CLASS => serializer.serialize_str(value),
            Crs::Labeled { class, value } if class.is_empty() && value.is_empty() => {
                serializer.serialize_str("")
            }
            Crs::Labeled { class, value } => {
                // Both keys are always written, even when one is empty.
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(CLASS_KEY, class)?;
                map.serialize_entry(VALUE_KEY, value)?;
                map.end()
            }
        }
    }
}
