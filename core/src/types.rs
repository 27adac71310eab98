//! Catalog DTOs that carry the polymorphic wire fields.
//!
//! # Design
//! These are the JSON shapes GeoServer uses for coverage and feature-type
//! metadata. Every optional field is an `Option` (or an empty collection)
//! skipped on serialization, so a partially filled value sent in a PUT only
//! touches the fields the caller set. Sending `null` or `0` instead would
//! overwrite the server's value.

use serde::{Deserialize, Serialize};

use crate::codec::lenient_int;
use crate::crs::Crs;
use crate::range::GridRange;

/// Reference to another catalog resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "@class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keywords {
    #[serde(rename = "string", default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub minx: f64,
    pub maxx: f64,
    pub miny: f64,
    pub maxy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Crs>,
}

/// Affine grid-to-world transform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub shear_x: f64,
    pub shear_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    #[serde(
        rename = "@dimension",
        default,
        with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub dimension: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<GridRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Crs>,
}

/// Raster layer metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_coverage_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Keywords>,
    #[serde(rename = "nativeCRS", default, skip_serializing_if = "Option::is_none")]
    pub native_crs: Option<Crs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat_lon_bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
}

/// `{"coverage": {...}}` envelope used by the coverage endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageBody {
    pub coverage: Coverage,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::codec;

    const COVERAGE: &str = r#"{
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
        "store": {"@class": "coverageStore", "name": "sf:sfdem", "href": "http://localhost:8080/geoserver/rest/workspaces/sf/coveragestores/sfdem.json"},
        "grid": {
          "@dimension": "2",
          "range": {"low": "0 0", "high": "634 477"},
          "transform": {"scaleX": 30, "scaleY": -30, "shearX": 0, "shearY": 0, "translateX": 589995, "translateY": 4927995},
          "crs": "EPSG:26713"
        }
      }
    }"#;

    #[test]
    fn decodes_coverage_with_polymorphic_fields() {
        let body: CoverageBody = codec::from_json(COVERAGE.as_bytes()).unwrap();
        let coverage = body.coverage;
        assert_eq!(coverage.name.as_deref(), Some("sfdem"));
        assert_eq!(coverage.keywords.unwrap().values, vec!["WCS", "sfdem"]);
        assert_eq!(coverage.native_crs.unwrap().class(), Some("projected"));
        assert_eq!(
            coverage.native_bounding_box.unwrap().crs,
            Some(Crs::labeled("projected", "EPSG:26713"))
        );
        assert_eq!(coverage.lat_lon_bounding_box.unwrap().crs, Some(Crs::bare("EPSG:4326")));

        let grid = coverage.grid.unwrap();
        assert_eq!(grid.dimension, Some(2));
        assert_eq!(grid.range, Some(GridRange::new(vec![0, 0], vec![634, 477])));
        assert_eq!(grid.transform.unwrap().scale_y, -30.0);
        assert_eq!(grid.crs, Some(Crs::bare("EPSG:26713")));
        assert_eq!(coverage.store.unwrap().class.as_deref(), Some("coverageStore"));
    }

    #[test]
    fn bad_range_token_fails_whole_coverage() {
        let body = COVERAGE.replace(r#""high": "634 477""#, r#""high": "634 abc""#);
        let err = codec::from_json::<CoverageBody>(body.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("`abc`"), "{err}");
    }

    #[test]
    fn unset_optional_fields_are_omitted() {
        let json = codec::to_json(&Coverage::default()).unwrap();
        assert_eq!(json, "{}");
        assert_eq!(codec::to_json(&Grid::default()).unwrap(), "{}");
        assert_eq!(codec::to_json(&Keywords::default()).unwrap(), "{}");
    }

    #[test]
    fn partial_update_sends_only_set_fields() {
        let update = CoverageBody {
            coverage: Coverage {
                title: Some("Elevation".to_string()),
                enabled: Some(false),
                ..Coverage::default()
            },
        };
        let value: serde_json::Value = serde_json::from_str(&codec::to_json(&update).unwrap()).unwrap();
        assert_eq!(value, json!({"coverage": {"title": "Elevation", "enabled": false}}));
    }

    #[test]
    fn resource_round_trips_class_attribute() {
        let resource: Resource =
            codec::from_json(br#"{"@class":"Test","name":"Test1","href":"http://localhost:8080/geoserver/"}"#).unwrap();
        assert_eq!(resource.class.as_deref(), Some("Test"));
        let value: serde_json::Value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["@class"], "Test");
    }

    #[test]
    fn bounding_box_encodes_crs_shapes() {
        let bbox = BoundingBox {
            minx: -180.0,
            maxx: 180.0,
            miny: -90.0,
            maxy: 90.0,
            crs: Some(Crs::labeled("string", "EPSG:4326")),
        };
        let value = serde_json::to_value(&bbox).unwrap();
        assert_eq!(value["crs"], "EPSG:4326");
    }
}
