//! Grid range of a coverage.
//!
//! On the wire the range is an object whose `low` and `high` members are
//! strings of space-separated integers: `{"low": "0 0", "high": "634 477"}`.
//! A single bad token rejects the whole range.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridRange {
    pub low: Vec<i64>,
    pub high: Vec<i64>,
}

#[derive(Serialize, Deserialize)]
struct WireRange<S> {
    low: S,
    high: S,
}

impl GridRange {
    pub fn new(low: Vec<i64>, high: Vec<i64>) -> Self {
        Self { low, high }
    }

    /// Number of grid dimensions, taken from `low`.
    pub fn dimension(&self) -> usize {
        self.low.len()
    }
}

/// Parse a space-separated integer list. `field` names the member in errors.
pub fn parse_int_list(field: &str, text: &str) -> Result<Vec<i64>, String> {
    text.split(' ')
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| format!("invalid integer `{token}` in range `{field}`"))
        })
        .collect()
}

fn join_ints(values: &[i64]) -> String {
    values.iter().map(i64::to_string).collect::<Vec<_>>().join(" ")
}

impl<'de> Deserialize<'de> for GridRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireRange::<String>::deserialize(deserializer)?;
        let low = parse_int_list("low", &wire.low).map_err(D::Error::custom)?;
        let high = parse_int_list("high", &wire.high).map_err(D::Error::custom)?;
        Ok(GridRange { low, high })
    }
}

impl Serialize for GridRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireRange {
            low: join_ints(&self.low),
            high: join_ints(&self.high),
        }
        .serialize(serializer)
    }
}
