//! Small shared value types that don't deserve their own module.

use serde::{Deserialize, Serialize};

/// A point on the map. Opaque to the simulation core — carried through to
/// traces purely so downstream tooling can plot requests and parkings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

/// A duration matrix indexed `[from][to]`, in minutes.
pub type DurationMatrix = Vec<Vec<u32>>;
