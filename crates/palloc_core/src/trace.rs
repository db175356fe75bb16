//! Per-timestep trace records: immutable snapshots appended by the stepper,
//! consumed only by output serialization and the trace-consistency test
//! property (P6).

use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

/// A single batch decision, carrying only what the output contract needs —
/// no internal request/parking ids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub dropoff_coordinate: Coordinate,
    pub parking_coordinate: Coordinate,
    pub request_duration: u32,
    pub route_duration: u32,
}

/// Immutable per-timestep counters plus this step's assignments (empty on
/// non-batch-boundary steps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub timestep: u32,
    pub current_time_of_day: u32,
    pub number_of_requests: usize,
    pub number_of_ongoing_trips: usize,
    pub available_parking_spots: u64,
    pub average_cost: f64,
    pub average_duration: f64,
    pub dropped_requests: usize,
    pub early_requests: usize,
    pub assignments: Vec<Assignment>,
}
