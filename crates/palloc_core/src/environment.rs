//! Static road-network data: travel-time matrices, parking capacities,
//! coordinates. Loaded once per process, cheaply cloned once per Monte Carlo
//! worker so each run mutates its own copy of `available_parking_spots`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PallocError;
use crate::types::{Coordinate, DurationMatrix};

/// On-disk shape of the environment file. Unknown keys are tolerated;
/// `smallest_round_trips` is accepted for input compatibility but always
/// recomputed from the matrices on load (see [`Environment::load`]), since a
/// stale value on disk would silently desynchronize the scheduler's
/// feasibility cut.
#[derive(Debug, Deserialize)]
struct EnvironmentFile {
    dropoff_to_parking: DurationMatrix,
    parking_to_dropoff: DurationMatrix,
    parking_capacities: Vec<u32>,
    dropoff_coords: Vec<Coordinate>,
    parking_coords: Vec<Coordinate>,
    #[serde(default)]
    #[allow(dead_code)]
    smallest_round_trips: Vec<u32>,
    #[serde(default)]
    parking_weights: Vec<f64>,
}

/// Serializable view used when an [`Environment`] is embedded read-only
/// (never mutated back to disk; `available_parking_spots` reflects whatever
/// state the environment happens to be in when serialized).
#[derive(Debug, Serialize)]
struct EnvironmentFileOut<'a> {
    dropoff_to_parking: &'a DurationMatrix,
    parking_to_dropoff: &'a DurationMatrix,
    parking_capacities: &'a Vec<u32>,
    dropoff_coords: &'a Vec<Coordinate>,
    parking_coords: &'a Vec<Coordinate>,
    smallest_round_trips: &'a Vec<u32>,
    parking_weights: &'a Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Environment {
    dropoff_to_parking: DurationMatrix,
    parking_to_dropoff: DurationMatrix,
    available_parking_spots: Vec<u32>,
    initial_parking_spots: Vec<u32>,
    smallest_round_trips: Vec<u32>,
    parking_weights: Vec<f64>,
    dropoff_coords: Vec<Coordinate>,
    parking_coords: Vec<Coordinate>,
}

impl Environment {
    /// Load and validate an environment from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PallocError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PallocError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: EnvironmentFile =
            serde_json::from_str(&text).map_err(|source| PallocError::Json {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_file(file)
    }

    fn from_file(file: EnvironmentFile) -> Result<Self, PallocError> {
        let n_d = file.dropoff_to_parking.len();
        let n_p = file.parking_capacities.len();

        if file.dropoff_to_parking.iter().any(|row| row.len() != n_p) {
            return Err(PallocError::Input(
                "dropoff_to_parking rows must all have length n_p".into(),
            ));
        }
        if file.parking_to_dropoff.len() != n_p
            || file.parking_to_dropoff.iter().any(|row| row.len() != n_d)
        {
            return Err(PallocError::Input(
                "parking_to_dropoff must be [n_p][n_d]".into(),
            ));
        }
        if file.dropoff_coords.len() != n_d {
            return Err(PallocError::Input(
                "dropoff_coords length must match number of dropoffs".into(),
            ));
        }
        if file.parking_coords.len() != n_p {
            return Err(PallocError::Input(
                "parking_coords length must match number of parkings".into(),
            ));
        }
        if !file.parking_weights.is_empty() && file.parking_weights.len() != n_p {
            return Err(PallocError::Input(
                "parking_weights length must match number of parkings".into(),
            ));
        }

        let smallest_round_trips: Vec<u32> = (0..n_d)
            .map(|d| {
                (0..n_p)
                    .map(|p| file.dropoff_to_parking[d][p] + file.parking_to_dropoff[p][d])
                    .min()
                    .unwrap_or(0)
            })
            .collect();

        Ok(Self {
            dropoff_to_parking: file.dropoff_to_parking,
            parking_to_dropoff: file.parking_to_dropoff,
            available_parking_spots: file.parking_capacities.clone(),
            initial_parking_spots: file.parking_capacities,
            smallest_round_trips,
            parking_weights: file.parking_weights,
            dropoff_coords: file.dropoff_coords,
            parking_coords: file.parking_coords,
        })
    }

    pub fn number_of_dropoffs(&self) -> usize {
        self.dropoff_to_parking.len()
    }

    pub fn number_of_parkings(&self) -> usize {
        self.parking_to_dropoff.len()
    }

    pub fn dropoff_to_parking(&self) -> &DurationMatrix {
        &self.dropoff_to_parking
    }

    pub fn parking_to_dropoff(&self) -> &DurationMatrix {
        &self.parking_to_dropoff
    }

    pub fn available_parking_spots(&self) -> &[u32] {
        &self.available_parking_spots
    }

    pub fn available_parking_spots_mut(&mut self) -> &mut Vec<u32> {
        &mut self.available_parking_spots
    }

    pub fn initial_parking_spots(&self) -> &[u32] {
        &self.initial_parking_spots
    }

    pub fn smallest_round_trips(&self) -> &[u32] {
        &self.smallest_round_trips
    }

    pub fn parking_weights(&self) -> &[f64] {
        &self.parking_weights
    }

    pub fn dropoff_coords(&self) -> &[Coordinate] {
        &self.dropoff_coords
    }

    pub fn parking_coords(&self) -> &[Coordinate] {
        &self.parking_coords
    }

    /// Total free capacity, summed across all parkings — used by P1
    /// (capacity conservation) in tests and trace consistency checks.
    pub fn total_available_capacity(&self) -> u64 {
        self.available_parking_spots.iter().map(|&s| s as u64).sum()
    }

    pub fn total_initial_capacity(&self) -> u64 {
        self.initial_parking_spots.iter().map(|&s| s as u64).sum()
    }

    fn to_file(&self) -> EnvironmentFileOut<'_> {
        EnvironmentFileOut {
            dropoff_to_parking: &self.dropoff_to_parking,
            parking_to_dropoff: &self.parking_to_dropoff,
            parking_capacities: &self.initial_parking_spots,
            dropoff_coords: &self.dropoff_coords,
            parking_coords: &self.parking_coords,
            smallest_round_trips: &self.smallest_round_trips,
            parking_weights: &self.parking_weights,
        }
    }

    /// Round-trip to JSON text (used by tests to build small in-memory
    /// environments without going through the filesystem).
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.to_file()).expect("environment serializes")
    }

    pub fn from_json_str(text: &str) -> Result<Self, PallocError> {
        let file: EnvironmentFile =
            serde_json::from_str(text).map_err(|source| PallocError::Json {
                path: "<in-memory>".to_string(),
                source,
            })?;
        Self::from_file(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_by_three_json() -> &'static str {
        r#"{
            "dropoff_to_parking": [[1,2,3],[2,1,2],[3,2,1]],
            "parking_to_dropoff": [[1,2,3],[2,1,2],[3,2,1]],
            "parking_capacities": [1,1,1],
            "dropoff_coords": [{"lat":0.0,"lon":0.0},{"lat":0.0,"lon":0.0},{"lat":0.0,"lon":0.0}],
            "parking_coords": [{"lat":0.0,"lon":0.0},{"lat":0.0,"lon":0.0},{"lat":0.0,"lon":0.0}]
        }"#
    }

    #[test]
    fn loads_and_computes_smallest_round_trips() {
        let env = Environment::from_json_str(three_by_three_json()).unwrap();
        assert_eq!(env.number_of_dropoffs(), 3);
        assert_eq!(env.number_of_parkings(), 3);
        // Dropoff 0: min over p of d2p[0][p] + p2d[p][0] = min(1+1, 2+2, 3+3) = 2.
        assert_eq!(env.smallest_round_trips(), &[2, 2, 2]);
    }

    #[test]
    fn rejects_mismatched_matrix_dimensions() {
        let bad = r#"{
            "dropoff_to_parking": [[1,2],[2,1]],
            "parking_to_dropoff": [[1,2,3],[2,1,2],[3,2,1]],
            "parking_capacities": [1,1,1],
            "dropoff_coords": [{"lat":0.0,"lon":0.0},{"lat":0.0,"lon":0.0}],
            "parking_coords": [{"lat":0.0,"lon":0.0},{"lat":0.0,"lon":0.0},{"lat":0.0,"lon":0.0}]
        }"#;
        assert!(Environment::from_json_str(bad).is_err());
    }

    #[test]
    fn clone_is_independent() {
        let mut env = Environment::from_json_str(three_by_three_json()).unwrap();
        let mut other = env.clone();
        env.available_parking_spots_mut()[0] = 0;
        assert_eq!(other.available_parking_spots()[0], 1);
        other.available_parking_spots_mut()[0] = 9;
        assert_eq!(env.available_parking_spots()[0], 0);
    }
}
