//! Run configuration split the way the CLI assembles it: algorithmic
//! settings the simulator needs every timestep, versus output/concurrency
//! settings the driver needs once.

use serde::{Deserialize, Serialize};

use crate::error::PallocError;

/// Everything the stepper and scheduler need to run one simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorSettings {
    pub timesteps: u32,
    pub start_time: u32,
    pub max_request_duration: u32,
    pub max_time_till_arrival: u32,
    pub minimum_parking_time: u32,
    pub request_rate: f64,
    pub batch_interval: u32,
    pub commit_interval: u32,
    pub weighted_parking: bool,
    pub random_generator: String,
    pub seed: u64,
}

impl SimulatorSettings {
    pub fn validate(&self) -> Result<(), PallocError> {
        if self.timesteps == 0 {
            return Err(PallocError::Input("timesteps must be positive".into()));
        }
        if self.start_time >= 1440 {
            return Err(PallocError::Input(
                "start-time must be within [0, 1439] minutes".into(),
            ));
        }
        if self.max_request_duration == 0 {
            return Err(PallocError::Input("duration must be positive".into()));
        }
        if self.request_rate <= 0.0 {
            return Err(PallocError::Input("request-rate must be positive".into()));
        }
        if self.batch_interval == 0 {
            return Err(PallocError::Input("batch-interval must be positive".into()));
        }
        Ok(())
    }

    pub fn total_batch_steps(&self) -> u64 {
        (self.timesteps as u64).div_ceil(self.batch_interval as u64)
    }
}

/// Where and how to write results.
#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub output_path: Option<String>,
    pub number_of_runs_to_aggregate: u32,
    pub prettify: bool,
    pub output_trace: bool,
}

impl OutputSettings {
    pub fn validate(&self) -> Result<(), PallocError> {
        if self.number_of_runs_to_aggregate == 0 {
            return Err(PallocError::Input("aggregate count must be positive".into()));
        }
        Ok(())
    }
}

/// Concurrency knobs for the Monte Carlo driver.
#[derive(Debug, Clone, Copy)]
pub struct GeneralSettings {
    pub number_of_threads: Option<usize>,
}

impl GeneralSettings {
    /// `J = min(available_parallelism, R)` when no explicit `--jobs` override
    /// is given; an explicit override is honored without clamping.
    pub fn resolved_thread_count(&self, number_of_runs: u32) -> usize {
        match self.number_of_threads {
            Some(j) => j.max(1),
            None => {
                let parallelism = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1);
                parallelism.min(number_of_runs as usize).max(1)
            }
        }
    }
}
