//! Per-timestep request generation: Poisson arrival counts driven by a
//! time-of-day traffic weight, with uniform dropoff/arrival sampling and
//! bucketed duration sampling.

use rand::Rng;
use rand_distr::{Distribution, Poisson};

use crate::distributions::{DurationDistribution, TRAFFIC_WEIGHTS};
use crate::error::PallocError;
use crate::request::Request;
use crate::rng::RandomEngine;

/// Single-threaded per-run generator. Each Monte Carlo worker constructs its
/// own instance, seeded `seed + run_index`, so runs are independent.
#[derive(Debug)]
pub struct RequestGenerator {
    dropoff_nodes: usize,
    max_time_till_arrival: u32,
    duration_dist: DurationDistribution,
    request_rate: f64,
    rng: RandomEngine,
    requests_generated: u64,
}

impl RequestGenerator {
    pub fn new(
        dropoff_nodes: usize,
        max_time_till_arrival: u32,
        max_request_duration: u32,
        seed: u64,
        request_rate: f64,
        random_generator_name: &str,
    ) -> Result<Self, PallocError> {
        if dropoff_nodes == 0 {
            return Err(PallocError::Input(
                "environment has zero dropoff nodes".into(),
            ));
        }
        if request_rate <= 0.0 {
            return Err(PallocError::Input(
                "request-rate must be positive".into(),
            ));
        }
        Ok(Self {
            dropoff_nodes,
            max_time_till_arrival,
            duration_dist: DurationDistribution::new(max_request_duration),
            request_rate,
            rng: RandomEngine::by_name(random_generator_name, seed)?,
            requests_generated: 0,
        })
    }

    pub fn requests_generated(&self) -> u64 {
        self.requests_generated
    }

    /// Produce this timestep's new requests. `current_time_of_day` is
    /// minutes since midnight, `[0, 1439]`.
    pub fn generate(&mut self, current_time_of_day: u32) -> Vec<Request> {
        let hour = (current_time_of_day / 60).min(23) as usize;
        let mean = self.request_rate * TRAFFIC_WEIGHTS[hour];
        if mean <= 0.0 {
            return Vec::new();
        }
        let poisson = Poisson::new(mean).expect("mean is positive and finite");
        let count = poisson.sample(&mut self.rng).round() as u64;

        let mut batch = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let dropoff = self.rng.gen_range(0..self.dropoff_nodes);
            let duration = self.duration_dist.sample(&mut self.rng);
            let till_arrival = if self.max_time_till_arrival == 0 {
                0
            } else {
                self.rng.gen_range(0..=self.max_time_till_arrival)
            };
            batch.push(Request::new(dropoff, duration, till_arrival));
        }
        self.requests_generated += count;
        batch
    }
}
