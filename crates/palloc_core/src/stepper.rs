//! The simulation stepper: advances one run through its fixed horizon of
//! discrete minute timesteps, ageing trips and requests, generating new
//! arrivals, and invoking the batch scheduler at batch boundaries.

use crate::environment::Environment;
use crate::error::PallocError;
use crate::generator::RequestGenerator;
use crate::request::Request;
use crate::result::Result as RunResult;
use crate::scheduler::schedule_batch;
use crate::settings::SimulatorSettings;
use crate::trace::{Assignment, Trace};
use crate::trip::Trip;

/// One independent simulation run, owning its own mutable clone of the
/// environment and its own seeded generator.
pub struct Simulation {
    env: Environment,
    generator: RequestGenerator,
    settings: SimulatorSettings,
    record_trace: bool,

    unassigned_requests: Vec<Request>,
    early_requests: Vec<Request>,
    requests_buffer: Vec<Request>,
    trips: Vec<Trip>,
    trace_list: Vec<Trace>,

    dropped_requests: u64,
    requests_scheduled: u64,
    requests_unassigned: u64,
    requests_died_unassigned: u64,
    processed_requests: u64,
    total_run_duration: u64,
    total_run_cost: f64,
    total_run_variables: u64,
}

impl Simulation {
    pub fn new(
        env: Environment,
        settings: SimulatorSettings,
        seed: u64,
        record_trace: bool,
    ) -> Result<Self, PallocError> {
        let generator = RequestGenerator::new(
            env.number_of_dropoffs(),
            settings.max_time_till_arrival,
            settings.max_request_duration,
            seed,
            settings.request_rate,
            &settings.random_generator,
        )?;

        let expected_requests = (settings.timesteps as usize)
            * (settings.request_rate.ceil() as usize).max(1);

        Ok(Self {
            env,
            generator,
            settings,
            record_trace,
            unassigned_requests: Vec::new(),
            early_requests: Vec::new(),
            requests_buffer: Vec::with_capacity(expected_requests),
            trips: Vec::new(),
            trace_list: Vec::new(),
            dropped_requests: 0,
            requests_scheduled: 0,
            requests_unassigned: 0,
            requests_died_unassigned: 0,
            processed_requests: 0,
            total_run_duration: 0,
            total_run_cost: 0.0,
            total_run_variables: 0,
        })
    }

    /// Advance through the full horizon and return the per-run result.
    pub fn run(mut self) -> Result<RunResult, PallocError> {
        for t in 1..=self.settings.timesteps {
            let mut new_assignments = Vec::new();

            let current_time_of_day = (self.settings.start_time + t - 1) % 1440;

            self.age_trips();
            self.age_unassigned_requests();
            self.age_early_requests();

            let generated = self.generator.generate(current_time_of_day);
            self.requests_buffer.extend(generated);

            self.prune_impossible_requests();

            let is_batch_boundary =
                t % self.settings.batch_interval == 0 || t == self.settings.timesteps;

            if is_batch_boundary {
                self.requests_buffer
                    .append(&mut std::mem::take(&mut self.unassigned_requests));
                self.requests_buffer
                    .append(&mut std::mem::take(&mut self.early_requests));

                if !self.requests_buffer.is_empty() {
                    let batch = std::mem::take(&mut self.requests_buffer);
                    let result = schedule_batch(&mut self.env, batch, &self.settings)?;

                    self.dropped_requests += result.unassigned_requests.len() as u64;
                    self.requests_scheduled += result.trips.len() as u64;
                    self.processed_requests += result.processed_requests as u64;
                    self.total_run_duration += result.total_duration;
                    self.total_run_cost += result.total_cost;
                    self.total_run_variables += result.variable_count as u64;

                    if self.record_trace {
                        for trip in &result.trips {
                            new_assignments.push(Assignment {
                                dropoff_coordinate: self.env.dropoff_coords()[trip.dropoff_node()],
                                parking_coordinate: self.env.parking_coords()[trip.parking_node()],
                                request_duration: trip.request_duration(),
                                route_duration: trip.route_duration(),
                            });
                        }
                    }

                    self.unassigned_requests = result.unassigned_requests;
                    self.early_requests = result.early_requests;
                    self.trips.extend(result.trips);
                }
            }

            if self.record_trace {
                let average_cost = if self.requests_scheduled > 0 {
                    self.total_run_cost / self.requests_scheduled as f64
                } else {
                    0.0
                };
                let average_duration = if self.requests_scheduled > 0 {
                    self.total_run_duration as f64 / self.requests_scheduled as f64
                } else {
                    0.0
                };
                self.trace_list.push(Trace {
                    timestep: t,
                    current_time_of_day,
                    number_of_requests: self.requests_buffer.len(),
                    number_of_ongoing_trips: self.trips.len(),
                    available_parking_spots: self.env.total_available_capacity(),
                    average_cost,
                    average_duration,
                    dropped_requests: self.dropped_requests as usize,
                    early_requests: self.early_requests.len(),
                    assignments: new_assignments,
                });
            }
        }

        // Requests still live at the horizon: deferred forever, or mid-trip.
        // Per P5 these are neither "scheduled" nor "unassigned" — they're a
        // third bucket the run simply ran out of time to resolve.
        let requests_still_alive_at_horizon = (self.unassigned_requests.len()
            + self.early_requests.len()
            + self.trips.len()) as u64;

        Ok(RunResult {
            trace_list: self.trace_list,
            sim_settings: self.settings,
            dropped_requests: self.dropped_requests,
            total_run_duration: self.total_run_duration,
            total_run_cost: self.total_run_cost,
            total_run_variables: self.total_run_variables,
            requests_generated: self.generator.requests_generated(),
            requests_scheduled: self.requests_scheduled,
            requests_unassigned: self.requests_died_unassigned,
            requests_still_alive_at_horizon,
            processed_requests: self.processed_requests,
        })
    }

    fn age_trips(&mut self) {
        let env = &mut self.env;
        self.trips.retain_mut(|trip| !trip.age(env));
    }

    fn age_unassigned_requests(&mut self) {
        for request in &mut self.unassigned_requests {
            request.decrement_duration();
        }
        let before = self.unassigned_requests.len();
        self.unassigned_requests.retain(|r| !r.is_dead());
        let died = before - self.unassigned_requests.len();
        self.requests_died_unassigned += died as u64;
    }

    fn age_early_requests(&mut self) {
        for request in &mut self.early_requests {
            if request.is_early() {
                request.decrement_till_arrival();
            }
        }
    }

    fn prune_impossible_requests(&mut self) {
        let smallest_round_trips = self.env.smallest_round_trips();
        self.requests_buffer
            .retain(|r| r.request_duration() >= smallest_round_trips[r.dropoff_node()]);
    }
}
