//! # Parking Allocation Simulation Core
//!
//! A discrete-timestep simulation engine for capacitated parking dispatch.
//!
//! ## Overview
//!
//! This crate provides the core simulation engine, including:
//!
//! - **Request Generation**: time-of-day-weighted Poisson arrivals with
//!   bucketed duration sampling
//! - **Batch Scheduler**: an integer program binding requests to parking
//!   spots under capacity and feasibility constraints
//! - **Simulation Stepper**: per-timestep trip and request ageing
//! - **Monte Carlo Driver**: parallel independent runs with Kahan-summed
//!   aggregation
//!
//! ## Key Concepts
//!
//! - **Deterministic**: seeded PRNGs ensure reproducible results per seed
//! - **Batch-oriented**: assignment decisions are made jointly, not greedily,
//!   at fixed batch boundaries
//!
//! ## Example
//!
//! ```rust,no_run
//! use palloc_core::environment::Environment;
//! use palloc_core::settings::{GeneralSettings, OutputSettings, SimulatorSettings};
//! use palloc_core::driver::run_monte_carlo;
//!
//! let env = Environment::load("environment.json").unwrap();
//! let settings = SimulatorSettings {
//!     timesteps: 1440,
//!     start_time: 0,
//!     max_request_duration: 1440,
//!     max_time_till_arrival: 30,
//!     minimum_parking_time: 0,
//!     request_rate: 10.0,
//!     batch_interval: 15,
//!     commit_interval: 0,
//!     weighted_parking: false,
//!     random_generator: "pcg".to_string(),
//!     seed: 1,
//! };
//! let output = OutputSettings {
//!     output_path: None,
//!     number_of_runs_to_aggregate: 4,
//!     prettify: false,
//!     output_trace: false,
//! };
//! let general = GeneralSettings { number_of_threads: None };
//! let aggregated = run_monte_carlo(&env, &settings, &output, &general).unwrap();
//! println!("{}", aggregated.avg_cost);
//! ```

pub mod distributions;
pub mod driver;
pub mod environment;
pub mod error;
pub mod generator;
pub mod request;
pub mod result;
pub mod rng;
pub mod scheduler;
pub mod settings;
pub mod stepper;
pub mod trace;
pub mod trip;
pub mod types;
