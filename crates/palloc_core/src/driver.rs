//! Monte Carlo run driver: `J` OS threads pull run indices off a shared
//! atomic counter, each runs one independent simulation against its own
//! clone of the environment, and pushes its result behind a single mutex.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::environment::Environment;
use crate::error::PallocError;
use crate::result::{AggregatedResult, Result as RunResult};
use crate::settings::{GeneralSettings, OutputSettings, SimulatorSettings};
use crate::stepper::Simulation;

/// Run `output.number_of_runs_to_aggregate` independent simulations across
/// `general.resolved_thread_count` worker threads and aggregate the results.
pub fn run_monte_carlo(
    env: &Environment,
    settings: &SimulatorSettings,
    output: &OutputSettings,
    general: &GeneralSettings,
) -> Result<AggregatedResult, PallocError> {
    let start = Instant::now();

    let runs = output.number_of_runs_to_aggregate;
    let jobs = general.resolved_thread_count(runs);

    let next_run = Arc::new(AtomicUsize::new(0));
    let results: Arc<Mutex<Vec<RunResult>>> = Arc::new(Mutex::new(Vec::with_capacity(runs as usize)));
    let first_error: Arc<Mutex<Option<PallocError>>> = Arc::new(Mutex::new(None));

    std::thread::scope(|scope| {
        for _ in 0..jobs {
            let next_run = Arc::clone(&next_run);
            let results = Arc::clone(&results);
            let first_error = Arc::clone(&first_error);
            let env = env.clone();
            let settings = settings.clone();
            let record_trace = output.output_trace;
            let base_seed = settings.seed;

            scope.spawn(move || loop {
                let r = next_run.fetch_add(1, Ordering::SeqCst);
                if r >= runs as usize {
                    break;
                }

                let mut run_settings = settings.clone();
                run_settings.seed = base_seed.wrapping_add(r as u64);

                let outcome = Simulation::new(env.clone(), run_settings, base_seed.wrapping_add(r as u64), record_trace)
                    .and_then(Simulation::run);

                match outcome {
                    Ok(result) => results.lock().unwrap().push(result),
                    Err(e) => {
                        let mut slot = first_error.lock().unwrap();
                        if slot.is_none() {
                            *slot = Some(e);
                        }
                    }
                }
            });
        }
    });

    if let Some(e) = first_error.lock().unwrap().take() {
        return Err(e);
    }

    let results = Arc::try_unwrap(results)
        .expect("all worker threads joined")
        .into_inner()
        .unwrap();

    let mut aggregated = AggregatedResult::from_results(&results, output.output_trace);
    aggregated.time_elapsed = start.elapsed().as_secs_f64();
    Ok(aggregated)
}
