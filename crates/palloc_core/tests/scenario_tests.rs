use palloc_core::environment::Environment;
use palloc_core::settings::{GeneralSettings, OutputSettings, SimulatorSettings};
use palloc_core::driver::run_monte_carlo;

const TEST_ENV_JSON: &str = r#"{
    "dropoff_to_parking": [[1,2,3],[2,1,2],[3,2,1]],
    "parking_to_dropoff": [[1,2,3],[2,1,2],[3,2,1]],
    "parking_capacities": [1,1,1],
    "dropoff_coords": [{"lat":0.0,"lon":0.0},{"lat":1.0,"lon":1.0},{"lat":2.0,"lon":2.0}],
    "parking_coords": [{"lat":0.1,"lon":0.1},{"lat":1.1,"lon":1.1},{"lat":2.1,"lon":2.1}]
}"#;

fn env() -> Environment {
    Environment::from_json_str(TEST_ENV_JSON).unwrap()
}

fn settings(timesteps: u32, seed: u64) -> SimulatorSettings {
    SimulatorSettings {
        timesteps,
        start_time: 0,
        max_request_duration: 200,
        max_time_till_arrival: 5,
        minimum_parking_time: 0,
        request_rate: 2.0,
        batch_interval: 5,
        commit_interval: 0,
        weighted_parking: false,
        random_generator: "pcg".to_string(),
        seed,
    }
}

#[test]
fn full_run_conserves_request_counts() {
    let output = OutputSettings {
        output_path: None,
        number_of_runs_to_aggregate: 3,
        prettify: false,
        output_trace: false,
    };
    let general = GeneralSettings {
        number_of_threads: Some(2),
    };
    let aggregated = run_monte_carlo(&env(), &settings(500, 11), &output, &general).unwrap();

    assert_eq!(
        aggregated.requests_generated,
        aggregated.requests_scheduled
            + aggregated.requests_unassigned
            + aggregated.requests_still_alive_at_horizon
    );
    assert!(aggregated.avg_cost >= 0.0);
    assert!(aggregated.avg_duration >= 0.0);
}

#[test]
fn determinism_across_identical_single_run_seeds() {
    let output = OutputSettings {
        output_path: None,
        number_of_runs_to_aggregate: 1,
        prettify: false,
        output_trace: true,
    };
    let general = GeneralSettings {
        number_of_threads: Some(1),
    };

    let a = run_monte_carlo(&env(), &settings(1000, 1), &output, &general).unwrap();
    let b = run_monte_carlo(&env(), &settings(1000, 1), &output, &general).unwrap();

    assert_eq!(a.requests_generated, b.requests_generated);
    assert_eq!(a.requests_scheduled, b.requests_scheduled);
    assert_eq!(a.requests_unassigned, b.requests_unassigned);
    assert_eq!(
        a.requests_still_alive_at_horizon,
        b.requests_still_alive_at_horizon
    );
    assert_eq!(a.total_dropped_requests, b.total_dropped_requests);
    assert_eq!(a.avg_cost, b.avg_cost);
    assert_eq!(a.avg_duration, b.avg_duration);
    assert_eq!(a.traces, b.traces);
}

#[test]
fn trace_consistency_when_batch_leaves_no_pending_requests() {
    let output = OutputSettings {
        output_path: None,
        number_of_runs_to_aggregate: 1,
        prettify: false,
        output_trace: true,
    };
    let general = GeneralSettings {
        number_of_threads: Some(1),
    };
    let aggregated = run_monte_carlo(&env(), &settings(300, 3), &output, &general).unwrap();
    let total_capacity = env().total_initial_capacity();

    for run_trace in &aggregated.traces {
        for trace in run_trace {
            if trace.number_of_requests == 0 {
                assert_eq!(
                    trace.available_parking_spots + trace.number_of_ongoing_trips as u64,
                    total_capacity
                );
            }
        }
    }
}

#[test]
fn rejects_zero_timesteps() {
    let bad = SimulatorSettings {
        timesteps: 0,
        ..settings(100, 1)
    };
    assert!(bad.validate().is_err());
}

#[test]
fn rejects_out_of_range_request_rate() {
    let bad = SimulatorSettings {
        request_rate: 0.0,
        ..settings(100, 1)
    };
    assert!(bad.validate().is_err());
}
