//! Performance benchmarks for palloc_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use palloc_core::environment::Environment;
use palloc_core::settings::SimulatorSettings;
use palloc_core::stepper::Simulation;

const BENCH_ENV_JSON: &str = r#"{
    "dropoff_to_parking": [[1,2,3],[2,1,2],[3,2,1]],
    "parking_to_dropoff": [[1,2,3],[2,1,2],[3,2,1]],
    "parking_capacities": [20,20,20],
    "dropoff_coords": [{"lat":0.0,"lon":0.0},{"lat":1.0,"lon":1.0},{"lat":2.0,"lon":2.0}],
    "parking_coords": [{"lat":0.1,"lon":0.1},{"lat":1.1,"lon":1.1},{"lat":2.1,"lon":2.1}]
}"#;

fn bench_simulation_run(c: &mut Criterion) {
    let scenarios = vec![("low_rate", 2.0), ("medium_rate", 10.0), ("high_rate", 30.0)];

    let mut group = c.benchmark_group("simulation_run");
    for (name, rate) in scenarios {
        group.bench_with_input(BenchmarkId::from_parameter(name), &rate, |b, &rate| {
            b.iter(|| {
                let env = Environment::from_json_str(BENCH_ENV_JSON).unwrap();
                let settings = SimulatorSettings {
                    timesteps: 500,
                    start_time: 0,
                    max_request_duration: 200,
                    max_time_till_arrival: 5,
                    minimum_parking_time: 0,
                    request_rate: rate,
                    batch_interval: 15,
                    commit_interval: 0,
                    weighted_parking: false,
                    random_generator: "pcg".to_string(),
                    seed: 42,
                };
                let sim = Simulation::new(env, settings, 42, false).unwrap();
                black_box(sim.run().unwrap());
            });
        });
    }
    group.finish();
}

fn bench_random_generators(c: &mut Criterion) {
    use palloc_core::rng::RandomEngine;
    use rand::RngCore;

    let mut group = c.benchmark_group("random_generators");
    for name in ["pcg", "pcg-fast"] {
        group.bench_function(name, |b| {
            let mut rng = RandomEngine::by_name(name, 7).unwrap();
            b.iter(|| black_box(rng.next_u32()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_simulation_run, bench_random_generators);
criterion_main!(benches);
