//! Batch scheduler: builds and solves the per-batch integer program binding
//! requests to parkings, then folds the solution back into trips and the
//! unassigned/early buffers.

use good_lp::solvers::coin_cbc::coin_cbc;
use good_lp::{constraint, variable, Expression, ProblemVariables, Solution, SolverModel, Variable};

use crate::environment::Environment;
use crate::error::PallocError;
use crate::request::Request;
use crate::settings::SimulatorSettings;
use crate::trip::Trip;

const UNASSIGNED_PENALTY: u32 = 1000;
const MAX_SEARCH_TIME_SECS: u32 = 60;

/// Outcome of scheduling one batch of requests.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub trips: Vec<Trip>,
    pub unassigned_requests: Vec<Request>,
    pub early_requests: Vec<Request>,
    pub total_duration: u64,
    pub total_cost: f64,
    pub processed_requests: usize,
    pub variable_count: usize,
}

/// Solve the assignment problem for `requests` against `env`'s live
/// capacities, and mutate `env.available_parking_spots` for every request
/// that gets a trip. Returns an error only if the solver itself fails to
/// reach `Optimal`/`Feasible` — since `u[i] = 1` for all `i` is always a
/// feasible solution, that indicates a modeling bug, not infeasible input.
pub fn schedule_batch(
    env: &mut Environment,
    requests: Vec<Request>,
    settings: &SimulatorSettings,
) -> Result<BatchResult, PallocError> {
    let n = requests.len();
    let p = env.number_of_parkings();

    if n == 0 {
        return Ok(BatchResult::default());
    }

    let mut vars = ProblemVariables::new();
    let x: Vec<Vec<Variable>> = (0..n)
        .map(|_| (0..p).map(|_| vars.add(variable().binary())).collect())
        .collect();
    let u: Vec<Variable> = (0..n).map(|_| vars.add(variable().binary())).collect();

    let mut route_durations = vec![vec![0u32; p]; n];
    let mut infeasible = vec![vec![false; p]; n];
    let mut objective = Expression::from(0);

    for i in 0..n {
        let d = requests[i].dropoff_node();
        let r = requests[i].request_duration();
        let penalty = (UNASSIGNED_PENALTY as u64) * (1 + requests[i].times_dropped() as u64);
        objective += penalty as f64 * u[i];

        for j in 0..p {
            let rho = env.dropoff_to_parking()[d][j] + env.parking_to_dropoff()[j][d];
            route_durations[i][j] = rho;
            infeasible[i][j] = rho + settings.minimum_parking_time > r;

            let weight = if settings.weighted_parking {
                env.parking_weights().get(j).copied().unwrap_or(1.0)
            } else {
                1.0
            };
            let cost = ((rho as f64) * weight).round();
            objective += cost * x[i][j];
        }
    }

    let mut problem = coin_cbc(vars.minimise(objective));
    problem.set_parameter("seconds", &MAX_SEARCH_TIME_SECS.to_string());
    problem.set_parameter("threads", "1");
    problem.set_parameter("logLevel", "0");

    for i in 0..n {
        let row_sum: Expression = (0..p).map(|j| x[i][j]).sum();
        let partition = Expression::from(u[i]) + row_sum;
        problem.add_constraint(constraint!(partition == 1));

        for j in 0..p {
            if infeasible[i][j] {
                problem.add_constraint(constraint!(x[i][j] == 0));
            }
        }
    }

    for j in 0..p {
        let capacity = env.available_parking_spots()[j] as f64;
        let column: Expression = (0..n).map(|i| x[i][j]).sum();
        problem.add_constraint(constraint!(column <= capacity));
    }

    let variable_count = n * (p + 1);

    let solution = problem.solve().map_err(|e| PallocError::Solver {
        status: e.to_string(),
        request_count: n,
    })?;

    let mut result = BatchResult {
        processed_requests: n,
        variable_count,
        ..Default::default()
    };
    let mut total_cost = 0.0;

    for (i, request) in requests.into_iter().enumerate() {
        let assigned = (0..p).find(|&j| solution.value(x[i][j]).round() > 0.5);

        let penalty = (UNASSIGNED_PENALTY as u64) * (1 + request.times_dropped() as u64);
        if let Some(j) = assigned {
            let weight = if settings.weighted_parking {
                env.parking_weights().get(j).copied().unwrap_or(1.0)
            } else {
                1.0
            };
            total_cost += ((route_durations[i][j] as f64) * weight).round();
        } else {
            total_cost += penalty as f64;
        }

        let till_arrival = request.till_arrival();
        if till_arrival > settings.commit_interval {
            result.early_requests.push(request);
            continue;
        }

        match assigned {
            Some(j) => {
                let rho = route_durations[i][j];
                result.total_duration += rho as u64;
                env.available_parking_spots_mut()[j] -= 1;
                result.trips.push(Trip::new(
                    request.dropoff_node(),
                    j,
                    request.request_duration(),
                    till_arrival,
                    rho,
                ));
            }
            None => {
                if till_arrival > 0 {
                    result.early_requests.push(request);
                } else {
                    let mut request = request;
                    request.increment_times_dropped();
                    result.unassigned_requests.push(request);
                }
            }
        }
    }

    result.total_cost = total_cost;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_env() -> Environment {
        Environment::from_json_str(
            r#"{
                "dropoff_to_parking": [[1,2,3],[2,1,2],[3,2,1]],
                "parking_to_dropoff": [[1,2,3],[2,1,2],[3,2,1]],
                "parking_capacities": [1,1,1],
                "dropoff_coords": [{"lat":0.0,"lon":0.0},{"lat":0.0,"lon":0.0},{"lat":0.0,"lon":0.0}],
                "parking_coords": [{"lat":0.0,"lon":0.0},{"lat":0.0,"lon":0.0},{"lat":0.0,"lon":0.0}]
            }"#,
        )
        .unwrap()
    }

    fn default_settings() -> SimulatorSettings {
        SimulatorSettings {
            timesteps: 1,
            start_time: 0,
            max_request_duration: 5000,
            max_time_till_arrival: 10,
            minimum_parking_time: 0,
            request_rate: 1.0,
            batch_interval: 1,
            commit_interval: 0,
            weighted_parking: false,
            random_generator: "pcg".to_string(),
            seed: 1,
        }
    }

    #[test]
    fn assignable_request_scheduled_at_minimum_cost() {
        let mut env = test_env();
        let result = schedule_batch(
            &mut env,
            vec![Request::new(0, 10, 0)],
            &default_settings(),
        )
        .unwrap();
        assert_eq!(result.trips.len(), 1);
        assert!(result.unassigned_requests.is_empty());
        assert!(result.early_requests.is_empty());
        assert_eq!(result.total_cost, 2.0);
    }

    #[test]
    fn early_request_deferred_without_consuming_capacity() {
        let mut env = test_env();
        let mut settings = default_settings();
        settings.commit_interval = 0;
        let result = schedule_batch(&mut env, vec![Request::new(1, 5, 1)], &settings).unwrap();
        assert!(result.trips.is_empty());
        assert!(result.unassigned_requests.is_empty());
        assert_eq!(result.early_requests.len(), 1);
        assert_eq!(env.available_parking_spots(), &[1, 1, 1]);
    }

    #[test]
    fn infeasible_request_is_unassigned_at_penalty_cost() {
        let mut env = test_env();
        let result = schedule_batch(&mut env, vec![Request::new(1, 1, 0)], &default_settings())
            .unwrap();
        assert!(result.trips.is_empty());
        assert_eq!(result.unassigned_requests.len(), 1);
        assert_eq!(result.unassigned_requests[0].times_dropped(), 1);
        assert_eq!(result.total_cost, 1000.0);
    }

    #[test]
    fn capacity_overflow_leaves_exactly_one_unassigned() {
        let mut env = test_env();
        let requests = vec![
            Request::new(1, 7, 0),
            Request::new(1, 7, 0),
            Request::new(1, 7, 0),
            Request::new(1, 7, 0),
        ];
        let result = schedule_batch(&mut env, requests, &default_settings()).unwrap();
        assert_eq!(result.trips.len(), 3);
        assert_eq!(result.unassigned_requests.len(), 1);
        assert!(result.total_cost > 1000.0 && result.total_cost < 2000.0);
    }
}
