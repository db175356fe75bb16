//! Per-run and aggregated-across-runs result records, plus the Kahan-summed
//! aggregation the driver uses to combine them.

use serde::{Deserialize, Serialize};

use crate::settings::SimulatorSettings;
use crate::trace::Trace;

/// One completed simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Result {
    pub trace_list: Vec<Trace>,
    pub sim_settings: SimulatorSettings,
    pub dropped_requests: u64,
    pub total_run_duration: u64,
    pub total_run_cost: f64,
    pub total_run_variables: u64,
    pub requests_generated: u64,
    pub requests_scheduled: u64,
    pub requests_unassigned: u64,
    pub requests_still_alive_at_horizon: u64,
    pub processed_requests: u64,
}

/// Sums `values` with Kahan compensation. Required because `T` (and so the
/// number of summed batch totals) can reach the thousands, where naive
/// summation visibly drifts.
pub fn kahan_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for value in values {
        let y = value - c;
        let t = sum + y;
        c = (t - sum) - y;
        sum = t;
    }
    sum
}

/// Combined statistics across `R` independent runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub total_dropped_requests: u64,
    pub avg_duration: f64,
    pub avg_cost: f64,
    pub avg_var_count: f64,
    pub requests_generated: u64,
    pub requests_scheduled: u64,
    pub requests_unassigned: u64,
    pub requests_still_alive_at_horizon: u64,
    pub time_elapsed: f64,
    pub settings: SimulatorSettings,
    pub traces: Vec<Vec<Trace>>,
}

impl AggregatedResult {
    /// `settings` is taken from the first run (all runs share the same
    /// configuration save for the per-run seed). `time_elapsed` is stamped
    /// by the caller after this is built (wall-clock, not part of the
    /// deterministic content).
    pub fn from_results(results: &[Result], output_trace: bool) -> Self {
        let settings = results
            .first()
            .map(|r| r.sim_settings.clone())
            .expect("at least one run");

        let total_dropped_requests: u64 = results.iter().map(|r| r.dropped_requests).sum();
        let requests_generated: u64 = results.iter().map(|r| r.requests_generated).sum();
        let requests_scheduled: u64 = results.iter().map(|r| r.requests_scheduled).sum();
        let requests_unassigned: u64 = results.iter().map(|r| r.requests_unassigned).sum();
        let requests_still_alive_at_horizon: u64 = results
            .iter()
            .map(|r| r.requests_still_alive_at_horizon)
            .sum();

        let total_duration = kahan_sum(results.iter().map(|r| r.total_run_duration as f64));
        let total_cost = kahan_sum(results.iter().map(|r| r.total_run_cost));
        let total_variables = kahan_sum(results.iter().map(|r| r.total_run_variables as f64));

        let avg_duration = if requests_scheduled > 0 {
            total_duration / requests_scheduled as f64
        } else {
            0.0
        };
        let processed_requests: u64 = results.iter().map(|r| r.processed_requests).sum();
        let avg_cost = if processed_requests > 0 {
            total_cost / processed_requests as f64
        } else {
            0.0
        };
        let total_batch_steps = settings.total_batch_steps().max(1);
        let avg_var_count = total_variables / total_batch_steps as f64;

        let traces = if output_trace {
            results.iter().map(|r| r.trace_list.clone()).collect()
        } else {
            Vec::new()
        };

        Self {
            total_dropped_requests,
            avg_duration,
            avg_cost,
            avg_var_count,
            requests_generated,
            requests_scheduled,
            requests_unassigned,
            requests_still_alive_at_horizon,
            time_elapsed: 0.0,
            settings,
            traces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kahan_sum_matches_naive_sum_for_small_inputs() {
        let values = vec![0.1, 0.2, 0.3];
        assert!((kahan_sum(values) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn kahan_sum_beats_naive_accumulation_over_many_terms() {
        let values: Vec<f64> = std::iter::repeat(0.1).take(10_000).collect();
        let naive: f64 = values.iter().sum();
        let kahan = kahan_sum(values.iter().copied());
        let exact = 1000.0;
        assert!((kahan - exact).abs() <= (naive - exact).abs());
    }
}
