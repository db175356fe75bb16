//! Fixed tables and derived distributions feeding the request generator:
//! the 24-hour traffic-weight table and the duration-bucket distribution.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Hour-of-day multipliers (Aalborg TomTom-derived), each already divided by
/// 365 so `TRAFFIC_WEIGHTS[h] * lambda` is directly usable as a Poisson mean.
pub const TRAFFIC_WEIGHTS: [f64; 24] = [
    78.0 / 365.0,
    66.0 / 365.0,
    51.0 / 365.0,
    69.0 / 365.0,
    39.0 / 365.0,
    78.0 / 365.0,
    246.0 / 365.0,
    708.0 / 365.0,
    558.0 / 365.0,
    432.0 / 365.0,
    501.0 / 365.0,
    540.0 / 365.0,
    582.0 / 365.0,
    585.0 / 365.0,
    690.0 / 365.0,
    915.0 / 365.0,
    705.0 / 365.0,
    501.0 / 365.0,
    381.0 / 365.0,
    297.0 / 365.0,
    264.0 / 365.0,
    213.0 / 365.0,
    156.0 / 365.0,
    105.0 / 365.0,
];

/// `(start, end)` minute ranges, end-inclusive, with the last bucket
/// open-ended (represented as `u32::MAX`).
const DURATION_BUCKETS: [(u32, u32); 7] = [
    (0, 60),
    (61, 120),
    (121, 240),
    (241, 480),
    (481, 1440),
    (1441, 2880),
    (2881, u32::MAX),
];

const DURATION_BUCKET_WEIGHTS: [f64; 7] = [0.14, 0.13, 0.11, 0.17, 0.28, 0.09, 0.08];

/// Duration sampler: picks a bucket via a weighted discrete distribution,
/// then a uniform integer inside it. Buckets that run past `max_duration`
/// are reweighted down to their covered fraction; buckets entirely past
/// `max_duration` are dropped.
#[derive(Debug, Clone)]
pub struct DurationDistribution {
    buckets: Vec<(u32, u32)>,
    index: WeightedIndex<f64>,
}

impl DurationDistribution {
    pub fn new(max_duration: u32) -> Self {
        let mut buckets = Vec::new();
        let mut weights = Vec::new();

        for (&(start, end), &weight) in DURATION_BUCKETS.iter().zip(DURATION_BUCKET_WEIGHTS.iter())
        {
            if start > max_duration {
                continue;
            }
            let clamped_end = end.min(max_duration);
            // The last bucket is open-ended (`end == u32::MAX`): it has no finite
            // span to scale against, so it keeps its full weight whenever it's
            // reachable at all (`start <= max_duration`, checked above).
            let scaled_weight = if end == u32::MAX {
                weight
            } else {
                let full_span = end.saturating_sub(start).saturating_add(1) as f64;
                let covered_span = clamped_end.saturating_sub(start).saturating_add(1) as f64;
                weight * (covered_span / full_span)
            };
            buckets.push((start, clamped_end));
            weights.push(scaled_weight);
        }

        let index = WeightedIndex::new(&weights).expect("at least one bucket survives max_duration >= 0");
        Self { buckets, index }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> u32 {
        let (start, end) = self.buckets[self.index.sample(rng)];
        rng.gen_range(start..=end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Pcg32;

    #[test]
    fn traffic_weights_peak_at_rush_hour() {
        assert!(TRAFFIC_WEIGHTS[15] > TRAFFIC_WEIGHTS[4]);
    }

    #[test]
    fn samples_stay_within_max_duration() {
        let dist = DurationDistribution::new(100);
        let mut rng = Pcg32::new(1);
        for _ in 0..500 {
            let d = dist.sample(&mut rng);
            assert!(d <= 100, "duration {d} out of [0, 100]");
        }
    }

    #[test]
    fn full_duration_range_covers_last_bucket() {
        let dist = DurationDistribution::new(5000);
        let mut rng = Pcg32::new(2);
        let samples: Vec<u32> = (0..200).map(|_| dist.sample(&mut rng)).collect();
        assert!(samples.iter().any(|&d| d > 2880));
    }
}
