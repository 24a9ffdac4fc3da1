//! Sample point selection
//!
//! Reduces a dense route timeline to a bounded set of points worth a
//! weather lookup: the departure, one point per spacing interval, and the
//! destination.

use std::time::Duration;

use tracing::{debug, warn};

use crate::geo;
use crate::models::TimedPoint;

/// How far apart two consecutive samples must be
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spacing {
    /// Elapsed travel time between samples
    Time(Duration),
    /// Distance travelled along the route between samples, in meters
    Distance(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePolicy {
    pub spacing: Spacing,
    /// Upper bound on emitted samples; values below 2 are treated as 2 so
    /// that both trip ends are always covered
    pub max_samples: usize,
}

impl SamplePolicy {
    #[must_use]
    pub fn every(interval: Duration, max_samples: usize) -> Self {
        Self {
            spacing: Spacing::Time(interval),
            max_samples,
        }
    }

    #[must_use]
    pub fn every_meters(meters: f64, max_samples: usize) -> Self {
        Self {
            spacing: Spacing::Distance(meters),
            max_samples,
        }
    }
}

impl Default for SamplePolicy {
    fn default() -> Self {
        Self::every(Duration::from_secs(60 * 60), 24)
    }
}

pub struct SamplePointSelector;

impl SamplePointSelector {
    /// Pick an order-preserving subsequence of `timeline`.
    ///
    /// The first point is always emitted, then each point at least one
    /// spacing past the previously emitted one, and the last point is forced
    /// in. If that exceeds `max_samples` the spacing is widened once and the
    /// scan repeated.
    #[must_use]
    pub fn select(timeline: &[TimedPoint], policy: &SamplePolicy) -> Vec<TimedPoint> {
        if timeline.is_empty() {
            return Vec::new();
        }

        let max_samples = policy.max_samples.max(2);
        let (positions, spacing) = match policy.spacing {
            Spacing::Time(interval) => {
                let start = timeline[0].arrival_time;
                let positions = timeline
                    .iter()
                    .map(|p| (p.arrival_time - start).num_milliseconds() as f64 / 1000.0)
                    .collect::<Vec<_>>();
                (positions, interval.as_secs_f64())
            }
            Spacing::Distance(meters) => (
                geo::cumulative_distances(timeline.iter().map(|p| &p.coordinate)),
                meters.max(0.0),
            ),
        };

        let mut picked = scan(&positions, spacing);

        if picked.len() > max_samples {
            let span = positions[positions.len() - 1] - positions[0];
            let widened = (spacing * picked.len() as f64 / max_samples as f64)
                .max(span / (max_samples - 1) as f64);
            debug!(
                "{} samples exceed the limit of {}, widening spacing {:.0} -> {:.0}",
                picked.len(),
                max_samples,
                spacing,
                widened
            );
            picked = scan(&positions, widened);

            if picked.len() > max_samples {
                warn!(
                    "Still {} samples after widening, thinning evenly to {}",
                    picked.len(),
                    max_samples
                );
                picked = thin(&picked, max_samples);
            }
        }

        debug!(
            "Selected {} of {} timeline points",
            picked.len(),
            timeline.len()
        );
        picked.into_iter().map(|i| timeline[i]).collect()
    }
}

/// Greedy pass over monotone `positions`; returns the emitted indices.
fn scan(positions: &[f64], spacing: f64) -> Vec<usize> {
    let last_index = positions.len() - 1;
    let mut picked = vec![0];
    let mut last_emitted = positions[0];

    for (i, &position) in positions.iter().enumerate().skip(1) {
        if position - last_emitted >= spacing {
            picked.push(i);
            last_emitted = position;
        }
    }

    if picked.last() != Some(&last_index) {
        picked.push(last_index);
    }
    picked
}

/// Keep `count` entries of `picked` at evenly spread ranks, first and last included.
fn thin(picked: &[usize], count: usize) -> Vec<usize> {
    let stride = (picked.len() - 1) as f64 / (count - 1) as f64;
    (0..count)
        .map(|k| picked[(k as f64 * stride).round() as usize])
        .collect()
}
