//! Route timeline
//!
//! Walks a route step by step and assigns every point of every step's
//! geometry the instant the traveler is expected to pass it.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, instrument};

use crate::WeatherRouteError;
use crate::geo;
use crate::models::{Coordinate, Route, TimedPoint};

pub struct RouteTimeline;

impl RouteTimeline {
    /// Annotate every route point with its expected arrival time.
    ///
    /// Within a step the duration is spread by arc length, falling back to an
    /// even spread by point index when the step has no measurable length.
    /// A step without geometry yields no points but still consumes its
    /// duration. The final point of the route always lands on
    /// `departure + total duration`.
    #[instrument(name = "route_timeline", skip(route), fields(legs = route.legs.len()))]
    pub fn annotate(route: &Route, departure: DateTime<Utc>) -> crate::Result<Vec<TimedPoint>> {
        route.ensure_not_empty()?;

        let mut points = Vec::new();
        let mut elapsed_ms: i64 = 0;

        for step in route.travel_units() {
            let path = step.polyline.decode()?;
            let duration_ms = i64::try_from(step.duration_seconds)
                .ok()
                .and_then(|s| s.checked_mul(1000))
                .ok_or_else(|| {
                    WeatherRouteError::validation(format!(
                        "step duration {}s is out of range",
                        step.duration_seconds
                    ))
                })?;

            for (coordinate, fraction) in path.iter().zip(step_fractions(&path)) {
                let offset = elapsed_ms + (fraction * duration_ms as f64).round() as i64;
                points.push(TimedPoint::new(*coordinate, at_offset(departure, offset)?));
            }

            elapsed_ms = elapsed_ms.checked_add(duration_ms).ok_or_else(|| {
                WeatherRouteError::validation("total route duration is out of range")
            })?;
        }

        // trailing steps without geometry still end at the destination
        let arrival = at_offset(departure, elapsed_ms)?;
        let last = points.pop().ok_or(WeatherRouteError::EmptyRoute)?;
        points.push(TimedPoint::new(last.coordinate, arrival));

        debug!(
            "Annotated {} points, arrival at {}",
            points.len(),
            arrival.to_rfc3339()
        );
        Ok(points)
    }
}

/// Position of each point within its step, from 0.0 (start) to 1.0 (end)
fn step_fractions(path: &[Coordinate]) -> Vec<f64> {
    match path.len() {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let cumulative = geo::cumulative_distances(path);
            let total = cumulative[n - 1];
            if total > 0.0 {
                cumulative.iter().map(|d| d / total).collect()
            } else {
                (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
            }
        }
    }
}

fn at_offset(departure: DateTime<Utc>, offset_ms: i64) -> crate::Result<DateTime<Utc>> {
    departure
        .checked_add_signed(Duration::milliseconds(offset_ms))
        .ok_or_else(|| WeatherRouteError::validation("arrival time is out of range"))
}
