//! Great-circle distance helpers

use crate::models::Coordinate;

/// Great-circle distance between two coordinates in meters
#[must_use]
pub fn distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.latitude(),
            longitude: from.longitude(),
        },
        haversine::Location {
            latitude: to.latitude(),
            longitude: to.longitude(),
        },
        haversine::Units::Kilometers,
    ) * 1000.0
}

/// Cumulative distance from the first point to each point of `path`.
///
/// The result has the same length as `path` and starts at 0.
#[must_use]
pub fn cumulative_distances<'a, I>(path: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let mut out = Vec::new();
    let mut total = 0.0;
    let mut prev: Option<&Coordinate> = None;
    for c in path {
        if let Some(p) = prev {
            total += distance_meters(p, c);
        }
        out.push(total);
        prev = Some(c);
    }
    out
}
