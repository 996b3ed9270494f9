//! Geographic utilities for track segments.
//!
//! Distances are great-circle (haversine) distances in meters; elevation is
//! ignored. A [`Segment`] is the transient value between two consecutive
//! points and is recomputed whenever a stage needs it.

use geo::{Distance, Haversine, Point};

use crate::TrackPoint;

/// Calculate haversine distance between two track points in meters.
///
/// # Example
/// ```
/// use gpx_trimmer::{haversine_distance, TrackPoint};
///
/// let london = TrackPoint::new(51.5074, -0.1278, 0.0);
/// let paris = TrackPoint::new(48.8566, 2.3522, 0.0);
/// let d = haversine_distance(&london, &paris);
/// assert!((d - 343_500.0).abs() < 2_000.0);
/// ```
pub fn haversine_distance(p1: &TrackPoint, p2: &TrackPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// The interval between points `start` and `start + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Index of the first point
    pub start: usize,
    /// Distance in meters
    pub distance: f64,
    /// Elapsed time in seconds
    pub elapsed: f64,
}

impl Segment {
    /// Build the segment between two consecutive points.
    pub fn between(start: usize, p1: &TrackPoint, p2: &TrackPoint) -> Self {
        Self {
            start,
            distance: haversine_distance(p1, p2),
            elapsed: p2.time - p1.time,
        }
    }

    /// Index of the last point.
    pub fn end(&self) -> usize {
        self.start + 1
    }

    /// Speed in m/s, or `None` when no time elapsed.
    ///
    /// A zero-duration segment carries no speed information; callers treat it
    /// as stationary.
    pub fn speed(&self) -> Option<f64> {
        if self.elapsed > 0.0 {
            Some(self.distance / self.elapsed)
        } else {
            None
        }
    }
}

/// All `n - 1` segments of a track, in order.
pub fn segments(points: &[TrackPoint]) -> Vec<Segment> {
    points
        .windows(2)
        .enumerate()
        .map(|(i, w)| Segment::between(i, &w[0], &w[1]))
        .collect()
}

/// Total distance of a track in meters.
pub fn total_distance(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Elapsed time between the first and last point, in seconds.
pub fn elapsed(points: &[TrackPoint]) -> f64 {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => last.time - first.time,
        _ => 0.0,
    }
}
