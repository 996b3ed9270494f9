//! End-to-end pause trimming.
//!
//! [`trim_track`] is a pure function from a track and a [`TrimConfig`] to a
//! corrected track plus a [`PauseReport`]. It holds no state between calls,
//! so batches of tracks can be trimmed independently, in parallel with the
//! `parallel` feature.

use log::info;
use serde::{Deserialize, Serialize};

use crate::correction::correct_timestamps;
use crate::error::{Result, TrimError};
use crate::geo_utils::segments;
use crate::pauses::detect_pauses;
use crate::reference::estimate_reference_speed;
use crate::report::{build_report, PauseReport};
use crate::{TrackPoint, TrimConfig};

/// Corrected track and its pause report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimResult {
    /// Same points as the input with adjusted timestamps
    pub points: Vec<TrackPoint>,
    pub report: PauseReport,
}

/// Check that a track can be trimmed.
///
/// Requires at least two points, valid coordinates and finite,
/// non-decreasing timestamps.
pub fn validate_track(points: &[TrackPoint]) -> Result<()> {
    if points.len() < 2 {
        return Err(TrimError::EmptyTrack {
            point_count: points.len(),
        });
    }
    for (index, p) in points.iter().enumerate() {
        if !p.is_valid() {
            return Err(TrimError::InvalidCoordinate {
                index,
                latitude: p.latitude,
                longitude: p.longitude,
            });
        }
        if !p.time.is_finite() {
            return Err(TrimError::InvalidTimestamp { index });
        }
    }
    for (i, w) in points.windows(2).enumerate() {
        if w[1].time < w[0].time {
            return Err(TrimError::NonMonotonicTimestamp {
                index: i + 1,
                previous: w[0].time,
                current: w[1].time,
            });
        }
    }
    Ok(())
}

/// Remove long pauses from a single track.
///
/// The configuration is validated first, then the track. On success the
/// output has the same length and coordinates as the input, timestamps are
/// non-decreasing and never later than the input ones, and elapsed time is
/// reduced by the report's `removed_time`.
///
/// # Example
/// ```
/// use gpx_trimmer::{trim_track, TrackPoint, TrimConfig};
///
/// // Constant pace, nothing to trim
/// let points: Vec<TrackPoint> = (0..5)
///     .map(|i| TrackPoint::new(i as f64 * 0.0001, 0.0, i as f64 * 4.0))
///     .collect();
/// let result = trim_track(&points, &TrimConfig::new(1.0, 60.0)).unwrap();
/// assert!(result.report.is_empty());
/// assert_eq!(result.points, points);
/// ```
pub fn trim_track(points: &[TrackPoint], config: &TrimConfig) -> Result<TrimResult> {
    config.validate()?;
    validate_track(points)?;

    let segments = segments(points);
    let pauses = detect_pauses(&segments, config);
    let reference = estimate_reference_speed(&segments, &pauses, config.min_speed);
    let correction = correct_timestamps(points, &pauses, reference.speed);
    let report = build_report(points, &correction.points, &correction.pauses, &reference);

    info!(
        "[PauseTrimmer] {} points, {} pauses, removed {:.0}s of {:.0}s",
        points.len(),
        report.pause_count(),
        report.removed_time,
        report.original_elapsed
    );

    Ok(TrimResult {
        points: correction.points,
        report,
    })
}

/// Trim a batch of tracks sequentially.
///
/// Results are returned in input order; a failing track does not stop the batch.
pub fn trim_tracks(tracks: &[Vec<TrackPoint>], config: &TrimConfig) -> Vec<Result<TrimResult>> {
    tracks.iter().map(|t| trim_track(t, config)).collect()
}

/// Trim a batch of tracks using parallel processing.
///
/// This is the same as `trim_tracks` but uses rayon to process tracks
/// concurrently. Results keep input order.
#[cfg(feature = "parallel")]
pub fn trim_tracks_parallel(
    tracks: &[Vec<TrackPoint>],
    config: &TrimConfig,
) -> Vec<Result<TrimResult>> {
    use rayon::prelude::*;

    tracks.par_iter().map(|t| trim_track(t, config)).collect()
}
