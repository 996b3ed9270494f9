//! # GPX Trimmer
//!
//! Removes long, unrecorded pauses from GPS activity tracks.
//!
//! Trackers left running during a lunch break inflate the elapsed time of an
//! activity. This library finds intervals of negligible movement that last
//! longer than a configured threshold and shifts the timestamps after them
//! backward, so that elapsed time reflects the time actually spent moving.
//! Coordinates and elevations are never modified.
//!
//! This library provides:
//! - Pause detection (slow-segment classification, run merging, duration filter)
//! - Reference moving-speed estimation
//! - Timestamp correction without a velocity spike at the pause exit
//! - A per-track pause report
//!
//! ## Features
//!
//! - **`parallel`** - Trim many tracks in parallel with rayon
//! - **`gpx`** - Read and rewrite GPX documents
//! - **`archive`** - Trim every GPX file inside a ZIP archive
//! - **`cli`** - Build the `gpx-trimmer` command-line tool
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use gpx_trimmer::{trim_track, TrackPoint, TrimConfig};
//!
//! // Walk north at ~10 m/s, stop for an hour, walk on
//! let points = vec![
//!     TrackPoint::new(51.50000, -0.1278, 0.0),
//!     TrackPoint::new(51.50009, -0.1278, 1.0),
//!     TrackPoint::new(51.50018, -0.1278, 2.0),
//!     TrackPoint::new(51.50018, -0.1278, 3600.0),
//!     TrackPoint::new(51.50027, -0.1278, 3601.0),
//! ];
//!
//! let config = TrimConfig::new(1.0, 60.0);
//! let result = trim_track(&points, &config).unwrap();
//!
//! assert_eq!(result.report.pause_count(), 1);
//! assert!(result.points[4].time < 10.0);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrimError};

// Geographic utilities (distance, per-segment speed)
pub mod geo_utils;
pub use geo_utils::{haversine_distance, Segment};

// Slow-segment classification and pause candidates
pub mod pauses;
pub use pauses::{detect_pauses, PauseCandidate, SegmentClass};

// Moving-speed estimation outside of pauses
pub mod reference;
pub use reference::{estimate_reference_speed, ReferenceSpeed};

// Timestamp rewriting
pub mod correction;
pub use correction::{correct_timestamps, AcceptedPause, Correction, MIN_KEPT_DURATION};

// Pause report
pub mod report;
pub use report::{build_report, format_hms, PauseReport, PauseSummary, TrimWarning};

// End-to-end pipeline and batch runners
pub mod trimmer;
#[cfg(feature = "parallel")]
pub use trimmer::trim_tracks_parallel;
pub use trimmer::{trim_track, trim_tracks, validate_track, TrimResult};

// Algorithm toolbox - standalone access to every stage
pub mod algorithms;

// GPX document collaborator
#[cfg(feature = "gpx")]
pub mod gpx_io;
#[cfg(feature = "gpx")]
pub use gpx_io::{apply_times, read_gpx, track_points, trim_gpx, trimmed_file_name, write_gpx};

// ZIP batch collaborator
#[cfg(feature = "archive")]
pub mod archive;
#[cfg(feature = "archive")]
pub use archive::{trim_archive, ArchiveEntryReport};

// ============================================================================
// Core Types
// ============================================================================

/// A recorded GPS fix.
///
/// `time` is seconds since the Unix epoch. Fractional seconds are allowed.
///
/// # Example
/// ```
/// use gpx_trimmer::TrackPoint;
/// let point = TrackPoint::new(51.5074, -0.1278, 1_714_550_400.0).with_elevation(35.0);
/// assert_eq!(point.elevation, Some(35.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in meters (ignored for distance)
    pub elevation: Option<f64>,
    /// Unix timestamp in seconds
    pub time: f64,
}

impl TrackPoint {
    /// Create a new track point without elevation.
    pub fn new(latitude: f64, longitude: f64, time: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            time,
        }
    }

    /// Attach an elevation in meters.
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// Copy of this point with only the timestamp replaced.
    pub fn with_time(&self, time: f64) -> Self {
        Self { time, ..*self }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    ///
    /// NaN fails both range checks. Tracks with an invalid point are
    /// rejected before any distance is computed.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Configuration for pause trimming.
///
/// Passed explicitly into every call; nothing is read from global state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Speed threshold in m/s below which a segment counts as stationary.
    /// Default: 0.1 m/s
    pub min_speed: f64,

    /// Minimum total duration in seconds of a slow run before it is trimmed.
    /// Default: 240 seconds
    pub min_pause_duration: f64,
}

impl TrimConfig {
    /// Create a config from explicit thresholds.
    pub fn new(min_speed: f64, min_pause_duration: f64) -> Self {
        Self {
            min_speed,
            min_pause_duration,
        }
    }

    /// Reject thresholds the algorithm cannot work with.
    ///
    /// `min_speed` must be positive and finite, `min_pause_duration` must be
    /// non-negative and finite.
    pub fn validate(&self) -> Result<()> {
        if !self.min_speed.is_finite() || self.min_speed <= 0.0 {
            return Err(TrimError::InvalidConfig {
                message: format!("min_speed must be a positive number, got {}", self.min_speed),
            });
        }
        if !self.min_pause_duration.is_finite() || self.min_pause_duration < 0.0 {
            return Err(TrimError::InvalidConfig {
                message: format!(
                    "min_pause_duration must be zero or positive, got {}",
                    self.min_pause_duration
                ),
            });
        }
        Ok(())
    }
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            min_speed: 0.1,
            min_pause_duration: 240.0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
