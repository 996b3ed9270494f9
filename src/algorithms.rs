//! # Algorithm Toolbox
//!
//! Direct access to every stage of the trimming pipeline. Use these to
//! integrate a single stage into your own system without running the full
//! [`trim_track`](crate::trim_track) pipeline.
//!
//! ## Stages
//!
//! - **Geometry**: haversine distance and per-segment speed
//! - **Pause Detection**: classify, merge, filter
//! - **Reference Speed**: moving pace outside pauses
//! - **Correction**: timestamp rewriting
//! - **Report**: pause summaries
//!
//! # Example
//!
//! ```rust
//! use gpx_trimmer::algorithms::{
//!     segments, classify_segments, merge_slow_runs, SegmentClass, TrackPoint,
//! };
//!
//! let track = vec![
//!     TrackPoint::new(51.5000, -0.1278, 0.0),
//!     TrackPoint::new(51.5001, -0.1278, 2.0),
//!     TrackPoint::new(51.5001, -0.1278, 600.0),
//! ];
//! let segs = segments(&track);
//! let classes = classify_segments(&segs, 0.5);
//! assert_eq!(classes, vec![SegmentClass::Normal, SegmentClass::Slow]);
//! assert_eq!(merge_slow_runs(&segs, &classes).len(), 1);
//! ```

// =============================================================================
// Core Types (re-exported from lib)
// =============================================================================

pub use crate::{TrackPoint, TrimConfig};

// =============================================================================
// Geographic Utilities
// =============================================================================

pub use crate::geo_utils::{elapsed, haversine_distance, segments, total_distance, Segment};

// =============================================================================
// Pause Detection
// =============================================================================

/// Classify each segment as slow or normal.
///
/// Zero-duration segments are slow by convention.
pub use crate::pauses::classify_segments;

/// Merge maximal runs of slow segments, dropping degenerate runs.
pub use crate::pauses::merge_slow_runs;

/// Classify, merge and keep runs lasting at least `min_pause_duration`.
pub use crate::pauses::detect_pauses;

pub use crate::pauses::{PauseCandidate, SegmentClass};

// =============================================================================
// Reference Speed
// =============================================================================

/// Average speed over segments outside all pauses, falling back to `min_speed`.
pub use crate::reference::estimate_reference_speed;

pub use crate::reference::ReferenceSpeed;

// =============================================================================
// Timestamp Correction
// =============================================================================

/// Duration kept for a pause at the reference speed.
pub use crate::correction::desired_duration;

/// Rewrite timestamps around accepted pauses.
pub use crate::correction::correct_timestamps;

pub use crate::correction::{AcceptedPause, Correction, MIN_KEPT_DURATION};

// =============================================================================
// Report
// =============================================================================

pub use crate::report::{build_report, format_hms, PauseReport, PauseSummary, TrimWarning};
