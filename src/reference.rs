//! Reference moving-speed estimation.
//!
//! The reference speed is the track's average pace over every segment that
//! is not part of an accepted pause. It sizes the time kept for each pause so
//! that leaving the pause does not produce a velocity spike.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::geo_utils::Segment;
use crate::pauses::PauseCandidate;

/// Result of reference speed estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSpeed {
    /// Speed in m/s used to size kept pause durations
    pub speed: f64,
    /// Distance in meters covered outside pauses
    pub moving_distance: f64,
    /// Time in seconds spent outside pauses
    pub moving_time: f64,
    /// True when no moving data existed and `min_speed` was used instead
    pub degenerate: bool,
}

/// Estimate the moving speed outside of `pauses`.
///
/// `pauses` must be ordered by start index and disjoint. When the track has
/// no moving distance or no moving time, the result falls back to
/// `min_speed`. It is flagged as degenerate only if there are pauses to size
/// with it, i.e. the whole track is one pause.
pub fn estimate_reference_speed(
    segments: &[Segment],
    pauses: &[PauseCandidate],
    min_speed: f64,
) -> ReferenceSpeed {
    let mut moving_distance = 0.0;
    let mut moving_time = 0.0;
    let mut pause_iter = pauses.iter().peekable();

    for segment in segments {
        while pause_iter
            .peek()
            .is_some_and(|p| p.end <= segment.start)
        {
            pause_iter.next();
        }
        if pause_iter
            .peek()
            .is_some_and(|p| p.contains_segment(segment.start))
        {
            continue;
        }
        moving_distance += segment.distance;
        moving_time += segment.elapsed;
    }

    if moving_distance > 0.0 && moving_time > 0.0 {
        let speed = moving_distance / moving_time;
        debug!(
            "[ReferenceSpeed] {:.1}m in {:.0}s -> {:.2} m/s",
            moving_distance, moving_time, speed
        );
        ReferenceSpeed {
            speed,
            moving_distance,
            moving_time,
            degenerate: false,
        }
    } else if pauses.is_empty() {
        debug!(
            "[ReferenceSpeed] No movement and no pauses, using min_speed {:.2} m/s",
            min_speed
        );
        ReferenceSpeed {
            speed: min_speed,
            moving_distance,
            moving_time,
            degenerate: false,
        }
    } else {
        warn!(
            "[ReferenceSpeed] No moving segments outside pauses, falling back to min_speed {:.2} m/s",
            min_speed
        );
        ReferenceSpeed {
            speed: min_speed,
            moving_distance,
            moving_time,
            degenerate: true,
        }
    }
}
