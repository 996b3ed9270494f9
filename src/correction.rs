//! Timestamp correction.
//!
//! Each accepted pause is shortened to the time a traveler moving at the
//! reference speed would need to cover the distance recorded during it:
//!
//! ```text
//! kept   = clamp(pause.distance / reference_speed, MIN_KEPT_DURATION, pause.duration)
//! excess = pause.duration - kept
//! ```
//!
//! Points inside a pause are rescaled linearly so their relative spacing is
//! preserved while the pause span shrinks to `kept`. Every point after the
//! pause is shifted back by the accumulated excess. Coordinates are copied
//! unchanged.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::pauses::PauseCandidate;
use crate::TrackPoint;

/// Smallest duration kept for a pause, in seconds.
///
/// A pause with no recorded movement (the tracker stopped and jumped) still
/// keeps one second so the points on either side stay distinct in time.
pub const MIN_KEPT_DURATION: f64 = 1.0;

/// A pause selected for trimming, with its kept and removed durations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptedPause {
    pub candidate: PauseCandidate,
    /// Duration in seconds left in the corrected track
    pub kept_duration: f64,
    /// Duration in seconds removed from the track
    pub excess_duration: f64,
}

impl AcceptedPause {
    /// Size a pause against the reference speed.
    pub fn new(candidate: PauseCandidate, reference_speed: f64) -> Self {
        let kept_duration = desired_duration(&candidate, reference_speed);
        Self {
            candidate,
            kept_duration,
            excess_duration: (candidate.duration - kept_duration).max(0.0),
        }
    }
}

/// Time in seconds needed to cover the pause's distance at `reference_speed`.
///
/// Never below [`MIN_KEPT_DURATION`] and never above the recorded duration.
/// The floor applies to every pause, including one whose drift would be
/// covered in under a second, not only to pauses with no recorded distance.
pub fn desired_duration(pause: &PauseCandidate, reference_speed: f64) -> f64 {
    let travel_time = if reference_speed > 0.0 {
        pause.distance / reference_speed
    } else {
        0.0
    };
    travel_time.max(MIN_KEPT_DURATION).min(pause.duration)
}

/// Output of timestamp correction.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    /// Corrected track, same length and coordinates as the input
    pub points: Vec<TrackPoint>,
    /// Accepted pauses in track order
    pub pauses: Vec<AcceptedPause>,
}

impl Correction {
    /// Total seconds removed from the track.
    pub fn total_removed(&self) -> f64 {
        self.pauses.iter().map(|p| p.excess_duration).sum()
    }
}

/// Rewrite timestamps so that every pause keeps only its desired duration.
///
/// `pauses` must be ordered by start index, disjoint, and index into `points`.
/// A candidate already no longer than its desired duration removes nothing
/// and is not accepted. Output timestamps are non-decreasing and never later
/// than the input ones.
pub fn correct_timestamps(
    points: &[TrackPoint],
    pauses: &[PauseCandidate],
    reference_speed: f64,
) -> Correction {
    let accepted: Vec<AcceptedPause> = pauses
        .iter()
        .map(|p| AcceptedPause::new(*p, reference_speed))
        .filter(|p| p.excess_duration > 0.0)
        .collect();

    let mut times: Vec<f64> = Vec::with_capacity(points.len());
    let mut offset = 0.0;
    let mut pending = accepted.iter().peekable();
    let mut j = 0;

    while j < points.len() {
        let Some(pause) = pending.next_if(|p| p.candidate.start == j) else {
            times.push(points[j].time - offset);
            j += 1;
            continue;
        };

        let PauseCandidate {
            start,
            end,
            duration,
            ..
        } = pause.candidate;
        let start_time = points[start].time;
        let base = start_time - offset;
        times.push(base);

        // Positive excess implies duration > kept >= 0
        let kept = pause.kept_duration;
        times.extend(
            points[start + 1..=end]
                .iter()
                .map(|p| base + (p.time - start_time) * kept / duration),
        );

        debug!(
            "[Correction] Pause {}..{}: {:.0}s -> {:.0}s (drift {:.1}m)",
            start, end, duration, pause.kept_duration, pause.candidate.distance
        );

        offset += pause.excess_duration;
        j = end + 1;
    }

    // Rounding in the rescale can leave a point a hair before its predecessor
    for i in 1..times.len() {
        if times[i] < times[i - 1] {
            times[i] = times[i - 1];
        }
    }

    let corrected = points
        .iter()
        .zip(times)
        .map(|(p, t)| p.with_time(t.min(p.time)))
        .collect();

    Correction {
        points: corrected,
        pauses: accepted,
    }
}
