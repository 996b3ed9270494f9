//! Pause report.
//!
//! Aggregates accepted pauses into per-pause summaries and totals, and
//! renders them as the human-readable table printed by the command-line tool.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::correction::AcceptedPause;
use crate::geo_utils::elapsed;
use crate::reference::ReferenceSpeed;
use crate::TrackPoint;

/// Summary of one removed pause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseSummary {
    /// Index of the last moving point before the pause
    pub start_index: usize,
    /// Index of the last point inside the pause
    pub end_index: usize,
    /// Original timestamp of the pause start (Unix seconds)
    pub start_time: f64,
    /// Original timestamp of the pause end (Unix seconds)
    pub end_time: f64,
    /// Recorded duration in seconds
    pub duration: f64,
    /// Seconds removed from the track
    pub removed: f64,
    /// Distance in meters drifted during the pause
    pub drift: f64,
}

/// Non-fatal conditions the caller should surface to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrimWarning {
    /// The whole track is one pause; `min_speed` stood in for the moving speed
    DegenerateReferenceSpeed { fallback_speed: f64 },
}

impl fmt::Display for TrimWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrimWarning::DegenerateReferenceSpeed { fallback_speed } => write!(
                f,
                "track has no moving segments outside pauses; used {:.2} m/s as moving speed, output may be degenerate",
                fallback_speed
            ),
        }
    }
}

/// Pause report for a single track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseReport {
    /// Removed pauses in track order
    pub pauses: Vec<PauseSummary>,
    /// Total seconds removed
    pub removed_time: f64,
    /// Total meters drifted during removed pauses
    pub pause_drift: f64,
    /// Timestamp of the first point (Unix seconds)
    pub activity_start: f64,
    /// Elapsed seconds before trimming
    pub original_elapsed: f64,
    /// Elapsed seconds after trimming
    pub trimmed_elapsed: f64,
    /// Moving speed in m/s used to size kept pause durations
    pub reference_speed: f64,
    pub warnings: Vec<TrimWarning>,
}

impl PauseReport {
    /// Number of removed pauses.
    pub fn pause_count(&self) -> usize {
        self.pauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pauses.is_empty()
    }

    /// True when the reference speed fell back to `min_speed`.
    pub fn is_degenerate(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, TrimWarning::DegenerateReferenceSpeed { .. }))
    }
}

/// Build the report for a corrected track.
pub fn build_report(
    original: &[TrackPoint],
    corrected: &[TrackPoint],
    pauses: &[AcceptedPause],
    reference: &ReferenceSpeed,
) -> PauseReport {
    let summaries: Vec<PauseSummary> = pauses
        .iter()
        .map(|p| PauseSummary {
            start_index: p.candidate.start,
            end_index: p.candidate.end,
            start_time: original[p.candidate.start].time,
            end_time: original[p.candidate.end].time,
            duration: p.candidate.duration,
            removed: p.excess_duration,
            drift: p.candidate.distance,
        })
        .collect();

    let mut warnings = Vec::new();
    if reference.degenerate && !pauses.is_empty() {
        warnings.push(TrimWarning::DegenerateReferenceSpeed {
            fallback_speed: reference.speed,
        });
    }

    PauseReport {
        removed_time: summaries.iter().map(|s| s.removed).sum(),
        pause_drift: summaries.iter().map(|s| s.drift).sum(),
        pauses: summaries,
        activity_start: original.first().map(|p| p.time).unwrap_or(0.0),
        original_elapsed: elapsed(original),
        trimmed_elapsed: elapsed(corrected),
        reference_speed: reference.speed,
        warnings,
    }
}

/// Format seconds as "Hh Mm Ss", omitting leading zero fields.
///
/// ```
/// use gpx_trimmer::format_hms;
/// assert_eq!(format_hms(42.0), "42s");
/// assert_eq!(format_hms(3597.0), "59m 57s");
/// assert_eq!(format_hms(3602.0), "1h 0m 2s");
/// ```
pub fn format_hms(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as u64;
    let (h, rem) = (total / 3600, total % 3600);
    let (m, s) = (rem / 60, rem % 60);

    let mut parts = Vec::with_capacity(3);
    if h > 0 {
        parts.push(format!("{}h", h));
    }
    if h > 0 || m > 0 {
        parts.push(format!("{}m", m));
    }
    parts.push(format!("{}s", s));
    parts.join(" ")
}

/// Zero-padded HH:MM:SS; hours may exceed 24.
fn format_clock(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

fn to_datetime(unix_seconds: f64) -> Option<DateTime<Utc>> {
    let secs = unix_seconds.floor();
    let nanos = ((unix_seconds - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
}

impl fmt::Display for PauseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = to_datetime(self.activity_start) {
            writeln!(f, "Activity date  {}", start.format("%Y-%m-%d"))?;
            writeln!(f, "Start time  {} UTC", start.format("%H:%M:%S"))?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>5}  {:>15}  {:>12}  {:>12}  {:>9}",
            "Pause", "Relative time", "Duration", "Removed", "Drift"
        )?;

        for (i, p) in self.pauses.iter().enumerate() {
            writeln!(
                f,
                "{:>5}  {:>15}  {:>12}  {:>12}  {:>9}",
                i + 1,
                format_clock(p.start_time - self.activity_start),
                format_hms(p.duration),
                format_hms(p.removed),
                format!("{:>3}m", p.drift.round() as i64),
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Original elapsed time {:>12}",
            format_hms(self.original_elapsed)
        )?;
        writeln!(
            f,
            "Trimmed elapsed time {:>12}",
            format_hms(self.trimmed_elapsed)
        )?;
        writeln!(f, "Total pause time {:>12}", format_hms(self.removed_time))?;
        for warning in &self.warnings {
            writeln!(f, "Warning: {}", warning)?;
        }
        write!(f, "{}", "-".repeat(55))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pauses::PauseCandidate;

    fn sample() -> (Vec<TrackPoint>, Vec<TrackPoint>, Vec<AcceptedPause>) {
        // 2024-05-01 08:00:00 UTC
        let t0 = 1_714_550_400.0;
        let original: Vec<TrackPoint> = [0.0, 1.0, 2.0, 3600.0, 3601.0, 3602.0]
            .iter()
            .map(|&t| TrackPoint::new(0.0, 0.0, t0 + t))
            .collect();
        let corrected: Vec<TrackPoint> = original
            .iter()
            .enumerate()
            .map(|(i, p)| p.with_time(t0 + i as f64))
            .collect();
        let pause = AcceptedPause {
            candidate: PauseCandidate {
                start: 2,
                end: 3,
                duration: 3598.0,
                distance: 0.4,
            },
            kept_duration: 1.0,
            excess_duration: 3597.0,
        };
        (original, corrected, vec![pause])
    }

    fn reference(degenerate: bool) -> ReferenceSpeed {
        ReferenceSpeed {
            speed: 10.0,
            moving_distance: 40.0,
            moving_time: 4.0,
            degenerate,
        }
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0.0), "0s");
        assert_eq!(format_hms(59.6), "1m 0s");
        assert_eq!(format_hms(3600.0), "1h 0m 0s");
        assert_eq!(format_hms(90061.0), "25h 1m 1s");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(2.0), "00:00:02");
        assert_eq!(format_clock(90061.0), "25:01:01");
    }

    #[test]
    fn test_build_report_totals() {
        let (original, corrected, pauses) = sample();
        let report = build_report(&original, &corrected, &pauses, &reference(false));

        assert_eq!(report.pause_count(), 1);
        assert_eq!(report.removed_time, 3597.0);
        assert_eq!(report.original_elapsed, 3602.0);
        assert_eq!(report.trimmed_elapsed, 5.0);
        assert_eq!(report.pauses[0].start_time, original[2].time);
        assert_eq!(report.pauses[0].end_time, original[3].time);
        assert_eq!(report.pauses[0].drift, 0.4);
        assert!(!report.is_degenerate());
    }

    #[test]
    fn test_empty_report() {
        let (original, _, _) = sample();
        let report = build_report(&original, &original, &[], &reference(false));
        assert!(report.is_empty());
        assert_eq!(report.removed_time, 0.0);
        assert_eq!(report.original_elapsed, report.trimmed_elapsed);
    }

    #[test]
    fn test_degenerate_warning() {
        let (original, corrected, pauses) = sample();
        let report = build_report(&original, &corrected, &pauses, &reference(true));
        assert!(report.is_degenerate());
        assert_eq!(
            report.warnings,
            vec![TrimWarning::DegenerateReferenceSpeed {
                fallback_speed: 10.0
            }]
        );
    }

    #[test]
    fn test_no_warning_without_pauses() {
        let (original, _, _) = sample();
        let report = build_report(&original, &original, &[], &reference(true));
        assert!(report.warnings.is_empty());
        assert!(!report.is_degenerate());
    }

    #[test]
    fn test_render_table() {
        let (original, corrected, pauses) = sample();
        let text = build_report(&original, &corrected, &pauses, &reference(false)).to_string();

        assert!(text.contains("Activity date  2024-05-01"));
        assert!(text.contains("Start time  08:00:00 UTC"));
        assert!(text.contains("00:00:02"));
        assert!(text.contains("59m 58s"));
        assert!(text.contains("59m 57s"));
        assert!(text.contains("  0m"));
        assert!(text.contains("Original elapsed time     1h 0m 2s"));
        assert!(text.contains("Trimmed elapsed time           5s"));
        assert!(!text.contains("Warning"));
    }
}
