//! Pause detection.
//!
//! Detection runs in three independent steps:
//! 1. Classify every segment as slow or normal against `min_speed`
//! 2. Merge maximal runs of slow segments into [`PauseCandidate`]s
//! 3. Keep the candidates that last at least `min_pause_duration`
//!
//! Zero-duration segments (duplicate timestamps) are slow by convention so
//! that they never split an otherwise continuous pause.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo_utils::Segment;
use crate::TrimConfig;

/// Classification of a single segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentClass {
    Slow,
    Normal,
}

impl SegmentClass {
    /// Classify a segment against a speed threshold in m/s.
    pub fn of(segment: &Segment, min_speed: f64) -> Self {
        match segment.speed() {
            Some(speed) if speed >= min_speed => SegmentClass::Normal,
            _ => SegmentClass::Slow,
        }
    }
}

/// A maximal run of consecutive slow segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PauseCandidate {
    /// Index of the first point of the first slow segment
    pub start: usize,
    /// Index of the last point of the last slow segment (inclusive)
    pub end: usize,
    /// Sum of segment elapsed times in seconds
    pub duration: f64,
    /// Sum of segment distances in meters
    pub distance: f64,
}

impl PauseCandidate {
    /// Number of segments in the run.
    pub fn segment_count(&self) -> usize {
        self.end - self.start
    }

    /// True for a run with no time and no movement, which has nothing to remove.
    pub fn is_degenerate(&self) -> bool {
        self.duration <= 0.0 && self.distance <= 0.0
    }

    /// Whether the segment starting at `index` belongs to this run.
    pub fn contains_segment(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// Classify every segment.
pub fn classify_segments(segments: &[Segment], min_speed: f64) -> Vec<SegmentClass> {
    segments
        .iter()
        .map(|s| SegmentClass::of(s, min_speed))
        .collect()
}

/// Merge maximal runs of slow segments into candidates.
///
/// `segments` and `classes` must be parallel slices. Degenerate runs are
/// dropped here; no duration filter is applied.
pub fn merge_slow_runs(segments: &[Segment], classes: &[SegmentClass]) -> Vec<PauseCandidate> {
    let mut candidates = Vec::new();
    let mut current: Option<PauseCandidate> = None;

    for (segment, class) in segments.iter().zip(classes) {
        match class {
            SegmentClass::Slow => {
                let run = current.get_or_insert(PauseCandidate {
                    start: segment.start,
                    end: segment.start,
                    duration: 0.0,
                    distance: 0.0,
                });
                run.end = segment.end();
                run.duration += segment.elapsed;
                run.distance += segment.distance;
            }
            SegmentClass::Normal => {
                if let Some(run) = current.take() {
                    candidates.push(run);
                }
            }
        }
    }
    if let Some(run) = current {
        candidates.push(run);
    }

    candidates.retain(|c| !c.is_degenerate());
    candidates
}

/// Detect pauses long enough to be trimmed.
///
/// Returns candidates ordered by start index, pairwise disjoint, each lasting
/// at least `config.min_pause_duration` seconds.
pub fn detect_pauses(segments: &[Segment], config: &TrimConfig) -> Vec<PauseCandidate> {
    let classes = classify_segments(segments, config.min_speed);
    let candidates = merge_slow_runs(segments, &classes);
    let total = candidates.len();

    let accepted: Vec<PauseCandidate> = candidates
        .into_iter()
        .filter(|c| c.duration >= config.min_pause_duration)
        .collect();

    debug!(
        "[PauseDetector] {} slow runs, {} at least {:.0}s long",
        total,
        accepted.len(),
        config.min_pause_duration
    );

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_utils::segments;
    use crate::TrackPoint;

    /// Track moving ~11 m per step, except segments starting at `stationary_after`.
    fn track(times: &[f64], stationary_after: &[usize]) -> Vec<TrackPoint> {
        let mut lat = 0.0;
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                if i > 0 && !stationary_after.contains(&(i - 1)) {
                    lat += 0.0001;
                }
                TrackPoint::new(lat, 0.0, t)
            })
            .collect()
    }

    #[test]
    fn test_classification() {
        let points = track(&[0.0, 1.0, 2.0, 2.0, 100.0], &[2]);
        let segs = segments(&points);
        let classes = classify_segments(&segs, 1.0);
        assert_eq!(
            classes,
            vec![
                SegmentClass::Normal,
                SegmentClass::Normal,
                SegmentClass::Slow, // zero duration
                SegmentClass::Slow, // 11 m in 98 s
            ]
        );
    }

    #[test]
    fn test_merge_adjacent_slow_segments() {
        // Stationary between points 2..5
        let points = track(&[0.0, 1.0, 2.0, 50.0, 100.0, 150.0, 151.0], &[2, 3, 4]);
        let segs = segments(&points);
        let classes = classify_segments(&segs, 1.0);
        let runs = merge_slow_runs(&segs, &classes);

        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].start, 2);
        assert_eq!(runs[0].end, 5);
        assert_eq!(runs[0].segment_count(), 3);
        assert_eq!(runs[0].duration, 148.0);
        assert_eq!(runs[0].distance, 0.0);
        assert!(runs[0].contains_segment(4));
        assert!(!runs[0].contains_segment(5));
    }

    #[test]
    fn test_degenerate_run_dropped() {
        // Duplicate point with identical timestamp
        let points = track(&[0.0, 1.0, 1.0, 2.0], &[1]);
        let segs = segments(&points);
        let classes = classify_segments(&segs, 1.0);
        assert_eq!(classes[1], SegmentClass::Slow);
        assert!(merge_slow_runs(&segs, &classes).is_empty());
    }

    #[test]
    fn test_duration_filter() {
        let points = track(
            &[0.0, 1.0, 31.0, 32.0, 33.0, 633.0, 634.0],
            &[1, 4],
        );
        let segs = segments(&points);
        let pauses = detect_pauses(&segs, &TrimConfig::new(1.0, 60.0));

        assert_eq!(pauses.len(), 1);
        assert_eq!(pauses[0].start, 4);
        assert_eq!(pauses[0].end, 5);
        assert_eq!(pauses[0].duration, 600.0);
    }

    #[test]
    fn test_leading_and_trailing_pauses() {
        let points = track(&[0.0, 300.0, 301.0, 302.0, 900.0], &[0, 3]);
        let segs = segments(&points);
        let pauses = detect_pauses(&segs, &TrimConfig::new(1.0, 60.0));

        assert_eq!(pauses.len(), 2);
        assert_eq!((pauses[0].start, pauses[0].end), (0, 1));
        assert_eq!((pauses[1].start, pauses[1].end), (3, 4));
    }

    #[test]
    fn test_no_pauses_when_always_moving() {
        let points = track(&[0.0, 1.0, 2.0, 3.0, 4.0], &[]);
        let segs = segments(&points);
        assert!(detect_pauses(&segs, &TrimConfig::new(1.0, 0.0)).is_empty());
    }

    #[test]
    fn test_candidates_are_disjoint_and_ordered() {
        let points = track(
            &[0.0, 100.0, 101.0, 200.0, 201.0, 300.0],
            &[0, 2, 4],
        );
        let segs = segments(&points);
        let pauses = detect_pauses(&segs, &TrimConfig::new(1.0, 10.0));
        assert_eq!(pauses.len(), 3);
        for w in pauses.windows(2) {
            assert!(w[0].end < w[1].start);
        }
    }
}
