//! GPX reading and rewriting.
//!
//! A document is flattened into one ordered point sequence across all of its
//! tracks and segments. Gaps between segments become ordinary segments of
//! that sequence, so a recording that was stopped and restarted is detected
//! by the same rule as a stationary pause. Rewriting clones the document and
//! replaces only `<time>` elements; coordinates, elevation, names and
//! metadata are left as parsed.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use gpx::{Gpx, GpxVersion, Time};
use log::debug;
use time::OffsetDateTime;

use crate::error::{Result, TrimError};
use crate::report::PauseReport;
use crate::trimmer::trim_track;
use crate::{TrackPoint, TrimConfig};

/// Parse a GPX document.
pub fn read_gpx<R: Read>(reader: R) -> Result<Gpx> {
    gpx::read(reader).map_err(|e| TrimError::Gpx {
        message: e.to_string(),
    })
}

/// Serialize a GPX document.
pub fn write_gpx<W: Write>(gpx: &Gpx, writer: W) -> Result<()> {
    gpx::write(gpx, writer).map_err(|e| TrimError::Gpx {
        message: e.to_string(),
    })
}

fn to_unix_seconds(time: &Time) -> f64 {
    let dt: OffsetDateTime = time.clone().into();
    dt.unix_timestamp() as f64 + dt.nanosecond() as f64 / 1e9
}

fn from_unix_seconds(seconds: f64) -> Result<Time> {
    let nanos = (seconds * 1e9).round() as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map(Time::from)
        .map_err(|e| TrimError::Gpx {
            message: format!("timestamp {} out of range: {}", seconds, e),
        })
}

/// Flatten every track point of the document, in document order.
///
/// Every point must carry a `<time>`.
pub fn track_points(gpx: &Gpx) -> Result<Vec<TrackPoint>> {
    let waypoints = gpx
        .tracks
        .iter()
        .flat_map(|t| &t.segments)
        .flat_map(|s| &s.points);

    let mut points = Vec::new();
    for (index, wp) in waypoints.enumerate() {
        let time = wp
            .time
            .as_ref()
            .ok_or(TrimError::MissingTimestamp { index })?;
        let geo_point = wp.point();
        points.push(TrackPoint {
            latitude: geo_point.y(),
            longitude: geo_point.x(),
            elevation: wp.elevation,
            time: to_unix_seconds(time),
        });
    }

    debug!(
        "[GpxIo] {} tracks, {} points",
        gpx.tracks.len(),
        points.len()
    );
    Ok(points)
}

/// Copy of `gpx` with track point times replaced from `points`.
///
/// `points` must be the flattened sequence of the same document, as produced
/// by [`track_points`] and then trimmed. Times that did not change keep their
/// original representation.
pub fn apply_times(gpx: &Gpx, points: &[TrackPoint]) -> Result<Gpx> {
    let mut out = gpx.clone();
    out.version = GpxVersion::Gpx11;

    let waypoints = out
        .tracks
        .iter_mut()
        .flat_map(|t| t.segments.iter_mut())
        .flat_map(|s| s.points.iter_mut());

    let mut count = 0;
    for (wp, point) in waypoints.zip(points) {
        let unchanged = wp
            .time
            .as_ref()
            .is_some_and(|t| to_unix_seconds(t) == point.time);
        if !unchanged {
            wp.time = Some(from_unix_seconds(point.time)?);
        }
        count += 1;
    }

    let total: usize = gpx
        .tracks
        .iter()
        .flat_map(|t| &t.segments)
        .map(|s| s.points.len())
        .sum();
    if count != total || points.len() != total {
        return Err(TrimError::Gpx {
            message: format!(
                "document has {} track points but {} timestamps were supplied",
                total,
                points.len()
            ),
        });
    }

    Ok(out)
}

/// Read a GPX document, trim its pauses and write the corrected document.
pub fn trim_gpx<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &TrimConfig,
) -> Result<PauseReport> {
    config.validate()?;
    let gpx = read_gpx(reader)?;
    let points = track_points(&gpx)?;
    let result = trim_track(&points, config)?;
    let trimmed = apply_times(&gpx, &result.points)?;
    write_gpx(&trimmed, writer)?;
    Ok(result.report)
}

/// `walk.gpx` -> `walk_trimmed.gpx`, keeping the parent directory.
pub fn trimmed_file_name(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_trimmed.{}", stem, ext.to_string_lossy()),
        None => format!("{}_trimmed", stem),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LUNCH_BREAK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Morning walk</name>
    <trkseg>
      <trkpt lat="46.00000" lon="7.00000"><ele>1200.0</ele><time>2024-05-01T08:00:00Z</time></trkpt>
      <trkpt lat="46.00009" lon="7.00000"><ele>1201.0</ele><time>2024-05-01T08:00:01Z</time></trkpt>
      <trkpt lat="46.00018" lon="7.00000"><ele>1202.0</ele><time>2024-05-01T08:00:02Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="46.00018" lon="7.00000"><ele>1202.0</ele><time>2024-05-01T09:00:00Z</time></trkpt>
      <trkpt lat="46.00027" lon="7.00000"><ele>1203.0</ele><time>2024-05-01T09:00:01Z</time></trkpt>
      <trkpt lat="46.00036" lon="7.00000"><ele>1204.0</ele><time>2024-05-01T09:00:02Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_track_points_flatten_segments() {
        let gpx = read_gpx(Cursor::new(LUNCH_BREAK)).unwrap();
        let points = track_points(&gpx).unwrap();

        assert_eq!(points.len(), 6);
        assert_eq!(points[0].time, 1_714_550_400.0);
        assert_eq!(points[3].time, 1_714_554_000.0);
        assert_eq!(points[5].elevation, Some(1204.0));
        assert!((points[1].latitude - 46.00009).abs() < 1e-9);
    }

    #[test]
    fn test_missing_time_rejected() {
        let doc = LUNCH_BREAK.replace("<time>2024-05-01T08:00:01Z</time>", "");
        let gpx = read_gpx(Cursor::new(doc)).unwrap();
        assert!(matches!(
            track_points(&gpx),
            Err(TrimError::MissingTimestamp { index: 1 })
        ));
    }

    #[test]
    fn test_trim_gpx_round_trip() {
        let mut out = Vec::new();
        let report = trim_gpx(
            Cursor::new(LUNCH_BREAK),
            &mut out,
            &TrimConfig::new(1.0, 60.0),
        )
        .unwrap();

        assert_eq!(report.pause_count(), 1);
        assert!((report.removed_time - 3597.0).abs() < 1e-6);

        let trimmed = read_gpx(Cursor::new(out)).unwrap();
        let points = track_points(&trimmed).unwrap();
        let original = track_points(&read_gpx(Cursor::new(LUNCH_BREAK)).unwrap()).unwrap();

        assert_eq!(trimmed.tracks[0].segments.len(), 2);
        assert_eq!(trimmed.tracks[0].name.as_deref(), Some("Morning walk"));
        for (i, (a, b)) in original.iter().zip(&points).enumerate() {
            assert_eq!(a.latitude, b.latitude);
            assert_eq!(a.longitude, b.longitude);
            assert_eq!(a.elevation, b.elevation);
            assert!((b.time - (1_714_550_400.0 + i as f64)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_apply_times_length_mismatch() {
        let gpx = read_gpx(Cursor::new(LUNCH_BREAK)).unwrap();
        let points = track_points(&gpx).unwrap();
        assert!(matches!(
            apply_times(&gpx, &points[..4]),
            Err(TrimError::Gpx { .. })
        ));
    }

    #[test]
    fn test_trimmed_file_name() {
        assert_eq!(
            trimmed_file_name(Path::new("rides/walk.gpx")),
            PathBuf::from("rides/walk_trimmed.gpx")
        );
        assert_eq!(
            trimmed_file_name(Path::new("batch.zip")),
            PathBuf::from("batch_trimmed.zip")
        );
    }
}
