//! Unified error handling for the gpx-trimmer library.
//!
//! Every fallible operation returns [`TrimError`]. Conditions that only
//! degrade the output (such as a track that never moves) are not errors;
//! they are reported as [`crate::TrimWarning`]s inside the pause report.

use thiserror::Error;

/// Unified error type for gpx-trimmer operations.
#[derive(Debug, Error)]
pub enum TrimError {
    /// Track has fewer than two points, so no segment exists
    #[error("track has {point_count} points, at least 2 are required")]
    EmptyTrack { point_count: usize },

    /// A timestamp goes backward between two consecutive points
    #[error("timestamp decreases at point {index}: {current} follows {previous}")]
    NonMonotonicTimestamp {
        index: usize,
        previous: f64,
        current: f64,
    },

    /// A timestamp is NaN or infinite
    #[error("point {index} has a non-finite timestamp")]
    InvalidTimestamp { index: usize },

    /// Latitude or longitude is NaN, infinite or out of range
    #[error("point {index} has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinate {
        index: usize,
        latitude: f64,
        longitude: f64,
    },

    /// Configuration rejected before any computation
    #[error("configuration error: {message}")]
    InvalidConfig { message: String },

    /// GPX track point without a <time> element
    #[error("GPX point {index} is missing its <time> stamp")]
    MissingTimestamp { index: usize },

    /// GPX parse or write failure
    #[error("GPX error: {message}")]
    Gpx { message: String },

    /// ZIP archive failure
    #[error("archive error: {message}")]
    Archive { message: String },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for gpx-trimmer operations.
pub type Result<T> = std::result::Result<T, TrimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrimError::EmptyTrack { point_count: 1 };
        assert!(err.to_string().contains("1 points"));

        let err = TrimError::NonMonotonicTimestamp {
            index: 4,
            previous: 10.0,
            current: 9.0,
        };
        assert!(err.to_string().contains("point 4"));

        let err = TrimError::InvalidCoordinate {
            index: 2,
            latitude: 91.0,
            longitude: 0.0,
        };
        assert!(err.to_string().contains("point 2 has invalid coordinates"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.gpx");
        let err: TrimError = io.into();
        assert!(matches!(err, TrimError::Io(_)));
        assert!(err.to_string().contains("missing.gpx"));
    }
}
