//! Error types for loamfeat

use thiserror::Error;

/// Main error type for feature extraction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A configured ring has no points left after filtering and partitioning.
    #[error(
        "ring {ring} has no points (scan has {point_count} points); \
         check ring_count against the sensor"
    )]
    EmptyRing { ring: u32, point_count: usize },

    /// An access would fall outside the scan buffer.
    #[error("index {index} is out of bounds for a scan of {len} points")]
    BoundsViolation { index: usize, len: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for loamfeat operations
pub type Result<T> = std::result::Result<T, Error>;
