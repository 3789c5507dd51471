//! Decoding of flat driver buffers into ring-tagged scans
//!
//! Drivers usually publish a frame as fixed-width rows of `f32` following the
//! PointXYZIRT convention: `x, y, z, intensity, ring, time`. The ring column is
//! configurable; intensity (column 3) and time (column 5) are picked up when
//! the row is wide enough and the column is not the ring column.

use crate::error::{Error, Result};
use crate::point::{Point3f, RingPoint};
use crate::point_cloud::RingScan;

const INTENSITY_COLUMN: usize = 3;
const TIME_COLUMN: usize = 5;

/// Decode `data` as rows of `stride` values into a scan
///
/// # Arguments
/// * `data` - Row-major frame buffer
/// * `stride` - Values per row, at least 4
/// * `ring_field_offset` - Column holding the ring id
pub fn decode_raw_frame(
    data: &[f32],
    stride: usize,
    ring_field_offset: usize,
) -> Result<RingScan> {
    if stride < 4 {
        return Err(Error::InvalidData(format!(
            "row stride must be at least 4, got {stride}"
        )));
    }
    if ring_field_offset < 3 || ring_field_offset >= stride {
        return Err(Error::InvalidData(format!(
            "ring_field_offset {ring_field_offset} is not a valid column for stride {stride}"
        )));
    }
    if data.len() % stride != 0 {
        return Err(Error::InvalidData(format!(
            "buffer of {} values is not a whole number of {stride}-value rows",
            data.len()
        )));
    }

    let optional_column = |row: &[f32], column: usize| -> f32 {
        if column == ring_field_offset {
            0.0
        } else {
            row.get(column).copied().unwrap_or(0.0)
        }
    };

    data.chunks_exact(stride)
        .enumerate()
        .map(|(row_index, row)| -> Result<RingPoint> {
            let ring = decode_ring(row[ring_field_offset], row_index)?;
            Ok(RingPoint {
                position: Point3f::new(row[0], row[1], row[2]),
                intensity: optional_column(row, INTENSITY_COLUMN),
                time: optional_column(row, TIME_COLUMN),
                ring,
            })
        })
        .collect()
}

fn decode_ring(value: f32, row_index: usize) -> Result<u32> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f32 {
        return Err(Error::InvalidData(format!(
            "row {row_index} has ring value {value}, expected a non-negative integer"
        )));
    }
    Ok(value as u32)
}
