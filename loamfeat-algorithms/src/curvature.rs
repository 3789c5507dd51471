//! Curvature estimation
//!
//! Each point is scored by how far it bends away from its `margin` neighbours
//! on either side of the same ring. Per axis the score is the convolution with
//! a kernel of `2 * margin` ones and a centre tap of `-2 * margin` (for the
//! default margin of 5: ten ones and a -10), and the three axis responses are
//! summed in quadrature. Planar stretches score close to zero and edges score
//! high.

use crate::scan_lines::ScanLines;
use loamfeat_core::{Error, Result, RingTagged, Vector3f};

/// Indices of a ring that have a full curvature window (inclusive bounds)
///
/// `start` is the ring's first index plus the margin and `end` the last index
/// minus the margin. Rings shorter than `2 * margin + 1` points get an empty
/// range with `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidRange {
    pub start: usize,
    pub end: usize,
}

impl ValidRange {
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

/// Per-point curvature scores and per-ring valid ranges
#[derive(Debug, Clone, PartialEq)]
pub struct Curvatures {
    /// One score per point of the partitioned scan; 0 outside every valid range
    pub scores: Vec<f32>,
    /// One range per ring, indexed by ring id
    pub bounds: Vec<ValidRange>,
}

impl Curvatures {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Score every point that has `margin` same-ring neighbours on both sides
///
/// # Errors
/// [`Error::BoundsViolation`] if a ring span of `lines` reaches past the end of
/// its cloud.
pub fn compute_curvatures<T: RingTagged>(
    lines: &ScanLines<T>,
    margin: usize,
) -> Result<Curvatures> {
    let points = lines.cloud.as_slice();
    let len = points.len();
    let mut scores = vec![0.0f32; len];
    let mut bounds = Vec::with_capacity(lines.spans.len());

    for span in &lines.spans {
        if span.last >= len || span.first > span.last {
            return Err(Error::BoundsViolation {
                index: span.last,
                len,
            });
        }

        let start = span.first + margin;
        if span.len() < 2 * margin + 1 {
            log::debug!(
                "ring {} has {} points, too few for a curvature window",
                span.ring,
                span.len()
            );
            bounds.push(ValidRange {
                start,
                end: start - 1,
            });
            continue;
        }

        let range = ValidRange {
            start,
            end: span.last - margin,
        };
        for index in range.start..=range.end {
            let window = points
                .get(index - margin..=index + margin)
                .ok_or(Error::BoundsViolation {
                    index: index + margin,
                    len,
                })?;
            scores[index] = bend(window, margin).norm_squared();
        }
        bounds.push(range);
    }

    Ok(Curvatures { scores, bounds })
}

/// Kernel response at the centre of `window`: the summed offsets of every
/// neighbour from the centre point.
fn bend<T: RingTagged>(window: &[T], centre: usize) -> Vector3f {
    let origin = window[centre].position();
    window
        .iter()
        .enumerate()
        .filter(|&(offset, _)| offset != centre)
        .fold(Vector3f::zeros(), |acc, (_, point)| acc + (point.position() - origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_lines::partition_by_ring;
    use approx::assert_relative_eq;
    use loamfeat_core::{PointCloud, RingPoint};

    fn ring_line(ring: u32, n: usize, spacing: f32) -> Vec<RingPoint> {
        (0..n)
            .map(|i| RingPoint::new(10.0, i as f32 * spacing, ring as f32, ring))
            .collect()
    }

    #[test]
    fn test_straight_line_has_zero_curvature() {
        let cloud = PointCloud::from_points(ring_line(0, 20, 0.1));
        let lines = partition_by_ring(&cloud, 1).unwrap();
        let curvatures = compute_curvatures(&lines, 5).unwrap();

        assert_eq!(curvatures.bounds, vec![ValidRange { start: 5, end: 14 }]);
        for index in 5..=14 {
            assert_relative_eq!(curvatures.scores[index], 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_spike_matches_kernel_response() {
        let mut points = ring_line(0, 11, 0.1);
        points[5].position.x += 1.0;
        let cloud = PointCloud::from_points(points);
        let lines = partition_by_ring(&cloud, 1).unwrap();
        let curvatures = compute_curvatures(&lines, 5).unwrap();

        // Ten neighbours each sit 1.0 behind the centre along x
        assert_eq!(curvatures.bounds[0], ValidRange { start: 5, end: 5 });
        assert_relative_eq!(curvatures.scores[5], 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_scores_are_non_negative() {
        let points: Vec<RingPoint> = (0..60)
            .map(|i| {
                let t = i as f32 * 0.3;
                RingPoint::new(5.0 + t.sin(), t.cos() * 2.0, (t * 1.7).sin(), (i % 2) as u32)
            })
            .collect();
        let lines = partition_by_ring(&PointCloud::from_points(points), 2).unwrap();
        let curvatures = compute_curvatures(&lines, 5).unwrap();
        assert_eq!(curvatures.len(), 60);
        assert!(curvatures.scores.iter().all(|&s| s >= 0.0));
    }

    #[test]
    fn test_window_does_not_cross_rings() {
        let mut points = ring_line(0, 12, 0.1);
        let mut far_ring = ring_line(1, 12, 0.1);
        for point in &mut far_ring {
            point.position.x += 50.0;
        }
        points.extend(far_ring);
        let lines = partition_by_ring(&PointCloud::from_points(points), 2).unwrap();
        let curvatures = compute_curvatures(&lines, 5).unwrap();

        assert_eq!(curvatures.bounds[0], ValidRange { start: 5, end: 6 });
        assert_eq!(curvatures.bounds[1], ValidRange { start: 17, end: 18 });
        for range in &curvatures.bounds {
            for index in range.start..=range.end {
                assert_relative_eq!(curvatures.scores[index], 0.0, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_short_ring_has_empty_range() {
        let mut points = ring_line(0, 4, 0.1);
        points.extend(ring_line(1, 15, 0.1));
        let lines = partition_by_ring(&PointCloud::from_points(points), 2).unwrap();
        let curvatures = compute_curvatures(&lines, 5).unwrap();

        assert!(curvatures.bounds[0].is_empty());
        assert_eq!(curvatures.bounds[0].len(), 0);
        assert_eq!(curvatures.bounds[1], ValidRange { start: 9, end: 13 });
        assert!(curvatures.bounds[1].contains(9));
        assert!(!curvatures.bounds[1].contains(14));
    }

    #[test]
    fn test_inconsistent_span_is_rejected() {
        let cloud = PointCloud::from_points(ring_line(0, 12, 0.1));
        let mut lines = partition_by_ring(&cloud, 1).unwrap();
        lines.spans[0].last = 20;
        assert_eq!(
            compute_curvatures(&lines, 5),
            Err(Error::BoundsViolation { index: 20, len: 12 })
        );
    }
}
