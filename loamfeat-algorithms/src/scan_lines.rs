//! Scan-line partitioning
//!
//! Regroups a scan so that each ring occupies one contiguous block, rings in
//! ascending id order, each block in acquisition order.

use loamfeat_core::{Error, PointCloud, Result, RingTagged, MAX_RING_COUNT};
use std::ops::RangeInclusive;

/// Location of one ring's block inside a partitioned scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingSpan {
    pub ring: u32,
    /// Index of the ring's first point
    pub first: usize,
    /// Index of the ring's last point (inclusive)
    pub last: usize,
}

impl RingSpan {
    /// Number of points in the block; never zero
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// A scan regrouped into contiguous ring blocks
#[derive(Debug, Clone, PartialEq)]
pub struct ScanLines<T> {
    pub cloud: PointCloud<T>,
    /// One span per ring, indexed by ring id
    pub spans: Vec<RingSpan>,
}

impl<T> ScanLines<T> {
    pub fn len(&self) -> usize {
        self.cloud.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty()
    }

    pub fn ring_count(&self) -> usize {
        self.spans.len()
    }

    pub fn span(&self, ring: u32) -> Option<&RingSpan> {
        self.spans.get(ring as usize)
    }
}

/// Partition a scan into ring blocks
///
/// Points whose ring id is not in `0..ring_count` are dropped; `ring_count`
/// has to match the sensor or those points are lost.
///
/// # Errors
/// [`Error::EmptyRing`] if any ring in `0..ring_count` has no points, since the
/// later stages need a first and last index for every ring.
/// [`Error::InvalidData`] if `ring_count` exceeds [`MAX_RING_COUNT`].
///
/// # Example
/// ```rust
/// use loamfeat_core::{PointCloud, RingPoint};
/// use loamfeat_algorithms::partition_by_ring;
///
/// fn main() -> loamfeat_core::Result<()> {
///     let scan = PointCloud::from_points(vec![
///         RingPoint::new(1.0, 0.0, 0.0, 1),
///         RingPoint::new(2.0, 0.0, 0.0, 0),
///         RingPoint::new(3.0, 0.0, 0.0, 1),
///     ]);
///
///     let lines = partition_by_ring(&scan, 2)?;
///     assert_eq!(lines.cloud[0].position.x, 2.0);
///     assert_eq!(lines.spans[1].first, 1);
///     Ok(())
/// }
/// ```
pub fn partition_by_ring<T>(cloud: &PointCloud<T>, ring_count: u32) -> Result<ScanLines<T>>
where
    T: RingTagged + Clone,
{
    if ring_count > MAX_RING_COUNT {
        return Err(Error::InvalidData(format!(
            "ring_count {ring_count} exceeds the supported maximum of {MAX_RING_COUNT}"
        )));
    }

    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); ring_count as usize];
    let mut dropped = 0usize;

    for (index, point) in cloud.iter().enumerate() {
        match buckets.get_mut(point.ring() as usize) {
            Some(bucket) => bucket.push(index),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!(
            "dropped {} points with ring ids outside 0..{}",
            dropped,
            ring_count
        );
    }

    if let Some(ring) = buckets.iter().position(|bucket| bucket.is_empty()) {
        return Err(Error::EmptyRing {
            ring: ring as u32,
            point_count: cloud.len(),
        });
    }

    let mut partitioned = PointCloud::with_capacity(cloud.len() - dropped);
    let mut spans = Vec::with_capacity(buckets.len());

    for (ring, bucket) in buckets.iter().enumerate() {
        let first = partitioned.len();
        partitioned.extend(bucket.iter().map(|&index| cloud[index].clone()));
        spans.push(RingSpan {
            ring: ring as u32,
            first,
            last: partitioned.len() - 1,
        });
    }

    Ok(ScanLines {
        cloud: partitioned,
        spans,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use loamfeat_core::RingPoint;

    fn tagged(x: f32, ring: u32) -> RingPoint {
        RingPoint::new(x, 0.0, 0.0, ring)
    }

    #[test]
    fn test_partition_groups_by_ascending_ring() {
        let cloud = PointCloud::from_points(vec![
            tagged(0.0, 2),
            tagged(1.0, 0),
            tagged(2.0, 1),
            tagged(3.0, 0),
            tagged(4.0, 2),
            tagged(5.0, 1),
        ]);

        let lines = partition_by_ring(&cloud, 3).unwrap();
        let xs: Vec<f32> = lines.cloud.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 2.0, 5.0, 0.0, 4.0]);
        assert_eq!(
            lines.spans,
            vec![
                RingSpan { ring: 0, first: 0, last: 1 },
                RingSpan { ring: 1, first: 2, last: 3 },
                RingSpan { ring: 2, first: 4, last: 5 },
            ]
        );
    }

    #[test]
    fn test_partition_is_permutation() {
        let cloud: PointCloud<RingPoint> = (0..40)
            .map(|i| tagged(i as f32, (i * 7 % 4) as u32))
            .collect();
        let lines = partition_by_ring(&cloud, 4).unwrap();
        assert_eq!(lines.len(), cloud.len());

        let mut xs: Vec<f32> = lines.cloud.iter().map(|p| p.position.x).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        let expected: Vec<f32> = (0..40).map(|i| i as f32).collect();
        assert_eq!(xs, expected);

        for span in &lines.spans {
            let block: Vec<f32> = span.indices().map(|i| lines.cloud[i].position.x).collect();
            assert!(block.windows(2).all(|w| w[0] < w[1]));
            assert!(span.indices().all(|i| lines.cloud[i].ring == span.ring));
        }
    }

    #[test]
    fn test_partition_drops_out_of_range_rings() {
        let cloud =
            PointCloud::from_points(vec![tagged(0.0, 0), tagged(1.0, 5), tagged(2.0, 1)]);
        let lines = partition_by_ring(&cloud, 2).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.cloud.iter().all(|p| p.ring < 2));
    }

    #[test]
    fn test_partition_empty_ring_fails() {
        let cloud = PointCloud::from_points(vec![tagged(0.0, 0), tagged(1.0, 2)]);
        let err = partition_by_ring(&cloud, 3).unwrap_err();
        assert_eq!(err, Error::EmptyRing { ring: 1, point_count: 2 });
    }

    #[test]
    fn test_partition_empty_scan_fails() {
        let cloud = PointCloud::<RingPoint>::new();
        assert!(matches!(
            partition_by_ring(&cloud, 16),
            Err(Error::EmptyRing { ring: 0, .. })
        ));
    }

    #[test]
    fn test_partition_rejects_huge_ring_count() {
        let cloud = PointCloud::from_points(vec![tagged(0.0, 0)]);
        assert!(matches!(
            partition_by_ring(&cloud, u32::MAX),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_span_lookup() {
        let cloud =
            PointCloud::from_points(vec![tagged(0.0, 1), tagged(1.0, 0), tagged(2.0, 1)]);
        let lines = partition_by_ring(&cloud, 2).unwrap();
        assert_eq!(lines.span(1).map(|s| s.len()), Some(2));
        assert!(lines.span(2).is_none());
    }
}
