//! Proximity filtering

use loamfeat_core::{PointCloud, RingTagged};

/// Remove returns that lie too close to the sensor
///
/// Keeps exactly the points whose squared range exceeds `min_range²`, in their
/// original order. Returns off the vehicle body or the mounting bracket end up
/// here. A `min_range` of zero or less keeps every point.
///
/// # Arguments
/// * `cloud` - Input scan in acquisition order
/// * `min_range` - Minimum distance from the sensor origin
///
/// # Example
/// ```rust
/// use loamfeat_core::{PointCloud, RingPoint};
/// use loamfeat_algorithms::remove_close_points;
///
/// let scan = PointCloud::from_points(vec![
///     RingPoint::new(0.5, 0.0, 0.0, 0),
///     RingPoint::new(5.0, 0.0, 0.0, 0),
/// ]);
///
/// let filtered = remove_close_points(&scan, 2.0);
/// assert_eq!(filtered.len(), 1);
/// ```
pub fn remove_close_points<T>(cloud: &PointCloud<T>, min_range: f32) -> PointCloud<T>
where
    T: RingTagged + Clone,
{
    if min_range <= 0.0 {
        return cloud.clone();
    }

    let threshold = min_range * min_range;
    let filtered: PointCloud<T> = cloud
        .iter()
        .filter(|point| point.position().coords.norm_squared() > threshold)
        .cloned()
        .collect();

    log::debug!(
        "proximity filter kept {} of {} points (min range {})",
        filtered.len(),
        cloud.len(),
        min_range
    );
    filtered
}
