//! Occlusion and grazing-incidence suppression
//!
//! Points next to a depth discontinuity, or on a surface nearly parallel to the
//! beam, give unreliable curvature. They are flagged here so the classifier
//! never selects them as corners or flat surfaces.

use loamfeat_core::{squared_gap, FeatureThresholds, PointCloud, RingTagged};
use std::ops::RangeInclusive;

/// Per-point "unusable for new feature selection" flags
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuppressionMask {
    flags: Vec<bool>,
}

impl SuppressionMask {
    /// A mask of `len` points, none suppressed
    pub fn new(len: usize) -> Self {
        Self {
            flags: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Out-of-range indices read as suppressed so they can never be selected.
    pub fn is_suppressed(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(true)
    }

    /// Flag `index`; indices past the end are ignored
    pub fn suppress(&mut self, index: usize) {
        if let Some(flag) = self.flags.get_mut(index) {
            *flag = true;
        }
    }

    /// Flag every index of `range` that lies inside the mask
    pub fn suppress_range(&mut self, range: RangeInclusive<usize>) {
        let end = (*range.end()).min(self.flags.len().saturating_sub(1));
        if self.flags.is_empty() || *range.start() > end {
            return;
        }
        self.flags[*range.start()..=end].fill(true);
    }

    /// Number of suppressed points
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&flag| flag).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }
}

/// Flag occlusion edges and grazing returns over the whole scan
///
/// For each `i` in `margin..=len - margin - 2`:
/// * if the squared gap to `i + 1` exceeds `occlusion_gap`, the farther of the
///   two points is scaled onto the nearer one's depth; when the remaining
///   offset relative to the far depth is below `occlusion_ratio`, the `margin`
///   points on the near side (`i - margin..=i` or `i + 1..=i + margin`) are
///   suppressed.
/// * if the squared gaps to both `i - 1` and `i + 1` exceed
///   `grazing_factor * depth(i)`, point `i` is suppressed.
pub fn mark_unreliable_points<T: RingTagged>(
    cloud: &PointCloud<T>,
    thresholds: &FeatureThresholds,
) -> SuppressionMask {
    let points = cloud.as_slice();
    let margin = thresholds.neighbor_margin;
    let mut mask = SuppressionMask::new(points.len());

    let Some(last) = points.len().checked_sub(margin + 2) else {
        return mask;
    };
    if last < margin {
        return mask;
    }

    for i in margin..=last {
        let current = &points[i];
        let next = &points[i + 1];
        let gap = squared_gap(current, next);

        if gap > thresholds.occlusion_gap {
            let (depth_i, depth_next) = (current.depth(), next.depth());
            let near_is_current = depth_i <= depth_next;
            let (near, far, depth_near, depth_far) = if near_is_current {
                (current, next, depth_i, depth_next)
            } else {
                (next, current, depth_next, depth_i)
            };

            let scaled_far = far.position().coords * (depth_near / depth_far);
            let residual = (scaled_far - near.position().coords).norm();
            if residual / depth_far < thresholds.occlusion_ratio {
                if near_is_current {
                    mask.suppress_range(i - margin..=i);
                } else {
                    mask.suppress_range(i + 1..=i + margin);
                }
            }
        }

        // The first point has no predecessor and cannot be a grazing return
        let Some(previous) = i.checked_sub(1).and_then(|p| points.get(p)) else {
            continue;
        };
        let gap_prev = squared_gap(current, previous);
        let grazing_limit = thresholds.grazing_factor * current.depth();
        if gap > grazing_limit && gap_prev > grazing_limit {
            mask.suppress(i);
        }
    }

    log::debug!(
        "suppressed {} of {} points near occlusions or at grazing incidence",
        mask.count(),
        mask.len()
    );
    mask
}
