//! Sector-based feature classification
//!
//! Each ring's valid range is cut into angular sectors so that features are
//! spread around the sweep. Within a sector the points are ranked by
//! curvature; the sharpest unsuppressed points become corners and the
//! smoothest become flat surface points. Every selection suppresses its
//! neighbours on the same physical patch so features do not cluster.

use crate::curvature::{Curvatures, ValidRange};
use crate::occlusion::SuppressionMask;
use loamfeat_core::{squared_gap, Error, FeatureThresholds, PointCloud, Result, RingTagged};

/// Label a point ends up with after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeatureLabel {
    #[default]
    Unlabeled,
    SharpCorner,
    LessSharpCorner,
    FlatSurface,
    LessFlatSurface,
}

impl FeatureLabel {
    pub fn is_corner(self) -> bool {
        matches!(self, FeatureLabel::SharpCorner | FeatureLabel::LessSharpCorner)
    }
}

/// Selected point indices into the partitioned scan, in selection order
///
/// The sets overlap by construction: every sharp corner is also a less-sharp
/// corner and every flat surface point is also a less-flat one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureIndices {
    pub sharp_corners: Vec<usize>,
    pub less_sharp_corners: Vec<usize>,
    pub flat_surfaces: Vec<usize>,
    pub less_flat_surfaces: Vec<usize>,
}

/// Sizes of the four feature sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureCounts {
    pub sharp_corners: usize,
    pub less_sharp_corners: usize,
    pub flat_surfaces: usize,
    pub less_flat_surfaces: usize,
}

impl FeatureIndices {
    pub fn counts(&self) -> FeatureCounts {
        FeatureCounts {
            sharp_corners: self.sharp_corners.len(),
            less_sharp_corners: self.less_sharp_corners.len(),
            flat_surfaces: self.flat_surfaces.len(),
            less_flat_surfaces: self.less_flat_surfaces.len(),
        }
    }
}

/// Output of [`classify_features`]
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub indices: FeatureIndices,
    /// Final label of every point of the scan
    pub labels: Vec<FeatureLabel>,
    /// Suppression state after selection and neighbour propagation
    pub suppressed: SuppressionMask,
}

/// Half-open index range `[sp, ep)` of one sector of a ring's valid range
///
/// Uses floor interpolation between the range ends, so the last index of a
/// sector is also the first index of the next one.
pub fn sector_bounds(range: ValidRange, sector: usize, sector_count: usize) -> (usize, usize) {
    let (start, end) = (range.start, range.end);
    let sp = (start * (sector_count - sector) + end * sector) / sector_count;
    let ep = (start * (sector_count - 1 - sector) + end * (sector + 1)) / sector_count + 1;
    (sp, ep)
}

/// Select corner and surface features ring by ring, sector by sector
///
/// `suppressed` is the occlusion/grazing mask; it is extended with every
/// selection and its propagated neighbours and handed back in the result.
///
/// # Errors
/// [`Error::BoundsViolation`] if `curvatures` or `suppressed` do not match the
/// scan length, or a valid range leaves no `neighbor_margin` points of room to
/// either end of the scan.
pub fn classify_features<T: RingTagged>(
    cloud: &PointCloud<T>,
    curvatures: &Curvatures,
    mut suppressed: SuppressionMask,
    thresholds: &FeatureThresholds,
) -> Result<Classification> {
    let points = cloud.as_slice();
    let len = points.len();
    let margin = thresholds.neighbor_margin;
    let sector_count = thresholds.sector_count;

    for other in [curvatures.len(), suppressed.len()] {
        if other != len {
            return Err(Error::BoundsViolation {
                index: len.max(other) - 1,
                len: len.min(other),
            });
        }
    }
    for range in curvatures.bounds.iter().filter(|range| !range.is_empty()) {
        if range.start < margin || range.end + margin >= len {
            return Err(Error::BoundsViolation {
                index: range.end + margin,
                len,
            });
        }
    }

    let scores = &curvatures.scores;
    let mut labels = vec![FeatureLabel::Unlabeled; len];
    let mut in_less_flat = vec![false; len];
    let mut indices = FeatureIndices::default();

    for (ring, range) in curvatures.bounds.iter().enumerate() {
        if range.is_empty() {
            continue;
        }

        for sector in 0..sector_count {
            let (sp, ep) = sector_bounds(*range, sector, sector_count);
            let mut ranked: Vec<usize> = (sp..ep).collect();
            ranked.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

            // Corners, sharpest first
            let mut sharp = 0;
            let mut picked = 0;
            for &index in ranked.iter().rev() {
                if picked >= thresholds.max_less_sharp_corners {
                    break;
                }
                let sharp_enough = scores[index] > thresholds.corner_curvature;
                if suppressed.is_suppressed(index) || !sharp_enough {
                    continue;
                }

                picked += 1;
                if sharp < thresholds.max_sharp_corners {
                    sharp += 1;
                    labels[index] = FeatureLabel::SharpCorner;
                    indices.sharp_corners.push(index);
                } else {
                    labels[index] = FeatureLabel::LessSharpCorner;
                }
                indices.less_sharp_corners.push(index);

                suppressed.suppress(index);
                suppress_neighbors(
                    points,
                    &mut suppressed,
                    index,
                    margin,
                    thresholds.propagation_gap,
                );
            }

            // Flat surfaces, smoothest first
            let mut flat = 0;
            for &index in &ranked {
                if flat >= thresholds.max_flat_surfaces {
                    break;
                }
                let flat_enough = scores[index] < thresholds.surface_curvature;
                if suppressed.is_suppressed(index) || !flat_enough {
                    continue;
                }

                flat += 1;
                labels[index] = FeatureLabel::FlatSurface;
                indices.flat_surfaces.push(index);

                suppressed.suppress(index);
                suppress_neighbors(
                    points,
                    &mut suppressed,
                    index,
                    margin,
                    thresholds.propagation_gap,
                );
            }

            // Everything that did not become a corner
            for &index in &ranked {
                if labels[index].is_corner() || in_less_flat[index] {
                    continue;
                }
                in_less_flat[index] = true;
                if labels[index] == FeatureLabel::Unlabeled {
                    labels[index] = FeatureLabel::LessFlatSurface;
                }
                indices.less_flat_surfaces.push(index);
            }

            log::trace!(
                "ring {} sector {} [{}, {}): {} corners ({} sharp), {} flat",
                ring,
                sector,
                sp,
                ep,
                picked,
                sharp,
                flat
            );
        }
    }

    Ok(Classification {
        indices,
        labels,
        suppressed,
    })
}

/// Suppress up to `margin` points on each side of `index`, stopping at the
/// first consecutive squared gap above `max_gap`.
fn suppress_neighbors<T: RingTagged>(
    points: &[T],
    suppressed: &mut SuppressionMask,
    index: usize,
    margin: usize,
    max_gap: f32,
) {
    for offset in 1..=margin {
        let neighbor = index + offset;
        let (Some(point), Some(previous)) = (points.get(neighbor), points.get(neighbor - 1))
        else {
            break;
        };
        if squared_gap(point, previous) > max_gap {
            break;
        }
        suppressed.suppress(neighbor);
    }

    for offset in 1..=margin {
        let Some(neighbor) = index.checked_sub(offset) else {
            break;
        };
        let (Some(point), Some(following)) = (points.get(neighbor), points.get(neighbor + 1))
        else {
            break;
        };
        if squared_gap(point, following) > max_gap {
            break;
        }
        suppressed.suppress(neighbor);
    }
}
