//! Feature extraction pipeline
//!
//! Chains the five stages for one scan:
//! proximity filter, ring partitioning, curvature, occlusion/grazing
//! suppression and sector classification. The extractor holds only its
//! configuration, so one instance can serve any number of frames from any
//! number of threads.

use crate::classification::{classify_features, Classification, FeatureCounts, FeatureIndices};
use crate::curvature::compute_curvatures;
use crate::filtering::remove_close_points;
use crate::occlusion::mark_unreliable_points;
use crate::scan_lines::{partition_by_ring, ScanLines};
use loamfeat_core::{
    decode_raw_frame, ExtractionConfig, PointCloud, Result, RingPoint, RingTagged,
};
use rayon::prelude::*;

/// The four feature point sets of one scan, copied out of the partitioned scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFeatures<T> {
    pub sharp_corners: PointCloud<T>,
    pub less_sharp_corners: PointCloud<T>,
    pub flat_surfaces: PointCloud<T>,
    pub less_flat_surfaces: PointCloud<T>,
}

impl<T> ScanFeatures<T> {
    pub fn counts(&self) -> FeatureCounts {
        FeatureCounts {
            sharp_corners: self.sharp_corners.len(),
            less_sharp_corners: self.less_sharp_corners.len(),
            flat_surfaces: self.flat_surfaces.len(),
            less_flat_surfaces: self.less_flat_surfaces.len(),
        }
    }
}

/// Everything the pipeline computed for one scan, for callers that want
/// indices, labels or the suppression mask rather than point copies
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutput<T> {
    /// The filtered scan regrouped by ring; all indices refer to this
    pub lines: ScanLines<T>,
    pub curvature: Vec<f32>,
    pub classification: Classification,
}

impl<T> ExtractionOutput<T> {
    pub fn indices(&self) -> &FeatureIndices {
        &self.classification.indices
    }
}

/// LOAM-style edge and planar feature extractor
///
/// A lone return standing off an otherwise smooth line has large gaps to both
/// neighbours, so the grazing test suppresses it and it is reported only as a
/// less flat surface point. Raise `grazing_factor` to keep such spikes
/// eligible as corners.
///
/// # Example
/// ```rust
/// use loamfeat_core::{ExtractionConfig, PointCloud, RingPoint};
/// use loamfeat_algorithms::FeatureExtractor;
///
/// fn main() -> loamfeat_core::Result<()> {
///     let config = ExtractionConfig::default().with_ring_count(1);
///     let extractor = FeatureExtractor::new(config)?;
///
///     let scan: PointCloud<RingPoint> = (0..64)
///         .map(|i| RingPoint::new(10.0, -0.64 + 0.02 * i as f32, 0.0, 0))
///         .collect();
///
///     let features = extractor.extract(&scan)?;
///     assert!(features.sharp_corners.is_empty());
///     assert!(!features.flat_surfaces.is_empty());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: ExtractionConfig,
}

impl FeatureExtractor {
    /// Create an extractor, validating the configuration once up front
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run all stages and return the point index sets along with the
    /// partitioned scan they index into
    pub fn extract_indices<T>(&self, cloud: &PointCloud<T>) -> Result<ExtractionOutput<T>>
    where
        T: RingTagged + Clone,
    {
        let thresholds = &self.config.thresholds;

        let filtered = remove_close_points(cloud, self.config.min_range);
        let lines = partition_by_ring(&filtered, self.config.ring_count)?;
        let curvatures = compute_curvatures(&lines, thresholds.neighbor_margin)?;
        let suppressed = mark_unreliable_points(&lines.cloud, thresholds);
        let classification =
            classify_features(&lines.cloud, &curvatures, suppressed, thresholds)?;

        let counts = classification.indices.counts();
        log::debug!(
            "extracted {} sharp, {} less sharp, {} flat, {} less flat from {} points",
            counts.sharp_corners,
            counts.less_sharp_corners,
            counts.flat_surfaces,
            counts.less_flat_surfaces,
            lines.len()
        );

        Ok(ExtractionOutput {
            lines,
            curvature: curvatures.scores,
            classification,
        })
    }

    /// Run all stages and copy out the four feature point sets
    pub fn extract<T>(&self, cloud: &PointCloud<T>) -> Result<ScanFeatures<T>>
    where
        T: RingTagged + Clone,
    {
        let output = self.extract_indices(cloud)?;
        let scan = &output.lines.cloud;
        let indices = output.indices();

        Ok(ScanFeatures {
            sharp_corners: scan.select(&indices.sharp_corners)?,
            less_sharp_corners: scan.select(&indices.less_sharp_corners)?,
            flat_surfaces: scan.select(&indices.flat_surfaces)?,
            less_flat_surfaces: scan.select(&indices.less_flat_surfaces)?,
        })
    }

    /// Decode a flat driver buffer (see [`decode_raw_frame`]) and extract features
    pub fn extract_raw(&self, data: &[f32], stride: usize) -> Result<ScanFeatures<RingPoint>> {
        let cloud = decode_raw_frame(data, stride, self.config.ring_field_offset)?;
        self.extract(&cloud)
    }

    /// Extract features from independent frames in parallel
    ///
    /// Results come back in input order; a failing frame does not affect the
    /// others.
    pub fn extract_batch<T>(&self, frames: &[PointCloud<T>]) -> Vec<Result<ScanFeatures<T>>>
    where
        T: RingTagged + Clone + Send + Sync,
    {
        frames.par_iter().map(|frame| self.extract(frame)).collect()
    }
}
