//! Extraction configuration
//!
//! The configuration is a plain value fixed when the extractor is built. The
//! defaults describe a 16-beam sensor with the classic LOAM selection limits.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest supported number of scan lines
pub const MAX_RING_COUNT: u32 = 256;

/// Numeric limits used by the curvature, suppression and selection stages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureThresholds {
    /// Points on each side of the curvature window; also the margin excluded at
    /// ring and scan boundaries and the reach of neighbour suppression
    pub neighbor_margin: usize,
    /// Sectors each ring's valid range is split into
    pub sector_count: usize,
    /// Squared gap between consecutive points above which an occlusion is checked
    pub occlusion_gap: f32,
    /// Maximum residual / far-depth ratio for a gap to count as an occlusion edge
    pub occlusion_ratio: f32,
    /// Grazing test: both squared gaps must exceed `grazing_factor * depth`
    pub grazing_factor: f32,
    /// Corners need curvature strictly above this
    pub corner_curvature: f32,
    /// Surfaces need curvature strictly below this
    pub surface_curvature: f32,
    pub max_sharp_corners: usize,
    pub max_less_sharp_corners: usize,
    pub max_flat_surfaces: usize,
    /// Suppression stops at the first consecutive squared gap above this
    pub propagation_gap: f32,
}

impl Default for FeatureThresholds {
    fn default() -> Self {
        Self {
            neighbor_margin: 5,
            sector_count: 6,
            occlusion_gap: 0.1,
            occlusion_ratio: 0.1,
            grazing_factor: 0.0002,
            corner_curvature: 0.1,
            surface_curvature: 0.1,
            max_sharp_corners: 2,
            max_less_sharp_corners: 20,
            max_flat_surfaces: 4,
            propagation_gap: 0.05,
        }
    }
}

impl FeatureThresholds {
    /// Check that the limits describe a usable selection policy
    pub fn validate(&self) -> Result<()> {
        if self.neighbor_margin == 0 {
            return Err(Error::InvalidData(
                "neighbor_margin must be greater than 0".to_string(),
            ));
        }
        if self.sector_count == 0 {
            return Err(Error::InvalidData(
                "sector_count must be greater than 0".to_string(),
            ));
        }
        let named = [
            ("occlusion_gap", self.occlusion_gap),
            ("occlusion_ratio", self.occlusion_ratio),
            ("grazing_factor", self.grazing_factor),
            ("corner_curvature", self.corner_curvature),
            ("surface_curvature", self.surface_curvature),
            ("propagation_gap", self.propagation_gap),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidData(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.max_sharp_corners > self.max_less_sharp_corners {
            return Err(Error::InvalidData(format!(
                "max_sharp_corners ({}) cannot exceed max_less_sharp_corners ({})",
                self.max_sharp_corners, self.max_less_sharp_corners
            )));
        }
        Ok(())
    }
}

/// Configuration for the feature extraction pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of sensor scan lines; ring ids must lie in `0..ring_count`
    pub ring_count: u32,
    /// Column holding the ring id in raw frame rows
    pub ring_field_offset: usize,
    /// Points at or inside this range from the sensor are discarded
    pub min_range: f32,
    pub thresholds: FeatureThresholds,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ring_count: 16,
            ring_field_offset: 4,
            min_range: 2.0,
            thresholds: FeatureThresholds::default(),
        }
    }
}

impl ExtractionConfig {
    pub fn with_ring_count(mut self, ring_count: u32) -> Self {
        self.ring_count = ring_count;
        self
    }

    pub fn with_min_range(mut self, min_range: f32) -> Self {
        self.min_range = min_range;
        self
    }

    pub fn with_ring_field_offset(mut self, ring_field_offset: usize) -> Self {
        self.ring_field_offset = ring_field_offset;
        self
    }

    pub fn with_thresholds(mut self, thresholds: FeatureThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.ring_count == 0 {
            return Err(Error::InvalidData(
                "ring_count must be greater than 0".to_string(),
            ));
        }
        if self.ring_count > MAX_RING_COUNT {
            return Err(Error::InvalidData(format!(
                "ring_count {} exceeds the supported maximum of {MAX_RING_COUNT}",
                self.ring_count
            )));
        }
        if !self.min_range.is_finite() {
            return Err(Error::InvalidData(format!(
                "min_range must be finite, got {}",
                self.min_range
            )));
        }
        if self.ring_field_offset < 3 {
            return Err(Error::InvalidData(format!(
                "ring_field_offset {} overlaps the x/y/z columns",
                self.ring_field_offset
            )));
        }
        self.thresholds.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ring_count, 16);
        assert_eq!(config.ring_field_offset, 4);
        assert_eq!(config.min_range, 2.0);
        assert_eq!(config.thresholds.neighbor_margin, 5);
        assert_eq!(config.thresholds.sector_count, 6);
    }

    #[test]
    fn test_zero_rings_rejected() {
        let config = ExtractionConfig::default().with_ring_count(0);
        assert!(matches!(config.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_ring_count_is_capped() {
        let config = ExtractionConfig::default().with_ring_count(MAX_RING_COUNT);
        assert!(config.validate().is_ok());

        let config = ExtractionConfig::default().with_ring_count(u32::MAX);
        assert!(matches!(config.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_non_finite_min_range_rejected() {
        let config = ExtractionConfig::default().with_min_range(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_min_range_allowed() {
        let config = ExtractionConfig::default().with_min_range(-1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ring_offset_inside_position_rejected() {
        let config = ExtractionConfig::default().with_ring_field_offset(2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_validation() {
        let mut thresholds = FeatureThresholds::default();
        thresholds.neighbor_margin = 0;
        assert!(thresholds.validate().is_err());

        let mut thresholds = FeatureThresholds::default();
        thresholds.max_sharp_corners = 21;
        assert!(thresholds.validate().is_err());

        let mut thresholds = FeatureThresholds::default();
        thresholds.occlusion_gap = -0.1;
        assert!(thresholds.validate().is_err());
    }
}
