//! # loamfeat algorithms
//!
//! The stages of LOAM-style feature extraction for a single rotating-LiDAR
//! scan, and the [`FeatureExtractor`] that chains them:
//!
//! 1. [`remove_close_points`] drops returns inside the minimum range.
//! 2. [`partition_by_ring`] regroups the scan into contiguous ring blocks.
//! 3. [`compute_curvatures`] scores local smoothness per point.
//! 4. [`mark_unreliable_points`] suppresses occlusion edges and grazing returns.
//! 5. [`classify_features`] picks sharp/less-sharp corners and flat/less-flat
//!    surface points per angular sector.

pub mod filtering;
pub mod scan_lines;
pub mod curvature;
pub mod occlusion;
pub mod classification;
pub mod extraction;

// Re-export commonly used items
pub use filtering::*;
pub use scan_lines::*;
pub use curvature::*;
pub use occlusion::*;
pub use classification::*;
pub use extraction::*;
