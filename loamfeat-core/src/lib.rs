//! Core data structures and traits for loamfeat
//!
//! This crate provides the fundamental types shared by the feature extraction
//! stages: ring-tagged LiDAR points, the generic point cloud container,
//! the extraction configuration and the error type.

pub mod point;
pub mod point_cloud;
pub mod traits;
pub mod config;
pub mod raw;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use traits::*;
pub use config::*;
pub use raw::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
