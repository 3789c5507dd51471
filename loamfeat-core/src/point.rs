//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use bytemuck::{Pod, Zeroable};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A LiDAR return tagged with the scan line (ring) that produced it
///
/// `intensity` and `time` are carried through the pipeline untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct RingPoint {
    pub position: Point3f,
    pub intensity: f32,
    /// Relative acquisition time within the sweep
    pub time: f32,
    pub ring: u32,
}

unsafe impl Pod for RingPoint {}
unsafe impl Zeroable for RingPoint {}

impl RingPoint {
    /// Create a point with zero intensity and time
    pub fn new(x: f32, y: f32, z: f32, ring: u32) -> Self {
        Self {
            position: Point3f::new(x, y, z),
            intensity: 0.0,
            time: 0.0,
            ring,
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_time(mut self, time: f32) -> Self {
        self.time = time;
        self
    }
}

impl Default for RingPoint {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            intensity: 0.0,
            time: 0.0,
            ring: 0,
        }
    }
}
