//! Core traits for loamfeat

use crate::point::{Point3f, RingPoint};

/// A point that knows its position and the scan line it was measured on
///
/// The extraction stages only look at these two properties; everything else a
/// point type carries is passed through to the output unchanged.
pub trait RingTagged {
    fn position(&self) -> Point3f;

    fn ring(&self) -> u32;

    /// Euclidean distance from the sensor origin
    fn depth(&self) -> f32 {
        self.position().coords.norm()
    }
}

impl RingTagged for RingPoint {
    fn position(&self) -> Point3f {
        self.position
    }

    fn ring(&self) -> u32 {
        self.ring
    }
}

/// Squared Euclidean distance between two tagged points
pub fn squared_gap<T: RingTagged>(a: &T, b: &T) -> f32 {
    (a.position() - b.position()).norm_squared()
}
