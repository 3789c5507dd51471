//! Scan container

use crate::point::RingPoint;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// An ordered point cloud
///
/// For LiDAR scans the order is acquisition order and is meaningful: adjacent
/// points of the same ring are angular neighbours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
}

/// A scan of ring-tagged points
pub type RingScan = PointCloud<RingPoint>;

impl<T> PointCloud<T> {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<T>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: T) {
        self.points.push(point);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.points
    }
}

impl<T: Clone> PointCloud<T> {
    /// Copy out the points at `indices`, in the order given
    ///
    /// Fails with [`Error::BoundsViolation`] on the first index past the end.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let mut points = Vec::with_capacity(indices.len());
        for &index in indices {
            let point = self.points.get(index).ok_or(Error::BoundsViolation {
                index,
                len: self.points.len(),
            })?;
            points.push(point.clone());
        }
        Ok(Self { points })
    }
}

impl<T> Default for PointCloud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PointCloud<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a, T> IntoIterator for &'a PointCloud<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<T> Extend<T> for PointCloud<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl<T> FromIterator<T> for PointCloud<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            points: Vec::from_iter(iter),
        }
    }
}
