//! Polyline representation for step and leg geometries.
//!
//! This module provides a type for working with polylines as decoded
//! coordinate sequences. Wire formats (GeoJSON positions from OSRM) are
//! converted at the boundary, in the `osrm` module.

use serde::{Deserialize, Serialize};

use crate::haversine::path_length_km;

/// A (latitude, longitude) pair.
///
/// Compared with exact value equality; no epsilon is applied anywhere in
/// this crate.
pub type Coordinate = (f64, f64);

/// An ordered sequence of coordinates describing a connected line.
///
/// May be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    ///
    /// Each point is a (latitude, longitude) tuple.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Creates an empty polyline with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Coordinate> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Coordinate> {
        self.points.last().copied()
    }

    /// Length along the line in kilometers.
    pub fn length_km(&self) -> f64 {
        path_length_km(&self.points)
    }

    pub(crate) fn extend_from_slice(&mut self, points: &[Coordinate]) {
        self.points.extend_from_slice(points);
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.points.capacity()
    }
}

impl From<Vec<Coordinate>> for Polyline {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Coordinate> for Polyline {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
