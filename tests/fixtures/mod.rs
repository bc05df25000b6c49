//! Test fixtures for leg-shape.
//!
//! Provides builder-style step and leg types plus a handful of real
//! Las Vegas coordinates (from OpenStreetMap) that route with OSRM
//! Nevada data.

#![allow(dead_code)]

use leg_shape::polyline::{Coordinate, Polyline};
use leg_shape::traits::{Leg, Step};

pub const WYNN: Coordinate = (36.1263781, -115.1658180);
pub const BELLAGIO: Coordinate = (36.1126, -115.1767);
pub const MGM_GRAND: Coordinate = (36.1023654, -115.1688720);
pub const CAESARS_PALACE: Coordinate = (36.1162, -115.1745);

/// Builder for test steps. Geometry is absent until points are given.
#[derive(Clone, Debug, Default)]
pub struct TestStep {
    pub instruction: String,
    pub geometry: Option<Polyline>,
}

impl TestStep {
    pub fn new(instruction: &str) -> Self {
        Self {
            instruction: instruction.to_string(),
            geometry: None,
        }
    }

    pub fn points(mut self, points: &[Coordinate]) -> Self {
        self.geometry = Some(Polyline::new(points.to_vec()));
        self
    }

    pub fn empty(mut self) -> Self {
        self.geometry = Some(Polyline::default());
        self
    }
}

impl Step for TestStep {
    fn geometry(&self) -> Option<&Polyline> {
        self.geometry.as_ref()
    }
}

#[derive(Clone, Debug, Default)]
pub struct TestLeg {
    pub steps: Vec<TestStep>,
}

impl TestLeg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: TestStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Splits `path` into consecutive steps of `sizes[i]` points each, with
    /// every step starting at the previous step's last point.
    pub fn split(path: &[Coordinate], sizes: &[usize]) -> Self {
        let mut leg = Self::new();
        let mut start = 0;
        for (i, &size) in sizes.iter().enumerate() {
            let end = (start + size).min(path.len());
            leg = leg.step(TestStep::new(&format!("step {}", i)).points(&path[start..end]));
            start = end.saturating_sub(1);
        }
        leg
    }
}

impl Leg for TestLeg {
    type Step = TestStep;

    fn steps(&self) -> &[TestStep] {
        &self.steps
    }
}

/// A deterministic zig-zag path of `n` distinct points starting at `origin`.
pub fn zigzag(origin: Coordinate, n: usize) -> Vec<Coordinate> {
    (0..n)
        .map(|i| {
            let lat = origin.0 + i as f64 * 0.0005;
            let lng = origin.1 + if i % 2 == 0 { 0.0 } else { 0.0003 };
            (lat, lng)
        })
        .collect()
}
