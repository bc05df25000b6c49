//! Core domain traits for leg geometry.
//!
//! These are intentionally minimal. Routing engines and apps implement
//! them for their own step and leg models; `crate::osrm` does so for OSRM
//! route responses.

use crate::polyline::{Coordinate, Polyline};
use crate::stitch::stitch;

/// The smallest unit of route guidance, from one maneuver to the next.
pub trait Step {
    /// The step's own path geometry, including its start point.
    ///
    /// `None` when the geometry is absent or not yet computed.
    fn geometry(&self) -> Option<&Polyline>;

    /// Geometry coordinates, with absent geometry coerced to an empty slice.
    fn coordinates(&self) -> &[Coordinate] {
        self.geometry().map(Polyline::points).unwrap_or(&[])
    }
}

/// A segment of a route between two waypoints, made of ordered steps.
pub trait Leg {
    type Step: Step;

    fn steps(&self) -> &[Self::Step];

    /// Continuous path of the whole leg, computed from the steps on every
    /// call. Callers that need it repeatedly should keep the result.
    fn geometry(&self) -> Polyline {
        stitch(self.steps())
    }
}

impl Step for Polyline {
    fn geometry(&self) -> Option<&Polyline> {
        Some(self)
    }
}

impl Step for Option<Polyline> {
    fn geometry(&self) -> Option<&Polyline> {
        self.as_ref()
    }
}

impl<S: Step> Leg for Vec<S> {
    type Step = S;

    fn steps(&self) -> &[S] {
        self
    }
}
