//! leg-shape
//!
//! Builds the continuous path geometry of a route leg from the geometries
//! of its steps.

pub mod traits;
pub mod stitch;
pub mod polyline;
pub mod haversine;
pub mod osrm;
pub mod osrm_data;
