//! Leg path stitching.
//!
//! Each step geometry starts where the previous one ends, so the first
//! step is kept whole and every later step contributes all but its leading
//! coordinate. Continuity is trusted, not checked; `discontinuities` is
//! available for callers that want to verify their input.

use rayon::prelude::*;

use crate::haversine::haversine_km;
use crate::polyline::{Coordinate, Polyline};
use crate::traits::{Leg, Step};

/// Builds one continuous path from ordered step geometries.
///
/// The shared boundary coordinate between consecutive steps appears once.
/// Steps with absent or empty geometry contribute nothing and do not bridge
/// a gap. Never fails; discontinuous input yields a well-formed but
/// possibly wrong path.
pub fn stitch<S: Step>(steps: &[S]) -> Polyline {
    let Some((first, rest)) = steps.split_first() else {
        return Polyline::default();
    };

    let mut path = Polyline::with_capacity(stitched_len(steps));
    path.extend_from_slice(first.coordinates());
    for step in rest {
        path.extend_from_slice(drop_first(step.coordinates()));
    }

    path
}

/// Number of coordinates `stitch` produces for `steps`.
pub fn stitched_len<S: Step>(steps: &[S]) -> usize {
    let Some((first, rest)) = steps.split_first() else {
        return 0;
    };

    first.coordinates().len()
        + rest
            .iter()
            .map(|step| step.coordinates().len().saturating_sub(1))
            .sum::<usize>()
}

/// Stitches many legs in parallel. Output order follows `legs`.
pub fn stitch_legs<L>(legs: &[L]) -> Vec<Polyline>
where
    L: Leg + Sync,
{
    legs.par_iter().map(|leg| leg.geometry()).collect()
}

/// A step whose leading coordinate is not the end of the path before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Discontinuity {
    /// Index of the offending step within the leg.
    pub step_index: usize,
    /// Last coordinate of the path built from earlier steps, if any.
    pub expected: Option<Coordinate>,
    /// Leading coordinate of the step, which `stitch` drops.
    pub found: Coordinate,
    /// Great-circle distance between `expected` and `found`.
    pub gap_km: Option<f64>,
}

/// Reports every step boundary where `stitch` would drop a coordinate that
/// does not equal the end of the path so far.
///
/// Equality is exact. Steps with empty geometry are skipped since they
/// contribute nothing to the path.
pub fn discontinuities<S: Step>(steps: &[S]) -> Vec<Discontinuity> {
    let Some((first, rest)) = steps.split_first() else {
        return Vec::new();
    };

    let mut gaps = Vec::new();
    let mut path_end = first.coordinates().last().copied();

    for (offset, step) in rest.iter().enumerate() {
        let Some((&found, tail)) = step.coordinates().split_first() else {
            continue;
        };
        let step_index = offset + 1;

        match path_end {
            Some(expected) if expected == found => {}
            Some(expected) => {
                let gap_km = haversine_km(expected, found);
                tracing::debug!(
                    step_index,
                    ?expected,
                    ?found,
                    gap_km,
                    "step does not start where the previous step ends"
                );
                gaps.push(Discontinuity {
                    step_index,
                    expected: Some(expected),
                    found,
                    gap_km: Some(gap_km),
                });
            }
            None => {
                tracing::debug!(step_index, ?found, "leading coordinate dropped from empty path");
                gaps.push(Discontinuity {
                    step_index,
                    expected: None,
                    found,
                    gap_km: None,
                });
            }
        }

        if let Some(&end) = tail.last() {
            path_end = Some(end);
        }
    }

    gaps
}

fn drop_first(points: &[Coordinate]) -> &[Coordinate] {
    points.split_first().map(|(_, tail)| tail).unwrap_or(&[])
}
