//! Loop winding and per-curve direction resolution.

use sketch_svg_geom::Curve;
use sketch_svg_math::Tolerance;

/// Whether a closed loop of curves winds clockwise.
///
/// Uses the shoelace sign test `Σ (e.x - s.x)(e.y + s.y) > 0` over each
/// curve's start and end point. A loop made of a single closed curve has
/// no meaningful winding and reports `false`.
pub fn is_clockwise(curves: &[Curve]) -> bool {
    if curves.len() == 1 {
        return false;
    }
    let sum: f64 = curves
        .iter()
        .map(|c| {
            let s = c.start_point();
            let e = c.end_point();
            (e.x - s.x) * (e.y + s.y)
        })
        .sum();
    sum > 0.0
}

/// Decide which curves must be traversed backwards to chain end to end.
///
/// The first curve is flipped when its start touches the second curve, so
/// that it ends at the shared point. Every later curve is flipped unless it
/// already starts where the previous curve ended. Points match within the
/// relative tolerance of [`Tolerance::points_close`].
pub fn resolve_flips(curves: &[Curve]) -> Vec<bool> {
    if curves.len() == 1 {
        return vec![false];
    }

    let tol = Tolerance::DEFAULT;
    let mut flips = Vec::with_capacity(curves.len());
    let mut prev_end = None;

    for curve in curves {
        let start = curve.start_point();
        let flip = match prev_end {
            None => {
                let next = &curves[1];
                tol.points_close(&start, &next.start_point())
                    || tol.points_close(&start, &next.end_point())
            }
            Some(end) => !tol.points_close(&start, &end),
        };
        prev_end = Some(if flip { start } else { curve.end_point() });
        flips.push(flip);
    }

    flips
}
