//! Loops, profiles and sketches, and their conversion to path data.

use sketch_svg_geom::Curve;

use crate::emit::emit_curve;
use crate::orient::{is_clockwise, resolve_flips};
use crate::{PathError, UnitScale};

/// A closed chain of curves bounding a region.
#[derive(Debug, Clone)]
pub struct ProfileLoop {
    /// Curves in host order. Their individual directions may disagree.
    pub curves: Vec<Curve>,
    /// True for the outer boundary, false for holes.
    pub is_outer: bool,
}

impl ProfileLoop {
    /// Create a loop.
    pub fn new(curves: Vec<Curve>, is_outer: bool) -> Self {
        Self { curves, is_outer }
    }

    /// Whether the loop winds clockwise.
    pub fn is_clockwise(&self) -> bool {
        is_clockwise(&self.curves)
    }
}

/// A region: one outer loop plus any inner loops.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    /// All loops of the region.
    pub loops: Vec<ProfileLoop>,
}

impl Profile {
    /// Create a profile from its loops.
    pub fn new(loops: Vec<ProfileLoop>) -> Self {
        Self { loops }
    }
}

/// Planar sketch geometry as delivered by a host.
#[derive(Debug, Clone, Default)]
pub struct Sketch {
    /// Closed regions found in the sketch.
    pub profiles: Vec<Profile>,
    /// Every sketch curve, whether or not it bounds a region.
    pub curves: Vec<Curve>,
}

impl Sketch {
    /// Create a sketch.
    pub fn new(profiles: Vec<Profile>, curves: Vec<Curve>) -> Self {
        Self { profiles, curves }
    }

    /// The profile with the most loops; the first one wins a tie.
    pub fn representative_profile(&self) -> Option<&Profile> {
        self.profiles.iter().reduce(|best, p| {
            if p.loops.len() > best.loops.len() {
                p
            } else {
                best
            }
        })
    }
}

/// Convert a loop into one continuous run of path data.
///
/// With `reverse` the curves are walked in the opposite order. Directions
/// come from [`resolve_flips`] over the walked order; a single-curve loop
/// has its one flag negated when reversed, since flip resolution cannot
/// orient it. Only the first drawn curve starts with a move.
pub fn loop_to_path(curves: &[Curve], reverse: bool, scale: f64) -> String {
    let reversed: Vec<Curve>;
    let ordered = if reverse {
        reversed = curves.iter().rev().cloned().collect();
        reversed.as_slice()
    } else {
        curves
    };

    let mut flips = resolve_flips(ordered);
    if reverse && flips.len() == 1 {
        flips[0] = !flips[0];
    }

    let mut out = String::new();
    for (curve, flip) in ordered.iter().zip(flips) {
        let move_to = out.is_empty();
        out.push_str(&emit_curve(curve, scale, flip, move_to));
    }
    out
}

/// Convert a sketch into path data.
///
/// Only the representative profile is drawn. Outer loops are walked
/// clockwise and holes counter-clockwise in model space; a loop whose
/// winding disagrees with its role is walked backwards. The loops are
/// joined into a single string and returned as a one-element list.
pub fn sketch_to_paths(sketch: &Sketch, scale: UnitScale) -> Result<Vec<String>, PathError> {
    let profile = sketch
        .representative_profile()
        .ok_or(PathError::NoProfiles)?;

    let divisor = scale.divisor();
    let mut path = String::new();
    for lp in &profile.loops {
        let reverse = lp.is_outer != lp.is_clockwise();
        path.push_str(&loop_to_path(&lp.curves, reverse, divisor));
    }

    tracing::debug!(loops = profile.loops.len(), len = path.len(), "converted sketch profile");
    Ok(vec![path])
}
