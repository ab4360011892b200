#![warn(missing_docs)]

//! SVG path-data generation from planar sketch geometry.
//!
//! Turns sketch curves, closed loops and profiles into SVG path-data
//! strings (`M`, `L` and `A` commands). Loops are oriented with the
//! shoelace sign test and stitched end to end so every emitted contour is
//! continuous.
//!
//! # Example
//!
//! ```
//! use sketch_svg_geom::{Curve, Line};
//! use sketch_svg_math::Point3;
//! use sketch_svg_path::emit_curve;
//!
//! let line = Curve::Line(Line::new(Point3::origin(), Point3::new(10.0, 0.0, 0.0)));
//! let d = emit_curve(&line, 2.0, false, true);
//! assert_eq!(d, "M0.000000 -0.000000 L5.000000 -0.000000 ");
//! ```

mod emit;
mod flatten;
mod orient;
mod profile;

pub use emit::{curves_to_paths, emit_curve, emit_curve_with};
pub use flatten::{flatten, FlattenOptions};
pub use orient::{is_clockwise, resolve_flips};
pub use profile::{loop_to_path, sketch_to_paths, Profile, ProfileLoop, Sketch};

use thiserror::Error;

/// Errors from path generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// The sketch has no profiles to trace.
    #[error("sketch has no profiles")]
    NoProfiles,

    /// A unit scale factor was zero, negative or not finite.
    #[error("invalid unit scale: {0}")]
    InvalidScale(f64),
}

/// SVG user units per model unit.
///
/// Model units are taken to be centimetres, so the factor is `dpi / 2.54`.
/// The same value drives the document viewbox and every emitted coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    factor: f64,
}

impl UnitScale {
    /// Default resolution in dots per inch.
    pub const DEFAULT_DPI: f64 = 72.0;

    /// Centimetres per inch.
    pub const CM_PER_INCH: f64 = 2.54;

    /// Create a scale from SVG units per model unit.
    pub fn new(factor: f64) -> Result<Self, PathError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self { factor })
        } else {
            Err(PathError::InvalidScale(factor))
        }
    }

    /// Create a scale from a DPI value.
    pub fn from_dpi(dpi: f64) -> Result<Self, PathError> {
        Self::new(dpi / Self::CM_PER_INCH).map_err(|_| PathError::InvalidScale(dpi))
    }

    /// SVG units per model unit.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// The DPI value this scale corresponds to.
    pub fn dpi(&self) -> f64 {
        self.factor * Self::CM_PER_INCH
    }

    /// Model units per SVG unit: the value coordinates are divided by.
    pub fn divisor(&self) -> f64 {
        1.0 / self.factor
    }
}

impl Default for UnitScale {
    fn default() -> Self {
        Self {
            factor: Self::DEFAULT_DPI / Self::CM_PER_INCH,
        }
    }
}
