#![warn(missing_docs)]

//! Planar curve primitives for the sketch-svg exporter.
//!
//! Normalizes the curve kinds a CAD sketch can hold (lines, circular arcs,
//! circles, ellipses, elliptical arcs and NURBS curves) into one [`Curve`]
//! type that answers start and end points consistently with its drawn
//! direction.
//!
//! # Example
//!
//! ```
//! use sketch_svg_geom::{Curve, Line};
//! use sketch_svg_math::Point3;
//!
//! let line = Curve::Line(Line::new(Point3::origin(), Point3::new(10.0, 0.0, 0.0)));
//! assert_eq!(line.end_point().x, 10.0);
//! ```

mod curve;
mod nurbs;

pub use curve::{Arc, Circle, Curve, Ellipse, EllipticalArc, Line, NurbsApprox};
pub use nurbs::{NurbsCurve, WeightedPoint};

use sketch_svg_math::{Point3, Vec3};
use thiserror::Error;

/// A parametric curve that can be sampled for points and tangents.
///
/// This is the seam through which host NURBS geometry (or any other
/// evaluable curve) reaches the flattener.
pub trait CurveEvaluator: Send + Sync + std::fmt::Debug {
    /// Evaluate the curve at parameter `t`.
    fn evaluate(&self, t: f64) -> Point3;

    /// Tangent vector at parameter `t`. Only its direction is relied upon.
    fn tangent(&self, t: f64) -> Vec3;

    /// Parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// Clone into a boxed trait object.
    fn clone_box(&self) -> Box<dyn CurveEvaluator>;

    /// Points at both ends of the parameter domain.
    fn end_points(&self) -> (Point3, Point3) {
        let (t0, t1) = self.domain();
        (self.evaluate(t0), self.evaluate(t1))
    }
}

impl Clone for Box<dyn CurveEvaluator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Errors from constructing curve geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    /// A NURBS curve was given no control points.
    #[error("NURBS curve has no control points")]
    EmptyControlPoints,

    /// The degree is zero or needs more control points than were given.
    #[error("invalid degree {degree} for {points} control points")]
    InvalidDegree {
        /// Requested polynomial degree.
        degree: usize,
        /// Number of control points supplied.
        points: usize,
    },

    /// The knot vector length does not equal `points + degree + 1`.
    #[error("invalid knot vector: len={len} but expected {expected}")]
    InvalidKnots {
        /// Length of the supplied knot vector.
        len: usize,
        /// Required length.
        expected: usize,
    },

    /// The knot vector decreases at the given index.
    #[error("knot vector decreases at index {0}")]
    DecreasingKnots(usize),

    /// A control point weight is zero, negative or not finite.
    #[error("control point {0} has a non-positive weight")]
    NonPositiveWeight(usize),
}
