//! Curve primitives of a planar sketch.

use std::f64::consts::PI;

use sketch_svg_math::{Point3, Tolerance, Vec3};

use crate::CurveEvaluator;

/// A straight line segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Start point.
    pub start: Point3,
    /// End point.
    pub end: Point3,
}

impl Line {
    /// Create a line from `start` to `end`.
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }
}

/// A circular arc running counter-clockwise from `start_angle` to `end_angle`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    /// Arc center.
    pub center: Point3,
    /// Arc radius.
    pub radius: f64,
    /// Start point (at `start_angle`).
    pub start: Point3,
    /// End point (at `end_angle`).
    pub end: Point3,
    /// Start angle in radians, measured from +X.
    pub start_angle: f64,
    /// End angle in radians, measured from +X.
    pub end_angle: f64,
}

impl Arc {
    /// Create an arc from its center, radius and angles, deriving the endpoints.
    pub fn from_angles(center: Point3, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        let at = |a: f64| center + Vec3::new(radius * a.cos(), radius * a.sin(), 0.0);
        Self {
            center,
            radius,
            start: at(start_angle),
            end: at(end_angle),
            start_angle,
            end_angle,
        }
    }

    /// Whether the arc spans more than half a turn (the SVG large-arc flag).
    pub fn is_large(&self) -> bool {
        self.end_angle - self.start_angle > PI
    }
}

/// A full circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Center.
    pub center: Point3,
    /// Radius.
    pub radius: f64,
}

impl Circle {
    /// Create a circle.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The point at angle 0, where a circle starts and ends.
    pub fn anchor(&self) -> Point3 {
        self.center + Vec3::new(self.radius, 0.0, 0.0)
    }

    /// The point at angle 90°.
    pub fn quarter(&self) -> Point3 {
        self.center + Vec3::new(0.0, self.radius, 0.0)
    }
}

/// A full ellipse.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    /// Center.
    pub center: Point3,
    /// Direction of the major axis (need not be normalized).
    pub major_axis: Vec3,
    /// Semi-major radius.
    pub major_radius: f64,
    /// Semi-minor radius.
    pub minor_radius: f64,
}

impl Ellipse {
    /// Create an ellipse.
    pub fn new(center: Point3, major_axis: Vec3, major_radius: f64, minor_radius: f64) -> Self {
        Self {
            center,
            major_axis,
            major_radius,
            minor_radius,
        }
    }

    /// Unit major axis direction. A zero-length axis falls back to +X.
    pub fn major_dir(&self) -> Vec3 {
        unit_or_x(&self.major_axis)
    }

    /// The end of the major axis, where an ellipse starts and ends.
    pub fn anchor(&self) -> Point3 {
        self.center + self.major_dir() * self.major_radius
    }

    /// The end of the minor axis along `major_axis × Z`.
    pub fn minor_point(&self) -> Point3 {
        let minor = unit_or_x(&self.major_axis.cross(&Vec3::z()));
        self.center + minor * self.minor_radius
    }
}

/// An elliptical arc, counter-clockwise from `start_angle` to `end_angle`.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticalArc {
    /// Center.
    pub center: Point3,
    /// Direction of the major axis (need not be normalized).
    pub major_axis: Vec3,
    /// Semi-major radius.
    pub major_radius: f64,
    /// Semi-minor radius.
    pub minor_radius: f64,
    /// Start parameter angle in radians.
    pub start_angle: f64,
    /// End parameter angle in radians.
    pub end_angle: f64,
}

impl EllipticalArc {
    /// Point at parameter angle `theta`.
    ///
    /// `p(θ) = c + a·cosθ·û + b·sinθ·(Z × û)`.
    pub fn point_at(&self, theta: f64) -> Point3 {
        let u = unit_or_x(&self.major_axis);
        let v = Vec3::z().cross(&u);
        self.center
            + u * (self.major_radius * theta.cos())
            + v * (self.minor_radius * theta.sin())
    }

    /// Whether the arc spans more than half a turn (the SVG large-arc flag).
    pub fn is_large(&self) -> bool {
        self.end_angle - self.start_angle > PI
    }
}

/// A curve that is only available through an evaluator, such as a NURBS curve.
#[derive(Debug, Clone)]
pub struct NurbsApprox {
    evaluator: Box<dyn CurveEvaluator>,
}

impl NurbsApprox {
    /// Wrap an evaluator.
    pub fn new(evaluator: impl CurveEvaluator + 'static) -> Self {
        Self {
            evaluator: Box::new(evaluator),
        }
    }

    /// Borrow the evaluator.
    pub fn evaluator(&self) -> &dyn CurveEvaluator {
        self.evaluator.as_ref()
    }
}

/// A planar curve of any supported kind.
///
/// Every variant answers [`Curve::start_point`] and [`Curve::end_point`]
/// consistently with the direction it is drawn in.
#[derive(Debug, Clone)]
pub enum Curve {
    /// Straight line.
    Line(Line),
    /// Circular arc.
    Arc(Arc),
    /// Full circle.
    Circle(Circle),
    /// Full ellipse.
    Ellipse(Ellipse),
    /// Elliptical arc.
    EllipticalArc(EllipticalArc),
    /// NURBS or other evaluator-backed curve.
    Nurbs(NurbsApprox),
    /// A curve kind the exporter cannot draw.
    ///
    /// The endpoints are kept so loop orientation can still be resolved.
    Unsupported {
        /// Host name of the curve kind.
        kind: String,
        /// Start point reported by the host.
        start: Point3,
        /// End point reported by the host.
        end: Point3,
    },
}

impl Curve {
    /// Start point of the curve.
    pub fn start_point(&self) -> Point3 {
        match self {
            Curve::Line(l) => l.start,
            Curve::Arc(a) => a.start,
            Curve::Circle(c) => c.anchor(),
            Curve::Ellipse(e) => e.anchor(),
            Curve::EllipticalArc(e) => e.point_at(e.start_angle),
            Curve::Nurbs(n) => n.evaluator().end_points().0,
            Curve::Unsupported { start, .. } => *start,
        }
    }

    /// End point of the curve.
    pub fn end_point(&self) -> Point3 {
        match self {
            Curve::Line(l) => l.end,
            Curve::Arc(a) => a.end,
            Curve::Circle(c) => c.anchor(),
            Curve::Ellipse(e) => e.anchor(),
            Curve::EllipticalArc(e) => e.point_at(e.end_angle),
            Curve::Nurbs(n) => n.evaluator().end_points().1,
            Curve::Unsupported { end, .. } => *end,
        }
    }

    /// Short name of the curve kind, for diagnostics.
    pub fn kind(&self) -> &str {
        match self {
            Curve::Line(_) => "line",
            Curve::Arc(_) => "arc",
            Curve::Circle(_) => "circle",
            Curve::Ellipse(_) => "ellipse",
            Curve::EllipticalArc(_) => "elliptical_arc",
            Curve::Nurbs(_) => "nurbs",
            Curve::Unsupported { kind, .. } => kind,
        }
    }
}

fn unit_or_x(v: &Vec3) -> Vec3 {
    v.try_normalize(Tolerance::DEFAULT.linear)
        .unwrap_or_else(Vec3::x)
}
