//! SVG path-data emission for single curves.

use sketch_svg_geom::{Arc, Circle, Curve, Ellipse, EllipticalArc, NurbsApprox};
use sketch_svg_math::{Point3, Vec3};

use crate::flatten::{flatten, FlattenOptions};
use crate::UnitScale;

/// Accumulates path-data commands in SVG coordinates.
///
/// Model coordinates are divided by `scale` and Y is negated, since SVG's
/// Y axis points down.
struct PathWriter {
    out: String,
    scale: f64,
}

impl PathWriter {
    fn new(scale: f64) -> Self {
        Self {
            out: String::new(),
            scale,
        }
    }

    fn xy(&self, p: &Point3) -> (f64, f64) {
        (p.x / self.scale, -p.y / self.scale)
    }

    fn move_to(&mut self, p: &Point3) {
        let (x, y) = self.xy(p);
        self.out.push_str(&format!("M{x:.6} {y:.6} "));
    }

    fn line_to(&mut self, p: &Point3) {
        let (x, y) = self.xy(p);
        self.out.push_str(&format!("L{x:.6} {y:.6} "));
    }

    fn circular_arc(&mut self, radius: f64, large: bool, sweep: bool, to: &Point3) {
        let r = radius / self.scale;
        let (x, y) = self.xy(to);
        self.out.push_str(&format!(
            "A {r:.6} {r:.6} 0 {} {} {x:.6} {y:.6}",
            u8::from(large),
            u8::from(sweep)
        ));
    }

    fn elliptical_arc(
        &mut self,
        radii: (f64, f64),
        rotation: f64,
        large: bool,
        sweep: bool,
        to: &Point3,
    ) {
        let (rx, ry) = (radii.0 / self.scale, radii.1 / self.scale);
        let (x, y) = self.xy(to);
        self.out.push_str(&format!(
            "A {rx:.6} {ry:.6} {rotation:.6} {} {} {x:.6} {y:.6}",
            u8::from(large),
            u8::from(sweep)
        ));
    }

    fn finish(self) -> String {
        self.out
    }
}

/// SVG x-axis rotation, in degrees, for an ellipse whose major axis points along `axis`.
fn rotation_degrees(axis: &Vec3) -> f64 {
    -axis.y.atan2(axis.x).to_degrees()
}

/// Convert one curve into SVG path data.
///
/// `scale` is model units per SVG unit (see [`UnitScale::divisor`]). With
/// `invert` the curve is drawn from its end point back to its start, and
/// with `move_to` the output begins with an `M` command at the point drawing
/// starts from. Curves of an unsupported kind produce an empty string and a
/// warning.
pub fn emit_curve(curve: &Curve, scale: f64, invert: bool, move_to: bool) -> String {
    emit_curve_with(curve, scale, invert, move_to, &FlattenOptions::default())
}

/// [`emit_curve`] with explicit flattening criteria for NURBS curves.
pub fn emit_curve_with(
    curve: &Curve,
    scale: f64,
    invert: bool,
    move_to: bool,
    options: &FlattenOptions,
) -> String {
    let mut w = PathWriter::new(scale);

    match curve {
        Curve::Line(line) => {
            let (from, to) = if invert {
                (&line.end, &line.start)
            } else {
                (&line.start, &line.end)
            };
            if move_to {
                w.move_to(from);
            }
            w.line_to(to);
        }
        Curve::Arc(arc) => emit_arc(&mut w, arc, invert, move_to),
        Curve::Circle(circle) => emit_circle(&mut w, circle, invert, move_to),
        Curve::Ellipse(ellipse) => emit_ellipse(&mut w, ellipse, invert, move_to),
        Curve::EllipticalArc(arc) => emit_elliptical_arc(&mut w, arc, invert, move_to),
        Curve::Nurbs(nurbs) => emit_nurbs(&mut w, nurbs, invert, move_to, options),
        Curve::Unsupported { kind, .. } => {
            tracing::warn!(kind = %kind, "unsupported curve type, could not be converted");
        }
    }

    w.finish()
}

fn emit_arc(w: &mut PathWriter, arc: &Arc, invert: bool, move_to: bool) {
    let (from, to) = if invert {
        (&arc.end, &arc.start)
    } else {
        (&arc.start, &arc.end)
    };
    if move_to {
        w.move_to(from);
    }
    w.circular_arc(arc.radius, arc.is_large(), invert, to);
}

fn emit_circle(w: &mut PathWriter, circle: &Circle, invert: bool, move_to: bool) {
    let anchor = circle.anchor();
    let quarter = circle.quarter();
    if move_to {
        w.move_to(&anchor);
    }
    // (large, sweep) for the leg to the quarter point, then back to the anchor
    let (first, second) = if invert {
        ((false, false), (true, false))
    } else {
        ((true, true), (false, true))
    };
    w.circular_arc(circle.radius, first.0, first.1, &quarter);
    w.circular_arc(circle.radius, second.0, second.1, &anchor);
}

fn emit_ellipse(w: &mut PathWriter, ellipse: &Ellipse, invert: bool, move_to: bool) {
    let anchor = ellipse.anchor();
    let minor = ellipse.minor_point();
    let radii = (ellipse.major_radius, ellipse.minor_radius);
    let rotation = rotation_degrees(&ellipse.major_dir());
    if move_to {
        w.move_to(&anchor);
    }
    let (first, second) = if invert {
        ((false, true), (true, true))
    } else {
        ((true, false), (false, false))
    };
    w.elliptical_arc(radii, rotation, first.0, first.1, &minor);
    w.elliptical_arc(radii, rotation, second.0, second.1, &anchor);
}

fn emit_elliptical_arc(w: &mut PathWriter, arc: &EllipticalArc, invert: bool, move_to: bool) {
    let start = arc.point_at(arc.start_angle);
    let end = arc.point_at(arc.end_angle);
    let (from, to) = if invert { (end, start) } else { (start, end) };
    if move_to {
        w.move_to(&from);
    }
    w.elliptical_arc(
        (arc.major_radius, arc.minor_radius),
        rotation_degrees(&arc.major_axis),
        arc.is_large(),
        invert,
        &to,
    );
}

fn emit_nurbs(
    w: &mut PathWriter,
    nurbs: &NurbsApprox,
    invert: bool,
    move_to: bool,
    options: &FlattenOptions,
) {
    let mut points = flatten(nurbs.evaluator(), options);
    if invert {
        points.reverse();
    }
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    if move_to {
        w.move_to(first);
    }
    for p in rest {
        w.line_to(p);
    }
}

/// Convert each curve on its own, each starting with a move.
///
/// Used for loose sketch curves that do not form profiles.
pub fn curves_to_paths(curves: &[Curve], scale: UnitScale) -> Vec<String> {
    let divisor = scale.divisor();
    curves
        .iter()
        .map(|c| emit_curve(c, divisor, false, true))
        .collect()
}
