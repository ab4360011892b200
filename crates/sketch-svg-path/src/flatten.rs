//! Adaptive polyline approximation of evaluator-backed curves.

use sketch_svg_geom::CurveEvaluator;
use sketch_svg_math::{lerp, Point3, Vec3};

/// Stopping criteria for [`flatten`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlattenOptions {
    /// Largest tangent turn accepted across one segment, in radians.
    pub max_angle: f64,
    /// Segments shorter than this are accepted regardless of turn.
    pub min_length: f64,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            max_angle: 10.0_f64.to_radians(),
            min_length: 0.05,
        }
    }
}

struct Sample {
    t: f64,
    point: Point3,
    tangent: Vec3,
}

/// Approximate a curve with a polyline by recursive midpoint subdivision.
///
/// Starts from the two ends and the midpoint of the domain. Adjacent
/// samples are accepted when their tangents turn by less than
/// `max_angle` or their points are closer than `min_length`; otherwise the
/// parameter midpoint is inserted and the same pair is tested again.
///
/// Every adjacent pair of the returned points satisfies the acceptance
/// test, except where the parameter interval can no longer be halved.
pub fn flatten(evaluator: &dyn CurveEvaluator, options: &FlattenOptions) -> Vec<Point3> {
    let sample = |t: f64| Sample {
        t,
        point: evaluator.evaluate(t),
        tangent: evaluator.tangent(t),
    };

    let (t0, t1) = evaluator.domain();
    let mut samples = vec![sample(t0), sample(lerp(t0, t1, 0.5)), sample(t1)];

    let mut i = 0;
    while i + 1 < samples.len() {
        let (a, b) = (&samples[i], &samples[i + 1]);
        if accepts(a, b, options) {
            i += 1;
            continue;
        }

        let mid = lerp(a.t, b.t, 0.5);
        let (lo, hi) = (a.t.min(b.t), a.t.max(b.t));
        if !(mid > lo && mid < hi) {
            i += 1;
            continue;
        }
        samples.insert(i + 1, sample(mid));
    }

    samples.into_iter().map(|s| s.point).collect()
}

fn accepts(a: &Sample, b: &Sample, options: &FlattenOptions) -> bool {
    turn_angle(&a.tangent, &b.tangent) < options.max_angle
        || (b.point - a.point).norm() < options.min_length
}

/// Angle between two tangents; zero when either has no length.
fn turn_angle(a: &Vec3, b: &Vec3) -> f64 {
    let (na, nb) = (a.norm(), b.norm());
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (na * nb)).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_svg_geom::{NurbsCurve, WeightedPoint};
    use std::f64::consts::FRAC_PI_2;

    /// Quarter circle of the given radius, parameterized by angle.
    #[derive(Debug, Clone)]
    struct QuarterCircle {
        radius: f64,
    }

    impl CurveEvaluator for QuarterCircle {
        fn evaluate(&self, t: f64) -> Point3 {
            Point3::new(self.radius * t.cos(), self.radius * t.sin(), 0.0)
        }

        fn tangent(&self, t: f64) -> Vec3 {
            Vec3::new(-t.sin(), t.cos(), 0.0)
        }

        fn domain(&self) -> (f64, f64) {
            (0.0, FRAC_PI_2)
        }

        fn clone_box(&self) -> Box<dyn CurveEvaluator> {
            Box::new(self.clone())
        }
    }

    /// Tangent is zero everywhere.
    #[derive(Debug, Clone)]
    struct Stalled;

    impl CurveEvaluator for Stalled {
        fn evaluate(&self, t: f64) -> Point3 {
            Point3::new(t, 0.0, 0.0)
        }

        fn tangent(&self, _t: f64) -> Vec3 {
            Vec3::zeros()
        }

        fn domain(&self) -> (f64, f64) {
            (0.0, 100.0)
        }

        fn clone_box(&self) -> Box<dyn CurveEvaluator> {
            Box::new(self.clone())
        }
    }

    fn assert_all_pairs_accepted(curve: &dyn CurveEvaluator, points: &[Point3]) {
        let opts = FlattenOptions::default();
        for pair in points.windows(2) {
            let len = (pair[1] - pair[0]).norm();
            // Chord direction stands in for the tangent turn on a circle:
            // the turn across a chord equals its central angle.
            let a0 = pair[0].y.atan2(pair[0].x);
            let a1 = pair[1].y.atan2(pair[1].x);
            assert!(
                (a1 - a0).abs() < opts.max_angle || len < opts.min_length,
                "pair {:?} -> {:?} fails acceptance ({:?})",
                pair[0],
                pair[1],
                curve
            );
        }
    }

    #[test]
    fn test_quarter_circle_terminates_and_traces_arc() {
        let curve = QuarterCircle { radius: 10.0 };
        let points = flatten(&curve, &FlattenOptions::default());

        assert!(points.len() < 200, "too many points: {}", points.len());
        // 90° halved until under 10°: 16 segments of 5.625°
        assert_eq!(points.len(), 17);
        assert!((points[0] - Point3::new(10.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((points[16] - Point3::new(0.0, 10.0, 0.0)).norm() < 1e-12);

        let mut last_angle = -1.0;
        for p in &points {
            assert!((p.coords.norm() - 10.0).abs() < 1e-9);
            let angle = p.y.atan2(p.x);
            assert!(angle > last_angle, "not monotonic at {p:?}");
            last_angle = angle;
        }
        assert_all_pairs_accepted(&curve, &points);
    }

    #[test]
    fn test_nurbs_quarter_arc() {
        let w = 1.0_f64 / 2.0_f64.sqrt();
        let curve = NurbsCurve::new(
            vec![
                WeightedPoint::unweighted(Point3::new(5.0, 0.0, 0.0)),
                WeightedPoint::new(Point3::new(5.0, 5.0, 0.0), w),
                WeightedPoint::unweighted(Point3::new(0.0, 5.0, 0.0)),
            ],
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            2,
        )
        .unwrap();
        let points = flatten(&curve, &FlattenOptions::default());

        assert!(points.len() > 9 && points.len() < 200, "{} points", points.len());
        for p in &points {
            assert!((p.coords.norm() - 5.0).abs() < 1e-9);
        }
        assert_all_pairs_accepted(&curve, &points);
    }

    #[test]
    fn test_small_curve_hits_length_floor() {
        // Whole arc shorter than the length floor: no subdivision at all
        let curve = QuarterCircle { radius: 0.01 };
        let points = flatten(&curve, &FlattenOptions::default());
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_zero_tangent_counts_as_no_turn() {
        let points = flatten(&Stalled, &FlattenOptions::default());
        assert_eq!(points.len(), 3);
        assert!((points[2] - Point3::new(100.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_tighter_angle_gives_more_points() {
        let curve = QuarterCircle { radius: 10.0 };
        let coarse = flatten(&curve, &FlattenOptions::default());
        let fine = flatten(
            &curve,
            &FlattenOptions {
                max_angle: 2.0_f64.to_radians(),
                min_length: 0.05,
            },
        );
        assert!(fine.len() > coarse.len());
    }
}
