//! Rational B-spline (NURBS) curve evaluation.
//!
//! Evaluated with De Boor's algorithm in homogeneous coordinates, then
//! projected back by dividing by the weight.

use sketch_svg_math::{Point3, Vec3};

use crate::{CurveEvaluator, GeomError};

// =============================================================================
// Knot vector utilities
// =============================================================================

/// Validate a knot vector: non-decreasing, length = n_control_points + degree + 1.
fn validate_knots(knots: &[f64], n_points: usize, degree: usize) -> Result<(), GeomError> {
    let expected = n_points + degree + 1;
    if knots.len() != expected {
        return Err(GeomError::InvalidKnots {
            len: knots.len(),
            expected,
        });
    }
    for i in 1..knots.len() {
        if knots[i] < knots[i - 1] {
            return Err(GeomError::DecreasingKnots(i));
        }
    }
    Ok(())
}

/// Find the knot span index for parameter `t`.
///
/// Returns `i` such that `knots[i] <= t < knots[i+1]`, clamped to valid range.
/// For `t` at the end of the domain, returns the last valid span.
fn find_span(knots: &[f64], n: usize, degree: usize, t: f64) -> usize {
    // n = number of control points - 1 (last index)
    if t >= knots[n + 1] {
        return n;
    }
    if t <= knots[degree] {
        return degree;
    }
    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;
    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Compute non-zero basis function values at parameter `t`.
///
/// Returns a vector of `degree + 1` values `N[span-degree..=span]` at `t`.
fn basis_functions(knots: &[f64], span: usize, degree: usize, t: f64) -> Vec<f64> {
    let mut n = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    n[0] = 1.0;

    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            if denom.abs() < 1e-30 {
                // Zero-length knot interval
                n[j] = saved;
                continue;
            }
            let temp = n[r] / denom;
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }

    n
}

// =============================================================================
// NURBS curve
// =============================================================================

/// A weighted control point for NURBS (homogeneous coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPoint {
    /// Position in Cartesian coordinates (not pre-multiplied by the weight).
    pub point: Point3,
    /// Weight (must be > 0).
    pub weight: f64,
}

impl WeightedPoint {
    /// Create a weighted point.
    pub fn new(point: Point3, weight: f64) -> Self {
        Self { point, weight }
    }

    /// Create with unit weight.
    pub fn unweighted(point: Point3) -> Self {
        Self { point, weight: 1.0 }
    }

    /// Convert to homogeneous coordinates: `(w*x, w*y, w*z, w)`.
    fn to_homogeneous(self) -> [f64; 4] {
        [
            self.weight * self.point.x,
            self.weight * self.point.y,
            self.weight * self.point.z,
            self.weight,
        ]
    }
}

/// A rational B-spline (NURBS) curve.
#[derive(Debug, Clone)]
pub struct NurbsCurve {
    control_points: Vec<WeightedPoint>,
    knots: Vec<f64>,
    degree: usize,
}

impl NurbsCurve {
    /// Create a NURBS curve from weighted control points, a knot vector and a degree.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no control points, the degree is zero
    /// or too high for the point count, the knot vector has the wrong length
    /// or decreases, or any weight is not strictly positive.
    pub fn new(
        control_points: Vec<WeightedPoint>,
        knots: Vec<f64>,
        degree: usize,
    ) -> Result<Self, GeomError> {
        if control_points.is_empty() {
            return Err(GeomError::EmptyControlPoints);
        }
        if degree == 0 || degree >= control_points.len() {
            return Err(GeomError::InvalidDegree {
                degree,
                points: control_points.len(),
            });
        }
        validate_knots(&knots, control_points.len(), degree)?;
        if let Some(i) = control_points
            .iter()
            .position(|cp| !(cp.weight.is_finite() && cp.weight > 0.0))
        {
            return Err(GeomError::NonPositiveWeight(i));
        }
        Ok(Self {
            control_points,
            knots,
            degree,
        })
    }

    /// Create a clamped curve with uniform internal knot spacing on `[0, 1]`.
    ///
    /// The first and last knots are repeated `degree + 1` times so the curve
    /// interpolates its first and last control points.
    pub fn clamped_uniform(
        control_points: Vec<WeightedPoint>,
        degree: usize,
    ) -> Result<Self, GeomError> {
        let n = control_points.len();
        if n == 0 {
            return Err(GeomError::EmptyControlPoints);
        }
        if degree == 0 || degree >= n {
            return Err(GeomError::InvalidDegree { degree, points: n });
        }
        let m = n + degree + 1;
        let mut knots = vec![0.0; m];

        let n_internal = m - 2 * (degree + 1);
        for i in 0..=degree {
            knots[i] = 0.0;
            knots[m - 1 - i] = 1.0;
        }
        for i in 1..=n_internal {
            knots[degree + i] = i as f64 / (n_internal + 1) as f64;
        }

        Self::new(control_points, knots, degree)
    }

    /// Create a full NURBS circle in the XY plane.
    ///
    /// Nine control points, degree 2, starting and ending at `center + (radius, 0)`
    /// and running counter-clockwise.
    pub fn circle(center: Point3, radius: f64) -> Self {
        let w = 1.0_f64 / 2.0_f64.sqrt();
        let r = radius;
        let c = center;

        let control_points = vec![
            WeightedPoint::new(Point3::new(c.x + r, c.y, c.z), 1.0),
            WeightedPoint::new(Point3::new(c.x + r, c.y + r, c.z), w),
            WeightedPoint::new(Point3::new(c.x, c.y + r, c.z), 1.0),
            WeightedPoint::new(Point3::new(c.x - r, c.y + r, c.z), w),
            WeightedPoint::new(Point3::new(c.x - r, c.y, c.z), 1.0),
            WeightedPoint::new(Point3::new(c.x - r, c.y - r, c.z), w),
            WeightedPoint::new(Point3::new(c.x, c.y - r, c.z), 1.0),
            WeightedPoint::new(Point3::new(c.x + r, c.y - r, c.z), w),
            WeightedPoint::new(Point3::new(c.x + r, c.y, c.z), 1.0),
        ];
        let knots = vec![
            0.0, 0.0, 0.0, 0.25, 0.25, 0.5, 0.5, 0.75, 0.75, 1.0, 1.0, 1.0,
        ];

        Self {
            control_points,
            knots,
            degree: 2,
        }
    }

    /// Weighted control points.
    pub fn control_points(&self) -> &[WeightedPoint] {
        &self.control_points
    }

    /// Knot vector.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Polynomial degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Evaluate the curve at parameter `t` (clamped to the domain).
    pub fn eval(&self, t: f64) -> Point3 {
        let n = self.control_points.len() - 1;
        let t = t.clamp(self.knots[self.degree], self.knots[n + 1]);
        let span = find_span(&self.knots, n, self.degree, t);
        let basis = basis_functions(&self.knots, span, self.degree, t);

        let mut h = [0.0; 4];
        for (i, &b) in basis.iter().enumerate() {
            let cp = self.control_points[span - self.degree + i].to_homogeneous();
            for k in 0..4 {
                h[k] += b * cp[k];
            }
        }

        if h[3].abs() < 1e-30 {
            Point3::origin()
        } else {
            Point3::new(h[0] / h[3], h[1] / h[3], h[2] / h[3])
        }
    }

    /// Parameter domain `(t_min, t_max)`.
    pub fn parameter_domain(&self) -> (f64, f64) {
        (
            self.knots[self.degree],
            self.knots[self.control_points.len()],
        )
    }
}

impl CurveEvaluator for NurbsCurve {
    fn evaluate(&self, t: f64) -> Point3 {
        self.eval(t)
    }

    fn tangent(&self, t: f64) -> Vec3 {
        // Central difference, one-sided at the domain ends
        let (t_min, t_max) = self.parameter_domain();
        let dt = (t_max - t_min) * 1e-6;
        let p0 = self.eval((t - dt).max(t_min));
        let p1 = self.eval((t + dt).min(t_max));
        (p1 - p0) / (2.0 * dt)
    }

    fn domain(&self) -> (f64, f64) {
        self.parameter_domain()
    }

    fn clone_box(&self) -> Box<dyn CurveEvaluator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quarter_arc(radius: f64) -> NurbsCurve {
        let w = 1.0_f64 / 2.0_f64.sqrt();
        NurbsCurve::new(
            vec![
                WeightedPoint::unweighted(Point3::new(radius, 0.0, 0.0)),
                WeightedPoint::new(Point3::new(radius, radius, 0.0), w),
                WeightedPoint::unweighted(Point3::new(0.0, radius, 0.0)),
            ],
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_degree_one_is_polyline() {
        let pts = vec![
            WeightedPoint::unweighted(Point3::new(0.0, 0.0, 0.0)),
            WeightedPoint::unweighted(Point3::new(10.0, 0.0, 0.0)),
        ];
        let curve = NurbsCurve::new(pts, vec![0.0, 0.0, 1.0, 1.0], 1).unwrap();

        assert_relative_eq!(curve.eval(0.0).x, 0.0);
        assert_relative_eq!(curve.eval(0.5).x, 5.0);
        assert_relative_eq!(curve.eval(1.0).x, 10.0);
    }

    #[test]
    fn test_quarter_arc_lies_on_circle() {
        let curve = quarter_arc(5.0);
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let p = curve.eval(t);
            assert!(
                (p.coords.norm() - 5.0).abs() < 1e-10,
                "t={t}: radius {}",
                p.coords.norm()
            );
        }
    }

    #[test]
    fn test_full_circle() {
        let curve = NurbsCurve::circle(Point3::new(1.0, 2.0, 0.0), 3.0);
        let (start, end) = curve.end_points();
        assert!((start - Point3::new(4.0, 2.0, 0.0)).norm() < 1e-12);
        assert!((end - start).norm() < 1e-12);

        let quarter = curve.eval(0.25);
        assert!((quarter - Point3::new(1.0, 5.0, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_clamped_uniform_interpolates_ends() {
        let pts: Vec<_> = [(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0)]
            .iter()
            .map(|&(x, y)| WeightedPoint::unweighted(Point3::new(x, y, 0.0)))
            .collect();
        let curve = NurbsCurve::clamped_uniform(pts, 3).unwrap();

        assert_eq!(curve.knots().len(), 9);
        assert!((curve.eval(0.0) - Point3::new(0.0, 0.0, 0.0)).norm() < 1e-10);
        assert!((curve.eval(1.0) - Point3::new(4.0, 0.0, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_tangent_direction() {
        let curve = quarter_arc(5.0);
        let t0 = curve.tangent(0.0).normalize();
        let t1 = curve.tangent(1.0).normalize();
        // Counter-clockwise: starts heading +Y, ends heading -X
        assert!((t0 - Vec3::y()).norm() < 1e-4, "start tangent {t0:?}");
        assert!((t1 + Vec3::x()).norm() < 1e-4, "end tangent {t1:?}");
    }

    #[test]
    fn test_invalid_knot_length() {
        let pts = vec![
            WeightedPoint::unweighted(Point3::origin()),
            WeightedPoint::unweighted(Point3::new(1.0, 0.0, 0.0)),
        ];
        let err = NurbsCurve::new(pts, vec![0.0, 1.0], 1).unwrap_err();
        assert_eq!(err, GeomError::InvalidKnots { len: 2, expected: 4 });
    }

    #[test]
    fn test_decreasing_knots() {
        let pts = vec![
            WeightedPoint::unweighted(Point3::origin()),
            WeightedPoint::unweighted(Point3::new(1.0, 0.0, 0.0)),
        ];
        let err = NurbsCurve::new(pts, vec![0.0, 0.0, 1.0, 0.5], 1).unwrap_err();
        assert_eq!(err, GeomError::DecreasingKnots(3));
    }

    #[test]
    fn test_invalid_degree_and_weight() {
        let pts = vec![
            WeightedPoint::unweighted(Point3::origin()),
            WeightedPoint::new(Point3::new(1.0, 0.0, 0.0), 0.0),
        ];
        assert_eq!(
            NurbsCurve::new(pts.clone(), vec![0.0; 5], 2).unwrap_err(),
            GeomError::InvalidDegree {
                degree: 2,
                points: 2
            }
        );
        assert_eq!(
            NurbsCurve::new(pts, vec![0.0, 0.0, 1.0, 1.0], 1).unwrap_err(),
            GeomError::NonPositiveWeight(1)
        );
        assert_eq!(
            NurbsCurve::clamped_uniform(vec![], 1).unwrap_err(),
            GeomError::EmptyControlPoints
        );
    }
}
