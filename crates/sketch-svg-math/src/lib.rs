#![warn(missing_docs)]

//! Math types for the sketch-svg exporter.
//!
//! Thin wrappers around nalgebra providing the point and vector types used
//! by the curve and path crates, plus the tolerance rules used when
//! stitching curves end to end.

use nalgebra::Vector3;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear length below which a vector counts as degenerate.
    pub linear: f64,
    /// Relative tolerance applied per coordinate when matching endpoints.
    pub relative: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 linear, 1e-4 relative).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        relative: 1e-4,
    };

    /// Check if two points match coordinate-wise within the relative tolerance.
    ///
    /// Each of x, y and z must satisfy [`is_close`]. There is no absolute
    /// floor, so a coordinate that is exactly zero only matches another
    /// exact zero.
    pub fn points_close(&self, a: &Point3, b: &Point3) -> bool {
        is_close(a.x, b.x, self.relative)
            && is_close(a.y, b.y, self.relative)
            && is_close(a.z, b.z, self.relative)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Relative closeness test: `|a - b| <= rel * max(|a|, |b|)`.
///
/// Identical values (including two zeros) are always close; NaN never is.
pub fn is_close(a: f64, b: f64, rel: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    diff <= rel * a.abs().max(b.abs())
}

/// Linear interpolation from `a` to `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
