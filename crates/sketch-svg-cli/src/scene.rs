//! JSON scene files standing in for a live CAD host.
//!
//! A scene lists selection groups; each group lists entities that are
//! either bodies (already projected into profiles) or loose curves:
//!
//! ```json
//! {
//!   "groups": [
//!     [{ "type": "body", "profiles": [{ "loops": [{ "is_outer": true, "curves": [
//!       { "type": "circle", "center": [0, 0], "radius": 2 }
//!     ] }] }] }],
//!     [{ "type": "curves", "curves": [
//!       { "type": "line", "start": [0, 0], "end": [5, 0] }
//!     ] }]
//!   ]
//! }
//! ```
//!
//! Points are `[x, y]` or `[x, y, z]`. Curve types other than `line`,
//! `arc`, `circle`, `ellipse`, `elliptical_arc` and `nurbs` are kept as
//! unsupported curves with their `start` and `end` points.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use sketch_svg::geom::{
    Arc, Circle, Curve, Ellipse, EllipticalArc, Line, NurbsApprox, NurbsCurve, WeightedPoint,
};
use sketch_svg::math::{Point3, Vec3};
use sketch_svg::path::{Profile, ProfileLoop, Sketch};
use sketch_svg::{EntityKind, ExportError, SketchHost};

/// A selectable entity of a scene.
#[derive(Debug, Clone)]
pub enum SceneEntity {
    /// A body with its profiles.
    Body(Sketch),
    /// Loose sketch curves.
    Curves(Vec<Curve>),
}

/// A parsed scene file.
#[derive(Debug, Clone)]
pub struct Scene {
    pub groups: Vec<Vec<SceneEntity>>,
}

impl Scene {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawScene = serde_json::from_str(json).context("invalid scene file")?;
        let groups = raw
            .groups
            .into_iter()
            .enumerate()
            .map(|(i, group)| {
                group
                    .into_iter()
                    .enumerate()
                    .map(|(j, entity)| {
                        entity
                            .into_entity()
                            .with_context(|| format!("group {i}, entity {j}"))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { groups })
    }
}

/// Host backed by an in-memory scene. Projection hands out copies.
#[derive(Debug, Default)]
pub struct SceneHost {
    live: usize,
}

impl SketchHost for SceneHost {
    type Entity = SceneEntity;

    fn entity_kind(&self, entity: &SceneEntity) -> EntityKind {
        match entity {
            SceneEntity::Body(_) => EntityKind::Body,
            SceneEntity::Curves(_) => EntityKind::Curves,
        }
    }

    fn project(&mut self, entity: &SceneEntity) -> Result<Sketch, ExportError> {
        self.live += 1;
        Ok(match entity {
            SceneEntity::Body(sketch) => sketch.clone(),
            SceneEntity::Curves(curves) => Sketch::new(Vec::new(), curves.clone()),
        })
    }

    fn discard(&mut self, _sketch: Sketch) {
        self.live = self.live.saturating_sub(1);
        tracing::trace!(live = self.live, "discarded scratch sketch");
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Deserialize)]
struct RawScene {
    #[serde(default)]
    groups: Vec<Vec<RawEntity>>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawEntity {
    Body { profiles: Vec<RawProfile> },
    Curves { curves: Vec<RawCurve> },
}

#[derive(Deserialize)]
struct RawProfile {
    loops: Vec<RawLoop>,
}

#[derive(Deserialize)]
struct RawLoop {
    #[serde(default = "default_outer")]
    is_outer: bool,
    curves: Vec<RawCurve>,
}

fn default_outer() -> bool {
    true
}

/// `[x, y]` or `[x, y, z]`.
#[derive(Deserialize, Clone, Copy)]
#[serde(untagged)]
enum RawPoint {
    Xy([f64; 2]),
    Xyz([f64; 3]),
}

impl Default for RawPoint {
    fn default() -> Self {
        RawPoint::Xy([0.0, 0.0])
    }
}

impl RawPoint {
    fn point(self) -> Point3 {
        match self {
            RawPoint::Xy([x, y]) => Point3::new(x, y, 0.0),
            RawPoint::Xyz([x, y, z]) => Point3::new(x, y, z),
        }
    }

    fn vector(self) -> Vec3 {
        self.point().coords
    }
}

/// A curve whose fields are decoded once its `type` is known.
#[derive(Deserialize)]
struct RawCurve {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct LineFields {
    start: RawPoint,
    end: RawPoint,
}

#[derive(Deserialize)]
struct ArcFields {
    center: RawPoint,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    start: Option<RawPoint>,
    end: Option<RawPoint>,
}

#[derive(Deserialize)]
struct CircleFields {
    center: RawPoint,
    radius: f64,
}

#[derive(Deserialize)]
struct EllipseFields {
    center: RawPoint,
    major_axis: RawPoint,
    major_radius: f64,
    minor_radius: f64,
}

#[derive(Deserialize)]
struct EllipticalArcFields {
    center: RawPoint,
    major_axis: RawPoint,
    major_radius: f64,
    minor_radius: f64,
    start_angle: f64,
    end_angle: f64,
}

#[derive(Deserialize)]
struct NurbsFields {
    control_points: Vec<RawPoint>,
    #[serde(default)]
    weights: Option<Vec<f64>>,
    #[serde(default)]
    knots: Option<Vec<f64>>,
    degree: usize,
}

#[derive(Deserialize)]
struct EndpointFields {
    #[serde(default)]
    start: RawPoint,
    #[serde(default)]
    end: RawPoint,
}

impl RawEntity {
    fn into_entity(self) -> Result<SceneEntity> {
        match self {
            RawEntity::Curves { curves } => Ok(SceneEntity::Curves(convert_curves(curves)?)),
            RawEntity::Body { profiles } => {
                let mut all_curves = Vec::new();
                let mut out = Vec::with_capacity(profiles.len());
                for profile in profiles {
                    let mut loops = Vec::with_capacity(profile.loops.len());
                    for lp in profile.loops {
                        let curves = convert_curves(lp.curves)?;
                        all_curves.extend(curves.iter().cloned());
                        loops.push(ProfileLoop::new(curves, lp.is_outer));
                    }
                    out.push(Profile::new(loops));
                }
                Ok(SceneEntity::Body(Sketch::new(out, all_curves)))
            }
        }
    }
}

fn convert_curves(curves: Vec<RawCurve>) -> Result<Vec<Curve>> {
    curves
        .into_iter()
        .enumerate()
        .map(|(k, c)| c.into_curve().with_context(|| format!("curve {k}")))
        .collect()
}

impl RawCurve {
    fn into_curve(self) -> Result<Curve> {
        let RawCurve { kind, fields } = self;
        let fields = Value::Object(fields);
        let curve = match kind.as_str() {
            "line" => {
                let f: LineFields = decode(fields, "line")?;
                Curve::Line(Line::new(f.start.point(), f.end.point()))
            }
            "arc" => {
                let f: ArcFields = decode(fields, "arc")?;
                let mut arc =
                    Arc::from_angles(f.center.point(), f.radius, f.start_angle, f.end_angle);
                if let Some(start) = f.start {
                    arc.start = start.point();
                }
                if let Some(end) = f.end {
                    arc.end = end.point();
                }
                Curve::Arc(arc)
            }
            "circle" => {
                let f: CircleFields = decode(fields, "circle")?;
                Curve::Circle(Circle::new(f.center.point(), f.radius))
            }
            "ellipse" => {
                let f: EllipseFields = decode(fields, "ellipse")?;
                Curve::Ellipse(Ellipse::new(
                    f.center.point(),
                    f.major_axis.vector(),
                    f.major_radius,
                    f.minor_radius,
                ))
            }
            "elliptical_arc" => {
                let f: EllipticalArcFields = decode(fields, "elliptical_arc")?;
                Curve::EllipticalArc(EllipticalArc {
                    center: f.center.point(),
                    major_axis: f.major_axis.vector(),
                    major_radius: f.major_radius,
                    minor_radius: f.minor_radius,
                    start_angle: f.start_angle,
                    end_angle: f.end_angle,
                })
            }
            "nurbs" => {
                let f: NurbsFields = decode(fields, "nurbs")?;
                Curve::Nurbs(NurbsApprox::new(nurbs_curve(f)?))
            }
            _ => {
                let f: EndpointFields = decode(fields, &kind)?;
                Curve::Unsupported {
                    kind: kind.clone(),
                    start: f.start.point(),
                    end: f.end.point(),
                }
            }
        };
        Ok(curve)
    }
}

fn decode<T: serde::de::DeserializeOwned>(fields: Value, kind: &str) -> Result<T> {
    serde_json::from_value(fields).with_context(|| format!("invalid {kind} curve"))
}

fn nurbs_curve(f: NurbsFields) -> Result<NurbsCurve> {
    let weights = match f.weights {
        Some(w) if w.len() != f.control_points.len() => anyhow::bail!(
            "{} weights for {} control points",
            w.len(),
            f.control_points.len()
        ),
        Some(w) => w,
        None => vec![1.0; f.control_points.len()],
    };
    let control_points = f
        .control_points
        .into_iter()
        .zip(weights)
        .map(|(p, w)| WeightedPoint::new(p.point(), w))
        .collect();

    let curve = match f.knots {
        Some(knots) => NurbsCurve::new(control_points, knots, f.degree)?,
        None => NurbsCurve::clamped_uniform(control_points, f.degree)?,
    };
    Ok(curve)
}
