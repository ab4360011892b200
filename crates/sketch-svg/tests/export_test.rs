//! End-to-end conversion through a mock host, checked with an XML parser.

use quick_xml::events::Event;
use quick_xml::Reader;
use sketch_svg::geom::{Circle, Curve, Line};
use sketch_svg::math::Point3;
use sketch_svg::path::{Profile, ProfileLoop, Sketch};
use sketch_svg::{
    convert_selections_to_paths, export_selections, EntityKind, ExportError, PathError,
    ScratchSketch, SketchHost, StyleTable, UnitScale,
};

#[derive(Debug, Clone)]
enum Entity {
    Body(Sketch),
    Curves(Vec<Curve>),
    Broken,
}

#[derive(Default)]
struct MockHost {
    projected: usize,
    discarded: usize,
}

impl MockHost {
    fn outstanding(&self) -> usize {
        self.projected - self.discarded
    }
}

impl SketchHost for MockHost {
    type Entity = Entity;

    fn entity_kind(&self, entity: &Entity) -> EntityKind {
        match entity {
            Entity::Curves(_) => EntityKind::Curves,
            _ => EntityKind::Body,
        }
    }

    fn project(&mut self, entity: &Entity) -> Result<Sketch, ExportError> {
        let sketch = match entity {
            Entity::Body(sketch) => sketch.clone(),
            Entity::Curves(curves) => Sketch::new(Vec::new(), curves.clone()),
            Entity::Broken => return Err(ExportError::Host("cannot project".to_string())),
        };
        self.projected += 1;
        Ok(sketch)
    }

    fn discard(&mut self, _sketch: Sketch) {
        self.discarded += 1;
    }
}

fn p(x: f64, y: f64) -> Point3 {
    Point3::new(x, y, 0.0)
}

fn square(size: f64) -> Vec<Curve> {
    vec![
        Curve::Line(Line::new(p(0.0, 0.0), p(size, 0.0))),
        Curve::Line(Line::new(p(size, 0.0), p(size, size))),
        Curve::Line(Line::new(p(size, size), p(0.0, size))),
        Curve::Line(Line::new(p(0.0, size), p(0.0, 0.0))),
    ]
}

fn plate() -> Entity {
    let outer = ProfileLoop::new(square(10.0), true);
    let hole = ProfileLoop::new(vec![Curve::Circle(Circle::new(p(5.0, 5.0), 2.0))], false);
    Entity::Body(Sketch::new(vec![Profile::new(vec![outer, hole])], Vec::new()))
}

struct PathElement {
    d: String,
    id: String,
}

/// Parse an SVG document, returning the root viewBox and every path.
fn parse_svg(svg: &str) -> (String, Vec<PathElement>) {
    let mut reader = Reader::from_str(svg);
    let mut view_box = None;
    let mut paths = Vec::new();

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"svg" => {
                for attr in e.attributes() {
                    let attr = attr.unwrap();
                    if attr.key.as_ref() == b"viewBox" {
                        view_box = Some(attr.unescape_value().unwrap().into_owned());
                    }
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"path" => {
                let mut d = None;
                let mut id = None;
                for attr in e.attributes() {
                    let attr = attr.unwrap();
                    let value = attr.unescape_value().unwrap().into_owned();
                    match attr.key.as_ref() {
                        b"d" => d = Some(value),
                        b"id" => id = Some(value),
                        _ => {}
                    }
                }
                paths.push(PathElement {
                    d: d.unwrap(),
                    id: id.unwrap(),
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    (view_box.unwrap(), paths)
}

#[test]
fn test_one_path_per_entity() {
    let mut host = MockHost::default();
    let selections = vec![
        vec![plate(), plate()],
        vec![Entity::Curves(square(4.0))],
    ];
    let scale = UnitScale::default();
    let svg = export_selections(
        &mut host,
        &selections,
        &StyleTable::defaults(),
        50.0,
        25.0,
        scale,
    )
    .unwrap();

    let (view_box, paths) = parse_svg(&svg);
    let f = scale.factor();
    assert_eq!(view_box, format!("0 0 {} {}", 50.0 * f, 25.0 * f));

    let ids: Vec<&str> = paths.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["red_0", "red_1", "black_0"]);

    // Plate: outer loop plus hole in one path
    assert_eq!(paths[0].d.matches('M').count(), 2);
    assert_eq!(paths[0].d, paths[1].d);
    // Loose curves: every curve starts with its own move
    assert_eq!(paths[2].d.matches('M').count(), 4);

    assert_eq!(host.projected, 3);
    assert_eq!(host.outstanding(), 0);
}

#[test]
fn test_groups_follow_selection_layout() {
    let mut host = MockHost::default();
    let selections = vec![Vec::new(), vec![plate()]];
    let groups = convert_selections_to_paths(&mut host, &selections, UnitScale::default()).unwrap();
    assert_eq!(groups.len(), 2);
    assert!(groups[0].is_empty());
    assert_eq!(groups[1].len(), 1);
    assert!(groups[1][0].starts_with('M'));
}

#[test]
fn test_scratch_sketches_released_on_error() {
    let mut host = MockHost::default();
    let selections = vec![vec![plate(), Entity::Body(Sketch::default()), plate()]];
    let err = convert_selections_to_paths(&mut host, &selections, UnitScale::default()).unwrap_err();

    assert!(matches!(err, ExportError::Path(PathError::NoProfiles)));
    assert_eq!(host.projected, 2);
    assert_eq!(host.outstanding(), 0);
}

#[test]
fn test_host_failure_aborts_export() {
    let mut host = MockHost::default();
    let selections = vec![vec![plate(), Entity::Broken]];
    let err = export_selections(
        &mut host,
        &selections,
        &StyleTable::defaults(),
        50.0,
        25.0,
        UnitScale::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ExportError::Host(_)));
    assert_eq!(host.outstanding(), 0);
}

#[test]
fn test_too_many_groups() {
    let mut host = MockHost::default();
    let selections = vec![vec![plate()], Vec::new(), Vec::new()];
    let err = export_selections(
        &mut host,
        &selections,
        &StyleTable::defaults(),
        50.0,
        25.0,
        UnitScale::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ExportError::StyleMismatch { groups: 3, styles: 2 }));
    assert_eq!(host.projected, 0);
}

#[test]
fn test_scratch_guard_discards_on_drop() {
    let mut host = MockHost::default();
    let entity = plate();
    {
        let scratch = ScratchSketch::acquire(&mut host, &entity).unwrap();
        assert_eq!(scratch.profiles.len(), 1);
    }
    assert_eq!(host.projected, 1);
    assert_eq!(host.discarded, 1);
}

#[test]
fn test_unsupported_curve_skipped() {
    let mut host = MockHost::default();
    let curves = vec![
        Curve::Unsupported {
            kind: "helix".to_string(),
            start: p(0.0, 0.0),
            end: p(1.0, 0.0),
        },
        Curve::Line(Line::new(p(0.0, 0.0), p(2.54, 0.0))),
    ];
    let groups = convert_selections_to_paths(
        &mut host,
        &[vec![Entity::Curves(curves)]],
        UnitScale::default(),
    )
    .unwrap();
    assert_eq!(groups[0][0], "M0.000000 -0.000000 L72.000000 -0.000000 ");
}
