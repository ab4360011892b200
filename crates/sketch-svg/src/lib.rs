#![warn(missing_docs)]

//! sketch-svg: export planar CAD sketches as SVG
//!
//! Converts sketch profiles and loose sketch curves into stroked SVG paths
//! for laser cutters and plotters. A host application supplies geometry
//! through [`SketchHost`]; styles come from a small [`StyleTable`] file.
//!
//! # Example
//!
//! ```
//! use sketch_svg::{build_svg, StyleTable, UnitScale};
//! use sketch_svg::geom::{Curve, Line};
//! use sketch_svg::math::Point3;
//! use sketch_svg::path::{sketch_to_paths, Profile, ProfileLoop, Sketch};
//!
//! let square = vec![
//!     Curve::Line(Line::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0))),
//!     Curve::Line(Line::new(Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0))),
//!     Curve::Line(Line::new(Point3::new(1.0, 1.0, 0.0), Point3::new(0.0, 1.0, 0.0))),
//!     Curve::Line(Line::new(Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, 0.0, 0.0))),
//! ];
//! let sketch = Sketch::new(vec![Profile::new(vec![ProfileLoop::new(square, true)])], vec![]);
//!
//! let scale = UnitScale::default();
//! let d = sketch_to_paths(&sketch, scale).unwrap().concat();
//! let svg = build_svg(&[vec![d]], &StyleTable::defaults(), 50.0, 25.0, scale).unwrap();
//! assert!(svg.contains("id=\"red_0\""));
//! ```

mod document;
mod host;
mod settings;

pub use document::{build_svg, SvgDocument, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use host::{convert_selections_to_paths, EntityKind, ScratchSketch, SketchHost};
pub use settings::{Rgb, SettingsError, Style, StyleTable, SETTINGS_FILE_NAME};
pub use sketch_svg_path::{PathError, UnitScale};

/// Curve primitives.
pub use sketch_svg_geom as geom;
/// Point and vector types.
pub use sketch_svg_math as math;
/// Path-data generation.
pub use sketch_svg_path as path;

use thiserror::Error;

/// Errors returned by an SVG export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// An I/O error occurred while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path generation failed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// The style table could not be read or written.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The host failed to project or classify an entity.
    #[error("host error: {0}")]
    Host(String),

    /// There are more selection groups than styles.
    #[error("{groups} selection groups but only {styles} styles")]
    StyleMismatch {
        /// Number of selection groups.
        groups: usize,
        /// Number of styles.
        styles: usize,
    },
}

/// Convert the selections and build the SVG document in one step.
///
/// Equivalent to [`convert_selections_to_paths`] followed by [`build_svg`].
pub fn export_selections<H: SketchHost>(
    host: &mut H,
    selections: &[Vec<H::Entity>],
    styles: &StyleTable,
    width: f64,
    height: f64,
    scale: UnitScale,
) -> Result<String, ExportError> {
    if selections.len() > styles.len() {
        return Err(ExportError::StyleMismatch {
            groups: selections.len(),
            styles: styles.len(),
        });
    }
    let groups = convert_selections_to_paths(host, selections, scale)?;
    build_svg(&groups, styles, width, height, scale)
}
