//! SVG document assembly.
//!
//! Wraps path data in a flat SVG document: one root `<svg>` element sized
//! from the drawing extent and unit scale, and one unfilled, stroked
//! `<path>` per exported entity.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use sketch_svg_path::UnitScale;

use crate::settings::{Rgb, Style, StyleTable};
use crate::ExportError;

/// Default drawing width in model units.
pub const DEFAULT_WIDTH: f64 = 50.0;

/// Default drawing height in model units.
pub const DEFAULT_HEIGHT: f64 = 25.0;

#[derive(Debug, Clone)]
struct SvgPath {
    d: String,
    id: String,
    stroke: Rgb,
    stroke_width: f64,
}

/// SVG document builder.
///
/// Accumulates stroked paths and renders them as an SVG 1.1 document whose
/// viewbox spans `width × height` model units at the given scale.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    scale: UnitScale,
    paths: Vec<SvgPath>,
}

impl SvgDocument {
    /// Create an empty document covering `width × height` model units.
    pub fn new(width: f64, height: f64, scale: UnitScale) -> Self {
        Self {
            width,
            height,
            scale,
            paths: Vec::new(),
        }
    }

    /// Add a path stroked with `style`.
    pub fn add_path(&mut self, d: impl Into<String>, id: impl Into<String>, style: &Style) {
        self.paths.push(SvgPath {
            d: d.into(),
            id: id.into(),
            stroke: style.color,
            stroke_width: style.stroke_width,
        });
    }

    /// Number of paths added so far.
    pub fn num_paths(&self) -> usize {
        self.paths.len()
    }

    /// Viewbox size in SVG user units.
    pub fn view_size(&self) -> (f64, f64) {
        let f = self.scale.factor();
        (self.width * f, self.height * f)
    }

    /// Render the document.
    pub fn to_svg_string(&self) -> String {
        let (w, h) = self.view_size();
        let mut out = format!(
            "<svg version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\" \
             viewBox=\"0 0 {w} {h}\" width=\"{w}px\" height=\"{h}px\">\n"
        );
        for p in &self.paths {
            out.push_str(&format!(
                "    <path d=\"{}\" id=\"{}\" stroke=\"{}\" stroke-width=\"{}\" \
                 fill=\"none\" fill-opacity=\"0.5\"/>\n",
                escape_attr(&p.d),
                escape_attr(&p.id),
                p.stroke,
                p.stroke_width
            ));
        }
        out.push_str("</svg>\n");
        out
    }

    /// Write the document to any writer.
    pub fn write_to(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writer.write_all(self.to_svg_string().as_bytes())
    }

    /// Export the document to a file.
    pub fn export(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()
    }
}

/// Build an SVG document from converted path data.
///
/// `path_groups[i][j]` is the path data of entity `j` in group `i`; it is
/// drawn with style `i` and gets the id `{style name}_{j}`. Every entity
/// yields a `<path>`, even when its path data is empty. More groups than
/// styles is an error.
pub fn build_svg(
    path_groups: &[Vec<String>],
    styles: &StyleTable,
    width: f64,
    height: f64,
    scale: UnitScale,
) -> Result<String, ExportError> {
    if path_groups.len() > styles.len() {
        return Err(ExportError::StyleMismatch {
            groups: path_groups.len(),
            styles: styles.len(),
        });
    }

    let mut doc = SvgDocument::new(width, height, scale);
    for (group, style) in path_groups.iter().zip(styles.styles()) {
        for (j, d) in group.iter().enumerate() {
            doc.add_path(d.as_str(), format!("{}_{}", style.name, j), style);
        }
    }

    tracing::debug!(paths = doc.num_paths(), "built svg document");
    Ok(doc.to_svg_string())
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
