//! The seam between the exporter and a host CAD application.

use std::ops::Deref;

use sketch_svg_path::{curves_to_paths, sketch_to_paths, Sketch, UnitScale};

use crate::ExportError;

/// What a selected entity is, which decides how it is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A solid body: its projected profiles are traced.
    Body,
    /// Loose sketch curves: each curve is emitted on its own.
    Curves,
}

/// A host application that can project selected entities into planar sketches.
pub trait SketchHost {
    /// Host handle of a selectable entity.
    type Entity;

    /// Classify an entity.
    fn entity_kind(&self, entity: &Self::Entity) -> EntityKind;

    /// Project an entity onto the XY plane as a scratch sketch.
    fn project(&mut self, entity: &Self::Entity) -> Result<Sketch, ExportError>;

    /// Release a scratch sketch created by [`SketchHost::project`].
    fn discard(&mut self, sketch: Sketch);
}

/// A projected sketch that is handed back to its host when dropped.
pub struct ScratchSketch<'h, H: SketchHost> {
    host: &'h mut H,
    sketch: Sketch,
}

impl<'h, H: SketchHost> ScratchSketch<'h, H> {
    /// Project `entity` and hold the resulting sketch.
    pub fn acquire(host: &'h mut H, entity: &H::Entity) -> Result<Self, ExportError> {
        let sketch = host.project(entity)?;
        Ok(Self { host, sketch })
    }

    /// The held sketch.
    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }
}

impl<H: SketchHost> Deref for ScratchSketch<'_, H> {
    type Target = Sketch;

    fn deref(&self) -> &Sketch {
        &self.sketch
    }
}

impl<H: SketchHost> Drop for ScratchSketch<'_, H> {
    fn drop(&mut self) {
        let sketch = std::mem::take(&mut self.sketch);
        self.host.discard(sketch);
    }
}

/// Convert every selected entity into path data.
///
/// Returns one string per entity, grouped like `selections`. Bodies are
/// traced through their representative profile; curve entities emit each
/// sketch curve separately. An entity's strings are joined into one. The
/// first failing entity aborts the whole conversion; its scratch sketch is
/// still discarded.
pub fn convert_selections_to_paths<H: SketchHost>(
    host: &mut H,
    selections: &[Vec<H::Entity>],
    scale: UnitScale,
) -> Result<Vec<Vec<String>>, ExportError> {
    let mut groups = Vec::with_capacity(selections.len());

    for (i, group) in selections.iter().enumerate() {
        let mut paths = Vec::with_capacity(group.len());
        for (j, entity) in group.iter().enumerate() {
            let kind = host.entity_kind(entity);
            let scratch = ScratchSketch::acquire(host, entity)?;
            let parts = match kind {
                EntityKind::Body => sketch_to_paths(scratch.sketch(), scale)?,
                EntityKind::Curves => curves_to_paths(&scratch.curves, scale),
            };
            tracing::debug!(group = i, entity = j, ?kind, "converted selection");
            paths.push(parts.concat());
        }
        groups.push(paths);
    }

    Ok(groups)
}
