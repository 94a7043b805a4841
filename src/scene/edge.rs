//! Edges between scene-graph nodes.
//!
//! An [`Edge`] joins one source connector to one or more target
//! connectors. It has no intrinsic size: point containment is a
//! minimum-distance-to-path test against the configured pick distance,
//! never a bounding box. The path is already a short segment list, so the
//! flattened-segment distance is exact here — no curve math needed.
//!
//! A multi-target edge fans out through one synthetic mid connector and
//! reuses the single-target segment geometry for every branch; only the
//! construction differs. The synthetic point is a pure geometry helper —
//! it never enters a model and cannot be selected.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    flags::VisualFlags,
    geometry::{self, Point},
    scene::{Connector, Visual},
    semantic::EditTarget,
    style::DrawStyle,
    surface::RasterSurface,
};

const ARROW_LENGTH: f32 = 8.0;
const ARROW_HALF_WIDTH: f32 = 3.5;

/// A link from a source connector to one or more target connectors.
#[derive(Debug)]
pub struct Edge {
    source: Connector,
    targets: Vec<Connector>,
    label: Option<String>,
    edit: Option<EditTarget>,
    flags: VisualFlags,
    style: Rc<DrawStyle>,
}

impl Edge {
    pub fn new(source: Connector, target: Connector, style: Rc<DrawStyle>) -> Self {
        Self {
            source,
            targets: vec![target],
            label: None,
            edit: None,
            flags: VisualFlags::default(),
            style,
        }
    }

    /// A fan-out edge with several targets.
    ///
    /// # Panics
    ///
    /// Panics when `targets` is empty — an edge without a target is a
    /// caller bug.
    pub fn fan_out(source: Connector, targets: Vec<Connector>, style: Rc<DrawStyle>) -> Self {
        assert!(!targets.is_empty(), "an edge needs at least one target");
        Self {
            source,
            targets,
            label: None,
            edit: None,
            flags: VisualFlags::default(),
            style,
        }
    }

    pub fn source(&self) -> &Connector {
        &self.source
    }

    pub fn targets(&self) -> &[Connector] {
        &self.targets
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn edit_target(&self) -> Option<&EditTarget> {
        self.edit.as_ref()
    }

    pub fn set_edit_target(&mut self, target: Option<EditTarget>) {
        self.edit = target;
    }

    pub fn flags(&self) -> VisualFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: VisualFlags) {
        self.flags.insert(flags);
    }

    pub fn clear_flags(&mut self, flags: VisualFlags) {
        self.flags.remove(flags);
    }

    pub fn is_selected(&self) -> bool {
        self.flags.contains(VisualFlags::SELECTED)
    }

    /// The synthetic source-side point the branches of a fan-out share.
    fn synthetic_mid(source: Point, targets: &[Point]) -> Point {
        let n = targets.len() as f32;
        let centroid = targets
            .iter()
            .fold(Point::default(), |acc, p| acc.add_point(*p))
            .scale(1.0 / n);
        source.midpoint(centroid)
    }

    /// The edge's polylines: one for a single target; for a fan-out, a
    /// trunk to the synthetic mid plus one branch per target. Targets whose
    /// parent has left the model are skipped.
    pub fn paths(&self, visuals: &IndexMap<String, Visual>) -> Vec<Vec<Point>> {
        let Some(source) = self.source.anchor(visuals) else {
            return Vec::new();
        };
        let targets: Vec<Point> = self
            .targets
            .iter()
            .filter_map(|target| target.anchor(visuals))
            .collect();
        match targets.as_slice() {
            [] => Vec::new(),
            [only] => vec![vec![source, *only]],
            many => {
                let mid = Self::synthetic_mid(source, many);
                let mut paths = vec![vec![source, mid]];
                paths.extend(many.iter().map(|target| vec![mid, *target]));
                paths
            }
        }
    }

    /// Minimum distance from `point` to any path segment.
    pub fn distance_to(&self, point: Point, visuals: &IndexMap<String, Visual>) -> f32 {
        self.paths(visuals)
            .iter()
            .map(|path| geometry::distance_to_polyline(point, path))
            .fold(f32::INFINITY, f32::min)
    }

    /// Path-based containment: true iff the point lies within
    /// `max_pick_distance` of the flattened path.
    pub fn contains_point(
        &self,
        point: Point,
        visuals: &IndexMap<String, Visual>,
        max_pick_distance: f32,
    ) -> bool {
        self.distance_to(point, visuals) <= max_pick_distance
    }

    /// Where the label sits: the middle of a single-target edge, or the
    /// synthetic mid of a fan-out.
    pub fn label_anchor(&self, visuals: &IndexMap<String, Visual>) -> Option<Point> {
        let paths = self.paths(visuals);
        let trunk = paths.first()?;
        Some(trunk[0].midpoint(trunk[1]))
    }

    pub fn draw(&self, surface: &mut dyn RasterSurface, visuals: &IndexMap<String, Visual>) {
        let paths = self.paths(visuals);
        if paths.is_empty() {
            return;
        }
        let stroke = self.style.stroke();
        let width = self.style.stroke_width();

        for (index, path) in paths.iter().enumerate() {
            for pair in path.windows(2) {
                surface.draw_line(pair[0], pair[1], stroke, width);
            }
            // The trunk of a fan-out carries no arrow; every
            // target-terminating path does.
            let terminates_at_target = paths.len() == 1 || index > 0;
            if terminates_at_target {
                let tip = path[path.len() - 1];
                let back = path[path.len() - 2];
                for (from, to) in arrow_head_segments(back, tip) {
                    surface.draw_line(from, to, stroke, width);
                }
            }
        }

        if let (Some(label), Some(anchor)) = (self.label.as_deref(), self.label_anchor(visuals)) {
            surface.draw_text(anchor, label, &self.style);
        }

        let selected = self.is_selected();
        self.source.draw(surface, visuals, &self.style, selected);
        for target in &self.targets {
            target.draw(surface, visuals, &self.style, selected);
        }
    }

    /// Vector export of the same geometry the raster path draws.
    pub fn export(
        &self,
        writer: &mut crate::export::svg::SvgWriter,
        visuals: &IndexMap<String, Visual>,
    ) {
        let paths = self.paths(visuals);
        if paths.is_empty() {
            return;
        }
        for (index, path) in paths.iter().enumerate() {
            for pair in path.windows(2) {
                writer.line(pair[0], pair[1], &self.style);
            }
            let terminates_at_target = paths.len() == 1 || index > 0;
            if terminates_at_target {
                let tip = path[path.len() - 1];
                let back = path[path.len() - 2];
                for (from, to) in arrow_head_segments(back, tip) {
                    writer.line(from, to, &self.style);
                }
            }
        }
        if let (Some(label), Some(anchor)) = (self.label.as_deref(), self.label_anchor(visuals)) {
            writer.text(anchor, label, &self.style);
        }
    }
}

/// The two barb segments of an arrow head pointing from `from` to `tip`.
/// Degenerate directions produce no barbs.
fn arrow_head_segments(from: Point, tip: Point) -> Vec<(Point, Point)> {
    let direction = tip.sub_point(from);
    let length = direction.hypot();
    if length < 1e-3 {
        return Vec::new();
    }
    let unit = direction.scale(1.0 / length);
    let base = tip.sub_point(unit.scale(ARROW_LENGTH));
    let perpendicular = Point::new(-unit.y(), unit.x());
    vec![
        (tip, base.add_point(perpendicular.scale(ARROW_HALF_WIDTH))),
        (tip, base.sub_point(perpendicular.scale(ARROW_HALF_WIDTH))),
    ]
}
