//! Positioned scene-graph nodes.
//!
//! A [`Visual`] owns an ordered list of primitives and, for container
//! nodes, a nested model. It carries two caches:
//!
//! - a bounds cache, either unset or exactly the alignment-adjusted union
//!   of its non-Hidden primitives' frames as of the last computation, in
//!   absolute coordinates. Position sets and primitive list changes
//!   invalidate it; [`Visual::move_by`] shifts it in place instead.
//! - a raster image cache for container visuals, keyed by the requested
//!   pixel size at the surface's device scale. A pure optimization:
//!   disabling it (see [`EngineConfig`]) does not change observable output.

use std::rc::Rc;

use crate::{
    config::EngineConfig,
    draw::{Alignment, DrawContext, ExportContext, Primitive},
    flags::VisualFlags,
    geometry::{Bounds, Point},
    scene::VisualModel,
    style::{DrawStyle, StyleSet},
    surface::{RasterImage, RasterSurface, SoftwareSurface},
};

/// Bleed margin around a cached visual, in logical units. Covers strokes
/// centered on the bounds edge plus their anti-aliased fringe.
const CACHE_MARGIN: f32 = 2.0;

#[derive(Debug)]
struct RasterCacheEntry {
    image: RasterImage,
    scale: f32,
}

/// A positioned, flagged node owning drawable primitives and optionally a
/// nested model.
#[derive(Debug)]
pub struct Visual {
    name: String,
    position: Point,
    primitives: Vec<Primitive>,
    flags: VisualFlags,
    styles: StyleSet,
    nested: Option<Box<VisualModel>>,
    bounds: Option<Bounds>,
    raster_cache: Option<RasterCacheEntry>,
    raster_dirty: bool,
}

impl Visual {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Point::default(),
            primitives: Vec::new(),
            flags: VisualFlags::default(),
            styles: StyleSet::default(),
            nested: None,
            bounds: None,
            raster_cache: None,
            raster_dirty: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Sets an absolute position, invalidating the bounds cache.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
        self.bounds = None;
    }

    /// Translates the visual. A valid bounds cache is shifted in place
    /// rather than invalidated — the cheap path used by dragging.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        let delta = Point::new(dx, dy);
        self.position = self.position.add_point(delta);
        if let Some(bounds) = self.bounds {
            self.bounds = Some(bounds.translate(delta));
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn primitive_mut(&mut self, index: usize) -> Option<&mut Primitive> {
        self.primitives.get_mut(index)
    }

    /// Appends a primitive, invalidating the bounds cache.
    pub fn add_primitive(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
        self.bounds = None;
        self.raster_dirty = true;
    }

    /// Removes and returns the primitive at `index`, invalidating the
    /// bounds cache.
    pub fn remove_primitive(&mut self, index: usize) -> Primitive {
        let primitive = self.primitives.remove(index);
        self.bounds = None;
        self.raster_dirty = true;
        primitive
    }

    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    pub fn set_styles(&mut self, styles: StyleSet) {
        self.styles = styles;
        self.bounds = None;
        self.raster_dirty = true;
    }

    pub fn flags(&self) -> VisualFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: VisualFlags) {
        self.flags.insert(flags);
        self.raster_dirty = true;
    }

    pub fn clear_flags(&mut self, flags: VisualFlags) {
        self.flags.remove(flags);
        self.raster_dirty = true;
    }

    pub fn is_selected(&self) -> bool {
        self.flags.contains(VisualFlags::SELECTED)
    }

    pub fn nested(&self) -> Option<&VisualModel> {
        self.nested.as_deref()
    }

    pub fn nested_mut(&mut self) -> Option<&mut VisualModel> {
        self.nested.as_deref_mut()
    }

    pub fn set_nested(&mut self, nested: Option<VisualModel>) {
        self.nested = nested.map(Box::new);
        self.raster_dirty = true;
    }

    /// Sets the bounds cache to the unset sentinel; the next query
    /// recomputes.
    pub fn reset_bounds(&mut self) {
        self.bounds = None;
    }

    /// The cache as-is, without forcing a computation.
    pub fn cached_bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Absolute bounds, computed on demand: the union of the non-Hidden
    /// primitives' alignment-adjusted frames, translated by the position.
    pub fn bounds(&mut self) -> Bounds {
        if let Some(bounds) = self.bounds {
            return bounds;
        }
        let style = Rc::clone(self.styles.resolve(self.is_selected()));
        let owner_width = self.owner_width(&style);
        let mut union: Option<Bounds> = None;
        for primitive in &self.primitives {
            if let Some(frame) = primitive.frame(owner_width, &style) {
                union = Some(match union {
                    Some(current) => current.merge(&frame),
                    None => frame,
                });
            }
        }
        let bounds = union.unwrap_or_default().translate(self.position);
        self.bounds = Some(bounds);
        bounds
    }

    /// Axis-aligned containment test against the (forced-valid) cached
    /// bounds.
    pub fn contains_point(&mut self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    /// The width used by the alignment policy: the raw (Left-position)
    /// union of the non-Hidden primitives.
    pub fn owner_width(&self, style: &Rc<DrawStyle>) -> f32 {
        let mut union: Option<Bounds> = None;
        for primitive in &self.primitives {
            if primitive.alignment() == Alignment::Hidden {
                continue;
            }
            let raw = Bounds::from_origin_size(primitive.position(), primitive.measure(style));
            union = Some(match union {
                Some(current) => current.merge(&raw),
                None => raw,
            });
        }
        union.map(Bounds::width).unwrap_or(0.0)
    }

    /// True if this visual or anything below it diverges from the external
    /// document.
    pub fn is_modified_deep(&self) -> bool {
        self.flags.contains(VisualFlags::MODIFIED)
            || self.nested.as_ref().is_some_and(|model| model.is_modified())
    }

    /// Clears MODIFIED here, on every primitive, and below. Part of the
    /// edit-sync pass.
    pub fn clear_modified_deep(&mut self) {
        self.flags.remove(VisualFlags::MODIFIED);
        for primitive in &mut self.primitives {
            primitive.clear_flags(crate::flags::PrimitiveFlags::MODIFIED);
        }
        if let Some(model) = self.nested.as_deref_mut() {
            model.clear_modified();
        }
    }

    /// Forces the raster cache to rebuild on the next draw.
    pub fn mark_raster_dirty(&mut self) {
        self.raster_dirty = true;
    }

    /// Renders the visual. Container visuals go through the raster cache
    /// when the configuration enables it.
    pub fn draw(&mut self, surface: &mut dyn RasterSurface, config: &EngineConfig) {
        let bounds = self.bounds();
        let selected = self.is_selected();
        let style = Rc::clone(self.styles.resolve(selected));
        if config.use_raster_cache() && self.nested.is_some() {
            self.draw_cached(surface, config, &style, selected, bounds);
        } else {
            self.draw_content(surface, config, &style, selected);
        }
    }

    fn draw_content(
        &mut self,
        surface: &mut dyn RasterSurface,
        config: &EngineConfig,
        style: &Rc<DrawStyle>,
        selected: bool,
    ) {
        let owner_width = self.owner_width(style);
        let origin = self.position;
        let Self {
            primitives, nested, ..
        } = self;
        for primitive in primitives.iter() {
            if !primitive.visible(selected) {
                continue;
            }
            let ctx = DrawContext {
                origin,
                owner_width,
                style,
                selected,
                config,
            };
            primitive.draw(surface, &ctx, nested.as_deref_mut());
        }
    }

    fn draw_cached(
        &mut self,
        surface: &mut dyn RasterSurface,
        config: &EngineConfig,
        style: &Rc<DrawStyle>,
        selected: bool,
        bounds: Bounds,
    ) {
        // Boundary strokes are centered on the bounds and bleed outward;
        // the cache covers them with a fixed margin.
        let padded = bounds.expand(CACHE_MARGIN);
        let scale = surface.device_scale();
        let px_width = (padded.width() * scale).ceil().max(1.0) as u32;
        let px_height = (padded.height() * scale).ceil().max(1.0) as u32;

        let stale = self.raster_dirty
            || match &self.raster_cache {
                None => true,
                Some(entry) => {
                    entry.scale != scale
                        || entry.image.width() != px_width
                        || entry.image.height() != px_height
                }
            };

        if stale {
            let mut offscreen =
                SoftwareSurface::offscreen(px_width, px_height, scale, padded.min_point());
            self.draw_content(&mut offscreen, config, style, selected);
            self.raster_cache = Some(RasterCacheEntry {
                image: offscreen.into_image(),
                scale,
            });
            self.raster_dirty = false;
        }

        if let Some(entry) = &self.raster_cache {
            // The image holds `padded * scale` pixels; blitting it back
            // over `padded` applies the inverse scale, so strokes stay
            // crisp under non-integer zoom.
            surface.draw_image(&entry.image, padded);
        }
    }

    /// Emits the visual's vector form through the same frame/style
    /// resolution the raster path uses. Export is an unselected context.
    pub fn export(&mut self, writer: &mut crate::export::svg::SvgWriter) {
        self.bounds();
        let style = Rc::clone(self.styles.normal());
        let owner_width = self.owner_width(&style);
        let origin = self.position;
        let Self {
            primitives, nested, ..
        } = self;
        for primitive in primitives.iter() {
            if !primitive.visible(false) {
                continue;
            }
            let ctx = ExportContext {
                origin,
                owner_width,
                style: &style,
            };
            primitive.export(writer, &ctx, nested.as_deref_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use crate::geometry::Size;

    use super::*;

    fn visual_with_rect(size: Size) -> Visual {
        let mut visual = Visual::new("v");
        visual.add_primitive(Primitive::rect(size));
        visual
    }

    #[test]
    fn test_bounds_unset_until_queried() {
        let visual = visual_with_rect(Size::new(10.0, 6.0));
        assert!(visual.cached_bounds().is_none());
    }

    #[test]
    fn test_bounds_idempotent_after_reset() {
        let mut visual = visual_with_rect(Size::new(10.0, 6.0));
        visual.set_position(Point::new(5.0, 7.0));
        visual.reset_bounds();
        let first = visual.bounds();
        let second = visual.bounds();
        assert_eq!(first, second);
        assert_approx_eq!(f32, first.min_x(), 5.0);
        assert_approx_eq!(f32, first.min_y(), 7.0);
        assert_approx_eq!(f32, first.width(), 10.0);
        assert_approx_eq!(f32, first.height(), 6.0);
    }

    #[test]
    fn test_set_position_invalidates_cache() {
        let mut visual = visual_with_rect(Size::new(4.0, 4.0));
        visual.bounds();
        assert!(visual.cached_bounds().is_some());
        visual.set_position(Point::new(1.0, 1.0));
        assert!(visual.cached_bounds().is_none());
    }

    #[test]
    fn test_move_by_shifts_valid_cache_in_place() {
        let mut visual = visual_with_rect(Size::new(4.0, 4.0));
        let before = visual.bounds();
        visual.move_by(3.0, -2.0);
        // Cache stays valid, shifted by the delta.
        let cached = visual.cached_bounds().expect("cache should survive move_by");
        assert_approx_eq!(f32, cached.min_x(), before.min_x() + 3.0);
        assert_approx_eq!(f32, cached.min_y(), before.min_y() - 2.0);
        assert_eq!(cached, visual.bounds());
    }

    #[test]
    fn test_move_by_without_cache_leaves_it_unset() {
        let mut visual = visual_with_rect(Size::new(4.0, 4.0));
        visual.move_by(3.0, 3.0);
        assert!(visual.cached_bounds().is_none());
        assert_approx_eq!(f32, visual.bounds().min_x(), 3.0);
    }

    #[test]
    fn test_add_primitive_invalidates_cache() {
        let mut visual = visual_with_rect(Size::new(4.0, 4.0));
        visual.bounds();
        visual.add_primitive(Primitive::rect(Size::new(20.0, 2.0)));
        assert!(visual.cached_bounds().is_none());
        assert_approx_eq!(f32, visual.bounds().width(), 20.0);
    }

    #[test]
    fn test_hidden_primitive_excluded_from_bounds() {
        let mut visual = visual_with_rect(Size::new(10.0, 10.0));
        let mut wide = Primitive::rect(Size::new(100.0, 100.0));
        wide.set_alignment(Alignment::Hidden);
        visual.add_primitive(wide);
        assert_approx_eq!(f32, visual.bounds().width(), 10.0);
    }

    #[test]
    fn test_contains_point_forces_bounds() {
        let mut visual = visual_with_rect(Size::new(10.0, 10.0));
        visual.set_position(Point::new(100.0, 100.0));
        assert!(visual.contains_point(Point::new(105.0, 105.0)));
        assert!(!visual.contains_point(Point::new(95.0, 105.0)));
        assert!(visual.cached_bounds().is_some());
    }

    #[test]
    fn test_owner_width_is_raw_union() {
        let mut visual = Visual::new("v");
        let mut rect = Primitive::rect(Size::new(40.0, 10.0));
        rect.set_position(Point::new(2.0, 0.0));
        visual.add_primitive(rect);
        let style = Rc::clone(visual.styles().normal());
        assert_approx_eq!(f32, visual.owner_width(&style), 42.0);
    }

    #[test]
    fn test_modified_deep_through_nested_model() {
        let mut inner = VisualModel::new("inner");
        let mut child = Visual::new("child");
        child.set_flags(VisualFlags::MODIFIED);
        inner.add_visual(child);

        let mut outer = Visual::new("outer");
        assert!(!outer.is_modified_deep());
        outer.set_nested(Some(inner));
        assert!(outer.is_modified_deep());

        outer.clear_modified_deep();
        assert!(!outer.is_modified_deep());
    }
}
