//! Leaf drawable primitives.
//!
//! A [`Primitive`] is one drawable unit inside a visual: a shape, a text
//! run, an embedded vector image, or the box hosting a nested model. The
//! kinds form a closed set — [`PrimitiveKind`] — with one dispatch per
//! operation, so adding a kind forces every backend to handle it.
//!
//! The raster and vector backends consume the same resolved geometry: both
//! `draw` and `export` position through [`Primitive::frame`] and resolve
//! style the same way (local style if present, else the owner's), which is
//! what keeps the two outputs in agreement.

use std::rc::Rc;

use crate::{
    config::EngineConfig,
    draw::image::VectorImage,
    flags::PrimitiveFlags,
    geometry::{Bounds, Insets, Point, Size},
    scene::VisualModel,
    semantic::EditTarget,
    style::DrawStyle,
    surface::RasterSurface,
    text,
};

/// Horizontal placement of a primitive inside its owner's frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Raw relative position.
    #[default]
    Left,
    /// Centered in the owner's width, shifted by the relative offset.
    Center,
    /// Flush right, shifted back by the relative offset.
    Right,
    /// Excluded from both drawing and bounds aggregation.
    Hidden,
}

/// Kind-specific payload of a primitive.
#[derive(Debug)]
pub enum PrimitiveKind {
    Rect { size: Size },
    Circle { radius: f32, filled: bool },
    /// A segment from the frame origin along `vector`.
    Line { vector: Point },
    Text { content: String },
    Image(VectorImage),
    /// Hosts the owner's nested model, shrink-scaled to fit.
    SubModelBox { size: Size },
}

/// Context handed down to a primitive's raster draw.
pub struct DrawContext<'a> {
    /// The owner's absolute position.
    pub origin: Point,
    /// The owner's width, for alignment.
    pub owner_width: f32,
    /// The owner's resolved style (normal or highlighted).
    pub style: &'a Rc<DrawStyle>,
    /// Whether the owner is in a selected display state.
    pub selected: bool,
    pub config: &'a EngineConfig,
}

/// Context handed down to a primitive's vector export.
pub struct ExportContext<'a> {
    pub origin: Point,
    pub owner_width: f32,
    pub style: &'a Rc<DrawStyle>,
}

/// A positioned, stylable drawing unit owned by a visual.
#[derive(Debug)]
pub struct Primitive {
    position: Point,
    insets: Insets,
    alignment: Alignment,
    flags: PrimitiveFlags,
    style: Option<Rc<DrawStyle>>,
    edit: Option<EditTarget>,
    kind: PrimitiveKind,
}

impl Primitive {
    fn new(kind: PrimitiveKind) -> Self {
        Self {
            position: Point::default(),
            insets: Insets::default(),
            alignment: Alignment::Left,
            flags: PrimitiveFlags::DRAW_ALWAYS,
            style: None,
            edit: None,
            kind,
        }
    }

    pub fn rect(size: Size) -> Self {
        Self::new(PrimitiveKind::Rect { size })
    }

    pub fn circle(radius: f32, filled: bool) -> Self {
        Self::new(PrimitiveKind::Circle { radius, filled })
    }

    pub fn line(vector: Point) -> Self {
        Self::new(PrimitiveKind::Line { vector })
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(PrimitiveKind::Text {
            content: content.into(),
        })
    }

    pub fn image(image: VectorImage) -> Self {
        Self::new(PrimitiveKind::Image(image))
    }

    pub fn sub_model_box(size: Size) -> Self {
        Self::new(PrimitiveKind::SubModelBox { size })
    }

    pub fn kind(&self) -> &PrimitiveKind {
        &self.kind
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn insets(&self) -> Insets {
        self.insets
    }

    pub fn set_insets(&mut self, insets: Insets) {
        self.insets = insets;
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    pub fn flags(&self) -> PrimitiveFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: PrimitiveFlags) {
        self.flags.insert(flags);
    }

    pub fn clear_flags(&mut self, flags: PrimitiveFlags) {
        self.flags.remove(flags);
    }

    /// Overrides the owner's style for this primitive only.
    pub fn set_style(&mut self, style: Option<Rc<DrawStyle>>) {
        self.style = style;
    }

    /// The edit-proxy link, if this primitive is bound to a document value.
    pub fn edit_target(&self) -> Option<&EditTarget> {
        self.edit.as_ref()
    }

    pub fn set_edit_target(&mut self, target: Option<EditTarget>) {
        self.edit = target;
    }

    /// Text content, for text primitives.
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            PrimitiveKind::Text { content } => Some(content),
            _ => None,
        }
    }

    /// Replaces the content of a text primitive. Returns false for other
    /// kinds.
    pub fn set_text_content(&mut self, value: &str) -> bool {
        match &mut self.kind {
            PrimitiveKind::Text { content } => {
                *content = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// The style this primitive actually draws with: its local style if
    /// present, else the owner's resolved style.
    pub fn resolved_style<'a>(&'a self, inherited: &'a Rc<DrawStyle>) -> &'a Rc<DrawStyle> {
        self.style.as_ref().unwrap_or(inherited)
    }

    /// Whether the primitive is drawn for the given display state.
    pub fn visible(&self, selected: bool) -> bool {
        if self.alignment == Alignment::Hidden {
            return false;
        }
        self.flags.contains(PrimitiveFlags::DRAW_ALWAYS)
            || (selected && self.flags.contains(PrimitiveFlags::DRAW_SELECTED))
    }

    /// Content box plus insets, as a pure function of current style and
    /// content. Safe to call at any time; text falls back to the
    /// character-count heuristic when no font data is available.
    pub fn measure(&self, inherited: &Rc<DrawStyle>) -> Size {
        let style = self.resolved_style(inherited);
        let content = match &self.kind {
            PrimitiveKind::Rect { size } => *size,
            PrimitiveKind::Circle { radius, .. } => Size::new(radius * 2.0, radius * 2.0),
            PrimitiveKind::Line { vector } => Size::new(vector.x().abs(), vector.y().abs()),
            PrimitiveKind::Text { content } => {
                text::measure(content, style.font_family(), style.font_size())
            }
            PrimitiveKind::Image(image) => image.size(),
            PrimitiveKind::SubModelBox { size } => *size,
        };
        content.add_padding(self.insets)
    }

    /// The primitive's frame within its owner, relative to the owner's
    /// origin: measured size placed per the alignment policy. `None` for
    /// Hidden primitives.
    pub fn frame(&self, owner_width: f32, inherited: &Rc<DrawStyle>) -> Option<Bounds> {
        let size = self.measure(inherited);
        let x = match self.alignment {
            Alignment::Left => self.position.x(),
            Alignment::Center => (owner_width - size.width()) / 2.0 + self.position.x(),
            Alignment::Right => owner_width - size.width() - self.position.x(),
            Alignment::Hidden => return None,
        };
        Some(Bounds::from_origin_size(
            Point::new(x, self.position.y()),
            size,
        ))
    }

    /// The content box inside a frame, insets removed.
    fn content_box(&self, frame: Bounds) -> Bounds {
        Bounds::from_origin_size(
            frame
                .min_point()
                .add_point(Point::new(self.insets.left(), self.insets.top())),
            Size::new(
                (frame.width() - self.insets.horizontal_sum()).max(0.0),
                (frame.height() - self.insets.vertical_sum()).max(0.0),
            ),
        )
    }

    /// Renders the primitive onto a raster surface.
    pub fn draw(
        &self,
        surface: &mut dyn RasterSurface,
        ctx: &DrawContext<'_>,
        nested: Option<&mut VisualModel>,
    ) {
        let style = Rc::clone(self.resolved_style(ctx.style));
        let Some(frame) = self.frame(ctx.owner_width, ctx.style) else {
            return;
        };
        let content = self.content_box(frame.translate(ctx.origin));

        match &self.kind {
            PrimitiveKind::Rect { .. } => {
                if let Some(fill) = style.fill() {
                    surface.fill_rect(content, *fill);
                }
                surface.stroke_rect(content, style.stroke(), style.stroke_width());
            }
            PrimitiveKind::Circle { filled, .. } => {
                let radius = (content.width().min(content.height())) / 2.0;
                if *filled {
                    surface.fill_circle(content.center(), radius, style.stroke());
                } else {
                    if let Some(fill) = style.fill() {
                        surface.fill_circle(content.center(), radius, *fill);
                    }
                    surface.stroke_circle(
                        content.center(),
                        radius,
                        style.stroke(),
                        style.stroke_width(),
                    );
                }
            }
            PrimitiveKind::Line { vector } => {
                let (from, to) = line_endpoints(content, *vector);
                surface.draw_line(from, to, style.stroke(), style.stroke_width());
            }
            PrimitiveKind::Text { content: value } => {
                surface.draw_text(content.min_point(), value, &style);
            }
            PrimitiveKind::Image(image) => {
                surface.draw_vector(image, content);
            }
            PrimitiveKind::SubModelBox { .. } => {
                surface.stroke_rect(content, style.stroke(), style.stroke_width());
                if let Some(model) = nested {
                    if let Some(sub_bounds) = model.content_bounds() {
                        let (offset, scale) = sub_model_transform(content, sub_bounds);
                        surface.push_transform(offset, scale);
                        model.draw(surface, ctx.config);
                        surface.pop_transform();
                    }
                }
            }
        }
    }

    /// Emits the primitive's vector equivalent, using the same frame and
    /// style resolution as [`draw`](Self::draw).
    pub fn export(
        &self,
        writer: &mut crate::export::svg::SvgWriter,
        ctx: &ExportContext<'_>,
        nested: Option<&mut VisualModel>,
    ) {
        let style = Rc::clone(self.resolved_style(ctx.style));
        let Some(frame) = self.frame(ctx.owner_width, ctx.style) else {
            return;
        };
        let content = self.content_box(frame.translate(ctx.origin));

        match &self.kind {
            PrimitiveKind::Rect { .. } => writer.rect(content, &style),
            PrimitiveKind::Circle { filled, .. } => {
                let radius = (content.width().min(content.height())) / 2.0;
                writer.circle(content.center(), radius, &style, *filled);
            }
            PrimitiveKind::Line { vector } => {
                let (from, to) = line_endpoints(content, *vector);
                writer.line(from, to, &style);
            }
            PrimitiveKind::Text { content: value } => {
                writer.text(content.min_point(), value, &style);
            }
            PrimitiveKind::Image(image) => {
                writer.raw_group(content.min_point(), image.source());
            }
            PrimitiveKind::SubModelBox { .. } => {
                writer.rect(content, &style);
                if let Some(model) = nested {
                    if let Some(sub_bounds) = model.content_bounds() {
                        let (offset, scale) = sub_model_transform(content, sub_bounds);
                        writer.open_group(offset, scale);
                        crate::export::svg::export_model_into(writer, model);
                        writer.close_group();
                    }
                }
            }
        }
    }
}

/// Endpoints of a line primitive within its content box. Negative vector
/// components start from the opposite corner so the segment stays inside
/// the measured frame.
fn line_endpoints(content: Bounds, vector: Point) -> (Point, Point) {
    let from = content.min_point().add_point(Point::new(
        (-vector.x()).max(0.0),
        (-vector.y()).max(0.0),
    ));
    (from, from.add_point(vector))
}

/// The translate/scale placing a nested model inside its box: a uniform
/// shrink-only scale capped at 1, centered in the box.
fn sub_model_transform(box_content: Bounds, sub_bounds: Bounds) -> (Point, f32) {
    let sub = sub_bounds.to_size();
    let scale = if sub.width() <= 0.0 || sub.height() <= 0.0 {
        1.0
    } else {
        (box_content.width() / sub.width())
            .min(box_content.height() / sub.height())
            .min(1.0)
    };
    let offset = Point::new(
        box_content.min_x() + (box_content.width() - sub.width() * scale) / 2.0
            - sub_bounds.min_x() * scale,
        box_content.min_y() + (box_content.height() - sub.height() * scale) / 2.0
            - sub_bounds.min_y() * scale,
    );
    (offset, scale)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn style() -> Rc<DrawStyle> {
        Rc::new(DrawStyle::default())
    }

    #[test]
    fn test_measure_shapes_include_insets() {
        let mut rect = Primitive::rect(Size::new(10.0, 6.0));
        rect.set_insets(Insets::uniform(2.0));
        assert_eq!(rect.measure(&style()), Size::new(14.0, 10.0));

        let circle = Primitive::circle(5.0, false);
        assert_eq!(circle.measure(&style()), Size::new(10.0, 10.0));

        let line = Primitive::line(Point::new(-3.0, 4.0));
        assert_eq!(line.measure(&style()), Size::new(3.0, 4.0));
    }

    #[test]
    fn test_measure_text_is_positive() {
        let text = Primitive::text("State");
        let size = text.measure(&style());
        assert!(size.width() > 0.0);
        assert!(size.height() > 0.0);
    }

    #[test]
    fn test_alignment_law() {
        let owner_width = 100.0;
        let style = style();

        let mut p = Primitive::rect(Size::new(10.0, 4.0));
        p.set_position(Point::new(2.0, 5.0));

        p.set_alignment(Alignment::Left);
        let left = p.frame(owner_width, &style).unwrap();
        assert_approx_eq!(f32, left.min_x(), 2.0);
        assert_approx_eq!(f32, left.min_y(), 5.0);

        p.set_alignment(Alignment::Center);
        let center = p.frame(owner_width, &style).unwrap();
        assert_approx_eq!(f32, center.min_x(), (100.0 - 10.0) / 2.0 + 2.0);

        p.set_alignment(Alignment::Right);
        let right = p.frame(owner_width, &style).unwrap();
        assert_approx_eq!(f32, right.min_x(), 100.0 - 10.0 - 2.0);

        p.set_alignment(Alignment::Hidden);
        assert!(p.frame(owner_width, &style).is_none());
    }

    #[test]
    fn test_hidden_not_visible() {
        let mut p = Primitive::rect(Size::new(4.0, 4.0));
        p.set_alignment(Alignment::Hidden);
        assert!(!p.visible(false));
        assert!(!p.visible(true));
    }

    #[test]
    fn test_draw_selected_visibility() {
        let mut p = Primitive::circle(3.0, true);
        p.clear_flags(PrimitiveFlags::DRAW_ALWAYS);
        p.set_flags(PrimitiveFlags::DRAW_SELECTED);
        assert!(!p.visible(false));
        assert!(p.visible(true));
    }

    #[test]
    fn test_local_style_overrides_inherited() {
        let inherited = style();
        let mut local = DrawStyle::default();
        local.set_font_size(30);
        let local = Rc::new(local);

        let mut p = Primitive::text("x");
        assert!(Rc::ptr_eq(p.resolved_style(&inherited), &inherited));
        p.set_style(Some(Rc::clone(&local)));
        assert!(Rc::ptr_eq(p.resolved_style(&inherited), &local));
    }

    #[test]
    fn test_text_content_roundtrip() {
        let mut p = Primitive::text("before");
        assert_eq!(p.text_content(), Some("before"));
        assert!(p.set_text_content("after"));
        assert_eq!(p.text_content(), Some("after"));

        let mut rect = Primitive::rect(Size::new(1.0, 1.0));
        assert!(rect.text_content().is_none());
        assert!(!rect.set_text_content("nope"));
    }

    #[test]
    fn test_line_endpoints_negative_vector() {
        let content = Bounds::from_origin_size(Point::new(10.0, 10.0), Size::new(3.0, 4.0));
        let (from, to) = line_endpoints(content, Point::new(-3.0, 4.0));
        assert_eq!(from, Point::new(13.0, 10.0));
        assert_eq!(to, Point::new(10.0, 14.0));
    }

    #[test]
    fn test_sub_model_transform_shrinks_and_centers() {
        let box_content = Bounds::from_origin_size(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
        let sub = Bounds::from_origin_size(Point::new(0.0, 0.0), Size::new(200.0, 200.0));
        let (offset, scale) = sub_model_transform(box_content, sub);
        assert_approx_eq!(f32, scale, 0.25);
        // Scaled content is 50x50, centered horizontally in the 100-wide box.
        assert_approx_eq!(f32, offset.x(), 25.0);
        assert_approx_eq!(f32, offset.y(), 0.0);
    }

    #[test]
    fn test_sub_model_transform_never_grows() {
        let box_content = Bounds::from_origin_size(Point::new(0.0, 0.0), Size::new(100.0, 100.0));
        let sub = Bounds::from_origin_size(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let (_, scale) = sub_model_transform(box_content, sub);
        assert_approx_eq!(f32, scale, 1.0);
    }

    #[test]
    fn test_sub_model_transform_compensates_sub_origin() {
        let box_content = Bounds::from_origin_size(Point::new(0.0, 0.0), Size::new(50.0, 50.0));
        let sub = Bounds::from_origin_size(Point::new(40.0, 40.0), Size::new(50.0, 50.0));
        let (offset, scale) = sub_model_transform(box_content, sub);
        assert_approx_eq!(f32, scale, 1.0);
        // The sub-model's own min corner maps back to the box corner.
        assert_approx_eq!(f32, offset.x() + sub.min_x() * scale, 0.0);
        assert_approx_eq!(f32, offset.y() + sub.min_y() * scale, 0.0);
    }
}
