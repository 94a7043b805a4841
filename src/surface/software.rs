//! Software raster painter over a tiny-skia pixmap.

use cosmic_text::{Attrs, Buffer, Family, Metrics, Shaping, SwashCache};
use tiny_skia::{
    FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::{
    color::Color,
    draw::VectorImage,
    geometry::{Bounds, Point},
    style::DrawStyle,
    surface::{RasterImage, RasterSurface},
    text,
};

/// A CPU raster surface. Renders into an owned pixmap; also used headless
/// to build the per-visual raster caches.
pub struct SoftwareSurface {
    pixmap: Pixmap,
    transforms: Vec<Transform>,
    swash: SwashCache,
}

impl SoftwareSurface {
    /// A surface of `width_px` x `height_px` device pixels mapping logical
    /// units through `device_scale`.
    pub fn new(width_px: u32, height_px: u32, device_scale: f32) -> Self {
        Self::with_base(
            width_px,
            height_px,
            Transform::from_scale(device_scale, device_scale),
        )
    }

    /// An offscreen surface whose logical origin is `origin` — the corner
    /// of the visual being cached maps to pixel (0, 0).
    pub fn offscreen(width_px: u32, height_px: u32, device_scale: f32, origin: Point) -> Self {
        Self::with_base(
            width_px,
            height_px,
            Transform::from_scale(device_scale, device_scale)
                .pre_translate(-origin.x(), -origin.y()),
        )
    }

    fn with_base(width_px: u32, height_px: u32, base: Transform) -> Self {
        let pixmap =
            Pixmap::new(width_px.max(1), height_px.max(1)).expect("non-zero pixmap dimensions");
        Self {
            pixmap,
            transforms: vec![base],
            swash: SwashCache::new(),
        }
    }

    fn current(&self) -> Transform {
        *self.transforms.last().expect("transform stack is never empty")
    }

    /// Maps a logical point to device pixels through the current transform.
    fn to_device(&self, point: Point) -> Point {
        let t = self.current();
        Point::new(
            point.x() * t.sx + point.y() * t.kx + t.tx,
            point.x() * t.ky + point.y() * t.sy + t.ty,
        )
    }

    pub fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba8();
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_image(self) -> RasterImage {
        RasterImage::new(self.pixmap)
    }

    fn solid_paint(color: Color) -> Paint<'static> {
        let [r, g, b, a] = color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint
    }

    fn stroke(width: f32) -> Stroke {
        Stroke {
            width,
            ..Stroke::default()
        }
    }
}

impl RasterSurface for SoftwareSurface {
    fn device_scale(&self) -> f32 {
        self.current().sx
    }

    fn fill_rect(&mut self, bounds: Bounds, color: Color) {
        let Some(rect) =
            Rect::from_xywh(bounds.min_x(), bounds.min_y(), bounds.width(), bounds.height())
        else {
            return;
        };
        let paint = Self::solid_paint(color);
        let transform = self.current();
        self.pixmap.fill_rect(rect, &paint, transform, None);
    }

    fn stroke_rect(&mut self, bounds: Bounds, color: Color, width: f32) {
        let Some(rect) =
            Rect::from_xywh(bounds.min_x(), bounds.min_y(), bounds.width(), bounds.height())
        else {
            return;
        };
        let mut builder = PathBuilder::new();
        builder.push_rect(rect);
        let Some(path) = builder.finish() else {
            return;
        };
        let paint = Self::solid_paint(color);
        let transform = self.current();
        self.pixmap
            .stroke_path(&path, &paint, &Self::stroke(width), transform, None);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        let mut builder = PathBuilder::new();
        builder.push_circle(center.x(), center.y(), radius);
        let Some(path) = builder.finish() else {
            return;
        };
        let paint = Self::solid_paint(color);
        let transform = self.current();
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32) {
        let mut builder = PathBuilder::new();
        builder.push_circle(center.x(), center.y(), radius);
        let Some(path) = builder.finish() else {
            return;
        };
        let paint = Self::solid_paint(color);
        let transform = self.current();
        self.pixmap
            .stroke_path(&path, &paint, &Self::stroke(width), transform, None);
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x(), from.y());
        builder.line_to(to.x(), to.y());
        let Some(path) = builder.finish() else {
            return;
        };
        let paint = Self::solid_paint(color);
        let transform = self.current();
        self.pixmap
            .stroke_path(&path, &paint, &Self::stroke(width), transform, None);
    }

    fn draw_text(&mut self, origin: Point, content: &str, style: &DrawStyle) {
        if content.is_empty() {
            return;
        }
        // Shape at the effective device scale and place glyph pixels
        // directly, so text stays sharp at any zoom.
        let scale = self.device_scale();
        let font_px = style.font_size() as f32 * text::PT_TO_PX * scale;
        let metrics = Metrics::new(font_px, font_px * text::LINE_HEIGHT_FACTOR);
        let device_origin = self.to_device(origin);

        let [r, g, b, a] = style.stroke().to_rgba8();
        let color = cosmic_text::Color::rgba(r, g, b, a);

        let Self { pixmap, swash, .. } = self;
        text::with_font_system(|system| {
            let mut buffer = Buffer::new(system, metrics);
            let mut buffer = buffer.borrow_with(system);
            let attrs = Attrs::new().family(Family::Name(style.font_family()));
            buffer.set_size(None, None);
            buffer.set_text(content, &attrs, Shaping::Advanced, None);
            buffer.shape_until_scroll(true);

            buffer.draw(swash, color, |x, y, w, h, pixel| {
                let Some(rect) = Rect::from_xywh(
                    device_origin.x() + x as f32,
                    device_origin.y() + y as f32,
                    w as f32,
                    h as f32,
                ) else {
                    return;
                };
                let mut paint = Paint::default();
                paint.set_color_rgba8(pixel.r(), pixel.g(), pixel.b(), pixel.a());
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            });
        });
    }

    fn draw_vector(&mut self, image: &VectorImage, dest: Bounds) {
        let intrinsic = image.size();
        if intrinsic.width() <= 0.0 || intrinsic.height() <= 0.0 {
            return;
        }
        let transform = self
            .current()
            .pre_translate(dest.min_x(), dest.min_y())
            .pre_scale(
                dest.width() / intrinsic.width(),
                dest.height() / intrinsic.height(),
            );
        image.render(transform, &mut self.pixmap.as_mut());
    }

    fn draw_image(&mut self, image: &RasterImage, dest: Bounds) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let transform = self
            .current()
            .pre_translate(dest.min_x(), dest.min_y())
            .pre_scale(
                dest.width() / image.width() as f32,
                dest.height() / image.height() as f32,
            );
        self.pixmap.draw_pixmap(
            0,
            0,
            image.pixmap().as_ref(),
            &PixmapPaint::default(),
            transform,
            None,
        );
    }

    fn push_transform(&mut self, offset: Point, scale: f32) {
        let next = self
            .current()
            .pre_translate(offset.x(), offset.y())
            .pre_scale(scale, scale);
        self.transforms.push(next);
    }

    fn pop_transform(&mut self) {
        assert!(
            self.transforms.len() > 1,
            "pop_transform without a matching push"
        );
        self.transforms.pop();
    }
}

impl std::fmt::Debug for SoftwareSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("transforms", &self.transforms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use crate::geometry::Size;

    use super::*;

    fn any_pixel_set(surface: &SoftwareSurface) -> bool {
        surface.pixmap().data().iter().any(|&b| b != 0)
    }

    #[test]
    fn test_fill_rect_touches_pixels() {
        let mut surface = SoftwareSurface::new(20, 20, 1.0);
        assert!(!any_pixel_set(&surface));
        surface.fill_rect(
            Bounds::from_origin_size(Point::new(2.0, 2.0), Size::new(10.0, 10.0)),
            Color::new("red").unwrap(),
        );
        assert!(any_pixel_set(&surface));
    }

    #[test]
    fn test_device_scale_follows_transform_stack() {
        let mut surface = SoftwareSurface::new(10, 10, 2.0);
        assert_approx_eq!(f32, surface.device_scale(), 2.0);
        surface.push_transform(Point::default(), 0.5);
        assert_approx_eq!(f32, surface.device_scale(), 1.0);
        surface.pop_transform();
        assert_approx_eq!(f32, surface.device_scale(), 2.0);
    }

    #[test]
    #[should_panic(expected = "matching push")]
    fn test_unmatched_pop_panics() {
        let mut surface = SoftwareSurface::new(10, 10, 1.0);
        surface.pop_transform();
    }

    #[test]
    fn test_offscreen_origin_maps_to_zero() {
        let surface = SoftwareSurface::offscreen(10, 10, 2.0, Point::new(30.0, 40.0));
        let device = surface.to_device(Point::new(30.0, 40.0));
        assert_approx_eq!(f32, device.x(), 0.0);
        assert_approx_eq!(f32, device.y(), 0.0);
    }

    #[test]
    fn test_push_transform_composes() {
        let mut surface = SoftwareSurface::new(10, 10, 1.0);
        surface.push_transform(Point::new(10.0, 20.0), 0.5);
        let device = surface.to_device(Point::new(4.0, 4.0));
        assert_approx_eq!(f32, device.x(), 12.0);
        assert_approx_eq!(f32, device.y(), 22.0);
    }

    #[test]
    fn test_draw_image_blits() {
        let mut cache = SoftwareSurface::new(4, 4, 1.0);
        cache.clear(Color::new("blue").unwrap());
        let image = cache.into_image();

        let mut surface = SoftwareSurface::new(8, 8, 1.0);
        surface.draw_image(
            &image,
            Bounds::from_origin_size(Point::new(0.0, 0.0), Size::new(4.0, 4.0)),
        );
        assert!(any_pixel_set(&surface));
    }
}
