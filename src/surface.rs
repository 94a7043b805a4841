//! Raster painting surfaces.
//!
//! [`RasterSurface`] is the object-safe seam between the scene graph and a
//! host's painting machinery: drawing operations in logical diagram
//! coordinates plus the device scale the surface maps them through. The
//! crate ships one implementation, [`SoftwareSurface`], a tiny-skia
//! software painter also used to build the per-visual raster caches; hosts
//! with their own canvas implement the trait instead.

mod software;

pub use software::SoftwareSurface;

use crate::{
    color::Color,
    draw::VectorImage,
    geometry::{Bounds, Point},
    style::DrawStyle,
};

/// A rendered raster image, as produced by an offscreen [`SoftwareSurface`]
/// and blitted back through [`RasterSurface::draw_image`].
pub struct RasterImage {
    pixmap: tiny_skia::Pixmap,
}

impl RasterImage {
    pub(crate) fn new(pixmap: tiny_skia::Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Drawing operations over logical diagram coordinates.
///
/// Implementations apply their current transform (device scale, zoom,
/// nested sub-model placement) to every operation. The transform stack
/// nests via [`push_transform`](Self::push_transform) /
/// [`pop_transform`](Self::pop_transform); an unmatched pop is a caller
/// bug and panics.
pub trait RasterSurface {
    /// The effective scale from logical units to device pixels.
    fn device_scale(&self) -> f32;

    fn fill_rect(&mut self, bounds: Bounds, color: Color);

    fn stroke_rect(&mut self, bounds: Bounds, color: Color, width: f32);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32);

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32);

    /// Draws `content` with its top-left corner at `origin`.
    fn draw_text(&mut self, origin: Point, content: &str, style: &DrawStyle);

    /// Renders an embedded vector image scaled into `dest`.
    fn draw_vector(&mut self, image: &VectorImage, dest: Bounds);

    /// Blits a cached raster image scaled into `dest`.
    fn draw_image(&mut self, image: &RasterImage, dest: Bounds);

    /// Enters a nested coordinate space: child points map to
    /// `offset + scale * p` in the current space.
    fn push_transform(&mut self, offset: Point, scale: f32);

    fn pop_transform(&mut self);
}
