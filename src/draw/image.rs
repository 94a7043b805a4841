//! Embedded vector images.
//!
//! A [`VectorImage`] wraps a snippet of SVG source supplied by the document
//! (icons, annotations). The source is parsed once at construction; a
//! malformed snippet is a typed [`ImageError`] localized to the primitive
//! being built, leaving the rest of the owning visual intact.
//!
//! The parsed `usvg` tree serves the raster backend (via `resvg`), while the
//! vector backend re-emits the original source unchanged.

use std::fmt;

use thiserror::Error;

use crate::geometry::Size;

/// Failure to construct an embedded vector image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to parse embedded vector source: {0}")]
    Parse(#[from] usvg::Error),
    #[error("embedded vector source has an empty size")]
    EmptySize,
}

/// A parsed, embeddable vector image.
pub struct VectorImage {
    source: String,
    tree: usvg::Tree,
}

impl VectorImage {
    /// Parses `source` as SVG. Errors are reported per-primitive; callers
    /// add the primitive only on success.
    pub fn from_source(source: impl Into<String>) -> Result<Self, ImageError> {
        let source = source.into();
        let options = usvg::Options::default();
        let tree = usvg::Tree::from_str(&source, &options)?;
        let size = tree.size();
        if size.width() <= 0.0 || size.height() <= 0.0 {
            return Err(ImageError::EmptySize);
        }
        Ok(Self { source, tree })
    }

    /// The original markup, re-emitted verbatim by the vector backend.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Intrinsic size of the image in its own units.
    pub fn size(&self) -> Size {
        let size = self.tree.size();
        Size::new(size.width(), size.height())
    }

    /// Renders the image into a pixmap under the given transform.
    pub fn render(&self, transform: tiny_skia::Transform, pixmap: &mut tiny_skia::PixmapMut<'_>) {
        resvg::render(&self.tree, transform, pixmap);
    }
}

impl fmt::Debug for VectorImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorImage")
            .field("size", &self.size())
            .field("source_len", &self.source.len())
            .finish()
    }
}
