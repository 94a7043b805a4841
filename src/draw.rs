//! Drawable primitives for diagram rendering.
//!
//! This module provides the leaf drawing units owned by scene-graph
//! visuals. Every primitive implements paired raster-draw and vector-export
//! operations over the same resolved geometry and style, so the two
//! backends never disagree.

mod image;
mod primitive;

pub use image::{ImageError, VectorImage};
pub use primitive::{Alignment, DrawContext, ExportContext, Primitive, PrimitiveKind};
