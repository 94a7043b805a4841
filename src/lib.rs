//! Armillary — a scene-graph engine for rendering and editing state
//! machine diagrams inside a host application.
//!
//! The engine owns the visual side of a diagram: a hierarchy of
//! positioned, stylable drawing nodes with lazy bounds computation,
//! raster-cache invalidation, alignment-based sub-layout, connector/edge
//! geometry and hit-testing, and an in-place editing protocol that
//! produces reviewable edit records. The host supplies the parsed
//! state/transition tree ([`semantic`]), a painting surface
//! ([`surface::RasterSurface`]), pointer input ([`interact`]), and drains
//! the queued [`edit::EditAction`]s back into its document.
//!
//! # Pipeline
//!
//! ```text
//! semantic::State tree
//!     ↓ layout::LayoutFactory
//! scene::VisualModel (visuals, nested models, edges)
//!     ↓ draw                    ↓ export
//! surface::RasterSurface    export::svg (canonical SVG)
//! ```
//!
//! Everything is single-threaded and synchronous: draw, layout, hit
//! testing, and edit commits run to completion on the one interaction
//! thread the host drives.

pub mod color;
pub mod config;
pub mod draw;
pub mod edit;
pub mod error;
pub mod export;
pub mod flags;
pub mod geometry;
pub mod interact;
pub mod layout;
pub mod scene;
pub mod semantic;
pub mod style;
pub mod surface;
pub mod text;

pub use config::EngineConfig;
pub use edit::{EditAction, EditController};
pub use error::ArmillaryError;
pub use interact::Controller;
pub use layout::LayoutFactory;
pub use scene::{Connector, Edge, Visual, VisualModel};
