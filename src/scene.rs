//! The scene graph: visuals, models, connectors, and edges.
//!
//! One [`VisualModel`] forms a layer of the scene; container visuals own
//! nested models, giving the single-owner tree the engine renders,
//! hit-tests, and edits.

mod connector;
mod edge;
mod model;
mod visual;

pub use connector::Connector;
pub use edge::Edge;
pub use model::{ModelEvent, ModelListener, VisualModel};
pub use visual::Visual;
