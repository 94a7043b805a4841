//! Diagram layout.
//!
//! The layout factory turns the semantic state tree into the scene graph.
//! Placement is deliberately simple: top-to-bottom column packing per
//! nesting level, in document order — diagrams mirror the document, they
//! do not chase an aesthetic layout objective.

mod factory;

pub use factory::LayoutFactory;
