//! Capability flags for visuals and primitives.
//!
//! Flags are small named boolean sets. On a [`VisualModel`] they propagate
//! top-down to every currently contained visual; a visual added afterwards
//! does not retroactively pick them up.
//!
//! [`VisualModel`]: crate::scene::VisualModel

use bitflags::bitflags;

bitflags! {
    /// Flags carried by a [`Visual`](crate::scene::Visual) or a whole model.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct VisualFlags: u16 {
        /// The node is part of the current selection.
        const SELECTED = 1 << 0;
        /// The node's content diverges from the external document.
        const MODIFIED = 1 << 1;
        /// The node renders an initial-state start marker.
        const START_MARKER = 1 << 2;
    }
}

bitflags! {
    /// Flags carried by an individual [`Primitive`](crate::draw::Primitive).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct PrimitiveFlags: u16 {
        /// Drawn on every pass.
        const DRAW_ALWAYS = 1 << 0;
        /// Drawn only while the owner is in a selected display state.
        const DRAW_SELECTED = 1 << 1;
        /// The primitive's value diverges from the external document.
        const MODIFIED = 1 << 2;
        /// The primitive's value may be edited through the editing protocol.
        const EDITABLE = 1 << 3;
    }
}
