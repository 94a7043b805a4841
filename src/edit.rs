//! The editing protocol.
//!
//! Edits run against the scene and synchronize outward: committing writes
//! the value into the bound primitive or edge, marks the owner modified,
//! re-runs layout for just the affected primitive (its measurement is
//! derived, so a bounds reset is the whole re-layout; connectors derive
//! their geometry from visual positions and follow automatically), and
//! queues exactly one [`EditAction`] for the host to flush into the
//! external document.
//!
//! In-place edits drive [`EditController`] directly; out-of-place edits go
//! through a host-supplied [`EditorHost`] dialog surface. Both converge on
//! the same commit/cancel contract. Misusing the session protocol —
//! committing or cancelling with nothing open, opening over an open
//! session, editing a non-editable primitive — is a caller bug and panics.

use log::info;

use crate::{
    flags::{PrimitiveFlags, VisualFlags},
    scene::VisualModel,
    semantic::EditTarget,
};

/// An immutable record of one committed edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    Move {
        model: String,
        visual: String,
        dx: f32,
        dy: f32,
    },
    Rename {
        state: String,
        from: String,
        to: String,
    },
    Relabel {
        source: String,
        target: String,
        from: String,
        to: String,
    },
}

/// Accumulates committed edits until the host drains them.
#[derive(Debug, Default)]
pub struct EditQueue {
    actions: Vec<EditAction>,
}

impl EditQueue {
    pub fn push(&mut self, action: EditAction) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[EditAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Removes and returns all queued actions, oldest first.
    pub fn drain(&mut self) -> Vec<EditAction> {
        std::mem::take(&mut self.actions)
    }
}

/// A host-provided editor surface for out-of-place edits: returns the new
/// value, or `None` when the user discards the edit.
pub trait EditorHost {
    fn edit_value(&mut self, current: &str) -> Option<String>;
}

#[derive(Debug)]
enum EditBinding {
    Primitive { visual: String, index: usize },
    EdgeLabel { index: usize },
}

#[derive(Debug)]
struct ActiveEdit {
    binding: EditBinding,
    target: EditTarget,
    original: String,
}

/// Drives edit sessions and owns the action queue. At most one session is
/// open at a time.
#[derive(Debug, Default)]
pub struct EditController {
    active: Option<ActiveEdit>,
    queue: EditQueue,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self) -> &EditQueue {
        &self.queue
    }

    pub fn has_open_session(&self) -> bool {
        self.active.is_some()
    }

    /// Opens a session on an editable primitive and returns its current
    /// value for the editor surface.
    ///
    /// # Panics
    ///
    /// Panics when a session is already open, or when the primitive is
    /// missing, not flagged EDITABLE, or carries no edit target — all
    /// caller bugs.
    pub fn begin_edit(&mut self, model: &VisualModel, visual: &str, primitive: usize) -> String {
        assert!(
            self.active.is_none(),
            "an edit session is already open"
        );
        let owner = model
            .visual(visual)
            .unwrap_or_else(|| panic!("no visual `{visual}` to edit"));
        let primitive_ref = owner
            .primitives()
            .get(primitive)
            .unwrap_or_else(|| panic!("visual `{visual}` has no primitive {primitive}"));
        assert!(
            primitive_ref.flags().contains(PrimitiveFlags::EDITABLE),
            "primitive {primitive} of `{visual}` is not editable"
        );
        let target = primitive_ref
            .edit_target()
            .expect("editable primitive carries an edit target")
            .clone();
        let original = primitive_ref.text_content().unwrap_or_default().to_string();

        self.active = Some(ActiveEdit {
            binding: EditBinding::Primitive {
                visual: visual.to_string(),
                index: primitive,
            },
            target,
            original: original.clone(),
        });
        original
    }

    /// Opens a session on an edge label.
    ///
    /// # Panics
    ///
    /// Panics when a session is already open or the edge is missing or not
    /// bound to a document location.
    pub fn begin_edge_edit(&mut self, model: &VisualModel, edge: usize) -> String {
        assert!(
            self.active.is_none(),
            "an edit session is already open"
        );
        let edge_ref = model
            .edges()
            .get(edge)
            .unwrap_or_else(|| panic!("no edge {edge} to edit"));
        let target = edge_ref
            .edit_target()
            .expect("editable edge carries an edit target")
            .clone();
        let original = edge_ref.label().unwrap_or_default().to_string();

        self.active = Some(ActiveEdit {
            binding: EditBinding::EdgeLabel { index: edge },
            target,
            original: original.clone(),
        });
        original
    }

    /// Commits the open session: writes `new_value` into the scene, marks
    /// the owner modified, resets the affected bounds, and queues exactly
    /// one [`EditAction`].
    ///
    /// # Panics
    ///
    /// Panics when no session is open.
    pub fn commit(&mut self, model: &mut VisualModel, new_value: &str) {
        let active = self
            .active
            .take()
            .expect("commit with no open edit session");

        match &active.binding {
            EditBinding::Primitive { visual, index } => {
                let owner = model
                    .visual_mut(visual)
                    .unwrap_or_else(|| panic!("edited visual `{visual}` disappeared"));
                if let Some(primitive) = owner.primitive_mut(*index) {
                    primitive.set_text_content(new_value);
                    primitive.set_flags(PrimitiveFlags::MODIFIED);
                }
                owner.set_flags(VisualFlags::MODIFIED);
                owner.reset_bounds();
                owner.mark_raster_dirty();
            }
            EditBinding::EdgeLabel { index } => {
                if let Some(edge) = model.edges_mut().get_mut(*index) {
                    edge.set_label(Some(new_value.to_string()));
                }
            }
        }
        model.mark_modified();

        let action = match active.target {
            EditTarget::StateName { state } => EditAction::Rename {
                state,
                from: active.original,
                to: new_value.to_string(),
            },
            EditTarget::TransitionLabel { source, target } => EditAction::Relabel {
                source,
                target,
                from: active.original,
                to: new_value.to_string(),
            },
            EditTarget::StatePosition { .. } => {
                panic!("position targets are committed through record_move")
            }
        };
        info!(action:? = action; "Edit committed");
        self.queue.push(action);
    }

    /// Discards the open session without touching any state.
    ///
    /// # Panics
    ///
    /// Panics when no session is open.
    pub fn cancel(&mut self) {
        self.active
            .take()
            .expect("cancel with no open edit session");
    }

    /// Runs one out-of-place edit through a host dialog surface,
    /// converging on the same commit/cancel contract.
    pub fn edit_with_host(
        &mut self,
        model: &mut VisualModel,
        visual: &str,
        primitive: usize,
        host: &mut dyn EditorHost,
    ) {
        let current = self.begin_edit(model, visual, primitive);
        match host.edit_value(&current) {
            Some(new_value) => self.commit(model, &new_value),
            None => self.cancel(),
        }
    }

    /// Records a completed drag as one queued move action and marks the
    /// visual modified. Moves have no session — the drag itself is the
    /// editor surface.
    pub fn record_move(&mut self, model: &mut VisualModel, visual: &str, dx: f32, dy: f32) {
        if let Some(owner) = model.visual_mut(visual) {
            owner.set_flags(VisualFlags::MODIFIED);
        }
        model.mark_modified();
        self.queue.push(EditAction::Move {
            model: model.name().to_string(),
            visual: visual.to_string(),
            dx,
            dy,
        });
    }

    /// Drains the queue for the host and clears the modified state below
    /// `model` — the synchronization pass after the external document has
    /// been updated.
    pub fn drain_synced(&mut self, model: &mut VisualModel) -> Vec<EditAction> {
        let actions = self.queue.drain();
        model.clear_modified();
        actions
    }
}
