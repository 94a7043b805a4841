//! Ordered, named collections of visuals.
//!
//! A [`VisualModel`] is one layer of the scene graph: visuals in insertion
//! order (which is also paint and hit-test order), the edges joining them,
//! a flag set whose MODIFIED bit aggregates over the contained visuals, and
//! a listener list notified on structural change.

use std::{fmt, rc::Rc};

use indexmap::IndexMap;

use crate::{
    config::EngineConfig,
    flags::VisualFlags,
    geometry::{Bounds, Point},
    scene::{Edge, Visual},
};

/// A structural change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    VisualAdded { model: String, visual: String },
    VisualRemoved { model: String, visual: String },
    OrderChanged { model: String },
}

/// Receives [`ModelEvent`]s. Each listener is registered at most once,
/// by pointer identity.
pub trait ModelListener {
    fn model_changed(&self, event: &ModelEvent);
}

/// An ordered, named container of visuals forming one layer of the scene
/// graph.
pub struct VisualModel {
    name: String,
    visuals: IndexMap<String, Visual>,
    edges: Vec<Edge>,
    flags: VisualFlags,
    listeners: Vec<Rc<dyn ModelListener>>,
}

impl VisualModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visuals: IndexMap::new(),
            edges: Vec::new(),
            flags: VisualFlags::default(),
            listeners: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a visual: marks the model modified, resets the visual's
    /// bounds, and notifies listeners.
    ///
    /// # Panics
    ///
    /// Inserting a name already present is a caller bug and panics — the
    /// model never holds duplicates.
    pub fn add_visual(&mut self, mut visual: Visual) {
        let name = visual.name().to_string();
        assert!(
            !self.visuals.contains_key(&name),
            "visual `{name}` already present in model `{}`",
            self.name
        );
        self.flags.insert(VisualFlags::MODIFIED);
        visual.reset_bounds();
        self.visuals.insert(name.clone(), visual);
        self.notify(&ModelEvent::VisualAdded {
            model: self.name.clone(),
            visual: name,
        });
    }

    /// Removes a visual by name, returning it if present.
    pub fn remove_visual(&mut self, name: &str) -> Option<Visual> {
        let removed = self.visuals.shift_remove(name);
        if removed.is_some() {
            self.flags.insert(VisualFlags::MODIFIED);
            self.notify(&ModelEvent::VisualRemoved {
                model: self.name.clone(),
                visual: name.to_string(),
            });
        }
        removed
    }

    /// Moves a visual to the end of the paint order. Reorders (and
    /// notifies) only when it is not already last.
    pub fn move_visual_to_top(&mut self, name: &str) {
        let Some(index) = self.visuals.get_index_of(name) else {
            return;
        };
        let last = self.visuals.len() - 1;
        if index == last {
            return;
        }
        self.visuals.move_index(index, last);
        self.notify(&ModelEvent::OrderChanged {
            model: self.name.clone(),
        });
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn visual(&self, name: &str) -> Option<&Visual> {
        self.visuals.get(name)
    }

    pub fn visual_mut(&mut self, name: &str) -> Option<&mut Visual> {
        self.visuals.get_mut(name)
    }

    /// Visuals in paint order.
    pub fn visuals(&self) -> impl Iterator<Item = &Visual> {
        self.visuals.values()
    }

    pub fn visuals_mut(&mut self) -> impl Iterator<Item = &mut Visual> {
        self.visuals.values_mut()
    }

    pub(crate) fn visuals_map(&self) -> &IndexMap<String, Visual> {
        &self.visuals
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    pub fn flags(&self) -> VisualFlags {
        self.flags
    }

    /// Applies flags to the model and to every currently contained visual.
    /// Visuals added afterwards do not retroactively pick them up.
    pub fn set_flags(&mut self, flags: VisualFlags) {
        self.flags.insert(flags);
        for visual in self.visuals.values_mut() {
            visual.set_flags(flags);
        }
    }

    /// Clears flags on the model and every currently contained visual.
    pub fn clear_flags(&mut self, flags: VisualFlags) {
        self.flags.remove(flags);
        for visual in self.visuals.values_mut() {
            visual.clear_flags(flags);
        }
    }

    /// True if the model itself or any contained visual carries one of the
    /// given flags — an O(children) "anything set below me" query.
    pub fn is_flag_set_deep(&self, flags: VisualFlags) -> bool {
        self.flags.intersects(flags)
            || self.visuals.values().any(|visual| visual.flags().intersects(flags))
    }

    /// The aggregated modified bit: the model's own bit OR every contained
    /// visual's (which in turn aggregates over nested models).
    pub fn is_modified(&self) -> bool {
        self.flags.contains(VisualFlags::MODIFIED)
            || self.visuals.values().any(Visual::is_modified_deep)
    }

    pub fn mark_modified(&mut self) {
        self.flags.insert(VisualFlags::MODIFIED);
    }

    /// Clears the modified state everywhere below, after the host has
    /// synchronized the external document.
    pub fn clear_modified(&mut self) {
        self.flags.remove(VisualFlags::MODIFIED);
        for visual in self.visuals.values_mut() {
            visual.clear_modified_deep();
        }
    }

    /// Registers a listener; a listener already registered (by pointer
    /// identity) is not added twice.
    pub fn add_listener(&mut self, listener: Rc<dyn ModelListener>) {
        let already = self
            .listeners
            .iter()
            .any(|existing| Rc::ptr_eq(existing, &listener));
        if !already {
            self.listeners.push(listener);
        }
    }

    pub fn remove_listener(&mut self, listener: &Rc<dyn ModelListener>) {
        self.listeners
            .retain(|existing| !Rc::ptr_eq(existing, listener));
    }

    /// Notifies over a snapshot copy, tolerating listener-set mutation from
    /// within a callback.
    fn notify(&self, event: &ModelEvent) {
        let snapshot: Vec<_> = self.listeners.to_vec();
        for listener in snapshot {
            listener.model_changed(event);
        }
    }

    /// The union of all contained visuals' bounds, or `None` for an empty
    /// model. Edges have no intrinsic size and do not contribute.
    pub fn content_bounds(&mut self) -> Option<Bounds> {
        let mut union: Option<Bounds> = None;
        for visual in self.visuals.values_mut() {
            let bounds = visual.bounds();
            union = Some(match union {
                Some(current) => current.merge(&bounds),
                None => bounds,
            });
        }
        union
    }

    /// Draws visuals in paint order, then edges above them.
    pub fn draw(&mut self, surface: &mut dyn crate::surface::RasterSurface, config: &EngineConfig) {
        for visual in self.visuals.values_mut() {
            visual.draw(surface, config);
        }
        let Self { visuals, edges, .. } = self;
        for edge in edges.iter() {
            edge.draw(surface, visuals);
        }
    }

    /// The topmost visual containing `point`, by reverse paint order.
    pub fn visual_at(&mut self, point: Point) -> Option<String> {
        for index in (0..self.visuals.len()).rev() {
            let Some((name, visual)) = self.visuals.get_index_mut(index) else {
                continue;
            };
            if visual.contains_point(point) {
                return Some(name.clone());
            }
        }
        None
    }

    /// The first edge whose path passes within `max_pick_distance` of
    /// `point`.
    pub fn edge_at(&self, point: Point, max_pick_distance: f32) -> Option<usize> {
        self.edges
            .iter()
            .position(|edge| edge.contains_point(point, &self.visuals, max_pick_distance))
    }

    /// The resolved polylines of the edge at `index`, empty when the index
    /// or an endpoint is gone.
    pub fn edge_paths(&self, index: usize) -> Vec<Vec<Point>> {
        self.edges
            .get(index)
            .map(|edge| edge.paths(&self.visuals))
            .unwrap_or_default()
    }
}

impl fmt::Debug for VisualModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualModel")
            .field("name", &self.name)
            .field("visuals", &self.visuals)
            .field("edges", &self.edges)
            .field("flags", &self.flags)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
