//! Interaction orchestration.
//!
//! A thin layer over the scene graph: pointer events in, host
//! notifications out. Hit-testing walks visuals in reverse paint order and
//! then edges by pick distance; dragging rides the cheap bounds-shift path
//! of [`Visual::move_by`]; double-clicking a container drills into its
//! nested model. Everything runs to completion on the host's interaction
//! thread — no internal state beyond the current selection, drag, zoom,
//! and sub-model path.
//!
//! [`Visual::move_by`]: crate::scene::Visual::move_by

use log::debug;

use crate::{
    config::EngineConfig,
    edit::EditController,
    flags::VisualFlags,
    geometry::Point,
    scene::VisualModel,
    surface::RasterSurface,
};

const ZOOM_STEP: f32 = 1.1;
const ZOOM_MIN: f32 = 0.1;
const ZOOM_MAX: f32 = 10.0;

/// Modifier keys accompanying a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// Pointer input from the host, in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point, modifiers: Modifiers },
    Move { position: Point },
    Up { position: Point },
    DoubleClick { position: Point },
    Wheel { delta: f32, modifiers: Modifiers },
}

/// Notifications produced for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostNotification {
    /// Something changed; repaint the view.
    Repaint,
    Selected { visual: String },
    Deselected,
    /// Entered a nested model; the path names each entered container.
    EnteredSubModel { path: Vec<String> },
    LeftSubModel { path: Vec<String> },
}

#[derive(Debug)]
struct DragState {
    visual: String,
    last: Point,
    total: Point,
}

/// Drives selection, dragging, zooming, and sub-model navigation over a
/// model tree.
#[derive(Debug)]
pub struct Controller {
    model: VisualModel,
    config: EngineConfig,
    edits: EditController,
    zoom: f32,
    path: Vec<String>,
    selection: Option<String>,
    drag: Option<DragState>,
}

impl Controller {
    pub fn new(model: VisualModel, config: EngineConfig) -> Self {
        Self {
            model,
            config,
            edits: EditController::new(),
            zoom: 1.0,
            path: Vec::new(),
            selection: None,
            drag: None,
        }
    }

    pub fn model(&self) -> &VisualModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut VisualModel {
        &mut self.model
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// The names of the entered containers, outermost first.
    pub fn sub_model_path(&self) -> &[String] {
        &self.path
    }

    pub fn edits(&self) -> &EditController {
        &self.edits
    }

    pub fn edits_mut(&mut self) -> &mut EditController {
        &mut self.edits
    }

    /// The model the user currently interacts with: the root, or the
    /// nested model at the entered path.
    pub fn current_model(&mut self) -> &mut VisualModel {
        let mut model = &mut self.model;
        for name in &self.path {
            model = model
                .visual_mut(name)
                .and_then(|visual| visual.nested_mut())
                .expect("sub-model path names an entered container");
        }
        model
    }

    fn to_diagram(&self, position: Point) -> Point {
        position.scale(1.0 / self.zoom)
    }

    /// Processes one pointer event and returns the notifications it
    /// produced, in order.
    pub fn handle_event(&mut self, event: PointerEvent) -> Vec<HostNotification> {
        match event {
            PointerEvent::Down { position, .. } => self.handle_down(self.to_diagram(position)),
            PointerEvent::Move { position } => self.handle_move(self.to_diagram(position)),
            PointerEvent::Up { .. } => self.handle_up(),
            PointerEvent::DoubleClick { position } => {
                self.handle_double_click(self.to_diagram(position))
            }
            PointerEvent::Wheel { delta, modifiers } => self.handle_wheel(delta, modifiers),
        }
    }

    fn handle_down(&mut self, position: Point) -> Vec<HostNotification> {
        let max_pick = self.config.max_pick_distance();
        let had_selection = self.selection.is_some();
        self.drag = None;

        let model = self.current_model();
        let hit_visual = model.visual_at(position);

        clear_selection(model);
        if let Some(name) = hit_visual {
            if let Some(visual) = model.visual_mut(&name) {
                visual.set_flags(VisualFlags::SELECTED);
            }
            model.move_visual_to_top(&name);
            self.selection = Some(name.clone());
            self.drag = Some(DragState {
                visual: name.clone(),
                last: position,
                total: Point::default(),
            });
            return vec![
                HostNotification::Selected { visual: name },
                HostNotification::Repaint,
            ];
        }

        if let Some(index) = model.edge_at(position, max_pick) {
            model.edges_mut()[index].set_flags(VisualFlags::SELECTED);
            self.selection = None;
            return vec![HostNotification::Repaint];
        }

        self.selection = None;
        if had_selection {
            vec![HostNotification::Deselected, HostNotification::Repaint]
        } else {
            Vec::new()
        }
    }

    fn handle_move(&mut self, position: Point) -> Vec<HostNotification> {
        let Some(drag) = self.drag.as_mut() else {
            return Vec::new();
        };
        let delta = position.sub_point(drag.last);
        drag.last = position;
        drag.total = drag.total.add_point(delta);
        let name = drag.visual.clone();

        let model = self.current_model();
        if let Some(visual) = model.visual_mut(&name) {
            visual.move_by(delta.x(), delta.y());
        }
        vec![HostNotification::Repaint]
    }

    fn handle_up(&mut self) -> Vec<HostNotification> {
        let Some(drag) = self.drag.take() else {
            return Vec::new();
        };
        if drag.total == Point::default() {
            return Vec::new();
        }
        debug!(visual = drag.visual.as_str(); "Drag finished");
        let Self { model, path, edits, .. } = self;
        let mut current = model;
        for name in path.iter() {
            current = current
                .visual_mut(name)
                .and_then(|visual| visual.nested_mut())
                .expect("sub-model path names an entered container");
        }
        edits.record_move(current, &drag.visual, drag.total.x(), drag.total.y());
        vec![HostNotification::Repaint]
    }

    fn handle_double_click(&mut self, position: Point) -> Vec<HostNotification> {
        let model = self.current_model();
        if let Some(name) = model.visual_at(position) {
            let has_nested = model
                .visual(&name)
                .is_some_and(|visual| visual.nested().is_some());
            if has_nested {
                self.drag = None;
                self.selection = None;
                self.path.push(name);
                return vec![
                    HostNotification::EnteredSubModel {
                        path: self.path.clone(),
                    },
                    HostNotification::Repaint,
                ];
            }
            return Vec::new();
        }

        if !self.path.is_empty() {
            self.path.pop();
            self.drag = None;
            self.selection = None;
            return vec![
                HostNotification::LeftSubModel {
                    path: self.path.clone(),
                },
                HostNotification::Repaint,
            ];
        }
        Vec::new()
    }

    fn handle_wheel(&mut self, delta: f32, modifiers: Modifiers) -> Vec<HostNotification> {
        if !modifiers.ctrl || delta == 0.0 {
            return Vec::new();
        }
        let factor = if delta > 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
        self.zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        vec![HostNotification::Repaint]
    }

    /// Draws the currently active model layer.
    pub fn draw(&mut self, surface: &mut dyn RasterSurface) {
        let config = self.config.clone();
        self.current_model().draw(surface, &config);
    }
}

fn clear_selection(model: &mut VisualModel) {
    for visual in model.visuals_mut() {
        visual.clear_flags(VisualFlags::SELECTED);
    }
    for edge in model.edges_mut() {
        edge.clear_flags(VisualFlags::SELECTED);
    }
}
