//! Scene construction from the semantic tree.
//!
//! Level by level from the root state, in document order: one visual per
//! state, one nested model (plus its sub-model box primitive) per state
//! with children, then one edge per transition once the level's visuals
//! exist. A transition whose target lives deeper in the tree resolves to
//! the target's ancestor at the source's level, tagging the connector with
//! the true descendant; an unresolvable target is logged and omitted —
//! never a reason to abort the pass.

use std::rc::Rc;

use log::{debug, info, warn};

use crate::{
    color::Color,
    config::EngineConfig,
    draw::{Alignment, Primitive},
    flags::{PrimitiveFlags, VisualFlags},
    geometry::{Point, Size},
    scene::{Connector, Edge, Visual, VisualModel},
    semantic::{EditTarget, State, Transition},
    style::{DrawStyle, StyleSet},
    text,
};

/// Name of the top-level model produced by [`LayoutFactory::build`].
pub const ROOT_MODEL_NAME: &str = "diagram";

const START_MARKER_RADIUS: f32 = 3.0;

/// Builds the visual/model/edge graph for a state tree.
pub struct LayoutFactory<'a> {
    config: &'a EngineConfig,
    styles: StyleSet,
    edge_style: Rc<DrawStyle>,
}

impl<'a> LayoutFactory<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        let mut normal = DrawStyle::default();
        normal.set_fill(Some(Color::new("white").expect("valid color")));
        normal.set_font_family(config.font_family());
        normal.set_font_size(config.font_size());

        let mut highlighted = normal.clone();
        highlighted.set_stroke(Color::new("#1a6fb5").expect("valid color"));
        highlighted.set_stroke_width(2.0);

        let mut edge_style = DrawStyle::default();
        edge_style.set_font_family(config.font_family());
        edge_style.set_font_size(config.font_size());

        Self {
            config,
            styles: StyleSet::new(Rc::new(normal), Rc::new(highlighted)),
            edge_style: Rc::new(edge_style),
        }
    }

    /// Builds the model tree for the given root state. The root state
    /// itself becomes a visual in the returned top-level model.
    pub fn build(&self, root: &State) -> VisualModel {
        info!(root = root.name(); "Building diagram model");
        let model = self.build_level(std::slice::from_ref(root), ROOT_MODEL_NAME);
        debug!(visuals = model.len(), edges = model.edges().len(); "Diagram model built");
        model
    }

    /// One nesting level: visuals first (column packing, document order),
    /// then the level's edges.
    fn build_level(&self, states: &[State], model_name: &str) -> VisualModel {
        let mut model = VisualModel::new(model_name);

        let mut column_x = 0.0f32;
        let mut current_y = 0.0f32;
        let mut column_width = 0.0f32;
        for state in states {
            let mut visual = self.build_visual(state);
            let size = visual.bounds().to_size();

            if current_y > 0.0 && current_y + size.height() > self.config.column_wrap_height() {
                column_x += column_width + self.config.column_spacing();
                current_y = 0.0;
                column_width = 0.0;
            }
            visual.set_position(Point::new(column_x, current_y));
            current_y += size.height() + self.config.column_gap();
            column_width = column_width.max(size.width());

            model.add_visual(visual);
        }

        for state in states {
            for transition in state.transitions() {
                self.add_transition_edge(&mut model, states, state, transition);
            }
        }

        model
    }

    /// One visual per state: backing rectangle, centered editable title,
    /// optional start marker, and the sub-model box for container states.
    fn build_visual(&self, state: &State) -> Visual {
        let nested = (!state.children().is_empty())
            .then(|| self.build_level(state.children(), state.name()));

        let insets = self.config.state_insets();
        let title_size = text::measure(
            state.name(),
            self.config.font_family(),
            self.config.font_size(),
        );
        let box_size = nested.as_ref().map(|_| self.config.sub_model_box());

        let inner = Size::new(
            title_size
                .width()
                .max(box_size.map(Size::width).unwrap_or(0.0)),
            title_size.height() + box_size.map(Size::height).unwrap_or(0.0),
        );
        let frame_size = inner.add_padding(insets);

        let mut visual = Visual::new(state.name());
        visual.set_styles(self.styles.clone());

        visual.add_primitive(Primitive::rect(frame_size));

        let mut title = Primitive::text(state.name());
        title.set_position(Point::new(0.0, insets.top()));
        title.set_alignment(Alignment::Center);
        title.set_flags(PrimitiveFlags::EDITABLE);
        title.set_edit_target(Some(EditTarget::StateName {
            state: state.name().to_string(),
        }));
        visual.add_primitive(title);

        if state.is_initial() {
            let mut marker = Primitive::circle(START_MARKER_RADIUS, true);
            marker.set_position(Point::new(
                START_MARKER_RADIUS,
                START_MARKER_RADIUS,
            ));
            visual.add_primitive(marker);
            visual.set_flags(VisualFlags::START_MARKER);
        }

        if let Some(box_size) = box_size {
            let mut sub_box = Primitive::sub_model_box(box_size);
            sub_box.set_position(Point::new(0.0, insets.top() + title_size.height()));
            sub_box.set_alignment(Alignment::Center);
            visual.add_primitive(sub_box);
        }

        visual.set_nested(nested);
        visual
    }

    /// Adds the edge for one transition, resolving each target among the
    /// source's siblings.
    fn add_transition_edge(
        &self,
        model: &mut VisualModel,
        siblings: &[State],
        source: &State,
        transition: &Transition,
    ) {
        let radius = self.config.connector_radius();

        let mut targets = Vec::new();
        for target_name in transition.targets() {
            let Some((sibling, inner)) = resolve_target(siblings, target_name) else {
                warn!(
                    source = source.name(),
                    target = target_name.as_str();
                    "transition target not found, omitting",
                );
                continue;
            };
            let Some(visual) = model.visual_mut(sibling) else {
                continue;
            };
            let size = visual.bounds().to_size();
            // Anchor at the top center of the target.
            let mut connector = Connector::new(
                sibling,
                Point::new(size.width() / 2.0 - radius, -radius),
                radius,
            );
            if let Some(inner) = inner {
                connector = connector.with_inner_target(inner);
            }
            targets.push(connector);
        }
        if targets.is_empty() {
            return;
        }

        let Some(source_visual) = model.visual_mut(source.name()) else {
            warn!(source = source.name(); "transition source has no visual, omitting");
            return;
        };
        let size = source_visual.bounds().to_size();
        // Anchor at the bottom center of the source.
        let source_connector = Connector::new(
            source.name(),
            Point::new(size.width() / 2.0 - radius, size.height() - radius),
            radius,
        );

        let mut edge = match targets.len() {
            1 => Edge::new(
                source_connector,
                targets.remove(0),
                Rc::clone(&self.edge_style),
            ),
            _ => Edge::fan_out(source_connector, targets, Rc::clone(&self.edge_style)),
        };
        edge.set_label(transition.label().map(str::to_string));
        if let Some(first_target) = transition.targets().first() {
            edge.set_edit_target(Some(EditTarget::TransitionLabel {
                source: source.name().to_string(),
                target: first_target.clone(),
            }));
        }
        model.add_edge(edge);
    }
}

/// Resolves a target name among the given siblings: the sibling itself, or
/// the sibling whose subtree contains the target (returned with the true
/// descendant for connector tagging).
fn resolve_target<'a>(siblings: &'a [State], target: &str) -> Option<(&'a str, Option<String>)> {
    for sibling in siblings {
        if sibling.name() == target {
            return Some((sibling.name(), None));
        }
    }
    for sibling in siblings {
        if sibling.find(target).is_some() {
            return Some((sibling.name(), Some(target.to_string())));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_resolve_target_prefers_sibling() {
        let siblings = [
            State::new("a").with_children(vec![State::new("b")]),
            State::new("b"),
        ];
        // A sibling named "b" wins over the descendant inside "a".
        assert_eq!(resolve_target(&siblings, "b"), Some(("b", None)));
    }

    #[test]
    fn test_resolve_target_descends() {
        let siblings = [
            State::new("a").with_children(vec![State::new("deep")]),
            State::new("b"),
        ];
        assert_eq!(
            resolve_target(&siblings, "deep"),
            Some(("a", Some("deep".to_string())))
        );
        assert_eq!(resolve_target(&siblings, "missing"), None);
    }

    #[test]
    fn test_build_leaf_state() {
        let config = config();
        let factory = LayoutFactory::new(&config);
        let model = factory.build(&State::new("solo"));
        assert_eq!(model.len(), 1);
        let visual = model.visual("solo").unwrap();
        assert!(visual.nested().is_none());
        // Backing rect + title.
        assert_eq!(visual.primitives().len(), 2);
    }

    #[test]
    fn test_initial_state_gets_marker() {
        let config = config();
        let factory = LayoutFactory::new(&config);
        let root = State::new("root")
            .with_children(vec![State::new("a").with_initial(true), State::new("b")]);
        let model = factory.build(&root);
        let nested = model.visual("root").unwrap().nested().unwrap();
        let a = nested.visual("a").unwrap();
        assert!(a.flags().contains(VisualFlags::START_MARKER));
        assert_eq!(a.primitives().len(), 3);
        assert!(!nested.visual("b").unwrap().flags().contains(VisualFlags::START_MARKER));
    }

    #[test]
    fn test_container_state_has_box_and_nested_model() {
        let config = config();
        let factory = LayoutFactory::new(&config);
        let root = State::new("root").with_children(vec![State::new("a")]);
        let model = factory.build(&root);
        let visual = model.visual("root").unwrap();
        // Rect + title + sub-model box.
        assert_eq!(visual.primitives().len(), 3);
        let nested = visual.nested().unwrap();
        assert_eq!(nested.name(), "root");
        assert_eq!(nested.len(), 1);
    }

    #[test]
    fn test_column_wrap_past_threshold() {
        let mut config = config();
        config.set_column_wrap_height(50.0);
        let factory = LayoutFactory::new(&config);
        let root = State::new("root").with_children(vec![
            State::new("a"),
            State::new("b"),
            State::new("c"),
        ]);
        let model = factory.build(&root);
        let nested = model.visual("root").unwrap().nested().unwrap();
        let xs: Vec<f32> = nested
            .visuals()
            .map(|visual| visual.position().x())
            .collect();
        // The first visual fills the column; the rest wrap into new ones.
        assert_eq!(xs[0], 0.0);
        assert!(xs[1] > 0.0, "second visual should start a new column");
        assert!(xs[2] > xs[1], "third visual should start another column");
    }

    #[test]
    fn test_unresolvable_transition_is_omitted() {
        let config = config();
        let factory = LayoutFactory::new(&config);
        let root = State::new("root").with_children(vec![
            State::new("a")
                .with_transitions(vec![Transition::new("nowhere"), Transition::new("b")]),
            State::new("b"),
        ]);
        let model = factory.build(&root);
        let nested = model.visual("root").unwrap().nested().unwrap();
        // The dangling transition is dropped; the valid one survives.
        assert_eq!(nested.edges().len(), 1);
        assert_eq!(nested.edges()[0].targets()[0].parent(), "b");
    }

    #[test]
    fn test_descendant_target_tagged_with_inner() {
        let config = config();
        let factory = LayoutFactory::new(&config);
        let root = State::new("root").with_children(vec![
            State::new("a").with_transitions(vec![Transition::new("deep")]),
            State::new("b").with_children(vec![State::new("deep")]),
        ]);
        let model = factory.build(&root);
        let nested = model.visual("root").unwrap().nested().unwrap();
        let edge = &nested.edges()[0];
        let target = &edge.targets()[0];
        assert_eq!(target.parent(), "b");
        assert_eq!(target.inner_target(), Some("deep"));
    }

    #[test]
    fn test_fan_out_transition_builds_multi_target_edge() {
        let config = config();
        let factory = LayoutFactory::new(&config);
        let root = State::new("root").with_children(vec![
            State::new("a").with_transitions(vec![Transition::to_many(vec![
                "b".to_string(),
                "c".to_string(),
            ])]),
            State::new("b"),
            State::new("c"),
        ]);
        let model = factory.build(&root);
        let nested = model.visual("root").unwrap().nested().unwrap();
        assert_eq!(nested.edges().len(), 1);
        assert_eq!(nested.edges()[0].targets().len(), 2);
    }
}
