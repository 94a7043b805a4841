//! Semantic state-machine model.
//!
//! The read-only input contract of the engine: a tree of states with their
//! outgoing transitions, supplied by the host's document model. The engine
//! performs no parsing or validation of it — the layout factory consumes it
//! as-is and degrades gracefully on unresolvable references.
//!
//! [`EditTarget`] values link scene elements back into this model so edit
//! commits can name the document location they touch.

use std::fmt;

/// A state node: name, optional initial marker, ordered children, and the
/// transitions leaving it.
#[derive(Debug, Clone)]
pub struct State {
    name: String,
    initial: bool,
    children: Vec<State>,
    transitions: Vec<Transition>,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: false,
            children: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Marks this state as an initial state of its level.
    pub fn with_initial(mut self, initial: bool) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_children(mut self, children: Vec<State>) -> Self {
        self.children = children;
        self
    }

    pub fn with_transitions(mut self, transitions: Vec<Transition>) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_initial(&self) -> bool {
        self.initial
    }

    pub fn children(&self) -> &[State] {
        &self.children
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Depth-first lookup of a descendant (or self) by name.
    pub fn find(&self, name: &str) -> Option<&State> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A transition from its owning state to one or more targets, with an
/// optional label. Targets are state names; resolution happens in the
/// layout factory.
#[derive(Debug, Clone)]
pub struct Transition {
    targets: Vec<String>,
    label: Option<String>,
}

impl Transition {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            targets: vec![target.into()],
            label: None,
        }
    }

    /// A fan-out transition with several targets.
    pub fn to_many(targets: Vec<String>) -> Self {
        Self {
            targets,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// The document location an editable scene element is bound to.
///
/// Carried as an opaque link on primitives and edge labels; the editing
/// protocol turns it into the matching
/// [`EditAction`](crate::edit::EditAction) on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    /// The name of a state.
    StateName { state: String },
    /// The label of the transition from `source` to `target`.
    TransitionLabel { source: String, target: String },
    /// The position of a state's visual.
    StatePosition { state: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> State {
        State::new("root").with_children(vec![
            State::new("a").with_initial(true),
            State::new("b").with_children(vec![State::new("b1"), State::new("b2")]),
        ])
    }

    #[test]
    fn test_find_self_and_descendants() {
        let tree = sample_tree();
        assert_eq!(tree.find("root").unwrap().name(), "root");
        assert_eq!(tree.find("a").unwrap().name(), "a");
        assert_eq!(tree.find("b2").unwrap().name(), "b2");
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn test_initial_marker() {
        let tree = sample_tree();
        assert!(tree.find("a").unwrap().is_initial());
        assert!(!tree.find("b").unwrap().is_initial());
    }

    #[test]
    fn test_transition_accessors() {
        let t = Transition::new("b").with_label("go");
        assert_eq!(t.targets(), ["b".to_string()]);
        assert_eq!(t.label(), Some("go"));

        let fan = Transition::to_many(vec!["x".into(), "y".into()]);
        assert_eq!(fan.targets().len(), 2);
        assert!(fan.label().is_none());
    }
}
