//! Edge anchor points.
//!
//! A [`Connector`] is a zero-size node binding an edge endpoint to a parent
//! visual through a relative offset. The parent is referenced by name and
//! looked up in the owning model — a lookup key, never an owning link.

use indexmap::IndexMap;

use crate::{
    geometry::Point,
    scene::Visual,
    style::DrawStyle,
    surface::RasterSurface,
};

/// A zero-size anchor bound to a parent visual.
#[derive(Debug, Clone)]
pub struct Connector {
    parent: String,
    offset: Point,
    radius: f32,
    inner_target: Option<String>,
}

impl Connector {
    pub fn new(parent: impl Into<String>, offset: Point, radius: f32) -> Self {
        Self {
            parent: parent.into(),
            offset,
            radius,
            inner_target: None,
        }
    }

    /// Tags the connector with the true descendant it logically terminates
    /// at, when the edge ends inside the parent's nested sub-model.
    pub fn with_inner_target(mut self, inner_target: impl Into<String>) -> Self {
        self.inner_target = Some(inner_target.into());
        self
    }

    /// The name of the parent visual in the owning model.
    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// The descendant this connector logically targets, if the edge ends
    /// inside the parent's nested sub-model.
    pub fn inner_target(&self) -> Option<&str> {
        self.inner_target.as_deref()
    }

    /// The anchor point: parent position + relative offset, plus the
    /// anchor radius on each axis so the edge meets a visual center.
    /// `None` when the parent is not (or no longer) in the model.
    pub fn anchor(&self, visuals: &IndexMap<String, Visual>) -> Option<Point> {
        let parent = visuals.get(&self.parent)?;
        Some(
            parent
                .position()
                .add_point(self.offset)
                .add_point(Point::new(self.radius, self.radius)),
        )
    }

    /// Draws the anchor dot. A rendering policy, not a structural rule:
    /// nothing is drawn unless the owning edge or the parent node is in a
    /// selected display state.
    pub fn draw(
        &self,
        surface: &mut dyn RasterSurface,
        visuals: &IndexMap<String, Visual>,
        style: &DrawStyle,
        edge_selected: bool,
    ) {
        let parent_selected = visuals
            .get(&self.parent)
            .is_some_and(Visual::is_selected);
        if !(edge_selected || parent_selected) {
            return;
        }
        if let Some(anchor) = self.anchor(visuals) {
            surface.fill_circle(anchor, self.radius, style.stroke());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_offsets_from_parent() {
        let mut visuals = IndexMap::new();
        let mut parent = Visual::new("p");
        parent.set_position(Point::new(100.0, 50.0));
        visuals.insert("p".to_string(), parent);

        let connector = Connector::new("p", Point::new(20.0, 10.0), 3.0);
        let anchor = connector.anchor(&visuals).unwrap();
        assert_eq!(anchor, Point::new(123.0, 63.0));
    }

    #[test]
    fn test_anchor_missing_parent_is_none() {
        let visuals = IndexMap::new();
        let connector = Connector::new("ghost", Point::default(), 3.0);
        assert!(connector.anchor(&visuals).is_none());
    }

    #[test]
    fn test_inner_target_tag() {
        let connector =
            Connector::new("container", Point::default(), 3.0).with_inner_target("deep.child");
        assert_eq!(connector.inner_target(), Some("deep.child"));
        assert_eq!(connector.parent(), "container");
    }
}
