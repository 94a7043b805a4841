//! Visual style definitions.
//!
//! A [`DrawStyle`] bundles the resolved appearance of a drawing pass: fill,
//! stroke, and font settings. Styles are shared via `Rc` — the layout
//! factory creates a small number of them and every visual references a
//! [`StyleSet`] pair (normal/highlighted). Primitives may override the pair
//! with a local style of their own.
//!
//! Style resolution is explicit: the resolved style is passed down each
//! draw/measure/export call rather than fetched through back-references.

use std::rc::Rc;

use crate::color::Color;

/// A resolved set of drawing attributes.
#[derive(Debug, Clone)]
pub struct DrawStyle {
    fill: Option<Color>,
    stroke: Color,
    stroke_width: f32,
    font_family: String,
    font_size: u16,
}

impl DrawStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fill color, or `None` for unfilled shapes.
    pub fn fill(&self) -> Option<&Color> {
        self.fill.as_ref()
    }

    pub fn stroke(&self) -> Color {
        self.stroke
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Font size in points.
    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn set_fill(&mut self, fill: Option<Color>) {
        self.fill = fill;
    }

    pub fn set_stroke(&mut self, stroke: Color) {
        self.stroke = stroke;
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = width;
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: Color::default(),
            stroke_width: 1.0,
            font_family: "Arial".to_string(),
            font_size: 12,
        }
    }
}

/// The normal/highlighted style pair referenced by every visual.
#[derive(Debug, Clone)]
pub struct StyleSet {
    normal: Rc<DrawStyle>,
    highlighted: Rc<DrawStyle>,
}

impl StyleSet {
    pub fn new(normal: Rc<DrawStyle>, highlighted: Rc<DrawStyle>) -> Self {
        Self {
            normal,
            highlighted,
        }
    }

    /// Picks the style for the given display state.
    pub fn resolve(&self, highlighted: bool) -> &Rc<DrawStyle> {
        if highlighted {
            &self.highlighted
        } else {
            &self.normal
        }
    }

    pub fn normal(&self) -> &Rc<DrawStyle> {
        &self.normal
    }

    pub fn highlighted(&self) -> &Rc<DrawStyle> {
        &self.highlighted
    }
}

impl Default for StyleSet {
    /// White-filled black outline for the normal state; a heavier blue
    /// outline for the highlighted state.
    fn default() -> Self {
        let mut normal = DrawStyle::default();
        normal.set_fill(Some(Color::new("white").expect("valid color")));

        let mut highlighted = normal.clone();
        highlighted.set_stroke(Color::new("#1a6fb5").expect("valid color"));
        highlighted.set_stroke_width(2.0);

        Self {
            normal: Rc::new(normal),
            highlighted: Rc::new(highlighted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_style_defaults() {
        let style = DrawStyle::default();
        assert!(style.fill().is_none());
        assert_eq!(style.stroke().to_string(), "black");
        assert_eq!(style.stroke_width(), 1.0);
        assert_eq!(style.font_family(), "Arial");
        assert_eq!(style.font_size(), 12);
    }

    #[test]
    fn test_draw_style_setters() {
        let mut style = DrawStyle::new();
        style.set_fill(Some(Color::new("yellow").unwrap()));
        style.set_stroke(Color::new("red").unwrap());
        style.set_stroke_width(3.0);
        style.set_font_family("monospace");
        style.set_font_size(18);

        assert_eq!(style.fill().unwrap().to_string(), "yellow");
        assert_eq!(style.stroke().to_string(), "red");
        assert_eq!(style.stroke_width(), 3.0);
        assert_eq!(style.font_family(), "monospace");
        assert_eq!(style.font_size(), 18);
    }

    #[test]
    fn test_style_set_resolution() {
        let set = StyleSet::default();
        assert!(!Rc::ptr_eq(set.normal(), set.highlighted()));
        assert!(Rc::ptr_eq(set.resolve(false), set.normal()));
        assert!(Rc::ptr_eq(set.resolve(true), set.highlighted()));
    }

    #[test]
    fn test_style_set_shares_styles() {
        let shared = Rc::new(DrawStyle::default());
        let set = StyleSet::new(Rc::clone(&shared), Rc::clone(&shared));
        assert!(Rc::ptr_eq(set.resolve(false), set.resolve(true)));
    }
}
