//! Color handling for diagram styling.
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor`
//! type from the color crate, adding the conversions the engine needs: CSS
//! string parsing for configuration and export, and 8-bit RGBA extraction
//! for the software raster surface.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Creates a new `Color` from a CSS color string such as `"#ff0000"`,
    /// `"rgb(255, 0, 0)"`, or `"red"`.
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns a new color with the specified alpha value, typically
    /// between 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            color: self.color.with_alpha(alpha),
        }
    }

    /// The alpha (transparency) component, between 0.0 and 1.0.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Converts to 8-bit sRGB components for raster painting.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let srgb: AlphaColor<Srgb> = self.color.to_alpha_color();
        let [r, g, b, a] = srgb.components;
        [
            (r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("blue").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default().to_string(), "black");
    }

    #[test]
    fn test_color_with_alpha() {
        let transparent = Color::new("red").unwrap().with_alpha(0.5);
        assert!((transparent.alpha() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_color_to_rgba8() {
        let [r, g, b, a] = Color::new("#ff0000").unwrap().to_rgba8();
        assert_eq!((r, g, b, a), (255, 0, 0, 255));

        let [r, g, b, _] = Color::new("white").unwrap().to_rgba8();
        assert_eq!((r, g, b), (255, 255, 255));
    }

    #[test]
    fn test_color_eq_hash() {
        use std::collections::HashSet;

        let red1 = Color::new("red").unwrap();
        let red2 = Color::new("red").unwrap();
        let blue = Color::new("blue").unwrap();
        assert_eq!(red1, red2);
        assert_ne!(red1, blue);

        let mut set = HashSet::new();
        set.insert(red1);
        assert!(set.contains(&red2));
        assert!(!set.contains(&blue));
    }
}
