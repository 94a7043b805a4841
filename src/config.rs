//! Engine configuration.
//!
//! [`EngineConfig`] groups the tunables of layout, hit-testing, export
//! canonicalization, and caching. All fields deserialize with defaults, so
//! hosts can load partial configuration from any serde source.

use serde::Deserialize;

use crate::geometry::{Insets, Size};

fn default_column_gap() -> f32 {
    24.0
}

fn default_column_wrap_height() -> f32 {
    600.0
}

fn default_column_spacing() -> f32 {
    48.0
}

fn default_state_inset() -> f32 {
    8.0
}

fn default_max_pick_distance() -> f32 {
    6.0
}

fn default_precision_factor() -> u32 {
    1000
}

fn default_sub_model_box_width() -> f32 {
    160.0
}

fn default_sub_model_box_height() -> f32 {
    100.0
}

fn default_connector_radius() -> f32 {
    3.0
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u16 {
    12
}

fn default_use_raster_cache() -> bool {
    true
}

/// Tunables for layout, picking, export, and caching.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Vertical gap between stacked visuals in a column.
    #[serde(default = "default_column_gap")]
    column_gap: f32,

    /// Column height past which placement wraps into a new column.
    #[serde(default = "default_column_wrap_height")]
    column_wrap_height: f32,

    /// Horizontal spacing between columns.
    #[serde(default = "default_column_spacing")]
    column_spacing: f32,

    /// Uniform inset between a state's frame and its content.
    #[serde(default = "default_state_inset")]
    state_inset: f32,

    /// Maximum distance at which an edge path is picked.
    #[serde(default = "default_max_pick_distance")]
    max_pick_distance: f32,

    /// Export rounding factor: 1000 keeps three decimals.
    #[serde(default = "default_precision_factor")]
    precision_factor: u32,

    /// Fixed width of the nested-model box.
    #[serde(default = "default_sub_model_box_width")]
    sub_model_box_width: f32,

    /// Fixed height of the nested-model box.
    #[serde(default = "default_sub_model_box_height")]
    sub_model_box_height: f32,

    /// Radius of edge anchor dots.
    #[serde(default = "default_connector_radius")]
    connector_radius: f32,

    /// Default font family for state titles and edge labels.
    #[serde(default = "default_font_family")]
    font_family: String,

    /// Default font size in points.
    #[serde(default = "default_font_size")]
    font_size: u16,

    /// Whether container visuals keep a cached raster image. Purely an
    /// optimization switch: output is identical either way.
    #[serde(default = "default_use_raster_cache")]
    use_raster_cache: bool,
}

impl EngineConfig {
    pub fn column_gap(&self) -> f32 {
        self.column_gap
    }

    pub fn column_wrap_height(&self) -> f32 {
        self.column_wrap_height
    }

    pub fn column_spacing(&self) -> f32 {
        self.column_spacing
    }

    pub fn state_insets(&self) -> Insets {
        Insets::uniform(self.state_inset)
    }

    pub fn max_pick_distance(&self) -> f32 {
        self.max_pick_distance
    }

    pub fn precision_factor(&self) -> u32 {
        self.precision_factor
    }

    pub fn sub_model_box(&self) -> Size {
        Size::new(self.sub_model_box_width, self.sub_model_box_height)
    }

    pub fn connector_radius(&self) -> f32 {
        self.connector_radius
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn use_raster_cache(&self) -> bool {
        self.use_raster_cache
    }

    pub fn set_column_wrap_height(&mut self, height: f32) {
        self.column_wrap_height = height;
    }

    pub fn set_max_pick_distance(&mut self, distance: f32) {
        self.max_pick_distance = distance;
    }

    pub fn set_use_raster_cache(&mut self, enabled: bool) {
        self.use_raster_cache = enabled;
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            column_gap: default_column_gap(),
            column_wrap_height: default_column_wrap_height(),
            column_spacing: default_column_spacing(),
            state_inset: default_state_inset(),
            max_pick_distance: default_max_pick_distance(),
            precision_factor: default_precision_factor(),
            sub_model_box_width: default_sub_model_box_width(),
            sub_model_box_height: default_sub_model_box_height(),
            connector_radius: default_connector_radius(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            use_raster_cache: default_use_raster_cache(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.precision_factor(), 1000);
        assert_eq!(config.max_pick_distance(), 6.0);
        assert_eq!(config.sub_model_box(), Size::new(160.0, 100.0));
        assert_eq!(config.state_insets().top(), 8.0);
        assert!(config.use_raster_cache());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let json = r#"{ "max_pick_distance": 10.0, "font_family": "monospace" }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_pick_distance(), 10.0);
        assert_eq!(config.font_family(), "monospace");
        assert_eq!(config.column_gap(), 24.0);
        assert_eq!(config.precision_factor(), 1000);
    }
}
