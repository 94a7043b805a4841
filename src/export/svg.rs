//! SVG writer with canonical formatting.
//!
//! Exported documents are compared against golden files, so formatting is
//! pinned down exactly:
//!
//! - every numeric value is rounded to the configured precision factor
//!   (default 1000, three decimals) *in decimal space* — `2.0005` becomes
//!   `2.001`, and integral results are emitted without a fractional part
//!   (`3.0` becomes `3`);
//! - attributes are single-quoted and escape only `'`;
//! - text content escapes only `<`, `>`, and `&`.
//!
//! The markup is built by hand with `write!` — an XML library would own
//! quoting and number formatting and break the canonical form.

use std::{fmt::Write as _, fs, path::PathBuf};

use log::info;

use crate::{
    config::EngineConfig,
    export::Error,
    geometry::{Bounds, Point},
    scene::VisualModel,
    style::DrawStyle,
    text,
};

/// Extra space around the exported viewBox.
const VIEWBOX_PADDING: f32 = 8.0;
/// Approximate ascent used to place text baselines from a top-left origin.
const BASELINE_FACTOR: f32 = 0.8;

/// Builds an SVG document string under the canonical formatting rules.
pub struct SvgWriter {
    out: String,
    digits: usize,
}

impl SvgWriter {
    /// A writer rounding to `precision_factor` (a power of ten; 1000 keeps
    /// three decimals).
    pub fn new(precision_factor: u32) -> Self {
        let digits = if precision_factor <= 1 {
            0
        } else {
            precision_factor.ilog10() as usize
        };
        Self {
            out: String::new(),
            digits,
        }
    }

    /// Canonical decimal form of a number: rounded half-up at the
    /// configured precision, trailing zeros trimmed, integral values
    /// without a fractional part, and no `-0`.
    pub fn number(&self, value: f32) -> String {
        canonical_number(value, self.digits)
    }

    pub fn open_document(&mut self, content: Bounds) {
        let min_x = content.min_x() - VIEWBOX_PADDING;
        let min_y = content.min_y() - VIEWBOX_PADDING;
        let width = content.width() + VIEWBOX_PADDING * 2.0;
        let height = content.height() + VIEWBOX_PADDING * 2.0;
        let min_x_s = self.number(min_x);
        let min_y_s = self.number(min_y);
        let width_s = self.number(width.max(1.0));
        let height_s = self.number(height.max(1.0));
        let _ = writeln!(
            &mut self.out,
            "<svg xmlns='http://www.w3.org/2000/svg' viewBox='{} {} {} {}'>",
            min_x_s,
            min_y_s,
            width_s,
            height_s,
        );
    }

    pub fn rect(&mut self, bounds: Bounds, style: &DrawStyle) {
        let style_value = self.shape_style(style);
        let x_s = self.number(bounds.min_x());
        let y_s = self.number(bounds.min_y());
        let w_s = self.number(bounds.width());
        let h_s = self.number(bounds.height());
        let _ = writeln!(
            &mut self.out,
            "<rect x='{}' y='{}' width='{}' height='{}' style='{}'/>",
            x_s,
            y_s,
            w_s,
            h_s,
            escape_attr(&style_value),
        );
    }

    pub fn circle(&mut self, center: Point, radius: f32, style: &DrawStyle, filled: bool) {
        let style_value = if filled {
            format!("fill:{};stroke:none", style.stroke())
        } else {
            self.shape_style(style)
        };
        let cx_s = self.number(center.x());
        let cy_s = self.number(center.y());
        let r_s = self.number(radius);
        let _ = writeln!(
            &mut self.out,
            "<circle cx='{}' cy='{}' r='{}' style='{}'/>",
            cx_s,
            cy_s,
            r_s,
            escape_attr(&style_value),
        );
    }

    pub fn line(&mut self, from: Point, to: Point, style: &DrawStyle) {
        let style_value = format!(
            "stroke:{};stroke-width:{}",
            style.stroke(),
            self.number(style.stroke_width())
        );
        let x1_s = self.number(from.x());
        let y1_s = self.number(from.y());
        let x2_s = self.number(to.x());
        let y2_s = self.number(to.y());
        let _ = writeln!(
            &mut self.out,
            "<line x1='{}' y1='{}' x2='{}' y2='{}' style='{}'/>",
            x1_s,
            y1_s,
            x2_s,
            y2_s,
            escape_attr(&style_value),
        );
    }

    /// Emits a text element. `origin` is the top-left corner of the text
    /// box; the baseline offset is derived from the font size.
    pub fn text(&mut self, origin: Point, content: &str, style: &DrawStyle) {
        let font_px = style.font_size() as f32 * text::PT_TO_PX;
        let style_value = format!(
            "font-family:{};font-size:{}px",
            style.font_family(),
            self.number(font_px)
        );
        let x_s = self.number(origin.x());
        let y_s = self.number(origin.y() + font_px * BASELINE_FACTOR);
        let _ = writeln!(
            &mut self.out,
            "<text x='{}' y='{}' style='{}'>{}</text>",
            x_s,
            y_s,
            escape_attr(&style_value),
            escape_text(content),
        );
    }

    /// Opens a group with a translate (and, when not 1, scale) transform.
    pub fn open_group(&mut self, offset: Point, scale: f32) {
        let scale_str = self.number(scale);
        let ox_s = self.number(offset.x());
        let oy_s = self.number(offset.y());
        if scale_str == "1" {
            let _ = writeln!(
                &mut self.out,
                "<g transform='translate({} {})'>",
                ox_s,
                oy_s,
            );
        } else {
            let _ = writeln!(
                &mut self.out,
                "<g transform='translate({} {}) scale({})'>",
                ox_s,
                oy_s,
                scale_str,
            );
        }
    }

    pub fn close_group(&mut self) {
        self.out.push_str("</g>\n");
    }

    /// Wraps raw embedded markup (an already-valid vector snippet) in a
    /// translated group, emitting the source verbatim.
    pub fn raw_group(&mut self, offset: Point, raw: &str) {
        self.open_group(offset, 1.0);
        self.out.push_str(raw);
        if !raw.ends_with('\n') {
            self.out.push('\n');
        }
        self.close_group();
    }

    pub fn finish(mut self) -> String {
        self.out.push_str("</svg>\n");
        self.out
    }

    fn shape_style(&self, style: &DrawStyle) -> String {
        let fill = match style.fill() {
            Some(color) => color.to_string(),
            None => "none".to_string(),
        };
        format!(
            "fill:{fill};stroke:{};stroke-width:{}",
            style.stroke(),
            self.number(style.stroke_width())
        )
    }
}

/// Renders a model to an SVG document string.
pub fn render_model(model: &mut VisualModel, config: &EngineConfig) -> String {
    let content = model.content_bounds().unwrap_or_default();
    let mut writer = SvgWriter::new(config.precision_factor());
    writer.open_document(content);
    export_model_into(&mut writer, model);
    writer.finish()
}

/// Exports a model's visuals (in paint order) and then its edges into an
/// open writer. Nested models recurse through their sub-model box
/// primitives as wrapped groups.
pub fn export_model_into(writer: &mut SvgWriter, model: &mut VisualModel) {
    for visual in model.visuals_mut() {
        visual.export(writer);
    }
    for edge in model.edges() {
        edge.export(writer, model.visuals_map());
    }
}

/// File-writing exporter in front of [`render_model`].
pub struct Svg {
    output: PathBuf,
}

impl Svg {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn export_model(
        &self,
        model: &mut VisualModel,
        config: &EngineConfig,
    ) -> Result<(), Error> {
        let content = render_model(model, config);
        fs::write(&self.output, content)?;
        info!(output_path:? = self.output; "SVG exported");
        Ok(())
    }
}

/// Rounds the shortest decimal representation of `value` to `digits`
/// fractional digits, half away from zero, entirely in decimal space.
/// Working on the decimal string (not the binary value) is what makes
/// `2.0005` round up to `2.001` even though the nearest float sits just
/// below the tie.
fn canonical_number(value: f32, digits: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let repr = value.to_string();
    let negative = repr.starts_with('-');
    let unsigned = repr.trim_start_matches('-');
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), frac_part.to_string()),
        None => (unsigned.to_string(), String::new()),
    };

    let (int_part, frac_part) = round_decimal(int_part, &frac_part, digits);
    let frac_trimmed = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if negative && !(int_part == "0" && frac_trimmed.is_empty()) {
        out.push('-');
    }
    out.push_str(&int_part);
    if !frac_trimmed.is_empty() {
        out.push('.');
        out.push_str(frac_trimmed);
    }
    out
}

/// Half-away-from-zero rounding of a decimal digit string at `digits`
/// fractional places, with carry propagation into the integer part.
fn round_decimal(int_part: String, frac_part: &str, digits: usize) -> (String, String) {
    if frac_part.len() <= digits {
        return (int_part, frac_part.to_string());
    }
    let kept = &frac_part[..digits];
    let round_up = frac_part.as_bytes()[digits] >= b'5';
    if !round_up {
        return (int_part, kept.to_string());
    }

    let mut sequence: Vec<u8> = format!("{int_part}{kept}").into_bytes();
    let mut index = sequence.len();
    loop {
        if index == 0 {
            sequence.insert(0, b'1');
            break;
        }
        index -= 1;
        if sequence[index] == b'9' {
            sequence[index] = b'0';
        } else {
            sequence[index] += 1;
            break;
        }
    }
    let combined = String::from_utf8(sequence).expect("decimal digits are valid UTF-8");
    let split = combined.len() - digits;
    (combined[..split].to_string(), combined[split..].to_string())
}

/// Escapes text content: only `<`, `>`, and `&`.
fn escape_text(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for ch in content.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes attribute values: only `'`, since attributes are single-quoted.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
