//! Text measurement service.
//!
//! Text primitives derive their dimensions from this module. Measurement
//! uses cosmic-text shaping against a process-wide font system; when no
//! usable font data is available (headless hosts, export-only contexts),
//! measurement falls back to a character-count heuristic so layout stays
//! deterministic and never fails.
//!
//! The font system is expensive to create, so a single instance is kept
//! behind a `OnceLock` and shared with the software raster surface.

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use crate::geometry::Size;

/// Conversion from font points to pixels at standard DPI.
pub(crate) const PT_TO_PX: f32 = 1.33;
/// Line height as a multiple of the pixel font size.
pub(crate) const LINE_HEIGHT_FACTOR: f32 = 1.15;
/// Average glyph advance as a multiple of the pixel font size, used by the
/// character-count fallback.
const APPROX_ADVANCE_FACTOR: f32 = 0.55;

static FONT_SYSTEM: OnceLock<Mutex<FontSystem>> = OnceLock::new();

fn font_system() -> &'static Mutex<FontSystem> {
    FONT_SYSTEM.get_or_init(|| {
        info!("Initializing FontSystem");
        Mutex::new(FontSystem::new())
    })
}

/// Runs `f` with exclusive access to the shared font system.
pub(crate) fn with_font_system<R>(f: impl FnOnce(&mut FontSystem) -> R) -> R {
    let mut system = font_system().lock().expect("failed to lock FontSystem");
    f(&mut system)
}

/// Measures `content` in the given font, in pixels.
///
/// Shapes the text with cosmic-text for accurate metrics (kerning,
/// ligatures, multi-line layout). When shaping yields no layout runs, the
/// result comes from [`approximate_size`] instead.
pub fn measure(content: &str, font_family: &str, font_size_pt: u16) -> Size {
    if content.is_empty() {
        return Size::default();
    }

    let font_size_px = font_size_pt as f32 * PT_TO_PX;
    let metrics = Metrics::new(font_size_px, font_size_px * LINE_HEIGHT_FACTOR);

    with_font_system(|system| {
        let mut buffer = Buffer::new(system, metrics);
        let mut buffer = buffer.borrow_with(system);

        let attrs = Attrs::new().family(Family::Name(font_family));
        buffer.set_size(None, None);
        buffer.set_text(content, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        let mut saw_run = false;
        for run in buffer.layout_runs() {
            saw_run = true;
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        if saw_run {
            Size::new(max_width, total_height)
        } else {
            approximate_size(content, font_size_pt)
        }
    })
}

/// Character-count text size heuristic.
///
/// Width is the longest line's character count times an average advance;
/// height is the line count times the line height. This is the measurement
/// used when no live font data exists.
pub fn approximate_size(content: &str, font_size_pt: u16) -> Size {
    if content.is_empty() {
        return Size::default();
    }

    let font_size_px = font_size_pt as f32 * PT_TO_PX;
    let line_height = font_size_px * LINE_HEIGHT_FACTOR;

    let mut lines = 0usize;
    let mut longest = 0usize;
    for line in content.lines() {
        lines += 1;
        longest = longest.max(line.chars().count());
    }
    // `lines()` yields nothing for "\n"-free empty strings, handled above;
    // a trailing newline still counts as one line of content.
    let lines = lines.max(1);

    Size::new(
        longest as f32 * font_size_px * APPROX_ADVANCE_FACTOR,
        lines as f32 * line_height,
    )
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_measure_empty_is_zero() {
        assert!(measure("", "Arial", 12).is_zero());
        assert!(approximate_size("", 12).is_zero());
    }

    #[test]
    fn test_measure_positive() {
        let size = measure("Hello World", "Arial", 12);
        assert!(size.width() > 0.0, "width should be positive");
        assert!(size.height() > 0.0, "height should be positive");
    }

    #[test]
    fn test_measure_multiline_taller() {
        let single = measure("Line 1", "Arial", 12);
        let multi = measure("Line 1\nLine 2\nLine 3", "Arial", 12);
        assert!(
            multi.height() > single.height(),
            "multi-line ({}) should be taller than single line ({})",
            multi.height(),
            single.height()
        );
    }

    #[test]
    fn test_measure_larger_font_is_larger() {
        let small = measure("Test", "Arial", 10);
        let large = measure("Test", "Arial", 20);
        assert!(large.width() > small.width());
        assert!(large.height() > small.height());
    }

    #[test]
    fn test_approximate_size_scales_with_length() {
        let short = approximate_size("ab", 12);
        let long = approximate_size("abcdef", 12);
        assert!(long.width() > short.width());
        assert_approx_eq!(f32, long.height(), short.height());
        assert_approx_eq!(f32, long.width(), 3.0 * short.width());
    }

    #[test]
    fn test_approximate_size_multiline() {
        let one = approximate_size("abc", 12);
        let two = approximate_size("abc\nde", 12);
        assert_approx_eq!(f32, two.height(), 2.0 * one.height());
        // Width tracks the longest line only.
        assert_approx_eq!(f32, two.width(), one.width());
    }
}
