//! Deterministic text metrics.
//!
//! Widths are a fixed fraction of the font size per character, heights the
//! class line box (or a fixed natural height). No fonts are needed, which
//! makes this host reproducible across machines; it is what the tests and the
//! SVG path use when no font file is configured.

use std::rc::Rc;

use super::surface::{MeasureHost, MeasureSurface, SurfaceCounter};
use crate::error::SurfaceError;
use crate::models::TextBox;
use crate::style::{FontWeight, StyleSheet};

/// Average advance of a sans-serif glyph relative to the font size.
pub const CHAR_WIDTH_FACTOR: f64 = 0.60;
/// Natural line height relative to the font size (CSS `line-height: normal`).
pub const NATURAL_HEIGHT_FACTOR: f64 = 1.2;
/// Extra advance of bold glyphs.
pub const BOLD_WIDTH_FACTOR: f64 = 1.1;

/// Heuristic: estimate pixel width of text.
pub fn estimate_text_width_px(text: &str, font_px: f64) -> f64 {
    text.chars().count() as f64 * font_px * CHAR_WIDTH_FACTOR
}

#[derive(Debug)]
pub struct EstimateHost {
    style_sheet: Rc<StyleSheet>,
    counter: SurfaceCounter,
}

impl EstimateHost {
    pub fn new(style_sheet: StyleSheet) -> Self {
        Self {
            style_sheet: Rc::new(style_sheet),
            counter: SurfaceCounter::default(),
        }
    }
}

impl Default for EstimateHost {
    fn default() -> Self {
        Self::new(StyleSheet::default())
    }
}

#[derive(Debug)]
pub struct EstimateSurface {
    container_class: String,
    style_sheet: Rc<StyleSheet>,
}

impl MeasureSurface for EstimateSurface {
    fn measure(
        &mut self,
        text: &str,
        text_class: &str,
        font_px: f64,
    ) -> Result<TextBox, SurfaceError> {
        let style = self.style_sheet.resolve(&self.container_class, text_class);
        let weight = match style.weight {
            FontWeight::Normal => 1.0,
            FontWeight::Bold => BOLD_WIDTH_FACTOR,
        };
        let height = font_px * style.line_height.unwrap_or(NATURAL_HEIGHT_FACTOR);
        Ok(TextBox {
            width: (estimate_text_width_px(text, font_px) * weight).ceil(),
            height: height.ceil(),
        })
    }
}

impl MeasureHost for EstimateHost {
    type Surface = EstimateSurface;

    fn create_surface(&self, container_class: &str) -> Result<EstimateSurface, SurfaceError> {
        Ok(EstimateSurface {
            container_class: container_class.to_string(),
            style_sheet: Rc::clone(&self.style_sheet),
        })
    }

    fn attach(&self, _surface: &mut EstimateSurface) -> Result<(), SurfaceError> {
        self.counter.attached();
        Ok(())
    }

    fn detach(&self, _surface: &mut EstimateSurface) {
        self.counter.detached();
    }

    fn live_surfaces(&self) -> usize {
        self.counter.live()
    }

    fn host_id(&self) -> u64 {
        self.counter.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{HEADER_CLASS, SUBHEADER_CLASS};

    #[test]
    fn widths_scale_with_chars_and_weight() {
        let host = EstimateHost::default();
        let mut s = host.create_surface("big_number").unwrap();
        let normal = s.measure("2634", SUBHEADER_CLASS, 100.0).unwrap();
        assert_eq!(normal.width, 240.0);
        assert_eq!(normal.height, 100.0);
        let bold = s.measure("2634", HEADER_CLASS, 100.0).unwrap();
        assert_eq!(bold.width, 264.0);
    }

    #[test]
    fn unstyled_class_uses_natural_height() {
        let host = EstimateHost::default();
        let mut s = host.create_surface("big_number").unwrap();
        let b = s.measure("abc", "tooltip", 10.0).unwrap();
        assert_eq!(b.height, 12.0);
    }
}
