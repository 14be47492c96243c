//! Picking a measurement host from the font configuration.

use log::warn;

use super::estimate::{EstimateHost, EstimateSurface};
use super::glyph::{GlyphHost, GlyphSurface, register_font_file};
use super::surface::{MeasureHost, MeasureSurface};
use crate::config::FontConfig;
use crate::error::SurfaceError;
use crate::models::TextBox;
use crate::style::{FontWeight, StyleSheet};

/// Either bundled host, chosen at runtime.
#[derive(Debug)]
pub enum AnyHost {
    Glyph(GlyphHost),
    Estimate(EstimateHost),
}

#[derive(Debug)]
pub enum AnySurface {
    Glyph(GlyphSurface),
    Estimate(EstimateSurface),
}

impl AnyHost {
    /// Glyph metrics when a regular face is configured, estimates otherwise.
    /// Faces are registered under the style sheet's family.
    pub fn from_fonts(fonts: &FontConfig, style_sheet: StyleSheet) -> Result<Self, SurfaceError> {
        let Some(regular) = fonts.regular.as_deref() else {
            warn!("no font file configured; using estimated text metrics");
            return Ok(AnyHost::Estimate(EstimateHost::new(style_sheet)));
        };
        register_font_file(&style_sheet.family, FontWeight::Normal, regular)?;
        let bold = fonts.bold.as_deref().unwrap_or(regular);
        register_font_file(&style_sheet.family, FontWeight::Bold, bold)?;
        Ok(AnyHost::Glyph(GlyphHost::new(style_sheet)))
    }

    pub fn is_glyph(&self) -> bool {
        matches!(self, AnyHost::Glyph(_))
    }
}

impl MeasureSurface for AnySurface {
    fn measure(
        &mut self,
        text: &str,
        text_class: &str,
        font_px: f64,
    ) -> Result<TextBox, SurfaceError> {
        match self {
            AnySurface::Glyph(s) => s.measure(text, text_class, font_px),
            AnySurface::Estimate(s) => s.measure(text, text_class, font_px),
        }
    }
}

impl MeasureHost for AnyHost {
    type Surface = AnySurface;

    fn create_surface(&self, container_class: &str) -> Result<AnySurface, SurfaceError> {
        Ok(match self {
            AnyHost::Glyph(h) => AnySurface::Glyph(h.create_surface(container_class)?),
            AnyHost::Estimate(h) => AnySurface::Estimate(h.create_surface(container_class)?),
        })
    }

    fn attach(&self, surface: &mut AnySurface) -> Result<(), SurfaceError> {
        match (self, surface) {
            (AnyHost::Glyph(h), AnySurface::Glyph(s)) => h.attach(s),
            (AnyHost::Estimate(h), AnySurface::Estimate(s)) => h.attach(s),
            _ => Err(SurfaceError::Unavailable(
                "surface belongs to another host".into(),
            )),
        }
    }

    fn detach(&self, surface: &mut AnySurface) {
        match (self, surface) {
            (AnyHost::Glyph(h), AnySurface::Glyph(s)) => h.detach(s),
            (AnyHost::Estimate(h), AnySurface::Estimate(s)) => h.detach(s),
            _ => {}
        }
    }

    fn live_surfaces(&self) -> usize {
        match self {
            AnyHost::Glyph(h) => h.live_surfaces(),
            AnyHost::Estimate(h) => h.live_surfaces(),
        }
    }

    fn host_id(&self) -> u64 {
        match self {
            AnyHost::Glyph(h) => h.host_id(),
            AnyHost::Estimate(h) => h.host_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::compute_max_font_size;
    use crate::models::SizingRequest;
    use std::path::PathBuf;

    #[test]
    fn no_font_means_estimates() {
        let host = AnyHost::from_fonts(&FontConfig::default(), StyleSheet::default()).unwrap();
        assert!(!host.is_glyph());
        let r = compute_max_font_size(
            &host,
            "big_number",
            &SizingRequest::new("2634", 1230.0, 100.0, "header_line"),
        )
        .unwrap();
        assert_eq!(r.font_size, 100.0);
        assert_eq!(host.live_surfaces(), 0);
    }

    #[test]
    fn unreadable_font_is_an_error() {
        let fonts = FontConfig {
            regular: Some(PathBuf::from("/nonexistent/regular.ttf")),
            bold: None,
        };
        let sheet = StyleSheet {
            family: "bignum-host-test".into(),
            ..StyleSheet::default()
        };
        let err = AnyHost::from_fonts(&fonts, sheet).unwrap_err();
        assert!(matches!(err, SurfaceError::Font(_)));
    }
}
