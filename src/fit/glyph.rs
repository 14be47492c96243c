//! Font-metrics measurement through plotters' `ab_glyph` text path.
//!
//! `ab_glyph` does not discover OS fonts, so faces have to be registered
//! first. Registration is process-wide and happens at most once per
//! (family, weight).

use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;
use std::sync::{Mutex, OnceLock};

use log::{debug, info};
use plotters::style::{FontDesc, FontFamily, FontStyle};

use super::surface::{MeasureHost, MeasureSurface, SurfaceCounter};
use crate::error::SurfaceError;
use crate::models::TextBox;
use crate::style::{FontWeight, StyleSheet};

fn registry() -> &'static Mutex<HashSet<(String, FontWeight)>> {
    static REGISTERED: OnceLock<Mutex<HashSet<(String, FontWeight)>>> = OnceLock::new();
    REGISTERED.get_or_init(|| Mutex::new(HashSet::new()))
}

/// plotters sizes a font by its full glyph height, where CSS uses the em
/// box: `ab_glyph` scales by the size as given and the SVG backend writes
/// `size / 1.24` as `font-size`.
pub const PLOTTERS_SIZE_PER_PX: f64 = 1.24;

/// The plotters size that draws (and measures) text at CSS size `font_px`.
pub fn plotters_font_size(font_px: f64) -> f64 {
    font_px * PLOTTERS_SIZE_PER_PX
}

pub fn font_style(weight: FontWeight) -> FontStyle {
    match weight {
        FontWeight::Normal => FontStyle::Normal,
        FontWeight::Bold => FontStyle::Bold,
    }
}

/// Whether a face for (family, weight) has been registered.
pub fn is_registered(family: &str, weight: FontWeight) -> bool {
    registry()
        .lock()
        .map(|set| set.contains(&(family.to_string(), weight)))
        .unwrap_or(false)
}

/// Register a TrueType/OpenType file for (family, weight).
///
/// The font bytes live for the rest of the process; registering the same
/// pair again is a no-op.
pub fn register_font_file(
    family: &str,
    weight: FontWeight,
    path: &Path,
) -> Result<(), SurfaceError> {
    let mut set = registry()
        .lock()
        .map_err(|_| SurfaceError::Font("font registry poisoned".into()))?;
    let key = (family.to_string(), weight);
    if set.contains(&key) {
        return Ok(());
    }
    let bytes = std::fs::read(path)
        .map_err(|e| SurfaceError::Font(format!("{}: {e}", path.display())))?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font(family, font_style(weight), bytes)
        .map_err(|_| SurfaceError::Font(format!("{}: invalid font data", path.display())))?;
    info!("registered {:?} {family} from {}", weight, path.display());
    set.insert(key);
    Ok(())
}

/// Measures with real glyph advances of registered fonts.
#[derive(Debug)]
pub struct GlyphHost {
    style_sheet: Rc<StyleSheet>,
    counter: SurfaceCounter,
}

impl GlyphHost {
    pub fn new(style_sheet: StyleSheet) -> Self {
        Self {
            style_sheet: Rc::new(style_sheet),
            counter: SurfaceCounter::default(),
        }
    }
}

#[derive(Debug)]
pub struct GlyphSurface {
    container_class: String,
    style_sheet: Rc<StyleSheet>,
}

impl MeasureSurface for GlyphSurface {
    fn measure(
        &mut self,
        text: &str,
        text_class: &str,
        font_px: f64,
    ) -> Result<TextBox, SurfaceError> {
        let style = self.style_sheet.resolve(&self.container_class, text_class);
        let font = FontDesc::new(
            FontFamily::Name(self.style_sheet.family_of(&style)),
            plotters_font_size(font_px),
            font_style(style.weight),
        );
        let (w, h) = font.box_size(text).map_err(|e| SurfaceError::Measure {
            text: text.to_string(),
            font_px,
            reason: format!("{e:?}"),
        })?;
        let height = match style.line_height {
            Some(lh) => (font_px * lh).ceil(),
            None => h as f64,
        };
        Ok(TextBox {
            width: w as f64,
            height,
        })
    }
}

impl MeasureHost for GlyphHost {
    type Surface = GlyphSurface;

    fn create_surface(&self, container_class: &str) -> Result<GlyphSurface, SurfaceError> {
        Ok(GlyphSurface {
            container_class: container_class.to_string(),
            style_sheet: Rc::clone(&self.style_sheet),
        })
    }

    fn attach(&self, surface: &mut GlyphSurface) -> Result<(), SurfaceError> {
        // every face the sheet references must be available before measuring
        let sheet = &self.style_sheet;
        let faces = sheet
            .rules
            .iter()
            .map(|r| (sheet.family_of(&r.style), r.style.weight, r.class.as_str()))
            .chain(std::iter::once((sheet.family.as_str(), FontWeight::Normal, "*")));
        for (family, weight, class) in faces {
            if !is_registered(family, weight) {
                return Err(SurfaceError::Unavailable(format!(
                    "no font registered for {family} ({weight:?}) used by .{class}"
                )));
            }
        }
        debug!("attached glyph surface .{}", surface.container_class);
        self.counter.attached();
        Ok(())
    }

    fn detach(&self, surface: &mut GlyphSurface) {
        debug!("detached glyph surface .{}", surface.container_class);
        self.counter.detached();
    }

    fn live_surfaces(&self) -> usize {
        self.counter.live()
    }

    fn host_id(&self) -> u64 {
        self.counter.id()
    }
}
