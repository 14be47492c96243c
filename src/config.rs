//! Widget configuration: everything one render needs, read-only afterwards.
//!
//! Configurations are JSON files in which every field is optional; missing
//! fields fall back to the reference widget below.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::fit::FitOptions;
use crate::format::NumberFormat;
use crate::models::{TrendPoint, sample_trend_line};
use crate::style::{Rgb8, StyleSheet, parse_hex_color};

/// Font files for the glyph measurement path, registered under the style
/// sheet's family. Without a regular face the deterministic estimator is
/// used instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub regular: Option<PathBuf>,
    /// Falls back to `regular` when absent.
    pub bold: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub width: u32,
    pub height: u32,
    pub big_number: Option<f64>,
    pub subheader: Option<String>,
    pub class_name: String,
    pub main_color: String,
    pub show_trend_line: bool,
    pub start_y_axis_at_zero: bool,
    pub trend_line_data: Vec<TrendPoint>,
    pub number_format: NumberFormat,
    /// Timestamp to pin the crosshair to; snapped to the nearest datum.
    pub highlight_x: Option<i64>,
    pub fit: FitOptions,
    pub style_sheet: StyleSheet,
    pub fonts: FontConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            width: 1230,
            height: 332,
            big_number: Some(2634.0),
            subheader: Some("-86.2% (2015 Q1 - 2018 Q3)".to_string()),
            class_name: "negative".to_string(),
            main_color: "#007a87".to_string(),
            show_trend_line: true,
            start_y_axis_at_zero: true,
            trend_line_data: sample_trend_line(),
            number_format: NumberFormat::Identity,
            highlight_x: None,
            fit: FitOptions::default(),
            style_sheet: StyleSheet::default(),
            fonts: FontConfig::default(),
        }
    }
}

impl WidgetConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: WidgetConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&s)
    }

    /// Reject values no layout pass can use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.main_rgb()?;
        for rule in &self.style_sheet.rules {
            parse_hex_color(&rule.style.color)?;
        }
        Ok(())
    }

    pub fn main_rgb(&self) -> Result<Rgb8, ConfigError> {
        parse_hex_color(&self.main_color)
    }
}
