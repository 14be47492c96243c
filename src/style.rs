//! Class names, text styles, and color parsing for the widget.
//!
//! A small style sheet plays the role of CSS: a text class such as
//! `header_line` resolves to a font family, weight, line height, and color.
//! Rules may be qualified by a container modifier (e.g. `no_trendline`), and
//! the most specific matching rule wins. Rules without a family inherit the
//! sheet's family, which is also the name font files are registered under.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::ConfigError;

pub const BASE_CLASS: &str = "big_number";
pub const NO_TRENDLINE_CLASS: &str = "no_trendline";
pub const TEXT_CONTAINER_CLASS: &str = "text_container";
pub const HEADER_CLASS: &str = "header_line";
pub const SUBHEADER_CLASS: &str = "subheader_line";

/// Family of a sheet that names none.
pub const DEFAULT_FAMILY: &str = "sans-serif";

/// Root class: `"big_number {class_name}"` plus the `no_trendline` modifier.
pub fn widget_class_name(class_name: &str, show_trend_line: bool) -> String {
    let names = format!("{BASE_CLASS} {class_name}");
    if show_trend_line {
        names
    } else {
        format!("{names} {NO_TRENDLINE_CLASS}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Resolved text style for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextClassStyle {
    /// `None` inherits the sheet's family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default)]
    pub weight: FontWeight,
    /// Line box height as a multiple of the font size; `None` uses the
    /// font's natural height.
    #[serde(default)]
    pub line_height: Option<f64>,
    #[serde(default = "default_text_color")]
    pub color: String,
}

fn default_family() -> String {
    DEFAULT_FAMILY.to_string()
}

fn default_text_color() -> String {
    "#000000".to_string()
}

impl Default for TextClassStyle {
    fn default() -> Self {
        Self {
            family: None,
            weight: FontWeight::Normal,
            line_height: None,
            color: default_text_color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub class: String,
    /// Only applies inside containers carrying this class.
    #[serde(default)]
    pub modifier: Option<String>,
    pub style: TextClassStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    pub family: String,
    pub rules: Vec<StyleRule>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            family: default_family(),
            rules: vec![
                StyleRule {
                    class: HEADER_CLASS.to_string(),
                    modifier: None,
                    style: TextClassStyle {
                        weight: FontWeight::Bold,
                        line_height: Some(1.0),
                        ..TextClassStyle::default()
                    },
                },
                StyleRule {
                    class: SUBHEADER_CLASS.to_string(),
                    modifier: None,
                    style: TextClassStyle {
                        line_height: Some(1.0),
                        color: "#333333".to_string(),
                        ..TextClassStyle::default()
                    },
                },
            ],
        }
    }
}

impl StyleSheet {
    /// Resolve the style of `text_class` inside a container with `container_class`.
    pub fn resolve(&self, container_class: &str, text_class: &str) -> TextClassStyle {
        let in_container = |m: &str| container_class.split_whitespace().any(|c| c == m);
        let mut best: Option<(u8, &StyleRule)> = None;
        for rule in self.rules.iter().filter(|r| r.class == text_class) {
            let specificity = match rule.modifier.as_deref() {
                None => 1,
                Some(m) if in_container(m) => 2,
                Some(_) => continue,
            };
            // later rules win ties, like a cascade
            if best.is_none_or(|(s, _)| specificity >= s) {
                best = Some((specificity, rule));
            }
        }
        let mut style = best.map(|(_, r)| r.style.clone()).unwrap_or_default();
        style.family.get_or_insert_with(|| self.family.clone());
        style
    }

    /// Family a rule draws with.
    pub fn family_of<'a>(&'a self, style: &'a TextClassStyle) -> &'a str {
        style.family.as_deref().unwrap_or(&self.family)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Rgb8 = Rgb8 {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn hex_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("static regex is valid")
    })
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_hex_color(s: &str) -> Result<Rgb8, ConfigError> {
    let s = s.trim();
    let caps = hex_color_re()
        .captures(s)
        .ok_or_else(|| ConfigError::InvalidColor(s.to_string()))?;
    let digits = &caps[1];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    };
    Ok(Rgb8 {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_name_carries_mode_modifier() {
        assert_eq!(widget_class_name("negative", true), "big_number negative");
        assert_eq!(
            widget_class_name("negative", false),
            "big_number negative no_trendline"
        );
    }

    #[test]
    fn rules_inherit_the_sheet_family() {
        let mut sheet = StyleSheet {
            family: "DejaVu Sans".into(),
            ..StyleSheet::default()
        };
        assert_eq!(
            sheet.resolve(BASE_CLASS, HEADER_CLASS).family.as_deref(),
            Some("DejaVu Sans")
        );
        assert_eq!(
            sheet.resolve(BASE_CLASS, "tooltip").family.as_deref(),
            Some("DejaVu Sans")
        );
        sheet.rules[0].style.family = Some("Mono".into());
        assert_eq!(sheet.family_of(&sheet.rules[0].style), "Mono");
        assert_eq!(sheet.family_of(&sheet.rules[1].style), "DejaVu Sans");

        let parsed: StyleSheet = serde_json::from_str(r#"{"family": "Inter"}"#).unwrap();
        assert_eq!(parsed.rules, StyleSheet::default().rules);
        assert_eq!(parsed.family, "Inter");
    }

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(
            parse_hex_color("#007a87").unwrap(),
            Rgb8 { r: 0, g: 122, b: 135 }
        );
        assert_eq!(parse_hex_color("#fff").unwrap(), Rgb8::WHITE);
        assert!(parse_hex_color("007a87").is_err());
        assert!(parse_hex_color("#12345").is_err());
    }

    #[test]
    fn modifier_rule_beats_plain_rule() {
        let mut sheet = StyleSheet::default();
        sheet.rules.push(StyleRule {
            class: SUBHEADER_CLASS.into(),
            modifier: Some(NO_TRENDLINE_CLASS.into()),
            style: TextClassStyle {
                line_height: Some(1.4),
                ..TextClassStyle::default()
            },
        });
        let plain = sheet.resolve("big_number negative", SUBHEADER_CLASS);
        assert_eq!(plain.line_height, Some(1.0));
        assert_eq!(plain.color, "#333333");
        let modded = sheet.resolve("big_number negative no_trendline", SUBHEADER_CLASS);
        assert_eq!(modded.line_height, Some(1.4));
    }

    #[test]
    fn unknown_class_falls_back_to_default() {
        let s = StyleSheet::default().resolve(BASE_CLASS, "tooltip");
        assert_eq!(
            s,
            TextClassStyle {
                family: Some(DEFAULT_FAMILY.into()),
                ..TextClassStyle::default()
            }
        );
        let h = StyleSheet::default().resolve(BASE_CLASS, HEADER_CLASS);
        assert_eq!(h.weight, FontWeight::Bold);
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(Rgb8 { r: 0, g: 122, b: 135 }.to_hex(), "#007a87");
        assert_eq!(parse_hex_color("#ABC").unwrap().to_hex(), "#aabbcc");
    }
}
