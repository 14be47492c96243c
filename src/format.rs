//! Display formatting for the headline number, tooltip values, and dates.

use chrono::{DateTime, Datelike, Timelike, Utc};
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

use crate::models::TrendPoint;

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// How the big number (and tooltip values) are displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NumberFormat {
    /// Shortest round-trip display, `2634` or `0.5`.
    #[default]
    Identity,
    /// Locale thousands separators and decimal mark, rounded to `decimals`.
    Grouped {
        locale: String,
        #[serde(default)]
        decimals: usize,
    },
    Fixed { decimals: usize },
    /// Ratio as percent, `0.123` -> `12.3%`.
    Percent { decimals: usize },
    /// Three significant digits with k/M/B/T suffix.
    Compact,
}

impl NumberFormat {
    pub fn format(&self, v: f64) -> String {
        if !v.is_finite() {
            return "NA".to_string();
        }
        match self {
            NumberFormat::Identity => format!("{v}"),
            NumberFormat::Grouped { locale, decimals } => format_grouped(v, locale, *decimals),
            NumberFormat::Fixed { decimals } => format!("{:.*}", decimals, v),
            NumberFormat::Percent { decimals } => format!("{:.*}%", decimals, v * 100.0),
            NumberFormat::Compact => format_compact(v),
        }
    }
}

fn format_grouped(v: f64, locale: &str, decimals: usize) -> String {
    let (num_locale, decimal_sep) = map_locale(locale);
    let fixed = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let int_part = match int_part.parse::<u64>() {
        Ok(n) => n.to_formatted_string(num_locale),
        Err(_) => int_part.to_string(),
    };
    let sign = if v < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}{decimal_sep}{frac_part}")
    }
}

fn format_compact(v: f64) -> String {
    let a = v.abs();
    let (scale, suffix) = if a >= 1.0e12 {
        (1.0e12, "T")
    } else if a >= 1.0e9 {
        (1.0e9, "B")
    } else if a >= 1.0e6 {
        (1.0e6, "M")
    } else if a >= 1.0e3 {
        (1.0e3, "k")
    } else {
        (1.0, "")
    };
    let scaled = v / scale;
    let sa = scaled.abs();
    let prec = if sa >= 100.0 {
        0
    } else if sa >= 10.0 {
        1
    } else {
        2
    };
    let s = format!("{:.*}", prec, scaled);
    // 12.00k -> 12k
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    format!("{s}{suffix}")
}

/// Granularity-adaptive UTC date label: the finest non-zero unit of the
/// timestamp picks the pattern, so quarter starts read `Jan 2018` and exact
/// instants carry a clock time.
pub fn smart_date_verbose(ms: i64) -> String {
    let Some(dt) = DateTime::<Utc>::from_timestamp_millis(ms) else {
        return ms.to_string();
    };
    let pattern = if dt.timestamp_subsec_millis() != 0 {
        ".%3f"
    } else if dt.second() != 0 {
        "%a %b %d, %I:%M:%S %p"
    } else if dt.minute() != 0 {
        "%a %b %d, %I:%M %p"
    } else if dt.hour() != 0 {
        "%a %b %d, %I %p"
    } else if dt.day() != 1 {
        "%a %b %-d"
    } else if dt.month() != 1 {
        "%b %Y"
    } else {
        "%Y"
    };
    dt.format(pattern).to_string()
}

/// Text of the trendline tooltip for one datum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipContent {
    pub date: String,
    pub value: String,
}

pub fn render_tooltip(format: &NumberFormat, datum: &TrendPoint) -> TooltipContent {
    TooltipContent {
        date: smart_date_verbose(datum.x),
        value: format.format(datum.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_keeps_plain_numbers() {
        assert_eq!(NumberFormat::Identity.format(2634.0), "2634");
        assert_eq!(NumberFormat::Identity.format(0.5), "0.5");
        assert_eq!(NumberFormat::Identity.format(f64::NAN), "NA");
    }

    #[test]
    fn grouped_uses_locale_separators() {
        let grouped = |locale: &str, decimals| NumberFormat::Grouped {
            locale: locale.into(),
            decimals,
        };
        assert_eq!(grouped("en", 0).format(1234567.4), "1,234,567");
        assert_eq!(grouped("de", 0).format(1234567.4), "1.234.567");
        assert_eq!(grouped("de", 1).format(1234567.46), "1.234.567,5");
        assert_eq!(grouped("en", 2).format(-2634.5), "-2,634.50");
        assert_eq!(grouped("fr", 1).format(0.26), "0,3");
        assert_eq!(grouped("de", 0).format(-0.2), "0");
    }

    #[test]
    fn fixed_percent_compact() {
        assert_eq!(NumberFormat::Fixed { decimals: 2 }.format(3.14159), "3.14");
        assert_eq!(NumberFormat::Percent { decimals: 1 }.format(-0.862), "-86.2%");
        assert_eq!(NumberFormat::Compact.format(19030.0), "19k");
        assert_eq!(NumberFormat::Compact.format(2634.0), "2.63k");
        assert_eq!(NumberFormat::Compact.format(1.5e9), "1.5B");
        assert_eq!(NumberFormat::Compact.format(42.0), "42");
    }

    #[test]
    fn number_format_from_config_json() {
        let f: NumberFormat = serde_json::from_str(r#"{"type":"percent","decimals":1}"#).unwrap();
        assert_eq!(f, NumberFormat::Percent { decimals: 1 });
        let f: NumberFormat = serde_json::from_str(r#"{"type":"compact"}"#).unwrap();
        assert_eq!(f, NumberFormat::Compact);
    }

    #[test]
    fn smart_dates_pick_granularity() {
        // 2018-07-01T00:00:00Z
        assert_eq!(smart_date_verbose(1530403200000), "Jul 2018");
        // 2018-01-01T00:00:00Z
        assert_eq!(smart_date_verbose(1514764800000), "2018");
        // 2018-07-04T00:00:00Z
        assert_eq!(smart_date_verbose(1530662400000), "Wed Jul 4");
        // 2018-07-04T15:00:00Z
        assert_eq!(smart_date_verbose(1530716400000), "Wed Jul 04, 03 PM");
        // 2018-07-04T15:30:00Z
        assert_eq!(smart_date_verbose(1530718200000), "Wed Jul 04, 03:30 PM");
        assert_eq!(smart_date_verbose(1530718200250), ".250");
    }

    #[test]
    fn tooltip_pairs_date_and_value() {
        let t = render_tooltip(&NumberFormat::Identity, &TrendPoint::new(1530403200000, 2634.0));
        assert_eq!(
            t,
            TooltipContent {
                date: "Jul 2018".into(),
                value: "2634".into()
            }
        );
    }
}
