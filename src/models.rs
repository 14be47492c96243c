use serde::{Deserialize, Serialize};

/// One observation of the trendline series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Timestamp in milliseconds since the Unix epoch (UTC).
    pub x: i64,
    pub y: f64,
}

impl TrendPoint {
    pub fn new(x: i64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Input of a single fit call.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingRequest {
    pub text: String,
    pub max_width: f64,
    pub max_height: f64,
    pub style_class: String,
}

impl SizingRequest {
    pub fn new(
        text: impl Into<String>,
        max_width: f64,
        max_height: f64,
        style_class: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            max_width,
            max_height,
            style_class: style_class.into(),
        }
    }
}

/// Output of a fit call. `font_size == 0.0` for empty text, or when the
/// minimum bound (0 by default) is all that is left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub font_size: f64,
}

/// Rendered extent of a line of text on a measurement surface, in px.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBox {
    pub width: f64,
    pub height: f64,
}

impl TextBox {
    pub fn fits(&self, max_width: f64, max_height: f64) -> bool {
        self.width <= max_width && self.height <= max_height
    }
}

/// Quarterly sample series shown by the default widget.
pub fn sample_trend_line() -> Vec<TrendPoint> {
    [
        (1443657600000, 19030.0),
        (1451606400000, 8732.0),
        (1459468800000, 3809.0),
        (1467331200000, 9400.0),
        (1475280000000, 3289.0),
        (1483228800000, 3511.0),
        (1491004800000, 1742.0),
        (1506816000000, 1928.0),
        (1514764800000, 3700.0),
        (1522540800000, 3966.0),
        (1530403200000, 2634.0),
    ]
    .into_iter()
    .map(|(x, y)| TrendPoint::new(x, y))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_box_fit_is_inclusive() {
        let b = TextBox {
            width: 100.0,
            height: 20.0,
        };
        assert!(b.fits(100.0, 20.0));
        assert!(!b.fits(99.9, 20.0));
        assert!(!b.fits(100.0, 19.9));
    }

    #[test]
    fn trend_point_json_shape() {
        let p: TrendPoint = serde_json::from_str(r#"{"x": 1530403200000, "y": 2634}"#).unwrap();
        assert_eq!(p, TrendPoint::new(1530403200000, 2634.0));
    }

    #[test]
    fn sample_series_is_sorted() {
        let s = sample_trend_line();
        assert_eq!(s.len(), 11);
        assert!(s.windows(2).all(|w| w[0].x < w[1].x));
    }
}
