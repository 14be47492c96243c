//! Height partitioning of the widget into header, subheader, and chart bands.
//!
//! The ratios are the widget's visual contract. With a trendline the chart
//! band is derived from the total height rather than from what the text bands
//! leave over, so the three bands need not add up to the total height.

use serde::Serialize;

/// Named height ratios for both layout modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutProportions {
    pub header: f64,
    pub subheader: f64,
    pub header_with_trendline: f64,
    pub subheader_with_trendline: f64,
    pub trendline: f64,
}

pub const PROPORTION: LayoutProportions = LayoutProportions {
    header: 0.4,
    subheader: 0.14,
    header_with_trendline: 0.3,
    subheader_with_trendline: 0.125,
    trendline: 0.3,
};

impl LayoutProportions {
    /// Both modes must not claim more than the full height.
    pub fn is_valid(&self) -> bool {
        let all = [
            self.header,
            self.subheader,
            self.header_with_trendline,
            self.subheader_with_trendline,
            self.trendline,
        ];
        all.iter().all(|r| (0.0..=1.0).contains(r))
            && self.header + self.subheader <= 1.0
            && self.header_with_trendline + self.subheader_with_trendline + self.trendline <= 1.0
    }
}

impl Default for LayoutProportions {
    fn default() -> Self {
        PROPORTION
    }
}

/// Band heights in px for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bands {
    pub header: u32,
    pub subheader: u32,
    /// `None` when the trendline is hidden.
    pub chart: Option<u32>,
    /// Height of the block holding both text lines.
    pub text_container: u32,
}

/// Partition `height` using the default proportions.
pub fn proportion(height: u32, show_trend_line: bool) -> Bands {
    proportion_with(&PROPORTION, height, show_trend_line)
}

pub fn proportion_with(p: &LayoutProportions, height: u32, show_trend_line: bool) -> Bands {
    let h = height as f64;
    if show_trend_line {
        let chart = (p.trendline * h).floor() as u32;
        Bands {
            header: (p.header_with_trendline * h).ceil() as u32,
            subheader: (p.subheader_with_trendline * h).ceil() as u32,
            chart: Some(chart),
            text_container: height - chart,
        }
    } else {
        Bands {
            header: (p.header * h).ceil() as u32,
            subheader: (p.subheader * h).ceil() as u32,
            chart: None,
            text_container: height,
        }
    }
}
