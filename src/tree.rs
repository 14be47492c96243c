//! The composed widget as plain data: what to draw, where, and how large.

use serde::Serialize;

use crate::models::TrendPoint;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualTree {
    pub class_name: String,
    pub width: u32,
    /// Explicit root height; only set in text-only mode, where the root
    /// occupies the whole box even if the bands do not.
    pub height: Option<u32>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    TextContainer {
        class_name: String,
        height: u32,
        children: Vec<Node>,
    },
    TextLine(TextLine),
    Trendline(Box<TrendlineSpec>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub class_name: String,
    pub text: String,
    pub font_size: f64,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

pub const CHART_MARGIN: Margin = Margin {
    top: 4,
    right: 4,
    bottom: 4,
    left: 4,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum XScale {
    TimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YScale {
    pub include_zero: bool,
}

/// Vertical fill from `from` (top) to `to` (bottom), referenced by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradientFill {
    pub id: String,
    pub from: String,
    pub to: String,
}

impl GradientFill {
    pub fn url(&self) -> String {
        format!("url(#{})", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrosshairStyle {
    pub stroke: String,
    pub circle_fill: String,
    pub circle_stroke: String,
    pub show_horizontal_line: bool,
    pub full_height: bool,
    pub stroke_dasharray: String,
}

/// Everything the chart collaborator receives for the trendline band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendlineSpec {
    pub aria_label: String,
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub x_scale: XScale,
    pub y_scale: YScale,
    pub data: Vec<TrendPoint>,
    pub gradient: GradientFill,
    pub fill: String,
    pub stroke: String,
    pub crosshair: CrosshairStyle,
    pub snap_tooltip_to_data_x: bool,
    /// Datum the crosshair is pinned to, if any.
    pub highlight: Option<TrendPoint>,
}

impl VisualTree {
    /// Depth-first list of every text line.
    pub fn text_lines(&self) -> Vec<&TextLine> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a TextLine>) {
            for n in nodes {
                match n {
                    Node::TextContainer { children, .. } => walk(children, out),
                    Node::TextLine(line) => out.push(line),
                    Node::Trendline(_) => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &mut out);
        out
    }

    pub fn trendline(&self) -> Option<&TrendlineSpec> {
        self.children.iter().find_map(|n| match n {
            Node::Trendline(spec) => Some(spec.as_ref()),
            _ => None,
        })
    }
}
