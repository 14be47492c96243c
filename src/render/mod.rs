//! Rendering: compose a widget and draw it to **SVG** or **PNG**.
//!
//! - Output format follows the file extension (`.svg`, anything else is PNG)
//! - Text lines are drawn top-left in their bands at their fitted size
//! - The trendline band is handed to a [`ChartRenderer`]
//!
//! PNG output rasterizes glyphs, so it needs registered fonts (see
//! [`crate::fit::AnyHost::from_fonts`]). SVG output only references the
//! family name. In both, a line's `font-size` is the fitted size.

pub mod trendline;

pub use trendline::{AreaTrendline, ChartRenderer};

use anyhow::{Result, anyhow};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;

use crate::compose::BigNumberWidget;
use crate::fit::MeasureHost;
use crate::fit::glyph::{font_style, plotters_font_size};
use crate::style::parse_hex_color;
use crate::tree::{Node, TextLine, VisualTree};
use trendline::rgb;

/// Whether `path` will be written as SVG.
pub fn is_svg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Compose `widget` with `host` and write it to `out_path`.
pub fn render_widget<H, P>(widget: &BigNumberWidget, host: &H, out_path: P) -> Result<VisualTree>
where
    H: MeasureHost + ?Sized,
    P: AsRef<Path>,
{
    render_widget_with(widget, host, &chart_for(widget), out_path)
}

pub fn render_widget_with<H, C, P>(
    widget: &BigNumberWidget,
    host: &H,
    chart: &C,
    out_path: P,
) -> Result<VisualTree>
where
    H: MeasureHost + ?Sized,
    C: ChartRenderer,
    P: AsRef<Path>,
{
    let tree = widget.compose(host)?;
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (widget.config().width, widget.config().height);

    if is_svg_path(out_path) {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_tree(root, widget, &tree, chart)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_tree(root, widget, &tree, chart)?;
    }
    info!("wrote {} to {}", tree.class_name, out_path.display());
    Ok(tree)
}

/// Compose and render to an in-memory SVG document.
pub fn render_svg_string<H: MeasureHost + ?Sized>(
    widget: &BigNumberWidget,
    host: &H,
) -> Result<(VisualTree, String)> {
    let tree = widget.compose(host)?;
    let size = (widget.config().width, widget.config().height);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_tree(root, widget, &tree, &chart_for(widget))?;
    }
    Ok((tree, svg))
}

fn chart_for(widget: &BigNumberWidget) -> AreaTrendline {
    AreaTrendline::with_family(&widget.config().style_sheet.family)
}

fn draw_tree<DB, C>(
    root: DrawingArea<DB, Shift>,
    widget: &BigNumberWidget,
    tree: &VisualTree,
    chart: &C,
) -> Result<()>
where
    DB: DrawingBackend,
    C: ChartRenderer,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut y = 0i32;
    for node in &tree.children {
        match node {
            Node::TextContainer {
                height, children, ..
            } => {
                let mut line_y = y;
                for child in children {
                    if let Node::TextLine(line) = child {
                        draw_text_line(&root, widget, &tree.class_name, line, line_y)?;
                        line_y += line.height as i32;
                    }
                }
                y += *height as i32;
            }
            Node::TextLine(line) => {
                draw_text_line(&root, widget, &tree.class_name, line, y)?;
                y += line.height as i32;
            }
            Node::Trendline(spec) => {
                let (_, band) = root.split_vertically(y);
                chart.render(&band, spec, &|d| widget.tooltip(d))?;
                y += spec.height as i32;
            }
        }
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_text_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    widget: &BigNumberWidget,
    container_class: &str,
    line: &TextLine,
    y: i32,
) -> Result<()> {
    if line.text.is_empty() || line.font_size <= 0.0 {
        return Ok(());
    }
    let sheet = &widget.config().style_sheet;
    let style = sheet.resolve(container_class, &line.class_name);
    let color = rgb(parse_hex_color(&style.color)?);
    let text_style = TextStyle::from((
        FontFamily::Name(sheet.family_of(&style)),
        plotters_font_size(line.font_size),
        font_style(style.weight),
    ))
    .color(&color)
    .pos(Pos::new(HPos::Left, VPos::Top));
    root.draw(&Text::new(line.text.as_str(), (0, y), text_style))
        .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
