//! The trendline band: a filled area series with a vertical gradient and an
//! optional pinned crosshair with its tooltip.

use anyhow::{Result, anyhow};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontFamily, FontStyle};

use crate::fit::estimate::{BOLD_WIDTH_FACTOR, estimate_text_width_px};
use crate::fit::glyph::plotters_font_size;
use crate::format::TooltipContent;
use crate::models::TrendPoint;
use crate::style::{DEFAULT_FAMILY, Rgb8, parse_hex_color};
use crate::tree::TrendlineSpec;

/// Draws a [`TrendlineSpec`] into a drawing area.
pub trait ChartRenderer {
    fn render<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        spec: &TrendlineSpec,
        tooltip: &dyn Fn(&TrendPoint) -> TooltipContent,
    ) -> Result<()>;
}

pub fn rgb(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

#[derive(Debug, Clone)]
pub struct AreaTrendline {
    pub family: String,
    /// Number of bands approximating the gradient.
    pub gradient_steps: u32,
    pub stroke_width: u32,
    pub tooltip_font_px: u32,
}

impl Default for AreaTrendline {
    fn default() -> Self {
        Self::with_family(DEFAULT_FAMILY)
    }
}

impl AreaTrendline {
    /// Tooltip text in `family`, the widget's registered family.
    pub fn with_family(family: &str) -> Self {
        Self {
            family: family.to_string(),
            gradient_steps: 24,
            stroke_width: 2,
            tooltip_font_px: 12,
        }
    }
}

/// Data range of the series, widened to include 0 if asked and padded when flat.
pub fn data_bounds(data: &[TrendPoint], include_zero: bool) -> Option<((f64, f64), (f64, f64))> {
    let first = data.first()?;
    let (mut x_min, mut x_max) = (first.x as f64, first.x as f64);
    let (mut y_min, mut y_max) = (first.y, first.y);
    for p in data {
        x_min = x_min.min(p.x as f64);
        x_max = x_max.max(p.x as f64);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }
    if include_zero {
        y_min = y_min.min(0.0);
        y_max = y_max.max(0.0);
    }
    if (x_max - x_min).abs() < f64::EPSILON {
        x_min -= 1.0;
        x_max += 1.0;
    }
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }
    Some(((x_min, x_max), (y_min, y_max)))
}

/// Parse a `"5,2"` dash array into (on, off) pixel lengths.
pub fn parse_dasharray(s: &str) -> Option<(f64, f64)> {
    let mut parts = s.split([',', ' ']).filter(|p| !p.is_empty());
    let on: f64 = parts.next()?.trim().parse().ok()?;
    let off: f64 = match parts.next() {
        Some(p) => p.trim().parse().ok()?,
        None => on,
    };
    (on > 0.0 && off >= 0.0).then_some((on, off))
}

impl ChartRenderer for AreaTrendline {
    fn render<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        spec: &TrendlineSpec,
        tooltip: &dyn Fn(&TrendPoint) -> TooltipContent,
    ) -> Result<()> {
        let Some(((x_min, x_max), (y_min, y_max))) =
            data_bounds(&spec.data, spec.y_scale.include_zero)
        else {
            debug!("trendline has no data; leaving band empty");
            return Ok(());
        };
        let from = parse_hex_color(&spec.gradient.from)?;
        let to = parse_hex_color(&spec.gradient.to)?;
        let stroke = parse_hex_color(&spec.stroke)?;

        let m = spec.margin;
        let (w, h) = area.dim_in_pixel();
        if w <= m.left + m.right || h <= m.top + m.bottom {
            debug!("trendline band {w}x{h} is inside its margins; skipping");
            return Ok(());
        }
        let mut chart = ChartBuilder::on(area)
            .margin_top(m.top)
            .margin_right(m.right)
            .margin_bottom(m.bottom)
            .margin_left(m.left)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| anyhow!("{:?}", e))?;

        let mut points: Vec<(f64, f64)> = spec.data.iter().map(|p| (p.x as f64, p.y)).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let baseline = if spec.y_scale.include_zero { 0.0 } else { y_min };

        chart
            .draw_series(AreaSeries::new(
                points.clone(),
                baseline,
                rgb(from).filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;

        // Fade towards `to` from the top of the range down to the baseline.
        // The background is `to`-colored, so covering the whole band is safe.
        let steps = self.gradient_steps.max(2);
        let band = (y_max - baseline) / steps as f64;
        for i in 0..steps {
            let t = i as f64 / (steps - 1) as f64;
            let top = y_max - band * i as f64;
            let bottom = top - band;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x_min, top), (x_max, bottom)],
                    rgb(to).mix(t).filled(),
                )))
                .map_err(|e| anyhow!("{:?}", e))?;
        }

        chart
            .draw_series(LineSeries::new(
                points,
                rgb(stroke).stroke_width(self.stroke_width),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;

        if let Some(h) = spec.highlight {
            let plot = chart.plotting_area();
            let (_, plot_h) = plot.dim_in_pixel();
            let per_px = (y_max - y_min) / plot_h.max(1) as f64;
            let x = h.x as f64;
            let line = rgb(parse_hex_color(&spec.crosshair.stroke)?).stroke_width(1);
            let (on, off) = parse_dasharray(&spec.crosshair.stroke_dasharray).unwrap_or((1.0, 0.0));
            let (y_top, y_bottom) = if spec.crosshair.full_height {
                (y_max, y_min)
            } else {
                (h.y, baseline)
            };
            let mut y = y_top;
            while y > y_bottom {
                let y2 = (y - on * per_px).max(y_bottom);
                plot.draw(&PathElement::new(vec![(x, y), (x, y2)], line))
                    .map_err(|e| anyhow!("{:?}", e))?;
                y = y2 - off * per_px;
            }
            if spec.crosshair.show_horizontal_line {
                plot.draw(&PathElement::new(vec![(x_min, h.y), (x_max, h.y)], line))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
            let fill = rgb(parse_hex_color(&spec.crosshair.circle_fill)?);
            let ring = rgb(parse_hex_color(&spec.crosshair.circle_stroke)?);
            plot.draw(&Circle::new((x, h.y), 4, fill.filled()))
                .map_err(|e| anyhow!("{:?}", e))?;
            plot.draw(&Circle::new((x, h.y), 4, ring.stroke_width(1)))
                .map_err(|e| anyhow!("{:?}", e))?;

            let (bx, by) = chart.backend_coord(&(x, h.y));
            let (ax, ay) = area.get_base_pixel();
            self.draw_tooltip(area, (bx - ax, by - ay), &tooltip(&h))?;
        }
        Ok(())
    }
}

impl AreaTrendline {
    fn draw_tooltip<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        anchor: (i32, i32),
        content: &TooltipContent,
    ) -> Result<()> {
        const PAD_X: i32 = 8;
        const PAD_Y: i32 = 4;
        let font_px = self.tooltip_font_px as f64;
        let line_h = (font_px * 1.2).ceil() as i32;
        let text_w = estimate_text_width_px(&content.date, font_px)
            .max(estimate_text_width_px(&content.value, font_px) * BOLD_WIDTH_FACTOR)
            .ceil() as i32;
        let box_w = text_w + 2 * PAD_X;
        let box_h = 2 * line_h + 2 * PAD_Y;

        let (w, h) = area.dim_in_pixel();
        let (w, h) = (w as i32, h as i32);
        // right of the point unless that overflows
        let mut x0 = anchor.0 + 8;
        if x0 + box_w > w {
            x0 = anchor.0 - 8 - box_w;
        }
        let x0 = x0.max(0);
        let y0 = (anchor.1 - box_h / 2).clamp(0, (h - box_h).max(0));

        area.draw(&Rectangle::new([(x0, y0), (x0 + box_w, y0 + box_h)], WHITE.filled()))
            .map_err(|e| anyhow!("{:?}", e))?;
        area.draw(&Rectangle::new(
            [(x0, y0), (x0 + box_w, y0 + box_h)],
            RGBColor(204, 204, 204).stroke_width(1),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;

        let family = FontFamily::Name(self.family.as_str());
        let size = plotters_font_size(font_px);
        let date_style = TextStyle::from((family, size, FontStyle::Normal))
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Top));
        let value_style = TextStyle::from((family, size, FontStyle::Bold))
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Top));
        area.draw(&Text::new(
            content.date.as_str(),
            (x0 + PAD_X, y0 + PAD_Y),
            date_style,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        area.draw(&Text::new(
            content.value.as_str(),
            (x0 + PAD_X, y0 + PAD_Y + line_h),
            value_style,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_include_zero_when_asked() {
        let data = vec![TrendPoint::new(0, 10.0), TrendPoint::new(10, 30.0)];
        let ((x0, x1), (y0, y1)) = data_bounds(&data, true).unwrap();
        assert_eq!((x0, x1), (0.0, 10.0));
        assert_eq!((y0, y1), (0.0, 30.0));
        let (_, (y0, _)) = data_bounds(&data, false).unwrap();
        assert_eq!(y0, 10.0);
    }

    #[test]
    fn flat_single_point_is_padded() {
        let data = vec![TrendPoint::new(5, 3.0)];
        let ((x0, x1), (y0, y1)) = data_bounds(&data, false).unwrap();
        assert_eq!((x0, x1), (4.0, 6.0));
        assert_eq!((y0, y1), (2.0, 4.0));
        assert!(data_bounds(&[], true).is_none());
    }

    #[test]
    fn dasharray_parsing() {
        assert_eq!(parse_dasharray("5,2"), Some((5.0, 2.0)));
        assert_eq!(parse_dasharray("4"), Some((4.0, 4.0)));
        assert_eq!(parse_dasharray(""), None);
        assert_eq!(parse_dasharray("0,2"), None);
    }
}
