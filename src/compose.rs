//! Assembling one widget: bands, fitted text lines, and the trendline band.

use log::debug;
use uuid::Uuid;

use crate::config::WidgetConfig;
use crate::error::SurfaceError;
use crate::fit::{FitCache, MeasureHost, TextFitter};
use crate::format::{TooltipContent, render_tooltip};
use crate::layout::{Bands, proportion};
use crate::models::{SizingRequest, TrendPoint};
use crate::style::{
    HEADER_CLASS, Rgb8, SUBHEADER_CLASS, TEXT_CONTAINER_CLASS, widget_class_name,
};
use crate::tree::{
    CHART_MARGIN, CrosshairStyle, GradientFill, Node, TextLine, TrendlineSpec, VisualTree, XScale,
    YScale,
};

/// A widget instance: configuration plus identifiers that stay stable across
/// layout passes.
#[derive(Debug)]
pub struct BigNumberWidget {
    config: WidgetConfig,
    gradient_id: String,
    fitter: TextFitter,
    cache: FitCache,
}

impl BigNumberWidget {
    pub fn new(config: WidgetConfig) -> Self {
        let fitter = TextFitter::new(config.fit);
        Self {
            config,
            gradient_id: Uuid::new_v4().simple().to_string(),
            fitter,
            cache: FitCache::new(),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn gradient_id(&self) -> &str {
        &self.gradient_id
    }

    pub fn class_name(&self) -> String {
        widget_class_name(&self.config.class_name, self.config.show_trend_line)
    }

    pub fn bands(&self) -> Bands {
        proportion(self.config.height, self.config.show_trend_line)
    }

    pub fn header_text(&self) -> String {
        self.config
            .big_number
            .map(|v| self.config.number_format.format(v))
            .unwrap_or_default()
    }

    pub fn tooltip(&self, datum: &TrendPoint) -> TooltipContent {
        render_tooltip(&self.config.number_format, datum)
    }

    /// One layout pass.
    pub fn compose<H: MeasureHost + ?Sized>(&self, host: &H) -> Result<VisualTree, SurfaceError> {
        let cfg = &self.config;
        let class_name = self.class_name();
        let bands = self.bands();
        let max_width = cfg.width as f64;

        let header = self.text_line(
            host,
            &class_name,
            HEADER_CLASS,
            self.header_text(),
            max_width,
            bands.header,
        )?;
        let subheader = self.text_line(
            host,
            &class_name,
            SUBHEADER_CLASS,
            cfg.subheader.clone().unwrap_or_default(),
            max_width,
            bands.subheader,
        )?;
        debug!(
            "composed .{class_name}: header {}px, subheader {}px, bands {:?}",
            header.font_size, subheader.font_size, bands
        );

        let tree = match bands.chart {
            Some(chart_height) => VisualTree {
                class_name,
                width: cfg.width,
                height: None,
                children: vec![
                    Node::TextContainer {
                        class_name: TEXT_CONTAINER_CLASS.to_string(),
                        height: bands.text_container,
                        children: vec![Node::TextLine(header), Node::TextLine(subheader)],
                    },
                    Node::Trendline(Box::new(self.trendline_spec(chart_height))),
                ],
            },
            None => VisualTree {
                class_name,
                width: cfg.width,
                height: Some(cfg.height),
                children: vec![Node::TextLine(header), Node::TextLine(subheader)],
            },
        };
        Ok(tree)
    }

    fn text_line<H: MeasureHost + ?Sized>(
        &self,
        host: &H,
        container_class: &str,
        text_class: &str,
        text: String,
        max_width: f64,
        band: u32,
    ) -> Result<TextLine, SurfaceError> {
        let req = SizingRequest::new(text, max_width.floor(), band as f64, text_class);
        let fitted = self.cache.fit(&self.fitter, host, container_class, &req)?;
        Ok(TextLine {
            class_name: text_class.to_string(),
            text: req.text,
            font_size: fitted.font_size,
            height: band,
        })
    }

    fn trendline_spec(&self, height: u32) -> TrendlineSpec {
        let cfg = &self.config;
        let gradient = GradientFill {
            id: self.gradient_id.clone(),
            from: cfg.main_color.clone(),
            to: Rgb8::WHITE.to_hex(),
        };
        TrendlineSpec {
            aria_label: format!(
                "Big number visualization {}",
                cfg.subheader.as_deref().unwrap_or_default()
            ),
            width: cfg.width,
            height,
            margin: CHART_MARGIN,
            x_scale: XScale::TimeUtc,
            y_scale: YScale {
                include_zero: cfg.start_y_axis_at_zero,
            },
            data: cfg.trend_line_data.clone(),
            fill: gradient.url(),
            gradient,
            stroke: cfg.main_color.clone(),
            crosshair: CrosshairStyle {
                stroke: cfg.main_color.clone(),
                circle_fill: cfg.main_color.clone(),
                circle_stroke: Rgb8::WHITE.to_hex(),
                show_horizontal_line: false,
                full_height: true,
                stroke_dasharray: "5,2".to_string(),
            },
            snap_tooltip_to_data_x: true,
            highlight: cfg
                .highlight_x
                .and_then(|x| snap_to_data_x(&cfg.trend_line_data, x)),
        }
    }
}

/// Datum whose `x` is closest to `x`; earlier points win ties.
pub fn snap_to_data_x(data: &[TrendPoint], x: i64) -> Option<TrendPoint> {
    data.iter().copied().min_by_key(|p| p.x.abs_diff(x))
}
