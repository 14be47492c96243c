//! bignum_rs
//!
//! Lay out and render "big number" KPI widgets: one prominent value, a
//! subheader, and an optional trendline. Pairs with the `bignum` CLI.
//!
//! ### Features
//! - Largest-font-that-fits search against a measurement host (glyph
//!   metrics from a TTF, or a deterministic estimator)
//! - Proportional band layout for header, subheader and chart
//! - Number and date formatting for the value and the chart tooltip
//! - SVG/PNG output with an area trendline and pinned crosshair
//!
//! ### Example
//! ```no_run
//! use bignum_rs::{BigNumberWidget, WidgetConfig};
//! use bignum_rs::fit::EstimateHost;
//!
//! let cfg = WidgetConfig {
//!     big_number: Some(2634.0),
//!     subheader: Some("-86.2% (2015 Q1 - 2018 Q3)".into()),
//!     ..WidgetConfig::default()
//! };
//! let host = EstimateHost::new(cfg.style_sheet.clone());
//! let widget = BigNumberWidget::new(cfg);
//! let tree = bignum_rs::render::render_widget(&widget, &host, "kpi.svg")?;
//! println!("{}", serde_json::to_string_pretty(&tree)?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod fit;
pub mod format;
pub mod layout;
pub mod models;
pub mod render;
pub mod storage;
pub mod style;
pub mod tree;

pub use compose::BigNumberWidget;
pub use config::WidgetConfig;
pub use error::{ConfigError, SurfaceError};
pub use fit::{TextFitter, compute_max_font_size};
pub use layout::{Bands, proportion};
pub use models::{SizingRequest, SizingResult, TrendPoint};
pub use tree::VisualTree;
