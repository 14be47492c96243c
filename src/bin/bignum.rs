use anyhow::{Result, bail};
use bignum_rs::config::{FontConfig, WidgetConfig};
use bignum_rs::fit::{AnyHost, FitOptions, FitStrategy, TextFitter};
use bignum_rs::layout::proportion;
use bignum_rs::models::SizingRequest;
use bignum_rs::style::{BASE_CLASS, HEADER_CLASS, StyleSheet};
use bignum_rs::{BigNumberWidget, render, storage};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bignum",
    version,
    about = "Lay out, fit & render big number KPI widgets"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a widget and write it as SVG or PNG.
    Render(RenderArgs),
    /// Print the largest font size at which a text fits a box.
    Fit(FitArgs),
    /// Print the band heights for a widget height.
    Layout(LayoutArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    Bisect,
    Descend,
}

impl From<Strategy> for FitStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Bisect => FitStrategy::Bisect,
            Strategy::Descend => FitStrategy::Descend,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Widget configuration (JSON). Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Trendline series (.csv with x,y header, or .json).
    #[arg(long)]
    data: Option<PathBuf>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// The big number itself.
    #[arg(long, allow_hyphen_values = true)]
    value: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    subheader: Option<String>,
    /// Text-only mode.
    #[arg(long, default_value_t = false)]
    no_trendline: bool,
    /// Main color as #rgb or #rrggbb.
    #[arg(long)]
    color: Option<String>,
    /// Regular TTF/OTF face; enables glyph metrics.
    #[arg(long)]
    font: Option<PathBuf>,
    #[arg(long)]
    bold_font: Option<PathBuf>,
    /// Pin the crosshair at this timestamp (ms), snapped to the nearest point.
    #[arg(long, allow_hyphen_values = true)]
    highlight: Option<i64>,
    /// Also write the composed tree as JSON.
    #[arg(long)]
    tree_json: Option<PathBuf>,
    /// Output file (.svg or .png).
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FitArgs {
    #[arg(long, allow_hyphen_values = true)]
    text: String,
    #[arg(long)]
    width: f64,
    #[arg(long)]
    height: f64,
    /// Text class to measure with.
    #[arg(long, default_value = HEADER_CLASS)]
    class: String,
    #[arg(long)]
    font: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Strategy::Bisect)]
    strategy: Strategy,
    /// Search precision in px.
    #[arg(long, default_value_t = 1.0)]
    step: f64,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[arg(long)]
    height: u32,
    #[arg(long, default_value_t = false)]
    no_trendline: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fit(args) => cmd_fit(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let mut cfg = match args.config.as_ref() {
        Some(path) => WidgetConfig::load(path)?,
        None => WidgetConfig::default(),
    };
    if let Some(path) = args.data.as_ref() {
        cfg.trend_line_data = storage::load_series(path)?;
    }
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    if let Some(v) = args.value {
        cfg.big_number = Some(v);
    }
    if let Some(s) = args.subheader {
        cfg.subheader = Some(s);
    }
    if args.no_trendline {
        cfg.show_trend_line = false;
    }
    if let Some(c) = args.color {
        cfg.main_color = c;
    }
    if let Some(f) = args.font {
        cfg.fonts.regular = Some(f);
    }
    if let Some(f) = args.bold_font {
        cfg.fonts.bold = Some(f);
    }
    if args.highlight.is_some() {
        cfg.highlight_x = args.highlight;
    }
    cfg.validate()?;

    if !render::is_svg_path(&args.out) && cfg.fonts.regular.is_none() {
        bail!("PNG output rasterizes text and needs --font (or use a .svg output)");
    }

    let host = AnyHost::from_fonts(&cfg.fonts, cfg.style_sheet.clone())?;
    if !host.is_glyph() {
        eprintln!("No --font given; text sizes use estimated metrics");
    }
    let widget = BigNumberWidget::new(cfg);
    let tree = render::render_widget(&widget, &host, &args.out)?;
    eprintln!("Wrote widget to {}", args.out.display());

    if let Some(path) = args.tree_json.as_ref() {
        storage::save_tree_json(&tree, path)?;
        eprintln!("Saved layout tree to {}", path.display());
    }
    Ok(())
}

fn cmd_fit(args: FitArgs) -> Result<()> {
    let fonts = FontConfig {
        regular: args.font,
        ..FontConfig::default()
    };
    let host = AnyHost::from_fonts(&fonts, StyleSheet::default())?;
    let fitter = TextFitter::new(FitOptions {
        step_px: args.step,
        strategy: args.strategy.into(),
        ..FitOptions::default()
    });
    let req = SizingRequest::new(args.text, args.width, args.height, args.class);
    let r = fitter.fit(&host, BASE_CLASS, &req)?;
    println!("{}", r.font_size);
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> Result<()> {
    let b = proportion(args.height, !args.no_trendline);
    println!("header={}", b.header);
    println!("subheader={}", b.subheader);
    match b.chart {
        Some(c) => println!("chart={c}"),
        None => println!("chart=none"),
    }
    println!("text_container={}", b.text_container);
    Ok(())
}
