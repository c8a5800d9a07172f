use crate::config::{Config, load_config};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_csv;
use crate::render::{render_html, render_svg, write_output, write_output_png};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cscat",
    version,
    about = "Render a CSV of (year, miles, gas, side) rows as a self-revealing connected scatterplot"
)]
pub struct Args {
    /// Input file (.csv) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/html/png). Defaults to stdout for text formats.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, chart)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Outer width, margins included
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Outer height, margins included
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Reveal duration in milliseconds
    #[arg(long = "duration")]
    pub duration: Option<f64>,

    /// Render the final frame without animation
    #[arg(long = "static")]
    pub static_frame: bool,

    /// Write the computed layout as JSON to this path
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Html,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())
        .with_context(|| "failed to load config file")?;
    apply_overrides(&mut config, &args);

    let input = read_input(args.input.as_deref())?;
    let data = parse_csv(&input)?;
    tracing::info!(rows = data.len(), "parsed input");

    let layout = compute_layout(&data, &config.theme, &config.chart);
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout)?;
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.chart);
            write_output(&svg, args.output.as_deref())?;
        }
        OutputFormat::Html => {
            let svg = render_svg(&layout, &config.theme, &config.chart);
            let html = render_html(&svg, &config.chart.x_title);
            write_output(&html, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            // Raster output is a single frame, so show the finished chart.
            let mut chart = config.chart.clone();
            chart.animate = false;
            let svg = render_svg(&layout, &config.theme, &chart);
            write_output_png(&svg, &output, &config.render)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(width) = args.width {
        config.chart.outer_width = width;
    }
    if let Some(height) = args.height {
        config.chart.outer_height = height;
    }
    if let Some(duration) = args.duration {
        config.chart.duration_ms = duration.max(0.0);
    }
    if args.static_frame {
        config.chart.animate = false;
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
