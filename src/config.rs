use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(50.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub margin: Margin,
    /// Size of the whole SVG, margins included.
    pub outer_width: f64,
    pub outer_height: f64,
    pub duration_ms: f64,
    pub label_fade_ms: f64,
    pub tick_count: usize,
    pub marker_radius: f64,
    pub path_stroke_width: f64,
    pub halo_stroke_width: f64,
    pub label_font_size: f64,
    pub axis_font_size: f64,
    pub axis_title_font_size: f64,
    pub x_title: String,
    pub y_title: String,
    pub animate: bool,
}

impl ChartConfig {
    /// Width of the plotting area inside the margins.
    pub fn inner_width(&self) -> f64 {
        (self.outer_width - self.margin.left - self.margin.right).max(1.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.outer_height - self.margin.top - self.margin.bottom).max(1.0)
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            outer_width: 850.0,
            outer_height: 600.0,
            duration_ms: 5000.0,
            label_fade_ms: 250.0,
            tick_count: 10,
            marker_radius: 4.0,
            path_stroke_width: 2.0,
            halo_stroke_width: 4.0,
            label_font_size: 10.0,
            axis_font_size: 10.0,
            axis_title_font_size: 14.0,
            x_title: "Miles driven per person".to_string(),
            y_title: "Cost per gallon".to_string(),
            animate: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pixel density multiplier for raster output.
    pub png_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { png_scale: 1.0 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub chart: ChartConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    chart: Option<ChartConfigFile>,
    png_scale: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    line_color: Option<String>,
    marker_fill: Option<String>,
    marker_stroke: Option<String>,
    label_color: Option<String>,
    halo_color: Option<String>,
    axis_text_color: Option<String>,
    grid_opacity: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartConfigFile {
    margin: Option<MarginFile>,
    width: Option<f64>,
    height: Option<f64>,
    duration: Option<f64>,
    label_fade: Option<f64>,
    tick_count: Option<usize>,
    marker_radius: Option<f64>,
    path_stroke_width: Option<f64>,
    halo_stroke_width: Option<f64>,
    label_font_size: Option<f64>,
    axis_font_size: Option<f64>,
    axis_title_font_size: Option<f64>,
    x_title: Option<String>,
    y_title: Option<String>,
    animate: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct MarginFile {
    top: Option<f64>,
    right: Option<f64>,
    bottom: Option<f64>,
    left: Option<f64>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => tracing::warn!(theme = other, "unknown theme, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.font_family {
            theme.font_family = v;
        }
        if let Some(v) = vars.background {
            theme.background = v;
        }
        if let Some(v) = vars.line_color {
            theme.line_color = v;
        }
        if let Some(v) = vars.marker_fill {
            theme.marker_fill = v;
        }
        if let Some(v) = vars.marker_stroke {
            theme.marker_stroke = v;
        }
        if let Some(v) = vars.label_color {
            theme.label_color = v;
        }
        if let Some(v) = vars.halo_color {
            theme.halo_color = v;
        }
        if let Some(v) = vars.axis_text_color {
            theme.axis_text_color = v;
        }
        if let Some(v) = vars.grid_opacity {
            theme.grid_opacity = v;
        }
    }

    if let Some(chart) = parsed.chart {
        let target = &mut config.chart;
        if let Some(margin) = chart.margin {
            if let Some(v) = margin.top {
                target.margin.top = v;
            }
            if let Some(v) = margin.right {
                target.margin.right = v;
            }
            if let Some(v) = margin.bottom {
                target.margin.bottom = v;
            }
            if let Some(v) = margin.left {
                target.margin.left = v;
            }
        }
        if let Some(v) = chart.width {
            target.outer_width = v;
        }
        if let Some(v) = chart.height {
            target.outer_height = v;
        }
        if let Some(v) = chart.duration {
            target.duration_ms = v.max(0.0);
        }
        if let Some(v) = chart.label_fade {
            target.label_fade_ms = v.max(0.0);
        }
        if let Some(v) = chart.tick_count {
            target.tick_count = v;
        }
        if let Some(v) = chart.marker_radius {
            target.marker_radius = v;
        }
        if let Some(v) = chart.path_stroke_width {
            target.path_stroke_width = v;
        }
        if let Some(v) = chart.halo_stroke_width {
            target.halo_stroke_width = v;
        }
        if let Some(v) = chart.label_font_size {
            target.label_font_size = v;
        }
        if let Some(v) = chart.axis_font_size {
            target.axis_font_size = v;
        }
        if let Some(v) = chart.axis_title_font_size {
            target.axis_title_font_size = v;
        }
        if let Some(v) = chart.x_title {
            target.x_title = v;
        }
        if let Some(v) = chart.y_title {
            target.y_title = v;
        }
        if let Some(v) = chart.animate {
            target.animate = v;
        }
    }

    if let Some(v) = parsed.png_scale {
        config.render.png_scale = v.max(0.1);
    }

    Ok(config)
}
