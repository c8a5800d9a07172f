#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{ChartConfig, Config, Margin};
pub use error::ChartError;
pub use ir::{DataPoint, Dataset, Side};
pub use layout::{ChartLayout, compute_layout};
pub use parser::parse_csv;
pub use render::{render_html, render_svg};
pub use theme::Theme;

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub chart: ChartConfig,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            chart: ChartConfig::default(),
        }
    }
}

/// CSV text in, animated SVG out, with the default look.
pub fn render(csv: &str) -> Result<String, ChartError> {
    render_with_options(csv, RenderOptions::default())
}

pub fn render_with_options(csv: &str, options: RenderOptions) -> Result<String, ChartError> {
    let data = parse_csv(csv)?;
    let layout = compute_layout(&data, &options.theme, &options.chart);
    Ok(render_svg(&layout, &options.theme, &options.chart))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_csv_end_to_end() {
        let svg = render("year,miles,gas,side\n2000,0,1,top\n2005,50,2,right\n2010,100,1.5,bottom\n")
            .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("2010"));
    }

    #[test]
    fn surfaces_validation_errors() {
        let err = render("year,miles,gas,side\n2000,0,1,diagonal\n").unwrap_err();
        assert!(err.to_string().contains("diagonal"));
    }
}
