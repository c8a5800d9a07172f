use connected_scatter::{RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    duration: Option<f64>,
    animate: Option<bool>,
}

fn build_render_options(options: ChartRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(width) = options.width {
        render_options.chart.outer_width = width;
    }
    if let Some(height) = options.height {
        render_options.chart.outer_height = height;
    }
    if let Some(duration) = options.duration {
        render_options.chart.duration_ms = duration.max(0.0);
    }
    if let Some(animate) = options.animate {
        render_options.chart.animate = animate;
    }

    render_options
}

/// Returns SVG markup for the page to drop into its `.chart` container.
#[wasm_bindgen]
pub fn render_chart_svg(csv: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ChartRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ChartRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(csv, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use connected_scatter::render_with_options;

    use crate::{ChartRenderOptions, build_render_options};

    #[test]
    fn renders_three_point_chart_with_reveal() {
        let csv = "year,miles,gas,side\n2000,0,1,top\n2005,50,2,right\n2010,100,1.5,bottom\n";

        let svg = render_with_options(csv, build_render_options(ChartRenderOptions::default()))
            .expect("three point chart should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("2005"));
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn options_override_defaults() {
        let options: ChartRenderOptions =
            serde_json::from_str(r#"{"theme":"modern","width":400,"animate":false}"#).unwrap();
        let render_options = build_render_options(options);
        assert_eq!(render_options.chart.outer_width, 400.0);
        assert!(!render_options.chart.animate);
        assert_eq!(render_options.theme.font_family, connected_scatter::Theme::modern().font_family);
    }
}
