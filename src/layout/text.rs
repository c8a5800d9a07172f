use crate::text_metrics;

pub(super) fn label_width(text: &str, font_size: f64, font_family: &str) -> f64 {
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| text_metrics::fallback_text_width(text, font_size))
}
