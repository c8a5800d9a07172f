use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Width of a single line of text, or `None` when no usable font was found.
pub fn measure_text_width(text: &str, font_size: f64, font_family: &str) -> Option<f64> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

/// Rough width used when no font can be loaded.
pub fn fallback_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * FALLBACK_ADVANCE_EM
}

const FALLBACK_ADVANCE_EM: f64 = 0.56;

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<FontMetrics>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f64, font_family: &str) -> Option<f64> {
        let key = normalize_family_key(font_family);
        if !self.cache.contains_key(&key) {
            let metrics = self.load_metrics(&key);
            if metrics.is_none() {
                tracing::debug!(family = %key, "no font found, using fallback widths");
            }
            self.cache.insert(key.clone(), metrics);
        }
        self.cache
            .get(&key)
            .and_then(|metrics| metrics.as_ref())
            .map(|metrics| metrics.width(text, font_size))
    }

    fn load_metrics(&mut self, font_family: &str) -> Option<FontMetrics> {
        let names: Vec<&str> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\''))
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names.iter().map(|name| family_token(name)).collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| {
                Face::parse(data, index).ok().map(|face| FontMetrics::from_face(&face))
            })
            .flatten()
    }
}

fn family_token(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => Family::Serif,
        "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => Family::SansSerif,
        "monospace" | "ui-monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}

/// Advance widths for the ASCII range; labels here are years and short
/// axis titles, so anything else takes the fallback advance.
struct FontMetrics {
    units_per_em: f64,
    ascii_advances: [u16; 128],
}

impl FontMetrics {
    fn from_face(face: &Face<'_>) -> Self {
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Self {
            units_per_em: f64::from(face.units_per_em().max(1)),
            ascii_advances,
        }
    }

    fn width(&self, text: &str, font_size: f64) -> f64 {
        let scale = font_size / self.units_per_em;
        let fallback = font_size * FALLBACK_ADVANCE_EM;
        text.chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| {
                let advance = if ch.is_ascii() {
                    self.ascii_advances[ch as usize]
                } else {
                    0
                };
                if advance == 0 {
                    fallback
                } else {
                    f64::from(advance) * scale
                }
            })
            .sum()
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_width() {
        assert_eq!(measure_text_width("", 10.0, "sans-serif"), Some(0.0));
    }

    #[test]
    fn fallback_scales_with_length_and_size() {
        assert_eq!(fallback_text_width("1956", 10.0), 4.0 * 10.0 * FALLBACK_ADVANCE_EM);
        assert!(fallback_text_width("1956", 20.0) > fallback_text_width("1956", 10.0));
    }

    #[test]
    fn measured_width_grows_with_text() {
        if let (Some(short), Some(long)) = (
            measure_text_width("19", 10.0, "sans-serif"),
            measure_text_width("1956", 10.0, "sans-serif"),
        ) {
            assert!(long > short);
        }
    }
}
