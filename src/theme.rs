use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub line_color: String,
    pub marker_fill: String,
    pub marker_stroke: String,
    pub label_color: String,
    pub halo_color: String,
    pub axis_text_color: String,
    pub grid_opacity: f32,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            line_color: "black".to_string(),
            marker_fill: "white".to_string(),
            marker_stroke: "black".to_string(),
            label_color: "black".to_string(),
            halo_color: "white".to_string(),
            axis_text_color: "currentColor".to_string(),
            grid_opacity: 0.1,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            line_color: "#1C2430".to_string(),
            marker_fill: "#F8FAFF".to_string(),
            marker_stroke: "#1C2430".to_string(),
            label_color: "#1C2430".to_string(),
            halo_color: "#FFFFFF".to_string(),
            axis_text_color: "#7A8AA6".to_string(),
            grid_opacity: 0.12,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
