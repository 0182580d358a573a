use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::ContentType;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(hue, 0.75, 0.55)
        })
        .collect()
}

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// Fixed colour per content type so every chart agrees on them.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    by_type: BTreeMap<ContentType, Color32>,
    default_color: Color32,
    /// Colour of single-series bar charts (countries, genres, ratings).
    pub accent: Color32,
}

impl SeriesColors {
    pub fn new() -> Self {
        let palette = generate_palette(ContentType::ALL.len());
        let by_type = ContentType::ALL.into_iter().zip(palette).collect();

        SeriesColors {
            by_type,
            default_color: Color32::GRAY,
            accent: hsl_to_color32(0.0, 0.70, 0.45),
        }
    }

    pub fn color_for(&self, content_type: ContentType) -> Color32 {
        self.by_type
            .get(&content_type)
            .copied()
            .unwrap_or(self.default_color)
    }
}

impl Default for SeriesColors {
    fn default() -> Self {
        Self::new()
    }
}
