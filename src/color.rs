use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::FailureType;

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: failure type → Color32
// ---------------------------------------------------------------------------

/// Maps the failure types present in the dataset to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<FailureType, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the dataset's failure-type index.
    pub fn new(failure_types: &[FailureType]) -> Self {
        let palette = generate_palette(failure_types.len());
        let mapping: BTreeMap<FailureType, Color32> = failure_types
            .iter()
            .zip(palette)
            .map(|(ft, c): (&FailureType, Color32)| (*ft, c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a failure type.
    pub fn color_for(&self, failure_type: FailureType) -> Color32 {
        self.mapping
            .get(&failure_type)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Sequential ramp for the correlation heatmap
// ---------------------------------------------------------------------------

/// Map a correlation coefficient in [-1, 1] to a green ramp: light for the
/// low end, saturated dark for the high end. NaN cells get a neutral grey.
pub fn correlation_color(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::from_gray(60);
    }
    let t = ((r.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;
    let hsl = Hsl::new(130.0, 0.55, 0.92 - 0.62 * t);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Readable text colour for a heatmap cell with the given background value.
pub fn correlation_text_color(r: f64) -> Color32 {
    if !r.is_nan() && r > 0.2 {
        Color32::WHITE
    } else {
        Color32::BLACK
    }
}
