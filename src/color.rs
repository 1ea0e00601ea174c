use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Categorical palette for trend lines
// ---------------------------------------------------------------------------

/// `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

/// Stable state → colour assignment for the trend chart legend.
#[derive(Debug, Clone, Default)]
pub struct SeriesColors {
    mapping: BTreeMap<String, Color32>,
}

impl SeriesColors {
    pub fn new(states: &BTreeSet<String>) -> Self {
        let mapping = states
            .iter()
            .cloned()
            .zip(generate_palette(states.len()))
            .collect();
        SeriesColors { mapping }
    }

    pub fn color_for(&self, state: &str) -> Color32 {
        self.mapping.get(state).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Continuous scale for the choropleth
// ---------------------------------------------------------------------------

/// Pale yellow at `min` through orange to deep red at `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateScale {
    pub min: f64,
    pub max: f64,
}

impl RateScale {
    /// Bounds of `values`, or `None` if there are none.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(RateScale { min: v, max: v }),
            Some(s) => Some(RateScale {
                min: s.min.min(v),
                max: s.max.max(v),
            }),
        })
    }

    /// Position of `value` in `[0, 1]`. A flat scale maps everything to 1.
    pub fn fraction(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 1.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let t = self.fraction(value);
        hsl_to_color32(55.0 * (1.0 - t), 0.9, 0.85 - 0.5 * t)
    }
}
