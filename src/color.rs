use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Pillar;

// ---------------------------------------------------------------------------
// Fixed colours
// ---------------------------------------------------------------------------

pub const ENVIRONMENTAL: Color32 = Color32::from_rgb(0x2c, 0xa0, 0x2c);
pub const SOCIAL: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);
pub const GOVERNANCE: Color32 = Color32::from_rgb(0xff, 0x7f, 0x0e);
pub const COMBINED: Color32 = Color32::from_rgb(0x94, 0x67, 0xbd);
/// Reference "Overall Average" line.
pub const AVERAGE: Color32 = Color32::from_rgb(0xFF, 0xD7, 0x00);

pub const BACKGROUND: Color32 = Color32::from_rgb(0x11, 0x11, 0x11);
pub const CARD_FILL: Color32 = Color32::from_rgb(0x1c, 0x1c, 0x1c);

pub fn pillar_color(pillar: Pillar) -> Color32 {
    match pillar {
        Pillar::Environmental => ENVIRONMENTAL,
        Pillar::Social => SOCIAL,
        Pillar::Governance => GOVERNANCE,
    }
}

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
// Color mapping: label → Color32
// ---------------------------------------------------------------------------

/// Maps a fixed set of labels (company names, topics) to distinct colours so
/// a label keeps its colour while filters change.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map over the given labels; duplicates share a colour.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut mapping: BTreeMap<String, Color32> =
            labels.into_iter().map(|l| (l.into(), Color32::GRAY)).collect();
        let palette = generate_palette(mapping.len());
        for (slot, c) in mapping.values_mut().zip(palette) {
            *slot = c;
        }
        ColorMap { mapping }
    }

    /// Look up the colour for a label, grey if unknown.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}
