use std::collections::HashMap;
use std::str::FromStr;

use eframe::egui::Color32;
use log::warn;
use palette::{Hsl, IntoColor, Srgb};

use crate::config::DashboardConfig;

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

/// Parse `#rrggbb` / `#rgb` (leading `#` optional).
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let rgb = Srgb::<u8>::from_str(hex.trim()).ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

// ---------------------------------------------------------------------------
// Purpose palette: curated purpose → Color32
// ---------------------------------------------------------------------------

/// Series colours, fixed once at startup and only ever read afterwards.
///
/// Curated purposes take the palette colour at their display position,
/// cycling when there are more purposes than colours.
#[derive(Debug, Clone)]
pub struct PurposePalette {
    colors: Vec<Color32>,
    by_purpose: HashMap<String, Color32>,
    default_color: Color32,
}

impl PurposePalette {
    pub fn new(purposes: &[String], hex_colors: &[String]) -> Self {
        let mut colors: Vec<Color32> = hex_colors
            .iter()
            .filter_map(|hex| {
                let parsed = parse_hex(hex);
                if parsed.is_none() {
                    warn!("ignoring invalid palette colour {hex:?}");
                }
                parsed
            })
            .collect();
        if colors.is_empty() {
            colors = generate_palette(purposes.len().max(1));
        }

        let by_purpose = purposes
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), colors[i % colors.len()]))
            .collect();

        PurposePalette {
            colors,
            by_purpose,
            default_color: Color32::GRAY,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(&config.curated_purposes, &config.palette)
    }

    /// The `i`-th palette colour, cycling.
    pub fn color(&self, i: usize) -> Color32 {
        self.colors[i % self.colors.len()]
    }

    /// Colour assigned to a curated purpose; gray for anything else.
    pub fn color_for(&self, purpose: &str) -> Color32 {
        self.by_purpose
            .get(purpose)
            .copied()
            .unwrap_or(self.default_color)
    }
}
