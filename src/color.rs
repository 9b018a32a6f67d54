use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Bar colour for the leading category.
pub const HIGHLIGHT: Color32 = Color32::from_rgb(0x90, 0xCA, 0xF9);

/// Bar colour for every other category.
pub const MUTED: Color32 = Color32::from_rgb(0xD3, 0xD3, 0xD3);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting at the highlight blue.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (207.0 + (i as f32 / n as f32) * 360.0) % 360.0;
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

/// Colours for a bar chart sorted largest first: the first bar is
/// highlighted, the rest are muted.
pub fn ranked_bar_colors(n: usize) -> Vec<Color32> {
    (0..n).map(|i| if i == 0 { HIGHLIGHT } else { MUTED }).collect()
}
