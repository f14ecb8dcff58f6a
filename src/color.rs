use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::query::Label;

// ---------------------------------------------------------------------------
// Status colours
// ---------------------------------------------------------------------------

pub const FRAUD: Color32 = Color32::from_rgb(0xF4, 0x43, 0x36);
pub const LEGIT: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);
pub const WARNING: Color32 = Color32::from_rgb(0xFF, 0xA0, 0x00);

/// Accent colour for a prediction label.
pub fn label_color(label: Label) -> Color32 {
    match label {
        Label::Fraudulent => FRAUD,
        Label::Legitimate => LEGIT,
    }
}

/// Pale background of the same hue, for alert boxes.
pub fn tint(color: Color32, lightness: f32) -> Color32 {
    let rgb = Srgb::new(
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
    );
    let mut hsl: Hsl = rgb.into_color();
    hsl.lightness = lightness.clamp(0.0, 1.0);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_keeps_hue_and_lightens() {
        let pale = tint(FRAUD, 0.93);
        assert!(pale.r() > pale.g() && pale.r() > pale.b());
        assert!(pale.g() > FRAUD.g());
    }

    #[test]
    fn full_lightness_is_white() {
        assert_eq!(tint(LEGIT, 1.0), Color32::WHITE);
    }
}
