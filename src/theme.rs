//! Dark navy theme for the backdrop canvas and its stats overlay

use egui::Color32;

use crate::core::Rgba;

pub mod colors {
    use super::Color32;

    // === Backgrounds ===
    pub const BG_PRIMARY: Color32 = Color32::from_rgb(10, 14, 26);        // #0A0E1A - page background
    pub const BG_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 140);

    // === Text ===
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(226, 232, 240);   // #E2E8F0
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(100, 116, 139);     // #64748B
}

impl From<Rgba> for Color32 {
    fn from(c: Rgba) -> Self {
        Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
    }
}

/// Visuals with transparent panels so only the backdrop paints the canvas
pub fn backdrop_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = Color32::TRANSPARENT;
    visuals.window_fill = BG_OVERLAY;
    visuals.extreme_bg_color = BG_PRIMARY;
    visuals.override_text_color = Some(TEXT_PRIMARY);

    // Flat, no shadows
    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}
