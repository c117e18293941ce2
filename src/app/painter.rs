//! `Surface` implementation on top of an egui painter

use eframe::egui;

use crate::core::{Rgba, Surface, Vec2};
use crate::theme::colors;

/// Draws backdrop commands into the painter's rect. Backdrop coordinates
/// are relative to `origin` (the rect's top-left corner).
pub(crate) struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a egui::Painter, origin: egui::Pos2) -> Self {
        Self { painter, origin }
    }

    fn to_screen(&self, p: Vec2) -> egui::Pos2 {
        self.origin + egui::vec2(p.x, p.y)
    }
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self) {
        // egui rebuilds every shape each pass, so clearing means painting the background
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, colors::BG_PRIMARY);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.painter
            .circle_filled(self.to_screen(center), radius, egui::Color32::from(color));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            egui::Stroke::new(width, egui::Color32::from(color)),
        );
    }
}
