//! Stats overlay - fps and entity counts in the top-right corner

use eframe::egui;
use crate::theme::colors;
use super::BackdropApp;

impl BackdropApp {
    pub(crate) fn draw_overlay(&self, ctx: &egui::Context) {
        let stats = self.backdrop.stats();

        egui::Area::new(egui::Id::new("backdrop_stats"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 8.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(colors::BG_OVERLAY)
                    .corner_radius(4.0)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        let status = if stats.running { "running" } else { "paused" };
                        ui.label(
                            egui::RichText::new(format!(
                                "{} / {}",
                                stats.variant.label(),
                                status
                            ))
                            .color(colors::TEXT_PRIMARY)
                            .monospace(),
                        );
                        ui.label(
                            egui::RichText::new(format!("{:.0} fps", self.fps_counter.fps()))
                                .color(colors::TEXT_MUTED)
                                .monospace(),
                        );
                        ui.label(
                            egui::RichText::new(format!(
                                "{} points / {} edges / {} signals",
                                stats.points, stats.edges, stats.signals
                            ))
                            .color(colors::TEXT_MUTED)
                            .monospace(),
                        );
                    });
            });
    }
}
