//! eframe app hosting the backdrop on the page canvas
//!
//! egui's repaint scheduling is the frame primitive: a repaint is requested
//! only while the backdrop's loop runs, so an off-screen canvas costs nothing
//! until the visibility observer wakes the context again.

mod overlay;
mod painter;

use eframe::egui;
use tracing::{info, warn};

use crate::core::{Backdrop, BackdropConfig, FpsCounter};
use crate::theme::backdrop_visuals;
use crate::time::now_seconds;
use crate::web::VisibilityObserver;

use painter::PainterSurface;

pub struct BackdropApp {
    pub(crate) backdrop: Backdrop,
    pub(crate) fps_counter: FpsCounter,
    /// Intersection of the canvas with the viewport (None if unsupported)
    visibility: Option<VisibilityObserver>,
}

impl BackdropApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: BackdropConfig,
        canvas: &web_sys::HtmlCanvasElement,
    ) -> Self {
        cc.egui_ctx.set_visuals(backdrop_visuals());

        let visibility = match VisibilityObserver::observe(canvas, cc.egui_ctx.clone()) {
            Ok(observer) => Some(observer),
            Err(e) => {
                warn!(?e, "IntersectionObserver unavailable, animating unconditionally");
                None
            }
        };

        info!(variant = config.variant.label(), seed = ?config.seed, "Starting backdrop");

        let backdrop = Backdrop::from_config(config).unwrap_or_else(|e| {
            warn!(error = %e, "Rejected backdrop config, using defaults");
            Backdrop::default()
        });

        Self {
            backdrop,
            fps_counter: FpsCounter::new(),
            visibility,
        }
    }

    fn is_visible(&self, ctx: &egui::Context) -> bool {
        let on_screen = self.visibility.as_ref().map_or(true, |v| v.is_visible());
        let minimized = ctx.input(|i| i.viewport().minimized.unwrap_or(false));
        on_screen && !minimized
    }
}

impl eframe::App for BackdropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visible = self.is_visible(ctx);
        if visible != self.backdrop.is_visible() {
            self.fps_counter.reset();
        }
        self.backdrop.set_visible(visible);

        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;

                self.backdrop.resize(rect.width(), rect.height());

                match ctx.input(|i| i.pointer.hover_pos()) {
                    Some(pos) if rect.contains(pos) => {
                        let local = pos - rect.min;
                        self.backdrop.pointer_moved(local.x, local.y);
                    }
                    _ => self.backdrop.pointer_left(),
                }

                let mut surface = PainterSurface::new(&painter, rect.min);
                if self.backdrop.frame(&mut surface) {
                    self.fps_counter.tick(now_seconds() * 1000.0);
                    ctx.request_repaint();
                }
            });

        if self.backdrop.config().show_stats {
            self.draw_overlay(ctx);
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }
}
