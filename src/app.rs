use crate::canvas::Color;
use crate::controller::{CanvasController, NoticeKind, Submission};
use crate::eval::client::{Evaluator, HttpEvaluator};
use crate::eval::protocol::ExpressionResult;
use crate::settings::Settings;
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

const RESULT_FONT: f32 = 24.0;

type EvalOutcome = (u64, anyhow::Result<Vec<ExpressionResult>>);

pub struct InkCalcApp {
    controller: CanvasController,
    evaluator: Arc<dyn Evaluator>,
    outcome_tx: Sender<EvalOutcome>,
    outcome_rx: Receiver<EvalOutcome>,
    settings: Settings,
    color_index: usize,
    surface_tex: Option<egui::TextureHandle>,
    surface_tex_revision: u64,
}

impl InkCalcApp {
    pub fn new(settings: Settings) -> Self {
        let (outcome_tx, outcome_rx) = std::sync::mpsc::channel();
        let controller = CanvasController::new(
            800,
            600,
            settings.stroke_width,
            settings.overlay_delay(),
        );
        let evaluator: Arc<dyn Evaluator> = Arc::new(HttpEvaluator::new(&settings.backend_url));
        Self {
            controller,
            evaluator,
            outcome_tx,
            outcome_rx,
            settings,
            color_index: 0,
            surface_tex: None,
            surface_tex_revision: 0,
        }
    }

    fn palette() -> [Color; 6] {
        [
            Color::rgb(255, 255, 255),
            Color::rgb(231, 76, 60),
            Color::rgb(241, 196, 15),
            Color::rgb(46, 204, 113),
            Color::rgb(52, 152, 219),
            Color::rgb(230, 126, 34),
        ]
    }

    fn dispatch_submission(&mut self) {
        match self.controller.submit_for_evaluation(Instant::now()) {
            Submission::Dispatch { epoch, request } => {
                let evaluator = Arc::clone(&self.evaluator);
                let tx = self.outcome_tx.clone();
                std::thread::spawn(move || {
                    let outcome = evaluator.evaluate(&request);
                    let _ = tx.send((epoch, outcome));
                });
            }
            // Rejections surface through the notice queue or are silent by
            // design (the submit button is disabled while pending).
            Submission::AlreadyPending
            | Submission::NothingDrawn
            | Submission::EncodeFailed => {}
        }
    }

    fn drain_outcomes(&mut self, now: Instant) {
        while let Ok((epoch, outcome)) = self.outcome_rx.try_recv() {
            self.controller.apply_evaluation(epoch, outcome, now);
        }
    }

    fn show_notices(&mut self, toasts: &mut Toasts) {
        for notice in self.controller.take_notices() {
            tracing::info!(text = %notice.text, "user notice");
            if !self.settings.enable_toasts {
                continue;
            }
            toasts.add(Toast {
                text: notice.text.into(),
                kind: match notice.kind {
                    NoticeKind::Info => ToastKind::Info,
                    NoticeKind::Error => ToastKind::Error,
                },
                options: ToastOptions::default()
                    .duration_in_seconds(self.settings.toast_duration as f64),
            });
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Color");
            for (idx, color) in Self::palette().iter().enumerate() {
                let selected = self.color_index == idx;
                let mut button = egui::Button::new("  ")
                    .fill(to_color32(*color))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::BLACK));
                if selected {
                    button = button.stroke(egui::Stroke::new(2.0, egui::Color32::WHITE));
                }
                if ui.add(button).clicked() {
                    self.color_index = idx;
                    self.controller.set_active_color(*color);
                }
            }
            ui.separator();

            let pending = self.controller.is_submission_pending();
            if ui
                .add_enabled(!pending, egui::Button::new("Submit"))
                .clicked()
            {
                self.dispatch_submission();
            }
            if ui.button("Reset").clicked() {
                self.controller.reset_all();
            }
            if pending {
                ui.spinner();
                ui.label("Evaluating…");
            }
        });
    }

    fn surface_canvas(&mut self, ui: &mut egui::Ui) {
        let size = ui.available_size().floor();
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::drag());
        self.controller
            .resize_surface(size.x.max(0.0) as u32, size.y.max(0.0) as u32);

        let painter = ui.painter_at(rect);
        if let Some(bg) = self.controller.surface().background() {
            painter.rect_filled(rect, 0.0, to_color32(bg));
        }
        self.blit_surface(ui.ctx(), &painter, rect);

        let overlay_rects = self.overlay_ui(ui, &painter, rect);

        // Stroke input, unless the press landed on a result overlay.
        let to_surface = |pos: egui::Pos2| {
            (
                (pos.x - rect.min.x).round() as i32,
                (pos.y - rect.min.y).round() as i32,
            )
        };
        let on_overlay = |pos: egui::Pos2| overlay_rects.iter().any(|r| r.contains(pos));

        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                if !on_overlay(pos) {
                    self.controller.pointer_down(to_surface(pos));
                }
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.controller.pointer_move(to_surface(pos));
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.controller.pointer_up();
        }
        if self.controller.is_drawing() {
            let hover = ui.ctx().input(|i| i.pointer.hover_pos());
            if hover.map_or(true, |pos| !rect.contains(pos)) {
                self.controller.pointer_leave();
            }
        }
    }

    fn blit_surface(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: egui::Rect) {
        let surface = self.controller.surface();
        let needs_upload =
            self.surface_tex.is_none() || self.surface_tex_revision != surface.revision();
        if needs_upload {
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [surface.width() as usize, surface.height() as usize],
                surface.pixels(),
            );
            match &mut self.surface_tex {
                Some(tex) => tex.set(color_image, egui::TextureOptions::NEAREST),
                None => {
                    self.surface_tex =
                        Some(ctx.load_texture("ink", color_image, egui::TextureOptions::NEAREST));
                }
            }
            self.surface_tex_revision = surface.revision();
        }
        if let Some(tex) = &self.surface_tex {
            painter.image(
                tex.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }

    /// Render each overlay as draggable text anchored in surface coordinates.
    fn overlay_ui(
        &mut self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        rect: egui::Rect,
    ) -> Vec<egui::Rect> {
        let overlays: Vec<(u64, String, (f32, f32))> = self
            .controller
            .overlays()
            .overlays()
            .iter()
            .map(|o| (o.id, o.text.clone(), o.position))
            .collect();

        let mut rects = Vec::with_capacity(overlays.len());
        for (id, text, position) in overlays {
            let galley = painter.layout_no_wrap(
                text,
                egui::FontId::monospace(RESULT_FONT),
                egui::Color32::WHITE,
            );
            let center = rect.min + egui::vec2(position.0, position.1);
            let top_left = center - galley.size() / 2.0;
            let overlay_rect = egui::Rect::from_min_size(top_left, galley.size()).expand(6.0);

            let response = ui.interact(
                overlay_rect,
                egui::Id::new(("result-overlay", id)),
                egui::Sense::drag(),
            );
            if response.dragged() {
                let delta = response.drag_delta();
                self.controller.drag_overlay_by(id, (delta.x, delta.y));
            }

            painter.rect_filled(
                overlay_rect,
                6.0,
                egui::Color32::from_black_alpha(160),
            );
            painter.galley(top_left, galley, egui::Color32::WHITE);
            rects.push(overlay_rect);
        }
        rects
    }
}

impl eframe::App for InkCalcApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.drain_outcomes(now);
        self.controller.tick(now);

        let mut toasts = Toasts::new()
            .anchor(egui::Align2::RIGHT_BOTTOM, (-8.0, -8.0))
            .direction(egui::Direction::BottomUp);
        self.show_notices(&mut toasts);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ui);
        });
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.surface_canvas(ui);
            });

        toasts.show(ctx);

        if self.controller.has_pending_work() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}
