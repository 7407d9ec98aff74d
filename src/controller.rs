use crate::canvas::roi::ink_bounds;
use crate::canvas::stroke::StrokeCapture;
use crate::canvas::surface::PixelSurface;
use crate::canvas::Color;
use crate::eval::bindings::BindingStore;
use crate::eval::protocol::{EvalRequest, ExpressionResult};
use crate::overlay::OverlayManager;
use std::time::{Duration, Instant};

pub const DEFAULT_STROKE_WIDTH: u32 = 3;
pub const DEFAULT_OVERLAY_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_INK_COLOR: Color = Color::rgb(255, 255, 255);

/// What a submission attempt produced. Only `Dispatch` leaves a submission in
/// flight; the caller is expected to run the request and feed the outcome
/// back through [`CanvasController::apply_evaluation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Dispatch { epoch: u64, request: EvalRequest },
    AlreadyPending,
    NothingDrawn,
    EncodeFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One user-visible event, drained by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    epoch: u64,
    anchor: (f32, f32),
    submitted_at: Instant,
}

/// The annotation canvas state: pixel surface, stroke capture, bindings,
/// overlays, and the submission lifecycle. All mutation goes through the
/// operations here; the UI layer is pure plumbing around it.
pub struct CanvasController {
    surface: PixelSurface,
    stroke: StrokeCapture,
    active_color: Color,
    stroke_width: u32,
    overlay_delay: Duration,
    bindings: BindingStore,
    overlays: OverlayManager,
    in_flight: Option<InFlight>,
    epoch: u64,
    notices: Vec<Notice>,
}

impl CanvasController {
    pub fn new(width: u32, height: u32, stroke_width: u32, overlay_delay: Duration) -> Self {
        Self {
            surface: PixelSurface::new(width, height),
            stroke: StrokeCapture::default(),
            active_color: DEFAULT_INK_COLOR,
            stroke_width: stroke_width.max(1),
            overlay_delay,
            bindings: BindingStore::default(),
            overlays: OverlayManager::default(),
            in_flight: None,
            epoch: 0,
            notices: Vec::new(),
        }
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn overlays(&self) -> &crate::overlay::OverlayManager {
        &self.overlays
    }

    pub fn bindings(&self) -> &BindingStore {
        &self.bindings
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn is_submission_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_drawing()
    }

    /// Pending work means the UI should keep ticking even without input.
    pub fn has_pending_work(&self) -> bool {
        self.in_flight.is_some() || self.overlays.pending_len() > 0
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // Entry point: color selector.
    pub fn set_active_color(&mut self, color: Color) {
        self.active_color = color;
    }

    pub fn pointer_down(&mut self, point: (i32, i32)) {
        self.stroke
            .pointer_down(&mut self.surface, point, self.active_color, self.stroke_width);
    }

    pub fn pointer_move(&mut self, point: (i32, i32)) {
        self.stroke
            .pointer_move(&mut self.surface, point, self.active_color, self.stroke_width);
    }

    pub fn pointer_up(&mut self) {
        self.stroke.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.stroke.pointer_leave();
    }

    /// Surface sizer: fit the drawing buffer to the available viewport area.
    /// Resizing discards ink and abandons any active stroke.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if self.surface.resize(width, height) {
            self.stroke.finish();
        }
    }

    /// Entry point: submit trigger. Freezes the drawing, extracts the
    /// region-of-interest anchor, and produces the request to run. Exclusive:
    /// rejected while a prior submission is still in flight. An empty surface
    /// skips the round trip entirely.
    pub fn submit_for_evaluation(&mut self, now: Instant) -> Submission {
        if self.in_flight.is_some() {
            return Submission::AlreadyPending;
        }

        self.stroke.finish();

        let Some(bounds) = ink_bounds(&self.surface) else {
            self.push_notice(NoticeKind::Info, "Nothing drawn yet".to_string());
            return Submission::NothingDrawn;
        };

        let image = match self.surface.encode_png_base64() {
            Ok(image) => image,
            Err(err) => {
                self.push_notice(
                    NoticeKind::Error,
                    format!("Could not encode the drawing: {err:#}"),
                );
                return Submission::EncodeFailed;
            }
        };

        self.in_flight = Some(InFlight {
            epoch: self.epoch,
            anchor: bounds.center(),
            submitted_at: now,
        });
        Submission::Dispatch {
            epoch: self.epoch,
            request: EvalRequest {
                image,
                variables: self.bindings.snapshot(),
            },
        }
    }

    /// Apply the outcome of a dispatched submission. A failed call leaves
    /// surface, overlays, and bindings exactly as before. On success the
    /// binding fold completes before any overlay is scheduled, and the
    /// surface is cleared before the first overlay of the round can appear.
    /// Outcomes from before a reset are stale and dropped.
    pub fn apply_evaluation(
        &mut self,
        epoch: u64,
        outcome: anyhow::Result<Vec<ExpressionResult>>,
        now: Instant,
    ) {
        let Some(flight) = self.in_flight else {
            tracing::debug!("dropping evaluation outcome with no submission in flight");
            return;
        };
        if flight.epoch != epoch || self.epoch != epoch {
            tracing::debug!(epoch, current = self.epoch, "dropping stale evaluation outcome");
            return;
        }
        self.in_flight = None;

        let results = match outcome {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(%err, "evaluation round trip failed");
                self.push_notice(NoticeKind::Error, format!("Evaluation failed: {err:#}"));
                return;
            }
        };

        self.bindings.fold_assignments(&results);
        self.stroke.finish();
        self.surface.clear_ink();

        let due = flight.submitted_at + self.overlay_delay;
        for result in &results {
            if result.is_assignment {
                continue;
            }
            self.overlays
                .schedule(result.display_text(), flight.anchor, due);
        }
        self.tick(now);
    }

    /// Promote overlays whose appearance deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        self.overlays.tick(now);
    }

    pub fn drag_overlay_by(&mut self, id: u64, delta: (f32, f32)) {
        self.overlays.drag_by(id, delta);
    }

    /// Entry point: reset trigger. Returns the whole system to its
    /// post-mount initial state: empty surface, no overlays (pending ones
    /// cancelled), empty bindings, stroke machine idle. A submission still in
    /// flight becomes stale. Idempotent and safe mid-stroke.
    pub fn reset_all(&mut self) {
        self.epoch += 1;
        self.in_flight = None;
        self.stroke.finish();
        self.surface.reset();
        self.overlays.clear();
        self.bindings.clear();
    }

    fn push_notice(&mut self, kind: NoticeKind, text: String) {
        self.notices.push(Notice { kind, text });
    }
}
