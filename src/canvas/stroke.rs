use crate::canvas::surface::PixelSurface;
use crate::canvas::{Color, SURFACE_FILL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokePhase {
    #[default]
    Idle,
    Drawing,
}

/// Freehand stroke capture. Only the rendered pixel trace persists; the
/// session state here is just the phase and the current pen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeCapture {
    phase: StrokePhase,
    last_point: Option<(i32, i32)>,
}

impl StrokeCapture {
    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        self.phase == StrokePhase::Drawing
    }

    /// Begin a stroke session. The first press of a session also establishes
    /// the opaque surface fill. A press while already drawing restarts the
    /// path at the new point.
    pub fn pointer_down(
        &mut self,
        surface: &mut PixelSurface,
        point: (i32, i32),
        color: Color,
        stroke_width: u32,
    ) {
        surface.set_background(SURFACE_FILL);
        surface.stamp(point, color, stroke_width);
        self.phase = StrokePhase::Drawing;
        self.last_point = Some(point);
    }

    /// Extend the active path. Color is read here, not latched at stroke
    /// start, so a mid-path color change applies to subsequent segments.
    /// No-op while idle, which guards against stray move events.
    pub fn pointer_move(
        &mut self,
        surface: &mut PixelSurface,
        point: (i32, i32),
        color: Color,
        stroke_width: u32,
    ) {
        if self.phase != StrokePhase::Drawing {
            return;
        }
        if let Some(last) = self.last_point {
            surface.stroke_segment(last, point, color, stroke_width);
        }
        self.last_point = Some(point);
    }

    pub fn pointer_up(&mut self) {
        self.finish();
    }

    pub fn pointer_leave(&mut self) {
        self.finish();
    }

    /// End or abandon the session and return to `Idle`.
    pub fn finish(&mut self) {
        self.phase = StrokePhase::Idle;
        self.last_point = None;
    }
}
