//! Cursor-anchored wheel zoom.
//!
//! Each wheel event multiplies the scale by a fixed step, regardless of how
//! far the wheel moved, then shifts the translation so the image point under
//! the cursor stays put. The offset used for anchoring is measured from the
//! transform origin (the untranslated center of the transform container),
//! which makes `(t - offset) * ratio + offset` exact.

#[cfg(test)]
#[path = "zoom_test.rs"]
mod zoom_test;

use crate::config::ViewerConfig;
use crate::consts::{MAX_SCALE, MIN_SCALE, ZOOM_IN_STEP, ZOOM_OUT_STEP};
use crate::transform::{Point, Rect, TransformState};

/// Which way a wheel event zooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Wheel-up (negative `deltaY`) zooms in; everything else zooms out.
    #[must_use]
    pub fn from_delta_y(delta_y: f64) -> Self {
        if -delta_y > 0.0 { Self::In } else { Self::Out }
    }
}

/// Scale bounds and per-event steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min_scale: f64,
    pub max_scale: f64,
    pub in_step: f64,
    pub out_step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            in_step: ZOOM_IN_STEP,
            out_step: ZOOM_OUT_STEP,
        }
    }
}

impl From<&ViewerConfig> for ZoomLimits {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            in_step: config.zoom_in_step,
            out_step: config.zoom_out_step,
        }
    }
}

impl ZoomLimits {
    #[must_use]
    pub fn step(&self, direction: ZoomDirection) -> f64 {
        match direction {
            ZoomDirection::In => self.in_step,
            ZoomDirection::Out => self.out_step,
        }
    }

    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Zoom one step around `cursor`.
///
/// `visual` is the transform container's current on-screen box (translation
/// and scale already applied).
pub fn zoom_at(state: &mut TransformState, limits: &ZoomLimits, cursor: Point, visual: Rect, direction: ZoomDirection) {
    let old_scale = state.scale;
    let new_scale = limits.clamp(old_scale * limits.step(direction));
    let ratio = new_scale / old_scale;

    let origin = state.origin_in(visual);
    let offset = Point::new(cursor.x - origin.x, cursor.y - origin.y);

    state.translate_x = (state.translate_x - offset.x) * ratio + offset.x;
    state.translate_y = (state.translate_y - offset.y) * ratio + offset.y;
    state.scale = new_scale;
}
