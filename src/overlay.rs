//! Overlay lifecycle and the DOM-free viewer core.
//!
//! [`OverlayCore`] owns the transform and visibility state and turns input
//! into [`Action`]s for the host to apply. It never touches the DOM, so every
//! state transition is testable natively.
//!
//! Lifecycle: `Hidden → Opening → Visible → Closing → Hidden`. Closing carries
//! a [`HideToken`]; the deferred hide only takes effect if the overlay is
//! still closing under that same token, so a reopen during the fade-out wins.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use crate::config::ViewerConfig;
use crate::input::{Cursor, Key};
use crate::pan;
use crate::transform::{Point, Rect, TransformState};
use crate::zoom::{self, ZoomDirection, ZoomLimits};

/// Identifies one scheduled hide. Tokens are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HideToken(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Opening,
    Visible,
    Closing { token: HideToken },
}

/// Mutually exclusive animation classes on the overlay root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    FadeIn,
    FadeOut,
}

/// What the overlay is displaying, copied from the clicked image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveImage {
    pub src: String,
    pub alt: String,
}

impl ActiveImage {
    #[must_use]
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self { src: src.into(), alt: alt.into() }
    }
}

/// DOM work requested by the core, applied by the host in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Copy `src`/`alt` into the overlay's display image.
    ShowImage(ActiveImage),
    /// Put the overlay in layout (`display: flex`) or take it out.
    SetDisplayed(bool),
    SetAriaHidden(bool),
    /// Toggle the page-level class that lets host CSS lock scrolling.
    SetScrollLock(bool),
    SetCue(Cue),
    /// Constrain the display image to `max_height_vh` and the container width.
    FitImage { max_height_vh: f64 },
    /// New CSS `transform` for the transform container.
    ApplyTransform(String),
    SetCursor(Cursor),
    /// Call [`OverlayCore::hide_elapsed`] with `token` after `delay_ms`.
    ScheduleHide { token: HideToken, delay_ms: u32 },
    /// Drop the pending timer for `token`.
    CancelHide(HideToken),
}

pub struct OverlayCore {
    limits: ZoomLimits,
    hide_delay_ms: u32,
    fit_max_height_vh: f64,
    transform: TransformState,
    visibility: Visibility,
    active: Option<ActiveImage>,
    cursor: Cursor,
    next_token: u64,
}

impl Default for OverlayCore {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl OverlayCore {
    #[must_use]
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            limits: ZoomLimits::from(config),
            hide_delay_ms: config.hide_delay_ms,
            fit_max_height_vh: config.fit_max_height_vh(),
            transform: TransformState::default(),
            visibility: Visibility::Hidden,
            active: None,
            cursor: Cursor::Default,
            next_token: 0,
        }
    }

    // --- Lifecycle ---

    /// Show `image` with a fresh transform.
    ///
    /// Valid from any state; from `Closing` the pending hide is cancelled.
    /// Leaves the overlay `Opening` until [`OverlayCore::presented`].
    pub fn open(&mut self, image: ActiveImage) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Visibility::Closing { token } = self.visibility {
            actions.push(Action::CancelHide(token));
        }
        log::debug!("overlay {:?} -> Opening: {}", self.visibility, image.src);

        actions.push(Action::ShowImage(image.clone()));
        actions.push(Action::SetDisplayed(true));
        actions.push(Action::SetAriaHidden(false));
        actions.push(Action::SetScrollLock(true));
        actions.push(Action::SetCue(Cue::FadeIn));

        self.active = Some(image);
        self.visibility = Visibility::Opening;
        self.transform.reset();
        self.cursor = Cursor::Default;

        actions.push(Action::FitImage { max_height_vh: self.fit_max_height_vh });
        actions.push(Action::ApplyTransform(self.transform.css()));
        actions.push(Action::SetCursor(self.cursor));
        actions
    }

    /// The host has applied the fade-in cue. No wait for the animation.
    pub fn presented(&mut self) {
        if self.visibility == Visibility::Opening {
            log::debug!("overlay Opening -> Visible");
            self.visibility = Visibility::Visible;
        }
    }

    /// Start fading out. No-op unless `Opening` or `Visible`.
    pub fn close(&mut self) -> Vec<Action> {
        if !self.is_interactive() {
            return Vec::new();
        }
        let token = HideToken(self.next_token);
        self.next_token += 1;
        log::debug!("overlay {:?} -> Closing ({token:?})", self.visibility);

        self.visibility = Visibility::Closing { token };
        pan::end_drag(&mut self.transform);

        vec![
            Action::SetCue(Cue::FadeOut),
            Action::SetAriaHidden(true),
            Action::SetScrollLock(false),
            Action::ScheduleHide { token, delay_ms: self.hide_delay_ms },
        ]
    }

    /// The hide delay for `token` has elapsed. Ignored unless the overlay is
    /// still closing under that token.
    pub fn hide_elapsed(&mut self, token: HideToken) -> Vec<Action> {
        if self.visibility != (Visibility::Closing { token }) {
            log::debug!("stale hide {token:?} ignored in {:?}", self.visibility);
            return Vec::new();
        }
        log::debug!("overlay Closing -> Hidden");
        self.visibility = Visibility::Hidden;
        vec![Action::SetDisplayed(false)]
    }

    // --- Input ---

    /// Wheel over the overlay. `visual` is the transform container's current
    /// bounding box.
    pub fn on_wheel(&mut self, cursor: Point, delta_y: f64, visual: Rect) -> Vec<Action> {
        if !self.is_interactive() {
            return Vec::new();
        }
        zoom::zoom_at(&mut self.transform, &self.limits, cursor, visual, ZoomDirection::from_delta_y(delta_y));
        let mut actions = vec![Action::ApplyTransform(self.transform.css())];
        self.push_cursor(&mut actions);
        actions
    }

    pub fn on_pointer_down(&mut self, pointer: Point) -> Vec<Action> {
        if !self.is_interactive() || !pan::begin_drag(&mut self.transform, pointer) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.push_cursor(&mut actions);
        actions
    }

    pub fn on_pointer_move(&mut self, pointer: Point) -> Vec<Action> {
        if !pan::continue_drag(&mut self.transform, pointer) {
            return Vec::new();
        }
        vec![Action::ApplyTransform(self.transform.css())]
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if !pan::end_drag(&mut self.transform) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.push_cursor(&mut actions);
        actions
    }

    /// Click that landed on the overlay root itself, not the image.
    pub fn on_background_click(&mut self) -> Vec<Action> {
        self.close()
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() && self.visibility != Visibility::Hidden {
            return self.close();
        }
        Vec::new()
    }

    // --- Queries ---

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    #[must_use]
    pub fn active_image(&self) -> Option<&ActiveImage> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the overlay is in layout (anything but `Hidden`).
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.visibility != Visibility::Hidden
    }

    /// Whether zoom and pan input is accepted.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(self.visibility, Visibility::Opening | Visibility::Visible)
    }

    fn push_cursor(&mut self, actions: &mut Vec<Action>) {
        let cursor = if self.transform.is_dragging() {
            Cursor::Grabbing
        } else if self.transform.is_zoomed() {
            Cursor::Grab
        } else {
            Cursor::Default
        };
        if cursor != self.cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor(cursor));
        }
    }
}
