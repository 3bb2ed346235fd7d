//! Shared numeric and DOM constants for the viewer.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed image scale.
pub const MIN_SCALE: f64 = 0.2;

/// Largest allowed image scale.
pub const MAX_SCALE: f64 = 5.0;

/// Multiplicative scale step for one zoom-in wheel event.
pub const ZOOM_IN_STEP: f64 = 1.12;

/// Multiplicative scale step for one zoom-out wheel event.
pub const ZOOM_OUT_STEP: f64 = 0.88;

// ── Layout ──────────────────────────────────────────────────────

/// Viewport margin kept above and below the fitted image, in `vh`.
pub const MARGIN_VH: f64 = 10.0;

// ── Lifecycle ───────────────────────────────────────────────────

/// Delay between the fade-out cue and removing the overlay from layout.
pub const HIDE_DELAY_MS: u32 = 200;

/// Default interval for the polling rescan strategy.
pub const POLL_INTERVAL_MS: u32 = 1000;

// ── DOM ─────────────────────────────────────────────────────────

/// Selector for the chat message containers whose images are eligible.
pub const CONTAINER_SELECTOR: &str = ".mes_text";

/// Selector for eligible images inside a container.
pub const IMAGE_SELECTOR: &str = "img";

pub const OVERLAY_CLASS: &str = "fullscreen-image-overlay";
pub const CONTAINER_CLASS: &str = "fullscreen-img-container";
pub const IMAGE_CLASS: &str = "fullscreen-img";

/// Class added to `body` while the overlay is shown.
pub const BODY_OPEN_CLASS: &str = "fullscreen-image-open";

pub const FADE_IN_CLASS: &str = "fade-in";
pub const FADE_OUT_CLASS: &str = "fade-out";

/// Attribute carrying a bound image's registry key.
pub const BOUND_ATTRIBUTE: &str = "data-lightbox-key";
