//! Viewer configuration.
//!
//! The host page may pass a JSON object to `install`; every field is optional
//! and falls back to the defaults in [`crate::consts`]. Keys are camelCase:
//!
//! ```json
//! { "containerSelector": ".mes_text", "maxScale": 8, "rescan": { "mode": "poll", "intervalMs": 500 } }
//! ```

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use serde::Deserialize;

use crate::consts::{
    CONTAINER_SELECTOR, HIDE_DELAY_MS, IMAGE_SELECTOR, MARGIN_VH, MAX_SCALE, MIN_SCALE, POLL_INTERVAL_MS,
    ZOOM_IN_STEP, ZOOM_OUT_STEP,
};
use crate::error::ConfigError;

/// How the viewer notices images added after installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum RescanMode {
    /// Re-scan whenever a mutation batch under `body` adds nodes.
    #[default]
    Mutation,
    /// Re-scan on a fixed interval.
    #[serde(rename_all = "camelCase")]
    Poll {
        #[serde(default = "default_poll_interval")]
        interval_ms: u32,
    },
}

fn default_poll_interval() -> u32 {
    POLL_INTERVAL_MS
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ViewerConfig {
    pub container_selector: String,
    pub image_selector: String,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_in_step: f64,
    pub zoom_out_step: f64,
    /// Margin above and below the fitted image, in `vh`.
    pub margin_vh: f64,
    pub hide_delay_ms: u32,
    pub rescan: RescanMode,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            container_selector: CONTAINER_SELECTOR.to_owned(),
            image_selector: IMAGE_SELECTOR.to_owned(),
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_in_step: ZOOM_IN_STEP,
            zoom_out_step: ZOOM_OUT_STEP,
            margin_vh: MARGIN_VH,
            hide_delay_ms: HIDE_DELAY_MS,
            rescan: RescanMode::Mutation,
            log_level: "info".to_owned(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON config object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed JSON, unknown keys, or values
    /// rejected by [`ViewerConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0 && self.max_scale >= 1.0) {
            return Err(ConfigError::ScaleLimits { min: self.min_scale, max: self.max_scale });
        }
        if !(self.zoom_in_step > 1.0 && self.zoom_out_step > 0.0 && self.zoom_out_step < 1.0) {
            return Err(ConfigError::ZoomSteps { zoom_in: self.zoom_in_step, zoom_out: self.zoom_out_step });
        }
        if !(0.0..50.0).contains(&self.margin_vh) {
            return Err(ConfigError::Margin(self.margin_vh));
        }
        if self.rescan == (RescanMode::Poll { interval_ms: 0 }) {
            return Err(ConfigError::PollInterval);
        }
        if self.container_selector.trim().is_empty() {
            return Err(ConfigError::EmptySelector("container_selector"));
        }
        if self.image_selector.trim().is_empty() {
            return Err(ConfigError::EmptySelector("image_selector"));
        }
        self.level()?;
        Ok(())
    }

    /// The configured log level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LogLevel`] for an unrecognised name.
    pub fn level(&self) -> Result<log::Level, ConfigError> {
        log::Level::from_str(&self.log_level).map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    /// CSS `max-height` for the fitted image: the viewport minus the margin
    /// above and below.
    #[must_use]
    pub fn fit_max_height_vh(&self) -> f64 {
        100.0 - 2.0 * self.margin_vh
    }
}
