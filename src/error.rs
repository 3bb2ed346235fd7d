//! Error types for viewer setup.
//!
//! Event handlers never surface errors; they log and carry on. Only
//! installation (config parsing, DOM construction) returns these.

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scale limits must satisfy 0 < min_scale <= 1 <= max_scale, got {min}..{max}")]
    ScaleLimits { min: f64, max: f64 },
    #[error("zoom_in_step must be > 1 and zoom_out_step in (0, 1), got {zoom_in} / {zoom_out}")]
    ZoomSteps { zoom_in: f64, zoom_out: f64 },
    #[error("margin_vh must be in [0, 50), got {0}")]
    Margin(f64),
    #[error("poll interval must be non-zero")]
    PollInterval,
    #[error("{0} must not be empty")]
    EmptySelector(&'static str),
    #[error("unknown log level: {0}")]
    LogLevel(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("dom call failed: {0}")]
    Dom(String),
}

impl ViewerError {
    /// Wrap a rejected DOM call, keeping the JS error text when there is one.
    #[must_use]
    pub fn dom(err: &JsValue) -> Self {
        Self::Dom(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }
}

impl From<ViewerError> for JsValue {
    fn from(err: ViewerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
