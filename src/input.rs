//! Input value types shared by the core and the DOM host.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

/// A keyboard key, as reported by `KeyboardEvent.key` (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Mouse cursor shown over the transform container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Not zoomed: nothing to drag.
    #[default]
    Default,
    /// Zoomed and idle: the image can be dragged.
    Grab,
    /// A drag is in progress.
    Grabbing,
}

impl Cursor {
    /// The CSS `cursor` value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}
