#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

/// A point in viewport (client) coordinates, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box in viewport coordinates, as reported by
/// `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point {
            x: self.left + self.width / 2.0,
            y: self.top + self.height / 2.0,
        }
    }
}

/// Pointer bookkeeping captured when a drag begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    /// Pointer position at pointer-down.
    pub pointer: Point,
    /// Translation at pointer-down.
    pub translate: Point,
}

/// Current pan/zoom transform of the displayed image.
///
/// `translate_x` / `translate_y` are in CSS pixels and unconstrained.
/// `scale` stays within the configured zoom limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    /// Set while a drag gesture is in progress.
    pub drag: Option<DragAnchor>,
}

impl Default for TransformState {
    fn default() -> Self {
        Self { scale: 1.0, translate_x: 0.0, translate_y: 0.0, drag: None }
    }
}

impl TransformState {
    /// Back to identity: scale 1, no translation, no drag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn translate(&self) -> Point {
        Point::new(self.translate_x, self.translate_y)
    }

    pub fn set_translate(&mut self, p: Point) {
        self.translate_x = p.x;
        self.translate_y = p.y;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the image is magnified past its fitted size.
    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.scale > 1.0
    }

    /// The CSS `transform` value for the transform container.
    #[must_use]
    pub fn css(&self) -> String {
        format!("translate({}px, {}px) scale({})", self.translate_x, self.translate_y, self.scale)
    }

    /// Where the transform origin sits, given the container's current
    /// on-screen box. The box already includes the translation, so the
    /// origin is its center shifted back by it.
    #[must_use]
    pub fn origin_in(&self, visual: Rect) -> Point {
        let c = visual.center();
        Point::new(c.x - self.translate_x, c.y - self.translate_y)
    }

    /// Image-local coordinate (relative to the untransformed center, in
    /// unscaled pixels) under a viewport point.
    #[must_use]
    pub fn image_point_at(&self, origin: Point, client: Point) -> Point {
        Point {
            x: (client.x - origin.x - self.translate_x) / self.scale,
            y: (client.y - origin.y - self.translate_y) / self.scale,
        }
    }
}
