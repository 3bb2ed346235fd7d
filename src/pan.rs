//! Drag-to-pan. Pure delta tracking from the pointer-down position; no
//! inertia. Panning only starts once the image is zoomed past scale 1.

#[cfg(test)]
#[path = "pan_test.rs"]
mod pan_test;

use crate::transform::{DragAnchor, Point, TransformState};

/// Start a drag at `pointer`. Returns `false` (and does nothing) when the
/// image is not zoomed in.
pub fn begin_drag(state: &mut TransformState, pointer: Point) -> bool {
    if !state.is_zoomed() {
        return false;
    }
    state.drag = Some(DragAnchor { pointer, translate: state.translate() });
    true
}

/// Move the image with the pointer. Returns `false` when no drag is active.
pub fn continue_drag(state: &mut TransformState, pointer: Point) -> bool {
    let Some(anchor) = state.drag else {
        return false;
    };
    state.set_translate(Point {
        x: anchor.translate.x + (pointer.x - anchor.pointer.x),
        y: anchor.translate.y + (pointer.y - anchor.pointer.y),
    });
    true
}

/// Finish the drag. Returns whether one was active.
pub fn end_drag(state: &mut TransformState) -> bool {
    state.drag.take().is_some()
}
