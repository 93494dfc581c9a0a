//! Pointer to relative coordinate mapping for dragging gradient handles.
use serde::{Deserialize, Serialize};

use crate::math_utils::clamp_unit;

/// Screen-space rectangle of the element the icon is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// A position inside the icon box, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativePoint {
    pub x: f32,
    pub y: f32,
}

/// Map a pointer position into the container's unit square, clamping at both ends.
///
/// Never returns values outside `[0, 1]`; an empty or non-finite container
/// axis maps to 0.
pub fn map_pointer_to_relative(
    pointer_x: f32,
    pointer_y: f32,
    bounds: &ContainerBounds,
) -> RelativePoint {
    RelativePoint {
        x: relative_axis(pointer_x, bounds.left, bounds.width),
        y: relative_axis(pointer_y, bounds.top, bounds.height),
    }
}

fn relative_axis(pointer: f32, start: f32, extent: f32) -> f32 {
    if !(extent.is_finite() && extent > 0.0) {
        return 0.0;
    }
    clamp_unit((pointer - start) / extent)
}
