use serde::{Deserialize, Serialize};

/// Stacking order given to an open suggestion list.
pub const LIST_Z_INDEX: i32 = 1000;

/// On-screen bounding box of an input, in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Document position of a floating suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ListPlacement {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub z_index: i32,
}

impl ListPlacement {
    /// Directly under `bounds`, `width_pad` wider than the input.
    #[must_use]
    pub fn below(bounds: Rect, scroll_y: f32, width_pad: f32) -> Self {
        Self {
            left: bounds.x,
            top: bounds.y + bounds.height + scroll_y,
            width: bounds.width + width_pad,
            z_index: LIST_Z_INDEX,
        }
    }
}
