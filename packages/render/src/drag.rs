//! Drop position classification.

use crate::events::DropPosition;

/// Vertical extent of a drop target, in the pointer's coordinate space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropBounds {
    pub top: f64,
    pub height: f64,
}

impl DropBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Classify a pointer position over a target by thirds of its height.
///
/// Top third is `Before`, bottom third is `After`, the middle third is
/// `Inside`. Targets that cannot hold children never get `Inside`: their
/// middle third is split at the half. A degenerate box (zero or negative
/// height) is `Inside` for containers and `After` otherwise.
pub fn classify_drop_position(pointer_y: f64, bounds: DropBounds, is_container: bool) -> DropPosition {
    let height = bounds.height;
    if height.is_nan() || height <= 0.0 || !pointer_y.is_finite() {
        return if is_container {
            DropPosition::Inside
        } else {
            DropPosition::After
        };
    }

    let relative = pointer_y - bounds.top;
    if relative < height / 3.0 {
        DropPosition::Before
    } else if relative > height * 2.0 / 3.0 {
        DropPosition::After
    } else if is_container {
        DropPosition::Inside
    } else if relative < height / 2.0 {
        DropPosition::Before
    } else {
        DropPosition::After
    }
}

/// Whether `position` may be used on a target with the given container flag
pub fn is_position_allowed(position: DropPosition, is_container: bool) -> bool {
    position != DropPosition::Inside || is_container
}
