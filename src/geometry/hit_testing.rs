//! Rect predicates used by drop-target resolution.
//!
//! Layout reports bounds asynchronously, so a target can still be zero-sized
//! (or carry NaN coordinates) when the first drag frame arrives. Every predicate
//! here treats such a rect as never containing and never overlapping anything.

use egui::{Pos2, Rect, Vec2};

/// True when the rect has no area: zero or negative extent on either axis, or NaN.
pub fn is_empty(rect: Rect) -> bool {
    !rect.is_positive()
}

/// Point containment, inclusive of the min edges and exclusive of the max edges.
pub fn contains_point(bounds: Rect, point: Pos2) -> bool {
    if is_empty(bounds) {
        return false;
    }
    point.x >= bounds.min.x && point.x < bounds.max.x && point.y >= bounds.min.y && point.y < bounds.max.y
}

/// Rect-rect intersection with a non-zero shared area. Touching edges do not overlap.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    if is_empty(a) || is_empty(b) {
        return false;
    }
    a.max.x > b.min.x && b.max.x > a.min.x && a.max.y > b.min.y && b.max.y > a.min.y
}

/// The screen rect occupied by a dragged item whose top-left corner is `position`.
pub fn drag_rect(position: Pos2, size: Vec2) -> Rect {
    Rect::from_min_size(position, size)
}
