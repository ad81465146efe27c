pub mod hit_testing;

pub use hit_testing::{contains_point, drag_rect, is_empty, overlaps};
