mod canvas_panel;
mod carousel_panel;
mod photo_shape;

pub use canvas_panel::{canvas_panel, hit_test, placed_rect};
pub use carousel_panel::{CarouselLayout, carousel_panel};
pub use photo_shape::{paint_photo, photo_color};
