pub mod canvas;
pub mod photo;

pub use photo::{CanvasPhoto, CanvasPhotoAttributes, DragPayload, MAX_SCALE, MIN_SCALE, Photo, clamp_scale};
