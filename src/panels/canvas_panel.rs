use egui::{Color32, Pos2, Rect, Vec2};

use super::photo_shape::paint_photo;
use crate::editor::EditorOrchestrator;
use crate::model::CanvasPhoto;

/// Screen rect of a placed photo, ignoring rotation
pub fn placed_rect(canvas: Rect, photo: &CanvasPhoto, base_size: Vec2) -> Rect {
    let attributes = photo.attributes();
    Rect::from_min_size(canvas.min + attributes.position().to_vec2(), base_size * attributes.scale)
}

/// Topmost placed photo under `point`
pub fn hit_test<'a>(canvas: Rect, photos: &'a [CanvasPhoto], base_size: Vec2, point: Pos2) -> Option<&'a CanvasPhoto> {
    photos
        .iter()
        .rev()
        .find(|photo| crate::geometry::contains_point(placed_rect(canvas, photo, base_size), point))
}

/// Paint the placed photos in insertion order and return the canvas bounds.
/// The photo currently in flight is left out; its ghost stands in for it.
pub fn canvas_panel(ui: &mut egui::Ui, editor: &EditorOrchestrator) -> Rect {
    let canvas = ui.available_rect_before_wrap();
    let painter = ui.painter_at(canvas);
    painter.rect_filled(canvas, 0.0, Color32::from_gray(30));

    let base_size = editor.config().base_photo_size();
    let photos = &editor.ui_state().canvas_photos;
    if photos.is_empty() {
        painter.text(
            canvas.center(),
            egui::Align2::CENTER_CENTER,
            "Long-press a photo below and drag it here",
            egui::FontId::proportional(16.0),
            Color32::from_gray(120),
        );
    }
    for photo in photos {
        if editor.is_being_dragged(photo.instance_id()) {
            continue;
        }
        let rect = placed_rect(canvas, photo, base_size);
        paint_photo(&painter, rect.min, rect.size(), photo.attributes().rotation, photo.url(), 1.0);
    }
    canvas
}
