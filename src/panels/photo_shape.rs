use egui::emath::Rot2;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use crate::repository::photo_label;

/// Stable fill color for a photo, derived from its url
pub fn photo_color(url: &str) -> Color32 {
    let hash = url
        .bytes()
        .fold(2166136261u32, |h, b| (h ^ b as u32).wrapping_mul(16777619));
    let hue = (hash % 360) as f32 / 360.0;
    egui::ecolor::Hsva::new(hue, 0.45, 0.75, 1.0).into()
}

/// Paint a photo frame with its top-left at `min`, rotated about its center.
/// Images are not decoded; the frame shows the photo's name.
pub fn paint_photo(painter: &Painter, min: Pos2, size: Vec2, rotation_deg: f32, url: &str, opacity: f32) {
    let rect = Rect::from_min_size(min, size);
    let center = rect.center();
    let rot = Rot2::from_angle(rotation_deg.to_radians());
    let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()]
        .into_iter()
        .map(|corner| center + rot * (corner - center))
        .collect();

    let fill = photo_color(url).gamma_multiply(opacity);
    let stroke = Stroke::new(2.0, Color32::WHITE.gamma_multiply(opacity));
    painter.add(Shape::convex_polygon(corners, fill, stroke));
    painter.text(
        center,
        Align2::CENTER_CENTER,
        photo_label(url),
        FontId::proportional(14.0),
        Color32::WHITE.gamma_multiply(opacity),
    );
}
