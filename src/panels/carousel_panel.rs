use egui::{Color32, Rect, Stroke, vec2};

use super::photo_shape::paint_photo;
use crate::editor::{EditorOrchestrator, LoadState};
use crate::model::Photo;

const ITEM_SPACING: f32 = 8.0;

/// Where the carousel put things this frame
#[derive(Debug, Clone)]
pub struct CarouselLayout {
    pub panel: Rect,
    pub items: Vec<(Photo, Rect)>,
}

impl Default for CarouselLayout {
    fn default() -> Self {
        Self {
            panel: Rect::NOTHING,
            items: Vec::new(),
        }
    }
}

impl CarouselLayout {
    pub fn hit_test(&self, point: egui::Pos2) -> Option<&(Photo, Rect)> {
        self.items
            .iter()
            .find(|(_, rect)| crate::geometry::contains_point(*rect, point))
    }
}

/// Bottom bar: the photo carousel, or the trash zone while a placed photo is dragged
pub fn carousel_panel(ctx: &egui::Context, editor: &mut EditorOrchestrator) -> CarouselLayout {
    let height = editor.carousel_height(ctx.screen_rect().height());
    let mut layout = CarouselLayout::default();

    egui::TopBottomPanel::bottom("carousel")
        .exact_height(height)
        .show(ctx, |ui| {
            let panel = ui.max_rect();
            layout.panel = panel;

            match editor.ui_state().load_state.clone() {
                LoadState::Loading => {
                    ui.centered_and_justified(|ui| ui.spinner());
                }
                LoadState::Failed(message) => {
                    ui.horizontal_centered(|ui| {
                        ui.label(format!("Could not load photos: {message}"));
                        if ui.button("Retry").clicked() {
                            editor.retry_fetch();
                        }
                    });
                }
                LoadState::Loaded => {
                    let side = (panel.height() - 2.0 * ITEM_SPACING).max(0.0);
                    let painter = ui.painter_at(panel);
                    let mut x = panel.min.x + ITEM_SPACING;
                    for photo in &editor.ui_state().carousel_photos {
                        let rect = Rect::from_min_size(egui::pos2(x, panel.min.y + ITEM_SPACING), vec2(side, side));
                        paint_photo(&painter, rect.min, rect.size(), 0.0, &photo.url, 1.0);
                        layout.items.push((photo.clone(), rect));
                        x += side + ITEM_SPACING;
                    }
                }
            }

            if editor.ui_state().show_trash {
                let painter = ui.painter_at(panel);
                let hovering = editor.is_hovering_trash();
                let fill = if hovering {
                    Color32::from_rgba_unmultiplied(200, 40, 40, 230)
                } else {
                    Color32::from_rgba_unmultiplied(120, 30, 30, 200)
                };
                painter.rect_filled(panel, 0.0, fill);
                painter.rect_stroke(panel, 0.0, Stroke::new(2.0, Color32::WHITE));
                painter.text(
                    panel.center(),
                    egui::Align2::CENTER_CENTER,
                    if hovering { "Release to delete" } else { "Drag here to delete" },
                    egui::FontId::proportional(18.0),
                    Color32::WHITE,
                );
            }
        });

    layout
}
