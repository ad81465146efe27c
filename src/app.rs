use std::sync::Arc;
use std::time::Duration;

use egui::{Pos2, Rect};

use crate::config::EditorConfig;
use crate::editor::{EditorOrchestrator, ThreadSpawner};
use crate::haptics::LogHaptics;
use crate::input::{
    DragActivation, DragGestureDetector, GestureEvent, InputHandler, PointerEvent, TransformGestureDetector,
};
use crate::model::{DragPayload, Photo};
use crate::panels::{self, CarouselLayout};
use crate::repository::LocalAssetsRepository;
use crate::state::{CANVAS_PHOTOS_KEY, JsonFileSlot, MemorySlot, PersistenceSlot};

/// Which detector owns the contacts of the current touch sequence
#[derive(Debug, Clone)]
enum Route {
    Canvas { instance_id: String, rect: Rect },
    Carousel { photo: Photo, rect: Rect },
}

pub struct CollageApp {
    editor: EditorOrchestrator,
    input: InputHandler,
    transform: TransformGestureDetector,
    carousel_drag: DragGestureDetector,
    route: Option<Route>,
    /// Set when canvas photos live in eframe storage rather than a state directory
    eframe_slot: Option<MemorySlot>,
}

impl CollageApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        let (slot, eframe_slot): (Box<dyn PersistenceSlot>, Option<MemorySlot>) = match &config.state_dir {
            Some(dir) => {
                log::info!("Persisting canvas photos in {}", dir.display());
                (Box::new(JsonFileSlot::new(dir)), None)
            }
            None => {
                let slot = match cc.storage.and_then(|s| s.get_string(CANVAS_PHOTOS_KEY)) {
                    Some(json) => MemorySlot::with_raw(CANVAS_PHOTOS_KEY, json),
                    None => MemorySlot::new(),
                };
                (Box::new(slot.clone()), Some(slot))
            }
        };

        let repository = Arc::new(LocalAssetsRepository::from_config(config.assets_dir.as_deref()));
        let gestures = config.gestures;
        let mut editor = EditorOrchestrator::new(
            config,
            repository,
            slot,
            Box::new(ThreadSpawner),
            Box::new(LogHaptics),
        );
        let ctx = cc.egui_ctx.clone();
        editor.set_waker(Arc::new(move || ctx.request_repaint()));

        Self {
            editor,
            input: InputHandler::new(),
            transform: TransformGestureDetector::new(gestures),
            carousel_drag: DragGestureDetector::new(gestures, DragActivation::LongPress),
            route: None,
            eframe_slot,
        }
    }

    fn route_for(&self, point: Pos2, canvas: Rect, carousel: &CarouselLayout) -> Option<Route> {
        // The bottom bar sits on top of the canvas
        if crate::geometry::contains_point(carousel.panel, point) {
            if self.editor.ui_state().show_trash {
                return None;
            }
            return carousel.hit_test(point).map(|(photo, rect)| Route::Carousel {
                photo: photo.clone(),
                rect: *rect,
            });
        }
        let base_size = self.editor.config().base_photo_size();
        panels::hit_test(canvas, &self.editor.ui_state().canvas_photos, base_size, point).map(|photo| {
            Route::Canvas {
                instance_id: photo.instance_id().to_owned(),
                rect: panels::placed_rect(canvas, photo, base_size),
            }
        })
    }

    fn handle_input(&mut self, ctx: &egui::Context, canvas: Rect, carousel: &CarouselLayout) {
        let gesture = match self.input.process_input(ctx) {
            Some(mut event) => {
                if self.route.is_none() {
                    let down = event.changes.iter().find(|c| c.changed_to_down()).map(|c| c.position);
                    self.route = down.and_then(|point| self.route_for(point, canvas, carousel));
                }
                self.feed(&mut event)
            }
            None => match self.route {
                Some(Route::Carousel { .. }) => {
                    let now_ms = ctx.input(|i| (i.time * 1000.0) as u64);
                    self.carousel_drag.tick(now_ms)
                }
                _ => None,
            },
        };

        if let Some(gesture) = gesture {
            self.apply_gesture(gesture);
        }

        if self.route.is_some()
            && !self.input.any_pressed()
            && !self.transform.is_in_progress()
            && !self.carousel_drag.is_in_progress()
        {
            self.route = None;
        }
    }

    fn feed(&mut self, event: &mut PointerEvent) -> Option<GestureEvent> {
        match self.route {
            Some(Route::Canvas { .. }) => self.transform.on_event(event),
            Some(Route::Carousel { .. }) => self.carousel_drag.on_event(event),
            None => None,
        }
    }

    fn apply_gesture(&mut self, gesture: GestureEvent) {
        match gesture {
            GestureEvent::Started { .. } => match &self.route {
                Some(Route::Canvas { instance_id, rect }) => {
                    self.editor.begin_canvas_drag(instance_id, rect.min, rect.size());
                }
                Some(Route::Carousel { photo, rect }) => {
                    self.editor.begin_carousel_drag(photo.clone(), rect.min, rect.size());
                }
                None => {}
            },
            GestureEvent::Updated(delta) => self.editor.drag_by(delta),
            GestureEvent::Ended { cancelled } => {
                if cancelled {
                    log::debug!("Gesture cancelled, dropping where it was let go");
                }
                self.editor.end_drag();
            }
        }
    }

    fn paint_ghost(&self, ctx: &egui::Context) {
        let state = self.editor.drag_state();
        let Some(payload) = &state.payload else {
            return;
        };
        let size = match payload {
            DragPayload::FromCanvas { .. } => self.editor.config().base_photo_size() * state.scale,
            DragPayload::FromCarousel { .. } => state.size * state.scale,
        };
        let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Tooltip, egui::Id::new("drag_ghost")));
        panels::paint_photo(&painter, state.position, size, state.rotation, payload.url(), 0.8);
    }
}

impl eframe::App for CollageApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Some(json) = self.eframe_slot.as_ref().and_then(|slot| slot.raw(CANVAS_PHOTOS_KEY)) {
            storage.set_string(CANVAS_PHOTOS_KEY, json);
        }
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.editor.pump();

        // Bottom bar first so the canvas gets the remaining space
        let carousel = panels::carousel_panel(ctx, &mut self.editor);
        let canvas = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| panels::canvas_panel(ui, &self.editor))
            .inner;

        self.editor.set_canvas_bounds(canvas);
        let trash = if self.editor.ui_state().show_trash {
            carousel.panel
        } else {
            Rect::ZERO
        };
        self.editor.set_trash_bounds(trash);

        self.handle_input(ctx, canvas, &carousel);
        self.paint_ghost(ctx);

        if self.editor.is_dragging() {
            ctx.request_repaint();
        } else if matches!(self.route, Some(Route::Carousel { .. })) {
            // Keep frames coming so the long-press timer can fire
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
