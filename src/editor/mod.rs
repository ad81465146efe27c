//! The editor orchestrator: ties gestures, the drag session, drop resolution,
//! the placed-photo model, the photo fetch and the persistence slot together.
//!
//! Everything here runs on the UI thread. The fetch is the only background
//! work; its result travels back over a channel and is applied by [`EditorOrchestrator::pump`],
//! tagged with the generation of the request that started it so a superseded
//! fetch can never overwrite a newer one.

mod spawner;
mod ui_state;

pub use spawner::{InlineSpawner, Task, TaskSpawner, ThreadSpawner};
pub use ui_state::{EditorUiState, LoadState};

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use egui::{Pos2, Rect, Vec2};
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use parking_lot::Mutex;

use crate::config::EditorConfig;
use crate::drop_target::{DropAction, DropTargets, is_hovering, resolve};
use crate::error::FetchError;
use crate::event::{EditorEvent, EventBus};
use crate::haptics::{HapticFeedback, HapticKind};
use crate::input::GestureDelta;
use crate::model::{CanvasPhoto, DragPayload, Photo, canvas};
use crate::repository::{FetchPhotos, PhotoRepository};
use crate::state::{CANVAS_PHOTOS_KEY, DragSession, DragSessionState, PersistenceSlot, Store, SubscriptionId};

/// Called from the fetch thread once a result is queued, e.g. to request a repaint
pub type Waker = Arc<dyn Fn() + Send + Sync>;

type SharedWaker = Arc<Mutex<Option<Waker>>>;

struct FetchMessage {
    generation: u64,
    result: Result<Vec<Photo>, FetchError>,
}

/// Sending half handed to a fetch task. If the task is dropped before it
/// replies, a `Cancelled` result is delivered instead so the editor never
/// waits forever.
struct FetchReply {
    generation: u64,
    tx: Option<UnboundedSender<FetchMessage>>,
    waker: SharedWaker,
}

impl FetchReply {
    fn send(mut self, result: Result<Vec<Photo>, FetchError>) {
        self.deliver(result);
    }

    fn deliver(&mut self, result: Result<Vec<Photo>, FetchError>) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        let message = FetchMessage {
            generation: self.generation,
            result,
        };
        if tx.unbounded_send(message).is_err() {
            log::debug!("Editor dropped before fetch #{} completed", self.generation);
            return;
        }
        let waker = self.waker.lock().clone();
        if let Some(waker) = waker {
            waker();
        }
    }
}

impl Drop for FetchReply {
    fn drop(&mut self) {
        self.deliver(Err(FetchError::Cancelled));
    }
}

pub struct EditorOrchestrator {
    config: EditorConfig,
    fetch: FetchPhotos,
    spawner: Box<dyn TaskSpawner>,
    slot: Box<dyn PersistenceSlot>,
    haptics: Box<dyn HapticFeedback>,
    ui: Store<EditorUiState>,
    drag: DragSession<DragPayload>,
    targets: DropTargets,
    events: EventBus,
    generation: u64,
    results_tx: UnboundedSender<FetchMessage>,
    results_rx: UnboundedReceiver<FetchMessage>,
    waker: SharedWaker,
}

impl std::fmt::Debug for EditorOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorOrchestrator")
            .field("ui", &self.ui)
            .field("drag", &self.drag)
            .field("targets", &self.targets)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl EditorOrchestrator {
    /// Restore the placed photos from `slot` and request the carousel photos
    pub fn new(
        config: EditorConfig,
        repository: Arc<dyn PhotoRepository>,
        slot: Box<dyn PersistenceSlot>,
        spawner: Box<dyn TaskSpawner>,
        haptics: Box<dyn HapticFeedback>,
    ) -> Self {
        let canvas_photos = match slot.get(CANVAS_PHOTOS_KEY) {
            Ok(Some(photos)) => {
                log::info!("Restored {} canvas photos", photos.len());
                photos
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Could not restore canvas photos, starting empty: {}", e);
                Vec::new()
            }
        };

        let (results_tx, results_rx) = unbounded();
        let mut editor = Self {
            config,
            fetch: FetchPhotos::new(repository),
            spawner,
            slot,
            haptics,
            ui: Store::new(EditorUiState {
                canvas_photos,
                ..EditorUiState::default()
            }),
            drag: DragSession::new(),
            targets: DropTargets::default(),
            events: EventBus::new(),
            generation: 0,
            results_tx,
            results_rx,
            waker: Arc::new(Mutex::new(None)),
        };
        editor.request_fetch();
        editor
    }

    /// Register a callback fired whenever a fetch result is waiting for [`pump`](Self::pump).
    /// Also applies to fetches already in flight.
    pub fn set_waker(&mut self, waker: Waker) {
        *self.waker.lock() = Some(waker);
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn ui_state(&self) -> &EditorUiState {
        self.ui.get()
    }

    pub fn ui_snapshot(&self) -> EditorUiState {
        self.ui.snapshot()
    }

    pub fn subscribe(&self, listener: impl FnMut(&EditorUiState) + 'static) -> SubscriptionId {
        self.ui.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.ui.unsubscribe(id)
    }

    pub fn drag_state(&self) -> &DragSessionState<DragPayload> {
        self.drag.state()
    }

    pub fn subscribe_drag(&self, listener: impl FnMut(&DragSessionState<DragPayload>) + 'static) -> SubscriptionId {
        self.drag.subscribe(listener)
    }

    pub fn unsubscribe_drag(&self, id: SubscriptionId) -> bool {
        self.drag.unsubscribe(id)
    }

    pub fn carousel_height(&self, available: f32) -> f32 {
        self.config.carousel_height(available)
    }

    // ---- Photo fetch ----

    /// Re-request the carousel photos. Any fetch still in flight is superseded.
    pub fn retry_fetch(&mut self) {
        self.request_fetch();
    }

    fn request_fetch(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        log::info!("Fetching photos (request #{})", generation);

        self.ui.update(|ui| {
            ui.set_load_state(LoadState::Loading);
            ui.carousel_photos = Vec::new();
        });

        let reply = FetchReply {
            generation,
            tx: Some(self.results_tx.clone()),
            waker: self.waker.clone(),
        };
        let fetch = self.fetch.clone();
        let shuffled = self.config.shuffle_on_load;
        let latency = Duration::from_millis(self.config.simulated_latency_ms);
        self.spawner.spawn(Box::new(move || {
            if !latency.is_zero() {
                thread::sleep(latency);
            }
            reply.send(fetch.run(shuffled));
        }));
    }

    /// Apply any fetch results that have arrived. Results from superseded
    /// requests are discarded. Returns true if the UI state changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(Some(message)) = self.results_rx.try_next() {
            if message.generation != self.generation {
                log::debug!(
                    "Discarding stale fetch #{} (current #{})",
                    message.generation,
                    self.generation
                );
                continue;
            }
            changed = true;
            match message.result {
                Ok(photos) => {
                    log::info!("Loaded {} photos", photos.len());
                    let count = photos.len();
                    self.ui.update(|ui| {
                        ui.set_load_state(LoadState::Loaded);
                        ui.carousel_photos = photos;
                    });
                    self.events.emit(EditorEvent::PhotosLoaded { count });
                }
                Err(e) => {
                    log::warn!("Error fetching photos: {}", e);
                    let message = e.to_string();
                    self.ui.update(|ui| {
                        ui.set_load_state(LoadState::Failed(message.clone()));
                        ui.carousel_photos = Vec::new();
                    });
                    self.events.emit(EditorEvent::PhotosFailed { message });
                }
            }
        }
        changed
    }

    // ---- Layout ----

    pub fn targets(&self) -> DropTargets {
        self.targets
    }

    pub fn set_canvas_bounds(&mut self, bounds: Rect) {
        self.targets.canvas = bounds;
    }

    /// Reporting new trash bounds also refreshes the hover highlight
    pub fn set_trash_bounds(&mut self, bounds: Rect) {
        if self.targets.trash != bounds {
            self.targets.trash = bounds;
            self.sync_drag_ui();
        }
    }

    // ---- Drag session ----

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn is_hovering_trash(&self) -> bool {
        self.ui.get().is_hovering_trash
    }

    /// True while the placed photo `instance_id` is the one in flight
    pub fn is_being_dragged(&self, instance_id: &str) -> bool {
        match &self.drag.state().payload {
            Some(DragPayload::FromCanvas { canvas_photo }) => canvas_photo.instance_id() == instance_id,
            _ => false,
        }
    }

    /// Pick up a carousel photo. `origin` is the item's top-left on screen.
    pub fn begin_carousel_drag(&mut self, photo: Photo, origin: Pos2, size: Vec2) -> bool {
        if !self.drag.start(DragPayload::FromCarousel { photo }, origin, size) {
            log::debug!("Ignoring carousel drag: a drag is already in progress");
            return false;
        }
        self.haptics.perform(HapticKind::LongPress);
        self.on_drag_started("carousel");
        true
    }

    /// Pick up a placed photo, carrying its current scale and rotation
    pub fn begin_canvas_drag(&mut self, instance_id: &str, origin: Pos2, size: Vec2) -> bool {
        let Some(canvas_photo) = canvas::find(&self.ui.get().canvas_photos, instance_id).cloned() else {
            log::debug!("Ignoring drag of unknown canvas photo {}", instance_id);
            return false;
        };
        let attributes = canvas_photo.attributes();
        let payload = DragPayload::FromCanvas { canvas_photo };
        if !self
            .drag
            .start_with_transform(payload, origin, size, attributes.scale, attributes.rotation)
        {
            log::debug!("Ignoring canvas drag: a drag is already in progress");
            return false;
        }
        self.on_drag_started("canvas");
        true
    }

    fn on_drag_started(&mut self, source: &'static str) {
        log::debug!("Drag started from {}", source);
        self.sync_drag_ui();
        self.events.emit(EditorEvent::DragStarted { source });
    }

    /// Feed one gesture frame into the running drag
    pub fn drag_by(&mut self, delta: GestureDelta) {
        if !self.drag.is_dragging() {
            return;
        }
        self.drag.update(delta);
        log::trace!("Drag update {:?} -> {:?}", delta, self.drag.state().position);
        self.sync_drag_ui();
    }

    /// Release the drag: resolve the drop, apply it and persist the new list.
    /// A gesture cancelled by another recognizer lands here too, so the drop
    /// is resolved wherever the photo was let go. Returns `None` if no drag
    /// was running.
    pub fn end_drag(&mut self) -> Option<DropAction> {
        let outcome = self.drag.end()?;
        let action = resolve(&outcome, &self.targets);
        log::info!("Drop from {} resolved to {:?}", outcome.payload.kind(), action);

        if !action.is_noop() {
            let next = action.apply(&self.ui.get().canvas_photos);
            self.commit(next);
        }
        if matches!(action, DropAction::Delete { .. }) {
            self.haptics.perform(HapticKind::Confirm);
        }

        self.sync_drag_ui();
        self.events.emit(EditorEvent::Dropped(action.clone()));
        self.events.emit(EditorEvent::DragEnded);
        Some(action)
    }

    fn commit(&mut self, next: Vec<CanvasPhoto>) {
        if next == self.ui.get().canvas_photos {
            return;
        }
        // Writes happen here, in mutation order, on the UI thread
        if let Err(e) = self.slot.set(CANVAS_PHOTOS_KEY, &next) {
            log::warn!("Failed to persist canvas photos: {}", e);
        }
        let count = next.len();
        self.ui.update(|ui| ui.canvas_photos = next);
        self.events.emit(EditorEvent::CanvasChanged { count });
    }

    fn sync_drag_ui(&mut self) {
        let state = self.drag.state();
        let show_trash = state.is_active && state.payload.as_ref().is_some_and(DragPayload::is_from_canvas);
        let hovering = show_trash && is_hovering(state, self.targets.trash);
        let ui = self.ui.get();
        if ui.show_trash != show_trash || ui.is_hovering_trash != hovering {
            self.ui.update(|ui| {
                ui.show_trash = show_trash;
                ui.is_hovering_trash = hovering;
            });
        }
    }
}
