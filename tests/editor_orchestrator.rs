use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use collage_canvas::config::EditorConfig;
use collage_canvas::drop_target::DropAction;
use collage_canvas::editor::{EditorOrchestrator, InlineSpawner, LoadState, Task, TaskSpawner};
use collage_canvas::error::{FetchError, PersistenceError, PersistenceResult};
use collage_canvas::event::EditorEvent;
use collage_canvas::haptics::{HapticFeedback, HapticKind};
use collage_canvas::input::GestureDelta;
use collage_canvas::model::{CanvasPhoto, CanvasPhotoAttributes, DragPayload, Photo};
use collage_canvas::repository::PhotoRepository;
use collage_canvas::state::{CANVAS_PHOTOS_KEY, PersistenceSlot};
use egui::{Rect, pos2, vec2};
use parking_lot::Mutex;

struct FixedRepository(Vec<Photo>);

impl PhotoRepository for FixedRepository {
    fn fetch_photos(&self) -> Result<Vec<Photo>, FetchError> {
        Ok(self.0.clone())
    }
}

struct FailingRepository;

impl PhotoRepository for FailingRepository {
    fn fetch_photos(&self) -> Result<Vec<Photo>, FetchError> {
        Err(FetchError::NoAssets(PathBuf::from("/missing")))
    }
}

/// Hands out a different photo on every call
#[derive(Default)]
struct CountingRepository {
    calls: AtomicUsize,
}

impl PhotoRepository for CountingRepository {
    fn fetch_photos(&self) -> Result<Vec<Photo>, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(vec![Photo::with_id(format!("p{call}"), format!("asset://fetch-{call}"))])
    }
}

/// Queues tasks until the test runs them
#[derive(Clone, Default)]
struct ManualSpawner {
    tasks: Arc<Mutex<Vec<Task>>>,
}

impl ManualSpawner {
    fn take(&self) -> Vec<Task> {
        std::mem::take(&mut *self.tasks.lock())
    }
}

impl TaskSpawner for ManualSpawner {
    fn spawn(&self, task: Task) {
        self.tasks.lock().push(task);
    }
}

#[derive(Clone, Default)]
struct RecordingHaptics(Rc<RefCell<Vec<HapticKind>>>);

impl HapticFeedback for RecordingHaptics {
    fn perform(&mut self, kind: HapticKind) {
        self.0.borrow_mut().push(kind);
    }
}

/// Records the instance ids of every write, in order
#[derive(Clone, Default)]
struct RecordingSlot {
    stored: Option<Vec<CanvasPhoto>>,
    writes: Rc<RefCell<Vec<Vec<String>>>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl PersistenceSlot for RecordingSlot {
    fn get(&self, key: &str) -> PersistenceResult<Option<Vec<CanvasPhoto>>> {
        assert_eq!(key, CANVAS_PHOTOS_KEY);
        if self.fail_reads {
            return Err(PersistenceError::Io(std::io::Error::other("unreadable")));
        }
        Ok(self.stored.clone())
    }

    fn set(&mut self, key: &str, photos: &[CanvasPhoto]) -> PersistenceResult<()> {
        assert_eq!(key, CANVAS_PHOTOS_KEY);
        self.writes
            .borrow_mut()
            .push(photos.iter().map(|p| p.instance_id().to_owned()).collect());
        if self.fail_writes {
            return Err(PersistenceError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}

fn test_config() -> EditorConfig {
    EditorConfig {
        shuffle_on_load: false,
        simulated_latency_ms: 0,
        ..EditorConfig::default()
    }
}

fn carousel_photos() -> Vec<Photo> {
    vec![
        Photo::with_id("p1", "asset://cat"),
        Photo::with_id("p2", "asset://koala"),
        Photo::with_id("p3", "asset://tiger"),
    ]
}

fn placed(instance_id: &str, x: f32, y: f32, scale: f32, rotation: f32) -> CanvasPhoto {
    CanvasPhoto::from_parts(
        instance_id,
        "p1",
        "asset://cat",
        CanvasPhotoAttributes::new(pos2(x, y), scale, rotation),
    )
}

struct Harness {
    editor: EditorOrchestrator,
    haptics: RecordingHaptics,
    writes: Rc<RefCell<Vec<Vec<String>>>>,
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

fn harness_with(slot: RecordingSlot) -> Harness {
    let haptics = RecordingHaptics::default();
    let writes = slot.writes.clone();
    let mut editor = EditorOrchestrator::new(
        test_config(),
        Arc::new(FixedRepository(carousel_photos())),
        Box::new(slot),
        Box::new(InlineSpawner),
        Box::new(haptics.clone()),
    );
    editor.pump();
    editor.set_canvas_bounds(Rect::from_min_max(pos2(0.0, 100.0), pos2(800.0, 700.0)));

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    editor
        .events()
        .subscribe(move |event: &EditorEvent| sink.borrow_mut().push(event.clone()));

    Harness {
        editor,
        haptics,
        writes,
        events,
    }
}

fn harness() -> Harness {
    harness_with(RecordingSlot::default())
}

fn seeded(photos: Vec<CanvasPhoto>) -> Harness {
    harness_with(RecordingSlot {
        stored: Some(photos),
        ..RecordingSlot::default()
    })
}

#[test]
fn test_fetch_failure_leaves_carousel_empty() {
    let mut editor = EditorOrchestrator::new(
        test_config(),
        Arc::new(FailingRepository),
        Box::new(RecordingSlot::default()),
        Box::new(InlineSpawner),
        Box::new(RecordingHaptics::default()),
    );
    assert!(editor.ui_state().is_loading);

    let loading = Rc::new(RefCell::new(Vec::new()));
    let sink = loading.clone();
    editor.subscribe(move |ui| sink.borrow_mut().push(ui.is_loading));

    assert!(editor.pump());
    let ui = editor.ui_state();
    assert!(!ui.is_loading);
    assert!(ui.carousel_photos.is_empty());
    assert!(matches!(ui.load_state, LoadState::Failed(_)));
    assert!(ui.load_error().is_some_and(|message| message.contains("/missing")));
    assert_eq!(*loading.borrow(), vec![false]);
}

#[test]
fn test_fetch_success_fills_carousel_in_order() {
    let h = harness();
    let ui = h.editor.ui_state();
    assert_eq!(ui.load_state, LoadState::Loaded);
    assert!(!ui.is_loading);
    assert_eq!(ui.carousel_photos, carousel_photos());
}

#[test]
fn test_retry_after_failure_refetches() {
    let spawner = ManualSpawner::default();
    let mut editor = EditorOrchestrator::new(
        test_config(),
        Arc::new(CountingRepository::default()),
        Box::new(RecordingSlot::default()),
        Box::new(spawner.clone()),
        Box::new(RecordingHaptics::default()),
    );

    // Dropping the queued task reports a cancelled fetch
    drop(spawner.take());
    assert!(editor.pump());
    assert!(editor.ui_state().load_error().is_some());

    editor.retry_fetch();
    assert!(editor.ui_state().is_loading);
    for task in spawner.take() {
        task();
    }
    editor.pump();
    assert_eq!(editor.ui_state().load_state, LoadState::Loaded);
    assert_eq!(editor.ui_state().carousel_photos.len(), 1);
}

#[test]
fn test_superseded_fetch_never_overwrites_newer_result() {
    let spawner = ManualSpawner::default();
    let mut editor = EditorOrchestrator::new(
        test_config(),
        Arc::new(CountingRepository::default()),
        Box::new(RecordingSlot::default()),
        Box::new(spawner.clone()),
        Box::new(RecordingHaptics::default()),
    );
    editor.retry_fetch();
    assert!(editor.ui_state().carousel_photos.is_empty());

    // The newer request finishes first, the older one last
    let mut tasks = spawner.take();
    assert_eq!(tasks.len(), 2);
    let newer = tasks.pop().unwrap();
    let older = tasks.pop().unwrap();
    newer();
    older();

    assert!(editor.pump());
    let urls: Vec<_> = editor.ui_state().carousel_photos.iter().map(|p| p.url.clone()).collect();
    assert_eq!(urls, ["asset://fetch-1"]);
    assert!(!editor.pump());
}

#[test]
fn test_carousel_drop_adds_photo_and_persists() {
    let mut h = harness();
    let photo = carousel_photos()[0].clone();

    assert!(h.editor.begin_carousel_drag(photo.clone(), pos2(10.0, 10.0), vec2(80.0, 80.0)));
    assert_eq!(*h.haptics.0.borrow(), vec![HapticKind::LongPress]);
    assert!(!h.editor.ui_state().show_trash);

    h.editor.drag_by(GestureDelta::pan(vec2(50.0, 0.0)));
    h.editor.drag_by(GestureDelta::pan(vec2(140.0, 140.0)));
    let action = h.editor.end_drag().unwrap();
    assert_eq!(
        action,
        DropAction::AddToCanvas {
            photo,
            position: pos2(200.0, 50.0),
        }
    );

    let canvas = &h.editor.ui_state().canvas_photos;
    assert_eq!(canvas.len(), 1);
    assert_eq!(canvas[0].source_id(), "p1");
    assert_eq!(canvas[0].attributes().position(), pos2(200.0, 50.0));
    assert_eq!(*h.writes.borrow(), vec![vec![canvas[0].instance_id().to_owned()]]);
    assert!(!h.editor.is_dragging());

    assert_eq!(
        *h.events.borrow(),
        vec![
            EditorEvent::DragStarted { source: "carousel" },
            EditorEvent::CanvasChanged { count: 1 },
            EditorEvent::Dropped(action),
            EditorEvent::DragEnded,
        ]
    );
}

#[test]
fn test_canvas_drag_into_trash_deletes() {
    let mut h = seeded(vec![placed("c1", 60.0, 60.0, 1.0, 0.0), placed("c2", 300.0, 300.0, 1.0, 0.0)]);
    let trash = Rect::from_min_max(pos2(0.0, 600.0), pos2(800.0, 720.0));

    assert!(h.editor.begin_canvas_drag("c1", pos2(60.0, 160.0), vec2(60.0, 60.0)));
    assert!(h.editor.is_being_dragged("c1"));
    assert!(!h.editor.is_being_dragged("c2"));
    assert!(h.editor.ui_state().show_trash);
    h.editor.set_trash_bounds(trash);
    assert!(!h.editor.is_hovering_trash());

    h.editor.drag_by(GestureDelta::pan(vec2(0.0, 460.0)));
    assert!(h.editor.is_hovering_trash());

    let action = h.editor.end_drag().unwrap();
    assert_eq!(
        action,
        DropAction::Delete {
            instance_id: "c1".into()
        }
    );
    let ids: Vec<_> = h.editor.ui_state().canvas_photos.iter().map(|p| p.instance_id()).collect();
    assert_eq!(ids, ["c2"]);
    assert_eq!(*h.haptics.0.borrow(), vec![HapticKind::Confirm]);
    assert_eq!(*h.writes.borrow(), vec![vec!["c2".to_owned()]]);

    let ui = h.editor.ui_state();
    assert!(!ui.show_trash);
    assert!(!ui.is_hovering_trash);
    assert!(!h.editor.is_being_dragged("c1"));
}

#[test]
fn test_canvas_drag_carries_and_updates_transform() {
    let mut h = seeded(vec![placed("c1", 60.0, 60.0, 2.0, 10.0)]);

    assert!(h.editor.begin_canvas_drag("c1", pos2(60.0, 160.0), vec2(400.0, 400.0)));
    assert_eq!(h.editor.drag_state().scale, 2.0);
    h.editor.drag_by(GestureDelta::new(vec2(10.0, -5.0), 1.5, 5.0));

    let action = h.editor.end_drag().unwrap();
    assert_eq!(
        action,
        DropAction::Move {
            instance_id: "c1".into(),
            position: pos2(70.0, 55.0),
            scale: 3.0,
            rotation: 15.0,
        }
    );
    let attributes = h.editor.ui_state().canvas_photos[0].attributes();
    assert_eq!(attributes, CanvasPhotoAttributes::new(pos2(70.0, 55.0), 3.0, 15.0));
    assert_eq!(h.editor.ui_state().canvas_photos[0].instance_id(), "c1");
}

#[test]
fn test_zoom_during_drag_is_clamped_when_stored() {
    let mut h = seeded(vec![placed("c1", 100.0, 0.0, 1.0, 0.0)]);
    assert!(h.editor.begin_canvas_drag("c1", pos2(100.0, 100.0), vec2(200.0, 200.0)));
    for zoom in [1.2, 1.2, 1.2, 3.0] {
        h.editor.drag_by(GestureDelta::new(vec2(0.0, 0.0), zoom, 0.0));
    }
    h.editor.end_drag();
    assert_eq!(h.editor.ui_state().canvas_photos[0].attributes().scale, 5.0);
}

#[test]
fn test_second_drag_is_ignored() {
    let mut h = seeded(vec![placed("c1", 0.0, 0.0, 1.0, 0.0)]);
    let photo = carousel_photos()[1].clone();
    assert!(h.editor.begin_carousel_drag(photo.clone(), pos2(10.0, 10.0), vec2(80.0, 80.0)));
    assert!(!h.editor.begin_canvas_drag("c1", pos2(0.0, 100.0), vec2(200.0, 200.0)));
    assert!(!h.editor.begin_carousel_drag(carousel_photos()[2].clone(), pos2(0.0, 0.0), vec2(1.0, 1.0)));

    assert_eq!(h.editor.drag_state().payload, Some(DragPayload::FromCarousel { photo }));
    assert_eq!(h.editor.drag_state().position, pos2(10.0, 10.0));
    assert_eq!(*h.haptics.0.borrow(), vec![HapticKind::LongPress]);
}

#[test]
fn test_unknown_canvas_photo_cannot_be_dragged() {
    let mut h = harness();
    assert!(!h.editor.begin_canvas_drag("ghost", pos2(0.0, 0.0), vec2(10.0, 10.0)));
    assert!(!h.editor.is_dragging());
}

#[test]
fn test_missed_drop_writes_nothing() {
    let mut h = seeded(vec![placed("c1", 0.0, 0.0, 1.0, 0.0)]);

    // Released over the carousel, outside the canvas
    h.editor
        .begin_carousel_drag(carousel_photos()[0].clone(), pos2(10.0, 710.0), vec2(80.0, 80.0));
    assert_eq!(h.editor.end_drag(), Some(DropAction::NoOp));

    // Released where it started
    h.editor.begin_canvas_drag("c1", pos2(0.0, 100.0), vec2(200.0, 200.0));
    assert!(matches!(h.editor.end_drag(), Some(DropAction::Move { .. })));

    assert!(h.writes.borrow().is_empty());
    assert_eq!(h.editor.ui_state().canvas_photos, vec![placed("c1", 0.0, 0.0, 1.0, 0.0)]);
    assert!(
        !h.events
            .borrow()
            .iter()
            .any(|event| matches!(event, EditorEvent::CanvasChanged { .. }))
    );
    assert_eq!(h.editor.end_drag(), None);
}

#[test]
fn test_writes_follow_mutation_order() {
    let mut h = harness();
    for (photo, x) in carousel_photos().into_iter().zip([100.0, 200.0, 300.0]) {
        h.editor.begin_carousel_drag(photo, pos2(10.0, 710.0), vec2(80.0, 80.0));
        h.editor.drag_by(GestureDelta::pan(vec2(x - 10.0, -510.0)));
        h.editor.end_drag();
    }
    let first = h.editor.ui_state().canvas_photos[0].instance_id().to_owned();
    h.editor.set_trash_bounds(Rect::from_min_max(pos2(0.0, 700.0), pos2(800.0, 800.0)));
    h.editor.begin_canvas_drag(&first, pos2(100.0, 300.0), vec2(80.0, 80.0));
    h.editor.drag_by(GestureDelta::pan(vec2(0.0, 400.0)));
    h.editor.end_drag();

    let lengths: Vec<_> = h.writes.borrow().iter().map(Vec::len).collect();
    assert_eq!(lengths, [1, 2, 3, 2]);
    let last = h.writes.borrow().last().cloned().unwrap();
    assert!(!last.contains(&first));
    let current: Vec<_> = h
        .editor
        .ui_state()
        .canvas_photos
        .iter()
        .map(|p| p.instance_id().to_owned())
        .collect();
    assert_eq!(last, current);
}

#[test]
fn test_slot_failures_are_not_fatal() {
    let mut h = harness_with(RecordingSlot {
        fail_reads: true,
        fail_writes: true,
        ..RecordingSlot::default()
    });
    assert!(h.editor.ui_state().canvas_photos.is_empty());

    h.editor
        .begin_carousel_drag(carousel_photos()[0].clone(), pos2(100.0, 200.0), vec2(80.0, 80.0));
    assert!(matches!(h.editor.end_drag(), Some(DropAction::AddToCanvas { .. })));
    assert_eq!(h.editor.ui_state().canvas_photos.len(), 1);
    assert_eq!(h.writes.borrow().len(), 1);
}

#[test]
fn test_drops_resolve_to_noop_before_layout() {
    let mut editor = EditorOrchestrator::new(
        test_config(),
        Arc::new(FixedRepository(carousel_photos())),
        Box::new(RecordingSlot {
            stored: Some(vec![placed("c1", 0.0, 0.0, 1.0, 0.0)]),
            ..RecordingSlot::default()
        }),
        Box::new(InlineSpawner),
        Box::new(RecordingHaptics::default()),
    );
    editor.begin_canvas_drag("c1", pos2(0.0, 0.0), vec2(200.0, 200.0));
    editor.drag_by(GestureDelta::pan(vec2(20.0, 20.0)));
    assert!(!editor.is_hovering_trash());
    assert_eq!(editor.end_drag(), Some(DropAction::NoOp));
}
