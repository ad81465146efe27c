//! The drag-session state machine.
//!
//! ```text
//!   ┌──────────┐   start   ┌──────────┐
//!   │          ├───────────►          │
//!   │   Idle   │           │ Dragging ├──┐ update
//!   │          ◄───────────┤          ◄──┘
//!   └──────────┘    end    └──────────┘
//! ```
//!
//! At most one session exists at a time: `start` while dragging is refused and
//! leaves the running session alone. `end` resets to the empty state on every
//! exit path (drop, miss or cancel) and hands the final snapshot to the caller.
//! Every transition and every update is pushed to subscribers synchronously.
use egui::{Pos2, Vec2};

use super::store::{Store, SubscriptionId};
use crate::input::GestureDelta;
use crate::model::clamp_scale;

/// Live state of the drag in flight. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSessionState<T> {
    pub is_active: bool,
    pub payload: Option<T>,
    /// Top-left corner of the dragged item in screen coordinates
    pub position: Pos2,
    pub size: Vec2,
    pub scale: f32,
    /// Degrees
    pub rotation: f32,
}

impl<T> Default for DragSessionState<T> {
    fn default() -> Self {
        Self {
            is_active: false,
            payload: None,
            position: Pos2::ZERO,
            size: Vec2::ZERO,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

/// What `end` returns: the payload plus its final geometry
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome<T> {
    pub payload: T,
    pub position: Pos2,
    pub size: Vec2,
    pub scale: f32,
    pub rotation: f32,
}

#[derive(Debug)]
pub struct DragSession<T> {
    store: Store<DragSessionState<T>>,
}

impl<T> Default for DragSession<T> {
    fn default() -> Self {
        Self {
            store: Store::new(DragSessionState::default()),
        }
    }
}

impl<T: Clone> DragSession<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragSessionState<T> {
        self.store.get()
    }

    pub fn snapshot(&self) -> DragSessionState<T> {
        self.store.snapshot()
    }

    pub fn is_dragging(&self) -> bool {
        self.store.get().is_active
    }

    pub fn subscribe(&self, listener: impl FnMut(&DragSessionState<T>) + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Begin a session with scale 1 and no rotation
    pub fn start(&mut self, payload: T, position: Pos2, size: Vec2) -> bool {
        self.start_with_transform(payload, position, size, 1.0, 0.0)
    }

    /// Begin a session from an existing transform. Returns false, changing
    /// nothing, if a session is already running.
    pub fn start_with_transform(&mut self, payload: T, position: Pos2, size: Vec2, scale: f32, rotation: f32) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.store.set(DragSessionState {
            is_active: true,
            payload: Some(payload),
            position,
            size,
            scale: clamp_scale(scale),
            rotation,
        });
        true
    }

    /// Accumulate one gesture frame. Ignored while idle. Non-finite zoom or
    /// rotation components are dropped; scale stays inside the clamp range.
    pub fn update(&mut self, delta: GestureDelta) {
        if !self.is_dragging() {
            return;
        }
        self.store.update(|state| {
            if delta.pan.x.is_finite() && delta.pan.y.is_finite() {
                state.position += delta.pan;
            }
            if !delta.zoom.is_nan() {
                state.scale = clamp_scale(state.scale * delta.zoom);
            }
            if delta.rotation.is_finite() {
                state.rotation += delta.rotation;
            }
        });
    }

    /// Finish the session and return its final snapshot, or `None` if no
    /// session was running (a duplicate end or cancel signal).
    pub fn end(&mut self) -> Option<DragOutcome<T>> {
        if !self.is_dragging() {
            return None;
        }
        let finished = self.store.snapshot();
        self.store.set(DragSessionState::default());
        let payload = finished.payload?;
        Some(DragOutcome {
            payload,
            position: finished.position,
            size: finished.size,
            scale: finished.scale,
            rotation: finished.rotation,
        })
    }
}
