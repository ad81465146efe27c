use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::pointer::{PointerEvent, PointerId};

/// Configuration for gesture recognition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Motion in logical pixels that must accumulate before a gesture is intentional
    pub touch_slop: f32,
    /// Time a contact must stay put before a long-press drag starts (milliseconds)
    pub long_press_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_slop: 8.0,
            long_press_ms: 500,
        }
    }
}

/// Incremental transform delivered by one gesture frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureDelta {
    pub pan: Vec2,
    /// Multiplicative scale change, 1.0 is identity
    pub zoom: f32,
    /// Rotation change in degrees
    pub rotation: f32,
}

impl Default for GestureDelta {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GestureDelta {
    pub const IDENTITY: Self = Self {
        pan: Vec2::ZERO,
        zoom: 1.0,
        rotation: 0.0,
    };

    pub fn new(pan: Vec2, zoom: f32, rotation: f32) -> Self {
        Self { pan, zoom, rotation }
    }

    pub fn pan(pan: Vec2) -> Self {
        Self { pan, ..Self::IDENTITY }
    }

    pub fn is_identity(&self) -> bool {
        self.pan == Vec2::ZERO && self.zoom == 1.0 && self.rotation == 0.0
    }
}

/// What a detector reports for one input frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// A gesture began at the given contact position
    Started { position: Pos2 },
    /// The gesture moved past the slop gate; carries this frame's delta only
    Updated(GestureDelta),
    /// All contacts lifted, or another recognizer consumed a contact
    Ended { cancelled: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TransformPhase {
    Idle,
    Armed {
        pan: Vec2,
        zoom: f32,
        rotation: f32,
        /// Contact spread latched when the second contact is first tracked
        span: f32,
    },
    Active,
    /// Gesture was cancelled; wait for every contact to lift
    Draining,
}

/// Pan + pinch-zoom + rotate recognizer for placed canvas photos.
///
/// Starts immediately on first contact, then withholds updates until the
/// accumulated motion crosses the touch slop. Slop for zoom and rotation is
/// scaled by how far apart the fingers were, so a small relative change with
/// widely spread fingers counts as much as the same pixel travel.
#[derive(Debug, Clone)]
pub struct TransformGestureDetector {
    config: GestureConfig,
    phase: TransformPhase,
}

impl TransformGestureDetector {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: TransformPhase::Idle,
        }
    }

    /// True between `Started` and `Ended`
    pub fn is_in_progress(&self) -> bool {
        matches!(self.phase, TransformPhase::Armed { .. } | TransformPhase::Active)
    }

    /// True once the slop gate has been crossed
    pub fn is_active(&self) -> bool {
        matches!(self.phase, TransformPhase::Active)
    }

    /// Feed one input frame. Changes that drive an update are consumed.
    pub fn on_event(&mut self, event: &mut PointerEvent) -> Option<GestureEvent> {
        match self.phase {
            TransformPhase::Idle => {
                let first_down = event.changes.iter().find(|c| c.changed_to_down())?;
                let position = first_down.position;
                self.phase = TransformPhase::Armed {
                    pan: Vec2::ZERO,
                    zoom: 1.0,
                    rotation: 0.0,
                    span: 0.0,
                };
                Some(GestureEvent::Started { position })
            }
            TransformPhase::Draining => {
                if !event.any_pressed() {
                    self.phase = TransformPhase::Idle;
                }
                None
            }
            TransformPhase::Armed { .. } | TransformPhase::Active => {
                if event.any_consumed() {
                    self.phase = if event.any_pressed() {
                        TransformPhase::Draining
                    } else {
                        TransformPhase::Idle
                    };
                    return Some(GestureEvent::Ended { cancelled: true });
                }
                if !event.any_pressed() {
                    self.phase = TransformPhase::Idle;
                    return Some(GestureEvent::Ended { cancelled: false });
                }

                let delta = GestureDelta::new(event.pan(), event.zoom(), event.rotation());

                if let TransformPhase::Armed { pan, zoom, rotation, span } = &mut self.phase {
                    *pan += delta.pan;
                    *zoom *= delta.zoom;
                    *rotation += delta.rotation;
                    if *span == 0.0 && event.tracked_count() >= 2 {
                        // Two contacts: twice the mean radius is the distance between them
                        *span = event.centroid_size(false) * 2.0;
                    }

                    let pan_motion = pan.length();
                    let zoom_motion = (1.0 - *zoom).abs() * *span;
                    let rotation_motion = rotation.to_radians().abs() * *span;
                    let slop = self.config.touch_slop;
                    if pan_motion > slop || zoom_motion > slop || rotation_motion > slop {
                        log::trace!(
                            "transform gesture past slop (pan {pan_motion:.1}, zoom {zoom_motion:.1}, rotation {rotation_motion:.1})"
                        );
                        self.phase = TransformPhase::Active;
                    } else {
                        return None;
                    }
                }

                if delta.is_identity() {
                    return None;
                }
                for change in event.changes.iter_mut().filter(|c| c.position_changed()) {
                    change.consume();
                }
                Some(GestureEvent::Updated(delta))
            }
        }
    }
}

/// How a single-pointer drag becomes active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragActivation {
    /// Start on first contact, deliver updates once the pan crosses the slop
    Immediate,
    /// Start only after the contact has stayed within the slop for the long-press delay
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragPhase {
    Idle,
    AwaitingLongPress {
        pointer: PointerId,
        position: Pos2,
        down_ms: u64,
        travel: Vec2,
    },
    Armed {
        pointer: PointerId,
        travel: Vec2,
    },
    Active {
        pointer: PointerId,
    },
    Draining,
}

/// Translation-only recognizer for carousel items.
#[derive(Debug, Clone)]
pub struct DragGestureDetector {
    config: GestureConfig,
    activation: DragActivation,
    phase: DragPhase,
}

impl DragGestureDetector {
    pub fn new(config: GestureConfig, activation: DragActivation) -> Self {
        Self {
            config,
            activation,
            phase: DragPhase::Idle,
        }
    }

    pub fn activation(&self) -> DragActivation {
        self.activation
    }

    /// True between `Started` and `Ended`
    pub fn is_in_progress(&self) -> bool {
        matches!(self.phase, DragPhase::Armed { .. } | DragPhase::Active { .. })
    }

    /// Feed one input frame. Changes that drive an update are consumed.
    pub fn on_event(&mut self, event: &mut PointerEvent) -> Option<GestureEvent> {
        let now = event.uptime_ms();
        match self.phase {
            DragPhase::Idle => {
                let first_down = event.changes.iter().find(|c| c.changed_to_down())?;
                let (pointer, position) = (first_down.id, first_down.position);
                match self.activation {
                    DragActivation::Immediate => {
                        self.phase = DragPhase::Armed {
                            pointer,
                            travel: Vec2::ZERO,
                        };
                        Some(GestureEvent::Started { position })
                    }
                    DragActivation::LongPress => {
                        self.phase = DragPhase::AwaitingLongPress {
                            pointer,
                            position,
                            down_ms: now,
                            travel: Vec2::ZERO,
                        };
                        None
                    }
                }
            }
            DragPhase::Draining => {
                if !event.any_pressed() {
                    self.phase = DragPhase::Idle;
                }
                None
            }
            DragPhase::AwaitingLongPress {
                pointer,
                position,
                down_ms,
                travel,
            } => {
                let change = event.change(pointer).copied()?;
                if change.is_consumed() || !change.pressed {
                    // A tap, or someone else claimed the contact
                    self.reset_after(event);
                    return None;
                }
                let travel = travel + change.position_change();
                if travel.length() > self.config.touch_slop {
                    log::trace!("long press abandoned after {:.1}px of travel", travel.length());
                    self.phase = DragPhase::Draining;
                    return None;
                }
                if now.saturating_sub(down_ms) >= self.config.long_press_ms {
                    self.phase = DragPhase::Active { pointer };
                    return Some(GestureEvent::Started {
                        position: change.position,
                    });
                }
                self.phase = DragPhase::AwaitingLongPress {
                    pointer,
                    position,
                    down_ms,
                    travel,
                };
                None
            }
            DragPhase::Armed { pointer, travel } => {
                let change = event.change(pointer).copied();
                if let Some(ended) = self.end_if_released(event, change.map(|c| (c.pressed, c.is_consumed()))) {
                    return Some(ended);
                }
                let change = change?;
                let delta = change.position_change();
                let travel = travel + delta;
                if travel.length() <= self.config.touch_slop {
                    self.phase = DragPhase::Armed { pointer, travel };
                    return None;
                }
                self.phase = DragPhase::Active { pointer };
                self.emit_pan(event, pointer, delta)
            }
            DragPhase::Active { pointer } => {
                let change = event.change(pointer).copied();
                if let Some(ended) = self.end_if_released(event, change.map(|c| (c.pressed, c.is_consumed()))) {
                    return Some(ended);
                }
                let delta = change?.position_change();
                self.emit_pan(event, pointer, delta)
            }
        }
    }

    /// Advance the long-press timer without new input.
    /// Returns `Started` if the delay elapsed while the contact stayed still.
    pub fn tick(&mut self, now_ms: u64) -> Option<GestureEvent> {
        if let DragPhase::AwaitingLongPress {
            pointer,
            position,
            down_ms,
            ..
        } = self.phase
        {
            if now_ms.saturating_sub(down_ms) >= self.config.long_press_ms {
                self.phase = DragPhase::Active { pointer };
                return Some(GestureEvent::Started { position });
            }
        }
        None
    }

    fn emit_pan(&mut self, event: &mut PointerEvent, pointer: PointerId, delta: Vec2) -> Option<GestureEvent> {
        if delta == Vec2::ZERO {
            return None;
        }
        if let Some(change) = event.change_mut(pointer) {
            change.consume();
        }
        Some(GestureEvent::Updated(GestureDelta::pan(delta)))
    }

    /// `state` is the tracked contact's (pressed, consumed) pair, if it appears in this frame
    fn end_if_released(&mut self, event: &PointerEvent, state: Option<(bool, bool)>) -> Option<GestureEvent> {
        match state {
            Some((_, true)) => {
                self.reset_after(event);
                Some(GestureEvent::Ended { cancelled: true })
            }
            Some((false, false)) => {
                self.reset_after(event);
                Some(GestureEvent::Ended { cancelled: false })
            }
            None if !event.any_pressed() => {
                self.phase = DragPhase::Idle;
                Some(GestureEvent::Ended { cancelled: false })
            }
            _ => None,
        }
    }

    fn reset_after(&mut self, event: &PointerEvent) {
        self.phase = if event.any_pressed() {
            DragPhase::Draining
        } else {
            DragPhase::Idle
        };
    }
}
