use std::collections::BTreeMap;

use egui::{Context, Event, PointerButton, Pos2, TouchPhase};

pub mod gestures;
pub mod pointer;

pub use gestures::{
    DragActivation, DragGestureDetector, GestureConfig, GestureDelta, GestureEvent, TransformGestureDetector,
};
pub use pointer::{PointerChange, PointerEvent, PointerId};

/// The mouse is reported as a single contact with this id
pub const MOUSE_POINTER_ID: PointerId = u64::MAX;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Contact {
    position: Pos2,
    pressed: bool,
}

/// Handles converting raw egui input into per-frame `PointerEvent`s.
///
/// Touch contacts are reported individually so multi-finger gestures work.
/// When no touch contact is active the primary mouse button acts as a single
/// contact. egui also mirrors the first finger as mouse input, so mouse events
/// are ignored in any frame that carries touch events.
#[derive(Debug, Default)]
pub struct InputHandler {
    contacts: BTreeMap<PointerId, Contact>,
    last_mouse_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while at least one contact is down
    pub fn any_pressed(&self) -> bool {
        self.contacts.values().any(|c| c.pressed)
    }

    /// Collect this frame's contact changes. Returns `None` when nothing moved,
    /// pressed or lifted.
    pub fn process_input(&mut self, ctx: &Context) -> Option<PointerEvent> {
        let (events, uptime_ms) = ctx.input(|i| (i.events.clone(), (i.time * 1000.0) as u64));
        self.process_events(&events, uptime_ms)
    }

    /// Same as [`Self::process_input`] over an explicit event list
    pub fn process_events(&mut self, events: &[Event], uptime_ms: u64) -> Option<PointerEvent> {
        let previous = self.contacts.clone();
        let has_touch = events.iter().any(|e| matches!(e, Event::Touch { .. }))
            || previous.keys().any(|id| *id != MOUSE_POINTER_ID);

        for event in events {
            match event {
                Event::Touch { id, phase, pos, .. } => {
                    let pressed = matches!(phase, TouchPhase::Start | TouchPhase::Move);
                    self.contacts.insert(id.0, Contact { position: *pos, pressed });
                }
                Event::PointerMoved(pos) if !has_touch => {
                    self.last_mouse_pos = Some(*pos);
                    if let Some(contact) = self.contacts.get_mut(&MOUSE_POINTER_ID) {
                        contact.position = *pos;
                    }
                }
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } if !has_touch => {
                    self.last_mouse_pos = Some(*pos);
                    self.contacts.insert(
                        MOUSE_POINTER_ID,
                        Contact {
                            position: *pos,
                            pressed: *pressed,
                        },
                    );
                }
                Event::PointerGone if !has_touch => {
                    if let Some(contact) = self.contacts.get_mut(&MOUSE_POINTER_ID) {
                        contact.pressed = false;
                    }
                }
                _ => {}
            }
        }

        let mut changes = Vec::new();
        let mut anything_changed = false;
        for (id, contact) in &self.contacts {
            let before = previous.get(id);
            let previous_pressed = before.is_some_and(|b| b.pressed);
            if !previous_pressed && !contact.pressed {
                continue;
            }
            let previous_position = before.map_or(contact.position, |b| b.position);
            let change = match (previous_pressed, contact.pressed) {
                (false, true) => PointerChange::down(*id, contact.position, uptime_ms),
                (true, false) => PointerChange::up(*id, contact.position, uptime_ms),
                _ => PointerChange::moved(*id, previous_position, contact.position, uptime_ms),
            };
            anything_changed |= change.changed_to_down() || change.changed_to_up() || change.position_changed();
            changes.push(change);
        }

        self.contacts.retain(|_, contact| contact.pressed);

        if anything_changed {
            Some(PointerEvent::new(changes))
        } else {
            None
        }
    }
}
