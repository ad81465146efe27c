//! Turning a finished drag into a discrete decision.
//!
//! Resolution is a pure match over the payload variant and the bounds the
//! layout last reported. The first matching rule wins:
//!
//! 1. a carousel photo whose drop point lies inside the canvas is added there
//! 2. a canvas photo whose rect overlaps the trash is deleted
//! 3. any other canvas photo is moved to its new canvas-relative transform
//! 4. everything else is a no-op
//!
//! Trash is checked before move because the two regions can overlap while the
//! trash overlay animates in.

use egui::{Pos2, Rect};

use crate::geometry::{contains_point, drag_rect, is_empty, overlaps};
use crate::model::{CanvasPhoto, DragPayload, Photo, canvas};
use crate::state::{DragOutcome, DragSessionState};

/// The decision produced for one completed drag
#[derive(Debug, Clone, PartialEq)]
pub enum DropAction {
    AddToCanvas {
        photo: Photo,
        /// Canvas-relative top-left corner
        position: Pos2,
    },
    Delete {
        instance_id: String,
    },
    Move {
        instance_id: String,
        position: Pos2,
        scale: f32,
        rotation: f32,
    },
    NoOp,
}

impl DropAction {
    /// Apply the decision to the placed-photo list, returning the new list.
    /// `NoOp` and actions on unknown ids return an identical copy.
    pub fn apply(&self, list: &[CanvasPhoto]) -> Vec<CanvasPhoto> {
        match self {
            DropAction::AddToCanvas { photo, position } => canvas::add(list, photo, *position),
            DropAction::Delete { instance_id } => canvas::remove(list, instance_id),
            DropAction::Move {
                instance_id,
                position,
                scale,
                rotation,
            } => canvas::transform(list, instance_id, *position, *scale, *rotation),
            DropAction::NoOp => list.to_vec(),
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, DropAction::NoOp)
    }
}

/// Screen bounds of the registered drop zones, as last reported by layout.
/// Both start out empty, which resolves every drop to `NoOp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTargets {
    pub canvas: Rect,
    pub trash: Rect,
}

impl Default for DropTargets {
    fn default() -> Self {
        Self {
            canvas: Rect::ZERO,
            trash: Rect::ZERO,
        }
    }
}

impl DropTargets {
    pub fn new(canvas: Rect, trash: Rect) -> Self {
        Self { canvas, trash }
    }
}

/// Decide what a finished drag does
pub fn resolve(outcome: &DragOutcome<DragPayload>, targets: &DropTargets) -> DropAction {
    let item_rect = drag_rect(outcome.position, outcome.size);
    match &outcome.payload {
        DragPayload::FromCarousel { photo } => {
            if contains_point(targets.canvas, outcome.position) {
                DropAction::AddToCanvas {
                    photo: photo.clone(),
                    position: canvas_relative(outcome.position, targets.canvas),
                }
            } else {
                DropAction::NoOp
            }
        }
        DragPayload::FromCanvas { canvas_photo } => {
            if overlaps(item_rect, targets.trash) {
                DropAction::Delete {
                    instance_id: canvas_photo.instance_id().to_owned(),
                }
            } else if is_empty(targets.canvas) {
                // No canvas origin to measure against yet
                DropAction::NoOp
            } else {
                DropAction::Move {
                    instance_id: canvas_photo.instance_id().to_owned(),
                    position: canvas_relative(outcome.position, targets.canvas),
                    scale: outcome.scale,
                    rotation: outcome.rotation,
                }
            }
        }
    }
}

/// Live hover query for highlight feedback while the drag is in flight
pub fn is_hovering<T>(state: &DragSessionState<T>, target: Rect) -> bool {
    if !state.is_active || is_empty(target) {
        return false;
    }
    overlaps(drag_rect(state.position, state.size), target)
}

fn canvas_relative(position: Pos2, canvas: Rect) -> Pos2 {
    (position - canvas.min).to_pos2()
}
