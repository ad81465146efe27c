use egui::{Pos2, Vec2};

pub type PointerId = u64;

/// One contact point's transition between two consecutive input frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerChange {
    pub id: PointerId,
    pub position: Pos2,
    pub previous_position: Pos2,
    pub pressed: bool,
    pub previous_pressed: bool,
    /// Milliseconds on a monotonic clock
    pub uptime_ms: u64,
    consumed: bool,
}

impl PointerChange {
    /// A contact that just touched down
    pub fn down(id: PointerId, position: Pos2, uptime_ms: u64) -> Self {
        Self {
            id,
            position,
            previous_position: position,
            pressed: true,
            previous_pressed: false,
            uptime_ms,
            consumed: false,
        }
    }

    /// A contact that stays down, moving from `from` to `to`
    pub fn moved(id: PointerId, from: Pos2, to: Pos2, uptime_ms: u64) -> Self {
        Self {
            id,
            position: to,
            previous_position: from,
            pressed: true,
            previous_pressed: true,
            uptime_ms,
            consumed: false,
        }
    }

    /// A contact that stays down without moving
    pub fn held(id: PointerId, position: Pos2, uptime_ms: u64) -> Self {
        Self::moved(id, position, position, uptime_ms)
    }

    /// A contact that was lifted at `position`
    pub fn up(id: PointerId, position: Pos2, uptime_ms: u64) -> Self {
        Self {
            id,
            position,
            previous_position: position,
            pressed: false,
            previous_pressed: true,
            uptime_ms,
            consumed: false,
        }
    }

    pub fn changed_to_down(&self) -> bool {
        self.pressed && !self.previous_pressed
    }

    pub fn changed_to_up(&self) -> bool {
        !self.pressed && self.previous_pressed
    }

    pub fn position_change(&self) -> Vec2 {
        self.position - self.previous_position
    }

    pub fn position_changed(&self) -> bool {
        self.position_change() != Vec2::ZERO
    }

    /// Mark this change as handled so no other recognizer reacts to it
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Down in both the previous and the current frame
    fn is_tracked(&self) -> bool {
        self.pressed && self.previous_pressed
    }
}

/// All contact changes delivered in one input frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerEvent {
    pub changes: Vec<PointerChange>,
}

impl PointerEvent {
    pub fn new(changes: Vec<PointerChange>) -> Self {
        Self { changes }
    }

    /// Latest timestamp among the changes
    pub fn uptime_ms(&self) -> u64 {
        self.changes.iter().map(|c| c.uptime_ms).max().unwrap_or(0)
    }

    pub fn any_pressed(&self) -> bool {
        self.changes.iter().any(|c| c.pressed)
    }

    pub fn any_consumed(&self) -> bool {
        self.changes.iter().any(|c| c.is_consumed())
    }

    pub fn change(&self, id: PointerId) -> Option<&PointerChange> {
        self.changes.iter().find(|c| c.id == id)
    }

    pub fn change_mut(&mut self, id: PointerId) -> Option<&mut PointerChange> {
        self.changes.iter_mut().find(|c| c.id == id)
    }

    /// Number of contacts that were down in both frames
    pub fn tracked_count(&self) -> usize {
        self.changes.iter().filter(|c| c.is_tracked()).count()
    }

    /// Average position of the contacts down in both frames
    pub fn centroid(&self, use_current: bool) -> Option<Pos2> {
        let mut sum = Vec2::ZERO;
        let mut count = 0usize;
        for change in self.changes.iter().filter(|c| c.is_tracked()) {
            let position = if use_current { change.position } else { change.previous_position };
            sum += position.to_vec2();
            count += 1;
        }
        (count > 0).then(|| (sum / count as f32).to_pos2())
    }

    /// Average distance of the tracked contacts from their centroid. Zero for a single contact.
    pub fn centroid_size(&self, use_current: bool) -> f32 {
        let Some(centroid) = self.centroid(use_current) else {
            return 0.0;
        };
        let mut distance = 0.0;
        let mut count = 0usize;
        for change in self.changes.iter().filter(|c| c.is_tracked()) {
            let position = if use_current { change.position } else { change.previous_position };
            distance += position.distance(centroid);
            count += 1;
        }
        if count == 0 { 0.0 } else { distance / count as f32 }
    }

    /// Centroid movement since the previous frame
    pub fn pan(&self) -> Vec2 {
        match (self.centroid(true), self.centroid(false)) {
            (Some(current), Some(previous)) => current - previous,
            _ => Vec2::ZERO,
        }
    }

    /// Ratio of the current to the previous centroid size; 1 when undefined
    pub fn zoom(&self) -> f32 {
        let current = self.centroid_size(true);
        let previous = self.centroid_size(false);
        if current == 0.0 || previous == 0.0 { 1.0 } else { current / previous }
    }

    /// Rotation in degrees since the previous frame, weighted by each contact's distance
    /// from the centroid. Zero with fewer than two tracked contacts.
    pub fn rotation(&self) -> f32 {
        if self.tracked_count() < 2 {
            return 0.0;
        }
        let (Some(current_centroid), Some(previous_centroid)) = (self.centroid(true), self.centroid(false)) else {
            return 0.0;
        };

        let mut rotation = 0.0;
        let mut weight_sum = 0.0;
        for change in self.changes.iter().filter(|c| c.is_tracked()) {
            let previous_offset = change.previous_position - previous_centroid;
            let current_offset = change.position - current_centroid;
            let mut angle_diff = angle_degrees(current_offset) - angle_degrees(previous_offset);
            if angle_diff > 180.0 {
                angle_diff -= 360.0;
            } else if angle_diff < -180.0 {
                angle_diff += 360.0;
            }
            let weight = (current_offset + previous_offset).length() / 2.0;
            rotation += angle_diff * weight;
            weight_sum += weight;
        }
        if weight_sum == 0.0 { 0.0 } else { rotation / weight_sum }
    }
}

fn angle_degrees(offset: Vec2) -> f32 {
    if offset == Vec2::ZERO {
        0.0
    } else {
        offset.y.atan2(offset.x).to_degrees()
    }
}
