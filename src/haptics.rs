use std::fmt;

/// The vibration pulses the editor requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticKind {
    /// Long pulse when a long-press picks up a carousel photo
    LongPress,
    /// Short confirmation when a photo is deleted
    Confirm,
}

impl fmt::Display for HapticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HapticKind::LongPress => write!(f, "long-press"),
            HapticKind::Confirm => write!(f, "confirm"),
        }
    }
}

/// Fire-and-forget haptic output. Implementations must not block.
pub trait HapticFeedback {
    fn perform(&mut self, kind: HapticKind);
}

/// Desktop stand-in that records the request in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHaptics;

impl HapticFeedback for LogHaptics {
    fn perform(&mut self, kind: HapticKind) {
        log::debug!("haptic feedback: {}", kind);
    }
}
