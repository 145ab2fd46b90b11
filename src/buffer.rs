// Late-jump buffering
//
// Compensates for human reaction time: a jump pressed slightly before
// landing should still register on touchdown.

use std::time::{Duration, Instant};

/// Buffers the most recent airborne jump press.
///
/// A press opens a window; a landing inside the window consumes the press
/// exactly once. Consumed or expired presses never re-trigger. Timestamps
/// are passed in so callers control the clock and boundary behavior is
/// testable without sleeping.
#[derive(Debug, Default)]
pub struct JumpBuffer {
    pressed_at: Option<Instant>,
}

impl JumpBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a jump press at `now`, replacing any earlier press
    pub fn record_press(&mut self, now: Instant) {
        self.pressed_at = Some(now);
    }

    /// Whether an unconsumed press is still inside the window
    ///
    /// Inclusive: a landing exactly `window` after the press still counts.
    pub fn is_open(&self, now: Instant, window: Duration) -> bool {
        match self.pressed_at {
            Some(pressed_at) => now.saturating_duration_since(pressed_at) <= window,
            None => false,
        }
    }

    /// Consume the buffered press if the window is still open
    ///
    /// Returns true at most once per recorded press.
    pub fn consume(&mut self, now: Instant, window: Duration) -> bool {
        if self.is_open(now, window) {
            self.pressed_at = None;
            true
        } else {
            false
        }
    }

    /// Discard any buffered press
    pub fn clear(&mut self) {
        self.pressed_at = None;
    }
}
