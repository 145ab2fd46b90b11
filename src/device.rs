// Raw device state trackers and gamepad polling

use std::collections::HashSet;

use gilrs::{Axis, Button, Gilrs};
use log::{info, warn};
use winit::keyboard::KeyCode;

use crate::action::DpadDirection;

/// Button count of the standard gamepad layout
pub const STANDARD_BUTTON_COUNT: usize = 17;

/// Axis count of the standard gamepad layout (two sticks)
pub const STANDARD_AXIS_COUNT: usize = 4;

/// Standard-layout buttons in positional order
const STANDARD_BUTTONS: [Button; STANDARD_BUTTON_COUNT] = [
    Button::South,         // 0
    Button::East,          // 1
    Button::West,          // 2
    Button::North,         // 3
    Button::LeftTrigger,   // 4  (L1)
    Button::RightTrigger,  // 5  (R1)
    Button::LeftTrigger2,  // 6  (L2)
    Button::RightTrigger2, // 7  (R2)
    Button::Select,        // 8
    Button::Start,         // 9
    Button::LeftThumb,     // 10
    Button::RightThumb,    // 11
    Button::DPadUp,        // 12
    Button::DPadDown,      // 13
    Button::DPadLeft,      // 14
    Button::DPadRight,     // 15
    Button::Mode,          // 16
];

/// Set of physically held keyboard keys
///
/// Mutated only by the key event handlers; read-only everywhere else.
#[derive(Debug, Default)]
pub struct KeyboardState {
    down: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: KeyCode) {
        self.down.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.down.remove(&key);
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    pub fn clear(&mut self) {
        self.down.clear();
    }
}

/// Normalized gamepad snapshot, replaced wholesale each poll
///
/// Replacing instead of mutating avoids stale-index bugs when a
/// controller disconnects and reconnects between ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct GamepadState {
    /// Button states, positional per the standard layout
    pub buttons: Vec<bool>,

    /// Axis values in [-1, 1]; 0 = horizontal, 1 = vertical (down-positive)
    pub axes: Vec<f32>,

    pub connected: bool,
}

impl GamepadState {
    /// Neutral snapshot for an absent controller
    pub fn disconnected() -> Self {
        Self {
            buttons: vec![false; STANDARD_BUTTON_COUNT],
            axes: vec![0.0; STANDARD_AXIS_COUNT],
            connected: false,
        }
    }

    /// Whether the button at a positional index is held
    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    /// Axis value at an index, neutral when out of range
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    /// D-pad synthesis: an axis value counts as pressed in a direction
    /// when its magnitude reaches the deadzone (inclusive) and its sign
    /// matches. Opposing directions on one axis are mutually exclusive.
    pub fn dpad_active(&self, direction: DpadDirection, deadzone: f32) -> bool {
        let (axis, positive) = match direction {
            DpadDirection::Left => (0, false),
            DpadDirection::Right => (0, true),
            DpadDirection::Up => (1, false),
            DpadDirection::Down => (1, true),
        };
        let value = self.axis(axis);
        if value == 0.0 {
            return false;
        }
        value.abs() >= deadzone && (value > 0.0) == positive
    }
}

impl Default for GamepadState {
    fn default() -> Self {
        Self::disconnected()
    }
}

/// Source of per-tick gamepad snapshots
///
/// Injected into [`crate::InputMap`] so the core never reaches for
/// platform state directly, and tests can substitute scripted snapshots.
pub trait GamepadBackend {
    /// Produce the current snapshot; called once per tick.
    /// Must return [`GamepadState::disconnected`] when no pad is present.
    fn poll(&mut self) -> GamepadState;
}

/// gilrs-backed [`GamepadBackend`] tracking the first connected pad
pub struct GilrsBackend {
    gilrs: Option<Gilrs>,
    active: Option<gilrs::GamepadId>,
}

impl GilrsBackend {
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(e) => {
                warn!("Gamepad support unavailable: {}", e);
                None
            }
        };
        Self {
            gilrs,
            active: None,
        }
    }
}

impl Default for GilrsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GamepadBackend for GilrsBackend {
    fn poll(&mut self) -> GamepadState {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return GamepadState::disconnected();
        };

        // Drain pending events to track connects and disconnects
        while let Some(event) = gilrs.next_event() {
            match event.event {
                gilrs::EventType::Connected => {
                    if self.active.is_none() {
                        info!("Gamepad connected: {}", gilrs.gamepad(event.id).name());
                        self.active = Some(event.id);
                    }
                }
                gilrs::EventType::Disconnected => {
                    if self.active == Some(event.id) {
                        info!("Gamepad disconnected");
                        self.active = None;
                    }
                }
                _ => {}
            }
        }

        // Adopt a pad that was already plugged in at startup
        if self.active.is_none() {
            self.active = gilrs.gamepads().next().map(|(id, _)| id);
        }

        let Some(id) = self.active else {
            return GamepadState::disconnected();
        };
        let pad = gilrs.gamepad(id);
        if !pad.is_connected() {
            return GamepadState::disconnected();
        }

        let mut state = GamepadState::disconnected();
        state.connected = true;
        for (index, button) in STANDARD_BUTTONS.iter().enumerate() {
            state.buttons[index] = pad.is_pressed(*button);
        }
        // gilrs sticks are up-positive; the snapshot uses down-positive
        state.axes[0] = pad.value(Axis::LeftStickX);
        state.axes[1] = -pad.value(Axis::LeftStickY);
        state.axes[2] = pad.value(Axis::RightStickX);
        state.axes[3] = -pad.value(Axis::RightStickY);

        // A held hat switch drives the primary axis pair so D-pad
        // bindings work on pads that report the hat as buttons
        if state.buttons[14] {
            state.axes[0] = -1.0;
        }
        if state.buttons[15] {
            state.axes[0] = 1.0;
        }
        if state.buttons[12] {
            state.axes[1] = -1.0;
        }
        if state.buttons[13] {
            state.axes[1] = 1.0;
        }

        state
    }
}
