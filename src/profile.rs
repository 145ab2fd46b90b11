// Binding profile and override merging

use std::collections::HashMap;
use std::time::Duration;

use winit::keyboard::KeyCode;

use crate::action::{self, Action, Binding, Device, PadControl};
use crate::InputError;

/// Default minimum axis magnitude before a direction counts as pressed
pub const DEFAULT_DEADZONE: f32 = 0.25;

/// Default late-jump buffer window
pub const DEFAULT_LATE_JUMP: Duration = Duration::from_millis(100);

/// The active binding configuration
///
/// Invariant: both maps hold exactly one binding per [`Action`]. Profiles
/// built through [`InputProfile::default`] or
/// [`InputProfile::with_overrides`] satisfy this by construction;
/// hand-built profiles are validated when installed into an
/// [`crate::InputMap`].
///
/// Numeric fields follow the clamp-on-write policy: finite out-of-range
/// `deadzone` values clamp into `[0, 1]`, while non-finite values are
/// rejected with [`InputError::InvalidConfiguration`]. The late-jump
/// window is a [`Duration`], so negative values are unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub struct InputProfile {
    /// Keyboard binding per action
    pub keyboard: HashMap<Action, KeyCode>,

    /// Gamepad binding per action
    pub gamepad: HashMap<Action, PadControl>,

    /// Minimum normalized axis magnitude, in [0, 1]
    pub deadzone: f32,

    /// Late-jump buffer window
    pub late_jump: Duration,

    /// Whether ledge grab is a toggle (true) or a hold (false)
    pub sticky_grab: bool,
}

impl Default for InputProfile {
    fn default() -> Self {
        Self {
            keyboard: action::default_keyboard_bindings().into_iter().collect(),
            gamepad: action::default_gamepad_bindings().into_iter().collect(),
            deadzone: DEFAULT_DEADZONE,
            late_jump: DEFAULT_LATE_JUMP,
            sticky_grab: false,
        }
    }
}

impl InputProfile {
    /// Build a profile by merging overrides over the defaults
    ///
    /// Precedence is per field: an overridden action keeps its override,
    /// every other action keeps its default. Numeric overrides go through
    /// the same sanitization as the runtime setters.
    pub fn with_overrides(overrides: ProfileOverrides) -> Result<Self, InputError> {
        let mut profile = Self::default();
        for (action, key) in overrides.keyboard {
            profile.keyboard.insert(action, key);
        }
        for (action, control) in overrides.gamepad {
            profile.gamepad.insert(action, control);
        }
        if let Some(deadzone) = overrides.deadzone {
            profile.deadzone = deadzone;
        }
        if let Some(ms) = overrides.late_jump_ms {
            profile.late_jump = Duration::from_millis(ms);
        }
        if let Some(sticky) = overrides.sticky_grab {
            profile.sticky_grab = sticky;
        }
        profile.sanitize()?;
        Ok(profile)
    }

    /// The current binding for an action on a device
    pub fn binding_for(&self, action: Action, device: Device) -> Option<Binding> {
        match device {
            Device::Keyboard => self.keyboard.get(&action).map(|key| Binding::Key(*key)),
            Device::Gamepad => self.gamepad.get(&action).map(|control| Binding::Pad(*control)),
        }
    }

    /// All actions whose current binding on the binding's device equals it
    ///
    /// Advisory only: committing a rebind never blocks on conflicts, a UI
    /// calls this first and decides whether to proceed.
    pub fn check_conflicts(&self, binding: &Binding) -> Vec<Action> {
        Action::ALL
            .iter()
            .copied()
            .filter(|action| match binding {
                Binding::Key(key) => self.keyboard.get(action) == Some(key),
                Binding::Pad(control) => self.gamepad.get(action) == Some(control),
            })
            .collect()
    }

    /// Overwrite the binding for an action on the binding's device
    pub(crate) fn set_binding(&mut self, action: Action, binding: Binding) {
        match binding {
            Binding::Key(key) => {
                self.keyboard.insert(action, key);
            }
            Binding::Pad(control) => {
                self.gamepad.insert(action, control);
            }
        }
    }

    /// Validate invariants, clamping finite numeric fields into range
    pub(crate) fn sanitize(&mut self) -> Result<(), InputError> {
        if !self.deadzone.is_finite() {
            return Err(InputError::InvalidConfiguration(format!(
                "deadzone must be finite, got {}",
                self.deadzone
            )));
        }
        self.deadzone = self.deadzone.clamp(0.0, 1.0);

        for action in Action::ALL {
            if !self.keyboard.contains_key(&action) {
                return Err(InputError::InvalidConfiguration(format!(
                    "no keyboard binding for {:?}",
                    action
                )));
            }
            if !self.gamepad.contains_key(&action) {
                return Err(InputError::InvalidConfiguration(format!(
                    "no gamepad binding for {:?}",
                    action
                )));
            }
        }
        Ok(())
    }
}

/// Partial profile overrides applied over the defaults
///
/// Absent fields keep their default value; listed keyboard/gamepad pairs
/// replace only the named actions.
#[derive(Debug, Clone, Default)]
pub struct ProfileOverrides {
    pub keyboard: Vec<(Action, KeyCode)>,
    pub gamepad: Vec<(Action, PadControl)>,
    pub deadzone: Option<f32>,
    pub late_jump_ms: Option<u64>,
    pub sticky_grab: Option<bool>,
}
