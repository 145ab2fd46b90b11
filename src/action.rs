// Game action definitions and default bindings

use winit::keyboard::KeyCode;

/// Represents all logical game inputs, independent of physical device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    Left,
    Right,
    Up,
    Down,
    Jump,

    // Gameplay
    /// Interact button; doubles as the ledge-grab control
    Grab,
    Block,

    // Meta
    Pause,
}

impl Action {
    /// Every action, in a stable order
    pub const ALL: [Action; 8] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Grab,
        Action::Block,
        Action::Pause,
    ];
}

/// D-pad direction synthesized from the primary axis pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DpadDirection {
    Left,
    Right,
    Up,
    Down,
}

impl DpadDirection {
    pub const ALL: [DpadDirection; 4] = [
        DpadDirection::Left,
        DpadDirection::Right,
        DpadDirection::Up,
        DpadDirection::Down,
    ];
}

/// A physical gamepad control in the standard layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadControl {
    /// Positional button index (standard layout: 0 = South, 1 = East, ...)
    Button(usize),
    /// Direction derived from axes 0/1 against the deadzone
    Dpad(DpadDirection),
}

/// Which physical device a rebind or conflict query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Keyboard,
    Gamepad,
}

/// A concrete binding value; the variant identifies the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Key(KeyCode),
    Pad(PadControl),
}

impl Binding {
    /// The device this binding belongs to
    pub fn device(&self) -> Device {
        match self {
            Binding::Key(_) => Device::Keyboard,
            Binding::Pad(_) => Device::Gamepad,
        }
    }
}

/// Default keyboard bindings (arrows + Space/X/C/P)
///
/// `Escape` is never bound by default: it is reserved to cancel an
/// in-flight rebind.
pub fn default_keyboard_bindings() -> Vec<(Action, KeyCode)> {
    vec![
        (Action::Left, KeyCode::ArrowLeft),
        (Action::Right, KeyCode::ArrowRight),
        (Action::Up, KeyCode::ArrowUp),
        (Action::Down, KeyCode::ArrowDown),
        (Action::Jump, KeyCode::Space),
        (Action::Grab, KeyCode::KeyX),
        (Action::Block, KeyCode::KeyC),
        (Action::Pause, KeyCode::KeyP),
    ]
}

/// Default gamepad bindings (D-pad movement, face buttons, Start)
pub fn default_gamepad_bindings() -> Vec<(Action, PadControl)> {
    vec![
        (Action::Left, PadControl::Dpad(DpadDirection::Left)),
        (Action::Right, PadControl::Dpad(DpadDirection::Right)),
        (Action::Up, PadControl::Dpad(DpadDirection::Up)),
        (Action::Down, PadControl::Dpad(DpadDirection::Down)),
        (Action::Jump, PadControl::Button(0)),  // South (A / Cross)
        (Action::Grab, PadControl::Button(2)),  // West (X / Square)
        (Action::Block, PadControl::Button(1)), // East (B / Circle)
        (Action::Pause, PadControl::Button(9)), // Start
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_action_equality() {
        assert_eq!(Action::Jump, Action::Jump);
        assert_ne!(Action::Jump, Action::Grab);
    }

    #[test]
    fn test_all_actions_listed_once() {
        let unique: HashSet<_> = Action::ALL.iter().collect();
        assert_eq!(unique.len(), Action::ALL.len());
    }

    #[test]
    fn test_binding_device() {
        assert_eq!(Binding::Key(KeyCode::Space).device(), Device::Keyboard);
        assert_eq!(
            Binding::Pad(PadControl::Button(0)).device(),
            Device::Gamepad
        );
        assert_eq!(
            Binding::Pad(PadControl::Dpad(DpadDirection::Left)).device(),
            Device::Gamepad
        );
    }

    #[test]
    fn test_default_keyboard_covers_every_action() {
        let bindings = default_keyboard_bindings();
        for action in Action::ALL {
            assert_eq!(
                bindings.iter().filter(|(a, _)| *a == action).count(),
                1,
                "expected exactly one keyboard binding for {:?}",
                action
            );
        }
    }

    #[test]
    fn test_default_gamepad_covers_every_action() {
        let bindings = default_gamepad_bindings();
        for action in Action::ALL {
            assert_eq!(
                bindings.iter().filter(|(a, _)| *a == action).count(),
                1,
                "expected exactly one gamepad binding for {:?}",
                action
            );
        }
    }

    #[test]
    fn test_escape_not_bound_by_default() {
        let bindings = default_keyboard_bindings();
        assert!(
            bindings.iter().all(|(_, key)| *key != KeyCode::Escape),
            "Escape is reserved for rebind cancellation"
        );
    }

    #[test]
    fn test_no_duplicate_default_keys() {
        let bindings = default_keyboard_bindings();
        let mut seen = HashSet::new();
        for (_, key) in bindings {
            assert!(seen.insert(key), "Duplicate key in default bindings");
        }
    }
}
