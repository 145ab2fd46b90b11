// Input abstraction and rebinding for a 2D platformer engine
//
// Turns raw device signals (keyboard key codes, gamepad buttons and axes)
// into a small set of logical game actions, with edge-triggered press
// detection, runtime rebinding with conflict detection, and two gameplay
// timing affordances: a late-jump buffer and a sticky ledge grab.
//
// ## Architecture
//
// - `action`: logical actions, binding tokens and default tables
// - `profile`: the active binding profile and override merging
// - `device`: raw keyboard/gamepad trackers and the gilrs backend
// - `buffer`: the late-jump buffer
// - `rebind`: the rebinding state machine
// - `map`: the `InputMap` coordinating everything
//
// ## Usage Example
//
// ```rust
// use rebound_input::{Action, Device, InputMap, ProfileOverrides};
//
// let mut input = InputMap::new(ProfileOverrides::default()).unwrap();
//
// // In your event loop, forward winit key events
// // input.handle_key_down(key_code);
//
// // Each tick: poll the pad, push physics state, then commit
// input.update_gamepad_state();
// input.update_ground_state(true);
// input.update_ledge_grab_state(false);
// input.update();
//
// if input.is_pressed(Action::Jump) {
//     // jump!
// }
//
// // Rebinding: the next key press resolves the receiver
// let pending = input.start_rebind(Action::Jump, Device::Keyboard).unwrap();
// input.handle_key_down(winit::keyboard::KeyCode::KeyZ);
// let profile = pending.try_recv().unwrap().unwrap();
// assert_eq!(
//     profile.keyboard[&Action::Jump],
//     winit::keyboard::KeyCode::KeyZ
// );
// ```

pub mod action;
pub mod buffer;
pub mod device;
pub mod map;
pub mod profile;
pub mod rebind;

// Re-export commonly used types
pub use action::{Action, Binding, Device, DpadDirection, PadControl};
pub use device::{GamepadBackend, GamepadState, GilrsBackend, KeyboardState};
pub use map::InputMap;
pub use profile::{InputProfile, ProfileOverrides};
pub use rebind::{RebindResult, RebindingInfo};

/// Input system errors
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("a rebind is already in progress")]
    RebindInProgress,

    #[error("rebind was cancelled")]
    RebindCancelled,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
