// InputMap - coordinates trackers, action resolution, rebinding and the
// gameplay timing extensions

use std::collections::HashSet;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use log::{debug, info};
use winit::keyboard::KeyCode;

use crate::action::{Action, Binding, Device, DpadDirection, PadControl};
use crate::buffer::JumpBuffer;
use crate::device::{GamepadBackend, GamepadState, KeyboardState};
use crate::profile::{InputProfile, ProfileOverrides};
use crate::rebind::{RebindResult, RebindSession, RebindingInfo};
use crate::InputError;

/// Maps raw device signals to logical game actions
///
/// Single-threaded and host-driven: the host delivers key events as they
/// arrive, calls the per-tick hooks (`update_gamepad_state`,
/// `update_ground_state`, `update_ledge_grab_state`) and then commits the
/// frame with [`InputMap::update`]. Queries between two commits are
/// stable; calling [`InputMap::is_pressed`] twice in one tick cannot
/// manufacture a second press.
pub struct InputMap {
    /// Active binding profile, exclusively owned
    profile: InputProfile,

    keyboard: KeyboardState,
    gamepad: GamepadState,
    backend: Option<Box<dyn GamepadBackend>>,

    /// In-flight rebind, at most one
    session: Option<RebindSession>,

    /// Raw per-action down state of the previous commit
    prev_raw: HashSet<Action>,

    /// Effective per-action down state of the previous commit
    down: HashSet<Action>,
    just_pressed: HashSet<Action>,
    just_released: HashSet<Action>,

    // Late-jump buffer
    jump_buffer: JumpBuffer,
    /// True for the one tick a buffered landing registers a jump
    buffered_jump_tick: bool,
    on_ground: bool,
    was_on_ground: bool,

    // Sticky ledge grab
    ledge_eligible: bool,
    grab_latched: bool,
}

impl InputMap {
    /// Create an input map from partial overrides merged over the defaults
    pub fn new(overrides: ProfileOverrides) -> Result<Self, InputError> {
        Ok(Self::from_profile(InputProfile::with_overrides(overrides)?))
    }

    fn from_profile(profile: InputProfile) -> Self {
        Self {
            profile,
            keyboard: KeyboardState::new(),
            gamepad: GamepadState::disconnected(),
            backend: None,
            session: None,
            prev_raw: HashSet::new(),
            down: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            jump_buffer: JumpBuffer::new(),
            buffered_jump_tick: false,
            on_ground: false,
            was_on_ground: false,
            ledge_eligible: false,
            grab_latched: false,
        }
    }

    /// Install the gamepad snapshot source
    pub fn set_gamepad_backend(&mut self, backend: Box<dyn GamepadBackend>) {
        self.backend = Some(backend);
    }

    // ---- Event handlers -------------------------------------------------

    /// Process a physical key press
    ///
    /// While a keyboard rebind session is open the event is consumed by
    /// the session instead of the tracker: `Escape` cancels, any other
    /// key becomes the new binding. The binding press never surfaces as
    /// a gameplay edge. Key repeats are harmless; the tracker is a set
    /// and edges come from the per-tick commit.
    pub fn handle_key_down(&mut self, key: KeyCode) {
        if let Some(session) = &self.session {
            if session.device == Device::Keyboard {
                if key == KeyCode::Escape {
                    self.cancel_rebind();
                } else {
                    self.finish_rebind(Binding::Key(key));
                }
                return;
            }
        }
        self.keyboard.press(key);
    }

    /// Process a physical key release
    pub fn handle_key_up(&mut self, key: KeyCode) {
        self.keyboard.release(key);
    }

    /// Poll the gamepad backend, once per tick
    ///
    /// No-op without a backend; a disconnected pad reports a neutral
    /// snapshot and is never an error. While a gamepad rebind session is
    /// open the poll feeds the session instead of gameplay state: the
    /// first button transition or axis deadzone crossing in a new
    /// direction becomes the binding.
    pub fn update_gamepad_state(&mut self) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        let next = backend.poll();

        let rebinding_gamepad =
            matches!(&self.session, Some(session) if session.device == Device::Gamepad);
        if rebinding_gamepad {
            if let Some(control) =
                Self::detect_new_control(&self.gamepad, &next, self.profile.deadzone)
            {
                if let Some(session) = self.session.take() {
                    let action = session.action;
                    self.profile.set_binding(action, Binding::Pad(control));
                    session.complete(self.profile.clone());
                    self.gamepad = next;
                    // Pre-mark the action so the binding press itself
                    // does not surface as a gameplay edge
                    self.down.insert(action);
                    self.prev_raw.insert(action);
                }
            }
            return;
        }

        self.gamepad = next;
    }

    /// First control that transitioned to active between two snapshots
    fn detect_new_control(
        prev: &GamepadState,
        next: &GamepadState,
        deadzone: f32,
    ) -> Option<PadControl> {
        if !next.connected {
            return None;
        }
        for (index, pressed) in next.buttons.iter().enumerate() {
            if *pressed && !prev.button(index) {
                return Some(PadControl::Button(index));
            }
        }
        for direction in DpadDirection::ALL {
            if next.dpad_active(direction, deadzone) && !prev.dpad_active(direction, deadzone) {
                return Some(PadControl::Dpad(direction));
            }
        }
        None
    }

    // ---- Per-tick pushes ------------------------------------------------

    /// Record the entity's ground contact for this tick
    pub fn update_ground_state(&mut self, on_ground: bool) {
        self.was_on_ground = self.on_ground;
        self.on_ground = on_ground;
    }

    /// Record the entity's ledge-grab eligibility for this tick
    ///
    /// Losing eligibility clears a sticky latch regardless of its state.
    pub fn update_ledge_grab_state(&mut self, eligible: bool) {
        self.ledge_eligible = eligible;
        if !eligible {
            self.grab_latched = false;
        }
    }

    /// Commit the frame: derive edges, advance the jump buffer and the
    /// sticky latch. Call once per tick, after events and pushes.
    pub fn update(&mut self) {
        let now = Instant::now();

        // Raw edges drive the buffer and the latch before the effective
        // state for this tick is committed
        let mut raw = HashSet::with_capacity(Action::ALL.len());
        for action in Action::ALL {
            if self.raw_down(action) {
                raw.insert(action);
            }
        }
        let jump_edge =
            raw.contains(&Action::Jump) && !self.prev_raw.contains(&Action::Jump);
        let grab_edge =
            raw.contains(&Action::Grab) && !self.prev_raw.contains(&Action::Grab);
        self.prev_raw = raw;

        // Airborne presses arm the buffer; grounded presses read through
        // the ordinary edge path
        if jump_edge && !self.on_ground {
            self.jump_buffer.record_press(now);
        }
        self.buffered_jump_tick = self.on_ground
            && !self.was_on_ground
            && self.jump_buffer.consume(now, self.profile.late_jump);
        if self.buffered_jump_tick {
            debug!("Buffered jump consumed on landing");
        }

        if self.profile.sticky_grab {
            if grab_edge {
                if self.grab_latched {
                    self.grab_latched = false;
                } else if self.ledge_eligible {
                    self.grab_latched = true;
                }
            }
        } else {
            self.grab_latched = false;
        }

        // Commit effective edges for this tick
        self.just_pressed.clear();
        self.just_released.clear();
        let mut effective = HashSet::with_capacity(Action::ALL.len());
        for action in Action::ALL {
            if self.is_down(action) {
                effective.insert(action);
            }
        }
        for action in Action::ALL {
            let is = effective.contains(&action);
            let was = self.down.contains(&action);
            if is && !was {
                self.just_pressed.insert(action);
            }
            if was && !is {
                self.just_released.insert(action);
            }
        }
        self.down = effective;
    }

    // ---- Queries --------------------------------------------------------

    /// Whether an action is currently active
    ///
    /// True when the bound key is held, the bound gamepad control is
    /// active, a buffered jump registered this tick (`Jump`), or the
    /// sticky grab latch is set (`Grab`).
    pub fn is_down(&self, action: Action) -> bool {
        if self.raw_down(action) {
            return true;
        }
        match action {
            Action::Jump => self.buffered_jump_tick,
            Action::Grab => self.profile.sticky_grab && self.grab_latched,
            _ => false,
        }
    }

    /// Whether an action transitioned to down on the last commit
    pub fn is_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Whether an action transitioned to up on the last commit
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Whether the entity is grabbing a ledge this tick
    ///
    /// Hold mode: the grab button is physically held and the host
    /// reported eligibility. Sticky mode: the latch is set.
    pub fn ledge_grab_active(&self) -> bool {
        if self.profile.sticky_grab {
            self.grab_latched
        } else {
            self.ledge_eligible && self.raw_down(Action::Grab)
        }
    }

    /// Directional input as (-1|0|+1, -1|0|+1), x right, y down
    pub fn direction(&self) -> (f32, f32) {
        let mut horizontal = 0.0;
        let mut vertical = 0.0;

        if self.is_down(Action::Left) {
            horizontal -= 1.0;
        }
        if self.is_down(Action::Right) {
            horizontal += 1.0;
        }
        if self.is_down(Action::Up) {
            vertical -= 1.0;
        }
        if self.is_down(Action::Down) {
            vertical += 1.0;
        }

        (horizontal, vertical)
    }

    /// Physical down state under the active profile, both devices OR-ed
    fn raw_down(&self, action: Action) -> bool {
        if let Some(key) = self.profile.keyboard.get(&action) {
            if self.keyboard.is_down(*key) {
                return true;
            }
        }
        match self.profile.gamepad.get(&action) {
            Some(PadControl::Button(index)) => self.gamepad.connected && self.gamepad.button(*index),
            Some(PadControl::Dpad(direction)) => {
                self.gamepad.connected && self.gamepad.dpad_active(*direction, self.profile.deadzone)
            }
            None => false,
        }
    }

    // ---- Profile --------------------------------------------------------

    /// Read-only snapshot of the active profile
    pub fn get_profile(&self) -> InputProfile {
        self.profile.clone()
    }

    /// Replace the active profile wholesale
    ///
    /// Rejects profiles leaving any action unbound or carrying a
    /// non-finite deadzone; finite out-of-range values clamp. The prior
    /// profile stays active on rejection.
    pub fn set_profile(&mut self, mut profile: InputProfile) -> Result<(), InputError> {
        profile.sanitize()?;
        info!("Input profile replaced");
        self.profile = profile;
        Ok(())
    }

    /// Set the deadzone; finite values clamp into [0, 1], non-finite
    /// values are rejected and the prior value stays
    pub fn set_deadzone(&mut self, pct: f32) -> Result<(), InputError> {
        if !pct.is_finite() {
            return Err(InputError::InvalidConfiguration(format!(
                "deadzone must be finite, got {}",
                pct
            )));
        }
        self.profile.deadzone = pct.clamp(0.0, 1.0);
        Ok(())
    }

    /// Set the late-jump buffer window in milliseconds
    pub fn set_late_jump_ms(&mut self, ms: u64) {
        self.profile.late_jump = Duration::from_millis(ms);
    }

    /// Switch between sticky (toggle) and hold ledge grab
    pub fn set_sticky_grab(&mut self, enabled: bool) {
        self.profile.sticky_grab = enabled;
        if !enabled {
            self.grab_latched = false;
        }
    }

    /// Actions whose current binding collides with `binding`; advisory,
    /// committing a rebind never blocks on conflicts
    pub fn check_conflicts(&self, binding: &Binding) -> Vec<Action> {
        self.profile.check_conflicts(binding)
    }

    // ---- Rebinding ------------------------------------------------------

    /// Begin rebinding an action; resolves over the returned channel on
    /// the next qualifying input, or with [`InputError::RebindCancelled`]
    ///
    /// Fails fast with [`InputError::RebindInProgress`] while another
    /// session is open; the open session is left untouched.
    pub fn start_rebind(
        &mut self,
        action: Action,
        device: Device,
    ) -> Result<Receiver<RebindResult>, InputError> {
        if self.session.is_some() {
            return Err(InputError::RebindInProgress);
        }
        let (session, rx) = RebindSession::open(action, device);
        self.session = Some(session);
        Ok(rx)
    }

    /// Abort any in-flight rebind; no-op when idle
    pub fn cancel_rebind(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel();
        }
    }

    /// Current rebinding state, for UI display
    pub fn rebinding_state(&self) -> RebindingInfo {
        match &self.session {
            Some(session) => RebindingInfo {
                is_rebinding: true,
                action: Some(session.action),
                device: Some(session.device),
            },
            None => RebindingInfo::idle(),
        }
    }

    fn finish_rebind(&mut self, binding: Binding) {
        if let Some(session) = self.session.take() {
            self.profile.set_binding(session.action, binding);
            session.complete(self.profile.clone());
        }
    }

    // ---- Lifecycle ------------------------------------------------------

    /// Clear all transient input state, keeping the profile
    pub fn reset(&mut self) {
        self.keyboard.clear();
        self.gamepad = GamepadState::disconnected();
        self.prev_raw.clear();
        self.down.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.jump_buffer.clear();
        self.buffered_jump_tick = false;
        self.on_ground = false;
        self.was_on_ground = false;
        self.ledge_eligible = false;
        self.grab_latched = false;
    }

    /// Tear down: cancel any rebind, drop the backend and clear all
    /// trackers. Idempotent; the map stays usable afterwards.
    pub fn cleanup(&mut self) {
        self.cancel_rebind();
        self.backend = None;
        self.reset();
    }
}

impl Default for InputMap {
    fn default() -> Self {
        Self::from_profile(InputProfile::default())
    }
}
