// Rebinding state machine
//
// At most one rebind session is in flight. The caller that started it
// holds the receiving end of a channel and either polls `try_recv` each
// frame or blocks on `recv`; the session resolves on the next qualifying
// physical input or when it is cancelled.

use std::sync::mpsc::{self, Receiver, Sender};

use log::info;

use crate::action::{Action, Device};
use crate::profile::InputProfile;
use crate::InputError;

/// Outcome delivered to the caller that started a rebind
pub type RebindResult = Result<InputProfile, InputError>;

/// Snapshot of the rebinding state machine, for UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebindingInfo {
    pub is_rebinding: bool,
    pub action: Option<Action>,
    pub device: Option<Device>,
}

impl RebindingInfo {
    pub(crate) fn idle() -> Self {
        Self {
            is_rebinding: false,
            action: None,
            device: None,
        }
    }
}

/// An in-flight rebind session
#[derive(Debug)]
pub(crate) struct RebindSession {
    pub action: Action,
    pub device: Device,
    tx: Sender<RebindResult>,
}

impl RebindSession {
    /// Open a session and hand back the caller's receiving end
    pub fn open(action: Action, device: Device) -> (Self, Receiver<RebindResult>) {
        let (tx, rx) = mpsc::channel();
        info!("Rebind started for {:?} on {:?}", action, device);
        (Self { action, device, tx }, rx)
    }

    /// Deliver the updated profile and close the session
    pub fn complete(self, profile: InputProfile) {
        info!("Rebind completed for {:?} on {:?}", self.action, self.device);
        // The caller may have dropped its receiver; nothing to do then
        let _ = self.tx.send(Ok(profile));
    }

    /// Close the session without writing a binding
    pub fn cancel(self) {
        info!("Rebind cancelled for {:?} on {:?}", self.action, self.device);
        let _ = self.tx.send(Err(InputError::RebindCancelled));
    }
}
