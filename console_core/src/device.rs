//! Device-input collaborator

use serde::{Deserialize, Serialize};

/// Signals latched by the input device during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSignals {
    pub focus_requested: bool,
    pub quit_focus_requested: bool,
    pub move_up_requested: bool,
    pub move_down_requested: bool,
}

impl DeviceSignals {
    /// Returns true if no signal fired
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Polled once per tick by the controller
pub trait DeviceInput {
    /// Returns the signals raised since the last poll and resets them
    fn poll(&mut self) -> DeviceSignals;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_signals_idle() {
        assert!(DeviceSignals::default().is_idle());

        let signals = DeviceSignals {
            move_up_requested: true,
            ..Default::default()
        };
        assert!(!signals.is_idle());
    }
}
