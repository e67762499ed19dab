//! Ignition button debounce latch.
//!
//! A momentary push button is turned into a latched engine on/off request.
//! A request flips only on a rising edge that arrives while the latch is
//! armed; the latch re-arms on the falling edge. Holding the button down
//! therefore yields exactly one toggle per press-release cycle.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleEvent {
    None,
    ToggledOn,
    ToggledOff,
}

impl ToggleEvent {
    pub fn is_toggle(self) -> bool {
        self != ToggleEvent::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnitionState {
    requested: bool,
    previous_raw: bool,
    awaiting_release: bool,
    primed: bool,
}

impl IgnitionState {
    /// Power-on state. `previous_raw` starts at the inactive level and the
    /// first sample only seeds it, so a button held through boot does not
    /// count as a press.
    pub const fn new() -> Self {
        Self {
            requested: false,
            previous_raw: false,
            awaiting_release: false,
            primed: false,
        }
    }

    /// Feed one raw button sample.
    pub fn update(&mut self, raw: bool) -> ToggleEvent {
        if !self.primed {
            self.primed = true;
            self.previous_raw = raw;
            return ToggleEvent::None;
        }

        let rising = raw && !self.previous_raw;
        let falling = !raw && self.previous_raw;
        self.previous_raw = raw;

        if falling {
            self.awaiting_release = false;
            return ToggleEvent::None;
        }

        if !rising || self.awaiting_release {
            return ToggleEvent::None;
        }

        self.requested = !self.requested;
        self.awaiting_release = true;

        if self.requested {
            ToggleEvent::ToggledOn
        } else {
            ToggleEvent::ToggledOff
        }
    }

    /// Debounced engine request.
    pub fn requested(&self) -> bool {
        self.requested
    }

    pub fn awaiting_release(&self) -> bool {
        self.awaiting_release
    }

    /// Force the latched request to "off" without touching edge tracking.
    pub fn clear_request(&mut self) {
        self.requested = false;
    }
}

impl Default for IgnitionState {
    fn default() -> Self {
        Self::new()
    }
}
