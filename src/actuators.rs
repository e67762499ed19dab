use heapless::Vec;
use serde::{Deserialize, Serialize};

const MAX_RECORDED_OUTPUTS: usize = 32;

/// Everything the controller drives in one tick. Write-only: the controller
/// never reads these back as state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActuatorOutputs {
    pub alarm_driven: bool,
    pub engine_powered: bool,
    pub safe_indicator: bool,
    pub running_indicator: bool,
    pub headlight_lamps: bool,
    pub highbeam_lamps: bool,
}

/// Collaborator owning the output pins. Writes are idempotent.
pub trait ActuatorSink {
    fn set_alarm(&mut self, driven: bool);
    fn set_engine_power(&mut self, powered: bool);
    fn set_safe_indicator(&mut self, on: bool);
    fn set_running_indicator(&mut self, on: bool);
    fn set_headlight_lamps(&mut self, on: bool);
    fn set_highbeam_lamps(&mut self, on: bool);

    fn apply(&mut self, outputs: &ActuatorOutputs) {
        self.set_alarm(outputs.alarm_driven);
        self.set_engine_power(outputs.engine_powered);
        self.set_safe_indicator(outputs.safe_indicator);
        self.set_running_indicator(outputs.running_indicator);
        self.set_headlight_lamps(outputs.headlight_lamps);
        self.set_highbeam_lamps(outputs.highbeam_lamps);
    }
}

/// In-memory actuator bank that keeps the current pin levels and a bounded
/// history of distinct output sets.
#[derive(Debug, Clone, Default)]
pub struct RecordingActuators {
    current: ActuatorOutputs,
    history: Vec<ActuatorOutputs, MAX_RECORDED_OUTPUTS>,
    write_count: u32,
}

impl RecordingActuators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &ActuatorOutputs {
        &self.current
    }

    /// Distinct output sets in the order they were first applied.
    pub fn history(&self) -> &[ActuatorOutputs] {
        &self.history
    }

    pub fn write_count(&self) -> u32 {
        self.write_count
    }

    fn record(&mut self) {
        self.write_count = self.write_count.saturating_add(1);
        if self.history.last() == Some(&self.current) {
            return;
        }
        if self.history.is_full() {
            self.history.remove(0);
        }
        let _ = self.history.push(self.current);
    }
}

impl ActuatorSink for RecordingActuators {
    fn set_alarm(&mut self, driven: bool) {
        self.current.alarm_driven = driven;
    }

    fn set_engine_power(&mut self, powered: bool) {
        self.current.engine_powered = powered;
    }

    fn set_safe_indicator(&mut self, on: bool) {
        self.current.safe_indicator = on;
    }

    fn set_running_indicator(&mut self, on: bool) {
        self.current.running_indicator = on;
    }

    fn set_headlight_lamps(&mut self, on: bool) {
        self.current.headlight_lamps = on;
    }

    fn set_highbeam_lamps(&mut self, on: bool) {
        self.current.highbeam_lamps = on;
    }

    fn apply(&mut self, outputs: &ActuatorOutputs) {
        self.current = *outputs;
        self.record();
    }
}
