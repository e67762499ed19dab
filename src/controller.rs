use crate::actuators::{ActuatorOutputs, ActuatorSink};
use crate::config::ControllerConfig;
use crate::headlight::{HeadlightController, HeadlightMode, LampCommand};
use crate::ignition::{IgnitionState, ToggleEvent};
use crate::report::{ReportError, ReportEvent, ReportSink};
use crate::safety::{self, SafetyVerdict};
use crate::sensors::{SensorFrame, SensorSource};
use heapless::Vec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

// Welcome plus at most one transition report.
pub const MAX_EVENTS_PER_TICK: usize = 2;

pub type TickEvents = Vec<ReportEvent, MAX_EVENTS_PER_TICK>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    Idle,
    Running,
    Inhibited,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStats {
    pub ticks: u64,
    pub engine_starts: u32,
    pub inhibit_count: u32,
    pub forced_stops: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub state: ControllerState,
    pub toggle: ToggleEvent,
    pub verdict: SafetyVerdict,
    pub outputs: ActuatorOutputs,
    pub events: TickEvents,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Report sink failed: {0}")]
    Report(#[from] ReportError),
}

/// Ignition interlock and headlight controller.
///
/// Owns all state that survives between ticks. The external driver calls
/// [`Controller::tick`] (or [`Controller::run_cycle`]) once per control
/// period; no call ever blocks waiting for an input to change.
#[derive(Debug, Clone)]
pub struct Controller {
    config: ControllerConfig,
    state: ControllerState,
    ignition: IgnitionState,
    headlights: HeadlightController,
    welcome_sent: bool,
    stats: ControllerStats,
}

impl Controller {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            config,
            state: ControllerState::Idle,
            ignition: IgnitionState::new(),
            headlights: HeadlightController::new(),
            welcome_sent: false,
            stats: ControllerStats::default(),
        }
    }

    /// Advance one control period using an already captured frame.
    pub fn tick(&mut self, frame: &SensorFrame) -> TickOutcome {
        self.stats.ticks = self.stats.ticks.saturating_add(1);
        let mut events = TickEvents::new();

        if self.config.welcome_enabled && !self.welcome_sent && frame.driver_present() {
            self.welcome_sent = true;
            info!("Driver detected");
            let _ = events.push(ReportEvent::Welcome);
        }

        let toggle = self.ignition.update(frame.ignition_button());
        let verdict = safety::evaluate(frame);

        let next = self.next_state(toggle, &verdict, &mut events);
        if next != self.state {
            info!("{:?} -> {:?}", self.state, next);
            self.state = next;
        }

        let running = self.state == ControllerState::Running;
        let lamps = if running {
            self.headlights.update(
                frame.headlight_knob(),
                frame.ambient_light(),
                frame.highbeam_switch(),
                &self.config.headlight,
            )
        } else {
            self.headlights.shutdown()
        };

        let outputs = self.compose_outputs(&verdict, lamps);

        // The engine may only be powered while every interlock holds.
        debug_assert!(!outputs.engine_powered || verdict.all_safe);

        trace!(
            "tick={} state={:?} toggle={:?} outputs={:?}",
            self.stats.ticks,
            self.state,
            toggle,
            outputs
        );

        TickOutcome {
            state: self.state,
            toggle,
            verdict,
            outputs,
            events,
        }
    }

    fn next_state(
        &mut self,
        toggle: ToggleEvent,
        verdict: &SafetyVerdict,
        events: &mut TickEvents,
    ) -> ControllerState {
        match self.state {
            ControllerState::Idle => match toggle {
                ToggleEvent::ToggledOn if verdict.all_safe => {
                    self.stats.engine_starts = self.stats.engine_starts.saturating_add(1);
                    let _ = events.push(ReportEvent::EngineStarted);
                    ControllerState::Running
                }
                ToggleEvent::ToggledOn => self.enter_inhibited(verdict, events),
                ToggleEvent::ToggledOff => {
                    // Latch drifted out of step with the engine; re-sync.
                    debug!("Ignoring ignition off request while idle");
                    self.ignition.clear_request();
                    ControllerState::Idle
                }
                ToggleEvent::None => ControllerState::Idle,
            },
            ControllerState::Running => {
                if !verdict.all_safe {
                    warn!("Interlock lost while running, forcing engine stop");
                    self.stats.forced_stops = self.stats.forced_stops.saturating_add(1);
                    self.enter_inhibited(verdict, events)
                } else if toggle == ToggleEvent::ToggledOff {
                    ControllerState::Idle
                } else {
                    ControllerState::Running
                }
            }
            ControllerState::Inhibited => {
                if verdict.all_safe {
                    info!("Interlock restored, alarm cleared");
                    // A fresh press is needed to start.
                    self.ignition.clear_request();
                    ControllerState::Idle
                } else {
                    ControllerState::Inhibited
                }
            }
        }
    }

    fn enter_inhibited(
        &mut self,
        verdict: &SafetyVerdict,
        events: &mut TickEvents,
    ) -> ControllerState {
        warn!("Ignition inhibited: {:?}", verdict.reasons.as_slice());
        self.stats.inhibit_count = self.stats.inhibit_count.saturating_add(1);
        let _ = events.push(ReportEvent::Inhibited {
            reasons: verdict.reasons.clone(),
        });
        ControllerState::Inhibited
    }

    fn compose_outputs(&self, verdict: &SafetyVerdict, lamps: LampCommand) -> ActuatorOutputs {
        let running = self.state == ControllerState::Running;

        ActuatorOutputs {
            alarm_driven: self.state == ControllerState::Inhibited,
            engine_powered: running,
            safe_indicator: verdict.all_safe && !running,
            running_indicator: running,
            headlight_lamps: lamps.headlight,
            highbeam_lamps: lamps.highbeam,
        }
    }

    /// Read the sensors once, tick, drive the actuators, then publish reports.
    ///
    /// Actuators are applied before any report is sent, so a failing
    /// transport never leaves the outputs stale.
    pub fn run_cycle<S, A, R>(
        &mut self,
        sensors: &mut S,
        actuators: &mut A,
        reports: &mut R,
    ) -> Result<TickOutcome, ControllerError>
    where
        S: SensorSource + ?Sized,
        A: ActuatorSink + ?Sized,
        R: ReportSink + ?Sized,
    {
        let frame = sensors.snapshot();
        let outcome = self.tick(&frame);

        actuators.apply(&outcome.outputs);
        for event in &outcome.events {
            reports.report(event)?;
        }

        Ok(outcome)
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn ignition(&self) -> &IgnitionState {
        &self.ignition
    }

    pub fn headlight_mode(&self) -> Option<HeadlightMode> {
        self.headlights.mode()
    }

    pub fn welcome_sent(&self) -> bool {
        self.welcome_sent
    }

    pub fn stats(&self) -> &ControllerStats {
        &self.stats
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
