//! # Cabin Interlock Controller
//!
//! Control core for a vehicle cabin safety interlock: engine ignition is
//! gated on occupancy and seatbelt sensors, status events are reported over
//! a serial link, and the headlights are driven in off/auto/on modes.
//!
//! ## Features
//!
//! - **Ignition debounce**: one engine toggle per physical press-release cycle
//! - **Safety interlock**: checked at start and re-checked every tick while running
//! - **Alarm hold**: alarm stays driven until every condition holds again
//! - **Headlight selector**: knob breakpoints, dusk sensing, highbeam pass-through
//! - **Structured reports**: welcome, engine started, inhibited with reasons
//! - **Non-blocking**: every wait is state carried across ticks
//!
//! ## Quick Start
//!
//! ```rust
//! use cabin_interlock::{Controller, ControllerState, RawSensorReadings};
//!
//! let mut controller = Controller::new();
//! let seated = RawSensorReadings::all_safe();
//!
//! controller.tick(&seated.snapshot());
//! let outcome = controller.tick(&seated.with_button(true).snapshot());
//!
//! assert_eq!(outcome.state, ControllerState::Running);
//! assert!(outcome.outputs.engine_powered);
//! ```
//!
//! ## Architecture
//!
//! - [`controller`] - Idle/Running/Inhibited state machine and tick entry point
//! - [`ignition`] - Button debounce latch
//! - [`safety`] - Occupancy and seatbelt interlock verdict
//! - [`headlight`] - Mode selection and lamp drive
//! - [`sensors`] - Per-tick input snapshot and sensor collaborators
//! - [`actuators`] - Output set and actuator collaborators
//! - [`report`] - Report events, text rendering, serial sink
//! - [`config`] - Thresholds and JSON configuration loading

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

extern crate alloc;

pub mod actuators;
pub mod config;
pub mod controller;
pub mod headlight;
pub mod ignition;
pub mod report;
pub mod safety;
pub mod sensors;

// Re-export main public types for convenience
pub use actuators::{ActuatorOutputs, ActuatorSink, RecordingActuators};
pub use config::{ConfigError, ControllerConfig};
pub use controller::{Controller, ControllerError, ControllerState, TickOutcome};
pub use headlight::{HeadlightMode, HeadlightThresholds};
pub use ignition::{IgnitionState, ToggleEvent};
pub use report::{ReportEvent, ReportSink, SerialReportSink};
pub use safety::{InhibitReason, InhibitReasons, SafetyVerdict};
pub use sensors::{RawSensorReadings, ScriptedSensors, SensorFrame, SensorSource};
