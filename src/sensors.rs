use heapless::Vec;
use serde::{Deserialize, Serialize};

const MAX_SCRIPT_STEPS: usize = 64;

/// Immutable per-tick snapshot of every cabin input.
///
/// Analog channels are guaranteed to lie in `[0, 1]` once a frame has been
/// produced by [`RawSensorReadings::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorFrame {
    driver_present: bool,
    passenger_present: bool,
    driver_seatbelt: bool,
    passenger_seatbelt: bool,
    ignition_button: bool,
    headlight_knob: f32,
    ambient_light: f32,
    highbeam_switch: bool,
}

impl SensorFrame {
    pub fn driver_present(&self) -> bool {
        self.driver_present
    }

    pub fn passenger_present(&self) -> bool {
        self.passenger_present
    }

    pub fn driver_seatbelt(&self) -> bool {
        self.driver_seatbelt
    }

    pub fn passenger_seatbelt(&self) -> bool {
        self.passenger_seatbelt
    }

    pub fn ignition_button(&self) -> bool {
        self.ignition_button
    }

    pub fn headlight_knob(&self) -> f32 {
        self.headlight_knob
    }

    pub fn ambient_light(&self) -> f32 {
        self.ambient_light
    }

    pub fn highbeam_switch(&self) -> bool {
        self.highbeam_switch
    }
}

/// Unvalidated readings as they come off the pins and ADC channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSensorReadings {
    pub driver_present: bool,
    pub passenger_present: bool,
    pub driver_seatbelt: bool,
    pub passenger_seatbelt: bool,
    pub ignition_button: bool,
    pub headlight_knob: f32,
    pub ambient_light: f32,
    pub highbeam_switch: bool,
}

impl Default for RawSensorReadings {
    // Pull-down inputs read low; knob parked at "off", cabin lit.
    fn default() -> Self {
        Self {
            driver_present: false,
            passenger_present: false,
            driver_seatbelt: false,
            passenger_seatbelt: false,
            ignition_button: false,
            headlight_knob: 1.0,
            ambient_light: 1.0,
            highbeam_switch: false,
        }
    }
}

impl RawSensorReadings {
    /// Readings with every occupant seated and belted, button released.
    pub fn all_safe() -> Self {
        Self {
            driver_present: true,
            passenger_present: true,
            driver_seatbelt: true,
            passenger_seatbelt: true,
            ..Self::default()
        }
    }

    pub fn with_button(mut self, pressed: bool) -> Self {
        self.ignition_button = pressed;
        self
    }

    pub fn with_knob(mut self, knob: f32) -> Self {
        self.headlight_knob = knob;
        self
    }

    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient_light = ambient;
        self
    }

    pub fn with_highbeam(mut self, on: bool) -> Self {
        self.highbeam_switch = on;
        self
    }

    /// Freeze the readings into a frame, clamping analog channels to `[0, 1]`.
    pub fn snapshot(&self) -> SensorFrame {
        SensorFrame {
            driver_present: self.driver_present,
            passenger_present: self.passenger_present,
            driver_seatbelt: self.driver_seatbelt,
            passenger_seatbelt: self.passenger_seatbelt,
            ignition_button: self.ignition_button,
            headlight_knob: clamp_unit(self.headlight_knob),
            ambient_light: clamp_unit(self.ambient_light),
            highbeam_switch: self.highbeam_switch,
        }
    }
}

/// Clamp an analog reading into `[0, 1]`. NaN reads as 0.0.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Collaborator that owns the physical inputs.
///
/// The controller calls [`SensorSource::read`] exactly once per tick.
pub trait SensorSource {
    fn read(&mut self) -> RawSensorReadings;

    fn snapshot(&mut self) -> SensorFrame {
        self.read().snapshot()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub frame: RawSensorReadings,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

/// Replays a fixed sequence of readings, holding the last one once exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedSensors {
    steps: Vec<ScriptStep, MAX_SCRIPT_STEPS>,
    step_index: usize,
    repeats_served: u32,
    last: RawSensorReadings,
}

impl ScriptedSensors {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            step_index: 0,
            repeats_served: 0,
            last: RawSensorReadings::default(),
        }
    }

    pub fn from_steps(steps: &[ScriptStep]) -> Result<Self, &'static str> {
        let mut script = Self::new();
        for step in steps {
            script.push(step.frame, step.repeat)?;
        }
        Ok(script)
    }

    /// Parse a JSON array of `{ "frame": {...}, "repeat": n }` steps.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let steps: alloc::vec::Vec<ScriptStep> = serde_json::from_str(json)?;
        Self::from_steps(&steps).map_err(serde::de::Error::custom)
    }

    pub fn push(&mut self, frame: RawSensorReadings, repeat: u32) -> Result<(), &'static str> {
        if repeat == 0 {
            return Ok(());
        }
        self.steps
            .push(ScriptStep { frame, repeat })
            .map_err(|_| "Scenario script full")
    }

    /// Total number of ticks the script covers before it starts holding.
    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.repeat)).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.step_index >= self.steps.len()
    }
}

impl Default for ScriptedSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for ScriptedSensors {
    fn read(&mut self) -> RawSensorReadings {
        let Some(step) = self.steps.get(self.step_index) else {
            return self.last;
        };

        self.last = step.frame;
        self.repeats_served += 1;
        if self.repeats_served >= step.repeat {
            self.step_index += 1;
            self.repeats_served = 0;
        }
        self.last
    }
}
