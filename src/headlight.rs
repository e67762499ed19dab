//! Headlight mode selection and lamp drive.
//!
//! The knob is read as a normalized position: fully clockwise (`1.0`) is
//! `Off`, fully counter-clockwise (`0.0`) is `On`, and the band between the
//! two breakpoints is `Auto`. In `Auto` the lamps follow the ambient light
//! sensor against the dusk threshold.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

pub const DEFAULT_LOW_THRESHOLD: f32 = 0.3;
pub const DEFAULT_HIGH_THRESHOLD: f32 = 0.7;
pub const DEFAULT_DUSK_THRESHOLD: f32 = 0.3;
pub const DEFAULT_AUTO_ON_DELAY_TICKS: u32 = 0;
pub const DEFAULT_AUTO_OFF_DELAY_TICKS: u32 = 0;

const_assert!(DEFAULT_LOW_THRESHOLD < DEFAULT_HIGH_THRESHOLD);
const_assert!(DEFAULT_LOW_THRESHOLD >= 0.0 && DEFAULT_HIGH_THRESHOLD <= 1.0);
const_assert!(DEFAULT_DUSK_THRESHOLD >= 0.0 && DEFAULT_DUSK_THRESHOLD <= 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadlightMode {
    Off,
    Auto,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlightThresholds {
    pub low_threshold: f32,
    pub high_threshold: f32,
    pub dusk_threshold: f32,
    pub auto_on_delay_ticks: u32,
    pub auto_off_delay_ticks: u32,
}

impl Default for HeadlightThresholds {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            dusk_threshold: DEFAULT_DUSK_THRESHOLD,
            auto_on_delay_ticks: DEFAULT_AUTO_ON_DELAY_TICKS,
            auto_off_delay_ticks: DEFAULT_AUTO_OFF_DELAY_TICKS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LampCommand {
    pub headlight: bool,
    pub highbeam: bool,
}

impl LampCommand {
    pub const DARK: LampCommand = LampCommand {
        headlight: false,
        highbeam: false,
    };
}

fn checked_unit(value: f32) -> f32 {
    debug_assert!(
        (0.0..=1.0).contains(&value),
        "Analog value {} outside [0, 1]",
        value
    );
    crate::sensors::clamp_unit(value)
}

/// Map a knob position onto a mode. `knob == high` is `Off`, `knob == low` is `On`.
pub fn select_mode(knob: f32, thresholds: &HeadlightThresholds) -> HeadlightMode {
    let knob = checked_unit(knob);

    if knob >= thresholds.high_threshold {
        HeadlightMode::Off
    } else if knob <= thresholds.low_threshold {
        HeadlightMode::On
    } else {
        HeadlightMode::Auto
    }
}

/// Lamp state for a mode. The highbeam switch is honored only while the
/// main lamps are lit.
pub fn apply_mode(
    mode: HeadlightMode,
    ambient_light: f32,
    highbeam_switch: bool,
    thresholds: &HeadlightThresholds,
) -> LampCommand {
    let headlight = match mode {
        HeadlightMode::Off => false,
        HeadlightMode::On => true,
        HeadlightMode::Auto => checked_unit(ambient_light) < thresholds.dusk_threshold,
    };

    LampCommand {
        headlight,
        highbeam: headlight && highbeam_switch,
    }
}

/// Hold-off for automatic switching so the lamps do not chatter at dusk.
///
/// In `Auto`, a change of the dusk decision takes effect once it has
/// persisted for the configured number of extra ticks. Any other mode
/// passes the commanded state straight through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoLampFilter {
    lamps_on: bool,
    pending_ticks: u32,
}

impl AutoLampFilter {
    pub const fn new() -> Self {
        Self {
            lamps_on: false,
            pending_ticks: 0,
        }
    }

    pub fn update(
        &mut self,
        mode: HeadlightMode,
        wanted: bool,
        thresholds: &HeadlightThresholds,
    ) -> bool {
        if mode != HeadlightMode::Auto || wanted == self.lamps_on {
            self.lamps_on = wanted;
            self.pending_ticks = 0;
            return self.lamps_on;
        }

        let delay = if wanted {
            thresholds.auto_on_delay_ticks
        } else {
            thresholds.auto_off_delay_ticks
        };

        self.pending_ticks = self.pending_ticks.saturating_add(1);
        if self.pending_ticks > delay {
            self.lamps_on = wanted;
            self.pending_ticks = 0;
        }
        self.lamps_on
    }

    pub fn lamps_on(&self) -> bool {
        self.lamps_on
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Per-tick headlight evaluation while the engine runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlightController {
    filter: AutoLampFilter,
    mode: Option<HeadlightMode>,
}

impl HeadlightController {
    pub const fn new() -> Self {
        Self {
            filter: AutoLampFilter::new(),
            mode: None,
        }
    }

    pub fn update(
        &mut self,
        knob: f32,
        ambient_light: f32,
        highbeam_switch: bool,
        thresholds: &HeadlightThresholds,
    ) -> LampCommand {
        let mode = select_mode(knob, thresholds);
        let commanded = apply_mode(mode, ambient_light, highbeam_switch, thresholds);
        let headlight = self.filter.update(mode, commanded.headlight, thresholds);

        if self.mode != Some(mode) {
            tracing::debug!("Headlight mode {:?}", mode);
            self.mode = Some(mode);
        }

        LampCommand {
            headlight,
            highbeam: headlight && highbeam_switch,
        }
    }

    /// Last selected mode, `None` while the engine is off.
    pub fn mode(&self) -> Option<HeadlightMode> {
        self.mode
    }

    /// Lock the lamps off; used whenever the engine is not running.
    pub fn shutdown(&mut self) -> LampCommand {
        self.filter.reset();
        self.mode = None;
        LampCommand::DARK
    }
}
