use crate::sensors::SensorFrame;
use heapless::Vec;
use serde::{Deserialize, Serialize};

pub const MAX_INHIBIT_REASONS: usize = 4;

/// One failed occupancy or seatbelt condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InhibitReason {
    DriverAbsent,
    PassengerAbsent,
    DriverSeatbeltOff,
    PassengerSeatbeltOff,
}

impl InhibitReason {
    /// Fixed reporting order.
    pub const ALL: [InhibitReason; MAX_INHIBIT_REASONS] = [
        InhibitReason::DriverAbsent,
        InhibitReason::PassengerAbsent,
        InhibitReason::DriverSeatbeltOff,
        InhibitReason::PassengerSeatbeltOff,
    ];

    /// Whether this condition is violated in `frame`.
    pub fn is_violated(self, frame: &SensorFrame) -> bool {
        match self {
            InhibitReason::DriverAbsent => !frame.driver_present(),
            InhibitReason::PassengerAbsent => !frame.passenger_present(),
            InhibitReason::DriverSeatbeltOff => !frame.driver_seatbelt(),
            InhibitReason::PassengerSeatbeltOff => !frame.passenger_seatbelt(),
        }
    }
}

/// Set of violated conditions, kept in [`InhibitReason::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InhibitReasons(Vec<InhibitReason, MAX_INHIBIT_REASONS>);

impl InhibitReasons {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert keeping canonical order; duplicates are ignored.
    pub fn insert(&mut self, reason: InhibitReason) {
        if self.contains(reason) {
            return;
        }
        // At most one of each variant, so capacity is never exceeded.
        let _ = self.0.push(reason);
        self.0.sort_unstable();
    }

    pub fn contains(&self, reason: InhibitReason) -> bool {
        self.0.contains(&reason)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = InhibitReason> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[InhibitReason] {
        &self.0
    }
}

impl FromIterator<InhibitReason> for InhibitReasons {
    fn from_iter<I: IntoIterator<Item = InhibitReason>>(iter: I) -> Self {
        let mut reasons = Self::new();
        for reason in iter {
            reasons.insert(reason);
        }
        reasons
    }
}

/// Result of the interlock check for one frame. Never cached across ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub all_safe: bool,
    pub reasons: InhibitReasons,
}

impl SafetyVerdict {
    pub fn is_safe(&self) -> bool {
        self.all_safe
    }
}

/// Conjunction of both occupancy signals and both seatbelt signals.
pub fn evaluate(frame: &SensorFrame) -> SafetyVerdict {
    let reasons: InhibitReasons = InhibitReason::ALL
        .into_iter()
        .filter(|reason| reason.is_violated(frame))
        .collect();

    SafetyVerdict {
        all_safe: reasons.is_empty(),
        reasons,
    }
}
