//! Per-stage ramp phases

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Phase of the active stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Setpoint rising toward the target at the stage rate
    Heating,
    /// Setpoint falling toward the target at the stage rate
    Cooling,
    /// Setpoint pinned at target, waiting for the kiln to catch up
    Waiting,
    /// At target, hold timer running
    Holding,
}

impl Phase {
    /// Phase a stage starts in, given its target and the baseline
    pub fn entry(target_c: i16, baseline_c: i16) -> Self {
        if target_c >= baseline_c {
            Phase::Heating
        } else {
            Phase::Cooling
        }
    }

    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Heating => "HEAT",
            Phase::Cooling => "COOL",
            Phase::Waiting => "WAIT",
            Phase::Holding => "HOLD",
        }
    }
}
