//! Status reporting for display and logging collaborators

use core::fmt::Write;

use heapless::String;

use super::phase::Phase;

/// Text shown in place of the remaining hold time outside of a hold
pub const REMAINING_PLACEHOLDER: &str = "    ";

/// Capacity of the remaining-time text (`"1092:15"` fits)
pub const REMAINING_TEXT_LEN: usize = 8;

/// Command for the external heater loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeaterCommand {
    /// Target temperature (None = heater off)
    pub target_c: Option<i16>,
}

impl HeaterCommand {
    /// Create an off command
    pub const fn off() -> Self {
        Self { target_c: None }
    }

    /// Create a heating command
    pub const fn heating(target_c: i16) -> Self {
        Self {
            target_c: Some(target_c),
        }
    }

    /// Check if the heater should be powered
    pub const fn is_on(&self) -> bool {
        self.target_c.is_some()
    }
}

/// Snapshot of the sequencer for telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampStatus {
    /// Current stage (1-based)
    pub stage: u8,
    /// Stages in the table, terminating stage included
    pub total_stages: u8,
    /// Current phase
    pub phase: Phase,
    /// Minutes left in the hold (only while holding)
    pub remaining_hold_min: Option<u32>,
    /// Whether the end stage has been reached
    pub complete: bool,
}

/// Render remaining hold minutes as `hours:minutes`
pub fn format_remaining(remaining_min: Option<u32>) -> String<REMAINING_TEXT_LEN> {
    let mut text = String::new();
    match remaining_min {
        Some(mins) => {
            let _ = write!(text, "{}:{:02}", mins / 60, mins % 60);
        }
        None => {
            let _ = text.push_str(REMAINING_PLACEHOLDER);
        }
    }
    text
}
