//! Stage records and the validated stage table

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum stages in a firing schedule, terminating stage included
pub const MAX_STAGES: usize = 16;

/// Raw rate value meaning "as fast as possible"
pub const RATE_MAXIMUM: i16 = -1;

/// Raw target value marking the end of the program
pub const TARGET_END: i16 = 0;

/// Approach rate of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rate {
    /// Linear ramp in degrees per hour
    Timed(u16),
    /// No timed ramp; the setpoint jumps straight to the target
    Maximum,
}

impl Rate {
    /// Decode a raw rate, where `-1` means maximum
    ///
    /// Returns `None` for any other negative value.
    pub fn from_raw(raw: i16) -> Option<Self> {
        match raw {
            RATE_MAXIMUM => Some(Rate::Maximum),
            r if r >= 0 => Some(Rate::Timed(r as u16)),
            _ => None,
        }
    }

    /// Encode back into the raw sentinel form
    pub fn to_raw(self) -> i16 {
        match self {
            Rate::Timed(r) => r.min(i16::MAX as u16) as i16,
            Rate::Maximum => RATE_MAXIMUM,
        }
    }
}

/// One leg of a firing schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stage {
    /// Drive toward `target_c`, then hold there for `hold_min` minutes
    Ramp {
        /// Target temperature (degrees)
        target_c: i16,
        /// Approach rate
        rate: Rate,
        /// Hold time once the target is reached (minutes)
        hold_min: u16,
    },
    /// End of program; the sequencer reports a zero setpoint from here on
    End,
}

impl Stage {
    /// Create a ramp stage
    pub const fn ramp(target_c: i16, rate: Rate, hold_min: u16) -> Self {
        Stage::Ramp {
            target_c,
            rate,
            hold_min,
        }
    }

    /// Build a stage from the sentinel-encoded triple
    ///
    /// `target_c == 0` yields [`Stage::End`] regardless of the other fields.
    pub fn from_raw(
        index: usize,
        target_c: i16,
        rate: i16,
        hold_min: i16,
    ) -> Result<Self, StageTableError> {
        if target_c == TARGET_END {
            return Ok(Stage::End);
        }
        let rate = Rate::from_raw(rate).ok_or(StageTableError::InvalidRate { stage: index })?;
        if hold_min < 0 {
            return Err(StageTableError::NegativeHold { stage: index });
        }
        Ok(Stage::Ramp {
            target_c,
            rate,
            hold_min: hold_min as u16,
        })
    }

    /// Target temperature, `0` for the end stage
    pub fn target_c(&self) -> i16 {
        match self {
            Stage::Ramp { target_c, .. } => *target_c,
            Stage::End => TARGET_END,
        }
    }

    /// Hold time in minutes, `0` for the end stage
    pub fn hold_min(&self) -> u16 {
        match self {
            Stage::Ramp { hold_min, .. } => *hold_min,
            Stage::End => 0,
        }
    }

    /// Check if this stage terminates the program
    pub fn is_end(&self) -> bool {
        matches!(self, Stage::End)
    }
}

/// Errors rejected when building a stage table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StageTableError {
    /// No stages at all
    Empty,
    /// More than [`MAX_STAGES`] stages
    TooManyStages,
    /// Last stage is not an end stage
    MissingEnd,
    /// Hold time below zero
    NegativeHold { stage: usize },
    /// Rate below `-1`, or a timed rate above `i16::MAX`
    InvalidRate { stage: usize },
    /// Hold time does not fit the authored `i16` minutes
    HoldTooLong { stage: usize },
}

/// Immutable, bounded sequence of stages ending in [`Stage::End`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StageTable {
    stages: Vec<Stage, MAX_STAGES>,
}

impl StageTable {
    /// Validate and copy a list of stages
    ///
    /// A ramp stage targeting 0 is stored as [`Stage::End`], the same way
    /// the sentinel form decodes it.
    pub fn new(stages: &[Stage]) -> Result<Self, StageTableError> {
        if stages.len() > MAX_STAGES {
            return Err(StageTableError::TooManyStages);
        }

        let mut table: Vec<Stage, MAX_STAGES> = Vec::new();
        for (index, stage) in stages.iter().enumerate() {
            let stage = match *stage {
                Stage::Ramp { target_c, .. } if target_c == TARGET_END => Stage::End,
                Stage::Ramp { hold_min, .. } if hold_min > i16::MAX as u16 => {
                    return Err(StageTableError::HoldTooLong { stage: index });
                }
                Stage::Ramp {
                    rate: Rate::Timed(rate),
                    ..
                } if rate > i16::MAX as u16 => {
                    return Err(StageTableError::InvalidRate { stage: index });
                }
                other => other,
            };
            table
                .push(stage)
                .map_err(|_| StageTableError::TooManyStages)?;
        }

        match table.last() {
            None => Err(StageTableError::Empty),
            Some(last) if !last.is_end() => Err(StageTableError::MissingEnd),
            Some(_) => Ok(Self { stages: table }),
        }
    }

    /// Build a table from sentinel-encoded `(target, rate, hold)` triples
    pub fn from_raw(raw: &[(i16, i16, i16)]) -> Result<Self, StageTableError> {
        if raw.len() > MAX_STAGES {
            return Err(StageTableError::TooManyStages);
        }

        let mut stages: Vec<Stage, MAX_STAGES> = Vec::new();
        for (index, &(target_c, rate, hold_min)) in raw.iter().enumerate() {
            let stage = Stage::from_raw(index, target_c, rate, hold_min)?;
            stages
                .push(stage)
                .map_err(|_| StageTableError::TooManyStages)?;
        }

        Self::new(&stages)
    }

    /// Number of stages, terminating stage included
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false; an empty table cannot be constructed
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Get a stage by index
    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Iterate over the stages in order
    pub fn iter(&self) -> core::slice::Iter<'_, Stage> {
        self.stages.iter()
    }

    /// Stage to run after `index`
    ///
    /// Falls back to the final end stage, so advancement can never leave
    /// the table.
    pub(crate) fn next_index(&self, index: usize) -> usize {
        (index + 1).min(self.stages.len() - 1)
    }
}

impl<'a> IntoIterator for &'a StageTable {
    type Item = &'a Stage;
    type IntoIter = core::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}
