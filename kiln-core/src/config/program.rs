//! Firing program configuration
//!
//! This is the form in which an external loader hands a schedule over. It
//! keeps the sentinel encoding stage tables are authored in (`rate == -1`
//! for maximum, `target_c == 0` for end of program); conversion into a
//! [`StageTable`] validates it. Programs can be stored as postcard binary
//! data when the `serde` feature is enabled.

use heapless::{String, Vec};

use crate::ramp::{Stage, StageTable, StageTableError, MAX_STAGES};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current firing program format version
pub const PROGRAM_VERSION: u8 = 1;

/// Maximum program label length
pub const MAX_LABEL_LEN: usize = 16;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Stage list does not form a runnable table
    Table(StageTableError),
    /// More than [`MAX_STAGES`] stages
    TooManyStages,
    /// Serialization failed (buffer too small)
    Encode,
    /// Deserialization failed
    Decode,
    /// Program version mismatch
    VersionMismatch,
}

impl From<StageTableError> for ConfigError {
    fn from(e: StageTableError) -> Self {
        ConfigError::Table(e)
    }
}

/// One stage as authored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StageConfig {
    /// Target temperature (degrees), 0 = end of program
    pub target_c: i16,
    /// Rate (degrees/hour), -1 = as fast as possible
    pub rate: i16,
    /// Hold time at target (minutes)
    pub hold_min: i16,
}

impl StageConfig {
    /// Create a stage entry
    pub const fn new(target_c: i16, rate: i16, hold_min: i16) -> Self {
        Self {
            target_c,
            rate,
            hold_min,
        }
    }

    /// The end-of-program entry
    pub const fn end() -> Self {
        Self::new(0, 0, 0)
    }

    /// Decode into a tagged stage
    pub fn to_stage(&self, index: usize) -> Result<Stage, StageTableError> {
        Stage::from_raw(index, self.target_c, self.rate, self.hold_min)
    }
}

impl From<&Stage> for StageConfig {
    fn from(stage: &Stage) -> Self {
        match *stage {
            Stage::Ramp {
                target_c,
                rate,
                hold_min,
            } => Self::new(target_c, rate.to_raw(), hold_min.min(i16::MAX as u16) as i16),
            Stage::End => Self::end(),
        }
    }
}

/// A named firing schedule
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FiringProgram {
    /// Format version
    pub version: u8,
    /// Display label
    pub label: String<MAX_LABEL_LEN>,
    /// Stages in firing order
    pub stages: Vec<StageConfig, MAX_STAGES>,
}

impl Default for FiringProgram {
    fn default() -> Self {
        Self {
            version: PROGRAM_VERSION,
            label: String::new(),
            stages: Vec::new(),
        }
    }
}

impl FiringProgram {
    /// Create an empty program
    ///
    /// Labels longer than [`MAX_LABEL_LEN`] bytes are truncated.
    pub fn new(label: &str) -> Self {
        let mut program = Self::default();
        for c in label.chars() {
            if program.label.push(c).is_err() {
                break;
            }
        }
        program
    }

    /// Build a program from an existing table
    pub fn from_table(label: &str, table: &StageTable) -> Self {
        let mut program = Self::new(label);
        for stage in table {
            // A table never holds more than MAX_STAGES
            let _ = program.stages.push(StageConfig::from(stage));
        }
        program
    }

    /// Append a stage
    pub fn push_stage(&mut self, stage: StageConfig) -> Result<(), ConfigError> {
        self.stages
            .push(stage)
            .map_err(|_| ConfigError::TooManyStages)
    }

    /// Validate and convert into a runnable stage table
    pub fn stage_table(&self) -> Result<StageTable, ConfigError> {
        let mut stages: Vec<Stage, MAX_STAGES> = Vec::new();
        for (index, entry) in self.stages.iter().enumerate() {
            stages
                .push(entry.to_stage(index)?)
                .map_err(|_| ConfigError::TooManyStages)?;
        }
        Ok(StageTable::new(&stages)?)
    }

    /// Serialize to postcard binary format
    #[cfg(feature = "serde")]
    pub fn to_slice<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encode)
    }

    /// Deserialize from postcard binary format
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let program: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        if program.version != PROGRAM_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        Ok(program)
    }
}
