//! Firing schedule execution
//!
//! Holds the stage table, runs the per-stage ramp state machine and
//! reports progress for display.

pub mod phase;
pub mod sequencer;
pub mod setpoint;
pub mod stage;
pub mod status;

pub use phase::Phase;
pub use sequencer::{RampSequencer, SequencerError};
pub use setpoint::WAIT_TOLERANCE_C;
pub use stage::{Rate, Stage, StageTable, StageTableError, MAX_STAGES};
pub use status::{format_remaining, HeaterCommand, RampStatus, REMAINING_PLACEHOLDER};
