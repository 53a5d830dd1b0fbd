//! Ramp state machine
//!
//! Turns elapsed time and the measured kiln temperature into a setpoint,
//! advancing through the stage table on its own. Each stage runs through
//! up to four phases:
//!
//! ```text
//!  HEAT/COOL ──ramp reaches target──▶ WAIT ──|measured - target| <= 5──▶ HOLD
//!      ▲                                                                   │
//!      └────────────── hold time elapsed, next stage ──────────────────────┘
//! ```
//!
//! A stage with maximum rate skips the timed ramp and goes straight to WAIT.

use heapless::String;

use super::phase::Phase;
use super::setpoint::{
    cooling_setpoint, heating_setpoint, hold_expired, hold_remaining_min, whole_secs,
    within_tolerance,
};
use super::stage::{Rate, Stage, StageTable};
use super::status::{format_remaining, HeaterCommand, RampStatus, REMAINING_TEXT_LEN};
use crate::traits::{Clock, HeaterController};

/// Errors from misusing the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerError {
    /// Polled before [`RampSequencer::start_ramp`]
    NotStarted,
    /// [`RampSequencer::start_ramp`] called on a running sequencer
    AlreadyStarted,
}

/// Progress through the active stage
#[derive(Debug, Clone, Copy)]
struct Progress {
    /// Index of the active stage (0-based)
    stage_index: usize,
    /// Snapshot of the active stage, copied at stage entry
    stage: Stage,
    /// Current phase
    phase: Phase,
    /// Measured temperature when the stage began
    baseline_c: i16,
    /// Ramp start time, moved to the hold start once holding
    anchor_ms: u64,
}

/// Firing schedule sequencer
///
/// Owns the stage table and a clock. Poll [`get_setpoint`](Self::get_setpoint)
/// from a single control path; the sequencer has no internal locking.
#[derive(Debug)]
pub struct RampSequencer<C> {
    table: StageTable,
    clock: C,
    progress: Option<Progress>,
}

impl<C: Clock> RampSequencer<C> {
    /// Create an unstarted sequencer
    pub fn new(table: StageTable, clock: C) -> Self {
        Self {
            table,
            clock,
            progress: None,
        }
    }

    /// Start the run at stage 0, using `measured_c` as the ramp baseline
    pub fn start_ramp(&mut self, measured_c: i16) -> Result<(), SequencerError> {
        if self.progress.is_some() {
            return Err(SequencerError::AlreadyStarted);
        }

        #[cfg(feature = "defmt")]
        {
            defmt::info!(
                "Starting firing: {} stages from {}C",
                self.table.len(),
                measured_c
            );
            for (i, stage) in self.table.iter().enumerate() {
                defmt::debug!("  stage {}: {}", i + 1, stage);
            }
        }

        let now_ms = self.clock.now_ms();
        self.set_new_target(measured_c, 0, now_ms);
        Ok(())
    }

    /// Compute the setpoint for this poll
    ///
    /// Not idempotent: phase changes and stage advances happen here. Returns
    /// `0` once the end stage is active.
    pub fn get_setpoint(&mut self, measured_c: i16) -> Result<i16, SequencerError> {
        let now_ms = self.clock.now_ms();
        let progress = self.progress.as_mut().ok_or(SequencerError::NotStarted)?;

        let (target_c, rate, hold_min) = match progress.stage {
            Stage::End => return Ok(0),
            Stage::Ramp {
                target_c,
                rate,
                hold_min,
            } => (target_c, rate, hold_min),
        };
        let elapsed_ms = now_ms.saturating_sub(progress.anchor_ms);

        match progress.phase {
            Phase::Heating | Phase::Cooling => {
                let rate = match rate {
                    Rate::Timed(rate) => rate,
                    Rate::Maximum => {
                        progress.phase = Phase::Waiting;
                        #[cfg(feature = "defmt")]
                        defmt::debug!("Max rate, waiting for {}C", target_c);
                        return Ok(target_c);
                    }
                };

                let elapsed_s = whole_secs(elapsed_ms);
                let (setpoint, reached) = if progress.phase == Phase::Heating {
                    heating_setpoint(progress.baseline_c, target_c, rate, elapsed_s)
                } else {
                    cooling_setpoint(progress.baseline_c, target_c, rate, elapsed_s)
                };

                if reached {
                    progress.phase = Phase::Waiting;
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Ramp reached {}C after {}s", target_c, elapsed_s);
                }
                Ok(setpoint)
            }
            Phase::Waiting => {
                if within_tolerance(measured_c, target_c) {
                    progress.phase = Phase::Holding;
                    progress.anchor_ms = now_ms;
                    #[cfg(feature = "defmt")]
                    defmt::debug!("At {}C, holding {} min", measured_c, hold_min);
                }
                Ok(target_c)
            }
            Phase::Holding => {
                if hold_expired(hold_min, elapsed_ms) {
                    let next_index = self.table.next_index(progress.stage_index);
                    self.set_new_target(measured_c, next_index, now_ms);
                    // The new stage takes over from the next poll
                    return Ok(measured_c);
                }
                Ok(target_c)
            }
        }
    }

    /// Poll the setpoint and hand it to the heater loop
    ///
    /// The heater is disabled once the end stage is active.
    pub fn drive<H: HeaterController>(
        &mut self,
        measured_c: i16,
        heater: &mut H,
    ) -> Result<HeaterCommand, SequencerError> {
        let setpoint = self.get_setpoint(measured_c)?;

        let command = if self.is_complete() {
            HeaterCommand::off()
        } else {
            HeaterCommand::heating(setpoint)
        };

        match command.target_c {
            Some(target_c) => {
                heater.set_target(target_c);
                if !heater.is_enabled() {
                    heater.enable(true);
                }
            }
            None => heater.enable(false),
        }

        Ok(command)
    }

    /// Enter a stage with a fresh baseline and anchor
    fn set_new_target(&mut self, baseline_c: i16, stage_index: usize, now_ms: u64) {
        let stage = self.table.get(stage_index).copied().unwrap_or(Stage::End);
        let phase = Phase::entry(stage.target_c(), baseline_c);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Stage {}/{}: {} from {}C ({})",
            stage_index + 1,
            self.table.len(),
            stage,
            baseline_c,
            phase
        );

        self.progress = Some(Progress {
            stage_index,
            stage,
            phase,
            baseline_c,
            anchor_ms: now_ms,
        });
    }

    /// Check if [`start_ramp`](Self::start_ramp) has been called
    pub fn is_started(&self) -> bool {
        self.progress.is_some()
    }

    /// Check if the end stage has been reached
    pub fn is_complete(&self) -> bool {
        self.progress.is_some_and(|p| p.stage.is_end())
    }

    /// Current stage number (1-based), 0 before start
    pub fn stage(&self) -> u8 {
        self.progress.map_or(0, |p| (p.stage_index + 1) as u8)
    }

    /// Current stage index (0-based)
    pub fn stage_index(&self) -> Option<usize> {
        self.progress.map(|p| p.stage_index)
    }

    /// Current phase, None before start
    pub fn phase(&self) -> Option<Phase> {
        self.progress.map(|p| p.phase)
    }

    /// Short name of the current phase, `"IDLE"` before start
    pub fn phase_name(&self) -> &'static str {
        self.phase().map_or("IDLE", |phase| phase.name())
    }

    /// Stages in the table, terminating stage included
    pub fn total_stages(&self) -> u8 {
        self.table.len() as u8
    }

    /// Snapshot of the active stage
    pub fn active_stage(&self) -> Option<Stage> {
        self.progress.map(|p| p.stage)
    }

    /// Temperature the active stage started from
    pub fn baseline_c(&self) -> Option<i16> {
        self.progress.map(|p| p.baseline_c)
    }

    /// Minutes left in the hold, only while holding
    pub fn remaining_hold_min(&self) -> Option<u32> {
        let progress = self.progress?;
        if progress.phase != Phase::Holding {
            return None;
        }
        let elapsed_ms = self.clock.elapsed_since(progress.anchor_ms);
        let remaining = hold_remaining_min(progress.stage.hold_min(), elapsed_ms);
        Some(remaining as u32)
    }

    /// Remaining hold time as `hours:minutes`, blank outside a hold
    pub fn time_remaining(&self) -> String<REMAINING_TEXT_LEN> {
        format_remaining(self.remaining_hold_min())
    }

    /// Telemetry snapshot, None before start
    pub fn status(&self) -> Option<RampStatus> {
        let progress = self.progress?;
        Some(RampStatus {
            stage: (progress.stage_index + 1) as u8,
            total_stages: self.total_stages(),
            phase: progress.phase,
            remaining_hold_min: self.remaining_hold_min(),
            complete: progress.stage.is_end(),
        })
    }
}
