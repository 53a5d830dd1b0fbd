//! Board-agnostic core logic for kiln controller firmware
//!
//! This crate contains the firing logic that does not depend on specific
//! hardware implementations:
//!
//! - Ramp sequencer turning a stage table into a temperature setpoint
//! - Stage table validation
//! - Firing program configuration types
//! - Collaborator traits (clock, thermocouple, heater loop)

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod ramp;
pub mod traits;
