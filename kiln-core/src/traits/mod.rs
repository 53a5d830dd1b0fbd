//! Collaborator interfaces
//!
//! These traits define the boundary between the ramp logic and the
//! hardware-specific code around it (time base, thermocouple, heater loop).

pub mod clock;
pub mod heater;

#[cfg(feature = "embassy")]
pub use clock::EmbassyClock;
pub use clock::{Clock, ManualClock};
pub use heater::{HeaterController, SensorError, TemperatureSensor};
