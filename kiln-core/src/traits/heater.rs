//! Heater and temperature sensor traits
//!
//! The sequencer consumes a measured temperature and produces a setpoint.
//! Reading the thermocouple and closing the loop on the elements belong to
//! the implementations of these traits.

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Thermocouple disconnected (open circuit)
    OpenCircuit,
    /// Thermocouple shorted to ground or supply
    ShortCircuit,
    /// Reading out of expected range
    OutOfRange,
    /// Converter did not answer
    ConversionError,
}

/// Trait for kiln temperature sensors
pub trait TemperatureSensor {
    /// Read the current temperature with 0.1 degree resolution
    ///
    /// For example, 1012.5 degrees is returned as 10125.
    fn read_celsius_x10(&mut self) -> Result<i32, SensorError>;

    /// Read the current temperature in whole degrees
    ///
    /// Truncates toward zero and saturates to the `i16` range.
    fn read_celsius(&mut self) -> Result<i16, SensorError> {
        self.read_celsius_x10()
            .map(|t| (t / 10).clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16)
    }
}

/// Closed-loop temperature controller fed with the ramp setpoint
///
/// Typically a PID loop driving the elements through an SSR.
pub trait HeaterController {
    /// Set the temperature the loop should track
    fn set_target(&mut self, target_c: i16);

    /// Get the current target temperature
    fn target(&self) -> i16;

    /// Enable or disable the controller
    ///
    /// When disabled, the heater output is forced off.
    fn enable(&mut self, enabled: bool);

    /// Check if the controller is enabled
    fn is_enabled(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSensor(Result<i32, SensorError>);

    impl TemperatureSensor for FixedSensor {
        fn read_celsius_x10(&mut self) -> Result<i32, SensorError> {
            self.0
        }
    }

    #[test]
    fn test_read_celsius_truncates() {
        let mut sensor = FixedSensor(Ok(10_129));
        assert_eq!(sensor.read_celsius(), Ok(1012));

        let mut sensor = FixedSensor(Ok(-55));
        assert_eq!(sensor.read_celsius(), Ok(-5));
    }

    #[test]
    fn test_read_celsius_propagates_fault() {
        let mut sensor = FixedSensor(Err(SensorError::OpenCircuit));
        assert_eq!(sensor.read_celsius(), Err(SensorError::OpenCircuit));
    }
}
