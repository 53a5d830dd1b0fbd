//! Setpoint arithmetic
//!
//! Integer-only helpers used by the sequencer. Elapsed time is truncated to
//! whole seconds and the ramp offset to whole degrees, so the setpoint moves
//! in discrete steps.

/// Measured temperature must be within this many degrees of the target
/// before the hold timer starts
pub const WAIT_TOLERANCE_C: i16 = 5;

/// Seconds per hour, for converting degrees/hour
const SECS_PER_HOUR: i64 = 3600;

/// Whole seconds in a millisecond span
pub fn whole_secs(elapsed_ms: u64) -> u64 {
    elapsed_ms / 1000
}

/// Whole minutes in a millisecond span
pub fn whole_mins(elapsed_ms: u64) -> u64 {
    elapsed_ms / 60_000
}

/// Degrees covered after `elapsed_s` seconds at `rate` degrees/hour
pub fn ramp_offset(rate: u16, elapsed_s: u64) -> i64 {
    let elapsed_s = i64::try_from(elapsed_s).unwrap_or(i64::MAX);
    i64::from(rate).saturating_mul(elapsed_s) / SECS_PER_HOUR
}

/// Candidate setpoint for a rising ramp, pinned at `target_c`
///
/// Returns the setpoint and whether the ramp reached the target.
pub fn heating_setpoint(baseline_c: i16, target_c: i16, rate: u16, elapsed_s: u64) -> (i16, bool) {
    let candidate = i64::from(baseline_c).saturating_add(ramp_offset(rate, elapsed_s));
    if candidate >= i64::from(target_c) {
        (target_c, true)
    } else {
        (candidate as i16, false)
    }
}

/// Candidate setpoint for a falling ramp, pinned at `target_c`
///
/// Returns the setpoint and whether the ramp reached the target.
pub fn cooling_setpoint(baseline_c: i16, target_c: i16, rate: u16, elapsed_s: u64) -> (i16, bool) {
    let candidate = i64::from(baseline_c).saturating_sub(ramp_offset(rate, elapsed_s));
    if candidate <= i64::from(target_c) {
        (target_c, true)
    } else {
        (candidate as i16, false)
    }
}

/// Check if the measured temperature has caught up with the target
pub fn within_tolerance(measured_c: i16, target_c: i16) -> bool {
    (i32::from(measured_c) - i32::from(target_c)).abs() <= i32::from(WAIT_TOLERANCE_C)
}

/// Check if a hold of `hold_min` minutes has run out
pub fn hold_expired(hold_min: u16, elapsed_ms: u64) -> bool {
    whole_secs(elapsed_ms) >= u64::from(hold_min) * 60
}

/// Minutes left in a hold, never negative
pub fn hold_remaining_min(hold_min: u16, elapsed_ms: u64) -> u64 {
    u64::from(hold_min).saturating_sub(whole_mins(elapsed_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_offset_one_hour() {
        assert_eq!(ramp_offset(100, 3600), 100);
        assert_eq!(ramp_offset(100, 1800), 50);
    }

    #[test]
    fn test_ramp_offset_truncates() {
        // 100 deg/h covers one degree every 36 s
        assert_eq!(ramp_offset(100, 35), 0);
        assert_eq!(ramp_offset(100, 36), 1);
        assert_eq!(ramp_offset(100, 71), 1);
        assert_eq!(ramp_offset(100, 72), 2);
    }

    #[test]
    fn test_ramp_offset_does_not_overflow() {
        assert!(ramp_offset(u16::MAX, u64::MAX) > 0);
    }

    #[test]
    fn test_heating_pins_at_target() {
        assert_eq!(heating_setpoint(20, 1000, 100, 3600), (120, false));
        assert_eq!(heating_setpoint(20, 120, 100, 3600), (120, true));
        assert_eq!(heating_setpoint(20, 100, 100, 3600), (100, true));
    }

    #[test]
    fn test_heating_at_target_from_start() {
        assert_eq!(heating_setpoint(500, 500, 0, 0), (500, true));
    }

    #[test]
    fn test_cooling_pins_at_target() {
        assert_eq!(cooling_setpoint(1000, 500, 200, 3600), (800, false));
        assert_eq!(cooling_setpoint(1000, 800, 200, 3600), (800, true));
        assert_eq!(cooling_setpoint(1000, 900, 200, 3600), (900, true));
    }

    #[test]
    fn test_tolerance_boundary() {
        assert!(within_tolerance(995, 1000));
        assert!(within_tolerance(1005, 1000));
        assert!(!within_tolerance(994, 1000));
        assert!(!within_tolerance(1006, 1000));
    }

    #[test]
    fn test_tolerance_extremes() {
        assert!(!within_tolerance(i16::MIN, i16::MAX));
    }

    #[test]
    fn test_hold_expiry() {
        assert!(!hold_expired(30, 30 * 60_000 - 1));
        assert!(hold_expired(30, 30 * 60_000));
        assert!(hold_expired(0, 0));
    }

    #[test]
    fn test_hold_remaining() {
        assert_eq!(hold_remaining_min(30, 0), 30);
        assert_eq!(hold_remaining_min(30, 59_999), 30);
        assert_eq!(hold_remaining_min(30, 60_000), 29);
        assert_eq!(hold_remaining_min(30, 90 * 60_000), 0);
    }
}
