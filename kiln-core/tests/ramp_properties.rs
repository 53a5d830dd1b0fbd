//! Property tests for the ramp sequencer
//!
//! Runs on host only, with simulated time.

use kiln_core::ramp::{Phase, RampSequencer, StageTable};
use kiln_core::traits::ManualClock;
use proptest::prelude::*;

fn started<'a>(
    raw: &[(i16, i16, i16)],
    clock: &'a ManualClock,
    start_c: i16,
) -> RampSequencer<&'a ManualClock> {
    let table = StageTable::from_raw(raw).expect("valid table");
    let mut seq = RampSequencer::new(table, clock);
    seq.start_ramp(start_c).expect("fresh sequencer");
    seq
}

proptest! {
    /// A rising ramp never steps backwards and never passes the target.
    #[test]
    fn heating_setpoint_is_monotonic(
        baseline in 0i16..600,
        span in 0i16..700,
        rate in 1i16..2000,
        steps in proptest::collection::vec(0u64..7200, 1..40),
    ) {
        let target = baseline + span;
        let clock = ManualClock::new(0);
        let mut seq = started(&[(target, rate, 10), (0, 0, 0)], &clock, baseline);
        prop_assert_eq!(seq.phase(), Some(Phase::Heating));

        // Kept well outside the tolerance band so the stage never holds
        let measured = baseline - 100;
        let mut last = i16::MIN;
        for step in steps {
            clock.advance_secs(step);
            let setpoint = seq.get_setpoint(measured).unwrap();
            prop_assert!(setpoint >= last);
            prop_assert!(setpoint <= target);
            if seq.phase() == Some(Phase::Waiting) {
                prop_assert_eq!(setpoint, target);
            }
            last = setpoint;
        }
    }

    /// A falling ramp never steps back up and never passes the target.
    #[test]
    fn cooling_setpoint_is_monotonic(
        target in 20i16..600,
        span in 1i16..700,
        rate in 1i16..2000,
        steps in proptest::collection::vec(0u64..7200, 1..40),
    ) {
        let baseline = target + span;
        let clock = ManualClock::new(0);
        let mut seq = started(&[(target, rate, 10), (0, 0, 0)], &clock, baseline);
        prop_assert_eq!(seq.phase(), Some(Phase::Cooling));

        let measured = baseline + 100;
        let mut last = i16::MAX;
        for step in steps {
            clock.advance_secs(step);
            let setpoint = seq.get_setpoint(measured).unwrap();
            prop_assert!(setpoint <= last);
            prop_assert!(setpoint >= target);
            if seq.phase() == Some(Phase::Waiting) {
                prop_assert_eq!(setpoint, target);
            }
            last = setpoint;
        }
    }

    /// Maximum rate returns the target on the first poll, whatever the delay.
    #[test]
    fn max_rate_waits_on_first_poll(
        target in 1i16..1300,
        start in -40i16..1300,
        delay in 0u64..100_000,
    ) {
        let clock = ManualClock::new(0);
        let mut seq = started(&[(target, -1, 10), (0, 0, 0)], &clock, start);

        clock.advance_secs(delay);
        prop_assert_eq!(seq.get_setpoint(start).unwrap(), target);
        prop_assert_eq!(seq.phase(), Some(Phase::Waiting));
    }

    /// The hold starts if and only if the kiln is within 5 degrees.
    #[test]
    fn waiting_holds_only_within_tolerance(offset in -20i16..=20) {
        let clock = ManualClock::new(0);
        let mut seq = started(&[(1000, -1, 10), (0, 0, 0)], &clock, 20);
        seq.get_setpoint(20).unwrap();

        seq.get_setpoint(1000 + offset).unwrap();
        let holding = seq.phase() == Some(Phase::Holding);
        prop_assert_eq!(holding, offset.abs() <= 5);
    }

    /// A hold of H minutes ends on the first poll at or after H minutes.
    #[test]
    fn hold_lasts_exactly_hold_minutes(hold in 1i16..600, early in 1u64..60) {
        let clock = ManualClock::new(0);
        let mut seq = started(&[(1000, -1, hold), (0, 0, 0)], &clock, 20);
        seq.get_setpoint(20).unwrap();
        seq.get_setpoint(1000).unwrap();

        clock.advance_secs(hold as u64 * 60 - early);
        prop_assert_eq!(seq.get_setpoint(1001).unwrap(), 1000);
        prop_assert_eq!(seq.phase(), Some(Phase::Holding));

        clock.advance_secs(early);
        prop_assert_eq!(seq.get_setpoint(1002).unwrap(), 1002);
        prop_assert!(seq.is_complete());
        prop_assert_eq!(seq.get_setpoint(1002).unwrap(), 0);
    }

    /// An end-only table never produces a nonzero setpoint.
    #[test]
    fn end_table_is_always_zero(
        start in -40i16..1300,
        readings in proptest::collection::vec((-40i16..1300, 0u64..100_000), 1..20),
    ) {
        let clock = ManualClock::new(0);
        let mut seq = started(&[(0, 0, 0)], &clock, start);

        for (measured, step) in readings {
            clock.advance_secs(step);
            prop_assert_eq!(seq.get_setpoint(measured).unwrap(), 0);
        }
        prop_assert_eq!(seq.stage(), 1);
    }
}
