//! Monotonic time source
//!
//! The sequencer never reads a global timer. It is handed a [`Clock`] at
//! construction and only ever looks at differences between two readings,
//! so the epoch is irrelevant as long as it does not wrap during a firing.

use core::cell::Cell;

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed epoch
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `start_ms`
    ///
    /// Saturates at zero if the clock reads earlier than `start_ms`.
    fn elapsed_since(&self, start_ms: u64) -> u64 {
        self.now_ms().saturating_sub(start_ms)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Manually advanced clock
///
/// Used for host-side simulation and tests. Interior mutability lets the
/// caller keep advancing time while the sequencer holds a shared reference.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
}

impl ManualClock {
    /// Create a clock reading `start_ms`
    pub const fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    /// Jump to an absolute time
    pub fn set_ms(&self, now_ms: u64) {
        self.now_ms.set(now_ms);
    }

    /// Advance by `delta_ms` milliseconds
    pub fn advance_ms(&self, delta_ms: u64) {
        self.now_ms.set(self.now_ms.get().saturating_add(delta_ms));
    }

    /// Advance by whole seconds
    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs.saturating_mul(1000));
    }

    /// Advance by whole minutes
    pub fn advance_mins(&self, mins: u64) {
        self.advance_secs(mins.saturating_mul(60));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
