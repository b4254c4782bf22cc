//! Millisecond time source

use core::sync::atomic::{AtomicU32, Ordering};

/// Milliseconds elapsed since boot
///
/// Readings are non-decreasing until the counter wraps from `u32::MAX` to 0.
pub trait TimeSource {
    fn now_ms(&self) -> u32;
}

impl<F> TimeSource for F
where
    F: Fn() -> u32,
{
    fn now_ms(&self) -> u32 {
        self()
    }
}

/// Wrapping millisecond counter advanced from a 1 kHz tick interrupt
///
/// ```
/// use dual_pwm::time::{MillisCounter, TimeSource};
///
/// static MILLIS: MillisCounter = MillisCounter::new();
///
/// MILLIS.increment();
/// assert_eq!(MILLIS.now_ms(), 1);
/// ```
#[derive(Debug)]
pub struct MillisCounter {
    ms: AtomicU32,
}

impl MillisCounter {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    pub const fn starting_at(ms: u32) -> Self {
        Self {
            ms: AtomicU32::new(ms),
        }
    }

    /// Advances the counter by one millisecond, wrapping at `u32::MAX`
    pub fn increment(&self) {
        self.ms.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for MillisCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MillisCounter {
    fn now_ms(&self) -> u32 {
        self.ms.load(Ordering::Relaxed)
    }
}
