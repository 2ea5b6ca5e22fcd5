//! Monotonic millisecond tick.
//!
//! The tick interrupt is the only writer. Everything else reads it and
//! measures durations with [`elapsed`], never by comparing absolute values.
//!
//! # Memory Ordering
//!
//! The counter is a single word, so a read can never tear. `Relaxed` is
//! enough: the tick orders nothing else.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

/// Tick value in milliseconds since boot. Wraps after ~49.7 days.
pub type Tick = u32;

/// Wrap-safe duration between two tick values.
///
/// Correct as long as the real distance is below one wrap period.
#[inline]
pub fn elapsed(now: Tick, then: Tick) -> u32 {
    now.wrapping_sub(then)
}

/// True once at least `period` ticks separate `then` from `now`.
#[inline]
pub fn has_elapsed(now: Tick, then: Tick, period: u32) -> bool {
    elapsed(now, then) >= period
}

/// Free-running tick counter shared between the timer interrupt and the
/// main loop.
pub struct TickCounter {
    ticks: AtomicU32,
}

impl TickCounter {
    /// Create a counter starting at zero.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a counter at an arbitrary value (wrap tests start near `u32::MAX`).
    pub const fn starting_at(ticks: Tick) -> Self {
        Self {
            ticks: AtomicU32::new(ticks),
        }
    }

    /// Advance by one tick. Called from the timer interrupt only.
    #[inline]
    pub fn increment(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Advance by `n` ticks.
    #[inline]
    pub fn advance(&self, n: u32) {
        self.ticks.fetch_add(n, Ordering::Relaxed);
    }

    /// Current tick value.
    #[inline]
    pub fn now(&self) -> Tick {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Uptime rendered as `H:MM:SS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Uptime {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Uptime {
    pub fn from_ms(ms: u32) -> Self {
        let sec = ms / 1000;
        let min = sec / 60;
        Self {
            hours: min / 60,
            minutes: min % 60,
            seconds: sec % 60,
        }
    }
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
