//! Push-button debounce.
//!
//! The edge interrupt only opens a settle window. The button task closes it
//! once [`DEBOUNCE_MS`](crate::config::DEBOUNCE_MS) have passed and reports a
//! press only if the pin still reads pressed. Any further edges inside the
//! window are ignored, so one window yields at most one press.
//!
//! ```text
//!            edge                      poll, window elapsed
//!   Idle ───────────▶ Pending{since} ─────────────────────▶ Idle
//!                       │    ▲                               (+ Pressed if
//!                       └────┘ edge: ignored                  pin is low)
//! ```

use core::cell::Cell;

use critical_section::Mutex;
use embedded_hal::digital::InputPin;

use crate::tick::{has_elapsed, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Pending { since: Tick },
}

/// Outcome of one [`Debouncer::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonPoll {
    /// No window open.
    Idle,
    /// Window open, settle time not reached.
    Settling,
    /// Window closed, pin no longer pressed (bounce or short tap).
    Rejected,
    /// Window closed with the pin still pressed.
    Pressed,
}

impl ButtonPoll {
    /// True when this poll closed a window and the edge source may be re-armed.
    pub fn window_closed(self) -> bool {
        matches!(self, ButtonPoll::Rejected | ButtonPoll::Pressed)
    }
}

/// Debounce state shared between the edge interrupt and the button task.
pub struct Debouncer {
    state: Mutex<Cell<DebounceState>>,
    settle_ms: u32,
}

impl Debouncer {
    pub const fn new(settle_ms: u32) -> Self {
        Self {
            state: Mutex::new(Cell::new(DebounceState::Idle)),
            settle_ms,
        }
    }

    /// Record a falling edge. Interrupt context.
    pub fn notify_edge(&self, now: Tick) {
        critical_section::with(|cs| {
            let state = self.state.borrow(cs);
            if state.get() == DebounceState::Idle {
                state.set(DebounceState::Pending { since: now });
            }
        });
    }

    /// Close the window if it has settled, then sample the pin.
    ///
    /// `sample` is only called when a window closes.
    pub fn poll<E>(
        &self,
        now: Tick,
        sample: impl FnOnce() -> Result<bool, E>,
    ) -> Result<ButtonPoll, E> {
        let outcome = critical_section::with(|cs| {
            let state = self.state.borrow(cs);
            match state.get() {
                DebounceState::Idle => ButtonPoll::Idle,
                DebounceState::Pending { since } if has_elapsed(now, since, self.settle_ms) => {
                    state.set(DebounceState::Idle);
                    ButtonPoll::Rejected
                }
                DebounceState::Pending { .. } => ButtonPoll::Settling,
            }
        });

        if outcome == ButtonPoll::Rejected && sample()? {
            return Ok(ButtonPoll::Pressed);
        }
        Ok(outcome)
    }

    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.state.borrow(cs).get() != DebounceState::Idle)
    }
}

/// Button input pin, pressed when low.
pub struct ButtonInput<P> {
    pin: P,
}

impl<P: InputPin> ButtonInput<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn is_pressed(&mut self) -> Result<bool, P::Error> {
        self.pin.is_low()
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}
