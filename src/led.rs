//! Status LED: three modes, toggled from the tick.

use embedded_hal::digital::OutputPin;

use crate::config::{LED_FAST_INTERVAL_MS, LED_SLOW_INTERVAL_MS};
use crate::tick::{has_elapsed, Tick};

/// LED blink mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedMode {
    Off,
    Slow,
    Fast,
}

impl LedMode {
    /// Next mode in the button cycle: Off → Slow → Fast → Off.
    pub fn next(self) -> Self {
        match self {
            LedMode::Off => LedMode::Slow,
            LedMode::Slow => LedMode::Fast,
            LedMode::Fast => LedMode::Off,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LedMode::Off => "off",
            LedMode::Slow => "slow",
            LedMode::Fast => "fast",
        }
    }

    /// Parse a console argument (exact, lowercase).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off" => Some(LedMode::Off),
            "slow" => Some(LedMode::Slow),
            "fast" => Some(LedMode::Fast),
            _ => None,
        }
    }

    /// Toggle interval, `None` when the LED does not blink.
    pub fn interval_ms(self) -> Option<u32> {
        match self {
            LedMode::Off => None,
            LedMode::Slow => Some(LED_SLOW_INTERVAL_MS),
            LedMode::Fast => Some(LED_FAST_INTERVAL_MS),
        }
    }
}

/// Drives one LED pin according to the current [`LedMode`].
pub struct LedController<P> {
    pin: P,
    mode: LedMode,
    last_toggle: Tick,
    on: bool,
}

impl<P: OutputPin> LedController<P> {
    /// Boots in `Slow`, LED off, toggle timer at 0.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            mode: LedMode::Slow,
            last_toggle: 0,
            on: false,
        }
    }

    pub fn mode(&self) -> LedMode {
        self.mode
    }

    /// Takes effect on the next [`update`](Self::update).
    pub fn set_mode(&mut self, mode: LedMode) {
        self.mode = mode;
    }

    /// Advance to the next mode in the cycle and return it.
    pub fn cycle_mode(&mut self) -> LedMode {
        self.mode = self.mode.next();
        self.mode
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Advance the blink state machine. `Ok(true)` when the pin was driven.
    pub fn update(&mut self, now: Tick) -> Result<bool, P::Error> {
        let Some(interval) = self.mode.interval_ms() else {
            self.on = false;
            self.pin.set_low()?;
            return Ok(true);
        };

        if has_elapsed(now, self.last_toggle, interval) {
            self.on = !self.on;
            self.last_toggle = now;
            if self.on {
                self.pin.set_high()?;
            } else {
                self.pin.set_low()?;
            }
            return Ok(true);
        }

        Ok(false)
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
