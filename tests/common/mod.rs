//! Shared fakes for integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};

use rust_tick_console::adc::{AdcError, AdcReader};
use rust_tick_console::app::{Board, Peripherals};
use rust_tick_console::console::ConsoleContext;
use rust_tick_console::fault::{FaultCode, FaultSnapshot};
use rust_tick_console::led::LedMode;

/// Output pin recording its level and write count. `fail` is shared so a
/// test can break the pin after handing it over.
#[derive(Default)]
pub struct FakeLed {
    pub high: bool,
    pub writes: u32,
    pub fail: Rc<Cell<bool>>,
}

impl ErrorType for FakeLed {
    type Error = ErrorKind;
}

impl OutputPin for FakeLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail.get() {
            return Err(ErrorKind::Other);
        }
        self.high = false;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail.get() {
            return Err(ErrorKind::Other);
        }
        self.high = true;
        self.writes += 1;
        Ok(())
    }
}

/// Input pin whose level the test controls. Idle high (pull-up).
#[derive(Clone)]
pub struct FakeButton {
    pub level_high: Rc<Cell<bool>>,
}

impl FakeButton {
    pub fn new() -> Self {
        Self {
            level_high: Rc::new(Cell::new(true)),
        }
    }

    pub fn press(&self) {
        self.level_high.set(false);
    }

    pub fn release(&self) {
        self.level_high.set(true);
    }
}

impl ErrorType for FakeButton {
    type Error = ErrorKind;
}

impl InputPin for FakeButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level_high.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level_high.get())
    }
}

/// ADC returning a test-controlled value, `None` = read failure.
#[derive(Clone)]
pub struct FakeAdc {
    pub value: Rc<Cell<Option<u16>>>,
    pub reads: Rc<Cell<u32>>,
}

impl FakeAdc {
    pub fn new(value: u16) -> Self {
        Self {
            value: Rc::new(Cell::new(Some(value))),
            reads: Rc::new(Cell::new(0)),
        }
    }
}

impl AdcReader for FakeAdc {
    fn read_raw(&mut self) -> Result<u16, AdcError> {
        self.reads.set(self.reads.get() + 1);
        self.value.get().ok_or(AdcError::ReadFailed)
    }
}

/// Board capturing both UARTs.
#[derive(Default)]
pub struct FakeBoard {
    pub console: Vec<u8>,
    pub log: Vec<u8>,
    pub rearms: u32,
    pub idles: u32,
}

impl FakeBoard {
    pub fn console_text(&self) -> String {
        String::from_utf8_lossy(&self.console).into_owned()
    }

    pub fn log_text(&self) -> String {
        String::from_utf8_lossy(&self.log).into_owned()
    }
}

impl Board for FakeBoard {
    type Led = FakeLed;
    type Button = FakeButton;
    type Adc = FakeAdc;

    fn console_tx(&mut self, bytes: &[u8]) {
        self.console.extend_from_slice(bytes);
    }

    fn log_tx(&mut self, bytes: &[u8]) {
        self.log.extend_from_slice(bytes);
    }

    fn rearm_button(&mut self, _pin: &mut FakeButton) {
        self.rearms += 1;
    }

    fn idle(&mut self) {
        self.idles += 1;
    }
}

pub fn fake_peripherals(
    led_fail: &Rc<Cell<bool>>,
    button: &FakeButton,
    adc: &FakeAdc,
) -> Peripherals<FakeBoard> {
    Peripherals {
        led: FakeLed {
            fail: led_fail.clone(),
            ..FakeLed::default()
        },
        button: button.clone(),
        adc: adc.clone(),
    }
}

/// `fmt::Write` into a String.
#[derive(Default)]
pub struct TestOutput {
    pub text: String,
}

impl TestOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, s: &str) -> bool {
        self.text.contains(s)
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

impl core::fmt::Write for TestOutput {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.text.push_str(s);
        Ok(())
    }
}

/// Minimal console context: LED mode and uptime only, ADC fixed.
pub struct SimpleContext {
    pub uptime: u32,
    pub led: LedMode,
    pub adc_avg: u16,
}

impl SimpleContext {
    pub fn new() -> Self {
        Self {
            uptime: 0,
            led: LedMode::Slow,
            adc_avg: 0,
        }
    }
}

impl ConsoleContext for SimpleContext {
    fn uptime_ms(&self) -> u32 {
        self.uptime
    }

    fn led_mode(&self) -> LedMode {
        self.led
    }

    fn set_led_mode(&mut self, mode: LedMode) {
        self.led = mode;
    }

    fn adc_start(&mut self) {}

    fn adc_stop(&mut self) {}

    fn adc_average(&self) -> u16 {
        self.adc_avg
    }

    fn adc_read_avg(&mut self, _samples: u8) -> Result<u16, AdcError> {
        Ok(self.adc_avg)
    }

    fn fault(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: false,
            code: FaultCode::None,
            data: 0,
            count: 0,
        }
    }
}
