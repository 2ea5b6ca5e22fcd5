//! Application wiring: shared state, task bodies, default task table.
//!
//! ```text
//!  tick ISR ──▶ TickCounter ──┐
//!  UART RX  ──▶ RxRing ───────┤
//!  edge ISR ──▶ Debouncer ────┼──▶ App ◀── Scheduler::run_pass()
//!                             │     │
//!  FaultState ◀───────────────┘     └──▶ LogStream ──▶ log UART
//! ```
//!
//! Everything hardware-specific sits behind [`Board`], so the whole loop runs
//! on host with fake pins.

use core::fmt::Write;

use embedded_hal::digital::{InputPin, OutputPin};

use crate::adc::{AdcError, AdcReader, AdcSampler};
use crate::button::{ButtonInput, ButtonPoll, Debouncer};
use crate::config::{
    ADC_TASK_PERIOD_MS, BUTTON_TASK_PERIOD_MS, CONSOLE_TASK_PERIOD_MS, LED_TASK_PERIOD_MS,
    LOG_TASK_PERIOD_MS,
};
use crate::console::{Console, ConsoleContext, VERSION};
use crate::fault::{FaultCode, FaultSnapshot, FaultState};
use crate::led::{LedController, LedMode};
use crate::logging::LogStream;
use crate::rx_stream::{RxDrain, RxReader, RxRing};
use crate::scheduler::TaskEntry;
use crate::tick::{Tick, TickCounter};
use crate::uart_logger::LogDrain;
use crate::{log_debug, log_error, log_info, log_warn};

/// Number of entries in [`default_tasks`].
pub const TASK_COUNT: usize = 6;

/// `PinFault` data: which pin failed.
pub const PIN_BUTTON: u32 = 0;
pub const PIN_LED: u32 = 1;

/// Board-specific peripherals and byte sinks.
pub trait Board {
    type Led: OutputPin;
    type Button: InputPin;
    type Adc: AdcReader;

    /// Blocking write to the console UART.
    fn console_tx(&mut self, bytes: &[u8]);

    /// Blocking write to the log UART.
    fn log_tx(&mut self, bytes: &[u8]);

    /// Re-enable the button edge interrupt after a settle window closes.
    fn rearm_button(&mut self, _pin: &mut Self::Button) {}

    /// Yield the core until the next interrupt.
    fn idle(&mut self) {}
}

/// State shared with interrupt handlers. Usually `'static`.
#[derive(Clone, Copy)]
pub struct Shared<'a> {
    pub ticks: &'a TickCounter,
    pub rx: &'a RxRing,
    pub debouncer: &'a Debouncer,
    pub faults: &'a FaultState,
    pub logs: &'a LogStream,
}

/// Owned peripherals handed to [`App::new`].
pub struct Peripherals<B: Board> {
    pub led: B::Led,
    pub button: B::Button,
    pub adc: B::Adc,
}

/// Firmware state driven by the scheduler.
pub struct App<'a, B: Board> {
    board: B,
    led: LedController<B::Led>,
    button: ButtonInput<B::Button>,
    adc: AdcSampler<B::Adc>,
    console: Console,
    rx: RxReader<'a>,
    log_drain: LogDrain,
    shared: Shared<'a>,
}

impl<'a, B: Board> App<'a, B> {
    pub fn new(board: B, peripherals: Peripherals<B>, shared: Shared<'a>) -> Self {
        Self {
            board,
            led: LedController::new(peripherals.led),
            button: ButtonInput::new(peripherals.button),
            adc: AdcSampler::new(peripherals.adc),
            console: Console::new(),
            rx: RxReader::new(shared.rx),
            log_drain: LogDrain::new(),
            shared,
        }
    }

    /// Print the banner and prompt.
    pub fn boot(&mut self) {
        let now = self.now();
        self.console.print_banner(&mut ConsoleOut(&mut self.board));
        log_info!(self.shared.logs, now, "{} up, led={}", VERSION, self.led.mode().name());
    }

    pub fn now(&self) -> Tick {
        self.shared.ticks.now()
    }

    pub fn led(&self) -> &LedController<B::Led> {
        &self.led
    }

    pub fn adc(&self) -> &AdcSampler<B::Adc> {
        &self.adc
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }
}

/// `fmt::Write` onto the console UART.
struct ConsoleOut<'w, B>(&'w mut B);

impl<B: Board> Write for ConsoleOut<'_, B> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.0.console_tx(s.as_bytes());
        Ok(())
    }
}

/// The parts of [`App`] console commands may touch.
struct Handlers<'h, L, A> {
    led: &'h mut LedController<L>,
    adc: &'h mut AdcSampler<A>,
    ticks: &'h TickCounter,
    faults: &'h FaultState,
}

impl<L: OutputPin, A: AdcReader> ConsoleContext for Handlers<'_, L, A> {
    fn uptime_ms(&self) -> u32 {
        self.ticks.now()
    }

    fn led_mode(&self) -> LedMode {
        self.led.mode()
    }

    fn set_led_mode(&mut self, mode: LedMode) {
        self.led.set_mode(mode);
    }

    fn adc_start(&mut self) {
        self.adc.start();
    }

    fn adc_stop(&mut self) {
        self.adc.stop();
    }

    fn adc_average(&self) -> u16 {
        self.adc.average()
    }

    fn adc_read_avg(&mut self, samples: u8) -> Result<u16, AdcError> {
        self.adc.read_avg(samples)
    }

    fn fault(&self) -> FaultSnapshot {
        self.faults.snapshot()
    }
}

// --- Tasks ---

/// Close the debounce window and cycle the LED mode on a press.
pub fn task_button<B: Board>(app: &mut App<'_, B>, now: Tick) {
    let App { board, button, led, shared, .. } = app;

    let closed = match shared.debouncer.poll(now, || button.is_pressed()) {
        Ok(poll) => {
            if poll == ButtonPoll::Pressed {
                let mode = led.cycle_mode();
                log_info!(shared.logs, now, "button: led -> {}", mode.name());
            }
            if poll.window_closed() {
                shared.faults.resolve(FaultCode::PinFault, PIN_BUTTON);
            }
            poll.window_closed()
        }
        Err(_) => {
            if shared.faults.raise(FaultCode::PinFault, PIN_BUTTON) {
                log_error!(shared.logs, now, "button read failed");
            }
            true
        }
    };

    if closed {
        board.rearm_button(button.pin_mut());
    }
}

/// Advance the LED blink state machine.
pub fn task_led<B: Board>(app: &mut App<'_, B>, now: Tick) {
    let App { led, shared, .. } = app;

    match led.update(now) {
        Ok(true) => shared.faults.resolve(FaultCode::PinFault, PIN_LED),
        Ok(false) => {}
        Err(_) => {
            if shared.faults.raise(FaultCode::PinFault, PIN_LED) {
                log_error!(shared.logs, now, "led write failed");
            }
        }
    }
}

/// Drain new RX bytes into the line assembler.
pub fn task_console<B: Board>(app: &mut App<'_, B>, now: Tick) {
    let App { board, led, adc, console, rx, shared, .. } = app;

    let mut ctx = Handlers {
        led,
        adc,
        ticks: shared.ticks,
        faults: shared.faults,
    };
    let mut out = ConsoleOut(board);

    let mut last_err = None;
    let drained = rx.drain(|span| {
        if let Some(e) = console.feed(span, &mut ctx, &mut out) {
            last_err = Some(e);
        }
    });

    if let Some(e) = last_err {
        log_debug!(shared.logs, now, "console: {}", e);
    }

    if let RxDrain::Overrun { skipped } = drained {
        console.reset_line();
        shared.faults.raise(FaultCode::RxOverrun, skipped);
        log_warn!(shared.logs, now, "rx overrun, {} bytes dropped", skipped);
    }
}

/// Take one periodic ADC sample when sampling is running.
pub fn task_adc<B: Board>(app: &mut App<'_, B>, now: Tick) {
    let App { adc, shared, .. } = app;

    match adc.sample() {
        Ok(()) => shared.faults.resolve(FaultCode::AdcFault, 0),
        Err(e) => {
            if shared.faults.raise(FaultCode::AdcFault, 0) {
                log_warn!(shared.logs, now, "adc sample: {}", e);
            }
        }
    }
}

/// Write pending log entries to the log UART.
pub fn task_log<B: Board>(app: &mut App<'_, B>, now: Tick) {
    let App { board, log_drain, shared, .. } = app;
    log_drain.drain(shared.logs, now, &mut |bytes: &[u8]| board.log_tx(bytes));
}

/// Yield until the next interrupt.
pub fn task_idle<B: Board>(app: &mut App<'_, B>, _now: Tick) {
    app.board.idle();
}

/// Task table in run order.
pub fn default_tasks<'a, B: Board>() -> [TaskEntry<App<'a, B>>; TASK_COUNT] {
    [
        TaskEntry::new("button", BUTTON_TASK_PERIOD_MS, task_button::<B>),
        TaskEntry::new("led", LED_TASK_PERIOD_MS, task_led::<B>),
        TaskEntry::new("console", CONSOLE_TASK_PERIOD_MS, task_console::<B>),
        TaskEntry::new("adc", ADC_TASK_PERIOD_MS, task_adc::<B>),
        TaskEntry::new("log", LOG_TASK_PERIOD_MS, task_log::<B>),
        TaskEntry::new("idle", 0, task_idle::<B>),
    ]
}
