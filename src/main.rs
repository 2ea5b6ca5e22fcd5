//! RustTickConsole - firmware entry point (ESP32-S3)
//!
//! Boot sequence:
//! 1. Console UART (UART0, GPIO43/44) and log UART (UART1 TX, GPIO17)
//! 2. LED output (GPIO2), button input (GPIO0, falling edge), ADC1 on GPIO1
//! 3. 1 ms timer: advances the tick and moves received bytes into the RX ring
//! 4. Banner, then the cooperative scheduler loop forever
//!
//! Any init failure is fatal: log, then [`fault::halt`].
//!
//! On host this binary is an empty stub; the library carries the logic.

#![cfg_attr(target_os = "espidf", no_std, no_main)]

#[cfg(target_os = "espidf")]
mod firmware {
    use core::time::Duration;

    use esp_idf_svc::hal::adc::attenuation::DB_11;
    use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
    use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
    use esp_idf_svc::hal::adc::ADC1;
    use esp_idf_svc::hal::delay::NON_BLOCK;
    use esp_idf_svc::hal::gpio::{
        AnyIOPin, AnyOutputPin, Gpio1, Input, InterruptType, Output, PinDriver, Pull,
    };
    use esp_idf_svc::hal::peripherals::Peripherals as EspPeripherals;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::hal::uart::{config::Config as UartDriverConfig, UartDriver, UartTxDriver};
    use esp_idf_svc::sys::{self as esp_idf_sys, EspError};
    use esp_idf_svc::timer::{EspTaskTimerService, EspTimer};

    use rust_tick_console::adc::{AdcError, AdcReader};
    use rust_tick_console::app::{default_tasks, App, Board, Peripherals, Shared};
    use rust_tick_console::button::Debouncer;
    use rust_tick_console::config::{UartConfig, DEBOUNCE_MS, TICK_HZ};
    use rust_tick_console::fault::{self, FaultState};
    use rust_tick_console::log_globals::LOG_STREAM;
    use rust_tick_console::rx_stream::RxRing;
    use rust_tick_console::scheduler::Scheduler;
    use rust_tick_console::tick::TickCounter;
    use rust_tick_console::uart_logger::LogDrain;
    use rust_tick_console::{log_error, log_info};

    static TICKS: TickCounter = TickCounter::new();
    static RX_RING: RxRing = RxRing::new();
    static DEBOUNCER: Debouncer = Debouncer::new(DEBOUNCE_MS);
    static FAULT_STATE: FaultState = FaultState::new();

    /// Bytes moved from the UART driver per timer tick, at most.
    const RX_CHUNK: usize = 32;

    type LedPin = PinDriver<'static, AnyOutputPin, Output>;
    type ButtonPin = PinDriver<'static, AnyIOPin, Input>;

    /// ADC1 one-shot channel on GPIO1.
    struct EspAdc {
        channel: AdcChannelDriver<'static, Gpio1, AdcDriver<'static, ADC1>>,
    }

    impl AdcReader for EspAdc {
        fn read_raw(&mut self) -> Result<u16, AdcError> {
            self.channel.read().map_err(|_| AdcError::ReadFailed)
        }
    }

    struct EspBoard {
        console: UartTxDriver<'static>,
        log: UartTxDriver<'static>,
    }

    fn write_all(uart: &mut UartTxDriver<'static>, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            match uart.write(bytes) {
                Ok(0) | Err(_) => break,
                Ok(n) => bytes = &bytes[n..],
            }
        }
    }

    impl Board for EspBoard {
        type Led = LedPin;
        type Button = ButtonPin;
        type Adc = EspAdc;

        fn console_tx(&mut self, bytes: &[u8]) {
            write_all(&mut self.console, bytes);
        }

        fn log_tx(&mut self, bytes: &[u8]) {
            write_all(&mut self.log, bytes);
        }

        fn rearm_button(&mut self, pin: &mut ButtonPin) {
            if let Err(e) = pin.enable_interrupt() {
                log_error!(LOG_STREAM, TICKS.now(), "button rearm: {}", e);
            }
        }

        /// One FreeRTOS tick, 1 ms with the shipped `sdkconfig.defaults`.
        fn idle(&mut self) {
            unsafe {
                esp_idf_sys::vTaskDelay(1);
            }
        }
    }

    /// Push pending log entries out through the ROM console. Used on the fatal
    /// path, where the log task never gets to run.
    fn flush_log_to_rom() {
        let mut drain = LogDrain::new();
        drain.drain(&LOG_STREAM, TICKS.now(), &mut |bytes: &[u8]| unsafe {
            esp_idf_sys::esp_rom_printf(
                b"%.*s\0".as_ptr().cast(),
                bytes.len() as core::ffi::c_int,
                bytes.as_ptr(),
            );
        });
    }

    /// Falling edge on the button. Interrupt context: no logging.
    fn on_button_edge() {
        DEBOUNCER.notify_edge(TICKS.now());
    }

    struct Hardware {
        board: EspBoard,
        peripherals: Peripherals<EspBoard>,
        _tick_timer: EspTimer<'static>,
    }

    fn init_hardware() -> Result<Hardware, EspError> {
        let p = EspPeripherals::take()?;
        let uart_cfg = UartConfig::default();
        let driver_cfg = UartDriverConfig::default().baudrate(Hertz(uart_cfg.baud_rate));

        let console = UartDriver::new(
            p.uart0,
            p.pins.gpio43,
            p.pins.gpio44,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &driver_cfg,
        )?;
        let (console_tx, console_rx) = console.into_split();

        let log = UartTxDriver::new(
            p.uart1,
            p.pins.gpio17,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &driver_cfg,
        )?;

        let led = PinDriver::output(AnyOutputPin::from(p.pins.gpio2))?;

        let mut button = PinDriver::input(AnyIOPin::from(p.pins.gpio0))?;
        button.set_pull(Pull::Up)?;
        button.set_interrupt_type(InterruptType::NegEdge)?;
        // SAFETY: the handler only touches `DEBOUNCER` and `TICKS`, both ISR-safe.
        unsafe {
            button.subscribe(on_button_edge)?;
        }
        button.enable_interrupt()?;

        let adc_cfg = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        let adc_driver = AdcDriver::new(p.adc1)?;
        let channel = AdcChannelDriver::new(adc_driver, p.pins.gpio1, &adc_cfg)?;

        let timer_service = EspTaskTimerService::new()?;
        let tick_timer = timer_service.timer(move || {
            TICKS.increment();

            let mut chunk = [0u8; RX_CHUNK];
            if let Ok(n) = console_rx.read(&mut chunk, NON_BLOCK) {
                if n > 0 {
                    RX_RING.write(&chunk[..n]);
                }
            }
        })?;
        tick_timer.every(Duration::from_micros(1_000_000 / u64::from(TICK_HZ)))?;

        Ok(Hardware {
            board: EspBoard {
                console: console_tx,
                log,
            },
            peripherals: Peripherals {
                led,
                button,
                adc: EspAdc { channel },
            },
            _tick_timer: tick_timer,
        })
    }

    #[no_mangle]
    fn main() {
        esp_idf_sys::link_patches();

        let hw = match init_hardware() {
            Ok(hw) => hw,
            Err(e) => {
                log_error!(LOG_STREAM, TICKS.now(), "init failed: {}", e);
                flush_log_to_rom();
                fault::halt();
            }
        };

        let shared = Shared {
            ticks: &TICKS,
            rx: &RX_RING,
            debouncer: &DEBOUNCER,
            faults: &FAULT_STATE,
            logs: &LOG_STREAM,
        };

        let mut app = App::new(hw.board, hw.peripherals, shared);
        let mut scheduler = Scheduler::new(default_tasks());
        let _tick_timer = hw._tick_timer;

        app.boot();
        log_info!(LOG_STREAM, TICKS.now(), "scheduler: {} tasks", scheduler.tasks().len());

        loop {
            scheduler.run_pass(TICKS.now(), &mut app);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {}
