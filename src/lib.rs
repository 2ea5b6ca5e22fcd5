//! # RustTickConsole
//!
//! Bare-metal style firmware core: a cooperative tick scheduler driving a
//! blinking LED, a debounced button, an interactive serial console and an
//! ADC sampler.
//!
//! ## Architecture
//!
//! Interrupt handlers only touch single-word atomics or short critical
//! sections:
//! - the tick ISR advances [`TickCounter`]
//! - the UART RX path appends to [`RxRing`]
//! - the button edge ISR opens a [`Debouncer`] window
//!
//! Everything else runs as short tasks from [`Scheduler::run_pass`], in table
//! order, on a single core. Hardware sits behind embedded-hal traits and
//! [`app::Board`], so the library builds and tests on host.

#![cfg_attr(not(test), no_std)]

pub mod adc;
pub mod app;
pub mod button;
pub mod config;
pub mod console;
pub mod fault;
pub mod led;
pub mod log_globals;
pub mod logging;
pub mod rx_stream;
pub mod scheduler;
pub mod tick;
pub mod uart_logger;

pub use adc::{AdcError, AdcReader, AdcSampler};
pub use app::{App, Board};
pub use button::{ButtonPoll, Debouncer};
pub use console::{Console, ConsoleError};
pub use fault::{FaultCode, FaultState};
pub use led::{LedController, LedMode};
pub use logging::LogStream;
pub use rx_stream::{RxDrain, RxReader, RxRing};
pub use scheduler::{Scheduler, TaskEntry};
pub use tick::{Tick, TickCounter};
