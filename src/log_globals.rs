//! Global log stream instance.
//!
//! Producers: main-loop tasks. Consumer: the scheduled log task.

use crate::logging::LogStream;

/// Firmware log stream, drained to the log UART.
pub static LOG_STREAM: LogStream = LogStream::new();
