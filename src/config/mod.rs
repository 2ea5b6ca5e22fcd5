//! Module: config
//!
//! Purpose: Build-time configuration for RustTickConsole.
//!
//! Architecture:
//! - Every tunable is a `const`, fixed at build time
//! - Periods and windows are in ticks (1 tick = 1 ms)
//! - Nothing is persisted; the firmware boots with these values every time
//!
//! Safety: RT-safe. Plain constants, no runtime state.

/// Tick interrupt rate. All periods below assume 1 tick == 1 ms.
pub const TICK_HZ: u32 = 1000;

/// Button settle window.
pub const DEBOUNCE_MS: u32 = 50;

/// LED toggle interval in `Slow` mode.
pub const LED_SLOW_INTERVAL_MS: u32 = 500;

/// LED toggle interval in `Fast` mode.
pub const LED_FAST_INTERVAL_MS: u32 = 100;

/// Scheduler periods (0 = run on every pass).
pub const BUTTON_TASK_PERIOD_MS: u32 = 10;
pub const LED_TASK_PERIOD_MS: u32 = 1;
pub const CONSOLE_TASK_PERIOD_MS: u32 = 5;
pub const ADC_TASK_PERIOD_MS: u32 = 10;
pub const LOG_TASK_PERIOD_MS: u32 = 20;

/// Serial receive ring size. Must be a power of 2.
pub const RX_RING_SIZE: usize = 128;

/// Longest accepted console line (characters).
pub const MAX_LINE_LEN: usize = 63;

/// Maximum tokens per console line (command name included).
pub const MAX_TOKENS: usize = 8;

/// Samples kept by the periodic ADC window.
pub const ADC_WINDOW_LEN: usize = 32;

/// One-shot reads averaged by `adc latest` and `adc temp`.
pub const ADC_ONESHOT_SAMPLES: u8 = 16;

/// ADC full-scale code (12-bit).
pub const ADC_FULL_SCALE: u16 = 4095;

/// ADC reference in millivolts.
pub const ADC_VREF_MV: u32 = 3300;

/// NTC divider and thermistor constants.
pub const NTC_DIVIDER_OHMS: f32 = 10_000.0;
pub const NTC_PULLUP_OHMS: f32 = 10_000.0;
pub const NTC_R0_OHMS: f32 = 2_200.0;
pub const NTC_BETA: f32 = 3950.0;
pub const NTC_T0_KELVIN: f32 = 298.15;

/// Interval between dropped-log summaries on the log UART.
pub const LOG_DROP_REPORT_MS: u32 = 10_000;

/// UART configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    pub baud_rate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baud_rate: 115_200 }
    }
}
