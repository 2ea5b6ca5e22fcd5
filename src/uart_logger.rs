//! Log output on a TX-only UART.
//!
//! The console UART carries the interactive protocol, so log lines go out on
//! a second UART. Requires an external USB-UART adapter.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32-S3 GPIO17 (UART1 TX) ──────▶ USB-UART RX
//!                                     └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;

use crate::config::LOG_DROP_REPORT_MS;
use crate::logging::{LogEntry, LogStream, SliceWriter};
use crate::tick::{elapsed, Tick};

/// Room for the longest message plus the `[timestamp] LEVEL: ` prefix.
pub const FORMAT_BUF_LEN: usize = 128;

/// Format log entry to text.
///
/// Format: `[timestamp_ms] LEVEL: message\r\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = SliceWriter::new(buf);

    let _ = write!(
        writer,
        "[{:10}] {}: {}\r\n",
        entry.timestamp_ms,
        entry.level.as_str(),
        entry.text()
    );

    writer.len()
}

/// Drains a [`LogStream`] into a byte sink and periodically reports drops.
pub struct LogDrain {
    last_drop_report: Tick,
}

impl LogDrain {
    pub const fn new() -> Self {
        Self { last_drop_report: 0 }
    }

    /// Write every pending entry to `sink`.
    ///
    /// Returns the number of entries written.
    pub fn drain<const N: usize>(
        &mut self,
        stream: &LogStream<N>,
        now: Tick,
        sink: &mut dyn FnMut(&[u8]),
    ) -> usize {
        let mut format_buf = [0u8; FORMAT_BUF_LEN];
        let mut written = 0;

        while let Some(entry) = stream.drain() {
            let len = format_log_entry(&entry, &mut format_buf);
            sink(&format_buf[..len]);
            written += 1;
        }

        if elapsed(now, self.last_drop_report) >= LOG_DROP_REPORT_MS {
            let dropped = stream.dropped();
            if dropped > 0 {
                let mut msg = [0u8; 48];
                let mut w = SliceWriter::new(&mut msg);
                let _ = write!(w, "[WARN] Dropped: {}\r\n", dropped);
                sink(w.as_bytes());
                stream.reset_dropped();
            }
            self.last_drop_report = now;
        }

        written
    }
}

impl Default for LogDrain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MAX_MSG_LEN};

    #[test]
    fn test_format_log_entry() {
        let entry = LogEntry {
            timestamp_ms: 1234567,
            level: LogLevel::Info,
            len: 11,
            msg: {
                let mut msg = [0u8; MAX_MSG_LEN];
                msg[..11].copy_from_slice(b"Hello world");
                msg
            },
        };

        let mut buf = [0u8; FORMAT_BUF_LEN];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(formatted, "[   1234567] INFO: Hello world\r\n");
    }

    #[test]
    fn test_format_truncated_message() {
        let entry = LogEntry {
            timestamp_ms: 999,
            level: LogLevel::Error,
            len: 5,
            msg: {
                let mut msg = [0u8; MAX_MSG_LEN];
                msg[..10].copy_from_slice(b"TEST12345X"); // Only first 5 used
                msg
            },
        };

        let mut buf = [0u8; FORMAT_BUF_LEN];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("TEST1"));
        assert!(!formatted.contains("X"));
    }

    #[test]
    fn test_drain_reports_drops() {
        let stream = LogStream::<2>::new();
        stream.push(1, LogLevel::Info, b"a");
        stream.push(2, LogLevel::Info, b"b");
        stream.push(3, LogLevel::Info, b"c"); // dropped

        let mut out = Vec::new();
        let mut drain = LogDrain::new();

        // Too early for the drop report.
        assert_eq!(drain.drain(&stream, 5, &mut |b: &[u8]| out.extend_from_slice(b)), 2);
        assert!(!String::from_utf8_lossy(&out).contains("Dropped"));

        out.clear();
        drain.drain(&stream, LOG_DROP_REPORT_MS, &mut |b: &[u8]| out.extend_from_slice(b));
        assert_eq!(String::from_utf8_lossy(&out), "[WARN] Dropped: 1\r\n");
        assert_eq!(stream.dropped(), 0);
    }
}
