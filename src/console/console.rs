//! Line assembler: bytes in, echo and dispatched commands out

use core::fmt::Write;

use super::commands::ConsoleContext;
use super::{execute, parse_line, ConsoleError, LineBuffer};

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Prompt emitted after every completed line
pub const PROMPT: &str = "> ";

/// Console state machine
pub struct Console {
    line: LineBuffer,
}

impl Console {
    /// Create new console
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    /// Process a span of received bytes, in order.
    ///
    /// Returns the last command error in the span, if any.
    pub fn feed(
        &mut self,
        bytes: &[u8],
        ctx: &mut dyn ConsoleContext,
        out: &mut dyn Write,
    ) -> Option<ConsoleError> {
        let mut last_err = None;
        for &b in bytes {
            if let Some(Err(e)) = self.process_byte(b, ctx, out) {
                last_err = Some(e);
            }
        }
        last_err
    }

    /// Process a single input byte
    ///
    /// Returns Some(result) if a line was dispatched, None otherwise. Errors
    /// are already printed when this returns.
    pub fn process_byte(
        &mut self,
        byte: u8,
        ctx: &mut dyn ConsoleContext,
        out: &mut dyn Write,
    ) -> Option<Result<(), ConsoleError>> {
        match byte {
            // Enter
            b'\r' | b'\n' => {
                let _ = write!(out, "\r\n");

                let result = if self.line.is_empty() {
                    None
                } else {
                    let cmd = parse_line(self.line.as_str());
                    let result = execute(&cmd, ctx, out);
                    if let Err(e) = result {
                        let _ = write!(out, "{}\r\n", e.message());
                    }
                    Some(result)
                };

                self.line.clear();
                self.print_prompt(out);
                result
            }

            // Backspace / DEL
            0x08 | 0x7F => {
                if self.line.backspace() {
                    // Echo: backspace, space, backspace
                    let _ = write!(out, "\x08 \x08");
                }
                None
            }

            // Printable character
            0x20..=0x7E => {
                if self.line.push(byte) {
                    let _ = out.write_char(byte as char);
                }
                None
            }

            _ => None,
        }
    }

    /// Drop the partial line without echo (after lost input).
    pub fn reset_line(&mut self) {
        self.line.clear();
    }

    /// Current partial line
    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// Print the prompt
    pub fn print_prompt(&self, out: &mut dyn Write) {
        let _ = out.write_str(PROMPT);
    }

    /// Print boot banner followed by `ok` and the prompt
    pub fn print_banner(&self, out: &mut dyn Write) {
        let _ = write!(out, "\r\n{}\r\nok\r\n", VERSION);
        self.print_prompt(out);
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
