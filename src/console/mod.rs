//! Serial console
//!
//! Polled from the scheduler's console task, fed from the RX ring.
//! Zero heap allocation - all static buffers.

pub mod commands;
#[allow(clippy::module_inception)]
pub mod console;
pub mod error;
pub mod line_buffer;
pub mod parser;

pub use commands::{command_names, execute, Command, ConsoleContext, COMMANDS};
pub use console::{Console, PROMPT, VERSION};
pub use error::ConsoleError;
pub use line_buffer::LineBuffer;
pub use parser::{parse_line, ParsedCommand};
