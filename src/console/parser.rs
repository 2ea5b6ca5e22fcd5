//! Command line parser
//!
//! Split on spaces. Runs of spaces count as one separator, so no token is
//! ever empty. At most [`MAX_TOKENS`] tokens are kept, the rest is ignored.

use heapless::Vec;

use crate::config::MAX_TOKENS;

/// Tokenized command line, borrowing from the line buffer
#[derive(Debug, Clone, Default)]
pub struct ParsedCommand<'a> {
    tokens: Vec<&'a str, MAX_TOKENS>,
}

impl<'a> ParsedCommand<'a> {
    /// Create empty command
    pub const fn empty() -> Self {
        Self { tokens: Vec::new() }
    }

    /// The command name (first token), `""` for a blank line
    pub fn command(&self) -> &'a str {
        self.tokens.first().copied().unwrap_or("")
    }

    /// Get argument by index (0-based, command name excluded)
    pub fn arg(&self, idx: usize) -> Option<&'a str> {
        self.tokens.get(idx + 1).copied()
    }

    /// Token count, command name included
    pub fn argc(&self) -> usize {
        self.tokens.len()
    }

    /// All tokens, command name first
    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Parse a command line into tokens
pub fn parse_line(line: &str) -> ParsedCommand<'_> {
    let mut tokens = Vec::new();

    for token in line.split(' ').filter(|t| !t.is_empty()) {
        if tokens.push(token).is_err() {
            break;
        }
    }

    ParsedCommand { tokens }
}
