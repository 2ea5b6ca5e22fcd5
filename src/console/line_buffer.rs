//! Line buffer for console input

use crate::config::MAX_LINE_LEN;

/// Line input buffer
pub struct LineBuffer {
    buf: [u8; MAX_LINE_LEN],
    len: usize,
    /// Bytes rejected because the line was full
    dropped: u32,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; MAX_LINE_LEN],
            len: 0,
            dropped: 0,
        }
    }

    /// Push a character
    ///
    /// Returns `false` (and counts the byte) when the line is full.
    pub fn push(&mut self, c: u8) -> bool {
        if self.len < MAX_LINE_LEN {
            self.buf[self.len] = c;
            self.len += 1;
            true
        } else {
            self.dropped = self.dropped.wrapping_add(1);
            false
        }
    }

    /// Remove last character. Returns `false` if the line was already empty.
    pub fn backspace(&mut self) -> bool {
        if self.len > 0 {
            self.len -= 1;
            true
        } else {
            false
        }
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Get buffer as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Get buffer length
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if full
    pub fn is_full(&self) -> bool {
        self.len == MAX_LINE_LEN
    }

    /// Bytes dropped on overflow since boot
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
