//! # Command Buffer
//!
//! An append-only byte buffer for building one print job. The buffer always
//! starts with `ESC @` and only ever grows.
//!
//! Alignment is tracked so that a centred block always hands the printer
//! back in left alignment: [`CommandBuffer::centered`] emits
//! `ESC a 1`, the line, then `ESC a 0`.
//!
//! ## Example
//!
//! ```
//! use struk::protocol::buffer::CommandBuffer;
//!
//! let mut buf = CommandBuffer::new();
//! buf.centered("TITLE").rule(8).line("body");
//! let bytes = buf.into_bytes();
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! ```

use super::commands::{self, LF};
use super::text::{self, Alignment};

/// Append-only ESC/POS command buffer
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    buf: Vec<u8>,
    alignment: Alignment,
}

impl CommandBuffer {
    /// Create a buffer holding the initialize sequence.
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(512);
        buf.extend(commands::init());
        Self {
            buf,
            alignment: Alignment::Left,
        }
    }

    /// Number of bytes appended so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Never true: the initialize sequence is always present
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Switch alignment; no bytes are emitted when it is already in effect.
    fn align(&mut self, alignment: Alignment) -> &mut Self {
        if self.alignment != alignment {
            self.buf.extend(text::align(alignment));
            self.alignment = alignment;
        }
        self
    }

    /// Write text followed by `LF`
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.buf.extend(text::encode(s));
        self.buf.push(LF);
        self
    }

    /// Write one centred line and return to left alignment.
    ///
    /// Left is the only alignment the buffer rests in, so both alignment
    /// commands are emitted every time.
    pub fn centered(&mut self, s: &str) -> &mut Self {
        self.align(Alignment::Center).line(s).align(Alignment::Left)
    }

    /// Write a full-width line of `-`
    pub fn rule(&mut self, columns: usize) -> &mut Self {
        self.line(&"-".repeat(columns))
    }

    /// Feed `lines` and cut.
    pub fn feed_and_cut(&mut self, lines: u8) -> &mut Self {
        self.buf.extend(commands::feed_and_cut(lines));
        self
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}
