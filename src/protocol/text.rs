//! # ESC/POS Text Commands
//!
//! Alignment control and text encoding for the line-oriented receipt.
//!
//! ## Text Alignment
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! ```
//!
//! Alignment is printer state: it stays in effect for every following line
//! until changed or until `ESC @` resets it.

use super::commands::ESC;

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
}

/// # Set Text Alignment (ESC a n)
///
/// Sets the alignment for subsequent text lines.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC a n |
/// | Hex     | 1B 61 n |
/// | Decimal | 27 97 n |
///
/// ## Parameters
///
/// - `n = 0`: Left alignment (default)
/// - `n = 1`: Center alignment
///
/// ## Example
///
/// ```
/// use struk::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// TEXT ENCODING
// ============================================================================

/// Encode text for the printer.
///
/// Text is sent as UTF-8, the way the record layer hands it over. ASCII
/// passes through unchanged, which covers every label and number on the
/// receipt.
#[inline]
pub fn encode(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        assert_eq!(align(Alignment::Left), vec![0x1B, 0x61, 0x00]);
        assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
    }

    #[test]
    fn test_default_alignment_is_left() {
        assert_eq!(Alignment::default(), Alignment::Left);
    }

    #[test]
    fn test_encode_ascii_passthrough() {
        assert_eq!(encode("No Struk"), b"No Struk".to_vec());
    }
}
