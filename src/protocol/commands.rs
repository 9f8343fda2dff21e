//! # ESC/POS Protocol Commands
//!
//! This module implements the subset of the ESC/POS command protocol used by
//! generic 58mm/80mm thermal receipt printers (the Bluetooth LE "bridge"
//! printers sold under many brands all accept it).
//!
//! ## Protocol Overview
//!
//! Commands are byte sequences starting with an escape byte. Everything that
//! is not a command is printed as text into the line buffer; `LF` prints the
//! buffer and advances the paper.
//!
//! ## Escape Sequence Structure
//!
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - With parameter: `ESC a n`, `ESC d n`, `GS V m`
//!
//! ## Instruction Set
//!
//! | Command | Bytes | Effect |
//! |---------|-------|--------|
//! | `ESC @` | `1B 40` | Initialize |
//! | `ESC a n` | `1B 61 n` | Alignment (see [`super::text`]) |
//! | `LF` | `0A` | Print line buffer, advance one line |
//! | `ESC d n` | `1B 64 n` | Print and feed n lines |
//! | `GS V 0` | `1D 56 00` | Full cut |
//! | `GS V 1` | `1D 56 01` | Partial cut |

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for paper cutting and character size commands.
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state: clears the print
/// buffer, resets text formatting and sets alignment to left. Every receipt
/// starts with it.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## Example
///
/// ```
/// use struk::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// PAPER FEED COMMANDS
// ============================================================================

/// # Print and Feed Lines (ESC d n)
///
/// Prints the line buffer and feeds the paper `n` lines.
///
/// ## Protocol Details
///
/// | Format  | Bytes     |
/// |---------|-----------|
/// | ASCII   | ESC d n   |
/// | Hex     | 1B 64 n   |
/// | Decimal | 27 100 n  |
///
/// ## Example
///
/// ```
/// use struk::protocol::commands;
///
/// assert_eq!(commands::feed_lines(2), vec![0x1B, 0x64, 0x02]);
/// ```
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

// ============================================================================
// CUTTER CONTROL COMMANDS
// ============================================================================

/// # Full Cut (GS V 0)
///
/// Cuts the paper at the current position.
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 0   |
/// | Hex     | 1D 56 00 |
/// | Decimal | 29 86 0  |
///
/// ## Behavior
///
/// Many 58mm printers have no cutter and silently ignore the command.
/// That is not an error: the receipt is simply torn off by hand.
#[inline]
pub fn cut_full() -> Vec<u8> {
    vec![GS, b'V', 0]
}

/// Feed `lines` then full cut: the trailer of every receipt.
///
/// ```
/// use struk::protocol::commands;
///
/// assert_eq!(commands::feed_and_cut(2), vec![0x1B, 0x64, 0x02, 0x1D, 0x56, 0x00]);
/// ```
pub fn feed_and_cut(lines: u8) -> Vec<u8> {
    let mut out = feed_lines(lines);
    out.extend(cut_full());
    out
}

// ============================================================================
// TESTS
// ============================================================================
