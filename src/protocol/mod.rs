//! # ESC/POS Protocol Implementation
//!
//! This module provides low-level command builders for the ESC/POS protocol
//! used by thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Basic printer commands (init, feed, cut)
//! - [`text`]: Alignment and text encoding
//! - [`buffer`]: Append-only command buffer for one print job
//!
//! ## Usage Example
//!
//! ```
//! use struk::protocol::{commands, text::{self, Alignment}};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align(Alignment::Center));
//! data.extend(b"RECEIPT\n");
//! data.extend(text::align(Alignment::Left));
//! data.extend(commands::feed_and_cut(2));
//! ```

pub mod buffer;
pub mod commands;
pub mod text;
