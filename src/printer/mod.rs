//! # Printer Module
//!
//! This module provides paper and page configurations.
//!
//! ## Modules
//!
//! - [`config`]: Paper profiles and the vector page layout

pub mod config;

pub use config::{PageLayout, PaperProfile};
