//! # Error Types
//!
//! This module defines error types used throughout the struk library.
//!
//! Every variant is a terminal, user-facing condition. Per-candidate probe
//! failures during endpoint negotiation never surface here; they are
//! recovered inside the negotiator.

use thiserror::Error;

use crate::transport::HostError;

/// Main error type for struk operations
#[derive(Debug, Error)]
pub enum StrukError {
    /// The host has no Bluetooth LE capability at all
    #[error("Unsupported platform: no Bluetooth LE capability available")]
    UnsupportedPlatform,

    /// The device chooser was closed without picking a printer
    #[error("No printer selected: device chooser was dismissed")]
    DeviceChooserDismissed,

    /// The chosen peer could not be reached
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Every service/characteristic candidate was probed, none is writable
    #[error("No writable endpoint found ({probed} candidates probed)")]
    NoWritableEndpoint { probed: usize },

    /// A chunk write failed mid-send; the printer state is unknown
    #[error("Write of chunk {index} (byte offset {offset}) failed: {source}")]
    ChunkWriteFailed {
        index: usize,
        offset: usize,
        #[source]
        source: HostError,
    },

    /// The vector document cannot be drawn with the given layout
    #[error("Renderer initialization failed: {0}")]
    RendererInit(String),

    /// Invalid runtime configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Payload could not be read
    #[error("Invalid payload: {0}")]
    Payload(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StrukError {
    fn from(err: serde_json::Error) -> Self {
        StrukError::Payload(err.to_string())
    }
}
