//! # Printer Transport Layer
//!
//! This module delivers ESC/POS bytes to a Bluetooth LE printer whose GATT
//! layout is not known in advance.
//!
//! ## Pipeline
//!
//! ```text
//! GattHost::request_device ─► Negotiator (probe candidates) ─► ChunkedSender ─► disconnect
//! ```
//!
//! Every step waits for the previous one. Nothing runs concurrently and
//! nothing is retried; timeouts come from the host's Bluetooth stack.
//!
//! ## Modules
//!
//! - [`host`]: traits the host Bluetooth stack implements
//! - [`candidates`]: priority-ordered service/characteristic UUIDs
//! - [`negotiator`]: endpoint discovery state machine
//! - [`sender`]: MTU-sized chunked writes
//! - [`memory`]: simulated printers
//! - `ble`: `btleplug` host (feature `ble`)

#[cfg(feature = "ble")]
pub mod ble;
pub mod candidates;
pub mod host;
pub mod memory;
pub mod negotiator;
pub mod sender;

pub use candidates::CandidateTable;
pub use host::{
    CharProperties, Characteristic, DeviceChooser, DeviceRequest, DiscoveredDevice, GattHost,
    GattPeer, HostError, NameChooser, ServiceHandle, UnavailableHost, WriteMode,
};
pub use negotiator::{NegotiatedEndpoint, NegotiationState, Negotiator};
pub use sender::{ChunkedSender, DEFAULT_CHUNK_SIZE, SendReport};

use tracing::warn;

use crate::error::StrukError;

/// Negotiate an endpoint on `host`, send `data`, then disconnect.
///
/// A failed send is returned as is; the disconnect still happens.
pub async fn deliver<H: GattHost>(
    host: &H,
    data: &[u8],
    sender: &ChunkedSender,
) -> Result<SendReport, StrukError> {
    let mut endpoint = Negotiator::default().negotiate(host).await?;
    let result = sender.send(&mut endpoint, data).await;
    if let Err(e) = endpoint.close().await {
        warn!(error = %e, "Disconnect after send");
    }
    result
}
