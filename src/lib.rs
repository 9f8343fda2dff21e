//! # Struk - Shipment Receipt Printing
//!
//! Struk prints shipment receipts two ways:
//!
//! - **Vector**: a 58mm × 75mm single-page PDF for viewing, saving or the
//!   regular print dialog
//! - **Thermal**: an ESC/POS byte stream sent to a Bluetooth LE receipt
//!   printer whose GATT layout is discovered at connect time
//!
//! ## Quick Start
//!
//! ```no_run
//! use struk::{
//!     document::VectorRenderer,
//!     payload::Payload,
//!     receipt,
//!     transport::{self, ChunkedSender, memory::{MemoryHost, MemoryPeer}},
//! };
//!
//! # async fn run() -> Result<(), struk::StrukError> {
//! let payload = Payload::new()
//!     .receipt_id(1042)
//!     .vehicle_plate("AB 1234 CD")
//!     .date("2026-01-20 12:00")
//!     .operator_name("sari")
//!     .supplier_name("CV Maju")
//!     .dimensions(150, 80, 60, 5)
//!     .volume(0.72);
//!
//! // PDF
//! let pdf = VectorRenderer::default().render(&payload);
//! struk::document::persist(&pdf.bytes, "out".as_ref(), &pdf.filename)?;
//!
//! // Thermal printer
//! let data = receipt::encode_58mm(&payload);
//! let host = MemoryHost::with_peer(MemoryPeer::uart_printer("RPP02N"));
//! transport::deliver(&host, &data, &ChunkedSender::default()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`payload`] | Receipt fields |
//! | [`document`] | PDF renderer |
//! | [`receipt`] | ESC/POS encoder |
//! | [`protocol`] | ESC/POS command builders |
//! | [`transport`] | Bluetooth LE negotiation and chunked sending |
//! | [`printer`] | Paper and page configurations |
//! | [`error`] | Error types |

pub mod document;
pub mod error;
pub mod payload;
pub mod printer;
pub mod protocol;
pub mod receipt;
pub mod transport;

// Re-exports for convenience
pub use error::StrukError;
pub use payload::Payload;
pub use printer::{PageLayout, PaperProfile};
