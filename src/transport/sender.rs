//! # Chunked Sender
//!
//! Streams a byte buffer to a negotiated endpoint in fixed-size chunks.
//!
//! A single Bluetooth LE write is limited by the negotiated ATT MTU. Many
//! printers negotiate ~185 bytes, some far less, and writes above the limit
//! are silently truncated by some stacks. Chunks default to 180 bytes.
//!
//! Chunks are written strictly in order and each write completes before the
//! next starts. There is no retry and no rollback: when a chunk fails, the
//! chunks before it have already been printed and the printer state is
//! unknown. Resending the whole job may duplicate partial output.

use tracing::{debug, info, instrument};

use super::host::GattPeer;
use super::negotiator::NegotiatedEndpoint;
use crate::error::StrukError;

/// Default chunk size in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 180;

/// Outcome of a completed send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReport {
    pub chunks: usize,
    pub bytes: usize,
}

/// Writes buffers chunk by chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkedSender {
    chunk_size: usize,
}

impl ChunkedSender {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Use a different chunk size; zero is rejected.
    pub fn with_chunk_size(chunk_size: usize) -> Result<Self, StrukError> {
        if chunk_size == 0 {
            return Err(StrukError::InvalidConfig(
                "chunk size must be at least 1 byte".to_string(),
            ));
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Sizes of the chunks `len` bytes are split into
    pub fn plan(&self, len: usize) -> Vec<usize> {
        (0..len)
            .step_by(self.chunk_size)
            .map(|offset| self.chunk_size.min(len - offset))
            .collect()
    }

    /// Send `data` over the endpoint, one chunk at a time.
    ///
    /// The endpoint is borrowed mutably for the whole send so no second send
    /// can interleave with it.
    #[instrument(skip_all, fields(bytes = data.len(), chunk_size = self.chunk_size))]
    pub async fn send<P: GattPeer>(
        &self,
        endpoint: &mut NegotiatedEndpoint<P>,
        data: &[u8],
    ) -> Result<SendReport, StrukError> {
        let mut chunks = 0;
        for (index, chunk) in data.chunks(self.chunk_size).enumerate() {
            let offset = index * self.chunk_size;
            debug!(index, offset, len = chunk.len(), "Writing chunk");
            endpoint
                .write(chunk)
                .await
                .map_err(|source| StrukError::ChunkWriteFailed {
                    index,
                    offset,
                    source,
                })?;
            chunks += 1;
        }

        info!(chunks, bytes = data.len(), "Print job sent");
        Ok(SendReport {
            chunks,
            bytes: data.len(),
        })
    }
}

impl Default for ChunkedSender {
    fn default() -> Self {
        Self::new()
    }
}
