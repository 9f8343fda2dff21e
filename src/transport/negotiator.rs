//! # Endpoint Negotiation
//!
//! Finds a writable characteristic on a printer whose layout is not known in
//! advance.
//!
//! ## State Machine
//!
//! ```text
//! Idle ──► Requesting ──► Connected ──► Probing{service, characteristic} ──► Ready
//!   │           │              │                   │
//!   └───────────┴──────────────┴───────────────────┴──────────────────────► Failed
//! ```
//!
//! - `Idle`: no Bluetooth LE capability fails here, before any chooser is shown
//! - `Requesting`: the device chooser is open; dismissing it fails the attempt
//! - `Connected`: low-level connection established
//! - `Probing`: candidates are resolved in [`CandidateTable`] order; a missing
//!   service or characteristic is a soft failure and probing moves on
//! - `Ready`: the first writable pair wins
//! - `Failed`: terminal for this attempt, nothing is retried
//!
//! ## Example
//!
//! ```
//! use struk::transport::{CandidateTable, Negotiator, NegotiationState};
//! use struk::transport::memory::{MemoryHost, MemoryPeer};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let host = MemoryHost::with_peer(MemoryPeer::uart_printer("RPP02N"));
//! let mut negotiator = Negotiator::new(CandidateTable::DEFAULT);
//! let endpoint = negotiator.negotiate(&host).await?;
//! assert_eq!(negotiator.state(), NegotiationState::Ready);
//! # Ok::<(), struk::StrukError>(())
//! # }).unwrap();
//! ```

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::candidates::CandidateTable;
use super::host::{
    Characteristic, DeviceRequest, GattHost, GattPeer, HostError, ServiceHandle, WriteMode,
};
use crate::error::StrukError;

/// Negotiation progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    Requesting,
    Connected,
    Probing {
        service: Uuid,
        characteristic: Option<Uuid>,
    },
    Ready,
    Failed,
}

/// A peer together with the writable characteristic selected on it.
///
/// Owned by exactly one sender at a time; dropping it without
/// [`NegotiatedEndpoint::close`] leaves disconnecting to the host.
#[derive(Debug)]
pub struct NegotiatedEndpoint<P> {
    peer: P,
    service: ServiceHandle,
    characteristic: Characteristic,
}

impl<P: GattPeer> NegotiatedEndpoint<P> {
    pub fn peer(&self) -> &P {
        &self.peer
    }

    pub fn service(&self) -> Uuid {
        self.service.uuid
    }

    pub fn characteristic(&self) -> &Characteristic {
        &self.characteristic
    }

    pub fn write_mode(&self) -> WriteMode {
        self.characteristic.properties.write_mode()
    }

    /// Write one buffer to the selected characteristic.
    pub async fn write(&self, data: &[u8]) -> Result<(), HostError> {
        self.peer
            .write(&self.characteristic, data, self.write_mode())
            .await
    }

    /// Resolve the selected characteristic again and check it is still
    /// writable. Required before reusing an endpoint for a second send.
    pub async fn revalidate(&mut self) -> Result<(), StrukError> {
        let resolved = match self
            .peer
            .characteristic(&self.service, self.characteristic.uuid)
            .await
        {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "Endpoint no longer resolves");
                return Err(StrukError::NoWritableEndpoint { probed: 1 });
            }
        };
        if !resolved.properties.is_writable() {
            return Err(StrukError::NoWritableEndpoint { probed: 1 });
        }
        self.characteristic = resolved;
        Ok(())
    }

    /// Disconnect from the peer.
    pub async fn close(self) -> Result<(), StrukError> {
        self.peer
            .disconnect()
            .await
            .map_err(|e| StrukError::ConnectionFailed(format!("disconnect: {}", e)))
    }
}

/// Drives one negotiation attempt against a host.
#[derive(Debug, Clone)]
pub struct Negotiator {
    table: CandidateTable,
    state: NegotiationState,
    probed: usize,
}

impl Negotiator {
    pub fn new(table: CandidateTable) -> Self {
        Self {
            table,
            state: NegotiationState::Idle,
            probed: 0,
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Candidate pairs ruled in or out during the last attempt
    pub fn probed(&self) -> usize {
        self.probed
    }

    fn transition(&mut self, to: NegotiationState) {
        debug!(from = ?self.state, to = ?to, "Negotiation state");
        self.state = to;
    }

    fn fail(&mut self, err: StrukError) -> StrukError {
        self.transition(NegotiationState::Failed);
        err
    }

    /// Pick a peer, connect, and select its first writable candidate.
    #[instrument(skip_all)]
    pub async fn negotiate<H: GattHost>(
        &mut self,
        host: &H,
    ) -> Result<NegotiatedEndpoint<H::Peer>, StrukError> {
        self.state = NegotiationState::Idle;
        self.probed = 0;

        if !host.is_available() {
            return Err(self.fail(StrukError::UnsupportedPlatform));
        }

        self.transition(NegotiationState::Requesting);
        let request = DeviceRequest {
            accept_all: true,
            optional_services: self.table.services.to_vec(),
        };
        let peer = match host.request_device(&request).await {
            Ok(peer) => peer,
            Err(HostError::Dismissed) => return Err(self.fail(StrukError::DeviceChooserDismissed)),
            Err(HostError::Unavailable) => return Err(self.fail(StrukError::UnsupportedPlatform)),
            Err(e) => return Err(self.fail(StrukError::ConnectionFailed(e.to_string()))),
        };

        if let Err(e) = peer.connect().await {
            return Err(self.fail(StrukError::ConnectionFailed(format!(
                "{}: {}",
                peer.id(),
                e
            ))));
        }
        self.transition(NegotiationState::Connected);
        info!(peer = %peer.id(), name = ?peer.name(), "Connected to printer");

        match self.probe(&peer).await {
            Some((service, characteristic)) => {
                self.transition(NegotiationState::Ready);
                info!(
                    service = %service.uuid,
                    characteristic = %characteristic.uuid,
                    mode = ?characteristic.properties.write_mode(),
                    "Selected writable endpoint"
                );
                Ok(NegotiatedEndpoint {
                    peer,
                    service,
                    characteristic,
                })
            }
            None => {
                if let Err(e) = peer.disconnect().await {
                    warn!(error = %e, "Disconnect after failed negotiation");
                }
                let probed = self.probed;
                Err(self.fail(StrukError::NoWritableEndpoint { probed }))
            }
        }
    }

    /// Walk the candidate matrix; soft failures are logged and skipped.
    async fn probe<P: GattPeer>(&mut self, peer: &P) -> Option<(ServiceHandle, Characteristic)> {
        let table = self.table;
        for &service_uuid in table.services {
            self.transition(NegotiationState::Probing {
                service: service_uuid,
                characteristic: None,
            });
            let service = match peer.primary_service(service_uuid).await {
                Ok(service) => service,
                Err(e) => {
                    debug!(service = %service_uuid, error = %e, "Service unavailable");
                    self.probed += table.characteristics.len();
                    continue;
                }
            };

            for &char_uuid in table.characteristics {
                self.transition(NegotiationState::Probing {
                    service: service_uuid,
                    characteristic: Some(char_uuid),
                });
                self.probed += 1;
                match peer.characteristic(&service, char_uuid).await {
                    Ok(c) if c.properties.is_writable() => return Some((service, c)),
                    Ok(c) => {
                        debug!(characteristic = %char_uuid, properties = ?c.properties, "Not writable");
                    }
                    Err(e) => {
                        debug!(characteristic = %char_uuid, error = %e, "Characteristic unavailable");
                    }
                }
            }
        }
        None
    }
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::new(CandidateTable::DEFAULT)
    }
}
