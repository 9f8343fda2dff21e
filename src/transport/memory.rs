//! # In-Memory GATT Host
//!
//! Simulated printers for tests and `--dry-run`. A [`MemoryPeer`] declares
//! which services and characteristics it exposes and journals every probe
//! and write made against it, so callers can check exactly what a real
//! printer would have received.
//!
//! ```
//! use struk::transport::memory::{MemoryHost, MemoryPeer};
//!
//! let peer = MemoryPeer::uart_printer("RPP02N");
//! let journal = peer.journal();
//! let host = MemoryHost::with_peer(peer);
//! // ... negotiate and send ...
//! assert!(journal.lock().unwrap().writes.is_empty());
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use super::candidates::{CHAR_FFE1, CHAR_NORDIC_UART_RX, SERVICE_FFE0, SERVICE_NORDIC_UART};
use super::host::{
    CharProperties, Characteristic, DeviceChooser, DeviceRequest, DiscoveredDevice, GattHost,
    GattPeer, HostError, NameChooser, ServiceHandle, WriteMode,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything that happened to one simulated peer
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Journal {
    pub connects: usize,
    pub disconnects: usize,
    pub service_probes: Vec<Uuid>,
    pub characteristic_probes: Vec<(Uuid, Uuid)>,
    pub write_attempts: usize,
    pub writes: Vec<(Vec<u8>, WriteMode)>,
}

impl Journal {
    /// All successfully written bytes, concatenated
    pub fn received(&self) -> Vec<u8> {
        self.writes.iter().flat_map(|(data, _)| data.iter().copied()).collect()
    }
}

#[derive(Debug, Default)]
struct PeerState {
    services: Vec<(Uuid, Vec<(Uuid, CharProperties)>)>,
    connected: bool,
    fail_connect: bool,
    fail_write_at: Option<usize>,
}

/// A simulated Bluetooth LE peer
#[derive(Debug, Clone)]
pub struct MemoryPeer {
    id: String,
    name: Option<String>,
    state: Arc<Mutex<PeerState>>,
    journal: Arc<Mutex<Journal>>,
}

impl MemoryPeer {
    /// A peer with no services
    pub fn new(name: &str) -> Self {
        Self {
            id: format!("mem:{}", name),
            name: Some(name.to_string()),
            state: Arc::default(),
            journal: Arc::default(),
        }
    }

    /// A typical 58mm printer: `FFE0`/`FFE1` UART bridge
    pub fn uart_printer(name: &str) -> Self {
        Self::new(name).service(
            SERVICE_FFE0,
            &[(
                CHAR_FFE1,
                CharProperties {
                    read: false,
                    write: true,
                    write_without_response: true,
                    notify: true,
                },
            )],
        )
    }

    /// A printer exposing only the Nordic UART service
    pub fn nordic_printer(name: &str) -> Self {
        Self::new(name).service(
            SERVICE_NORDIC_UART,
            &[(
                CHAR_NORDIC_UART_RX,
                CharProperties {
                    write_without_response: true,
                    ..Default::default()
                },
            )],
        )
    }

    /// Expose a primary service with the given characteristics.
    pub fn service(self, uuid: Uuid, characteristics: &[(Uuid, CharProperties)]) -> Self {
        lock(&self.state)
            .services
            .push((uuid, characteristics.to_vec()));
        self
    }

    /// Refuse the connection.
    pub fn fail_connect(self) -> Self {
        lock(&self.state).fail_connect = true;
        self
    }

    /// Reject the write with this zero-based index.
    pub fn fail_write_at(self, index: usize) -> Self {
        lock(&self.state).fail_write_at = Some(index);
        self
    }

    /// Change a characteristic's properties after the fact.
    pub fn set_properties(&self, service: Uuid, characteristic: Uuid, properties: CharProperties) {
        let mut state = lock(&self.state);
        for (s, chars) in state.services.iter_mut() {
            if *s == service {
                for (c, props) in chars.iter_mut() {
                    if *c == characteristic {
                        *props = properties;
                    }
                }
            }
        }
    }

    /// Shared handle to the journal; stays valid after the peer is moved.
    pub fn journal(&self) -> Arc<Mutex<Journal>> {
        Arc::clone(&self.journal)
    }

    fn lookup(&self, service: Uuid, characteristic: Uuid) -> Option<CharProperties> {
        let state = lock(&self.state);
        state
            .services
            .iter()
            .find(|(s, _)| *s == service)
            .and_then(|(_, chars)| chars.iter().find(|(c, _)| *c == characteristic))
            .map(|(_, props)| *props)
    }

    fn require_connected(&self) -> Result<(), HostError> {
        if lock(&self.state).connected {
            Ok(())
        } else {
            Err(HostError::Gatt("not connected".to_string()))
        }
    }
}

#[async_trait]
impl GattPeer for MemoryPeer {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    async fn connect(&self) -> Result<(), HostError> {
        lock(&self.journal).connects += 1;
        let mut state = lock(&self.state);
        if state.fail_connect {
            return Err(HostError::Gatt("connection refused".to_string()));
        }
        state.connected = true;
        Ok(())
    }

    async fn primary_service(&self, uuid: Uuid) -> Result<ServiceHandle, HostError> {
        self.require_connected()?;
        lock(&self.journal).service_probes.push(uuid);
        let state = lock(&self.state);
        if state.services.iter().any(|(s, _)| *s == uuid) {
            Ok(ServiceHandle { uuid })
        } else {
            Err(HostError::NotFound(uuid))
        }
    }

    async fn characteristic(
        &self,
        service: &ServiceHandle,
        uuid: Uuid,
    ) -> Result<Characteristic, HostError> {
        self.require_connected()?;
        lock(&self.journal)
            .characteristic_probes
            .push((service.uuid, uuid));
        self.lookup(service.uuid, uuid)
            .map(|properties| Characteristic {
                service: service.uuid,
                uuid,
                properties,
            })
            .ok_or(HostError::NotFound(uuid))
    }

    async fn write(
        &self,
        characteristic: &Characteristic,
        data: &[u8],
        mode: WriteMode,
    ) -> Result<(), HostError> {
        self.require_connected()?;
        let index = {
            let mut journal = lock(&self.journal);
            journal.write_attempts += 1;
            journal.write_attempts - 1
        };
        if lock(&self.state).fail_write_at == Some(index) {
            return Err(HostError::Gatt(format!("write {} rejected", index)));
        }
        let writable = self
            .lookup(characteristic.service, characteristic.uuid)
            .is_some_and(|p| p.is_writable());
        if !writable {
            return Err(HostError::Gatt("characteristic not writable".to_string()));
        }
        lock(&self.journal).writes.push((data.to_vec(), mode));
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), HostError> {
        lock(&self.journal).disconnects += 1;
        lock(&self.state).connected = false;
        Ok(())
    }
}

/// A host whose "nearby devices" are a fixed list of simulated peers
pub struct MemoryHost {
    available: bool,
    peers: Vec<MemoryPeer>,
    chooser: Box<dyn DeviceChooser>,
    requests: Mutex<Vec<DeviceRequest>>,
}

impl MemoryHost {
    pub fn with_peers(peers: Vec<MemoryPeer>) -> Self {
        Self {
            available: true,
            peers,
            chooser: Box::new(NameChooser::default()),
            requests: Mutex::default(),
        }
    }

    pub fn with_peer(peer: MemoryPeer) -> Self {
        Self::with_peers(vec![peer])
    }

    /// A host with Bluetooth but nothing in range; the chooser is dismissed.
    pub fn empty() -> Self {
        Self::with_peers(Vec::new())
    }

    /// Replace the default chooser (first device).
    pub fn chooser(mut self, chooser: impl DeviceChooser + 'static) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    /// Device requests received so far
    pub fn requests(&self) -> Vec<DeviceRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl GattHost for MemoryHost {
    type Peer = MemoryPeer;

    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_device(&self, request: &DeviceRequest) -> Result<MemoryPeer, HostError> {
        lock(&self.requests).push(request.clone());
        let devices: Vec<DiscoveredDevice> = self
            .peers
            .iter()
            .map(|p| DiscoveredDevice {
                id: p.id(),
                name: p.name(),
            })
            .collect();
        self.chooser
            .choose(&devices)
            .and_then(|i| self.peers.get(i).cloned())
            .ok_or(HostError::Dismissed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_before_connect_fails() {
        let peer = MemoryPeer::uart_printer("p");
        assert!(peer.primary_service(SERVICE_FFE0).await.is_err());
    }

    #[tokio::test]
    async fn test_journal_records_probes_and_writes() {
        let peer = MemoryPeer::uart_printer("p");
        peer.connect().await.unwrap();
        let service = peer.primary_service(SERVICE_FFE0).await.unwrap();
        let ch = peer.characteristic(&service, CHAR_FFE1).await.unwrap();
        peer.write(&ch, b"abc", WriteMode::WithResponse).await.unwrap();

        let journal = peer.journal();
        let journal = journal.lock().unwrap();
        assert_eq!(journal.connects, 1);
        assert_eq!(journal.service_probes, vec![SERVICE_FFE0]);
        assert_eq!(journal.characteristic_probes, vec![(SERVICE_FFE0, CHAR_FFE1)]);
        assert_eq!(journal.received(), b"abc".to_vec());
    }

    #[tokio::test]
    async fn test_missing_service() {
        let peer = MemoryPeer::nordic_printer("p");
        peer.connect().await.unwrap();
        assert_eq!(
            peer.primary_service(SERVICE_FFE0).await,
            Err(HostError::NotFound(SERVICE_FFE0))
        );
    }

    #[tokio::test]
    async fn test_host_chooser_picks_by_name() {
        let host = MemoryHost::with_peers(vec![
            MemoryPeer::new("Speaker"),
            MemoryPeer::uart_printer("Printer"),
        ])
        .chooser(NameChooser::new("print"));
        let request = DeviceRequest {
            accept_all: true,
            optional_services: vec![],
        };
        let peer = host.request_device(&request).await.unwrap();
        assert_eq!(peer.name().as_deref(), Some("Printer"));
    }
}
