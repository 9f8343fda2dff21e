//! # Host Bluetooth LE Boundary
//!
//! The printer core does not talk to a Bluetooth stack directly. It drives
//! two host-provided capabilities:
//!
//! - [`GattHost`]: "pick a nearby device" (the device chooser)
//! - [`GattPeer`]: connect, resolve services and characteristics, write
//!
//! Implementations: [`super::memory::MemoryHost`] (in-process simulated
//! printers), [`UnavailableHost`] (no Bluetooth at all) and, with the `ble`
//! feature, `super::ble::BtleplugHost`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Errors reported by a host collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host has no usable Bluetooth LE adapter
    #[error("Bluetooth LE unavailable")]
    Unavailable,

    /// The user closed the device chooser
    #[error("device chooser dismissed")]
    Dismissed,

    /// The peer does not expose the requested service or characteristic
    #[error("not found: {0}")]
    NotFound(Uuid),

    /// Any other stack-level failure
    #[error("GATT error: {0}")]
    Gatt(String),
}

/// What the device chooser is asked to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRequest {
    /// Offer every nearby peer, no filter
    pub accept_all: bool,

    /// Services the caller intends to use after connecting
    pub optional_services: Vec<Uuid>,
}

/// A peer found while scanning, as shown to a [`DeviceChooser`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    pub id: String,
    pub name: Option<String>,
}

impl DiscoveredDevice {
    /// Name for display, falling back to the id
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Picks one device from a scan result; `None` dismisses the chooser.
pub trait DeviceChooser: Send + Sync {
    fn choose(&self, devices: &[DiscoveredDevice]) -> Option<usize>;
}

/// Chooses the first device whose name contains a pattern (case-insensitive),
/// or the first device at all when the pattern is empty.
#[derive(Debug, Clone, Default)]
pub struct NameChooser {
    pattern: String,
}

impl NameChooser {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
        }
    }
}

impl DeviceChooser for NameChooser {
    fn choose(&self, devices: &[DiscoveredDevice]) -> Option<usize> {
        devices.iter().position(|d| {
            self.pattern.is_empty() || d.label().to_lowercase().contains(&self.pattern)
        })
    }
}

/// Resolved primary service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceHandle {
    pub uuid: Uuid,
}

/// Characteristic property flags relevant to printing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharProperties {
    pub read: bool,
    pub write: bool,
    pub write_without_response: bool,
    pub notify: bool,
}

impl CharProperties {
    /// Writable with or without acknowledgment
    pub fn is_writable(&self) -> bool {
        self.write || self.write_without_response
    }

    /// Preferred write mode; acknowledged writes when supported.
    pub fn write_mode(&self) -> WriteMode {
        if self.write {
            WriteMode::WithResponse
        } else {
            WriteMode::WithoutResponse
        }
    }
}

/// Resolved characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Characteristic {
    pub service: Uuid,
    pub uuid: Uuid,
    pub properties: CharProperties,
}

/// GATT write type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    WithResponse,
    WithoutResponse,
}

/// Host capability: find a nearby peer.
#[async_trait]
pub trait GattHost: Send + Sync {
    type Peer: GattPeer;

    /// Whether the host has any Bluetooth LE capability.
    fn is_available(&self) -> bool;

    /// Present the device chooser and return the picked peer.
    async fn request_device(&self, request: &DeviceRequest) -> Result<Self::Peer, HostError>;
}

/// Host capability: talk to one peer.
#[async_trait]
pub trait GattPeer: Send + Sync {
    /// Stable identifier (address or platform id)
    fn id(&self) -> String;

    /// Advertised name, if any
    fn name(&self) -> Option<String>;

    async fn connect(&self) -> Result<(), HostError>;

    async fn primary_service(&self, uuid: Uuid) -> Result<ServiceHandle, HostError>;

    async fn characteristic(
        &self,
        service: &ServiceHandle,
        uuid: Uuid,
    ) -> Result<Characteristic, HostError>;

    async fn write(
        &self,
        characteristic: &Characteristic,
        data: &[u8],
        mode: WriteMode,
    ) -> Result<(), HostError>;

    async fn disconnect(&self) -> Result<(), HostError>;
}

/// A host without any Bluetooth LE capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableHost;

/// Peer type of [`UnavailableHost`]; no value of it ever exists.
#[derive(Debug, Clone, Copy)]
pub enum NoPeer {}

#[async_trait]
impl GattHost for UnavailableHost {
    type Peer = NoPeer;

    fn is_available(&self) -> bool {
        false
    }

    async fn request_device(&self, _request: &DeviceRequest) -> Result<NoPeer, HostError> {
        Err(HostError::Unavailable)
    }
}

#[async_trait]
impl GattPeer for NoPeer {
    fn id(&self) -> String {
        match *self {}
    }

    fn name(&self) -> Option<String> {
        match *self {}
    }

    async fn connect(&self) -> Result<(), HostError> {
        match *self {}
    }

    async fn primary_service(&self, _uuid: Uuid) -> Result<ServiceHandle, HostError> {
        match *self {}
    }

    async fn characteristic(
        &self,
        _service: &ServiceHandle,
        _uuid: Uuid,
    ) -> Result<Characteristic, HostError> {
        match *self {}
    }

    async fn write(
        &self,
        _characteristic: &Characteristic,
        _data: &[u8],
        _mode: WriteMode,
    ) -> Result<(), HostError> {
        match *self {}
    }

    async fn disconnect(&self) -> Result<(), HostError> {
        match *self {}
    }
}
