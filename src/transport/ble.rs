//! # Bluetooth LE Host (btleplug)
//!
//! A [`GattHost`] backed by the platform Bluetooth stack through `btleplug`
//! (BlueZ on Linux, CoreBluetooth on macOS, WinRT on Windows).
//!
//! The "device chooser" is a timed scan: every peer seen during the scan
//! window is handed to a [`DeviceChooser`], which picks one or dismisses.
//!
//! ## Linux Setup
//!
//! ```bash
//! # BlueZ must be running and the adapter powered
//! $ bluetoothctl power on
//! ```
//!
//! Printers do not need to be paired first.

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{
    Central, CharPropFlags, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tracing::{debug, warn};
use uuid::Uuid;

use super::host::{
    CharProperties, Characteristic, DeviceChooser, DeviceRequest, DiscoveredDevice, GattHost,
    GattPeer, HostError, ServiceHandle, WriteMode,
};

/// Default scan window
pub const DEFAULT_SCAN_WINDOW: Duration = Duration::from_secs(5);

fn gatt(err: btleplug::Error) -> HostError {
    HostError::Gatt(err.to_string())
}

/// Host over the first Bluetooth adapter of the system
pub struct BtleplugHost {
    adapter: Option<Adapter>,
    scan_window: Duration,
    chooser: Box<dyn DeviceChooser>,
}

impl BtleplugHost {
    /// Open the first adapter. A system without one yields an unavailable
    /// host rather than an error.
    pub async fn new(scan_window: Duration, chooser: impl DeviceChooser + 'static) -> Self {
        let adapter = match Manager::new().await {
            Ok(manager) => match manager.adapters().await {
                Ok(adapters) => adapters.into_iter().next(),
                Err(e) => {
                    warn!(error = %e, "Listing Bluetooth adapters failed");
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, "Bluetooth manager unavailable");
                None
            }
        };
        Self {
            adapter,
            scan_window,
            chooser: Box::new(chooser),
        }
    }
}

#[async_trait]
impl GattHost for BtleplugHost {
    type Peer = BtleplugPeer;

    fn is_available(&self) -> bool {
        self.adapter.is_some()
    }

    async fn request_device(&self, request: &DeviceRequest) -> Result<BtleplugPeer, HostError> {
        let adapter = self.adapter.as_ref().ok_or(HostError::Unavailable)?;
        let filter = if request.accept_all {
            ScanFilter::default()
        } else {
            ScanFilter {
                services: request.optional_services.clone(),
            }
        };

        debug!(window = ?self.scan_window, "Scanning for printers");
        adapter.start_scan(filter).await.map_err(gatt)?;
        tokio::time::sleep(self.scan_window).await;
        if let Err(e) = adapter.stop_scan().await {
            warn!(error = %e, "Stopping scan failed");
        }

        let peripherals = adapter.peripherals().await.map_err(gatt)?;
        let mut devices = Vec::with_capacity(peripherals.len());
        for peripheral in &peripherals {
            let name = match peripheral.properties().await {
                Ok(Some(props)) => props.local_name,
                _ => None,
            };
            devices.push(DiscoveredDevice {
                id: peripheral.address().to_string(),
                name,
            });
        }
        debug!(found = devices.len(), "Scan finished");

        let index = self.chooser.choose(&devices).ok_or(HostError::Dismissed)?;
        let name = devices.get(index).and_then(|d| d.name.clone());
        let peripheral = peripherals
            .into_iter()
            .nth(index)
            .ok_or(HostError::Dismissed)?;
        Ok(BtleplugPeer { peripheral, name })
    }
}

/// One peripheral picked from a scan
pub struct BtleplugPeer {
    peripheral: Peripheral,
    name: Option<String>,
}

impl BtleplugPeer {
    fn find(&self, service: Uuid, uuid: Uuid) -> Option<btleplug::api::Characteristic> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == uuid && c.service_uuid == service)
    }
}

fn properties(flags: CharPropFlags) -> CharProperties {
    CharProperties {
        read: flags.contains(CharPropFlags::READ),
        write: flags.contains(CharPropFlags::WRITE),
        write_without_response: flags.contains(CharPropFlags::WRITE_WITHOUT_RESPONSE),
        notify: flags.contains(CharPropFlags::NOTIFY),
    }
}

#[async_trait]
impl GattPeer for BtleplugPeer {
    fn id(&self) -> String {
        self.peripheral.address().to_string()
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    async fn connect(&self) -> Result<(), HostError> {
        self.peripheral.connect().await.map_err(gatt)?;
        self.peripheral.discover_services().await.map_err(gatt)
    }

    async fn primary_service(&self, uuid: Uuid) -> Result<ServiceHandle, HostError> {
        self.peripheral
            .services()
            .iter()
            .find(|s| s.uuid == uuid && s.primary)
            .map(|s| ServiceHandle { uuid: s.uuid })
            .ok_or(HostError::NotFound(uuid))
    }

    async fn characteristic(
        &self,
        service: &ServiceHandle,
        uuid: Uuid,
    ) -> Result<Characteristic, HostError> {
        self.find(service.uuid, uuid)
            .map(|c| Characteristic {
                service: service.uuid,
                uuid,
                properties: properties(c.properties),
            })
            .ok_or(HostError::NotFound(uuid))
    }

    async fn write(
        &self,
        characteristic: &Characteristic,
        data: &[u8],
        mode: WriteMode,
    ) -> Result<(), HostError> {
        let target = self
            .find(characteristic.service, characteristic.uuid)
            .ok_or(HostError::NotFound(characteristic.uuid))?;
        let write_type = match mode {
            WriteMode::WithResponse => WriteType::WithResponse,
            WriteMode::WithoutResponse => WriteType::WithoutResponse,
        };
        self.peripheral
            .write(&target, data, write_type)
            .await
            .map_err(gatt)
    }

    async fn disconnect(&self) -> Result<(), HostError> {
        self.peripheral.disconnect().await.map_err(gatt)
    }
}
