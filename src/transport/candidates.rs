//! # Printer Endpoint Candidates
//!
//! Bluetooth LE receipt printers do not agree on where their "serial port"
//! lives. Most cheap printers use a vendor UART bridge; a few expose the
//! Nordic UART service. The candidates below are probed in declared order
//! and the first writable service/characteristic pair wins.
//!
//! | Priority | Service | Seen on |
//! |----------|---------|---------|
//! | 1 | `FFE0` | HM-10 style UART bridges |
//! | 2 | `18F0` | Common 58mm printers (RPP02, MTP-II) |
//! | 3 | `6E400001-…` | Nordic UART service |
//!
//! | Priority | Characteristic | Seen on |
//! |----------|----------------|---------|
//! | 1 | `FFE1` | HM-10 TX/RX |
//! | 2 | `6E400002-…` | Nordic UART RX |
//! | 3 | `2A3D` | Generic string characteristic used by some bridges |

use uuid::Uuid;

/// Expand a 16-bit assigned number against the Bluetooth base UUID
/// (`0000xxxx-0000-1000-8000-00805F9B34FB`).
pub const fn bluetooth_uuid(short: u16) -> Uuid {
    Uuid::from_u128(((short as u128) << 96) | 0x0000_0000_0000_1000_8000_0080_5F9B_34FB)
}

/// HM-10 style UART service
pub const SERVICE_FFE0: Uuid = bluetooth_uuid(0xFFE0);

/// Printer service found on many 58mm printers
pub const SERVICE_18F0: Uuid = bluetooth_uuid(0x18F0);

/// Nordic UART service
pub const SERVICE_NORDIC_UART: Uuid = Uuid::from_u128(0x6E40_0001_B5A3_F393_E0A9_E50E_24DC_CA9E);

/// HM-10 TX/RX characteristic
pub const CHAR_FFE1: Uuid = bluetooth_uuid(0xFFE1);

/// Nordic UART RX characteristic (host writes here)
pub const CHAR_NORDIC_UART_RX: Uuid = Uuid::from_u128(0x6E40_0002_B5A3_F393_E0A9_E50E_24DC_CA9E);

/// String characteristic used by some bridges
pub const CHAR_2A3D: Uuid = bluetooth_uuid(0x2A3D);

/// Priority-ordered service and characteristic candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateTable {
    pub services: &'static [Uuid],
    pub characteristics: &'static [Uuid],
}

impl CandidateTable {
    pub const DEFAULT: Self = Self {
        services: &[SERVICE_FFE0, SERVICE_18F0, SERVICE_NORDIC_UART],
        characteristics: &[CHAR_FFE1, CHAR_NORDIC_UART_RX, CHAR_2A3D],
    };

    /// Every (service, characteristic) pair, in probe order
    pub fn pairs(&self) -> impl Iterator<Item = (Uuid, Uuid)> + '_ {
        self.services.iter().flat_map(move |&service| {
            self.characteristics
                .iter()
                .map(move |&characteristic| (service, characteristic))
        })
    }

    /// Size of the full candidate matrix
    pub fn len(&self) -> usize {
        self.services.len() * self.characteristics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CandidateTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}
