//! GAP constants and identity types.
//!
//! Interval values are in 0.625 ms units, the resolution the controller
//! consumes. The three interval windows are the recommended timing classes
//! for user-initiated, reduced-duty and background advertising.

use core::fmt;

use bitflags::bitflags;

/// Maximum payload of a legacy advertising PDU.
pub const MAX_AD_DATA_LEN: usize = 31;

/// Maximum stored device name length in bytes.
pub const MAX_DEVICE_NAME_LEN: usize = 32;

/// ATT MTU before any exchange has run.
pub const ATT_DEFAULT_MTU: u16 = 23;

/// Longest characteristic value ATT can carry.
pub const ATT_MAX_VALUE_LEN: usize = 512;

// AD type codes understood by the advertisement serializer.
pub const AD_TYPE_FLAGS: u8 = 0x01;
pub const AD_TYPE_INCOMPLETE_UUID16_LIST: u8 = 0x02;
pub const AD_TYPE_COMPLETE_UUID16_LIST: u8 = 0x03;
pub const AD_TYPE_INCOMPLETE_UUID128_LIST: u8 = 0x06;
pub const AD_TYPE_COMPLETE_UUID128_LIST: u8 = 0x07;
pub const AD_TYPE_SHORTENED_LOCAL_NAME: u8 = 0x08;
pub const AD_TYPE_COMPLETE_LOCAL_NAME: u8 = 0x09;
pub const AD_TYPE_TX_POWER_LEVEL: u8 = 0x0A;
pub const AD_TYPE_SERVICE_DATA_UUID16: u8 = 0x16;
pub const AD_TYPE_APPEARANCE: u8 = 0x19;
pub const AD_TYPE_MANUFACTURER_SPECIFIC: u8 = 0xFF;

bitflags! {
    /// Content of the flags record (AD type 0x01).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AdFlags: u8 {
        const LE_LIMITED_DISCOVERABLE = 0x01;
        const LE_GENERAL_DISCOVERABLE = 0x02;
        const NO_BR_EDR = 0x04;
        const LE_BR_EDR_CONTROLLER = 0x08;
        const LE_BR_EDR_HOST = 0x10;
    }
}

/// Advertising interval window in 0.625 ms units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvertisingInterval {
    pub min: u16,
    pub max: u16,
}

impl AdvertisingInterval {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Window lower bound in milliseconds, rounded down.
    pub const fn min_millis(&self) -> u32 {
        self.min as u32 * 5 / 8
    }

    /// Window upper bound in milliseconds, rounded down.
    pub const fn max_millis(&self) -> u32 {
        self.max as u32 * 5 / 8
    }
}

/// Undirected connectable, user-initiated: 20 ms to 30 ms.
pub const ADV_FAST_INTERVAL1: AdvertisingInterval = AdvertisingInterval::new(32, 48);
/// Reduced duty cycle: 100 ms to 150 ms.
pub const ADV_FAST_INTERVAL2: AdvertisingInterval = AdvertisingInterval::new(160, 240);
/// Background advertising: 1 s to 2.5 s.
pub const ADV_SLOW_INTERVAL: AdvertisingInterval = AdvertisingInterval::new(1600, 4000);

/// 48-bit device address, stored least significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(pub [u8; 6]);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a[5], a[4], a[3], a[2], a[1], a[0]
        )
    }
}

/// Bluetooth Base UUID, little endian. 16-bit assigned numbers expand
/// into bytes 12 and 13.
const BASE_UUID: [u8; 16] = [
    0xFB, 0x34, 0x9B, 0x5F, 0x80, 0x00, 0x00, 0x80, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// 128-bit UUID in little-endian byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Uuid(pub [u8; 16]);

impl Uuid {
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Expands a 16-bit assigned number onto the Bluetooth Base UUID.
    pub const fn from_u16(short: u16) -> Self {
        let mut bytes = BASE_UUID;
        bytes[12] = (short & 0xFF) as u8;
        bytes[13] = (short >> 8) as u8;
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}
