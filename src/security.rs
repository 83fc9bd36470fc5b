//! Pairing security configuration.

use crate::error::ValidationError;

/// Input/output ability of the device, used by the Security Manager to
/// pick a pairing method. `raw` yields the SMP wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoCapability {
    DisplayOnly,
    DisplayYesNo,
    KeyboardOnly,
    #[default]
    NoInputNoOutput,
    KeyboardDisplay,
}

impl IoCapability {
    pub const fn raw(self) -> u8 {
        match self {
            IoCapability::DisplayOnly => 0x00,
            IoCapability::DisplayYesNo => 0x01,
            IoCapability::KeyboardOnly => 0x02,
            IoCapability::NoInputNoOutput => 0x03,
            IoCapability::KeyboardDisplay => 0x04,
        }
    }
}

impl TryFrom<u8> for IoCapability {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(IoCapability::DisplayOnly),
            0x01 => Ok(IoCapability::DisplayYesNo),
            0x02 => Ok(IoCapability::KeyboardOnly),
            0x03 => Ok(IoCapability::NoInputNoOutput),
            0x04 => Ok(IoCapability::KeyboardDisplay),
            _ => Err(ValidationError::InvalidCapability),
        }
    }
}

/// Application security request. Omitted fields take the defaults from
/// `SecurityParameters::default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SecurityOptions {
    pub encryption: Option<bool>,
    pub bonding: Option<bool>,
    pub mitm: Option<bool>,
    pub io_capability: Option<IoCapability>,
}

/// Normalized parameter set forwarded to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SecurityParameters {
    pub encryption: bool,
    pub bonding: bool,
    pub mitm: bool,
    pub io_capability: IoCapability,
}

impl Default for SecurityParameters {
    fn default() -> Self {
        Self {
            encryption: true,
            bonding: false,
            mitm: false,
            io_capability: IoCapability::NoInputNoOutput,
        }
    }
}

impl SecurityParameters {
    /// Fills any omitted option with its default.
    pub fn normalize(options: &SecurityOptions) -> Self {
        let defaults = Self::default();
        Self {
            encryption: options.encryption.unwrap_or(defaults.encryption),
            bonding: options.bonding.unwrap_or(defaults.bonding),
            mitm: options.mitm.unwrap_or(defaults.mitm),
            io_capability: options.io_capability.unwrap_or(defaults.io_capability),
        }
    }
}
