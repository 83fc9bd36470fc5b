//! Advertising policy and payload serialization.
//!
//! Turns the application's "advertise, connectable, fast" intent into the
//! GAP interval window and flags byte, and serializes structured
//! advertisement records into the TLV payload the controller transmits.

use heapless::Vec;

use crate::error::ValidationError;
use crate::gap::{
    AdFlags, AdvertisingInterval, ADV_FAST_INTERVAL1, ADV_FAST_INTERVAL2, ADV_SLOW_INTERVAL,
    AD_TYPE_APPEARANCE, AD_TYPE_COMPLETE_LOCAL_NAME, AD_TYPE_COMPLETE_UUID128_LIST,
    AD_TYPE_COMPLETE_UUID16_LIST, AD_TYPE_FLAGS, AD_TYPE_INCOMPLETE_UUID128_LIST,
    AD_TYPE_INCOMPLETE_UUID16_LIST, AD_TYPE_MANUFACTURER_SPECIFIC, AD_TYPE_SERVICE_DATA_UUID16,
    AD_TYPE_SHORTENED_LOCAL_NAME, AD_TYPE_TX_POWER_LEVEL, MAX_AD_DATA_LEN,
};

/// Serialized advertisement payload.
pub type AdvPayload = Vec<u8, MAX_AD_DATA_LEN>;

/// Selects the interval window for the requested modes.
///
/// The fast user-initiated window is reserved for connectable discoverable
/// advertising; non-connectable advertising never goes below the reduced
/// duty cycle.
pub const fn compute_advertising_window(
    fast: bool,
    connectable: bool,
    discoverable: bool,
) -> AdvertisingInterval {
    if connectable {
        if fast {
            if discoverable {
                ADV_FAST_INTERVAL1
            } else {
                ADV_FAST_INTERVAL2
            }
        } else {
            ADV_SLOW_INTERVAL
        }
    } else if fast {
        ADV_FAST_INTERVAL2
    } else {
        ADV_SLOW_INTERVAL
    }
}

/// Flags byte for the requested discoverability. BR/EDR is never offered.
pub const fn build_flags(discoverable: bool) -> AdFlags {
    if discoverable {
        AdFlags::NO_BR_EDR.union(AdFlags::LE_GENERAL_DISCOVERABLE)
    } else {
        AdFlags::NO_BR_EDR
    }
}

/// One structured advertisement field; serialized as a length, type, data
/// entry. Multi-byte values are little endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdRecord<'a> {
    Flags(AdFlags),
    IncompleteUuid16List(&'a [u16]),
    CompleteUuid16List(&'a [u16]),
    IncompleteUuid128List(&'a [[u8; 16]]),
    CompleteUuid128List(&'a [[u8; 16]]),
    ShortName(&'a str),
    CompleteName(&'a str),
    TxPowerLevel(i8),
    Appearance(u16),
    ServiceData16 { uuid: u16, data: &'a [u8] },
    ManufacturerSpecific { company: u16, data: &'a [u8] },
}

fn push_header(out: &mut AdvPayload, payload_len: usize, ad_type: u8) -> Result<(), ValidationError> {
    if out.len() + payload_len + 2 > MAX_AD_DATA_LEN {
        return Err(ValidationError::RecordTooLarge);
    }
    out.push((payload_len + 1) as u8)
        .map_err(|_| ValidationError::RecordTooLarge)?;
    out.push(ad_type).map_err(|_| ValidationError::RecordTooLarge)?;
    Ok(())
}

fn push_data(out: &mut AdvPayload, data: &[u8]) -> Result<(), ValidationError> {
    out.extend_from_slice(data)
        .map_err(|_| ValidationError::RecordTooLarge)
}

fn push_uuid16_list(out: &mut AdvPayload, ad_type: u8, uuids: &[u16]) -> Result<(), ValidationError> {
    push_header(out, uuids.len() * 2, ad_type)?;
    for uuid in uuids {
        push_data(out, &uuid.to_le_bytes())?;
    }
    Ok(())
}

fn push_uuid128_list(
    out: &mut AdvPayload,
    ad_type: u8,
    uuids: &[[u8; 16]],
) -> Result<(), ValidationError> {
    push_header(out, uuids.len() * 16, ad_type)?;
    for uuid in uuids {
        push_data(out, uuid)?;
    }
    Ok(())
}

fn push_record(out: &mut AdvPayload, record: &AdRecord<'_>) -> Result<(), ValidationError> {
    match *record {
        AdRecord::Flags(flags) => {
            push_header(out, 1, AD_TYPE_FLAGS)?;
            push_data(out, &[flags.bits()])
        }
        AdRecord::IncompleteUuid16List(uuids) => {
            push_uuid16_list(out, AD_TYPE_INCOMPLETE_UUID16_LIST, uuids)
        }
        AdRecord::CompleteUuid16List(uuids) => {
            push_uuid16_list(out, AD_TYPE_COMPLETE_UUID16_LIST, uuids)
        }
        AdRecord::IncompleteUuid128List(uuids) => {
            push_uuid128_list(out, AD_TYPE_INCOMPLETE_UUID128_LIST, uuids)
        }
        AdRecord::CompleteUuid128List(uuids) => {
            push_uuid128_list(out, AD_TYPE_COMPLETE_UUID128_LIST, uuids)
        }
        AdRecord::ShortName(name) => {
            push_header(out, name.len(), AD_TYPE_SHORTENED_LOCAL_NAME)?;
            push_data(out, name.as_bytes())
        }
        AdRecord::CompleteName(name) => {
            push_header(out, name.len(), AD_TYPE_COMPLETE_LOCAL_NAME)?;
            push_data(out, name.as_bytes())
        }
        AdRecord::TxPowerLevel(level) => {
            push_header(out, 1, AD_TYPE_TX_POWER_LEVEL)?;
            push_data(out, &[level as u8])
        }
        AdRecord::Appearance(appearance) => {
            push_header(out, 2, AD_TYPE_APPEARANCE)?;
            push_data(out, &appearance.to_le_bytes())
        }
        AdRecord::ServiceData16 { uuid, data } => {
            push_header(out, 2 + data.len(), AD_TYPE_SERVICE_DATA_UUID16)?;
            push_data(out, &uuid.to_le_bytes())?;
            push_data(out, data)
        }
        AdRecord::ManufacturerSpecific { company, data } => {
            push_header(out, 2 + data.len(), AD_TYPE_MANUFACTURER_SPECIFIC)?;
            push_data(out, &company.to_le_bytes())?;
            push_data(out, data)
        }
    }
}

/// Serializes advertisement records into their wire TLV form.
pub fn serialize(records: &[AdRecord<'_>]) -> Result<AdvPayload, ValidationError> {
    let mut out = AdvPayload::new();
    for record in records {
        push_record(&mut out, record)?;
    }
    Ok(out)
}

/// Serializes with the given flags record first. Any flags record in
/// `records` is dropped in favor of the computed one.
pub fn serialize_with_flags(
    flags: AdFlags,
    records: &[AdRecord<'_>],
) -> Result<AdvPayload, ValidationError> {
    let mut out = AdvPayload::new();
    push_record(&mut out, &AdRecord::Flags(flags))?;
    for record in records {
        if matches!(record, AdRecord::Flags(_)) {
            continue;
        }
        push_record(&mut out, record)?;
    }
    Ok(out)
}

/// Application advertising request.
#[derive(Debug, Clone, Copy)]
pub struct AdvertisingOptions<'a> {
    /// Use the fast (user-initiated) timing class.
    pub fast: bool,
    /// Accept connections while advertising.
    pub connectable: bool,
    /// LE general discoverable mode.
    pub discoverable: bool,
    /// Advertisement fields. The flags record is computed and injected.
    pub data: &'a [AdRecord<'a>],
    /// Optional scan response fields, serialized as given.
    pub scan_response: Option<&'a [AdRecord<'a>]>,
}

impl Default for AdvertisingOptions<'_> {
    fn default() -> Self {
        Self {
            fast: true,
            connectable: true,
            discoverable: true,
            data: &[],
            scan_response: None,
        }
    }
}

/// Resolved parameters handed to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisingParameters {
    pub interval: AdvertisingInterval,
    pub connectable: bool,
    pub adv_data: AdvPayload,
    pub scan_rsp_data: Option<AdvPayload>,
}

impl AdvertisingOptions<'_> {
    /// Resolves the request: interval from the timing table, computed
    /// flags injected ahead of the caller's records, everything
    /// serialized to wire form.
    pub fn resolve(&self) -> Result<AdvertisingParameters, ValidationError> {
        let interval = compute_advertising_window(self.fast, self.connectable, self.discoverable);
        let flags = build_flags(self.discoverable);
        let adv_data = serialize_with_flags(flags, self.data)?;
        let scan_rsp_data = match self.scan_response {
            Some(records) => Some(serialize(records)?),
            None => None,
        };
        Ok(AdvertisingParameters {
            interval,
            connectable: self.connectable,
            adv_data,
            scan_rsp_data,
        })
    }
}
