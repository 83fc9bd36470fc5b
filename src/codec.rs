//! Characteristic value codec.
//!
//! Pure conversions between typed application values and the
//! little-endian byte layouts a GATT characteristic carries on the wire.
//! The declared [`ValueType`] comes from the application's attribute
//! table; the codec never guesses a type from the bytes.

use heapless::Vec;

use crate::error::EncodingError;
use crate::gap::ATT_MAX_VALUE_LEN;

/// Encoded characteristic value.
pub type ValueBuf = Vec<u8, ATT_MAX_VALUE_LEN>;

/// Declared data type of a characteristic value.
///
/// Integer widths are in bytes; only 1, 2 and 4 are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueType {
    /// Unsigned little-endian integer of the given byte width.
    Uint(u8),
    /// Signed two's-complement little-endian integer of the given byte width.
    Int(u8),
    /// Single byte, zero or one.
    Bool,
    /// UTF-8 text without a terminator.
    String,
    /// Opaque bytes, passed through untouched.
    Bytes,
}

/// A typed value, borrowing any string or buffer payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value<'a> {
    Uint(u32),
    Int(i32),
    Bool(bool),
    String(&'a str),
    Bytes(&'a [u8]),
}

const fn width_supported(width: u8) -> bool {
    matches!(width, 1 | 2 | 4)
}

fn push_bytes(out: &mut ValueBuf, bytes: &[u8]) -> Result<(), EncodingError> {
    out.extend_from_slice(bytes)
        .map_err(|_| EncodingError::ValueOutOfRange)
}

/// Encodes `value` into the layout declared by `ty`.
///
/// The value variant must match the declared type; a mismatch reports
/// `UnsupportedType` rather than coercing.
pub fn encode(ty: ValueType, value: Value<'_>) -> Result<ValueBuf, EncodingError> {
    let mut out = ValueBuf::new();
    match (ty, value) {
        (ValueType::Uint(width), Value::Uint(v)) => {
            if !width_supported(width) {
                return Err(EncodingError::UnsupportedType);
            }
            if width < 4 && v >= 1u32 << (8 * width as u32) {
                return Err(EncodingError::ValueOutOfRange);
            }
            push_bytes(&mut out, &v.to_le_bytes()[..width as usize])?;
        }
        (ValueType::Int(width), Value::Int(v)) => {
            if !width_supported(width) {
                return Err(EncodingError::UnsupportedType);
            }
            if width < 4 {
                let bits = 8 * width as u32;
                let min = -(1i64 << (bits - 1));
                let max = (1i64 << (bits - 1)) - 1;
                if (v as i64) < min || (v as i64) > max {
                    return Err(EncodingError::ValueOutOfRange);
                }
            }
            push_bytes(&mut out, &v.to_le_bytes()[..width as usize])?;
        }
        (ValueType::Bool, Value::Bool(v)) => {
            push_bytes(&mut out, &[v as u8])?;
        }
        (ValueType::String, Value::String(s)) => {
            push_bytes(&mut out, s.as_bytes())?;
        }
        (ValueType::Bytes, Value::Bytes(b)) => {
            push_bytes(&mut out, b)?;
        }
        _ => return Err(EncodingError::UnsupportedType),
    }
    Ok(out)
}

/// Decodes `data` as a value of the declared type.
///
/// Integers and booleans read their declared width from the front of the
/// buffer; trailing bytes are ignored. Strings and buffers take the whole
/// buffer.
pub fn decode(ty: ValueType, data: &[u8]) -> Result<Value<'_>, EncodingError> {
    match ty {
        ValueType::Uint(width) => {
            if !width_supported(width) {
                return Err(EncodingError::UnsupportedType);
            }
            Ok(Value::Uint(read_le(data, width)?))
        }
        ValueType::Int(width) => {
            if !width_supported(width) {
                return Err(EncodingError::UnsupportedType);
            }
            let raw = read_le(data, width)?;
            Ok(Value::Int(sign_extend(raw, width)))
        }
        ValueType::Bool => {
            let byte = data.first().ok_or(EncodingError::TruncatedBuffer)?;
            Ok(Value::Bool(*byte != 0))
        }
        ValueType::String => {
            let s = core::str::from_utf8(data).map_err(|_| EncodingError::InvalidUtf8)?;
            Ok(Value::String(s))
        }
        ValueType::Bytes => Ok(Value::Bytes(data)),
    }
}

fn read_le(data: &[u8], width: u8) -> Result<u32, EncodingError> {
    let width = width as usize;
    if data.len() < width {
        return Err(EncodingError::TruncatedBuffer);
    }
    let mut value = 0u32;
    for (i, byte) in data[..width].iter().enumerate() {
        value |= (*byte as u32) << (8 * i);
    }
    Ok(value)
}

fn sign_extend(raw: u32, width: u8) -> i32 {
    match width {
        1 => raw as u8 as i8 as i32,
        2 => raw as u16 as i16 as i32,
        _ => raw as i32,
    }
}
