//! Controller event feed.
//!
//! A controller driver translates its stack's callbacks into this closed
//! event set and feeds them to the server one at a time. Anything the
//! driver cannot map goes out as `Unknown`, which dispatch drops instead
//! of failing.

use crate::codec::{ValueBuf, ValueType};
use crate::gap::{Address, Uuid};

/// Per-event view of a characteristic, supplied by the controller from
/// the deployed attribute table. Borrowed for the duration of one
/// dispatch call, never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Characteristic<'a> {
    pub uuid: Uuid,
    /// Attribute handle, the key for value pushes.
    pub handle: u16,
    /// Application-facing name from the attribute table.
    pub name: &'a str,
    /// Declared value type; drives codec conversions.
    pub ty: ValueType,
    /// True when the characteristic pushes notifications, false for
    /// indications.
    pub notify: bool,
}

/// Events emitted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerEvent<'a> {
    /// Controller bring-up finished; the server leaves `Uninitialized`.
    Ready,
    /// A peer wrote a characteristic value.
    CharacteristicWritten {
        characteristic: Characteristic<'a>,
        value: &'a [u8],
    },
    /// A peer is reading a characteristic. The dispatch call answers
    /// synchronously with the encoded value, if the application has one.
    CharacteristicRead { characteristic: Characteristic<'a> },
    /// A peer subscribed to value pushes.
    NotifyEnabled { characteristic: Characteristic<'a> },
    /// A peer unsubscribed from value pushes.
    NotifyDisabled { characteristic: Characteristic<'a> },
    Connected { connection: u16, address: Address },
    Disconnected { connection: u16, address: Address },
    /// Both sides display a passkey; the peer at `address` awaits
    /// confirmation via `passkey_reply`.
    PasskeyConfirm { address: Address, passkey: u32 },
    /// This side displays a passkey for the peer to enter.
    PasskeyDisplay { address: Address, passkey: u32 },
    /// The peer expects this side to produce the passkey. Answered
    /// synchronously by the dispatch call.
    PasskeyRequested { address: Address },
    /// Pairing completed on some link.
    Authenticated,
    /// Unrecognized controller event, dropped by dispatch.
    Unknown,
}

/// Synchronous answer produced by dispatch for request/response events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventReply {
    /// Encoded characteristic value answering a read.
    Read(ValueBuf),
    /// Passkey answering `PasskeyRequested`.
    Passkey(u32),
    /// Outcome of the authenticated hook, handed back to the controller.
    Authenticated(bool),
}
