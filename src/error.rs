//! Error types.
//!
//! Four families with distinct blame: `ValidationError` and
//! `EncodingError` report bad application input, `StateError` reports an
//! operation issued in the wrong lifecycle state, and `ControllerError`
//! passes through failures from the controller driver. All of them fold
//! into `Error` at the public API surface.

/// Parameter validation failure, caught before the controller is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// I/O capability code outside the recognized pairing set.
    InvalidCapability,
    /// Serialized advertisement would exceed the legacy 31-byte payload.
    RecordTooLarge,
}

/// Characteristic value codec failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodingError {
    /// Declared type or integer width is not part of the codec's set.
    UnsupportedType,
    /// Value does not fit the declared integer width.
    ValueOutOfRange,
    /// Wire buffer is shorter than the declared width.
    TruncatedBuffer,
    /// String characteristic carried bytes that are not valid UTF-8.
    InvalidUtf8,
}

/// Operation rejected in the current lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateError {
    /// The controller has not signaled readiness yet.
    NotReady,
    /// No active connection to carry the operation.
    NotConnected,
    /// The connection table is at capacity.
    ConnectionTableFull,
}

/// Failure surfaced by the controller driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// No link (or no subscription) to carry the command.
    NotConnected,
    /// A conflicting controller operation is in flight.
    Busy,
    /// The controller does not implement the command.
    Unsupported,
    /// Stack-specific error code, passed through opaquely.
    Failure(u16),
}

/// Any failure the peripheral layer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Validation(ValidationError),
    Encoding(EncodingError),
    State(StateError),
    Controller(ControllerError),
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}

impl From<EncodingError> for Error {
    fn from(err: EncodingError) -> Self {
        Error::Encoding(err)
    }
}

impl From<StateError> for Error {
    fn from(err: StateError) -> Self {
        Error::State(err)
    }
}

impl From<ControllerError> for Error {
    fn from(err: ControllerError) -> Self {
        Error::Controller(err)
    }
}
