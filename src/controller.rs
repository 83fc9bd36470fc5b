//! The controller seam.
//!
//! Everything below this trait is an opaque driver: a SoftDevice shim, an
//! HCI transport, or a test double. The server issues commands through
//! the trait and consumes the driver's event feed via `ControllerEvent`.

use crate::advertising::AdvertisingParameters;
use crate::error::ControllerError;
use crate::gap::Address;
use crate::security::SecurityParameters;

/// Command surface the server requires of a controller driver.
///
/// Methods are synchronous; a driver backed by an async transport must
/// complete the exchange before returning, since application calls block
/// on it.
pub trait Controller {
    /// Brings the controller up. Called once from `Server::new`;
    /// readiness is signaled later through `ControllerEvent::Ready`.
    fn initialize(&mut self) -> Result<(), ControllerError>;

    /// Releases controller resources.
    fn close(&mut self) -> Result<(), ControllerError>;

    /// Hardware address of the local device.
    fn local_address(&self) -> Result<Address, ControllerError>;

    /// Sets the name exposed by the Generic Access service.
    fn set_device_name(&mut self, name: &str) -> Result<(), ControllerError>;

    /// Applies pairing configuration for subsequent security procedures.
    fn set_security_parameters(&mut self, params: &SecurityParameters)
        -> Result<(), ControllerError>;

    fn start_advertising(&mut self, params: &AdvertisingParameters) -> Result<(), ControllerError>;

    fn stop_advertising(&mut self) -> Result<(), ControllerError>;

    /// Publishes the application's attribute table. Called once, after
    /// the first `Ready` event.
    fn deploy(&mut self) -> Result<(), ControllerError>;

    /// Pushes a characteristic value to subscribed peers; `notify`
    /// selects notification over indication. Fails `NotConnected` when no
    /// peer has the subscription enabled.
    fn notify_value(&mut self, handle: u16, notify: bool, value: &[u8])
        -> Result<(), ControllerError>;

    /// Answers a pending passkey confirmation for the peer at `address`.
    fn passkey_reply(&mut self, address: &Address, confirm: bool) -> Result<(), ControllerError>;

    /// Requests teardown of the active connections. Completion arrives as
    /// `Disconnected` events.
    fn disconnect(&mut self) -> Result<(), ControllerError>;
}
