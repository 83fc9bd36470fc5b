//! Peripheral server: lifecycle state, application operations and event
//! dispatch.
//!
//! One `Server` owns one controller handle. Controller events enter
//! through `handle_event` on a single thread; application operations may
//! be called from inside the hooks, so dispatch never holds internal
//! state across a hook invocation.

use heapless::String;

use crate::advertising::AdvertisingOptions;
use crate::codec::{self, Value};
use crate::connection::{ConnectionInfo, ConnectionManager};
use crate::controller::Controller;
use crate::error::{Error, StateError};
use crate::events::{Characteristic, ControllerEvent, EventReply};
use crate::gap::{Address, MAX_DEVICE_NAME_LEN};
use crate::security::{SecurityOptions, SecurityParameters};

/// Advertising sub-state, tracked separately from connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum AdvState {
    Idle,
    Advertising,
}

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServerState {
    /// Constructed, controller bring-up not signaled yet.
    Uninitialized,
    Idle,
    Advertising,
    /// At least one active connection.
    Connected,
}

/// Application hooks for controller events. Every hook has a no-op
/// default; override the ones the application cares about.
///
/// Hooks receive the server so they can advertise, notify or disconnect
/// from inside dispatch. The read and passkey hooks answer a peer that is
/// blocked on the response, so they must return promptly.
pub trait BleServerApp<C: Controller> {
    /// The controller is up; advertising may start.
    fn on_ready(&mut self, _server: &mut Server<C>) {}

    /// A peer wrote `value`, already decoded per the characteristic type.
    fn on_characteristic_written(
        &mut self,
        _server: &mut Server<C>,
        _characteristic: &Characteristic<'_>,
        _value: Value<'_>,
    ) {
    }

    /// Current value of the characteristic, or `None` to let the
    /// controller answer from its stored attribute value.
    fn on_characteristic_read(
        &mut self,
        _server: &mut Server<C>,
        _characteristic: &Characteristic<'_>,
    ) -> Option<Value<'_>> {
        None
    }

    fn on_notify_enabled(&mut self, _server: &mut Server<C>, _characteristic: &Characteristic<'_>) {
    }

    fn on_notify_disabled(&mut self, _server: &mut Server<C>, _characteristic: &Characteristic<'_>) {
    }

    fn on_connected(&mut self, _server: &mut Server<C>, _connection: &ConnectionInfo) {}

    fn on_disconnected(&mut self, _server: &mut Server<C>, _connection: &ConnectionInfo) {}

    /// Both sides display `passkey`; answer with `passkey_reply`.
    fn on_passkey_confirm(&mut self, _server: &mut Server<C>, _address: &Address, _passkey: u32) {}

    /// This side displays `passkey` for the peer to enter.
    fn on_passkey_display(&mut self, _server: &mut Server<C>, _address: &Address, _passkey: u32) {}

    /// Passkey for the pending pairing, or `None` to let the pairing fail
    /// on the controller side.
    fn on_passkey_requested(&mut self, _server: &mut Server<C>, _address: &Address) -> Option<u32> {
        None
    }

    /// Pairing completed; the return value is handed back to the
    /// controller.
    fn on_authenticated(&mut self, _server: &mut Server<C>) -> bool {
        true
    }
}

/// The peripheral server. Owns the controller handle and all protocol
/// state; construct one per device role.
pub struct Server<C: Controller> {
    controller: C,
    initialized: bool,
    deployed: bool,
    advertising: AdvState,
    connections: ConnectionManager,
    security: SecurityParameters,
    device_name: String<MAX_DEVICE_NAME_LEN>,
}

impl<C: Controller> Server<C> {
    /// Brings up the controller and returns the server in the
    /// `Uninitialized` state. Readiness arrives later as
    /// `ControllerEvent::Ready`.
    pub fn new(mut controller: C) -> Result<Self, Error> {
        controller.initialize()?;
        Ok(Self {
            controller,
            initialized: false,
            deployed: false,
            advertising: AdvState::Idle,
            connections: ConnectionManager::new(),
            security: SecurityParameters::default(),
            device_name: String::new(),
        })
    }

    /// Observable lifecycle state. Connections dominate the advertising
    /// sub-state; `is_advertising` queries it independently.
    pub fn state(&self) -> ServerState {
        if !self.initialized {
            ServerState::Uninitialized
        } else if !self.connections.is_empty() {
            ServerState::Connected
        } else if self.advertising == AdvState::Advertising {
            ServerState::Advertising
        } else {
            ServerState::Idle
        }
    }

    pub fn is_advertising(&self) -> bool {
        self.advertising == AdvState::Advertising
    }

    pub fn connection_count(&self) -> usize {
        self.connections.count()
    }

    pub fn connections(&self) -> impl Iterator<Item = &ConnectionInfo> {
        self.connections.iter()
    }

    pub fn connection(&self, handle: u16) -> Option<&ConnectionInfo> {
        self.connections.get(handle)
    }

    /// Name as stored, after any truncation.
    pub fn device_name(&self) -> &str {
        self.device_name.as_str()
    }

    /// Stores the name, truncated to `MAX_DEVICE_NAME_LEN` bytes on a
    /// character boundary, and propagates it to the controller.
    pub fn set_device_name(&mut self, name: &str) -> Result<(), Error> {
        let name = truncate_name(name);
        self.device_name.clear();
        let _ = self.device_name.push_str(name);
        self.controller.set_device_name(name)?;
        Ok(())
    }

    /// Normalizes the pairing options and forwards them to the
    /// controller.
    pub fn set_security_parameters(&mut self, options: &SecurityOptions) -> Result<(), Error> {
        let params = SecurityParameters::normalize(options);
        self.controller.set_security_parameters(&params)?;
        self.security = params;
        Ok(())
    }

    pub fn security_parameters(&self) -> &SecurityParameters {
        &self.security
    }

    /// Hardware address of the local device.
    pub fn local_address(&self) -> Result<Address, Error> {
        Ok(self.controller.local_address()?)
    }

    /// Starts advertising with the policy-selected interval window and
    /// the computed flags record injected into the payload.
    ///
    /// Fails `NotReady` before the controller has signaled `Ready`. A
    /// start while already advertising restarts with the new parameters.
    pub fn start_advertising(&mut self, options: &AdvertisingOptions<'_>) -> Result<(), Error> {
        if !self.initialized {
            return Err(StateError::NotReady.into());
        }
        let params = options.resolve()?;
        if self.advertising == AdvState::Advertising {
            self.controller.stop_advertising()?;
            self.advertising = AdvState::Idle;
        }
        self.controller.start_advertising(&params)?;
        self.advertising = AdvState::Advertising;
        debug!(
            "advertising started, interval {}..{} units",
            params.interval.min, params.interval.max
        );
        Ok(())
    }

    /// Stops advertising. A stop while idle, including before the
    /// controller has signaled `Ready`, is accepted and does nothing.
    pub fn stop_advertising(&mut self) -> Result<(), Error> {
        if self.advertising == AdvState::Idle {
            return Ok(());
        }
        self.controller.stop_advertising()?;
        self.advertising = AdvState::Idle;
        debug!("advertising stopped");
        Ok(())
    }

    /// Encodes `value` per the characteristic's declared type and pushes
    /// it to subscribed peers.
    ///
    /// Fails `State(NotConnected)` when no connection exists at all; a
    /// connected peer without the subscription surfaces the controller's
    /// own `NotConnected`.
    pub fn notify_value(
        &mut self,
        characteristic: &Characteristic<'_>,
        value: Value<'_>,
    ) -> Result<(), Error> {
        if self.connections.is_empty() {
            return Err(StateError::NotConnected.into());
        }
        let bytes = codec::encode(characteristic.ty, value)?;
        self.controller
            .notify_value(characteristic.handle, characteristic.notify, &bytes)?;
        Ok(())
    }

    /// Acknowledges a passkey confirmation for the peer at `address`.
    /// Forwarded unconditionally; a pairing no longer pending fails on
    /// the controller side.
    pub fn passkey_reply(&mut self, address: &Address, confirm: bool) -> Result<(), Error> {
        Ok(self.controller.passkey_reply(address, confirm)?)
    }

    /// Requests teardown of the active connections. Completion is
    /// observed as `Disconnected` events, not on return.
    pub fn disconnect(&mut self) -> Result<(), Error> {
        Ok(self.controller.disconnect()?)
    }

    /// Stops any running advertisement and releases the controller.
    pub fn close(mut self) -> Result<(), Error> {
        if self.advertising == AdvState::Advertising
            && self.controller.stop_advertising().is_err()
        {
            warn!("stop advertising failed during close");
        }
        self.controller.close()?;
        Ok(())
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Dispatches one controller event into the application hooks.
    ///
    /// Events are processed one at a time on the caller's thread. The
    /// request/response events (`CharacteristicRead`, `PasskeyRequested`,
    /// `Authenticated`) return their reply synchronously; the controller
    /// must not deliver another event until this call returns.
    pub fn handle_event<A: BleServerApp<C>>(
        &mut self,
        app: &mut A,
        event: ControllerEvent<'_>,
    ) -> Result<Option<EventReply>, Error> {
        match event {
            ControllerEvent::Ready => {
                if self.initialized {
                    warn!("duplicate ready event dropped");
                    return Ok(None);
                }
                self.initialized = true;
                info!("controller ready");
                app.on_ready(self);
                // The attribute table goes out once per process lifetime,
                // after the application had its chance to configure.
                if !self.deployed {
                    self.controller.deploy()?;
                    self.deployed = true;
                }
                Ok(None)
            }
            ControllerEvent::CharacteristicWritten {
                characteristic,
                value,
            } => {
                let value = codec::decode(characteristic.ty, value)?;
                app.on_characteristic_written(self, &characteristic, value);
                Ok(None)
            }
            ControllerEvent::CharacteristicRead { characteristic } => {
                match app.on_characteristic_read(self, &characteristic) {
                    Some(value) => {
                        let bytes = codec::encode(characteristic.ty, value)?;
                        Ok(Some(EventReply::Read(bytes)))
                    }
                    None => Ok(None),
                }
            }
            ControllerEvent::NotifyEnabled { characteristic } => {
                app.on_notify_enabled(self, &characteristic);
                Ok(None)
            }
            ControllerEvent::NotifyDisabled { characteristic } => {
                app.on_notify_disabled(self, &characteristic);
                Ok(None)
            }
            ControllerEvent::Connected {
                connection,
                address,
            } => {
                // A connectable advertisement ends when the link comes up.
                self.advertising = AdvState::Idle;
                let info = self.connections.add(connection, address)?;
                app.on_connected(self, &info);
                Ok(None)
            }
            ControllerEvent::Disconnected { connection, .. } => {
                match self.connections.remove(connection) {
                    Some(info) => app.on_disconnected(self, &info),
                    None => warn!("disconnect for unknown handle {}", connection),
                }
                Ok(None)
            }
            ControllerEvent::PasskeyConfirm { address, passkey } => {
                app.on_passkey_confirm(self, &address, passkey);
                Ok(None)
            }
            ControllerEvent::PasskeyDisplay { address, passkey } => {
                app.on_passkey_display(self, &address, passkey);
                Ok(None)
            }
            ControllerEvent::PasskeyRequested { address } => Ok(app
                .on_passkey_requested(self, &address)
                .map(EventReply::Passkey)),
            ControllerEvent::Authenticated => {
                Ok(Some(EventReply::Authenticated(app.on_authenticated(self))))
            }
            ControllerEvent::Unknown => {
                trace!("unknown controller event dropped");
                Ok(None)
            }
        }
    }
}

/// Longest prefix of `name` within the stored capacity, cut on a
/// character boundary.
fn truncate_name(name: &str) -> &str {
    if name.len() <= MAX_DEVICE_NAME_LEN {
        return name;
    }
    let mut end = MAX_DEVICE_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
