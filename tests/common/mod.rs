//! Common test utilities shared by the integration suites:
//! - a mock controller that records every command and fails on request
//! - a recording application with overridable replies
//! - helpers to drive a server through readiness and connection

#![allow(dead_code)]

use ble_peripheral::advertising::AdvertisingParameters;
use ble_peripheral::codec::ValueType;
use ble_peripheral::controller::Controller;
use ble_peripheral::error::ControllerError;
use ble_peripheral::events::{Characteristic, ControllerEvent};
use ble_peripheral::gap::{Address, Uuid};
use ble_peripheral::security::SecurityParameters;
use ble_peripheral::server::{BleServerApp, Server};

/// One recorded controller command.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Initialize,
    Close,
    SetDeviceName(String),
    SetSecurity(SecurityParameters),
    StartAdvertising(AdvertisingParameters),
    StopAdvertising,
    Deploy,
    Notify {
        handle: u16,
        notify: bool,
        value: Vec<u8>,
    },
    PasskeyReply {
        address: Address,
        confirm: bool,
    },
    Disconnect,
}

/// Controller double. Records every command; `fail_next` makes the next
/// recorded command fail with the given error instead.
pub struct MockController {
    pub calls: Vec<Call>,
    pub fail_next: Option<ControllerError>,
    pub address: Address,
}

impl MockController {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_next: None,
            address: Address([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]),
        }
    }

    fn record(&mut self, call: Call) -> Result<(), ControllerError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        self.calls.push(call);
        Ok(())
    }

    /// Commands recorded since construction, oldest first.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn last_call(&self) -> Option<&Call> {
        self.calls.last()
    }
}

impl Controller for MockController {
    fn initialize(&mut self) -> Result<(), ControllerError> {
        self.record(Call::Initialize)
    }

    fn close(&mut self) -> Result<(), ControllerError> {
        self.record(Call::Close)
    }

    fn local_address(&self) -> Result<Address, ControllerError> {
        Ok(self.address)
    }

    fn set_device_name(&mut self, name: &str) -> Result<(), ControllerError> {
        self.record(Call::SetDeviceName(name.to_owned()))
    }

    fn set_security_parameters(
        &mut self,
        params: &SecurityParameters,
    ) -> Result<(), ControllerError> {
        self.record(Call::SetSecurity(*params))
    }

    fn start_advertising(&mut self, params: &AdvertisingParameters) -> Result<(), ControllerError> {
        self.record(Call::StartAdvertising(params.clone()))
    }

    fn stop_advertising(&mut self) -> Result<(), ControllerError> {
        self.record(Call::StopAdvertising)
    }

    fn deploy(&mut self) -> Result<(), ControllerError> {
        self.record(Call::Deploy)
    }

    fn notify_value(&mut self, handle: u16, notify: bool, value: &[u8]) -> Result<(), ControllerError> {
        self.record(Call::Notify {
            handle,
            notify,
            value: value.to_vec(),
        })
    }

    fn passkey_reply(&mut self, address: &Address, confirm: bool) -> Result<(), ControllerError> {
        self.record(Call::PasskeyReply {
            address: *address,
            confirm,
        })
    }

    fn disconnect(&mut self) -> Result<(), ControllerError> {
        self.record(Call::Disconnect)
    }
}

/// Application that keeps every hook at its default.
pub struct NullApp;

impl<C: Controller> BleServerApp<C> for NullApp {}

/// Peer address used across the suites.
pub const PEER: Address = Address([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

/// Battery-level characteristic fixture.
pub fn battery_level() -> Characteristic<'static> {
    Characteristic {
        uuid: Uuid::from_u16(0x2A19),
        handle: 0x0010,
        name: "battery",
        ty: ValueType::Uint(1),
        notify: true,
    }
}

/// Builds a server on a fresh mock controller.
pub fn new_server() -> Server<MockController> {
    Server::new(MockController::new()).expect("controller init")
}

/// Builds a server and drives it through the ready event.
pub fn ready_server() -> Server<MockController> {
    let mut server = new_server();
    let mut app = NullApp;
    server
        .handle_event(&mut app, ControllerEvent::Ready)
        .expect("ready dispatch");
    server
}

/// Delivers a connection event for `handle` from the default peer.
pub fn connect_peer(server: &mut Server<MockController>, handle: u16) {
    let mut app = NullApp;
    server
        .handle_event(
            &mut app,
            ControllerEvent::Connected {
                connection: handle,
                address: PEER,
            },
        )
        .expect("connect dispatch");
}

/// Delivers a disconnection event for `handle` from the default peer.
pub fn disconnect_peer(server: &mut Server<MockController>, handle: u16) {
    let mut app = NullApp;
    server
        .handle_event(
            &mut app,
            ControllerEvent::Disconnected {
                connection: handle,
                address: PEER,
            },
        )
        .expect("disconnect dispatch");
}
