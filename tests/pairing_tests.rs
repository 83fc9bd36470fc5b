//! Pairing flows: passkey display, confirmation, entry and the
//! authenticated handshake.

mod common;

use ble_peripheral::events::{ControllerEvent, EventReply};
use ble_peripheral::gap::Address;
use ble_peripheral::server::{BleServerApp, Server};
use common::*;

/// App with scripted pairing behavior.
struct PairingApp {
    displayed: Option<(Address, u32)>,
    confirm_requests: Vec<(Address, u32)>,
    passkey: Option<u32>,
    accept: bool,
}

impl PairingApp {
    fn new() -> Self {
        Self {
            displayed: None,
            confirm_requests: Vec::new(),
            passkey: None,
            accept: true,
        }
    }
}

impl BleServerApp<MockController> for PairingApp {
    fn on_passkey_display(
        &mut self,
        _server: &mut Server<MockController>,
        address: &Address,
        passkey: u32,
    ) {
        self.displayed = Some((*address, passkey));
    }

    fn on_passkey_confirm(
        &mut self,
        server: &mut Server<MockController>,
        address: &Address,
        passkey: u32,
    ) {
        self.confirm_requests.push((*address, passkey));
        // Answer immediately, the way a headless device would.
        server.passkey_reply(address, self.accept).unwrap();
    }

    fn on_passkey_requested(
        &mut self,
        _server: &mut Server<MockController>,
        _address: &Address,
    ) -> Option<u32> {
        self.passkey
    }

    fn on_authenticated(&mut self, _server: &mut Server<MockController>) -> bool {
        self.accept
    }
}

#[test]
fn displayed_passkey_reaches_the_hook() {
    let mut server = ready_server();
    connect_peer(&mut server, 1);
    let mut app = PairingApp::new();

    let reply = server
        .handle_event(
            &mut app,
            ControllerEvent::PasskeyDisplay {
                address: PEER,
                passkey: 123456,
            },
        )
        .unwrap();
    assert!(reply.is_none());
    assert_eq!(app.displayed, Some((PEER, 123456)));
}

#[test]
fn confirmation_can_be_answered_from_the_hook() {
    let mut server = ready_server();
    connect_peer(&mut server, 1);
    let mut app = PairingApp::new();

    server
        .handle_event(
            &mut app,
            ControllerEvent::PasskeyConfirm {
                address: PEER,
                passkey: 654321,
            },
        )
        .unwrap();

    assert_eq!(app.confirm_requests, [(PEER, 654321)]);
    assert_eq!(
        server.controller().last_call(),
        Some(&Call::PasskeyReply {
            address: PEER,
            confirm: true,
        })
    );
}

#[test]
fn rejection_is_forwarded_too() {
    let mut server = ready_server();
    connect_peer(&mut server, 1);
    let mut app = PairingApp::new();
    app.accept = false;

    server
        .handle_event(
            &mut app,
            ControllerEvent::PasskeyConfirm {
                address: PEER,
                passkey: 1,
            },
        )
        .unwrap();

    assert_eq!(
        server.controller().last_call(),
        Some(&Call::PasskeyReply {
            address: PEER,
            confirm: false,
        })
    );
}

#[test]
fn requested_passkey_is_returned_synchronously() {
    let mut server = ready_server();
    connect_peer(&mut server, 1);
    let mut app = PairingApp::new();
    app.passkey = Some(42000);

    let reply = server
        .handle_event(
            &mut app,
            ControllerEvent::PasskeyRequested { address: PEER },
        )
        .unwrap();
    assert_eq!(reply, Some(EventReply::Passkey(42000)));
}

#[test]
fn missing_passkey_yields_no_reply() {
    let mut server = ready_server();
    connect_peer(&mut server, 1);
    let mut app = PairingApp::new();

    let reply = server
        .handle_event(
            &mut app,
            ControllerEvent::PasskeyRequested { address: PEER },
        )
        .unwrap();
    assert!(reply.is_none());
}

#[test]
fn authentication_outcome_flows_back_to_the_controller() {
    let mut server = ready_server();
    connect_peer(&mut server, 1);
    let mut app = PairingApp::new();

    let reply = server
        .handle_event(&mut app, ControllerEvent::Authenticated)
        .unwrap();
    assert_eq!(reply, Some(EventReply::Authenticated(true)));

    app.accept = false;
    let reply = server
        .handle_event(&mut app, ControllerEvent::Authenticated)
        .unwrap();
    assert_eq!(reply, Some(EventReply::Authenticated(false)));
}

#[test]
fn default_hooks_accept_authentication() {
    let mut server = ready_server();
    let mut app = NullApp;
    let reply = server
        .handle_event(&mut app, ControllerEvent::Authenticated)
        .unwrap();
    assert_eq!(reply, Some(EventReply::Authenticated(true)));
}

#[test]
fn passkey_reply_is_forwarded_even_without_a_pending_pairing() {
    let mut server = ready_server();
    // No pairing in progress; the controller is the judge of that.
    server.passkey_reply(&PEER, true).unwrap();
    assert_eq!(
        server.controller().last_call(),
        Some(&Call::PasskeyReply {
            address: PEER,
            confirm: true,
        })
    );
}
