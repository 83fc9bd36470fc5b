#![no_std]

//! Peripheral-role front end for a BLE stack.
//!
//! Translates application intent into controller operations and
//! controller events into typed application hooks, organized into clear
//! layers:
//!
//! - `gap`, `codec`: protocol constants and value marshaling
//! - `advertising`, `security`, `connection`: policy and bookkeeping
//! - `controller`, `events`, `server`: the driver seam and dispatch
//!
//! The controller itself stays behind the `Controller` trait, so the
//! same server runs against a SoftDevice shim, an HCI transport or a
//! test double.

// This mod must go first so the others see its macros.
mod fmt;

pub mod advertising;
pub mod codec;
pub mod connection;
pub mod controller;
pub mod error;
pub mod events;
pub mod gap;
pub mod security;
pub mod server;
