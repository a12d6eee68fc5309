// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The binding layer: the boundary between the harness and whatever
//! transport backs a test run. A binding reserves testbeds and dials
//! protocol endpoints; the session object owns the one live reservation
//! for a run and is passed explicitly by the test-run coordinator.

pub mod error;
pub mod fake;
pub mod session;
pub mod topo;

pub use error::BindError;
pub use session::Session;
pub use topo::{Credentials, TopoBinding};

use std::collections::BTreeMap;
use testbed::{Reservation, ResolvedDevice, TestbedSpec};

#[cfg(test)]
pub(crate) fn test_logger() -> slog::Logger {
    pb_common::log::build_logger(std::io::stdout())
}

/// Protocols a binding can dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proto {
    Gnmi,
    Gnoi,
    P4rt,
    Otg,
    OtgGnmi,
}

/// The addressing contract of a successful dial: everything the caller's
/// RPC stack needs to open the connection. Protocol semantics live
/// entirely on the caller's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub proto: Proto,
    pub target: String,

    /// Per-RPC credential metadata, e.g. username/password pairs.
    pub metadata: BTreeMap<String, String>,

    /// Whether the transport should skip certificate verification.
    pub tls_insecure: bool,
}

/// Options accompanying a config push, derived purely from which branch of
/// the vendor precedence rule fired and which entry point was called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushOptions {
    pub openconfig: bool,
    pub append: bool,
}

/// A blocking command stream, e.g. a device CLI or console.
pub trait StreamClient: Send + std::fmt::Debug {
    fn send_command(&mut self, cmd: &str) -> Result<String, BindError>;
}

/// A transport binding. Implementations override the operations their
/// backend supports; everything else reports itself unsupported rather
/// than silently succeeding.
pub trait Binding: Send + Sync {
    /// Reserve a testbed. Called once per test run; the returned
    /// reservation is held by the session until release.
    fn reserve(&self, spec: &TestbedSpec) -> Result<Reservation, BindError>;

    fn release(&self) -> Result<(), BindError> {
        Ok(())
    }

    fn push_config(
        &self,
        _dut: &ResolvedDevice,
        _text: &str,
        _opts: &PushOptions,
    ) -> Result<(), BindError> {
        Err(BindError::Unsupported("push_config"))
    }

    fn dial_gnmi(
        &self,
        _dut: &ResolvedDevice,
    ) -> Result<Channel, BindError> {
        Err(BindError::Unsupported("dial_gnmi"))
    }

    fn dial_gnoi(
        &self,
        _dut: &ResolvedDevice,
    ) -> Result<Channel, BindError> {
        Err(BindError::Unsupported("dial_gnoi"))
    }

    fn dial_p4rt(
        &self,
        _dut: &ResolvedDevice,
    ) -> Result<Channel, BindError> {
        Err(BindError::Unsupported("dial_p4rt"))
    }

    fn dial_cli(
        &self,
        _dut: &ResolvedDevice,
    ) -> Result<Box<dyn StreamClient>, BindError> {
        Err(BindError::Unsupported("dial_cli"))
    }

    fn dial_console(
        &self,
        _dut: &ResolvedDevice,
    ) -> Result<Box<dyn StreamClient>, BindError> {
        Err(BindError::Unsupported("dial_console"))
    }

    /// Dial a traffic generator controller. OTG dials are keyed by server
    /// address rather than by device.
    fn dial_otg(
        &self,
        _server: &str,
        _https: bool,
    ) -> Result<Channel, BindError> {
        Err(BindError::Unsupported("dial_otg"))
    }

    fn dial_otg_gnmi(&self, _server: &str) -> Result<Channel, BindError> {
        Err(BindError::Unsupported("dial_otg_gnmi"))
    }
}
