// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A fake binding built from a seeded reservation and per-operation
//! closure hooks, for testing the harness without any lab behind it.

use crate::error::BindError;
use crate::{Binding, Channel, PushOptions, StreamClient};
use pb_common::lock;
use std::collections::BTreeMap;
use std::sync::Mutex;
use testbed::reservation::{Reservation, ResolvedDevice};
use testbed::{TestbedSpec, Vendor};
use uuid::Uuid;

type ConfigPusher = Box<
    dyn FnMut(&ResolvedDevice, &str, &PushOptions) -> Result<(), BindError>
        + Send,
>;
type ChannelDialer =
    Box<dyn FnMut(&ResolvedDevice) -> Result<Channel, BindError> + Send>;
type StreamDialer = Box<
    dyn FnMut(&ResolvedDevice) -> Result<Box<dyn StreamClient>, BindError>
        + Send,
>;

#[derive(Default)]
pub struct FakeBinding {
    reservation: Mutex<Option<Reservation>>,
    config_pusher: Mutex<Option<ConfigPusher>>,
    gnmi_dialer: Mutex<Option<ChannelDialer>>,
    gnoi_dialer: Mutex<Option<ChannelDialer>>,
    p4rt_dialer: Mutex<Option<ChannelDialer>>,
    cli_dialer: Mutex<Option<StreamDialer>>,
    console_dialer: Mutex<Option<StreamDialer>>,

    /// The most recent push, captured when no pusher hook is installed.
    last_push: Mutex<Option<(String, PushOptions)>>,

    releases: Mutex<usize>,
}

impl FakeBinding {
    pub fn new(reservation: Reservation) -> Self {
        Self {
            reservation: Mutex::new(Some(reservation)),
            ..Default::default()
        }
    }

    pub fn set_config_pusher<F>(&self, f: F)
    where
        F: FnMut(&ResolvedDevice, &str, &PushOptions) -> Result<(), BindError>
            + Send
            + 'static,
    {
        *lock!(self.config_pusher) = Some(Box::new(f));
    }

    pub fn set_gnmi_dialer<F>(&self, f: F)
    where
        F: FnMut(&ResolvedDevice) -> Result<Channel, BindError>
            + Send
            + 'static,
    {
        *lock!(self.gnmi_dialer) = Some(Box::new(f));
    }

    pub fn set_gnoi_dialer<F>(&self, f: F)
    where
        F: FnMut(&ResolvedDevice) -> Result<Channel, BindError>
            + Send
            + 'static,
    {
        *lock!(self.gnoi_dialer) = Some(Box::new(f));
    }

    pub fn set_p4rt_dialer<F>(&self, f: F)
    where
        F: FnMut(&ResolvedDevice) -> Result<Channel, BindError>
            + Send
            + 'static,
    {
        *lock!(self.p4rt_dialer) = Some(Box::new(f));
    }

    pub fn set_cli_dialer<F>(&self, f: F)
    where
        F: FnMut(&ResolvedDevice) -> Result<Box<dyn StreamClient>, BindError>
            + Send
            + 'static,
    {
        *lock!(self.cli_dialer) = Some(Box::new(f));
    }

    pub fn set_console_dialer<F>(&self, f: F)
    where
        F: FnMut(&ResolvedDevice) -> Result<Box<dyn StreamClient>, BindError>
            + Send
            + 'static,
    {
        *lock!(self.console_dialer) = Some(Box::new(f));
    }

    /// Zero out all hooks.
    pub fn reset(&self) {
        *lock!(self.config_pusher) = None;
        *lock!(self.gnmi_dialer) = None;
        *lock!(self.gnoi_dialer) = None;
        *lock!(self.p4rt_dialer) = None;
        *lock!(self.cli_dialer) = None;
        *lock!(self.console_dialer) = None;
        *lock!(self.last_push) = None;
    }

    pub fn last_push(&self) -> Option<(String, PushOptions)> {
        lock!(self.last_push).clone()
    }

    pub fn releases(&self) -> usize {
        *lock!(self.releases)
    }
}

impl Binding for FakeBinding {
    fn reserve(&self, _spec: &TestbedSpec) -> Result<Reservation, BindError> {
        lock!(self.reservation).clone().ok_or_else(|| {
            BindError::Transport("fake binding has no reservation".into())
        })
    }

    fn release(&self) -> Result<(), BindError> {
        *lock!(self.releases) += 1;
        Ok(())
    }

    fn push_config(
        &self,
        dut: &ResolvedDevice,
        text: &str,
        opts: &PushOptions,
    ) -> Result<(), BindError> {
        if let Some(f) = lock!(self.config_pusher).as_mut() {
            f(dut, text, opts)?;
        }
        *lock!(self.last_push) = Some((text.to_string(), opts.clone()));
        Ok(())
    }

    fn dial_gnmi(&self, dut: &ResolvedDevice) -> Result<Channel, BindError> {
        match lock!(self.gnmi_dialer).as_mut() {
            Some(f) => f(dut),
            None => Err(BindError::Unsupported("dial_gnmi")),
        }
    }

    fn dial_gnoi(&self, dut: &ResolvedDevice) -> Result<Channel, BindError> {
        match lock!(self.gnoi_dialer).as_mut() {
            Some(f) => f(dut),
            None => Err(BindError::Unsupported("dial_gnoi")),
        }
    }

    fn dial_p4rt(&self, dut: &ResolvedDevice) -> Result<Channel, BindError> {
        match lock!(self.p4rt_dialer).as_mut() {
            Some(f) => f(dut),
            None => Err(BindError::Unsupported("dial_p4rt")),
        }
    }

    fn dial_cli(
        &self,
        dut: &ResolvedDevice,
    ) -> Result<Box<dyn StreamClient>, BindError> {
        match lock!(self.cli_dialer).as_mut() {
            Some(f) => f(dut),
            None => Err(BindError::Unsupported("dial_cli")),
        }
    }

    fn dial_console(
        &self,
        dut: &ResolvedDevice,
    ) -> Result<Box<dyn StreamClient>, BindError> {
        match lock!(self.console_dialer).as_mut() {
            Some(f) => f(dut),
            None => Err(BindError::Unsupported("dial_console")),
        }
    }
}

/// A canned command stream: echoes each command back and records it, with
/// "error" provoking a transport failure.
#[derive(Debug, Default)]
pub struct FakeStream {
    pub sent: Vec<String>,
}

impl StreamClient for FakeStream {
    fn send_command(&mut self, cmd: &str) -> Result<String, BindError> {
        if cmd == "error" {
            return Err(BindError::Transport("error".into()));
        }
        self.sent.push(cmd.to_string());
        Ok(cmd.to_string())
    }
}

/// A two-port Arista DUT plus an Ixia OTG, resolved the way the topology
/// binding would resolve them. Enough testbed for most harness tests.
pub fn fake_reservation() -> Reservation {
    let mut duts = BTreeMap::new();
    duts.insert(
        "dut".to_string(),
        ResolvedDevice {
            id: "dut".into(),
            name: "ceos0".into(),
            vendor: Vendor::Arista,
            hardware_model: "ARISTA_CEOS".into(),
            software_version: "ARISTA_CEOS".into(),
            ports: [
                ("port1".to_string(), "Et1/2/3".to_string()),
                ("port2".to_string(), "Et4/5/6".to_string()),
            ]
            .into_iter()
            .collect(),
        },
    );
    duts.insert(
        "dut_cisco".to_string(),
        ResolvedDevice {
            id: "dut_cisco".into(),
            name: "csr0".into(),
            vendor: Vendor::Cisco,
            hardware_model: "CISCO_CSR".into(),
            software_version: "CISCO_CSR".into(),
            ports: [("port1".to_string(), "Gi0/0/0/0".to_string())]
                .into_iter()
                .collect(),
        },
    );

    let mut otgs = BTreeMap::new();
    otgs.insert(
        "otg".to_string(),
        ResolvedDevice {
            id: "otg".into(),
            name: "ixia0".into(),
            vendor: Vendor::Ixia,
            hardware_model: "IXIA_TG".into(),
            software_version: "IXIA_TG".into(),
            ports: [(
                "port1".to_string(),
                "service-ixia0.fake.svc.cluster.local:50071\
                 +service-ixia0.fake.svc.cluster.local:5555"
                    .to_string(),
            )]
            .into_iter()
            .collect(),
        },
    );

    Reservation {
        id: Uuid::new_v4(),
        duts,
        otgs,
    }
}
