// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The topology-backed binding: reserves testbeds by resolving them
//! against a fetched topology and dials management endpoints recorded by
//! the resolver.

use crate::error::BindError;
use crate::{Binding, Channel, Proto};
use pb_common::lock;
use slog::{info, Logger};
use std::collections::BTreeMap;
use std::sync::Mutex;
use testbed::{resolve, Reservation, ResolvedDevice, TestbedSpec, TopologySource};

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct TopoBinding {
    source: Box<dyn TopologySource>,
    creds: Credentials,

    /// gNMI endpoints recorded at reserve time, keyed by logical device
    /// id. Shared with dial callers, hence the mutex.
    gnmi: Mutex<BTreeMap<String, String>>,

    log: Logger,
}

impl TopoBinding {
    pub fn new(
        source: Box<dyn TopologySource>,
        creds: Credentials,
        log: Logger,
    ) -> Self {
        Self {
            source,
            creds,
            gnmi: Mutex::new(BTreeMap::new()),
            log,
        }
    }
}

impl Binding for TopoBinding {
    fn reserve(&self, spec: &TestbedSpec) -> Result<Reservation, BindError> {
        let topo = self.source.fetch()?;
        let resolution = resolve(spec, &topo, &self.log)?;
        info!(self.log, "reserved testbed";
            "reservation" => %resolution.reservation.id,
            "topology" => &topo.name,
            "duts" => resolution.reservation.duts.len(),
            "otgs" => resolution.reservation.otgs.len(),
        );
        *lock!(self.gnmi) = resolution.gnmi;
        Ok(resolution.reservation)
    }

    fn release(&self) -> Result<(), BindError> {
        lock!(self.gnmi).clear();
        Ok(())
    }

    fn dial_gnmi(&self, dut: &ResolvedDevice) -> Result<Channel, BindError> {
        let target = lock!(self.gnmi)
            .get(&dut.id)
            .cloned()
            .ok_or_else(|| BindError::NoGnmiAddr(dut.id.clone()))?;
        info!(self.log, "dialing gnmi";
            "device" => &dut.id,
            "target" => &target,
        );
        let mut metadata = BTreeMap::new();
        metadata.insert("username".to_string(), self.creds.username.clone());
        metadata.insert("password".to_string(), self.creds.password.clone());
        Ok(Channel {
            proto: Proto::Gnmi,
            target,
            metadata,
            tls_insecure: true,
        })
    }

    fn dial_otg(
        &self,
        server: &str,
        https: bool,
    ) -> Result<Channel, BindError> {
        info!(self.log, "dialing otg controller"; "target" => server);
        Ok(Channel {
            proto: Proto::Otg,
            target: server.to_string(),
            metadata: BTreeMap::new(),
            tls_insecure: https,
        })
    }

    fn dial_otg_gnmi(&self, server: &str) -> Result<Channel, BindError> {
        info!(self.log, "dialing otg gnmi"; "target" => server);
        Ok(Channel {
            proto: Proto::OtgGnmi,
            target: server.to_string(),
            metadata: BTreeMap::new(),
            tls_insecure: false,
        })
    }
}
