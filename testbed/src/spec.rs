// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The logical testbed specification authored by test writers. Devices and
//! ports are abstract names; vendors and concrete interfaces are discovered
//! at resolution time.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A testbed is a set of logical devices under test, logical traffic
/// generators, and the interconnects the test requires between their ports.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TestbedSpec {
    /// Devices under test.
    #[serde(default)]
    pub duts: Vec<DeviceSpec>,

    /// Traffic generator devices.
    #[serde(default)]
    pub otgs: Vec<DeviceSpec>,

    /// Required port-to-port interconnects. Two ports are linked iff an
    /// entry here names them.
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeviceSpec {
    /// Stable logical device id, e.g. "dut1".
    pub id: String,

    #[serde(default)]
    pub ports: Vec<PortSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PortSpec {
    /// Logical port id, e.g. "port1".
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LinkSpec {
    pub a: PortRef,
    pub b: PortRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PortRef {
    pub device: String,
    pub port: String,
}

impl TestbedSpec {
    /// All logical devices in declaration order, DUTs first.
    pub fn devices(&self) -> impl Iterator<Item = &DeviceSpec> {
        self.duts.iter().chain(self.otgs.iter())
    }

    pub fn device(&self, id: &str) -> Option<&DeviceSpec> {
        self.devices().find(|d| d.id == id)
    }
}

impl DeviceSpec {
    pub fn has_port(&self, id: &str) -> bool {
        self.ports.iter().any(|p| p.id == id)
    }
}

impl PortRef {
    pub fn new(device: &str, port: &str) -> Self {
        Self {
            device: device.into(),
            port: port.into(),
        }
    }
}
