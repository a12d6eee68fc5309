// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The resolver's output: logical testbed entities bound to concrete
//! topology resources for the duration of one test run.

use crate::topology::Vendor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Reservation {
    /// Unique per test-run invocation.
    pub id: Uuid,

    /// Resolved devices under test, keyed by logical device id.
    pub duts: BTreeMap<String, ResolvedDevice>,

    /// Resolved traffic generators, keyed by logical device id.
    pub otgs: BTreeMap<String, ResolvedDevice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedDevice {
    /// Logical device id from the testbed spec. Management addressing is
    /// keyed by this id, not by object identity.
    pub id: String,

    /// Name of the concrete node backing this device.
    pub name: String,

    pub vendor: Vendor,

    /// Diagnostics only; derived from the node type identifier.
    pub hardware_model: String,

    /// Diagnostics only; derived from the node type identifier.
    pub software_version: String,

    /// Logical port id to concrete interface name. For traffic generator
    /// ports this is the `+`-joined set of fully qualified service
    /// addresses instead; callers must treat that string as a set, not an
    /// ordered list (the join is sorted for determinism).
    pub ports: BTreeMap<String, String>,
}

impl ResolvedDevice {
    pub fn port(&self, id: &str) -> Option<&str> {
        self.ports.get(id).map(String::as_str)
    }
}

impl Reservation {
    /// Look up any resolved device, DUT or OTG, by logical id.
    pub fn device(&self, id: &str) -> Option<&ResolvedDevice> {
        self.duts.get(id).or_else(|| self.otgs.get(id))
    }
}
