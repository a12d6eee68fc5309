// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Concrete topology description: nodes with management services and
//! interfaces, and the links between node interfaces.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Topology {
    pub name: String,

    /// Namespace the topology is deployed in. Scopes the fully qualified
    /// service addresses composed for traffic generator ports.
    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub links: Vec<TopoLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Node {
    pub name: String,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Management endpoints the node exposes.
    #[serde(default)]
    pub services: Vec<Service>,

    #[serde(default)]
    pub interfaces: Vec<Interface>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Service {
    pub name: String,

    /// Port the service listens on inside the node.
    pub inside: u16,

    /// Externally reachable port.
    pub outside: u16,

    /// Externally reachable address.
    pub outside_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Interface {
    pub name: String,
}

/// A link connects two interfaces on different nodes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TopoLink {
    pub a: Endpoint,
    pub b: Endpoint,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Endpoint {
    pub node: String,
    pub interface: String,
}

/// Vendor and hardware family of an emulated node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    AristaCeos,
    CiscoCsr,
    CiscoCxr,
    JuniperCevo,
    JuniperVmx,
    IxiaTg,
    /// A plain host node. Carries no vendor and cannot back a logical
    /// device.
    Host,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    Arista,
    Cisco,
    Juniper,
    Ixia,
}

impl NodeType {
    /// The fixed node type to vendor table. Types without an entry cannot
    /// be resolved.
    pub fn vendor(&self) -> Option<Vendor> {
        match self {
            NodeType::AristaCeos => Some(Vendor::Arista),
            NodeType::CiscoCsr => Some(Vendor::Cisco),
            NodeType::CiscoCxr => Some(Vendor::Cisco),
            NodeType::JuniperCevo => Some(Vendor::Juniper),
            NodeType::JuniperVmx => Some(Vendor::Juniper),
            NodeType::IxiaTg => Some(Vendor::Ixia),
            NodeType::Host => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::AristaCeos => "ARISTA_CEOS",
            NodeType::CiscoCsr => "CISCO_CSR",
            NodeType::CiscoCxr => "CISCO_CXR",
            NodeType::JuniperCevo => "JUNIPER_CEVO",
            NodeType::JuniperVmx => "JUNIPER_VMX",
            NodeType::IxiaTg => "IXIA_TG",
            NodeType::Host => "HOST",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vendor::Arista => "Arista",
            Vendor::Cisco => "Cisco",
            Vendor::Juniper => "Juniper",
            Vendor::Ixia => "Ixia",
        };
        write!(f, "{}", name)
    }
}

impl Topology {
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

impl Node {
    /// Look up a named management service on this node.
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }
}
