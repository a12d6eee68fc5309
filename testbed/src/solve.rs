// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural matching of a testbed spec against a topology: a constrained
//! bipartite assignment of logical devices to nodes and logical ports to
//! interfaces, preserving the spec's adjacency requirements.

use crate::error::ResolveError;
use crate::spec::{DeviceSpec, TestbedSpec};
use crate::topology::Topology;
use std::collections::{BTreeMap, BTreeSet};

/// Keyed by (logical device id, logical port id).
pub type PortKey = (String, String);

/// The solver's output: which node backs each logical device and which
/// interface backs each logical port. Both mappings are injective.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pub nodes: BTreeMap<String, String>,
    pub ports: BTreeMap<PortKey, String>,
}

impl Assignment {
    pub fn node_for(&self, device: &str) -> Option<&str> {
        self.nodes.get(device).map(String::as_str)
    }

    pub fn interface_for(&self, device: &str, port: &str) -> Option<&str> {
        self.ports
            .get(&(device.to_string(), port.to_string()))
            .map(String::as_str)
    }
}

/// Match the spec against the topology. Ties are broken by declaration
/// order (of devices, links and topology entries); the adjacency constraint
/// always holds in the returned assignment.
pub fn solve(
    spec: &TestbedSpec,
    topo: &Topology,
) -> Result<Assignment, ResolveError> {
    validate(spec)?;

    // A device that no node can satisfy port-count-wise is diagnosable up
    // front, with a more precise error than an exhausted search.
    for dev in spec.devices() {
        let fits = topo
            .nodes
            .iter()
            .any(|n| n.interfaces.len() >= dev.ports.len());
        if !fits {
            return Err(ResolveError::InsufficientPorts(dev.id.clone()));
        }
    }

    let mut solver = Solver {
        spec,
        topo,
        devices: spec.devices().collect(),
        nodes: BTreeMap::new(),
        used_nodes: BTreeSet::new(),
        ports: BTreeMap::new(),
        used_interfaces: BTreeSet::new(),
        used_links: vec![false; topo.links.len()],
        deepest_device: 0,
        deepest_link: 0,
    };

    if solver.assign_device(0) {
        return Ok(Assignment {
            nodes: solver.nodes,
            ports: solver.ports,
        });
    }

    // Name the entity the search got stuck on.
    let id = if solver.deepest_device < solver.devices.len() {
        solver.devices[solver.deepest_device].id.clone()
    } else if !spec.links.is_empty() {
        let i = solver.deepest_link.min(spec.links.len() - 1);
        spec.links[i].a.device.clone()
    } else {
        solver
            .devices
            .last()
            .map(|d| d.id.clone())
            .unwrap_or_default()
    };
    Err(ResolveError::NoAssignment(id))
}

fn validate(spec: &TestbedSpec) -> Result<(), ResolveError> {
    let mut seen = BTreeSet::new();
    for dev in spec.devices() {
        if !seen.insert(dev.id.clone()) {
            return Err(ResolveError::DuplicateDevice(dev.id.clone()));
        }
    }
    for link in &spec.links {
        for end in [&link.a, &link.b] {
            let declared = spec
                .device(&end.device)
                .map(|d| d.has_port(&end.port))
                .unwrap_or(false);
            if !declared {
                return Err(ResolveError::UnknownLink {
                    device: end.device.clone(),
                    port: end.port.clone(),
                });
            }
        }
    }
    Ok(())
}

struct Solver<'a> {
    spec: &'a TestbedSpec,
    topo: &'a Topology,
    devices: Vec<&'a DeviceSpec>,

    nodes: BTreeMap<String, String>,
    used_nodes: BTreeSet<String>,
    ports: BTreeMap<PortKey, String>,
    used_interfaces: BTreeSet<(String, String)>,
    used_links: Vec<bool>,

    deepest_device: usize,
    deepest_link: usize,
}

impl Solver<'_> {
    fn assign_device(&mut self, i: usize) -> bool {
        self.deepest_device = self.deepest_device.max(i);
        if i == self.devices.len() {
            return self.assign_link(0);
        }
        let dev = self.devices[i];
        for node in &self.topo.nodes {
            if self.used_nodes.contains(&node.name) {
                continue;
            }
            if node.interfaces.len() < dev.ports.len() {
                continue;
            }
            self.nodes.insert(dev.id.clone(), node.name.clone());
            self.used_nodes.insert(node.name.clone());
            if self.assign_device(i + 1) {
                return true;
            }
            self.nodes.remove(&dev.id);
            self.used_nodes.remove(&node.name);
        }
        false
    }

    fn assign_link(&mut self, j: usize) -> bool {
        if j == self.spec.links.len() {
            return self.assign_free_ports();
        }
        self.deepest_link = self.deepest_link.max(j);
        let link = &self.spec.links[j];
        let node_a = self.nodes[&link.a.device].clone();
        let node_b = self.nodes[&link.b.device].clone();
        for li in 0..self.topo.links.len() {
            if self.used_links[li] {
                continue;
            }
            let tl = &self.topo.links[li];
            // Try the topology link in either orientation.
            let ends = if tl.a.node == node_a && tl.b.node == node_b {
                Some((tl.a.interface.clone(), tl.b.interface.clone()))
            } else if tl.b.node == node_a && tl.a.node == node_b {
                Some((tl.b.interface.clone(), tl.a.interface.clone()))
            } else {
                None
            };
            let Some((if_a, if_b)) = ends else {
                continue;
            };

            let mut bound = Vec::new();
            let ok = self.bind_port(&link.a.device, &link.a.port, &node_a, &if_a, &mut bound)
                && self.bind_port(&link.b.device, &link.b.port, &node_b, &if_b, &mut bound);
            if ok {
                self.used_links[li] = true;
                if self.assign_link(j + 1) {
                    return true;
                }
                self.used_links[li] = false;
            }
            self.unbind(bound);
        }
        false
    }

    /// Bind a logical port to an interface, respecting any binding already
    /// made for it by an earlier link and per-device interface injectivity.
    /// Newly created bindings are recorded in `bound` for backtracking.
    fn bind_port(
        &mut self,
        device: &str,
        port: &str,
        node: &str,
        interface: &str,
        bound: &mut Vec<(PortKey, (String, String))>,
    ) -> bool {
        let key = (device.to_string(), port.to_string());
        if let Some(existing) = self.ports.get(&key) {
            return existing == interface;
        }
        let iface_key = (node.to_string(), interface.to_string());
        if self.used_interfaces.contains(&iface_key) {
            return false;
        }
        self.ports.insert(key.clone(), interface.to_string());
        self.used_interfaces.insert(iface_key.clone());
        bound.push((key, iface_key));
        true
    }

    fn unbind(&mut self, bound: Vec<(PortKey, (String, String))>) {
        for (key, iface_key) in bound {
            self.ports.remove(&key);
            self.used_interfaces.remove(&iface_key);
        }
    }

    /// Ports not constrained by any link take the node's remaining
    /// interfaces in sorted name order. All or nothing: on failure the
    /// partial bindings are rolled back so the search can continue.
    fn assign_free_ports(&mut self) -> bool {
        let mut bound = Vec::new();
        for dev in &self.devices {
            let node_name = self.nodes[&dev.id].clone();
            let node = self
                .topo
                .node(&node_name)
                .expect("assigned node exists in topology");
            let mut free: Vec<&str> = node
                .interfaces
                .iter()
                .map(|i| i.name.as_str())
                .filter(|name| {
                    !self
                        .used_interfaces
                        .contains(&(node_name.clone(), name.to_string()))
                })
                .collect();
            free.sort_unstable();
            let mut free = free.into_iter();
            for port in &dev.ports {
                let key = (dev.id.clone(), port.id.clone());
                if self.ports.contains_key(&key) {
                    continue;
                }
                let Some(iface) = free.next() else {
                    self.unbind(bound);
                    return false;
                };
                let iface_key = (node_name.clone(), iface.to_string());
                self.ports.insert(key.clone(), iface.to_string());
                self.used_interfaces.insert(iface_key.clone());
                bound.push((key, iface_key));
            }
        }
        true
    }
}
