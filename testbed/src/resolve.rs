// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device resolution on top of the solver's structural assignment:
//! vendor discovery, port mapping, management endpoint lookup, and traffic
//! generator service address composition.

use crate::error::ResolveError;
use crate::reservation::{Reservation, ResolvedDevice};
use crate::solve::{solve, Assignment};
use crate::spec::{DeviceSpec, TestbedSpec};
use crate::topology::{Node, NodeType, Topology};
use slog::{debug, Logger};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A reservation plus the resolver's management addressing state. The gnmi
/// map is keyed by logical device id; it is not part of the reservation's
/// public shape and is consumed by the binding layer for dialing.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub reservation: Reservation,
    pub gnmi: BTreeMap<String, String>,
}

/// Resolve the spec against the topology. Each device resolves
/// independently; results are merged here, so any failure is terminal for
/// the whole call and no partial reservation escapes.
pub fn resolve(
    spec: &TestbedSpec,
    topo: &Topology,
    log: &Logger,
) -> Result<Resolution, ResolveError> {
    let assignment = solve(spec, topo)?;

    let mut duts = BTreeMap::new();
    let mut gnmi = BTreeMap::new();
    for dev in &spec.duts {
        let (resolved, addr) = resolve_dut(dev, &assignment, topo)?;
        debug!(log, "resolved dut";
            "device" => &dev.id,
            "node" => &resolved.name,
            "gnmi" => &addr,
        );
        gnmi.insert(dev.id.clone(), addr);
        duts.insert(dev.id.clone(), resolved);
    }

    let mut otgs = BTreeMap::new();
    for dev in &spec.otgs {
        let resolved = resolve_otg(dev, &assignment, topo)?;
        debug!(log, "resolved otg";
            "device" => &dev.id,
            "node" => &resolved.name,
        );
        otgs.insert(dev.id.clone(), resolved);
    }

    Ok(Resolution {
        reservation: Reservation {
            id: Uuid::new_v4(),
            duts,
            otgs,
        },
        gnmi,
    })
}

fn resolve_dut(
    dev: &DeviceSpec,
    assignment: &Assignment,
    topo: &Topology,
) -> Result<(ResolvedDevice, String), ResolveError> {
    let node = assigned_node(dev, assignment, topo);
    let resolved = dims(dev, node, assignment)?;
    let addr = gnmi_addr(node)?;
    Ok((resolved, addr))
}

fn resolve_otg(
    dev: &DeviceSpec,
    assignment: &Assignment,
    topo: &Topology,
) -> Result<ResolvedDevice, ResolveError> {
    let node = assigned_node(dev, assignment, topo);
    if node.node_type != NodeType::IxiaTg {
        return dims(dev, node, assignment);
    }

    let vendor = node
        .node_type
        .vendor()
        .ok_or(ResolveError::UnknownVendor(node.node_type))?;

    // Every service on the node is reachable from every traffic generator
    // port; the topology source reports services in no particular order, so
    // the join is sorted to make the set representation deterministic.
    let mut addrs: Vec<String> = node
        .services
        .iter()
        .map(|s| {
            format!(
                "service-{}.{}.svc.cluster.local:{}",
                node.name, topo.namespace, s.inside
            )
        })
        .collect();
    addrs.sort_unstable();
    let joined = addrs.join("+");

    let mut ports = BTreeMap::new();
    for p in &dev.ports {
        ports.insert(p.id.clone(), joined.clone());
    }

    Ok(ResolvedDevice {
        id: dev.id.clone(),
        name: node.name.clone(),
        vendor,
        hardware_model: node.node_type.to_string(),
        software_version: node.node_type.to_string(),
        ports,
    })
}

fn assigned_node<'a>(
    dev: &DeviceSpec,
    assignment: &Assignment,
    topo: &'a Topology,
) -> &'a Node {
    let name = assignment
        .node_for(&dev.id)
        .expect("solver assigned every device");
    topo.node(name).expect("assigned node exists in topology")
}

fn dims(
    dev: &DeviceSpec,
    node: &Node,
    assignment: &Assignment,
) -> Result<ResolvedDevice, ResolveError> {
    let vendor = node
        .node_type
        .vendor()
        .ok_or(ResolveError::UnknownVendor(node.node_type))?;
    let mut ports = BTreeMap::new();
    for p in &dev.ports {
        let iface = assignment
            .interface_for(&dev.id, &p.id)
            .expect("solver assigned every port");
        ports.insert(p.id.clone(), iface.to_string());
    }
    Ok(ResolvedDevice {
        id: dev.id.clone(),
        name: node.name.clone(),
        vendor,
        hardware_model: node.node_type.to_string(),
        software_version: node.node_type.to_string(),
        ports,
    })
}

fn gnmi_addr(node: &Node) -> Result<String, ResolveError> {
    let svc = node
        .service("gnmi")
        .ok_or_else(|| ResolveError::NoGnmiService(node.name.clone()))?;
    Ok(format!("{}:{}", svc.outside_address, svc.outside))
}
