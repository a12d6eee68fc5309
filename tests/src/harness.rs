// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::test_logger;
use confgen::{ConfigError, ConfigSpec};
use labbind::fake::{fake_reservation, FakeBinding};
use labbind::{
    BindError, Binding, Credentials, Proto, Session, TopoBinding,
};
use pb_common::poll::wait_for;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use testbed::source::StaticSource;
use testbed::spec::{DeviceSpec, LinkSpec, PortRef, PortSpec};
use testbed::topology::{
    Endpoint, Interface, Node, NodeType, Service, TopoLink, Topology,
};
use testbed::{TestbedSpec, Vendor};

fn gnmi_service(outside_address: &str) -> Service {
    Service {
        name: "gnmi".into(),
        inside: 6030,
        outside: 9339,
        outside_address: outside_address.into(),
    }
}

/// Two DUTs and a traffic generator wired so the link structure pins each
/// logical device to exactly one node.
fn topo() -> Topology {
    Topology {
        name: "lab".into(),
        namespace: "lab-1".into(),
        nodes: vec![
            Node {
                name: "ceos0".into(),
                node_type: NodeType::AristaCeos,
                services: vec![gnmi_service("192.0.2.10")],
                interfaces: vec![
                    Interface { name: "Et1/2/3".into() },
                    Interface { name: "Et4/5/6".into() },
                ],
            },
            Node {
                name: "csr0".into(),
                node_type: NodeType::CiscoCsr,
                services: vec![gnmi_service("192.0.2.11")],
                interfaces: vec![Interface { name: "Gi0/0/0/0".into() }],
            },
            Node {
                name: "ixia0".into(),
                node_type: NodeType::IxiaTg,
                services: vec![
                    Service {
                        name: "grpc".into(),
                        inside: 50071,
                        outside: 50071,
                        outside_address: "192.0.2.20".into(),
                    },
                    Service {
                        name: "port-5555".into(),
                        inside: 5555,
                        outside: 5555,
                        outside_address: "192.0.2.20".into(),
                    },
                ],
                interfaces: vec![Interface { name: "eth1".into() }],
            },
        ],
        links: vec![
            TopoLink {
                a: Endpoint {
                    node: "ceos0".into(),
                    interface: "Et1/2/3".into(),
                },
                b: Endpoint {
                    node: "ixia0".into(),
                    interface: "eth1".into(),
                },
            },
            TopoLink {
                a: Endpoint {
                    node: "ceos0".into(),
                    interface: "Et4/5/6".into(),
                },
                b: Endpoint {
                    node: "csr0".into(),
                    interface: "Gi0/0/0/0".into(),
                },
            },
        ],
    }
}

fn spec() -> TestbedSpec {
    TestbedSpec {
        duts: vec![
            DeviceSpec {
                id: "dut1".into(),
                ports: vec![
                    PortSpec { id: "port1".into() },
                    PortSpec { id: "port2".into() },
                ],
            },
            DeviceSpec {
                id: "dut2".into(),
                ports: vec![PortSpec { id: "port1".into() }],
            },
        ],
        otgs: vec![DeviceSpec {
            id: "otg1".into(),
            ports: vec![PortSpec { id: "port1".into() }],
        }],
        links: vec![
            LinkSpec {
                a: PortRef::new("dut1", "port1"),
                b: PortRef::new("otg1", "port1"),
            },
            LinkSpec {
                a: PortRef::new("dut1", "port2"),
                b: PortRef::new("dut2", "port1"),
            },
        ],
    }
}

fn topo_session() -> Session {
    let binding = TopoBinding::new(
        Box::new(StaticSource(topo())),
        Credentials {
            username: "admin".into(),
            password: "admin".into(),
        },
        test_logger(),
    );
    Session::new(Arc::new(binding), test_logger())
}

#[test]
fn test_reserve_through_topology_binding() {
    let session = topo_session();
    session.reserve(&spec()).unwrap();

    let dut1 = session.dut("dut1").unwrap();
    assert_eq!(dut1.name, "ceos0");
    assert_eq!(dut1.vendor, Vendor::Arista);
    assert_eq!(dut1.port("port1"), Some("Et1/2/3"));
    assert_eq!(dut1.port("port2"), Some("Et4/5/6"));

    let dut2 = session.dut("dut2").unwrap();
    assert_eq!(dut2.name, "csr0");
    assert_eq!(dut2.vendor, Vendor::Cisco);
    assert_eq!(dut2.port("port1"), Some("Gi0/0/0/0"));

    let otg = session.otg("otg1").unwrap();
    assert_eq!(otg.name, "ixia0");
    assert_eq!(
        otg.port("port1"),
        Some(
            "service-ixia0.lab-1.svc.cluster.local:50071\
             +service-ixia0.lab-1.svc.cluster.local:5555"
        )
    );

    session.release().unwrap();
    assert!(matches!(
        session.dut("dut1").unwrap_err(),
        BindError::NotReserved
    ));
}

#[test]
fn test_dial_gnmi_through_topology_binding() {
    let session = topo_session();
    session.reserve(&spec()).unwrap();

    let ch = session.dial_gnmi("dut1").unwrap();
    assert_eq!(ch.proto, Proto::Gnmi);
    assert_eq!(ch.target, "192.0.2.10:9339");
    assert_eq!(ch.metadata["username"], "admin");
    assert!(ch.tls_insecure);

    let ch = session.dial_gnmi("dut2").unwrap();
    assert_eq!(ch.target, "192.0.2.11:9339");
}

#[test]
fn test_dial_otg_through_topology_binding() {
    let session = topo_session();
    session.reserve(&spec()).unwrap();

    let server = "192.0.2.20:50071";
    let ch = session.dial_otg(server, true).unwrap();
    assert_eq!(ch.proto, Proto::Otg);
    assert_eq!(ch.target, server);

    let ch = session.dial_otg_gnmi(server).unwrap();
    assert_eq!(ch.proto, Proto::OtgGnmi);
}

fn fake_session() -> (Arc<FakeBinding>, Session) {
    let fake = Arc::new(FakeBinding::new(fake_reservation()));
    let session = Session::new(fake.clone(), test_logger());
    session.reserve(&TestbedSpec::default()).unwrap();
    (fake, session)
}

#[test]
fn test_render_and_push_end_to_end() {
    let (fake, session) = fake_session();
    let cfg = ConfigSpec::new()
        .with_arista_text(
            "interface {{ port \"port1\" }}\n description {{ var \"desc\" }}",
        )
        .with_var("desc", "uplink");
    session.push_config("dut", &cfg).unwrap();
    let (text, opts) = fake.last_push().unwrap();
    assert_eq!(text, "interface Et1/2/3\n description uplink");
    assert!(!opts.openconfig);
    assert!(!opts.append);
}

#[test]
fn test_vendor_precedence_per_device() {
    let (fake, session) = fake_session();
    let cfg = ConfigSpec::new()
        .with_arista_text("arista side")
        .with_cisco_text("cisco side");

    session.push_config("dut", &cfg).unwrap();
    assert_eq!(fake.last_push().unwrap().0, "arista side");

    session.push_config("dut_cisco", &cfg).unwrap();
    assert_eq!(fake.last_push().unwrap().0, "cisco side");
}

#[test]
fn test_push_without_vendor_config_fails() {
    let (fake, session) = fake_session();
    fake.reset();
    let cfg = ConfigSpec::new().with_cisco_text("cisco only");
    let err = session.push_config("dut", &cfg).unwrap_err();
    assert!(matches!(
        err,
        BindError::Config(ConfigError::NoVendorConfig(Vendor::Arista))
    ));
    assert!(fake.last_push().is_none());
}

#[test]
fn test_wait_for_push_observed() {
    let (fake, session) = fake_session();
    let worker = {
        let fake = fake.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            fake.push_config(
                &fake_reservation().duts["dut"],
                "ready",
                &Default::default(),
            )
        })
    };
    wait_for(
        Duration::from_millis(10),
        Duration::from_millis(500),
        || fake.last_push().is_some(),
    )
    .unwrap();
    worker.join().unwrap().unwrap();
    assert_eq!(fake.last_push().unwrap().0, "ready");
    session.release().unwrap();
}
