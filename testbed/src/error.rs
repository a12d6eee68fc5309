// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::topology::NodeType;

/// Failures fetching or parsing a topology from its source.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("topology command {program:?} failed: {stderr}")]
    Command { program: String, stderr: String },

    #[error("topology parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures mapping a testbed spec onto a topology. Every variant is fatal
/// to the whole resolve call; no partial reservation is ever returned.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("no known device vendor for node type: {0}")]
    UnknownVendor(NodeType),

    #[error("insufficient ports: no node exposes enough interfaces for device {0}")]
    InsufficientPorts(String),

    #[error("no gnmi service found on node: {0}")]
    NoGnmiService(String),

    #[error("no assignment satisfies the testbed; first unsatisfiable device: {0}")]
    NoAssignment(String),

    #[error("link references undeclared port {device}:{port}")]
    UnknownLink { device: String, port: String },

    #[error("duplicate device id: {0}")]
    DuplicateDevice(String),
}
