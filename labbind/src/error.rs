// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#[derive(thiserror::Error, Debug)]
pub enum BindError {
    #[error("no live reservation")]
    NotReserved,

    #[error("a reservation is already live")]
    AlreadyReserved,

    #[error("unknown device: {0}")]
    UnknownDevice(String),

    #[error("no gnmi address recorded for device {0}")]
    NoGnmiAddr(String),

    #[error("operation not supported by this binding: {0}")]
    Unsupported(&'static str),

    /// Errors from the external transport collaborator, propagated
    /// unchanged.
    #[error("transport: {0}")]
    Transport(String),

    #[error(transparent)]
    Source(#[from] testbed::SourceError),

    #[error(transparent)]
    Resolve(#[from] testbed::ResolveError),

    #[error(transparent)]
    Config(#[from] confgen::ConfigError),
}
