// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use testbed::Vendor;

/// Failures building or rendering device configuration. Every variant
/// aborts the push before any transport call; nothing is partially applied.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("no configuration for vendor {0}")]
    NoVendorConfig(Vendor),

    #[error("template function {0:?} not defined")]
    UnknownDirective(String),

    #[error("template syntax error at offset {offset}: {detail}")]
    Syntax { offset: usize, detail: String },

    #[error("port {0} not found on device")]
    PortNotFound(String),

    #[error("no value for key {0:?}")]
    NoValueForKey(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
