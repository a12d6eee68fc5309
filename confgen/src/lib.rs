// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vendor configuration generation: a per-push config spec builder and the
//! template engine that renders the text actually transmitted to a device.

pub mod error;
pub mod spec;
pub mod template;

pub use error::ConfigError;
pub use spec::{ConfigSource, ConfigSpec, Rendered};
