// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Testbed resolution: mapping a logical testbed specification onto the
//! nodes, interfaces and management services of a concrete topology.

pub mod error;
pub mod reservation;
pub mod resolve;
pub mod solve;
pub mod source;
pub mod spec;
pub mod topology;

pub use error::{ResolveError, SourceError};
pub use reservation::{Reservation, ResolvedDevice};
pub use resolve::{resolve, Resolution};
pub use source::TopologySource;
pub use spec::TestbedSpec;
pub use topology::{Topology, Vendor};

#[cfg(test)]
pub(crate) fn test_logger() -> slog::Logger {
    use slog::Drain;
    let drain = slog_bunyan::new(std::io::stdout()).build().fuse();
    let drain = slog_async::Async::new(drain)
        .chan_size(0x8000)
        .build()
        .fuse();
    slog::Logger::root(drain, slog::o!())
}
