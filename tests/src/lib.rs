// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End to end tests for the harness: testbed resolution through the
//! topology binding, config rendering through a session, and the poll
//! helper under real time.

#[cfg(test)]
mod harness;

#[cfg(test)]
pub(crate) fn test_logger() -> slog::Logger {
    pb_common::log::build_logger(std::io::stdout())
}
