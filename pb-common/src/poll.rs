// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Condition polling with a fixed interval and a wall-clock deadline.

use std::time::{Duration, Instant};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("condition not met within {0:?}")]
pub struct TimeoutError(pub Duration);

/// Poll `cond` until it returns true or `timeout` of wall-clock time has
/// elapsed. The condition is checked immediately, then once per `interval`.
/// There is no backoff and no external cancellation; elapsed time alone ends
/// the wait.
pub fn wait_for<F>(
    interval: Duration,
    timeout: Duration,
    mut cond: F,
) -> Result<(), TimeoutError>
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    loop {
        if cond() {
            return Ok(());
        }
        std::thread::sleep(interval);
        if start.elapsed() >= timeout {
            return Err(TimeoutError(timeout));
        }
    }
}
