// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background poll loop.

use std::sync::{Arc, Weak};

use tokio::task::JoinHandle;

use super::{Inner, Purifier};
use crate::protocol::Protocol;

/// Spawns the poll loop for `inner`.
///
/// The task only holds a weak reference between cycles, so it exits once
/// every purifier handle is gone. The next sleep starts after the previous
/// cycle returns, so cycles never overlap.
pub(super) fn spawn<P: Protocol + 'static>(inner: &Arc<Inner<P>>) -> JoinHandle<()> {
    let weak = Arc::downgrade(inner);
    let interval = inner.refresh_interval;

    tokio::spawn(async move {
        tracing::debug!("Poll loop started");
        loop {
            tokio::time::sleep(interval).await;
            if !run_cycle(&weak).await {
                break;
            }
        }
        tracing::debug!("Poll loop stopped");
    })
}

/// Runs one cycle. Returns `false` once the purifier has been dropped.
///
/// Failures end here: they are logged and dispatched, and the caller always
/// schedules the next cycle.
async fn run_cycle<P: Protocol + 'static>(weak: &Weak<Inner<P>>) -> bool {
    let Some(inner) = weak.upgrade() else {
        return false;
    };
    let purifier = Purifier { inner };

    if let Err(e) = purifier.poll_once().await {
        tracing::warn!(error = %e, "Poll cycle failed");
        purifier.inner.callbacks.dispatch_poll_failed(&e);
    }
    true
}
