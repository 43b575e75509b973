// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scripted in-memory transport for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::ProtocolError;
use crate::protocol::Protocol;
use crate::response::RawRecord;

#[derive(Debug, Default)]
struct Script {
    bodies: HashMap<String, String>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    requests: Vec<String>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Answers each endpoint with a fixed body and records every request.
///
/// Clones share the same script, so a test can keep one clone for
/// inspection after handing another to a purifier.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockProtocol {
    script: Arc<Mutex<Script>>,
}

impl MockProtocol {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_body(self, endpoint: &str, body: &str) -> Self {
        self.set_body(endpoint, body);
        self
    }

    pub(crate) fn set_body(&self, endpoint: &str, body: &str) {
        self.script
            .lock()
            .bodies
            .insert(endpoint.to_string(), body.to_string());
    }

    /// Makes requests to `endpoint` fail as if they timed out.
    pub(crate) fn fail(&self, endpoint: &str) {
        self.script.lock().failing.insert(endpoint.to_string());
    }

    /// Makes requests to `endpoint` answer only after `delay`.
    pub(crate) fn delay(&self, endpoint: &str, delay: Duration) {
        self.script
            .lock()
            .delays
            .insert(endpoint.to_string(), delay);
    }

    /// Returns the highest number of requests that were pending at once.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.script.lock().max_in_flight
    }

    pub(crate) fn recover(&self, endpoint: &str) {
        self.script.lock().failing.remove(endpoint);
    }

    /// Returns every requested path, query string included.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.script.lock().requests.clone()
    }

    /// Returns how many requests hit `endpoint`.
    pub(crate) fn count(&self, endpoint: &str) -> usize {
        self.script
            .lock()
            .requests
            .iter()
            .filter(|path| endpoint_of(path) == endpoint)
            .count()
    }
}

fn endpoint_of(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

impl Protocol for MockProtocol {
    async fn get(&self, path: &str) -> Result<RawRecord, ProtocolError> {
        let endpoint = endpoint_of(path).to_string();
        let delay = {
            let mut script = self.script.lock();
            script.requests.push(path.to_string());
            script.in_flight += 1;
            script.max_in_flight = script.max_in_flight.max(script.in_flight);
            script.delays.get(&endpoint).copied()
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        // Body and failure are read on completion, so a test can change them
        // while a request is pending.
        let mut script = self.script.lock();
        script.in_flight -= 1;
        if script.failing.contains(&endpoint) {
            return Err(ProtocolError::Timeout(10_000));
        }
        let body = script.bodies.get(&endpoint).cloned().unwrap_or_default();
        Ok(RawRecord::decode(&body))
    }
}
