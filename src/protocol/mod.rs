// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport for talking to the appliance.
//!
//! The appliance speaks plain, unauthenticated HTTP. [`HttpClient`] is the
//! production implementation of [`Protocol`]; the trait exists so the
//! caching and translation logic in [`Purifier`](crate::Purifier) can run
//! against any transport that yields decoded records.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::{HttpClient, HttpConfig};

use std::future::Future;

use crate::command::Command;
use crate::error::ProtocolError;
use crate::response::RawRecord;

/// Trait for transports that can send requests to the appliance.
///
/// Returned futures are `Send` so a purifier can be polled from a spawned
/// task.
pub trait Protocol: Send + Sync {
    /// Issues a `GET` for `path` and decodes the body.
    ///
    /// # Arguments
    ///
    /// * `path` - The request path including any query string
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport failure or timeout. A malformed
    /// body is not an error.
    fn get(&self, path: &str) -> impl Future<Output = Result<RawRecord, ProtocolError>> + Send;

    /// Sends a typed command.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails.
    fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> impl Future<Output = Result<RawRecord, ProtocolError>> + Send {
        let path = command.path();
        async move { self.get(&path).await }
    }
}
