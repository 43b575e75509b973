// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `daikin_purifier` library.
//!
//! Malformed response bodies are not errors: the decoder degrades them to a
//! smaller record. Rejected writes are not errors either, they are reported
//! as `Ok(false)` by the setters. What remains is transport failures and
//! invalid configuration.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while talking to the appliance.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The supplied configuration is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The poll loop is already running for this purifier.
    #[error("poll loop is already running")]
    AlreadyPolling,
}

/// Errors related to HTTP communication with the appliance.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request did not complete within the configured deadline.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to the purifier configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The host supplied configuration is not valid JSON for this accessory.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field has an unusable value.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// The offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
