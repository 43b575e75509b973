// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for the appliance.

use std::net::Ipv6Addr;
use std::time::Duration;

use reqwest::Client;

use crate::error::ProtocolError;
use crate::protocol::Protocol;
use crate::response::RawRecord;

// ============================================================================
// HttpConfig - Connection parameters
// ============================================================================

/// Configuration for reaching the appliance over HTTP.
///
/// The appliance has no authentication and no TLS, so this only carries the
/// address and a request deadline.
///
/// # Examples
///
/// ```
/// use daikin_purifier::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.40")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://192.168.1.40:8080");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    timeout: Duration,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new HTTP configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the appliance. A `host:port`
    ///   value is used verbatim.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the per-request deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    ///
    /// A bare IPv6 literal is bracketed. The port is appended only when it is
    /// not the default and the host does not already name one.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self
            .host
            .strip_prefix("http://")
            .unwrap_or(&self.host)
            .trim_end_matches('/');
        let host = match host.parse::<Ipv6Addr>() {
            Ok(addr) => format!("[{addr}]"),
            Err(_) => host.to_string(),
        };
        // `host:port` and `[v6]:port` already carry their port.
        let has_port = match host.rfind(']') {
            Some(end) => host[end..].contains(':'),
            None => host.contains(':'),
        };
        if self.port == Self::DEFAULT_PORT || has_port {
            format!("http://{host}")
        } else {
            format!("http://{host}:{}", self.port)
        }
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "host is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url(),
            client,
            timeout: self.timeout,
        })
    }
}

// ============================================================================
// HttpClient - Request execution
// ============================================================================

/// HTTP client for the appliance's local API.
///
/// Each call is an independent `GET`. The full body is read and decoded into
/// a [`RawRecord`]. The status code is not interpreted: the appliance reports
/// failures in the body through its `ret` field.
///
/// # Examples
///
/// ```no_run
/// use daikin_purifier::command::InfoQuery;
/// use daikin_purifier::protocol::{HttpClient, Protocol};
///
/// # async fn example() -> daikin_purifier::Result<()> {
/// let client = HttpClient::new("192.168.1.40")?;
/// let info = client.send_command(&InfoQuery::BasicInfo).await?;
/// println!("firmware {:?}", info.get("ver"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client for the specified host with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        HttpConfig::new(host).into_client()
    }

    /// Returns the base URL of the appliance.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn map_error(&self, error: reqwest::Error) -> ProtocolError {
        if error.is_timeout() {
            ProtocolError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else {
            ProtocolError::Http(error)
        }
    }
}

impl Protocol for HttpClient {
    async fn get(&self, path: &str) -> Result<RawRecord, ProtocolError> {
        let url = self.build_url(path);

        tracing::debug!(url = %url, "Sending HTTP request");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Request error");
                return Err(self.map_error(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                path = %path,
                status = status.as_u16(),
                "Appliance answered with non-success status"
            );
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!(path = %path, error = %e, "Failed to read response body");
            self.map_error(e)
        })?;

        tracing::debug!(path = %path, body = %body, "Received HTTP response");

        Ok(RawRecord::decode(&body))
    }
}
