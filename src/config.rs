// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Purifier configuration.
//!
//! The configuration is normally handed over by the home-automation host as a
//! JSON object with camelCase keys:
//!
//! ```json
//! {
//!   "ip": "192.168.1.40",
//!   "refreshInterval": 10000,
//!   "name": "Bedroom purifier",
//!   "model": "MCK70Y",
//!   "serialNumber": "1234"
//! }
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::protocol::HttpConfig;

/// Manufacturer reported in accessory information.
pub const MANUFACTURER: &str = "DAIKIN INDUSTRIES, LTD.,";

/// Placeholder for display metadata that was not configured.
pub const PLACEHOLDER: &str = "-";

/// Configuration for a single purifier.
///
/// # Examples
///
/// ```
/// use daikin_purifier::PurifierConfig;
/// use std::time::Duration;
///
/// let config = PurifierConfig::from_json(r#"{"ip": "192.168.1.40", "refreshInterval": 5000}"#)
///     .unwrap();
/// assert_eq!(config.refresh_interval(), Duration::from_secs(5));
/// assert_eq!(config.accessory_info().name, "-");
///
/// let config = PurifierConfig::new("192.168.1.40").with_name("Bedroom");
/// assert_eq!(config.refresh_interval(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurifierConfig {
    ip: String,
    #[serde(default)]
    refresh_interval: Option<u64>,
    #[serde(default)]
    request_timeout: Option<u64>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    serial_number: Option<String>,
}

impl PurifierConfig {
    /// Default poll interval and unit info freshness window.
    pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(10_000);
    /// Default per-request deadline.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = HttpConfig::DEFAULT_TIMEOUT;

    /// Creates a configuration for the appliance at `ip`.
    #[must_use]
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            refresh_interval: None,
            request_timeout: None,
            model: None,
            name: None,
            serial_number: None,
        }
    }

    /// Parses the host supplied JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the JSON is malformed or lacks `ip`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Json)
    }

    /// Sets the poll interval. Sub-millisecond precision is dropped.
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(duration_millis(interval));
        self
    }

    /// Sets the per-request deadline. Sub-millisecond precision is dropped.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(duration_millis(timeout));
        self
    }

    /// Sets the display model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the display serial number.
    #[must_use]
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Returns the appliance address.
    #[must_use]
    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// Returns the poll interval.
    ///
    /// An unset or zero interval falls back to
    /// [`DEFAULT_REFRESH_INTERVAL`](Self::DEFAULT_REFRESH_INTERVAL).
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        match self.refresh_interval {
            Some(ms) if ms > 0 => Duration::from_millis(ms),
            _ => Self::DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Returns the per-request deadline.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
            .map_or(Self::DEFAULT_REQUEST_TIMEOUT, Duration::from_millis)
    }

    /// Returns the display metadata, with placeholders for unset fields.
    #[must_use]
    pub fn accessory_info(&self) -> AccessoryInfo {
        let or_placeholder = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or(PLACEHOLDER)
                .to_string()
        };
        AccessoryInfo {
            manufacturer: MANUFACTURER.to_string(),
            model: or_placeholder(&self.model),
            name: or_placeholder(&self.name),
            serial_number: or_placeholder(&self.serial_number),
        }
    }

    /// Checks the configuration for unusable values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if `ip` is empty and
    /// `ConfigError::InvalidValue` if the request timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ip.trim().is_empty() {
            return Err(ConfigError::MissingField("ip"));
        }
        if self.request_timeout == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "requestTimeout",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Derives the HTTP connection settings.
    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::new(self.ip.trim()).with_timeout(self.request_timeout())
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Static identity shown by the presentation layer.
///
/// The firmware revision is not part of this: it is fetched on demand through
/// [`Purifier::firmware_revision`](crate::Purifier::firmware_revision).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AccessoryInfo {
    /// Always [`MANUFACTURER`].
    pub manufacturer: String,
    /// Configured model or [`PLACEHOLDER`].
    pub model: String,
    /// Configured name or [`PLACEHOLDER`].
    pub name: String,
    /// Configured serial number or [`PLACEHOLDER`].
    pub serial_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_full() {
        let config = PurifierConfig::from_json(
            r#"{
                "accessory": "DaikinAirPurifier",
                "ip": "192.168.1.40",
                "refreshInterval": 30000,
                "requestTimeout": 2000,
                "model": "MCK70Y",
                "name": "Bedroom",
                "serialNumber": "SN-1"
            }"#,
        )
        .unwrap();

        assert_eq!(config.ip(), "192.168.1.40");
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
        let info = config.accessory_info();
        assert_eq!(info.manufacturer, "DAIKIN INDUSTRIES, LTD.,");
        assert_eq!(info.model, "MCK70Y");
        assert_eq!(info.name, "Bedroom");
        assert_eq!(info.serial_number, "SN-1");
    }

    #[test]
    fn from_json_minimal_uses_defaults() {
        let config = PurifierConfig::from_json(r#"{"ip": "10.0.0.5"}"#).unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_millis(10_000));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        let info = config.accessory_info();
        assert_eq!(info.model, "-");
        assert_eq!(info.name, "-");
        assert_eq!(info.serial_number, "-");
    }

    #[test]
    fn from_json_missing_ip() {
        let result = PurifierConfig::from_json(r#"{"name": "x"}"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn zero_refresh_interval_falls_back_to_default() {
        let config = PurifierConfig::from_json(r#"{"ip": "10.0.0.5", "refreshInterval": 0}"#)
            .unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_millis(10_000));
    }

    #[test]
    fn empty_display_values_use_placeholder() {
        let config = PurifierConfig::new("10.0.0.5").with_name("");
        assert_eq!(config.accessory_info().name, "-");
    }

    #[test]
    fn validate_rejects_empty_ip() {
        let result = PurifierConfig::new("  ").validate();
        assert!(matches!(result, Err(ConfigError::MissingField("ip"))));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let result = PurifierConfig::new("10.0.0.5")
            .with_request_timeout(Duration::ZERO)
            .validate();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn http_config_carries_timeout() {
        let http = PurifierConfig::new("10.0.0.5")
            .with_request_timeout(Duration::from_millis(1500))
            .http_config();
        assert_eq!(http.host(), "10.0.0.5");
        assert_eq!(http.timeout(), Duration::from_millis(1500));
    }
}
