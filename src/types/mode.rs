// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating mode of the purifier.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Target operating mode.
///
/// The appliance `mode` field is `1` for its fully automatic program; every
/// other value is treated as manual.
///
/// # Examples
///
/// ```
/// use daikin_purifier::types::TargetMode;
///
/// assert_eq!(TargetMode::from_mode(Some(1)), TargetMode::Auto);
/// assert_eq!(TargetMode::from_mode(Some(3)), TargetMode::Manual);
/// assert_eq!(TargetMode::Auto.mode(), 1);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// Manual operation.
    #[default]
    Manual,
    /// Automatic operation.
    Auto,
}

impl TargetMode {
    /// Interprets the appliance `mode` field.
    #[must_use]
    pub const fn from_mode(mode: Option<i64>) -> Self {
        match mode {
            Some(1) => Self::Auto,
            _ => Self::Manual,
        }
    }

    /// Returns the value written to the appliance `mode` field.
    #[must_use]
    pub const fn mode(&self) -> u8 {
        match self {
            Self::Manual => 0,
            Self::Auto => 1,
        }
    }

    /// Returns the numeric code used by home-automation hosts.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        self.mode()
    }

    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" | "1" => Ok(Self::Auto),
            "manual" | "0" => Ok(Self::Manual),
            _ => Err(ConfigError::InvalidValue {
                field: "mode",
                message: format!("unknown target mode {s:?}"),
            }),
        }
    }
}
