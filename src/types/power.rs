// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power-related types for the purifier.
//!
//! The appliance only exposes a single power flag (`pow`). [`Active`] is the
//! requested on/off state and [`CurrentState`] is what the purifier is doing,
//! which the appliance does not report separately and therefore mirrors
//! [`Active`].

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Whether the purifier is switched on.
///
/// # Examples
///
/// ```
/// use daikin_purifier::types::Active;
///
/// assert_eq!(Active::from_pow(Some(1)), Active::Active);
/// assert_eq!(Active::from_pow(Some(0)), Active::Inactive);
/// assert_eq!(Active::from_pow(None), Active::Inactive);
/// assert_eq!(Active::Active.pow(), 1);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Active {
    /// The purifier is off.
    #[default]
    Inactive,
    /// The purifier is on.
    Active,
}

impl Active {
    /// Interprets the appliance `pow` field. Only `1` means active.
    #[must_use]
    pub const fn from_pow(pow: Option<i64>) -> Self {
        match pow {
            Some(1) => Self::Active,
            _ => Self::Inactive,
        }
    }

    /// Returns the value written to the appliance `pow` field.
    #[must_use]
    pub const fn pow(&self) -> u8 {
        match self {
            Self::Inactive => 0,
            Self::Active => 1,
        }
    }

    /// Returns the numeric code used by home-automation hosts.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        self.pow()
    }

    /// Returns `true` for [`Active::Active`].
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns the operating state implied by this power state.
    #[must_use]
    pub const fn current_state(&self) -> CurrentState {
        match self {
            Self::Inactive => CurrentState::Inactive,
            Self::Active => CurrentState::PurifyingAir,
        }
    }

    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for Active {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for Active {
    fn from(value: bool) -> Self {
        if value { Self::Active } else { Self::Inactive }
    }
}

impl FromStr for Active {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" | "on" | "1" | "true" => Ok(Self::Active),
            "inactive" | "off" | "0" | "false" => Ok(Self::Inactive),
            _ => Err(ConfigError::InvalidValue {
                field: "active",
                message: format!("unknown power state {s:?}"),
            }),
        }
    }
}

/// What the purifier is currently doing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CurrentState {
    /// Not running.
    #[default]
    Inactive,
    /// Running and cleaning air.
    PurifyingAir,
}

impl CurrentState {
    /// Returns the numeric code used by home-automation hosts.
    ///
    /// Code `1` (idle) exists on hosts but is never produced: the appliance
    /// has no signal for it.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Inactive => 0,
            Self::PurifyingAir => 2,
        }
    }

    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::PurifyingAir => "purifying",
        }
    }
}

impl fmt::Display for CurrentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Active> for CurrentState {
    fn from(active: Active) -> Self {
        active.current_state()
    }
}
