// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control settings nested in the unit info response.

use crate::response::RawRecord;
use crate::types::{Active, CurrentState, TargetMode};

/// Field names of the control record.
pub mod field {
    /// Power flag, `1` when on.
    pub const POWER: &str = "pow";
    /// Operating mode, `1` for the automatic program.
    pub const MODE: &str = "mode";
    /// Manual fan speed override, `0` when cleared.
    pub const AIR_VOLUME: &str = "airvol";
}

/// Typed view over the `ctrl_info` record.
///
/// Every field the appliance sent is kept, including ones without an accessor,
/// because a control write must echo them back.
///
/// # Examples
///
/// ```
/// use daikin_purifier::response::{ControlInfo, RawRecord};
/// use daikin_purifier::types::{Active, TargetMode};
///
/// let info = ControlInfo::new(RawRecord::decode("pow=1,mode=1,airvol=0,humd=0"));
/// assert_eq!(info.active(), Active::Active);
/// assert_eq!(info.target_mode(), TargetMode::Auto);
/// assert_eq!(info.raw().get("humd"), Some("0"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlInfo {
    record: RawRecord,
}

impl ControlInfo {
    /// Wraps a decoded control record.
    #[must_use]
    pub fn new(record: RawRecord) -> Self {
        Self { record }
    }

    /// Returns the raw `pow` value as a number.
    #[must_use]
    pub fn power(&self) -> Option<i64> {
        self.record.get_number(field::POWER)
    }

    /// Returns the raw `mode` value as a number.
    #[must_use]
    pub fn mode(&self) -> Option<i64> {
        self.record.get_number(field::MODE)
    }

    /// Returns the raw `airvol` value as a number.
    #[must_use]
    pub fn air_volume(&self) -> Option<i64> {
        self.record.get_number(field::AIR_VOLUME)
    }

    /// Returns whether the purifier is on.
    #[must_use]
    pub fn active(&self) -> Active {
        Active::from_pow(self.power())
    }

    /// Returns what the purifier is doing.
    #[must_use]
    pub fn current_state(&self) -> CurrentState {
        self.active().current_state()
    }

    /// Returns the operating mode, regardless of power.
    #[must_use]
    pub fn target_mode(&self) -> TargetMode {
        TargetMode::from_mode(self.mode())
    }

    /// Returns the underlying record.
    #[must_use]
    pub fn raw(&self) -> &RawRecord {
        &self.record
    }
}
