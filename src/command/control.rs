// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control writes (`/cleaner/set_control_info`).

use super::Command;
use crate::response::{ControlInfo, RawRecord, field};
use crate::types::{Active, TargetMode};

/// A write of control fields.
///
/// Fields are sent in insertion order. Setting a field that is already
/// present replaces its value in place.
///
/// The appliance expects the full control record on every mode change, so
/// [`ControlCommand::target_mode`] starts from the current `ctrl_info` and
/// only overrides `mode` and `airvol`.
///
/// # Examples
///
/// ```
/// use daikin_purifier::command::{Command, ControlCommand};
/// use daikin_purifier::response::{ControlInfo, RawRecord};
/// use daikin_purifier::types::TargetMode;
///
/// let current = ControlInfo::new(RawRecord::decode("pow=1,mode=0,airvol=3,humd=0"));
/// let cmd = ControlCommand::target_mode(&current, TargetMode::Auto);
/// assert_eq!(cmd.query().unwrap(), "pow=1&mode=1&airvol=0&humd=0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlCommand {
    fields: RawRecord,
}

impl ControlCommand {
    /// Creates an empty control write.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a write that switches the purifier on or off.
    #[must_use]
    pub fn power(active: Active) -> Self {
        Self::new().with(field::POWER, active.pow())
    }

    /// Creates a write that re-sends `current` with a new operating mode and
    /// the manual fan speed cleared.
    #[must_use]
    pub fn target_mode(current: &ControlInfo, mode: TargetMode) -> Self {
        Self::from_record(current.raw().clone())
            .with(field::MODE, mode.mode())
            .with(field::AIR_VOLUME, 0)
    }

    /// Creates a write carrying every field of `record`.
    #[must_use]
    pub fn from_record(fields: RawRecord) -> Self {
        Self { fields }
    }

    /// Sets a field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.insert(key, value.to_string());
        self
    }

    /// Returns the fields to be written.
    #[must_use]
    pub fn fields(&self) -> &RawRecord {
        &self.fields
    }
}

impl Command for ControlCommand {
    fn endpoint(&self) -> &'static str {
        "/cleaner/set_control_info"
    }

    fn query(&self) -> Option<String> {
        let query = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        Some(query)
    }
}
