// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Basic info response (`/common/basic_info`).

use crate::response::RawRecord;

/// Firmware and identity metadata of the appliance.
///
/// # Examples
///
/// ```
/// use daikin_purifier::response::{BasicInfo, RawRecord};
///
/// let info = BasicInfo::new(RawRecord::decode("ret=OK,ver=1_2_3,name=%4c%69%76%69%6e%67"));
/// assert_eq!(info.version(), Some("1_2_3"));
/// assert_eq!(info.firmware_revision().as_deref(), Some("1.2.3"));
/// assert_eq!(info.name().as_deref(), Some("Living"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicInfo {
    record: RawRecord,
}

impl BasicInfo {
    /// Wraps a decoded basic info record.
    #[must_use]
    pub fn new(record: RawRecord) -> Self {
        Self { record }
    }

    /// Returns the `ret` status field.
    #[must_use]
    pub fn ret(&self) -> Option<&str> {
        self.record.get("ret")
    }

    /// Returns the raw firmware version, e.g. `1_2_3`.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.record.get("ver")
    }

    /// Returns the firmware version with `_` replaced by `.`.
    #[must_use]
    pub fn firmware_revision(&self) -> Option<String> {
        self.version().map(|v| v.replace('_', "."))
    }

    /// Returns the adapter MAC address.
    #[must_use]
    pub fn mac(&self) -> Option<&str> {
        self.record.get("mac")
    }

    /// Returns the user-assigned name, percent-decoded.
    ///
    /// Falls back to the raw value if it is not valid percent-encoded UTF-8.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        let raw = self.record.get("name")?;
        Some(urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |v| v.into_owned()))
    }

    /// Returns the underlying record.
    #[must_use]
    pub fn raw(&self) -> &RawRecord {
        &self.record
    }
}
