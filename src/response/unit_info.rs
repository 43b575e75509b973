// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit info response (`/cleaner/get_unit_info`).

use crate::response::{ControlInfo, RawRecord};

const CTRL_INFO: &str = "ctrl_info";
const SENSOR_INFO: &str = "sensor_info";
const UNIT_STATUS: &str = "unit_status";
const DEV_SETTING: &str = "dev_setting";

/// Current operating state of the appliance.
///
/// The outer record carries four percent-encoded sub-records which are
/// decoded eagerly. A sub-record that is missing or cannot be decoded is
/// empty.
///
/// # Examples
///
/// ```
/// use daikin_purifier::response::{RawRecord, UnitInfo};
///
/// let body = "ret=OK,ctrl_info=pow%3d1%2cmode%3d0,sensor_info=htemp%3d23";
/// let info = UnitInfo::from_record(RawRecord::decode(body));
/// assert_eq!(info.ctrl_info().power(), Some(1));
/// assert_eq!(info.sensor_info().get("htemp"), Some("23"));
/// assert!(info.unit_status().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitInfo {
    record: RawRecord,
    ctrl_info: ControlInfo,
    sensor_info: RawRecord,
    unit_status: RawRecord,
    dev_setting: RawRecord,
}

impl UnitInfo {
    /// Builds unit info from the decoded outer response record.
    #[must_use]
    pub fn from_record(record: RawRecord) -> Self {
        Self {
            ctrl_info: ControlInfo::new(RawRecord::decode_nested(record.get(CTRL_INFO))),
            sensor_info: RawRecord::decode_nested(record.get(SENSOR_INFO)),
            unit_status: RawRecord::decode_nested(record.get(UNIT_STATUS)),
            dev_setting: RawRecord::decode_nested(record.get(DEV_SETTING)),
            record,
        }
    }

    /// Returns the decoded control settings.
    #[must_use]
    pub fn ctrl_info(&self) -> &ControlInfo {
        &self.ctrl_info
    }

    /// Returns the decoded sensor readings.
    #[must_use]
    pub fn sensor_info(&self) -> &RawRecord {
        &self.sensor_info
    }

    /// Returns the decoded unit status.
    #[must_use]
    pub fn unit_status(&self) -> &RawRecord {
        &self.unit_status
    }

    /// Returns the decoded device settings.
    #[must_use]
    pub fn dev_setting(&self) -> &RawRecord {
        &self.dev_setting
    }

    /// Returns the outer record as received, nested fields still encoded.
    #[must_use]
    pub fn raw(&self) -> &RawRecord {
        &self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "ret=OK,\
        ctrl_info=ret%3dOK%2cpow%3d1%2cmode%3d1%2cairvol%3d0%2chumd%3d0,\
        sensor_info=ret%3dOK%2chtemp%3d22%2chhum%3d41%2cpm25%3d3,\
        unit_status=ret%3dOK%2cfilter%3d0,\
        dev_setting=ret%3dOK%2cled%3d1";

    #[test]
    fn decodes_all_nested_records() {
        let info = UnitInfo::from_record(RawRecord::decode(BODY));

        assert_eq!(info.ctrl_info().power(), Some(1));
        assert_eq!(info.ctrl_info().mode(), Some(1));
        assert_eq!(info.ctrl_info().raw().get("humd"), Some("0"));
        assert_eq!(info.sensor_info().get("pm25"), Some("3"));
        assert_eq!(info.unit_status().get("filter"), Some("0"));
        assert_eq!(info.dev_setting().get("led"), Some("1"));
        assert_eq!(info.raw().get("ret"), Some("OK"));
    }

    #[test]
    fn missing_nested_records_are_empty() {
        let info = UnitInfo::from_record(RawRecord::decode("ret=OK"));
        assert!(info.ctrl_info().raw().is_empty());
        assert!(info.sensor_info().is_empty());
        assert!(info.dev_setting().is_empty());
    }
}
