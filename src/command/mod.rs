// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Requests understood by the appliance.
//!
//! Every request is a plain HTTP `GET`. Reads have no query string, writes
//! carry their fields as `key=value` pairs joined by `&`.
//!
//! | Command | Endpoint |
//! |---------|----------|
//! | [`InfoQuery::BasicInfo`] | `/common/basic_info` |
//! | [`InfoQuery::UnitInfo`] | `/cleaner/get_unit_info` |
//! | [`ControlCommand`] | `/cleaner/set_control_info?k=v&...` |
//!
//! # Examples
//!
//! ```
//! use daikin_purifier::command::{Command, ControlCommand, InfoQuery};
//! use daikin_purifier::types::Active;
//!
//! assert_eq!(InfoQuery::UnitInfo.path(), "/cleaner/get_unit_info");
//!
//! let cmd = ControlCommand::power(Active::Active);
//! assert_eq!(cmd.path(), "/cleaner/set_control_info?pow=1");
//! ```

mod control;
mod query;

pub use control::ControlCommand;
pub use query::InfoQuery;

/// A request that can be sent to the appliance.
pub trait Command {
    /// Returns the endpoint path without query string.
    fn endpoint(&self) -> &'static str;

    /// Returns the encoded query string, if any.
    fn query(&self) -> Option<String>;

    /// Returns the full request path.
    fn path(&self) -> String {
        match self.query() {
            Some(q) => format!("{}?{q}", self.endpoint()),
            None => self.endpoint().to_string(),
        }
    }
}
