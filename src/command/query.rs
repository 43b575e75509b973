// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only info queries.

use std::fmt;

use super::Command;

/// Read requests for appliance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoQuery {
    /// Firmware and identity metadata. Rarely changes.
    BasicInfo,
    /// Current operating state with nested control and sensor records.
    UnitInfo,
}

impl Command for InfoQuery {
    fn endpoint(&self) -> &'static str {
        match self {
            Self::BasicInfo => "/common/basic_info",
            Self::UnitInfo => "/cleaner/get_unit_info",
        }
    }

    fn query(&self) -> Option<String> {
        None
    }
}

impl fmt::Display for InfoQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}
