// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response decoding for the appliance's `key=value` bodies.
//!
//! Every endpoint answers with a [`RawRecord`]. The typed views in this
//! module wrap the records of specific endpoints and add named accessors for
//! the fields this library interprets, while keeping the raw record reachable
//! for anything else.

mod basic_info;
mod control_info;
mod record;
mod unit_info;

pub use basic_info::BasicInfo;
pub use control_info::{ControlInfo, field};
pub use record::RawRecord;
pub use unit_info::UnitInfo;
