// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Semantic value types for the purifier.
//!
//! These translate the appliance's raw numeric fields into the states a
//! home-automation host works with.
//!
//! # Types
//!
//! - [`Active`] - On/off, from the `pow` field
//! - [`CurrentState`] - Inactive or purifying, mirrors [`Active`]
//! - [`TargetMode`] - Auto or manual, from the `mode` field

mod mode;
mod power;

pub use mode::TargetMode;
pub use power::{Active, CurrentState};
