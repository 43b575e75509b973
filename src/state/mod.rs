// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Purifier state tracking.
//!
//! [`PurifierState`] holds the last published semantic state, and
//! [`StateChange`] is a single update to it.
//!
//! # Examples
//!
//! ```
//! use daikin_purifier::state::{PurifierState, StateChange};
//! use daikin_purifier::types::TargetMode;
//!
//! let mut state = PurifierState::new();
//! state.apply(&StateChange::TargetMode(TargetMode::Auto));
//! assert_eq!(state.target_mode(), Some(TargetMode::Auto));
//! ```

mod purifier_state;
mod state_change;

pub use purifier_state::PurifierState;
pub use state_change::StateChange;
