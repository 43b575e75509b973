// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.

use crate::types::{Active, CurrentState, TargetMode};

/// A change to one semantic property of the purifier.
///
/// Changes come from polls and from successful writes, and are what
/// subscribers receive.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Power state.
    Active(Active),

    /// Operating state.
    CurrentState(CurrentState),

    /// Target mode.
    TargetMode(TargetMode),

    /// Multiple changes at once.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a power state change.
    #[must_use]
    pub fn active(active: Active) -> Self {
        Self::Active(active)
    }

    /// Creates an operating state change.
    #[must_use]
    pub fn current_state(state: CurrentState) -> Self {
        Self::CurrentState(state)
    }

    /// Creates a target mode change.
    #[must_use]
    pub fn target_mode(mode: TargetMode) -> Self {
        Self::TargetMode(mode)
    }

    /// Returns `true` for [`StateChange::Batch`].
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }
}
