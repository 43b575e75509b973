// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last known semantic state of the purifier.

use crate::response::UnitInfo;
use crate::types::{Active, CurrentState, TargetMode};

use super::StateChange;

/// Semantic state of the purifier as last published.
///
/// All fields are optional because nothing is known until the first poll or
/// successful write.
///
/// # Examples
///
/// ```
/// use daikin_purifier::state::{PurifierState, StateChange};
/// use daikin_purifier::types::{Active, CurrentState};
///
/// let mut state = PurifierState::new();
/// assert!(state.apply(&StateChange::Active(Active::Active)));
/// assert_eq!(state.active(), Some(Active::Active));
/// assert_eq!(state.current_state(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PurifierState {
    active: Option<Active>,
    current_state: Option<CurrentState>,
    target_mode: Option<TargetMode>,
}

impl PurifierState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the state published by a poll.
    ///
    /// Target mode is read from `ctrl_info.mode` alone, whatever the power
    /// state. The on-demand read in
    /// [`Purifier::target_state`](crate::Purifier::target_state) differs for
    /// an inactive purifier.
    #[must_use]
    pub fn from_unit_info(info: &UnitInfo) -> Self {
        let ctrl = info.ctrl_info();
        Self {
            active: Some(ctrl.active()),
            current_state: Some(ctrl.current_state()),
            target_mode: Some(ctrl.target_mode()),
        }
    }

    /// Returns the power state.
    #[must_use]
    pub fn active(&self) -> Option<Active> {
        self.active
    }

    /// Returns the operating state.
    #[must_use]
    pub fn current_state(&self) -> Option<CurrentState> {
        self.current_state
    }

    /// Returns the target mode.
    #[must_use]
    pub fn target_mode(&self) -> Option<TargetMode> {
        self.target_mode
    }

    /// Returns `true` if nothing is known yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.current_state.is_none() && self.target_mode.is_none()
    }

    /// Applies a change. Returns `true` if the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Active(active) => replace(&mut self.active, *active),
            StateChange::CurrentState(current) => replace(&mut self.current_state, *current),
            StateChange::TargetMode(mode) => replace(&mut self.target_mode, *mode),
            StateChange::Batch(changes) => changes
                .iter()
                .fold(false, |changed, nested| self.apply(nested) || changed),
        }
    }

    /// Lists the known fields as individual changes.
    #[must_use]
    pub fn to_state_changes(&self) -> Vec<StateChange> {
        let mut changes = Vec::with_capacity(3);
        if let Some(active) = self.active {
            changes.push(StateChange::Active(active));
        }
        if let Some(current) = self.current_state {
            changes.push(StateChange::CurrentState(current));
        }
        if let Some(mode) = self.target_mode {
            changes.push(StateChange::TargetMode(mode));
        }
        changes
    }
}

fn replace<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        false
    } else {
        *slot = Some(value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::RawRecord;

    fn unit_info(ctrl: &str) -> UnitInfo {
        let encoded = urlencoding::encode(ctrl);
        UnitInfo::from_record(RawRecord::decode(&format!("ret=OK,ctrl_info={encoded}")))
    }

    #[test]
    fn from_unit_info_active_auto() {
        let state = PurifierState::from_unit_info(&unit_info("pow=1,mode=1"));
        assert_eq!(state.active(), Some(Active::Active));
        assert_eq!(state.current_state(), Some(CurrentState::PurifyingAir));
        assert_eq!(state.target_mode(), Some(TargetMode::Auto));
    }

    #[test]
    fn from_unit_info_inactive_keeps_mode() {
        let state = PurifierState::from_unit_info(&unit_info("pow=0,mode=1"));
        assert_eq!(state.active(), Some(Active::Inactive));
        assert_eq!(state.current_state(), Some(CurrentState::Inactive));
        assert_eq!(state.target_mode(), Some(TargetMode::Auto));
    }

    #[test]
    fn apply_same_value_reports_no_change() {
        let mut state = PurifierState::new();
        assert!(state.apply(&StateChange::TargetMode(TargetMode::Manual)));
        assert!(!state.apply(&StateChange::TargetMode(TargetMode::Manual)));
    }

    #[test]
    fn apply_batch() {
        let mut state = PurifierState::new();
        let batch = StateChange::Batch(vec![
            StateChange::Active(Active::Active),
            StateChange::CurrentState(CurrentState::PurifyingAir),
        ]);
        assert!(state.apply(&batch));
        assert!(!state.apply(&batch));
        assert_eq!(state.current_state(), Some(CurrentState::PurifyingAir));
    }

    #[test]
    fn to_state_changes_lists_known_fields() {
        let state = PurifierState::from_unit_info(&unit_info("pow=1,mode=0"));
        assert_eq!(
            state.to_state_changes(),
            vec![
                StateChange::Active(Active::Active),
                StateChange::CurrentState(CurrentState::PurifyingAir),
                StateChange::TargetMode(TargetMode::Manual),
            ]
        );
        assert!(PurifierState::new().to_state_changes().is_empty());
        assert!(PurifierState::new().is_empty());
    }
}
