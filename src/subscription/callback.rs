// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for purifier state subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::Error;
use crate::state::{PurifierState, StateChange};
use crate::types::{Active, CurrentState, TargetMode};

/// Unique identifier for a subscription.
///
/// IDs are unique within a purifier's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type ActiveCallback = Arc<dyn Fn(Active) + Send + Sync>;
type CurrentStateCallback = Arc<dyn Fn(CurrentState) + Send + Sync>;
type TargetModeCallback = Arc<dyn Fn(TargetMode) + Send + Sync>;
type StatePolledCallback = Arc<dyn Fn(&PurifierState) + Send + Sync>;
type PollFailedCallback = Arc<dyn Fn(&Error) + Send + Sync>;
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry for purifier subscription callbacks.
///
/// This is how state reaches the presentation layer: every poll pushes all
/// three properties, whether or not they changed, and successful writes push
/// the values they imply.
///
/// Callbacks run synchronously on the dispatching task while a read lock is
/// held, so they must not subscribe or unsubscribe from within.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    active_callbacks: RwLock<HashMap<SubscriptionId, ActiveCallback>>,
    current_state_callbacks: RwLock<HashMap<SubscriptionId, CurrentStateCallback>>,
    target_mode_callbacks: RwLock<HashMap<SubscriptionId, TargetModeCallback>>,
    state_polled_callbacks: RwLock<HashMap<SubscriptionId, StatePolledCallback>>,
    poll_failed_callbacks: RwLock<HashMap<SubscriptionId, PollFailedCallback>>,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            active_callbacks: RwLock::new(HashMap::new()),
            current_state_callbacks: RwLock::new(HashMap::new()),
            target_mode_callbacks: RwLock::new(HashMap::new()),
            state_polled_callbacks: RwLock::new(HashMap::new()),
            poll_failed_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for power state updates.
    pub fn on_active_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Active) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.active_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for operating state updates.
    pub fn on_current_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(CurrentState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.current_state_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for target mode updates.
    pub fn on_target_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(TargetMode) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.target_mode_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback receiving the full state after every poll.
    pub fn on_state_polled<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PurifierState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_polled_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for failed poll cycles.
    pub fn on_poll_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.poll_failed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback receiving every dispatched change.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.active_callbacks.write().remove(&id).is_some()
            || self.current_state_callbacks.write().remove(&id).is_some()
            || self.target_mode_callbacks.write().remove(&id).is_some()
            || self.state_polled_callbacks.write().remove(&id).is_some()
            || self.poll_failed_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.active_callbacks.write().clear();
        self.current_state_callbacks.write().clear();
        self.target_mode_callbacks.write().clear();
        self.state_polled_callbacks.write().clear();
        self.poll_failed_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a state change to the matching callbacks.
    pub fn dispatch(&self, change: &StateChange) {
        {
            let callbacks = self.state_changed_callbacks.read();
            for callback in callbacks.values() {
                callback(change);
            }
        }

        match change {
            StateChange::Active(active) => {
                let callbacks = self.active_callbacks.read();
                for callback in callbacks.values() {
                    callback(*active);
                }
            }
            StateChange::CurrentState(current) => {
                let callbacks = self.current_state_callbacks.read();
                for callback in callbacks.values() {
                    callback(*current);
                }
            }
            StateChange::TargetMode(mode) => {
                let callbacks = self.target_mode_callbacks.read();
                for callback in callbacks.values() {
                    callback(*mode);
                }
            }
            StateChange::Batch(changes) => {
                for nested_change in changes {
                    self.dispatch(nested_change);
                }
            }
        }
    }

    /// Dispatches the outcome of a successful poll.
    ///
    /// Every known property is pushed individually, then the full snapshot.
    pub fn dispatch_polled(&self, state: &PurifierState) {
        for change in state.to_state_changes() {
            self.dispatch(&change);
        }
        let callbacks = self.state_polled_callbacks.read();
        for callback in callbacks.values() {
            callback(state);
        }
    }

    /// Dispatches a failed poll cycle.
    pub fn dispatch_poll_failed(&self, error: &Error) {
        let callbacks = self.poll_failed_callbacks.read();
        for callback in callbacks.values() {
            callback(error);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.active_callbacks.read().len()
            + self.current_state_callbacks.read().len()
            + self.target_mode_callbacks.read().len()
            + self.state_polled_callbacks.read().len()
            + self.poll_failed_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
