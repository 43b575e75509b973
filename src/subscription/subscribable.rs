// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Trait for types that publish purifier state to subscribers.

use crate::error::Error;
use crate::state::{PurifierState, StateChange};
use crate::subscription::SubscriptionId;
use crate::types::{Active, CurrentState, TargetMode};

/// Trait for types that push state updates to a presentation layer.
///
/// # Examples
///
/// ```no_run
/// use daikin_purifier::{Purifier, PurifierConfig};
/// use daikin_purifier::subscription::Subscribable;
///
/// # async fn example() -> daikin_purifier::Result<()> {
/// let purifier = Purifier::from_config(PurifierConfig::new("192.168.1.40"))?;
///
/// purifier.on_active_changed(|active| println!("active: {active}"));
/// purifier.on_target_mode_changed(|mode| println!("mode: {mode}"));
///
/// purifier.start()?;
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to power state updates.
    ///
    /// Called on every poll and after a successful power write.
    fn on_active_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Active) + Send + Sync + 'static;

    /// Subscribes to operating state updates.
    ///
    /// Called on every poll and optimistically after a successful power
    /// write.
    fn on_current_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(CurrentState) + Send + Sync + 'static;

    /// Subscribes to target mode updates.
    ///
    /// Called on every poll.
    fn on_target_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(TargetMode) + Send + Sync + 'static;

    /// Subscribes to the full state published after each poll.
    fn on_state_polled<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PurifierState) + Send + Sync + 'static;

    /// Subscribes to failed poll cycles.
    ///
    /// Polling continues after a failure.
    fn on_poll_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static;

    /// Subscribes to every dispatched change.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
