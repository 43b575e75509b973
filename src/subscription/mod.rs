// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for purifier state updates.
//!
//! The presentation layer (for example a home-automation host plugin)
//! registers callbacks through [`Subscribable`] and receives the semantic
//! properties whenever the poll loop runs or a write succeeds.
//!
//! - [`SubscriptionId`] - Identifier returned on subscribe, used to unsubscribe
//! - [`CallbackRegistry`] - Stores callbacks and dispatches updates
//! - [`Subscribable`] - Trait implemented by [`Purifier`](crate::Purifier)

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
