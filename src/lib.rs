// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `daikin_purifier` - poll and control Daikin air purifiers over their local
//! HTTP API.
//!
//! The appliance answers plain `GET` requests with flat `key=value,key=value`
//! bodies. This library decodes them, caches them, and translates the raw
//! control fields into the three properties a home-automation host cares
//! about:
//!
//! - **Active**: whether the purifier is on (`pow`)
//! - **Current State**: inactive or purifying air, derived from `pow`
//! - **Target State**: manual or automatic operation (`mode`)
//!
//! # Endpoints
//!
//! | Endpoint | Use | Cached for |
//! |----------|-----|------------|
//! | `/common/basic_info` | firmware and identity | 5 minutes |
//! | `/cleaner/get_unit_info` | operating state | one refresh interval |
//! | `/cleaner/set_control_info` | writes | never |
//!
//! # Quick Start
//!
//! ```no_run
//! use daikin_purifier::{Purifier, PurifierConfig};
//! use daikin_purifier::types::Active;
//!
//! #[tokio::main]
//! async fn main() -> daikin_purifier::Result<()> {
//!     let purifier = Purifier::from_config(PurifierConfig::new("192.168.1.40"))?;
//!
//!     println!("firmware {}", purifier.firmware_revision().await);
//!     if purifier.active().await? == Active::Inactive {
//!         purifier.set_active(Active::Active).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Polling with Callbacks
//!
//! ```no_run
//! use daikin_purifier::{Purifier, PurifierConfig, Subscribable};
//!
//! #[tokio::main]
//! async fn main() -> daikin_purifier::Result<()> {
//!     let config = PurifierConfig::from_json(r#"{"ip": "192.168.1.40", "refreshInterval": 5000}"#)?;
//!     let purifier = Purifier::from_config(config)?;
//!
//!     purifier.on_current_state_changed(|state| println!("current state: {state}"));
//!     purifier.on_poll_failed(|e| eprintln!("poll failed: {e}"));
//!
//!     purifier.start()?;
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     purifier.stop();
//!     Ok(())
//! }
//! ```

mod cache;
pub mod command;
pub mod config;
mod device;
pub mod error;
pub mod protocol;
pub mod response;
pub mod state;
pub mod subscription;
pub mod types;

pub use command::{Command, ControlCommand, InfoQuery};
pub use config::{AccessoryInfo, PurifierConfig};
pub use device::{BASIC_INFO_TTL, Purifier};
pub use error::{ConfigError, Error, ProtocolError, Result};
pub use protocol::{HttpClient, HttpConfig, Protocol};
pub use response::{BasicInfo, ControlInfo, RawRecord, UnitInfo};
pub use state::{PurifierState, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{Active, CurrentState, TargetMode};
