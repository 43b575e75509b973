// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level client for a Daikin air purifier.
//!
//! [`Purifier`] owns everything needed to keep a presentation layer in sync
//! with the appliance:
//!
//! - two response caches, one for the rarely changing basic info (five
//!   minutes) and one for unit info (one refresh interval),
//! - translation between raw control fields and [`Active`], [`CurrentState`]
//!   and [`TargetMode`],
//! - a background poll loop started with [`Purifier::start`] that pushes the
//!   semantic state to [`Subscribable`] callbacks.
//!
//! ```no_run
//! use daikin_purifier::{Purifier, PurifierConfig};
//! use daikin_purifier::types::{Active, TargetMode};
//!
//! # async fn example() -> daikin_purifier::Result<()> {
//! let purifier = Purifier::from_config(PurifierConfig::new("192.168.1.40"))?;
//!
//! if purifier.active().await? == Active::Inactive {
//!     purifier.set_active(Active::Active).await?;
//! }
//! purifier.set_target_state(TargetMode::Auto).await?;
//! # Ok(())
//! # }
//! ```

mod poller;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::cache::TimedCache;
use crate::command::{ControlCommand, InfoQuery};
use crate::config::{AccessoryInfo, PurifierConfig};
use crate::error::{Error, Result};
use crate::protocol::{HttpClient, Protocol};
use crate::response::{BasicInfo, UnitInfo};
use crate::state::{PurifierState, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{Active, CurrentState, TargetMode};

/// Freshness window of the basic info cache.
pub const BASIC_INFO_TTL: Duration = Duration::from_millis(300_000);

/// Client for one air purifier.
///
/// Cloning is cheap and every clone shares the same caches, state, callbacks
/// and poll loop.
///
/// Reads go through the caches. A successful write drops the unit info
/// cache so the next read reflects the new state. Concurrent readers that
/// all find a cache stale each fetch, and the last response stored wins.
///
/// # Type Parameter
///
/// `P` is the transport, [`HttpClient`] unless a custom [`Protocol`] is
/// supplied through [`Purifier::with_protocol`].
pub struct Purifier<P: Protocol = HttpClient> {
    inner: Arc<Inner<P>>,
}

struct Inner<P> {
    protocol: P,
    config: PurifierConfig,
    refresh_interval: Duration,
    basic_info_cache: TimedCache<BasicInfo>,
    unit_info_cache: TimedCache<UnitInfo>,
    state: RwLock<PurifierState>,
    callbacks: CallbackRegistry,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl<P> Drop for Inner<P> {
    fn drop(&mut self) {
        if let Some(handle) = self.poller.get_mut().take() {
            handle.abort();
        }
    }
}

impl Purifier<HttpClient> {
    /// Creates an HTTP purifier client from its configuration.
    ///
    /// No request is made until the first read, write or poll.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn from_config(config: PurifierConfig) -> Result<Self> {
        config.validate()?;
        let client = config.http_config().into_client()?;
        Ok(Self::with_protocol(client, config))
    }
}

impl<P: Protocol> Purifier<P> {
    /// Creates a purifier client over a custom transport.
    ///
    /// The configured address is not used by this constructor; only the
    /// refresh interval and display metadata are.
    pub fn with_protocol(protocol: P, config: PurifierConfig) -> Self {
        let refresh_interval = config.refresh_interval();
        Self {
            inner: Arc::new(Inner {
                protocol,
                refresh_interval,
                basic_info_cache: TimedCache::new(BASIC_INFO_TTL),
                unit_info_cache: TimedCache::new(refresh_interval),
                state: RwLock::new(PurifierState::new()),
                callbacks: CallbackRegistry::new(),
                poller: Mutex::new(None),
                config,
            }),
        }
    }

    /// Returns the transport.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.inner.protocol
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PurifierConfig {
        &self.inner.config
    }

    /// Returns the poll interval, which is also the unit info cache window.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.inner.refresh_interval
    }

    /// Returns the static display metadata.
    #[must_use]
    pub fn accessory_info(&self) -> AccessoryInfo {
        self.inner.config.accessory_info()
    }

    /// Returns the last published state.
    ///
    /// Updated by every successful poll and optimistically by successful
    /// writes.
    #[must_use]
    pub fn state(&self) -> PurifierState {
        *self.inner.state.read()
    }

    /// Drops both cached responses so the next reads refetch.
    pub fn invalidate_caches(&self) {
        self.inner.basic_info_cache.invalidate();
        self.inner.unit_info_cache.invalidate();
    }

    // ========== Raw accessors ==========

    /// Returns firmware and identity metadata.
    ///
    /// Served from cache for five minutes after each fetch.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn basic_info(&self) -> Result<BasicInfo> {
        if let Some(cached) = self.inner.basic_info_cache.get_fresh() {
            tracing::debug!(body = %cached.raw(), "/common/basic_info cache hit");
            return Ok(cached);
        }

        let record = self
            .inner
            .protocol
            .send_command(&InfoQuery::BasicInfo)
            .await?;
        tracing::debug!(body = %record, "/common/basic_info");

        let info = BasicInfo::new(record);
        self.inner.basic_info_cache.store(info.clone());
        Ok(info)
    }

    /// Returns the current operating state.
    ///
    /// Served from cache for one refresh interval after each fetch, or until
    /// a write succeeds.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn unit_info(&self) -> Result<UnitInfo> {
        if let Some(cached) = self.inner.unit_info_cache.get_fresh() {
            tracing::debug!(body = %cached.raw(), "/cleaner/get_unit_info cache hit");
            return Ok(cached);
        }

        let record = self
            .inner
            .protocol
            .send_command(&InfoQuery::UnitInfo)
            .await?;
        let info = UnitInfo::from_record(record);
        tracing::debug!(
            ctrl_info = %info.ctrl_info().raw(),
            sensor_info = %info.sensor_info(),
            "/cleaner/get_unit_info"
        );

        self.inner.unit_info_cache.store(info.clone());
        Ok(info)
    }

    /// Writes control fields.
    ///
    /// Returns `true` if the appliance answered `ret=OK`, in which case the
    /// unit info cache is dropped. Any other answer returns `false` and
    /// leaves the cache as it was.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_control_info(&self, command: &ControlCommand) -> Result<bool> {
        let response = self.inner.protocol.send_command(command).await?;
        tracing::debug!(body = %response, "/cleaner/set_control_info");

        let accepted = response.get("ret") == Some("OK");
        if accepted {
            self.inner.unit_info_cache.invalidate();
        } else {
            tracing::info!(ret = ?response.get("ret"), "Appliance rejected control write");
        }
        Ok(accepted)
    }

    // ========== Semantic accessors ==========

    /// Returns whether the purifier is on.
    ///
    /// # Errors
    ///
    /// Returns error if the unit info request fails.
    pub async fn active(&self) -> Result<Active> {
        tracing::debug!("Getting active state");
        Ok(self.unit_info().await?.ctrl_info().active())
    }

    /// Switches the purifier on or off.
    ///
    /// On success the implied operating state is published right away,
    /// without waiting for the next poll.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails. A rejected write is `Ok(false)`.
    pub async fn set_active(&self, active: Active) -> Result<bool> {
        tracing::info!(%active, "[change] Setting active state");

        let accepted = self
            .set_control_info(&ControlCommand::power(active))
            .await?;
        if accepted {
            self.publish(StateChange::Batch(vec![
                StateChange::Active(active),
                StateChange::CurrentState(active.current_state()),
            ]));
            tracing::info!(%active, "[change] Updated active state");
        } else {
            tracing::info!(%active, "[change] Failed to update active state");
        }
        Ok(accepted)
    }

    /// Returns what the purifier is doing.
    ///
    /// # Errors
    ///
    /// Returns error if the unit info request fails.
    pub async fn current_state(&self) -> Result<CurrentState> {
        tracing::debug!("Getting current air purifier state");
        Ok(self.unit_info().await?.ctrl_info().current_state())
    }

    /// Returns the target mode.
    ///
    /// An inactive purifier reports [`TargetMode::Manual`] here whatever its
    /// `mode` field says, while the poll loop publishes the mode field as is.
    ///
    /// # Errors
    ///
    /// Returns error if the unit info request fails.
    pub async fn target_state(&self) -> Result<TargetMode> {
        tracing::debug!("Getting target air purifier state");
        let info = self.unit_info().await?;
        let ctrl = info.ctrl_info();
        if !ctrl.active().is_active() {
            return Ok(TargetMode::Manual);
        }
        Ok(ctrl.target_mode())
    }

    /// Sets the target mode.
    ///
    /// Re-sends the current control record with `mode` replaced and the
    /// manual fan speed (`airvol`) cleared, since the appliance resets any
    /// control field missing from a write. On success the new mode is
    /// published right away.
    ///
    /// # Errors
    ///
    /// Returns error if reading the current control record or the write
    /// fails. A rejected write is `Ok(false)`.
    pub async fn set_target_state(&self, mode: TargetMode) -> Result<bool> {
        tracing::info!(%mode, "[change] Setting target air purifier state");

        let info = self.unit_info().await?;
        let command = ControlCommand::target_mode(info.ctrl_info(), mode);
        let accepted = self.set_control_info(&command).await?;
        if accepted {
            self.publish(StateChange::TargetMode(mode));
            tracing::info!(%mode, "[change] Updated target air purifier state");
        } else {
            tracing::info!(%mode, "[change] Failed to update target air purifier state");
        }
        Ok(accepted)
    }

    /// Returns the firmware revision, e.g. `1.2.3`.
    ///
    /// Never fails: a failed request or a missing version yields an empty
    /// string.
    pub async fn firmware_revision(&self) -> String {
        tracing::debug!("Getting firmware revision");
        match self.basic_info().await {
            Ok(info) => info.firmware_revision().unwrap_or_default(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to get firmware revision");
                String::new()
            }
        }
    }

    // ========== Polling ==========

    /// Runs one poll cycle.
    ///
    /// Reads unit info through the cache, records the derived state and
    /// pushes Active, Current State and Target State to subscribers.
    ///
    /// # Errors
    ///
    /// Returns error if the unit info request fails. Nothing is published in
    /// that case.
    pub async fn poll_once(&self) -> Result<PurifierState> {
        let info = self.unit_info().await?;
        let state = PurifierState::from_unit_info(&info);
        *self.inner.state.write() = state;
        self.inner.callbacks.dispatch_polled(&state);
        Ok(state)
    }

    /// Returns `true` while the poll loop is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.inner
            .poller
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the poll loop.
    ///
    /// The pending timer is cancelled immediately; a cycle in flight is
    /// abandoned at its next await point. Returns `true` if a loop was
    /// running.
    pub fn stop(&self) -> bool {
        let Some(handle) = self.inner.poller.lock().take() else {
            return false;
        };
        let was_running = !handle.is_finished();
        handle.abort();
        if was_running {
            tracing::info!("Stopped polling");
        }
        was_running
    }

    fn publish(&self, change: StateChange) {
        self.inner.state.write().apply(&change);
        self.inner.callbacks.dispatch(&change);
    }
}

impl<P: Protocol + 'static> Purifier<P> {
    /// Starts the background poll loop.
    ///
    /// The first cycle runs one refresh interval from now, and each following
    /// cycle one interval after the previous one finished. A failed cycle is
    /// logged and reported to [`Subscribable::on_poll_failed`] subscribers;
    /// the loop keeps going.
    ///
    /// The loop ends on [`stop`](Self::stop) or when the last clone of this
    /// purifier is dropped.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyPolling` if the loop is already running.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&self) -> Result<()> {
        let mut poller = self.inner.poller.lock();
        if poller.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(Error::AlreadyPolling);
        }
        *poller = Some(poller::spawn(&self.inner));
        tracing::info!(
            interval_ms = u64::try_from(self.inner.refresh_interval.as_millis()).unwrap_or(u64::MAX),
            "Started polling"
        );
        Ok(())
    }
}

impl<P: Protocol> Clone for Purifier<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Protocol> std::fmt::Debug for Purifier<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Purifier")
            .field("ip", &self.inner.config.ip())
            .field("refresh_interval", &self.inner.refresh_interval)
            .field("state", &self.state())
            .field("callbacks", &self.inner.callbacks)
            .finish_non_exhaustive()
    }
}

impl<P: Protocol> Subscribable for Purifier<P> {
    fn on_active_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Active) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_active_changed(callback)
    }

    fn on_current_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(CurrentState) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_current_state_changed(callback)
    }

    fn on_target_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(TargetMode) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_target_mode_changed(callback)
    }

    fn on_state_polled<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PurifierState) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_state_polled(callback)
    }

    fn on_poll_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_poll_failed(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.callbacks.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::protocol::mock::MockProtocol;

    const BASIC_INFO: &str = "/common/basic_info";
    const UNIT_INFO: &str = "/cleaner/get_unit_info";
    const SET_CONTROL: &str = "/cleaner/set_control_info";

    fn unit_info_body(ctrl: &str) -> String {
        format!(
            "ret=OK,ctrl_info={},sensor_info={},unit_status={},dev_setting={}",
            urlencoding::encode(ctrl),
            urlencoding::encode("ret=OK,htemp=22,hhum=40"),
            urlencoding::encode("ret=OK,filter=0"),
            urlencoding::encode("ret=OK,led=1"),
        )
    }

    fn purifier_with(ctrl: &str) -> (Purifier<MockProtocol>, MockProtocol) {
        let mock = MockProtocol::new()
            .with_body(BASIC_INFO, "ret=OK,type=aircon,ver=3_3_1")
            .with_body(UNIT_INFO, &unit_info_body(ctrl))
            .with_body(SET_CONTROL, "ret=OK");
        let purifier = Purifier::with_protocol(mock.clone(), PurifierConfig::new("192.168.1.40"));
        (purifier, mock)
    }

    // ========== Caching ==========

    #[tokio::test(start_paused = true)]
    async fn basic_info_is_cached_for_five_minutes() {
        let (purifier, mock) = purifier_with("pow=1");

        purifier.basic_info().await.unwrap();
        assert_eq!(mock.count(BASIC_INFO), 1);

        tokio::time::advance(Duration::from_millis(299_999)).await;
        purifier.basic_info().await.unwrap();
        assert_eq!(mock.count(BASIC_INFO), 1);

        tokio::time::advance(Duration::from_millis(2)).await;
        purifier.basic_info().await.unwrap();
        assert_eq!(mock.count(BASIC_INFO), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unit_info_is_cached_for_refresh_interval() {
        let mock = MockProtocol::new().with_body(UNIT_INFO, &unit_info_body("pow=1"));
        let config = PurifierConfig::new("192.168.1.40").with_refresh_interval(Duration::from_secs(5));
        let purifier = Purifier::with_protocol(mock.clone(), config);

        purifier.unit_info().await.unwrap();
        tokio::time::advance(Duration::from_millis(4_999)).await;
        purifier.unit_info().await.unwrap();
        assert_eq!(mock.count(UNIT_INFO), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        purifier.unit_info().await.unwrap();
        assert_eq!(mock.count(UNIT_INFO), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn successful_write_invalidates_unit_info() {
        let (purifier, mock) = purifier_with("pow=0,mode=0");

        purifier.unit_info().await.unwrap();
        assert!(purifier.set_active(Active::Active).await.unwrap());

        mock.set_body(UNIT_INFO, &unit_info_body("pow=1,mode=0"));
        assert_eq!(purifier.active().await.unwrap(), Active::Active);
        assert_eq!(mock.count(UNIT_INFO), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_write_keeps_stale_cache() {
        let (purifier, mock) = purifier_with("pow=0");
        mock.set_body(SET_CONTROL, "ret=NG");

        assert_eq!(purifier.active().await.unwrap(), Active::Inactive);
        assert!(!purifier.set_active(Active::Active).await.unwrap());

        mock.set_body(UNIT_INFO, &unit_info_body("pow=1"));
        assert_eq!(purifier.active().await.unwrap(), Active::Inactive);
        assert_eq!(mock.count(UNIT_INFO), 1);
        assert!(purifier.state().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_caches_forces_refetch() {
        let (purifier, mock) = purifier_with("pow=1");

        purifier.basic_info().await.unwrap();
        purifier.unit_info().await.unwrap();
        purifier.invalidate_caches();
        purifier.basic_info().await.unwrap();
        purifier.unit_info().await.unwrap();

        assert_eq!(mock.count(BASIC_INFO), 2);
        assert_eq!(mock.count(UNIT_INFO), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_is_not_cached() {
        let (purifier, mock) = purifier_with("pow=1");
        mock.fail(UNIT_INFO);

        let err = purifier.unit_info().await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));

        mock.recover(UNIT_INFO);
        assert_eq!(purifier.active().await.unwrap(), Active::Active);
        assert_eq!(mock.count(UNIT_INFO), 2);
    }

    // ========== Semantic translation ==========

    #[tokio::test(start_paused = true)]
    async fn powered_on_reads_active_and_purifying() {
        let (purifier, _mock) = purifier_with("pow=1,mode=0");
        assert_eq!(purifier.active().await.unwrap(), Active::Active);
        assert_eq!(
            purifier.current_state().await.unwrap(),
            CurrentState::PurifyingAir
        );
    }

    #[tokio::test(start_paused = true)]
    async fn powered_off_reads_inactive() {
        let (purifier, _mock) = purifier_with("pow=0,mode=1");
        assert_eq!(purifier.active().await.unwrap(), Active::Inactive);
        assert_eq!(
            purifier.current_state().await.unwrap(),
            CurrentState::Inactive
        );
    }

    #[tokio::test(start_paused = true)]
    async fn missing_ctrl_info_reads_inactive() {
        let mock = MockProtocol::new().with_body(UNIT_INFO, "ret=OK");
        let purifier = Purifier::with_protocol(mock, PurifierConfig::new("192.168.1.40"));
        assert_eq!(purifier.active().await.unwrap(), Active::Inactive);
    }

    #[tokio::test(start_paused = true)]
    async fn decimal_pow_reads_active() {
        let (purifier, _mock) = purifier_with("pow=1.0,mode=1e0");
        assert_eq!(purifier.active().await.unwrap(), Active::Active);
        assert_eq!(purifier.target_state().await.unwrap(), TargetMode::Auto);
    }

    #[tokio::test(start_paused = true)]
    async fn target_state_reads_mode() {
        let (purifier, _mock) = purifier_with("pow=1,mode=1");
        assert_eq!(purifier.target_state().await.unwrap(), TargetMode::Auto);

        let (purifier, _mock) = purifier_with("pow=1,mode=2");
        assert_eq!(purifier.target_state().await.unwrap(), TargetMode::Manual);
    }

    #[tokio::test(start_paused = true)]
    async fn target_state_read_reports_manual_when_inactive_but_poll_reports_mode() {
        let (purifier, _mock) = purifier_with("pow=0,mode=1");

        assert_eq!(purifier.target_state().await.unwrap(), TargetMode::Manual);

        let polled = purifier.poll_once().await.unwrap();
        assert_eq!(polled.target_mode(), Some(TargetMode::Auto));
    }

    #[tokio::test(start_paused = true)]
    async fn set_active_sends_pow() {
        let (purifier, mock) = purifier_with("pow=1");

        assert!(purifier.set_active(Active::Inactive).await.unwrap());
        assert!(purifier.set_active(Active::Active).await.unwrap());

        let writes: Vec<_> = mock
            .requests()
            .into_iter()
            .filter(|path| path.starts_with(SET_CONTROL))
            .collect();
        assert_eq!(
            writes,
            vec![
                "/cleaner/set_control_info?pow=0".to_string(),
                "/cleaner/set_control_info?pow=1".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn set_active_publishes_current_state_optimistically() {
        let (purifier, _mock) = purifier_with("pow=0");
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();
        purifier.on_current_state_changed(move |state| received_clone.lock().push(state));

        assert!(purifier.set_active(Active::Active).await.unwrap());

        assert_eq!(*received.lock(), vec![CurrentState::PurifyingAir]);
        assert_eq!(purifier.state().active(), Some(Active::Active));
        assert_eq!(
            purifier.state().current_state(),
            Some(CurrentState::PurifyingAir)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn set_target_state_resends_full_ctrl_info() {
        let (purifier, mock) = purifier_with("ret=OK,pow=1,mode=0,airvol=3,humd=1,unit_fan=2");

        assert!(purifier.set_target_state(TargetMode::Auto).await.unwrap());

        let write = mock
            .requests()
            .into_iter()
            .find(|path| path.starts_with(SET_CONTROL))
            .unwrap();
        assert_eq!(
            write,
            "/cleaner/set_control_info?ret=OK&pow=1&mode=1&airvol=0&humd=1&unit_fan=2"
        );
        assert_eq!(purifier.state().target_mode(), Some(TargetMode::Auto));
    }

    #[tokio::test(start_paused = true)]
    async fn set_target_state_publishes_target_mode() {
        let (purifier, mock) = purifier_with("pow=1,mode=0");
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();
        purifier.on_target_mode_changed(move |mode| received_clone.lock().push(mode));

        assert!(purifier.set_target_state(TargetMode::Auto).await.unwrap());
        assert_eq!(*received.lock(), vec![TargetMode::Auto]);

        mock.set_body(SET_CONTROL, "ret=NG");
        assert!(!purifier.set_target_state(TargetMode::Manual).await.unwrap());
        assert_eq!(*received.lock(), vec![TargetMode::Auto]);
    }

    #[tokio::test(start_paused = true)]
    async fn set_target_state_manual_clears_fan_speed() {
        let (purifier, mock) = purifier_with("pow=1,mode=1,airvol=5");

        assert!(purifier.set_target_state(TargetMode::Manual).await.unwrap());

        let write = mock.requests().pop().unwrap();
        assert_eq!(write, "/cleaner/set_control_info?pow=1&mode=0&airvol=0");
    }

    #[tokio::test(start_paused = true)]
    async fn set_target_state_fails_when_unit_info_fails() {
        let (purifier, mock) = purifier_with("pow=1");
        mock.fail(UNIT_INFO);

        assert!(purifier.set_target_state(TargetMode::Auto).await.is_err());
        assert_eq!(mock.count(SET_CONTROL), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn set_control_info_transport_error_propagates() {
        let (purifier, mock) = purifier_with("pow=1");
        mock.fail(SET_CONTROL);

        let err = purifier.set_active(Active::Active).await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn firmware_revision_replaces_underscores() {
        let (purifier, _mock) = purifier_with("pow=1");
        assert_eq!(purifier.firmware_revision().await, "3.3.1");
    }

    #[tokio::test(start_paused = true)]
    async fn firmware_revision_is_empty_on_failure() {
        let (purifier, mock) = purifier_with("pow=1");
        mock.fail(BASIC_INFO);
        assert_eq!(purifier.firmware_revision().await, "");

        mock.recover(BASIC_INFO);
        mock.set_body(BASIC_INFO, "ret=OK");
        assert_eq!(purifier.firmware_revision().await, "");
    }

    #[test]
    fn accessory_info_defaults() {
        let purifier = Purifier::with_protocol(
            MockProtocol::new(),
            PurifierConfig::new("192.168.1.40").with_model("MCK70Y"),
        );
        let info = purifier.accessory_info();
        assert_eq!(info.manufacturer, "DAIKIN INDUSTRIES, LTD.,");
        assert_eq!(info.model, "MCK70Y");
        assert_eq!(info.name, "-");
    }

    // ========== Polling ==========

    #[tokio::test(start_paused = true)]
    async fn poll_once_publishes_all_properties() {
        let (purifier, _mock) = purifier_with("pow=1,mode=1");
        let changes = Arc::new(Mutex::new(Vec::new()));
        let changes_clone = changes.clone();
        purifier.on_state_changed(move |change| changes_clone.lock().push(change.clone()));

        let state = purifier.poll_once().await.unwrap();

        assert_eq!(state, purifier.state());
        assert_eq!(
            *changes.lock(),
            vec![
                StateChange::Active(Active::Active),
                StateChange::CurrentState(CurrentState::PurifyingAir),
                StateChange::TargetMode(TargetMode::Auto),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_refetches_every_interval() {
        let (purifier, mock) = purifier_with("pow=1,mode=0");
        let polls = Arc::new(AtomicU32::new(0));
        let polls_clone = polls.clone();
        purifier.on_state_polled(move |_| {
            polls_clone.fetch_add(1, Ordering::SeqCst);
        });

        purifier.start().unwrap();
        assert!(purifier.is_polling());

        tokio::time::sleep(Duration::from_millis(9_000)).await;
        assert_eq!(polls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(16_000)).await;
        assert_eq!(polls.load(Ordering::SeqCst), 2);
        assert_eq!(mock.count(UNIT_INFO), 2);

        assert!(purifier.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_survives_failed_cycles() {
        let (purifier, mock) = purifier_with("pow=1,mode=0");
        mock.fail(UNIT_INFO);

        let failures = Arc::new(AtomicU32::new(0));
        let failures_clone = failures.clone();
        purifier.on_poll_failed(move |_| {
            failures_clone.fetch_add(1, Ordering::SeqCst);
        });
        let polls = Arc::new(AtomicU32::new(0));
        let polls_clone = polls.clone();
        purifier.on_state_polled(move |_| {
            polls_clone.fetch_add(1, Ordering::SeqCst);
        });

        purifier.start().unwrap();
        tokio::time::sleep(Duration::from_millis(25_000)).await;
        assert_eq!(failures.load(Ordering::SeqCst), 2);
        assert_eq!(polls.load(Ordering::SeqCst), 0);

        mock.recover(UNIT_INFO);
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(polls.load(Ordering::SeqCst), 1);
        assert!(purifier.is_polling());
        assert_eq!(purifier.state().active(), Some(Active::Active));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_cycle_delays_next_one() {
        let (purifier, mock) = purifier_with("pow=1,mode=0");
        mock.delay(UNIT_INFO, Duration::from_secs(25));

        purifier.start().unwrap();
        // Fetches start at 10 s, 45 s and 80 s: each sleep follows a 25 s fetch.
        tokio::time::sleep(Duration::from_secs(100)).await;

        assert_eq!(mock.count(UNIT_INFO), 3);
        assert_eq!(mock.max_in_flight(), 1);
        assert!(purifier.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_stale_reads_both_fetch_and_last_store_wins() {
        let (purifier, mock) = purifier_with("pow=0");
        mock.delay(UNIT_INFO, Duration::from_secs(1));
        let other = purifier.clone();

        let (first, second, ()) = tokio::join!(
            purifier.active(),
            async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                other.active().await
            },
            async {
                tokio::time::sleep(Duration::from_millis(1_200)).await;
                mock.set_body(UNIT_INFO, &unit_info_body("pow=1"));
            },
        );

        assert_eq!(first.unwrap(), Active::Inactive);
        assert_eq!(second.unwrap(), Active::Active);
        assert_eq!(mock.count(UNIT_INFO), 2);
        assert_eq!(mock.max_in_flight(), 2);

        let cached = purifier.inner.unit_info_cache.peek().unwrap();
        assert_eq!(cached.body.ctrl_info().active(), Active::Active);
        assert_eq!(purifier.active().await.unwrap(), Active::Active);
        assert_eq!(mock.count(UNIT_INFO), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_is_rejected() {
        let (purifier, _mock) = purifier_with("pow=1");
        purifier.start().unwrap();
        assert!(matches!(purifier.start(), Err(Error::AlreadyPolling)));
        purifier.stop();
        assert!(purifier.start().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_timer() {
        let (purifier, mock) = purifier_with("pow=1");

        purifier.start().unwrap();
        assert!(purifier.stop());
        assert!(!purifier.is_polling());
        assert!(!purifier.stop());

        tokio::time::sleep(Duration::from_millis(30_000)).await;
        assert!(mock.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_last_handle_ends_polling() {
        let (purifier, mock) = purifier_with("pow=1");

        purifier.start().unwrap();
        drop(purifier);

        tokio::time::sleep(Duration::from_millis(30_000)).await;
        assert!(mock.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_caches_and_poller() {
        let (purifier, mock) = purifier_with("pow=1");
        let other = purifier.clone();

        purifier.unit_info().await.unwrap();
        other.unit_info().await.unwrap();
        assert_eq!(mock.count(UNIT_INFO), 1);

        other.start().unwrap();
        assert!(purifier.is_polling());
        assert!(purifier.stop());
    }
}
