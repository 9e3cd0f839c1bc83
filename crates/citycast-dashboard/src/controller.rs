//! Weather view controller: sequences fetch cycles and owns the view state.
//!
//! Every city selection gets its own cancellation scope. The scope owns the
//! periodic refresh timer and is the parent of each fetch cycle's token, so
//! selecting another city (or tearing the controller down) stops the timer
//! and orphans whatever request is still in flight. A cycle only writes the
//! view state if its token is still live when checked under the state lock.

use std::sync::Arc;
use std::time::Duration;

use citycast_weather::{City, FetchOptions, WeatherClient, WeatherError, WeatherSnapshot};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::view_state::{ViewError, ViewState};

/// Default period of the background refresh timer.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// How a fetch cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The result (data or error) was written to the view state.
    Applied,
    /// The cycle was superseded or the controller was torn down; nothing was written.
    Discarded,
}

/// Handle to a spawned fetch cycle.
#[derive(Debug)]
pub struct FetchCycle {
    city: City,
    handle: JoinHandle<CycleOutcome>,
}

impl FetchCycle {
    pub fn city(&self) -> City {
        self.city
    }

    /// Wait for the cycle to resolve. Dropping the handle instead leaves the
    /// cycle running.
    pub async fn finished(self) -> CycleOutcome {
        self.handle.await.unwrap_or(CycleOutcome::Discarded)
    }
}

struct ControllerState {
    view: ViewState,
    mounted: bool,
    selection: CancellationToken,
    cycle: CancellationToken,
}

struct Shared {
    client: WeatherClient,
    state: Mutex<ControllerState>,
    updates: watch::Sender<ViewState>,
    refresh_interval: Option<Duration>,
    root: CancellationToken,
}

/// Drives [`WeatherClient`] from city selection, retries and a refresh timer,
/// and exposes the resulting [`ViewState`].
///
/// Methods that start work spawn Tokio tasks and must be called from within a
/// runtime.
pub struct WeatherViewController {
    shared: Arc<Shared>,
}

impl WeatherViewController {
    /// Create a controller for `city`. Nothing is fetched until [`start`](Self::start)
    /// or [`select_city`](Self::select_city). `refresh_interval = None` disables
    /// the background timer.
    pub fn new(client: WeatherClient, city: City, refresh_interval: Option<Duration>) -> Self {
        let view = ViewState::new(city);
        let (updates, _) = watch::channel(view.clone());
        let root = CancellationToken::new();

        let state = ControllerState {
            view,
            mounted: false,
            selection: root.child_token(),
            cycle: root.child_token(),
        };

        Self {
            shared: Arc::new(Shared {
                client,
                state: Mutex::new(state),
                updates,
                refresh_interval,
                root,
            }),
        }
    }

    /// Initial mount: fetch the current city and start the refresh timer.
    pub fn start(&self) -> Option<FetchCycle> {
        let mut state = self.shared.state.lock();
        if self.shared.root.is_cancelled() {
            return None;
        }
        let city = state.view.selected_city;
        Some(self.shared.begin_selection(&mut state, city))
    }

    /// Switch to `city`, superseding any in-flight cycle and restarting the
    /// refresh timer. Selecting the current city again does nothing.
    pub fn select_city(&self, city: City) -> Option<FetchCycle> {
        let mut state = self.shared.state.lock();
        if self.shared.root.is_cancelled() {
            tracing::debug!("Ignoring selection of {} after shutdown", city);
            return None;
        }
        if state.mounted && state.view.selected_city == city {
            return None;
        }
        tracing::info!("Selected city: {}", city);
        Some(self.shared.begin_selection(&mut state, city))
    }

    /// Clear the error and fetch the selected city again, bypassing the cache.
    pub fn retry(&self) -> Option<FetchCycle> {
        let mut state = self.shared.state.lock();
        if self.shared.root.is_cancelled() {
            return None;
        }
        if !state.mounted {
            let city = state.view.selected_city;
            return Some(self.shared.begin_selection(&mut state, city));
        }
        tracing::info!("Retrying weather fetch for {}", state.view.selected_city);
        Some(self.shared.begin_cycle(&mut state, FetchOptions::fresh()))
    }

    /// Point-in-time copy of the view state.
    pub fn state(&self) -> ViewState {
        self.shared.state.lock().view.clone()
    }

    pub fn selected_city(&self) -> City {
        self.shared.state.lock().view.selected_city
    }

    /// Receiver that sees every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.updates.subscribe()
    }

    /// Stop the timer and discard any in-flight cycle. Later calls that would
    /// start work return `None`.
    pub fn shutdown(&self) {
        let _state = self.shared.state.lock();
        if !self.shared.root.is_cancelled() {
            self.shared.root.cancel();
            tracing::info!("Weather controller shut down");
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.root.is_cancelled()
    }
}

impl Drop for WeatherViewController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Shared {
    fn publish(&self, view: &ViewState) {
        self.updates.send_replace(view.clone());
    }

    /// New cancellation scope for `city`: cancels the previous scope's timer
    /// and cycle, then starts a fresh timer and cycle. Caller holds the lock.
    fn begin_selection(self: &Arc<Self>, state: &mut ControllerState, city: City) -> FetchCycle {
        state.selection.cancel();
        state.selection = self.root.child_token();
        state.mounted = true;
        state.view.selected_city = city;

        if let Some(period) = self.refresh_interval {
            self.spawn_refresh_timer(state.selection.clone(), period);
        }

        self.begin_cycle(state, FetchOptions::default())
    }

    /// Supersede the current cycle and spawn a new one. Caller holds the lock.
    fn begin_cycle(self: &Arc<Self>, state: &mut ControllerState, options: FetchOptions) -> FetchCycle {
        state.cycle.cancel();
        let token = state.selection.child_token();
        state.cycle = token.clone();

        state.view.begin_loading();
        self.publish(&state.view);

        let city = state.view.selected_city;
        let shared = Arc::clone(self);
        let handle = tokio::spawn(async move { shared.run_cycle(city, options, token).await });

        FetchCycle { city, handle }
    }

    async fn run_cycle(
        &self,
        city: City,
        options: FetchOptions,
        token: CancellationToken,
    ) -> CycleOutcome {
        let result = self.client.get_weather(city, options).await;
        self.apply(city, result, &token)
    }

    fn apply(
        &self,
        city: City,
        result: Result<WeatherSnapshot, WeatherError>,
        token: &CancellationToken,
    ) -> CycleOutcome {
        let mut state = self.state.lock();
        if token.is_cancelled() {
            tracing::debug!("Discarding superseded fetch cycle for {}", city);
            return CycleOutcome::Discarded;
        }

        match result {
            Ok(snapshot) => state.view.finish_with_data(snapshot),
            Err(e) => {
                tracing::warn!("Weather fetch for {} failed: {}", city, e);
                state.view.finish_with_error(ViewError::from_weather_error(city, &e));
            }
        }
        self.publish(&state.view);
        CycleOutcome::Applied
    }

    fn spawn_refresh_timer(self: &Arc<Self>, selection: CancellationToken, period: Duration) {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            // First tick one full period after selection, not immediately.
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = selection.cancelled() => break,
                    _ = ticker.tick() => {
                        if !shared.refresh_tick(&selection) {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("Refresh timer stopped");
        });
    }

    /// Returns false once the selection that owns the timer is gone.
    fn refresh_tick(self: &Arc<Self>, selection: &CancellationToken) -> bool {
        let mut state = self.state.lock();
        if selection.is_cancelled() {
            return false;
        }
        tracing::info!("Periodic weather refresh for {}", state.view.selected_city);
        // The handle is not needed; the cycle reports through the view state.
        let _cycle = self.begin_cycle(&mut state, FetchOptions::default());
        true
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use citycast_weather::{WeatherCache, DEFAULT_REQUEST_TIMEOUT};

    fn unreachable_client() -> WeatherClient {
        WeatherClient::new("http://127.0.0.1:1", DEFAULT_REQUEST_TIMEOUT, WeatherCache::default())
            .unwrap()
    }

    #[test]
    fn test_new_controller_is_idle() {
        let controller = WeatherViewController::new(unreachable_client(), City::Bogota, None);
        let state = controller.state();
        assert_eq!(state.selected_city, City::Bogota);
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.data.is_none());
    }

    #[tokio::test]
    async fn test_same_city_selection_is_noop_once_mounted() {
        let controller = WeatherViewController::new(unreachable_client(), City::Ottawa, None);
        let cycle = controller.start().unwrap();
        assert!(controller.select_city(City::Ottawa).is_none());
        assert_eq!(cycle.finished().await, CycleOutcome::Applied);
    }

    #[tokio::test]
    async fn test_select_before_start_mounts() {
        let controller = WeatherViewController::new(unreachable_client(), City::Ottawa, None);
        let cycle = controller.select_city(City::Ottawa).unwrap();
        assert!(controller.state().loading);
        assert_eq!(cycle.city(), City::Ottawa);
        cycle.finished().await;
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_work() {
        let controller = WeatherViewController::new(unreachable_client(), City::Ottawa, None);
        controller.shutdown();
        assert!(controller.is_shut_down());
        assert!(controller.start().is_none());
        assert!(controller.select_city(City::Bogota).is_none());
        assert!(controller.retry().is_none());
        assert_eq!(controller.selected_city(), City::Ottawa);
    }

    #[tokio::test]
    async fn test_transport_failure_sets_error() {
        let controller = WeatherViewController::new(unreachable_client(), City::BuenosAires, None);
        let outcome = controller.start().unwrap().finished().await;

        assert_eq!(outcome, CycleOutcome::Applied);
        let state = controller.state();
        assert!(!state.loading);
        let error = state.error.unwrap();
        assert_eq!(error.kind, citycast_weather::ErrorKind::Transport);
        assert!(error.message.contains("Buenos Aires"));
    }
}
