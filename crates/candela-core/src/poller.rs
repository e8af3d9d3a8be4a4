// ── Registry poller ──
//
// One spawned task: fetch immediately, then on every interval tick,
// until cancelled. Each fetch either replaces the registry wholesale and
// reconciles the selection, or marks the registry failed and leaves the
// list alone. `stop()` cancels and joins the task, so nothing is applied
// once it returns.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use candela_api::CandlestickClient;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::convert::devices_from_states;
use crate::error::CoreError;
use crate::model::Device;
use crate::selection::SelectionManager;
use crate::store::DeviceRegistry;

/// Default registry poll cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// `tokio::time::interval` panics on a zero period.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Everything a single fetch touches. Cloned into the background task.
#[derive(Clone)]
struct PollContext {
    client: CandlestickClient,
    registry: Arc<DeviceRegistry>,
    selection: Arc<SelectionManager>,
    /// Held across apply + reconcile so a scheduled tick and a manual
    /// refresh can't interleave the two halves.
    apply_lock: Arc<Mutex<()>>,
}

impl PollContext {
    fn new(
        client: CandlestickClient,
        registry: Arc<DeviceRegistry>,
        selection: Arc<SelectionManager>,
    ) -> Self {
        Self {
            client,
            registry,
            selection,
            apply_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Replace the list and reconcile the selection as one step.
    fn apply(&self, devices: Vec<Device>) -> Arc<Vec<Device>> {
        let _guard = self
            .apply_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.registry.apply(devices);
        self.selection.reconcile(&snapshot);
        snapshot
    }

    async fn fetch(&self) -> Result<Arc<Vec<Device>>, CoreError> {
        debug!(url = %self.client.base_url(), "fetching candlestick registry");

        let result = self
            .client
            .list_candlesticks()
            .await
            .map_err(CoreError::registry_fetch)
            .and_then(|states| {
                devices_from_states(states).map_err(|e| CoreError::malformed_registry(&e))
            });

        match result {
            Ok(devices) => {
                let snapshot = self.apply(devices);
                debug!(count = snapshot.len(), "registry updated");
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "registry fetch failed; keeping previous list");
                self.registry.mark_failed(&e);
                Err(e)
            }
        }
    }
}

struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct RegistryPoller {
    ctx: PollContext,
    task: tokio::sync::Mutex<Option<PollTask>>,
}

impl RegistryPoller {
    pub fn new(
        client: CandlestickClient,
        registry: Arc<DeviceRegistry>,
        selection: Arc<SelectionManager>,
    ) -> Self {
        Self {
            ctx: PollContext::new(client, registry, selection),
            task: tokio::sync::Mutex::new(None),
        }
    }

    /// Fetch once, outside the schedule. Concurrent fetches are not
    /// serialized: whichever completes last is what the registry holds.
    pub async fn fetch(&self) -> Result<Arc<Vec<Device>>, CoreError> {
        self.ctx.fetch().await
    }

    /// Begin polling every `interval`, starting with an immediate fetch.
    /// Calling this while already running does nothing.
    pub async fn start(&self, interval: Duration) {
        let mut task = self.task.lock().await;
        if task.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            debug!("registry poller already running");
            return;
        }

        let period = interval.max(MIN_POLL_INTERVAL);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(self.ctx.clone(), period, cancel.clone()));
        *task = Some(PollTask { cancel, handle });
        info!(interval_ms = period.as_millis(), "registry poller started");
    }

    /// Cancel the schedule and wait for the task to exit. An in-flight
    /// fetch is dropped. Idempotent.
    pub async fn stop(&self) {
        let Some(PollTask { cancel, handle }) = self.task.lock().await.take() else {
            return;
        };
        cancel.cancel();
        if let Err(e) = handle.await {
            warn!(error = %e, "registry poller task ended abnormally");
        }
        info!("registry poller stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }
}

async fn poll_loop(ctx: PollContext, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    _ = ctx.fetch() => {}
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use candela_api::TransportConfig;
    use url::Url;

    fn dev(id: &str) -> Device {
        Device {
            id: id.into(),
            connected: true,
            program: None,
            random: None,
            speed: None,
            direction: None,
            color: None,
            last_seen: "2025-10-16T10:30:00Z".parse().unwrap(),
        }
    }

    fn context() -> PollContext {
        let url = Url::parse("http://127.0.0.1:9").unwrap();
        let client = CandlestickClient::new(url, &TransportConfig::default()).unwrap();
        PollContext::new(
            client,
            Arc::new(DeviceRegistry::new()),
            Arc::new(SelectionManager::new()),
        )
    }

    #[test]
    fn concurrent_applies_leave_selection_matching_registry() {
        let ctx = context();

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let ctx = &ctx;
                scope.spawn(move || {
                    for round in 0..200 {
                        let id = if (worker + round) % 2 == 0 { "A" } else { "B" };
                        ctx.apply(vec![dev(id)]);
                    }
                });
            }
        });

        let snapshot = ctx.registry.snapshot();
        let active = ctx.selection.active_device(&snapshot);
        assert_eq!(active.map(|d| d.id), Some(snapshot[0].id.clone()));
    }
}
