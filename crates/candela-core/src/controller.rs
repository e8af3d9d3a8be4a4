// ── Controller facade ──
//
// Wires the engine together from a `ControllerConfig`: one HTTP client,
// the registry store, the selection manager, the poller and the command
// dispatcher. Registry and selection are shared by `Arc` between the
// poller (writer) and dispatcher/collaborators (readers).

use std::sync::Arc;

use candela_api::transport::{TlsMode, TransportConfig};
use candela_api::{CandlestickClient, HealthResponse, LegacyClient};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::{ApiMode, ControllerConfig, TlsVerification};
use crate::dispatch::{CommandDispatcher, CommandRoute};
use crate::error::CoreError;
use crate::model::Device;
use crate::poller::RegistryPoller;
use crate::selection::SelectionManager;
use crate::status::LinkStatus;
use crate::store::{DeviceRegistry, RegistryStatus};

/// Entry point for collaborators.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Nothing runs until
/// [`start()`](Self::start); [`stop()`](Self::stop) joins the poller.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    client: CandlestickClient,
    registry: Arc<DeviceRegistry>,
    selection: Arc<SelectionManager>,
    poller: RegistryPoller,
    dispatcher: CommandDispatcher,
}

impl Controller {
    /// Build the engine. Fails only if the HTTP client can't be built
    /// (bad CA file, unusable URL).
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = CandlestickClient::new(config.url.clone(), &transport)?;
        let registry = Arc::new(DeviceRegistry::new());

        let (selection, route) = match config.mode {
            ApiMode::Registry => (
                Arc::new(SelectionManager::new()),
                CommandRoute::Registry(client.clone()),
            ),
            ApiMode::Legacy => {
                let legacy = LegacyClient::new(config.url.clone(), &transport)?;
                (
                    Arc::new(SelectionManager::with_selected(&config.default_device_id)),
                    CommandRoute::Legacy {
                        client: legacy,
                        device_id: config.default_device_id.clone(),
                    },
                )
            }
        };

        let poller = RegistryPoller::new(
            client.clone(),
            Arc::clone(&registry),
            Arc::clone(&selection),
        );
        let dispatcher =
            CommandDispatcher::new(route, Arc::clone(&selection), config.command_interval);

        debug!(url = %config.url, mode = %config.mode, "controller built");

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                registry,
                selection,
                poller,
                dispatcher,
            }),
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.inner.dispatcher
    }

    pub fn selection(&self) -> &Arc<SelectionManager> {
        &self.inner.selection
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.inner.registry
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start polling the registry at the configured interval.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.require_registry("registry polling")?;
        self.inner.poller.start(self.inner.config.poll_interval).await;
        Ok(())
    }

    /// Stop polling. Once this returns no further fetch is applied.
    pub async fn stop(&self) {
        self.inner.poller.stop().await;
    }

    pub async fn is_running(&self) -> bool {
        self.inner.poller.is_running().await
    }

    /// One fetch outside the schedule.
    pub async fn refresh(&self) -> Result<Arc<Vec<Device>>, CoreError> {
        self.require_registry("device listing")?;
        self.inner.poller.fetch().await
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Last-known-good device list.
    pub fn devices(&self) -> Arc<Vec<Device>> {
        self.inner.registry.snapshot()
    }

    /// Fetch one device directly from the backend.
    pub async fn device(&self, id: &str) -> Result<Device, CoreError> {
        self.require_registry("device lookup")?;
        let state = self
            .inner
            .client
            .get_candlestick(id)
            .await
            .map_err(|e| CoreError::lookup(id, e))?;
        Device::try_from(state)
    }

    pub fn registry_status(&self) -> RegistryStatus {
        self.inner.registry.status()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.inner.selection.selected_id()
    }

    pub fn active_device(&self) -> Option<Device> {
        self.inner
            .selection
            .active_device(&self.inner.registry.snapshot())
    }

    pub fn link_status(&self) -> LinkStatus {
        LinkStatus::derive(
            &self.inner.registry.status(),
            self.active_device().as_ref(),
        )
    }

    pub async fn health(&self) -> Result<HealthResponse, CoreError> {
        Ok(self.inner.client.health().await?)
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Explicit selection from the UI.
    pub fn select(&self, id: &str) {
        info!(id, "manual selection");
        self.inner.selection.set_selected(id);
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_devices(&self) -> watch::Receiver<Arc<Vec<Device>>> {
        self.inner.registry.subscribe()
    }

    pub fn subscribe_registry_status(&self) -> watch::Receiver<RegistryStatus> {
        self.inner.registry.subscribe_status()
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<String> {
        self.inner.selection.subscribe()
    }

    fn require_registry(&self, operation: &str) -> Result<(), CoreError> {
        match self.inner.config.mode {
            ApiMode::Registry => Ok(()),
            ApiMode::Legacy => Err(CoreError::Unsupported {
                operation: operation.to_owned(),
                mode: ApiMode::Legacy.to_string(),
            }),
        }
    }
}

fn build_transport(config: &ControllerConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}
