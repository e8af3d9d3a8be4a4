// ── Command dispatch ──
//
// Discrete commands (program, direction) go out immediately. Continuous
// inputs (speed slider, color picker) pass through a per-stream
// `RateLimiter` first. The target device is read from the shared
// `SelectionManager` at send time, never cached.

mod rate_limit;

pub use rate_limit::{DEFAULT_MIN_INTERVAL, LimiterState, RateLimiter};

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use candela_api::{CandlestickClient, CommandBody, LegacyClient};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::command::Command;
use crate::error::CoreError;
use crate::model::{Color, Direction, Program, Speed};
use crate::selection::SelectionManager;

/// Message reported for legacy sends, which answer 204 with no body.
const LEGACY_ACK: &str = "Command sent";

/// Which backend API commands are delivered through.
#[derive(Debug, Clone)]
pub enum CommandRoute {
    /// Multi-device registry API: `POST /api/candlesticks/{id}/command`.
    Registry(CandlestickClient),
    /// Single-device predecessor API: `POST /api` and `POST /api/color`.
    /// `device_id` is only used for reporting; the endpoint has no id.
    Legacy {
        client: LegacyClient,
        device_id: String,
    },
}

/// A command the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub device_id: String,
    pub message: String,
}

/// Outcome of offering a continuous-input sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Sent(Sent),
    /// Inside the rate-limit window: dropped, nothing sent.
    Throttled,
}

impl Dispatch {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }
}

/// The rate-limited input streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputStream {
    Speed,
    Color,
}

pub struct CommandDispatcher<C: Clock = SystemClock> {
    route: CommandRoute,
    selection: Arc<SelectionManager>,
    clock: C,
    speed: Mutex<RateLimiter<Speed>>,
    color: Mutex<RateLimiter<Color>>,
}

impl CommandDispatcher<SystemClock> {
    pub fn new(route: CommandRoute, selection: Arc<SelectionManager>, interval: Duration) -> Self {
        Self::with_clock(route, selection, interval, SystemClock)
    }
}

impl<C: Clock> CommandDispatcher<C> {
    pub fn with_clock(
        route: CommandRoute,
        selection: Arc<SelectionManager>,
        interval: Duration,
        clock: C,
    ) -> Self {
        Self {
            route,
            selection,
            clock,
            speed: Mutex::new(RateLimiter::new(interval)),
            color: Mutex::new(RateLimiter::new(interval)),
        }
    }

    pub fn route(&self) -> &CommandRoute {
        &self.route
    }

    // ── Immediate sends ──────────────────────────────────────────────

    /// Send `command` to `device_id` as-is. One request, no retries.
    ///
    /// On the legacy route a command carrying a color takes two requests.
    /// They are not atomic: if the color request fails, the other fields
    /// have already been applied.
    pub async fn send(&self, device_id: &str, command: &Command) -> Result<Sent, CoreError> {
        if command.is_empty() {
            return Err(CoreError::EmptyCommand);
        }

        match &self.route {
            CommandRoute::Registry(client) => {
                let body = CommandBody::from(command);
                debug!(device_id, ?body, "sending command");
                let resp = client
                    .send_command(device_id, &body)
                    .await
                    .map_err(|e| CoreError::dispatch(device_id, e))?;
                Ok(Sent {
                    device_id: device_id.to_owned(),
                    message: resp.message,
                })
            }
            CommandRoute::Legacy { client, device_id: legacy_id } => {
                let mut rest = command.clone();
                let color = rest.take_color();

                if !rest.is_empty() {
                    let body = CommandBody::from(&rest);
                    debug!(device_id = %legacy_id, ?body, "sending legacy command");
                    client
                        .send(&body)
                        .await
                        .map_err(|e| CoreError::dispatch(legacy_id, e))?;
                }
                if let Some(color) = color {
                    debug!(device_id = %legacy_id, %color, "sending legacy color");
                    client
                        .send_color(color.rgb())
                        .await
                        .map_err(|e| CoreError::dispatch(legacy_id, e))?;
                }

                Ok(Sent {
                    device_id: legacy_id.clone(),
                    message: LEGACY_ACK.to_owned(),
                })
            }
        }
    }

    /// Send to whichever device is active right now.
    pub async fn send_to_active(&self, command: &Command) -> Result<Sent, CoreError> {
        let id = self.active_id()?;
        self.send(&id, command).await
    }

    pub async fn set_program(&self, program: Program) -> Result<Sent, CoreError> {
        self.send_to_active(&Command::program(program)).await
    }

    pub async fn set_direction(&self, direction: Direction) -> Result<Sent, CoreError> {
        self.send_to_active(&Command::direction(direction)).await
    }

    // ── Rate-limited sends ───────────────────────────────────────────

    /// Offer one speed-slider sample.
    pub async fn update_speed(&self, speed: Speed) -> Result<Dispatch, CoreError> {
        let id = self.active_id()?;
        let admitted = lock(&self.speed).admit(self.clock.now(), speed);
        match admitted {
            Some(speed) => self.send(&id, &Command::speed(speed)).await.map(Dispatch::Sent),
            None => Ok(Dispatch::Throttled),
        }
    }

    /// Offer one color-picker sample.
    pub async fn update_color(&self, color: Color) -> Result<Dispatch, CoreError> {
        let id = self.active_id()?;
        let admitted = lock(&self.color).admit(self.clock.now(), color);
        match admitted {
            Some(color) => self.send(&id, &Command::color(color)).await.map(Dispatch::Sent),
            None => Ok(Dispatch::Throttled),
        }
    }

    /// End of a slider/picker gesture: send the last dropped sample, if
    /// any, so the device settles on the final value.
    ///
    /// The sample stays pending while no device is active.
    pub async fn finish_gesture(&self, stream: InputStream) -> Result<Option<Sent>, CoreError> {
        let id = self.active_id()?;
        let now = self.clock.now();
        let command = match stream {
            InputStream::Speed => lock(&self.speed).take_pending(now).map(Command::speed),
            InputStream::Color => lock(&self.color).take_pending(now).map(Command::color),
        };
        let Some(command) = command else {
            return Ok(None);
        };

        debug!(?stream, device_id = %id, "flushing trailing sample");
        self.send(&id, &command).await.map(Some)
    }

    /// Current limiter state for `stream`.
    pub fn stream_state(&self, stream: InputStream) -> LimiterState {
        let now = self.clock.now();
        match stream {
            InputStream::Speed => lock(&self.speed).state(now),
            InputStream::Color => lock(&self.color).state(now),
        }
    }

    fn active_id(&self) -> Result<String, CoreError> {
        self.selection.selected_id().ok_or(CoreError::NoActiveDevice)
    }
}

impl<C: Clock> std::fmt::Debug for CommandDispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("route", &self.route)
            .field("selected", &self.selection.selected_id())
            .finish_non_exhaustive()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
