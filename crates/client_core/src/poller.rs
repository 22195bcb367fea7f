//! Recurring status polling for one ride request.
//!
//! A poller is `Idle` when the host has no request identifier, `Active` while
//! its timer runs and `Stopped` once torn down. Every tick spawns one fetch so
//! a slow response never holds the timer back; results are rendered in
//! whatever order they resolve. Failed ticks are logged and dropped, the next
//! tick simply tries again. Terminal ride statuses do not stop the timer.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::RequestId,
    protocol::{PollResponse, PollResult},
};
use thiserror::Error;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::renderer::{StatusRenderer, StatusView};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Shortest period the timer accepts; smaller intervals are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Error)]
pub enum PollError {
    #[error("status request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("status endpoint returned HTTP {0}")]
    Status(StatusCode),
    #[error("invalid status payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid status url: {0}")]
    Url(#[from] url::ParseError),
}

#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, request_id: RequestId) -> Result<PollResult, PollError>;
}

/// Reads `GET /customer/poll/{request_id}/` from the ride server.
pub struct HttpStatusSource {
    http: Client,
    base_url: Url,
}

impl HttpStatusSource {
    pub fn new(http: Client, server_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            http,
            base_url: base_url(server_url)?,
        })
    }

    pub fn status_url(&self, request_id: RequestId) -> Result<Url, url::ParseError> {
        self.base_url
            .join(&format!("customer/poll/{}/", request_id.0))
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self, request_id: RequestId) -> Result<PollResult, PollError> {
        let url = self.status_url(request_id)?;
        let res = self.http.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }
        let body = res.text().await?;
        let response: PollResponse = serde_json::from_str(&body)?;
        Ok(response.into())
    }
}

/// Parses a server URL so that relative endpoint paths join beneath it.
pub(crate) fn base_url(server_url: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(server_url.trim())
        .with_context(|| format!("invalid server url: {server_url}"))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
}

impl PollerConfig {
    /// The timer period, never shorter than [`MIN_POLL_INTERVAL`].
    pub fn period(&self) -> Duration {
        self.interval.max(MIN_POLL_INTERVAL)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Active,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    Rendered {
        request_id: RequestId,
        status: String,
    },
    TickFailed {
        request_id: RequestId,
        error: String,
    },
}

struct PollSession {
    request_id: RequestId,
    timer: Option<JoinHandle<()>>,
    active: Arc<AtomicBool>,
}

pub struct StatusPoller {
    state: PollerState,
    session: Option<PollSession>,
    events: broadcast::Sender<PollEvent>,
}

impl StatusPoller {
    /// Starts polling when `request_id` is known, otherwise stays `Idle`.
    /// Must be called from within a tokio runtime.
    pub fn start<V>(
        config: PollerConfig,
        request_id: Option<RequestId>,
        source: Arc<dyn StatusSource>,
        renderer: Arc<Mutex<StatusRenderer<V>>>,
    ) -> Self
    where
        V: StatusView + 'static,
    {
        let (events, _) = broadcast::channel(64);
        let Some(request_id) = request_id else {
            debug!("poll: no request id, poller idle");
            return Self {
                state: PollerState::Idle,
                session: None,
                events,
            };
        };

        let period = config.period();
        if period != config.interval {
            warn!(requested = ?config.interval, ?period, "poll: interval raised to minimum");
        }
        let active = Arc::new(AtomicBool::new(true));
        let timer = tokio::spawn(run_timer(
            period,
            request_id,
            source,
            renderer,
            Arc::clone(&active),
            events.clone(),
        ));
        info!(
            request_id = request_id.0,
            interval = ?period,
            "poll: session started"
        );

        Self {
            state: PollerState::Active,
            session: Some(PollSession {
                request_id,
                timer: Some(timer),
                active,
            }),
            events,
        }
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn request_id(&self) -> Option<RequestId> {
        self.session.as_ref().map(|session| session.request_id)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PollEvent> {
        self.events.subscribe()
    }

    /// Clears the timer. Fetches already in flight finish but no longer
    /// render.
    pub fn stop(&mut self) {
        if self.state == PollerState::Stopped {
            return;
        }
        if let Some(mut session) = self.session.take() {
            session.active.store(false, Ordering::Release);
            if let Some(timer) = session.timer.take() {
                timer.abort();
            }
            info!(request_id = session.request_id.0, "poll: session stopped");
        }
        self.state = PollerState::Stopped;
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_timer<V>(
    period: Duration,
    request_id: RequestId,
    source: Arc<dyn StatusSource>,
    renderer: Arc<Mutex<StatusRenderer<V>>>,
    active: Arc<AtomicBool>,
    events: broadcast::Sender<PollEvent>,
) where
    V: StatusView + 'static,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        tokio::spawn(run_tick(
            request_id,
            Arc::clone(&source),
            Arc::clone(&renderer),
            Arc::clone(&active),
            events.clone(),
        ));
    }
}

async fn run_tick<V>(
    request_id: RequestId,
    source: Arc<dyn StatusSource>,
    renderer: Arc<Mutex<StatusRenderer<V>>>,
    active: Arc<AtomicBool>,
    events: broadcast::Sender<PollEvent>,
) where
    V: StatusView + 'static,
{
    match source.fetch_status(request_id).await {
        Ok(result) => {
            let mut renderer = renderer.lock().await;
            if !active.load(Ordering::Acquire) {
                debug!(
                    request_id = request_id.0,
                    "poll: dropping result that resolved after stop"
                );
                return;
            }
            renderer.render(&result);
            let _ = events.send(PollEvent::Rendered {
                request_id,
                status: result.status,
            });
        }
        Err(err) => {
            warn!(request_id = request_id.0, error = %err, "poll: tick failed");
            let _ = events.send(PollEvent::TickFailed {
                request_id,
                error: err.to_string(),
            });
        }
    }
}

#[cfg(test)]
#[path = "tests/poller_tests.rs"]
mod tests;
