//! The broadcast timer.
//!
//! A [`Broadcaster`] owns nothing but handles to the store and the gateway; every
//! tick re-reads the token set. [`Broadcaster::spawn`] moves it onto its own task
//! and returns a [`BroadcastHandle`] that stops the loop between ticks.

use futures_util::StreamExt;
use pushping_common::{token_hint, PingData, PushGateway, PushPingError, TokenStore};
use pushping_config::BroadcastConfig;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::dispatch::{dispatch_all, TickReport};

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// The token set could not be read; nothing was sent.
    Skipped(PushPingError),
    /// No tokens registered.
    Idle,
    Dispatched(TickReport),
}

pub struct Broadcaster {
    store: Arc<dyn TokenStore>,
    gateway: Arc<dyn PushGateway>,
    data: Value,
    period: Duration,
}

impl Broadcaster {
    pub fn new(
        store: Arc<dyn TokenStore>,
        gateway: Arc<dyn PushGateway>,
        data: Value,
        period: Duration,
    ) -> Self {
        Self {
            store,
            gateway,
            data,
            period,
        }
    }

    /// A broadcaster sending the configured `{type, id}` ping every
    /// `interval_secs`.
    pub fn from_config(
        store: Arc<dyn TokenStore>,
        gateway: Arc<dyn PushGateway>,
        config: &BroadcastConfig,
    ) -> Self {
        let data = PingData::new(&config.data_type, &config.data_id).to_value();
        Self::new(
            store,
            gateway,
            data,
            Duration::from_secs(config.interval_secs),
        )
    }

    /// Run one tick: read every token and send the ping to each in turn.
    ///
    /// Never fails. A store error skips the tick; a gateway error is recorded
    /// against its token and the remaining tokens are still sent to.
    pub async fn run_tick(&self) -> TickOutcome {
        let tokens = match self.store.list_tokens().await {
            Ok(tokens) => tokens,
            Err(err) => {
                error!("❌ Broadcast skipped, could not read tokens: {}", err);
                return TickOutcome::Skipped(err);
            }
        };

        if tokens.is_empty() {
            debug!("No tokens registered, nothing to broadcast");
            return TickOutcome::Idle;
        }

        let report = dispatch_all(self.gateway.as_ref(), tokens, &self.data)
            .fold(TickReport::default(), |mut report, delivery| async move {
                match &delivery.outcome {
                    Ok(receipt) => info!("📨 Sent to {}: {}", token_hint(&delivery.token), receipt),
                    Err(err) => error!("❌ Push error for {}: {}", token_hint(&delivery.token), err),
                }
                report.record(delivery);
                report
            })
            .await;

        if report.failed() > 0 {
            warn!(
                "Broadcast finished with failures: {}/{} delivered",
                report.delivered, report.attempted
            );
        }

        TickOutcome::Dispatched(report)
    }

    /// Start the timer loop on its own task.
    ///
    /// The first tick fires one period from now. A tick that overruns the period
    /// delays the next one instead of causing a burst, and ticks never overlap.
    pub fn spawn(self) -> BroadcastHandle {
        let cancel = CancellationToken::new();
        let child = cancel.child_token();

        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!("Broadcast loop started (every {:?})", self.period);
            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        self.run_tick().await;
                    }
                }
            }
            info!("Broadcast loop stopped");
        });

        BroadcastHandle { cancel, task }
    }
}

/// Stops a spawned [`Broadcaster`].
pub struct BroadcastHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl BroadcastHandle {
    /// Cancel the loop and wait for a tick in progress to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            error!("Broadcast task ended abnormally: {}", err);
        }
    }
}
