//! Per-token dispatch.
//!
//! [`dispatch_all`] yields one [`Delivery`] per token, sending lazily and in
//! order: the next send starts only when the stream is polled again. Failures
//! are values in the stream, never errors of the stream.

use futures_util::stream::{self, Stream, StreamExt};
use pushping_common::{PushGateway, PushPingError};
use serde_json::Value;

/// The result of sending to one token.
#[derive(Debug)]
pub struct Delivery {
    pub token: String,
    /// The gateway's receipt, or why this token failed
    pub outcome: Result<Value, PushPingError>,
}

/// Counts for one broadcast tick.
#[derive(Debug, Default)]
pub struct TickReport {
    pub attempted: usize,
    pub delivered: usize,
    /// Failed tokens with their errors, in dispatch order
    pub failures: Vec<(String, PushPingError)>,
}

impl TickReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn record(&mut self, delivery: Delivery) {
        self.attempted += 1;
        match delivery.outcome {
            Ok(_) => self.delivered += 1,
            Err(err) => self.failures.push((delivery.token, err)),
        }
    }
}

/// Send `data` to every token, one after another.
pub fn dispatch_all<'a>(
    gateway: &'a dyn PushGateway,
    tokens: Vec<String>,
    data: &'a Value,
) -> impl Stream<Item = Delivery> + Send + 'a {
    stream::iter(tokens).then(move |token| async move {
        let outcome = gateway.send_notification(&token, data).await;
        Delivery { token, outcome }
    })
}
