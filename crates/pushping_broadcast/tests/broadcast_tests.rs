use pushping_broadcast::{Broadcaster, TickOutcome};
use pushping_common::{
    store_unavailable, BoxFuture, PushGateway, PushPingError, TokenRecord, TokenStore,
    UpsertOutcome,
};
use pushping_config::BroadcastConfig;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Store with a fixed token list; `down` fails every read.
struct FixedStore {
    tokens: Vec<String>,
    down: AtomicBool,
}

impl FixedStore {
    fn with(tokens: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            down: AtomicBool::new(false),
        })
    }
}

impl TokenStore for FixedStore {
    fn upsert_token(
        &self,
        _token: &str,
        _name: Option<&str>,
    ) -> BoxFuture<'_, UpsertOutcome, PushPingError> {
        Box::pin(async move { Ok(UpsertOutcome::Inserted) })
    }

    fn list_tokens(&self) -> BoxFuture<'_, Vec<String>, PushPingError> {
        Box::pin(async move {
            if self.down.load(Ordering::SeqCst) {
                return Err(store_unavailable("connection reset"));
            }
            Ok(self.tokens.clone())
        })
    }

    fn find_token(&self, _token: &str) -> BoxFuture<'_, Option<TokenRecord>, PushPingError> {
        Box::pin(async move { Ok(None) })
    }
}

/// Gateway recording every call and rejecting the tokens in `reject`.
#[derive(Default)]
struct RecordingGateway {
    calls: Mutex<Vec<(String, Value)>>,
    reject: HashSet<String>,
}

impl RecordingGateway {
    fn rejecting(tokens: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            reject: tokens.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        })
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

impl PushGateway for RecordingGateway {
    fn send_notification(
        &self,
        token: &str,
        data: &Value,
    ) -> BoxFuture<'_, Value, PushPingError> {
        let token = token.to_string();
        let data = data.clone();
        Box::pin(async move {
            self.calls.lock().unwrap().push((token.clone(), data));
            if self.reject.contains(&token) {
                Err(PushPingError::GatewayRejected {
                    status: 400,
                    body: "DeviceNotRegistered".to_string(),
                })
            } else {
                Ok(json!({"data": {"status": "ok"}}))
            }
        })
    }
}

/// Gateway whose first send takes `first_send`; records when each send starts
/// and ends, measured from `origin`.
struct TimedGateway {
    origin: Instant,
    first_send: Duration,
    sends: AtomicUsize,
    spans: Mutex<Vec<(Duration, Duration)>>,
}

impl TimedGateway {
    fn new(origin: Instant, first_send: Duration) -> Arc<Self> {
        Arc::new(Self {
            origin,
            first_send,
            sends: AtomicUsize::new(0),
            spans: Mutex::new(Vec::new()),
        })
    }

    fn spans(&self) -> Vec<(Duration, Duration)> {
        self.spans.lock().unwrap().clone()
    }
}

impl PushGateway for TimedGateway {
    fn send_notification(
        &self,
        _token: &str,
        _data: &Value,
    ) -> BoxFuture<'_, Value, PushPingError> {
        Box::pin(async move {
            let start = self.origin.elapsed();
            if self.sends.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(self.first_send).await;
            }
            self.spans
                .lock()
                .unwrap()
                .push((start, self.origin.elapsed()));
            Ok(json!({"data": {"status": "ok"}}))
        })
    }
}

fn broadcaster(store: Arc<FixedStore>, gateway: Arc<RecordingGateway>) -> Broadcaster {
    Broadcaster::from_config(store, gateway, &BroadcastConfig::default())
}

#[tokio::test]
async fn test_failing_token_does_not_stop_the_next() {
    let store = FixedStore::with(&["A", "B"]);
    let gateway = RecordingGateway::rejecting(&["A"]);

    let outcome = broadcaster(store, gateway.clone()).run_tick().await;

    let report = match outcome {
        TickOutcome::Dispatched(report) => report,
        other => panic!("expected a dispatched tick, got {other:?}"),
    };
    assert_eq!(report.attempted, 2);
    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures[0].0, "A");

    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "A");
    assert_eq!(calls[1].0, "B");
    assert_eq!(calls[1].1, json!({"type": "ping", "id": "auto-5s"}));
}

#[tokio::test]
async fn test_store_failure_skips_the_tick() {
    let store = FixedStore::with(&["A"]);
    store.down.store(true, Ordering::SeqCst);
    let gateway = Arc::new(RecordingGateway::default());

    let outcome = broadcaster(store, gateway.clone()).run_tick().await;

    assert!(matches!(
        outcome,
        TickOutcome::Skipped(PushPingError::StoreUnavailable(_))
    ));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_empty_store_sends_nothing() {
    let gateway = Arc::new(RecordingGateway::default());

    let outcome = broadcaster(FixedStore::with(&[]), gateway.clone())
        .run_tick()
        .await;

    assert!(matches!(outcome, TickOutcome::Idle));
    assert!(gateway.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_spawned_loop_ticks_every_period_and_survives_store_outage() {
    let store = FixedStore::with(&["A"]);
    let gateway = Arc::new(RecordingGateway::default());
    let handle = Broadcaster::new(
        store.clone(),
        gateway.clone(),
        json!({"type": "ping"}),
        Duration::from_secs(5),
    )
    .spawn();

    // first tick fires one period after start, not immediately
    tokio::time::sleep(Duration::from_millis(4_900)).await;
    assert_eq!(gateway.calls().len(), 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(gateway.calls().len(), 1);

    store.down.store(true, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(gateway.calls().len(), 1);

    store.down.store(false, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(gateway.calls().len(), 2);

    handle.shutdown().await;
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(gateway.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_before_first_tick() {
    let gateway = Arc::new(RecordingGateway::default());
    let handle = broadcaster(FixedStore::with(&["A"]), gateway.clone()).spawn();

    handle.shutdown().await;
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert!(gateway.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_overrunning_tick_delays_the_next_without_catch_up() {
    let origin = Instant::now();
    let gateway = TimedGateway::new(origin, Duration::from_secs(7));
    let handle = Broadcaster::new(
        FixedStore::with(&["A"]),
        gateway.clone(),
        json!({"type": "ping"}),
        Duration::from_secs(5),
    )
    .spawn();

    tokio::time::sleep(Duration::from_secs(29)).await;
    handle.shutdown().await;

    let spans = gateway.spans();
    for pair in spans.windows(2) {
        assert!(
            pair[1].0 >= pair[0].1,
            "tick started at {:?} before the previous one ended at {:?}",
            pair[1].0,
            pair[0].1
        );
    }

    // the 7s first send ends at 12s; the missed 10s tick fires once, then the
    // schedule restarts from 12s
    let starts: Vec<u64> = spans.iter().map(|(start, _)| start.as_secs()).collect();
    assert_eq!(starts, vec![5, 12, 17, 22, 27]);
    assert_eq!(spans[0].1.as_secs(), 12);
}
