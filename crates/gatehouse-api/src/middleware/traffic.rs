//! Traffic metric capture middleware.
//!
//! Wraps the response body to observe status, byte count, and, for
//! error responses only, an excerpt of the body text. The finished
//! metric is persisted fire-and-forget on a detached task so the
//! response path never waits on the metrics sink, and a client
//! disconnect mid-body still produces a metric.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use futures::stream::{BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use gatehouse_database::TrafficMetricRepository;
use gatehouse_entity::auth::AuthenticationResult;
use gatehouse_entity::client::ClientInfo;
use gatehouse_entity::metric::TrafficMetric;

use crate::state::AppState;

/// Maximum bytes of an error response body kept for diagnostics.
const ERROR_EXCERPT_BYTES: usize = 1000;

/// How often the retention sweeper runs.
const RETENTION_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Infrastructure paths that are never instrumented.
const EXCLUDED_PATHS: [&str; 4] = ["/health", "/favicon.ico", "/robots.txt", "/sitemap.xml"];
const EXCLUDED_PREFIXES: [&str; 1] = ["/static/"];

/// Whether a path is excluded from metric capture.
pub fn is_excluded_path(path: &str) -> bool {
    EXCLUDED_PATHS.contains(&path)
        || EXCLUDED_PREFIXES
            .iter()
            .any(|prefix| path.starts_with(prefix))
}

/// Process-wide aggregate counters, updated on every captured response.
#[derive(Debug, Default)]
pub struct TrafficStats {
    requests_total: AtomicU64,
    responses_2xx: AtomicU64,
    responses_3xx: AtomicU64,
    responses_4xx: AtomicU64,
    responses_5xx: AtomicU64,
    bytes_sent: AtomicU64,
}

impl TrafficStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed response.
    pub fn record(&self, status: u16, bytes: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);

        let class = match status {
            200..=299 => &self.responses_2xx,
            300..=399 => &self.responses_3xx,
            400..=499 => &self.responses_4xx,
            _ => &self.responses_5xx,
        };
        class.fetch_add(1, Ordering::Relaxed);
    }

    /// A point-in-time copy of the counters.
    pub fn snapshot(&self) -> TrafficStatsSnapshot {
        TrafficStatsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            responses_2xx: self.responses_2xx.load(Ordering::Relaxed),
            responses_3xx: self.responses_3xx.load(Ordering::Relaxed),
            responses_4xx: self.responses_4xx.load(Ordering::Relaxed),
            responses_5xx: self.responses_5xx.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view of [`TrafficStats`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrafficStatsSnapshot {
    /// Total captured responses.
    pub requests_total: u64,
    /// Responses with a 2xx status.
    pub responses_2xx: u64,
    /// Responses with a 3xx status.
    pub responses_3xx: u64,
    /// Responses with a 4xx status.
    pub responses_4xx: u64,
    /// Responses with a 5xx status or below 200.
    pub responses_5xx: u64,
    /// Total body bytes sent.
    pub bytes_sent: u64,
}

/// Persists finished metrics without blocking the response path.
#[derive(Debug, Clone)]
pub struct MetricRecorder {
    repo: Arc<dyn TrafficMetricRepository>,
    stats: Arc<TrafficStats>,
}

impl MetricRecorder {
    /// Creates a recorder writing to the given repository.
    pub fn new(repo: Arc<dyn TrafficMetricRepository>, stats: Arc<TrafficStats>) -> Self {
        Self { repo, stats }
    }

    /// Dispatches one metric write on a detached task.
    ///
    /// The write runs to completion independently of the request that
    /// produced it; a failure is logged and never retried.
    pub fn record(&self, metric: TrafficMetric) {
        self.stats
            .record(metric.status_code as u16, metric.response_size as u64);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            // Runtime already gone; nothing to persist against.
            return;
        };

        let repo = Arc::clone(&self.repo);
        handle.spawn(async move {
            if let Err(error) = repo.insert(&metric).await {
                tracing::warn!(
                    path = %metric.path,
                    error = %error,
                    "Failed to persist traffic metric"
                );
            }
        });
    }
}

/// Captures one [`TrafficMetric`] per instrumented request.
pub async fn capture_traffic(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.metrics.enabled || is_excluded_path(request.uri().path()) {
        return next.run(request).await;
    }

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let client = request
        .extensions()
        .get::<ClientInfo>()
        .cloned()
        .unwrap_or_default();
    let identity = request.extensions().get::<AuthenticationResult>().cloned();

    let started = Instant::now();
    let response = next.run(request).await;
    let status = response.status();

    let (user_id, session_token) = identity
        .as_ref()
        .and_then(|result| result.session.as_ref())
        .map(|session| {
            let token = (!session.token.is_empty()).then(|| session.token.clone());
            (Some(session.user_id), token)
        })
        .unwrap_or((None, None));

    let pending = PendingMetric {
        recorder: state.metric_recorder.clone(),
        method,
        path,
        status_code: i32::from(status.as_u16()),
        user_id,
        session_token,
        client,
        started,
    };

    let (parts, body) = response.into_parts();
    let observed = ObservedBody::new(body, pending, status.as_u16() >= 400);
    Response::from_parts(parts, Body::from_stream(observed))
}

/// Metric fields known before the body has streamed.
#[derive(Debug)]
struct PendingMetric {
    recorder: MetricRecorder,
    method: String,
    path: String,
    status_code: i32,
    user_id: Option<Uuid>,
    session_token: Option<String>,
    client: ClientInfo,
    started: Instant,
}

/// Body wrapper that counts bytes and finalizes the metric on drop.
///
/// Drop fires both on normal completion and when the client disconnects
/// mid-stream, so every instrumented request yields exactly one metric.
struct ObservedBody {
    inner: BoxStream<'static, Result<Bytes, axum::Error>>,
    pending: Option<PendingMetric>,
    bytes_sent: u64,
    error_buffer: Option<Vec<u8>>,
}

impl ObservedBody {
    fn new(body: Body, pending: PendingMetric, keep_excerpt: bool) -> Self {
        Self {
            inner: body.into_data_stream().boxed(),
            pending: Some(pending),
            bytes_sent: 0,
            error_buffer: keep_excerpt.then(Vec::new),
        }
    }
}

impl Stream for ObservedBody {
    type Item = Result<Bytes, axum::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let poll = this.inner.poll_next_unpin(cx);

        if let Poll::Ready(Some(Ok(chunk))) = &poll {
            this.bytes_sent += chunk.len() as u64;
            if let Some(buffer) = this.error_buffer.as_mut() {
                let room = ERROR_EXCERPT_BYTES.saturating_sub(buffer.len());
                if room > 0 {
                    buffer.extend_from_slice(&chunk[..chunk.len().min(room)]);
                }
            }
        }

        poll
    }
}

impl Drop for ObservedBody {
    fn drop(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        let elapsed = pending.started.elapsed().as_nanos();
        let metric = TrafficMetric {
            id: Uuid::new_v4(),
            method: pending.method,
            path: pending.path,
            status_code: pending.status_code,
            response_time_ns: elapsed.min(i64::MAX as u128) as i64,
            response_size: self.bytes_sent.min(i64::MAX as u64) as i64,
            error_excerpt: excerpt(self.error_buffer.take(), self.bytes_sent),
            user_id: pending.user_id,
            session_token: pending.session_token,
            occurred_at: Utc::now(),
            client: pending.client,
        };

        pending.recorder.record(metric);
    }
}

/// Builds the stored error excerpt from the buffered body prefix.
///
/// Truncates to [`ERROR_EXCERPT_BYTES`] characters and appends `"..."`
/// when the full body was longer than the buffer.
fn excerpt(buffer: Option<Vec<u8>>, total_bytes: u64) -> Option<String> {
    let buffer = buffer.filter(|buffer| !buffer.is_empty())?;

    let mut text: String = String::from_utf8_lossy(&buffer)
        .chars()
        .take(ERROR_EXCERPT_BYTES)
        .collect();
    if total_bytes > ERROR_EXCERPT_BYTES as u64 {
        text.push_str("...");
    }
    Some(text)
}

/// Periodically deletes metrics older than the configured retention.
#[derive(Debug)]
pub struct MetricRetention {
    repo: Arc<dyn TrafficMetricRepository>,
    retention: chrono::Duration,
}

impl MetricRetention {
    /// Creates a sweeper keeping `retention_days` of metrics.
    pub fn new(repo: Arc<dyn TrafficMetricRepository>, retention_days: u64) -> Self {
        Self {
            repo,
            retention: chrono::Duration::days(retention_days.min(i64::MAX as u64) as i64),
        }
    }

    /// Deletes everything past retention. Returns rows removed.
    pub async fn run_sweep(&self) -> gatehouse_core::result::AppResult<u64> {
        let cutoff = Utc::now() - self.retention;
        let removed = self.repo.delete_older_than(cutoff).await?;
        if removed > 0 {
            tracing::info!(removed, "Trimmed traffic metrics past retention");
        }
        Ok(removed)
    }

    /// Runs the sweeper until the shutdown signal flips.
    pub async fn run(self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            retention_days = self.retention.num_days(),
            "Metric retention sweeper started"
        );

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    tracing::info!("Metric retention sweeper stopping");
                    return;
                }
                _ = tokio::time::sleep(RETENTION_SWEEP_INTERVAL) => {
                    if let Err(error) = self.run_sweep().await {
                        tracing::warn!(error = %error, "Metric retention sweep failed");
                    }
                }
            }
        }
    }
}
