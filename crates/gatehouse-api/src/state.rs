//! Shared application state injected into every handler and middleware.

use std::sync::Arc;
use std::time::Instant;

use gatehouse_auth::client::ClientInfoExtractor;
use gatehouse_auth::{AuthResolver, FingerprintCache, SessionStore, TokenService};
use gatehouse_core::config::AppConfig;
use gatehouse_database::Repositories;

use crate::middleware::traffic::{MetricRecorder, TrafficStats};

/// Application-wide shared state.
///
/// Constructed once at startup and cloned per request. All fields are
/// cheaply cloneable (`Arc` or `Copy`).
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────────
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Process start time, reported by the health endpoint.
    pub started: Instant,

    // ── Repositories ─────────────────────────────────────────────
    /// Repository ports wired to the selected backend.
    pub repos: Repositories,

    // ── Authentication ───────────────────────────────────────────
    /// Session lifecycle operations.
    pub session_store: Arc<SessionStore>,
    /// API token issuance and validation.
    pub token_service: Arc<TokenService>,
    /// Per-request credential resolution (cookie first, then bearer).
    pub auth_resolver: Arc<AuthResolver>,

    // ── Client context ───────────────────────────────────────────
    /// Request metadata extraction (IP, user agent, geo, fingerprint).
    pub client_extractor: Arc<ClientInfoExtractor>,
    /// Memoized fingerprint computations.
    pub fingerprint_cache: Arc<FingerprintCache>,

    // ── Traffic ──────────────────────────────────────────────────
    /// Process-wide aggregate request counters.
    pub traffic_stats: Arc<TrafficStats>,
    /// Fire-and-forget metric persistence.
    pub metric_recorder: MetricRecorder,
}
