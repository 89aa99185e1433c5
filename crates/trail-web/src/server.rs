//! Lightweight axum web server for the command-usage dashboard.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use trail_core::error::{Result, TrailError};
use trail_core::models::CollectionSummary;
use trail_export::chart::render_chart;

use crate::page;

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Immutable view of one collection run, captured at startup.
///
/// All dashboard requests read from this snapshot; there is no live refresh
/// and no write operation is exposed.
#[derive(Debug, Clone)]
pub struct Snapshot {
    ranked: Vec<(String, u64)>,
    summary: CollectionSummary,
    top_n: usize,
}

impl Snapshot {
    pub fn new(ranked: Vec<(String, u64)>, summary: CollectionSummary, top_n: usize) -> Self {
        Self {
            ranked,
            summary,
            top_n,
        }
    }

    /// Entries whose command name contains `filter`.
    ///
    /// Command names are normalized to lowercase at extraction time, so
    /// lowercasing the needle makes the match case-insensitive. An empty
    /// filter returns everything, ranked order preserved.
    pub fn filtered(&self, filter: &str) -> Vec<(String, u64)> {
        if filter.trim().is_empty() {
            return self.ranked.clone();
        }
        let needle = filter.trim().to_lowercase();
        self.ranked
            .iter()
            .filter(|(command, _)| command.contains(&needle))
            .cloned()
            .collect()
    }

    pub fn total_entries(&self) -> usize {
        self.ranked.len()
    }
}

// ── DashboardServer ───────────────────────────────────────────────────────────

/// The dashboard web server.
pub struct DashboardServer {
    snapshot: Arc<Snapshot>,
    port: u16,
}

#[derive(Clone)]
struct AppState {
    snapshot: Arc<Snapshot>,
}

#[derive(Deserialize)]
struct FilterParams {
    q: Option<String>,
}

#[derive(Serialize)]
struct CommandRow {
    command: String,
    count: u64,
}

#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandRow>,
    matched: usize,
    total: usize,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

impl DashboardServer {
    pub fn new(snapshot: Arc<Snapshot>, port: u16) -> Self {
        Self { snapshot, port }
    }

    /// Start the web server. This blocks until the server is shut down.
    ///
    /// A bind failure (port in use) is fatal and maps to
    /// [`TrailError::DashboardBind`].
    pub async fn start(&self) -> Result<()> {
        let app = Self::router(self.snapshot.clone());

        let addr = std::net::SocketAddr::from(([127, 0, 0, 1], self.port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| TrailError::DashboardBind {
                port: self.port,
                source,
            })?;
        tracing::info!("Dashboard listening on http://{}", addr);

        axum::serve(listener, app).await?;
        Ok(())
    }

    /// Build the router (useful for testing without binding to a port).
    pub fn router(snapshot: Arc<Snapshot>) -> Router {
        let state = AppState { snapshot };
        Router::new()
            .route("/", get(index_handler))
            .route("/api/commands", get(commands_handler))
            .route("/api/summary", get(summary_handler))
            .route("/chart.svg", get(chart_handler))
            .route("/health", get(health_handler))
            .with_state(state)
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn index_handler() -> impl IntoResponse {
    Html(page::render_index_page())
}

async fn commands_handler(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> impl IntoResponse {
    Json(commands_payload(
        &state.snapshot,
        params.q.as_deref().unwrap_or(""),
    ))
}

async fn summary_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.snapshot.summary.clone())
}

async fn chart_handler(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> impl IntoResponse {
    let entries = state.snapshot.filtered(params.q.as_deref().unwrap_or(""));
    let svg = render_chart(&entries, state.snapshot.top_n);
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

fn commands_payload(snapshot: &Snapshot, filter: &str) -> CommandsResponse {
    let matches = snapshot.filtered(filter);
    CommandsResponse {
        matched: matches.len(),
        total: snapshot.total_entries(),
        commands: matches
            .into_iter()
            .map(|(command, count)| CommandRow { command, count })
            .collect(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use trail_core::models::{SourceKind, SourceReport};

    fn snapshot() -> Snapshot {
        let summary = CollectionSummary {
            generated_at: "2024-01-15T10:00:00Z".to_string(),
            elapsed_seconds: 0.2,
            sources: vec![
                SourceReport::available(SourceKind::History, 4),
                SourceReport::unavailable(SourceKind::Audit, "ausearch: not found"),
            ],
            total_lines: 4,
            total_commands: 7,
            unique_commands: 3,
        };
        Snapshot::new(
            vec![
                ("ls".to_string(), 4),
                ("grep".to_string(), 2),
                ("vim".to_string(), 1),
            ],
            summary,
            20,
        )
    }

    #[test]
    fn test_filtered_empty_returns_all_in_order() {
        let snap = snapshot();
        let all = snap.filtered("");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].0, "ls");
        assert_eq!(all[2].0, "vim");
    }

    #[test]
    fn test_filtered_substring_match() {
        let snap = snapshot();
        let hits = snap.filtered("re");
        assert_eq!(hits, vec![("grep".to_string(), 2)]);
    }

    #[test]
    fn test_filtered_case_insensitive() {
        let snap = snapshot();
        assert_eq!(snap.filtered("LS"), snap.filtered("ls"));
        assert_eq!(snap.filtered("LS").len(), 1);
    }

    #[test]
    fn test_filtered_no_match() {
        let snap = snapshot();
        assert!(snap.filtered("zzz").is_empty());
    }

    #[test]
    fn test_commands_payload_counts() {
        let snap = snapshot();
        let payload = commands_payload(&snap, "ls");
        assert_eq!(payload.matched, 1);
        assert_eq!(payload.total, 3);
        assert_eq!(payload.commands[0].command, "ls");
        assert_eq!(payload.commands[0].count, 4);
    }

    #[test]
    fn test_router_builds() {
        let _router = DashboardServer::router(Arc::new(snapshot()));
    }

    #[test]
    fn test_chart_of_filtered_view() {
        let snap = snapshot();
        let svg = render_chart(&snap.filtered("grep"), snap.top_n);
        assert!(svg.contains(">grep</text>"));
        assert!(!svg.contains(">ls</text>"));
    }
}
