use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::errors::ReportError;
use crate::persistence::{format_duration, AverageSink};
use crate::scheduler::RunStats;

/// Snapshot returned by the status endpoint. Every field is rendered as
/// text, including the tick count.
#[derive(Debug, Clone, Serialize)]
pub struct LatencyReport {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "AverageLatency")]
    pub average_latency: String,
    #[serde(rename = "MeasurementDuration")]
    pub measurement_duration: String,
    #[serde(rename = "TotalNumberOfLatencyChecks")]
    pub total_checks: String,
}

/// Read-only view of the measurement loop's state.
#[derive(Clone)]
pub struct ReportState {
    pub target_url: String,
    pub sink: Arc<dyn AverageSink>,
    pub stats: Arc<RunStats>,
}

pub fn create_router(state: ReportState) -> Router {
    Router::new()
        .route("/", get(status_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /: the latest persisted average plus run metadata. A failure to
/// read the record yields a 500 for this request only.
async fn status_report(
    State(state): State<ReportState>,
) -> Result<Json<LatencyReport>, (StatusCode, String)> {
    let average_latency = state.sink.load().await.map_err(|e| {
        error!(error = %e, "failed to load persisted average");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(LatencyReport {
        url: state.target_url.clone(),
        average_latency,
        measurement_duration: format_duration(state.stats.measurement_duration()),
        total_checks: state.stats.total_ticks().to_string(),
    }))
}

/// Status report server, run concurrently with the measurement loop.
/// Binding is split from serving so a bind failure surfaces at startup.
pub struct ReportServer {
    addr: SocketAddr,
    state: ReportState,
}

impl ReportServer {
    pub fn new(addr: SocketAddr, state: ReportState) -> Self {
        Self { addr, state }
    }

    pub async fn bind(self) -> Result<BoundReportServer, ReportError> {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|source| ReportError::Bind {
                addr: self.addr,
                source,
            })?;
        info!("status report server listening on {}", self.addr);
        Ok(BoundReportServer {
            listener,
            state: self.state,
        })
    }
}

pub struct BoundReportServer {
    listener: tokio::net::TcpListener,
    state: ReportState,
}

impl std::fmt::Debug for BoundReportServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundReportServer")
            .field("listener", &self.listener)
            .finish_non_exhaustive()
    }
}

impl BoundReportServer {
    pub async fn serve(self) -> Result<(), ReportError> {
        let app = create_router(self.state);
        axum::serve(self.listener, app)
            .await
            .map_err(ReportError::Serve)
    }
}
