//! HTTP trigger service
//!
//! `POST /check` runs a real check and `POST /test` a dry run; both answer
//! `{"output": "<transcript>"}` so an operator page can show what happened.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::monitor::cycle::MonitorCycle;

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub output: String,
}

pub fn router(cycle: Arc<MonitorCycle>) -> Router {
    Router::new()
        .route("/check", post(run_check))
        .route("/test", post(run_test))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(cycle)
}

async fn run_check(State(cycle): State<Arc<MonitorCycle>>) -> Json<TranscriptResponse> {
    let report = cycle.run_check().await;
    Json(TranscriptResponse {
        output: report.transcript.render(),
    })
}

async fn run_test(State(cycle): State<Arc<MonitorCycle>>) -> Json<TranscriptResponse> {
    let report = cycle.run_dry_run().await;
    Json(TranscriptResponse {
        output: report.transcript.render(),
    })
}

pub async fn serve(cycle: Arc<MonitorCycle>, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(cycle)).await
}
