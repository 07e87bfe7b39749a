//! API Handlers
//!
//! HTTP request handlers for each tool server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::Result;
use crate::models::{HealthResponse, StatsResponse, ToolArgs, ToolDescriptor, ToolResponse};
use crate::tools::{MarketDataSource, ToolKind, ToolService};

/// Application state shared across all handlers.
///
/// The service owns the one shared cache every request goes through.
#[derive(Clone)]
pub struct AppState {
    pub service: ToolService,
}

impl AppState {
    pub fn new(service: ToolService) -> Self {
        Self { service }
    }

    /// Creates a new AppState from configuration and a data source.
    pub fn from_config(config: &Config, source: Arc<dyn MarketDataSource>) -> Self {
        Self::new(ToolService::from_config(config, source))
    }
}

/// Handler for POST /tools/:name
///
/// Runs one tool and returns its rendered text.
pub async fn call_tool_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(args): Json<ToolArgs>,
) -> Result<Json<ToolResponse>> {
    let content = state.service.call(&name, &args).await?;
    Ok(Json(ToolResponse::new(name, content)))
}

/// Handler for GET /tools
pub async fn list_tools_handler() -> Json<Vec<ToolDescriptor>> {
    Json(ToolKind::ALL.into_iter().map(ToolDescriptor::from).collect())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.service.cache().stats().await;
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
