//! Response DTOs for the tool API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, TtlClass};
use crate::tools::ToolKind;

/// Response body of a tool call (POST /tools/:name)
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse {
    /// Name of the tool that ran
    pub tool: String,
    /// Rendered page or export confirmation
    pub content: String,
}

impl ToolResponse {
    pub fn new(tool: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            content: content.into(),
        }
    }
}

/// One catalogue entry (GET /tools)
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// "short" or "long"
    pub ttl_class: TtlClass,
}

impl From<ToolKind> for ToolDescriptor {
    fn from(kind: ToolKind) -> Self {
        Self {
            name: kind.name(),
            description: kind.description(),
            ttl_class: kind.ttl_class(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Current number of cached results
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            size: stats.size,
            capacity: stats.capacity,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
