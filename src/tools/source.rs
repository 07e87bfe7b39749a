//! Market Data Sources
//!
//! The seam between the tool layer and whatever produces raw market data.
//! [`FixtureSource`] serves canned datasets, keyed the same way the cache
//! is, and counts how often it is asked.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::CacheKey;
use crate::dataset::{Dataset, DatasetError};
use crate::models::ToolArgs;
use crate::tools::kind::ToolKind;
use crate::tools::request::ToolRequest;

/// Failure reported by a data source. Never cached.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("company ticker {0} not found")]
    NotFound(String),

    #[error("upstream provider failed: {0}")]
    Upstream(String),

    #[error("upstream provider rate limit reached, retry later")]
    RateLimited,
}

/// Produces the full, unpaginated result of a tool request.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch(&self, request: &ToolRequest) -> Result<Dataset, FetchError>;
}

// == Fixture Source ==
#[derive(Debug, Default)]
pub struct FixtureSource {
    responses: RwLock<HashMap<CacheKey, Result<Dataset, FetchError>>>,
    fetches: AtomicUsize,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `dataset` for every request that maps to `key`.
    pub async fn insert(&self, key: CacheKey, dataset: Dataset) {
        self.responses.write().await.insert(key, Ok(dataset));
    }

    /// Makes requests that map to `key` fail with `error`.
    pub async fn fail(&self, key: CacheKey, error: FetchError) {
        self.responses.write().await.insert(key, Err(error));
    }

    /// Number of fetches served or refused so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.responses.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Loads every `*.json` fixture file in `dir`.
    ///
    /// Each file holds `{"tool": .., "args": {..}, "data": ..}`; the arguments
    /// go through the same parsing as a live call, so the fixture answers
    /// exactly the requests that share its cache key.
    pub fn load_dir(dir: &Path) -> Result<Self, FixtureError> {
        let io_error = |path: &Path, source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|source| io_error(dir, source))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut responses = HashMap::new();
        for path in paths {
            let text = std::fs::read_to_string(&path).map_err(|source| io_error(&path, source))?;
            let (key, dataset) = parse_fixture(&path, &text)?;
            debug!(path = %path.display(), key = %key, items = dataset.len(), "fixture loaded");
            responses.insert(key, Ok(dataset));
        }

        info!(dir = %dir.display(), count = responses.len(), "fixtures loaded");
        Ok(Self {
            responses: RwLock::new(responses),
            fetches: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl MarketDataSource for FixtureSource {
    async fn fetch(&self, request: &ToolRequest) -> Result<Dataset, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let key = request.cache_key();
        match self.responses.read().await.get(&key) {
            Some(response) => response.clone(),
            None => Err(FetchError::NotFound(request.ticker.clone())),
        }
    }
}

// == Fixture Files ==
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("cannot read fixture {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture {} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("fixture {} names unknown tool '{tool}'", path.display())]
    UnknownTool { path: PathBuf, tool: String },

    #[error("fixture {} has invalid arguments: {message}", path.display())]
    InvalidArgs { path: PathBuf, message: String },

    #[error("fixture {} has unusable data: {source}", path.display())]
    Data {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    tool: String,
    #[serde(default)]
    args: ToolArgs,
    data: Value,
}

fn parse_fixture(path: &Path, text: &str) -> Result<(CacheKey, Dataset), FixtureError> {
    let file: FixtureFile = serde_json::from_str(text).map_err(|source| FixtureError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let kind = ToolKind::from_name(&file.tool).ok_or_else(|| FixtureError::UnknownTool {
        path: path.to_path_buf(),
        tool: file.tool.clone(),
    })?;
    let request = ToolRequest::parse(kind, &file.args).map_err(|err| FixtureError::InvalidArgs {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let dataset = Dataset::from_json(file.data).map_err(|source| FixtureError::Data {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((request.cache_key(), dataset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn request(ticker: &str) -> ToolRequest {
        ToolRequest::parse(ToolKind::StockInfo, &ToolArgs::for_ticker(ticker)).unwrap()
    }

    #[tokio::test]
    async fn test_fixture_serves_by_cache_key() {
        let source = FixtureSource::new();
        let dataset = Dataset::from_json(json!({"symbol": "AAPL"})).unwrap();
        source.insert(request("AAPL").cache_key(), dataset.clone()).await;

        assert_eq!(source.fetch(&request("aapl")).await, Ok(dataset));
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_key_is_not_found() {
        let source = FixtureSource::new();

        let result = source.fetch(&request("ZZZZ")).await;

        assert_eq!(result, Err(FetchError::NotFound("ZZZZ".to_string())));
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_replaced_by_insert() {
        let source = FixtureSource::new();
        let key = request("AAPL").cache_key();
        source.fail(key.clone(), FetchError::RateLimited).await;
        assert_eq!(
            source.fetch(&request("AAPL")).await,
            Err(FetchError::RateLimited)
        );

        source.insert(key, Dataset::empty_table()).await;
        assert_eq!(
            source.fetch(&request("AAPL")).await,
            Ok(Dataset::empty_table())
        );
    }

    #[tokio::test]
    async fn test_load_dir_reads_json_fixtures() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("aapl_prices.json"),
            json!({
                "tool": "get_historical_stock_prices",
                "args": {"ticker": "aapl", "period": "5d"},
                "data": [{"Date": "2024-01-02", "Close": 185.64}]
            })
            .to_string(),
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = FixtureSource::load_dir(dir.path()).unwrap();
        assert_eq!(source.len().await, 1);

        let request = ToolRequest::parse(
            ToolKind::HistoricalStockPrices,
            &ToolArgs {
                period: Some("5d".to_string()),
                ..ToolArgs::for_ticker("AAPL")
            },
        )
        .unwrap();
        let dataset = source.fetch(&request).await.unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_load_dir_rejects_unknown_tool() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("bad.json"),
            r#"{"tool": "get_weather", "args": {"ticker": "X"}, "data": []}"#,
        )
        .unwrap();

        let err = FixtureSource::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, FixtureError::UnknownTool { .. }));
    }

    #[test]
    fn test_load_dir_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = FixtureSource::load_dir(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
