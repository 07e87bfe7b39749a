//! Tool Service
//!
//! Answers one tool call: validate, look the query up in the shared cache,
//! fetch on a miss, then either export the full result or render one page
//! of it.

use std::borrow::Cow;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, SharedCache, TtlPolicy};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::ToolError;
use crate::export::export_cancellable;
use crate::models::ToolArgs;
use crate::paging::render::{render_export, render_fields, render_records};
use crate::paging::{paginate, CacheStatus, RenderContext};
use crate::tools::kind::ToolKind;
use crate::tools::projection::project;
use crate::tools::request::ToolRequest;
use crate::tools::source::MarketDataSource;

/// Cache of full upstream results, shared by every caller.
pub type DatasetCache = SharedCache<Arc<Dataset>>;

#[derive(Clone)]
pub struct ToolService {
    cache: DatasetCache,
    source: Arc<dyn MarketDataSource>,
    token_budget: usize,
    overhead_tokens: usize,
    shutdown: CancellationToken,
}

impl ToolService {
    pub fn new(
        cache: DatasetCache,
        source: Arc<dyn MarketDataSource>,
        token_budget: usize,
        overhead_tokens: usize,
    ) -> Self {
        Self {
            cache,
            source,
            token_budget,
            overhead_tokens,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &Config, source: Arc<dyn MarketDataSource>) -> Self {
        let cache = SharedCache::with_capacity(
            config.cache_capacity,
            TtlPolicy::from_secs(config.short_ttl, config.long_ttl),
        );
        Self::new(cache, source, config.token_budget, config.overhead_tokens)
    }

    /// Exports still running when `token` fires are aborted.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    pub fn token_budget(&self) -> usize {
        self.token_budget
    }

    /// Budget left for page items once the header and footer are paid for.
    pub fn content_budget(&self) -> usize {
        self.token_budget.saturating_sub(self.overhead_tokens).max(1)
    }

    // == Call ==
    /// Runs the tool named `tool` with raw `args`.
    pub async fn call(&self, tool: &str, args: &ToolArgs) -> Result<String, ToolError> {
        let kind =
            ToolKind::from_name(tool).ok_or_else(|| ToolError::UnknownTool(tool.to_string()))?;
        let request = ToolRequest::parse(kind, args)?;
        self.execute(&request).await
    }

    pub async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let key = request.cache_key();
        let (dataset, cache_status) = self.load(request, &key).await?;

        let view: Cow<'_, Dataset> = match &request.fields {
            Some(fields) => Cow::Owned(project(&dataset, fields)),
            None => Cow::Borrowed(dataset.as_ref()),
        };

        if let Some(path) = &request.export_path {
            let payload = match view {
                Cow::Owned(projected) => Arc::new(projected),
                Cow::Borrowed(_) => Arc::clone(&dataset),
            };
            let record =
                export_cancellable(payload, path.clone(), self.shutdown.child_token()).await?;
            return Ok(render_export(&record, &request.title()));
        }

        let kind = request.kind();
        let ctx = RenderContext {
            title: request.title(),
            parameters: request.parameters(),
            token_budget: self.token_budget,
            cache_status,
            export_hint: kind.export_hint().to_string(),
        };

        let budget = self.content_budget();
        let text = match view.as_ref() {
            Dataset::Table(rows) => {
                let page = paginate(rows, request.page, budget)?;
                render_records(&page, kind.render_style(), &ctx)
            }
            Dataset::Mapping(fields) => {
                let page = paginate(fields, request.page, budget)?;
                render_fields(&page, &ctx)
            }
        };
        Ok(text)
    }

    /// Full result for `key`, from the cache or freshly fetched.
    async fn load(
        &self,
        request: &ToolRequest,
        key: &CacheKey,
    ) -> Result<(Arc<Dataset>, CacheStatus), ToolError> {
        if let Some(hit) = self.cache.get(key).await {
            debug!(key = %key, age_secs = hit.age.as_secs(), "cache hit");
            return Ok((
                hit.value,
                CacheStatus::Cached {
                    age: hit.age,
                    remaining: hit.remaining,
                },
            ));
        }

        debug!(key = %key, "cache miss, fetching");
        let dataset = match self.source.fetch(request).await {
            Ok(dataset) => Arc::new(dataset),
            Err(err) => {
                warn!(key = %key, error = %err, "fetch failed");
                return Err(err.into());
            }
        };
        info!(tool = %request.kind(), key = %key, items = dataset.len(), "fetched");

        self.cache
            .put(key.clone(), Arc::clone(&dataset), request.kind().ttl_class())
            .await;
        Ok((dataset, CacheStatus::Fresh))
    }
}
