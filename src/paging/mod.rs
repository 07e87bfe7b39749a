//! Paging Module
//!
//! Token-budgeted pagination of cached results and their text rendering.

pub mod estimator;
mod page;
pub mod render;

#[cfg(test)]
mod property_tests;

pub use estimator::{estimate_tokens, tokens_per_item};
pub use page::{items_per_page, paginate, Page, PageError};
pub use render::{CacheStatus, RenderContext, RenderStyle};

// == Public Constants ==
/// Default token budget of one response page
pub const DEFAULT_TOKEN_BUDGET: usize = 6000;

/// Tokens reserved for the header and footer around the page body
pub const DEFAULT_OVERHEAD_TOKENS: usize = 500;
