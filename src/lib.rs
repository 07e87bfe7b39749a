//! Market Pager - market-data tool calls shaped for bounded context windows
//!
//! Caches full upstream results under TTL and LRU bounds, serves them one
//! token-budgeted page at a time, and exports them whole on request.

pub mod api;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod models;
pub mod paging;
pub mod tasks;
pub mod tools;

pub use api::AppState;
pub use config::Config;
pub use error::ToolError;
pub use tasks::spawn_cleanup_task;
pub use tools::ToolService;
