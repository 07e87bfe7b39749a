//! Tools Module
//!
//! The market-data tools: catalogue, argument parsing, projection, the data
//! source seam and the service that ties them to the cache and pager.

pub mod kind;
pub mod projection;
pub mod request;
pub mod service;
pub mod source;

pub use kind::{
    FinancialType, HolderType, InvalidChoice, OptionType, RecommendationType, ToolKind,
};
pub use projection::project;
pub use request::{ToolQuery, ToolRequest};
pub use service::{DatasetCache, ToolService};
pub use source::{FetchError, FixtureError, FixtureSource, MarketDataSource};
