//! Request DTOs for the tool API
//!
//! Defines the structure of incoming tool-call arguments.

use serde::Deserialize;

/// Arguments of a tool call (POST /tools/:name)
///
/// Every field is optional on the wire; which ones a tool requires is
/// decided when the arguments are parsed into a typed request. Arguments a
/// tool does not use are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolArgs {
    /// Ticker symbol, e.g. "AAPL"
    pub ticker: Option<String>,
    pub period: Option<String>,
    pub interval: Option<String>,
    /// Fields (or columns) to keep; the rest are dropped from the view
    pub fields: Option<Vec<String>>,
    pub financial_type: Option<String>,
    pub holder_type: Option<String>,
    /// Option expiration date, YYYY-MM-DD
    pub expiration_date: Option<String>,
    pub option_type: Option<String>,
    pub recommendation_type: Option<String>,
    pub months_back: Option<i64>,
    /// 1-based page number
    pub page: Option<i64>,
    /// When set, the full result is written here instead of paginated
    pub export_path: Option<String>,
}

impl ToolArgs {
    /// Arguments holding only a ticker.
    pub fn for_ticker(ticker: impl Into<String>) -> Self {
        Self {
            ticker: Some(ticker.into()),
            ..Self::default()
        }
    }
}
