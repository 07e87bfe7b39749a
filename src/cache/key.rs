//! Cache Key Module
//!
//! Canonical identifiers derived from a tool name and its normalized arguments.

use std::collections::BTreeMap;
use std::fmt;

// == Cache Key ==
/// Deterministic, argument-order-independent identifier of a logical query.
///
/// Rendered as `tool?name=value&name=value` with arguments sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Starts a key for the given tool.
    pub fn builder(tool: impl Into<String>) -> CacheKeyBuilder {
        CacheKeyBuilder {
            tool: tool.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Builder ==
#[derive(Debug, Clone)]
pub struct CacheKeyBuilder {
    tool: String,
    args: BTreeMap<String, String>,
}

impl CacheKeyBuilder {
    /// Adds an argument, trimmed of surrounding whitespace.
    pub fn arg(mut self, name: &str, value: impl ToString) -> Self {
        self.args.insert(name.to_string(), value.to_string().trim().to_string());
        self
    }

    /// Adds a ticker-like argument, trimmed and uppercased.
    pub fn symbol(mut self, name: &str, value: &str) -> Self {
        self.args.insert(name.to_string(), normalize_symbol(value));
        self
    }

    pub fn build(self) -> CacheKey {
        let query = self
            .args
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            CacheKey(self.tool)
        } else {
            CacheKey(format!("{}?{}", self.tool, query))
        }
    }
}

/// Canonical form of a ticker symbol.
pub fn normalize_symbol(value: &str) -> String {
    value.trim().to_uppercase()
}
