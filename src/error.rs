//! Error types for the tool server
//!
//! Every failure a tool call can end in, and the HTTP status it maps to.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::paging::PageError;
use crate::tools::{FetchError, InvalidChoice};

// == Tool Error Enum ==
#[derive(Error, Debug)]
pub enum ToolError {
    /// No tool with this name
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Missing or malformed argument
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Enumerated argument outside its allowed values
    #[error(transparent)]
    InvalidChoice(#[from] InvalidChoice),

    #[error(transparent)]
    PageOutOfRange(#[from] PageError),

    /// Data source failure, passed through unchanged
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ToolError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ToolError::UnknownTool(_) => StatusCode::NOT_FOUND,
            ToolError::InvalidRequest(_)
            | ToolError::InvalidChoice(_)
            | ToolError::PageOutOfRange(_) => StatusCode::BAD_REQUEST,
            ToolError::Fetch(FetchError::NotFound(_)) => StatusCode::NOT_FOUND,
            ToolError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ToolError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ToolError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string()
        }));

        (self.status_code(), body).into_response()
    }
}

// == Result Type Alias ==
pub type Result<T> = std::result::Result<T, ToolError>;
