//! API Module
//!
//! HTTP handlers and routing for the tool server.
//!
//! # Endpoints
//! - `POST /tools/:name` - Run a tool
//! - `GET /tools` - List the tool catalogue
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
