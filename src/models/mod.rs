//! Request and Response models for the tool API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

pub use requests::ToolArgs;
pub use responses::{HealthResponse, StatsResponse, ToolDescriptor, ToolResponse};
