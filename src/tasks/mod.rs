//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: drops expired cache entries at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
