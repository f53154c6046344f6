//! Shared types for the Campus framework
//!
//! Common types used across multiple crates including client DTOs,
//! error types, response structures and domain models.

pub mod client;
pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::ErrorCode;
pub use models::{Permission, Role};
pub use response::ApiResponse;
