//! Campus Client - HTTP client for the marketplace backend
//!
//! Provides network-based HTTP calls against the hosted backend API:
//! authentication, the role→permission join query, course resources and
//! admin-authored custom pages.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::client::{RolePermissionRow, SignInRequest, SignInResponse, UserInfo};
