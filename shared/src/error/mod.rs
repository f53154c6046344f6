//! Unified error system for the Campus framework
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - HTTP status mapping via [`ErrorCode::http_status`]
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Course errors
//! - 5xxx: Page errors
//! - 9xxx: System errors

mod category;
mod codes;
mod http;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
