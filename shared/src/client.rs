//! Client-related types shared between backend and client
//!
//! Common request/response types used in API communication.
//! These types are shared between campus-auth-mock and campus-client.

use serde::{Deserialize, Serialize};

// Re-export ApiResponse from response module
pub use crate::response::ApiResponse;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Sign-in request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Sign-in response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

// =============================================================================
// Permission API DTOs
// =============================================================================

/// One row of the `user_roles` ⨝ `role_permissions` join
///
/// The permission travels as a raw string on purpose: a single unknown
/// value must not fail deserialization of the whole result set. The
/// resolver parses each row individually and skips what it cannot parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePermissionRow {
    pub role: String,
    pub permission: String,
}
