//! Application error types

use thiserror::Error;

use crate::core::session_store::SessionStoreError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Client error: {0}")]
    Client(#[from] campus_client::ClientError),

    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
