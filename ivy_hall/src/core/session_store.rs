//! SessionStore - 当前会话的本地持久化
//!
//! 登录成功后把 (token, user) 写入磁盘，应用重启时据此恢复登录状态。
//! token 的过期时间从 JWT payload 解析，过期的缓存在加载时直接丢弃。

use campus_client::UserInfo;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 持久化的会话
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: UserInfo,
    /// Token 过期时间 (Unix 秒)，无法解析时为 None
    pub expires_at: Option<u64>,
    pub signed_in_at: i64,
}

impl StoredSession {
    /// 从 JWT token 中解析过期时间 (Unix timestamp)
    pub fn parse_jwt_exp(token: &str) -> Option<u64> {
        // JWT 格式: header.payload.signature
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return None;
        }

        // 解码 payload (base64url)
        use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
        let payload_bytes = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
        let payload_str = String::from_utf8(payload_bytes).ok()?;

        // 解析 JSON 提取 exp 字段
        let payload: serde_json::Value = serde_json::from_str(&payload_str).ok()?;
        payload.get("exp")?.as_u64()
    }

    /// 会话是否已过期
    pub fn is_expired(&self) -> bool {
        let Some(expires_at) = self.expires_at else {
            return false;
        };
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        now > expires_at
    }
}

/// 会话持久化管理器
///
/// 文件路径: {data_dir}/auth/current_session.json
pub struct SessionStore {
    file_path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file_path: data_dir.join("auth/current_session.json"),
        }
    }

    /// 保存当前会话 (登录成功后调用)
    pub fn save(&self, session: &StoredSession) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.file_path, content)?;
        tracing::debug!(user_id = %session.user.id, "Current session saved");
        Ok(())
    }

    /// 加载当前会话；过期的缓存被清除并返回 None
    pub fn load(&self) -> Result<Option<StoredSession>, SessionStoreError> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.file_path)?;
        let session: StoredSession = serde_json::from_str(&content)?;

        if session.is_expired() {
            let _ = std::fs::remove_file(&self.file_path);
            tracing::info!(user_id = %session.user.id, "Cached session expired, cleared");
            return Ok(None);
        }

        tracing::info!(user_id = %session.user.id, "Loaded cached session");
        Ok(Some(session))
    }

    /// 清除当前会话
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        if self.file_path.exists() {
            std::fs::remove_file(&self.file_path)?;
            tracing::debug!("Current session cleared");
        }
        Ok(())
    }
}
