//! ClientBridge - 统一的后端桥接层
//!
//! 持有 HTTP 客户端与会话持久化，向授权内核和视图暴露 gateway trait。
//! token 的安装/清除都收敛在这里，调用方不接触原始 HTTP 客户端。

use async_trait::async_trait;
use campus_client::{ClientResult, HttpClient, SignInResponse, UserInfo};
use shared::client::RolePermissionRow;
use shared::models::{Course, CourseCreate, CourseUpdate, CustomPage};
use shared::util::now_millis;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::core::gateway::{AuthGateway, CourseGateway, DirectoryGateway, PageGateway};
use crate::core::session_store::{SessionStore, StoredSession};

/// 后端桥接层
pub struct ClientBridge {
    http: RwLock<HttpClient>,
    store: SessionStore,
}

impl ClientBridge {
    /// Create a bridge from application configuration
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: RwLock::new(config.client_config().build_http_client()),
            store: SessionStore::new(&config.data_dir),
        }
    }

    /// 当前是否持有 token
    pub async fn has_token(&self) -> bool {
        self.http.read().await.token().is_some()
    }
}

#[async_trait]
impl AuthGateway for ClientBridge {
    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<SignInResponse> {
        let response = {
            let http = self.http.read().await;
            http.sign_in(email, password).await?
        };

        self.http
            .write()
            .await
            .set_token(Some(response.token.clone()));

        let session = StoredSession {
            expires_at: StoredSession::parse_jwt_exp(&response.token),
            token: response.token.clone(),
            user: response.user.clone(),
            signed_in_at: now_millis(),
        };
        if let Err(e) = self.store.save(&session) {
            tracing::warn!(error = %e, "Failed to persist session");
        }

        Ok(response)
    }

    async fn sign_out(&self) -> ClientResult<()> {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear cached session");
        }

        let mut http = self.http.write().await;
        let result = http.sign_out().await;
        // sign_out clears the token on success only; make it unconditional
        http.set_token(None);
        result
    }

    async fn restore_session(&self) -> ClientResult<Option<UserInfo>> {
        let cached = match self.store.load() {
            Ok(Some(session)) => session,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cached session");
                return Ok(None);
            }
        };

        self.http.write().await.set_token(Some(cached.token));

        let me = {
            let http = self.http.read().await;
            http.me().await
        };

        match me {
            Ok(user) => Ok(Some(user)),
            Err(campus_client::ClientError::Unauthorized) => {
                // Token rejected by the backend: drop the cache quietly
                if let Err(e) = self.store.clear() {
                    tracing::warn!(error = %e, "Failed to clear rejected session");
                }
                self.http.write().await.set_token(None);
                Ok(None)
            }
            Err(e) => {
                // Transient failure: keep the cache for the next launch,
                // but never keep sending an unconfirmed token
                self.http.write().await.set_token(None);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl DirectoryGateway for ClientBridge {
    async fn role_permissions(&self, user_id: &str) -> ClientResult<Vec<RolePermissionRow>> {
        let http = self.http.read().await;
        http.role_permissions(user_id).await
    }
}

#[async_trait]
impl CourseGateway for ClientBridge {
    async fn published_courses(&self) -> ClientResult<Vec<Course>> {
        let http = self.http.read().await;
        http.published_courses().await
    }

    async fn course_by_slug(&self, slug: &str) -> ClientResult<Course> {
        let http = self.http.read().await;
        http.course_by_slug(slug).await
    }

    async fn courses_by_instructor(&self, instructor_id: &str) -> ClientResult<Vec<Course>> {
        let http = self.http.read().await;
        http.courses_by_instructor(instructor_id).await
    }

    async fn create_course(&self, payload: &CourseCreate) -> ClientResult<Course> {
        let http = self.http.read().await;
        http.create_course(payload).await
    }

    async fn update_course(&self, id: i64, payload: &CourseUpdate) -> ClientResult<Course> {
        let http = self.http.read().await;
        http.update_course(id, payload).await
    }
}

#[async_trait]
impl PageGateway for ClientBridge {
    async fn page_by_slug(&self, slug: &str) -> ClientResult<CustomPage> {
        let http = self.http.read().await;
        http.page_by_slug(slug).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn cached_session() -> StoredSession {
        StoredSession {
            token: "cached-token".to_string(),
            user: UserInfo {
                id: "u-1".to_string(),
                email: "u@example.com".to_string(),
                display_name: "U".to_string(),
            },
            expires_at: None,
            signed_in_at: now_millis(),
        }
    }

    #[tokio::test]
    async fn test_restore_network_failure_uninstalls_token() {
        let dir = TempDir::new().unwrap();
        // discard port: nothing listens, me() fails with a network error
        let config = AppConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            data_dir: dir.path().to_path_buf(),
            request_timeout_secs: 1,
            permission_timeout: Duration::from_secs(1),
        };
        let bridge = ClientBridge::new(&config);

        let store = SessionStore::new(dir.path());
        store.save(&cached_session()).unwrap();

        let result = bridge.restore_session().await;
        assert!(result.is_err());
        assert!(!bridge.has_token().await);

        // 缓存保留，下次启动可以重试
        assert!(store.load().unwrap().is_some());
    }
}
