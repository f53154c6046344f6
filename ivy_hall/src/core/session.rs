//! SessionProvider - 登录身份与生命周期
//!
//! 通过 watch 通道对外发布 [`SessionState`]；订阅方（权限解析器、
//! 守卫、路由）在身份迁移时收到通知。
//!
//! 约束:
//! - 会话恢复失败一律视为未登录，不向用户抛错
//! - 登出时身份必须同步清空，再做后端的 best-effort 注销

use std::sync::Arc;
use tokio::sync::watch;

use campus_client::UserInfo;

use crate::core::gateway::AuthGateway;
use crate::error::AppError;

/// 当前登录身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

impl From<UserInfo> for Identity {
    fn from(user: UserInfo) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        }
    }
}

/// 会话状态
///
/// `loading` 表示启动时的会话恢复还没有结束；在它变为 false 之前，
/// 守卫一律渲染 pending，绝不能闪现"拒绝访问"。
#[derive(Debug, Clone)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// 会话提供者
pub struct SessionProvider {
    gateway: Arc<dyn AuthGateway>,
    state: watch::Sender<SessionState>,
}

impl SessionProvider {
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        let (state, _) = watch::channel(SessionState {
            identity: None,
            loading: true,
        });
        Self { gateway, state }
    }

    /// 订阅会话状态
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// 启动时恢复持久化会话
    ///
    /// 任何失败（网络、后端、缓存损坏）都落在未登录状态。
    pub async fn start(&self) {
        let identity = match self.gateway.restore_session().await {
            Ok(Some(user)) => {
                tracing::info!(user_id = %user.id, "Session restored");
                Some(Identity::from(user))
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Session restore failed, treating as unauthenticated");
                None
            }
        };

        self.state.send_modify(|s| {
            s.identity = identity;
            s.loading = false;
        });
    }

    /// 登录
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let response = self.gateway.sign_in(email, password).await?;
        let identity = Identity::from(response.user);

        tracing::info!(user_id = %identity.id, "Signed in");
        self.state.send_modify(|s| {
            s.identity = Some(identity.clone());
            s.loading = false;
        });

        Ok(identity)
    }

    /// 登出
    ///
    /// 身份先同步清空（订阅方立刻看到未登录），之后才做后端注销；
    /// 注销失败只记日志。
    pub async fn sign_out(&self) {
        self.state.send_modify(|s| {
            s.identity = None;
            s.loading = false;
        });

        if let Err(e) = self.gateway.sign_out().await {
            tracing::warn!(error = %e, "Backend sign-out failed");
        } else {
            tracing::info!("Signed out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use campus_client::{ClientError, ClientResult, SignInResponse};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeAuth {
        restore: Option<UserInfo>,
        restore_fails: bool,
        signed_out: AtomicBool,
    }

    impl FakeAuth {
        fn empty() -> Self {
            Self {
                restore: None,
                restore_fails: false,
                signed_out: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl AuthGateway for FakeAuth {
        async fn sign_in(&self, email: &str, _password: &str) -> ClientResult<SignInResponse> {
            Ok(SignInResponse {
                token: "tok".to_string(),
                user: UserInfo {
                    id: "u-1".to_string(),
                    email: email.to_string(),
                    display_name: "U".to_string(),
                },
            })
        }

        async fn sign_out(&self) -> ClientResult<()> {
            self.signed_out.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn restore_session(&self) -> ClientResult<Option<UserInfo>> {
            if self.restore_fails {
                return Err(ClientError::Internal("backend down".to_string()));
            }
            Ok(self.restore.clone())
        }
    }

    #[tokio::test]
    async fn test_initial_state_is_loading() {
        let provider = SessionProvider::new(Arc::new(FakeAuth::empty()));
        let state = provider.snapshot();
        assert!(state.loading);
        assert!(!state.is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_failure_is_unauthenticated() {
        let mut auth = FakeAuth::empty();
        auth.restore_fails = true;
        let provider = SessionProvider::new(Arc::new(auth));

        provider.start().await;

        let state = provider.snapshot();
        assert!(!state.loading);
        assert!(state.identity.is_none());
    }

    #[tokio::test]
    async fn test_restore_success_publishes_identity() {
        let mut auth = FakeAuth::empty();
        auth.restore = Some(UserInfo {
            id: "u-9".to_string(),
            email: "x@example.com".to_string(),
            display_name: "X".to_string(),
        });
        let provider = SessionProvider::new(Arc::new(auth));

        provider.start().await;

        let state = provider.snapshot();
        assert_eq!(state.identity.unwrap().id, "u-9");
    }

    #[tokio::test]
    async fn test_sign_in_then_sign_out() {
        let auth = Arc::new(FakeAuth::empty());
        let provider = SessionProvider::new(auth.clone());
        provider.start().await;

        let identity = provider.sign_in("a@example.com", "pw").await.unwrap();
        assert_eq!(identity.id, "u-1");
        assert!(provider.snapshot().is_authenticated());

        let mut rx = provider.subscribe();
        rx.borrow_and_update();

        provider.sign_out().await;
        assert!(provider.snapshot().identity.is_none());
        assert!(auth.signed_out.load(Ordering::SeqCst));

        // 订阅方收到了迁移通知
        assert!(rx.has_changed().unwrap());
    }
}
