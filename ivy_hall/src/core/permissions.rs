//! PermissionResolver - 角色→权限解析
//!
//! 订阅会话状态，身份每次迁移都重算一次权限集：
//! - 未登录 → 同步清空（不等任何网络往返）
//! - 登录/切换用户 → 先进入 loading，后台查询角色权限再发布
//!
//! 并发约束: 用户快速切换时，旧身份的查询结果可能晚于新身份到达。
//! 每次迁移递增 generation，落后的结果直接丢弃，绝不覆盖新身份的
//! 权限集。任何查询失败或超时都落在空集（fail closed）。

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use shared::models::Permission;
use tokio::sync::watch;

use crate::core::gateway::DirectoryGateway;
use crate::core::session::{Identity, SessionState};

/// 当前身份的权限集
///
/// `loading` 为 true 时所有查询都返回 false：解析未完成前一律视为
/// 无权限，由守卫渲染 pending 而不是拒绝。
#[derive(Debug, Clone, Default)]
pub struct PermissionState {
    pub permissions: HashSet<Permission>,
    pub loading: bool,
}

impl PermissionState {
    pub fn has_permission(&self, permission: Permission) -> bool {
        !self.loading && self.permissions.contains(&permission)
    }

    /// 任意一个命中即可；空列表恒为 false
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        !self.loading && permissions.iter().any(|p| self.permissions.contains(p))
    }

    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        !self.loading && permissions.iter().all(|p| self.permissions.contains(p))
    }
}

/// 权限解析器
pub struct PermissionResolver {
    directory: Arc<dyn DirectoryGateway>,
    state: watch::Sender<PermissionState>,
    /// 身份迁移计数，用于丢弃陈旧的解析结果
    generation: AtomicU64,
    /// 上一次解析的用户 id，同一身份的重复通知不触发重算
    current_user: std::sync::Mutex<Option<String>>,
    timeout: Duration,
}

impl PermissionResolver {
    pub fn new(directory: Arc<dyn DirectoryGateway>, timeout: Duration) -> Arc<Self> {
        let (state, _) = watch::channel(PermissionState::default());
        Arc::new(Self {
            directory,
            state,
            generation: AtomicU64::new(0),
            current_user: std::sync::Mutex::new(None),
            timeout,
        })
    }

    /// 订阅权限状态
    pub fn subscribe(&self) -> watch::Receiver<PermissionState> {
        self.state.subscribe()
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> PermissionState {
        self.state.borrow().clone()
    }

    /// 跟随会话状态驱动解析
    pub fn watch_session(self: &Arc<Self>, mut session: watch::Receiver<SessionState>) {
        let resolver = self.clone();
        tokio::spawn(async move {
            {
                let state = session.borrow_and_update().clone();
                resolver.apply_identity(state.identity.as_ref());
            }
            while session.changed().await.is_ok() {
                let state = session.borrow_and_update().clone();
                resolver.apply_identity(state.identity.as_ref());
            }
        });
    }

    /// 身份迁移入口
    ///
    /// 同一用户的重复通知直接忽略；迁移时先发布过渡状态再起后台任务。
    pub fn apply_identity(self: &Arc<Self>, identity: Option<&Identity>) {
        let user_id = identity.map(|i| i.id.clone());
        {
            let mut current = match self.current_user.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if *current == user_id {
                return;
            }
            *current = user_id.clone();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        match user_id {
            None => {
                // 登出必须同步清空，不能留到异步任务里
                self.state.send_modify(|s| {
                    s.permissions.clear();
                    s.loading = false;
                });
                tracing::debug!("Permissions cleared");
            }
            Some(user_id) => {
                self.state.send_modify(|s| {
                    s.permissions.clear();
                    s.loading = true;
                });

                let resolver = self.clone();
                tokio::spawn(async move {
                    resolver.resolve(generation, user_id).await;
                });
            }
        }
    }

    async fn resolve(&self, generation: u64, user_id: String) {
        let permissions = match tokio::time::timeout(
            self.timeout,
            self.directory.role_permissions(&user_id),
        )
        .await
        {
            Ok(Ok(rows)) => {
                let mut set = HashSet::new();
                for row in rows {
                    match Permission::from_str(&row.permission) {
                        Ok(p) => {
                            set.insert(p);
                        }
                        Err(_) => {
                            tracing::warn!(
                                permission = %row.permission,
                                role = %row.role,
                                "Unknown permission in directory response, skipping"
                            );
                        }
                    }
                }
                tracing::info!(user_id = %user_id, count = set.len(), "Permissions resolved");
                set
            }
            Ok(Err(e)) => {
                tracing::warn!(user_id = %user_id, error = %e, "Permission query failed, failing closed");
                HashSet::new()
            }
            Err(_) => {
                tracing::warn!(user_id = %user_id, timeout = ?self.timeout, "Permission query timed out, failing closed");
                HashSet::new()
            }
        };

        let committed = self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            s.permissions = permissions;
            s.loading = false;
            true
        });

        if !committed {
            tracing::debug!(user_id = %user_id, "Stale permission resolution discarded");
        }
    }
}
