//! AccessGuard - 访问决策原语
//!
//! 纯函数式的决策核心 [`evaluate`] 加一个订阅实时状态的外壳
//! [`AccessGuard`]。判定顺序固定:
//!
//! 1. 会话还在恢复 → Pending（绝不闪现拒绝页）
//! 2. 未登录 → AuthRequired（引导去登录，而不是 Denied）
//! 3. 无权限要求 → Granted
//! 4. 权限还在解析 → Pending
//! 5. 权限集判定 → Granted / Denied
//!
//! 这里只做 UX 层的裁决；敏感操作由服务端重新校验。

use shared::models::Permission;
use tokio::sync::watch;

use crate::core::permissions::PermissionState;
use crate::core::session::SessionState;

/// 页面/操作的权限要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// 单个权限
    Permission(Permission),
    /// 任意一个命中即可
    AnyOf(Vec<Permission>),
    /// 必须全部命中
    AllOf(Vec<Permission>),
}

impl Requirement {
    pub fn satisfied_by(&self, state: &PermissionState) -> bool {
        match self {
            Requirement::Permission(p) => state.has_permission(*p),
            Requirement::AnyOf(list) => state.has_any_permission(list),
            Requirement::AllOf(list) => state.has_all_permissions(list),
        }
    }
}

/// 访问决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// 状态未就绪，渲染加载占位
    Pending,
    /// 未登录，引导到登录页
    AuthRequired,
    /// 已登录但权限不足
    Denied,
    Granted,
}

/// 决策核心（纯函数）
pub fn evaluate(
    session: &SessionState,
    permissions: &PermissionState,
    requirement: Option<&Requirement>,
) -> AccessDecision {
    if session.loading {
        return AccessDecision::Pending;
    }
    if !session.is_authenticated() {
        return AccessDecision::AuthRequired;
    }
    let Some(requirement) = requirement else {
        return AccessDecision::Granted;
    };
    if permissions.loading {
        return AccessDecision::Pending;
    }
    if requirement.satisfied_by(permissions) {
        AccessDecision::Granted
    } else {
        AccessDecision::Denied
    }
}

/// 订阅实时状态的守卫
pub struct AccessGuard {
    session: watch::Receiver<SessionState>,
    permissions: watch::Receiver<PermissionState>,
}

impl AccessGuard {
    pub fn new(
        session: watch::Receiver<SessionState>,
        permissions: watch::Receiver<PermissionState>,
    ) -> Self {
        Self {
            session,
            permissions,
        }
    }

    /// 会话状态快照
    pub fn session_state(&self) -> SessionState {
        self.session.borrow().clone()
    }

    /// 权限状态快照
    pub fn permission_state(&self) -> PermissionState {
        self.permissions.borrow().clone()
    }

    /// 基于当前状态裁决
    pub fn decide(&self, requirement: Option<&Requirement>) -> AccessDecision {
        evaluate(
            &self.session.borrow(),
            &self.permissions.borrow(),
            requirement,
        )
    }

    /// 等到非 Pending 的裁决
    ///
    /// 会话恢复或权限解析进行中时挂起，状态一落定立即返回。
    pub async fn decide_settled(&mut self, requirement: Option<&Requirement>) -> AccessDecision {
        loop {
            let decision = {
                let session = self.session.borrow_and_update().clone();
                let permissions = self.permissions.borrow_and_update().clone();
                evaluate(&session, &permissions, requirement)
            };
            if decision != AccessDecision::Pending {
                return decision;
            }

            tokio::select! {
                changed = self.session.changed() => {
                    if changed.is_err() {
                        return AccessDecision::Pending;
                    }
                }
                changed = self.permissions.changed() => {
                    if changed.is_err() {
                        return AccessDecision::Pending;
                    }
                }
            }
        }
    }
}
