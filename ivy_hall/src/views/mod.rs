//! 资源视图控制器
//!
//! 每个视图先问守卫、再取数据，产出一个 [`ViewOutcome`] 交给渲染层。
//! 后端错误在这里统一折叠成 [`ErrorCode`]，原始错误文本不外泄。

use campus_client::ClientError;
use shared::ErrorCode;

use crate::core::guard::AccessDecision;

pub mod courses;
pub mod dashboard;
pub mod pages;

pub use courses::{CourseForm, course_catalog, course_detail, create_course_page, edit_course_page};
pub use dashboard::{AdminHome, admin_dashboard, instructor_dashboard};
pub use pages::custom_page;

/// 视图产出
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome<T> {
    /// 会话/权限未就绪，渲染加载占位
    Pending,
    /// 引导去登录
    AuthRequired,
    /// 权限不足
    Denied,
    /// 资源不存在（或对当前请求不可见）
    NotFound,
    /// 后端失败，按错误码渲染
    Failed(ErrorCode),
    Content(T),
}

impl<T> ViewOutcome<T> {
    pub fn is_content(&self) -> bool {
        matches!(self, ViewOutcome::Content(_))
    }

    pub fn into_content(self) -> Option<T> {
        match self {
            ViewOutcome::Content(value) => Some(value),
            _ => None,
        }
    }
}

/// 守卫裁决 → 视图产出；Granted 返回 None 交由视图继续
pub(crate) fn blocked<T>(decision: AccessDecision) -> Option<ViewOutcome<T>> {
    match decision {
        AccessDecision::Pending => Some(ViewOutcome::Pending),
        AccessDecision::AuthRequired => Some(ViewOutcome::AuthRequired),
        AccessDecision::Denied => Some(ViewOutcome::Denied),
        AccessDecision::Granted => None,
    }
}

/// 后端错误折叠为对外错误码
pub(crate) fn failure_code(error: &ClientError) -> ErrorCode {
    match error {
        ClientError::Http(_) => ErrorCode::NetworkError,
        ClientError::Unauthorized => ErrorCode::NotAuthenticated,
        ClientError::Forbidden(_) => ErrorCode::PermissionDenied,
        ClientError::NotFound(_) => ErrorCode::NotFound,
        ClientError::Validation(_) => ErrorCode::ValidationFailed,
        ClientError::InvalidResponse(_)
        | ClientError::Internal(_)
        | ClientError::Serialization(_) => ErrorCode::InternalError,
    }
}
