//! 后端访问接口
//!
//! 授权内核与视图只依赖这些 trait，不直接依赖 HTTP 客户端，
//! 因此可以在测试里注入内存实现。

use async_trait::async_trait;
use campus_client::{ClientResult, SignInResponse, UserInfo};
use shared::client::RolePermissionRow;
use shared::models::{Course, CourseCreate, CourseUpdate, CustomPage};

/// 认证后端: 登录、登出、启动时恢复会话
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<SignInResponse>;

    /// Best-effort backend sign-out; local state is cleared regardless
    async fn sign_out(&self) -> ClientResult<()>;

    /// Restore the persisted session, confirming the token with the backend.
    /// `Ok(None)` means "no usable session", which is a normal outcome.
    async fn restore_session(&self) -> ClientResult<Option<UserInfo>>;
}

/// 角色/权限目录: user_roles ⨝ role_permissions
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    async fn role_permissions(&self, user_id: &str) -> ClientResult<Vec<RolePermissionRow>>;
}

/// 课程资源
#[async_trait]
pub trait CourseGateway: Send + Sync {
    async fn published_courses(&self) -> ClientResult<Vec<Course>>;
    async fn course_by_slug(&self, slug: &str) -> ClientResult<Course>;
    async fn courses_by_instructor(&self, instructor_id: &str) -> ClientResult<Vec<Course>>;
    async fn create_course(&self, payload: &CourseCreate) -> ClientResult<Course>;
    async fn update_course(&self, id: i64, payload: &CourseUpdate) -> ClientResult<Course>;
}

/// 自定义页面
#[async_trait]
pub trait PageGateway: Send + Sync {
    async fn page_by_slug(&self, slug: &str) -> ClientResult<CustomPage>;
}
