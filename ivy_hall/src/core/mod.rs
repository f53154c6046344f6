//! Ivy Hall 核心模块
//!
//! 包含核心组件:
//! - ClientBridge: 统一的后端桥接层（实现各 gateway trait）
//! - SessionStore: 当前会话的本地持久化
//! - SessionProvider: 登录身份与生命周期
//! - PermissionResolver: 角色→权限解析（含陈旧响应丢弃）
//! - AccessGuard: 访问决策原语

pub mod bridge;
pub mod gateway;
pub mod guard;
pub mod permissions;
pub mod session;
pub mod session_store;

pub use bridge::ClientBridge;
pub use gateway::{AuthGateway, CourseGateway, DirectoryGateway, PageGateway};
pub use guard::{AccessDecision, AccessGuard, Requirement, evaluate};
pub use permissions::{PermissionResolver, PermissionState};
pub use session::{Identity, SessionProvider, SessionState};
pub use session_store::{SessionStore, SessionStoreError, StoredSession};
