//! Ivy Hall - 在线课程市场客户端
//!
//! 课程市场的桌面客户端核心，围绕一个授权内核构建：
//! - Session Provider: 当前登录身份与生命周期
//! - Permission Resolver: 角色→权限解析（按身份切换重算）
//! - Access Guard: 页面与操作级别的访问决策
//!
//! 所有重活（存储、认证、行级过滤）由托管后端完成；客户端的守卫
//! 只负责 UX，敏感变更一律由服务端重新校验。

use std::path::Path;
use std::sync::Arc;

use tracing_appender::rolling;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub use campus_client;
pub use shared;

pub mod config;
pub mod core;
pub mod error;
pub mod routes;
pub mod views;

pub use config::AppConfig;
pub use error::AppError;

use crate::core::bridge::ClientBridge;
use crate::core::guard::AccessGuard;
use crate::core::permissions::PermissionResolver;
use crate::core::session::SessionProvider;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
        )
    }
}

/// Initialize logging (rolling file + stdout)
///
/// 返回的 guard 必须保存到进程结束，否则文件日志会被丢弃。
pub fn init_tracing(log_dir: &Path) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = rolling::daily(log_dir, "ivy-hall.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = if let Ok(from_env) = EnvFilter::try_from_default_env() {
        from_env
    } else if cfg!(debug_assertions) {
        EnvFilter::new("info,ivy_hall=debug")
    } else {
        EnvFilter::new("warn")
    };

    let file_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_writer(non_blocking_file);

    let stdout_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    tracing::info!(path = %log_dir.display(), "Tracing initialized");
    Ok(guard)
}

/// 应用授权内核
///
/// 把桥接层、会话与权限解析器接成一棵树：
/// session 的每次身份迁移都会驱动 resolver 重算权限集。
pub struct App {
    pub config: AppConfig,
    pub bridge: Arc<ClientBridge>,
    pub session: Arc<SessionProvider>,
    pub permissions: Arc<PermissionResolver>,
}

impl App {
    /// Wire up the core from configuration
    pub fn new(config: AppConfig) -> Self {
        let bridge = Arc::new(ClientBridge::new(&config));
        let session = Arc::new(SessionProvider::new(bridge.clone()));
        let permissions = PermissionResolver::new(bridge.clone(), config.permission_timeout);
        permissions.watch_session(session.subscribe());

        Self {
            config,
            bridge,
            session,
            permissions,
        }
    }

    /// Restore the persisted session (startup)
    pub async fn start(&self) {
        self.session.start().await;
    }

    /// 登出
    ///
    /// 权限集与身份在同一个同步段内清空，订阅 watch 的驱动任务随后
    /// 收到的迁移通知被解析器去重掉。
    pub async fn sign_out(&self) {
        self.permissions.apply_identity(None);
        self.session.sign_out().await;
    }

    /// Build an access guard over the live session/permission state
    pub fn guard(&self) -> AccessGuard {
        AccessGuard::new(self.session.subscribe(), self.permissions.subscribe())
    }
}
