//! 自定义页面视图

use shared::models::CustomPage;

use crate::core::gateway::PageGateway;
use crate::views::{ViewOutcome, failure_code};

/// 按 slug 渲染自定义页面（公开）
///
/// 缺失与未发布是同一个 NotFound，与未匹配路由的 404 一致，
/// 不暴露"草稿存在"这一事实。
pub async fn custom_page(pages: &dyn PageGateway, slug: &str) -> ViewOutcome<CustomPage> {
    match pages.page_by_slug(slug).await {
        Ok(page) => ViewOutcome::Content(page),
        Err(e) if e.is_not_found() => ViewOutcome::NotFound,
        Err(e) => {
            tracing::warn!(slug = %slug, error = %e, "Custom page query failed");
            ViewOutcome::Failed(failure_code(&e))
        }
    }
}
