//! 仪表盘视图

use shared::models::{Course, Permission};

use crate::core::gateway::CourseGateway;
use crate::core::guard::{AccessGuard, Requirement};
use crate::views::{ViewOutcome, blocked, failure_code};

/// 管理后台首页: 按权限点亮各管理入口
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminHome {
    pub can_manage_users: bool,
    pub can_manage_roles: bool,
    pub can_manage_custom_pages: bool,
    pub can_manage_categories: bool,
    pub can_manage_payments: bool,
}

/// 讲师仪表盘: 自己的课程（含草稿），创建时间倒序
pub async fn instructor_dashboard(
    guard: &AccessGuard,
    courses: &dyn CourseGateway,
) -> ViewOutcome<Vec<Course>> {
    let requirement = Requirement::Permission(Permission::ViewInstructorDashboard);
    if let Some(outcome) = blocked(guard.decide(Some(&requirement))) {
        return outcome;
    }

    // 放行即已登录
    let Some(identity) = guard.session_state().identity else {
        return ViewOutcome::AuthRequired;
    };

    match courses.courses_by_instructor(&identity.id).await {
        Ok(mut list) => {
            list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            ViewOutcome::Content(list)
        }
        Err(e) => {
            tracing::warn!(instructor_id = %identity.id, error = %e, "Instructor course query failed");
            ViewOutcome::Failed(failure_code(&e))
        }
    }
}

/// 管理员仪表盘
pub fn admin_dashboard(guard: &AccessGuard) -> ViewOutcome<AdminHome> {
    let requirement = Requirement::Permission(Permission::ViewAdminDashboard);
    if let Some(outcome) = blocked(guard.decide(Some(&requirement))) {
        return outcome;
    }

    let permissions = guard.permission_state();
    ViewOutcome::Content(AdminHome {
        can_manage_users: permissions.has_permission(Permission::ManageUsers),
        can_manage_roles: permissions.has_permission(Permission::ManageRoles),
        can_manage_custom_pages: permissions.has_permission(Permission::ManageCustomPages),
        can_manage_categories: permissions.has_permission(Permission::ManageCategories),
        can_manage_payments: permissions.has_permission(Permission::ManagePayments),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::{guard_with, identity};
    use async_trait::async_trait;
    use campus_client::ClientResult;
    use rust_decimal::Decimal;
    use shared::models::{CourseCreate, CourseUpdate};

    struct FakeCourses;

    #[async_trait]
    impl CourseGateway for FakeCourses {
        async fn published_courses(&self) -> ClientResult<Vec<Course>> {
            Ok(vec![])
        }

        async fn course_by_slug(&self, slug: &str) -> ClientResult<Course> {
            Err(campus_client::ClientError::NotFound(slug.to_string()))
        }

        async fn courses_by_instructor(&self, instructor_id: &str) -> ClientResult<Vec<Course>> {
            // 乱序返回，排序由视图负责
            Ok(vec![
                course(1, instructor_id),
                course(3, instructor_id),
                course(2, instructor_id),
            ])
        }

        async fn create_course(&self, _payload: &CourseCreate) -> ClientResult<Course> {
            unreachable!()
        }

        async fn update_course(&self, _id: i64, _payload: &CourseUpdate) -> ClientResult<Course> {
            unreachable!()
        }
    }

    fn course(id: i64, instructor_id: &str) -> Course {
        Course {
            id,
            slug: format!("course-{id}"),
            title: String::new(),
            description: String::new(),
            category: None,
            price: Decimal::ZERO,
            instructor_id: instructor_id.to_string(),
            instructor_name: String::new(),
            is_published: id % 2 == 0,
            created_at: id * 1000,
        }
    }

    #[tokio::test]
    async fn test_instructor_dashboard_sorted_newest_first() {
        let guard = guard_with(
            Some(identity("u-i")),
            &[Permission::ViewInstructorDashboard],
        );
        let list = instructor_dashboard(&guard, &FakeCourses)
            .await
            .into_content()
            .unwrap();
        let ids: Vec<i64> = list.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_instructor_dashboard_denied_without_permission() {
        let guard = guard_with(Some(identity("u-s")), &[Permission::EnrollInCourses]);
        assert_eq!(
            instructor_dashboard(&guard, &FakeCourses).await,
            ViewOutcome::Denied
        );
    }

    #[test]
    fn test_admin_dashboard_sections_follow_permissions() {
        let guard = guard_with(
            Some(identity("u-a")),
            &[
                Permission::ViewAdminDashboard,
                Permission::ManageUsers,
                Permission::ManageCustomPages,
            ],
        );
        let home = admin_dashboard(&guard).into_content().unwrap();
        assert!(home.can_manage_users);
        assert!(home.can_manage_custom_pages);
        assert!(!home.can_manage_roles);
        assert!(!home.can_manage_payments);
    }

    #[test]
    fn test_admin_dashboard_auth_required_when_signed_out() {
        let guard = guard_with(None, &[]);
        assert_eq!(admin_dashboard(&guard), ViewOutcome::AuthRequired);
    }
}
