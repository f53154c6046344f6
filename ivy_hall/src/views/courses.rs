//! 课程视图
//!
//! 目录与详情是公开视图；创建/编辑表单在守卫放行之前不会被构建。

use rust_decimal::Decimal;
use shared::models::{Course, Permission};

use crate::core::gateway::CourseGateway;
use crate::core::guard::{AccessGuard, Requirement};
use crate::views::{ViewOutcome, blocked, failure_code};

/// 课程表单模型（创建时为空白，编辑时预填）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseForm {
    /// 编辑时为 Some(课程 id)
    pub course_id: Option<i64>,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub is_published: bool,
}

impl CourseForm {
    fn prefilled(course: &Course) -> Self {
        Self {
            course_id: Some(course.id),
            slug: course.slug.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            category: course.category.clone(),
            price: course.price,
            is_published: course.is_published,
        }
    }
}

/// 课程目录（公开，只含已发布课程）
pub async fn course_catalog(courses: &dyn CourseGateway) -> ViewOutcome<Vec<Course>> {
    match courses.published_courses().await {
        Ok(list) => ViewOutcome::Content(list),
        Err(e) => {
            tracing::warn!(error = %e, "Course catalog query failed");
            ViewOutcome::Failed(failure_code(&e))
        }
    }
}

/// 课程详情（公开）；缺失与未发布一律 NotFound
pub async fn course_detail(courses: &dyn CourseGateway, slug: &str) -> ViewOutcome<Course> {
    match courses.course_by_slug(slug).await {
        Ok(course) => ViewOutcome::Content(course),
        Err(e) if e.is_not_found() => ViewOutcome::NotFound,
        Err(e) => {
            tracing::warn!(slug = %slug, error = %e, "Course detail query failed");
            ViewOutcome::Failed(failure_code(&e))
        }
    }
}

/// 创建课程页
///
/// 表单模型只在守卫放行之后构建。
pub fn create_course_page(guard: &AccessGuard) -> ViewOutcome<CourseForm> {
    let requirement = Requirement::Permission(Permission::CreateCourses);
    if let Some(outcome) = blocked(guard.decide(Some(&requirement))) {
        return outcome;
    }
    ViewOutcome::Content(CourseForm::default())
}

/// 编辑课程页
///
/// 放行条件: edit_any_course，或 edit_own_courses 且课程归当前身份所有。
pub fn edit_course_page(guard: &AccessGuard, course: &Course) -> ViewOutcome<CourseForm> {
    let requirement = Requirement::AnyOf(vec![
        Permission::EditOwnCourses,
        Permission::EditAnyCourse,
    ]);
    if let Some(outcome) = blocked(guard.decide(Some(&requirement))) {
        return outcome;
    }

    let permissions = guard.permission_state();
    if !permissions.has_permission(Permission::EditAnyCourse) {
        let owner = guard
            .session_state()
            .identity
            .map(|i| i.id)
            .unwrap_or_default();
        if course.instructor_id != owner {
            tracing::debug!(course_id = course.id, "Edit denied, not the course owner");
            return ViewOutcome::Denied;
        }
    }

    ViewOutcome::Content(CourseForm::prefilled(course))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::{guard_with, identity};
    use async_trait::async_trait;
    use campus_client::{ClientError, ClientResult};
    use shared::models::{CourseCreate, CourseUpdate};

    struct FakeCourses {
        published: Vec<Course>,
    }

    fn course(id: i64, slug: &str, instructor_id: &str, published: bool) -> Course {
        Course {
            id,
            slug: slug.to_string(),
            title: slug.to_string(),
            description: String::new(),
            category: None,
            price: Decimal::new(4900, 2),
            instructor_id: instructor_id.to_string(),
            instructor_name: "I".to_string(),
            is_published: published,
            created_at: id,
        }
    }

    #[async_trait]
    impl CourseGateway for FakeCourses {
        async fn published_courses(&self) -> ClientResult<Vec<Course>> {
            Ok(self.published.clone())
        }

        async fn course_by_slug(&self, slug: &str) -> ClientResult<Course> {
            self.published
                .iter()
                .find(|c| c.slug == slug && c.is_published)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(slug.to_string()))
        }

        async fn courses_by_instructor(&self, _instructor_id: &str) -> ClientResult<Vec<Course>> {
            Ok(vec![])
        }

        async fn create_course(&self, _payload: &CourseCreate) -> ClientResult<Course> {
            unreachable!("views never create courses directly")
        }

        async fn update_course(&self, _id: i64, _payload: &CourseUpdate) -> ClientResult<Course> {
            unreachable!("views never update courses directly")
        }
    }

    #[tokio::test]
    async fn test_detail_unpublished_is_not_found() {
        let gateway = FakeCourses {
            published: vec![course(1, "live", "u-i", true), course(2, "draft", "u-i", false)],
        };

        assert!(course_detail(&gateway, "live").await.is_content());
        assert_eq!(course_detail(&gateway, "draft").await, ViewOutcome::NotFound);
        assert_eq!(
            course_detail(&gateway, "missing").await,
            ViewOutcome::NotFound
        );
    }

    #[test]
    fn test_create_denied_for_student() {
        let guard = guard_with(
            Some(identity("u-s")),
            &[Permission::EnrollInCourses, Permission::RateCourses],
        );
        assert_eq!(create_course_page(&guard), ViewOutcome::Denied);
    }

    #[test]
    fn test_create_granted_for_instructor() {
        let guard = guard_with(Some(identity("u-i")), &[Permission::CreateCourses]);
        let outcome = create_course_page(&guard);
        assert_eq!(outcome.into_content().unwrap(), CourseForm::default());
    }

    #[test]
    fn test_create_requires_sign_in_not_denied() {
        let guard = guard_with(None, &[]);
        assert_eq!(create_course_page(&guard), ViewOutcome::AuthRequired);
    }

    #[test]
    fn test_edit_own_course_only() {
        let target = course(7, "mine", "u-i", true);
        let other = course(8, "theirs", "u-other", true);

        let guard = guard_with(Some(identity("u-i")), &[Permission::EditOwnCourses]);
        assert!(edit_course_page(&guard, &target).is_content());
        assert_eq!(edit_course_page(&guard, &other), ViewOutcome::Denied);
    }

    #[test]
    fn test_edit_any_course_ignores_ownership() {
        let other = course(8, "theirs", "u-other", true);
        let guard = guard_with(Some(identity("u-a")), &[Permission::EditAnyCourse]);

        let form = edit_course_page(&guard, &other).into_content().unwrap();
        assert_eq!(form.course_id, Some(8));
        assert_eq!(form.slug, "theirs");
    }
}
