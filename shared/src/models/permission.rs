//! Permission Definitions
//!
//! Closed permission enumeration for the marketplace.
//!
//! ## 设计原则
//! - 权限是原子能力令牌，彼此独立检查，没有层级或通配符
//! - 课程浏览、公共页面无需权限，登录即可使用的页面单独标记
//! - 角色到权限的映射由后端持有，客户端只消费 (role, permission) 行

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Atomic capability token
///
/// The wire form is the snake_case name (e.g. `create_courses`). Parsing is
/// strict: strings outside this enumeration are rejected so that a typo in
/// backend data can never silently grant access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // === 管理权限 (6) ===
    ManageUsers,
    ManageRoles,
    ManageCustomPages,
    ManageCategories,
    ViewAdminDashboard,
    ManagePayments,

    // === 讲师权限 (9) ===
    CreateCourses,
    EditOwnCourses,
    EditAnyCourse,
    DeleteOwnCourses,
    DeleteAnyCourse,
    PublishCourses,
    ViewInstructorDashboard,
    ViewStudentProgress,
    ReplyToReviews,

    // === 学员权限 (4) ===
    EnrollInCourses,
    RateCourses,
    CommentOnLessons,
    ViewOwnProgress,
}

/// Every permission, in declaration order
pub const ALL_PERMISSIONS: &[Permission] = &[
    Permission::ManageUsers,
    Permission::ManageRoles,
    Permission::ManageCustomPages,
    Permission::ManageCategories,
    Permission::ViewAdminDashboard,
    Permission::ManagePayments,
    Permission::CreateCourses,
    Permission::EditOwnCourses,
    Permission::EditAnyCourse,
    Permission::DeleteOwnCourses,
    Permission::DeleteAnyCourse,
    Permission::PublishCourses,
    Permission::ViewInstructorDashboard,
    Permission::ViewStudentProgress,
    Permission::ReplyToReviews,
    Permission::EnrollInCourses,
    Permission::RateCourses,
    Permission::CommentOnLessons,
    Permission::ViewOwnProgress,
];

impl Permission {
    /// Wire representation (snake_case)
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageUsers => "manage_users",
            Permission::ManageRoles => "manage_roles",
            Permission::ManageCustomPages => "manage_custom_pages",
            Permission::ManageCategories => "manage_categories",
            Permission::ViewAdminDashboard => "view_admin_dashboard",
            Permission::ManagePayments => "manage_payments",
            Permission::CreateCourses => "create_courses",
            Permission::EditOwnCourses => "edit_own_courses",
            Permission::EditAnyCourse => "edit_any_course",
            Permission::DeleteOwnCourses => "delete_own_courses",
            Permission::DeleteAnyCourse => "delete_any_course",
            Permission::PublishCourses => "publish_courses",
            Permission::ViewInstructorDashboard => "view_instructor_dashboard",
            Permission::ViewStudentProgress => "view_student_progress",
            Permission::ReplyToReviews => "reply_to_reviews",
            Permission::EnrollInCourses => "enroll_in_courses",
            Permission::RateCourses => "rate_courses",
            Permission::CommentOnLessons => "comment_on_lessons",
            Permission::ViewOwnProgress => "view_own_progress",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a string outside the closed enumeration
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_PERMISSIONS
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_count_is_closed() {
        assert_eq!(ALL_PERMISSIONS.len(), 19);
    }

    #[test]
    fn test_permission_round_trip() {
        for p in ALL_PERMISSIONS {
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), *p);
        }
    }

    #[test]
    fn test_unknown_permission_rejected() {
        assert!("delete_everything".parse::<Permission>().is_err());
        assert!("CREATE_COURSES".parse::<Permission>().is_err());
    }

    #[test]
    fn test_serde_wire_form() {
        let json = serde_json::to_string(&Permission::CreateCourses).unwrap();
        assert_eq!(json, "\"create_courses\"");
        let back: Permission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Permission::CreateCourses);
    }
}
