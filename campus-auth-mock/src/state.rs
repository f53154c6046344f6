//! Seeded in-memory backend state

use shared::models::permission::ALL_PERMISSIONS;
use shared::models::{Course, CustomPage, Permission, Role};
use shared::util::{now_millis, snowflake_id};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A seeded user with role assignments
#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: String,
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub roles: Vec<Role>,
}

/// In-memory backend state
///
/// Tables mirror the hosted backend: users with `user_roles`, the
/// `role_permissions` mapping, `courses` and `custom_pages`.
pub struct AppState {
    pub jwt_secret: String,
    pub users: Vec<MockUser>,
    pub role_permissions: HashMap<Role, Vec<Permission>>,
    pub courses: RwLock<Vec<Course>>,
    pub pages: Vec<CustomPage>,
}

impl AppState {
    /// Build a state with representative seed data
    pub fn seeded() -> Self {
        let users = vec![
            MockUser {
                id: "u-admin-01".to_string(),
                email: "admin@campus.test".to_string(),
                password: "admin-password".to_string(),
                display_name: "Site Admin".to_string(),
                roles: vec![Role::Admin],
            },
            MockUser {
                id: "u-instr-01".to_string(),
                email: "marie@campus.test".to_string(),
                password: "instructor-password".to_string(),
                display_name: "Marie Dubois".to_string(),
                roles: vec![Role::Instructor],
            },
            MockUser {
                id: "u-stud-01".to_string(),
                email: "kenji@campus.test".to_string(),
                password: "student-password".to_string(),
                display_name: "Kenji Sato".to_string(),
                roles: vec![Role::Student],
            },
            // Holds both roles; overlapping grants must deduplicate
            MockUser {
                id: "u-dual-01".to_string(),
                email: "paula@campus.test".to_string(),
                password: "dual-password".to_string(),
                display_name: "Paula Reyes".to_string(),
                roles: vec![Role::Student, Role::Instructor],
            },
        ];

        let mut role_permissions = HashMap::new();
        role_permissions.insert(
            Role::Student,
            vec![
                Permission::EnrollInCourses,
                Permission::RateCourses,
                Permission::CommentOnLessons,
                Permission::ViewOwnProgress,
            ],
        );
        role_permissions.insert(
            Role::Instructor,
            vec![
                Permission::CreateCourses,
                Permission::EditOwnCourses,
                Permission::DeleteOwnCourses,
                Permission::PublishCourses,
                Permission::ViewInstructorDashboard,
                Permission::ViewStudentProgress,
                Permission::ReplyToReviews,
                // Instructors can also rate; overlaps with the student role
                Permission::RateCourses,
            ],
        );
        role_permissions.insert(Role::Admin, ALL_PERMISSIONS.to_vec());

        let now = now_millis();
        let courses = vec![
            Course {
                id: snowflake_id(),
                slug: "intro-to-watercolor".to_string(),
                title: "Introduction to Watercolor".to_string(),
                description: "Brushes, washes and color mixing from zero.".to_string(),
                category: Some("art".to_string()),
                price: rust_decimal::Decimal::new(4900, 2),
                instructor_id: "u-instr-01".to_string(),
                instructor_name: "Marie Dubois".to_string(),
                is_published: true,
                created_at: now - 86_400_000,
            },
            Course {
                id: snowflake_id(),
                slug: "advanced-watercolor".to_string(),
                title: "Advanced Watercolor".to_string(),
                description: "Wet-on-wet techniques and composition.".to_string(),
                category: Some("art".to_string()),
                price: rust_decimal::Decimal::new(7900, 2),
                instructor_id: "u-instr-01".to_string(),
                instructor_name: "Marie Dubois".to_string(),
                is_published: false,
                created_at: now - 3_600_000,
            },
        ];

        let pages = vec![
            CustomPage {
                id: snowflake_id(),
                slug: "about".to_string(),
                title: "About Us".to_string(),
                body: "# About\nWe teach everything.".to_string(),
                is_published: true,
                updated_at: now,
            },
            // Draft page: must be indistinguishable from a missing slug
            CustomPage {
                id: snowflake_id(),
                slug: "upcoming-pricing".to_string(),
                title: "New Pricing".to_string(),
                body: "Draft, do not publish yet.".to_string(),
                is_published: false,
                updated_at: now,
            },
        ];

        Self {
            jwt_secret: "campus-mock-secret-not-for-production".to_string(),
            users,
            role_permissions,
            courses: RwLock::new(courses),
            pages,
        }
    }

    /// Verify credentials, returning the matching user
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&MockUser> {
        self.users
            .iter()
            .find(|u| u.email == email && u.password == password)
    }

    /// Look up a user by id
    pub fn user_by_id(&self, id: &str) -> Option<&MockUser> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Flatten a user's roles into (role, permission) rows — the join
    pub fn permission_rows(&self, user: &MockUser) -> Vec<(Role, Permission)> {
        let mut rows = Vec::new();
        for role in &user.roles {
            if let Some(perms) = self.role_permissions.get(role) {
                for p in perms {
                    rows.push((*role, *p));
                }
            }
        }
        rows
    }

    /// Check a permission across all of the user's roles
    pub fn user_has_permission(&self, user: &MockUser, permission: Permission) -> bool {
        self.permission_rows(user)
            .iter()
            .any(|(_, p)| *p == permission)
    }
}
