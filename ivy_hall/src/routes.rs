//! 路由表
//!
//! 路径解析与每条路由的访问策略。未匹配的路径先尝试单段的自定义
//! 页面 slug，仍不匹配才是 NotFound —— 与自定义页面视图的 404
//! 完全一致。

use shared::models::Permission;

use crate::core::guard::{AccessDecision, AccessGuard, Requirement};

/// 应用路由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Auth,
    Catalog,
    CourseView { slug: String },
    Learn { slug: String },
    PaymentSuccess,
    AdminDashboard,
    InstructorDashboard,
    CreateCourse,
    EditCourse { id: i64 },
    CustomPage { slug: String },
    NotFound,
}

/// 路由的访问策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    Public,
    Authenticated,
    Permission(Requirement),
}

impl Route {
    /// 解析路径；query/fragment 由调用方预先剥离
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["auth"] => Route::Auth,
            ["courses"] => Route::Catalog,
            ["courses", slug] => Route::CourseView {
                slug: (*slug).to_string(),
            },
            ["learn", slug] => Route::Learn {
                slug: (*slug).to_string(),
            },
            ["payment-success"] => Route::PaymentSuccess,
            ["admin"] => Route::AdminDashboard,
            ["instructor"] => Route::InstructorDashboard,
            ["instructor", "courses", "new"] => Route::CreateCourse,
            ["instructor", "courses", id, "edit"] => match id.parse() {
                Ok(id) => Route::EditCourse { id },
                Err(_) => Route::NotFound,
            },
            // 单段路径当作自定义页面 slug，存在与否由视图层裁决
            [slug] => Route::CustomPage {
                slug: (*slug).to_string(),
            },
            _ => Route::NotFound,
        }
    }

    /// 该路由的访问策略
    pub fn policy(&self) -> AccessPolicy {
        match self {
            Route::Home
            | Route::Auth
            | Route::Catalog
            | Route::CourseView { .. }
            | Route::CustomPage { .. }
            | Route::NotFound => AccessPolicy::Public,

            Route::Learn { .. } | Route::PaymentSuccess => AccessPolicy::Authenticated,

            Route::AdminDashboard => AccessPolicy::Permission(Requirement::Permission(
                Permission::ViewAdminDashboard,
            )),
            Route::InstructorDashboard => AccessPolicy::Permission(Requirement::Permission(
                Permission::ViewInstructorDashboard,
            )),
            Route::CreateCourse => {
                AccessPolicy::Permission(Requirement::Permission(Permission::CreateCourses))
            }
            Route::EditCourse { .. } => AccessPolicy::Permission(Requirement::AnyOf(vec![
                Permission::EditOwnCourses,
                Permission::EditAnyCourse,
            ])),
        }
    }
}

/// 按路由策略裁决
pub fn decide_route(guard: &AccessGuard, route: &Route) -> AccessDecision {
    match route.policy() {
        AccessPolicy::Public => AccessDecision::Granted,
        AccessPolicy::Authenticated => guard.decide(None),
        AccessPolicy::Permission(requirement) => guard.decide(Some(&requirement)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::{guard_with, identity};

    #[test]
    fn test_parse_static_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/auth"), Route::Auth);
        assert_eq!(Route::parse("/courses"), Route::Catalog);
        assert_eq!(Route::parse("/payment-success"), Route::PaymentSuccess);
        assert_eq!(Route::parse("/admin"), Route::AdminDashboard);
        assert_eq!(Route::parse("/instructor"), Route::InstructorDashboard);
        assert_eq!(Route::parse("/instructor/courses/new"), Route::CreateCourse);
    }

    #[test]
    fn test_parse_dynamic_routes() {
        assert_eq!(
            Route::parse("/courses/intro-to-watercolor"),
            Route::CourseView {
                slug: "intro-to-watercolor".to_string()
            }
        );
        assert_eq!(
            Route::parse("/learn/intro-to-watercolor"),
            Route::Learn {
                slug: "intro-to-watercolor".to_string()
            }
        );
        assert_eq!(
            Route::parse("/instructor/courses/42/edit"),
            Route::EditCourse { id: 42 }
        );
        assert_eq!(
            Route::parse("/instructor/courses/not-a-number/edit"),
            Route::NotFound
        );
    }

    #[test]
    fn test_single_segment_falls_back_to_custom_page() {
        assert_eq!(
            Route::parse("/about"),
            Route::CustomPage {
                slug: "about".to_string()
            }
        );
        assert_eq!(Route::parse("/no/such/route"), Route::NotFound);
    }

    #[test]
    fn test_route_policies() {
        assert_eq!(Route::Catalog.policy(), AccessPolicy::Public);
        assert_eq!(
            Route::Learn {
                slug: "x".to_string()
            }
            .policy(),
            AccessPolicy::Authenticated
        );
        assert!(matches!(
            Route::AdminDashboard.policy(),
            AccessPolicy::Permission(Requirement::Permission(Permission::ViewAdminDashboard))
        ));
    }

    #[test]
    fn test_decide_route_signed_out() {
        let guard = guard_with(None, &[]);

        assert_eq!(
            decide_route(&guard, &Route::Catalog),
            AccessDecision::Granted
        );
        assert_eq!(
            decide_route(
                &guard,
                &Route::Learn {
                    slug: "x".to_string()
                }
            ),
            AccessDecision::AuthRequired
        );
        // 未登录访问管理页引导登录，而不是 Denied
        assert_eq!(
            decide_route(&guard, &Route::AdminDashboard),
            AccessDecision::AuthRequired
        );
    }

    #[test]
    fn test_decide_route_signed_in() {
        let guard = guard_with(
            Some(identity("u-i")),
            &[
                Permission::ViewInstructorDashboard,
                Permission::CreateCourses,
            ],
        );

        assert_eq!(
            decide_route(&guard, &Route::InstructorDashboard),
            AccessDecision::Granted
        );
        assert_eq!(
            decide_route(&guard, &Route::CreateCourse),
            AccessDecision::Granted
        );
        assert_eq!(
            decide_route(&guard, &Route::AdminDashboard),
            AccessDecision::Denied
        );
    }
}
