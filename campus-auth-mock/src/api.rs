use crate::state::{AppState, MockUser};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::client::{RolePermissionRow, SignInRequest, SignInResponse, UserInfo};
use shared::models::{Course, CourseCreate, CourseUpdate, Permission};
use shared::util::{now_millis, snowflake_id};
use shared::{ApiResponse, ErrorCode};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    exp: usize,
    iat: usize,
}

/// Build the mock backend router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route("/api/users/{user_id}/permissions", get(user_permissions))
        .route("/api/courses", get(list_courses).post(create_course))
        .route("/api/courses/{key}", get(course_by_slug).put(update_course))
        .route("/api/pages/{slug}", get(page_by_slug))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn error_response(code: ErrorCode) -> Response {
    (
        code.http_status(),
        Json(ApiResponse::<serde_json::Value>::error(
            format!("E{:04}", code.code()),
            code.message(),
        )),
    )
        .into_response()
}

fn issue_token(state: &AppState, user: &MockUser) -> String {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::hours(24))
        .unwrap_or(now)
        .timestamp();

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        exp: exp as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )
    .unwrap_or_default()
}

/// Extract and validate the bearer token, returning the claims
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<Claims, Response> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| error_response(ErrorCode::NotAuthenticated))?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!(error = %e, "token validation failed");
        error_response(ErrorCode::TokenInvalid)
    })
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn login(State(state): State<Arc<AppState>>, Json(req): Json<SignInRequest>) -> Response {
    match state.authenticate(&req.email, &req.password) {
        Some(user) => {
            let token = issue_token(&state, user);
            tracing::debug!(user_id = %user.id, "mock sign-in");
            Json(ApiResponse::ok(SignInResponse {
                token,
                user: UserInfo {
                    id: user.id.clone(),
                    email: user.email.clone(),
                    display_name: user.display_name.clone(),
                },
            }))
            .into_response()
        }
        None => error_response(ErrorCode::InvalidCredentials),
    }
}

async fn me(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let claims = match authorize(&state, &headers) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match state.user_by_id(&claims.sub) {
        Some(user) => Json(ApiResponse::ok(UserInfo {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
        }))
        .into_response(),
        None => error_response(ErrorCode::NotAuthenticated),
    }
}

async fn logout() -> Json<ApiResponse<()>> {
    // Stateless tokens: nothing to invalidate server-side in the mock
    Json(ApiResponse::ok(()))
}

/// The `user_roles` ⨝ `role_permissions` join, filtered by user id
///
/// Row-level security in the hosted backend only lets users read their own
/// assignment rows; the mock enforces the same rule.
async fn user_permissions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let claims = match authorize(&state, &headers) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    if claims.sub != user_id {
        return error_response(ErrorCode::PermissionDenied);
    }

    let Some(user) = state.user_by_id(&user_id) else {
        return error_response(ErrorCode::NotFound);
    };

    let rows: Vec<RolePermissionRow> = state
        .permission_rows(user)
        .into_iter()
        .map(|(role, permission)| RolePermissionRow {
            role: role.as_str().to_string(),
            permission: permission.as_str().to_string(),
        })
        .collect();

    Json(ApiResponse::ok(rows)).into_response()
}

#[derive(Debug, Deserialize)]
struct CourseListQuery {
    instructor_id: Option<String>,
}

/// List courses
///
/// Without a filter: published courses only. With `instructor_id`: the
/// instructor's own courses including drafts, which requires the caller
/// to be that instructor. Both orderings are newest-first.
async fn list_courses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourseListQuery>,
    headers: HeaderMap,
) -> Response {
    let courses = state.courses.read().await;

    let mut selected: Vec<Course> = match &query.instructor_id {
        Some(instructor_id) => {
            let claims = match authorize(&state, &headers) {
                Ok(c) => c,
                Err(resp) => return resp,
            };
            if &claims.sub != instructor_id {
                return error_response(ErrorCode::PermissionDenied);
            }
            courses
                .iter()
                .filter(|c| &c.instructor_id == instructor_id)
                .cloned()
                .collect()
        }
        None => courses.iter().filter(|c| c.is_published).cloned().collect(),
    };

    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(ApiResponse::ok(selected)).into_response()
}

async fn course_by_slug(State(state): State<Arc<AppState>>, Path(key): Path<String>) -> Response {
    let courses = state.courses.read().await;

    match courses.iter().find(|c| c.slug == key && c.is_published) {
        Some(course) => Json(ApiResponse::ok(course.clone())).into_response(),
        None => error_response(ErrorCode::CourseNotFound),
    }
}

async fn create_course(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CourseCreate>,
) -> Response {
    let claims = match authorize(&state, &headers) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let Some(user) = state.user_by_id(&claims.sub) else {
        return error_response(ErrorCode::NotAuthenticated);
    };

    if !state.user_has_permission(user, Permission::CreateCourses) {
        tracing::warn!(user_id = %user.id, "create_course denied");
        return error_response(ErrorCode::PermissionDenied);
    }

    let mut courses = state.courses.write().await;
    if courses.iter().any(|c| c.slug == payload.slug) {
        return error_response(ErrorCode::CourseSlugExists);
    }

    let course = Course {
        id: snowflake_id(),
        slug: payload.slug,
        title: payload.title,
        description: payload.description,
        category: payload.category,
        price: payload.price,
        instructor_id: user.id.clone(),
        instructor_name: user.display_name.clone(),
        is_published: false,
        created_at: now_millis(),
    };
    courses.push(course.clone());

    Json(ApiResponse::ok(course)).into_response()
}

async fn update_course(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<CourseUpdate>,
) -> Response {
    let claims = match authorize(&state, &headers) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let Some(user) = state.user_by_id(&claims.sub) else {
        return error_response(ErrorCode::NotAuthenticated);
    };

    let Ok(id) = key.parse::<i64>() else {
        return error_response(ErrorCode::InvalidRequest);
    };

    let mut courses = state.courses.write().await;
    let Some(course) = courses.iter_mut().find(|c| c.id == id) else {
        return error_response(ErrorCode::CourseNotFound);
    };

    let can_edit_any = state.user_has_permission(user, Permission::EditAnyCourse);
    let can_edit_own = state.user_has_permission(user, Permission::EditOwnCourses)
        && course.instructor_id == user.id;
    if !can_edit_any && !can_edit_own {
        tracing::warn!(user_id = %user.id, course_id = id, "update_course denied");
        return error_response(ErrorCode::PermissionDenied);
    }

    if let Some(title) = payload.title {
        course.title = title;
    }
    if let Some(description) = payload.description {
        course.description = description;
    }
    if let Some(category) = payload.category {
        course.category = Some(category);
    }
    if let Some(price) = payload.price {
        course.price = price;
    }
    if let Some(is_published) = payload.is_published {
        course.is_published = is_published;
    }

    Json(ApiResponse::ok(course.clone())).into_response()
}

async fn page_by_slug(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    // Unpublished pages 404 exactly like missing slugs: a draft's existence
    // must not be observable
    match state
        .pages
        .iter()
        .find(|p| p.slug == slug && p.is_published)
    {
        Some(page) => Json(ApiResponse::ok(page.clone())).into_response(),
        None => error_response(ErrorCode::PageNotFound),
    }
}
