//! HTTP client integration tests against the in-memory mock backend

use std::sync::Arc;

use campus_client::{ClientConfig, ClientError, HttpClient};

async fn spawn_mock() -> String {
    let state = Arc::new(campus_auth_mock::AppState::seeded());
    let app = campus_auth_mock::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> HttpClient {
    ClientConfig::new(base_url).with_timeout(5).build_http_client()
}

#[tokio::test]
async fn test_sign_in_and_me() {
    let base_url = spawn_mock().await;
    let mut client = client(&base_url);

    let signed_in = client
        .sign_in("admin@campus.test", "admin-password")
        .await
        .unwrap();
    assert_eq!(signed_in.user.id, "u-admin-01");
    assert!(!signed_in.token.is_empty());

    client.set_token(Some(signed_in.token));
    let me = client.me().await.unwrap();
    assert_eq!(me.email, "admin@campus.test");
}

#[tokio::test]
async fn test_sign_in_rejects_bad_password() {
    let base_url = spawn_mock().await;
    let client = client(&base_url);

    let result = client.sign_in("admin@campus.test", "nope").await;
    assert!(matches!(result, Err(ClientError::Unauthorized)));
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let base_url = spawn_mock().await;
    let client = client(&base_url);

    assert!(matches!(client.me().await, Err(ClientError::Unauthorized)));
}

#[tokio::test]
async fn test_role_permission_rows() {
    let base_url = spawn_mock().await;
    let mut client = client(&base_url);

    let signed_in = client
        .sign_in("paula@campus.test", "dual-password")
        .await
        .unwrap();
    client.set_token(Some(signed_in.token));

    // 双角色用户: student + instructor 两个角色的行都在
    let rows = client.role_permissions("u-dual-01").await.unwrap();
    assert!(rows.iter().any(|r| r.role == "student"));
    assert!(rows.iter().any(|r| r.role == "instructor"));
    // rate_courses 在两个角色里各出现一次，去重是解析器的事
    let rate_rows = rows.iter().filter(|r| r.permission == "rate_courses").count();
    assert_eq!(rate_rows, 2);
}

#[tokio::test]
async fn test_permissions_of_other_user_forbidden() {
    let base_url = spawn_mock().await;
    let mut client = client(&base_url);

    let signed_in = client
        .sign_in("kenji@campus.test", "student-password")
        .await
        .unwrap();
    client.set_token(Some(signed_in.token));

    let result = client.role_permissions("u-admin-01").await;
    assert!(matches!(result, Err(ClientError::Forbidden(_))));
}

#[tokio::test]
async fn test_course_lookup_maps_not_found() {
    let base_url = spawn_mock().await;
    let client = client(&base_url);

    let course = client.course_by_slug("intro-to-watercolor").await.unwrap();
    assert!(course.is_published);

    // 草稿与缺失都折叠成 NotFound
    let draft = client.course_by_slug("advanced-watercolor").await;
    assert!(draft.is_err_and(|e| e.is_not_found()));
    let missing = client.course_by_slug("nope").await;
    assert!(missing.is_err_and(|e| e.is_not_found()));
}

#[tokio::test]
async fn test_sign_out_clears_token() {
    let base_url = spawn_mock().await;
    let mut client = client(&base_url);

    let signed_in = client
        .sign_in("admin@campus.test", "admin-password")
        .await
        .unwrap();
    client.set_token(Some(signed_in.token));

    client.sign_out().await.unwrap();
    assert!(client.token().is_none());
}
