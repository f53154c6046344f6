//! HTTP client for network-based API calls

use crate::{ClientConfig, ClientError, ClientResult, SignInResponse, UserInfo};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use shared::client::RolePermissionRow;
use shared::models::{Course, CourseCreate, CourseUpdate, CustomPage};

/// HTTP client for making network requests to the marketplace backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replace the authentication token in place
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'));
        let mut request = self.client.get(&url);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'));
        let mut request = self.client.post(&url).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request without body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'));
        let mut request = self.client.post(&url);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'));
        let mut request = self.client.put(&url).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            tracing::debug!(status = %status, body = %text, "Request rejected");
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Auth API ==========

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<SignInResponse> {
        let request = shared::client::SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        self.post::<ApiResponse<SignInResponse>, _>("/api/auth/login", &request)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing sign-in data".to_string()))
    }

    /// Get current user information
    pub async fn me(&self) -> ClientResult<UserInfo> {
        self.get::<ApiResponse<UserInfo>>("/api/auth/me")
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing user data".to_string()))
    }

    /// Sign out
    pub async fn sign_out(&mut self) -> ClientResult<()> {
        self.post_empty::<ApiResponse<()>>("/api/auth/logout").await?;
        self.token = None;
        Ok(())
    }

    // ========== Permission API ==========

    /// Fetch the `user_roles` ⨝ `role_permissions` join for a user
    ///
    /// Returns the raw (role, permission) rows; flattening and
    /// deduplication happen in the resolver.
    pub async fn role_permissions(&self, user_id: &str) -> ClientResult<Vec<RolePermissionRow>> {
        self.get::<ApiResponse<Vec<RolePermissionRow>>>(&format!(
            "/api/users/{}/permissions",
            user_id
        ))
        .await?
        .data
        .ok_or_else(|| ClientError::InvalidResponse("Missing permission rows".to_string()))
    }

    // ========== Course API ==========

    /// List published courses (public catalog)
    pub async fn published_courses(&self) -> ClientResult<Vec<Course>> {
        self.get::<ApiResponse<Vec<Course>>>("/api/courses")
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing course list".to_string()))
    }

    /// List courses owned by an instructor, newest first
    pub async fn courses_by_instructor(&self, instructor_id: &str) -> ClientResult<Vec<Course>> {
        self.get::<ApiResponse<Vec<Course>>>(&format!(
            "/api/courses?instructor_id={}",
            instructor_id
        ))
        .await?
        .data
        .ok_or_else(|| ClientError::InvalidResponse("Missing course list".to_string()))
    }

    /// Fetch a published course by slug
    pub async fn course_by_slug(&self, slug: &str) -> ClientResult<Course> {
        self.get::<ApiResponse<Course>>(&format!("/api/courses/{}", slug))
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing course data".to_string()))
    }

    /// Create a course
    pub async fn create_course(&self, payload: &CourseCreate) -> ClientResult<Course> {
        self.post::<ApiResponse<Course>, _>("/api/courses", payload)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing course data".to_string()))
    }

    /// Update a course
    pub async fn update_course(&self, id: i64, payload: &CourseUpdate) -> ClientResult<Course> {
        self.put::<ApiResponse<Course>, _>(&format!("/api/courses/{}", id), payload)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing course data".to_string()))
    }

    // ========== Custom Page API ==========

    /// Fetch a published custom page by slug
    pub async fn page_by_slug(&self, slug: &str) -> ClientResult<CustomPage> {
        self.get::<ApiResponse<CustomPage>>(&format!("/api/pages/{}", slug))
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing page data".to_string()))
    }
}
