//! Integration tests for the HTTP surface.
//!
//! The real router runs against in-memory fake services, so no database or
//! object storage is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use toolshare_api::api::{create_router, AppState};
use toolshare_api::config::Config;
use toolshare_api::domain::{
    Favorite, FavoriteDetails, NewTool, ProfileChanges, Review, ReviewChanges, ReviewDetails, Tool,
    ToolChanges, ToolDetails, ToolImage, User, UserRole,
};
use toolshare_api::errors::{AppError, AppResult};
use toolshare_api::services::{
    AuthService, FavoriteService, LoginOutcome, Registration, ReviewService, ServiceContainer,
    TokenAuthenticator, ToolService, UserService,
};

const SECRET: &str = "integration-test-secret-with-enough-length";
const CALLER_ID: i32 = 42;

// =============================================================================
// Fake services
// =============================================================================

fn unused<T>() -> AppResult<T> {
    Err(AppError::internal("not exercised by these tests"))
}

fn user(id: i32) -> User {
    User {
        id,
        name: "Jan Kowalski".to_string(),
        email: "jan@example.com".to_string(),
        password_hash: "hash".to_string(),
        profile_image: None,
        role: UserRole::User,
        phone_number: "600700800".to_string(),
        last_login: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

struct Fake {
    healthy: bool,
}

#[async_trait]
impl AuthService for Fake {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        let mut created = user(7);
        created.email = registration.email;
        Ok(created)
    }

    async fn login(&self, _email: String, _password: String) -> AppResult<LoginOutcome> {
        unused()
    }
}

#[async_trait]
impl UserService for Fake {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        match id {
            404 => Err(AppError::not_found("User not found")),
            _ => Ok(user(id)),
        }
    }

    async fn update_profile(&self, _id: i32, _changes: ProfileChanges) -> AppResult<User> {
        unused()
    }

    async fn change_email(&self, _id: i32, _email: String, _password: String) -> AppResult<User> {
        unused()
    }

    async fn change_password(&self, _id: i32, _current: String, _new: String) -> AppResult<()> {
        unused()
    }

    async fn delete_account(&self, _id: i32) -> AppResult<()> {
        unused()
    }

    async fn upload_profile_image(
        &self,
        _id: i32,
        _data: Bytes,
        _mime_type: String,
    ) -> AppResult<String> {
        unused()
    }

    async fn delete_profile_image(&self, _id: i32) -> AppResult<()> {
        unused()
    }
}

#[async_trait]
impl ToolService for Fake {
    async fn create_tool(&self, _owner_id: i32, _new_tool: NewTool) -> AppResult<Tool> {
        unused()
    }

    async fn list_tools(&self) -> AppResult<Vec<ToolDetails>> {
        Ok(Vec::new())
    }

    async fn get_tool(&self, _id: i32) -> AppResult<ToolDetails> {
        Err(AppError::not_found("Resource not found"))
    }

    async fn update_tool(&self, _caller: i32, _id: i32, _changes: ToolChanges) -> AppResult<Tool> {
        Err(AppError::forbidden("You can only update your own tools"))
    }

    async fn delete_tool(&self, _caller: i32, _id: i32) -> AppResult<()> {
        panic!("tool store exploded")
    }

    async fn add_image_url(&self, _caller: i32, _tool: i32, _url: String) -> AppResult<ToolImage> {
        unused()
    }

    async fn upload_image(
        &self,
        _caller: i32,
        _tool: i32,
        _data: Bytes,
        _mime_type: String,
    ) -> AppResult<ToolImage> {
        unused()
    }

    async fn list_images(&self, _tool_id: i32) -> AppResult<Vec<ToolImage>> {
        unused()
    }

    async fn delete_image(&self, _caller: i32, _tool: i32, _image: i32) -> AppResult<()> {
        unused()
    }
}

#[async_trait]
impl ReviewService for Fake {
    async fn create_review(
        &self,
        _reviewer: i32,
        _reviewed: i32,
        _rating: i32,
        _comment: Option<String>,
    ) -> AppResult<Review> {
        unused()
    }

    async fn list_reviews(&self, _reviewed: Option<i32>) -> AppResult<Vec<ReviewDetails>> {
        Err(AppError::internal("connection refused"))
    }

    async fn reviews_of(&self, _user_id: i32) -> AppResult<Vec<ReviewDetails>> {
        unused()
    }

    async fn update_review(
        &self,
        _caller: i32,
        _id: i32,
        _changes: ReviewChanges,
    ) -> AppResult<Review> {
        unused()
    }

    async fn delete_review(&self, _caller: i32, _id: i32) -> AppResult<()> {
        unused()
    }
}

#[async_trait]
impl FavoriteService for Fake {
    async fn add_favorite(&self, _user_id: i32, _tool_id: i32) -> AppResult<Favorite> {
        Err(AppError::conflict("Tool is already in favorites"))
    }

    async fn list_favorites(&self, _user_id: i32) -> AppResult<Vec<FavoriteDetails>> {
        Ok(Vec::new())
    }

    async fn remove_favorite(&self, _caller: i32, _id: i32) -> AppResult<()> {
        Ok(())
    }
}

struct FakeContainer(Arc<Fake>);

#[async_trait]
impl ServiceContainer for FakeContainer {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.0.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.0.clone()
    }

    fn tools(&self) -> Arc<dyn ToolService> {
        self.0.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewService> {
        self.0.clone()
    }

    fn favorites(&self) -> Arc<dyn FavoriteService> {
        self.0.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        if self.0.healthy {
            Ok(())
        } else {
            Err(AppError::internal("database unreachable"))
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn config(app_env: &str) -> Config {
    let app_env = app_env.to_string();
    Config::from_lookup(move |key| match key {
        "APP_ENV" => Some(app_env.clone()),
        "JWT_SECRET" => Some(SECRET.to_string()),
        "S3_BUCKET_NAME" => Some("toolshare-test".to_string()),
        _ => None,
    })
    .expect("test configuration is valid")
}

fn app_with(app_env: &str, healthy: bool) -> Router {
    let config = config(app_env);
    let tokens = Arc::new(TokenAuthenticator::from_config(&config));
    let services = Arc::new(FakeContainer(Arc::new(Fake { healthy })));
    create_router(AppState::new(services, tokens, &config))
}

fn app() -> Router {
    app_with("production", true)
}

fn token_for(user_id: i32) -> String {
    TokenAuthenticator::new(SECRET.as_bytes(), 1)
        .issue(user_id, "jan@example.com")
        .expect("token issues")
}

fn request(method: Method, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Forwarded-For", "203.0.113.9, 10.0.0.1");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_missing_token_is_rejected_with_envelope() {
    let (status, body) = send(app(), request(Method::GET, "/api/users/me", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "AUTHENTICATION_ERROR");
    assert_eq!(body["message"], "Missing authorization token");
    assert_eq!(body["path"], "/api/users/me");
    assert_eq!(body["method"], "GET");
    assert_eq!(body["ip"], "203.0.113.9");
    assert_eq!(body["userId"], Value::Null);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_malformed_token_hides_stack_in_production() {
    let payload = json!({
        "name": "Drill",
        "pricePerDay": 10.0,
        "latitude": 52.0,
        "longitude": 21.0
    });
    let (status, body) = send(
        app(),
        request(Method::POST, "/api/tools", Some("malformedtoken"), Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
    assert!(body.get("stack").is_none());
}

#[tokio::test]
async fn test_header_without_bearer_scheme_is_malformed() {
    let request = Request::builder()
        .uri("/api/users/me")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid authorization header format");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let forged = TokenAuthenticator::new(b"some-other-secret-that-is-long-enough!", 1)
        .issue(CALLER_ID, "jan@example.com")
        .unwrap();
    let (status, body) = send(
        app(),
        request(Method::GET, "/api/users/me", Some(&forged), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_expired_token_is_reported_as_expired() {
    let expired = TokenAuthenticator::new(SECRET.as_bytes(), -1)
        .issue(CALLER_ID, "jan@example.com")
        .unwrap();
    let (status, body) = send(
        app(),
        request(Method::GET, "/api/users/me", Some(&expired), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTHENTICATION_ERROR");
    assert_eq!(body["message"], "Token has expired");
}

#[tokio::test]
async fn test_valid_token_reaches_handler_with_subject() {
    let token = token_for(CALLER_ID);
    let (status, body) = send(app(), request(Method::GET, "/api/users/me", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], CALLER_ID);
    assert_eq!(body["phoneNumber"], "600700800");
    assert!(body.get("passwordHash").is_none());
}

// =============================================================================
// Error envelopes
// =============================================================================

#[tokio::test]
async fn test_not_found_envelope_on_public_route() {
    let (status, body) = send(app(), request(Method::GET, "/api/tools/99", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["message"], "Resource not found");
    assert_eq!(body["userId"], Value::Null);
}

#[tokio::test]
async fn test_forbidden_envelope_carries_caller_id() {
    let token = token_for(CALLER_ID);
    let (status, body) = send(
        app(),
        request(
            Method::PUT,
            "/api/tools/1",
            Some(&token),
            Some(json!({ "name": "Hammer" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "AUTHORIZATION_ERROR");
    assert_eq!(body["userId"], CALLER_ID);
    assert_eq!(body["method"], "PUT");
}

#[tokio::test]
async fn test_duplicate_favorite_is_conflict() {
    let token = token_for(CALLER_ID);
    let (status, body) = send(
        app(),
        request(
            Method::POST,
            "/api/favorites",
            Some(&token),
            Some(json!({ "toolId": 3 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT_ERROR");
    assert_eq!(body["message"], "Tool is already in favorites");
}

#[tokio::test]
async fn test_internal_error_hides_detail_in_production() {
    let (status, body) = send(app(), request(Method::GET, "/api/reviews", None, None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(body["message"], "Internal server error");
    assert!(body.get("stack").is_none());
}

#[tokio::test]
async fn test_internal_error_exposes_stack_in_development() {
    let (status, body) = send(
        app_with("development", true),
        request(Method::GET, "/api/reviews", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
    assert!(body["stack"]
        .as_str()
        .is_some_and(|stack| stack.contains("connection refused")));
}

#[tokio::test]
async fn test_unsupported_method_on_public_route_is_enveloped() {
    let (status, body) = send(
        app(),
        request(Method::PATCH, "/api/reviews/reviewed/1", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["path"], "/api/reviews/reviewed/1");
    assert_eq!(body["method"], "PATCH");
    assert_eq!(body["ip"], "203.0.113.9");
}

#[tokio::test]
async fn test_panic_in_authenticated_handler_keeps_caller_id() {
    let token = token_for(CALLER_ID);
    let (status, body) = send(
        app_with("development", true),
        request(Method::DELETE, "/api/tools/1", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["userId"], CALLER_ID);
    assert!(body["stack"]
        .as_str()
        .is_some_and(|stack| stack.contains("tool store exploded")));
}

#[tokio::test]
async fn test_unknown_route_is_not_found_envelope() {
    let (status, body) = send(app(), request(Method::GET, "/api/unknown", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["message"], "Route not found");
    assert_eq!(body["path"], "/api/unknown");
}

#[tokio::test]
async fn test_invalid_registration_is_validation_error() {
    let payload = json!({
        "name": "Jan",
        "email": "not-an-email",
        "password": "password123",
        "phoneNumber": "600700800"
    });
    let (status, body) = send(
        app(),
        request(Method::POST, "/api/users/register", None, Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Invalid email format");
}

#[tokio::test]
async fn test_unparseable_body_is_validation_error() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_non_numeric_id_is_validation_error() {
    let (status, body) = send(app(), request(Method::GET, "/api/tools/abc", None, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Success shapes
// =============================================================================

#[tokio::test]
async fn test_register_returns_created_user_id() {
    let payload = json!({
        "name": "Jan",
        "email": "jan@example.com",
        "password": "password123",
        "phoneNumber": "+48 600 700 800"
    });
    let (status, body) = send(
        app(),
        request(Method::POST, "/api/users/register", None, Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userId"], 7);
    assert_eq!(body["message"], "User registered successfully");
}

#[tokio::test]
async fn test_get_user_by_id_is_wrapped() {
    let token = token_for(CALLER_ID);
    let (status, body) = send(app(), request(Method::GET, "/api/users/5", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["user"]["id"], 5);
}

#[tokio::test]
async fn test_remove_favorite_shape() {
    let token = token_for(CALLER_ID);
    let (status, body) = send(
        app(),
        request(Method::DELETE, "/api/favorites/9", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "message": "Tool removed from favorites",
            "data": { "favoriteId": 9 }
        })
    );
}

#[tokio::test]
async fn test_public_tool_listing_needs_no_token() {
    let (status, body) = send(app(), request(Method::GET, "/api/tools", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// =============================================================================
// Service plumbing
// =============================================================================

#[tokio::test]
async fn test_health_reports_database_state() {
    let (status, body) = send(app(), request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(
        app_with("production", false),
        request(Method::GET, "/health", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_root_banner() {
    let response = app()
        .oneshot(request(Method::GET, "/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Tool rental API is running");
}
