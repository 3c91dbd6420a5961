//! Account, authentication and profile handlers.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::{read_image_field, ApiPath, ValidatedJson};
use crate::api::middleware::{require_auth, CurrentUser};
use crate::api::AppState;
use crate::config::{is_valid_role, PHONE_NUMBER_PATTERN};
use crate::domain::{ProfileChanges, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::Registration;
use crate::types::{Created, MessageResponse, SuccessResponse};

static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(PHONE_NUMBER_PATTERN).expect("Invalid phone number pattern"));

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if is_valid_role(role) {
        Ok(())
    } else {
        Err(ValidationError::new("role").with_message("Role must be either user or admin".into()))
    }
}

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jan Kowalski")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jan@example.com")]
    pub email: String,
    #[validate(length(min = 8, max = 100, message = "Password must be between 8 and 100 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8, max_length = 100)]
    pub password: String,
    #[validate(regex(path = *PHONE_NUMBER, message = "Invalid phone number format"))]
    #[schema(example = "+48 600 700 800")]
    pub phone_number: String,
    pub profile_image: Option<String>,
    /// `user` (default) or `admin`
    #[validate(custom(function = "validate_role"))]
    #[schema(example = "user")]
    pub role: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "jan@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile update; omitted fields stay unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(regex(path = *PHONE_NUMBER, message = "Invalid phone number format"))]
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub new_email: String,
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[schema(example = "User registered successfully")]
    pub message: String,
    pub user_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageResponse {
    pub message: String,
    pub image_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailChangedResponse {
    pub message: String,
    pub new_email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserData {
    pub user: UserResponse,
}

/// Routes under `/api/users`
pub fn user_routes(state: AppState) -> Router<AppState> {
    let protected = require_auth(
        Router::new()
            .route("/me", get(get_me).put(update_me).delete(delete_me))
            .route(
                "/me/profile-image",
                post(upload_profile_image).delete(delete_profile_image),
            )
            .route("/me/change-email", put(change_email))
            .route("/me/change-password", put(change_password))
            .route("/:id", get(get_user)),
        state,
    );

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<RegisterResponse>> {
    let registration = Registration {
        name: payload.name,
        email: payload.email,
        password: payload.password,
        phone_number: payload.phone_number,
        profile_image: payload.profile_image,
        role: payload
            .role
            .as_deref()
            .map(UserRole::from)
            .unwrap_or(UserRole::User),
    };

    let user = state.services.auth().register(registration).await?;

    Ok(Created(RegisterResponse {
        message: "User registered successfully".to_string(),
        user_id: user.id,
    }))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = state
        .services
        .auth()
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: outcome.token,
        user: outcome.user.into(),
    }))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().get_user(current.id).await?;
    Ok(Json(user.into()))
}

/// Update name and/or phone number
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let changes = ProfileChanges {
        name: payload.name,
        phone_number: payload.phone_number,
    };
    let user = state
        .services
        .users()
        .update_profile(current.id, changes)
        .await?;

    Ok(Json(ProfileResponse {
        message: "Profile updated successfully".to_string(),
        user: user.into(),
    }))
}

/// Delete the authenticated account
#[utoipa::path(
    delete,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<MessageResponse>> {
    state.services.users().delete_account(current.id).await?;
    Ok(Json(MessageResponse::new("Account deleted successfully")))
}

/// Upload a new profile image (multipart field `profileImage`)
#[utoipa::path(
    post,
    path = "/api/users/me/profile-image",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body(content = String, content_type = "multipart/form-data", description = "Image in the `profileImage` field"),
    responses(
        (status = 200, description = "Profile image updated", body = ProfileImageResponse),
        (status = 400, description = "Missing, empty, oversized or non-image file"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn upload_profile_image(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ProfileImageResponse>> {
    let image = read_image_field(multipart?, "profileImage", state.max_upload_bytes).await?;
    let image_url = state
        .services
        .users()
        .upload_profile_image(current.id, image.data, image.mime_type)
        .await?;

    Ok(Json(ProfileImageResponse {
        message: "Profile image updated successfully".to_string(),
        image_url,
    }))
}

/// Remove the profile image
#[utoipa::path(
    delete,
    path = "/api/users/me/profile-image",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile image removed", body = MessageResponse),
        (status = 400, description = "No profile image set"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn delete_profile_image(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<MessageResponse>> {
    state.services.users().delete_profile_image(current.id).await?;
    Ok(Json(MessageResponse::new("Profile image deleted successfully")))
}

/// Change the login email
#[utoipa::path(
    put,
    path = "/api/users/me/change-email",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ChangeEmailRequest,
    responses(
        (status = 200, description = "Email changed", body = EmailChangedResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Wrong current password"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn change_email(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(payload): ValidatedJson<ChangeEmailRequest>,
) -> AppResult<Json<EmailChangedResponse>> {
    let user = state
        .services
        .users()
        .change_email(current.id, payload.new_email, payload.current_password)
        .await?;

    Ok(Json(EmailChangedResponse {
        message: "Email changed successfully".to_string(),
        new_email: user.email,
    }))
}

/// Change the password
#[utoipa::path(
    put,
    path = "/api/users/me/change-password",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "New password too weak"),
        (status = 401, description = "Wrong current password")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .users()
        .change_password(current.id, payload.current_password, payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// Get any user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<SuccessResponse<UserData>>> {
    let user = state.services.users().get_user(id).await?;
    Ok(Json(SuccessResponse::new(UserData { user: user.into() })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(phone: &str, role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            name: "Jan".to_string(),
            email: "jan@example.com".to_string(),
            password: "password123".to_string(),
            phone_number: phone.to_string(),
            profile_image: None,
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_register_request_accepts_valid_input() {
        assert!(registration("+48 600-700-800", None).validate().is_ok());
        assert!(registration("600700800", Some("admin")).validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_phone() {
        let errors = registration("12ab", None).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone_number"));
    }

    #[test]
    fn test_register_request_rejects_unknown_role() {
        let errors = registration("600700800", Some("superuser"))
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("role"));
    }

    #[test]
    fn test_update_profile_allows_empty_body() {
        let request = UpdateProfileRequest {
            name: None,
            phone_number: None,
        };
        assert!(request.validate().is_ok());
    }
}
