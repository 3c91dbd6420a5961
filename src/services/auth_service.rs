//! Authentication service - Registration and login.
//!
//! Password hashing lives in the domain `Password` value object; token
//! signing in `TokenAuthenticator`.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use super::TokenAuthenticator;
use crate::config::DUMMY_PASSWORD_HASH;
use crate::domain::{NewUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult, AuthError};
use crate::infra::UnitOfWork;

/// Validated registration data
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub profile_image: Option<String>,
    pub role: UserRole,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, registration: Registration) -> AppResult<User>;

    /// Check credentials, record the login and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<LoginOutcome>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<TokenAuthenticator>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, tokens: Arc<TokenAuthenticator>) -> Self {
        Self { uow, tokens }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        if self
            .uow
            .users()
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            tracing::warn!(email = %registration.email, "Registration rejected, email taken");
            return Err(AppError::conflict("User with this email already exists"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                name: registration.name,
                email: registration.email,
                password_hash,
                phone_number: registration.phone_number,
                profile_image: registration.profile_image,
                role: registration.role,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<LoginOutcome> {
        let user = self.uow.users().find_by_email(&email).await?;

        // Verify against a dummy hash for unknown emails so both paths cost the same
        let hash = user
            .as_ref()
            .map_or(DUMMY_PASSWORD_HASH, |u| u.password_hash.as_str());
        let password_valid = Password::from_hash(hash.to_string()).verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::warn!(email = %email, "Login failed");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let user = self
            .uow
            .users()
            .record_login(user.id, Utc::now().timestamp_millis())
            .await?;
        let token = self.tokens.issue(user.id, &user.email)?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(LoginOutcome { token, user })
    }
}
