//! User service - Account and profile use cases for an authenticated user.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use super::discard_image;
use crate::domain::{Password, ProfileChanges, User};
use crate::errors::{AppError, AppResult, AuthError, OptionExt};
use crate::infra::{ImageDirectory, ObjectStorage, UnitOfWork};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Update name and/or phone number
    async fn update_profile(&self, id: i32, changes: ProfileChanges) -> AppResult<User>;

    /// Change email after re-checking the current password
    async fn change_email(
        &self,
        id: i32,
        new_email: String,
        current_password: String,
    ) -> AppResult<User>;

    /// Change password after re-checking the current one
    async fn change_password(
        &self,
        id: i32,
        current_password: String,
        new_password: String,
    ) -> AppResult<()>;

    /// Delete the account and its stored profile image
    async fn delete_account(&self, id: i32) -> AppResult<()>;

    /// Store a new profile image, replacing the previous one; returns its URL
    async fn upload_profile_image(
        &self,
        id: i32,
        data: Bytes,
        mime_type: String,
    ) -> AppResult<String>;

    /// Remove the profile image
    async fn delete_profile_image(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: Arc<dyn ObjectStorage>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { uow, storage }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User not found")
    }

    async fn update_profile(&self, id: i32, changes: ProfileChanges) -> AppResult<User> {
        let user = self.uow.users().update_profile(id, changes).await?;
        tracing::info!(user_id = id, "Profile updated");
        Ok(user)
    }

    async fn change_email(
        &self,
        id: i32,
        new_email: String,
        current_password: String,
    ) -> AppResult<User> {
        let user = self.get_user(id).await?;

        if !Password::from_hash(user.password_hash.clone()).verify(&current_password) {
            tracing::warn!(user_id = id, "Email change rejected, wrong password");
            return Err(AuthError::IncorrectPassword.into());
        }

        match self.uow.users().find_by_email(&new_email).await? {
            Some(other) if other.id != id => {
                return Err(AppError::conflict("Email is already in use"));
            }
            Some(_) => return Ok(user),
            None => {}
        }

        let user = self.uow.users().update_email(id, new_email).await?;
        tracing::info!(user_id = id, "Email changed");
        Ok(user)
    }

    async fn change_password(
        &self,
        id: i32,
        current_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let user = self.get_user(id).await?;

        if !Password::from_hash(user.password_hash).verify(&current_password) {
            tracing::warn!(user_id = id, "Password change rejected, wrong password");
            return Err(AuthError::IncorrectPassword.into());
        }

        let password_hash = Password::new_strong(&new_password)?.into_string();
        self.uow.users().update_password(id, password_hash).await?;

        tracing::info!(user_id = id, "Password changed");
        Ok(())
    }

    async fn delete_account(&self, id: i32) -> AppResult<()> {
        let user = self.get_user(id).await?;

        if let Some(url) = &user.profile_image {
            discard_image(self.storage.as_ref(), url).await?;
        }

        self.uow.users().delete(id).await?;
        tracing::info!(user_id = id, "Account deleted");
        Ok(())
    }

    async fn upload_profile_image(
        &self,
        id: i32,
        data: Bytes,
        mime_type: String,
    ) -> AppResult<String> {
        let user = self.get_user(id).await?;

        let url = self
            .storage
            .upload(data, &mime_type, ImageDirectory::Profiles)
            .await?;
        self.uow
            .users()
            .set_profile_image(id, Some(url.clone()))
            .await?;

        if let Some(old) = &user.profile_image {
            if let Err(e) = discard_image(self.storage.as_ref(), old).await {
                tracing::warn!(user_id = id, error = %e, "Failed to delete previous profile image");
            }
        }

        tracing::info!(user_id = id, "Profile image updated");
        Ok(url)
    }

    async fn delete_profile_image(&self, id: i32) -> AppResult<()> {
        let user = self.get_user(id).await?;

        let url = user
            .profile_image
            .ok_or_else(|| AppError::validation("No profile image to delete"))?;

        discard_image(self.storage.as_ref(), &url).await?;
        self.uow.users().set_profile_image(id, None).await?;

        tracing::info!(user_id = id, "Profile image deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockUserRepository;
    use crate::infra::storage::MockObjectStorage;
    use crate::services::test_support::{sample_user, TestUnitOfWork};
    use mockall::predicate::eq;

    const OWN_URL: &str = "https://bucket.s3.eu-central-1.amazonaws.com/profiles/old.jpeg";

    fn user_with_password(id: i32, plain: &str) -> User {
        let mut user = sample_user(id);
        user.password_hash = Password::new(plain).unwrap().into_string();
        user
    }

    fn service(repo: MockUserRepository, storage: MockObjectStorage) -> UserManager<TestUnitOfWork> {
        UserManager::new(
            Arc::new(TestUnitOfWork::default().with_users(repo)),
            Arc::new(storage),
        )
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(7))
            .returning(|id| Ok(Some(sample_user(id))));

        let user = service(repo, MockObjectStorage::new())
            .get_user(7)
            .await
            .unwrap();
        assert_eq!(user.id, 7);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = service(repo, MockObjectStorage::new())
            .get_user(99)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_change_email_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(user_with_password(id, "password123"))));
        repo.expect_update_email().never();

        let err = service(repo, MockObjectStorage::new())
            .change_email(1, "new@example.com".to_string(), "nope-nope".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Authentication(AuthError::IncorrectPassword)
        ));
    }

    #[tokio::test]
    async fn test_change_email_taken_by_someone_else() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(user_with_password(id, "password123"))));
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(sample_user(2))));
        repo.expect_update_email().never();

        let err = service(repo, MockObjectStorage::new())
            .change_email(1, "taken@example.com".to_string(), "password123".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_change_email_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(user_with_password(id, "password123"))));
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_update_email()
            .withf(|id, email| *id == 1 && email == "new@example.com")
            .times(1)
            .returning(|id, email| {
                let mut user = sample_user(id);
                user.email = email;
                Ok(user)
            });

        let user = service(repo, MockObjectStorage::new())
            .change_email(1, "new@example.com".to_string(), "password123".to_string())
            .await
            .unwrap();
        assert_eq!(user.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_change_password_rejects_weak_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(user_with_password(id, "password123"))));
        repo.expect_update_password().never();

        let err = service(repo, MockObjectStorage::new())
            .change_password(1, "password123".to_string(), "alllowercase".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(user_with_password(id, "password123"))));
        repo.expect_update_password()
            .withf(|id, hash| {
                *id == 1 && Password::from_hash(hash.clone()).verify("N3wPassw0rd!")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        service(repo, MockObjectStorage::new())
            .change_password(1, "password123".to_string(), "N3wPassw0rd!".to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_profile_image_without_image() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));

        let err = service(repo, MockObjectStorage::new())
            .delete_profile_image(1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_upload_profile_image_replaces_old_one() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|id| {
            let mut user = sample_user(id);
            user.profile_image = Some(OWN_URL.to_string());
            Ok(Some(user))
        });
        repo.expect_set_profile_image()
            .withf(|id, url| *id == 1 && url.as_deref() == Some("https://new/url.jpeg"))
            .times(1)
            .returning(|id, url| {
                let mut user = sample_user(id);
                user.profile_image = url;
                Ok(user)
            });

        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .withf(|_, mime, dir| mime == "image/png" && *dir == ImageDirectory::Profiles)
            .times(1)
            .returning(|_, _, _| Ok("https://new/url.jpeg".to_string()));
        storage.expect_owns().returning(|url| url == OWN_URL);
        storage
            .expect_delete()
            .withf(|url| url == OWN_URL)
            .times(1)
            .returning(|_| Ok(()));

        let url = service(repo, storage)
            .upload_profile_image(1, Bytes::from_static(b"png"), "image/png".to_string())
            .await
            .unwrap();
        assert_eq!(url, "https://new/url.jpeg");
    }

    #[tokio::test]
    async fn test_delete_account_removes_stored_image() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|id| {
            let mut user = sample_user(id);
            user.profile_image = Some(OWN_URL.to_string());
            Ok(Some(user))
        });
        repo.expect_delete().with(eq(4)).times(1).returning(|_| Ok(()));

        let mut storage = MockObjectStorage::new();
        storage.expect_owns().returning(|_| true);
        storage.expect_delete().times(1).returning(|_| Ok(()));

        service(repo, storage).delete_account(4).await.unwrap();
    }
}
