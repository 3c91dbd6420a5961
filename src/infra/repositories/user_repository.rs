//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, ProfileChanges, User};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(test)]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find every user whose ID is in `ids`
    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Apply profile changes
    async fn update_profile(&self, id: i32, changes: ProfileChanges) -> AppResult<User>;

    async fn update_email(&self, id: i32, email: String) -> AppResult<User>;

    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<()>;

    /// Replace or clear the profile image URL
    async fn set_profile_image(&self, id: i32, url: Option<String>) -> AppResult<User>;

    /// Store the last login time in epoch milliseconds
    async fn record_login(&self, id: i32, at_millis: i64) -> AppResult<User>;

    /// Delete user; tools, reviews and favorites cascade
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn active_model(&self, id: i32) -> AppResult<ActiveModel> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User not found")?;
        Ok(model.into())
    }

    async fn save(&self, mut active: ActiveModel) -> AppResult<User> {
        active.updated_at = Set(chrono::Utc::now());
        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            profile_image: Set(new_user.profile_image),
            role: Set(new_user.role.to_string()),
            phone_number: Set(new_user.phone_number),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(User::from(model))
    }

    async fn update_profile(&self, id: i32, changes: ProfileChanges) -> AppResult<User> {
        let mut active = self.active_model(id).await?;

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(phone_number) = changes.phone_number {
            active.phone_number = Set(phone_number);
        }

        self.save(active).await
    }

    async fn update_email(&self, id: i32, email: String) -> AppResult<User> {
        let mut active = self.active_model(id).await?;
        active.email = Set(email);
        self.save(active).await
    }

    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<()> {
        let mut active = self.active_model(id).await?;
        active.password_hash = Set(password_hash);
        self.save(active).await?;
        Ok(())
    }

    async fn set_profile_image(&self, id: i32, url: Option<String>) -> AppResult<User> {
        let mut active = self.active_model(id).await?;
        active.profile_image = Set(url);
        self.save(active).await
    }

    async fn record_login(&self, id: i32, at_millis: i64) -> AppResult<User> {
        let mut active = self.active_model(id).await?;
        active.last_login = Set(Some(at_millis));
        self.save(active).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User not found"));
        }

        Ok(())
    }
}
