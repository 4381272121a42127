//! User repository for the identity registry.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::users;

/// User repository.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// IDs of all admins.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_admin_ids(&self) -> Result<Vec<Uuid>, DbErr> {
        users::Entity::find()
            .filter(users::Column::IsAdmin.eq(true))
            .order_by_asc(users::Column::CreatedAt)
            .select_only()
            .column(users::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// Inserts a user or refreshes email and admin flag for an existing ID.
    ///
    /// The registry mirrors the identity provider, so the provider's ID is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert(
        &self,
        id: Uuid,
        username: &str,
        email: &str,
        is_admin: bool,
    ) -> Result<users::Model, DbErr> {
        let user = users::ActiveModel {
            id: Set(id),
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            is_admin: Set(is_admin),
            created_at: Set(Utc::now().into()),
        };

        users::Entity::insert(user)
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_columns([
                        users::Column::Username,
                        users::Column::Email,
                        users::Column::IsAdmin,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
    }
}
