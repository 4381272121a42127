//! Notification repository and the in-app notification sink.

use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::warn;
use uuid::Uuid;

use vertice_core::notification::NotificationMessage;
use vertice_shared::types::{PageRequest, PageResponse};

use crate::entities::{notifications, users};

/// Error types for notification operations.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Notification not found for this recipient.
    #[error("Notification {0} not found")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Destination for user-facing notifications.
///
/// Delivery is best-effort: callers go through [`deliver`] and
/// [`deliver_to_admins`], which log failures instead of propagating them.
#[async_trait]
pub trait NotificationSink: Send + Sync + fmt::Debug {
    /// Sends a message to one user.
    async fn notify(&self, recipient: Uuid, message: &NotificationMessage) -> Result<(), DbErr>;

    /// Sends a message to every admin except `exclude`; returns how many were addressed.
    async fn notify_admins(
        &self,
        message: &NotificationMessage,
        exclude: Option<Uuid>,
    ) -> Result<u64, DbErr>;
}

/// Sends to one user, logging failures at WARN.
pub async fn deliver(sink: &dyn NotificationSink, recipient: Uuid, message: &NotificationMessage) {
    if let Err(e) = sink.notify(recipient, message).await {
        warn!(
            recipient = %recipient,
            category = %message.category,
            error = %e,
            "failed to deliver notification"
        );
    }
}

/// Sends to admins, logging failures at WARN.
pub async fn deliver_to_admins(
    sink: &dyn NotificationSink,
    message: &NotificationMessage,
    exclude: Option<Uuid>,
) {
    if let Err(e) = sink.notify_admins(message, exclude).await {
        warn!(
            category = %message.category,
            error = %e,
            "failed to deliver admin notification"
        );
    }
}

/// Notification repository; also the default [`NotificationSink`].
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn active_model(recipient: Uuid, message: &NotificationMessage) -> notifications::ActiveModel {
        notifications::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(recipient),
            category: Set(message.category.into()),
            title: Set(message.title.clone()),
            message: Set(message.message.clone()),
            payload: Set(message.payload.clone()),
            is_read: Set(false),
            created_at: Set(Utc::now().into()),
        }
    }

    /// Lists a user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: &PageRequest,
    ) -> Result<PageResponse<notifications::Model>, DbErr> {
        let mut query =
            notifications::Entity::find().filter(notifications::Column::UserId.eq(user_id));
        if unread_only {
            query = query.filter(notifications::Column::IsRead.eq(false));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(notifications::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Counts a user's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn unread_count(&self, user_id: Uuid) -> Result<u64, DbErr> {
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .count(&self.db)
            .await
    }

    /// Marks one of the user's notifications as read.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::NotFound` if the notification does not
    /// exist or belongs to someone else.
    pub async fn mark_read(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> Result<notifications::Model, NotificationError> {
        let notification = notifications::Entity::find_by_id(notification_id)
            .filter(notifications::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(NotificationError::NotFound(notification_id))?;

        if notification.is_read {
            return Ok(notification);
        }

        let mut active: notifications::ActiveModel = notification.into();
        active.is_read = Set(true);
        Ok(active.update(&self.db).await?)
    }
}

#[async_trait]
impl NotificationSink for NotificationRepository {
    async fn notify(&self, recipient: Uuid, message: &NotificationMessage) -> Result<(), DbErr> {
        Self::active_model(recipient, message).insert(&self.db).await?;
        Ok(())
    }

    async fn notify_admins(
        &self,
        message: &NotificationMessage,
        exclude: Option<Uuid>,
    ) -> Result<u64, DbErr> {
        let mut query = users::Entity::find()
            .filter(users::Column::IsAdmin.eq(true))
            .select_only()
            .column(users::Column::Id);
        if let Some(excluded) = exclude {
            query = query.filter(users::Column::Id.ne(excluded));
        }
        let admin_ids: Vec<Uuid> = query.into_tuple().all(&self.db).await?;

        if admin_ids.is_empty() {
            return Ok(0);
        }

        let count = admin_ids.len() as u64;
        notifications::Entity::insert_many(
            admin_ids
                .into_iter()
                .map(|admin| Self::active_model(admin, message)),
        )
        .exec(&self.db)
        .await?;

        Ok(count)
    }
}
