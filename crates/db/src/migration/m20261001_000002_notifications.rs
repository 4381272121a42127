//! In-app notifications.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(NOTIFICATIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS notifications CASCADE; DROP TYPE IF EXISTS notification_category;",
        )
        .await?;
        Ok(())
    }
}

const NOTIFICATIONS_SQL: &str = r"
CREATE TYPE notification_category AS ENUM ('SYSTEM', 'INVESTMENT', 'WITHDRAWAL', 'PERFORMANCE');

CREATE TABLE notifications (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category notification_category NOT NULL DEFAULT 'SYSTEM',
    title VARCHAR(120) NOT NULL,
    message VARCHAR(255) NOT NULL DEFAULT '',
    payload JSONB NOT NULL DEFAULT '{}'::jsonb,
    is_read BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Inbox listing, unread first
CREATE INDEX idx_notifications_user_read ON notifications(user_id, is_read, created_at DESC);
";
