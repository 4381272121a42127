//! Result ledger repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::info;
use uuid::Uuid;

use vertice_core::ledger::{LedgerError, LedgerService, ManualEntryInput};
use vertice_shared::types::{PageRequest, PageResponse};

use crate::entities::{result_ledger_entries, users};

/// Filter options for listing ledger entries.
#[derive(Debug, Clone, Default)]
pub struct ResultLedgerFilter {
    /// Restrict to one owner.
    pub owner: Option<Uuid>,
    /// Restrict to one external reference, e.g. `perf-2026-06-01`.
    pub external_ref: Option<String>,
}

/// Result ledger repository.
#[derive(Debug, Clone)]
pub struct ResultLedgerRepository {
    db: DatabaseConnection,
}

impl ResultLedgerRepository {
    /// Creates a new result ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an admin CREDIT or DEBIT entry.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or `LedgerError::OwnerNotFound` for an
    /// unknown owner.
    pub async fn create_manual(
        &self,
        owner: Uuid,
        input: ManualEntryInput,
        created_by: Uuid,
    ) -> Result<result_ledger_entries::Model, LedgerError> {
        let entry = LedgerService::manual_entry(input)?;

        users::Entity::find_by_id(owner)
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .ok_or(LedgerError::OwnerNotFound(owner))?;

        let created = result_ledger_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(owner),
            amount_cents: Set(entry.amount_cents),
            description: Set(entry.description),
            external_ref: Set(entry.external_ref),
            run_id: Set(None),
            created_by: Set(Some(created_by)),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?;

        info!(
            entry_id = %created.id,
            owner = %owner,
            amount_cents = created.amount_cents,
            created_by = %created_by,
            "manual result entry recorded"
        );

        Ok(created)
    }

    /// Lists entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ResultLedgerFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<result_ledger_entries::Model>, LedgerError> {
        let mut query = result_ledger_entries::Entity::find();
        if let Some(owner) = filter.owner {
            query = query.filter(result_ledger_entries::Column::UserId.eq(owner));
        }
        if let Some(external_ref) = &filter.external_ref {
            query = query.filter(result_ledger_entries::Column::ExternalRef.eq(external_ref.as_str()));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        let data = query
            .order_by_desc(result_ledger_entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(PageResponse::new(data, page, total))
    }
}
