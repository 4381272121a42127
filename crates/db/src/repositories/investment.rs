//! Investment repository: deposits and their admin review.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use vertice_core::investment::{InvestmentAction, InvestmentError, InvestmentService};
use vertice_core::notification::NotificationMessage;
use vertice_shared::types::{PageRequest, PageResponse};

use super::notification::{NotificationRepository, NotificationSink, deliver, deliver_to_admins};
use crate::entities::{investments, sea_orm_active_enums::InvestmentStatus, users};

/// Input for registering a deposit.
#[derive(Debug, Clone)]
pub struct CreateInvestmentInput {
    /// Amount in cents, already validated as positive.
    pub amount_cents: i64,
    /// Payment reference.
    pub external_ref: Option<String>,
}

/// Filter options for listing investments.
#[derive(Debug, Clone, Default)]
pub struct InvestmentFilter {
    /// Restrict to one owner.
    pub owner: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<InvestmentStatus>,
}

/// Investment repository.
#[derive(Debug, Clone)]
pub struct InvestmentRepository {
    db: DatabaseConnection,
    notifier: Arc<dyn NotificationSink>,
}

impl InvestmentRepository {
    /// Creates a repository that notifies through the notifications table.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let notifier = Arc::new(NotificationRepository::new(db.clone()));
        Self { db, notifier }
    }

    /// Creates a repository with a custom notification sink.
    #[must_use]
    pub fn with_notifier(db: DatabaseConnection, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { db, notifier }
    }

    /// Registers a PENDING deposit and notifies admins.
    ///
    /// The settlement time is left unset; only an admin supplies it on approval.
    ///
    /// # Errors
    ///
    /// Returns `InvestmentError::OwnerNotFound` for an unknown owner, or a
    /// validation error for a non-positive amount.
    pub async fn create(
        &self,
        owner: Uuid,
        input: CreateInvestmentInput,
    ) -> Result<investments::Model, InvestmentError> {
        if input.amount_cents <= 0 {
            return Err(InvestmentError::Validation {
                field: "amount",
                message: "amount must be greater than zero".to_string(),
            });
        }

        users::Entity::find_by_id(owner)
            .one(&self.db)
            .await
            .map_err(|e| InvestmentError::Database(e.to_string()))?
            .ok_or(InvestmentError::OwnerNotFound(owner))?;

        let now = Utc::now();
        let investment = investments::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(owner),
            amount_cents: Set(input.amount_cents),
            status: Set(InvestmentStatus::Pending),
            paid_at: Set(None),
            external_ref: Set(input
                .external_ref
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InvestmentError::Database(e.to_string()))?;

        info!(
            investment_id = %investment.id,
            owner = %owner,
            amount_cents = investment.amount_cents,
            "investment registered"
        );

        let message =
            NotificationMessage::investment_created(investment.id, owner, investment.amount_cents);
        deliver_to_admins(self.notifier.as_ref(), &message, Some(owner)).await;

        Ok(investment)
    }

    /// Finds an investment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<investments::Model>, InvestmentError> {
        investments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InvestmentError::Database(e.to_string()))
    }

    /// Lists investments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &InvestmentFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<investments::Model>, InvestmentError> {
        let mut query = investments::Entity::find();
        if let Some(owner) = filter.owner {
            query = query.filter(investments::Column::UserId.eq(owner));
        }
        if let Some(status) = filter.status {
            query = query.filter(investments::Column::Status.eq(status));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| InvestmentError::Database(e.to_string()))?;
        let data = query
            .order_by_desc(investments::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| InvestmentError::Database(e.to_string()))?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Approves a pending deposit.
    ///
    /// `paid_at` and `external_ref` overwrite the stored values only when given.
    ///
    /// # Errors
    ///
    /// Returns `InvestmentError::NotFound` or `InvestmentError::InvalidTransition`.
    pub async fn approve(
        &self,
        id: Uuid,
        approved_by: Uuid,
        paid_at: Option<DateTime<Utc>>,
        external_ref: Option<String>,
    ) -> Result<investments::Model, InvestmentError> {
        self.review(id, |status| {
            InvestmentService::approve(status, approved_by, paid_at, external_ref)
        })
        .await
    }

    /// Rejects a pending deposit.
    ///
    /// # Errors
    ///
    /// Returns `InvestmentError::NotFound` or `InvestmentError::InvalidTransition`.
    pub async fn reject(
        &self,
        id: Uuid,
        rejected_by: Uuid,
    ) -> Result<investments::Model, InvestmentError> {
        self.review(id, |status| InvestmentService::reject(status, rejected_by))
            .await
    }

    /// Locks the row, applies the decided action and notifies the owner.
    async fn review<F>(&self, id: Uuid, decide: F) -> Result<investments::Model, InvestmentError>
    where
        F: FnOnce(
            vertice_core::investment::InvestmentStatus,
        ) -> Result<InvestmentAction, InvestmentError>,
    {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InvestmentError::Database(e.to_string()))?;

        let investment = investments::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| InvestmentError::Database(e.to_string()))?
            .ok_or(InvestmentError::NotFound(id))?;

        let action = decide(investment.status.into())?;

        let now = Utc::now();
        let mut active: investments::ActiveModel = investment.into();
        active.status = Set(action.new_status().into());
        active.updated_at = Set(now.into());
        active.reviewed_at = Set(Some(now.into()));
        match action {
            InvestmentAction::Approve {
                approved_by,
                paid_at,
                external_ref,
                ..
            } => {
                active.reviewed_by = Set(Some(approved_by));
                if let Some(paid_at) = paid_at {
                    active.paid_at = Set(Some(paid_at.into()));
                }
                if let Some(external_ref) = external_ref {
                    active.external_ref = Set(Some(external_ref));
                }
            }
            InvestmentAction::Reject { rejected_by, .. } => {
                active.reviewed_by = Set(Some(rejected_by));
            }
        }

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| InvestmentError::Database(e.to_string()))?;
        txn.commit()
            .await
            .map_err(|e| InvestmentError::Database(e.to_string()))?;

        let approved = updated.status == InvestmentStatus::Approved;
        info!(
            investment_id = %updated.id,
            owner = %updated.user_id,
            status = ?updated.status,
            "investment reviewed"
        );

        let message =
            NotificationMessage::investment_reviewed(updated.id, updated.amount_cents, approved);
        deliver(self.notifier.as_ref(), updated.user_id, &message).await;

        Ok(updated)
    }
}
