//! Withdrawal repository: admission and admin transitions.
//!
//! Admission locks the owner's `users` row, reads the reservation sums and
//! inserts the PENDING request in one transaction, so two concurrent requests
//! cannot both be admitted against the same remaining balance. A capital
//! redemption must fit both at its own date and at the latest date already
//! reserved. Transitions
//! lock the request row. Notifications go out after commit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use vertice_core::balance::{BalanceEngine, BalanceSnapshot};
use vertice_core::notification::NotificationMessage;
use vertice_core::withdrawal::{
    WithdrawalAction, WithdrawalError, WithdrawalInput, WithdrawalService,
};
use vertice_shared::types::{PageRequest, PageResponse};

use super::balance::BalanceRepository;
use super::notification::{NotificationRepository, NotificationSink, deliver, deliver_to_admins};
use crate::entities::{
    sea_orm_active_enums::{WithdrawalStatus, WithdrawalType},
    users, withdrawal_requests,
};

/// Filter options for the admin listing.
#[derive(Debug, Clone, Default)]
pub struct WithdrawalFilter {
    /// Restrict to one status.
    pub status: Option<WithdrawalStatus>,
    /// Restrict to one type.
    pub withdrawal_type: Option<WithdrawalType>,
    /// Restrict to one owner.
    pub owner: Option<Uuid>,
}

/// A stored request with the owner's availability at the request's own
/// reference date (`scheduled_for`, else today).
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalView {
    /// The stored request.
    pub request: withdrawal_requests::Model,
    /// Date the availability figures refer to.
    pub reference_date: NaiveDate,
    /// Available capital at that date.
    pub available_capital_cents: i64,
    /// Available result at that date.
    pub available_result_cents: i64,
}

/// Withdrawal repository.
#[derive(Debug, Clone)]
pub struct WithdrawalRepository {
    db: DatabaseConnection,
    engine: BalanceEngine,
    notifier: Arc<dyn NotificationSink>,
}

impl WithdrawalRepository {
    /// Creates a repository that notifies through the notifications table.
    #[must_use]
    pub fn new(db: DatabaseConnection, engine: BalanceEngine) -> Self {
        let notifier = Arc::new(NotificationRepository::new(db.clone()));
        Self {
            db,
            engine,
            notifier,
        }
    }

    /// Creates a repository with a custom notification sink.
    #[must_use]
    pub fn with_notifier(
        db: DatabaseConnection,
        engine: BalanceEngine,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            db,
            engine,
            notifier,
        }
    }

    /// Admits a new request.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `WithdrawalError::OwnerNotFound`, or
    /// `WithdrawalError::InsufficientFunds` carrying the available amount.
    pub async fn create(
        &self,
        owner: Uuid,
        input: WithdrawalInput,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        let today = self.engine.calendar().today();
        let request = WithdrawalService::validate(input, today)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        // Serialises admissions per owner.
        users::Entity::find_by_id(owner)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?
            .ok_or(WithdrawalError::OwnerNotFound(owner))?;

        let snapshot =
            BalanceRepository::snapshot_on(&txn, &self.engine, owner, request.reference_date)
                .await
                .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        // A backdated redemption must also fit under reservations dated after it.
        let latest_reserved = BalanceRepository::latest_capital_schedule(&txn, owner)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;
        let horizon = match WithdrawalService::admission_horizon(&request, latest_reserved) {
            Some(date) => Some(
                BalanceRepository::snapshot_on(&txn, &self.engine, owner, date)
                    .await
                    .map_err(|e| WithdrawalError::Database(e.to_string()))?,
            ),
            None => None,
        };

        if let Err(e) = WithdrawalService::check_funds_through(&request, &snapshot, horizon.as_ref())
        {
            info!(
                owner = %owner,
                withdrawal_type = %request.withdrawal_type,
                amount_cents = request.amount_cents,
                error = %e,
                "withdrawal refused"
            );
            return Err(e);
        }

        let now = Utc::now();
        let created = withdrawal_requests::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(owner),
            withdrawal_type: Set(request.withdrawal_type.into()),
            amount_cents: Set(request.amount_cents),
            pix_key: Set(request.pix_key),
            scheduled_for: Set(request.scheduled_for),
            status: Set(WithdrawalStatus::Pending),
            rejection_reason: Set(None),
            admin_note: Set(None),
            external_ref: Set(None),
            requested_at: Set(now.into()),
            approved_at: Set(None),
            paid_at: Set(None),
            processed_by: Set(None),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        info!(
            withdrawal_id = %created.id,
            owner = %owner,
            withdrawal_type = %request.withdrawal_type,
            amount_cents = created.amount_cents,
            "withdrawal requested"
        );

        let message = NotificationMessage::withdrawal_requested(
            created.id,
            owner,
            request.withdrawal_type,
            created.amount_cents,
        );
        deliver_to_admins(self.notifier.as_ref(), &message, Some(owner)).await;

        Ok(created)
    }

    /// Finds a request by ID.
    ///
    /// # Errors
    ///
    /// Returns `WithdrawalError::NotFound` if it does not exist.
    pub async fn find(&self, id: Uuid) -> Result<withdrawal_requests::Model, WithdrawalError> {
        withdrawal_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?
            .ok_or(WithdrawalError::NotFound(id))
    }

    /// Lists an owner's requests, newest first, with availability at each
    /// request's reference date.
    ///
    /// Balances fail closed to zero if the store cannot be read.
    ///
    /// # Errors
    ///
    /// Returns an error if the request listing fails.
    pub async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<WithdrawalView>, WithdrawalError> {
        let requests = withdrawal_requests::Entity::find()
            .filter(withdrawal_requests::Column::UserId.eq(owner))
            .order_by_desc(withdrawal_requests::Column::RequestedAt)
            .all(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        let balances = BalanceRepository::new(self.db.clone(), self.engine);
        let today = self.engine.calendar().today();
        let mut by_date: HashMap<NaiveDate, BalanceSnapshot> = HashMap::new();
        let mut views = Vec::with_capacity(requests.len());

        for request in requests {
            let reference_date = WithdrawalService::view_reference_date(request.scheduled_for, today);
            let snapshot = match by_date.get(&reference_date) {
                Some(snapshot) => *snapshot,
                None => {
                    let snapshot = balances.compute(owner, reference_date).await;
                    by_date.insert(reference_date, snapshot);
                    snapshot
                }
            };
            views.push(WithdrawalView {
                request,
                reference_date,
                available_capital_cents: snapshot.available_capital_cents,
                available_result_cents: snapshot.available_result_cents,
            });
        }

        Ok(views)
    }

    /// Lists requests for admins, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &WithdrawalFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<withdrawal_requests::Model>, WithdrawalError> {
        let mut query = withdrawal_requests::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(withdrawal_requests::Column::Status.eq(status));
        }
        if let Some(withdrawal_type) = filter.withdrawal_type {
            query = query.filter(withdrawal_requests::Column::WithdrawalType.eq(withdrawal_type));
        }
        if let Some(owner) = filter.owner {
            query = query.filter(withdrawal_requests::Column::UserId.eq(owner));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;
        let data = query
            .order_by_desc(withdrawal_requests::Column::RequestedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Approves a pending request.
    ///
    /// # Errors
    ///
    /// Returns `WithdrawalError::NotFound` or `WithdrawalError::InvalidTransition`.
    pub async fn approve(
        &self,
        id: Uuid,
        approved_by: Uuid,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        self.transition(id, |status| WithdrawalService::approve(status, approved_by))
            .await
    }

    /// Rejects a pending or approved request, releasing its reservation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank reason, `WithdrawalError::NotFound`
    /// or `WithdrawalError::InvalidTransition`.
    pub async fn reject(
        &self,
        id: Uuid,
        rejected_by: Uuid,
        rejection_reason: &str,
        admin_note: Option<String>,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        self.transition(id, |status| {
            WithdrawalService::reject(status, rejected_by, rejection_reason, admin_note)
        })
        .await
    }

    /// Marks an approved request as paid.
    ///
    /// # Errors
    ///
    /// Returns `WithdrawalError::NotFound` or `WithdrawalError::InvalidTransition`.
    pub async fn pay(
        &self,
        id: Uuid,
        paid_by: Uuid,
        external_ref: Option<String>,
        admin_note: Option<String>,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        self.transition(id, |status| {
            WithdrawalService::pay(status, paid_by, external_ref, admin_note)
        })
        .await
    }

    /// Read-modify-write under `SELECT ... FOR UPDATE`, then notify the owner.
    async fn transition<F>(
        &self,
        id: Uuid,
        decide: F,
    ) -> Result<withdrawal_requests::Model, WithdrawalError>
    where
        F: FnOnce(
            vertice_core::withdrawal::WithdrawalStatus,
        ) -> Result<WithdrawalAction, WithdrawalError>,
    {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        let request = withdrawal_requests::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?
            .ok_or(WithdrawalError::NotFound(id))?;

        let action = decide(request.status.into())?;
        let active = apply_action(request.into(), &action);

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;
        txn.commit()
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        info!(
            withdrawal_id = %updated.id,
            owner = %updated.user_id,
            status = %action.new_status(),
            actor = %action.actor(),
            "withdrawal transitioned"
        );

        let message = match &action {
            WithdrawalAction::Approve { .. } => {
                NotificationMessage::withdrawal_approved(updated.id, updated.amount_cents)
            }
            WithdrawalAction::Reject {
                rejection_reason, ..
            } => NotificationMessage::withdrawal_rejected(
                updated.id,
                updated.amount_cents,
                rejection_reason,
            ),
            WithdrawalAction::Pay { .. } => NotificationMessage::withdrawal_paid(
                updated.id,
                updated.amount_cents,
                updated.external_ref.as_deref(),
            ),
        };
        deliver(self.notifier.as_ref(), updated.user_id, &message).await;

        Ok(updated)
    }
}

/// Copies the audit data of an action onto the row.
fn apply_action(
    mut active: withdrawal_requests::ActiveModel,
    action: &WithdrawalAction,
) -> withdrawal_requests::ActiveModel {
    active.status = Set(action.new_status().into());
    active.processed_by = Set(Some(action.actor()));
    active.updated_at = Set(Utc::now().into());

    match action {
        WithdrawalAction::Approve { approved_at, .. } => {
            active.approved_at = Set(Some((*approved_at).into()));
            active.rejection_reason = Set(None);
        }
        WithdrawalAction::Reject {
            rejection_reason,
            admin_note,
            ..
        } => {
            active.rejection_reason = Set(Some(rejection_reason.clone()));
            if let Some(note) = admin_note {
                active.admin_note = Set(Some(note.clone()));
            }
        }
        WithdrawalAction::Pay {
            paid_at,
            external_ref,
            admin_note,
            ..
        } => {
            active.paid_at = Set(Some((*paid_at).into()));
            if let Some(external_ref) = external_ref {
                active.external_ref = Set(Some(external_ref.clone()));
            }
            if let Some(note) = admin_note {
                active.admin_note = Set(Some(note.clone()));
            }
        }
    }

    active
}
