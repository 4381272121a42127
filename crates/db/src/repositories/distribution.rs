//! Performance distribution repository.
//!
//! A run walks the owners with recognized approved capital one at a time.
//! Each owner is its own transaction: owner row lock, replay check, balance
//! snapshot, ledger append and (owner, date) upsert. A failing owner is
//! reported and the batch moves on.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use vertice_core::balance::BalanceEngine;
use vertice_core::distribution::{
    DistributionError, DistributionPlan, DistributionProcessor, DistributionRequest,
    DistributionSummary, OwnerOutcome,
};
use vertice_core::notification::NotificationMessage;
use vertice_shared::types::{PageRequest, PageResponse};

use super::balance::{BalanceRepository, recognized_before};
use super::notification::{NotificationRepository, NotificationSink, deliver};
use crate::entities::{
    daily_performance_distributions, investments, result_ledger_entries,
    sea_orm_active_enums::InvestmentStatus, users,
};

/// Filter options for listing distributions.
#[derive(Debug, Clone, Default)]
pub struct DistributionFilter {
    /// Restrict to one owner.
    pub owner: Option<Uuid>,
    /// Restrict to one business date.
    pub reference_date: Option<NaiveDate>,
}

/// An owner the run could not process.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerFailure {
    /// Owner ID.
    pub owner: Uuid,
    /// Error code.
    pub error: &'static str,
    /// Error message.
    pub message: String,
}

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionRunReport {
    /// The validated run.
    pub plan: DistributionPlan,
    /// Counters.
    pub summary: DistributionSummary,
    /// Rows written by this run.
    pub distributions: Vec<daily_performance_distributions::Model>,
    /// Owners that failed.
    pub failures: Vec<OwnerFailure>,
}

enum OwnerResult {
    Applied {
        distribution: daily_performance_distributions::Model,
        result_cents: i64,
    },
    Skipped,
    Replayed,
}

/// Distribution repository.
#[derive(Debug, Clone)]
pub struct DistributionRepository {
    db: DatabaseConnection,
    engine: BalanceEngine,
    notifier: Arc<dyn NotificationSink>,
}

impl DistributionRepository {
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

    /// Runs a distribution for every eligible owner (or the requested one).
    ///
    /// Replaying a run id skips owners it already covered, so a batch that
    /// failed midway can be retried wholesale.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad request or an unknown target
    /// owner, or a database error if owners cannot be listed. Per-owner
    /// failures are reported in [`DistributionRunReport::failures`].
    pub async fn run(
        &self,
        request: DistributionRequest,
        actor: Uuid,
    ) -> Result<DistributionRunReport, DistributionError> {
        let plan = DistributionProcessor::plan(request, self.engine.calendar().today())?;
        let owners = self.eligible_owners(&plan).await?;

        let mut summary = DistributionSummary::default();
        let mut distributions = Vec::new();
        let mut failures = Vec::new();

        for owner in owners {
            match self.apply_owner(&plan, owner, actor).await {
                Ok(OwnerResult::Applied {
                    distribution,
                    result_cents,
                }) => {
                    summary.record_applied(result_cents);
                    let message = NotificationMessage::performance_distributed(
                        plan.reference_date,
                        result_cents,
                        plan.performance_percent,
                    );
                    deliver(self.notifier.as_ref(), owner, &message).await;
                    distributions.push(distribution);
                }
                Ok(OwnerResult::Skipped) => summary.record_skipped(),
                Ok(OwnerResult::Replayed) => summary.record_replayed(),
                Err(e) => {
                    warn!(
                        owner = %owner,
                        run_id = %plan.run_id,
                        error = %e,
                        "distribution failed for owner"
                    );
                    failures.push(OwnerFailure {
                        owner,
                        error: e.error_code(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            run_id = %plan.run_id,
            reference_date = %plan.reference_date,
            performance_percent = %plan.performance_percent,
            owners_processed = summary.owners_processed,
            owners_skipped = summary.owners_skipped,
            owners_replayed = summary.owners_replayed,
            owners_failed = failures.len(),
            total_result_cents = summary.total_result_cents,
            "distribution run finished"
        );

        Ok(DistributionRunReport {
            plan,
            summary,
            distributions,
            failures,
        })
    }

    /// Lists distribution rows, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &DistributionFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<daily_performance_distributions::Model>, DistributionError> {
        let mut query = daily_performance_distributions::Entity::find();
        if let Some(owner) = filter.owner {
            query = query.filter(daily_performance_distributions::Column::UserId.eq(owner));
        }
        if let Some(date) = filter.reference_date {
            query = query.filter(daily_performance_distributions::Column::ReferenceDate.eq(date));
        }

        let total = query.clone().count(&self.db).await.map_err(db_error)?;
        let data = query
            .order_by_desc(daily_performance_distributions::Column::ReferenceDate)
            .order_by_asc(daily_performance_distributions::Column::UserId)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(PageResponse::new(data, page, total))
    }

    async fn eligible_owners(&self, plan: &DistributionPlan) -> Result<Vec<Uuid>, DistributionError> {
        if let Some(owner) = plan.owner {
            let exists = users::Entity::find_by_id(owner)
                .one(&self.db)
                .await
                .map_err(db_error)?
                .is_some();
            if !exists {
                return Err(DistributionError::Validation {
                    field: "user_id",
                    message: format!("user {owner} not found"),
                });
            }
            return Ok(vec![owner]);
        }

        let bound = self.engine.calendar().end_of_day_utc(plan.reference_date);
        investments::Entity::find()
            .filter(investments::Column::Status.eq(InvestmentStatus::Approved))
            .filter(recognized_before(bound))
            .select_only()
            .column(investments::Column::UserId)
            .distinct()
            .order_by_asc(investments::Column::UserId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    async fn apply_owner(
        &self,
        plan: &DistributionPlan,
        owner: Uuid,
        actor: Uuid,
    ) -> Result<OwnerResult, DistributionError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        // Serialises with withdrawal admission and concurrent runs.
        let locked = users::Entity::find_by_id(owner)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_error)?;
        if locked.is_none() {
            return Ok(OwnerResult::Skipped);
        }

        if already_applied(&txn, plan, owner).await.map_err(db_error)? {
            return Ok(OwnerResult::Replayed);
        }

        let snapshot =
            BalanceRepository::snapshot_on(&txn, &self.engine, owner, plan.reference_date)
                .await
                .map_err(db_error)?;
        let base_capital_cents = DistributionProcessor::base_capital(&snapshot);

        let result_cents = match DistributionProcessor::evaluate(
            owner,
            base_capital_cents,
            plan.performance_percent,
        )? {
            OwnerOutcome::Apply { result_cents, .. } => result_cents,
            OwnerOutcome::SkipNoBase | OwnerOutcome::SkipZeroResult => {
                return Ok(OwnerResult::Skipped);
            }
        };

        let now = Utc::now();
        let entry = result_ledger_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(owner),
            amount_cents: Set(result_cents),
            description: Set(DistributionProcessor::ledger_description(
                plan.reference_date,
            )),
            external_ref: Set(plan.ledger_tag.clone()),
            run_id: Set(Some(plan.run_id)),
            created_by: Set(Some(actor)),
            created_at: Set(now.into()),
        };
        if let Err(e) = entry.insert(&txn).await {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                return Ok(OwnerResult::Replayed);
            }
            return Err(db_error(e));
        }

        let existing = daily_performance_distributions::Entity::find()
            .filter(daily_performance_distributions::Column::UserId.eq(owner))
            .filter(daily_performance_distributions::Column::ReferenceDate.eq(plan.reference_date))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_error)?;

        let update = DistributionProcessor::merge(
            owner,
            existing.as_ref().map(|row| row.result_cents),
            plan,
            base_capital_cents,
            result_cents,
        )?;

        let distribution = match existing {
            Some(row) => {
                let mut active: daily_performance_distributions::ActiveModel = row.into();
                active.performance_percent = Set(update.performance_percent);
                active.base_capital_cents = Set(update.base_capital_cents);
                active.result_cents = Set(update.result_cents);
                active.note = Set(update.note);
                active.created_by = Set(Some(actor));
                active.updated_at = Set(now.into());
                active.update(&txn).await.map_err(db_error)?
            }
            None => daily_performance_distributions::ActiveModel {
                id: Set(Uuid::now_v7()),
                user_id: Set(owner),
                reference_date: Set(plan.reference_date),
                performance_percent: Set(update.performance_percent),
                base_capital_cents: Set(update.base_capital_cents),
                result_cents: Set(update.result_cents),
                note: Set(update.note),
                created_by: Set(Some(actor)),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(&txn)
            .await
            .map_err(db_error)?,
        };

        txn.commit().await.map_err(db_error)?;

        Ok(OwnerResult::Applied {
            distribution,
            result_cents,
        })
    }
}

async fn already_applied(
    txn: &DatabaseTransaction,
    plan: &DistributionPlan,
    owner: Uuid,
) -> Result<bool, DbErr> {
    let count = result_ledger_entries::Entity::find()
        .filter(result_ledger_entries::Column::UserId.eq(owner))
        .filter(result_ledger_entries::Column::ExternalRef.eq(plan.ledger_tag.as_str()))
        .filter(result_ledger_entries::Column::RunId.eq(plan.run_id))
        .count(txn)
        .await?;
    Ok(count > 0)
}

#[allow(clippy::needless_pass_by_value)]
fn db_error(e: DbErr) -> DistributionError {
    DistributionError::Database(e.to_string())
}
