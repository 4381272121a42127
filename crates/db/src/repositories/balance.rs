//! Point-in-time balance aggregates.
//!
//! Each sum applies exactly the filters of
//! [`BalanceAggregates::from_records`](vertice_core::balance::BalanceAggregates::from_records).
//! Instant bounds are exclusive end-of-day instants in the business time zone.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Select,
};
use tracing::warn;
use uuid::Uuid;

use vertice_core::balance::{
    BalanceAggregates, BalanceCutoffs, BalanceEngine, BalanceError, BalanceSnapshot,
};
use vertice_core::withdrawal::WithdrawalStatus as CoreWithdrawalStatus;

use crate::entities::{
    investments, result_ledger_entries,
    sea_orm_active_enums::{InvestmentStatus, WithdrawalStatus, WithdrawalType},
    withdrawal_requests,
};

/// Balance repository: aggregates plus the engine that interprets them.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
    engine: BalanceEngine,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, engine: BalanceEngine) -> Self {
        Self { db, engine }
    }

    /// Returns the engine used to derive snapshots.
    #[must_use]
    pub const fn engine(&self) -> BalanceEngine {
        self.engine
    }

    /// Raw sums for one owner.
    ///
    /// Runs on a pool or inside a transaction; withdrawal admission calls it
    /// after locking the owner row so the sums cannot change underneath.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn aggregates<C: ConnectionTrait>(
        conn: &C,
        owner: Uuid,
        cutoffs: &BalanceCutoffs,
    ) -> Result<BalanceAggregates, DbErr> {
        let approved_capital_cents = sum_cents(
            conn,
            recognized_investments(owner, cutoffs.recognized_before),
            investments::Column::AmountCents,
        )
        .await?;

        let liquid_capital_cents = sum_cents(
            conn,
            recognized_investments(owner, cutoffs.liquid_before),
            investments::Column::AmountCents,
        )
        .await?;

        let capital_reserved_cents = sum_cents(
            conn,
            reserving_withdrawals(owner, WithdrawalType::CapitalRedemption).filter(
                Condition::any()
                    .add(withdrawal_requests::Column::ScheduledFor.is_null())
                    .add(withdrawal_requests::Column::ScheduledFor.lte(cutoffs.reference_date)),
            ),
            withdrawal_requests::Column::AmountCents,
        )
        .await?;

        let result_ledger_cents = sum_cents(
            conn,
            result_ledger_entries::Entity::find()
                .filter(result_ledger_entries::Column::UserId.eq(owner))
                .filter(result_ledger_entries::Column::CreatedAt.lt(cutoffs.recognized_before)),
            result_ledger_entries::Column::AmountCents,
        )
        .await?;

        let result_reserved_cents = sum_cents(
            conn,
            reserving_withdrawals(owner, WithdrawalType::ResultSettlement)
                .filter(withdrawal_requests::Column::RequestedAt.lt(cutoffs.recognized_before)),
            withdrawal_requests::Column::AmountCents,
        )
        .await?;

        let pending_capital_cents = sum_cents(
            conn,
            pending_withdrawals(owner, WithdrawalType::CapitalRedemption),
            withdrawal_requests::Column::AmountCents,
        )
        .await?;

        let pending_result_cents = sum_cents(
            conn,
            pending_withdrawals(owner, WithdrawalType::ResultSettlement),
            withdrawal_requests::Column::AmountCents,
        )
        .await?;

        Ok(BalanceAggregates {
            approved_capital_cents,
            liquid_capital_cents,
            capital_reserved_cents,
            result_ledger_cents,
            result_reserved_cents,
            pending_capital_cents,
            pending_result_cents,
        })
    }

    /// Latest `scheduled_for` among the owner's reserving capital redemptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn latest_capital_schedule<C: ConnectionTrait>(
        conn: &C,
        owner: Uuid,
    ) -> Result<Option<NaiveDate>, DbErr> {
        let latest: Option<Option<NaiveDate>> =
            reserving_withdrawals(owner, WithdrawalType::CapitalRedemption)
                .select_only()
                .column_as(withdrawal_requests::Column::ScheduledFor.max(), "latest")
                .into_tuple()
                .one(conn)
                .await?;
        Ok(latest.flatten())
    }

    /// Snapshot for one owner on the given connection.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn snapshot_on<C: ConnectionTrait>(
        conn: &C,
        engine: &BalanceEngine,
        owner: Uuid,
        reference_date: NaiveDate,
    ) -> Result<BalanceSnapshot, DbErr> {
        let cutoffs = engine.cutoffs(reference_date);
        let agg = Self::aggregates(conn, owner, &cutoffs).await?;
        Ok(engine.snapshot(&cutoffs, &agg))
    }

    /// Computes the snapshot, surfacing store failures.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::StoreUnavailable` if the store cannot be read.
    pub async fn try_compute(
        &self,
        owner: Uuid,
        reference_date: NaiveDate,
    ) -> Result<BalanceSnapshot, BalanceError> {
        Self::snapshot_on(&self.db, &self.engine, owner, reference_date)
            .await
            .map_err(|e| BalanceError::StoreUnavailable(e.to_string()))
    }

    /// Computes the snapshot, failing closed to all-zero balances.
    pub async fn compute(&self, owner: Uuid, reference_date: NaiveDate) -> BalanceSnapshot {
        match self.try_compute(owner, reference_date).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    owner = %owner,
                    reference_date = %reference_date,
                    error = %e,
                    "balance unavailable, reporting zero"
                );
                self.engine.zero(reference_date)
            }
        }
    }
}

/// Investments recognized strictly before `bound`:
/// `paid_at < bound`, or `paid_at IS NULL AND created_at < bound`.
pub(crate) fn recognized_before(bound: DateTime<Utc>) -> Condition {
    Condition::any()
        .add(investments::Column::PaidAt.lt(bound))
        .add(
            Condition::all()
                .add(investments::Column::PaidAt.is_null())
                .add(investments::Column::CreatedAt.lt(bound)),
        )
}

fn recognized_investments(owner: Uuid, bound: DateTime<Utc>) -> Select<investments::Entity> {
    investments::Entity::find()
        .filter(investments::Column::UserId.eq(owner))
        .filter(investments::Column::Status.eq(InvestmentStatus::Approved))
        .filter(recognized_before(bound))
}

fn reserving_withdrawals(
    owner: Uuid,
    withdrawal_type: WithdrawalType,
) -> Select<withdrawal_requests::Entity> {
    withdrawal_requests::Entity::find()
        .filter(withdrawal_requests::Column::UserId.eq(owner))
        .filter(withdrawal_requests::Column::WithdrawalType.eq(withdrawal_type))
        .filter(
            withdrawal_requests::Column::Status.is_in(
                CoreWithdrawalStatus::RESERVING
                    .into_iter()
                    .map(WithdrawalStatus::from),
            ),
        )
}

fn pending_withdrawals(
    owner: Uuid,
    withdrawal_type: WithdrawalType,
) -> Select<withdrawal_requests::Entity> {
    withdrawal_requests::Entity::find()
        .filter(withdrawal_requests::Column::UserId.eq(owner))
        .filter(withdrawal_requests::Column::WithdrawalType.eq(withdrawal_type))
        .filter(withdrawal_requests::Column::Status.eq(WithdrawalStatus::Pending))
}

/// `SUM(column)` as BIGINT, zero when no rows match.
async fn sum_cents<E, C>(conn: &C, query: Select<E>, column: E::Column) -> Result<i64, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let total: Option<Option<i64>> = query
        .select_only()
        .column_as(
            Expr::col(column).sum().cast_as(Alias::new("BIGINT")),
            "total",
        )
        .into_tuple()
        .one(conn)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}
