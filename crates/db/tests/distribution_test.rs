//! Distribution runs against a real database.

mod common;

use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use uuid::Uuid;

use vertice_core::distribution::DistributionRequest;
use vertice_core::withdrawal::{WithdrawalError, WithdrawalInput, WithdrawalType};
use vertice_db::entities::daily_performance_distributions;
use vertice_db::repositories::{DistributionFilter, ResultLedgerFilter};
use vertice_db::{BalanceRepository, DistributionRepository, ResultLedgerRepository, WithdrawalRepository};
use vertice_shared::types::PageRequest;

use common::{approved_investment, create_user, engine, noon_days_ago, setup, today};

fn request(owner: Uuid, run_id: Option<Uuid>) -> DistributionRequest {
    DistributionRequest {
        reference_date: None,
        performance_percent: dec!(2.0000),
        owner: Some(owner),
        note: Some("daily close".to_string()),
        run_id,
    }
}

#[tokio::test]
async fn test_distribution_credits_result_and_allows_settlement() {
    let Some(db) = setup().await else { return };
    let owner = create_user(&db, false).await;
    let admin = create_user(&db, true).await;
    approved_investment(&db, owner, 50_000, noon_days_ago(100)).await;

    let report = DistributionRepository::new(db.clone(), engine())
        .run(request(owner, None), admin)
        .await
        .unwrap();
    assert_eq!(report.summary.owners_processed, 1);
    assert_eq!(report.summary.total_result_cents, 1_000);
    assert_eq!(report.distributions[0].base_capital_cents, 50_000);

    let balances = BalanceRepository::new(db.clone(), engine());
    let snapshot = balances.try_compute(owner, today()).await.unwrap();
    assert_eq!(snapshot.available_capital_cents, 50_000);
    assert_eq!(snapshot.available_result_cents, 1_000);

    let withdrawals = WithdrawalRepository::new(db.clone(), engine());
    let settle = || WithdrawalInput {
        withdrawal_type: WithdrawalType::ResultSettlement,
        amount_cents: 1_000,
        scheduled_for: None,
        pix_key: String::new(),
    };
    withdrawals.create(owner, settle()).await.unwrap();
    assert_eq!(
        balances
            .try_compute(owner, today())
            .await
            .unwrap()
            .available_result_cents,
        0
    );
    let err = withdrawals.create(owner, settle()).await.unwrap_err();
    assert!(matches!(
        err,
        WithdrawalError::InsufficientFunds {
            available_cents: 0,
            ..
        }
    ));
}

#[tokio::test]
async fn test_two_runs_accumulate() {
    let Some(db) = setup().await else { return };
    let owner = create_user(&db, false).await;
    let admin = create_user(&db, true).await;
    approved_investment(&db, owner, 50_000, noon_days_ago(100)).await;
    let distributions = DistributionRepository::new(db.clone(), engine());

    distributions.run(request(owner, None), admin).await.unwrap();
    let second = distributions.run(request(owner, None), admin).await.unwrap();
    assert_eq!(second.distributions[0].result_cents, 2_000);

    let rows = distributions
        .list(
            &DistributionFilter {
                owner: Some(owner),
                reference_date: Some(today()),
            },
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(rows.meta.total, 1);
    assert_eq!(rows.data[0].result_cents, 2_000);

    let tag = format!("perf-{}", today().format("%Y-%m-%d"));
    let entries = ResultLedgerRepository::new(db.clone())
        .list(
            &ResultLedgerFilter {
                owner: Some(owner),
                external_ref: Some(tag),
            },
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(entries.meta.total, 2);
    let total: i64 = entries.data.iter().map(|e| e.amount_cents).sum();
    assert_eq!(total, 2_000);
}

#[tokio::test]
async fn test_replayed_run_is_skipped() {
    let Some(db) = setup().await else { return };
    let owner = create_user(&db, false).await;
    let admin = create_user(&db, true).await;
    approved_investment(&db, owner, 50_000, noon_days_ago(100)).await;
    let distributions = DistributionRepository::new(db.clone(), engine());

    let run_id = Uuid::now_v7();
    let first = distributions
        .run(request(owner, Some(run_id)), admin)
        .await
        .unwrap();
    let replay = distributions
        .run(request(owner, Some(run_id)), admin)
        .await
        .unwrap();
    assert_eq!(replay.summary.owners_processed, 0);
    assert_eq!(replay.summary.owners_replayed, 1);

    let row = daily_performance_distributions::Entity::find_by_id(first.distributions[0].id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.result_cents, 1_000);
}

#[tokio::test]
async fn test_owner_without_capital_is_skipped() {
    let Some(db) = setup().await else { return };
    let owner = create_user(&db, false).await;
    let admin = create_user(&db, true).await;

    let report = DistributionRepository::new(db.clone(), engine())
        .run(request(owner, None), admin)
        .await
        .unwrap();
    assert_eq!(report.summary.owners_skipped, 1);
    assert!(report.distributions.is_empty());
}
