//! Deposit registration and review against a real database.

mod common;

use chrono::Utc;
use vertice_core::investment::InvestmentError;
use vertice_db::repositories::CreateInvestmentInput;
use vertice_db::{BalanceRepository, InvestmentRepository};

use common::{create_user, engine, noon_days_ago, setup, today};

fn deposit(amount_cents: i64) -> CreateInvestmentInput {
    CreateInvestmentInput {
        amount_cents,
        external_ref: Some("E2E-123".to_string()),
    }
}

#[tokio::test]
async fn test_settlement_time_only_set_by_reviewer() {
    let Some(db) = setup().await else { return };
    let owner = create_user(&db, false).await;
    let admin = create_user(&db, true).await;
    let investments = InvestmentRepository::new(db.clone());
    let balances = BalanceRepository::new(db.clone(), engine());

    let created = investments.create(owner, deposit(100_000)).await.unwrap();
    assert!(created.paid_at.is_none());

    let settled = noon_days_ago(120);
    let approved = investments
        .approve(created.id, admin, Some(settled), None)
        .await
        .unwrap();
    assert_eq!(approved.paid_at.map(|t| t.with_timezone(&Utc)), Some(settled));
    assert_eq!(approved.external_ref.as_deref(), Some("E2E-123"));

    let snapshot = balances.try_compute(owner, today()).await.unwrap();
    assert_eq!(snapshot.liquid_capital_cents, 100_000);
}

#[tokio::test]
async fn test_unconfirmed_deposit_matures_from_creation() {
    let Some(db) = setup().await else { return };
    let owner = create_user(&db, false).await;
    let admin = create_user(&db, true).await;
    let investments = InvestmentRepository::new(db.clone());
    let balances = BalanceRepository::new(db.clone(), engine());

    let created = investments.create(owner, deposit(40_000)).await.unwrap();
    investments.approve(created.id, admin, None, None).await.unwrap();

    let snapshot = balances.try_compute(owner, today()).await.unwrap();
    assert_eq!(snapshot.approved_capital_cents, 40_000);
    assert_eq!(snapshot.liquid_capital_cents, 0);
}

#[tokio::test]
async fn test_reviewed_deposit_is_immutable() {
    let Some(db) = setup().await else { return };
    let owner = create_user(&db, false).await;
    let admin = create_user(&db, true).await;
    let investments = InvestmentRepository::new(db.clone());

    let created = investments.create(owner, deposit(10_000)).await.unwrap();
    let approved = investments.approve(created.id, admin, None, None).await.unwrap();

    let err = investments
        .approve(created.id, admin, Some(noon_days_ago(365)), None)
        .await
        .unwrap_err();
    assert!(matches!(err, InvestmentError::InvalidTransition { .. }));

    let err = investments.reject(created.id, admin).await.unwrap_err();
    assert!(matches!(err, InvestmentError::InvalidTransition { .. }));

    let stored = investments.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored.paid_at, approved.paid_at);
    assert_eq!(stored.reviewed_at, approved.reviewed_at);
}
