//! Balance aggregates and withdrawal lifecycle against a real database.

mod common;

use vertice_core::withdrawal::{WithdrawalError, WithdrawalInput, WithdrawalType};
use vertice_db::{BalanceRepository, WithdrawalRepository};

use common::{approved_investment, create_user, engine, noon_days_ago, setup, today};

fn capital_request(amount_cents: i64) -> WithdrawalInput {
    WithdrawalInput {
        withdrawal_type: WithdrawalType::CapitalRedemption,
        amount_cents,
        scheduled_for: Some(today()),
        pix_key: "client@example.com".to_string(),
    }
}

#[tokio::test]
async fn test_maturity_window_boundary() {
    let Some(db) = setup().await else { return };
    let balances = BalanceRepository::new(db.clone(), engine());

    let mature = create_user(&db, false).await;
    approved_investment(&db, mature, 100_000, noon_days_ago(91)).await;
    let snapshot = balances.try_compute(mature, today()).await.unwrap();
    assert_eq!(snapshot.liquid_capital_cents, 100_000);
    assert_eq!(snapshot.available_capital_cents, 100_000);

    let young = create_user(&db, false).await;
    approved_investment(&db, young, 100_000, noon_days_ago(89)).await;
    let snapshot = balances.try_compute(young, today()).await.unwrap();
    assert_eq!(snapshot.approved_capital_cents, 100_000);
    assert_eq!(snapshot.liquid_capital_cents, 0);
    assert_eq!(snapshot.available_capital_cents, 0);
}

#[tokio::test]
async fn test_exact_amount_admitted_one_cent_more_refused() {
    let Some(db) = setup().await else { return };
    let owner = create_user(&db, false).await;
    approved_investment(&db, owner, 50_000, noon_days_ago(100)).await;
    let withdrawals = WithdrawalRepository::new(db.clone(), engine());

    let err = withdrawals
        .create(owner, capital_request(50_001))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WithdrawalError::InsufficientFunds {
            available_cents: 50_000,
            ..
        }
    ));

    withdrawals
        .create(owner, capital_request(50_000))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reservation_lifecycle() {
    let Some(db) = setup().await else { return };
    let owner = create_user(&db, false).await;
    let admin = create_user(&db, true).await;
    approved_investment(&db, owner, 50_000, noon_days_ago(100)).await;

    let balances = BalanceRepository::new(db.clone(), engine());
    let withdrawals = WithdrawalRepository::new(db.clone(), engine());

    let before = balances.try_compute(owner, today()).await.unwrap();
    assert_eq!(before.available_capital_cents, 50_000);

    // PENDING reserves.
    let request = withdrawals
        .create(owner, capital_request(20_000))
        .await
        .unwrap();
    let pending = balances.try_compute(owner, today()).await.unwrap();
    assert_eq!(pending.available_capital_cents, 30_000);
    assert_eq!(pending.pending_capital_cents, 20_000);

    // APPROVED and PAID keep the reservation.
    withdrawals.approve(request.id, admin).await.unwrap();
    let approved = balances.try_compute(owner, today()).await.unwrap();
    assert_eq!(approved.available_capital_cents, 30_000);
    assert_eq!(approved.pending_capital_cents, 0);

    let paid = withdrawals
        .pay(request.id, admin, Some("E2E-1".to_string()), None)
        .await
        .unwrap();
    assert_eq!(paid.external_ref.as_deref(), Some("E2E-1"));
    let after_pay = balances.try_compute(owner, today()).await.unwrap();
    assert_eq!(after_pay.available_capital_cents, 30_000);

    // PAID is terminal.
    let err = withdrawals
        .reject(request.id, admin, "too late", None)
        .await
        .unwrap_err();
    assert!(matches!(err, WithdrawalError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_reject_restores_availability() {
    let Some(db) = setup().await else { return };
    let owner = create_user(&db, false).await;
    let admin = create_user(&db, true).await;
    approved_investment(&db, owner, 50_000, noon_days_ago(100)).await;

    let balances = BalanceRepository::new(db.clone(), engine());
    let withdrawals = WithdrawalRepository::new(db.clone(), engine());

    let request = withdrawals
        .create(owner, capital_request(50_000))
        .await
        .unwrap();
    assert_eq!(
        balances
            .try_compute(owner, today())
            .await
            .unwrap()
            .available_capital_cents,
        0
    );

    let rejected = withdrawals
        .reject(request.id, admin, "wrong key", Some("asked client".to_string()))
        .await
        .unwrap();
    assert_eq!(rejected.rejection_reason.as_deref(), Some("wrong key"));
    assert_eq!(rejected.processed_by, Some(admin));

    assert_eq!(
        balances
            .try_compute(owner, today())
            .await
            .unwrap()
            .available_capital_cents,
        50_000
    );

    let views = withdrawals.list_for_owner(owner).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].available_capital_cents, 50_000);
}

#[tokio::test]
async fn test_unknown_owner_is_refused() {
    let Some(db) = setup().await else { return };
    let withdrawals = WithdrawalRepository::new(db.clone(), engine());
    let err = withdrawals
        .create(uuid::Uuid::now_v7(), capital_request(100))
        .await
        .unwrap_err();
    assert!(matches!(err, WithdrawalError::OwnerNotFound(_)));
}

#[tokio::test]
async fn test_backdated_redemption_cannot_reuse_reserved_capital() {
    let Some(db) = setup().await else { return };
    let owner = create_user(&db, false).await;
    approved_investment(&db, owner, 100_000, noon_days_ago(120)).await;
    let withdrawals = WithdrawalRepository::new(db.clone(), engine());

    withdrawals
        .create(owner, capital_request(100_000))
        .await
        .unwrap();

    let yesterday = today() - chrono::Duration::days(1);
    let err = withdrawals
        .create(
            owner,
            WithdrawalInput {
                scheduled_for: Some(yesterday),
                ..capital_request(100_000)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WithdrawalError::InsufficientFunds {
            available_cents: 0,
            ..
        }
    ));
}
