//! Property-based tests for WithdrawalService.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use crate::balance::{BalanceEngine, InvestmentRecord, ResultEntryRecord, WithdrawalRecord};
use crate::investment::InvestmentStatus;
use crate::withdrawal::error::WithdrawalError;
use crate::withdrawal::service::WithdrawalService;
use crate::withdrawal::types::{WithdrawalInput, WithdrawalStatus, WithdrawalType};

fn arb_status() -> impl Strategy<Value = WithdrawalStatus> {
    prop_oneof![
        Just(WithdrawalStatus::Pending),
        Just(WithdrawalStatus::Approved),
        Just(WithdrawalStatus::Rejected),
        Just(WithdrawalStatus::Paid),
    ]
}

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

/// Admits a request against the in-memory ledger the way the store does:
/// snapshot at the request's reference date, check, then append as PENDING.
fn admit(
    engine: &BalanceEngine,
    investments: &[InvestmentRecord],
    withdrawals: &mut Vec<WithdrawalRecord>,
    entries: &[ResultEntryRecord],
    input: WithdrawalInput,
) -> Result<(), WithdrawalError> {
    let validated = WithdrawalService::validate(input, today())?;
    let snapshot = engine.compute_from_records(
        validated.reference_date,
        investments,
        withdrawals,
        entries,
    );
    WithdrawalService::check_funds(&validated, &snapshot)?;
    withdrawals.push(WithdrawalRecord {
        withdrawal_type: validated.withdrawal_type,
        status: WithdrawalStatus::Pending,
        amount_cents: validated.amount_cents,
        scheduled_for: validated.scheduled_for,
        requested_at: Utc.with_ymd_and_hms(2026, 6, 1, 15, 0, 0).unwrap(),
    });
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every transition method agrees with `is_valid_transition`.
    #[test]
    fn prop_transitions_match_table(status in arb_status(), admin in arb_uuid()) {
        prop_assert_eq!(
            WithdrawalService::approve(status, admin).is_ok(),
            WithdrawalService::is_valid_transition(status, WithdrawalStatus::Approved)
        );
        prop_assert_eq!(
            WithdrawalService::pay(status, admin, None, None).is_ok(),
            WithdrawalService::is_valid_transition(status, WithdrawalStatus::Paid)
        );
        prop_assert_eq!(
            WithdrawalService::reject(status, admin, "reason", None).is_ok(),
            WithdrawalService::is_valid_transition(status, WithdrawalStatus::Rejected)
        );
    }

    /// Terminal statuses accept no transition.
    #[test]
    fn prop_terminal_states_are_final(status in arb_status(), admin in arb_uuid()) {
        prop_assume!(status.is_terminal());
        prop_assert!(WithdrawalService::approve(status, admin).is_err());
        prop_assert!(WithdrawalService::pay(status, admin, None, None).is_err());
        prop_assert!(WithdrawalService::reject(status, admin, "reason", None).is_err());
    }

    /// Sequential admissions never reserve more result than the ledger holds.
    #[test]
    fn prop_admissions_never_overdraw(
        ledger_cents in 1i64..1_000_000,
        requests in prop::collection::vec(1i64..300_000, 1..10),
    ) {
        let engine = BalanceEngine::default();
        let entries = [ResultEntryRecord {
            amount_cents: ledger_cents,
            created_at: Utc.with_ymd_and_hms(2026, 5, 1, 15, 0, 0).unwrap(),
        }];
        let mut withdrawals = Vec::new();
        for amount_cents in requests {
            let _ = admit(&engine, &[], &mut withdrawals, &entries, WithdrawalInput {
                withdrawal_type: WithdrawalType::ResultSettlement,
                amount_cents,
                scheduled_for: None,
                pix_key: String::new(),
            });
        }
        let reserved: i64 = withdrawals.iter().map(|w| w.amount_cents).sum();
        prop_assert!(reserved <= ledger_cents);
    }
}

#[test]
fn test_result_settlement_exhausts_balance() {
    let engine = BalanceEngine::default();
    let entries = [ResultEntryRecord {
        amount_cents: 1_000,
        created_at: Utc.with_ymd_and_hms(2026, 5, 20, 15, 0, 0).unwrap(),
    }];
    let mut withdrawals = Vec::new();
    let request = || WithdrawalInput {
        withdrawal_type: WithdrawalType::ResultSettlement,
        amount_cents: 1_000,
        scheduled_for: None,
        pix_key: "key".to_string(),
    };

    admit(&engine, &[], &mut withdrawals, &entries, request()).unwrap();
    let after = engine.compute_from_records(today(), &[], &withdrawals, &entries);
    assert_eq!(after.available_result_cents, 0);

    let err = admit(&engine, &[], &mut withdrawals, &entries, request()).unwrap_err();
    assert!(matches!(
        err,
        WithdrawalError::InsufficientFunds { available_cents: 0, .. }
    ));
}

#[test]
fn test_capital_redemption_against_matured_deposit() {
    let engine = BalanceEngine::default();
    let paid = Utc.with_ymd_and_hms(2026, 1, 2, 15, 0, 0).unwrap();
    let investments = [InvestmentRecord {
        amount_cents: 50_000,
        status: InvestmentStatus::Approved,
        paid_at: Some(paid),
        created_at: paid,
    }];
    let mut withdrawals = Vec::new();
    let request = |amount_cents| WithdrawalInput {
        withdrawal_type: WithdrawalType::CapitalRedemption,
        amount_cents,
        scheduled_for: Some(today() - Duration::days(1)),
        pix_key: "key".to_string(),
    };

    assert!(matches!(
        admit(&engine, &investments, &mut withdrawals, &[], request(50_001)),
        Err(WithdrawalError::InsufficientFunds { available_cents: 50_000, .. })
    ));
    admit(&engine, &investments, &mut withdrawals, &[], request(50_000)).unwrap();
    assert!(admit(&engine, &investments, &mut withdrawals, &[], request(1)).is_err());
}
