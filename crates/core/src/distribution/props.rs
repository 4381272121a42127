//! Property-based tests for distribution arithmetic.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::percent::apply_percent;
use super::processor::{DistributionProcessor, DistributionRequest, OwnerOutcome};
use crate::balance::{BalanceEngine, InvestmentRecord, ResultEntryRecord};
use crate::investment::InvestmentStatus;

/// Percentages with 4 decimals in (-100, 100).
fn arb_percent() -> impl Strategy<Value = Decimal> {
    (-999_999i64..=999_999).prop_map(|v| Decimal::new(v, 4))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Rounding is symmetric around zero.
    #[test]
    fn prop_apply_percent_is_odd(base in 0i64..1_000_000_000, p in arb_percent()) {
        prop_assert_eq!(apply_percent(base, -p), apply_percent(base, p).map(|r| -r));
    }

    /// The rounded result is within half a cent of the exact product.
    #[test]
    fn prop_apply_percent_within_half_cent(base in 0i64..1_000_000_000, p in arb_percent()) {
        let exact = Decimal::from(base) * p / Decimal::ONE_HUNDRED;
        let rounded = Decimal::from(apply_percent(base, p).unwrap());
        prop_assert!((rounded - exact).abs() <= dec!(0.5));
    }

    /// Two runs with the same percentage double the row total, and the
    /// per-run ledger entries sum to the same figure.
    #[test]
    fn prop_two_runs_accumulate(base in 1i64..1_000_000_000, p in arb_percent()) {
        let owner = Uuid::new_v4();
        let plan = DistributionProcessor::plan(
            DistributionRequest {
                reference_date: Some(today()),
                performance_percent: p,
                owner: None,
                note: None,
                run_id: None,
            },
            today(),
        ).unwrap();

        let outcome = DistributionProcessor::evaluate(owner, base, p).unwrap();
        if let OwnerOutcome::Apply { base_capital_cents, result_cents } = outcome {
            let mut ledger = Vec::new();
            let first = DistributionProcessor::merge(owner, None, &plan, base_capital_cents, result_cents).unwrap();
            ledger.push(result_cents);
            let second = DistributionProcessor::merge(
                owner,
                Some(first.result_cents),
                &plan,
                base_capital_cents,
                result_cents,
            ).unwrap();
            ledger.push(result_cents);

            prop_assert_eq!(second.result_cents, 2 * result_cents);
            prop_assert_eq!(ledger.iter().sum::<i64>(), second.result_cents);
        } else {
            prop_assert_eq!(apply_percent(base, p), Some(0));
        }
    }
}

#[test]
fn test_matured_deposit_earns_and_settles() {
    let engine = BalanceEngine::default();
    let paid = Utc.with_ymd_and_hms(2026, 2, 21, 15, 0, 0).unwrap(); // 100 days before
    let investments = [InvestmentRecord {
        amount_cents: 50_000,
        status: InvestmentStatus::Approved,
        paid_at: Some(paid),
        created_at: paid,
    }];

    let before = engine.compute_from_records(today(), &investments, &[], &[]);
    assert_eq!(before.available_capital_cents, 50_000);

    let outcome = DistributionProcessor::evaluate(
        Uuid::nil(),
        DistributionProcessor::base_capital(&before),
        dec!(2),
    )
    .unwrap();
    let OwnerOutcome::Apply { result_cents, .. } = outcome else {
        panic!("expected a credit");
    };
    assert_eq!(result_cents, 1_000);

    let entries = [ResultEntryRecord {
        amount_cents: result_cents,
        created_at: Utc.with_ymd_and_hms(2026, 6, 1, 15, 0, 0).unwrap(),
    }];
    let after = engine.compute_from_records(today(), &investments, &[], &entries);
    assert_eq!(after.available_result_cents, 1_000);
    assert_eq!(after.available_capital_cents, 50_000);
}
