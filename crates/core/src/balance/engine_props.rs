//! Property-based tests for BalanceEngine.
//!
//! - Available figures are never negative
//! - A reserving capital request moves available capital by its amount
//! - Rejection restores the prior figure; approve and pay keep it unchanged
//! - Timestamp cutoffs agree with business-date comparison

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use super::calendar::BusinessCalendar;
use super::engine::BalanceEngine;
use super::records::{InvestmentRecord, ResultEntryRecord, WithdrawalRecord};
use crate::investment::InvestmentStatus;
use crate::withdrawal::{WithdrawalStatus, WithdrawalType};

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    // Roughly 2025-01-01 .. 2027-01-01
    (1_735_689_600i64..1_798_761_600i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn arb_investment_status() -> impl Strategy<Value = InvestmentStatus> {
    prop_oneof![
        Just(InvestmentStatus::Pending),
        Just(InvestmentStatus::Approved),
        Just(InvestmentStatus::Rejected),
    ]
}

fn arb_withdrawal_status() -> impl Strategy<Value = WithdrawalStatus> {
    prop_oneof![
        Just(WithdrawalStatus::Pending),
        Just(WithdrawalStatus::Approved),
        Just(WithdrawalStatus::Rejected),
        Just(WithdrawalStatus::Paid),
    ]
}

fn arb_withdrawal_type() -> impl Strategy<Value = WithdrawalType> {
    prop_oneof![
        Just(WithdrawalType::CapitalRedemption),
        Just(WithdrawalType::ResultSettlement),
    ]
}

fn arb_investment() -> impl Strategy<Value = InvestmentRecord> {
    (
        1i64..10_000_000,
        arb_investment_status(),
        proptest::option::of(arb_instant()),
        arb_instant(),
    )
        .prop_map(|(amount_cents, status, paid_at, created_at)| InvestmentRecord {
            amount_cents,
            status,
            paid_at,
            created_at,
        })
}

fn arb_withdrawal() -> impl Strategy<Value = WithdrawalRecord> {
    (
        arb_withdrawal_type(),
        arb_withdrawal_status(),
        1i64..10_000_000,
        proptest::option::of(-200i64..200),
        arb_instant(),
    )
        .prop_map(|(withdrawal_type, status, amount_cents, offset, requested_at)| {
            WithdrawalRecord {
                withdrawal_type,
                status,
                amount_cents,
                scheduled_for: offset.map(|days| reference_date() + Duration::days(days)),
                requested_at,
            }
        })
}

fn arb_entry() -> impl Strategy<Value = ResultEntryRecord> {
    (-5_000_000i64..5_000_000, arb_instant()).prop_map(|(amount_cents, created_at)| {
        ResultEntryRecord {
            amount_cents,
            created_at,
        }
    })
}

fn capital_request(amount_cents: i64, status: WithdrawalStatus) -> WithdrawalRecord {
    WithdrawalRecord {
        withdrawal_type: WithdrawalType::CapitalRedemption,
        status,
        amount_cents,
        scheduled_for: Some(reference_date()),
        requested_at: Utc.with_ymd_and_hms(2026, 6, 1, 15, 0, 0).unwrap(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Available capital and result are never negative.
    #[test]
    fn prop_available_is_non_negative(
        investments in prop::collection::vec(arb_investment(), 0..12),
        withdrawals in prop::collection::vec(arb_withdrawal(), 0..12),
        entries in prop::collection::vec(arb_entry(), 0..12),
    ) {
        let s = BalanceEngine::default()
            .compute_from_records(reference_date(), &investments, &withdrawals, &entries);
        prop_assert!(s.available_capital_cents >= 0);
        prop_assert!(s.available_result_cents >= 0);
        prop_assert!(s.liquid_capital_cents <= s.approved_capital_cents);
    }

    /// A pending capital request for X <= available reduces available capital by X,
    /// rejecting it restores the figure, approve and pay keep it reduced.
    #[test]
    fn prop_capital_reservation_lifecycle(
        investments in prop::collection::vec(arb_investment(), 1..8),
        withdrawals in prop::collection::vec(arb_withdrawal(), 0..8),
        fraction in 1u32..=100,
    ) {
        let engine = BalanceEngine::default();
        let today = reference_date();
        let before = engine.compute_from_records(today, &investments, &withdrawals, &[]);
        prop_assume!(before.available_capital_cents > 0);

        let x = (before.available_capital_cents * i64::from(fraction) / 100).max(1);

        let with = |status| {
            let mut all = withdrawals.clone();
            all.push(capital_request(x, status));
            engine.compute_from_records(today, &investments, &all, &[])
        };

        let pending = with(WithdrawalStatus::Pending);
        prop_assert_eq!(pending.available_capital_cents, before.available_capital_cents - x);

        let approved = with(WithdrawalStatus::Approved);
        let paid = with(WithdrawalStatus::Paid);
        prop_assert_eq!(approved.available_capital_cents, pending.available_capital_cents);
        prop_assert_eq!(paid.available_capital_cents, pending.available_capital_cents);

        let rejected = with(WithdrawalStatus::Rejected);
        prop_assert_eq!(rejected.available_capital_cents, before.available_capital_cents);
    }

    /// `ts < end_of_day_utc(D)` is equivalent to `date_of(ts) <= D`.
    #[test]
    fn prop_end_of_day_matches_local_date(ts in arb_instant(), offset in -400i64..400) {
        let cal = BusinessCalendar::default();
        let d = reference_date() + Duration::days(offset);
        prop_assert_eq!(ts < cal.end_of_day_utc(d), cal.date_of(ts) <= d);
    }
}
