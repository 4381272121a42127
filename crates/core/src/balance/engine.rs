//! Point-in-time withdrawal eligibility.

use chrono::{Days, NaiveDate};

use super::calendar::BusinessCalendar;
use super::records::{InvestmentRecord, ResultEntryRecord, WithdrawalRecord};
use super::types::{BalanceAggregates, BalanceCutoffs, BalancePolicy, BalanceSnapshot};

/// Computes balances from store aggregates or in-memory records.
///
/// All arithmetic is integer cents; available figures are clamped at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceEngine {
    policy: BalancePolicy,
    calendar: BusinessCalendar,
}

impl BalanceEngine {
    /// Creates an engine with the given policy and calendar.
    #[must_use]
    pub const fn new(policy: BalancePolicy, calendar: BusinessCalendar) -> Self {
        Self { policy, calendar }
    }

    /// Returns the eligibility policy.
    #[must_use]
    pub const fn policy(&self) -> BalancePolicy {
        self.policy
    }

    /// Returns the business calendar.
    #[must_use]
    pub const fn calendar(&self) -> BusinessCalendar {
        self.calendar
    }

    /// Reference date minus the maturity window.
    #[must_use]
    pub fn capital_cutoff_date(&self, reference_date: NaiveDate) -> NaiveDate {
        reference_date
            .checked_sub_days(Days::new(u64::from(self.policy.maturity_window_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Resolves the query boundaries for reference date D.
    #[must_use]
    pub fn cutoffs(&self, reference_date: NaiveDate) -> BalanceCutoffs {
        let capital_cutoff_date = self.capital_cutoff_date(reference_date);
        BalanceCutoffs {
            reference_date,
            capital_cutoff_date,
            recognized_before: self.calendar.end_of_day_utc(reference_date),
            liquid_before: self.calendar.end_of_day_utc(capital_cutoff_date),
        }
    }

    /// Derives available figures from raw sums.
    #[must_use]
    pub fn snapshot(&self, cutoffs: &BalanceCutoffs, agg: &BalanceAggregates) -> BalanceSnapshot {
        let available_capital_cents = agg
            .liquid_capital_cents
            .saturating_sub(agg.capital_reserved_cents)
            .max(0);
        let available_result_cents = agg
            .result_ledger_cents
            .saturating_sub(agg.result_reserved_cents)
            .max(0);

        BalanceSnapshot {
            reference_date: cutoffs.reference_date,
            capital_cutoff_date: cutoffs.capital_cutoff_date,
            approved_capital_cents: agg.approved_capital_cents,
            liquid_capital_cents: agg.liquid_capital_cents,
            capital_reserved_cents: agg.capital_reserved_cents,
            result_ledger_cents: agg.result_ledger_cents,
            result_reserved_cents: agg.result_reserved_cents,
            available_capital_cents,
            available_result_cents,
            pending_capital_cents: agg.pending_capital_cents,
            pending_result_cents: agg.pending_result_cents,
        }
    }

    /// All-zero snapshot returned when the store cannot be read.
    #[must_use]
    pub fn zero(&self, reference_date: NaiveDate) -> BalanceSnapshot {
        self.snapshot(&self.cutoffs(reference_date), &BalanceAggregates::default())
    }

    /// Evaluates the balance rules over one owner's records.
    #[must_use]
    pub fn compute_from_records(
        &self,
        reference_date: NaiveDate,
        investments: &[InvestmentRecord],
        withdrawals: &[WithdrawalRecord],
        entries: &[ResultEntryRecord],
    ) -> BalanceSnapshot {
        let cutoffs = self.cutoffs(reference_date);
        let agg = BalanceAggregates::from_records(&cutoffs, investments, withdrawals, entries);
        self.snapshot(&cutoffs, &agg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::InvestmentStatus;
    use crate::withdrawal::{WithdrawalStatus, WithdrawalType};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn engine() -> BalanceEngine {
        BalanceEngine::default()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Noon local time on the given business date.
    fn at(date: NaiveDate) -> DateTime<Utc> {
        chrono_tz::America::Sao_Paulo
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn approved(amount_cents: i64, recognized: NaiveDate) -> InvestmentRecord {
        InvestmentRecord {
            amount_cents,
            status: InvestmentStatus::Approved,
            paid_at: Some(at(recognized)),
            created_at: at(recognized),
        }
    }

    fn capital(amount_cents: i64, status: WithdrawalStatus, scheduled: NaiveDate) -> WithdrawalRecord {
        WithdrawalRecord {
            withdrawal_type: WithdrawalType::CapitalRedemption,
            status,
            amount_cents,
            scheduled_for: Some(scheduled),
            requested_at: at(scheduled),
        }
    }

    fn settlement(amount_cents: i64, status: WithdrawalStatus, requested: NaiveDate) -> WithdrawalRecord {
        WithdrawalRecord {
            withdrawal_type: WithdrawalType::ResultSettlement,
            status,
            amount_cents,
            scheduled_for: None,
            requested_at: at(requested),
        }
    }

    #[test]
    fn test_maturity_window_boundary() {
        let today = d(2026, 6, 1);
        let inv_91 = [approved(100_000, today - Duration::days(91))];
        let inv_90 = [approved(100_000, today - Duration::days(90))];
        let inv_89 = [approved(100_000, today - Duration::days(89))];

        let s = engine().compute_from_records(today, &inv_91, &[], &[]);
        assert_eq!(s.liquid_capital_cents, 100_000);
        assert_eq!(s.available_capital_cents, 100_000);

        let s = engine().compute_from_records(today, &inv_90, &[], &[]);
        assert_eq!(s.liquid_capital_cents, 100_000);

        let s = engine().compute_from_records(today, &inv_89, &[], &[]);
        assert_eq!(s.liquid_capital_cents, 0);
        assert_eq!(s.approved_capital_cents, 100_000);
        assert_eq!(s.available_capital_cents, 0);
    }

    #[test]
    fn test_unpaid_investment_recognized_by_creation() {
        let today = d(2026, 6, 1);
        let inv = [InvestmentRecord {
            amount_cents: 5_000,
            status: InvestmentStatus::Approved,
            paid_at: None,
            created_at: at(today - Duration::days(120)),
        }];
        let s = engine().compute_from_records(today, &inv, &[], &[]);
        assert_eq!(s.available_capital_cents, 5_000);
    }

    #[test]
    fn test_paid_at_takes_precedence_over_creation() {
        let today = d(2026, 6, 1);
        let inv = [InvestmentRecord {
            amount_cents: 5_000,
            status: InvestmentStatus::Approved,
            paid_at: Some(at(today - Duration::days(10))),
            created_at: at(today - Duration::days(120)),
        }];
        let s = engine().compute_from_records(today, &inv, &[], &[]);
        assert_eq!(s.liquid_capital_cents, 0);
    }

    #[test]
    fn test_only_approved_investments_count() {
        let today = d(2026, 6, 1);
        let old = today - Duration::days(200);
        let mut pending = approved(7_000, old);
        pending.status = InvestmentStatus::Pending;
        let mut rejected = approved(9_000, old);
        rejected.status = InvestmentStatus::Rejected;

        let s = engine().compute_from_records(today, &[pending, rejected], &[], &[]);
        assert_eq!(s.approved_capital_cents, 0);
        assert_eq!(s.available_capital_cents, 0);
    }

    #[test]
    fn test_future_investment_not_recognized() {
        let today = d(2026, 6, 1);
        let s = engine().compute_from_records(today, &[approved(1_000, d(2026, 6, 2))], &[], &[]);
        assert_eq!(s.approved_capital_cents, 0);
    }

    #[test]
    fn test_capital_reservation_respects_scheduled_date() {
        let today = d(2026, 6, 1);
        let inv = [approved(50_000, today - Duration::days(100))];
        let w = [
            capital(10_000, WithdrawalStatus::Pending, today),
            capital(5_000, WithdrawalStatus::Pending, today + Duration::days(3)),
            capital(3_000, WithdrawalStatus::Approved, today),
            capital(2_000, WithdrawalStatus::Rejected, today),
        ];

        let s = engine().compute_from_records(today, &inv, &w, &[]);
        assert_eq!(s.capital_reserved_cents, 13_000);
        assert_eq!(s.available_capital_cents, 37_000);
        // pending ignores the schedule and excludes approved requests
        assert_eq!(s.pending_capital_cents, 15_000);
    }

    #[test]
    fn test_unscheduled_capital_request_always_reserves() {
        let today = d(2026, 6, 1);
        let inv = [approved(50_000, today - Duration::days(100))];
        let mut w = capital(8_000, WithdrawalStatus::Paid, today);
        w.scheduled_for = None;

        let s = engine().compute_from_records(today, &inv, &[w], &[]);
        assert_eq!(s.available_capital_cents, 42_000);
    }

    #[test]
    fn test_result_balance_and_reservations() {
        let today = d(2026, 6, 1);
        let entries = [
            ResultEntryRecord { amount_cents: 1_500, created_at: at(today - Duration::days(2)) },
            ResultEntryRecord { amount_cents: -200, created_at: at(today - Duration::days(1)) },
            ResultEntryRecord { amount_cents: 9_999, created_at: at(today + Duration::days(1)) },
        ];
        let w = [
            settlement(300, WithdrawalStatus::Paid, today - Duration::days(1)),
            settlement(100, WithdrawalStatus::Rejected, today),
            settlement(400, WithdrawalStatus::Pending, today + Duration::days(1)),
        ];

        let s = engine().compute_from_records(today, &[], &w, &entries);
        assert_eq!(s.result_ledger_cents, 1_300);
        assert_eq!(s.result_reserved_cents, 300);
        assert_eq!(s.available_result_cents, 1_000);
        assert_eq!(s.pending_result_cents, 400);
    }

    #[test]
    fn test_available_never_negative() {
        let today = d(2026, 6, 1);
        let entries = [ResultEntryRecord { amount_cents: -5_000, created_at: at(today) }];
        let w = [capital(1_000, WithdrawalStatus::Paid, today)];

        let s = engine().compute_from_records(today, &[], &w, &entries);
        assert_eq!(s.available_capital_cents, 0);
        assert_eq!(s.available_result_cents, 0);
        assert_eq!(s.result_ledger_cents, -5_000);
    }

    #[test]
    fn test_result_does_not_feed_capital() {
        let today = d(2026, 6, 1);
        let entries = [ResultEntryRecord { amount_cents: 5_000, created_at: at(today) }];
        let s = engine().compute_from_records(today, &[], &[], &entries);
        assert_eq!(s.available_capital_cents, 0);
        assert_eq!(s.available_result_cents, 5_000);
    }

    #[test]
    fn test_custom_window() {
        let engine = BalanceEngine::new(
            BalancePolicy { maturity_window_days: 0 },
            BusinessCalendar::default(),
        );
        let today = d(2026, 6, 1);
        let s = engine.compute_from_records(today, &[approved(700, today)], &[], &[]);
        assert_eq!(s.available_capital_cents, 700);
        assert_eq!(s.capital_cutoff_date, today);
    }

    #[test]
    fn test_zero_snapshot() {
        let today = d(2026, 6, 1);
        let s = engine().zero(today);
        assert_eq!(s.reference_date, today);
        assert_eq!(s.capital_cutoff_date, d(2026, 3, 3));
        assert_eq!(s.available_capital_cents, 0);
        assert_eq!(s.available_result_cents, 0);
    }

    #[test]
    fn test_cutoffs() {
        let today = d(2026, 6, 1);
        let c = engine().cutoffs(today);
        assert_eq!(c.capital_cutoff_date, d(2026, 3, 3));
        assert!(c.liquid_before < c.recognized_before);
    }
}
