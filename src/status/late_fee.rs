use chrono::NaiveDate;
use tracing::debug;

use crate::config::LeaseConfig;
use crate::dates::add_days;
use crate::decimal::Money;
use crate::ledger::ScheduleRow;

use super::totals::{compute_row_totals, paid_in_full_on};

/// last day a month can be paid without being late
pub fn grace_period_end(row: &ScheduleRow, config: &LeaseConfig) -> NaiveDate {
    add_days(row.due_date, config.grace_days)
}

/// fee the policy charges for this month, ignoring the waiver and the calendar
pub fn compute_assessed_late_fee_amount(row: &ScheduleRow, config: &LeaseConfig) -> Money {
    config.late_fee_policy.fee_for(row.expected_base)
}

/// row with its late fee brought up to date as of `today`
///
/// - no fee while `today` is on or before the end of the grace period
/// - no fee once the month is fully paid, so a fee is never charged after the fact
/// - otherwise the policy fee
///
/// The waiver flag is left alone; it only changes what the totals count.
pub fn maybe_apply_late_fee(row: &ScheduleRow, config: &LeaseConfig, today: NaiveDate) -> ScheduleRow {
    let mut updated = row.clone();

    let fee = if today <= grace_period_end(row, config) {
        Money::ZERO
    } else if compute_row_totals(row, config).balance <= Money::ZERO {
        Money::ZERO
    } else {
        compute_assessed_late_fee_amount(row, config)
    };

    if fee != row.late_fee {
        debug!(
            month = %row.key,
            previous = %row.late_fee,
            fee = %fee,
            waived = row.late_fee_waived,
            "late fee updated"
        );
    }
    updated.late_fee = fee;
    updated
}

/// row marked finalized once fully paid
///
/// The marker records the date cumulative payments covered the month, or the
/// due date when nothing was owed. Rows with a balance come back unchanged.
pub fn finalize_month_if_paid(row: &ScheduleRow, config: &LeaseConfig) -> ScheduleRow {
    let mut updated = row.clone();
    if row.is_finalized() {
        return updated;
    }

    let totals = compute_row_totals(row, config);
    if totals.balance <= Money::ZERO {
        let paid_on = paid_in_full_on(&row.payments, totals.expected).unwrap_or(row.due_date);
        debug!(month = %row.key, paid_on = %paid_on, "month finalized");
        updated.finalized = Some(paid_on);
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LateFeePolicy;
    use crate::ledger::Payment;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config(policy: LateFeePolicy) -> LeaseConfig {
        LeaseConfig::builder()
            .start_date(date(2025, 1, 1))
            .months(12)
            .monthly_rent(Money::from_major(1_200))
            .grace_days(5)
            .late_fee_policy(policy)
            .build()
            .unwrap()
    }

    fn row() -> ScheduleRow {
        ScheduleRow::new(date(2025, 1, 1), Money::from_major(1_200), Money::ZERO)
    }

    #[test]
    fn test_no_fee_until_grace_ends() {
        let config = config(LateFeePolicy::Flat(Money::from_major(50)));

        let future = maybe_apply_late_fee(&row(), &config, date(2024, 12, 20));
        assert_eq!(future.late_fee, Money::ZERO);

        let due_today = maybe_apply_late_fee(&row(), &config, date(2025, 1, 1));
        assert_eq!(due_today.late_fee, Money::ZERO);

        let last_grace_day = maybe_apply_late_fee(&row(), &config, date(2025, 1, 6));
        assert_eq!(last_grace_day.late_fee, Money::ZERO);

        let late = maybe_apply_late_fee(&row(), &config, date(2025, 1, 7));
        assert_eq!(late.late_fee, Money::from_major(50));
    }

    #[test]
    fn test_percent_policy() {
        let config = config(LateFeePolicy::percent(dec!(5)));
        let late = maybe_apply_late_fee(&row(), &config, date(2025, 2, 1));
        assert_eq!(late.late_fee, Money::from_major(60));
    }

    #[test]
    fn test_fee_is_idempotent() {
        let config = config(LateFeePolicy::Flat(Money::from_major(50)));
        let once = maybe_apply_late_fee(&row(), &config, date(2025, 1, 20));
        let twice = maybe_apply_late_fee(&once, &config, date(2025, 1, 20));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_retroactive_fee_after_full_payment() {
        let config = config(LateFeePolicy::Flat(Money::from_major(50)));
        let mut row = row();
        row.payments.push(Payment::new(Money::from_major(1_200), date(2025, 1, 15)).unwrap());

        let checked = maybe_apply_late_fee(&row, &config, date(2025, 2, 1));
        assert_eq!(checked.late_fee, Money::ZERO);
    }

    #[test]
    fn test_full_payment_clears_stored_fee() {
        let config = config(LateFeePolicy::Flat(Money::from_major(50)));
        let mut row = maybe_apply_late_fee(&row(), &config, date(2025, 1, 10));
        assert_eq!(row.late_fee, Money::from_major(50));

        row.payments.push(Payment::new(Money::from_major(1_200), date(2025, 1, 12)).unwrap());
        let partly = maybe_apply_late_fee(&row, &config, date(2025, 1, 13));
        assert_eq!(partly.late_fee, Money::from_major(50));

        row.payments.push(Payment::new(Money::from_major(50), date(2025, 1, 14)).unwrap());
        let cleared = maybe_apply_late_fee(&row, &config, date(2025, 1, 15));
        assert_eq!(cleared.late_fee, Money::ZERO);
        assert_eq!(maybe_apply_late_fee(&cleared, &config, date(2025, 1, 15)), cleared);
    }

    #[test]
    fn test_waiver_keeps_assessed_amount_visible() {
        let config = config(LateFeePolicy::Flat(Money::from_major(50)));
        let mut row = maybe_apply_late_fee(&row(), &config, date(2025, 1, 10));
        row.late_fee_waived = true;

        let after = maybe_apply_late_fee(&row, &config, date(2025, 1, 11));
        assert_eq!(after.late_fee, Money::from_major(50));
        assert_eq!(compute_assessed_late_fee_amount(&after, &config), Money::from_major(50));
        assert_eq!(compute_row_totals(&after, &config).expected, Money::from_major(1_200));
    }

    #[test]
    fn test_finalize_records_paid_date() {
        let config = config(LateFeePolicy::Flat(Money::from_major(50)));
        let mut row = row();

        let unpaid = finalize_month_if_paid(&row, &config);
        assert!(!unpaid.is_finalized());

        row.payments.push(Payment::new(Money::from_major(700), date(2025, 1, 2)).unwrap());
        row.payments.push(Payment::new(Money::from_major(500), date(2025, 1, 4)).unwrap());
        let paid = finalize_month_if_paid(&row, &config);
        assert_eq!(paid.finalized, Some(date(2025, 1, 4)));
        assert!(row.finalized.is_none());
    }

    #[test]
    fn test_finalize_when_nothing_owed() {
        let config = config(LateFeePolicy::Flat(Money::ZERO));
        let free_month = ScheduleRow::new(date(2025, 3, 1), Money::ZERO, Money::ZERO);
        let finalized = finalize_month_if_paid(&free_month, &config);
        assert_eq!(finalized.finalized, Some(date(2025, 3, 1)));
    }
}
