use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::decimal::Money;
use crate::ledger::{dedupe_payments, ScheduleRow};
use crate::types::YearMonth;

/// result of reconciling a regenerated schedule with the previous one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMerge {
    pub rows: Vec<ScheduleRow>,
    /// months that carried history but fell outside the new term
    pub dropped_history: Vec<YearMonth>,
}

/// carry manually entered history from `old` onto a freshly generated `new` schedule
///
/// Rows are matched by year-month. Matched rows get the union of payments
/// (deduplicated), the waiver, any assessed late fee, adjustments and the
/// notice. New rows without a match stay as generated; old rows without a
/// match are dropped and reported.
pub fn merge_schedule(old: &[ScheduleRow], new: Vec<ScheduleRow>) -> ScheduleMerge {
    let by_key: HashMap<YearMonth, &ScheduleRow> = old.iter().map(|row| (row.key, row)).collect();

    let rows: Vec<ScheduleRow> = new
        .into_iter()
        .map(|row| match by_key.get(&row.key) {
            Some(previous) => carry_history(row, previous),
            None => row,
        })
        .collect();

    let dropped_history: Vec<YearMonth> = old
        .iter()
        .filter(|row| row.has_history() && !rows.iter().any(|r| r.key == row.key))
        .map(|row| row.key)
        .collect();

    if !dropped_history.is_empty() {
        let months: Vec<String> = dropped_history.iter().map(ToString::to_string).collect();
        warn!(
            dropped = dropped_history.len(),
            months = %months.join(", "),
            "schedule edit dropped months with recorded history"
        );
    }

    ScheduleMerge { rows, dropped_history }
}

/// [`merge_schedule`] without the dropped-history report
pub fn merge_schedule_preserving_payments(old: &[ScheduleRow], new: Vec<ScheduleRow>) -> Vec<ScheduleRow> {
    merge_schedule(old, new).rows
}

fn carry_history(mut row: ScheduleRow, previous: &ScheduleRow) -> ScheduleRow {
    let mut payments = row.payments;
    payments.extend(previous.payments.iter().cloned());
    row.payments = dedupe_payments(&payments);

    if previous.late_fee_waived {
        row.late_fee_waived = true;
        row.late_fee = Money::ZERO;
    } else {
        row.late_fee = previous.late_fee;
    }

    row.adjustments = previous.adjustments.clone();
    row.notice = previous.notice.clone();
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LeaseConfig, PrepaidPayment};
    use crate::ledger::{Adjustment, Notice, Payment};
    use crate::schedule::generate_lease_schedule;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule(months: u32, rent: i64) -> Vec<ScheduleRow> {
        let config = LeaseConfig::builder()
            .start_date(date(2025, 1, 1))
            .months(months)
            .monthly_rent(Money::from_major(rent))
            .build()
            .unwrap();
        generate_lease_schedule(&config).unwrap()
    }

    fn key(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn test_rent_increase_keeps_payments() {
        let mut old = schedule(12, 1_000);
        old[2]
            .add_payment(Payment::new(Money::from_major(500), date(2025, 3, 1)).unwrap())
            .unwrap();

        let merged = merge_schedule_preserving_payments(&old, schedule(12, 1_100));
        let march = merged.iter().find(|r| r.key == key("2025-03")).unwrap();

        assert_eq!(march.expected_base, Money::from_major(1_100));
        assert_eq!(march.payments.len(), 1);
        assert_eq!(march.payments[0].amount, Money::from_major(500));
    }

    #[test]
    fn test_merge_carries_adjustments_notice_and_fees() {
        let mut old = schedule(3, 1_000);
        old[0].add_adjustment(Adjustment::new(Money::from_major(-50), "repair credit").unwrap()).unwrap();
        old[0].late_fee = Money::from_major(40);
        old[1].late_fee = Money::from_major(40);
        old[1].late_fee_waived = true;
        old[2].serve_notice(Notice::new(date(2025, 3, 10), 3));

        let merged = merge_schedule(&old, schedule(3, 1_000));

        assert_eq!(merged.rows[0].adjustments, old[0].adjustments);
        assert_eq!(merged.rows[0].late_fee, Money::from_major(40));
        assert!(merged.rows[1].late_fee_waived);
        assert_eq!(merged.rows[1].late_fee, Money::ZERO);
        assert_eq!(merged.rows[2].notice, old[2].notice);
        assert!(merged.dropped_history.is_empty());
    }

    #[test]
    fn test_prepaid_payment_is_not_duplicated() {
        let config = LeaseConfig::builder()
            .start_date(date(2025, 1, 1))
            .months(6)
            .monthly_rent(Money::from_major(1_000))
            .first_month_prepaid(Some(PrepaidPayment {
                date: Some(date(2024, 12, 20)),
                amount: None,
                method: Some("check".to_string()),
            }))
            .build()
            .unwrap();

        let old = generate_lease_schedule(&config).unwrap();
        let new = generate_lease_schedule(&config).unwrap();
        let merged = merge_schedule_preserving_payments(&old, new);

        assert_eq!(merged[0].payments.len(), 1);
    }

    #[test]
    fn test_shortened_term_reports_dropped_history() {
        let mut old = schedule(6, 1_000);
        old[4]
            .add_payment(Payment::new(Money::from_major(1_000), date(2025, 5, 1)).unwrap())
            .unwrap();

        let merged = merge_schedule(&old, schedule(4, 1_000));

        assert_eq!(merged.rows.len(), 4);
        // the untouched sixth month is not reported
        assert_eq!(merged.dropped_history, vec![key("2025-05")]);
    }

    #[test]
    fn test_new_months_start_fresh() {
        let mut old = schedule(2, 1_000);
        old[1]
            .add_payment(Payment::new(Money::from_major(1_000), date(2025, 2, 1)).unwrap())
            .unwrap();

        let merged = merge_schedule_preserving_payments(&old, schedule(4, 1_000));
        assert_eq!(merged.len(), 4);
        assert_eq!(merged[1].payments.len(), 1);
        assert!(merged[2].payments.is_empty());
        assert!(merged[3].payments.is_empty());
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let mut old = schedule(2, 1_000);
        old[0]
            .add_payment(Payment::new(Money::from_major(10), date(2025, 1, 1)).unwrap())
            .unwrap();
        let before = old.clone();

        let _ = merge_schedule(&old, schedule(1, 900));
        assert_eq!(old, before);
    }
}
