//! Fever status: a traffic-light reading of one month's payment health.
//!
//! The status is derived from scratch on every call. Nothing is stored and
//! nothing advances it except the `today` argument, so the same row can read
//! yellow on one day and orange the next without any mutation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LeaseConfig;
use crate::dates::{add_days, days_between};
use crate::decimal::Money;
use crate::ledger::{Payment, ScheduleRow};
use crate::types::FeverColor;

use super::totals::{compute_row_totals, paid_in_full_on};

/// inputs for resolving one month's status
#[derive(Debug, Clone, Copy)]
pub struct FeverParams<'a> {
    pub due_date: Option<NaiveDate>,
    pub payments: &'a [Payment],
    pub expected_total: Money,
    pub grace_days: u32,
    pub notice_start: Option<NaiveDate>,
    pub notice_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeverStatus {
    pub color: FeverColor,
    pub tooltip: String,
    /// set once the month is covered, however late
    pub final_paid_at: Option<NaiveDate>,
}

impl FeverStatus {
    fn open(color: FeverColor, tooltip: String) -> Self {
        Self {
            color,
            tooltip,
            final_paid_at: None,
        }
    }
}

pub fn resolve_fever_status(params: &FeverParams<'_>, today: NaiveDate) -> FeverStatus {
    let Some(due) = params.due_date else {
        return FeverStatus::open(FeverColor::Gray, "No due date".to_string());
    };

    let received: Money = params.payments.iter().map(|p| p.amount).sum();
    let balance = params.expected_total - received;
    let grace_end = add_days(due, params.grace_days);

    if balance <= Money::ZERO {
        return paid_status(params, due, grace_end);
    }

    if today < due {
        return FeverStatus::open(
            FeverColor::Green,
            format!("Due {}; {} outstanding", due, balance),
        );
    }

    // notice only takes over once its period has actually begun
    if let Some(start) = params.notice_start.filter(|start| today >= *start) {
        let end = add_days(start, params.notice_days);
        return if today <= end {
            FeverStatus::open(
                FeverColor::Red,
                format!(
                    "Notice served {}; {} days left, {} outstanding",
                    start,
                    days_between(today, end),
                    balance
                ),
            )
        } else {
            FeverStatus::open(
                FeverColor::Black,
                format!("Notice period ended {}; {} outstanding", end, balance),
            )
        };
    }

    if today <= grace_end {
        let tooltip = if today == due {
            format!("Due today; {} outstanding", balance)
        } else {
            format!(
                "{} days past due, grace until {}; {} outstanding",
                days_between(due, today),
                grace_end,
                balance
            )
        };
        return FeverStatus::open(FeverColor::Yellow, tooltip);
    }

    FeverStatus::open(
        FeverColor::Orange,
        format!("{} days late; {} outstanding", days_between(due, today), balance),
    )
}

fn paid_status(params: &FeverParams<'_>, due: NaiveDate, grace_end: NaiveDate) -> FeverStatus {
    let Some(paid_on) = paid_in_full_on(params.payments, params.expected_total) else {
        // nothing was owed, so the month counts as covered on its due date
        return FeverStatus {
            color: FeverColor::Green,
            tooltip: "Nothing owed".to_string(),
            final_paid_at: Some(due),
        };
    };

    let tooltip = if paid_on <= due {
        format!("Paid on time ({})", paid_on)
    } else if paid_on <= grace_end {
        format!("Paid within grace period ({})", paid_on)
    } else {
        format!("Paid late ({}, {} days after due)", paid_on, days_between(due, paid_on))
    };

    FeverStatus {
        color: FeverColor::Green,
        tooltip,
        final_paid_at: Some(paid_on),
    }
}

/// status of a schedule row under its lease configuration
pub fn fever_status_for_row(row: &ScheduleRow, config: &LeaseConfig, today: NaiveDate) -> FeverStatus {
    let totals = compute_row_totals(row, config);
    let params = FeverParams {
        due_date: Some(row.due_date),
        payments: &row.payments,
        expected_total: totals.expected,
        grace_days: config.grace_days,
        notice_start: row.notice.as_ref().map(|n| n.start()),
        notice_days: row.notice.as_ref().map(|n| n.duration_days).unwrap_or(0),
    };
    resolve_fever_status(&params, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn params(payments: &[Payment]) -> FeverParams<'_> {
        FeverParams {
            due_date: Some(date(2025, 1, 1)),
            payments,
            expected_total: Money::from_major(1_000),
            grace_days: 5,
            notice_start: None,
            notice_days: 0,
        }
    }

    #[test]
    fn test_grace_boundary() {
        let p = params(&[]);
        assert_eq!(resolve_fever_status(&p, date(2024, 12, 31)).color, FeverColor::Green);
        assert_eq!(resolve_fever_status(&p, date(2025, 1, 1)).color, FeverColor::Yellow);
        assert_eq!(resolve_fever_status(&p, date(2025, 1, 6)).color, FeverColor::Yellow);
        assert_eq!(resolve_fever_status(&p, date(2025, 1, 7)).color, FeverColor::Orange);
    }

    #[test]
    fn test_full_payment_after_late_is_terminal_green() {
        let payments = vec![Payment::new(Money::from_major(1_000), date(2025, 1, 20)).unwrap()];
        let status = resolve_fever_status(&params(&payments), date(2025, 3, 1));

        assert_eq!(status.color, FeverColor::Green);
        assert_eq!(status.final_paid_at, Some(date(2025, 1, 20)));
        assert!(status.tooltip.starts_with("Paid late"));
    }

    #[test]
    fn test_paid_tooltips_by_timing() {
        let on_time = vec![Payment::new(Money::from_major(1_000), date(2024, 12, 28)).unwrap()];
        let in_grace = vec![Payment::new(Money::from_major(1_000), date(2025, 1, 4)).unwrap()];

        let early = resolve_fever_status(&params(&on_time), date(2025, 1, 2));
        assert!(early.tooltip.starts_with("Paid on time"));

        let grace = resolve_fever_status(&params(&in_grace), date(2025, 1, 9));
        assert!(grace.tooltip.starts_with("Paid within grace"));
        assert_eq!(grace.color, FeverColor::Green);
    }

    #[test]
    fn test_partial_payment_still_late() {
        let payments = vec![Payment::new(Money::from_major(999), date(2025, 1, 1)).unwrap()];
        let status = resolve_fever_status(&params(&payments), date(2025, 1, 10));
        assert_eq!(status.color, FeverColor::Orange);
        assert_eq!(status.final_paid_at, None);
        assert!(status.tooltip.contains("$1.00 outstanding"));
    }

    #[test]
    fn test_notice_red_then_black() {
        let mut p = params(&[]);
        p.notice_start = Some(date(2025, 1, 10));
        p.notice_days = 3;

        assert_eq!(resolve_fever_status(&p, date(2025, 1, 9)).color, FeverColor::Orange);
        assert_eq!(resolve_fever_status(&p, date(2025, 1, 10)).color, FeverColor::Red);
        assert_eq!(resolve_fever_status(&p, date(2025, 1, 13)).color, FeverColor::Red);
        assert_eq!(resolve_fever_status(&p, date(2025, 1, 14)).color, FeverColor::Black);
    }

    #[test]
    fn test_early_notice_waits_for_its_start() {
        let mut p = params(&[]);
        p.notice_start = Some(date(2025, 1, 4));
        p.notice_days = 10;

        // before the notice start, grace rules apply
        assert_eq!(resolve_fever_status(&p, date(2025, 1, 3)).color, FeverColor::Yellow);
        // inside grace but notice has begun: notice wins
        assert_eq!(resolve_fever_status(&p, date(2025, 1, 5)).color, FeverColor::Red);
    }

    #[test]
    fn test_payment_clears_notice_states() {
        let payments = vec![Payment::new(Money::from_major(1_000), date(2025, 2, 1)).unwrap()];
        let mut p = params(&payments);
        p.notice_start = Some(date(2025, 1, 10));
        p.notice_days = 3;

        let status = resolve_fever_status(&p, date(2025, 2, 2));
        assert_eq!(status.color, FeverColor::Green);
    }

    #[test]
    fn test_missing_due_date_is_gray() {
        let mut p = params(&[]);
        p.due_date = None;
        assert_eq!(resolve_fever_status(&p, date(2025, 1, 1)).color, FeverColor::Gray);
    }

    #[test]
    fn test_nothing_owed() {
        let mut p = params(&[]);
        p.expected_total = Money::ZERO;
        let status = resolve_fever_status(&p, date(2025, 1, 30));
        assert_eq!(status.color, FeverColor::Green);
        assert_eq!(status.final_paid_at, Some(date(2025, 1, 1)));

        let credit = vec![Payment::new(Money::from_major(20), date(2025, 1, 5)).unwrap()];
        let mut p = params(&credit);
        p.expected_total = Money::from_major(-10);
        let status = resolve_fever_status(&p, date(2025, 1, 30));
        assert_eq!(status.tooltip, "Nothing owed");
        assert_eq!(status.final_paid_at, Some(date(2025, 1, 1)));
    }
}
