use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LeaseConfig;
use crate::decimal::Money;
use crate::ledger::{Payment, ScheduleRow};
use crate::types::RowState;

/// what a month owes, what came in and what is left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowTotals {
    pub expected: Money,
    pub received_total: Money,
    pub balance: Money,
    pub state: RowState,
}

impl RowTotals {
    pub fn is_paid(&self) -> bool {
        self.state == RowState::Paid
    }

    /// amount still owed, never negative
    pub fn unpaid(&self) -> Money {
        self.balance.non_negative()
    }
}

/// base + pet rent + other + adjustments + late fee (unless waived)
pub fn expected_total(row: &ScheduleRow, config: &LeaseConfig) -> Money {
    row.expected_base
        + config.pet_rent()
        + row.expected_other
        + row.expected_adjustments()
        + row.effective_late_fee()
}

pub fn compute_row_totals(row: &ScheduleRow, config: &LeaseConfig) -> RowTotals {
    let expected = expected_total(row, config);
    let received_total = row.received_total();
    let balance = expected - received_total;

    RowTotals {
        expected,
        received_total,
        balance,
        state: if balance <= Money::ZERO {
            RowState::Paid
        } else {
            RowState::Unpaid
        },
    }
}

/// date on which cumulative payments first covered `expected`
///
/// Payments are taken in date order. Returns `None` when nothing was owed or
/// the payments never add up.
pub fn paid_in_full_on(payments: &[Payment], expected: Money) -> Option<NaiveDate> {
    if expected <= Money::ZERO {
        return None;
    }

    let mut ordered: Vec<&Payment> = payments.iter().collect();
    ordered.sort_by_key(|p| p.date);

    let mut running = Money::ZERO;
    for payment in ordered {
        running += payment.amount;
        if running >= expected {
            return Some(payment.date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Adjustment;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config() -> LeaseConfig {
        LeaseConfig::builder()
            .start_date(date(2025, 1, 1))
            .months(12)
            .monthly_rent(Money::from_major(1_000))
            .pet_rent(Money::from_major(25))
            .other_charge("parking", Money::from_major(50))
            .build()
            .unwrap()
    }

    fn row() -> ScheduleRow {
        ScheduleRow::new(date(2025, 1, 1), Money::from_major(1_000), Money::from_major(50))
    }

    #[test]
    fn test_expected_includes_every_component() {
        let mut row = row();
        row.adjustments.push(Adjustment::new(Money::from_major(-75), "credit").unwrap());
        row.late_fee = Money::from_major(40);

        let totals = compute_row_totals(&row, &config());
        assert_eq!(totals.expected, Money::from_major(1_000 + 25 + 50 - 75 + 40));
        assert_eq!(totals.state, RowState::Unpaid);

        row.late_fee_waived = true;
        let waived = compute_row_totals(&row, &config());
        assert_eq!(waived.expected, Money::from_major(1_000));
    }

    #[test]
    fn test_balance_and_state() {
        let mut row = row();
        row.payments.push(Payment::new(Money::from_major(600), date(2025, 1, 1)).unwrap());
        let partial = compute_row_totals(&row, &config());
        assert_eq!(partial.received_total, Money::from_major(600));
        assert_eq!(partial.balance, Money::from_major(475));
        assert_eq!(partial.unpaid(), Money::from_major(475));

        row.payments.push(Payment::new(Money::from_major(500), date(2025, 1, 9)).unwrap());
        let over = compute_row_totals(&row, &config());
        assert_eq!(over.balance, Money::from_major(-25));
        assert!(over.is_paid());
        assert_eq!(over.unpaid(), Money::ZERO);
    }

    #[test]
    fn test_totals_are_idempotent() {
        let mut row = row();
        row.payments.push(Payment::new(Money::from_str_exact("333.33").unwrap(), date(2025, 1, 2)).unwrap());
        let before = row.clone();

        let first = compute_row_totals(&row, &config());
        let second = compute_row_totals(&row, &config());
        assert_eq!(first, second);
        assert_eq!(row, before);
    }

    #[test]
    fn test_pet_rent_toggle_is_retroactive() {
        let mut config = config();
        let row = row();
        let with_pet = compute_row_totals(&row, &config).expected;

        config.pet_rent_enabled = false;
        let without_pet = compute_row_totals(&row, &config).expected;
        assert_eq!(with_pet - without_pet, Money::from_major(25));
    }

    #[test]
    fn test_paid_in_full_on_uses_date_order() {
        let payments = vec![
            Payment::new(Money::from_major(400), date(2025, 1, 20)).unwrap(),
            Payment::new(Money::from_major(700), date(2025, 1, 3)).unwrap(),
            Payment::new(Money::from_major(300), date(2025, 1, 10)).unwrap(),
        ];
        assert_eq!(paid_in_full_on(&payments, Money::from_major(1_000)), Some(date(2025, 1, 10)));
        assert_eq!(paid_in_full_on(&payments, Money::from_major(2_000)), None);
        assert_eq!(paid_in_full_on(&payments, Money::ZERO), None);
    }
}
