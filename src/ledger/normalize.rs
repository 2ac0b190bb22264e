//! Read-side cleanup of stored schedules.
//!
//! Stored rows may carry duplicated payments (double submits, repeated syncs)
//! or the older single-payment shape. Both are repaired here, silently.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{clamped_day, period_label};
use crate::decimal::Money;
use crate::errors::{LeaseError, Result};
use crate::types::YearMonth;

use super::{Adjustment, Notice, Payment, ScheduleRow};

/// drop payments whose (amount, date, method, note) repeats an earlier one
pub fn dedupe_payments(payments: &[Payment]) -> Vec<Payment> {
    let mut seen = HashSet::new();
    payments
        .iter()
        .filter(|p| seen.insert(p.dedup_key()))
        .cloned()
        .collect()
}

pub fn normalize_row(row: &ScheduleRow) -> ScheduleRow {
    ScheduleRow {
        payments: dedupe_payments(&row.payments),
        ..row.clone()
    }
}

pub fn normalize_rows(rows: &[ScheduleRow]) -> Vec<ScheduleRow> {
    rows.iter().map(normalize_row).collect()
}

/// row as persisted by older clients
///
/// Accepts a missing key (derived from the due date or the period label) and a
/// singular `payment` field alongside `payments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredRow {
    #[serde(default)]
    pub key: Option<YearMonth>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub period_label: Option<String>,
    #[serde(default)]
    pub expected_base: Money,
    #[serde(default)]
    pub expected_other: Money,
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
    #[serde(default)]
    pub late_fee: Money,
    #[serde(default)]
    pub late_fee_waived: bool,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub payment: Option<Payment>,
    #[serde(default)]
    pub notice: Option<Notice>,
    #[serde(default)]
    pub finalized: Option<NaiveDate>,
}

impl StoredRow {
    fn resolve_key(&self) -> Result<YearMonth> {
        if let Some(key) = self.key {
            return Ok(key);
        }
        if let Some(due) = self.due_date {
            return Ok(YearMonth::from_date(due));
        }
        let label = self.period_label.as_deref().unwrap_or_default().trim();
        if let Ok(key) = label.parse::<YearMonth>() {
            return Ok(key);
        }
        // "March 2025"
        NaiveDate::parse_from_str(&format!("1 {}", label), "%d %B %Y")
            .map(YearMonth::from_date)
            .map_err(|_| LeaseError::InvalidDate {
                message: format!("stored row has no usable due date or period ({:?})", label),
            })
    }

    pub fn into_row(self) -> Result<ScheduleRow> {
        let key = self.resolve_key()?;
        let due_date = match self.due_date {
            Some(due) => due,
            None => clamped_day(key, 1)?,
        };

        let mut payments = self.payments;
        if let Some(single) = self.payment {
            payments.push(single);
        }

        Ok(ScheduleRow {
            key,
            due_date,
            period_label: self.period_label.unwrap_or_else(|| period_label(due_date)),
            expected_base: self.expected_base,
            expected_other: self.expected_other,
            adjustments: self.adjustments,
            late_fee: self.late_fee,
            late_fee_waived: self.late_fee_waived,
            payments: dedupe_payments(&payments),
            notice: self.notice,
            finalized: self.finalized,
        })
    }
}

/// migrate stored rows into canonical, deduplicated schedule rows
pub fn normalize_stored_rows(rows: Vec<StoredRow>) -> Result<Vec<ScheduleRow>> {
    rows.into_iter().map(StoredRow::into_row).collect()
}
