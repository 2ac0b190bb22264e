use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::period_label;
use crate::decimal::Money;
use crate::errors::{LeaseError, Result};
use crate::types::YearMonth;

use super::{Adjustment, Notice, NoticeMethod, Payment};

/// one calendar month's obligation and everything recorded against it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// stable identity across schedule regenerations
    pub key: YearMonth,
    pub due_date: NaiveDate,
    pub period_label: String,
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
    pub notice: Option<Notice>,
    /// set once the month is fully paid: the date it became paid
    #[serde(default)]
    pub finalized: Option<NaiveDate>,
}

impl ScheduleRow {
    pub fn new(due_date: NaiveDate, expected_base: Money, expected_other: Money) -> Self {
        Self {
            key: YearMonth::from_date(due_date),
            due_date,
            period_label: period_label(due_date),
            expected_base,
            expected_other,
            adjustments: Vec::new(),
            late_fee: Money::ZERO,
            late_fee_waived: false,
            payments: Vec::new(),
            notice: None,
            finalized: None,
        }
    }

    pub fn expected_adjustments(&self) -> Money {
        self.adjustments.iter().map(|a| a.amount).sum()
    }

    pub fn adjustment_reasons(&self) -> Vec<&str> {
        self.adjustments.iter().map(|a| a.reason.as_str()).collect()
    }

    pub fn received_total(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// late fee counted toward what is owed (zero when waived)
    pub fn effective_late_fee(&self) -> Money {
        if self.late_fee_waived {
            Money::ZERO
        } else {
            self.late_fee
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    /// anything entered by hand that a regeneration must not lose
    pub fn has_history(&self) -> bool {
        !self.payments.is_empty()
            || !self.adjustments.is_empty()
            || self.notice.is_some()
            || self.late_fee_waived
            || !self.late_fee.is_zero()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_finalized() {
            return Err(LeaseError::RowFinalized { key: self.key });
        }
        Ok(())
    }

    pub fn add_payment(&mut self, payment: Payment) -> Result<()> {
        self.ensure_open()?;
        if !payment.amount.is_positive() {
            return Err(LeaseError::payment(format!(
                "amount must be greater than zero, got {}",
                payment.amount
            )));
        }
        self.payments.push(payment);
        Ok(())
    }

    /// remove a payment by id; a finalized month is reopened
    pub fn remove_payment(&mut self, id: Uuid) -> Result<Payment> {
        let index = self
            .payments
            .iter()
            .position(|p| p.id == id)
            .ok_or(LeaseError::PaymentNotFound { id })?;
        self.finalized = None;
        Ok(self.payments.remove(index))
    }

    pub fn add_adjustment(&mut self, adjustment: Adjustment) -> Result<()> {
        self.ensure_open()?;
        self.adjustments.push(adjustment);
        Ok(())
    }

    pub fn remove_adjustment(&mut self, index: usize) -> Result<Adjustment> {
        self.ensure_open()?;
        if index >= self.adjustments.len() {
            return Err(LeaseError::InvalidAdjustment {
                reason: format!("no adjustment at position {} in {}", index, self.key),
            });
        }
        Ok(self.adjustments.remove(index))
    }

    /// lifting the waiver on a charged fee reopens a finalized month
    pub fn set_late_fee_waived(&mut self, waived: bool) {
        if self.late_fee_waived && !waived && self.late_fee.is_positive() {
            self.finalized = None;
        }
        self.late_fee_waived = waived;
    }

    /// record a notice, replacing any earlier one
    pub fn serve_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn add_notice_method(&mut self, method: NoticeMethod) -> Result<()> {
        let notice = self
            .notice
            .as_mut()
            .ok_or(LeaseError::NoNotice { key: self.key })?;
        notice.add_method(method);
        Ok(())
    }

    pub fn withdraw_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
