pub mod normalize;
pub mod notice;
pub mod row;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LeaseError, Result};

pub use normalize::{dedupe_payments, normalize_rows, normalize_stored_rows, StoredRow};
pub use notice::{Notice, NoticeMethod};
pub use row::ScheduleRow;

/// money received against one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Payment {
    /// create a payment, rejecting non-positive amounts
    pub fn new(amount: Money, date: NaiveDate) -> Result<Self> {
        if !amount.is_positive() {
            return Err(LeaseError::payment(format!(
                "amount must be greater than zero, got {}",
                amount
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            date,
            method: None,
            note: None,
        })
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// identity used for deduplication; ignores the id, treats blank text as absent
    pub fn dedup_key(&self) -> PaymentKey {
        PaymentKey {
            amount: self.amount,
            date: self.date,
            method: normalized_text(&self.method),
            note: normalized_text(&self.note),
        }
    }
}

fn normalized_text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentKey {
    pub amount: Money,
    pub date: NaiveDate,
    pub method: String,
    pub note: String,
}

/// unvalidated payment input as it arrives from a form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentDraft {
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl PaymentDraft {
    pub fn new(amount: Money, date: NaiveDate) -> Self {
        Self {
            amount: Some(amount),
            date: Some(date),
            method: None,
            note: None,
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// turn the draft into a payment or explain why it cannot be recorded
    pub fn validate(self) -> Result<Payment> {
        let amount = self
            .amount
            .ok_or_else(|| LeaseError::payment("amount is required"))?;
        let date = self
            .date
            .ok_or_else(|| LeaseError::payment("date is required"))?;

        let mut payment = Payment::new(amount, date)?;
        payment.method = self.method.filter(|m| !m.trim().is_empty());
        payment.note = self.note.filter(|n| !n.trim().is_empty());
        Ok(payment)
    }
}

/// ad hoc charge (positive) or credit (negative) on a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub amount: Money,
    pub reason: String,
}

impl Adjustment {
    pub fn new(amount: Money, reason: impl Into<String>) -> Result<Self> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(LeaseError::InvalidAdjustment {
                reason: "a reason is required".to_string(),
            });
        }
        if amount.is_zero() {
            return Err(LeaseError::InvalidAdjustment {
                reason: "amount cannot be zero".to_string(),
            });
        }
        Ok(Self { amount, reason })
    }

    pub fn is_credit(&self) -> bool {
        self.amount.is_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_payment_rejects_non_positive_amounts() {
        assert!(Payment::new(Money::ZERO, date(2025, 1, 1)).is_err());
        assert!(Payment::new(Money::from_major(-5), date(2025, 1, 1)).is_err());
        assert!(Payment::new(Money::CENT, date(2025, 1, 1)).is_ok());
    }

    #[test]
    fn test_draft_validation() {
        let missing_date = PaymentDraft {
            amount: Some(Money::from_major(100)),
            ..Default::default()
        };
        assert!(matches!(
            missing_date.validate(),
            Err(LeaseError::InvalidPayment { .. })
        ));

        let missing_amount = PaymentDraft {
            date: Some(date(2025, 1, 1)),
            ..Default::default()
        };
        assert!(missing_amount.validate().is_err());

        let payment = PaymentDraft::new(Money::from_major(100), date(2025, 1, 1))
            .method("ACH")
            .note("  ")
            .validate()
            .unwrap();
        assert_eq!(payment.method.as_deref(), Some("ACH"));
        assert_eq!(payment.note, None);
    }

    #[test]
    fn test_dedup_key_ignores_id_and_blank_text() {
        let a = Payment::new(Money::from_major(500), date(2025, 3, 1))
            .unwrap()
            .with_method("ACH")
            .with_note("");
        let b = Payment::new(Money::from_major(500), date(2025, 3, 1))
            .unwrap()
            .with_method("ACH");

        assert_ne!(a.id, b.id);
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_adjustment_validation() {
        assert!(Adjustment::new(Money::from_major(25), "").is_err());
        assert!(Adjustment::new(Money::ZERO, "nothing").is_err());

        let credit = Adjustment::new(Money::from_major(-40), "plumbing repair credit").unwrap();
        assert!(credit.is_credit());
    }
}
