use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::LeaseConfig;
use crate::decimal::Money;
use crate::errors::{LeaseError, Result};
use crate::ledger::ScheduleRow;
use crate::status::compute_row_totals;
use crate::types::{RefundMethod, SettlementStatus, YearMonth};

/// total still owed across all months; overpaid months do not offset others
pub fn compute_unpaid(rows: &[ScheduleRow], config: &LeaseConfig) -> Money {
    rows.iter()
        .map(|row| compute_row_totals(row, config).unpaid())
        .sum()
}

/// deposits received minus everything charged against them
///
/// Positive means a refund is owed to the tenant, negative means the tenant
/// still owes the landlord.
pub fn settlement_net(deposits_received: Money, unpaid: Money, damages: &[DamageItem]) -> Money {
    let damages_total: Money = damages.iter().map(|d| d.amount).sum();
    deposits_received - (unpaid + damages_total)
}

/// deposits on file at settlement time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepositSnapshot {
    pub expected: Money,
    pub received: Money,
}

/// itemized damage charged against the deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageItem {
    pub description: String,
    pub amount: Money,
}

/// damage line as entered; fully blank lines are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageItemDraft {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: Option<Money>,
}

impl DamageItemDraft {
    pub fn new(description: impl Into<String>, amount: Money) -> Self {
        Self {
            description: description.into(),
            amount: Some(amount),
        }
    }

    fn is_blank(&self) -> bool {
        self.description.trim().is_empty() && self.amount.is_none()
    }

    fn validate(&self, index: usize) -> Result<DamageItem> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(LeaseError::InvalidDamageItem {
                index,
                reason: "description is required".to_string(),
            });
        }
        let amount = self.amount.ok_or_else(|| LeaseError::InvalidDamageItem {
            index,
            reason: format!("amount is required for {:?}", description),
        })?;
        if amount.is_negative() {
            return Err(LeaseError::InvalidDamageItem {
                index,
                reason: format!("amount cannot be negative, got {}", amount),
            });
        }
        Ok(DamageItem {
            description: description.to_string(),
            amount,
        })
    }
}

/// everything needed to settle the deposits at move-out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub status: SettlementStatus,
    pub deposits: DepositSnapshot,
    #[serde(default)]
    pub damages: Vec<DamageItemDraft>,
    #[serde(default)]
    pub refund_method: Option<RefundMethod>,
    pub settled_on: NaiveDate,
    /// month the settlement is recorded against, usually the last one
    #[serde(default)]
    pub attached_to: Option<YearMonth>,
}

impl SettlementRequest {
    pub fn new(status: SettlementStatus, deposits: DepositSnapshot, settled_on: NaiveDate) -> Self {
        Self {
            status,
            deposits,
            damages: Vec::new(),
            refund_method: None,
            settled_on,
            attached_to: None,
        }
    }

    pub fn damage(mut self, description: impl Into<String>, amount: Money) -> Self {
        self.damages.push(DamageItemDraft::new(description, amount));
        self
    }

    pub fn refund_method(mut self, method: RefundMethod) -> Self {
        self.refund_method = Some(method);
        self
    }

    pub fn attached_to(mut self, key: YearMonth) -> Self {
        self.attached_to = Some(key);
        self
    }
}

/// final reconciliation of deposits against unpaid rent and damages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositSettlement {
    pub status: SettlementStatus,
    pub deposits: DepositSnapshot,
    pub unpaid_balances: Money,
    pub damages: Vec<DamageItem>,
    pub net: Money,
    pub refund_method: Option<RefundMethod>,
    pub settled_on: NaiveDate,
    pub attached_to: Option<YearMonth>,
}

impl DepositSettlement {
    /// validate a request and compute the net against the given unpaid balance
    pub fn prepare(request: SettlementRequest, unpaid: Money) -> Result<Self> {
        let damages = request
            .damages
            .iter()
            .enumerate()
            .filter(|(_, draft)| !draft.is_blank())
            .map(|(index, draft)| draft.validate(index))
            .collect::<Result<Vec<_>>>()?;

        let net = settlement_net(request.deposits.received, unpaid, &damages);

        if request.status == SettlementStatus::Settled && net.is_positive() && request.refund_method.is_none() {
            return Err(LeaseError::InvalidSettlement {
                reason: format!("a refund method is required to settle a refund of {}", net),
            });
        }

        info!(
            status = ?request.status,
            received = %request.deposits.received,
            unpaid = %unpaid,
            damages = damages.len(),
            net = %net,
            "deposit settlement prepared"
        );

        Ok(Self {
            status: request.status,
            deposits: request.deposits,
            unpaid_balances: unpaid,
            damages,
            net,
            refund_method: request.refund_method,
            settled_on: request.settled_on,
            attached_to: request.attached_to,
        })
    }

    pub fn damages_total(&self) -> Money {
        self.damages.iter().map(|d| d.amount).sum()
    }

    /// amount returned to the tenant
    pub fn refund_due(&self) -> Money {
        self.net.non_negative()
    }

    /// amount the tenant still owes after the deposits are used up
    pub fn balance_due(&self) -> Money {
        (-self.net).non_negative()
    }

    pub fn is_settled(&self) -> bool {
        self.status == SettlementStatus::Settled
    }
}
