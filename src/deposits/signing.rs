use serde::{Deserialize, Serialize};

use crate::config::LeaseConfig;
use crate::decimal::Money;
use crate::errors::{LeaseError, Result};

/// obligation collected at lease signing, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningItemKind {
    SecurityDeposit,
    PetDeposit,
    FirstMonth,
    LastMonth,
}

impl SigningItemKind {
    pub fn is_deposit(&self) -> bool {
        matches!(self, SigningItemKind::SecurityDeposit | SigningItemKind::PetDeposit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningItem {
    pub kind: SigningItemKind,
    pub amount: Money,
}

/// what the tenant owes at signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningBreakdown {
    pub items: Vec<SigningItem>,
    pub total: Money,
}

impl SigningBreakdown {
    pub fn amount_for(&self, kind: SigningItemKind) -> Money {
        self.items
            .iter()
            .filter(|item| item.kind == kind)
            .map(|item| item.amount)
            .sum()
    }
}

/// how one signing payment was split across the obligations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningAllocation {
    pub applied: Vec<SigningItem>,
    /// left over after every obligation was covered
    pub excess: Money,
    /// still owed after the payment ran out
    pub shortfall: Money,
}

impl SigningAllocation {
    pub fn applied_to(&self, kind: SigningItemKind) -> Money {
        self.applied
            .iter()
            .filter(|item| item.kind == kind)
            .map(|item| item.amount)
            .sum()
    }

    pub fn deposits_applied(&self) -> Money {
        self.applied
            .iter()
            .filter(|item| item.kind.is_deposit())
            .map(|item| item.amount)
            .sum()
    }

    pub fn total_applied(&self) -> Money {
        self.applied.iter().map(|item| item.amount).sum()
    }
}

/// obligations flagged due at signing; zero amounts are left out
///
/// Prepaid rent needs a month to land on: a zero-month term has no first
/// month and a one-month term has no separate last month.
pub fn signing_obligations(config: &LeaseConfig) -> SigningBreakdown {
    let terms = config.signing;
    let candidates = [
        (terms.security_deposit_due, SigningItemKind::SecurityDeposit, config.security_deposit),
        (terms.pet_deposit_due, SigningItemKind::PetDeposit, config.pet_deposit),
        (
            terms.first_month_due && config.months > 0,
            SigningItemKind::FirstMonth,
            config.monthly_charge(),
        ),
        (
            terms.last_month_due && config.months > 1,
            SigningItemKind::LastMonth,
            config.monthly_charge(),
        ),
    ];

    let items: Vec<SigningItem> = candidates
        .into_iter()
        .filter(|(due, _, amount)| *due && amount.is_positive())
        .map(|(_, kind, amount)| SigningItem { kind, amount })
        .collect();
    let total = items.iter().map(|item| item.amount).sum();

    SigningBreakdown { items, total }
}

/// apply a single signing payment: deposits first, then prepaid rent
pub fn allocate_signing_payment(breakdown: &SigningBreakdown, amount: Money) -> Result<SigningAllocation> {
    if !amount.is_positive() {
        return Err(LeaseError::payment(format!(
            "signing payment must be greater than zero, got {}",
            amount
        )));
    }

    let mut ordered = breakdown.items.clone();
    ordered.sort_by_key(|item| item.kind);

    let mut remaining = amount;
    let mut applied = Vec::new();
    for item in ordered {
        if remaining.is_zero() {
            break;
        }
        let portion = remaining.min(item.amount);
        remaining -= portion;
        applied.push(SigningItem {
            kind: item.kind,
            amount: portion,
        });
    }

    let covered: Money = applied.iter().map(|item| item.amount).sum();
    Ok(SigningAllocation {
        applied,
        excess: remaining,
        shortfall: (breakdown.total - covered).non_negative(),
    })
}
