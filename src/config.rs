use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::{Money, Rate};
use crate::errors::{LeaseError, Result};

/// lease financial configuration
///
/// A configuration is fixed for the lifetime of one edit: changing it means
/// regenerating the schedule and merging the old history back in (see
/// [`crate::schedule::merge_schedule`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseConfig {
    pub start_date: NaiveDate,
    /// term length in months; zero is a valid, empty term
    pub months: u32,
    /// day of month rent is due, clamped per month (1..=31)
    pub due_day: u32,
    pub monthly_rent: Money,
    #[serde(default)]
    pub pet_rent_enabled: bool,
    #[serde(default)]
    pub pet_rent_amount: Money,
    #[serde(default)]
    pub security_deposit: Money,
    /// keeps `security_deposit` equal to `monthly_rent`
    #[serde(default)]
    pub security_deposit_equals_rent: bool,
    #[serde(default)]
    pub pet_deposit: Money,
    #[serde(default)]
    pub first_month_prepaid: bool,
    #[serde(default)]
    pub last_month_prepaid: bool,
    #[serde(default)]
    pub first_month_payment: Option<PrepaidPayment>,
    #[serde(default)]
    pub last_month_payment: Option<PrepaidPayment>,
    #[serde(default)]
    pub grace_days: u32,
    #[serde(default)]
    pub late_fee_policy: LateFeePolicy,
    #[serde(default)]
    pub other_charges: Vec<OtherCharge>,
    #[serde(default)]
    pub signing: SigningTerms,
}

/// late fee policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LateFeePolicy {
    /// fixed amount per late month
    Flat(Money),
    /// share of the month's base rent
    Percent(Rate),
}

impl Default for LateFeePolicy {
    fn default() -> Self {
        LateFeePolicy::Flat(Money::ZERO)
    }
}

impl LateFeePolicy {
    /// percentage policy from a percent value (5 = 5% of base rent)
    pub fn percent(percent: Decimal) -> Self {
        LateFeePolicy::Percent(Rate::from_percent(percent))
    }

    /// fee charged against a month with the given base rent
    pub fn fee_for(&self, base_rent: Money) -> Money {
        match self {
            LateFeePolicy::Flat(amount) => *amount,
            LateFeePolicy::Percent(rate) => base_rent.percentage(rate.as_percentage()),
        }
    }

    fn is_negative(&self) -> bool {
        match self {
            LateFeePolicy::Flat(amount) => amount.is_negative(),
            LateFeePolicy::Percent(rate) => rate.is_negative(),
        }
    }
}

/// recurring monthly charge on top of rent (parking, utilities, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherCharge {
    pub name: String,
    pub amount: Money,
}

/// payment collected up front for the first or last month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaidPayment {
    /// without a date nothing is seeded into the schedule
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// defaults to the full monthly charge
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub method: Option<String>,
}

/// which obligations are collected when the lease is signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SigningTerms {
    #[serde(default)]
    pub security_deposit_due: bool,
    #[serde(default)]
    pub pet_deposit_due: bool,
    #[serde(default)]
    pub first_month_due: bool,
    #[serde(default)]
    pub last_month_due: bool,
}

impl LeaseConfig {
    pub fn builder() -> LeaseConfigBuilder {
        LeaseConfigBuilder::new()
    }

    /// typical residential lease: rent due on the 1st, five grace days,
    /// $50 flat late fee and a security deposit of one month's rent
    pub fn standard_residential(start_date: NaiveDate, months: u32, monthly_rent: Money) -> Result<Self> {
        LeaseConfigBuilder::new()
            .start_date(start_date)
            .months(months)
            .monthly_rent(monthly_rent)
            .due_day(1)
            .grace_days(5)
            .late_fee_policy(LateFeePolicy::Flat(Money::from_major(50)))
            .security_deposit_equals_rent(true)
            .signing(SigningTerms {
                security_deposit_due: true,
                pet_deposit_due: true,
                first_month_due: true,
                last_month_due: false,
            })
            .build()
    }

    /// parse and validate a configuration from json
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LeaseConfig = serde_json::from_str(json)?;
        config.validated()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// apply derived fields, then validate
    pub fn validated(mut self) -> Result<Self> {
        if self.security_deposit_equals_rent && self.security_deposit != self.monthly_rent {
            debug!(
                rent = %self.monthly_rent,
                deposit = %self.security_deposit,
                "mirroring security deposit to monthly rent"
            );
            self.security_deposit = self.monthly_rent;
        }
        self.validate()?;
        Ok(self)
    }

    /// check ranges and invariants without modifying anything
    pub fn validate(&self) -> Result<()> {
        if !(1..=31).contains(&self.due_day) {
            return Err(LeaseError::config(format!(
                "due day must be between 1 and 31, got {}",
                self.due_day
            )));
        }
        if self.monthly_rent.is_negative() {
            return Err(LeaseError::config("monthly rent cannot be negative"));
        }
        if self.pet_rent_amount.is_negative() {
            return Err(LeaseError::config("pet rent cannot be negative"));
        }
        if self.security_deposit.is_negative() || self.pet_deposit.is_negative() {
            return Err(LeaseError::config("deposits cannot be negative"));
        }
        if self.security_deposit_equals_rent && self.security_deposit != self.monthly_rent {
            return Err(LeaseError::config(
                "security deposit must equal monthly rent when tied to rent",
            ));
        }
        if self.late_fee_policy.is_negative() {
            return Err(LeaseError::config("late fee cannot be negative"));
        }
        for charge in &self.other_charges {
            if charge.name.trim().is_empty() {
                return Err(LeaseError::config("other charges need a name"));
            }
            if charge.amount.is_negative() {
                return Err(LeaseError::config(format!(
                    "other charge {:?} cannot be negative",
                    charge.name
                )));
            }
        }
        for prepaid in [&self.first_month_payment, &self.last_month_payment].into_iter().flatten() {
            if prepaid.amount.is_some_and(|amount| !amount.is_positive()) {
                return Err(LeaseError::config("prepaid amount must be positive"));
            }
        }
        Ok(())
    }

    /// monthly pet rent; only the explicit flag and amount count
    pub fn pet_rent(&self) -> Money {
        if self.pet_rent_enabled {
            self.pet_rent_amount
        } else {
            Money::ZERO
        }
    }

    pub fn other_charges_total(&self) -> Money {
        self.other_charges.iter().map(|c| c.amount).sum()
    }

    /// everything billed for a regular month: rent, pet rent and other charges
    pub fn monthly_charge(&self) -> Money {
        self.monthly_rent + self.pet_rent() + self.other_charges_total()
    }

    pub fn deposits_expected(&self) -> Money {
        self.security_deposit + self.pet_deposit
    }
}

/// builder for lease configurations
#[derive(Debug, Default)]
pub struct LeaseConfigBuilder {
    start_date: Option<NaiveDate>,
    months: Option<u32>,
    due_day: Option<u32>,
    monthly_rent: Option<Money>,
    pet_rent: Option<Money>,
    security_deposit: Option<Money>,
    security_deposit_equals_rent: bool,
    pet_deposit: Option<Money>,
    first_month_payment: Option<(bool, Option<PrepaidPayment>)>,
    last_month_payment: Option<(bool, Option<PrepaidPayment>)>,
    grace_days: Option<u32>,
    late_fee_policy: Option<LateFeePolicy>,
    other_charges: Vec<OtherCharge>,
    signing: Option<SigningTerms>,
}

impl LeaseConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn months(mut self, months: u32) -> Self {
        self.months = Some(months);
        self
    }

    pub fn due_day(mut self, day: u32) -> Self {
        self.due_day = Some(day);
        self
    }

    pub fn monthly_rent(mut self, rent: Money) -> Self {
        self.monthly_rent = Some(rent);
        self
    }

    /// enable pet rent with the given monthly amount
    pub fn pet_rent(mut self, amount: Money) -> Self {
        self.pet_rent = Some(amount);
        self
    }

    pub fn security_deposit(mut self, amount: Money) -> Self {
        self.security_deposit = Some(amount);
        self
    }

    pub fn security_deposit_equals_rent(mut self, equals: bool) -> Self {
        self.security_deposit_equals_rent = equals;
        self
    }

    pub fn pet_deposit(mut self, amount: Money) -> Self {
        self.pet_deposit = Some(amount);
        self
    }

    /// mark the first month prepaid, optionally with the payment that covered it
    pub fn first_month_prepaid(mut self, payment: Option<PrepaidPayment>) -> Self {
        self.first_month_payment = Some((true, payment));
        self
    }

    /// mark the last month prepaid, optionally with the payment that covered it
    pub fn last_month_prepaid(mut self, payment: Option<PrepaidPayment>) -> Self {
        self.last_month_payment = Some((true, payment));
        self
    }

    pub fn grace_days(mut self, days: u32) -> Self {
        self.grace_days = Some(days);
        self
    }

    pub fn late_fee_policy(mut self, policy: LateFeePolicy) -> Self {
        self.late_fee_policy = Some(policy);
        self
    }

    pub fn other_charge(mut self, name: impl Into<String>, amount: Money) -> Self {
        self.other_charges.push(OtherCharge {
            name: name.into(),
            amount,
        });
        self
    }

    pub fn signing(mut self, terms: SigningTerms) -> Self {
        self.signing = Some(terms);
        self
    }

    pub fn build(self) -> Result<LeaseConfig> {
        let start_date = self
            .start_date
            .ok_or_else(|| LeaseError::config("start date is required"))?;
        let months = self
            .months
            .ok_or_else(|| LeaseError::config("term length is required"))?;
        let monthly_rent = self
            .monthly_rent
            .ok_or_else(|| LeaseError::config("monthly rent is required"))?;

        let (first_month_prepaid, first_month_payment) = self.first_month_payment.unwrap_or((false, None));
        let (last_month_prepaid, last_month_payment) = self.last_month_payment.unwrap_or((false, None));

        LeaseConfig {
            start_date,
            months,
            due_day: self.due_day.unwrap_or(1),
            monthly_rent,
            pet_rent_enabled: self.pet_rent.is_some(),
            pet_rent_amount: self.pet_rent.unwrap_or(Money::ZERO),
            security_deposit: self.security_deposit.unwrap_or(Money::ZERO),
            security_deposit_equals_rent: self.security_deposit_equals_rent,
            pet_deposit: self.pet_deposit.unwrap_or(Money::ZERO),
            first_month_prepaid,
            last_month_prepaid,
            first_month_payment,
            last_month_payment,
            grace_days: self.grace_days.unwrap_or(0),
            late_fee_policy: self.late_fee_policy.unwrap_or_default(),
            other_charges: self.other_charges,
            signing: self.signing.unwrap_or_default(),
        }
        .validated()
    }
}
