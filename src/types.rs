use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::LeaseError;

/// unique identifier for a lease
pub type LeaseId = Uuid;

/// calendar month used as the stable identity of a schedule row
///
/// Serialized as `"YYYY-MM"`. Parsing accepts any ISO date and keeps its first
/// seven characters, so `"2025-03-01"` and `"2025-03"` name the same month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, LeaseError> {
        if !(1..=12).contains(&month) {
            return Err(LeaseError::InvalidDate {
                message: format!("month {} out of range", month),
            });
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// the month `offset` months after this one
    pub fn plus_months(&self, offset: u32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + offset as i64;
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = LeaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LeaseError::InvalidDate {
            message: format!("expected YYYY-MM, got {:?}", s),
        };
        let head = s.trim().get(..7).ok_or_else(invalid)?;
        let (year, month) = head.split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        YearMonth::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = LeaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// two-value payment summary of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowState {
    Paid,
    Unpaid,
}

/// traffic-light classification of a period's payment health
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeverColor {
    /// paid, or not yet due
    Green,
    /// past due but within the grace period
    Yellow,
    /// past grace, no notice served
    Orange,
    /// notice served and running
    Red,
    /// notice period elapsed with a balance still owed
    Black,
    /// not enough information to classify
    Gray,
}

impl FeverColor {
    pub const ALL: [FeverColor; 6] = [
        FeverColor::Green,
        FeverColor::Yellow,
        FeverColor::Orange,
        FeverColor::Red,
        FeverColor::Black,
        FeverColor::Gray,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FeverColor::Green => "on time",
            FeverColor::Yellow => "within grace",
            FeverColor::Orange => "late",
            FeverColor::Red => "notice given",
            FeverColor::Black => "beyond notice",
            FeverColor::Gray => "unknown",
        }
    }
}

/// how a notice was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeMethodKind {
    CertifiedMail,
    Posting,
    Email,
}

/// deposit settlement outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// reconciliation done, refund or balance due is final
    Settled,
    /// recorded but final accounting postponed
    Deferred,
}

/// how a deposit refund is returned to the tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundMethod {
    Check,
    BankTransfer,
    Cash,
    Other(String),
}
