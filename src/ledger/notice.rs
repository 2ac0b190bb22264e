use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::add_days;
use crate::types::NoticeMethodKind;

/// notice to pay or quit served for one month
///
/// The notice period runs from the latest delivery date, so recording a later
/// delivery can only move `start()` forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub posted_on: NaiveDate,
    pub duration_days: u32,
    #[serde(default)]
    pub methods: Vec<NoticeMethod>,
}

/// one delivery of a notice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeMethod {
    pub kind: NoticeMethodKind,
    pub date: NaiveDate,
    /// tracking number, photo reference, message id...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<String>,
}

impl NoticeMethod {
    pub fn new(kind: NoticeMethodKind, date: NaiveDate) -> Self {
        Self {
            kind,
            date,
            proof: None,
        }
    }

    pub fn with_proof(mut self, proof: impl Into<String>) -> Self {
        self.proof = Some(proof.into());
        self
    }
}

impl Notice {
    pub fn new(posted_on: NaiveDate, duration_days: u32) -> Self {
        Self {
            posted_on,
            duration_days,
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: NoticeMethod) -> Self {
        self.add_method(method);
        self
    }

    pub fn add_method(&mut self, method: NoticeMethod) {
        self.methods.push(method);
    }

    /// latest of the posting date and every delivery date
    pub fn start(&self) -> NaiveDate {
        self.methods
            .iter()
            .map(|m| m.date)
            .fold(self.posted_on, |latest, d| latest.max(d))
    }

    pub fn end(&self) -> NaiveDate {
        add_days(self.start(), self.duration_days)
    }

    /// notice period has started and not yet run out
    pub fn is_running_on(&self, today: NaiveDate) -> bool {
        today >= self.start() && today <= self.end()
    }

    pub fn has_expired_on(&self, today: NaiveDate) -> bool {
        today > self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_is_latest_delivery() {
        let notice = Notice::new(date(2025, 2, 10), 3)
            .with_method(NoticeMethod::new(NoticeMethodKind::Posting, date(2025, 2, 10)))
            .with_method(
                NoticeMethod::new(NoticeMethodKind::CertifiedMail, date(2025, 2, 12)).with_proof("9400 1000 0000"),
            );

        assert_eq!(notice.start(), date(2025, 2, 12));
        assert_eq!(notice.end(), date(2025, 2, 15));
    }

    #[test]
    fn test_start_is_monotonic() {
        let mut notice = Notice::new(date(2025, 2, 10), 14);
        notice.add_method(NoticeMethod::new(NoticeMethodKind::Email, date(2025, 2, 20)));
        let after_late_method = notice.start();

        // an earlier delivery never pulls the start back
        notice.add_method(NoticeMethod::new(NoticeMethodKind::Posting, date(2025, 2, 1)));
        assert_eq!(notice.start(), after_late_method);
        assert!(notice.start() >= notice.posted_on);
    }

    #[test]
    fn test_running_window() {
        let notice = Notice::new(date(2025, 3, 1), 3);
        assert!(!notice.is_running_on(date(2025, 2, 28)));
        assert!(notice.is_running_on(date(2025, 3, 1)));
        assert!(notice.is_running_on(date(2025, 3, 4)));
        assert!(notice.has_expired_on(date(2025, 3, 5)));
    }
}
