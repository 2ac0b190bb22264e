//! Serializable views of a lease for reports and indicators.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LeaseConfig;
use crate::decimal::{Money, Rate};
use crate::deposits::DepositSnapshot;
use crate::errors::Result;
use crate::lease::Lease;
use crate::ledger::ScheduleRow;
use crate::status::{compute_row_totals, fever_status_for_row};
use crate::types::{FeverColor, LeaseId, RowState, YearMonth};

/// one schedule month as shown in the ledger table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowView {
    pub key: YearMonth,
    pub period_label: String,
    pub due_date: NaiveDate,
    pub expected: Money,
    pub received: Money,
    pub balance: Money,
    pub state: RowState,
    pub fever: FeverColor,
    pub tooltip: String,
    pub late_fee: Money,
    pub late_fee_waived: bool,
    pub final_paid_at: Option<NaiveDate>,
}

impl RowView {
    pub fn from_row(row: &ScheduleRow, config: &LeaseConfig, today: NaiveDate) -> Self {
        let totals = compute_row_totals(row, config);
        let fever = fever_status_for_row(row, config, today);

        RowView {
            key: row.key,
            period_label: row.period_label.clone(),
            due_date: row.due_date,
            expected: totals.expected,
            received: totals.received_total,
            balance: totals.balance,
            state: totals.state,
            fever: fever.color,
            tooltip: fever.tooltip,
            late_fee: row.late_fee,
            late_fee_waived: row.late_fee_waived,
            final_paid_at: fever.final_paid_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCount {
    pub color: FeverColor,
    pub count: u32,
}

/// headline numbers across the whole term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseKpis {
    pub total_expected: Money,
    pub total_received: Money,
    /// unpaid across every month, overpayments not netted
    pub total_outstanding: Money,
    /// unpaid on months whose due date has passed
    pub past_due: Money,
    pub colors: Vec<ColorCount>,
    /// months due on or before the reporting date
    pub months_due: u32,
    pub months_paid_on_time: u32,
    pub on_time_rate: Rate,
}

impl LeaseKpis {
    pub fn from_rows(views: &[RowView], today: NaiveDate) -> Self {
        let due: Vec<&RowView> = views.iter().filter(|v| v.due_date <= today).collect();
        let months_due = due.len() as u32;
        let months_paid_on_time = due
            .iter()
            .filter(|v| v.final_paid_at.is_some_and(|paid| paid <= v.due_date))
            .count() as u32;

        let on_time_rate = if months_due == 0 {
            Rate::ZERO
        } else {
            Rate::from_decimal(Decimal::from(months_paid_on_time) / Decimal::from(months_due))
        };

        let colors = FeverColor::ALL
            .iter()
            .map(|color| ColorCount {
                color: *color,
                count: views.iter().filter(|v| v.fever == *color).count() as u32,
            })
            .collect();

        LeaseKpis {
            total_expected: views.iter().map(|v| v.expected).sum(),
            total_received: views.iter().map(|v| v.received).sum(),
            total_outstanding: views.iter().map(|v| v.balance.non_negative()).sum(),
            past_due: views
                .iter()
                .filter(|v| v.due_date < today)
                .map(|v| v.balance.non_negative())
                .sum(),
            colors,
            months_due,
            months_paid_on_time,
            on_time_rate,
        }
    }

    pub fn count_of(&self, color: FeverColor) -> u32 {
        self.colors
            .iter()
            .find(|c| c.color == color)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

/// serializable view of a lease as of one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseSummary {
    pub lease_id: LeaseId,
    pub as_of: NaiveDate,
    pub start_date: NaiveDate,
    pub months: u32,
    pub monthly_charge: Money,
    pub rows: Vec<RowView>,
    pub kpis: LeaseKpis,
    pub deposits: DepositSnapshot,
    pub settlement_net: Option<Money>,
}

impl LeaseSummary {
    pub fn from_lease(lease: &Lease, today: NaiveDate) -> Self {
        let rows: Vec<RowView> = lease
            .rows
            .iter()
            .map(|row| RowView::from_row(row, &lease.config, today))
            .collect();
        let kpis = LeaseKpis::from_rows(&rows, today);

        LeaseSummary {
            lease_id: lease.id,
            as_of: today,
            start_date: lease.config.start_date,
            months: lease.config.months,
            monthly_charge: lease.config.monthly_charge(),
            rows,
            kpis,
            deposits: lease.deposits(),
            settlement_net: lease.settlement.as_ref().map(|s| s.net),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::PaymentDraft;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lease_with_history() -> (Lease, SafeTimeProvider) {
        let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2025, 4, 3, 9, 0, 0).unwrap()));
        let config = LeaseConfig::builder()
            .start_date(date(2025, 1, 1))
            .months(6)
            .monthly_rent(Money::from_major(1_000))
            .grace_days(5)
            .build()
            .unwrap();
        let mut lease = Lease::new(config, &time).unwrap();

        let paid = [(0, date(2024, 12, 30)), (1, date(2025, 2, 10))];
        for (index, paid_on) in paid {
            let key = lease.rows[index].key;
            lease
                .record_payment(key, PaymentDraft::new(Money::from_major(1_000), paid_on), &time)
                .unwrap();
        }
        let march = lease.rows[2].key;
        lease
            .record_payment(march, PaymentDraft::new(Money::from_major(400), date(2025, 3, 1)), &time)
            .unwrap();

        (lease, time)
    }

    #[test]
    fn test_kpis() {
        let (lease, time) = lease_with_history();
        let summary = lease.summary(&time);
        let kpis = &summary.kpis;

        assert_eq!(kpis.total_expected, Money::from_major(6_000));
        assert_eq!(kpis.total_received, Money::from_major(2_400));
        assert_eq!(kpis.total_outstanding, Money::from_major(3_600));
        assert_eq!(kpis.past_due, Money::from_major(1_600));
        assert_eq!(kpis.months_due, 4);
        assert_eq!(kpis.months_paid_on_time, 1);
        assert_eq!(kpis.on_time_rate, Rate::from_decimal(dec!(0.25)));

        // jan, feb paid; mar late; apr within grace; may, jun not yet due
        assert_eq!(kpis.count_of(FeverColor::Green), 4);
        assert_eq!(kpis.count_of(FeverColor::Orange), 1);
        assert_eq!(kpis.count_of(FeverColor::Yellow), 1);
    }

    #[test]
    fn test_row_views() {
        let (lease, time) = lease_with_history();
        let summary = lease.summary(&time);

        let feb = &summary.rows[1];
        assert_eq!(feb.state, RowState::Paid);
        assert_eq!(feb.final_paid_at, Some(date(2025, 2, 10)));
        assert!(feb.tooltip.starts_with("Paid late"));

        let march = &summary.rows[2];
        assert_eq!(march.balance, Money::from_major(600));
        assert_eq!(march.fever, FeverColor::Orange);
    }

    #[test]
    fn test_json_output() {
        let (lease, time) = lease_with_history();
        let json = lease.summary(&time).to_json_pretty().unwrap();

        assert!(json.contains("\"as_of\": \"2025-04-03\""));
        assert!(json.contains("\"key\": \"2025-03\""));
        assert!(json.contains("\"fever\": \"orange\""));

        let parsed: LeaseSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rows.len(), 6);
    }
}
