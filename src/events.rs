use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{LeaseId, NoticeMethodKind, SettlementStatus, YearMonth};

/// all events that can be emitted by a lease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LeaseEvent {
    // schedule events
    ScheduleGenerated {
        lease_id: LeaseId,
        months: u32,
        timestamp: DateTime<Utc>,
    },
    ScheduleRegenerated {
        lease_id: LeaseId,
        months: u32,
        dropped: Vec<YearMonth>,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        lease_id: LeaseId,
        month: YearMonth,
        payment_id: Uuid,
        amount: Money,
        paid_on: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    PaymentRemoved {
        lease_id: LeaseId,
        month: YearMonth,
        payment_id: Uuid,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    MonthFinalized {
        lease_id: LeaseId,
        month: YearMonth,
        paid_on: NaiveDate,
        timestamp: DateTime<Utc>,
    },

    // adjustment and fee events
    AdjustmentAdded {
        lease_id: LeaseId,
        month: YearMonth,
        amount: Money,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    AdjustmentRemoved {
        lease_id: LeaseId,
        month: YearMonth,
        amount: Money,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    LateFeeAssessed {
        lease_id: LeaseId,
        month: YearMonth,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    LateFeeWaiverChanged {
        lease_id: LeaseId,
        month: YearMonth,
        waived: bool,
        timestamp: DateTime<Utc>,
    },

    // notice events
    NoticeServed {
        lease_id: LeaseId,
        month: YearMonth,
        posted_on: NaiveDate,
        duration_days: u32,
        timestamp: DateTime<Utc>,
    },
    NoticeMethodAdded {
        lease_id: LeaseId,
        month: YearMonth,
        kind: NoticeMethodKind,
        date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    NoticeWithdrawn {
        lease_id: LeaseId,
        month: YearMonth,
        timestamp: DateTime<Utc>,
    },

    // deposit events
    DepositReceived {
        lease_id: LeaseId,
        amount: Money,
        total_received: Money,
        timestamp: DateTime<Utc>,
    },
    SigningPaymentApplied {
        lease_id: LeaseId,
        amount: Money,
        to_deposits: Money,
        to_rent: Money,
        excess: Money,
        timestamp: DateTime<Utc>,
    },
    DepositSettled {
        lease_id: LeaseId,
        status: SettlementStatus,
        net: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<LeaseEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: LeaseEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LeaseEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LeaseEvent] {
        &self.events
    }
}
