use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::info;
use uuid::Uuid;

use crate::config::LeaseConfig;
use crate::decimal::Money;
use crate::deposits::{
    allocate_signing_payment, compute_unpaid, signing_obligations, DepositSettlement, DepositSnapshot,
    SettlementRequest, SigningAllocation, SigningItemKind,
};
use crate::errors::{LeaseError, Result};
use crate::events::{EventStore, LeaseEvent};
use crate::ledger::{normalize_rows, Adjustment, Notice, NoticeMethod, Payment, PaymentDraft, ScheduleRow};
use crate::schedule::{generate_lease_schedule, merge_schedule};
use crate::status::{
    compute_row_totals, fever_status_for_row, finalize_month_if_paid, maybe_apply_late_fee, FeverStatus,
    RowTotals,
};
use crate::summary::LeaseSummary;
use crate::types::{LeaseId, SettlementStatus, YearMonth};

/// a lease with its schedule, deposits and event log
///
/// Every command that depends on the calendar takes a [`SafeTimeProvider`];
/// the `*_now` variants use the system clock.
pub struct Lease {
    pub id: LeaseId,
    pub config: LeaseConfig,
    pub rows: Vec<ScheduleRow>,
    pub deposit_receipts: Vec<Payment>,
    pub settlement: Option<DepositSettlement>,
    pub events: EventStore,
}

fn today(time_provider: &SafeTimeProvider) -> NaiveDate {
    time_provider.now().date_naive()
}

impl Lease {
    /// create a lease and generate its schedule
    pub fn new(config: LeaseConfig, time_provider: &SafeTimeProvider) -> Result<Self> {
        let config = config.validated()?;
        let rows = generate_lease_schedule(&config)?;
        let id = Uuid::new_v4();

        let mut lease = Self {
            id,
            config,
            rows,
            deposit_receipts: Vec::new(),
            settlement: None,
            events: EventStore::new(),
        };

        lease.events.emit(LeaseEvent::ScheduleGenerated {
            lease_id: id,
            months: lease.config.months,
            timestamp: time_provider.now(),
        });
        info!(lease_id = %id, months = lease.config.months, rent = %lease.config.monthly_rent, "lease created");

        Ok(lease)
    }

    /// rebuild a lease from stored state; duplicated payments are dropped
    pub fn restore(id: LeaseId, config: LeaseConfig, rows: &[ScheduleRow]) -> Result<Self> {
        Ok(Self {
            id,
            config: config.validated()?,
            rows: normalize_rows(rows),
            deposit_receipts: Vec::new(),
            settlement: None,
            events: EventStore::new(),
        })
    }

    pub fn row(&self, key: YearMonth) -> Result<&ScheduleRow> {
        self.rows
            .iter()
            .find(|row| row.key == key)
            .ok_or(LeaseError::RowNotFound { key })
    }

    fn row_mut(&mut self, key: YearMonth) -> Result<&mut ScheduleRow> {
        self.rows
            .iter_mut()
            .find(|row| row.key == key)
            .ok_or(LeaseError::RowNotFound { key })
    }

    /// record a payment against a month, finalizing it if now fully paid
    pub fn record_payment(
        &mut self,
        key: YearMonth,
        draft: PaymentDraft,
        time_provider: &SafeTimeProvider,
    ) -> Result<Uuid> {
        let payment = draft.validate()?;
        let (payment_id, amount, paid_on) = (payment.id, payment.amount, payment.date);

        self.row_mut(key)?.add_payment(payment)?;

        self.events.emit(LeaseEvent::PaymentRecorded {
            lease_id: self.id,
            month: key,
            payment_id,
            amount,
            paid_on,
            timestamp: time_provider.now(),
        });
        self.finalize_row(key, time_provider)?;

        Ok(payment_id)
    }

    /// record payment with system time
    pub fn record_payment_now(&mut self, key: YearMonth, draft: PaymentDraft) -> Result<Uuid> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.record_payment(key, draft, &time)
    }

    /// remove a payment; a finalized month is reopened
    pub fn remove_payment(
        &mut self,
        key: YearMonth,
        payment_id: Uuid,
        time_provider: &SafeTimeProvider,
    ) -> Result<Payment> {
        let removed = self.row_mut(key)?.remove_payment(payment_id)?;

        self.events.emit(LeaseEvent::PaymentRemoved {
            lease_id: self.id,
            month: key,
            payment_id,
            amount: removed.amount,
            timestamp: time_provider.now(),
        });

        Ok(removed)
    }

    pub fn add_adjustment(
        &mut self,
        key: YearMonth,
        adjustment: Adjustment,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let (amount, reason) = (adjustment.amount, adjustment.reason.clone());
        self.row_mut(key)?.add_adjustment(adjustment)?;

        self.events.emit(LeaseEvent::AdjustmentAdded {
            lease_id: self.id,
            month: key,
            amount,
            reason,
            timestamp: time_provider.now(),
        });
        self.finalize_row(key, time_provider)
    }

    pub fn remove_adjustment(
        &mut self,
        key: YearMonth,
        index: usize,
        time_provider: &SafeTimeProvider,
    ) -> Result<Adjustment> {
        let removed = self.row_mut(key)?.remove_adjustment(index)?;

        self.events.emit(LeaseEvent::AdjustmentRemoved {
            lease_id: self.id,
            month: key,
            amount: removed.amount,
            reason: removed.reason.clone(),
            timestamp: time_provider.now(),
        });
        self.finalize_row(key, time_provider)?;

        Ok(removed)
    }

    pub fn set_late_fee_waived(
        &mut self,
        key: YearMonth,
        waived: bool,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.row_mut(key)?.set_late_fee_waived(waived);

        self.events.emit(LeaseEvent::LateFeeWaiverChanged {
            lease_id: self.id,
            month: key,
            waived,
            timestamp: time_provider.now(),
        });
        self.finalize_row(key, time_provider)
    }

    pub fn serve_notice(&mut self, key: YearMonth, notice: Notice, time_provider: &SafeTimeProvider) -> Result<()> {
        let (posted_on, duration_days) = (notice.posted_on, notice.duration_days);
        self.row_mut(key)?.serve_notice(notice);

        self.events.emit(LeaseEvent::NoticeServed {
            lease_id: self.id,
            month: key,
            posted_on,
            duration_days,
            timestamp: time_provider.now(),
        });
        info!(lease_id = %self.id, month = %key, posted_on = %posted_on, days = duration_days, "notice served");

        Ok(())
    }

    pub fn add_notice_method(
        &mut self,
        key: YearMonth,
        method: NoticeMethod,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let (kind, date) = (method.kind, method.date);
        self.row_mut(key)?.add_notice_method(method)?;

        self.events.emit(LeaseEvent::NoticeMethodAdded {
            lease_id: self.id,
            month: key,
            kind,
            date,
            timestamp: time_provider.now(),
        });

        Ok(())
    }

    pub fn withdraw_notice(&mut self, key: YearMonth, time_provider: &SafeTimeProvider) -> Result<Option<Notice>> {
        let withdrawn = self.row_mut(key)?.withdraw_notice();

        if withdrawn.is_some() {
            self.events.emit(LeaseEvent::NoticeWithdrawn {
                lease_id: self.id,
                month: key,
                timestamp: time_provider.now(),
            });
        }

        Ok(withdrawn)
    }

    /// bring late fees and finalization up to date on every open month
    pub fn refresh(&mut self, time_provider: &SafeTimeProvider) {
        let today = today(time_provider);
        let now = time_provider.now();

        for row in self.rows.iter_mut().filter(|row| !row.is_finalized()) {
            let updated = maybe_apply_late_fee(row, &self.config, today);
            if row.late_fee.is_zero() && updated.late_fee.is_positive() {
                self.events.emit(LeaseEvent::LateFeeAssessed {
                    lease_id: self.id,
                    month: row.key,
                    amount: updated.late_fee,
                    timestamp: now,
                });
            }

            let updated = finalize_month_if_paid(&updated, &self.config);
            if let Some(paid_on) = updated.finalized {
                self.events.emit(LeaseEvent::MonthFinalized {
                    lease_id: self.id,
                    month: row.key,
                    paid_on,
                    timestamp: now,
                });
            }
            *row = updated;
        }
    }

    /// refresh with system time
    pub fn refresh_now(&mut self) {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.refresh(&time)
    }

    fn finalize_row(&mut self, key: YearMonth, time_provider: &SafeTimeProvider) -> Result<()> {
        let index = self
            .rows
            .iter()
            .position(|row| row.key == key)
            .ok_or(LeaseError::RowNotFound { key })?;
        if self.rows[index].is_finalized() {
            return Ok(());
        }

        let updated = finalize_month_if_paid(&self.rows[index], &self.config);
        if let Some(paid_on) = updated.finalized {
            self.rows[index] = updated;
            self.events.emit(LeaseEvent::MonthFinalized {
                lease_id: self.id,
                month: key,
                paid_on,
                timestamp: time_provider.now(),
            });
        }
        Ok(())
    }

    /// replace the configuration, regenerating the schedule and carrying history over
    ///
    /// Returns the months whose history fell outside the new term.
    pub fn edit_config(&mut self, config: LeaseConfig, time_provider: &SafeTimeProvider) -> Result<Vec<YearMonth>> {
        let config = config.validated()?;
        let fresh = generate_lease_schedule(&config)?;
        let merge = merge_schedule(&self.rows, fresh);

        info!(
            lease_id = %self.id,
            months = config.months,
            rent = %config.monthly_rent,
            dropped = merge.dropped_history.len(),
            "lease configuration edited"
        );

        self.config = config;
        self.rows = merge.rows;
        self.events.emit(LeaseEvent::ScheduleRegenerated {
            lease_id: self.id,
            months: self.config.months,
            dropped: merge.dropped_history.clone(),
            timestamp: time_provider.now(),
        });

        Ok(merge.dropped_history)
    }

    /// record money received toward the deposits
    pub fn record_deposit_payment(&mut self, draft: PaymentDraft, time_provider: &SafeTimeProvider) -> Result<Uuid> {
        let payment = draft.validate()?;
        let (payment_id, amount) = (payment.id, payment.amount);
        self.deposit_receipts.push(payment);

        self.events.emit(LeaseEvent::DepositReceived {
            lease_id: self.id,
            amount,
            total_received: self.deposits().received,
            timestamp: time_provider.now(),
        });

        Ok(payment_id)
    }

    /// split one signing payment across deposits and prepaid rent
    ///
    /// Deposit portions become deposit receipts; rent portions become payments
    /// on the first and last months. Every portion is applied to a staged copy
    /// of the schedule first, so nothing is recorded if any of them fails.
    pub fn record_signing_payment(
        &mut self,
        draft: PaymentDraft,
        time_provider: &SafeTimeProvider,
    ) -> Result<SigningAllocation> {
        let payment = draft.validate()?;
        let allocation = allocate_signing_payment(&signing_obligations(&self.config), payment.amount)?;

        let mut staged = self.rows.clone();
        let mut deposit_portion = Money::ZERO;
        let mut to_rent = Money::ZERO;
        let mut touched: Vec<YearMonth> = Vec::new();
        for item in &allocation.applied {
            let target = match item.kind {
                SigningItemKind::SecurityDeposit | SigningItemKind::PetDeposit => {
                    deposit_portion += item.amount;
                    continue;
                }
                SigningItemKind::FirstMonth => staged.first_mut(),
                SigningItemKind::LastMonth => staged.last_mut(),
            };
            let row = target.ok_or_else(|| LeaseError::payment("lease has no month to apply prepaid rent to"))?;

            let mut portion = Payment::new(item.amount, payment.date)?.with_note("signing payment");
            portion.method = payment.method.clone();
            row.add_payment(portion)?;

            to_rent += item.amount;
            if !touched.contains(&row.key) {
                touched.push(row.key);
            }
        }

        self.rows = staged;
        for key in touched {
            self.finalize_row(key, time_provider)?;
        }
        if deposit_portion.is_positive() {
            let mut receipt = Payment::new(deposit_portion, payment.date)?.with_note("signing payment");
            receipt.method = payment.method.clone();
            self.deposit_receipts.push(receipt);
        }

        self.events.emit(LeaseEvent::SigningPaymentApplied {
            lease_id: self.id,
            amount: payment.amount,
            to_deposits: deposit_portion,
            to_rent,
            excess: allocation.excess,
            timestamp: time_provider.now(),
        });
        info!(
            lease_id = %self.id,
            amount = %payment.amount,
            to_deposits = %deposit_portion,
            to_rent = %to_rent,
            excess = %allocation.excess,
            "signing payment applied"
        );

        Ok(allocation)
    }

    pub fn deposits(&self) -> DepositSnapshot {
        DepositSnapshot {
            expected: self.config.deposits_expected(),
            received: self.deposit_receipts.iter().map(|p| p.amount).sum(),
        }
    }

    pub fn unpaid_total(&self) -> Money {
        compute_unpaid(&self.rows, &self.config)
    }

    /// settlement request prefilled with the deposits on file and the final month
    pub fn settlement_request(&self, status: SettlementStatus, settled_on: NaiveDate) -> SettlementRequest {
        let request = SettlementRequest::new(status, self.deposits(), settled_on);
        match self.rows.last() {
            Some(last) => request.attached_to(last.key),
            None => request,
        }
    }

    /// settle the deposits against unpaid balances and damages, replacing any earlier settlement
    pub fn settle(&mut self, request: SettlementRequest, time_provider: &SafeTimeProvider) -> Result<&DepositSettlement> {
        let settlement = DepositSettlement::prepare(request, self.unpaid_total())?;

        self.events.emit(LeaseEvent::DepositSettled {
            lease_id: self.id,
            status: settlement.status,
            net: settlement.net,
            timestamp: time_provider.now(),
        });

        Ok(&*self.settlement.insert(settlement))
    }

    pub fn row_totals(&self, key: YearMonth) -> Result<RowTotals> {
        Ok(compute_row_totals(self.row(key)?, &self.config))
    }

    pub fn fever_status(&self, key: YearMonth, time_provider: &SafeTimeProvider) -> Result<FeverStatus> {
        Ok(fever_status_for_row(self.row(key)?, &self.config, today(time_provider)))
    }

    pub fn summary(&self, time_provider: &SafeTimeProvider) -> LeaseSummary {
        LeaseSummary::from_lease(self, today(time_provider))
    }

    /// summary as of the system date
    pub fn summary_now(&self) -> LeaseSummary {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.summary(&time)
    }

    /// get events
    pub fn take_events(&mut self) -> Vec<LeaseEvent> {
        self.events.take_events()
    }
}
