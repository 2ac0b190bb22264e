use tracing::debug;

use crate::config::{LeaseConfig, PrepaidPayment};
use crate::dates::due_date_for_offset;
use crate::errors::Result;
use crate::ledger::{Payment, ScheduleRow};

/// build the month-by-month schedule for a lease
///
/// One row per month of the term, due on `due_day` clamped to each month's
/// length. Pet rent is not written into rows; totals read it from the config.
/// A zero-month term yields an empty schedule.
pub fn generate_lease_schedule(config: &LeaseConfig) -> Result<Vec<ScheduleRow>> {
    let expected_other = config.other_charges_total();

    let mut rows = (0..config.months)
        .map(|offset| {
            let due = due_date_for_offset(config.start_date, offset, config.due_day)?;
            Ok(ScheduleRow::new(due, config.monthly_rent, expected_other))
        })
        .collect::<Result<Vec<_>>>()?;

    if config.first_month_prepaid {
        if let (Some(prepaid), Some(first)) = (&config.first_month_payment, rows.first_mut()) {
            inject_prepaid(first, prepaid, config, "first month prepaid")?;
        }
    }

    // a one-month term has no separate last month to seed
    if config.last_month_prepaid && rows.len() > 1 {
        if let (Some(prepaid), Some(last)) = (&config.last_month_payment, rows.last_mut()) {
            inject_prepaid(last, prepaid, config, "last month prepaid")?;
        }
    }

    debug!(
        months = config.months,
        start = %config.start_date,
        due_day = config.due_day,
        "schedule generated"
    );

    Ok(rows)
}

fn inject_prepaid(row: &mut ScheduleRow, prepaid: &PrepaidPayment, config: &LeaseConfig, note: &str) -> Result<()> {
    let Some(date) = prepaid.date else {
        return Ok(());
    };

    let amount = prepaid.amount.unwrap_or_else(|| config.monthly_charge());
    if !amount.is_positive() {
        return Ok(());
    }
    let mut payment = Payment::new(amount, date)?.with_note(note);
    payment.method = prepaid.method.clone();
    row.add_payment(payment)
}
