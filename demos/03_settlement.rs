/// settlement - signing payment in, deposits reconciled at move-out
use chrono::{NaiveDate, TimeZone, Utc};
use lease_ledger_rs::{
    signing_obligations, Lease, LeaseConfig, Money, PaymentDraft, RefundMethod, SafeTimeProvider,
    SettlementStatus, SigningTerms, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 12, 20, 9, 0, 0).unwrap()));
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).ok_or("bad date");

    let config = LeaseConfig::builder()
        .start_date(date(2025, 1, 1)?)
        .months(6)
        .monthly_rent(Money::from_major(1_400))
        .security_deposit_equals_rent(true)
        .pet_rent(Money::from_major(35))
        .pet_deposit(Money::from_major(300))
        .signing(SigningTerms {
            security_deposit_due: true,
            pet_deposit_due: true,
            first_month_due: true,
            last_month_due: false,
        })
        .build()?;

    let due = signing_obligations(&config);
    println!("due at signing: {}", due.total);
    for item in &due.items {
        println!("  {:?}: {}", item.kind, item.amount);
    }

    let mut lease = Lease::new(config, &time)?;
    let allocation = lease.record_signing_payment(
        PaymentDraft::new(due.total, date(2024, 12, 20)?).method("cashier's check"),
        &time,
    )?;
    println!("deposits on file: {}", allocation.deposits_applied());

    // months two through five paid, the last month left open
    for row in lease.rows.clone().iter().skip(1).take(4) {
        lease.record_payment(row.key, PaymentDraft::new(Money::from_major(1_435), row.due_date), &time)?;
    }
    println!("unpaid at move-out: {}", lease.unpaid_total());

    let request = lease
        .settlement_request(SettlementStatus::Settled, date(2025, 7, 10)?)
        .damage("carpet cleaning", Money::from_major(180))
        .damage("replace blinds", Money::from_major(65))
        .refund_method(RefundMethod::Check);
    let settlement = lease.settle(request, &time)?;

    if settlement.net.is_negative() {
        println!("tenant owes {}", settlement.balance_due());
    } else {
        println!("refund due {}", settlement.refund_due());
    }

    Ok(())
}
