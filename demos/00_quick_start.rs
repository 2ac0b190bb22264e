/// quick start - minimal example to get started
use lease_ledger_rs::chrono::NaiveDate;
use lease_ledger_rs::{Lease, LeaseConfig, Money, PaymentDraft, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a twelve month lease at $1,500, due on the 1st with five grace days
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("bad start date")?;
    let config = LeaseConfig::standard_residential(start, 12, Money::from_major(1_500))?;

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut lease = Lease::new(config, &time)?;

    // pay the first month
    let first = lease.rows[0].key;
    lease.record_payment_now(first, PaymentDraft::new(Money::from_major(1_500), start).method("ACH"))?;

    // bring late fees up to date and print the ledger
    lease.refresh_now();
    println!("{}", lease.summary_now().to_json_pretty()?);

    Ok(())
}
