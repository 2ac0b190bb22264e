/// config edit - a rent increase and a shorter term keep entered history
use chrono::{NaiveDate, TimeZone, Utc};
use lease_ledger_rs::{Adjustment, Lease, LeaseConfig, Money, PaymentDraft, SafeTimeProvider, TimeSource};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2025, 3, 15, 9, 0, 0).unwrap()));
    let date = |m, d| NaiveDate::from_ymd_opt(2025, m, d).ok_or("bad date");

    let config = LeaseConfig::builder()
        .start_date(date(1, 1)?)
        .months(12)
        .monthly_rent(Money::from_major(1_000))
        .grace_days(3)
        .build()?;
    let mut lease = Lease::new(config, &time)?;

    let march = lease.rows[2].key;
    let november = lease.rows[10].key;
    lease.record_payment(march, PaymentDraft::new(Money::from_major(500), date(3, 1)?), &time)?;
    lease.add_adjustment(march, Adjustment::new(Money::from_major(-50), "late repair credit")?, &time)?;
    lease.record_payment(november, PaymentDraft::new(Money::from_major(1_000), date(3, 10)?), &time)?;

    println!("before: march balance {}", lease.row_totals(march)?.balance);

    // raise the rent
    let mut raised = lease.config.clone();
    raised.monthly_rent = Money::from_major(1_100);
    lease.edit_config(raised, &time)?;
    println!("after rent increase: march balance {}", lease.row_totals(march)?.balance);

    // shorten the term; november's prepayment falls outside it
    let mut shorter = lease.config.clone();
    shorter.months = 9;
    let dropped = lease.edit_config(shorter, &time)?;
    for key in dropped {
        println!("history dropped for {}", key);
    }
    println!("schedule now has {} months", lease.rows.len());

    Ok(())
}
