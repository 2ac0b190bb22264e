/// time control - watch one month move through its fever colors
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use lease_ledger_rs::{
    LateFeePolicy, Lease, LeaseConfig, Money, Notice, PaymentDraft, SafeTimeProvider, TimeSource,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 12, 30, 9, 0, 0).unwrap()));
    let controller = time.test_control().unwrap();

    let config = LeaseConfig::builder()
        .start_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        .months(12)
        .monthly_rent(Money::from_major(1_200))
        .grace_days(5)
        .late_fee_policy(LateFeePolicy::Flat(Money::from_major(75)))
        .build()?;
    let mut lease = Lease::new(config, &time)?;
    let january = lease.rows[0].key;

    let report = |lease: &Lease, time: &SafeTimeProvider| -> Result<(), Box<dyn std::error::Error>> {
        let status = lease.fever_status(january, time)?;
        let totals = lease.row_totals(january)?;
        println!(
            "{}  {:<7} balance {:>10}  {}",
            time.now().format("%Y-%m-%d"),
            status.color.label(),
            totals.balance.to_string(),
            status.tooltip
        );
        Ok(())
    };

    report(&lease, &time)?;

    // due date, then the last grace day, then the first late day
    for days in [2, 5, 1] {
        controller.advance(Duration::days(days));
        lease.refresh(&time);
        report(&lease, &time)?;
    }

    // serve a ten day notice
    controller.advance(Duration::days(3));
    let posted = time.now().date_naive();
    lease.serve_notice(january, Notice::new(posted, 10), &time)?;
    report(&lease, &time)?;

    // the notice runs out
    controller.advance(Duration::days(11));
    report(&lease, &time)?;

    // tenant pays rent and the fee
    let paid_on = time.now().date_naive();
    lease.record_payment(january, PaymentDraft::new(Money::from_major(1_275), paid_on), &time)?;
    report(&lease, &time)?;

    println!("\n{} events recorded", lease.take_events().len());

    Ok(())
}
