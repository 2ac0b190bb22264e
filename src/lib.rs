pub mod config;
pub mod dates;
pub mod decimal;
pub mod deposits;
pub mod errors;
pub mod events;
pub mod lease;
pub mod ledger;
pub mod schedule;
pub mod status;
pub mod summary;
pub mod types;

// re-export key types
pub use config::{LateFeePolicy, LeaseConfig, LeaseConfigBuilder, OtherCharge, PrepaidPayment, SigningTerms};
pub use decimal::{Money, Rate};
pub use deposits::{
    allocate_signing_payment, compute_unpaid, settlement_net, signing_obligations, DamageItem, DamageItemDraft,
    DepositSettlement, DepositSnapshot, SettlementRequest, SigningAllocation, SigningBreakdown, SigningItem,
    SigningItemKind,
};
pub use errors::{LeaseError, Result};
pub use events::{EventStore, LeaseEvent};
pub use lease::Lease;
pub use ledger::{
    dedupe_payments, normalize_rows, normalize_stored_rows, Adjustment, Notice, NoticeMethod, Payment,
    PaymentDraft, ScheduleRow, StoredRow,
};
pub use schedule::{generate_lease_schedule, merge_schedule, merge_schedule_preserving_payments, ScheduleMerge};
pub use status::{
    compute_assessed_late_fee_amount, compute_row_totals, fever_status_for_row, finalize_month_if_paid,
    maybe_apply_late_fee, resolve_fever_status, FeverParams, FeverStatus, RowTotals,
};
pub use summary::{LeaseKpis, LeaseSummary, RowView};
pub use types::{
    FeverColor, LeaseId, NoticeMethodKind, RefundMethod, RowState, SettlementStatus, YearMonth,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
