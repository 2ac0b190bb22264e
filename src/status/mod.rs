pub mod fever;
pub mod late_fee;
pub mod totals;

pub use fever::{fever_status_for_row, resolve_fever_status, FeverParams, FeverStatus};
pub use late_fee::{
    compute_assessed_late_fee_amount, finalize_month_if_paid, grace_period_end, maybe_apply_late_fee,
};
pub use totals::{compute_row_totals, expected_total, paid_in_full_on, RowTotals};
