pub mod settlement;
pub mod signing;

pub use settlement::{
    compute_unpaid, settlement_net, DamageItem, DamageItemDraft, DepositSettlement, DepositSnapshot,
    SettlementRequest,
};
pub use signing::{
    allocate_signing_payment, signing_obligations, SigningAllocation, SigningBreakdown, SigningItem,
    SigningItemKind,
};
