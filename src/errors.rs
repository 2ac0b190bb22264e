use thiserror::Error;
use uuid::Uuid;

use crate::types::YearMonth;

#[derive(Error, Debug)]
pub enum LeaseError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid payment: {reason}")]
    InvalidPayment {
        reason: String,
    },

    #[error("invalid adjustment: {reason}")]
    InvalidAdjustment {
        reason: String,
    },

    #[error("invalid damage item #{index}: {reason}")]
    InvalidDamageItem {
        index: usize,
        reason: String,
    },

    #[error("invalid settlement: {reason}")]
    InvalidSettlement {
        reason: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("no schedule row for {key}")]
    RowNotFound {
        key: YearMonth,
    },

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: Uuid,
    },

    #[error("row {key} is finalized")]
    RowFinalized {
        key: YearMonth,
    },

    #[error("row {key} has no notice on file")]
    NoNotice {
        key: YearMonth,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LeaseError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        LeaseError::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub(crate) fn payment(reason: impl Into<String>) -> Self {
        LeaseError::InvalidPayment {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LeaseError>;
