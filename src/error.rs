//! Ledger Error Types
//!
//! Insufficient funds is not an error here: it is an expected business
//! outcome, reported as `false` by [`crate::Account::withdraw`] and as an
//! outcome variant by the [`crate::Ledger`] services.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::lock::LockError;

/// Coarse classification of every ledger error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller bug; never retried
    InvalidArgument,
    /// Caller bug on a bounded numeric parameter
    OutOfRange,
    /// Lock contention; the caller decides whether to retry
    Timeout,
    NotFound,
    Conflict,
    Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // === Validation Errors ===
    #[error("{param} must be positive (got {amount})")]
    InvalidAmount { param: &'static str, amount: Decimal },

    #[error("Account number cannot be empty")]
    EmptyAccountId,

    #[error("Initial balance must be non-negative (got {0})")]
    NegativeInitialBalance(Decimal),

    #[error("Sender and recipient accounts must be different")]
    SameAccount,

    // === Account Errors ===
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account number already exists: {0}")]
    DuplicateAccount(String),

    #[error("Balance overflow on account {0}")]
    Overflow(String),

    // === Locking ===
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl LedgerError {
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount { .. } => "INVALID_AMOUNT",
            LedgerError::EmptyAccountId => "EMPTY_ACCOUNT_ID",
            LedgerError::NegativeInitialBalance(_) => "NEGATIVE_INITIAL_BALANCE",
            LedgerError::SameAccount => "SAME_ACCOUNT",
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            LedgerError::Overflow(_) => "OVERFLOW",
            LedgerError::Lock(e) => e.code(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAmount { .. }
            | LedgerError::EmptyAccountId
            | LedgerError::NegativeInitialBalance(_)
            | LedgerError::SameAccount
            | LedgerError::Lock(LockError::InvalidArgument { .. }) => ErrorKind::InvalidArgument,
            LedgerError::Lock(LockError::OutOfRange { .. }) => ErrorKind::OutOfRange,
            LedgerError::Lock(LockError::Timeout { .. }) => ErrorKind::Timeout,
            LedgerError::AccountNotFound(_) => ErrorKind::NotFound,
            LedgerError::DuplicateAccount(_) => ErrorKind::Conflict,
            LedgerError::Overflow(_) => ErrorKind::Overflow,
        }
    }
}
