//! Ledger error types.
//!
//! Four categories: business-rule rejections, missing entities, transient
//! store read failures, and store write failures. The split between the last
//! two matters to callers: reads are safe to retry, failed writes require
//! re-running the whole logical operation.

use saldo_shared::types::{AccountId, MovementId};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A business rule rejected the movement. Carries a human-readable
    /// reason surfaced verbatim to the caller. Terminal, never retried.
    #[error("Transaction not allowed: {0}")]
    TransactionNotAllowed(String),

    /// Referenced account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Referenced movement does not exist.
    #[error("Movement not found: {0}")]
    MovementNotFound(MovementId),

    /// Transient failure reading from the store.
    #[error("Store read failed: {0}")]
    StoreAccess(String),

    /// Failure writing account, movement, or cascade updates.
    #[error("Store write failed: {0}")]
    StoreWrite(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TransactionNotAllowed(_) => "TRANSACTION_NOT_ALLOWED",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::MovementNotFound(_) => "MOVEMENT_NOT_FOUND",
            Self::StoreAccess(_) => "STORE_ACCESS_ERROR",
            Self::StoreWrite(_) => "STORE_WRITE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::TransactionNotAllowed(_) => 403,
            Self::AccountNotFound(_) | Self::MovementNotFound(_) => 404,
            Self::StoreAccess(_) | Self::StoreWrite(_) => 500,
        }
    }

    /// Returns true if retrying the failed call can succeed.
    ///
    /// Only transient read failures qualify. Write failures are excluded
    /// because the enclosing operation has already compensated; only the
    /// whole operation is safe to re-run. Business-rule and not-found
    /// failures are terminal.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreAccess(_))
    }
}
