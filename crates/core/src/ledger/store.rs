//! Abstract persistence boundary for accounts and movements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use saldo_shared::types::pagination::{PageRequest, PageResponse};
use saldo_shared::types::{AccountId, MovementId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::account::Account;
use super::error::LedgerError;
use super::movement::{Cutoff, Movement, NewMovement};

/// Errors surfaced by a ledger store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Account does not exist.
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// Movement does not exist.
    #[error("movement not found: {0}")]
    MovementNotFound(MovementId),

    /// Transient read failure; the same call may succeed on retry.
    #[error("read failed: {0}")]
    Read(String),

    /// Write failure; the attempted modification did not take effect.
    #[error("write failed: {0}")]
    Write(String),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AccountNotFound(id) => Self::AccountNotFound(id),
            StoreError::MovementNotFound(id) => Self::MovementNotFound(id),
            StoreError::Read(reason) => Self::StoreAccess(reason),
            StoreError::Write(reason) => Self::StoreWrite(reason),
        }
    }
}

/// Date-range filter for movement listings. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MovementFilter {
    /// Earliest occurrence instant to include.
    pub from: Option<DateTime<Utc>>,
    /// Latest occurrence instant to include.
    pub to: Option<DateTime<Utc>>,
}

impl MovementFilter {
    /// Returns true if `date` falls inside the bounds.
    #[must_use]
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Abstract persistence for accounts and movements.
///
/// Each operation must be individually atomic, and `update_movements_batch`
/// must apply every update or none. Implementations do not serialize across
/// operations; callers provide that (see [`super::locks::AccountLocks`]).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Fetches an account by id.
    async fn get_account(&self, account_id: AccountId) -> Result<Account, StoreError>;

    /// Overwrites an account's cached current balance, returning the
    /// updated account.
    async fn set_account_balance(
        &self,
        account_id: AccountId,
        new_balance: Decimal,
    ) -> Result<Account, StoreError>;

    /// Inserts a movement, assigning the next sequence number for its
    /// account.
    async fn save_movement(&self, movement: NewMovement) -> Result<Movement, StoreError>;

    /// Fetches a movement by id.
    async fn get_movement(&self, movement_id: MovementId) -> Result<Movement, StoreError>;

    /// Overwrites an existing movement record.
    async fn update_movement(&self, movement: Movement) -> Result<Movement, StoreError>;

    /// Removes a movement record.
    async fn delete_movement(&self, movement_id: MovementId) -> Result<(), StoreError>;

    /// Returns all movements for an account ordered strictly after the
    /// cutoff, ascending by `(date, sequence)`.
    async fn find_movements_after(
        &self,
        account_id: AccountId,
        cutoff: Cutoff,
    ) -> Result<Vec<Movement>, StoreError>;

    /// Persists a set of movement updates as one unit: either every update
    /// is applied or none are.
    async fn update_movements_batch(
        &self,
        movements: Vec<Movement>,
    ) -> Result<Vec<Movement>, StoreError>;

    /// Pages through an account's movements, newest first, optionally
    /// bounded by a date range.
    async fn find_movements(
        &self,
        account_id: AccountId,
        filter: MovementFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Movement>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_store_error_maps_to_ledger_error() {
        let account_id = AccountId::new();
        let movement_id = MovementId::new();

        assert!(matches!(
            LedgerError::from(StoreError::AccountNotFound(account_id)),
            LedgerError::AccountNotFound(id) if id == account_id
        ));
        assert!(matches!(
            LedgerError::from(StoreError::MovementNotFound(movement_id)),
            LedgerError::MovementNotFound(id) if id == movement_id
        ));
        assert!(matches!(
            LedgerError::from(StoreError::Read("timeout".into())),
            LedgerError::StoreAccess(reason) if reason == "timeout"
        ));
        assert!(matches!(
            LedgerError::from(StoreError::Write("conflict".into())),
            LedgerError::StoreWrite(reason) if reason == "conflict"
        ));
    }

    #[test]
    fn test_filter_bounds_are_inclusive() {
        let from = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap();
        let filter = MovementFilter {
            from: Some(from),
            to: Some(to),
        };

        assert!(filter.contains(from));
        assert!(filter.contains(to));
        assert!(filter.contains(from + chrono::Duration::days(10)));
        assert!(!filter.contains(from - chrono::Duration::seconds(1)));
        assert!(!filter.contains(to + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_unbounded_filter_contains_everything() {
        let filter = MovementFilter::default();
        assert!(filter.contains(Utc::now()));
    }
}
