//! Per-account serialization of ledger mutations.

use std::sync::Arc;

use dashmap::DashMap;
use saldo_shared::types::AccountId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Admits at most one in-flight mutation per account.
///
/// The read-modify-write of an account's cached balance must not interleave
/// with another mutation on the same account; holding the account's lock for
/// the whole operation rules that out. Locks are created lazily on first use
/// and operations on different accounts never contend.
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl AccountLocks {
    /// Creates an empty lock map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquires the lock for `account_id`, waiting while another mutation on
    /// the same account is in flight.
    pub async fn acquire(&self, account_id: AccountId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(account_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
