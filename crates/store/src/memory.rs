//! In-memory ledger store.
//!
//! Backed by concurrent maps; suitable for tests and for embedding the
//! ledger without an external database. Sequence numbers are assigned per
//! account on insert. The batch update validates every movement before
//! applying any, so it is all-or-nothing as the store contract requires.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

use saldo_core::ledger::{
    Account, Cutoff, LedgerStore, Movement, MovementFilter, NewMovement, StoreError,
};
use saldo_shared::types::pagination::{PageRequest, PageResponse};
use saldo_shared::types::{AccountId, MovementId};

/// In-memory [`LedgerStore`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    accounts: DashMap<AccountId, Account>,
    movements: DashMap<MovementId, Movement>,
    sequences: DashMap<AccountId, i64>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account, replacing any previous record with the same id.
    ///
    /// Account provisioning is outside the ledger service; tests and
    /// embedders insert accounts directly.
    pub fn insert_account(&self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    /// Number of movements currently stored for an account.
    #[must_use]
    pub fn movement_count(&self, account_id: AccountId) -> usize {
        self.movements
            .iter()
            .filter(|movement| movement.account_id == account_id)
            .count()
    }

    /// All movements for an account, ascending by `(date, sequence)`.
    #[must_use]
    pub fn movements_in_order(&self, account_id: AccountId) -> Vec<Movement> {
        let mut movements: Vec<Movement> = self
            .movements
            .iter()
            .filter(|movement| movement.account_id == account_id)
            .map(|movement| movement.value().clone())
            .collect();
        movements.sort_by_key(Movement::ordering_key);
        movements
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn get_account(&self, account_id: AccountId) -> Result<Account, StoreError> {
        self.accounts
            .get(&account_id)
            .map(|account| account.value().clone())
            .ok_or(StoreError::AccountNotFound(account_id))
    }

    async fn set_account_balance(
        &self,
        account_id: AccountId,
        new_balance: Decimal,
    ) -> Result<Account, StoreError> {
        let mut account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(StoreError::AccountNotFound(account_id))?;
        account.current_balance = new_balance;
        account.updated_at = Utc::now();
        Ok(account.value().clone())
    }

    async fn save_movement(&self, movement: NewMovement) -> Result<Movement, StoreError> {
        if !self.accounts.contains_key(&movement.account_id) {
            return Err(StoreError::AccountNotFound(movement.account_id));
        }

        let sequence = {
            let mut counter = self.sequences.entry(movement.account_id).or_insert(0);
            *counter += 1;
            *counter
        };

        let movement = movement.with_sequence(sequence);
        debug!(movement_id = %movement.id, sequence, "movement stored");
        self.movements.insert(movement.id, movement.clone());
        Ok(movement)
    }

    async fn get_movement(&self, movement_id: MovementId) -> Result<Movement, StoreError> {
        self.movements
            .get(&movement_id)
            .map(|movement| movement.value().clone())
            .ok_or(StoreError::MovementNotFound(movement_id))
    }

    async fn update_movement(&self, movement: Movement) -> Result<Movement, StoreError> {
        let mut stored = self
            .movements
            .get_mut(&movement.id)
            .ok_or(StoreError::MovementNotFound(movement.id))?;
        *stored = movement.clone();
        Ok(movement)
    }

    async fn delete_movement(&self, movement_id: MovementId) -> Result<(), StoreError> {
        self.movements
            .remove(&movement_id)
            .map(|_| ())
            .ok_or(StoreError::MovementNotFound(movement_id))
    }

    async fn find_movements_after(
        &self,
        account_id: AccountId,
        cutoff: Cutoff,
    ) -> Result<Vec<Movement>, StoreError> {
        let mut movements: Vec<Movement> = self
            .movements
            .iter()
            .filter(|movement| movement.account_id == account_id && cutoff.selects(movement))
            .map(|movement| movement.value().clone())
            .collect();
        movements.sort_by_key(Movement::ordering_key);
        Ok(movements)
    }

    async fn update_movements_batch(
        &self,
        movements: Vec<Movement>,
    ) -> Result<Vec<Movement>, StoreError> {
        // Validate first so the batch applies fully or not at all.
        for movement in &movements {
            if !self.movements.contains_key(&movement.id) {
                return Err(StoreError::MovementNotFound(movement.id));
            }
        }
        for movement in &movements {
            self.movements.insert(movement.id, movement.clone());
        }
        Ok(movements)
    }

    async fn find_movements(
        &self,
        account_id: AccountId,
        filter: MovementFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Movement>, StoreError> {
        let mut movements: Vec<Movement> = self
            .movements
            .iter()
            .filter(|movement| {
                movement.account_id == account_id && filter.contains(movement.date)
            })
            .map(|movement| movement.value().clone())
            .collect();
        // Newest first.
        movements.sort_by_key(Movement::ordering_key);
        movements.reverse();

        let total = movements.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let data: Vec<Movement> = movements.into_iter().skip(offset).take(limit).collect();

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }
}
