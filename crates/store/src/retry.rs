//! Retry decorator for transient store read failures.
//!
//! Retry-with-backoff belongs to the persistence layer only: validation
//! failures are terminal and the core never retries internally. Writes are
//! not retried either - a failed write is surfaced immediately so the
//! enclosing command can compensate, and only the whole logical operation is
//! safe to re-run.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use saldo_core::ledger::{
    Account, Cutoff, LedgerStore, Movement, MovementFilter, NewMovement, StoreError,
};
use saldo_shared::config::RetryConfig;
use saldo_shared::types::pagination::{PageRequest, PageResponse};
use saldo_shared::types::{AccountId, MovementId};

/// Exponential backoff policy with a capped delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Builds a policy from configuration.
    #[must_use]
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Delay before the retry following attempt number `attempt`
    /// (1-indexed): doubles per attempt, capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Retries the read expression on transient failures, with backoff.
macro_rules! retry_read {
    ($self:ident, $operation:literal, $call:expr) => {{
        let mut attempt: u32 = 1;
        loop {
            match $call.await {
                Err(StoreError::Read(reason)) if attempt < $self.policy.max_attempts => {
                    let delay = $self.policy.delay_for(attempt);
                    tracing::warn!(
                        operation = $operation,
                        attempt,
                        ?delay,
                        %reason,
                        "transient read failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => break other,
            }
        }
    }};
}

/// Wraps a store and retries transient read failures with backoff.
///
/// Only reads are retried; not-found results are terminal and writes pass
/// straight through.
#[derive(Debug)]
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S> RetryingStore<S> {
    /// Wraps `inner` with the given policy.
    #[must_use]
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Consumes the wrapper, returning the inner store.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[async_trait]
impl<S: LedgerStore> LedgerStore for RetryingStore<S> {
    async fn get_account(&self, account_id: AccountId) -> Result<Account, StoreError> {
        retry_read!(self, "get_account", self.inner.get_account(account_id))
    }

    async fn set_account_balance(
        &self,
        account_id: AccountId,
        new_balance: Decimal,
    ) -> Result<Account, StoreError> {
        self.inner.set_account_balance(account_id, new_balance).await
    }

    async fn save_movement(&self, movement: NewMovement) -> Result<Movement, StoreError> {
        self.inner.save_movement(movement).await
    }

    async fn get_movement(&self, movement_id: MovementId) -> Result<Movement, StoreError> {
        retry_read!(self, "get_movement", self.inner.get_movement(movement_id))
    }

    async fn update_movement(&self, movement: Movement) -> Result<Movement, StoreError> {
        self.inner.update_movement(movement).await
    }

    async fn delete_movement(&self, movement_id: MovementId) -> Result<(), StoreError> {
        self.inner.delete_movement(movement_id).await
    }

    async fn find_movements_after(
        &self,
        account_id: AccountId,
        cutoff: Cutoff,
    ) -> Result<Vec<Movement>, StoreError> {
        retry_read!(
            self,
            "find_movements_after",
            self.inner.find_movements_after(account_id, cutoff)
        )
    }

    async fn update_movements_batch(
        &self,
        movements: Vec<Movement>,
    ) -> Result<Vec<Movement>, StoreError> {
        self.inner.update_movements_batch(movements).await
    }

    async fn find_movements(
        &self,
        account_id: AccountId,
        filter: MovementFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Movement>, StoreError> {
        retry_read!(
            self,
            "find_movements",
            self.inner.find_movements(account_id, filter, page.clone())
        )
    }
}
