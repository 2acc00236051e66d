//! Cascading correction of cached running balances.

use std::sync::Arc;

use rust_decimal::Decimal;
use saldo_shared::types::AccountId;
use tracing::debug;

use super::error::LedgerError;
use super::movement::Cutoff;
use super::store::LedgerStore;

/// Applies a flat additive shift to the cached balance of every movement
/// ordered after a cutoff, for one account.
///
/// Updating or deleting a movement changes the balance carried into every
/// later movement by exactly one constant (each later movement's own value
/// is unaffected), so a uniform shift restores the chain without recomputing
/// a prefix sum per movement. Because the shift is uniform, the fetch order
/// is irrelevant; a non-uniform adjustment (for example percentage-based)
/// would make ordered application mandatory.
///
/// All knowledge of the cached-balance layout lives behind this engine, so a
/// store that recomputes balances on read could replace it without touching
/// validation or the movement commands.
pub struct RecalculationEngine<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> RecalculationEngine<S> {
    /// Creates an engine over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Shifts the cached balance of every movement after `cutoff` by
    /// `adjustment`.
    ///
    /// A zero adjustment returns immediately without touching the store,
    /// which also makes the operation idempotent. The batch write is
    /// all-or-nothing, so a failure leaves no partial cascade.
    pub async fn recalculate(
        &self,
        account_id: AccountId,
        cutoff: Cutoff,
        adjustment: Decimal,
    ) -> Result<(), LedgerError> {
        if adjustment.is_zero() {
            return Ok(());
        }

        let movements = self.store.find_movements_after(account_id, cutoff).await?;
        if movements.is_empty() {
            return Ok(());
        }

        debug!(%account_id, count = movements.len(), %adjustment, "shifting cached balances");

        let shifted = movements
            .into_iter()
            .map(|mut movement| {
                movement.post_movement_balance += adjustment;
                movement
            })
            .collect();

        self.store.update_movements_batch(shifted).await?;
        Ok(())
    }
}
