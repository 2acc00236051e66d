//! Update and delete commands for existing movements.
//!
//! Each command computes the implied account balance and cascade adjustment,
//! persists its changes, and drives the recalculation engine. Writes are
//! compensated on failure so a mid-sequence error does not leave the account
//! balance and the movement records disagreeing. Callers must hold the
//! owning account's lock for the duration of `execute`.

use rust_decimal::Decimal;
use tracing::error;

use super::account::Account;
use super::error::LedgerError;
use super::movement::{Movement, MovementType};
use super::recalculation::RecalculationEngine;
use super::store::LedgerStore;

/// Replaces a movement's type and value, correcting all dependent balances.
#[derive(Debug, Clone)]
pub struct UpdateMovementCommand {
    /// The owning account as currently stored.
    pub account: Account,
    /// The movement as currently stored.
    pub old_movement: Movement,
    /// Revised movement type.
    pub new_type: MovementType,
    /// Revised signed value.
    pub new_value: Decimal,
}

impl UpdateMovementCommand {
    /// The delta every later cached balance must shift by.
    #[must_use]
    pub fn balance_adjustment(&self) -> Decimal {
        self.new_value - self.old_movement.value
    }

    /// The account balance after the revision.
    #[must_use]
    pub fn new_account_balance(&self) -> Decimal {
        self.account.current_balance - self.old_movement.value + self.new_value
    }

    /// The revised movement record. Date, sequence, and audit timestamp are
    /// preserved; the cached balance is rebuilt from the balance before the
    /// movement.
    #[must_use]
    pub fn updated_movement(&self) -> Movement {
        let mut movement = self.old_movement.clone();
        movement.movement_type = self.new_type;
        movement.value = self.new_value;
        movement.post_movement_balance = self.old_movement.balance_before() + self.new_value;
        movement
    }

    /// Persists the revision and cascades the adjustment to every movement
    /// ordered after the revised one.
    ///
    /// A zero value delta leaves every later movement untouched, so the
    /// cascade is skipped entirely. On a write failure the earlier writes
    /// are rolled back before the error is surfaced.
    pub async fn execute<S: LedgerStore>(
        &self,
        store: &S,
        engine: &RecalculationEngine<S>,
    ) -> Result<Movement, LedgerError> {
        let adjustment = self.balance_adjustment();
        let updated = self.updated_movement();

        store
            .set_account_balance(self.account.id, self.new_account_balance())
            .await?;

        if let Err(err) = store.update_movement(updated.clone()).await {
            self.restore_balance(store).await;
            return Err(err.into());
        }

        if !adjustment.is_zero()
            && let Err(err) = engine
                .recalculate(self.account.id, self.old_movement.cutoff(), adjustment)
                .await
        {
            self.restore_movement(store).await;
            self.restore_balance(store).await;
            return Err(err);
        }

        Ok(updated)
    }

    async fn restore_balance<S: LedgerStore>(&self, store: &S) {
        if store
            .set_account_balance(self.account.id, self.account.current_balance)
            .await
            .is_err()
        {
            error!(
                account_id = %self.account.id,
                "failed to restore account balance while unwinding a movement update"
            );
        }
    }

    async fn restore_movement<S: LedgerStore>(&self, store: &S) {
        if store.update_movement(self.old_movement.clone()).await.is_err() {
            error!(
                movement_id = %self.old_movement.id,
                "failed to restore movement while unwinding a movement update"
            );
        }
    }
}

/// Removes a movement, correcting all dependent balances.
#[derive(Debug, Clone)]
pub struct DeleteMovementCommand {
    /// The owning account as currently stored.
    pub account: Account,
    /// The movement to delete, as currently stored.
    pub movement: Movement,
}

impl DeleteMovementCommand {
    /// The delta every later cached balance must shift by.
    #[must_use]
    pub fn balance_adjustment(&self) -> Decimal {
        -self.movement.value
    }

    /// The account balance after the removal.
    #[must_use]
    pub fn new_account_balance(&self) -> Decimal {
        self.account.current_balance - self.movement.value
    }

    /// Persists the removal and cascades the adjustment to every movement
    /// ordered after the deleted one.
    ///
    /// The cascade runs unconditionally: a movement's value is never zero
    /// under the sign convention, so the adjustment is never zero. The
    /// cascade is applied before the record is removed - the two commute,
    /// since the cascade only touches movements strictly after the cutoff -
    /// so a failed cascade can be unwound without having to reinsert a
    /// deleted record.
    pub async fn execute<S: LedgerStore>(
        &self,
        store: &S,
        engine: &RecalculationEngine<S>,
    ) -> Result<(), LedgerError> {
        let adjustment = self.balance_adjustment();

        store
            .set_account_balance(self.account.id, self.new_account_balance())
            .await?;

        if let Err(err) = engine
            .recalculate(self.account.id, self.movement.cutoff(), adjustment)
            .await
        {
            self.restore_balance(store).await;
            return Err(err);
        }

        if let Err(err) = store.delete_movement(self.movement.id).await {
            if engine
                .recalculate(self.account.id, self.movement.cutoff(), -adjustment)
                .await
                .is_err()
            {
                error!(
                    account_id = %self.account.id,
                    "failed to reverse cascade while unwinding a movement deletion"
                );
            }
            self.restore_balance(store).await;
            return Err(err.into());
        }

        Ok(())
    }

    async fn restore_balance<S: LedgerStore>(&self, store: &S) {
        if store
            .set_account_balance(self.account.id, self.account.current_balance)
            .await
            .is_err()
        {
            error!(
                account_id = %self.account.id,
                "failed to restore account balance while unwinding a movement deletion"
            );
        }
    }
}
