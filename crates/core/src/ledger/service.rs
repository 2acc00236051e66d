//! Movement service: create, revise, remove, and query movements.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use saldo_shared::types::pagination::{PageRequest, PageResponse};
use saldo_shared::types::{AccountId, MovementId};
use tracing::{error, info};

use super::commands::{DeleteMovementCommand, UpdateMovementCommand};
use super::error::LedgerError;
use super::locks::AccountLocks;
use super::movement::{CreateMovementRequest, Movement, MovementType, NewMovement, UpdateMovementRequest};
use super::recalculation::RecalculationEngine;
use super::store::{LedgerStore, MovementFilter};
use super::validation::ValidationChain;

/// Entry point for all movement operations on the ledger.
///
/// Mutations on one account are serialized through [`AccountLocks`]: the
/// lock is held from the first read to the last write, so two concurrent
/// operations can never interleave a read-modify-write of the cached
/// balance. Operations on different accounts run in parallel.
pub struct MovementService<S> {
    store: Arc<S>,
    engine: RecalculationEngine<S>,
    chain: ValidationChain,
    locks: AccountLocks,
}

impl<S: LedgerStore> MovementService<S> {
    /// Creates a service with the standard validation chain.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_chain(store, ValidationChain::default_chain())
    }

    /// Creates a service with a custom validation chain.
    #[must_use]
    pub fn with_chain(store: Arc<S>, chain: ValidationChain) -> Self {
        Self {
            engine: RecalculationEngine::new(Arc::clone(&store)),
            store,
            chain,
            locks: AccountLocks::new(),
        }
    }

    /// Creates a movement dated now.
    ///
    /// The sign precondition and the validation chain both run against the
    /// account's pre-movement balance, before any write. Because the date is
    /// the current instant the new movement orders last, so no cascade is
    /// needed. If the movement write fails after the balance write, the
    /// balance is rolled back before the error is surfaced.
    pub async fn create_movement(
        &self,
        request: CreateMovementRequest,
    ) -> Result<Movement, LedgerError> {
        let _guard = self.locks.acquire(request.account_id).await;

        let account = self.store.get_account(request.account_id).await?;

        check_sign_convention(request.movement_type, request.value)?;
        self.chain.check(&account, &request)?;

        let new_balance = account.balance_after(request.value);
        let now = Utc::now();
        let draft = NewMovement {
            id: MovementId::new(),
            account_id: account.id,
            date: now,
            movement_type: request.movement_type,
            value: request.value,
            post_movement_balance: new_balance,
            created_at: now,
        };

        self.store.set_account_balance(account.id, new_balance).await?;

        match self.store.save_movement(draft).await {
            Ok(movement) => {
                info!(
                    account_id = %account.id,
                    movement_id = %movement.id,
                    value = %movement.value,
                    "movement created"
                );
                Ok(movement)
            }
            Err(err) => {
                if self
                    .store
                    .set_account_balance(account.id, account.current_balance)
                    .await
                    .is_err()
                {
                    error!(
                        account_id = %account.id,
                        "failed to restore account balance after movement write failure"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Revises a movement's type and value, shifting the cached balance of
    /// every later movement by the value delta.
    pub async fn update_movement(
        &self,
        movement_id: MovementId,
        request: UpdateMovementRequest,
    ) -> Result<Movement, LedgerError> {
        // The first read only locates the owning account; the movement is
        // re-read under the account lock before anything is computed from it.
        let account_id = self.store.get_movement(movement_id).await?.account_id;
        let _guard = self.locks.acquire(account_id).await;

        let old_movement = self.store.get_movement(movement_id).await?;
        let account = self.store.get_account(old_movement.account_id).await?;

        check_sign_convention(request.movement_type, request.value)?;

        let command = UpdateMovementCommand {
            account,
            old_movement,
            new_type: request.movement_type,
            new_value: request.value,
        };
        let adjustment = command.balance_adjustment();
        let updated = command.execute(self.store.as_ref(), &self.engine).await?;

        info!(movement_id = %updated.id, %adjustment, "movement updated");
        Ok(updated)
    }

    /// Deletes a movement, shifting the cached balance of every later
    /// movement by the negated value.
    pub async fn delete_movement(&self, movement_id: MovementId) -> Result<(), LedgerError> {
        let account_id = self.store.get_movement(movement_id).await?.account_id;
        let _guard = self.locks.acquire(account_id).await;

        let movement = self.store.get_movement(movement_id).await?;
        let account = self.store.get_account(movement.account_id).await?;

        let command = DeleteMovementCommand { account, movement };
        command.execute(self.store.as_ref(), &self.engine).await?;

        info!(%movement_id, "movement deleted");
        Ok(())
    }

    /// Fetches a movement by id.
    pub async fn get_movement(&self, movement_id: MovementId) -> Result<Movement, LedgerError> {
        Ok(self.store.get_movement(movement_id).await?)
    }

    /// Pages through an account's movements, newest first, optionally
    /// bounded by a date range. Unknown accounts surface as a not-found
    /// error rather than an empty page.
    pub async fn list_movements(
        &self,
        account_id: AccountId,
        filter: MovementFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Movement>, LedgerError> {
        self.store.get_account(account_id).await?;
        Ok(self.store.find_movements(account_id, filter, page).await?)
    }
}

/// Rejects values whose sign does not match the movement type: credits must
/// be strictly positive, debits strictly negative.
fn check_sign_convention(
    movement_type: MovementType,
    value: Decimal,
) -> Result<(), LedgerError> {
    if movement_type.matches_sign(value) {
        return Ok(());
    }
    Err(LedgerError::TransactionNotAllowed(
        match movement_type {
            MovementType::Credit => "credit movements must have a positive value",
            MovementType::Debit => "debit movements must have a negative value",
        }
        .to_string(),
    ))
}
