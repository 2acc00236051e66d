//! Ledger account domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use saldo_shared::types::AccountId;
use serde::{Deserialize, Serialize};

/// A ledger account with a cached current balance.
///
/// The balance is denormalized for read efficiency: it always equals
/// `initial_balance` plus the sum of all movement values, equivalently the
/// `post_movement_balance` of the account's latest movement. It is only ever
/// mutated through movement operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Opening balance, immutable once the account is created.
    pub initial_balance: Decimal,
    /// Cached balance after the latest movement.
    pub current_balance: Decimal,
    /// Inactive accounts reject new movements.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new active account. The current balance starts at the
    /// initial balance.
    #[must_use]
    pub fn new(initial_balance: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            initial_balance,
            current_balance: initial_balance,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the balance that applying `value` to the current balance
    /// would produce. Values are signed, so this is a plain addition for
    /// credits and debits alike.
    #[must_use]
    pub fn balance_after(&self, value: Decimal) -> Decimal {
        self.current_balance + value
    }
}
