//! Movement domain types and the running-balance chain invariant.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use saldo_shared::types::{AccountId, MovementId};
use serde::{Deserialize, Serialize};

/// Whether a movement adds to or draws from the account balance.
///
/// Values are signed: credits carry positive values, debits negative ones,
/// and both apply additively to balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Adds funds; value must be strictly positive.
    Credit,
    /// Draws funds; value must be strictly negative.
    Debit,
}

impl MovementType {
    /// Returns true if `value` carries the sign this movement type requires.
    /// Zero never matches either type.
    #[must_use]
    pub fn matches_sign(self, value: Decimal) -> bool {
        match self {
            Self::Credit => value > Decimal::ZERO,
            Self::Debit => value < Decimal::ZERO,
        }
    }
}

/// A single credit or debit event affecting one account's balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    /// Unique identifier.
    pub id: MovementId,
    /// Owning account, immutable.
    pub account_id: AccountId,
    /// Instant of occurrence. This is the ordering key, not the record time.
    pub date: DateTime<Utc>,
    /// Per-account monotonic counter assigned by the store on insert.
    /// Breaks ties when two movements share a timestamp.
    pub sequence: i64,
    /// Credit or debit.
    pub movement_type: MovementType,
    /// Signed amount: positive for credits, negative for debits.
    pub value: Decimal,
    /// Cached account balance immediately after this movement, given the
    /// ordering by `(date, sequence)`.
    pub post_movement_balance: Decimal,
    /// Audit timestamp.
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// The exclusive boundary selecting every movement ordered after this one.
    #[must_use]
    pub fn cutoff(&self) -> Cutoff {
        Cutoff {
            date: self.date,
            sequence: self.sequence,
        }
    }

    /// Account balance immediately before this movement.
    #[must_use]
    pub fn balance_before(&self) -> Decimal {
        self.post_movement_balance - self.value
    }

    /// Ordering key within one account.
    #[must_use]
    pub fn ordering_key(&self) -> (DateTime<Utc>, i64) {
        (self.date, self.sequence)
    }
}

/// A movement ready to be inserted; the store assigns the `sequence`.
#[derive(Debug, Clone)]
pub struct NewMovement {
    /// Unique identifier.
    pub id: MovementId,
    /// Owning account.
    pub account_id: AccountId,
    /// Instant of occurrence.
    pub date: DateTime<Utc>,
    /// Credit or debit.
    pub movement_type: MovementType,
    /// Signed amount.
    pub value: Decimal,
    /// Cached account balance immediately after this movement.
    pub post_movement_balance: Decimal,
    /// Audit timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewMovement {
    /// Attaches the store-assigned sequence, completing the movement.
    #[must_use]
    pub fn with_sequence(self, sequence: i64) -> Movement {
        Movement {
            id: self.id,
            account_id: self.account_id,
            date: self.date,
            sequence,
            movement_type: self.movement_type,
            value: self.value,
            post_movement_balance: self.post_movement_balance,
            created_at: self.created_at,
        }
    }
}

/// Exclusive lower boundary for "movements after" queries.
///
/// Comparison is lexicographic on `(date, sequence)`, so a movement sharing
/// the boundary timestamp is selected only if its sequence is greater. The
/// triggering movement itself is therefore always excluded, regardless of
/// timestamp collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cutoff {
    /// Boundary instant.
    pub date: DateTime<Utc>,
    /// Boundary sequence within the owning account.
    pub sequence: i64,
}

impl Cutoff {
    /// Returns true if `movement` is ordered strictly after this boundary.
    #[must_use]
    pub fn selects(&self, movement: &Movement) -> bool {
        movement.ordering_key() > (self.date, self.sequence)
    }
}

/// Request to create a movement on an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMovementRequest {
    /// Target account.
    pub account_id: AccountId,
    /// Credit or debit.
    pub movement_type: MovementType,
    /// Signed amount: positive for credits, negative for debits.
    pub value: Decimal,
}

/// Revised type and value for an existing movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMovementRequest {
    /// Revised movement type.
    pub movement_type: MovementType,
    /// Revised signed amount.
    pub value: Decimal,
}

/// Checks the running-balance chain for one account's movements.
///
/// `movements` must be ordered ascending by `(date, sequence)`. Each cached
/// balance must equal the previous one plus the movement's value, starting
/// from the account's initial balance.
#[must_use]
pub fn balance_chain_holds(initial_balance: Decimal, movements: &[Movement]) -> bool {
    let mut running = initial_balance;
    for movement in movements {
        running += movement.value;
        if movement.post_movement_balance != running {
            return false;
        }
    }
    true
}
