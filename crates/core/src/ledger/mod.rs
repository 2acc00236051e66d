//! Per-account movement ledger with cached running balances.
//!
//! This module implements the core ledger functionality:
//! - Account and movement domain types
//! - Business rule validation for prospective movements
//! - Movement creation, update, and deletion
//! - Cascading recalculation of cached balances
//! - The abstract store boundary
//! - Per-account serialization of mutations

pub mod account;
pub mod commands;
pub mod error;
pub mod locks;
pub mod movement;
pub mod recalculation;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use account::Account;
pub use commands::{DeleteMovementCommand, UpdateMovementCommand};
pub use error::LedgerError;
pub use locks::AccountLocks;
pub use movement::{
    CreateMovementRequest, Cutoff, Movement, MovementType, NewMovement, UpdateMovementRequest,
    balance_chain_holds,
};
pub use recalculation::RecalculationEngine;
pub use service::MovementService;
pub use store::{LedgerStore, MovementFilter, StoreError};
pub use validation::{AccountActive, MovementRule, SufficientFunds, ValidationChain};
