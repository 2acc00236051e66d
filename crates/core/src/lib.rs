//! Core ledger logic for Saldo.
//!
//! This crate contains the domain logic with no persistence technology
//! dependencies: domain types, validation rules, movement commands, the
//! balance recalculation engine, and the abstract store boundary.
//!
//! # Modules
//!
//! - `ledger` - Per-account movement ledger with cached running balances

pub mod ledger;
