//! Concrete ledger store implementations.
//!
//! This crate provides:
//! - An in-memory `LedgerStore` for tests and embedding
//! - A retry decorator applying backoff to transient read failures

pub mod memory;
pub mod retry;

pub use memory::InMemoryLedgerStore;
pub use retry::{RetryPolicy, RetryingStore};
