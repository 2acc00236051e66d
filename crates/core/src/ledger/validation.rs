//! Business rule validation for prospective movements.
//!
//! Rules run in order against the account state *before* the movement is
//! applied; the first failure short-circuits the chain. Rules are stateless
//! and side-effect free.

use rust_decimal::Decimal;

use super::account::Account;
use super::error::LedgerError;
use super::movement::{CreateMovementRequest, MovementType};

/// A single check of a prospective movement against its account.
pub trait MovementRule: Send + Sync {
    /// Short rule name, used in logs.
    fn name(&self) -> &'static str;

    /// Approves or rejects the movement. Must evaluate against the
    /// pre-movement account state.
    fn check(&self, account: &Account, request: &CreateMovementRequest)
    -> Result<(), LedgerError>;
}

/// An ordered sequence of movement rules with short-circuit on first failure.
pub struct ValidationChain {
    rules: Vec<Box<dyn MovementRule>>,
}

impl ValidationChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule to the end of the chain.
    #[must_use]
    pub fn with_rule(mut self, rule: impl MovementRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// The standard chain: active account, then sufficient funds.
    #[must_use]
    pub fn default_chain() -> Self {
        Self::new().with_rule(AccountActive).with_rule(SufficientFunds)
    }

    /// Runs every rule in order, stopping at the first failure.
    pub fn check(
        &self,
        account: &Account,
        request: &CreateMovementRequest,
    ) -> Result<(), LedgerError> {
        for rule in &self.rules {
            rule.check(account, request)?;
        }
        Ok(())
    }

    /// Number of rules in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the chain has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for ValidationChain {
    fn default() -> Self {
        Self::default_chain()
    }
}

/// Rejects movements on inactive accounts.
pub struct AccountActive;

impl MovementRule for AccountActive {
    fn name(&self) -> &'static str {
        "account_active"
    }

    fn check(
        &self,
        account: &Account,
        _request: &CreateMovementRequest,
    ) -> Result<(), LedgerError> {
        if account.is_active {
            Ok(())
        } else {
            Err(LedgerError::TransactionNotAllowed(format!(
                "account {} is inactive",
                account.id
            )))
        }
    }
}

/// Rejects debits that would drive the balance negative.
///
/// Debit values are negative, so the prospective balance is
/// `current_balance + value`. A resulting balance of exactly zero is
/// allowed. Credits are never rejected by this rule.
pub struct SufficientFunds;

impl MovementRule for SufficientFunds {
    fn name(&self) -> &'static str {
        "sufficient_funds"
    }

    fn check(
        &self,
        account: &Account,
        request: &CreateMovementRequest,
    ) -> Result<(), LedgerError> {
        if request.movement_type == MovementType::Debit
            && account.balance_after(request.value) < Decimal::ZERO
        {
            return Err(LedgerError::TransactionNotAllowed(format!(
                "insufficient funds: balance {}, requested {}",
                account.current_balance,
                request.value.abs()
            )));
        }
        Ok(())
    }
}
