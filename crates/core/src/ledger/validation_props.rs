//! Property tests for the movement validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;
use saldo_shared::types::AccountId;

use super::account::Account;
use super::movement::{CreateMovementRequest, MovementType};
use super::validation::ValidationChain;

fn account_with_balance(balance: Decimal) -> Account {
    let mut account = Account::new(Decimal::ZERO);
    account.current_balance = balance;
    account
}

fn debit_request(account_id: AccountId, magnitude: Decimal) -> CreateMovementRequest {
    CreateMovementRequest {
        account_id,
        movement_type: MovementType::Debit,
        value: -magnitude,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A debit never exceeding the balance always passes the default chain.
    #[test]
    fn prop_covered_debit_passes(
        balance in 1i64..1_000_000i64,
        fraction in 1i64..=100i64,
    ) {
        let balance = Decimal::new(balance, 2);
        let magnitude = balance * Decimal::new(fraction, 2); // up to 100% of balance
        let account = account_with_balance(balance);
        let request = debit_request(account.id, magnitude);

        prop_assert!(ValidationChain::default_chain().check(&account, &request).is_ok());
    }

    /// A debit exceeding the balance always fails, whatever the amounts.
    #[test]
    fn prop_overdraft_debit_fails(
        balance in 0i64..1_000_000i64,
        excess in 1i64..1_000_000i64,
    ) {
        let balance = Decimal::new(balance, 2);
        let magnitude = balance + Decimal::new(excess, 2);
        let account = account_with_balance(balance);
        let request = debit_request(account.id, magnitude);

        prop_assert!(ValidationChain::default_chain().check(&account, &request).is_err());
    }

    /// Credits are never rejected by the funds rule, regardless of balance.
    #[test]
    fn prop_credit_passes_any_balance(
        balance in -1_000_000i64..1_000_000i64,
        value in 1i64..1_000_000i64,
    ) {
        let account = account_with_balance(Decimal::new(balance, 2));
        let request = CreateMovementRequest {
            account_id: account.id,
            movement_type: MovementType::Credit,
            value: Decimal::new(value, 2),
        };

        prop_assert!(ValidationChain::default_chain().check(&account, &request).is_ok());
    }

    /// Inactive accounts reject every movement, whatever the amounts.
    #[test]
    fn prop_inactive_account_rejects_everything(
        balance in 0i64..1_000_000i64,
        value in 1i64..1_000_000i64,
        credit in any::<bool>(),
    ) {
        let mut account = account_with_balance(Decimal::new(balance, 2));
        account.is_active = false;
        let value = Decimal::new(value, 2);
        let request = CreateMovementRequest {
            account_id: account.id,
            movement_type: if credit { MovementType::Credit } else { MovementType::Debit },
            value: if credit { value } else { -value },
        };

        prop_assert!(ValidationChain::default_chain().check(&account, &request).is_err());
    }
}
