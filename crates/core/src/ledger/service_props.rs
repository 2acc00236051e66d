//! Property tests for movement command arithmetic and cascade correction.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use saldo_shared::types::{AccountId, MovementId};

use super::account::Account;
use super::commands::{DeleteMovementCommand, UpdateMovementCommand};
use super::movement::{Movement, MovementType, balance_chain_holds};

/// Strategy for signed movement values (never zero).
fn value_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64, any::<bool>()).prop_map(|(magnitude, negative)| {
        let value = Decimal::new(magnitude, 2);
        if negative { -value } else { value }
    })
}

fn values_strategy(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(value_strategy(), 1..=max_len)
}

/// Builds a consistent movement chain from an initial balance and values.
fn build_chain(account_id: AccountId, initial_balance: Decimal, values: &[Decimal]) -> Vec<Movement> {
    let start = Utc::now();
    let mut running = initial_balance;
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            running += value;
            #[allow(clippy::cast_possible_wrap)]
            let sequence = index as i64 + 1;
            Movement {
                id: MovementId::new(),
                account_id,
                date: start + Duration::seconds(sequence),
                sequence,
                movement_type: if *value > Decimal::ZERO {
                    MovementType::Credit
                } else {
                    MovementType::Debit
                },
                value: *value,
                post_movement_balance: running,
                created_at: start,
            }
        })
        .collect()
}

fn account_with_balance(balance: Decimal) -> Account {
    let mut account = Account::new(Decimal::ZERO);
    account.current_balance = balance;
    account
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A freshly built chain always satisfies the running-balance invariant,
    /// and its last cached balance is the account's current balance.
    #[test]
    fn prop_built_chain_is_consistent(
        initial in -100_000i64..100_000i64,
        values in values_strategy(20),
    ) {
        let initial_balance = Decimal::new(initial, 2);
        let chain = build_chain(AccountId::new(), initial_balance, &values);

        prop_assert!(balance_chain_holds(initial_balance, &chain));

        let expected: Decimal = initial_balance + values.iter().copied().sum::<Decimal>();
        prop_assert_eq!(chain.last().unwrap().post_movement_balance, expected);
    }

    /// The update command's adjustment, account balance, and rebuilt cached
    /// balance agree with each other.
    #[test]
    fn prop_update_arithmetic_is_consistent(
        balance in -100_000i64..100_000i64,
        old_value in value_strategy(),
        old_post in -100_000i64..100_000i64,
        new_value in value_strategy(),
    ) {
        let account = account_with_balance(Decimal::new(balance, 2));
        let mut chain = build_chain(account.id, Decimal::ZERO, &[old_value]);
        chain[0].post_movement_balance = Decimal::new(old_post, 2);

        let command = UpdateMovementCommand {
            account: account.clone(),
            old_movement: chain.remove(0),
            new_type: if new_value > Decimal::ZERO {
                MovementType::Credit
            } else {
                MovementType::Debit
            },
            new_value,
        };

        let adjustment = command.balance_adjustment();
        prop_assert_eq!(
            command.new_account_balance(),
            account.current_balance + adjustment
        );

        let updated = command.updated_movement();
        prop_assert_eq!(updated.value, new_value);
        // The balance carried into the movement is unchanged by the revision.
        prop_assert_eq!(updated.balance_before(), command.old_movement.balance_before());
        prop_assert_eq!(
            updated.post_movement_balance,
            command.old_movement.post_movement_balance + adjustment
        );
    }

    /// Revising one movement and shifting every later cached balance by the
    /// value delta restores the chain invariant; earlier movements are
    /// untouched.
    #[test]
    fn prop_update_cascade_restores_chain(
        initial in -100_000i64..100_000i64,
        values in values_strategy(15),
        index in any::<prop::sample::Index>(),
        new_value in value_strategy(),
    ) {
        let initial_balance = Decimal::new(initial, 2);
        let account_id = AccountId::new();
        let mut chain = build_chain(account_id, initial_balance, &values);
        let position = index.index(chain.len());

        let account = account_with_balance(
            chain.last().map_or(initial_balance, |m| m.post_movement_balance),
        );
        let command = UpdateMovementCommand {
            account,
            old_movement: chain[position].clone(),
            new_type: if new_value > Decimal::ZERO {
                MovementType::Credit
            } else {
                MovementType::Debit
            },
            new_value,
        };
        let adjustment = command.balance_adjustment();

        let earlier_snapshot: Vec<Decimal> = chain[..position]
            .iter()
            .map(|m| m.post_movement_balance)
            .collect();

        // Apply the command's writes to the in-memory chain.
        chain[position] = command.updated_movement();
        let cutoff = command.old_movement.cutoff();
        for movement in &mut chain {
            if cutoff.selects(movement) {
                movement.post_movement_balance += adjustment;
            }
        }

        prop_assert!(balance_chain_holds(initial_balance, &chain));
        prop_assert_eq!(
            chain.last().unwrap().post_movement_balance,
            command.new_account_balance()
        );

        let earlier_after: Vec<Decimal> = chain[..position]
            .iter()
            .map(|m| m.post_movement_balance)
            .collect();
        prop_assert_eq!(earlier_snapshot, earlier_after);
    }

    /// Deleting one movement and shifting every later cached balance by the
    /// negated value restores the chain invariant.
    #[test]
    fn prop_delete_cascade_restores_chain(
        initial in -100_000i64..100_000i64,
        values in values_strategy(15),
        index in any::<prop::sample::Index>(),
    ) {
        let initial_balance = Decimal::new(initial, 2);
        let account_id = AccountId::new();
        let mut chain = build_chain(account_id, initial_balance, &values);
        let position = index.index(chain.len());

        let account = account_with_balance(
            chain.last().map_or(initial_balance, |m| m.post_movement_balance),
        );
        let command = DeleteMovementCommand {
            account,
            movement: chain[position].clone(),
        };
        let adjustment = command.balance_adjustment();
        let cutoff = command.movement.cutoff();

        chain.remove(position);
        for movement in &mut chain {
            if cutoff.selects(movement) {
                movement.post_movement_balance += adjustment;
            }
        }

        prop_assert!(balance_chain_holds(initial_balance, &chain));

        let expected_balance = chain
            .last()
            .map_or(initial_balance, |m| m.post_movement_balance);
        prop_assert_eq!(command.new_account_balance(), expected_balance);
    }
}
