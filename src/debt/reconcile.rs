//! Balance reconciliation: rebuilds a person's cached balance from their debt transactions.

use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    debt::core::{DebtKind, DebtTransaction, get_person_debt_transactions},
    person::{Person, get_person_by_name, set_person_balance},
};

/// Sum borrowed amounts minus spent amounts.
///
/// The order of `transactions` does not affect the result.
pub fn fold_balance<'a>(transactions: impl IntoIterator<Item = &'a DebtTransaction>) -> f64 {
    transactions
        .into_iter()
        .fold(0.0, |balance, transaction| match transaction.kind {
            DebtKind::Borrow => balance + transaction.amount,
            DebtKind::Spent => balance - transaction.amount,
        })
}

/// Recompute and store the balance of the user's person called `name`.
///
/// Returns the person with their new balance, or `None` without touching the
/// database if the user has no person called `name`.
pub fn reconcile_person_balance(
    user_id: UserID,
    name: &str,
    connection: &Connection,
) -> Result<Option<Person>, Error> {
    let Some(person) = get_person_by_name(user_id, name, connection)? else {
        tracing::warn!(
            "skipping balance reconciliation for unknown person \"{name}\" of user {user_id}"
        );
        return Ok(None);
    };

    let transactions = get_person_debt_transactions(user_id, person.id, connection)?;
    let balance = fold_balance(&transactions);
    set_person_balance(person.id, balance, connection)?;

    tracing::debug!(
        "reconciled balance of \"{name}\" from {} transactions: {} -> {balance}",
        transactions.len(),
        person.balance
    );

    Ok(Some(Person { balance, ..person }))
}
