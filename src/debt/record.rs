//! Recording and removing debt transactions, keeping the person's balance in step.
//!
//! Each mutation and the reconciliation that follows it run in one SQL
//! transaction: either both are committed or neither is.

use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    debt::{
        core::{
            DebtTransaction, DebtTransactionId, NewDebtTransaction, create_debt_transaction,
            delete_debt_transaction, get_debt_transaction,
        },
        reconcile::reconcile_person_balance,
    },
    person::{Person, find_or_create_person},
};

/// Save a debt transaction with the person called `name`, creating the person
/// on first use, and reconcile their balance.
pub fn record_debt_transaction(
    user_id: UserID,
    name: &str,
    new_transaction: NewDebtTransaction,
    connection: &Connection,
) -> Result<DebtTransaction, Error> {
    let tx = connection.unchecked_transaction()?;

    let person = find_or_create_person(user_id, name, &tx)?;
    let transaction = create_debt_transaction(user_id, person.id, new_transaction, &tx)?;
    reconcile_person_balance(user_id, &person.name, &tx)?;

    tx.commit()?;

    Ok(transaction)
}

/// Delete one of the user's debt transactions and reconcile the balance of
/// the person it was with.
///
/// Returns the person with their updated balance.
///
/// # Errors
/// Returns an [Error::TransactionNotFound] if `id` does not exist or belongs to another user.
pub fn remove_debt_transaction(
    user_id: UserID,
    id: DebtTransactionId,
    connection: &Connection,
) -> Result<Option<Person>, Error> {
    let tx = connection.unchecked_transaction()?;

    // The person has to be read before the transaction that refers to them is gone.
    let transaction = get_debt_transaction(user_id, id, &tx)?.ok_or(Error::TransactionNotFound)?;
    delete_debt_transaction(user_id, id, &tx)?;
    let person = reconcile_person_balance(user_id, &transaction.person.name, &tx)?;

    tx.commit()?;

    Ok(person)
}
