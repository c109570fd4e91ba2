//! Debt transactions: money given to ("borrow") or got back from ("spent") a person.

use rusqlite::{
    Connection, OptionalExtension, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    database_id::DatabaseId,
    person::{Person, PersonId},
};

pub type DebtTransactionId = DatabaseId;

/// Whether money went to a person or came back from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtKind {
    /// The user gave the person money, the person's balance goes up.
    Borrow,
    /// The person paid the user back, the person's balance goes down.
    Spent,
}

impl DebtKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtKind::Borrow => "borrow",
            DebtKind::Spent => "spent",
        }
    }
}

impl ToSql for DebtKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for DebtKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "borrow" => Ok(DebtKind::Borrow),
            "spent" => Ok(DebtKind::Spent),
            other => Err(FromSqlError::Other(
                format!("unknown debt transaction type \"{other}\"").into(),
            )),
        }
    }
}

/// A debt transaction as stored, referring to its person by ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtTransaction {
    pub id: DebtTransactionId,
    #[serde(rename = "person")]
    pub person_id: PersonId,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: DebtKind,
    pub description: Option<String>,
    pub date: Date,
}

/// A debt transaction with its person filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulatedDebtTransaction {
    pub id: DebtTransactionId,
    pub person: Person,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: DebtKind,
    pub description: Option<String>,
    pub date: Date,
}

/// A validated debt transaction that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDebtTransaction {
    pub kind: DebtKind,
    pub amount: f64,
    pub date: Date,
    pub description: Option<String>,
}

pub fn create_debt_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS debt_transaction (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            person_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('borrow', 'spent')),
            description TEXT,
            date TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(person_id) REFERENCES person(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_debt_transaction_person ON debt_transaction(user_id, person_id)",
        (),
    )?;

    Ok(())
}

fn map_row_to_debt_transaction(row: &Row) -> Result<DebtTransaction, rusqlite::Error> {
    Ok(DebtTransaction {
        id: row.get(0)?,
        person_id: row.get(1)?,
        amount: row.get(2)?,
        kind: row.get(3)?,
        description: row.get(4)?,
        date: row.get(5)?,
    })
}

fn map_row_to_populated_debt_transaction(
    row: &Row,
) -> Result<PopulatedDebtTransaction, rusqlite::Error> {
    Ok(PopulatedDebtTransaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        kind: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        person: Person {
            id: row.get(5)?,
            name: row.get(6)?,
            balance: row.get(7)?,
        },
    })
}

/// Save a debt transaction between the user and `person_id`.
///
/// The person's balance is not touched, callers reconcile it afterwards.
pub fn create_debt_transaction(
    user_id: UserID,
    person_id: PersonId,
    transaction: NewDebtTransaction,
    connection: &Connection,
) -> Result<DebtTransaction, Error> {
    connection
        .prepare(
            "INSERT INTO debt_transaction (user_id, person_id, amount, type, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, person_id, amount, type, description, date",
        )?
        .query_row(
            params![
                user_id.as_i64(),
                person_id,
                transaction.amount,
                transaction.kind,
                transaction.description,
                transaction.date
            ],
            map_row_to_debt_transaction,
        )
        .map_err(Error::from)
}

/// Get the debt transaction `id` with its person, if it belongs to `user_id`.
pub fn get_debt_transaction(
    user_id: UserID,
    id: DebtTransactionId,
    connection: &Connection,
) -> Result<Option<PopulatedDebtTransaction>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.amount, t.type, t.description, t.date, p.id, p.name, p.balance
             FROM debt_transaction t
             INNER JOIN person p ON p.id = t.person_id
             WHERE t.id = ?1 AND t.user_id = ?2",
        )?
        .query_row(
            params![id, user_id.as_i64()],
            map_row_to_populated_debt_transaction,
        )
        .optional()
        .map_err(Error::from)
}

/// Get all of the user's debt transactions with their people, newest first.
pub fn get_debt_transactions(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<PopulatedDebtTransaction>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.amount, t.type, t.description, t.date, p.id, p.name, p.balance
             FROM debt_transaction t
             INNER JOIN person p ON p.id = t.person_id
             WHERE t.user_id = ?1
             ORDER BY t.date DESC, t.id DESC",
        )?
        .query_map(
            params![user_id.as_i64()],
            map_row_to_populated_debt_transaction,
        )?
        .collect::<Result<Vec<_>, rusqlite::Error>>()
        .map_err(Error::from)
}

/// Get the debt transactions between the user and one person, newest first.
pub fn get_person_debt_transactions(
    user_id: UserID,
    person_id: PersonId,
    connection: &Connection,
) -> Result<Vec<DebtTransaction>, Error> {
    connection
        .prepare(
            "SELECT id, person_id, amount, type, description, date FROM debt_transaction
             WHERE user_id = ?1 AND person_id = ?2
             ORDER BY date DESC, id DESC",
        )?
        .query_map(
            params![user_id.as_i64(), person_id],
            map_row_to_debt_transaction,
        )?
        .collect::<Result<Vec<_>, rusqlite::Error>>()
        .map_err(Error::from)
}

type RowsAffected = usize;

/// Delete the debt transaction `id` if it belongs to `user_id`.
///
/// The person's balance is not touched, callers reconcile it afterwards.
pub fn delete_debt_transaction(
    user_id: UserID,
    id: DebtTransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM debt_transaction WHERE id = ?1 AND user_id = ?2",
            params![id, user_id.as_i64()],
        )
        .map_err(Error::from)
}
