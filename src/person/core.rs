//! The people the user lends money to and gets money back from.

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

use crate::{Error, auth::UserID, database_id::DatabaseId};

pub type PersonId = DatabaseId;

/// Someone the user has debt transactions with.
///
/// `balance` is derived from the person's debt transactions and is only
/// written by balance reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub balance: f64,
}

pub fn create_person_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS person (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            balance REAL NOT NULL DEFAULT 0,
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_person(row: &Row) -> Result<Person, rusqlite::Error> {
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        balance: row.get(2)?,
    })
}

/// Create a person with a zero balance.
///
/// # Errors
/// Returns an [Error::DuplicatePerson] if the user already has a person called `name`.
pub fn create_person(user_id: UserID, name: &str, connection: &Connection) -> Result<Person, Error> {
    connection
        .prepare(
            "INSERT INTO person (user_id, name, balance) VALUES (?1, ?2, 0)
             RETURNING id, name, balance",
        )?
        .query_row(params![user_id.as_i64(), name], map_row_to_person)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Error::DuplicatePerson(name.to_owned())
            }
            error => error.into(),
        })
}

/// Get the user's person called `name`, if there is one.
pub fn get_person_by_name(
    user_id: UserID,
    name: &str,
    connection: &Connection,
) -> Result<Option<Person>, Error> {
    connection
        .prepare("SELECT id, name, balance FROM person WHERE user_id = ?1 AND name = ?2")?
        .query_row(params![user_id.as_i64(), name], map_row_to_person)
        .optional()
        .map_err(Error::from)
}

/// Get the user's person called `name`, creating them with a zero balance
/// on first use.
pub fn find_or_create_person(
    user_id: UserID,
    name: &str,
    connection: &Connection,
) -> Result<Person, Error> {
    match get_person_by_name(user_id, name, connection)? {
        Some(person) => Ok(person),
        None => {
            tracing::debug!("creating person \"{name}\" for user {user_id}");
            create_person(user_id, name, connection)
        }
    }
}

/// Get all of the user's people sorted by name.
pub fn get_people(user_id: UserID, connection: &Connection) -> Result<Vec<Person>, Error> {
    connection
        .prepare("SELECT id, name, balance FROM person WHERE user_id = ?1 ORDER BY name ASC")?
        .query_map(params![user_id.as_i64()], map_row_to_person)?
        .collect::<Result<Vec<Person>, rusqlite::Error>>()
        .map_err(Error::from)
}

/// Overwrite the stored balance of a person.
pub fn set_person_balance(
    id: PersonId,
    balance: f64,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE person SET balance = ?1 WHERE id = ?2",
        params![balance, id],
    )?;

    Ok(())
}
