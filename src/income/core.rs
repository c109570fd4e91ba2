//! The income model and its database queries.

use rusqlite::{Connection, Row, params};
use serde::Serialize;
use time::Date;

use crate::{Error, auth::UserID, database_id::DatabaseId};

pub type IncomeId = DatabaseId;

/// Money the user earned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Income {
    /// The id of the income record.
    pub id: IncomeId,
    /// Where the money came from, e.g. "Salary".
    pub source: String,
    /// The amount earned, always positive.
    pub amount: f64,
    /// When the money was earned.
    pub date: Date,
    /// An optional emoji or icon URL shown next to the record.
    pub icon: Option<String>,
    /// Optional free text about the income.
    pub description: Option<String>,
}

/// A validated income that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub source: String,
    pub amount: f64,
    pub date: Date,
    pub icon: Option<String>,
    pub description: Option<String>,
}

pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS income (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            source TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            icon TEXT,
            description TEXT,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_income_user_date ON income(user_id, date)",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_income(row: &Row) -> Result<Income, rusqlite::Error> {
    Ok(Income {
        id: row.get(0)?,
        source: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        icon: row.get(4)?,
        description: row.get(5)?,
    })
}

/// Save a new income for `user_id`.
///
/// # Errors
/// Returns an [Error::SqlError] if the insert fails.
pub fn create_income(
    user_id: UserID,
    income: NewIncome,
    connection: &Connection,
) -> Result<Income, Error> {
    connection
        .prepare(
            "INSERT INTO income (user_id, source, amount, date, icon, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, source, amount, date, icon, description",
        )?
        .query_row(
            params![
                user_id.as_i64(),
                income.source,
                income.amount,
                income.date,
                income.icon,
                income.description
            ],
            map_row_to_income,
        )
        .map_err(Error::from)
}

/// Get all of the user's income, newest first.
pub fn get_incomes(user_id: UserID, connection: &Connection) -> Result<Vec<Income>, Error> {
    connection
        .prepare(
            "SELECT id, source, amount, date, icon, description FROM income
             WHERE user_id = ?1
             ORDER BY date DESC, id DESC",
        )?
        .query_map(params![user_id.as_i64()], map_row_to_income)?
        .collect::<Result<Vec<Income>, rusqlite::Error>>()
        .map_err(Error::from)
}

/// Get the user's income dated on or after `start`, newest first.
pub fn get_incomes_since(
    user_id: UserID,
    start: Date,
    connection: &Connection,
) -> Result<Vec<Income>, Error> {
    connection
        .prepare(
            "SELECT id, source, amount, date, icon, description FROM income
             WHERE user_id = ?1 AND date >= ?2
             ORDER BY date DESC, id DESC",
        )?
        .query_map(params![user_id.as_i64(), start], map_row_to_income)?
        .collect::<Result<Vec<Income>, rusqlite::Error>>()
        .map_err(Error::from)
}

/// Get at most `limit` of the user's most recent income records, newest first.
pub fn get_latest_incomes(
    user_id: UserID,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Income>, Error> {
    connection
        .prepare(
            "SELECT id, source, amount, date, icon, description FROM income
             WHERE user_id = ?1
             ORDER BY date DESC, id DESC
             LIMIT ?2",
        )?
        .query_map(params![user_id.as_i64(), limit], map_row_to_income)?
        .collect::<Result<Vec<Income>, rusqlite::Error>>()
        .map_err(Error::from)
}

/// Get the sum of all of the user's income, zero if there is none.
pub fn get_total_income(user_id: UserID, connection: &Connection) -> Result<f64, Error> {
    let mut stmt =
        connection.prepare("SELECT COALESCE(SUM(amount), 0.0) FROM income WHERE user_id = ?1")?;

    let total: f64 = stmt.query_row(params![user_id.as_i64()], |row| row.get(0))?;

    Ok(total)
}

type RowsAffected = usize;

/// Delete the income `id` if it belongs to `user_id`.
pub fn delete_income(
    user_id: UserID,
    id: IncomeId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM income WHERE id = ?1 AND user_id = ?2",
            params![id, user_id.as_i64()],
        )
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        auth::UserID,
        income::core::{
            NewIncome, create_income, delete_income, get_incomes, get_incomes_since,
            get_latest_incomes, get_total_income,
        },
        test_utils::{create_test_user, get_test_connection},
    };

    fn new_income(amount: f64, date: time::Date) -> NewIncome {
        NewIncome {
            source: "Salary".to_owned(),
            amount,
            date,
            icon: None,
            description: None,
        }
    }

    fn setup() -> (Connection, UserID) {
        let conn = get_test_connection();
        let user_id = create_test_user(&conn, "a@example.com");
        (conn, user_id)
    }

    #[test]
    fn can_create_income() {
        let (conn, user_id) = setup();

        let income = create_income(
            user_id,
            NewIncome {
                source: "Freelance".to_owned(),
                amount: 250.0,
                date: date!(2025 - 06 - 01),
                icon: Some("💼".to_owned()),
                description: Some("Logo design".to_owned()),
            },
            &conn,
        )
        .unwrap();

        assert!(income.id > 0);
        assert_eq!(income.source, "Freelance");
        assert_eq!(income.icon.as_deref(), Some("💼"));
        assert_eq!(get_incomes(user_id, &conn).unwrap(), vec![income]);
    }

    #[test]
    fn incomes_are_sorted_newest_first() {
        let (conn, user_id) = setup();
        let older = create_income(user_id, new_income(1.0, date!(2025 - 01 - 01)), &conn).unwrap();
        let newer = create_income(user_id, new_income(2.0, date!(2025 - 02 - 01)), &conn).unwrap();
        let same_day =
            create_income(user_id, new_income(3.0, date!(2025 - 02 - 01)), &conn).unwrap();

        let incomes = get_incomes(user_id, &conn).unwrap();

        assert_eq!(incomes, vec![same_day, newer, older]);
    }

    #[test]
    fn incomes_are_scoped_to_user() {
        let (conn, user_id) = setup();
        let other_user = create_test_user(&conn, "b@example.com");
        create_income(other_user, new_income(10.0, date!(2025 - 01 - 01)), &conn).unwrap();

        assert!(get_incomes(user_id, &conn).unwrap().is_empty());
        assert_eq!(get_total_income(user_id, &conn).unwrap(), 0.0);
        assert_eq!(get_total_income(other_user, &conn).unwrap(), 10.0);
    }

    #[test]
    fn total_is_zero_without_income() {
        let (conn, user_id) = setup();

        assert_eq!(get_total_income(user_id, &conn).unwrap(), 0.0);
    }

    #[test]
    fn gets_incomes_since_start_date_inclusive() {
        let (conn, user_id) = setup();
        create_income(user_id, new_income(1.0, date!(2025 - 01 - 01)), &conn).unwrap();
        let on_start =
            create_income(user_id, new_income(2.0, date!(2025 - 01 - 02)), &conn).unwrap();
        let after = create_income(user_id, new_income(4.0, date!(2025 - 01 - 10)), &conn).unwrap();

        let incomes = get_incomes_since(user_id, date!(2025 - 01 - 02), &conn).unwrap();

        assert_eq!(incomes, vec![after, on_start]);
    }

    #[test]
    fn latest_incomes_are_limited() {
        let (conn, user_id) = setup();
        for day in 1..=7 {
            let date = time::Date::from_calendar_date(2025, time::Month::March, day).unwrap();
            create_income(user_id, new_income(day as f64, date), &conn).unwrap();
        }

        let latest = get_latest_incomes(user_id, 5, &conn).unwrap();

        let amounts: Vec<f64> = latest.iter().map(|income| income.amount).collect();
        assert_eq!(amounts, vec![7.0, 6.0, 5.0, 4.0, 3.0]);
    }

    #[test]
    fn delete_only_removes_own_income() {
        let (conn, user_id) = setup();
        let other_user = create_test_user(&conn, "b@example.com");
        let income = create_income(user_id, new_income(5.0, date!(2025 - 01 - 01)), &conn).unwrap();

        assert_eq!(delete_income(other_user, income.id, &conn).unwrap(), 0);
        assert_eq!(delete_income(user_id, income.id, &conn).unwrap(), 1);
        assert!(get_incomes(user_id, &conn).unwrap().is_empty());
    }
}
