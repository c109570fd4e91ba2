//! The expense model and its database queries.

use rusqlite::{Connection, Row, params};
use serde::Serialize;
use time::Date;

use crate::{Error, auth::UserID, database_id::DatabaseId};

pub type ExpenseId = DatabaseId;

/// Money the user spent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The id of the expense record.
    pub id: ExpenseId,
    /// What the money was spent on, e.g. "Groceries".
    pub category: String,
    /// The amount spent, always positive.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
    /// An optional emoji or icon URL shown next to the record.
    pub icon: Option<String>,
    /// Optional free text about the expense.
    pub description: Option<String>,
}

/// A validated expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    pub date: Date,
    pub icon: Option<String>,
    pub description: Option<String>,
}

pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            icon TEXT,
            description TEXT,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date)",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        icon: row.get(4)?,
        description: row.get(5)?,
    })
}

/// Save a new expense for `user_id`.
///
/// # Errors
/// Returns an [Error::SqlError] if the insert fails.
pub fn create_expense(
    user_id: UserID,
    expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "INSERT INTO expense (user_id, category, amount, date, icon, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, category, amount, date, icon, description",
        )?
        .query_row(
            params![
                user_id.as_i64(),
                expense.category,
                expense.amount,
                expense.date,
                expense.icon,
                expense.description
            ],
            map_row_to_expense,
        )
        .map_err(Error::from)
}

/// Get all of the user's expense, newest first.
pub fn get_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, category, amount, date, icon, description FROM expense
             WHERE user_id = ?1
             ORDER BY date DESC, id DESC",
        )?
        .query_map(params![user_id.as_i64()], map_row_to_expense)?
        .collect::<Result<Vec<Expense>, rusqlite::Error>>()
        .map_err(Error::from)
}

/// Get the user's expense dated on or after `start`, newest first.
pub fn get_expenses_since(
    user_id: UserID,
    start: Date,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, category, amount, date, icon, description FROM expense
             WHERE user_id = ?1 AND date >= ?2
             ORDER BY date DESC, id DESC",
        )?
        .query_map(params![user_id.as_i64(), start], map_row_to_expense)?
        .collect::<Result<Vec<Expense>, rusqlite::Error>>()
        .map_err(Error::from)
}

/// Get at most `limit` of the user's most recent expense records, newest first.
pub fn get_latest_expenses(
    user_id: UserID,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, category, amount, date, icon, description FROM expense
             WHERE user_id = ?1
             ORDER BY date DESC, id DESC
             LIMIT ?2",
        )?
        .query_map(params![user_id.as_i64(), limit], map_row_to_expense)?
        .collect::<Result<Vec<Expense>, rusqlite::Error>>()
        .map_err(Error::from)
}

/// Get the sum of all of the user's expense, zero if there is none.
pub fn get_total_expense(user_id: UserID, connection: &Connection) -> Result<f64, Error> {
    let mut stmt =
        connection.prepare("SELECT COALESCE(SUM(amount), 0.0) FROM expense WHERE user_id = ?1")?;

    let total: f64 = stmt.query_row(params![user_id.as_i64()], |row| row.get(0))?;

    Ok(total)
}

type RowsAffected = usize;

/// Delete the expense `id` if it belongs to `user_id`.
pub fn delete_expense(
    user_id: UserID,
    id: ExpenseId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
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
        expense::core::{
            NewExpense, create_expense, delete_expense, get_expenses, get_expenses_since,
            get_latest_expenses, get_total_expense,
        },
        test_utils::{create_test_user, get_test_connection},
    };

    fn new_expense(amount: f64, date: time::Date) -> NewExpense {
        NewExpense {
            category: "Groceries".to_owned(),
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
    fn can_create_expense() {
        let (conn, user_id) = setup();

        let expense = create_expense(
            user_id,
            NewExpense {
                category: "Travel".to_owned(),
                amount: 250.0,
                date: date!(2025 - 06 - 01),
                icon: Some("✈️".to_owned()),
                description: Some("Train to Wellington".to_owned()),
            },
            &conn,
        )
        .unwrap();

        assert!(expense.id > 0);
        assert_eq!(expense.category, "Travel");
        assert_eq!(expense.icon.as_deref(), Some("✈️"));
        assert_eq!(get_expenses(user_id, &conn).unwrap(), vec![expense]);
    }

    #[test]
    fn expenses_are_sorted_newest_first() {
        let (conn, user_id) = setup();
        let older = create_expense(user_id, new_expense(1.0, date!(2025 - 01 - 01)), &conn).unwrap();
        let newer = create_expense(user_id, new_expense(2.0, date!(2025 - 02 - 01)), &conn).unwrap();
        let same_day =
            create_expense(user_id, new_expense(3.0, date!(2025 - 02 - 01)), &conn).unwrap();

        let expenses = get_expenses(user_id, &conn).unwrap();

        assert_eq!(expenses, vec![same_day, newer, older]);
    }

    #[test]
    fn expenses_are_scoped_to_user() {
        let (conn, user_id) = setup();
        let other_user = create_test_user(&conn, "b@example.com");
        create_expense(other_user, new_expense(10.0, date!(2025 - 01 - 01)), &conn).unwrap();

        assert!(get_expenses(user_id, &conn).unwrap().is_empty());
        assert_eq!(get_total_expense(user_id, &conn).unwrap(), 0.0);
        assert_eq!(get_total_expense(other_user, &conn).unwrap(), 10.0);
    }

    #[test]
    fn total_is_zero_without_expense() {
        let (conn, user_id) = setup();

        assert_eq!(get_total_expense(user_id, &conn).unwrap(), 0.0);
    }

    #[test]
    fn gets_expenses_since_start_date_inclusive() {
        let (conn, user_id) = setup();
        create_expense(user_id, new_expense(1.0, date!(2025 - 01 - 01)), &conn).unwrap();
        let on_start =
            create_expense(user_id, new_expense(2.0, date!(2025 - 01 - 02)), &conn).unwrap();
        let after = create_expense(user_id, new_expense(4.0, date!(2025 - 01 - 10)), &conn).unwrap();

        let expenses = get_expenses_since(user_id, date!(2025 - 01 - 02), &conn).unwrap();

        assert_eq!(expenses, vec![after, on_start]);
    }

    #[test]
    fn latest_expenses_are_limited() {
        let (conn, user_id) = setup();
        for day in 1..=7 {
            let date = time::Date::from_calendar_date(2025, time::Month::March, day).unwrap();
            create_expense(user_id, new_expense(day as f64, date), &conn).unwrap();
        }

        let latest = get_latest_expenses(user_id, 5, &conn).unwrap();

        let amounts: Vec<f64> = latest.iter().map(|expense| expense.amount).collect();
        assert_eq!(amounts, vec![7.0, 6.0, 5.0, 4.0, 3.0]);
    }

    #[test]
    fn delete_only_removes_own_expense() {
        let (conn, user_id) = setup();
        let other_user = create_test_user(&conn, "b@example.com");
        let expense = create_expense(user_id, new_expense(5.0, date!(2025 - 01 - 01)), &conn).unwrap();

        assert_eq!(delete_expense(other_user, expense.id, &conn).unwrap(), 0);
        assert_eq!(delete_expense(user_id, expense.id, &conn).unwrap(), 1);
        assert!(get_expenses(user_id, &conn).unwrap().is_empty());
    }
}
