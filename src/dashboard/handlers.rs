//! The dashboard route handler and the queries behind it.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    dashboard::aggregation::{
        EXPENSE_WINDOW_DAYS, INCOME_WINDOW_DAYS, LATEST_PER_KIND, TimelineEntry,
        merge_newest_first, total, window_start,
    },
    expense::{Expense, get_expenses_since, get_latest_expenses, get_total_expense},
    income::{Income, get_incomes_since, get_latest_incomes, get_total_income},
    timezone::get_local_date,
};

/// The state needed for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading income and expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Records in a window of recent days and their sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Window<T> {
    pub total: f64,
    /// Newest first.
    pub transactions: Vec<T>,
}

/// A summary of the user's income and expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Total income minus total expenses.
    pub total_balance: f64,
    pub total_income: f64,
    pub total_expense: f64,
    #[serde(rename = "last30DaysExpense")]
    pub last_30_days_expense: Window<Expense>,
    #[serde(rename = "last60DaysIncome")]
    pub last_60_days_income: Window<Income>,
    /// The latest income and expense records, newest first.
    pub last_transactions: Vec<TimelineEntry>,
}

/// Build the dashboard for `user_id` with the windows ending on `today`.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the queries fail.
pub fn build_dashboard(
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<Dashboard, Error> {
    let total_income = get_total_income(user_id, connection)?;
    let total_expense = get_total_expense(user_id, connection)?;

    let recent_incomes = get_incomes_since(
        user_id,
        window_start(today, INCOME_WINDOW_DAYS),
        connection,
    )?;
    let recent_expenses = get_expenses_since(
        user_id,
        window_start(today, EXPENSE_WINDOW_DAYS),
        connection,
    )?;

    let last_transactions = merge_newest_first(
        get_latest_incomes(user_id, LATEST_PER_KIND, connection)?,
        get_latest_expenses(user_id, LATEST_PER_KIND, connection)?,
    );

    Ok(Dashboard {
        total_balance: total_income - total_expense,
        total_income,
        total_expense,
        last_30_days_expense: Window {
            total: total(recent_expenses.iter().map(|expense| expense.amount)),
            transactions: recent_expenses,
        },
        last_60_days_income: Window {
            total: total(recent_incomes.iter().map(|income| income.amount)),
            transactions: recent_incomes,
        },
        last_transactions,
    })
}

/// A route handler for the current user's dashboard summary.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Dashboard>, Error> {
    let today = get_local_date(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    build_dashboard(user_id, today, &connection).map(Json)
}
