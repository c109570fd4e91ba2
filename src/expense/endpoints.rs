//! Route handlers for adding, listing, deleting and exporting expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    export::csv_download,
    expense::core::{Expense, ExpenseId, NewExpense, create_expense, delete_expense, get_expenses},
    validation::{AmountInput, JsonBody, PathParam, non_blank, parse_amount, parse_date},
};

/// The state needed to manage expense.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing expense.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for adding expense.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseForm {
    pub category: Option<String>,
    pub amount: Option<AmountInput>,
    pub date: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<ExpenseForm> for NewExpense {
    type Error = Error;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        let (Some(category), Some(amount), Some(date)) = (
            non_blank(form.category.as_deref()),
            form.amount.as_ref(),
            non_blank(form.date.as_deref()),
        ) else {
            return Err(Error::MissingFields("Category, amount and date are required"));
        };

        Ok(NewExpense {
            category: category.to_owned(),
            amount: parse_amount(amount)?,
            date: parse_date(date)?,
            icon: non_blank(form.icon.as_deref()).map(str::to_owned),
            description: non_blank(form.description.as_deref()).map(str::to_owned),
        })
    }
}

/// A route handler that saves a new expense for the current user and responds with the saved record.
pub async fn add_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(form): JsonBody<ExpenseForm>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let new_expense = NewExpense::try_from(form)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = create_expense(user_id, new_expense, &connection)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// A route handler that lists the current user's expense, newest first.
pub async fn get_expenses_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Expense>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_expenses(user_id, &connection).map(Json)
}

/// A route handler that deletes one of the current user's expense records.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    PathParam(expense_id): PathParam<ExpenseId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_expense(user_id, expense_id, &connection)? {
        0 => Err(Error::ExpenseNotFound),
        _ => Ok(Json(json!({ "message": "Expense deleted successfully" }))),
    }
}

#[derive(Serialize)]
struct ExpenseExportRow<'a> {
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Date")]
    date: Date,
}

/// A route handler that downloads the current user's expense as a CSV file.
pub async fn download_expenses_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let expenses = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_expenses(user_id, &connection)?
    };

    let rows: Vec<ExpenseExportRow> = expenses
        .iter()
        .map(|expense| ExpenseExportRow {
            category: &expense.category,
            amount: expense.amount,
            date: expense.date,
        })
        .collect();

    csv_download("Expenses_List.csv", &rows)
}
