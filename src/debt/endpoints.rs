//! Route handlers for the debt tracker.

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
    debt::{
        core::{
            DebtKind, DebtTransaction, DebtTransactionId, NewDebtTransaction,
            PopulatedDebtTransaction, get_debt_transactions, get_person_debt_transactions,
        },
        record::{record_debt_transaction, remove_debt_transaction},
    },
    export::csv_download,
    person::{Person, get_people, get_person_by_name},
    validation::{AmountInput, JsonBody, PathParam, non_blank, parse_amount, parse_date},
};

/// The state needed for the debt tracker.
#[derive(Debug, Clone)]
pub struct DebtState {
    /// The database connection for managing people and debt transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DebtState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for recording a borrow or a spend.
#[derive(Debug, Default, Deserialize)]
pub struct DebtForm {
    pub name: Option<String>,
    pub amount: Option<AmountInput>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl DebtForm {
    /// Validate the form, returning the trimmed person name and the transaction to save.
    fn validate(&self, kind: DebtKind) -> Result<(String, NewDebtTransaction), Error> {
        let (Some(name), Some(amount), Some(date)) = (
            non_blank(self.name.as_deref()),
            self.amount.as_ref(),
            non_blank(self.date.as_deref()),
        ) else {
            return Err(Error::MissingFields("Name, amount, and date are required"));
        };

        let transaction = NewDebtTransaction {
            kind,
            amount: parse_amount(amount)?,
            date: parse_date(date)?,
            description: non_blank(self.description.as_deref()).map(str::to_owned),
        };

        Ok((name.to_owned(), transaction))
    }
}

/// The response body for a recorded debt transaction.
#[derive(Debug, Serialize)]
pub struct RecordedTransaction {
    pub message: &'static str,
    pub transaction: DebtTransaction,
}

fn record(
    state: &DebtState,
    user_id: UserID,
    form: &DebtForm,
    kind: DebtKind,
) -> Result<(StatusCode, Json<RecordedTransaction>), Error> {
    let (name, new_transaction) = form.validate(kind)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = record_debt_transaction(user_id, &name, new_transaction, &connection)?;

    let message = match kind {
        DebtKind::Borrow => "Borrow recorded",
        DebtKind::Spent => "Spent recorded",
    };

    Ok((
        StatusCode::CREATED,
        Json(RecordedTransaction {
            message,
            transaction,
        }),
    ))
}

/// A route handler that records money the user gave to a person.
pub async fn borrow_endpoint(
    State(state): State<DebtState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(form): JsonBody<DebtForm>,
) -> Result<(StatusCode, Json<RecordedTransaction>), Error> {
    record(&state, user_id, &form, DebtKind::Borrow)
}

/// A route handler that records money a person paid back to the user.
pub async fn spent_endpoint(
    State(state): State<DebtState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(form): JsonBody<DebtForm>,
) -> Result<(StatusCode, Json<RecordedTransaction>), Error> {
    record(&state, user_id, &form, DebtKind::Spent)
}

/// A route handler that lists the user's people and their balances, sorted by name.
pub async fn get_people_endpoint(
    State(state): State<DebtState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Person>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_people(user_id, &connection).map(Json)
}

/// A route handler that lists all of the user's debt transactions with their people, newest first.
pub async fn get_debt_transactions_endpoint(
    State(state): State<DebtState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<PopulatedDebtTransaction>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_debt_transactions(user_id, &connection).map(Json)
}

/// A route handler that deletes a debt transaction and reconciles the person's balance.
pub async fn delete_debt_transaction_endpoint(
    State(state): State<DebtState>,
    Extension(user_id): Extension<UserID>,
    PathParam(transaction_id): PathParam<DebtTransactionId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    remove_debt_transaction(user_id, transaction_id, &connection)?;

    Ok(Json(json!({ "message": "Transaction deleted" })))
}

/// The debt history between the user and one person.
#[derive(Debug, Serialize)]
pub struct PersonHistory {
    /// The person's name.
    pub person: String,
    pub balance: f64,
    /// Newest first.
    pub transactions: Vec<DebtTransaction>,
}

fn get_person_history(
    user_id: UserID,
    name: &str,
    connection: &Connection,
) -> Result<PersonHistory, Error> {
    let name = name.trim();
    let person = get_person_by_name(user_id, name, connection)?
        .ok_or_else(|| Error::PersonNotFound(name.to_owned()))?;
    let transactions = get_person_debt_transactions(user_id, person.id, connection)?;

    Ok(PersonHistory {
        person: person.name,
        balance: person.balance,
        transactions,
    })
}

/// A route handler for the debt history with one person.
pub async fn get_person_history_endpoint(
    State(state): State<DebtState>,
    Extension(user_id): Extension<UserID>,
    PathParam(name): PathParam<String>,
) -> Result<Json<PersonHistory>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_person_history(user_id, &name, &connection).map(Json)
}

#[derive(Serialize)]
struct DebtExportRow<'a> {
    #[serde(rename = "Type")]
    kind: &'static str,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Date")]
    date: Date,
}

impl<'a> From<&'a DebtTransaction> for DebtExportRow<'a> {
    fn from(transaction: &'a DebtTransaction) -> Self {
        Self {
            kind: match transaction.kind {
                DebtKind::Borrow => "You Gave",
                DebtKind::Spent => "You Got Back",
            },
            amount: transaction.amount,
            description: transaction.description.as_deref().unwrap_or_default(),
            date: transaction.date,
        }
    }
}

/// A route handler that downloads the debt history with one person as a CSV file.
pub async fn download_person_history_endpoint(
    State(state): State<DebtState>,
    Extension(user_id): Extension<UserID>,
    PathParam(name): PathParam<String>,
) -> Result<Response, Error> {
    let history = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_person_history(user_id, &name, &connection)?
    };

    let rows: Vec<DebtExportRow> = history.transactions.iter().map(DebtExportRow::from).collect();

    csv_download(&format!("{}_Transactions.csv", history.person), &rows)
}
