//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more required fields were missing from a request body.
    ///
    /// The string is the message shown to the client, e.g. "Name, amount, and
    /// date are required".
    #[error("{0}")]
    MissingFields(&'static str),

    /// The request body was not valid JSON or a field had the wrong type.
    #[error("invalid request body: {0}")]
    InvalidJson(String),

    /// A path parameter could not be parsed, e.g. a non-numeric record ID.
    #[error("invalid path parameter: {0}")]
    InvalidPathParam(String),

    /// An amount was zero, negative or not a number.
    #[error("amount must be a positive number, got {0}")]
    InvalidAmount(String),

    /// A date could not be parsed as a calendar date (YYYY-MM-DD).
    #[error("could not parse \"{0}\" as a date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The request did not carry a valid auth token.
    #[error("not authorized, no token")]
    Unauthorized,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The user ID does not belong to a registered user.
    #[error("user not found")]
    UserNotFound,

    /// The debt transaction does not exist or belongs to a different user.
    #[error("transaction not found")]
    TransactionNotFound,

    /// No person with the given name exists for the user.
    #[error("person \"{0}\" not found")]
    PersonNotFound(String),

    /// The income record does not exist or belongs to a different user.
    #[error("income not found")]
    IncomeNotFound,

    /// The expense record does not exist or belongs to a different user.
    #[error("expense not found")]
    ExpenseNotFound,

    /// A person with the same name already exists for the user.
    #[error("the person \"{0}\" already exists")]
    DuplicatePerson(String),

    /// A user with the same email is already registered.
    #[error("the email is already registered")]
    DuplicateEmail,

    /// Records could not be written as a CSV file.
    #[error("could not export records: {0}")]
    ExportError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidJson(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidPathParam(rejection.body_text())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::ExportError(value.to_string())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    /// A human readable description of what went wrong.
    pub message: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields(_)
            | Error::InvalidJson(_)
            | Error::InvalidPathParam(_)
            | Error::InvalidAmount(_)
            | Error::InvalidDate(_)
            | Error::DuplicatePerson(_)
            | Error::DuplicateEmail => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::NotFound
            | Error::UserNotFound
            | Error::TransactionNotFound
            | Error::PersonNotFound(_)
            | Error::IncomeNotFound
            | Error::ExpenseNotFound => StatusCode::NOT_FOUND,
            Error::ExportError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Error::MissingFields(message) => (*message).to_owned(),
            Error::InvalidJson(_) => "Invalid request body".to_owned(),
            Error::InvalidPathParam(_) => "Invalid path parameter".to_owned(),
            Error::InvalidAmount(_) => "Amount must be a positive number".to_owned(),
            Error::InvalidDate(_) => "Date must be in the format YYYY-MM-DD".to_owned(),
            Error::Unauthorized => "Not authorized, no token".to_owned(),
            Error::NotFound => "Not found".to_owned(),
            Error::UserNotFound => "User not found".to_owned(),
            Error::TransactionNotFound => "Transaction not found".to_owned(),
            Error::PersonNotFound(_) => "Person not found".to_owned(),
            Error::IncomeNotFound => "Income not found".to_owned(),
            Error::ExpenseNotFound => "Expense not found".to_owned(),
            Error::DuplicatePerson(name) => format!("{name} already exists"),
            Error::DuplicateEmail => "User already exists".to_owned(),
            // Internal details stay in the server logs.
            Error::ExportError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::SqlError(_) => "Server error".to_owned(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        let body = ErrorMessage {
            message: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}
