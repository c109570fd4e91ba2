//! Route handlers for adding, listing, deleting and exporting income.

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
    income::core::{Income, IncomeId, NewIncome, create_income, delete_income, get_incomes},
    validation::{AmountInput, JsonBody, PathParam, non_blank, parse_amount, parse_date},
};

/// The state needed to manage income.
#[derive(Debug, Clone)]
pub struct IncomeState {
    /// The database connection for managing income.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for adding income.
#[derive(Debug, Default, Deserialize)]
pub struct IncomeForm {
    pub source: Option<String>,
    pub amount: Option<AmountInput>,
    pub date: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<IncomeForm> for NewIncome {
    type Error = Error;

    fn try_from(form: IncomeForm) -> Result<Self, Self::Error> {
        let (Some(source), Some(amount), Some(date)) = (
            non_blank(form.source.as_deref()),
            form.amount.as_ref(),
            non_blank(form.date.as_deref()),
        ) else {
            return Err(Error::MissingFields("Source, amount and date are required"));
        };

        Ok(NewIncome {
            source: source.to_owned(),
            amount: parse_amount(amount)?,
            date: parse_date(date)?,
            icon: non_blank(form.icon.as_deref()).map(str::to_owned),
            description: non_blank(form.description.as_deref()).map(str::to_owned),
        })
    }
}

/// A route handler that saves a new income for the current user and responds with the saved record.
pub async fn add_income_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(form): JsonBody<IncomeForm>,
) -> Result<(StatusCode, Json<Income>), Error> {
    let new_income = NewIncome::try_from(form)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let income = create_income(user_id, new_income, &connection)?;

    Ok((StatusCode::CREATED, Json(income)))
}

/// A route handler that lists the current user's income, newest first.
pub async fn get_incomes_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Income>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_incomes(user_id, &connection).map(Json)
}

/// A route handler that deletes one of the current user's income records.
pub async fn delete_income_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    PathParam(income_id): PathParam<IncomeId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_income(user_id, income_id, &connection)? {
        0 => Err(Error::IncomeNotFound),
        _ => Ok(Json(json!({ "message": "Income deleted successfully" }))),
    }
}

#[derive(Serialize)]
struct IncomeExportRow<'a> {
    #[serde(rename = "Source")]
    source: &'a str,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Date")]
    date: Date,
}

/// A route handler that downloads the current user's income as a CSV file.
pub async fn download_incomes_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let incomes = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_incomes(user_id, &connection)?
    };

    let rows: Vec<IncomeExportRow> = incomes
        .iter()
        .map(|income| IncomeExportRow {
            source: &income.source,
            amount: income.amount,
            date: income.date,
        })
        .collect();

    csv_download("Incomes_List.csv", &rows)
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header::CONTENT_DISPOSITION};
    use serde_json::{Value, json};

    use crate::{
        Error,
        endpoints::{self, format_endpoint},
        income::{core::NewIncome, endpoints::IncomeForm},
        test_utils::get_test_app,
        validation::AmountInput,
    };

    #[test]
    fn form_without_source_is_rejected() {
        let form = IncomeForm {
            source: Some("  ".to_owned()),
            amount: Some(AmountInput::Number(10.0)),
            date: Some("2025-01-01".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            NewIncome::try_from(form),
            Err(Error::MissingFields("Source, amount and date are required"))
        );
    }

    #[test]
    fn form_with_blank_optional_fields_stores_none() {
        let form = IncomeForm {
            source: Some(" Salary ".to_owned()),
            amount: Some(AmountInput::Text("1000".to_owned())),
            date: Some("2025-01-01".to_owned()),
            icon: Some("".to_owned()),
            description: None,
        };

        let income = NewIncome::try_from(form).unwrap();

        assert_eq!(income.source, "Salary");
        assert_eq!(income.amount, 1000.0);
        assert_eq!(income.icon, None);
    }

    #[tokio::test]
    async fn add_income_returns_created_record() {
        let app = get_test_app().await;

        let response = app
            .server
            .post(endpoints::INCOME_ADD)
            .add_cookie(app.cookie.clone())
            .json(&json!({
                "source": "Salary",
                "amount": 1000,
                "date": "2025-03-01",
                "icon": "💰"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["source"], "Salary");
        assert_eq!(body["amount"], 1000.0);
        assert_eq!(body["date"], "2025-03-01");
        assert_eq!(body["icon"], "💰");
    }

    #[tokio::test]
    async fn add_income_with_missing_fields_is_bad_request() {
        let app = get_test_app().await;

        let response = app
            .server
            .post(endpoints::INCOME_ADD)
            .add_cookie(app.cookie.clone())
            .json(&json!({ "source": "Salary" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Source, amount and date are required");
    }

    #[tokio::test]
    async fn add_income_without_cookie_is_unauthorized() {
        let app = get_test_app().await;

        let response = app
            .server
            .post(endpoints::INCOME_ADD)
            .json(&json!({ "source": "Salary", "amount": 1, "date": "2025-03-01" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn list_incomes_is_newest_first() {
        let app = get_test_app().await;
        for (source, date) in [("Old", "2025-01-01"), ("New", "2025-02-01")] {
            app.server
                .post(endpoints::INCOME_ADD)
                .add_cookie(app.cookie.clone())
                .json(&json!({ "source": source, "amount": 5, "date": date }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = app
            .server
            .get(endpoints::INCOME_LIST)
            .add_cookie(app.cookie.clone())
            .await;

        response.assert_status_ok();
        let body: Vec<Value> = response.json();
        let sources: Vec<&str> = body
            .iter()
            .map(|income| income["source"].as_str().unwrap())
            .collect();
        assert_eq!(sources, vec!["New", "Old"]);
    }

    #[tokio::test]
    async fn delete_income_removes_record() {
        let app = get_test_app().await;
        let created: Value = app
            .server
            .post(endpoints::INCOME_ADD)
            .add_cookie(app.cookie.clone())
            .json(&json!({ "source": "Gift", "amount": 20, "date": "2025-01-01" }))
            .await
            .json();
        let path = format_endpoint(endpoints::INCOME_DELETE, created["id"].as_i64().unwrap());

        let response = app
            .server
            .delete(&path)
            .add_cookie(app.cookie.clone())
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Income deleted successfully");

        let response = app
            .server
            .delete(&path)
            .add_cookie(app.cookie.clone())
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn add_income_with_oversized_amount_is_bad_request() {
        let app = get_test_app().await;

        for _ in 0..2 {
            let response = app
                .server
                .post(endpoints::INCOME_ADD)
                .add_cookie(app.cookie.clone())
                .json(&json!({ "source": "Lottery", "amount": 1e308, "date": "2025-03-01" }))
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["message"], "Amount must be a positive number");
        }

        let response = app
            .server
            .get(endpoints::DASHBOARD)
            .add_cookie(app.cookie.clone())
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["totalIncome"], 0.0);
        assert_eq!(body["totalBalance"], 0.0);
    }

    #[tokio::test]
    async fn delete_income_with_non_numeric_id_is_json_bad_request() {
        let app = get_test_app().await;

        let response = app
            .server
            .delete(&format_endpoint(endpoints::INCOME_DELETE, "abc"))
            .add_cookie(app.cookie.clone())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid path parameter");
    }

    #[tokio::test]
    async fn download_incomes_serves_csv() {
        let app = get_test_app().await;
        app.server
            .post(endpoints::INCOME_ADD)
            .add_cookie(app.cookie.clone())
            .json(&json!({ "source": "Salary", "amount": 1000, "date": "2025-03-01" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = app
            .server
            .get(endpoints::INCOME_DOWNLOAD)
            .add_cookie(app.cookie.clone())
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header(CONTENT_DISPOSITION),
            "attachment; filename=\"Incomes_List.csv\""
        );
        assert_eq!(response.text(), "Source,Amount,Date\nSalary,1000.0,2025-03-01\n");
    }
}
