//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::{
    AppState, Error,
    auth::{auth_guard, get_user_profile_endpoint},
    dashboard::get_dashboard_endpoint,
    debt::{
        borrow_endpoint, delete_debt_transaction_endpoint, download_person_history_endpoint,
        get_debt_transactions_endpoint, get_people_endpoint, get_person_history_endpoint,
        spent_endpoint,
    },
    endpoints,
    expense::{
        add_expense_endpoint, delete_expense_endpoint, download_expenses_endpoint,
        get_expenses_endpoint,
    },
    income::{
        add_income_endpoint, delete_income_endpoint, download_incomes_endpoint,
        get_incomes_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route requires a valid auth cookie.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::USER_PROFILE, get(get_user_profile_endpoint))
        .route(endpoints::INCOME_ADD, post(add_income_endpoint))
        .route(endpoints::INCOME_LIST, get(get_incomes_endpoint))
        .route(endpoints::INCOME_DOWNLOAD, get(download_incomes_endpoint))
        .route(endpoints::INCOME_DELETE, delete(delete_income_endpoint))
        .route(endpoints::EXPENSE_ADD, post(add_expense_endpoint))
        .route(endpoints::EXPENSE_LIST, get(get_expenses_endpoint))
        .route(endpoints::EXPENSE_DOWNLOAD, get(download_expenses_endpoint))
        .route(endpoints::EXPENSE_DELETE, delete(delete_expense_endpoint))
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(endpoints::DEBT_BORROW, post(borrow_endpoint))
        .route(endpoints::DEBT_SPENT, post(spent_endpoint))
        .route(endpoints::DEBT_PEOPLE, get(get_people_endpoint))
        .route(
            endpoints::DEBT_TRANSACTIONS,
            get(get_debt_transactions_endpoint),
        )
        .route(
            endpoints::DEBT_DELETE,
            delete(delete_debt_transaction_endpoint),
        )
        .route(
            endpoints::DEBT_PERSON_HISTORY,
            get(get_person_history_endpoint),
        )
        .route(
            endpoints::DEBT_PERSON_DOWNLOAD,
            get(download_person_history_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use crate::{endpoints, test_utils::get_test_app};

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let app = get_test_app().await;

        let response = app.server.get("/api/v1/nothing/here").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], "Not found");
    }

    #[tokio::test]
    async fn every_route_requires_auth() {
        let app = get_test_app().await;

        for path in [
            endpoints::USER_PROFILE,
            endpoints::INCOME_LIST,
            endpoints::EXPENSE_LIST,
            endpoints::DASHBOARD,
            endpoints::DEBT_PEOPLE,
            endpoints::DEBT_TRANSACTIONS,
        ] {
            let response = app.server.get(path).await;

            response.assert_status(StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn get_user_returns_profile() {
        let app = get_test_app().await;

        let response = app
            .server
            .get(endpoints::USER_PROFILE)
            .add_cookie(app.cookie.clone())
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["id"], app.user_id.as_i64());
        assert_eq!(body["email"], "test@example.com");
        assert!(body.get("password").is_none());
    }
}
