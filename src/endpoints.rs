//! The API endpoints URIs.
//!
//! Endpoints that take a parameter, e.g., '/api/v1/income/{income_id}', are matched by axum's path syntax.

/// The route for the profile of the current user.
pub const USER_PROFILE: &str = "/api/v1/auth/getUser";

/// The route to add an income record.
pub const INCOME_ADD: &str = "/api/v1/income/add";
/// The route to list income records.
pub const INCOME_LIST: &str = "/api/v1/income/get";
/// The route to download income records as a CSV file.
pub const INCOME_DOWNLOAD: &str = "/api/v1/income/download";
/// The route to delete an income record.
pub const INCOME_DELETE: &str = "/api/v1/income/{income_id}";

/// The route to add an expense record.
pub const EXPENSE_ADD: &str = "/api/v1/expense/add";
/// The route to list expense records.
pub const EXPENSE_LIST: &str = "/api/v1/expense/get";
/// The route to download expense records as a CSV file.
pub const EXPENSE_DOWNLOAD: &str = "/api/v1/expense/download";
/// The route to delete an expense record.
pub const EXPENSE_DELETE: &str = "/api/v1/expense/{expense_id}";

/// The route for the dashboard summary.
pub const DASHBOARD: &str = "/api/v1/dashboard";

/// The route to record money given to a person.
pub const DEBT_BORROW: &str = "/api/v1/transaction/borrow";
/// The route to record money a person paid back.
pub const DEBT_SPENT: &str = "/api/v1/transaction/spent";
/// The route to list people and their balances.
pub const DEBT_PEOPLE: &str = "/api/v1/transaction/get_people";
/// The route to list debt transactions.
pub const DEBT_TRANSACTIONS: &str = "/api/v1/transaction/get_transactions";
/// The route to delete a debt transaction.
pub const DEBT_DELETE: &str = "/api/v1/transaction/{transaction_id}";
/// The route for the debt history with one person.
pub const DEBT_PERSON_HISTORY: &str = "/api/v1/transaction/person/history/{name}";
/// The route to download the debt history with one person as a CSV file.
pub const DEBT_PERSON_DOWNLOAD: &str = "/api/v1/transaction/person/download/{name}";

/// Replace the parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/income/{income_id}', '{income_id}' is the parameter.
///
/// This function assumes that an endpoint path contains a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, value: impl std::fmt::Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}
