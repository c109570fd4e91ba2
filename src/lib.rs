//! Tally is a personal finance tracker.
//!
//! This library provides a JSON REST API for recording income and expenses,
//! tracking money lent to and paid back by people, and summarising it all on
//! a dashboard.

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod dashboard;
mod database_id;
mod db;
mod debt;
mod endpoints;
mod error;
mod expense;
mod export;
mod income;
mod logging;
mod person;
mod routing;
#[cfg(test)]
mod test_utils;
mod timezone;
mod validation;

pub use app_state::AppState;
pub use auth::{DEFAULT_COOKIE_DURATION, NewUser, User, UserID, create_user, set_auth_cookie};
pub use db::initialize as initialize_db;
pub use debt::{DebtKind, NewDebtTransaction, record_debt_transaction};
pub use error::Error;
pub use expense::{NewExpense, create_expense};
pub use income::{NewIncome, create_income};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
