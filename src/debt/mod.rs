//! The debt tracker: money lent to and paid back by people, with a running
//! balance per person.

mod core;
mod endpoints;
mod reconcile;
mod record;

pub use core::{DebtKind, NewDebtTransaction, create_debt_transaction_table};
pub use endpoints::{
    borrow_endpoint, delete_debt_transaction_endpoint, download_person_history_endpoint,
    get_debt_transactions_endpoint, get_people_endpoint, get_person_history_endpoint,
    spent_endpoint,
};
pub use record::record_debt_transaction;
