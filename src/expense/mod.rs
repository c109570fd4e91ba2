//! Expense: money the user spent, with its list, delete and CSV export routes.

mod core;
mod endpoints;

pub use core::{
    Expense, NewExpense, create_expense, create_expense_table, get_expenses_since,
    get_latest_expenses, get_total_expense,
};
pub use endpoints::{
    add_expense_endpoint, delete_expense_endpoint, download_expenses_endpoint, get_expenses_endpoint,
};
