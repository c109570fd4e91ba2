//! Income: money the user earned, with its list, delete and CSV export routes.

mod core;
mod endpoints;

pub use core::{
    Income, NewIncome, create_income, create_income_table, get_incomes_since,
    get_latest_incomes, get_total_income,
};
pub use endpoints::{
    add_income_endpoint, delete_income_endpoint, download_incomes_endpoint, get_incomes_endpoint,
};
