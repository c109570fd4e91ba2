//! Pure aggregation helpers for the dashboard summary.

use serde::Serialize;
use time::{Date, Duration};

use crate::{expense::Expense, income::Income};

/// Income is summed over this many days back from today.
pub(super) const INCOME_WINDOW_DAYS: i64 = 60;
/// Expenses are summed over this many days back from today.
pub(super) const EXPENSE_WINDOW_DAYS: i64 = 30;
/// How many of the latest records of each kind go into the timeline.
pub(super) const LATEST_PER_KIND: u32 = 5;

/// An income or expense record tagged with its kind for the combined timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimelineEntry {
    Income(Income),
    Expense(Expense),
}

#[cfg(test)]
impl TimelineEntry {
    pub fn date(&self) -> Date {
        match self {
            TimelineEntry::Income(income) => income.date,
            TimelineEntry::Expense(expense) => expense.date,
        }
    }
}

/// The first day included in a window of `days` days ending today.
pub(super) fn window_start(today: Date, days: i64) -> Date {
    today.saturating_sub(Duration::days(days))
}

/// Sum of `amounts`, zero when there are none.
pub(super) fn total(amounts: impl IntoIterator<Item = f64>) -> f64 {
    amounts.into_iter().sum()
}

/// Merge two lists that are each sorted newest first into one list sorted
/// newest first.
///
/// On equal dates income comes before expenses.
pub(super) fn merge_newest_first(incomes: Vec<Income>, expenses: Vec<Expense>) -> Vec<TimelineEntry> {
    let mut merged = Vec::with_capacity(incomes.len() + expenses.len());
    let mut incomes = incomes.into_iter().peekable();
    let mut expenses = expenses.into_iter().peekable();

    loop {
        let take_income = match (incomes.peek(), expenses.peek()) {
            (Some(income), Some(expense)) => income.date >= expense.date,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        let entry = if take_income {
            incomes.next().map(TimelineEntry::Income)
        } else {
            expenses.next().map(TimelineEntry::Expense)
        };

        merged.extend(entry);
    }

    merged
}
