//! Calendar-day grouping of expenses.
//!
//! The grouping engine turns the store's flat, date-sorted expense list into
//! one bucket per calendar day, newest day first. Buckets are derived state:
//! they are recomputed from the store and never persisted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Expense, MoneyCents};

/// Expenses sharing one calendar day. Identified by `day`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub expenses: Vec<Expense>,
}

impl DayGroup {
    /// Section title for presentation, e.g. `2 Jan 2026`.
    pub fn label(&self) -> String {
        self.day.format("%-d %b %Y").to_string()
    }

    /// Sum of the group's amounts.
    pub fn total(&self) -> MoneyCents {
        self.expenses.iter().map(|e| e.amount).sum()
    }
}

/// Partitions expenses by the calendar day of `spent_at`.
///
/// Groups come out strictly descending by day, with no duplicate days. The
/// order of expenses inside a bucket is the input order, so feeding the
/// store's `spent_at DESC` query keeps each day newest-first. Empty input
/// yields empty output.
pub fn group_by_day(expenses: Vec<Expense>) -> Vec<DayGroup> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Expense>> = BTreeMap::new();
    for expense in expenses {
        buckets
            .entry(expense.spent_at.date_naive())
            .or_default()
            .push(expense);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(day, expenses)| DayGroup { day, expenses })
        .collect()
}
