//! Title search over grouped expenses.

use crate::DayGroup;

/// Narrows grouped expenses to those whose title contains `term`.
///
/// Matching is case-insensitive substring containment. Groups left with no
/// matching expense are dropped; group order and in-group order are
/// preserved from the source structure.
///
/// Callers handle the empty-term case themselves: the contract for an empty
/// search is "restore the cached unfiltered structure", not "filter with a
/// term every title contains" (see [`ExpenseFeed::search`]).
///
/// [`ExpenseFeed::search`]: crate::ExpenseFeed::search
pub fn filter_by_title(groups: &[DayGroup], term: &str) -> Vec<DayGroup> {
    let needle = term.to_lowercase();

    groups
        .iter()
        .filter_map(|group| {
            let expenses: Vec<_> = group
                .expenses
                .iter()
                .filter(|e| e.title.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            if expenses.is_empty() {
                return None;
            }
            Some(DayGroup {
                day: group.day,
                expenses,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use crate::{Expense, MoneyCents, grouping::group_by_day};

    use super::*;

    fn expense(title: &str, at: &str) -> Expense {
        let spent_at = NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M")
            .unwrap()
            .and_utc();
        Expense::new(title.to_string(), MoneyCents::new(300), spent_at, None).unwrap()
    }

    fn sample_groups() -> Vec<DayGroup> {
        group_by_day(vec![
            expense("Lunch", "2026-01-02 12:00"),
            expense("Morning Coffee", "2026-01-02 10:00"),
            expense("Rent", "2026-01-01 09:00"),
        ])
    }

    #[test]
    fn filter_is_case_insensitive() {
        let groups = sample_groups();

        for term in ["COFFEE", "coffee", "CoFFeE"] {
            let filtered = filter_by_title(&groups, term);
            assert_eq!(filtered.len(), 1);
            assert_eq!(filtered[0].expenses[0].title, "Morning Coffee");
        }
    }

    #[test]
    fn unmatched_groups_are_dropped() {
        let filtered = filter_by_title(&sample_groups(), "co");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].expenses.len(), 1);
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(filter_by_title(&sample_groups(), "zzz").is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let groups = group_by_day(vec![
            expense("tea one", "2026-01-02 12:00"),
            expense("tea two", "2026-01-02 10:00"),
            expense("tea three", "2026-01-01 09:00"),
        ]);

        let filtered = filter_by_title(&groups, "tea");
        assert_eq!(filtered.len(), 2);
        let titles: Vec<&str> = filtered[0]
            .expenses
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, ["tea one", "tea two"]);
    }
}
