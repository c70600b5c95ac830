//! Derived view over the expense store.
//!
//! [`ExpenseFeed`] holds what a presentation layer renders: the last full
//! day-grouped structure plus the currently visible one (full or narrowed by
//! a search). Grouping and filtering run off the caller's task; results are
//! published atomically through a `watch` channel, so subscribers see either
//! the old structure or the new one, never a partial update.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::{DayGroup, Expense, grouping::group_by_day, search::filter_by_title};

/// Immutable snapshot of grouped expenses, cheap to hand to subscribers.
pub type GroupedView = Arc<Vec<DayGroup>>;

#[derive(Debug)]
pub struct ExpenseFeed {
    state: Mutex<FeedState>,
    visible: watch::Sender<GroupedView>,
    refresh_seq: AtomicU64,
    search_seq: AtomicU64,
}

#[derive(Debug)]
struct FeedState {
    /// Last full (unfiltered) grouping. An empty search restores exactly
    /// this snapshot.
    full: GroupedView,
}

impl Default for ExpenseFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseFeed {
    pub fn new() -> Self {
        let empty: GroupedView = Arc::new(Vec::new());
        let (visible, _) = watch::channel(Arc::clone(&empty));
        Self {
            state: Mutex::new(FeedState { full: empty }),
            visible,
            refresh_seq: AtomicU64::new(0),
            search_seq: AtomicU64::new(0),
        }
    }

    /// Subscribe to visible-view updates.
    pub fn subscribe(&self) -> watch::Receiver<GroupedView> {
        self.visible.subscribe()
    }

    /// The currently visible grouping.
    pub fn visible(&self) -> GroupedView {
        Arc::clone(&self.visible.borrow())
    }

    /// The last full (unfiltered) grouping.
    pub fn full(&self) -> GroupedView {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state.full)
    }

    /// Regroups `expenses` by calendar day and publishes the result as both
    /// the full and the visible structure.
    ///
    /// Call this on any store change; deletions may instead go through
    /// [`remove_expense`](Self::remove_expense). If several refreshes race,
    /// only the latest one publishes. A refresh also supersedes any in-flight
    /// search, since the filtered structure it would publish is stale.
    pub async fn refresh(&self, expenses: Vec<Expense>) {
        let token = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = tokio::task::spawn_blocking(move || group_by_day(expenses)).await;

        let groups = match result {
            Ok(groups) => groups,
            Err(err) => {
                debug!(%err, "grouping task failed; keeping previous view");
                return;
            }
        };

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if self.refresh_seq.load(Ordering::SeqCst) != token {
            debug!("dropping stale regroup result");
            return;
        }
        self.search_seq.fetch_add(1, Ordering::SeqCst);

        let view: GroupedView = Arc::new(groups);
        state.full = Arc::clone(&view);
        debug!(groups = view.len(), "published regrouped expenses");
        self.visible.send_replace(view);
    }

    /// Narrows the visible structure to expenses whose title contains `term`.
    ///
    /// The empty term short-circuits: it restores the cached full structure
    /// itself (same allocation), without running the filter. Non-empty terms
    /// are filtered off-task under a monotonically increasing token; a result
    /// that is no longer the newest is discarded, so stale searches never
    /// overwrite fresher ones.
    pub async fn search(&self, term: &str) {
        if term.is_empty() {
            let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            self.search_seq.fetch_add(1, Ordering::SeqCst);
            self.visible.send_replace(Arc::clone(&state.full));
            return;
        }

        let token = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let source = self.full();
        let term = term.to_string();
        let result =
            tokio::task::spawn_blocking(move || filter_by_title(&source, &term)).await;

        let filtered = match result {
            Ok(filtered) => filtered,
            Err(err) => {
                debug!(%err, "filter task failed; keeping previous view");
                return;
            }
        };

        let _state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if self.search_seq.load(Ordering::SeqCst) != token {
            debug!("dropping superseded search result");
            return;
        }
        self.visible.send_replace(Arc::new(filtered));
    }

    /// Removes one expense from the derived structure without regrouping.
    ///
    /// The expense is removed from its day bucket in both the full and the
    /// visible structures; a bucket left empty disappears with it. The
    /// authoritative store row must already be gone (delete there first, see
    /// [`Engine::delete_expense`](crate::Engine::delete_expense)), so the
    /// derived view never dangles. Like [`refresh`](Self::refresh), a removal
    /// supersedes any in-flight search, which snapshotted the structure the
    /// expense was still part of.
    ///
    /// Returns `false` if the expense was not present in the full structure.
    pub fn remove_expense(&self, day: NaiveDate, expense_id: Uuid) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(full) = remove_from(&state.full, day, expense_id) else {
            return false;
        };
        self.search_seq.fetch_add(1, Ordering::SeqCst);
        state.full = Arc::new(full);

        // The visible structure may be a filtered copy that never contained
        // this expense; in that case it needs no update.
        let visible = self.visible.borrow().clone();
        if let Some(next) = remove_from(&visible, day, expense_id) {
            self.visible.send_replace(Arc::new(next));
        }
        debug!(%expense_id, %day, "removed expense from derived view");
        true
    }
}

/// Rebuilds `groups` without `expense_id`; `None` if it is not in `day`'s
/// bucket.
fn remove_from(groups: &[DayGroup], day: NaiveDate, expense_id: Uuid) -> Option<Vec<DayGroup>> {
    let index = groups.iter().position(|g| g.day == day)?;
    groups[index]
        .expenses
        .iter()
        .any(|e| e.id == expense_id)
        .then(|| {
            let mut next: Vec<DayGroup> = groups.to_vec();
            next[index].expenses.retain(|e| e.id != expense_id);
            if next[index].expenses.is_empty() {
                next.remove(index);
            }
            next
        })
}
