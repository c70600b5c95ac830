//! Expense ledger engine.
//!
//! The crate has two halves:
//!
//! - the **record store**: [`Engine`] persists [`Expense`]s and
//!   [`Category`]s in SQLite via sea-orm (deleting a category cascades to
//!   its expenses);
//! - the **derived view**: [`group_by_day`] buckets a date-sorted expense
//!   list per calendar day, [`filter_by_title`] narrows buckets by title
//!   search, and [`ExpenseFeed`] coordinates the two off-thread and
//!   publishes atomic snapshots for a presentation layer.
//!
//! The intended wiring, for any frontend:
//!
//! ```text
//! store change  → engine.list_expenses() → feed.refresh(...)
//! search input  → feed.search(term)
//! swipe delete  → engine.delete_expense(id) → feed.remove_expense(day, id)
//! render        → feed.subscribe() / feed.visible()
//! ```

pub use categories::Category;
pub use error::EngineError;
pub use expenses::Expense;
pub use feed::{ExpenseFeed, GroupedView};
pub use grouping::{DayGroup, group_by_day};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, NewExpense, UpdateExpense};
pub use search::filter_by_title;

mod categories;
mod error;
mod expenses;
mod feed;
mod grouping;
mod money;
mod ops;
mod search;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
