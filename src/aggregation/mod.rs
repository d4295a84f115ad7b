//! Transaction data aggregation for summaries and charts.
//!
//! Every function here is pure: it reduces an in-memory list of transactions
//! that has already been validated and never fails.

mod breakdown;
mod series;
mod totals;

pub use breakdown::{CategorySummary, category_breakdown, expense_categories};
pub use series::{SeriesBucket, time_series, time_series_for_period};
pub use totals::{Totals, calculate_totals};

use crate::transaction::Transaction;

/// The first `limit` transactions of a newest-first list.
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> &[Transaction] {
    &transactions[..limit.min(transactions.len())]
}
