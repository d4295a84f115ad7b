//! Daily income and expense series for charts.

use serde::Serialize;
use time::Date;

use crate::{
    period::{Period, days_before},
    transaction::{Transaction, TransactionKind},
};

/// The income and expense for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesBucket {
    /// The day this bucket covers.
    pub date: Date,
    /// The sum of income dated on this day.
    pub income: f64,
    /// The sum of expenses dated on this day.
    pub expense: f64,
}

/// Sum transactions into `bucket_count` daily buckets ending at `today`.
///
/// Buckets are ordered oldest first, so the last bucket is `today`. A
/// transaction lands in the bucket `today - date` days back. Transactions
/// older than the first bucket or dated after `today` are left out.
///
/// The result always has exactly `bucket_count` entries.
pub fn time_series(
    transactions: &[Transaction],
    today: Date,
    bucket_count: usize,
) -> Vec<SeriesBucket> {
    let mut buckets: Vec<SeriesBucket> = (0..bucket_count)
        .map(|index| SeriesBucket {
            date: days_before(today, (bucket_count - index - 1) as i64),
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for transaction in transactions {
        let days_ago = (today - transaction.date).whole_days();

        let Ok(days_ago) = usize::try_from(days_ago) else {
            // Dated after today.
            continue;
        };

        if days_ago >= bucket_count {
            continue;
        }

        let bucket = &mut buckets[bucket_count - days_ago - 1];

        match transaction.kind() {
            TransactionKind::Income => bucket.income += transaction.amount,
            TransactionKind::Expense => bucket.expense += transaction.amount,
        }
    }

    buckets
}

/// [time_series] with the bucket count for `period`.
pub fn time_series_for_period(
    transactions: &[Transaction],
    period: Period,
    today: Date,
) -> Vec<SeriesBucket> {
    time_series(transactions, today, period.bucket_count())
}
