//! Spendwise is the computation and storage core of a personal finance tracker.
//!
//! Users record income and expense transactions, set a monthly budget and
//! track savings goals. This library provides:
//! - the domain types and the validation applied at the input boundary,
//! - period windows (last 7 days, this week, this month) for filtering
//!   transactions,
//! - pure aggregation functions (totals, category breakdowns, daily series,
//!   budget status and savings progress),
//! - an async [Gateway] for CRUD access to the SQLite store, keyed by owner,
//! - dashboard and analytics summaries that combine the above.

#![warn(missing_docs)]

mod aggregation;
mod amount;
mod budget;
mod currency;
mod database_id;
mod db;
mod gateway;
mod owner;
mod period;
mod report;
mod savings;
mod summary;
mod timezone;
mod transaction;

pub use aggregation::{
    CategorySummary, SeriesBucket, Totals, calculate_totals, category_breakdown,
    expense_categories, recent_transactions, time_series, time_series_for_period,
};
pub use budget::{
    Budget, BudgetForm, BudgetLevel, BudgetPeriod, BudgetStatus, BudgetUpdate, budget_status,
    month_name, parse_month_name,
};
pub use currency::{CurrencyFormatter, DEFAULT_CURRENCY_SYMBOL};
pub use database_id::{BudgetId, DatabaseId, SavingsGoalId, TransactionId};
pub use db::initialize as initialize_db;
pub use gateway::{DEFAULT_TIMEOUT, Gateway, GatewayConfig};
pub use owner::OwnerId;
pub use period::{DateWindow, Period, filter_by_kind, filter_by_window, window_for};
pub use report::{render_analytics, render_dashboard};
pub use savings::{
    GoalTitle, NewSavingsGoal, SavingsForm, SavingsGoal, SavingsGoalProgress, SavingsGoalUpdate,
    SavingsOverview, SavingsProgress, savings_overview, savings_progress,
};
pub use summary::{AnalyticsSummary, DashboardSummary, build_analytics, build_dashboard};
pub use timezone::{get_local_offset, today_in};
pub use transaction::{
    Category, ExpenseCategory, IncomeCategory, Transaction, TransactionBuilder, TransactionForm,
    TransactionKind, TransactionUpdate, parse_date,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An amount could not be parsed as a number, or was not finite.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// An amount was negative.
    ///
    /// Transactions, budgets and savings record magnitudes, the direction of
    /// a transaction is given by its kind.
    #[error("amounts cannot be negative, got {0}")]
    NegativeAmount(f64),

    /// A required field was missing or empty.
    #[error("the field \"{0}\" is required")]
    MissingField(&'static str),

    /// The transaction kind was neither "income" nor "expense".
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionKind(String),

    /// The category does not belong to the category set for the transaction kind.
    #[error("\"{category}\" is not a valid {kind} category")]
    InvalidCategory {
        /// The kind of transaction the category was checked against.
        kind: TransactionKind,
        /// The rejected category name.
        category: String,
    },

    /// A date string could not be parsed as an ISO 8601 calendar date.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A month name could not be parsed.
    #[error("\"{0}\" is not a valid month name")]
    InvalidMonth(String),

    /// A period tag was not one of "daily", "weekly" or "monthly".
    #[error("\"{0}\" is not a valid period, expected daily, weekly or monthly")]
    InvalidPeriod(String),

    /// An empty string was used as a savings goal title.
    #[error("savings goal title cannot be empty")]
    EmptyTitle,

    /// An empty string was used as an owner ID.
    #[error("owner ID cannot be empty")]
    EmptyOwnerId,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A budget already exists for the owner, month and year.
    #[error("a budget already exists for {0}")]
    DuplicateBudgetPeriod(BudgetPeriod),

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// Tried to update a savings goal that does not exist
    #[error("tried to update a savings goal that is not in the database")]
    UpdateMissingSavingsGoal,

    /// Tried to delete a savings goal that does not exist
    #[error("tried to delete a savings goal that is not in the database")]
    DeleteMissingSavingsGoal,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A store operation did not finish within the configured timeout.
    ///
    /// The operation may still complete in the background, callers should
    /// re-fetch before assuming it did not happen.
    #[error("the store operation \"{0}\" timed out")]
    StoreTimeout(&'static str),

    /// The background task running a store operation panicked or was cancelled.
    #[error("the store task failed: {0}")]
    TaskFailed(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The currency symbol could not be used to build a number formatter.
    #[error("invalid currency symbol \"{0}\"")]
    InvalidCurrencySymbol(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
