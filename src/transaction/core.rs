//! Defines the core data models for transactions.

use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{
    database_id::TransactionId,
    owner::OwnerId,
    transaction::{Category, TransactionKind},
};

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user account the transaction belongs to.
    #[serde(rename = "user_id")]
    pub owner_id: OwnerId,
    /// The amount of money spent or earned, always non-negative.
    pub amount: f64,
    /// The category, which also determines whether this is income or an expense.
    #[serde(flatten)]
    pub category: Category,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        owner_id: OwnerId,
        amount: f64,
        category: Category,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            owner_id,
            amount,
            category,
            description: String::new(),
            date,
        }
    }

    /// Whether the transaction is income or an expense.
    pub fn kind(&self) -> TransactionKind {
        self.category.kind()
    }

    /// Whether the transaction records money earned.
    pub fn is_income(&self) -> bool {
        self.kind() == TransactionKind::Income
    }
}

/// A builder for creating [Transaction] instances.
///
/// The amount is checked when the builder is inserted into the store, see
/// [crate::Gateway::insert_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The owner of the new transaction.
    pub owner_id: OwnerId,
    /// The amount of money, must be finite and non-negative.
    pub amount: f64,
    /// The category, which also determines the transaction kind.
    pub category: Category,
    /// A human-readable description of the transaction.
    ///
    /// Defaults to an empty string.
    pub description: String,
    /// The date when the transaction occurred.
    pub date: Date,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

/// A partial update to a transaction, `None` fields are left unchanged.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionUpdate {
    /// The new amount.
    pub amount: Option<f64>,
    /// The new category. Changing the category may also change the kind.
    pub category: Option<Category>,
    /// The new description.
    pub description: Option<String>,
    /// The new date.
    pub date: Option<Date>,
}

impl TransactionUpdate {
    /// Whether the update would leave the transaction unchanged.
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}
