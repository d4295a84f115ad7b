//! Income, expense and balance totals.

use serde::Serialize;

use crate::transaction::{Transaction, TransactionKind};

/// The sums of income and expenses over a list of transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

/// Sum income and expenses in the order given.
///
/// An empty list gives all zeros.
pub fn calculate_totals(transactions: &[Transaction]) -> Totals {
    let (income, expense) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expense), transaction| {
                match transaction.kind() {
                    TransactionKind::Income => (income + transaction.amount, expense),
                    TransactionKind::Expense => (income, expense + transaction.amount),
                }
            });

    Totals {
        income,
        expense,
        balance: income - expense,
    }
}
