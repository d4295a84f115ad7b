//! Per-category income and expense sums.

use std::collections::HashMap;

use serde::Serialize;

use crate::transaction::{Category, Transaction, TransactionKind};

/// The income and expense sums for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// The category, which also identifies the transaction kind.
    #[serde(flatten)]
    pub category: Category,
    /// The sum of income amounts in this category.
    pub income: f64,
    /// The sum of expense amounts in this category.
    pub expense: f64,
    /// `income - expense`.
    pub net: f64,
    /// This category's share of the total expense across all categories, as a
    /// percentage.
    ///
    /// `None` when the total expense is zero.
    pub percent_of_expense: Option<f64>,
}

/// Group transactions by category and sum each group.
///
/// Rows are ordered by expense, highest first. Categories with the same
/// expense are ordered by name so repeated calls give the same order.
/// The result is empty only if `transactions` is empty.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategorySummary> {
    let mut sums: HashMap<Category, (f64, f64)> = HashMap::new();

    for transaction in transactions {
        let (income, expense) = sums.entry(transaction.category).or_insert((0.0, 0.0));

        match transaction.kind() {
            TransactionKind::Income => *income += transaction.amount,
            TransactionKind::Expense => *expense += transaction.amount,
        }
    }

    let total_expense: f64 = sums.values().map(|(_, expense)| expense).sum();

    let mut rows: Vec<CategorySummary> = sums
        .into_iter()
        .map(|(category, (income, expense))| CategorySummary {
            category,
            income,
            expense,
            net: income - expense,
            percent_of_expense: if total_expense > 0.0 {
                Some(expense / total_expense * 100.0)
            } else {
                None
            },
        })
        .collect();

    rows.sort_by(|a, b| {
        b.expense
            .total_cmp(&a.expense)
            .then_with(|| a.category.name().cmp(b.category.name()))
    });

    rows
}

/// The rows of a breakdown that have any expense, in breakdown order.
pub fn expense_categories(breakdown: &[CategorySummary]) -> Vec<&CategorySummary> {
    breakdown.iter().filter(|row| row.expense > 0.0).collect()
}
