//! How a month's spending compares to its budget.

use serde::Serialize;

/// Percentage of the budget spent at which spending is flagged.
const WARNING_PERCENT: f64 = 80.0;
/// Percentage of the budget spent at which the budget counts as exceeded.
const EXCEEDED_PERCENT: f64 = 100.0;

/// A coarse classification of budget usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    /// No budget is set, or the budget amount is zero.
    NoBudget,
    /// Less than 80% of the budget has been spent.
    Good,
    /// At least 80% but less than 100% of the budget has been spent.
    Warning,
    /// 100% or more of the budget has been spent.
    Exceeded,
}

/// Spending against a budget amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetStatus {
    /// The budget amount.
    pub budget: f64,
    /// The total expenses in the budget's period.
    pub spent: f64,
    /// `budget - spent`, negative when overspent.
    pub remaining: f64,
    /// `spent / budget` as a percentage, not clamped.
    ///
    /// `None` when the budget amount is zero.
    pub percent: Option<f64>,
    /// The classification of `percent`.
    pub level: BudgetLevel,
}

impl BudgetStatus {
    /// The percentage to show on a progress bar, clamped to 100.
    pub fn display_percent(&self) -> Option<f64> {
        self.percent.map(|percent| percent.min(100.0))
    }
}

/// Compare `expenses` to `budget`.
///
/// A budget of zero has no meaningful percentage and is reported as
/// [BudgetLevel::NoBudget].
pub fn budget_status(budget: f64, expenses: f64) -> BudgetStatus {
    let remaining = budget - expenses;

    if budget <= 0.0 {
        return BudgetStatus {
            budget,
            spent: expenses,
            remaining,
            percent: None,
            level: BudgetLevel::NoBudget,
        };
    }

    let percent = expenses / budget * 100.0;
    let level = if percent >= EXCEEDED_PERCENT {
        BudgetLevel::Exceeded
    } else if percent >= WARNING_PERCENT {
        BudgetLevel::Warning
    } else {
        BudgetLevel::Good
    };

    BudgetStatus {
        budget,
        spent: expenses,
        remaining,
        percent: Some(percent),
        level,
    }
}
