//! Combines store queries and aggregations into the figures shown on the
//! dashboard and analytics pages.

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    aggregation::{
        CategorySummary, SeriesBucket, Totals, calculate_totals, category_breakdown,
        recent_transactions, time_series_for_period,
    },
    budget::{Budget, BudgetStatus, budget_status},
    gateway::Gateway,
    owner::OwnerId,
    period::{DateWindow, Period, filter_by_window, window_for},
    savings::{SavingsGoalProgress, SavingsOverview, savings_overview},
    transaction::Transaction,
};

/// Everything the dashboard shows for one owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// The date the summary was computed for.
    pub today: Date,
    /// Totals over every transaction.
    pub totals: Totals,
    /// The current calendar month.
    pub month: DateWindow,
    /// Totals over the current calendar month.
    pub month_totals: Totals,
    /// The budget for the current month, if one is set.
    pub budget: Option<Budget>,
    /// This month's spending against the budget, `None` without a budget.
    pub budget_status: Option<BudgetStatus>,
    /// The newest transactions.
    pub recent: Vec<Transaction>,
    /// Each savings goal with its progress, newest first.
    pub savings_goals: Vec<SavingsGoalProgress>,
    /// Progress across all savings goals.
    pub savings: SavingsOverview,
}

/// Fetch an owner's records and summarise them for the dashboard.
///
/// `recent_limit` caps the number of recent transactions returned.
///
/// # Errors
/// Returns an error if any of the store queries fail.
pub async fn build_dashboard(
    gateway: &Gateway,
    owner_id: &OwnerId,
    today: Date,
    recent_limit: usize,
) -> Result<DashboardSummary, Error> {
    let transactions = gateway.list_transactions(owner_id).await?;
    let budget = gateway.get_current_budget(owner_id, today).await?;
    let goals = gateway.list_savings_goals(owner_id).await?;

    let month = window_for(Period::Monthly, today);
    let month_totals = calculate_totals(&filter_by_window(&transactions, month));
    let budget_status = budget
        .as_ref()
        .map(|budget| budget_status(budget.amount, month_totals.expense));

    tracing::debug!(
        %owner_id,
        transactions = transactions.len(),
        goals = goals.len(),
        "built dashboard"
    );

    Ok(DashboardSummary {
        today,
        totals: calculate_totals(&transactions),
        month,
        month_totals,
        budget,
        budget_status,
        recent: recent_transactions(&transactions, recent_limit).to_vec(),
        savings: savings_overview(&goals),
        savings_goals: goals.into_iter().map(SavingsGoalProgress::from).collect(),
    })
}

/// The analytics for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    /// The selected period.
    pub period: Period,
    /// The dates covered by `period`.
    pub window: DateWindow,
    /// Totals over the transactions in the window.
    pub totals: Totals,
    /// Per-category sums over the transactions in the window.
    pub breakdown: Vec<CategorySummary>,
    /// Daily sums for the chart, ending today.
    pub series: Vec<SeriesBucket>,
}

/// Summarise `transactions` for the analytics page.
///
/// Totals, breakdown and series are all computed over the transactions that
/// fall in the period's window.
pub fn build_analytics(transactions: &[Transaction], period: Period, today: Date) -> AnalyticsSummary {
    let window = window_for(period, today);
    let in_window = filter_by_window(transactions, window);

    AnalyticsSummary {
        period,
        window,
        totals: calculate_totals(&in_window),
        breakdown: category_breakdown(&in_window),
        series: time_series_for_period(&in_window, period, today),
    }
}
