//! Plain text rendering of summaries for the terminal.

use std::fmt::Write;

use crate::{
    aggregation::{Totals, expense_categories},
    budget::{BudgetLevel, BudgetStatus},
    currency::CurrencyFormatter,
    period::{format_date_label, month_abbrev},
    savings::SavingsProgress,
    summary::{AnalyticsSummary, DashboardSummary},
};

/// Render the dashboard as a text report.
pub fn render_dashboard(summary: &DashboardSummary, currency: &CurrencyFormatter) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = write_dashboard(&mut out, summary, currency);

    out
}

/// Render the analytics for a period as a text report.
pub fn render_analytics(summary: &AnalyticsSummary, currency: &CurrencyFormatter) -> String {
    let mut out = String::new();

    let _ = write_analytics(&mut out, summary, currency);

    out
}

fn write_dashboard(
    out: &mut String,
    summary: &DashboardSummary,
    currency: &CurrencyFormatter,
) -> std::fmt::Result {
    writeln!(out, "Dashboard for {}", format_date_label(summary.today))?;
    writeln!(out)?;
    write_totals(out, "All Time", &summary.totals, currency)?;
    writeln!(out)?;
    write_totals(out, &summary.month.label(), &summary.month_totals, currency)?;
    writeln!(out)?;

    match &summary.budget_status {
        Some(status) => write_budget(out, status, currency)?,
        None => writeln!(out, "Budget: not set for this month")?,
    }
    writeln!(out)?;

    writeln!(out, "Recent Transactions")?;
    if summary.recent.is_empty() {
        writeln!(out, "  No transactions yet")?;
    }
    for transaction in &summary.recent {
        let sign = if transaction.is_income() { "+" } else { "-" };

        write!(
            out,
            "  {:>2} {} {:<16} {sign}{}",
            transaction.date.day(),
            month_abbrev(transaction.date.month()),
            transaction.category.name(),
            currency.format(transaction.amount)
        )?;
        if !transaction.description.is_empty() {
            write!(out, "  {}", transaction.description)?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "Savings Goals ({} of {} complete)",
        summary.savings.completed_count, summary.savings.goal_count
    )?;
    for goal in &summary.savings_goals {
        write!(out, "  {:<20} ", goal.goal.title.as_ref())?;
        write_progress(out, &goal.progress, currency)?;
    }
    if !summary.savings_goals.is_empty() {
        write!(out, "  {:<20} ", "Total")?;
        write_progress(out, &summary.savings.total, currency)?;
    }

    Ok(())
}

fn write_analytics(
    out: &mut String,
    summary: &AnalyticsSummary,
    currency: &CurrencyFormatter,
) -> std::fmt::Result {
    writeln!(
        out,
        "{} ({})",
        summary.period.label(),
        summary.window.label()
    )?;
    writeln!(out)?;
    write_totals(out, "Totals", &summary.totals, currency)?;
    writeln!(out)?;

    writeln!(out, "Spending by Category")?;
    let expenses = expense_categories(&summary.breakdown);
    if expenses.is_empty() {
        writeln!(out, "  No expenses in this period")?;
    }
    for row in expenses {
        let percent = row
            .percent_of_expense
            .map(CurrencyFormatter::format_percent)
            .unwrap_or_default();

        writeln!(
            out,
            "  {:<16} {:>12} {:>7}",
            row.category.name(),
            currency.format(row.expense),
            percent
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Daily Income / Expense")?;
    for bucket in &summary.series {
        writeln!(
            out,
            "  {:>2} {}  {:>12} {:>12}",
            bucket.date.day(),
            month_abbrev(bucket.date.month()),
            currency.format(bucket.income),
            currency.format(bucket.expense)
        )?;
    }

    Ok(())
}

fn write_totals(
    out: &mut String,
    heading: &str,
    totals: &Totals,
    currency: &CurrencyFormatter,
) -> std::fmt::Result {
    writeln!(out, "{heading}")?;
    writeln!(out, "  Income:   {}", currency.format(totals.income))?;
    writeln!(out, "  Expenses: {}", currency.format(totals.expense))?;
    writeln!(out, "  Balance:  {}", currency.format(totals.balance))
}

fn write_budget(
    out: &mut String,
    status: &BudgetStatus,
    currency: &CurrencyFormatter,
) -> std::fmt::Result {
    let level = match status.level {
        BudgetLevel::NoBudget => "no budget",
        BudgetLevel::Good => "on track",
        BudgetLevel::Warning => "nearing limit",
        BudgetLevel::Exceeded => "exceeded",
    };

    write!(
        out,
        "Budget: {} of {} spent",
        currency.format(status.spent),
        currency.format(status.budget)
    )?;
    if let Some(percent) = status.percent {
        write!(out, " ({})", CurrencyFormatter::format_percent(percent))?;
    }
    writeln!(out, ", {level}")?;

    if status.remaining < 0.0 {
        writeln!(out, "  Over by {}", currency.format(-status.remaining))
    } else {
        writeln!(out, "  Remaining {}", currency.format(status.remaining))
    }
}

fn write_progress(
    out: &mut String,
    progress: &SavingsProgress,
    currency: &CurrencyFormatter,
) -> std::fmt::Result {
    write!(
        out,
        "{} / {}",
        currency.format(progress.saved),
        currency.format(progress.target)
    )?;
    match progress.display_percent() {
        Some(percent) => writeln!(out, " ({})", CurrencyFormatter::format_percent(percent)),
        None => writeln!(out),
    }
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, macros::date};

    use crate::{
        OwnerId,
        aggregation::Totals,
        budget::budget_status,
        currency::CurrencyFormatter,
        period::Period,
        savings::{GoalTitle, SavingsGoal, SavingsGoalProgress, savings_overview},
        summary::{DashboardSummary, build_analytics},
        transaction::{Category, ExpenseCategory, IncomeCategory, Transaction},
    };

    use super::{render_analytics, render_dashboard};

    fn transaction(amount: f64, category: Category) -> Transaction {
        Transaction {
            id: 1,
            owner_id: OwnerId::new("owner").unwrap(),
            amount,
            category,
            description: "Groceries".to_owned(),
            date: date!(2024 - 01 - 05),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn dollars() -> CurrencyFormatter {
        CurrencyFormatter::new("$").unwrap()
    }

    #[test]
    fn dashboard_shows_totals_budget_and_goals() {
        let goal = SavingsGoal {
            id: 1,
            owner_id: OwnerId::new("owner").unwrap(),
            amount: 150.0,
            target: 100.0,
            title: GoalTitle::new("Bike").unwrap(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let summary = DashboardSummary {
            today: date!(2024 - 01 - 10),
            totals: Totals {
                income: 1000.0,
                expense: 300.0,
                balance: 700.0,
            },
            month: crate::period::window_for(Period::Monthly, date!(2024 - 01 - 10)),
            month_totals: Totals::default(),
            budget: None,
            budget_status: Some(budget_status(200.0, 300.0)),
            recent: vec![transaction(300.0, Category::Expense(ExpenseCategory::Food))],
            savings: savings_overview(std::slice::from_ref(&goal)),
            savings_goals: vec![SavingsGoalProgress::from(goal)],
        };

        let text = render_dashboard(&summary, &dollars());

        assert!(text.contains("Dashboard for 10 Jan 2024"), "{text}");
        assert!(text.contains("Balance:  $700"), "{text}");
        assert!(text.contains("(150.0%), exceeded"), "{text}");
        assert!(text.contains("Over by $100"), "{text}");
        assert!(text.contains("-$300  Groceries"), "{text}");
        assert!(text.contains("$150 / $100 (100.0%)"), "{text}");
        assert!(text.contains("1 of 1 complete"), "{text}");
    }

    #[test]
    fn dashboard_without_budget_says_so() {
        let summary = DashboardSummary {
            today: date!(2024 - 01 - 10),
            totals: Totals::default(),
            month: crate::period::window_for(Period::Monthly, date!(2024 - 01 - 10)),
            month_totals: Totals::default(),
            budget: None,
            budget_status: None,
            recent: vec![],
            savings: savings_overview(&[]),
            savings_goals: vec![],
        };

        let text = render_dashboard(&summary, &dollars());

        assert!(text.contains("Budget: not set for this month"), "{text}");
        assert!(text.contains("No transactions yet"), "{text}");
    }

    #[test]
    fn analytics_lists_only_expense_categories() {
        let transactions = vec![
            transaction(2000.0, Category::Income(IncomeCategory::Salary)),
            transaction(50.0, Category::Expense(ExpenseCategory::Food)),
        ];
        let summary = build_analytics(&transactions, Period::Weekly, date!(2024 - 01 - 07));

        let text = render_analytics(&summary, &dollars());

        assert!(text.starts_with("This Week (1 Jan 2024 - 7 Jan 2024)"), "{text}");
        assert!(text.contains("Food"), "{text}");
        assert!(text.contains("100.0%"), "{text}");
        assert!(!text.contains("Salary"), "{text}");
    }
}
