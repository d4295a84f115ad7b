//! Monthly budgets: the model, storage and status against spending.

mod core;
mod db;
mod status;

pub use core::{Budget, BudgetForm, BudgetPeriod, BudgetUpdate, month_name, parse_month_name};
pub use db::{
    create_budget, create_budget_table, delete_budget, get_budget_for_period, list_budgets,
    update_budget, upsert_budget,
};
pub use status::{BudgetLevel, BudgetStatus, budget_status};
