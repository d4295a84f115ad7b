//! Savings goals: the model, storage and progress calculations.

mod core;
mod db;
mod progress;

pub use core::{GoalTitle, NewSavingsGoal, SavingsForm, SavingsGoal, SavingsGoalUpdate};
pub use db::{
    create_savings_goal, create_savings_table, delete_savings_goal, list_savings_goals,
    update_savings_goal,
};
pub use progress::{
    SavingsGoalProgress, SavingsOverview, SavingsProgress, savings_overview, savings_progress,
};
