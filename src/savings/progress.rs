//! Progress towards savings goals.

use serde::Serialize;

use crate::savings::SavingsGoal;

/// How far a saved amount is towards a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsProgress {
    /// The amount saved.
    pub saved: f64,
    /// The amount aimed for.
    pub target: f64,
    /// `saved / target` as a percentage, may exceed 100.
    ///
    /// `None` when the target is zero.
    pub percent: Option<f64>,
    /// How much is left to save, never negative.
    pub remaining: f64,
}

impl SavingsProgress {
    /// The percentage to show on a progress bar, clamped to 100.
    pub fn display_percent(&self) -> Option<f64> {
        self.percent.map(|percent| percent.min(100.0))
    }

    /// Whether the saved amount has reached a non-zero target.
    pub fn is_complete(&self) -> bool {
        self.percent.is_some_and(|percent| percent >= 100.0)
    }
}

/// Compute progress of `saved` towards `target`.
pub fn savings_progress(saved: f64, target: f64) -> SavingsProgress {
    let percent = if target > 0.0 {
        Some(saved / target * 100.0)
    } else {
        None
    };

    SavingsProgress {
        saved,
        target,
        percent,
        remaining: (target - saved).max(0.0),
    }
}

/// A savings goal alongside its progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsGoalProgress {
    /// The goal.
    pub goal: SavingsGoal,
    /// Progress towards the goal's target.
    pub progress: SavingsProgress,
}

impl From<SavingsGoal> for SavingsGoalProgress {
    fn from(goal: SavingsGoal) -> Self {
        let progress = savings_progress(goal.amount, goal.target);

        Self { goal, progress }
    }
}

/// Progress across all of an owner's savings goals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsOverview {
    /// The number of goals.
    pub goal_count: usize,
    /// The number of goals whose target has been reached.
    pub completed_count: usize,
    /// The combined progress of every goal.
    pub total: SavingsProgress,
}

/// Sum saved amounts and targets across `goals`.
pub fn savings_overview(goals: &[SavingsGoal]) -> SavingsOverview {
    let (saved, target, completed_count) =
        goals
            .iter()
            .fold((0.0, 0.0, 0), |(saved, target, completed), goal| {
                let done = savings_progress(goal.amount, goal.target).is_complete();

                (
                    saved + goal.amount,
                    target + goal.target,
                    completed + usize::from(done),
                )
            });

    SavingsOverview {
        goal_count: goals.len(),
        completed_count,
        total: savings_progress(saved, target),
    }
}
