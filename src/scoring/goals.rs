// src/scoring/goals.rs

use serde::Serialize;

use super::{category::ReadinessCategory, readiness::ScoreImpact};

/// The parts of a goal the scoring core reads and writes.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub id: i64,
    pub title: String,
    pub category: ReadinessCategory,
    pub target_value: f64,
    pub current_value: f64,
    pub is_completed: bool,
}

/// A goal after synchronization, with the value it had before.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalUpdate {
    pub goal_id: i64,
    pub title: String,
    pub old_value: f64,
    pub new_value: f64,
    pub is_completed: bool,
}

impl GoalProgress {
    /// Sets the current value. Completion is sticky: a later regression
    /// never un-completes a goal.
    pub fn record(&mut self, value: f64) {
        self.current_value = value;
        self.is_completed = self.is_completed || self.current_value >= self.target_value;
    }
}

/// Syncs every goal tracking `impact.category` to the new score.
///
/// Goals in other categories are left alone and not returned.
pub fn sync_goals(goals: &[GoalProgress], impact: &ScoreImpact) -> Vec<GoalUpdate> {
    goals
        .iter()
        .filter(|goal| goal.category == impact.category)
        .map(|goal| {
            let mut synced = goal.clone();
            synced.record(impact.new_score);
            GoalUpdate {
                goal_id: synced.id,
                title: synced.title,
                old_value: goal.current_value,
                new_value: synced.current_value,
                is_completed: synced.is_completed,
            }
        })
        .collect()
}
