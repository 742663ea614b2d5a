use std::fmt::Display;

/// How a call to [`crate::search::XythetaPlanner::replan_with_result`] ended.
/// None of these are errors, the caller is expected to handle all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplanResult {
    /// The previous plan is still collision free, nothing was searched
    NoReplanNeeded,
    /// The goal was reached and a new plan was built
    GoalFound,
    /// Every reachable state was expanded without reaching the goal
    Exhausted,
    /// The expansion budget ran out before the goal was reached
    BudgetExceeded,
    /// The goal was reached but walking the backpointers did not lead back
    /// to the start
    BacktrackFailed,
    /// No goal has been set
    NoGoal,
}

impl ReplanResult {
    /// Whether the planner holds a valid plan after this result.
    pub fn is_success(&self) -> bool {
        matches!(self, ReplanResult::NoReplanNeeded | ReplanResult::GoalFound)
    }
}

impl Display for ReplanResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ReplanResult::NoReplanNeeded => "no replan needed",
            ReplanResult::GoalFound => "goal found",
            ReplanResult::Exhausted => "search space exhausted",
            ReplanResult::BudgetExceeded => "expansion budget exceeded",
            ReplanResult::BacktrackFailed => "backtracking failed",
            ReplanResult::NoGoal => "no goal set",
        };
        write!(f, "{}", text)
    }
}
