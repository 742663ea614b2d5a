//! Anisotropic A* over the state lattice, with reuse of the previous plan
//! while it stays collision free.

use crate::{
    lattice::{ContinuousState, Cost, GraphState, LatticeModel, PlanSafety, StateId},
    search::{
        OpenList, Plan, PlannerConfig, ReplanResult, SearchObserver, SearchStatistics, StateTable,
    },
};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Goal {
    state: GraphState,
    /// Continuous pose of `state`, so that it lines up exactly with the
    /// lattice.
    pose: ContinuousState,
}

/// The lattice planner. It owns its model, so changes to the environment go
/// through [`XythetaPlanner::model_mut`].
///
/// The planner is not thread safe; callers that plan in the background must
/// serialise all calls themselves.
#[derive(Debug)]
pub struct XythetaPlanner<M: LatticeModel> {
    model: M,
    config: PlannerConfig,
    /// Defaults to the origin until [`XythetaPlanner::set_start`] succeeds.
    start: GraphState,
    goal: Option<Goal>,
    /// The next replan has to discard everything and search again.
    from_scratch: bool,
    plan: Plan,
    has_plan: bool,
    final_cost: Cost,
    table: StateTable,
    open: OpenList,
    /// Incremented for every search, tells states closed in this search apart
    /// from stale entries.
    search_generation: u32,
    statistics: SearchStatistics,
    observer: Option<Box<dyn SearchObserver>>,
    last_result: Option<ReplanResult>,
}

impl<M: LatticeModel> XythetaPlanner<M> {
    pub fn new(model: M) -> Self {
        Self::with_config(model, PlannerConfig::default())
    }

    pub fn with_config(model: M, config: PlannerConfig) -> Self {
        Self {
            model,
            config,
            start: GraphState::default(),
            goal: None,
            from_scratch: true,
            plan: Plan::default(),
            has_plan: false,
            final_cost: 0.0,
            table: StateTable::new(),
            open: OpenList::new(),
            search_generation: 0,
            statistics: SearchStatistics::new(config.log_interval_expansions),
            observer: None,
            last_result: None,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the environment. Changes are picked up by the plan
    /// safety check of the next [`XythetaPlanner::replan`].
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Discretise `pose` for use as start or goal. Returns `None` if the pose
    /// is not finite, or it or every lattice state around it is in collision.
    fn resolve_pose(&self, pose: &ContinuousState, what: &str) -> Option<GraphState> {
        if !pose.is_finite() {
            warn!(%pose, "{} is not a finite pose", what);
            return None;
        }
        if self.model.is_pose_in_collision(pose) {
            warn!(%pose, "{} is in collision", what);
            return None;
        }

        let state = self.model.to_discrete(pose);
        if !self.model.is_in_collision(state) {
            return Some(state);
        }

        match self.model.find_nearest_collision_free_state(pose) {
            Some(state) => {
                debug_assert!(!self.model.is_in_collision(state));
                Some(state)
            }
            None => {
                warn!(%pose, "all discrete states around the {} are in collision", what);
                None
            }
        }
    }

    /// Set the goal, returns false and keeps the old goal if `pose` cannot be
    /// reached without collision.
    pub fn set_goal(&mut self, pose: &ContinuousState) -> bool {
        let Some(state) = self.resolve_pose(pose, "goal") else {
            return false;
        };
        let pose = self.model.to_continuous(state);
        info!(goal = %state, %pose, "set goal");
        self.goal = Some(Goal { state, pose });
        self.from_scratch = true;
        true
    }

    /// The goal pose, snapped to the lattice.
    pub fn goal(&self) -> Option<ContinuousState> {
        self.goal.map(|goal| goal.pose)
    }

    pub fn goal_is_valid(&self) -> bool {
        self.goal
            .is_some_and(|goal| !self.model.is_pose_in_collision(&goal.pose))
    }

    /// Set the start, returns false and keeps the old start if `pose` cannot
    /// be used.
    pub fn set_start(&mut self, pose: &ContinuousState) -> bool {
        let Some(state) = self.resolve_pose(pose, "start") else {
            return false;
        };
        info!(start = %state, "set start");
        self.start = state;
        self.from_scratch = true;
        true
    }

    pub fn start(&self) -> GraphState {
        self.start
    }

    pub fn allow_free_turn_in_place_at_goal(&mut self, allow: bool) {
        self.config.free_turn_in_place_at_goal = allow;
    }

    /// Force the next replan to search from scratch.
    pub fn set_replan_from_scratch(&mut self) {
        self.from_scratch = true;
    }

    pub fn set_observer(&mut self, observer: impl SearchObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Replan with at most `max_expansions` expansions (plus the one that
    /// crosses the limit). Returns true if a valid plan is available
    /// afterwards.
    pub fn replan(&mut self, max_expansions: u64) -> bool {
        self.replan_with_result(max_expansions).is_success()
    }

    pub fn replan_with_result(&mut self, max_expansions: u64) -> ReplanResult {
        let result = match self.goal {
            None => {
                warn!("cannot replan without a goal");
                ReplanResult::NoGoal
            }
            Some(_) if !self.needs_replan() => {
                info!("no replan needed");
                ReplanResult::NoReplanNeeded
            }
            Some(goal) => {
                self.reset();
                let result = self.search(goal, max_expansions);
                if !result.is_success() {
                    // Failed searches are never resumed
                    self.from_scratch = true;
                }
                self.statistics
                    .finalise_search(self.has_plan.then_some(self.final_cost));
                info!(%result, expansions = self.statistics.expanded_states(), "search finished");
                result
            }
        };

        if let Some(observer) = self.observer.as_mut() {
            observer.on_search_finished(result);
        }
        self.last_result = Some(result);
        result
    }

    fn needs_replan(&self) -> bool {
        self.from_scratch
            || !self.has_plan
            || !self
                .model
                .plan_is_safe(&self.plan, self.config.max_distance_to_reuse_mm, 0)
                .is_safe
    }

    fn reset(&mut self) {
        self.plan.clear();
        self.has_plan = false;
        self.table.clear();
        self.open.clear();
        self.statistics = SearchStatistics::start_search(self.config.log_interval_expansions);
        self.search_generation = self.search_generation.wrapping_add(1);
        self.from_scratch = false;
        self.final_cost = 0.0;
    }

    fn search(&mut self, goal: Goal, max_expansions: u64) -> ReplanResult {
        let start_id = self.start.id();
        let goal_id = goal.state.id();

        let handle = self.open.insert(start_id, 0.0);
        self.table.emplace(start_id, Some(handle), start_id, 0, 0.0, 0.0);

        while let Some((state_id, f)) = self.open.pop() {
            if state_id == goal_id {
                self.final_cost = self.table[state_id].g;
                info!(final_cost = self.final_cost, "expanded goal");
                return self.build_plan(goal_id);
            }

            if self.table[state_id].is_closed(self.search_generation) {
                self.statistics.increment_stale_pops();
                continue;
            }

            self.expand_state(state_id, f, &goal);
            self.statistics.increment_expanded_states();

            if self.statistics.expanded_states() > max_expansions {
                self.log_budget_exceeded(max_expansions);
                return ReplanResult::BudgetExceeded;
            }
        }

        warn!("no path found");
        ReplanResult::Exhausted
    }

    fn expand_state(&mut self, state_id: StateId, f: Cost, goal: &Goal) {
        let generation = self.search_generation;
        let state = GraphState::from(state_id);
        let current_g = self.table[state_id].g;
        let free_turn = self.config.free_turn_in_place_at_goal && state.same_cell(&goal.state);

        if let Some(observer) = self.observer.as_mut() {
            observer.on_expand(state, current_g, f);
        }

        let model = &self.model;
        let table = &mut self.table;
        let open = &mut self.open;
        let statistics = &mut self.statistics;

        for successor in model.successors(state_id, current_g) {
            statistics.increment_considered_successors();
            let new_g = if free_turn { current_g } else { successor.g };

            match table.find_mut(successor.state_id) {
                None => {
                    let f = new_g + heuristic(model, &goal.pose, successor.state_id);
                    let handle = open.insert(successor.state_id, f);
                    table.emplace(
                        successor.state_id,
                        Some(handle),
                        state_id,
                        successor.action,
                        successor.penalty,
                        new_g,
                    );
                    statistics.increment_generated_states();
                }
                Some(entry) if !entry.is_closed(generation) && new_g < entry.g => {
                    let f = new_g + heuristic(model, &goal.pose, successor.state_id);
                    let handle = open.insert(successor.state_id, f);
                    entry.relax(handle, state_id, successor.action, successor.penalty, new_g);
                    statistics.increment_relaxed_states();
                }
                Some(_) => {}
            }
        }

        self.table[state_id].close(generation);
    }

    fn log_budget_exceeded(&self, max_expansions: u64) {
        match (self.open.top(), self.open.top_f()) {
            (Some(top), Some(top_f)) => {
                let top_g = self.table[top].g;
                info!(
                    max_expansions,
                    top_f,
                    top_g,
                    top_h = top_f - top_g,
                    "exceeded max expansions"
                );
            }
            _ => info!(max_expansions, "exceeded max expansions"),
        }
    }

    /// Walk the backpointers from the goal to the start.
    fn build_plan(&mut self, goal_id: StateId) -> ReplanResult {
        let start_id = self.start.id();
        let mut plan = Plan::new(self.start);
        let mut current = goal_id;
        while current != start_id {
            if plan.len() >= self.config.max_backtrack_steps {
                warn!(
                    max_backtrack_steps = self.config.max_backtrack_steps,
                    "backtracking did not reach the start"
                );
                return ReplanResult::BacktrackFailed;
            }
            let Some(entry) = self.table.find(current) else {
                warn!(state = %GraphState::from(current), "backpointer into unknown state");
                return ReplanResult::BacktrackFailed;
            };
            plan.push(entry.backpointer_action, entry.penalty_into_state);
            current = entry.backpointer;
        }
        plan.reverse();

        info!(plan_length = plan.len(), "created plan");
        self.plan = plan;
        self.has_plan = true;
        ReplanResult::GoalFound
    }

    /// The most recently built plan. Empty if the last search failed.
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn plan_mut(&mut self) -> &mut Plan {
        &mut self.plan
    }

    pub fn has_plan(&self) -> bool {
        self.has_plan
    }

    /// Cost of the path to the goal found by the last successful search.
    pub fn final_cost(&self) -> Cost {
        self.final_cost
    }

    /// Number of expansions of the last search.
    pub fn expansions(&self) -> u64 {
        self.statistics.expanded_states()
    }

    pub fn search_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn last_result(&self) -> Option<ReplanResult> {
        self.last_result
    }

    /// Check the current plan against the environment, assuming the robot is
    /// executing action `current_index`.
    pub fn plan_is_safe(&self, current_index: usize) -> PlanSafety {
        self.model.plan_is_safe(
            &self.plan,
            self.config.max_distance_to_reuse_mm,
            current_index,
        )
    }

    pub fn find_closest_plan_segment_to_pose(&self, pose: &ContinuousState) -> usize {
        self.model.find_closest_plan_segment_to_pose(&self.plan, pose)
    }
}

/// Straight line travel time to the goal at full speed.
fn heuristic<M: LatticeModel>(model: &M, goal: &ContinuousState, state_id: StateId) -> Cost {
    model.distance_between(goal, GraphState::from(state_id)) * model.one_over_max_velocity()
}
