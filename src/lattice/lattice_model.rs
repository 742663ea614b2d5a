use crate::{
    lattice::{ActionId, ContinuousState, GraphState, StateId},
    search::Plan,
};

/// Path cost. For the lattice environment this is time in seconds.
pub type Cost = f64;

/// One outgoing edge of a lattice state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Successor {
    pub state_id: StateId,
    pub action: ActionId,
    /// Cost of the path to `state_id` through this edge: the cost so far, plus
    /// the edge cost, plus `penalty`.
    pub g: Cost,
    /// Soft obstacle cost of the edge.
    pub penalty: Cost,
}

/// Outcome of checking a previously computed plan against the current
/// environment.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSafety {
    pub is_safe: bool,
    /// End of `reusable_plan`.
    pub last_safe_state: ContinuousState,
    /// Collision free part of the plan, starting at the action the robot is
    /// currently executing and at most the reuse distance long.
    pub reusable_plan: Plan,
}

/// The state lattice the planner searches. The planner only ever talks to the
/// world through this trait: discretisation, collision checks, successor
/// generation and the heuristic's distance measure.
pub trait LatticeModel {
    type Successors<'a>: Iterator<Item = Successor>
    where
        Self: 'a;

    fn to_discrete(&self, pose: &ContinuousState) -> GraphState;

    fn to_continuous(&self, state: GraphState) -> ContinuousState;

    fn is_in_collision(&self, state: GraphState) -> bool;

    fn is_pose_in_collision(&self, pose: &ContinuousState) -> bool;

    /// A collision free state close to `pose`, for when rounding lands in
    /// collision.
    fn find_nearest_collision_free_state(&self, pose: &ContinuousState) -> Option<GraphState>;

    /// Successors of `state_id` reached with cost `g`. The iterator must
    /// yield the same sequence every time for the same input and environment.
    fn successors(&self, state_id: StateId, g: Cost) -> Self::Successors<'_>;

    fn distance_between(&self, pose: &ContinuousState, state: GraphState) -> f64;

    fn one_over_max_velocity(&self) -> f64;

    fn apply_action(
        &self,
        action: ActionId,
        state_id: StateId,
        check_collision: bool,
    ) -> Option<StateId>;

    fn plan_is_safe(
        &self,
        plan: &Plan,
        max_distance_to_reuse_mm: f64,
        current_index: usize,
    ) -> PlanSafety;

    /// Index of the plan action that passes closest to `pose`.
    fn find_closest_plan_segment_to_pose(&self, plan: &Plan, pose: &ContinuousState) -> usize;
}
