use crate::{
    lattice::{
        bucket_of_theta, theta_of_bucket, ActionId, ContinuousState, Cost, GraphState,
        LatticeModel, PlanSafety, StateId, Successor,
    },
    search::Plan,
};
use std::collections::{HashMap, HashSet};

pub const EAST: ActionId = 0;
pub const NORTH: ActionId = 1;
pub const WEST: ActionId = 2;
pub const SOUTH: ActionId = 3;

const MOVES: [(ActionId, i16, i16); 4] = [
    (EAST, 1, 0),
    (NORTH, 0, 1),
    (WEST, -1, 0),
    (SOUTH, 0, -1),
];

/// A grid of 1 mm cells where every action moves one cell in a compass
/// direction at cost 1 and keeps the heading. Cells outside the grid or
/// blocked are in collision.
///
/// A move spends half its time in each of the two cells it touches, so it
/// is charged half the penalty of both.
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: i16,
    height: i16,
    blocked: HashSet<(i16, i16)>,
    penalties: HashMap<(i16, i16), Cost>,
}

impl GridWorld {
    pub fn new(width: i16, height: i16) -> Self {
        Self {
            width,
            height,
            blocked: HashSet::new(),
            penalties: HashMap::new(),
        }
    }

    pub fn block(&mut self, x: i16, y: i16) {
        self.blocked.insert((x, y));
    }

    pub fn unblock(&mut self, x: i16, y: i16) {
        self.blocked.remove(&(x, y));
    }

    pub fn set_penalty(&mut self, x: i16, y: i16, penalty: Cost) {
        self.penalties.insert((x, y), penalty);
    }

    fn penalty(&self, x: i16, y: i16) -> Cost {
        self.penalties.get(&(x, y)).copied().unwrap_or(0.0)
    }

    fn is_free(&self, x: i16, y: i16) -> bool {
        (0..self.width).contains(&x)
            && (0..self.height).contains(&y)
            && !self.blocked.contains(&(x, y))
    }

    fn step(&self, state: GraphState, action: ActionId) -> Option<GraphState> {
        let &(_, dx, dy) = MOVES.iter().find(|(id, _, _)| *id == action)?;
        state.offset(dx, dy, state.theta)
    }
}

pub fn grid_pose(x: i16, y: i16) -> ContinuousState {
    ContinuousState::new(f64::from(x), f64::from(y), 0.0)
}

impl LatticeModel for GridWorld {
    type Successors<'a> = std::vec::IntoIter<Successor>;

    fn to_discrete(&self, pose: &ContinuousState) -> GraphState {
        GraphState::new(
            pose.x_mm.round().clamp(-1.0, f64::from(i16::MAX)) as i16,
            pose.y_mm.round().clamp(-1.0, f64::from(i16::MAX)) as i16,
            bucket_of_theta(pose.theta),
        )
    }

    fn to_continuous(&self, state: GraphState) -> ContinuousState {
        ContinuousState::new(
            f64::from(state.x),
            f64::from(state.y),
            theta_of_bucket(state.theta),
        )
    }

    fn is_in_collision(&self, state: GraphState) -> bool {
        !self.is_free(state.x, state.y)
    }

    fn is_pose_in_collision(&self, pose: &ContinuousState) -> bool {
        self.is_in_collision(self.to_discrete(pose))
    }

    fn find_nearest_collision_free_state(&self, pose: &ContinuousState) -> Option<GraphState> {
        let state = self.to_discrete(pose);
        MOVES
            .iter()
            .filter_map(|&(action, _, _)| self.step(state, action))
            .find(|next| !self.is_in_collision(*next))
    }

    fn successors(&self, state_id: StateId, g: Cost) -> Self::Successors<'_> {
        let state = GraphState::from(state_id);
        MOVES
            .iter()
            .filter_map(|&(action, _, _)| {
                let next = self.step(state, action)?;
                if self.is_in_collision(next) {
                    return None;
                }
                let penalty = (self.penalty(state.x, state.y) + self.penalty(next.x, next.y)) / 2.0;
                Some(Successor {
                    state_id: next.id(),
                    action,
                    g: g + 1.0 + penalty,
                    penalty,
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn distance_between(&self, pose: &ContinuousState, state: GraphState) -> f64 {
        pose.distance_to(f64::from(state.x), f64::from(state.y))
    }

    fn one_over_max_velocity(&self) -> f64 {
        1.0
    }

    fn apply_action(
        &self,
        action: ActionId,
        state_id: StateId,
        check_collision: bool,
    ) -> Option<StateId> {
        let next = self.step(GraphState::from(state_id), action)?;
        if check_collision && self.is_in_collision(next) {
            return None;
        }
        Some(next.id())
    }

    fn plan_is_safe(
        &self,
        plan: &Plan,
        _max_distance_to_reuse_mm: f64,
        current_index: usize,
    ) -> PlanSafety {
        let mut current = plan.start;
        let mut reusable_plan = Plan::new(current);
        for (index, (action, penalty)) in plan.steps().enumerate() {
            match self.apply_action(action, current.id(), true) {
                Some(next) => current = GraphState::from(next),
                None => {
                    return PlanSafety {
                        is_safe: false,
                        last_safe_state: self.to_continuous(current),
                        reusable_plan,
                    }
                }
            }
            if index < current_index {
                reusable_plan.start = current;
            } else {
                reusable_plan.push(action, penalty);
            }
        }
        PlanSafety {
            is_safe: true,
            last_safe_state: self.to_continuous(current),
            reusable_plan,
        }
    }

    fn find_closest_plan_segment_to_pose(&self, plan: &Plan, pose: &ContinuousState) -> usize {
        let mut current = plan.start;
        let mut best = (f64::INFINITY, 0);
        for (index, &action) in plan.actions().iter().enumerate() {
            let distance = self.distance_between(pose, current);
            if distance < best.0 {
                best = (distance, index);
            }
            match self.step(current, action) {
                Some(next) => current = next,
                None => break,
            }
        }
        best.1
    }
}
