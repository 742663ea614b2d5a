//! The lattice environment: motion primitives per heading, configuration
//! space obstacles, and everything the planner needs from them.

use crate::{
    error::XythetaError,
    lattice::{
        bucket_of_theta, normalize_angle, theta_of_bucket, ActionId, ActionType, BoundingBox,
        ContinuousState, Cost, GraphState, LatticeConfig, LatticeModel, MotionPrimitive, Obstacle,
        PlanSafety, PrimitiveDefinitions, StateId, Successor, ANGLE_STEP, MAX_COORD, MIN_COORD,
        NUM_ANGLES, REVERSE_OVER_OBSTACLE_COST,
    },
    search::Plan,
};
use itertools::iproduct;
use ordered_float::OrderedFloat;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
struct PlacedObstacle {
    obstacle: Obstacle,
    bounds: BoundingBox,
}

impl PlacedObstacle {
    fn new(obstacle: Obstacle) -> Self {
        Self {
            obstacle,
            bounds: obstacle.shape.bounding_box(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct XythetaEnvironment {
    config: LatticeConfig,
    action_types: Vec<ActionType>,
    /// Indexed by starting heading, sorted by action id.
    primitives: Vec<Vec<MotionPrimitive>>,
    /// Indexed by heading. A robot that is not round grows every obstacle
    /// into a different configuration space shape for each heading.
    obstacles_per_angle: Vec<Vec<PlacedObstacle>>,
    /// Bounds of the obstacles of all headings.
    obstacle_bounds: Vec<BoundingBox>,
}

impl XythetaEnvironment {
    /// Environment with the standard primitive set.
    pub fn new(config: LatticeConfig) -> Result<Self, XythetaError> {
        let definitions = PrimitiveDefinitions::standard(config.resolution_mm);
        Self::with_primitives(config, &definitions)
    }

    pub fn with_primitives(
        config: LatticeConfig,
        definitions: &PrimitiveDefinitions,
    ) -> Result<Self, XythetaError> {
        let (action_types, primitives) = definitions.build(&config)?;
        info!(
            resolution_mm = config.resolution_mm,
            num_action_types = action_types.len(),
            num_primitives = primitives.iter().map(Vec::len).sum::<usize>(),
            "built lattice"
        );
        Ok(Self {
            config,
            action_types,
            primitives,
            obstacles_per_angle: vec![Vec::new(); usize::from(NUM_ANGLES)],
            obstacle_bounds: Vec::new(),
        })
    }

    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    pub fn resolution_mm(&self) -> f64 {
        self.config.resolution_mm
    }

    pub fn action_types(&self) -> &[ActionType] {
        &self.action_types
    }

    pub fn action_type(&self, action: ActionId) -> Option<&ActionType> {
        self.action_types.iter().find(|a| a.index == action)
    }

    pub fn primitives(&self, theta: u8) -> &[MotionPrimitive] {
        self.primitives
            .get(usize::from(theta))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn primitive(&self, theta: u8, action: ActionId) -> Option<&MotionPrimitive> {
        self.primitives(theta).iter().find(|p| p.id == action)
    }

    /// Add an obstacle that blocks the robot at every heading.
    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> Result<(), XythetaError> {
        obstacle.validate()?;
        debug!(?obstacle, "adding obstacle for every heading");
        let placed = PlacedObstacle::new(obstacle);
        for obstacles in &mut self.obstacles_per_angle {
            obstacles.push(placed);
        }
        self.obstacle_bounds.push(placed.bounds);
        Ok(())
    }

    /// Add an obstacle that only applies while the robot faces `theta`.
    pub fn add_obstacle_for_angle(
        &mut self,
        theta: u8,
        obstacle: Obstacle,
    ) -> Result<(), XythetaError> {
        obstacle.validate()?;
        let obstacles = self
            .obstacles_per_angle
            .get_mut(usize::from(theta))
            .ok_or(XythetaError::InvalidHeading(theta))?;
        debug!(theta, ?obstacle, "adding obstacle");
        let placed = PlacedObstacle::new(obstacle);
        obstacles.push(placed);
        self.obstacle_bounds.push(placed.bounds);
        Ok(())
    }

    pub fn add_obstacles(
        &mut self,
        obstacles: impl IntoIterator<Item = Obstacle>,
    ) -> Result<(), XythetaError> {
        for obstacle in obstacles {
            self.add_obstacle(obstacle)?;
        }
        Ok(())
    }

    pub fn clear_obstacles(&mut self) {
        for obstacles in &mut self.obstacles_per_angle {
            obstacles.clear();
        }
        self.obstacle_bounds.clear();
    }

    /// Obstacles in effect while facing `theta`.
    pub fn obstacles(&self, theta: u8) -> impl Iterator<Item = &Obstacle> + '_ {
        self.obstacles_for_angle(theta)
            .iter()
            .map(|placed| &placed.obstacle)
    }

    fn obstacles_for_angle(&self, theta: u8) -> &[PlacedObstacle] {
        self.obstacles_per_angle
            .get(usize::from(theta))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn cell_to_mm(&self, cell: i16) -> f64 {
        f64::from(cell) * self.config.resolution_mm
    }

    /// Nearest cell coordinate. Poses beyond the packable range map to a
    /// coordinate just outside it, which counts as being in collision.
    fn mm_to_cell(&self, mm: f64) -> i16 {
        (mm / self.config.resolution_mm)
            .round()
            .clamp(f64::from(MIN_COORD) - 1.0, f64::from(MAX_COORD) + 1.0) as i16
    }

    fn is_point_in_collision(&self, theta: u8, x_mm: f64, y_mm: f64) -> bool {
        self.obstacles_for_angle(theta)
            .iter()
            .any(|placed| placed.obstacle.is_fatal() && placed.obstacle.contains(x_mm, y_mm))
    }

    /// Soft obstacle penalty for driving `primitive` from the cell centred at
    /// `origin`, or `None` if it hits a fatal obstacle.
    ///
    /// Primitives that keep their heading are checked against the obstacles
    /// of that heading. Every pose of a turning primitive is checked against
    /// the obstacles of the heading nearest to it.
    fn primitive_penalty(
        &self,
        origin: &ContinuousState,
        primitive: &MotionPrimitive,
    ) -> Option<Cost> {
        let bounds = primitive.bounds.translated(origin.x_mm, origin.y_mm);
        if !self.obstacle_bounds.iter().any(|b| b.intersects(&bounds)) {
            return Some(0.0);
        }

        let reverse = self
            .action_type(primitive.id)
            .is_some_and(|action_type| action_type.reverse_action);
        let keeps_heading = primitive.end_theta == primitive.start_theta;
        let mut penalty = 0.0;
        for point in &primitive.intermediate_positions {
            let theta = if keeps_heading {
                primitive.start_theta
            } else {
                point.nearest_theta
            };
            let x = origin.x_mm + point.position.x_mm;
            let y = origin.y_mm + point.position.y_mm;
            for placed in self.obstacles_for_angle(theta) {
                if !placed.bounds.intersects(&bounds) || !placed.obstacle.contains(x, y) {
                    continue;
                }
                if placed.obstacle.is_fatal() {
                    return None;
                }
                penalty += placed.obstacle.cost * point.weight;
                if reverse {
                    penalty += REVERSE_OVER_OBSTACLE_COST;
                }
            }
        }
        debug_assert!(penalty.is_finite() && penalty >= 0.0);
        Some(penalty)
    }

    fn end_of(&self, state: GraphState, primitive: &MotionPrimitive) -> Option<GraphState> {
        state.offset(primitive.end_dx, primitive.end_dy, primitive.end_theta)
    }
}

/// Lazily checks the primitives of one state, yielding the collision free
/// ones.
#[derive(Debug)]
pub struct SuccessorIter<'a> {
    env: &'a XythetaEnvironment,
    start: GraphState,
    start_c: ContinuousState,
    start_g: Cost,
    primitives: std::slice::Iter<'a, MotionPrimitive>,
}

impl Iterator for SuccessorIter<'_> {
    type Item = Successor;

    fn next(&mut self) -> Option<Successor> {
        for primitive in self.primitives.by_ref() {
            let Some(next) = self.env.end_of(self.start, primitive) else {
                continue;
            };
            let Some(penalty) = self.env.primitive_penalty(&self.start_c, primitive) else {
                continue;
            };
            return Some(Successor {
                state_id: next.id(),
                action: primitive.id,
                g: self.start_g + primitive.cost + penalty,
                penalty,
            });
        }
        None
    }
}

impl LatticeModel for XythetaEnvironment {
    type Successors<'a> = SuccessorIter<'a>;

    fn to_discrete(&self, pose: &ContinuousState) -> GraphState {
        GraphState::new(
            self.mm_to_cell(pose.x_mm),
            self.mm_to_cell(pose.y_mm),
            bucket_of_theta(pose.theta),
        )
    }

    fn to_continuous(&self, state: GraphState) -> ContinuousState {
        ContinuousState::new(
            self.cell_to_mm(state.x),
            self.cell_to_mm(state.y),
            theta_of_bucket(state.theta),
        )
    }

    fn is_in_collision(&self, state: GraphState) -> bool {
        !state.is_packable()
            || self.is_point_in_collision(
                state.theta,
                self.cell_to_mm(state.x),
                self.cell_to_mm(state.y),
            )
    }

    /// Poses with non-finite coordinates are in collision.
    fn is_pose_in_collision(&self, pose: &ContinuousState) -> bool {
        !pose.is_finite()
            || self.is_point_in_collision(bucket_of_theta(pose.theta), pose.x_mm, pose.y_mm)
    }

    fn find_nearest_collision_free_state(&self, pose: &ContinuousState) -> Option<GraphState> {
        if !pose.is_finite() {
            return None;
        }
        let resolution = self.config.resolution_mm;
        let clamp =
            |cell: f64| cell.clamp(f64::from(MIN_COORD) - 1.0, f64::from(MAX_COORD) + 1.0);
        let (fx, fy) = (pose.x_mm / resolution, pose.y_mm / resolution);
        let ft = pose.theta / ANGLE_STEP;
        let bucket = |t: f64| (t as i64).rem_euclid(i64::from(NUM_ANGLES)) as u8;

        iproduct!(
            [fx.floor(), fx.ceil()],
            [fy.floor(), fy.ceil()],
            [ft.floor(), ft.ceil()]
        )
        .map(|(x, y, t)| GraphState::new(clamp(x) as i16, clamp(y) as i16, bucket(t)))
        .filter(|state| !self.is_in_collision(*state))
        .min_by_key(|state| {
            (
                OrderedFloat(self.distance_between(pose, *state)),
                OrderedFloat(normalize_angle(pose.theta - theta_of_bucket(state.theta)).abs()),
            )
        })
    }

    fn successors(&self, state_id: StateId, g: Cost) -> SuccessorIter<'_> {
        let start = GraphState::from(state_id);
        SuccessorIter {
            env: self,
            start,
            start_c: self.to_continuous(start),
            start_g: g,
            primitives: self.primitives(start.theta).iter(),
        }
    }

    fn distance_between(&self, pose: &ContinuousState, state: GraphState) -> f64 {
        pose.distance_to(self.cell_to_mm(state.x), self.cell_to_mm(state.y))
    }

    fn one_over_max_velocity(&self) -> f64 {
        1.0 / self.config.robot.max_velocity_mmps
    }

    fn apply_action(
        &self,
        action: ActionId,
        state_id: StateId,
        check_collision: bool,
    ) -> Option<StateId> {
        let state = GraphState::from(state_id);
        let primitive = self.primitive(state.theta, action)?;
        if check_collision
            && self
                .primitive_penalty(&self.to_continuous(state), primitive)
                .is_none()
        {
            return None;
        }
        self.end_of(state, primitive).map(|next| next.id())
    }

    fn plan_is_safe(
        &self,
        plan: &Plan,
        max_distance_to_reuse_mm: f64,
        current_index: usize,
    ) -> PlanSafety {
        let mut curr = plan.start;
        for &action in plan.actions().iter().take(current_index) {
            match self
                .primitive(curr.theta, action)
                .and_then(|primitive| self.end_of(curr, primitive))
            {
                Some(next) => curr = next,
                None => {
                    return PlanSafety {
                        is_safe: false,
                        last_safe_state: self.to_continuous(curr),
                        reusable_plan: Plan::new(curr),
                    }
                }
            }
        }

        let mut reusable_plan = Plan::new(curr);
        let mut last_safe = curr;
        let mut reused_mm = 0.0;
        let mut reusing = true;
        for (action, penalty) in plan.steps().skip(current_index) {
            let next = self.primitive(curr.theta, action).and_then(|primitive| {
                self.primitive_penalty(&self.to_continuous(curr), primitive)?;
                Some((self.end_of(curr, primitive)?, primitive.length_mm))
            });
            let Some((next, length_mm)) = next else {
                debug!(%curr, action, "plan is no longer safe");
                return PlanSafety {
                    is_safe: false,
                    last_safe_state: self.to_continuous(last_safe),
                    reusable_plan,
                };
            };
            if reusing {
                reused_mm += length_mm;
                if reused_mm <= max_distance_to_reuse_mm {
                    reusable_plan.push(action, penalty);
                    last_safe = next;
                } else {
                    reusing = false;
                }
            }
            curr = next;
        }

        PlanSafety {
            is_safe: true,
            last_safe_state: self.to_continuous(last_safe),
            reusable_plan,
        }
    }

    fn find_closest_plan_segment_to_pose(&self, plan: &Plan, pose: &ContinuousState) -> usize {
        let mut best_distance = f64::INFINITY;
        let mut best_index = 0;
        let mut curr = plan.start;
        for (index, &action) in plan.actions().iter().enumerate() {
            let Some(primitive) = self.primitive(curr.theta, action) else {
                break;
            };
            let origin = self.to_continuous(curr);
            // the last pose is the first pose of the next action
            let num_points = primitive.intermediate_positions.len().saturating_sub(1);
            for point in primitive.intermediate_positions.iter().take(num_points) {
                let distance = pose.distance_to(
                    origin.x_mm + point.position.x_mm,
                    origin.y_mm + point.position.y_mm,
                );
                if distance < best_distance {
                    best_distance = distance;
                    best_index = index;
                }
            }
            match self.end_of(curr, primitive) {
                Some(next) => curr = next,
                None => break,
            }
        }
        best_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{
        RotatedRectangle, ARC_LEFT, ARC_RIGHT, BACKUP, LONG_STRAIGHT, STRAIGHT, TURN_LEFT,
        TURN_RIGHT,
    };
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_4;

    fn env() -> XythetaEnvironment {
        XythetaEnvironment::new(LatticeConfig::default()).unwrap()
    }

    fn straight_plan(num_actions: usize) -> Plan {
        let mut plan = Plan::new(GraphState::new(0, 0, 0));
        for _ in 0..num_actions {
            plan.push(STRAIGHT, 0.0);
        }
        plan
    }

    #[test]
    fn open_space_has_every_successor() {
        let env = env();
        let start = GraphState::new(0, 0, 0).id();
        let successors: Vec<Successor> = env.successors(start, 1.5).collect();
        assert_eq!(successors.len(), 7);
        for (successor, primitive) in successors.iter().zip(env.primitives(0)) {
            assert_eq!(successor.action, primitive.id);
            assert_eq!(successor.penalty, 0.0);
            assert_approx_eq!(successor.g, 1.5 + primitive.cost);
        }
        let again: Vec<Successor> = env.successors(start, 1.5).collect();
        assert_eq!(successors, again);
    }

    #[test]
    fn fatal_obstacle_prunes_successors() {
        let mut env = env();
        env.add_obstacle(Obstacle::fatal(RotatedRectangle::axis_aligned(
            5.0, -5.0, 15.0, 5.0,
        )))
        .unwrap();
        let actions: Vec<ActionId> = env
            .successors(GraphState::new(0, 0, 0).id(), 0.0)
            .map(|s| s.action)
            .collect();
        assert_eq!(actions, vec![TURN_LEFT, TURN_RIGHT, BACKUP]);
    }

    #[test]
    fn soft_obstacle_adds_penalty() {
        let mut env = env();
        env.add_obstacle(Obstacle::soft(
            RotatedRectangle::axis_aligned(5.0, -5.0, 15.0, 5.0),
            10.0,
        ))
        .unwrap();
        let straight = env
            .successors(GraphState::new(0, 0, 0).id(), 0.0)
            .find(|s| s.action == STRAIGHT)
            .unwrap();
        assert!(straight.penalty > 0.0);
        let cost = env.primitive(0, STRAIGHT).unwrap().cost;
        assert_approx_eq!(straight.g, cost + straight.penalty);
    }

    #[test]
    fn obstacles_can_apply_to_one_heading() {
        let mut env = env();
        let square = Obstacle::fatal(RotatedRectangle::axis_aligned(-3.0, -3.0, 3.0, 3.0));
        env.add_obstacle_for_angle(1, square).unwrap();
        assert_eq!(env.obstacles(1).count(), 1);
        assert_eq!(env.obstacles(0).count(), 0);

        assert!(env.is_in_collision(GraphState::new(0, 0, 1)));
        assert!(!env.is_in_collision(GraphState::new(0, 0, 0)));
        assert!(env.is_pose_in_collision(&ContinuousState::new(0.0, 0.0, FRAC_PI_4)));
        assert!(!env.is_pose_in_collision(&ContinuousState::new(0.0, 0.0, 0.1)));

        assert!(matches!(
            env.add_obstacle_for_angle(NUM_ANGLES, square),
            Err(XythetaError::InvalidHeading(8))
        ));
        env.clear_obstacles();
        assert!(!env.is_in_collision(GraphState::new(0, 0, 1)));
    }

    #[test]
    fn straight_primitives_use_their_own_heading() {
        let mut env = env();
        let square = Obstacle::fatal(RotatedRectangle::axis_aligned(5.0, -5.0, 15.0, 5.0));
        env.add_obstacle_for_angle(0, square).unwrap();

        let east = env.apply_action(STRAIGHT, GraphState::new(0, 0, 0).id(), true);
        assert_eq!(east, None);
        // driving north through the same square is fine
        let north = env.apply_action(STRAIGHT, GraphState::new(1, -1, 2).id(), true);
        assert_eq!(north, Some(GraphState::new(1, 0, 2).id()));
    }

    #[test]
    fn arcs_use_the_nearest_heading_of_each_pose() {
        // only the second half of the left arc from heading 0 passes through
        // this box, and there the robot is closer to heading 1
        let square = Obstacle::fatal(RotatedRectangle::axis_aligned(20.0, 2.0, 26.0, 8.0));
        let start = GraphState::new(0, 0, 0).id();
        let actions = |env: &XythetaEnvironment| -> Vec<ActionId> {
            env.successors(start, 0.0).map(|s| s.action).collect()
        };

        let mut east_only = env();
        east_only.add_obstacle_for_angle(0, square).unwrap();
        assert_eq!(actions(&east_only).len(), 7);

        let mut north_east_only = env();
        north_east_only.add_obstacle_for_angle(1, square).unwrap();
        assert_eq!(
            actions(&north_east_only),
            vec![STRAIGHT, ARC_RIGHT, LONG_STRAIGHT, TURN_LEFT, TURN_RIGHT, BACKUP]
        );

        let mut every_heading = env();
        every_heading.add_obstacle(square).unwrap();
        assert!(!actions(&every_heading).contains(&ARC_LEFT));
    }

    #[test]
    fn invalid_obstacles_are_rejected() {
        let mut env = env();
        let shape = RotatedRectangle::axis_aligned(5.0, -5.0, 15.0, 5.0);
        assert!(matches!(
            env.add_obstacle(Obstacle::soft(shape, -50.0)),
            Err(XythetaError::InvalidParameter(_))
        ));
        assert!(env
            .add_obstacles([Obstacle::soft(shape, 5.0), Obstacle::soft(shape, f64::NAN)])
            .is_err());
        assert!(matches!(
            env.add_obstacle_for_angle(3, Obstacle::soft(shape, -1.0)),
            Err(XythetaError::InvalidParameter(_))
        ));
        assert_eq!(env.obstacles(0).count(), 1);
        assert_eq!(env.obstacles(3).count(), 1);

        let penalties: Vec<Cost> = env
            .successors(GraphState::new(0, 0, 0).id(), 0.0)
            .map(|s| s.penalty)
            .collect();
        assert!(penalties.iter().all(|&penalty| penalty >= 0.0));
    }

    #[test]
    fn non_finite_poses_are_in_collision() {
        let env = env();
        for pose in [
            ContinuousState::new(f64::NAN, 0.0, 0.0),
            ContinuousState::new(0.0, f64::INFINITY, 0.0),
            ContinuousState::new(0.0, 0.0, f64::NAN),
        ] {
            assert!(env.is_pose_in_collision(&pose));
            assert_eq!(env.find_nearest_collision_free_state(&pose), None);
        }
    }

    #[test]
    fn rounding_and_collisions() {
        let mut env = env();
        assert_eq!(
            env.to_discrete(&ContinuousState::new(14.0, -26.0, 1.6)),
            GraphState::new(1, -3, 2)
        );
        env.add_obstacle(Obstacle::fatal(RotatedRectangle::axis_aligned(
            17.0, -3.0, 23.0, 3.0,
        )))
        .unwrap();
        assert!(env.is_in_collision(GraphState::new(2, 0, 0)));
        assert!(!env.is_in_collision(GraphState::new(3, 0, 0)));

        let pose = ContinuousState::new(24.0, 0.0, 0.1);
        assert!(!env.is_pose_in_collision(&pose));
        assert!(env.is_in_collision(env.to_discrete(&pose)));
        assert_eq!(
            env.find_nearest_collision_free_state(&pose),
            Some(GraphState::new(3, 0, 0))
        );
    }

    #[test]
    fn nearest_free_state_fails_when_surrounded() {
        let mut env = env();
        env.add_obstacle(Obstacle::fatal(RotatedRectangle::axis_aligned(
            -15.0, -15.0, 15.0, 15.0,
        )))
        .unwrap();
        let pose = ContinuousState::new(3.0, 4.0, 0.2);
        assert_eq!(env.find_nearest_collision_free_state(&pose), None);
    }

    #[test]
    fn far_away_poses_are_in_collision() {
        let env = env();
        let state = env.to_discrete(&ContinuousState::new(1e9, 0.0, 0.0));
        assert!(!state.is_packable());
        assert!(env.is_in_collision(state));
    }

    #[test]
    fn apply_action_follows_primitives() {
        let mut env = env();
        let start = GraphState::new(0, 0, 0).id();
        let end = env.apply_action(STRAIGHT, start, true).unwrap();
        assert_eq!(GraphState::from(end), GraphState::new(1, 0, 0));

        env.add_obstacle(Obstacle::fatal(RotatedRectangle::axis_aligned(
            5.0, -5.0, 15.0, 5.0,
        )))
        .unwrap();
        assert_eq!(env.apply_action(STRAIGHT, start, true), None);
        assert_eq!(env.apply_action(STRAIGHT, start, false), Some(end));
    }

    #[test]
    fn plan_safety_reports_reusable_prefix() {
        let mut env = env();
        let plan = straight_plan(10);
        assert!(env.plan_is_safe(&plan, 60.0, 0).is_safe);

        env.add_obstacle(Obstacle::fatal(RotatedRectangle::axis_aligned(
            52.0, -5.0, 58.0, 5.0,
        )))
        .unwrap();

        let safety = env.plan_is_safe(&plan, 30.0, 0);
        assert!(!safety.is_safe);
        assert_eq!(safety.reusable_plan.len(), 3);
        assert_approx_eq!(safety.last_safe_state.x_mm, 30.0);

        let safety = env.plan_is_safe(&plan, 1000.0, 0);
        assert!(!safety.is_safe);
        assert_eq!(safety.reusable_plan.len(), 5);
        assert_approx_eq!(safety.last_safe_state.x_mm, 50.0);

        let safety = env.plan_is_safe(&plan, 1000.0, 2);
        assert_eq!(safety.reusable_plan.start, GraphState::new(2, 0, 0));
        assert_eq!(safety.reusable_plan.len(), 3);
        let mut curr = safety.reusable_plan.start.id();
        for &action in safety.reusable_plan.actions() {
            curr = env.apply_action(action, curr, true).unwrap();
        }
        assert_eq!(curr, env.to_discrete(&safety.last_safe_state).id());
    }

    #[test]
    fn closest_segment_on_a_straight_plan() {
        let env = env();
        let plan = straight_plan(10);
        for index in 0..10 {
            let along = (index as f64 + 0.3) * env.resolution_mm();
            for y in [0.0, 7.36, -0.3] {
                let pose = ContinuousState::new(along, y, 0.0);
                assert_eq!(env.find_closest_plan_segment_to_pose(&plan, &pose), index);
            }
        }
        // past the end still maps to the last action
        let pose = ContinuousState::new(120.0, 0.0, 0.0);
        assert_eq!(env.find_closest_plan_segment_to_pose(&plan, &pose), 9);
    }
}
