mod action;
mod environment;
mod lattice_config;
mod lattice_model;
mod motion_primitive;
mod obstacle;
mod primitive_definitions;
mod state;

pub use action::{ActionId, ActionType};
pub use environment::{SuccessorIter, XythetaEnvironment};
pub use lattice_config::{LatticeConfig, RobotParams};
pub use lattice_model::{Cost, LatticeModel, PlanSafety, Successor};
pub use motion_primitive::{IntermediatePosition, MotionPrimitive, Segment};
pub use obstacle::{
    BoundingBox, Obstacle, RotatedRectangle, MAX_OBSTACLE_COST, REVERSE_OVER_OBSTACLE_COST,
};
pub use primitive_definitions::{
    PrimitiveDefinition, PrimitiveDefinitions, Segments, ARC_LEFT, ARC_RIGHT, BACKUP,
    LONG_STRAIGHT, STRAIGHT, TURN_LEFT, TURN_RIGHT,
};
pub use state::{
    bucket_of_theta, normalize_angle, theta_of_bucket, ContinuousState, GraphState, StateId,
    ANGLE_STEP, MAX_COORD, MIN_COORD, NUM_ANGLES,
};
