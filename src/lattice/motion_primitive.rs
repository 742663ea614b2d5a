//! Motion primitives: the edges of the lattice. A primitive is built once per
//! starting heading by simulating its segments, which gives the end state
//! offset, the poses swept along the way (for collision checking) and the
//! cost, which is the time in seconds the motion takes.

use crate::{
    error::XythetaError,
    lattice::{
        bucket_of_theta, normalize_angle, theta_of_bucket, ActionId, ActionType, BoundingBox,
        ContinuousState, Cost, RobotParams, NUM_ANGLES,
    },
};
use serde::{Deserialize, Serialize};

/// Maximum distance between the simulated end pose of a primitive and the
/// lattice point it is supposed to reach.
const LATTICE_TOLERANCE_MM: f64 = 1e-3;
const LATTICE_TOLERANCE_RAD: f64 = 1e-6;

/// Fraction of the lattice resolution between consecutive intermediate poses.
const SAMPLES_PER_CELL: f64 = 4.0;
const TURN_SAMPLE_SPACING_RAD: f64 = 0.1;

const MIN_PRIMITIVE_COST: f64 = 1e-6;

/// One piece of a primitive, relative to the pose the piece starts from.
/// Negative line lengths drive backwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Line { length_mm: f64 },
    Arc { radius_mm: f64, sweep_rad: f64 },
    TurnInPlace { sweep_rad: f64 },
}

impl Segment {
    fn path_length_mm(&self) -> f64 {
        match *self {
            Segment::Line { length_mm } => length_mm.abs(),
            Segment::Arc {
                radius_mm,
                sweep_rad,
            } => radius_mm.abs() * sweep_rad.abs(),
            Segment::TurnInPlace { .. } => 0.0,
        }
    }

    /// Time to drive the segment at `speed` (mm/s). Arcs and turns are bound
    /// by the speed of the outer wheel.
    fn duration(&self, speed: f64, half_wheel_base_mm: f64) -> f64 {
        match *self {
            Segment::Line { length_mm } => length_mm.abs() / speed,
            Segment::Arc {
                radius_mm,
                sweep_rad,
            } => sweep_rad.abs() * (radius_mm.abs() + half_wheel_base_mm) / speed,
            Segment::TurnInPlace { sweep_rad } => sweep_rad.abs() * half_wheel_base_mm / speed,
        }
    }

    fn num_samples(&self, resolution_mm: f64) -> usize {
        let spacing = resolution_mm / SAMPLES_PER_CELL;
        let samples = match *self {
            Segment::Line { .. } | Segment::Arc { .. } => self.path_length_mm() / spacing,
            Segment::TurnInPlace { sweep_rad } => sweep_rad.abs() / TURN_SAMPLE_SPACING_RAD,
        };
        (samples.ceil() as usize).max(1)
    }

    /// Pose after driving `fraction` of the segment from `start`.
    fn pose_at(&self, start: &ContinuousState, fraction: f64) -> ContinuousState {
        match *self {
            Segment::Line { length_mm } => {
                let distance = length_mm * fraction;
                ContinuousState::new(
                    start.x_mm + distance * start.theta.cos(),
                    start.y_mm + distance * start.theta.sin(),
                    start.theta,
                )
            }
            Segment::Arc {
                radius_mm,
                sweep_rad,
            } => {
                let side = sweep_rad.signum();
                let radius = radius_mm.abs();
                let center_x = start.x_mm - side * radius * start.theta.sin();
                let center_y = start.y_mm + side * radius * start.theta.cos();
                let theta = start.theta + sweep_rad * fraction;
                ContinuousState::new(
                    center_x + side * radius * theta.sin(),
                    center_y - side * radius * theta.cos(),
                    theta,
                )
            }
            Segment::TurnInPlace { sweep_rad } => ContinuousState::new(
                start.x_mm,
                start.y_mm,
                start.theta + sweep_rad * fraction,
            ),
        }
    }
}

/// A pose swept by a primitive, relative to the centre of the start cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntermediatePosition {
    pub position: ContinuousState,
    pub nearest_theta: u8,
    /// Seconds spent getting here from the previous intermediate pose. Soft
    /// obstacle penalties are weighted by it.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionPrimitive {
    pub id: ActionId,
    pub start_theta: u8,
    pub end_dx: i16,
    pub end_dy: i16,
    pub end_theta: u8,
    pub cost: Cost,
    /// Distance driven, turns in place count as zero.
    pub length_mm: f64,
    pub intermediate_positions: Vec<IntermediatePosition>,
    /// Bounds of the intermediate positions, relative to the start cell.
    pub bounds: BoundingBox,
}

impl MotionPrimitive {
    pub fn create(
        start_theta: u8,
        action_type: &ActionType,
        segments: &[Segment],
        resolution_mm: f64,
        robot: &RobotParams,
    ) -> Result<Self, XythetaError> {
        if start_theta >= NUM_ANGLES {
            return Err(XythetaError::InvalidHeading(start_theta));
        }
        let speed = if action_type.reverse_action {
            robot.max_reverse_velocity_mmps
        } else {
            robot.max_velocity_mmps
        };

        let mut pose = ContinuousState::new(0.0, 0.0, theta_of_bucket(start_theta));
        let mut intermediate_positions = vec![IntermediatePosition {
            position: pose,
            nearest_theta: start_theta,
            weight: 0.0,
        }];
        let mut cost = 0.0;
        let mut length_mm = 0.0;

        for segment in segments {
            let duration = segment.duration(speed, robot.half_wheel_base_mm);
            let num_samples = segment.num_samples(resolution_mm);
            for sample in 1..=num_samples {
                let fraction = sample as f64 / num_samples as f64;
                let position = segment.pose_at(&pose, fraction);
                intermediate_positions.push(IntermediatePosition {
                    position,
                    nearest_theta: bucket_of_theta(position.theta),
                    weight: duration / num_samples as f64,
                });
            }
            pose = segment.pose_at(&pose, 1.0);
            cost += duration;
            length_mm += segment.path_length_mm();
        }
        cost *= action_type.extra_cost_factor;

        if !(cost >= MIN_PRIMITIVE_COST) {
            return Err(XythetaError::NonPositiveCost {
                action: action_type.index,
                theta: start_theta,
                cost,
            });
        }

        let off_lattice = || XythetaError::OffLattice {
            action: action_type.index,
            theta: start_theta,
            x_mm: pose.x_mm,
            y_mm: pose.y_mm,
            end_theta: pose.theta,
        };
        let end_x = (pose.x_mm / resolution_mm).round();
        let end_y = (pose.y_mm / resolution_mm).round();
        let end_theta = bucket_of_theta(pose.theta);
        let theta_error = normalize_angle(pose.theta - theta_of_bucket(end_theta)).abs();
        if (pose.x_mm - end_x * resolution_mm).abs() > LATTICE_TOLERANCE_MM
            || (pose.y_mm - end_y * resolution_mm).abs() > LATTICE_TOLERANCE_MM
            || theta_error > LATTICE_TOLERANCE_RAD
            || end_x.abs() > f64::from(i16::MAX)
            || end_y.abs() > f64::from(i16::MAX)
        {
            return Err(off_lattice());
        }

        // snap the last pose exactly onto the lattice
        if let Some(last) = intermediate_positions.last_mut() {
            last.position = ContinuousState::new(
                end_x * resolution_mm,
                end_y * resolution_mm,
                theta_of_bucket(end_theta),
            );
            last.nearest_theta = end_theta;
        }

        let bounds = BoundingBox::from_points(
            intermediate_positions
                .iter()
                .map(|p| (p.position.x_mm, p.position.y_mm)),
        );

        Ok(Self {
            id: action_type.index,
            start_theta,
            end_dx: end_x as i16,
            end_dy: end_y as i16,
            end_theta,
            cost,
            length_mm,
            intermediate_positions,
            bounds,
        })
    }

    pub fn is_turn_in_place(&self) -> bool {
        self.end_dx == 0 && self.end_dy == 0
    }
}
