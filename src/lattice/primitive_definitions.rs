//! Serialisable description of the motion primitives of a lattice, and the
//! standard set used when none is given.

use crate::{
    error::XythetaError,
    lattice::{ActionId, ActionType, LatticeConfig, MotionPrimitive, Segment, NUM_ANGLES},
};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::f64::consts::{FRAC_PI_4, SQRT_2};
use std::path::Path;

/// Primitives are made of very few segments, usually one or two.
pub type Segments = SmallVec<[Segment; 2]>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveDefinition {
    pub start_theta: u8,
    pub action_index: ActionId,
    pub segments: Segments,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveDefinitions {
    pub action_types: Vec<ActionType>,
    pub primitives: Vec<PrimitiveDefinition>,
}

pub const STRAIGHT: ActionId = 0;
pub const ARC_LEFT: ActionId = 1;
pub const ARC_RIGHT: ActionId = 2;
pub const LONG_STRAIGHT: ActionId = 3;
pub const TURN_LEFT: ActionId = 4;
pub const TURN_RIGHT: ActionId = 5;
pub const BACKUP: ActionId = 6;

/// Number of cells covered by the long straight primitive.
const LONG_STRAIGHT_CELLS: f64 = 3.0;

impl PrimitiveDefinitions {
    pub fn from_json(text: &str) -> Result<Self, XythetaError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, XythetaError> {
        let text = std::fs::read_to_string(path).map_err(|e| XythetaError::io(path, e))?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, XythetaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The standard eight heading lattice. From every heading the robot can
    /// drive one cell straight, three cells straight, arc 45 degrees to either
    /// side while moving three cells forward and one sideways, turn 45 degrees
    /// in place, or back up one cell.
    ///
    /// Arcs from axis aligned headings drive a short straight first, arcs
    /// from diagonal headings finish with one, so that both end on the
    /// lattice.
    pub fn standard(resolution_mm: f64) -> Self {
        let action_types = vec![
            ActionType::new(STRAIGHT, "straight", 1.1),
            ActionType::new(ARC_LEFT, "arc_left", 1.2),
            ActionType::new(ARC_RIGHT, "arc_right", 1.2),
            ActionType::new(LONG_STRAIGHT, "long_straight", 1.0),
            ActionType::new(TURN_LEFT, "turn_left", 1.5),
            ActionType::new(TURN_RIGHT, "turn_right", 1.5),
            ActionType::new(BACKUP, "backup", 2.0).reversing(),
        ];

        let radius_mm = resolution_mm / (1.0 - FRAC_PI_4.cos());
        let lead_mm = 3.0 * resolution_mm - radius_mm * FRAC_PI_4.sin();
        let arc = |sweep_rad: f64, diagonal: bool| -> Segments {
            let arc = Segment::Arc {
                radius_mm,
                sweep_rad,
            };
            let lead = Segment::Line { length_mm: lead_mm };
            if diagonal {
                smallvec![arc, lead]
            } else {
                smallvec![lead, arc]
            }
        };

        let mut primitives = Vec::new();
        for start_theta in 0..NUM_ANGLES {
            let diagonal = start_theta % 2 == 1;
            let step_mm = if diagonal {
                resolution_mm * SQRT_2
            } else {
                resolution_mm
            };
            let mut add = |action_index, segments| {
                primitives.push(PrimitiveDefinition {
                    start_theta,
                    action_index,
                    segments,
                })
            };
            add(STRAIGHT, smallvec![Segment::Line { length_mm: step_mm }]);
            add(ARC_LEFT, arc(FRAC_PI_4, diagonal));
            add(ARC_RIGHT, arc(-FRAC_PI_4, diagonal));
            add(
                LONG_STRAIGHT,
                smallvec![Segment::Line {
                    length_mm: LONG_STRAIGHT_CELLS * step_mm
                }],
            );
            add(
                TURN_LEFT,
                smallvec![Segment::TurnInPlace {
                    sweep_rad: FRAC_PI_4
                }],
            );
            add(
                TURN_RIGHT,
                smallvec![Segment::TurnInPlace {
                    sweep_rad: -FRAC_PI_4
                }],
            );
            add(BACKUP, smallvec![Segment::Line { length_mm: -step_mm }]);
        }

        Self {
            action_types,
            primitives,
        }
    }

    /// Validate the action types and simulate every primitive. The result is
    /// indexed by starting heading, each list sorted by action id.
    pub fn build(
        &self,
        config: &LatticeConfig,
    ) -> Result<(Vec<ActionType>, Vec<Vec<MotionPrimitive>>), XythetaError> {
        config.validate()?;

        let mut action_types = self.action_types.clone();
        action_types.sort_by_key(|action_type| action_type.index);
        for (i, action_type) in action_types.iter().enumerate() {
            action_type.validate()?;
            if i > 0 && action_types[i - 1].index == action_type.index {
                return Err(XythetaError::DuplicateActionType(action_type.index));
            }
        }

        let mut primitives: Vec<Vec<MotionPrimitive>> = vec![Vec::new(); NUM_ANGLES as usize];
        for definition in &self.primitives {
            let action_type = action_types
                .iter()
                .find(|action_type| action_type.index == definition.action_index)
                .ok_or(XythetaError::UnknownActionType(definition.action_index))?;
            let for_heading = primitives
                .get_mut(usize::from(definition.start_theta))
                .ok_or(XythetaError::InvalidHeading(definition.start_theta))?;
            if for_heading.iter().any(|p| p.id == definition.action_index) {
                return Err(XythetaError::DuplicatePrimitive {
                    action: definition.action_index,
                    theta: definition.start_theta,
                });
            }
            for_heading.push(MotionPrimitive::create(
                definition.start_theta,
                action_type,
                &definition.segments,
                config.resolution_mm,
                &config.robot,
            )?);
        }
        for for_heading in primitives.iter_mut() {
            for_heading.sort_by_key(|primitive| primitive.id);
        }

        Ok((action_types, primitives))
    }
}
