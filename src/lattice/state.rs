//! Discrete and continuous robot states. A [`GraphState`] is a vertex of the
//! search graph: a cell of the lattice together with a heading bucket. It is
//! packed into a [`StateId`] so that it can be used as a cheap hash key.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::Display;

/// Number of heading buckets in the lattice.
pub const NUM_ANGLES: u8 = 8;

/// Width of one heading bucket, in radians.
pub const ANGLE_STEP: f64 = 2.0 * PI / NUM_ANGLES as f64;

const THETA_BITS: u32 = 4;
const COORD_BITS: u32 = 14;
const THETA_MASK: u32 = (1 << THETA_BITS) - 1;
const COORD_MASK: u32 = (1 << COORD_BITS) - 1;

/// Smallest cell coordinate that fits in a [`StateId`].
pub const MIN_COORD: i16 = -(1 << (COORD_BITS - 1));
/// Largest cell coordinate that fits in a [`StateId`].
pub const MAX_COORD: i16 = (1 << (COORD_BITS - 1)) - 1;

/// Packed form of a [`GraphState`]: 4 bits of heading, then 14 bits each of
/// two's complement x and y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StateId(u32);

impl StateId {
    pub fn raw(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GraphState {
    pub x: i16,
    pub y: i16,
    pub theta: u8,
}

impl GraphState {
    pub fn new(x: i16, y: i16, theta: u8) -> Self {
        Self { x, y, theta }
    }

    /// Whether the state can be packed into a [`StateId`] without losing
    /// information.
    pub fn is_packable(&self) -> bool {
        (MIN_COORD..=MAX_COORD).contains(&self.x)
            && (MIN_COORD..=MAX_COORD).contains(&self.y)
            && self.theta < NUM_ANGLES
    }

    pub fn id(&self) -> StateId {
        StateId::from(*self)
    }

    /// Translate by a cell offset and take on a new heading. Returns `None`
    /// if the result leaves the packable range.
    pub fn offset(&self, dx: i16, dy: i16, theta: u8) -> Option<GraphState> {
        let state = GraphState {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            theta,
        };
        state.is_packable().then_some(state)
    }

    pub fn same_cell(&self, other: &GraphState) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl From<GraphState> for StateId {
    fn from(state: GraphState) -> Self {
        debug_assert!(state.is_packable(), "state {state} cannot be packed");
        let x = (state.x as u16 as u32) & COORD_MASK;
        let y = (state.y as u16 as u32) & COORD_MASK;
        let theta = u32::from(state.theta) & THETA_MASK;
        StateId(theta | (x << THETA_BITS) | (y << (THETA_BITS + COORD_BITS)))
    }
}

impl From<StateId> for GraphState {
    fn from(id: StateId) -> Self {
        // shift the 14 bit field to the top of an i16 and back down to sign
        // extend it
        let unpack = |bits: u32| ((((bits & COORD_MASK) as u16) << 2) as i16) >> 2;
        GraphState {
            x: unpack(id.0 >> THETA_BITS),
            y: unpack(id.0 >> (THETA_BITS + COORD_BITS)),
            theta: (id.0 & THETA_MASK) as u8,
        }
    }
}

impl Display for GraphState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.theta)
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", GraphState::from(*self))
    }
}

/// A continuous pose: millimetres and radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContinuousState {
    pub x_mm: f64,
    pub y_mm: f64,
    pub theta: f64,
}

impl ContinuousState {
    pub fn new(x_mm: f64, y_mm: f64, theta: f64) -> Self {
        Self { x_mm, y_mm, theta }
    }

    pub fn distance_to(&self, x_mm: f64, y_mm: f64) -> f64 {
        (self.x_mm - x_mm).hypot(self.y_mm - y_mm)
    }

    pub fn is_finite(&self) -> bool {
        self.x_mm.is_finite() && self.y_mm.is_finite() && self.theta.is_finite()
    }
}

impl Display for ContinuousState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}mm, {:.3}mm, {:.4}rad)", self.x_mm, self.y_mm, self.theta)
    }
}

/// Wrap an angle into `(-pi, pi]`.
pub fn normalize_angle(theta: f64) -> f64 {
    let wrapped = (theta + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Heading of a bucket, in `(-pi, pi]`.
pub fn theta_of_bucket(theta: u8) -> f64 {
    normalize_angle(f64::from(theta) * ANGLE_STEP)
}

/// Nearest heading bucket of an angle.
pub fn bucket_of_theta(theta: f64) -> u8 {
    let steps = (theta / ANGLE_STEP).round() as i64;
    steps.rem_euclid(i64::from(NUM_ANGLES)) as u8
}
