//! Configuration space obstacles. Obstacles are given already expanded by the
//! robot footprint, so collision checking only ever tests points.

use crate::error::XythetaError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Obstacles with at least this cost can not be driven through at all.
pub const MAX_OBSTACLE_COST: f64 = 1000.0;

/// Extra penalty for every intermediate pose of a reversing action that lies
/// inside a soft obstacle.
pub const REVERSE_OVER_OBSTACLE_COST: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box containing all points. An empty iterator gives an
    /// inverted box which intersects nothing.
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        points.into_iter().fold(
            Self {
                min_x: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                min_y: f64::INFINITY,
                max_y: f64::NEG_INFINITY,
            },
            |bounds, (x, y)| Self {
                min_x: bounds.min_x.min(x),
                max_x: bounds.max_x.max(x),
                min_y: bounds.min_y.min(y),
                max_y: bounds.max_y.max(y),
            },
        )
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            min_x: self.min_x + dx,
            max_x: self.max_x + dx,
            min_y: self.min_y + dy,
            max_y: self.max_y + dy,
        }
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.max_x < other.min_x
            || self.min_x > other.max_x
            || self.max_y < other.min_y
            || self.min_y > other.max_y)
    }
}

/// A rectangle with one side from `(x0, y0)` to `(x1, y1)`, extending `width`
/// to the left of that side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotatedRectangle {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub width: f64,
}

impl RotatedRectangle {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, width: f64) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            width,
        }
    }

    /// Axis aligned rectangle from its corners.
    pub fn axis_aligned(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(min_x, min_y, max_x, min_y, max_y - min_y)
    }

    fn length(&self) -> f64 {
        (self.x1 - self.x0).hypot(self.y1 - self.y0)
    }

    fn corners(&self) -> [(f64, f64); 4] {
        let length = self.length();
        let (ux, uy) = if length > 0.0 {
            ((self.x1 - self.x0) / length, (self.y1 - self.y0) / length)
        } else {
            (1.0, 0.0)
        };
        let (nx, ny) = (-uy * self.width, ux * self.width);
        [
            (self.x0, self.y0),
            (self.x1, self.y1),
            (self.x1 + nx, self.y1 + ny),
            (self.x0 + nx, self.y0 + ny),
        ]
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let length = self.length();
        if length <= 0.0 {
            return false;
        }
        let (ux, uy) = ((self.x1 - self.x0) / length, (self.y1 - self.y0) / length);
        let (dx, dy) = (x - self.x0, y - self.y0);
        let along = dx * ux + dy * uy;
        let across = dy * ux - dx * uy;
        (0.0..=length).contains(&along) && (0.0..=self.width).contains(&across)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.corners())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub shape: RotatedRectangle,
    #[serde(default = "Obstacle::fatal_cost")]
    pub cost: f64,
}

impl Obstacle {
    fn fatal_cost() -> f64 {
        MAX_OBSTACLE_COST
    }

    pub fn fatal(shape: RotatedRectangle) -> Self {
        Self {
            shape,
            cost: MAX_OBSTACLE_COST,
        }
    }

    pub fn soft(shape: RotatedRectangle, cost: f64) -> Self {
        Self { shape, cost }
    }

    pub fn is_fatal(&self) -> bool {
        self.cost >= MAX_OBSTACLE_COST
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.shape.contains(x, y)
    }

    /// Costs must be non-negative numbers, otherwise edge costs could shrink
    /// along a path. The shape must have finite coordinates.
    pub fn validate(&self) -> Result<(), XythetaError> {
        if !(self.cost >= 0.0) {
            return Err(XythetaError::InvalidParameter(format!(
                "obstacle cost must not be negative, got {}",
                self.cost
            )));
        }
        let shape = &self.shape;
        if ![shape.x0, shape.y0, shape.x1, shape.y1, shape.width]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(XythetaError::InvalidParameter(format!(
                "obstacle shape must be finite, got {:?}",
                shape
            )));
        }
        Ok(())
    }

    /// Parse a JSON list of obstacles. Obstacles without a cost are fatal.
    pub fn list_from_json(text: &str) -> Result<Vec<Obstacle>, XythetaError> {
        let obstacles: Vec<Obstacle> = serde_json::from_str(text)?;
        for obstacle in &obstacles {
            obstacle.validate()?;
        }
        Ok(obstacles)
    }

    pub fn list_from_path(path: &Path) -> Result<Vec<Obstacle>, XythetaError> {
        let text = std::fs::read_to_string(path).map_err(|e| XythetaError::io(path, e))?;
        Self::list_from_json(&text)
    }
}
