//! Errors raised while loading configuration and building the lattice. The
//! planner itself never fails with an error: expected outcomes such as "no
//! path" are reported through [`crate::search::ReplanResult`].

use crate::lattice::ActionId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XythetaError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("action type {0} is not defined")]
    UnknownActionType(ActionId),
    #[error("action type {0} is defined more than once")]
    DuplicateActionType(ActionId),
    #[error("action type '{name}' has extra cost factor {factor}, it must be at least 1")]
    CostFactorBelowOne { name: String, factor: f64 },
    #[error("heading {0} is out of range")]
    InvalidHeading(u8),
    #[error("primitive for action {action} from heading {theta} has non-positive cost {cost}")]
    NonPositiveCost { action: ActionId, theta: u8, cost: f64 },
    #[error(
        "primitive for action {action} from heading {theta} ends off the lattice at \
        ({x_mm:.4}, {y_mm:.4}, {end_theta:.4})"
    )]
    OffLattice {
        action: ActionId,
        theta: u8,
        x_mm: f64,
        y_mm: f64,
        end_theta: f64,
    },
    #[error("primitive for action {action} from heading {theta} is defined more than once")]
    DuplicatePrimitive { action: ActionId, theta: u8 },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl XythetaError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
