use crate::error::XythetaError;
use serde::{Deserialize, Serialize};

/// Index of an action type. The same id means the same kind of motion from
/// every starting heading.
pub type ActionId = u8;

fn default_extra_cost_factor() -> f64 {
    1.0
}

/// A kind of motion (straight, arc, turn in place, ...) shared by the
/// primitives of every heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionType {
    pub index: ActionId,
    pub name: String,
    /// Multiplier on the time cost of every primitive of this type. Must be
    /// at least 1 so the distance heuristic stays admissible.
    #[serde(default = "default_extra_cost_factor")]
    pub extra_cost_factor: f64,
    #[serde(default)]
    pub reverse_action: bool,
}

impl ActionType {
    pub fn new(index: ActionId, name: &str, extra_cost_factor: f64) -> Self {
        Self {
            index,
            name: name.to_string(),
            extra_cost_factor,
            reverse_action: false,
        }
    }

    pub fn reversing(self) -> Self {
        Self {
            reverse_action: true,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), XythetaError> {
        if !(self.extra_cost_factor >= 1.0) {
            return Err(XythetaError::CostFactorBelowOne {
                name: self.name.clone(),
                factor: self.extra_cost_factor,
            });
        }
        Ok(())
    }
}
