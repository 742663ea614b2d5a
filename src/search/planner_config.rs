use crate::error::XythetaError;
use serde::{Deserialize, Serialize};

/// Configuration for the [`crate::search::XythetaPlanner`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PlannerConfig {
    /// How far along an old plan the robot may keep driving when deciding
    /// whether that plan can be reused.
    pub max_distance_to_reuse_mm: f64,
    /// Rotating in place on the goal cell costs nothing.
    pub free_turn_in_place_at_goal: bool,
    /// Upper bound on the length of a plan walked back from the goal. Hitting
    /// it means the backpointers form a cycle.
    pub max_backtrack_steps: usize,
    /// Log search progress every this many expansions, 0 to disable.
    pub log_interval_expansions: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_distance_to_reuse_mm: 60.0,
            free_turn_in_place_at_goal: false,
            max_backtrack_steps: 10_000,
            log_interval_expansions: 10_000,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), XythetaError> {
        if !(self.max_distance_to_reuse_mm >= 0.0) {
            return Err(XythetaError::InvalidParameter(format!(
                "max distance to reuse must not be negative, got {}",
                self.max_distance_to_reuse_mm
            )));
        }
        if self.max_backtrack_steps == 0 {
            return Err(XythetaError::InvalidParameter(
                "max backtrack steps must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_free_turn_in_place_at_goal(self, allow: bool) -> Self {
        Self {
            free_turn_in_place_at_goal: allow,
            ..self
        }
    }
}
