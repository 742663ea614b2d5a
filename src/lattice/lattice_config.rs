use crate::error::XythetaError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RobotParams {
    pub max_velocity_mmps: f64,
    /// Must not exceed the forward velocity, otherwise reversing would be
    /// cheaper than the heuristic assumes.
    pub max_reverse_velocity_mmps: f64,
    pub half_wheel_base_mm: f64,
}

impl Default for RobotParams {
    fn default() -> Self {
        Self {
            max_velocity_mmps: 60.0,
            max_reverse_velocity_mmps: 25.0,
            half_wheel_base_mm: 24.0,
        }
    }
}

impl RobotParams {
    pub fn validate(&self) -> Result<(), XythetaError> {
        if !(self.max_velocity_mmps > 0.0) {
            return Err(XythetaError::InvalidParameter(format!(
                "max velocity must be positive, got {}",
                self.max_velocity_mmps
            )));
        }
        if !(self.max_reverse_velocity_mmps > 0.0)
            || self.max_reverse_velocity_mmps > self.max_velocity_mmps
        {
            return Err(XythetaError::InvalidParameter(format!(
                "max reverse velocity must be in (0, {}], got {}",
                self.max_velocity_mmps, self.max_reverse_velocity_mmps
            )));
        }
        if !(self.half_wheel_base_mm >= 0.0) {
            return Err(XythetaError::InvalidParameter(format!(
                "half wheel base must not be negative, got {}",
                self.half_wheel_base_mm
            )));
        }
        Ok(())
    }
}

/// Geometry of the lattice and the robot driving on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LatticeConfig {
    pub resolution_mm: f64,
    pub robot: RobotParams,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            resolution_mm: 10.0,
            robot: RobotParams::default(),
        }
    }
}

impl LatticeConfig {
    pub fn validate(&self) -> Result<(), XythetaError> {
        if !(self.resolution_mm > 0.0) {
            return Err(XythetaError::InvalidParameter(format!(
                "resolution must be positive, got {}",
                self.resolution_mm
            )));
        }
        self.robot.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LatticeConfig::default().validate().is_ok());
    }

    #[test]
    fn fast_reverse_is_rejected() {
        let robot = RobotParams {
            max_reverse_velocity_mmps: 100.0,
            ..RobotParams::default()
        };
        assert!(robot.validate().is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: LatticeConfig = toml::from_str(
            r#"
            resolution-mm = 5.0
            [robot]
            max-velocity-mmps = 80.0
            "#,
        )
        .unwrap();
        assert_eq!(config.resolution_mm, 5.0);
        assert_eq!(config.robot.max_velocity_mmps, 80.0);
        assert_eq!(
            config.robot.half_wheel_base_mm,
            RobotParams::default().half_wheel_base_mm
        );
    }
}
