use crate::{error::XythetaError, lattice::LatticeConfig, search::PlannerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything configurable, as read from one TOML file with a `[lattice]`
/// and a `[planner]` table. Missing tables and keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub lattice: LatticeConfig,
    pub planner: PlannerConfig,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, XythetaError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, XythetaError> {
        let text = std::fs::read_to_string(path).map_err(|e| XythetaError::io(path, e))?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), XythetaError> {
        self.lattice.validate()?;
        self.planner.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn reads_both_tables() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[lattice]
resolution-mm = 20.0

[lattice.robot]
max-velocity-mmps = 100.0

[planner]
max-distance-to-reuse-mm = 30.0
free-turn-in-place-at-goal = true
"#
        )
        .unwrap();

        let config = Config::from_path(file.path()).unwrap();
        assert_approx_eq!(config.lattice.resolution_mm, 20.0);
        assert_approx_eq!(config.lattice.robot.max_velocity_mmps, 100.0);
        assert_approx_eq!(config.lattice.robot.half_wheel_base_mm, 24.0);
        assert_approx_eq!(config.planner.max_distance_to_reuse_mm, 30.0);
        assert!(config.planner.free_turn_in_place_at_goal);
        assert_eq!(config.planner.max_backtrack_steps, 10_000);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let result = Config::from_toml("[lattice.robot]\nmax-reverse-velocity-mmps = 500.0\n");
        assert!(matches!(result, Err(XythetaError::InvalidParameter(_))));
        let result = Config::from_toml("[planner]\nmax-backtrack-steps = 0\n");
        assert!(matches!(result, Err(XythetaError::InvalidParameter(_))));
    }

    #[test]
    fn unknown_types_are_toml_errors() {
        let result = Config::from_toml("[planner]\nmax-distance-to-reuse-mm = \"far\"\n");
        assert!(matches!(result, Err(XythetaError::Toml(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_path(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(XythetaError::Io { .. })));
    }
}
