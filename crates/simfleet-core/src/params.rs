//! Simulation parameters and validation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Position assigned to one robot, sliced from the flat position vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Recognized launch options.
///
/// The CLI accepts a free-form `key=value` bag; only the keys enumerated
/// here are meaningful. Unknown keys are ignored rather than rejected so
/// callers can pass through orchestration-level switches this core does
/// not interpret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimOptions {
    /// Launch robot visualization (RViz) alongside each robot.
    pub rviz: bool,

    /// Exploration strategy for the exploration service. `None` selects
    /// the default strategy at topology-build time.
    pub explore_strategy: Option<String>,
}

impl SimOptions {
    /// Build options from a `key=value` bag, ignoring unknown keys.
    ///
    /// Recognized keys:
    /// - `rviz`: boolean-like (`true`/`1`/`yes`/`on`, case-insensitive)
    /// - `explore`: strategy name passed through verbatim
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            match key {
                "rviz" => options.rviz = parse_boolish(value),
                "explore" => options.explore_strategy = Some(value.to_string()),
                _ => {}
            }
        }
        options
    }
}

/// Coerce a boolean-like option token.
fn parse_boolish(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Validated input for one simulation launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// World to simulate, e.g. `warehouse`.
    pub world: String,

    /// Number of robot services to spawn.
    pub robot_count: usize,

    /// Flat `x, y, z` sequence, three values per robot.
    pub positions: Vec<f64>,

    /// Recognized launch options.
    pub options: SimOptions,
}

impl SimParams {
    pub fn new(
        world: impl Into<String>,
        robot_count: usize,
        positions: Vec<f64>,
        options: SimOptions,
    ) -> Self {
        Self {
            world: world.into(),
            robot_count,
            positions,
            options,
        }
    }

    /// Check structural consistency. Pure: no files are touched and no
    /// topology is built on failure.
    pub fn validate(&self) -> Result<()> {
        if self.world.is_empty() {
            return Err(Error::EmptyWorld);
        }
        let expected = self.robot_count * 3;
        if self.positions.len() != expected {
            return Err(Error::Validation {
                expected,
                actual: self.positions.len(),
                robots: self.robot_count,
            });
        }
        Ok(())
    }

    /// Pose of robot `i`. Caller must have validated; `i` must be below
    /// `robot_count`.
    pub fn pose(&self, i: usize) -> Pose {
        Pose {
            x: self.positions[3 * i],
            y: self.positions[3 * i + 1],
            z: self.positions[3 * i + 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_matching_positions() {
        let params = SimParams::new(
            "warehouse",
            2,
            vec![1.0, 2.0, 0.0, 3.0, 4.0, 0.0],
            SimOptions::default(),
        );
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_zero_robots() {
        let params = SimParams::new("warehouse", 0, vec![], SimOptions::default());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_count_mismatch() {
        let params = SimParams::new("warehouse", 2, vec![1.0, 2.0, 0.0], SimOptions::default());
        match params.validate() {
            Err(Error::Validation {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 6);
                assert_eq!(actual, 3);
            }
            other => panic!("expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_empty_world() {
        let params = SimParams::new("", 0, vec![], SimOptions::default());
        assert!(matches!(params.validate(), Err(Error::EmptyWorld)));
    }

    #[test]
    fn test_pose_slices_flat_sequence() {
        let params = SimParams::new(
            "warehouse",
            2,
            vec![1.0, 2.0, 0.0, 3.0, 4.0, 0.5],
            SimOptions::default(),
        );
        assert_eq!(
            params.pose(1),
            Pose {
                x: 3.0,
                y: 4.0,
                z: 0.5
            }
        );
    }

    #[test]
    fn test_options_from_pairs_ignores_unknown_keys() {
        let options = SimOptions::from_pairs(vec![
            ("rviz", "true"),
            ("gpu", "always"),
            ("explore", "random"),
        ]);
        assert!(options.rviz);
        assert_eq!(options.explore_strategy.as_deref(), Some("random"));
    }

    #[test]
    fn test_options_boolish_coercion() {
        for token in ["true", "1", "yes", "on", "TRUE", "On"] {
            assert!(SimOptions::from_pairs(vec![("rviz", token)]).rviz, "{token}");
        }
        for token in ["false", "0", "no", "off", ""] {
            assert!(!SimOptions::from_pairs(vec![("rviz", token)]).rviz, "{token:?}");
        }
    }
}
