//! Tunable controller configuration.

use serde::{Deserialize, Serialize};

use crate::simulation::error::ConfigError;
use crate::simulation::params::{
    CPG_TIMESTEP, DEFAULT_COMMAND, HEADING_CHANGE_PER_STEP, OBJECT_COUNT_TRIGGER,
    POLICY_OBJECT_THRESHOLD, POSITION_CHANGE_PER_STEP, RETURN_RADIUS, TURN_INTENSITY,
};

/// Static configuration for a [`NavigationController`](crate::simulation::controller::NavigationController).
///
/// Missing JSON fields fall back to the defaults in `params`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Oscillator integration timestep in seconds.
    pub timestep: f64,
    /// Seed for the oscillator network's initial state.
    pub seed: u64,
    /// Swing-period scale factor applied when turning.
    pub turn_intensity: f64,
    /// Max channel intensity below which an ommatidium sees an object.
    pub object_threshold: f64,
    /// Normalised per-eye object count that triggers avoidance.
    pub object_count_trigger: f64,
    /// Dead-reckoning heading rotation per turning tick (radians).
    pub heading_change_per_step: f64,
    /// Dead-reckoning advance per turning tick.
    pub position_change_per_step: f64,
    /// Estimated distance from the start at which the fly stops.
    pub return_radius: f64,
    /// Left/right descending drive passed to the oscillator network.
    pub command: [f64; 2],
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            timestep: CPG_TIMESTEP,
            seed: 0,
            turn_intensity: TURN_INTENSITY,
            object_threshold: POLICY_OBJECT_THRESHOLD,
            object_count_trigger: OBJECT_COUNT_TRIGGER,
            heading_change_per_step: HEADING_CHANGE_PER_STEP,
            position_change_per_step: POSITION_CHANGE_PER_STEP,
            return_radius: RETURN_RADIUS,
            command: DEFAULT_COMMAND,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

impl ControllerConfig {
    /// Parses a configuration from JSON and validates it.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and the
    /// [`validate`](Self::validate) errors for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable by the controller.
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("timestep", self.timestep)?;
        positive("turn_intensity", self.turn_intensity)?;
        positive("heading_change_per_step", self.heading_change_per_step)?;
        positive("position_change_per_step", self.position_change_per_step)?;
        positive("return_radius", self.return_radius)?;
        finite("object_threshold", self.object_threshold)?;
        finite("object_count_trigger", self.object_count_trigger)?;
        finite("command[0]", self.command[0])?;
        finite("command[1]", self.command[1])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ControllerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ControllerConfig::from_json_str(r#"{ "turn_intensity": 2.5, "seed": 7 }"#)
            .unwrap();
        assert_eq!(config.turn_intensity, 2.5);
        assert_eq!(config.seed, 7);
        assert_eq!(config.return_radius, RETURN_RADIUS);
        assert_eq!(config.command, DEFAULT_COMMAND);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ControllerConfig {
            seed: 42,
            object_threshold: 0.1,
            ..ControllerConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ControllerConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_non_positive_turn_intensity() {
        let err = ControllerConfig::from_json_str(r#"{ "turn_intensity": 0.0 }"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotPositive {
                field: "turn_intensity",
                value: 0.0
            }
        );
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = ControllerConfig::from_json_str("{ timestep: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
