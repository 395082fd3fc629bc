//! Error types for controller configuration and per-tick input validation.

use thiserror::Error;

/// Rejected configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("invalid configuration JSON: {0}")]
    Parse(String),
}

/// Errors surfaced by the navigation controller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    #[error("eye {eye} reports {actual} ommatidia, expected {expected}")]
    VisionShape {
        eye: usize,
        expected: usize,
        actual: usize,
    },

    #[error("odor intensity matrix has no channels")]
    MissingOdor,

    #[error("ommatidia coordinate table has {actual} entries, expected {expected}")]
    LayoutSize { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
