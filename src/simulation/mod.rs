pub mod config;
pub mod controller;
pub mod dead_reckoning;
pub mod environment;
pub mod error;
pub mod gait;
pub mod locomotion;
pub mod observation;
pub mod params;
pub mod vision;

pub use config::ControllerConfig;
pub use controller::{Action, NavigationController};
pub use error::{ConfigError, ControllerError};
pub use gait::GaitKind;
pub use observation::Observation;
