//! Per-tick sensory input supplied by the host simulation.

use crate::simulation::error::ControllerError;
use crate::simulation::params::{OMMATIDIA_PER_EYE, VISION_CHANNELS};

/// Channel intensities of a single ommatidium.
pub type OmmatidiumReading = [f64; VISION_CHANNELS];

/// Index of the left eye / left antenna.
pub const LEFT: usize = 0;
/// Index of the right eye / right antenna.
pub const RIGHT: usize = 1;

/// Everything the controller sees during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Readings per eye (`[left, right]`), one entry per ommatidium.
    pub vision: [Vec<OmmatidiumReading>; 2],
    /// One row per odor channel, columns are `[left, right]` antennae.
    pub odor_intensity: Vec<[f64; 2]>,
    /// Set by the host once the fly has entered the odor source region.
    pub reached_odour: bool,
}

impl Observation {
    /// An observation with uniformly bright vision and the given odor row.
    #[must_use]
    pub fn clear_view(odor_left: f64, odor_right: f64, reached_odour: bool) -> Self {
        let eye = vec![[1.0; VISION_CHANNELS]; OMMATIDIA_PER_EYE];
        Self {
            vision: [eye.clone(), eye],
            odor_intensity: vec![[odor_left, odor_right]],
            reached_odour,
        }
    }

    /// Odor reading of the first channel as `(left, right)`.
    ///
    /// Only meaningful after [`validate`](Self::validate) succeeded.
    #[must_use]
    pub fn primary_odor(&self) -> (f64, f64) {
        self.odor_intensity
            .first()
            .map_or((0.0, 0.0), |row| (row[LEFT], row[RIGHT]))
    }

    /// Checks the shapes the controller relies on.
    ///
    /// # Errors
    /// [`ControllerError::VisionShape`] when an eye does not report exactly
    /// `OMMATIDIA_PER_EYE` readings, [`ControllerError::MissingOdor`] when
    /// there is no odor channel.
    pub fn validate(&self) -> Result<(), ControllerError> {
        for (eye, readings) in self.vision.iter().enumerate() {
            if readings.len() != OMMATIDIA_PER_EYE {
                return Err(ControllerError::VisionShape {
                    eye,
                    expected: OMMATIDIA_PER_EYE,
                    actual: readings.len(),
                });
            }
        }
        if self.odor_intensity.is_empty() {
            return Err(ControllerError::MissingOdor);
        }
        Ok(())
    }
}
