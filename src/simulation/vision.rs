//! Compound-eye obstacle summary.
//!
//! Each eye is reduced to three numbers: the mean field-of-view coordinate of
//! the ommatidia that look dark enough to be an object, and how many of them
//! there are. The per-ommatidium coordinates come from a fixed table that is
//! loaded once.

use crate::simulation::error::ControllerError;
use crate::simulation::observation::{OmmatidiumReading, LEFT, RIGHT};
use crate::simulation::params::{
    HEX_LAYOUT_RADIUS, OMMATIDIA_PER_EYE, VISUAL_FIELD_HEIGHT, VISUAL_FIELD_WIDTH,
};

/// Distance kept between the outermost lattice units and the field edges.
const LAYOUT_MARGIN: f64 = 8.0;

/// Field-of-view coordinate `[y, x]` of every ommatidium, indexed by unit id.
#[derive(Debug, Clone, PartialEq)]
pub struct OmmatidiaLayout {
    coordinates: Vec<[f64; 2]>,
}

impl OmmatidiaLayout {
    /// Wraps an externally supplied coordinate table.
    ///
    /// # Errors
    /// [`ControllerError::LayoutSize`] unless the table has exactly
    /// `OMMATIDIA_PER_EYE` entries.
    pub fn from_coordinates(coordinates: Vec<[f64; 2]>) -> Result<Self, ControllerError> {
        if coordinates.len() != OMMATIDIA_PER_EYE {
            return Err(ControllerError::LayoutSize {
                expected: OMMATIDIA_PER_EYE,
                actual: coordinates.len(),
            });
        }
        Ok(Self { coordinates })
    }

    /// Built-in table: a hexagonal lattice of radius 15 spread over the
    /// 450 × 512 field, rows top to bottom, units left to right.
    #[must_use]
    pub fn hexagonal() -> Self {
        let radius = HEX_LAYOUT_RADIUS;
        let r_f = f64::from(radius);
        let x_scale = (VISUAL_FIELD_WIDTH / 2.0 - LAYOUT_MARGIN) / (3.0_f64.sqrt() * r_f);
        let y_scale = (VISUAL_FIELD_HEIGHT / 2.0 - LAYOUT_MARGIN) / (1.5 * r_f);

        let mut coordinates = Vec::with_capacity(OMMATIDIA_PER_EYE);
        for r in -radius..=radius {
            let q_min = (-radius).max(-r - radius);
            let q_max = radius.min(-r + radius);
            for q in q_min..=q_max {
                let lattice_x = 3.0_f64.sqrt() * (f64::from(q) + f64::from(r) / 2.0);
                let lattice_y = 1.5 * f64::from(r);
                coordinates.push([
                    VISUAL_FIELD_HEIGHT / 2.0 + lattice_y * y_scale,
                    VISUAL_FIELD_WIDTH / 2.0 + lattice_x * x_scale,
                ]);
            }
        }
        Self { coordinates }
    }

    #[must_use]
    pub fn coordinates(&self) -> &[[f64; 2]] {
        &self.coordinates
    }

    /// Horizontal field coordinate of a unit, normalised to `[0, 1]`.
    #[must_use]
    pub fn normalized_x(&self, unit: usize) -> f64 {
        self.coordinates[unit][1] / VISUAL_FIELD_WIDTH
    }
}

impl Default for OmmatidiaLayout {
    fn default() -> Self {
        Self::hexagonal()
    }
}

/// Summary of one eye.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EyeFeatures {
    pub mean_y: f64,
    pub mean_x: f64,
    pub count: f64,
}

/// `[leftMeanY, leftMeanX, leftCount, rightMeanY, rightMeanX, rightCount]`,
/// normalised by 450, 512 and 721.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VisualFeatures(pub [f64; 6]);

impl VisualFeatures {
    /// Summary of `LEFT` or `RIGHT`; `None` for any other index.
    #[must_use]
    pub fn eye(&self, eye: usize) -> Option<EyeFeatures> {
        match self.0.get(eye * 3..eye * 3 + 3)? {
            &[mean_y, mean_x, count] => Some(EyeFeatures {
                mean_y,
                mean_x,
                count,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn left_count(&self) -> f64 {
        self.0[2]
    }

    #[must_use]
    pub fn right_count(&self) -> f64 {
        self.0[5]
    }
}

/// Reduces raw ommatidia readings to [`VisualFeatures`].
#[derive(Debug, Clone, Default)]
pub struct VisionFeatureExtractor {
    layout: OmmatidiaLayout,
}

impl VisionFeatureExtractor {
    #[must_use]
    pub fn new(layout: OmmatidiaLayout) -> Self {
        Self { layout }
    }

    #[must_use]
    pub fn layout(&self) -> &OmmatidiaLayout {
        &self.layout
    }

    /// Summarises both eyes.
    ///
    /// A unit is an object when its brightest channel is strictly below
    /// `object_threshold`. An eye with no object units yields `(0, 0, 0)`,
    /// which cannot be told apart from an object centred on the field origin.
    #[must_use]
    pub fn extract(
        &self,
        vision: &[Vec<OmmatidiumReading>; 2],
        object_threshold: f64,
    ) -> VisualFeatures {
        let left = self.summarize_eye(&vision[LEFT], object_threshold);
        let right = self.summarize_eye(&vision[RIGHT], object_threshold);
        VisualFeatures([
            left.mean_y,
            left.mean_x,
            left.count,
            right.mean_y,
            right.mean_x,
            right.count,
        ])
    }

    fn summarize_eye(&self, readings: &[OmmatidiumReading], object_threshold: f64) -> EyeFeatures {
        let mut sum_y = 0.0;
        let mut sum_x = 0.0;
        let mut count = 0_usize;

        for (reading, coordinate) in readings.iter().zip(&self.layout.coordinates) {
            let brightest = reading.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if brightest < object_threshold {
                sum_y += coordinate[0];
                sum_x += coordinate[1];
                count += 1;
            }
        }

        if count == 0 {
            return EyeFeatures::default();
        }

        let n = count as f64;
        EyeFeatures {
            mean_y: sum_y / n / VISUAL_FIELD_HEIGHT,
            mean_x: sum_x / n / VISUAL_FIELD_WIDTH,
            count: n / OMMATIDIA_PER_EYE as f64,
        }
    }
}
