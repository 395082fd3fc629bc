use std::f64::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::simulation::gait::GaitKind;
use crate::simulation::observation::{Observation, LEFT, RIGHT};
use crate::simulation::params::{
    ANTENNA_ANGLE, ANTENNA_DIST, ARENA_MARGIN, BACKGROUND_INTENSITY, EYE_FRONT_AZIMUTH,
    EYE_REAR_AZIMUTH, FLY_STEP_LENGTH, FLY_TURN_PER_STEP, HEADING_SLIP, ODOR_NOISE, ODOR_PEAK,
    ODOR_REACH_RADIUS, ODOR_SPREAD, PILLAR_COUNT, PILLAR_INTENSITY, PILLAR_RADIUS,
    VISION_CHANNELS, VISION_NOISE, VISION_RANGE,
};
use crate::simulation::vision::OmmatidiaLayout;

/// Random pillar positions tried before giving up on a crowded arena.
const MAX_PLACEMENT_ATTEMPTS: usize = 1_000;

/// Uniform sample from `[lo, hi)`, or the midpoint when the span is empty.
fn sample_span(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        (lo + hi) / 2.0
    }
}

/// Wraps an angle into `(-π, π]`.
fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// A single odor source with a Gaussian plume.
#[derive(Debug, Clone)]
pub struct OdorSource {
    pub x: f64,
    pub y: f64,
    pub peak: f64,
    pub spread: f64,
    /// Entering this radius sets `reached_odour`.
    pub reach_radius: f64,
}

/// A vertical cylinder the fly can see and cannot walk through.
#[derive(Debug, Clone)]
pub struct Pillar {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Pillar {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (x - self.x).hypot(y - self.y) <= self.radius
    }
}

/// True pose of the fly in arena coordinates. Heading is in radians,
/// counter-clockwise from +x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyBody {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

/// Toy host simulation: an odor plume, a few pillars and noisy sensors.
///
/// Stands in for the physics engine so the controller can run end to end. The
/// fly's motion is kinematic: each gait maps straight to a turn rate.
pub struct OdorArena {
    pub width: f64,
    pub height: f64,
    pub source: OdorSource,
    pub pillars: Vec<Pillar>,
    reached_odour: bool,
    rng: StdRng,
}

impl OdorArena {
    /// Creates an arena with a source in the far half and randomly placed
    /// pillars, both drawn from `seed`.
    ///
    /// Arenas too small for the placement margins get fewer pillars (possibly
    /// none) and a source at the centre of the allowed span.
    #[must_use]
    pub fn new(width: f64, height: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let source = OdorSource {
            x: sample_span(&mut rng, width / 2.0, width - ARENA_MARGIN).clamp(0.0, width),
            y: sample_span(&mut rng, ARENA_MARGIN, height - ARENA_MARGIN).clamp(0.0, height),
            peak: ODOR_PEAK,
            spread: ODOR_SPREAD,
            reach_radius: ODOR_REACH_RADIUS,
        };

        let start = Self::start_pose_for(height);
        let keep_out = ODOR_REACH_RADIUS + 2.0 * PILLAR_RADIUS;
        let mut pillars = Vec::with_capacity(PILLAR_COUNT);
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            if pillars.len() == PILLAR_COUNT {
                break;
            }
            let x = sample_span(&mut rng, ARENA_MARGIN, width - ARENA_MARGIN);
            let y = sample_span(&mut rng, ARENA_MARGIN, height - ARENA_MARGIN);
            let clear_of_source = (x - source.x).hypot(y - source.y) > keep_out;
            let clear_of_start = (x - start.x).hypot(y - start.y) > keep_out;
            if clear_of_source && clear_of_start {
                pillars.push(Pillar {
                    x,
                    y,
                    radius: PILLAR_RADIUS,
                });
            }
        }
        if pillars.len() < PILLAR_COUNT {
            warn!(
                width,
                height,
                placed = pillars.len(),
                wanted = PILLAR_COUNT,
                "arena too crowded for all pillars"
            );
        }

        Self::with_layout(width, height, source, pillars, rng)
    }

    /// Creates an arena from an explicit scene.
    #[must_use]
    pub fn with_layout(
        width: f64,
        height: f64,
        source: OdorSource,
        pillars: Vec<Pillar>,
        rng: StdRng,
    ) -> Self {
        Self {
            width,
            height,
            source,
            pillars,
            reached_odour: false,
            rng,
        }
    }

    fn start_pose_for(height: f64) -> FlyBody {
        FlyBody {
            x: ARENA_MARGIN,
            y: height / 2.0,
            heading: 0.0,
        }
    }

    /// Where the fly starts: near the left edge, facing +x.
    #[must_use]
    pub fn start_pose(&self) -> FlyBody {
        Self::start_pose_for(self.height)
    }

    /// Odor concentration at `(x, y)`, -1.0 outside the arena.
    #[must_use]
    pub fn concentration(&self, x: f64, y: f64) -> f64 {
        if x < 0.0 || x > self.width || y < 0.0 || y > self.height {
            return -1.0;
        }

        let d_x = x - self.source.x;
        let d_y = y - self.source.y;
        let dist_sq = d_x.powi(2) + d_y.powi(2);
        let sigma_sq = self.source.spread.powi(2).max(f64::EPSILON);

        // Gaussian: I * exp(-dist^2 / (2*sigma^2))
        (self.source.peak * (-dist_sq / (2.0 * sigma_sq)).exp()).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_blocked(&self, x: f64, y: f64) -> bool {
        self.pillars.iter().any(|pillar| pillar.contains(x, y))
    }

    /// Latched: stays true once the fly has been within the source's reach radius.
    #[must_use]
    pub fn reached_odour(&self) -> bool {
        self.reached_odour
    }

    /// Samples both antennae and both eyes at the fly's current pose.
    pub fn observe(&mut self, fly: &FlyBody, layout: &OmmatidiaLayout) -> Observation {
        if (fly.x - self.source.x).hypot(fly.y - self.source.y) < self.source.reach_radius {
            self.reached_odour = true;
        }

        let odor_left = self.sample_antenna(fly, ANTENNA_ANGLE);
        let odor_right = self.sample_antenna(fly, -ANTENNA_ANGLE);

        // (bearing relative to heading, angular half-width) of every visible pillar
        let visible: Vec<(f64, f64)> = self
            .pillars
            .iter()
            .filter_map(|pillar| {
                let d_x = pillar.x - fly.x;
                let d_y = pillar.y - fly.y;
                let dist = d_x.hypot(d_y);
                if dist > VISION_RANGE {
                    return None;
                }
                let bearing = wrap_angle(d_y.atan2(d_x) - fly.heading);
                let half_width = if dist <= pillar.radius {
                    PI
                } else {
                    (pillar.radius / dist).asin()
                };
                Some((bearing, half_width))
            })
            .collect();

        let vision = [
            self.render_eye(LEFT, &visible, layout),
            self.render_eye(RIGHT, &visible, layout),
        ];

        Observation {
            vision,
            odor_intensity: vec![[odor_left, odor_right]],
            reached_odour: self.reached_odour,
        }
    }

    fn sample_antenna(&mut self, fly: &FlyBody, offset: f64) -> f64 {
        let theta = fly.heading + offset;
        let x = fly.x + ANTENNA_DIST * theta.cos();
        let y = fly.y + ANTENNA_DIST * theta.sin();
        let clean = self.concentration(x, y);
        clean * (1.0 + self.rng.random_range(-ODOR_NOISE..ODOR_NOISE))
    }

    /// Azimuth seen by an ommatidium, positive to the fly's left.
    fn azimuth(eye: usize, normalized_x: f64) -> f64 {
        if eye == LEFT {
            EYE_REAR_AZIMUTH + (EYE_FRONT_AZIMUTH - EYE_REAR_AZIMUTH) * normalized_x
        } else {
            -(EYE_FRONT_AZIMUTH + (EYE_REAR_AZIMUTH - EYE_FRONT_AZIMUTH) * normalized_x)
        }
    }

    fn render_eye(
        &mut self,
        eye: usize,
        visible: &[(f64, f64)],
        layout: &OmmatidiaLayout,
    ) -> Vec<[f64; VISION_CHANNELS]> {
        (0..layout.coordinates().len())
            .map(|unit| {
                let azimuth = Self::azimuth(eye, layout.normalized_x(unit));
                let occluded = visible
                    .iter()
                    .any(|&(bearing, half)| wrap_angle(azimuth - bearing).abs() <= half);
                let base = if occluded {
                    PILLAR_INTENSITY
                } else {
                    BACKGROUND_INTENSITY
                };
                std::array::from_fn(|_| {
                    (base + self.rng.random_range(-VISION_NOISE..VISION_NOISE)).max(0.0)
                })
            })
            .collect()
    }

    /// Moves the fly one tick under `gait`. Stop holds still; a step into a
    /// pillar is cancelled; the fly never leaves the arena.
    pub fn advance(&mut self, fly: &mut FlyBody, gait: GaitKind) {
        let turn = match gait {
            GaitKind::Stop => return,
            GaitKind::Default => 0.0,
            GaitKind::TurnLeft => FLY_TURN_PER_STEP,
            GaitKind::TurnRight => -FLY_TURN_PER_STEP,
        };
        let slip = self.rng.random_range(-HEADING_SLIP..HEADING_SLIP);
        fly.heading = (fly.heading + turn + slip).rem_euclid(TAU);

        let x = (fly.x + FLY_STEP_LENGTH * fly.heading.cos()).clamp(0.0, self.width);
        let y = (fly.y + FLY_STEP_LENGTH * fly.heading.sin()).clamp(0.0, self.height);
        if !self.is_blocked(x, y) {
            fly.x = x;
            fly.y = y;
        }
    }
}
