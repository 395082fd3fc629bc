//! Simulation and controller hyperparameters.

use std::f64::consts::TAU;

// === Vision ===
/// Ommatidia per compound eye.
pub const OMMATIDIA_PER_EYE: usize = 721;
/// Intensity channels per ommatidium.
pub const VISION_CHANNELS: usize = 2;
/// Height of the visual field the coordinate table is expressed in.
pub const VISUAL_FIELD_HEIGHT: f64 = 450.0;
/// Width of the visual field the coordinate table is expressed in.
pub const VISUAL_FIELD_WIDTH: f64 = 512.0;
/// Hexagonal lattice radius of the built-in ommatidia layout (3·15·16 + 1 = 721).
pub const HEX_LAYOUT_RADIUS: i32 = 15;
/// Object threshold used when the extractor is called on its own.
pub const DEFAULT_OBJECT_THRESHOLD: f64 = 0.15;

// === Decision policy ===
/// Object threshold the policy passes to the extractor.
pub const POLICY_OBJECT_THRESHOLD: f64 = 0.06;
/// Normalised object count above which an eye triggers avoidance.
pub const OBJECT_COUNT_TRIGGER: f64 = 0.01;
/// Estimated distance from the start below which the fly stops.
pub const RETURN_RADIUS: f64 = 0.05;
/// Descending drive for the left and right legs.
pub const DEFAULT_COMMAND: [f64; 2] = [1.0, 1.0];
/// Swing-period scaling applied to the outer/inner legs when turning.
pub const TURN_INTENSITY: f64 = 1.5;

// === Dead reckoning ===
/// Heading rotation per turning tick (radians).
pub const HEADING_CHANGE_PER_STEP: f64 = 0.00044;
/// Distance advanced per turning tick.
pub const POSITION_CHANGE_PER_STEP: f64 = 0.01;

// === Oscillator network ===
pub const CPG_TIMESTEP: f64 = 1e-4;
pub const CPG_INTRINSIC_FREQ: f64 = 12.0; // Hz
pub const CPG_COUPLING_WEIGHT: f64 = 10.0;
pub const CPG_CONVERGENCE_COEF: f64 = 20.0;
/// Tripod phase offsets in leg order LF, LM, LH, RF, RM, RH.
pub const TRIPOD_PHASE_OFFSETS: [f64; 6] = [0.0, TAU / 2.0, 0.0, TAU / 2.0, 0.0, TAU / 2.0];

// === Preprogrammed steps ===
pub const JOINTS_PER_LEG: usize = 7;
/// Baseline swing window end (radians of phase) for front, middle and hind legs.
pub const BASE_SWING_END: [f64; 3] = [1.41, 1.36, 1.52];
/// Neutral joint angles (radians) for front, middle and hind legs, left side.
/// Order: Coxa, Coxa_roll, Coxa_yaw, Femur, Femur_roll, Tibia, Tarsus1.
pub const NEUTRAL_POSE: [[f64; JOINTS_PER_LEG]; 3] = [
    [0.30, 0.95, 0.05, -2.10, 0.55, 1.80, -0.60],
    [0.05, 1.80, 0.10, -1.90, 0.35, 1.95, -0.45],
    [0.10, 2.55, 0.20, -2.20, 0.30, 2.05, -0.50],
];
/// Joint excursion per unit of stride (fore/aft leg travel).
pub const STRIDE_GAIN: [[f64; JOINTS_PER_LEG]; 3] = [
    [0.35, 0.00, 0.00, 0.25, 0.00, -0.30, 0.10],
    [0.10, 0.20, 0.00, 0.20, 0.10, -0.25, 0.10],
    [0.05, 0.25, 0.00, 0.30, 0.05, -0.35, 0.15],
];
/// Joint excursion at the top of the swing lift.
pub const LIFT_GAIN: [[f64; JOINTS_PER_LEG]; 3] = [
    [0.00, 0.00, 0.00, -0.40, 0.00, 0.50, 0.20],
    [0.00, 0.00, 0.00, -0.35, 0.00, 0.45, 0.20],
    [0.00, 0.00, 0.00, -0.45, 0.00, 0.55, 0.20],
];

// === Arena ===
pub const ARENA_WIDTH: f64 = 100.0;
/// Adjusted for terminal aspect ratio
pub const ARENA_HEIGHT: f64 = 50.0;
/// Margin from the arena edges for source and pillar placement
pub const ARENA_MARGIN: f64 = 10.0;
pub const ODOR_PEAK: f64 = 1.0;
/// Plume spread (Gaussian sigma)
pub const ODOR_SPREAD: f64 = 30.0;
/// Distance from the source at which the host flags `reached_odour`
pub const ODOR_REACH_RADIUS: f64 = 3.0;
/// Relative multiplicative noise on each antenna reading
pub const ODOR_NOISE: f64 = 0.02;
pub const ANTENNA_DIST: f64 = 0.5;
/// Antenna stereo spread in radians (~28.6 degrees)
pub const ANTENNA_ANGLE: f64 = 0.5;
pub const PILLAR_COUNT: usize = 3;
pub const PILLAR_RADIUS: f64 = 2.0;
/// Pillars further than this are invisible
pub const VISION_RANGE: f64 = 12.0;
/// Azimuth covered by one eye, from just across the midline to behind the head
pub const EYE_FRONT_AZIMUTH: f64 = -0.17;
pub const EYE_REAR_AZIMUTH: f64 = 2.97;
pub const BACKGROUND_INTENSITY: f64 = 0.8;
pub const PILLAR_INTENSITY: f64 = 0.02;
pub const VISION_NOISE: f64 = 0.02;
/// True body motion per tick; matches the estimator so drift comes only from noise
pub const FLY_STEP_LENGTH: f64 = POSITION_CHANGE_PER_STEP;
pub const FLY_TURN_PER_STEP: f64 = HEADING_CHANGE_PER_STEP;
/// Uniform heading slip per tick (radians)
pub const HEADING_SLIP: f64 = 0.0002;
/// Control ticks simulated between two frames of the viewer
pub const TICKS_PER_FRAME: usize = 200;
