//! Preprogrammed step library and the four gaits the policy chooses from.
//!
//! A gait is a per-leg swing window in oscillator phase. Outside the window
//! the leg is in stance with its tarsus adhering; inside it the leg lifts and
//! swings forward. Lengthening the swing window on one side slows that side's
//! stride relative to the other, which turns the body.

use std::f64::consts::{PI, TAU};

use crate::simulation::params::{
    BASE_SWING_END, JOINTS_PER_LEG, LIFT_GAIN, NEUTRAL_POSE, STRIDE_GAIN,
};

/// The six legs, in the order used for every per-leg array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    LF,
    LM,
    LH,
    RF,
    RM,
    RH,
}

/// Body side of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Leg {
    pub const ALL: [Leg; 6] = [Leg::LF, Leg::LM, Leg::LH, Leg::RF, Leg::RM, Leg::RH];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::LF | Self::LM | Self::LH => Side::Left,
            Self::RF | Self::RM | Self::RH => Side::Right,
        }
    }

    /// 0 = front, 1 = middle, 2 = hind.
    #[must_use]
    pub const fn segment(self) -> usize {
        self.index() % 3
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LF => "LF",
            Self::LM => "LM",
            Self::LH => "LH",
            Self::RF => "RF",
            Self::RM => "RM",
            Self::RH => "RH",
        }
    }
}

/// Which of the four gait parameterisations is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaitKind {
    Default,
    TurnLeft,
    TurnRight,
    Stop,
}

impl GaitKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "straight",
            Self::TurnLeft => "turn-left",
            Self::TurnRight => "turn-right",
            Self::Stop => "stop",
        }
    }
}

/// Per-leg swing windows plus the joint trajectories they index into.
#[derive(Debug, Clone, PartialEq)]
pub struct GaitParameters {
    /// `[start, end]` of the swing phase per leg, radians.
    pub swing_period: [[f64; 2]; 6],
}

impl Default for GaitParameters {
    fn default() -> Self {
        Self::baseline()
    }
}

impl GaitParameters {
    /// Baseline swing windows for straight walking.
    #[must_use]
    pub fn baseline() -> Self {
        let mut swing_period = [[0.0; 2]; 6];
        for leg in Leg::ALL {
            swing_period[leg.index()] = [0.0, BASE_SWING_END[leg.segment()]];
        }
        Self { swing_period }
    }

    /// All swing windows collapsed to zero length: no leg ever swings.
    #[must_use]
    pub fn stopped() -> Self {
        Self {
            swing_period: [[0.0; 2]; 6],
        }
    }

    /// Baseline with the given side's swing windows multiplied by `factor`
    /// and the opposite side's divided by it.
    #[must_use]
    pub fn turning(lengthened: Side, factor: f64) -> Self {
        let mut gait = Self::baseline();
        for leg in Leg::ALL {
            let scale = if leg.side() == lengthened {
                factor
            } else {
                factor.recip()
            };
            for bound in &mut gait.swing_period[leg.index()] {
                *bound *= scale;
            }
        }
        gait
    }

    /// Length of the leg's swing window, capped at a full cycle.
    #[must_use]
    pub fn swing_duration(&self, leg: Leg) -> f64 {
        let [start, end] = self.swing_period[leg.index()];
        (end - start).clamp(0.0, TAU)
    }

    /// Position within the step cycle as `(stride, lift)`.
    ///
    /// `stride` runs from -1 (rear) to 1 (front) during swing and back during
    /// stance; `lift` is a half-sine during swing and 0 in stance. `None`
    /// when the leg has no swing window.
    fn stride_profile(&self, leg: Leg, phase: f64) -> Option<(f64, f64)> {
        let duration = self.swing_duration(leg);
        if duration <= 0.0 {
            return None;
        }
        let start = self.swing_period[leg.index()][0];
        let rel = (phase - start).rem_euclid(TAU);
        if rel < duration {
            let s = rel / duration;
            Some((2.0 * s - 1.0, (PI * s).sin()))
        } else {
            let t = (rel - duration) / (TAU - duration);
            Some((1.0 - 2.0 * t, 0.0))
        }
    }

    /// Whether the leg is in its swing window at `phase`.
    #[must_use]
    pub fn in_swing(&self, leg: Leg, phase: f64) -> bool {
        let duration = self.swing_duration(leg);
        if duration <= 0.0 {
            return false;
        }
        let start = self.swing_period[leg.index()][0];
        (phase - start).rem_euclid(TAU) < duration
    }

    /// Tarsus adhesion: on during stance.
    #[must_use]
    pub fn adhesion_on(&self, leg: Leg, phase: f64) -> bool {
        !self.in_swing(leg, phase)
    }

    /// Neutral pose of a leg; roll and yaw are mirrored on the right side.
    #[must_use]
    pub fn neutral_pose(leg: Leg) -> [f64; JOINTS_PER_LEG] {
        let mut pose = NEUTRAL_POSE[leg.segment()];
        if leg.side() == Side::Right {
            for joint in [1, 2, 4] {
                pose[joint] = -pose[joint];
            }
        }
        pose
    }

    /// Joint angles of `leg` at oscillator `phase`, with the excursion from
    /// the neutral pose scaled by `magnitude`.
    #[must_use]
    pub fn joint_angles(&self, leg: Leg, phase: f64, magnitude: f64) -> [f64; JOINTS_PER_LEG] {
        let mut angles = Self::neutral_pose(leg);
        let Some((stride, lift)) = self.stride_profile(leg, phase) else {
            return angles;
        };
        let segment = leg.segment();
        for (joint, angle) in angles.iter_mut().enumerate() {
            let excursion =
                STRIDE_GAIN[segment][joint] * stride + LIFT_GAIN[segment][joint] * lift;
            *angle += magnitude * excursion;
        }
        angles
    }
}

/// The four gaits, built once from a turn intensity.
#[derive(Debug, Clone, PartialEq)]
pub struct GaitLibrary {
    default: GaitParameters,
    turn_left: GaitParameters,
    turn_right: GaitParameters,
    stop: GaitParameters,
}

impl GaitLibrary {
    /// Turning left lengthens the right legs' swing and shortens the left
    /// legs'; turning right is the mirror image.
    #[must_use]
    pub fn new(turn_intensity: f64) -> Self {
        Self {
            default: GaitParameters::baseline(),
            turn_left: GaitParameters::turning(Side::Right, turn_intensity),
            turn_right: GaitParameters::turning(Side::Left, turn_intensity),
            stop: GaitParameters::stopped(),
        }
    }

    #[must_use]
    pub fn get(&self, kind: GaitKind) -> &GaitParameters {
        match kind {
            GaitKind::Default => &self.default,
            GaitKind::TurnLeft => &self.turn_left,
            GaitKind::TurnRight => &self.turn_right,
            GaitKind::Stop => &self.stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_order_matches_index() {
        for (i, leg) in Leg::ALL.iter().enumerate() {
            assert_eq!(leg.index(), i);
        }
        assert_eq!(Leg::RH.segment(), 2);
        assert_eq!(Leg::LM.side(), Side::Left);
    }

    #[test]
    fn test_swing_profile_spans_rear_to_front() {
        let gait = GaitParameters::baseline();
        let duration = gait.swing_duration(Leg::LF);
        let start = gait.joint_angles(Leg::LF, 0.0, 1.0);
        let end = gait.joint_angles(Leg::LF, duration - 1e-9, 1.0);
        // Coxa swings forward during swing.
        assert!(end[0] > start[0]);
    }

    #[test]
    fn test_zero_magnitude_holds_neutral_pose() {
        let gait = GaitParameters::baseline();
        assert_eq!(
            gait.joint_angles(Leg::RM, 1.0, 0.0),
            GaitParameters::neutral_pose(Leg::RM)
        );
    }

    #[test]
    fn test_right_legs_mirror_roll() {
        let left = GaitParameters::neutral_pose(Leg::LF);
        let right = GaitParameters::neutral_pose(Leg::RF);
        assert_eq!(left[0], right[0]);
        assert_eq!(left[1], -right[1]);
    }
}
