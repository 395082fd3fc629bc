//! Open-loop estimate of heading and position.
//!
//! The estimator never sees ground truth. It replays the controller's own turn
//! commands with a fixed rotation and stride per tick, so it drifts from the
//! real trajectory and is only good enough to tell roughly where home is.

use std::ops::{Add, Mul, Neg};

/// Planar vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const UNIT_X: Self = Self { x: 1.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3-D cross product.
    #[must_use]
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Unit vector in the same direction, `None` for zero or non-finite length.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let norm = self.norm();
        if norm > 0.0 && norm.is_finite() {
            Some(self * (1.0 / norm))
        } else {
            None
        }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Signed angle from `a` to `b` in `(-π, π]`, positive counter-clockwise.
///
/// Returns 0 when either vector has zero length.
#[must_use]
pub fn signed_angle(a: Vec2, b: Vec2) -> f64 {
    let (Some(a), Some(b)) = (a.normalized(), b.normalized()) else {
        return 0.0;
    };
    a.cross(b).atan2(a.dot(b))
}

/// Rotates `v` counter-clockwise by `angle` radians.
#[must_use]
pub fn rotate_vector(angle: f64, v: Vec2) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}

/// Direction of a commanded turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    /// Sign of the heading change: left is counter-clockwise.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// Heading and position integrated from issued turn commands.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadReckoning {
    heading: Vec2,
    position: Vec2,
    heading_change_per_step: f64,
    position_change_per_step: f64,
}

impl DeadReckoning {
    /// Starts at the origin facing +x.
    #[must_use]
    pub fn new(heading_change_per_step: f64, position_change_per_step: f64) -> Self {
        Self {
            heading: Vec2::UNIT_X,
            position: Vec2::ZERO,
            heading_change_per_step,
            position_change_per_step,
        }
    }

    #[must_use]
    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn distance_from_origin(&self) -> f64 {
        self.position.norm()
    }

    /// Signed angle from the current heading to the direction of the origin.
    #[must_use]
    pub fn bearing_to_origin(&self) -> f64 {
        signed_angle(self.heading, -self.position)
    }

    /// Overrides the estimate, e.g. to resume from a known pose.
    pub fn place(&mut self, heading: Vec2, position: Vec2) {
        self.heading = heading.normalized().unwrap_or(Vec2::UNIT_X);
        self.position = position;
    }

    /// Rotates the heading one step towards `turn`, then advances one stride.
    pub fn record_turn(&mut self, turn: Turn) {
        let heading = rotate_vector(turn.sign() * self.heading_change_per_step, self.heading);
        debug_assert!(
            heading.x.is_finite() && heading.y.is_finite(),
            "Non-finite heading after {turn:?}"
        );
        // Rotation rounding accumulates over long runs.
        self.heading = heading.normalized().unwrap_or(self.heading);
        self.position = self.position + self.heading * self.position_change_per_step;
    }

    pub fn reset(&mut self) {
        self.heading = Vec2::UNIT_X;
        self.position = Vec2::ZERO;
    }
}
