//! Actuation boundary: oscillator network plus gait evaluation.
//!
//! The controller only needs per-leg phases and magnitudes from a rhythm
//! generator. [`CpgNetwork`] is a plain reference implementation: six coupled
//! phase oscillators locked to a tripod pattern.
//!
//! ```text
//! dφᵢ/dt = 2π fᵢ + Σⱼ w rⱼ sin(φⱼ - φᵢ - bᵢⱼ)
//! drᵢ/dt = a (Rᵢ - rᵢ)
//! ```

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::gait::{GaitParameters, Leg, Side};
use crate::simulation::params::{
    CPG_CONVERGENCE_COEF, CPG_COUPLING_WEIGHT, CPG_INTRINSIC_FREQ, JOINTS_PER_LEG,
    TRIPOD_PHASE_OFFSETS,
};

/// Rhythm generator driving the legs, one oscillator per leg in [`Leg::ALL`] order.
pub trait OscillatorNetwork {
    /// Restores the initial state.
    fn reset(&mut self);

    /// Integrates one timestep with `[left, right]` descending drive.
    fn advance(&mut self, command: [f64; 2]);

    fn phases(&self) -> [f64; 6];

    fn magnitudes(&self) -> [f64; 6];
}

/// Joint targets and adhesion for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ActuatorCommand {
    /// `JOINTS_PER_LEG` angles per leg, legs in [`Leg::ALL`] order.
    pub joint_angles: Vec<f64>,
    pub adhesion: [bool; 6],
}

impl ActuatorCommand {
    #[must_use]
    pub fn leg_angles(&self, leg: Leg) -> &[f64] {
        let start = leg.index() * JOINTS_PER_LEG;
        &self.joint_angles[start..start + JOINTS_PER_LEG]
    }
}

/// Advances `network` one tick and evaluates `gait` at the new phases.
pub fn step_oscillator<N: OscillatorNetwork + ?Sized>(
    network: &mut N,
    gait: &GaitParameters,
    command: [f64; 2],
) -> ActuatorCommand {
    network.advance(command);
    let phases = network.phases();
    let magnitudes = network.magnitudes();

    let mut joint_angles = Vec::with_capacity(Leg::ALL.len() * JOINTS_PER_LEG);
    let mut adhesion = [true; 6];
    for leg in Leg::ALL {
        let i = leg.index();
        joint_angles.extend_from_slice(&gait.joint_angles(leg, phases[i], magnitudes[i]));
        adhesion[i] = gait.adhesion_on(leg, phases[i]);
    }

    ActuatorCommand {
        joint_angles,
        adhesion,
    }
}

/// Six phase oscillators with tripod coupling.
#[derive(Debug, Clone)]
pub struct CpgNetwork {
    timestep: f64,
    intrinsic_freqs: [f64; 6],
    intrinsic_amps: [f64; 6],
    phase_biases: [[f64; 6]; 6],
    init_phases: [f64; 6],
    init_magnitudes: [f64; 6],
    phases: [f64; 6],
    magnitudes: [f64; 6],
}

impl CpgNetwork {
    /// Builds a network whose initial phases and magnitudes are drawn from `seed`.
    #[must_use]
    pub fn new(timestep: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let init_phases: [f64; 6] = std::array::from_fn(|_| rng.random_range(0.0..TAU));
        let init_magnitudes: [f64; 6] = std::array::from_fn(|_| rng.random_range(0.0..1.0));

        let mut phase_biases = [[0.0; 6]; 6];
        for (i, row) in phase_biases.iter_mut().enumerate() {
            for (j, bias) in row.iter_mut().enumerate() {
                *bias = TRIPOD_PHASE_OFFSETS[j] - TRIPOD_PHASE_OFFSETS[i];
            }
        }

        Self {
            timestep,
            intrinsic_freqs: [CPG_INTRINSIC_FREQ; 6],
            intrinsic_amps: [1.0; 6],
            phase_biases,
            init_phases,
            init_magnitudes,
            phases: init_phases,
            magnitudes: init_magnitudes,
        }
    }

    #[must_use]
    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Left drive goes to the left legs, right drive to the right legs. A
    /// negative drive reverses the rhythm.
    fn apply_command(&mut self, command: [f64; 2]) {
        for leg in Leg::ALL {
            let drive = match leg.side() {
                Side::Left => command[0],
                Side::Right => command[1],
            };
            self.intrinsic_amps[leg.index()] = drive.abs();
            self.intrinsic_freqs[leg.index()] = CPG_INTRINSIC_FREQ.copysign(drive);
        }
    }
}

impl OscillatorNetwork for CpgNetwork {
    fn reset(&mut self) {
        self.phases = self.init_phases;
        self.magnitudes = self.init_magnitudes;
        self.intrinsic_freqs = [CPG_INTRINSIC_FREQ; 6];
        self.intrinsic_amps = [1.0; 6];
    }

    fn advance(&mut self, command: [f64; 2]) {
        self.apply_command(command);

        let mut d_phases = [0.0; 6];
        let mut d_magnitudes = [0.0; 6];
        for i in 0..6 {
            let coupling: f64 = (0..6)
                .filter(|&j| j != i)
                .map(|j| {
                    CPG_COUPLING_WEIGHT
                        * self.magnitudes[j]
                        * (self.phases[j] - self.phases[i] - self.phase_biases[i][j]).sin()
                })
                .sum();
            d_phases[i] = TAU * self.intrinsic_freqs[i] + coupling;
            d_magnitudes[i] = CPG_CONVERGENCE_COEF * (self.intrinsic_amps[i] - self.magnitudes[i]);
        }

        for i in 0..6 {
            self.phases[i] = (self.phases[i] + d_phases[i] * self.timestep).rem_euclid(TAU);
            self.magnitudes[i] += d_magnitudes[i] * self.timestep;
        }
    }

    fn phases(&self) -> [f64; 6] {
        self.phases
    }

    fn magnitudes(&self) -> [f64; 6] {
        self.magnitudes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::params::CPG_TIMESTEP;

    #[test]
    fn test_same_seed_same_trajectory() {
        let mut a = CpgNetwork::new(CPG_TIMESTEP, 3);
        let mut b = CpgNetwork::new(CPG_TIMESTEP, 3);
        for _ in 0..100 {
            a.advance([1.0, 1.0]);
            b.advance([1.0, 1.0]);
        }
        assert_eq!(a.phases(), b.phases());
        assert_eq!(a.magnitudes(), b.magnitudes());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut network = CpgNetwork::new(CPG_TIMESTEP, 11);
        let phases = network.phases();
        let magnitudes = network.magnitudes();
        for _ in 0..50 {
            network.advance([1.0, 0.5]);
        }
        network.reset();
        assert_eq!(network.phases(), phases);
        assert_eq!(network.magnitudes(), magnitudes);
    }

    #[test]
    fn test_magnitudes_converge_to_drive() {
        let mut network = CpgNetwork::new(CPG_TIMESTEP, 0);
        // 1 s of simulated time is many convergence time constants.
        for _ in 0..10_000 {
            network.advance([1.0, 0.5]);
        }
        let magnitudes = network.magnitudes();
        for leg in Leg::ALL {
            let target = if leg.side() == Side::Left { 1.0 } else { 0.5 };
            assert!((magnitudes[leg.index()] - target).abs() < 1e-3);
        }
    }

    #[test]
    fn test_step_emits_full_command() {
        let mut network = CpgNetwork::new(CPG_TIMESTEP, 0);
        let command = step_oscillator(&mut network, &GaitParameters::baseline(), [1.0, 1.0]);
        assert_eq!(command.joint_angles.len(), 6 * JOINTS_PER_LEG);
        assert_eq!(command.leg_angles(Leg::RH).len(), JOINTS_PER_LEG);
    }
}
