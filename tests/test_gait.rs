use std::f64::consts::TAU;

use fly_nav_rust::simulation::gait::{GaitKind, GaitLibrary, GaitParameters, Leg, Side};
use fly_nav_rust::simulation::params::BASE_SWING_END;

const EPSILON: f64 = 1e-12;

#[test]
fn test_default_gait_is_baseline() {
    let library = GaitLibrary::new(1.5);
    assert_eq!(library.get(GaitKind::Default), &GaitParameters::baseline());
}

#[test]
fn test_turn_left_lengthens_right_swing() {
    let intensity = 2.5;
    let library = GaitLibrary::new(intensity);
    let gait = library.get(GaitKind::TurnLeft);
    for leg in Leg::ALL {
        let base = BASE_SWING_END[leg.segment()];
        let expected = match leg.side() {
            Side::Right => base * intensity,
            Side::Left => base / intensity,
        };
        assert!(
            (gait.swing_period[leg.index()][1] - expected).abs() < EPSILON,
            "{} swing end",
            leg.name()
        );
    }
}

#[test]
fn test_turns_are_mirror_images() {
    let library = GaitLibrary::new(1.5);
    let left = library.get(GaitKind::TurnLeft);
    let right = library.get(GaitKind::TurnRight);
    for (l, r) in [(Leg::LF, Leg::RF), (Leg::LM, Leg::RM), (Leg::LH, Leg::RH)] {
        assert_eq!(left.swing_period[l.index()], right.swing_period[r.index()]);
        assert_eq!(left.swing_period[r.index()], right.swing_period[l.index()]);
    }
}

#[test]
fn test_unit_intensity_turns_equal_baseline() {
    let library = GaitLibrary::new(1.0);
    assert_eq!(library.get(GaitKind::TurnLeft), &GaitParameters::baseline());
    assert_eq!(library.get(GaitKind::TurnRight), &GaitParameters::baseline());
}

#[test]
fn test_stop_gait_has_no_swing() {
    let library = GaitLibrary::new(1.5);
    let stop = library.get(GaitKind::Stop);
    for leg in Leg::ALL {
        assert_eq!(stop.swing_period[leg.index()], [0.0, 0.0]);
        assert_eq!(stop.swing_duration(leg), 0.0);
    }
}

#[test]
fn test_stop_gait_holds_neutral_pose_with_adhesion() {
    let stop = GaitParameters::stopped();
    for leg in Leg::ALL {
        for i in 0..16 {
            let phase = f64::from(i) * TAU / 16.0;
            assert!(stop.adhesion_on(leg, phase));
            assert_eq!(
                stop.joint_angles(leg, phase, 1.0),
                GaitParameters::neutral_pose(leg)
            );
        }
    }
}

#[test]
fn test_adhesion_off_only_during_swing() {
    let gait = GaitParameters::baseline();
    let swing_end = gait.swing_period[Leg::LF.index()][1];
    assert!(!gait.adhesion_on(Leg::LF, swing_end / 2.0));
    assert!(gait.adhesion_on(Leg::LF, swing_end + 0.1));
    // Phases wrap around the cycle.
    assert!(!gait.adhesion_on(Leg::LF, TAU + swing_end / 2.0));
}

#[test]
fn test_trajectory_is_periodic() {
    let gait = GaitParameters::baseline();
    for leg in Leg::ALL {
        let a = gait.joint_angles(leg, 2.0, 0.8);
        let b = gait.joint_angles(leg, 2.0 + TAU, 0.8);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-9);
        }
    }
}
