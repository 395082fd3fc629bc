use fly_nav_rust::simulation::params::{
    DEFAULT_OBJECT_THRESHOLD, OMMATIDIA_PER_EYE, VISUAL_FIELD_HEIGHT, VISUAL_FIELD_WIDTH,
};
use fly_nav_rust::simulation::vision::{OmmatidiaLayout, VisionFeatureExtractor};

const EPSILON: f64 = 1e-12;

fn bright_eye() -> Vec<[f64; 2]> {
    vec![[0.9, 0.7]; OMMATIDIA_PER_EYE]
}

#[test]
fn test_no_objects_yields_zero_triple() {
    let extractor = VisionFeatureExtractor::default();
    let features = extractor.extract(&[bright_eye(), bright_eye()], DEFAULT_OBJECT_THRESHOLD);
    assert_eq!(features.0, [0.0; 6]);
}

#[test]
fn test_object_requires_every_channel_below_threshold() {
    let extractor = VisionFeatureExtractor::default();
    let mut left = bright_eye();
    // One channel dark, the other bright: not an object.
    left[0] = [0.01, 0.5];
    // Both channels dark: object.
    left[1] = [0.01, 0.02];
    let features = extractor.extract(&[left, bright_eye()], DEFAULT_OBJECT_THRESHOLD);
    assert!((features.left_count() - 1.0 / OMMATIDIA_PER_EYE as f64).abs() < EPSILON);
    assert_eq!(features.right_count(), 0.0);
}

#[test]
fn test_threshold_is_strict() {
    let extractor = VisionFeatureExtractor::default();
    let eye = vec![[0.06, 0.06]; OMMATIDIA_PER_EYE];
    let features = extractor.extract(&[eye.clone(), eye], 0.06);
    assert_eq!(features.left_count(), 0.0);
    assert_eq!(features.right_count(), 0.0);
}

#[test]
fn test_mean_coordinates_are_normalised() {
    let mut table = vec![[0.0, 0.0]; OMMATIDIA_PER_EYE];
    table[10] = [100.0, 200.0];
    table[20] = [300.0, 400.0];
    let extractor = VisionFeatureExtractor::new(OmmatidiaLayout::from_coordinates(table).unwrap());

    let mut right = bright_eye();
    right[10] = [0.0, 0.0];
    right[20] = [0.0, 0.0];
    let features = extractor.extract(&[bright_eye(), right], DEFAULT_OBJECT_THRESHOLD);

    let eye = features.eye(1).unwrap();
    assert!((eye.mean_y - 200.0 / VISUAL_FIELD_HEIGHT).abs() < EPSILON);
    assert!((eye.mean_x - 300.0 / VISUAL_FIELD_WIDTH).abs() < EPSILON);
    assert!((eye.count - 2.0 / OMMATIDIA_PER_EYE as f64).abs() < EPSILON);
    assert_eq!(features.eye(0).unwrap().count, 0.0);
}

#[test]
fn test_fully_dark_eye_counts_every_unit() {
    let extractor = VisionFeatureExtractor::default();
    let dark = vec![[0.0, 0.0]; OMMATIDIA_PER_EYE];
    let features = extractor.extract(&[dark, bright_eye()], DEFAULT_OBJECT_THRESHOLD);
    assert!((features.left_count() - 1.0).abs() < EPSILON);
    // The built-in lattice is centred in the field.
    assert!((features.eye(0).unwrap().mean_y - 0.5).abs() < 1e-9);
    assert!((features.eye(0).unwrap().mean_x - 0.5).abs() < 1e-9);
}

#[test]
fn test_count_non_decreasing_in_threshold() {
    let extractor = VisionFeatureExtractor::default();
    let eye: Vec<[f64; 2]> = (0..OMMATIDIA_PER_EYE)
        .map(|i| {
            let v = (i % 37) as f64 / 100.0;
            [v, v * 0.5]
        })
        .collect();
    let vision = [eye.clone(), eye];

    let mut previous = 0.0;
    for step in 0..=40 {
        let threshold = f64::from(step) * 0.01;
        let count = extractor.extract(&vision, threshold).left_count();
        assert!(
            count >= previous,
            "count dropped from {previous} to {count} at threshold {threshold}"
        );
        previous = count;
    }
    assert!((previous - 1.0).abs() < EPSILON);
}
