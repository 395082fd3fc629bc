use rand::rngs::StdRng;
use rand::SeedableRng;

use fly_nav_rust::simulation::environment::{OdorArena, OdorSource, Pillar};
use fly_nav_rust::ui::field::compute_field_grid;
use fly_nav_rust::ui::render::world_to_grid_coords;

fn arena_with_pillar() -> OdorArena {
    OdorArena::with_layout(
        100.0,
        50.0,
        OdorSource {
            x: 80.0,
            y: 30.0,
            peak: 1.0,
            spread: 30.0,
            reach_radius: 3.0,
        },
        vec![Pillar {
            x: 50.0,
            y: 25.0,
            radius: 2.0,
        }],
        StdRng::seed_from_u64(0),
    )
}

#[test]
fn test_field_grid_computation() {
    let arena = OdorArena::new(100.0, 50.0, 4);
    let rows = 10;
    let cols = 20;

    let grid = compute_field_grid(&arena, rows, cols);

    assert_eq!(grid.len(), rows);
    assert_eq!(grid[0].len(), cols);

    // Check that characters are valid ASCII
    for row in grid {
        for c in row.chars() {
            assert!(" .:-=+*#%@".contains(c));
        }
    }
}

#[test]
fn test_field_grid_marks_pillars() {
    let grid = compute_field_grid(&arena_with_pillar(), 10, 20);
    assert_eq!(grid[5].chars().nth(10), Some('#'));
}

#[test]
fn test_empty_grid() {
    assert!(compute_field_grid(&arena_with_pillar(), 0, 20).is_empty());
}

#[test]
fn test_world_to_grid_coords() {
    assert_eq!(world_to_grid_coords(50.0, 25.0, 100.0, 50.0, 10, 20), (5, 10));
    assert_eq!(world_to_grid_coords(0.0, 0.0, 100.0, 50.0, 10, 20), (0, 0));
    assert_eq!(world_to_grid_coords(-3.0, -1.0, 100.0, 50.0, 10, 20), (0, 0));
}
