use crate::simulation::environment::OdorArena;
use rayon::prelude::*;

const CHARS: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
const PILLAR_CHAR: char = '#';

/// Rasterises the odor plume into `rows` lines of `cols` characters, pillars
/// drawn on top.
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn compute_field_grid(arena: &OdorArena, rows: usize, cols: usize) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let scale_y = arena.height / rows as f64;
    let scale_x = arena.width / cols as f64;

    // Rows are independent, rasterise them in parallel
    (0..rows)
        .into_par_iter()
        .map(|r| {
            let mut line = String::with_capacity(cols);
            for c in 0..cols {
                let world_y = r as f64 * scale_y;
                let world_x = c as f64 * scale_x;

                if arena.is_blocked(world_x, world_y) {
                    line.push(PILLAR_CHAR);
                    continue;
                }

                // Odor is faint far from the source; stretch the low end
                let val = arena.concentration(world_x, world_y).max(0.0).sqrt();
                let idx = (val * (CHARS.len() - 1) as f64).round() as usize;
                line.push(CHARS[idx.min(CHARS.len() - 1)]);
            }
            line
        })
        .collect()
}
