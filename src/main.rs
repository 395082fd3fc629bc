#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::collapsible_if)]

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use fly_nav_rust::simulation::{
    environment::{FlyBody, OdorArena},
    params::{ARENA_HEIGHT, ARENA_WIDTH, TICKS_PER_FRAME},
    vision::OmmatidiaLayout,
    ControllerConfig, NavigationController,
};
use fly_nav_rust::ui::{
    field::compute_field_grid,
    render::{draw_ui, world_to_grid_coords},
};

const LOG_FILE: &str = "fly_nav.log";
const CONFIG_ENV: &str = "FLY_NAV_CONFIG";

/// The terminal belongs to the viewer, so logs go to a file.
///
/// Fails if `path` cannot be created or a global subscriber is already set.
fn init_tracing(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| io::Error::other(format!("tracing subscriber: {err}")))
}

fn load_config() -> Result<ControllerConfig, Box<dyn std::error::Error>> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)?;
            let config = ControllerConfig::from_json_str(&json)?;
            info!(%path, "loaded controller configuration");
            Ok(config)
        }
        Err(_) => Ok(ControllerConfig::default()),
    }
}

/// Everything one episode needs.
struct Episode {
    arena: OdorArena,
    layout: OmmatidiaLayout,
    controller: NavigationController,
    fly: FlyBody,
    done: bool,
}

impl Episode {
    fn step(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.done {
            return Ok(());
        }
        for _ in 0..TICKS_PER_FRAME {
            let observation = self.arena.observe(&self.fly, &self.layout);
            let action = self.controller.compute_action(&observation)?;
            self.arena.advance(&mut self.fly, action.gait);
            if self.controller.is_done(&observation) {
                self.done = true;
                break;
            }
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(Path::new(LOG_FILE))?;
    let config = load_config()?;

    let arena = OdorArena::new(ARENA_WIDTH, ARENA_HEIGHT, config.seed);
    let fly = arena.start_pose();
    let mut episode = Episode {
        arena,
        layout: OmmatidiaLayout::hexagonal(),
        controller: NavigationController::new(config)?,
        fly,
        done: false,
    };
    info!(
        source_x = episode.arena.source.x,
        source_y = episode.arena.source.y,
        pillars = episode.arena.pillars.len(),
        "episode start"
    );

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(50);
    let res = run_app(&mut terminal, &mut episode, tick_rate);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    episode: &mut Episode,
    tick_rate: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_tick = Instant::now();
    loop {
        // 1. Update
        if last_tick.elapsed() >= tick_rate {
            episode.step()?;
            last_tick = Instant::now();
        }

        // 2. Render
        terminal.draw(|f| {
            let area = f.area();
            let rows = area.height.saturating_sub(1) as usize; // -1 for HUD
            let cols = area.width as usize;
            let arena = &episode.arena;

            let mut grid = compute_field_grid(arena, rows, cols);

            let mut overlay = |x: f64, y: f64, glyph: &str| {
                let (r, c) = world_to_grid_coords(x, y, arena.width, arena.height, rows, cols);
                if let Some(line) = grid.get_mut(r) {
                    if c < line.len() {
                        line.replace_range(c..=c, glyph);
                    }
                }
            };

            overlay(arena.source.x, arena.source.y, "X");

            // Dead-reckoning estimate, anchored at the start pose
            let start = arena.start_pose();
            let estimate = episode.controller.estimator().position();
            let (sin, cos) = start.heading.sin_cos();
            overlay(
                start.x + cos * estimate.x - sin * estimate.y,
                start.y + sin * estimate.x + cos * estimate.y,
                "+",
            );

            overlay(episode.fly.x, episode.fly.y, "O");

            let odor_here = arena.concentration(episode.fly.x, episode.fly.y);
            let hud = format!(
                "Tick: {} | Odor: {:.3} | Reached: {} | Est: ({:.2}, {:.2}) | Done: {}",
                episode.controller.tick_count(),
                odor_here,
                arena.reached_odour(),
                estimate.x,
                estimate.y,
                episode.done,
            );

            draw_ui(f, grid, &hud, episode.controller.last_gait());
        })?;

        // 3. Input
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_tracing_init_is_reported() {
        let path = std::env::temp_dir().join("fly_nav_init_tracing_test.log");
        assert!(init_tracing(&path).is_ok());
        let err = init_tracing(&path).unwrap_err();
        assert!(err.to_string().contains("tracing subscriber"), "{err}");
        let _ = std::fs::remove_file(&path);
    }
}
