use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::simulation::gait::GaitKind;

/// Maps a world position to `(row, col)` of a `rows` × `cols` grid.
/// Positions on the far edges land one past the last cell.
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn world_to_grid_coords(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rows: usize,
    cols: usize,
) -> (usize, usize) {
    let r = (y / height * rows as f64).max(0.0) as usize;
    let c = (x / width * cols as f64).max(0.0) as usize;
    (r, c)
}

fn gait_color(gait: GaitKind) -> Color {
    match gait {
        GaitKind::Default => Color::White,
        GaitKind::TurnLeft => Color::Cyan,
        GaitKind::TurnRight => Color::Yellow,
        GaitKind::Stop => Color::Red,
    }
}

pub fn draw_ui(f: &mut Frame, grid_lines: Vec<String>, hud_info: &str, gait: GaitKind) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HUD
            Constraint::Min(0),    // Field
        ])
        .split(f.area());

    let hud = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", gait.label()),
            Style::default()
                .fg(Color::Black)
                .bg(gait_color(gait))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {hud_info}"),
            Style::default().add_modifier(Modifier::REVERSED),
        ),
    ]));
    f.render_widget(hud, chunks[0]);

    let text: Vec<Line> = grid_lines
        .into_iter()
        .map(|s| Line::from(Span::raw(s)))
        .collect();

    let field = Paragraph::new(text)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    f.render_widget(field, chunks[1]);
}
