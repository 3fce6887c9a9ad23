//! Rendering for the Game scene: play field, HUD and flash overlay.

use super::game_common::{controls_line, faded, field_layout, hud_line};
use crate::config::GameConfig;
use crate::core::GameState;
use crate::scenes::{GameScene, Player};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render_game(
    frame: &mut Frame,
    area: Rect,
    scene: &GameScene,
    state: &GameState,
    config: &GameConfig,
) {
    let border = if scene.is_game_over() {
        Color::Red
    } else {
        Color::Cyan
    };
    let layout = field_layout(frame, area, border);

    frame.render_widget(Paragraph::new(hud(scene, state)), layout.hud);
    render_play_area(frame, layout.field, scene, config);
    render_flash(frame, layout.field, scene);
    render_footer(frame, layout.footer, scene);
}

fn hud(scene: &GameScene, state: &GameState) -> Line<'static> {
    let needed = GameState::min_coins_for_level(state.current_level());
    let coins = if needed > 0 {
        format!("{}/{}", state.total_coins(), needed)
    } else {
        state.total_coins().to_string()
    };
    hud_line(&[
        ("Score", state.score().to_string(), Color::White),
        ("Level", state.current_level().to_string(), Color::Cyan),
        ("Coins", coins, Color::Yellow),
        ("Pipes", scene.pipes_passed().to_string(), Color::Green),
    ])
}

/// Glyph for the player at its current tilt.
fn player_glyph(player: &Player) -> &'static str {
    if player.angle <= -15.0 {
        "▲"
    } else if player.angle >= 45.0 {
        "▼"
    } else {
        "►"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Sky,
    Pipe,
    Star,
    Player,
}

/// Sample the world at the center of each terminal cell.
fn rasterize(scene: &GameScene, config: &GameConfig, width: usize, height: usize) -> Vec<Vec<Cell>> {
    let x_scale = config.world_width / width as f64;
    let y_scale = config.world_height / height as f64;
    let to_col = |x: f64| (x / x_scale).floor() as i64;
    let to_row = |y: f64| (y / y_scale).floor() as i64;

    let mut grid = vec![vec![Cell::Sky; width]; height];

    for (row, line) in grid.iter_mut().enumerate() {
        let wy = (row as f64 + 0.5) * y_scale;
        for (col, cell) in line.iter_mut().enumerate() {
            let wx = (col as f64 + 0.5) * x_scale;
            let in_pipe = scene.obstacles().iter().any(|pair| {
                let member = if wy < pair.gap_top {
                    pair.top_member()
                } else {
                    pair.bottom_member()
                };
                wx >= member.left && wx < member.right() && wy >= member.top && wy < member.bottom()
            });
            if in_pipe {
                *cell = Cell::Pipe;
            }
        }
    }

    let mut place = |x: f64, y: f64, what: Cell| {
        let (col, row) = (to_col(x), to_row(y));
        if col >= 0 && row >= 0 && (col as usize) < width && (row as usize) < height {
            grid[row as usize][col as usize] = what;
        }
    };
    for star in scene.collectibles() {
        place(star.x, star.y, Cell::Star);
    }
    place(scene.player().x, scene.player().y, Cell::Player);

    grid
}

fn render_play_area(frame: &mut Frame, area: Rect, scene: &GameScene, config: &GameConfig) {
    let (width, height) = (area.width as usize, area.height as usize);
    if width == 0 || height == 0 {
        return;
    }

    let player_style = Style::default()
        .fg(if scene.player().tinted {
            Color::Red
        } else {
            Color::Yellow
        })
        .add_modifier(Modifier::BOLD);

    let lines: Vec<Line> = rasterize(scene, config, width, height)
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|cell| match cell {
                        Cell::Sky => Span::raw(" "),
                        Cell::Pipe => Span::styled("█", Style::default().fg(Color::Green)),
                        Cell::Star => Span::styled("✦", Style::default().fg(Color::Cyan)),
                        Cell::Player => Span::styled(player_glyph(scene.player()), player_style),
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_flash(frame: &mut Frame, area: Rect, scene: &GameScene) {
    let flash = scene.flash();
    if !flash.is_visible() || area.height == 0 {
        return;
    }
    let Some(color) = faded(flash.alpha()) else {
        return;
    };
    let row = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            flash.text().to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        row,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, scene: &GameScene) {
    let line = if scene.is_game_over() {
        Line::from(Span::styled(
            "CRASH!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else {
        controls_line(&[("[Space/Up]", "Jump"), ("[Esc]", "Quit")])
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
