//! Rendering for the MainMenu and GameOver scenes.

use super::game_common::{controls_line, render_card};
use crate::core::GameStatus;
use crate::scenes::{GameOverScene, MainMenuScene};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

const LOGO: [&str; 3] = [
    r" ___ _  ___   _____ _      _   ___ ",
    r"/ __| |/ | | | |  _| |    /_\ | _ \",
    r"\__ \ ' < \_, | |_ | |__ / _ \|  _/",
];

pub fn render_main_menu(frame: &mut Frame, area: Rect, scene: &MainMenuScene) {
    let summary = scene.summary();

    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(Color::Yellow))))
        .collect();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "Main Menu",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Level: ", Style::default().fg(Color::DarkGray)),
            Span::styled(summary.level.to_string(), Style::default().fg(Color::Cyan)),
            Span::raw("    "),
            Span::styled("Coins: ", Style::default().fg(Color::DarkGray)),
            Span::styled(summary.coins.to_string(), Style::default().fg(Color::Yellow)),
        ]),
    ]);
    if summary.coins_needed > 0 {
        lines.push(Line::from(Span::styled(
            format!(
                "Clear this level at {} coins ({} obstacles)",
                summary.coins_needed, summary.obstacles
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.extend([
        Line::from(""),
        controls_line(&[("[Click/Enter]", "Play"), ("[R]", "Reset"), ("[Esc]", "Quit")]),
    ]);

    render_card(frame, area, Color::Cyan, lines);
}

pub fn render_game_over(frame: &mut Frame, area: Rect, scene: &GameOverScene) {
    let (title, color) = match scene.status() {
        GameStatus::Won => ("Level Up!", Color::Green),
        _ => ("Game Over", Color::Red),
    };

    let lines = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Score: {}", scene.score()),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        controls_line(&[("[Click/Enter]", "Main Menu"), ("[Esc]", "Quit")]),
    ];

    render_card(frame, area, color, lines);
}
