//! Layout and widgets shared by the scene renderers.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Areas of the in-game screen.
pub struct FieldLayout {
    /// One-line HUD across the top.
    pub hud: Rect,
    /// Play field, scaled from world units.
    pub field: Rect,
    /// One-line footer: crash notice or key hints.
    pub footer: Rect,
}

/// Bordered screen split into HUD, play field and footer:
/// ```text
/// ┌ Skyflap ─────────────────────────────────┐
/// │ Score 3  Level 1  Coins 4/10  Pipes 3    │
/// │                                          │
/// │   [play field]                           │
/// │                                          │
/// │        [Space/Up] Jump  [Esc] Quit       │
/// └──────────────────────────────────────────┘
/// ```
pub fn field_layout(frame: &mut Frame, area: Rect, border_color: Color) -> FieldLayout {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Skyflap ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    FieldLayout {
        hud: rows[0],
        field: rows[1],
        footer: rows[2],
    }
}

pub fn controls_line(controls: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in controls.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key.to_string(), Style::default().fg(Color::White)));
        spans.push(Span::styled(
            format!(" {}", action),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// `Label value` pairs on one line, values bold in their own color.
pub fn hud_line(stats: &[(&str, String, Color)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (label, value, color) in stats {
        spans.push(Span::styled(
            format!("{} ", label),
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::styled(
            format!("{}  ", value),
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

/// Bordered full-screen card with centered lines, used by the menu and the
/// game-over screen.
pub fn render_card(frame: &mut Frame, area: Rect, border_color: Color, lines: Vec<Line<'_>>) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content_height = lines.len() as u16;
    let y_offset = inner.y + inner.height.saturating_sub(content_height) / 2;
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        Rect::new(
            inner.x,
            y_offset,
            inner.width,
            content_height.min(inner.height),
        ),
    );
}

/// Color for text at the given opacity. Terminals have no alpha channel, so
/// fades step down through greys.
pub fn faded(alpha: f64) -> Option<Color> {
    if alpha > 0.66 {
        Some(Color::White)
    } else if alpha > 0.33 {
        Some(Color::Gray)
    } else if alpha > 0.0 {
        Some(Color::DarkGray)
    } else {
        None
    }
}
