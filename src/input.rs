//! Maps terminal events to per-frame input.
//!
//! The host loop drains every pending crossterm event once per frame into a
//! `FrameInput`. Jump is edge triggered: only a real key press counts, key
//! repeats from holding the key down do not. Terminals with the kitty
//! keyboard protocol tag repeats for us; everywhere else a held key arrives
//! as a stream of plain presses and [`HeldJumpFilter`] collapses it.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use std::time::{Duration, Instant};

/// Everything the scenes need to know about input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// A fresh press of the jump key happened this frame.
    pub jump_pressed: bool,
    /// A click / tap (or Enter) happened this frame.
    pub pointer_down: bool,
    /// `r` pressed: reset progress from the main menu.
    pub reset_pressed: bool,
    pub quit: bool,
}

impl FrameInput {
    pub fn jump() -> Self {
        Self {
            jump_pressed: true,
            ..Self::default()
        }
    }

    pub fn pointer() -> Self {
        Self {
            pointer_down: true,
            ..Self::default()
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    /// Fold one terminal event into this frame's input.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.apply_key(key),
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    self.pointer_down = true;
                }
            }
            _ => {}
        }
    }

    fn apply_key(&mut self, key: &KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Char(' ') | KeyCode::Up => self.jump_pressed = true,
            KeyCode::Enter => self.pointer_down = true,
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset_pressed = true,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => self.quit = true,
            _ => {}
        }
    }
}

/// Drops jump presses that are really auto-repeat of a held key.
///
/// Without key-release reporting, holding Space produces a press every
/// repeat interval (typically 30-50ms). A jump frame closer than `window`
/// to the previous jump frame is treated as the key still being down; the
/// key counts as released once a full window passes with no jump event.
#[derive(Debug, Clone)]
pub struct HeldJumpFilter {
    window: Duration,
    last_jump_event: Option<Instant>,
}

impl HeldJumpFilter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_jump_event: None,
        }
    }

    /// Apply to one frame's input collected up to `now`.
    pub fn filter(&mut self, input: &mut FrameInput, now: Instant) {
        if !input.jump_pressed {
            return;
        }
        let held = self
            .last_jump_event
            .is_some_and(|last| now.saturating_duration_since(last) < self.window);
        self.last_jump_event = Some(now);
        if held {
            input.jump_pressed = false;
        }
    }
}
