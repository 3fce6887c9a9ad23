//! Title screen. Shows progress from the shared state; a click starts a run.

use super::{GameContext, Scene, SceneData, SceneId, Transition};
use crate::core::GameState;
use crate::input::FrameInput;
use std::time::Duration;

/// Snapshot of the progress shown on the menu, taken on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuSummary {
    pub level: i64,
    pub coins: i64,
    pub coins_needed: i64,
    pub obstacles: i64,
}

impl MenuSummary {
    fn from_state(state: &GameState) -> Self {
        let level = state.current_level();
        Self {
            level,
            coins: state.total_coins(),
            coins_needed: GameState::min_coins_for_level(level),
            obstacles: GameState::rocks_for_level(level),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MainMenuScene {
    summary: MenuSummary,
}

impl MainMenuScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> MenuSummary {
        self.summary
    }
}

impl Scene for MainMenuScene {
    fn id(&self) -> SceneId {
        SceneId::MainMenu
    }

    fn on_enter(&mut self, ctx: &mut GameContext, _data: &SceneData) {
        self.summary = MenuSummary::from_state(&ctx.state);
        tracing::debug!(level = self.summary.level, coins = self.summary.coins, "main menu");
    }

    fn on_update(
        &mut self,
        ctx: &mut GameContext,
        _dt: Duration,
        input: &FrameInput,
    ) -> Option<Transition> {
        if input.reset_pressed {
            ctx.state.reset();
            self.summary = MenuSummary::from_state(&ctx.state);
            tracing::info!("progress reset");
        }
        if input.pointer_down {
            return Some(Transition::to(SceneId::Game));
        }
        None
    }

    fn on_exit(&mut self, _ctx: &mut GameContext) {}
}
