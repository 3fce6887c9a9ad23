//! Final score screen. A click returns to the main menu.

use super::{GameContext, Scene, SceneData, SceneId, Transition};
use crate::core::GameStatus;
use crate::input::FrameInput;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GameOverScene {
    score: i64,
    status: GameStatus,
}

impl Default for GameOverScene {
    fn default() -> Self {
        Self::new()
    }
}

impl GameOverScene {
    pub fn new() -> Self {
        Self {
            score: 0,
            status: GameStatus::GameOver,
        }
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }
}

impl Scene for GameOverScene {
    fn id(&self) -> SceneId {
        SceneId::GameOver
    }

    fn on_enter(&mut self, ctx: &mut GameContext, data: &SceneData) {
        self.score = data.get_or("score", 0);
        self.status = ctx.state.status();
    }

    fn on_update(
        &mut self,
        _ctx: &mut GameContext,
        _dt: Duration,
        input: &FrameInput,
    ) -> Option<Transition> {
        input
            .pointer_down
            .then(|| Transition::to(SceneId::MainMenu))
    }

    fn on_exit(&mut self, _ctx: &mut GameContext) {}
}
