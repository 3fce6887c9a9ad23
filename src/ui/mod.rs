//! Terminal rendering. Scenes hold no drawing code; this module reads them.

pub mod flappy_scene;
pub mod game_common;
pub mod menu_scene;

use crate::scenes::{ActiveScene, SceneManager};
use ratatui::Frame;

/// Draw whichever scene is active.
pub fn draw(frame: &mut Frame, manager: &SceneManager) {
    let area = frame.size();
    let ctx = manager.context();
    match manager.active() {
        ActiveScene::MainMenu(scene) => menu_scene::render_main_menu(frame, area, scene),
        ActiveScene::Game(scene) => {
            flappy_scene::render_game(frame, area, scene, &ctx.state, &ctx.config)
        }
        ActiveScene::GameOver(scene) => menu_scene::render_game_over(frame, area, scene),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::input::FrameInput;
    use crate::scenes::GameContext;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draws_every_scene() {
        let mut manager = SceneManager::new(GameContext::with_seed(GameConfig::default(), 9));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|f| draw(f, &manager)).unwrap();
        assert!(screen_text(&terminal).contains("Main Menu"));

        manager.update(Duration::from_millis(16), &FrameInput::pointer());
        terminal.draw(|f| draw(f, &manager)).unwrap();
        assert!(screen_text(&terminal).contains("Score 0"));
    }
}
