//! Integration test: scene cycle and per-frame game rules
//!
//! Drives the `SceneManager` the way the host loop does, one frame at a
//! time, and checks scoring, game over and the scene transitions.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use skyflap::input::HeldJumpFilter;
use skyflap::scenes::{ActiveScene, GameScene, ObstaclePair, SceneData};
use skyflap::{FrameInput, GameConfig, GameContext, GameStatus, SceneId, SceneManager};
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);

fn game_manager(seed: u64) -> SceneManager {
    SceneManager::starting_at(
        GameContext::with_seed(GameConfig::default(), seed),
        SceneId::Game,
        SceneData::new(),
    )
}

fn game_scene(manager: &mut SceneManager) -> &mut GameScene {
    match manager.active_mut() {
        ActiveScene::Game(scene) => &mut **scene,
        _ => panic!("expected the Game scene"),
    }
}

/// Hold the player mid-air so spawned pipes are the only threat.
fn hover(manager: &mut SceneManager) {
    let player = game_scene(manager).player_mut();
    player.y = 384.0;
    player.vy = 0.0;
}

/// Run frames until a transition happens or `limit` frames pass.
fn run_until_transition(manager: &mut SceneManager, limit: usize) -> Option<SceneId> {
    for _ in 0..limit {
        if let Some(t) = manager.update(FRAME, &FrameInput::default()) {
            return Some(t.to);
        }
    }
    None
}

// =============================================================================
// Scoring
// =============================================================================

#[test]
fn test_crossing_pair_scores_exactly_once() {
    let mut manager = game_manager(1);
    let config = manager.context().config.clone();

    let player_x = game_scene(&mut manager).player().x;
    game_scene(&mut manager)
        .obstacles_mut()
        .push(ObstaclePair::new(player_x + 2.0, 300.0, &config));
    assert!(game_scene(&mut manager).obstacles()[0].top_member().top <= 0.0);

    hover(&mut manager);
    manager.update(FRAME, &FrameInput::default());
    assert_eq!(manager.context().state.score(), 1);
    assert!(game_scene(&mut manager).obstacles()[0].scored);

    hover(&mut manager);
    manager.update(FRAME, &FrameInput::default());
    assert_eq!(manager.context().state.score(), 1);
    assert!(!game_scene(&mut manager).is_game_over());
}

#[test]
fn test_score_independent_of_frame_rate() {
    for frame_ms in [4u64, 16, 33, 50] {
        let mut manager = game_manager(2);
        let config = manager.context().config.clone();
        let player_x = game_scene(&mut manager).player().x;
        game_scene(&mut manager)
            .obstacles_mut()
            .push(ObstaclePair::new(player_x + 60.0, 300.0, &config));

        // 1s of play: the pair travels 200 units, well past the player
        let frames = 1000 / frame_ms;
        for _ in 0..frames {
            hover(&mut manager);
            manager.update(Duration::from_millis(frame_ms), &FrameInput::default());
        }
        assert_eq!(
            manager.context().state.score(),
            1,
            "frame interval {}ms",
            frame_ms
        );
    }
}

#[test]
fn test_pairs_removed_only_past_cull_line() {
    let mut manager = game_manager(3);
    let config = manager.context().config.clone();
    game_scene(&mut manager)
        .obstacles_mut()
        .push(ObstaclePair::new(-90.0, 300.0, &config));

    // 16ms at 200 units/s = 3.2 units per frame: -93.2, -96.4, -99.6, -102.8
    for expected_len in [1, 1, 1, 0] {
        hover(&mut manager);
        manager.update(FRAME, &FrameInput::default());
        assert_eq!(game_scene(&mut manager).obstacles().len(), expected_len);
    }
}

// =============================================================================
// Game over and the scene cycle
// =============================================================================

#[test]
fn test_falling_to_the_floor_ends_the_run() {
    let mut manager = game_manager(4);
    let mut frames = 0;
    while !game_scene(&mut manager).is_game_over() {
        manager.update(FRAME, &FrameInput::default());
        frames += 1;
        assert!(frames < 200, "player never hit the floor");
    }
    assert!(game_scene(&mut manager).player().tinted);
    assert_eq!(manager.context().state.status(), GameStatus::GameOver);
}

#[test]
fn test_ceiling_ends_the_run() {
    let mut manager = game_manager(5);
    game_scene(&mut manager).player_mut().y = 2.0;
    manager.update(FRAME, &FrameInput::jump());
    manager.update(FRAME, &FrameInput::default());
    assert!(game_scene(&mut manager).is_game_over());
}

#[test]
fn test_full_cycle_keeps_shared_state() {
    let mut manager = SceneManager::new(GameContext::with_seed(GameConfig::default(), 6));
    assert_eq!(manager.current(), SceneId::MainMenu);
    manager.context_mut().state.set_total_coins(4);

    manager.update(FRAME, &FrameInput::pointer());
    assert_eq!(manager.current(), SceneId::Game);

    // No input: the player drops to the floor, then the delayed switch fires
    assert_eq!(run_until_transition(&mut manager, 400), Some(SceneId::GameOver));
    let final_score = manager.context().state.score();
    match manager.active() {
        ActiveScene::GameOver(scene) => assert_eq!(scene.score(), final_score),
        _ => panic!("expected the GameOver scene"),
    }

    manager.update(FRAME, &FrameInput::pointer());
    assert_eq!(manager.current(), SceneId::MainMenu);
    assert_eq!(manager.context().state.total_coins(), 4);

    manager.update(FRAME, &FrameInput::pointer());
    assert_eq!(manager.current(), SceneId::Game);
    assert_eq!(manager.context().state.score(), 0);
    assert_eq!(manager.context().state.status(), GameStatus::Play);
}

#[test]
fn test_jumping_keeps_player_alive() {
    let mut manager = game_manager(7);
    // Flap whenever the player sinks below the middle; stop before the
    // first pipe arrives at the player
    for _ in 0..150 {
        let below_middle = game_scene(&mut manager).player().y > 384.0;
        let input = if below_middle {
            FrameInput::jump()
        } else {
            FrameInput::default()
        };
        manager.update(FRAME, &input);
    }
    assert!(!game_scene(&mut manager).is_game_over());
    assert_eq!(manager.current(), SceneId::Game);
}

// =============================================================================
// Held jump key
// =============================================================================

#[test]
fn test_held_space_without_release_events_jumps_once() {
    let mut manager = game_manager(8);
    let config = manager.context().config.clone();
    let mut filter = HeldJumpFilter::new(config.key_repeat_window());
    let start = Instant::now();

    // Legacy terminals deliver a held key as one plain press per repeat
    let mut jump_frames = 0;
    for frame in 0..5u32 {
        let mut input = FrameInput::default();
        input.apply(&Event::Key(KeyEvent::new(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
        )));
        filter.filter(&mut input, start + FRAME * frame);
        manager.update(FRAME, &input);
        if game_scene(&mut manager).player().vy == config.jump_velocity {
            jump_frames += 1;
        }
    }
    assert_eq!(jump_frames, 1);
}
