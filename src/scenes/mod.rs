//! Scene graph: MainMenu -> Game -> GameOver -> MainMenu.
//!
//! Each scene implements [`Scene`]. The [`SceneManager`] owns the active
//! scene and the shared [`GameContext`], runs `on_exit` / `on_enter` around
//! every transition and passes the transition payload along.

pub mod game;
pub mod game_over;
pub mod main_menu;

pub use game::{Collectible, GameScene, ObstaclePair, Phase, Player};
pub use game_over::GameOverScene;
pub use main_menu::MainMenuScene;

use crate::config::GameConfig;
use crate::core::GameState;
use crate::input::FrameInput;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::time::Duration;

/// Shared context handed to every scene. There is exactly one per game
/// session; scenes never build their own `GameState`.
#[derive(Debug, Clone)]
pub struct GameContext {
    pub state: GameState,
    pub config: GameConfig,
    pub rng: StdRng,
}

impl GameContext {
    pub fn new(config: GameConfig) -> Self {
        Self {
            state: GameState::new(),
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic context for replays and tests.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            state: GameState::new(),
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    MainMenu,
    Game,
    GameOver,
}

impl SceneId {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MainMenu => "MainMenu",
            Self::Game => "Game",
            Self::GameOver => "GameOver",
        }
    }
}

/// Transient key-value registry passed to a scene on entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneData {
    values: HashMap<String, i64>,
}

impl SceneData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: i64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    pub fn get_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).unwrap_or(default)
    }
}

/// Request to switch scenes, with the payload for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub to: SceneId,
    pub data: SceneData,
}

impl Transition {
    pub fn to(to: SceneId) -> Self {
        Self {
            to,
            data: SceneData::new(),
        }
    }

    pub fn with_data(to: SceneId, data: SceneData) -> Self {
        Self { to, data }
    }
}

/// Capability every scene provides to the manager.
pub trait Scene {
    fn id(&self) -> SceneId;

    /// Rebuild the scene's objects. Called on every entry.
    fn on_enter(&mut self, ctx: &mut GameContext, data: &SceneData);

    /// One frame. Returning a transition ends this scene.
    fn on_update(
        &mut self,
        ctx: &mut GameContext,
        dt: Duration,
        input: &FrameInput,
    ) -> Option<Transition>;

    /// Release everything the scene scheduled or allocated.
    fn on_exit(&mut self, ctx: &mut GameContext);
}

/// The scene currently owned by the manager.
#[derive(Debug)]
pub enum ActiveScene {
    MainMenu(MainMenuScene),
    Game(Box<GameScene>),
    GameOver(GameOverScene),
}

impl ActiveScene {
    fn build(id: SceneId, ctx: &GameContext) -> Self {
        match id {
            SceneId::MainMenu => Self::MainMenu(MainMenuScene::new()),
            SceneId::Game => Self::Game(Box::new(GameScene::new(&ctx.config))),
            SceneId::GameOver => Self::GameOver(GameOverScene::new()),
        }
    }

    pub fn as_scene(&self) -> &dyn Scene {
        match self {
            Self::MainMenu(s) => s,
            Self::Game(s) => &**s,
            Self::GameOver(s) => s,
        }
    }

    pub fn as_scene_mut(&mut self) -> &mut dyn Scene {
        match self {
            Self::MainMenu(s) => s,
            Self::Game(s) => &mut **s,
            Self::GameOver(s) => s,
        }
    }
}

/// Owns the active scene and the shared context; driven by the host loop.
#[derive(Debug)]
pub struct SceneManager {
    ctx: GameContext,
    active: ActiveScene,
}

impl SceneManager {
    /// Start at the main menu.
    pub fn new(ctx: GameContext) -> Self {
        Self::starting_at(ctx, SceneId::MainMenu, SceneData::new())
    }

    pub fn starting_at(mut ctx: GameContext, id: SceneId, data: SceneData) -> Self {
        let mut active = ActiveScene::build(id, &ctx);
        active.as_scene_mut().on_enter(&mut ctx, &data);
        tracing::info!(scene = id.name(), "entered scene");
        Self { ctx, active }
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    pub fn active(&self) -> &ActiveScene {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ActiveScene {
        &mut self.active
    }

    pub fn current(&self) -> SceneId {
        self.active.as_scene().id()
    }

    /// Run one frame and apply any transition it requested. Returns the
    /// transition that happened, if any.
    pub fn update(&mut self, dt: Duration, input: &FrameInput) -> Option<Transition> {
        let transition = self
            .active
            .as_scene_mut()
            .on_update(&mut self.ctx, dt, input)?;
        self.switch_to(transition.clone());
        Some(transition)
    }

    fn switch_to(&mut self, transition: Transition) {
        let from = self.current();
        self.active.as_scene_mut().on_exit(&mut self.ctx);
        self.active = ActiveScene::build(transition.to, &self.ctx);
        self.active
            .as_scene_mut()
            .on_enter(&mut self.ctx, &transition.data);
        tracing::info!(
            from = from.name(),
            to = transition.to.name(),
            "scene transition"
        );
    }

    /// Tear down the active scene before the host exits.
    pub fn shutdown(&mut self) {
        self.active.as_scene_mut().on_exit(&mut self.ctx);
    }
}
