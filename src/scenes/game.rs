//! The playable scene: player physics, scrolling obstacle pairs, bonus
//! stars, scoring and the game-over transition.

use super::{GameContext, Scene, SceneData, SceneId, Transition};
use crate::config::GameConfig;
use crate::core::{DialogCategory, GameStatus, TaskId, TaskList};
use crate::flash_text::FlashText;
use crate::input::FrameInput;
use crate::messages::{MessageBank, PendingMessages, PendingPoll};
use rand::Rng;
use std::time::Duration;

/// Axis-aligned box in world units, `y` growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Aabb {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Circle/box overlap via the closest point on the box.
    pub fn overlaps_circle(&self, cx: f64, cy: f64, radius: f64) -> bool {
        let nx = cx.clamp(self.left, self.right());
        let ny = cy.clamp(self.top, self.bottom());
        let (dx, dy) = (cx - nx, cy - ny);
        dx * dx + dy * dy < radius * radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    /// Vertical velocity, units/s (negative = up).
    pub vy: f64,
    /// Cosmetic rotation in degrees.
    pub angle: f64,
    /// Marked red once the run is over.
    pub tinted: bool,
}

impl Player {
    fn spawn(config: &GameConfig) -> Self {
        Self {
            x: config.player_start_x,
            y: config.player_start_y,
            vy: 0.0,
            angle: 0.0,
            tinted: false,
        }
    }
}

/// One top/bottom pipe pair sharing a horizontal position.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstaclePair {
    /// Horizontal center of both members.
    pub x: f64,
    /// Y where the gap begins (bottom edge of the top member).
    pub gap_top: f64,
    pub gap_height: f64,
    pub width: f64,
    /// Vertical extent of each member.
    pub length: f64,
    /// Horizontal velocity, units/s.
    pub velocity: f64,
    /// Set once the pair has been counted.
    pub scored: bool,
}

impl ObstaclePair {
    pub fn new(x: f64, gap_top: f64, config: &GameConfig) -> Self {
        Self {
            x,
            gap_top,
            gap_height: config.obstacle_gap,
            width: config.obstacle_width,
            length: config.obstacle_length,
            velocity: config.obstacle_velocity,
            scored: false,
        }
    }

    pub fn gap_bottom(&self) -> f64 {
        self.gap_top + self.gap_height
    }

    pub fn top_member(&self) -> Aabb {
        Aabb {
            left: self.x - self.width / 2.0,
            top: self.gap_top - self.length,
            width: self.width,
            height: self.length,
        }
    }

    pub fn bottom_member(&self) -> Aabb {
        Aabb {
            left: self.x - self.width / 2.0,
            top: self.gap_bottom(),
            width: self.width,
            height: self.length,
        }
    }

    fn hits(&self, player: &Player, radius: f64) -> bool {
        self.top_member().overlaps_circle(player.x, player.y, radius)
            || self.bottom_member().overlaps_circle(player.x, player.y, radius)
    }
}

/// A bonus star scrolling left at a fixed speed.
#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    pub radius: f64,
}

impl Collectible {
    fn touches(&self, player: &Player, player_radius: f64) -> bool {
        let (dx, dy) = (self.x - player.x, self.y - player.y);
        let reach = self.radius + player_radius;
        dx * dx + dy * dy < reach * reach
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameTask {
    SpawnObstacles,
    SpawnCollectible,
    ShowGameOver,
}

#[derive(Debug)]
pub struct GameScene {
    phase: Phase,
    player: Player,
    obstacles: Vec<ObstaclePair>,
    collectibles: Vec<Collectible>,
    flash: FlashText,
    tasks: TaskList<GameTask>,
    obstacle_timer: Option<TaskId>,
    collectible_timer: Option<TaskId>,
    messages: Option<PendingMessages>,
    pipes_passed: i64,
    leveled_up: bool,
}

impl GameScene {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: Phase::Playing,
            player: Player::spawn(config),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            flash: FlashText::new(config.flash_duration()),
            tasks: TaskList::new(),
            obstacle_timer: None,
            collectible_timer: None,
            messages: None,
            pipes_passed: 0,
            leveled_up: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn obstacles(&self) -> &[ObstaclePair] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut Vec<ObstaclePair> {
        &mut self.obstacles
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn collectibles_mut(&mut self) -> &mut Vec<Collectible> {
        &mut self.collectibles
    }

    pub fn flash(&self) -> &FlashText {
        &self.flash
    }

    pub fn pipes_passed(&self) -> i64 {
        self.pipes_passed
    }

    pub fn spawners_active(&self) -> bool {
        self.obstacle_timer
            .is_some_and(|id| self.tasks.is_pending(id))
            || self
                .collectible_timer
                .is_some_and(|id| self.tasks.is_pending(id))
    }

    /// Install a bank directly, skipping the background load.
    pub fn install_messages(&mut self, bank: MessageBank) {
        self.messages = None;
        self.flash.set_messages(bank);
    }

    fn poll_messages(&mut self) {
        let Some(pending) = &mut self.messages else {
            return;
        };
        match pending.poll() {
            PendingPoll::Waiting => {}
            PendingPoll::Ready(bank) => {
                tracing::debug!("flavor text loaded");
                self.flash.set_messages(bank);
                self.messages = None;
            }
            PendingPoll::Failed(reason) => {
                tracing::warn!(%reason, "flavor text unavailable, flashes disabled");
                self.messages = None;
            }
        }
    }

    fn flash_message(&mut self, ctx: &mut GameContext, category: DialogCategory) {
        ctx.state.set_dialog_category(category);
        self.flash.show(category, &mut ctx.rng);
    }

    /// Spawn a pipe pair at the right edge with a random gap.
    pub fn spawn_obstacle_pair(&mut self, ctx: &mut GameContext) {
        if self.is_game_over() {
            return;
        }
        let config = &ctx.config;
        let min = config.gap_min_top.round() as i64;
        let max = (config.gap_max_top().round() as i64).max(min);
        let gap_top = ctx.rng.gen_range(min..=max) as f64;
        self.obstacles
            .push(ObstaclePair::new(config.obstacle_spawn_x, gap_top, config));
    }

    /// Spawn a star at the right edge at a random height.
    pub fn spawn_collectible(&mut self, ctx: &mut GameContext) {
        if self.is_game_over() {
            return;
        }
        let config = &ctx.config;
        let min = config.collectible_min_y.round() as i64;
        let max = (config.collectible_max_y.round() as i64).max(min);
        let y = ctx.rng.gen_range(min..=max) as f64;
        self.collectibles.push(Collectible {
            x: config.obstacle_spawn_x,
            y,
            velocity: config.collectible_velocity,
            radius: config.collectible_radius,
        });
    }

    pub fn jump(&mut self, config: &GameConfig) {
        self.player.vy = config.jump_velocity;
    }

    /// Integrate gravity and velocities, keeping the player inside the world.
    pub fn advance_physics(&mut self, config: &GameConfig, dt: Duration) {
        let secs = dt.as_secs_f64();

        self.player.vy += config.gravity * secs;
        self.player.y += self.player.vy * secs;
        let floor = config.world_height - config.player_height;
        if self.player.y < 0.0 {
            self.player.y = 0.0;
            self.player.vy = 0.0;
        } else if self.player.y > floor {
            self.player.y = floor;
            self.player.vy = 0.0;
        }

        for pair in &mut self.obstacles {
            pair.x += pair.velocity * secs;
        }
        for star in &mut self.collectibles {
            star.x += star.velocity * secs;
        }
    }

    /// Tilt toward the dive angle while falling, toward the climb angle
    /// while rising. Cosmetic only.
    pub fn rotate_player(&mut self, config: &GameConfig) {
        let player = &mut self.player;
        if player.vy > 0.0 {
            if player.angle < config.max_fall_angle {
                player.angle = (player.angle + config.fall_rotation_rate).min(config.max_fall_angle);
            }
        } else if player.angle > config.max_rise_angle {
            player.angle = (player.angle - config.rise_rotation_rate).max(config.max_rise_angle);
        }
    }

    /// Count every unscored pair the player has passed, once. Returns the
    /// number of pairs counted.
    pub fn score_passed_obstacles(&mut self, ctx: &mut GameContext) -> i64 {
        let player_x = self.player.x;
        let mut counted = 0;
        for pair in &mut self.obstacles {
            if !pair.scored && pair.x < player_x {
                pair.scored = true;
                counted += 1;
            }
        }

        for _ in 0..counted {
            ctx.state.add_score(1);
            self.pipes_passed += 1;
            let every = ctx.config.neutral_flash_every;
            if every > 0 && self.pipes_passed % every == 0 {
                self.flash_message(ctx, DialogCategory::Neutral);
            }
        }
        counted
    }

    /// Drop pairs that have scrolled past the cull line.
    pub fn cull_obstacles(&mut self, config: &GameConfig) {
        let cull_x = config.obstacle_cull_x;
        self.obstacles.retain(|pair| pair.x >= cull_x);
    }

    /// Drop off-screen stars and collect the ones the player touches.
    /// Returns the number collected.
    pub fn update_collectibles(&mut self, ctx: &mut GameContext) -> usize {
        let cull_x = ctx.config.collectible_cull_x;
        let radius = ctx.config.player_radius;
        let player = &self.player;

        let before = self.collectibles.len();
        self.collectibles.retain(|star| star.x >= cull_x);

        let mut collected = 0;
        self.collectibles.retain(|star| {
            if star.touches(player, radius) {
                collected += 1;
                false
            } else {
                true
            }
        });
        tracing::trace!(
            culled = before - self.collectibles.len() - collected,
            collected,
            "stars updated"
        );

        for _ in 0..collected {
            self.collect_star(ctx);
        }
        collected
    }

    fn collect_star(&mut self, ctx: &mut GameContext) {
        let score = ctx.state.add_score(ctx.config.collectible_bonus);
        ctx.state.record_earn();
        if ctx.state.add_coins(1) {
            self.leveled_up = true;
            tracing::info!(level = ctx.state.current_level(), "level up");
        }
        tracing::debug!(score, "star collected");
        self.flash_message(ctx, DialogCategory::Positive);
    }

    /// True when the player touches the top or bottom of the world.
    pub fn out_of_bounds(&self, config: &GameConfig) -> bool {
        self.player.y <= 0.0 || self.player.y >= config.world_height - config.player_height
    }

    pub fn hits_obstacle(&self, config: &GameConfig) -> bool {
        self.obstacles
            .iter()
            .any(|pair| pair.hits(&self.player, config.player_radius))
    }

    fn hit_obstacle(&mut self, ctx: &mut GameContext) {
        ctx.state.record_loss();
        self.flash_message(ctx, DialogCategory::Negative);
        self.end_game(ctx);
    }

    /// Stop the run: cancel spawners, tint the player and schedule the
    /// switch to the GameOver scene.
    pub fn end_game(&mut self, ctx: &mut GameContext) {
        if self.is_game_over() {
            return;
        }
        self.phase = Phase::GameOver;
        for timer in [self.obstacle_timer.take(), self.collectible_timer.take()]
            .into_iter()
            .flatten()
        {
            self.tasks.cancel(timer);
        }
        self.player.tinted = true;
        ctx.state.set_status(if self.leveled_up {
            GameStatus::Won
        } else {
            GameStatus::GameOver
        });
        self.tasks
            .schedule_once(ctx.config.game_over_delay(), GameTask::ShowGameOver);
        tracing::info!(
            score = ctx.state.score(),
            pipes = self.pipes_passed,
            status = ?ctx.state.status(),
            "run ended"
        );
    }

    /// Simulation for one frame while playing.
    fn step(&mut self, ctx: &mut GameContext, dt: Duration, input: &FrameInput) {
        self.advance_physics(&ctx.config, dt);

        if self.hits_obstacle(&ctx.config) {
            self.hit_obstacle(ctx);
            return;
        }

        if input.jump_pressed {
            self.jump(&ctx.config);
        }
        self.rotate_player(&ctx.config);

        self.score_passed_obstacles(ctx);
        self.cull_obstacles(&ctx.config);
        self.update_collectibles(ctx);

        if self.out_of_bounds(&ctx.config) {
            self.end_game(ctx);
        }
    }
}

impl Scene for GameScene {
    fn id(&self) -> SceneId {
        SceneId::Game
    }

    fn on_enter(&mut self, ctx: &mut GameContext, _data: &SceneData) {
        *self = Self::new(&ctx.config);
        ctx.state.begin_run();

        self.obstacle_timer = Some(
            self.tasks
                .schedule_repeating(ctx.config.obstacle_spawn_interval(), GameTask::SpawnObstacles),
        );
        self.collectible_timer = Some(self.tasks.schedule_repeating(
            ctx.config.collectible_spawn_interval(),
            GameTask::SpawnCollectible,
        ));
        self.messages = Some(PendingMessages::spawn(ctx.config.messages.clone()));
    }

    fn on_update(
        &mut self,
        ctx: &mut GameContext,
        dt: Duration,
        input: &FrameInput,
    ) -> Option<Transition> {
        self.poll_messages();
        self.flash.tick(dt);

        for task in self.tasks.tick(dt) {
            match task {
                GameTask::SpawnObstacles => self.spawn_obstacle_pair(ctx),
                GameTask::SpawnCollectible => self.spawn_collectible(ctx),
                GameTask::ShowGameOver => {
                    return Some(Transition::with_data(
                        SceneId::GameOver,
                        SceneData::new().with("score", ctx.state.score()),
                    ));
                }
            }
        }

        if self.is_game_over() {
            return None;
        }
        self.step(ctx, dt, input);
        None
    }

    fn on_exit(&mut self, _ctx: &mut GameContext) {
        self.tasks.cancel_all();
        self.obstacle_timer = None;
        self.collectible_timer = None;
        self.messages = None;
        self.flash.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> GameContext {
        GameContext::with_seed(GameConfig::default(), 42)
    }

    fn entered(ctx: &mut GameContext) -> GameScene {
        let mut scene = GameScene::new(&ctx.config);
        scene.on_enter(ctx, &SceneData::new());
        scene
    }

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_enter_starts_a_fresh_run() {
        let mut ctx = ctx();
        ctx.state.set_score(30);
        ctx.state.set_status(GameStatus::GameOver);
        let scene = entered(&mut ctx);
        assert_eq!(ctx.state.score(), 0);
        assert_eq!(ctx.state.status(), GameStatus::Play);
        assert_eq!(scene.phase(), Phase::Playing);
        assert!(scene.spawners_active());
    }

    #[test]
    fn test_jump_sets_fixed_upward_velocity() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        scene.player_mut().vy = 500.0;
        scene.on_update(&mut ctx, FRAME, &FrameInput::jump());
        assert_eq!(scene.player().vy, -350.0);
    }

    #[test]
    fn test_rotation_clamps() {
        let config = GameConfig::default();
        let mut scene = GameScene::new(&config);
        scene.player.vy = 10.0;
        for _ in 0..100 {
            scene.rotate_player(&config);
        }
        assert_eq!(scene.player.angle, 90.0);

        scene.player.vy = -10.0;
        scene.rotate_player(&config);
        assert_eq!(scene.player.angle, 85.0);
        for _ in 0..100 {
            scene.rotate_player(&config);
        }
        assert_eq!(scene.player.angle, -30.0);
    }

    #[test]
    fn test_pair_scored_once() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        let x = scene.player().x - 1.0;
        scene
            .obstacles_mut()
            .push(ObstaclePair::new(x, 300.0, &ctx.config));

        assert_eq!(scene.score_passed_obstacles(&mut ctx), 1);
        assert_eq!(scene.score_passed_obstacles(&mut ctx), 0);
        assert_eq!(ctx.state.score(), 1);
        assert!(scene.obstacles()[0].scored);
    }

    #[test]
    fn test_pair_ahead_of_player_not_scored() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        let x = scene.player().x + 1.0;
        scene
            .obstacles_mut()
            .push(ObstaclePair::new(x, 300.0, &ctx.config));
        assert_eq!(scene.score_passed_obstacles(&mut ctx), 0);
        assert!(!scene.obstacles()[0].scored);
    }

    #[test]
    fn test_cull_threshold() {
        let config = GameConfig::default();
        let mut scene = GameScene::new(&config);
        scene.obstacles.push(ObstaclePair::new(-100.0, 300.0, &config));
        scene.obstacles.push(ObstaclePair::new(-100.5, 300.0, &config));
        scene.cull_obstacles(&config);
        assert_eq!(scene.obstacles.len(), 1);
        assert_eq!(scene.obstacles[0].x, -100.0);
    }

    #[test]
    fn test_bounds() {
        let config = GameConfig::default();
        let mut scene = GameScene::new(&config);
        scene.player.y = 0.0;
        assert!(scene.out_of_bounds(&config));
        scene.player.y = 1.0;
        assert!(!scene.out_of_bounds(&config));
        scene.player.y = config.world_height - config.player_height - 0.5;
        assert!(!scene.out_of_bounds(&config));
        scene.player.y = config.world_height - config.player_height;
        assert!(scene.out_of_bounds(&config));
    }

    #[test]
    fn test_obstacle_collision_is_fatal_at_any_height() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        scene.player_mut().y = 384.0;
        // Gap far above the player: the bottom member covers y = 384
        let x = scene.player().x;
        scene
            .obstacles_mut()
            .push(ObstaclePair::new(x, 100.0, &ctx.config));
        scene.on_update(&mut ctx, FRAME, &FrameInput::default());
        assert!(scene.is_game_over());
        assert!(scene.player().tinted);
        assert!(!scene.spawners_active());
        assert_eq!(ctx.state.status(), GameStatus::GameOver);
        assert_eq!(ctx.state.lose_streak(), 1);
        assert_eq!(ctx.state.dialog_category(), DialogCategory::Negative);
    }

    #[test]
    fn test_player_in_gap_survives() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        scene.player_mut().y = 380.0;
        let x = scene.player().x;
        scene
            .obstacles_mut()
            .push(ObstaclePair::new(x, 300.0, &ctx.config));
        scene.on_update(&mut ctx, FRAME, &FrameInput::default());
        assert!(!scene.is_game_over());
    }

    #[test]
    fn test_star_collection() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        scene.install_messages(MessageBank::embedded());
        let (x, y) = (scene.player().x, scene.player().y);
        scene.collectibles_mut().push(Collectible {
            x,
            y,
            velocity: 0.0,
            radius: 12.5,
        });
        assert_eq!(scene.update_collectibles(&mut ctx), 1);
        assert!(scene.collectibles().is_empty());
        assert_eq!(ctx.state.score(), 5);
        assert_eq!(ctx.state.total_coins(), 1);
        assert_eq!(ctx.state.earn_streak(), 1);
        assert!(scene.flash().is_visible());
        assert!(!scene.is_game_over());
    }

    #[test]
    fn test_star_culled_off_screen() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        scene.collectibles_mut().push(Collectible {
            x: -50.5,
            y: 100.0,
            velocity: -200.0,
            radius: 12.5,
        });
        scene.collectibles_mut().push(Collectible {
            x: -50.0,
            y: 100.0,
            velocity: -200.0,
            radius: 12.5,
        });
        assert_eq!(scene.update_collectibles(&mut ctx), 0);
        assert_eq!(scene.collectibles().len(), 1);
    }

    #[test]
    fn test_spawned_pair_geometry() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        for _ in 0..200 {
            scene.spawn_obstacle_pair(&mut ctx);
        }
        for pair in scene.obstacles() {
            assert!(pair.gap_top >= 100.0 && pair.gap_top <= 488.0);
            assert_eq!(pair.gap_height, 180.0);
            assert_eq!(pair.velocity, -200.0);
            assert_eq!(pair.x, 1100.0);
            assert!(pair.top_member().top <= 0.0);
            assert_eq!(pair.bottom_member().top, pair.gap_top + 180.0);
        }
    }

    #[test]
    fn test_spawners_fire_on_schedule() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        // Keep the player airborne in the middle of the screen
        for _ in 0..94 {
            scene.player_mut().y = 384.0;
            scene.player_mut().vy = 0.0;
            scene.on_update(&mut ctx, FRAME, &FrameInput::default());
        }
        // 94 * 16 = 1504ms
        assert_eq!(scene.obstacles().len(), 1);
        assert!(scene.collectibles().is_empty());
    }

    #[test]
    fn test_spawn_is_noop_after_game_over() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        scene.end_game(&mut ctx);
        scene.spawn_obstacle_pair(&mut ctx);
        scene.spawn_collectible(&mut ctx);
        assert!(scene.obstacles().is_empty());
        assert!(scene.collectibles().is_empty());
    }

    #[test]
    fn test_game_over_transition_after_delay() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        ctx.state.set_score(7);
        scene.end_game(&mut ctx);

        let before = scene.player().clone();
        assert!(scene
            .on_update(&mut ctx, Duration::from_millis(1499), &FrameInput::jump())
            .is_none());
        // Frozen while waiting
        assert_eq!(scene.player(), &before);

        let t = scene
            .on_update(&mut ctx, Duration::from_millis(1), &FrameInput::default())
            .unwrap();
        assert_eq!(t.to, SceneId::GameOver);
        assert_eq!(t.data.get("score"), Some(7));
    }

    #[test]
    fn test_reaching_coin_threshold_wins_the_run() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        ctx.state.set_total_coins(9);
        let (x, y) = (scene.player().x, scene.player().y);
        scene.collectibles_mut().push(Collectible {
            x,
            y,
            velocity: 0.0,
            radius: 12.5,
        });
        scene.update_collectibles(&mut ctx);
        assert_eq!(ctx.state.current_level(), 2);
        scene.end_game(&mut ctx);
        assert_eq!(ctx.state.status(), GameStatus::Won);
    }

    #[test]
    fn test_exit_cancels_everything() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        scene.end_game(&mut ctx);
        scene.on_exit(&mut ctx);
        assert!(!scene.spawners_active());
        assert!(scene.tasks.is_empty());
        assert!(scene.flash().is_destroyed());
    }

    #[test]
    fn test_embedded_messages_arrive_on_first_frame() {
        let mut ctx = ctx();
        let mut scene = entered(&mut ctx);
        assert!(!scene.flash().has_messages());
        scene.player_mut().y = 384.0;
        scene.on_update(&mut ctx, FRAME, &FrameInput::default());
        assert!(scene.flash().has_messages());
    }
}
