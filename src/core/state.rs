//! Shared progress record read and written by every scene.

use serde::{Deserialize, Serialize};

/// Outcome status of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameStatus {
    #[default]
    Play,
    GameOver,
    Won,
}

/// Which flavor-text bank a flash message is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DialogCategory {
    #[default]
    Neutral,
    Positive,
    Negative,
}

impl DialogCategory {
    pub const ALL: [DialogCategory; 3] = [
        DialogCategory::Neutral,
        DialogCategory::Positive,
        DialogCategory::Negative,
    ];

    /// Key used in the flavor-text JSON.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

/// Coins needed to clear each level. Unlisted levels need 0.
const MIN_COINS_PER_LEVEL: [(i64, i64); 3] = [(1, 10), (2, 20), (3, 30)];

/// Obstacle density for each level. Unlisted levels have 0.
const ROCKS_PER_LEVEL: [(i64, i64); 3] = [(1, 5), (2, 10), (3, 15)];

fn lookup(table: &[(i64, i64)], level: i64) -> i64 {
    table
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, v)| *v)
        .unwrap_or(0)
}

/// Score, coins, level and streak counters.
///
/// Setters do no validation: any integer is accepted, including negative
/// scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    total_coins: i64,
    current_level: i64,
    score: i64,
    status: GameStatus,
    earn_streak: u32,
    lose_streak: u32,
    dialog_category: DialogCategory,
    dialog_neutral_streak: u32,
    dialog_positive_streak: u32,
    dialog_negative_streak: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            total_coins: 0,
            current_level: 1,
            score: 0,
            status: GameStatus::Play,
            earn_streak: 0,
            lose_streak: 0,
            dialog_category: DialogCategory::Neutral,
            dialog_neutral_streak: 0,
            dialog_positive_streak: 0,
            dialog_negative_streak: 0,
        }
    }

    /// Back to a fresh playthrough: level 1, no coins, no streaks.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Start a new run: score back to 0 and status to `Play`. Coins and
    /// level carry over.
    pub fn begin_run(&mut self) {
        self.score = 0;
        self.status = GameStatus::Play;
    }

    pub fn min_coins_for_level(level: i64) -> i64 {
        lookup(&MIN_COINS_PER_LEVEL, level)
    }

    pub fn rocks_for_level(level: i64) -> i64 {
        lookup(&ROCKS_PER_LEVEL, level)
    }

    pub fn total_coins(&self) -> i64 {
        self.total_coins
    }

    pub fn set_total_coins(&mut self, coins: i64) {
        self.total_coins = coins;
    }

    pub fn current_level(&self) -> i64 {
        self.current_level
    }

    pub fn set_current_level(&mut self, level: i64) {
        self.current_level = level;
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn set_score(&mut self, score: i64) {
        self.score = score;
    }

    pub fn add_score(&mut self, delta: i64) -> i64 {
        self.score += delta;
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    pub fn earn_streak(&self) -> u32 {
        self.earn_streak
    }

    pub fn set_earn_streak(&mut self, streak: u32) {
        self.earn_streak = streak;
    }

    pub fn lose_streak(&self) -> u32 {
        self.lose_streak
    }

    pub fn set_lose_streak(&mut self, streak: u32) {
        self.lose_streak = streak;
    }

    pub fn reset_earn_streak(&mut self) {
        self.earn_streak = 0;
    }

    pub fn reset_lose_streak(&mut self) {
        self.lose_streak = 0;
    }

    /// A positive event: extends the earn streak and breaks the lose streak.
    pub fn record_earn(&mut self) {
        self.earn_streak += 1;
        self.reset_lose_streak();
    }

    /// A negative event: extends the lose streak and breaks the earn streak.
    pub fn record_loss(&mut self) {
        self.lose_streak += 1;
        self.reset_earn_streak();
    }

    pub fn dialog_category(&self) -> DialogCategory {
        self.dialog_category
    }

    /// Switch the active dialog category. Repeating the current category
    /// extends its streak; switching resets all streaks and starts the new
    /// one at 1.
    pub fn set_dialog_category(&mut self, category: DialogCategory) {
        if category != self.dialog_category {
            self.dialog_neutral_streak = 0;
            self.dialog_positive_streak = 0;
            self.dialog_negative_streak = 0;
            self.dialog_category = category;
        }
        *self.dialog_streak_mut(category) += 1;
    }

    pub fn dialog_streak(&self, category: DialogCategory) -> u32 {
        match category {
            DialogCategory::Neutral => self.dialog_neutral_streak,
            DialogCategory::Positive => self.dialog_positive_streak,
            DialogCategory::Negative => self.dialog_negative_streak,
        }
    }

    fn dialog_streak_mut(&mut self, category: DialogCategory) -> &mut u32 {
        match category {
            DialogCategory::Neutral => &mut self.dialog_neutral_streak,
            DialogCategory::Positive => &mut self.dialog_positive_streak,
            DialogCategory::Negative => &mut self.dialog_negative_streak,
        }
    }

    /// Coins still needed to clear the current level, 0 if it has no
    /// threshold or it is already met.
    pub fn coins_to_next_level(&self) -> i64 {
        (Self::min_coins_for_level(self.current_level) - self.total_coins).max(0)
    }

    /// Add coins and advance the level when its threshold is met. Returns
    /// true if the level changed.
    pub fn add_coins(&mut self, coins: i64) -> bool {
        self.total_coins += coins;
        let threshold = Self::min_coins_for_level(self.current_level);
        if threshold > 0 && self.total_coins >= threshold {
            self.current_level += 1;
            true
        } else {
            false
        }
    }
}
