//! Tunable game parameters and platform paths.
//!
//! Every field has a default, so a partial `config.json` only overrides what
//! it names. World coordinates are in "units": the reference play field is
//! 1024 x 768 and the renderer scales it down to the terminal.

use crate::error::{GameError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the config file looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Where the flavor-text bank comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind", content = "location")]
pub enum MessageSource {
    /// The bank compiled into the binary.
    #[default]
    Embedded,
    /// A JSON file on disk.
    File(PathBuf),
    /// A JSON document fetched over HTTP(S).
    Url(String),
}

impl MessageSource {
    /// Interpret a CLI argument: anything starting with `http://` or
    /// `https://` is a URL, everything else a path.
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Self::Url(arg.to_string())
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world_width: f64,
    pub world_height: f64,

    pub player_start_x: f64,
    pub player_start_y: f64,
    /// Height used by the bottom boundary check.
    pub player_height: f64,
    /// Radius of the circular player hitbox.
    pub player_radius: f64,
    /// Downward acceleration in units/s².
    pub gravity: f64,
    /// Velocity set by a jump (negative = up), units/s.
    pub jump_velocity: f64,

    /// Degrees per frame toward `max_fall_angle` while falling.
    pub fall_rotation_rate: f64,
    pub max_fall_angle: f64,
    /// Degrees per frame toward `max_rise_angle` while rising.
    pub rise_rotation_rate: f64,
    pub max_rise_angle: f64,

    pub obstacle_spawn_x: f64,
    pub obstacle_width: f64,
    /// Vertical extent of each pipe member.
    pub obstacle_length: f64,
    pub obstacle_gap: f64,
    /// Lowest allowed gap top.
    pub gap_min_top: f64,
    /// Lowest allowed gap bottom; the gap top is drawn from
    /// `gap_min_top..=gap_max_bottom - obstacle_gap`.
    pub gap_max_bottom: f64,
    pub obstacle_velocity: f64,
    pub obstacle_cull_x: f64,
    pub obstacle_spawn_interval_ms: u64,

    pub collectible_radius: f64,
    pub collectible_min_y: f64,
    pub collectible_max_y: f64,
    pub collectible_velocity: f64,
    pub collectible_cull_x: f64,
    pub collectible_spawn_interval_ms: u64,
    pub collectible_bonus: i64,

    /// Pipes between neutral flavor-text flashes.
    pub neutral_flash_every: i64,
    pub game_over_delay_ms: u64,
    pub flash_duration_ms: u64,
    /// Host loop frame interval.
    pub frame_interval_ms: u64,
    /// Jump presses closer together than this count as a held key on
    /// terminals that cannot report key releases.
    pub key_repeat_window_ms: u64,

    pub messages: MessageSource,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 1024.0,
            world_height: 768.0,

            player_start_x: 200.0,
            player_start_y: 384.0,
            player_height: 60.0,
            player_radius: 15.0,
            gravity: 1000.0,
            jump_velocity: -350.0,

            fall_rotation_rate: 2.0,
            max_fall_angle: 90.0,
            rise_rotation_rate: 5.0,
            max_rise_angle: -30.0,

            obstacle_spawn_x: 1100.0,
            obstacle_width: 70.0,
            obstacle_length: 600.0,
            obstacle_gap: 180.0,
            gap_min_top: 100.0,
            gap_max_bottom: 668.0,
            obstacle_velocity: -200.0,
            obstacle_cull_x: -100.0,
            obstacle_spawn_interval_ms: 1500,

            collectible_radius: 12.5,
            collectible_min_y: 100.0,
            collectible_max_y: 668.0,
            collectible_velocity: -200.0,
            collectible_cull_x: -50.0,
            collectible_spawn_interval_ms: 2000,
            collectible_bonus: 5,

            neutral_flash_every: 5,
            game_over_delay_ms: 1500,
            flash_duration_ms: 3000,
            frame_interval_ms: 16,
            key_repeat_window_ms: 80,

            messages: MessageSource::Embedded,
        }
    }
}

impl GameConfig {
    /// Load from an explicit path. Errors are returned to the caller.
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load `config.json` from the platform config dir, falling back to
    /// defaults when it is missing or invalid.
    pub fn load_or_default() -> Self {
        let Ok(path) = config_dir().map(|d| d.join(CONFIG_FILE_NAME)) else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn key_repeat_window(&self) -> Duration {
        Duration::from_millis(self.key_repeat_window_ms)
    }

    pub fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }

    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_duration_ms)
    }

    pub fn obstacle_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.obstacle_spawn_interval_ms)
    }

    pub fn collectible_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.collectible_spawn_interval_ms)
    }

    /// Highest allowed gap top.
    pub fn gap_max_top(&self) -> f64 {
        (self.gap_max_bottom - self.obstacle_gap).max(self.gap_min_top)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "skyflap").ok_or(GameError::NoProjectDirs)
}

/// Platform config directory, created if needed.
pub fn config_dir() -> Result<PathBuf> {
    let dir = project_dirs()?.config_dir().to_path_buf();
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Platform data directory (log file lives here), created if needed.
pub fn data_dir() -> Result<PathBuf> {
    let dir = project_dirs()?.data_dir().to_path_buf();
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
