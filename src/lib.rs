//! Skyflap - terminal flappy-bird side-scroller.
//!
//! The library holds the whole game: shared state, scenes and rendering.
//! The binary only sets up the terminal and drives the frame loop.

pub mod build_info;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod flash_text;
pub mod input;
pub mod logging;
pub mod messages;
pub mod scenes;
pub mod ui;

pub use config::{GameConfig, MessageSource};
pub use core::{DialogCategory, GameState, GameStatus};
pub use error::{GameError, Result};
pub use flash_text::FlashText;
pub use input::FrameInput;
pub use messages::MessageBank;
pub use scenes::{GameContext, SceneId, SceneManager};
