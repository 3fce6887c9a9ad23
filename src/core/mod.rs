//! Scene-independent building blocks: shared state, scheduled tasks, easing.

pub mod state;
pub mod tasks;
pub mod tween;

pub use state::{DialogCategory, GameState, GameStatus};
pub use tasks::{TaskId, TaskList};
pub use tween::Tween;
