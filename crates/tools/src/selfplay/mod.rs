pub mod config;
pub mod game;
pub mod types;

pub use config::SelfplayConfig;
pub use game::{GameConfig, MoveEvent, run_game};
pub use types::{GameRecord, GameSummary, Policy, side_label, termination_label};
