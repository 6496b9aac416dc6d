//! Rule and driver settings for a single game.

use serde::{Deserialize, Serialize};

/// Game settings. Every field has a default, so a partial JSON object is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub victory_points_to_win: u32,
    /// Players holding more than this many cards discard half on a seven
    pub discard_threshold: u32,
    /// Rejected actions tolerated in one turn before the session ends it
    pub max_rejections_per_turn: u32,
    /// Turns after which a session stops without a winner
    pub max_turns: u32,
    /// Seed for the board, dice and theft. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            victory_points_to_win: 10,
            discard_threshold: 7,
            max_rejections_per_turn: 50,
            max_turns: 500,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
