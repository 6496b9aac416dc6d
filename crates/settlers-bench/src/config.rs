//! Benchmark settings read from the environment.

use settlers_core::{GameConfig, StrategyKind};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: '{value}' is not a valid number")]
    InvalidNumber { var: &'static str, value: String },

    #[error("SETTLERS_STRATEGIES: {0}")]
    UnknownStrategy(String),

    #[error("{strategies} strategies listed for {players} players")]
    StrategyCount { players: usize, strategies: usize },

    #[error("SETTLERS_PLAYERS must be between 2 and 4, got {0}")]
    PlayerCount(usize),
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Games to play
    pub games: usize,
    pub players: usize,
    /// Base seed; game `i` uses `seed + i`
    pub seed: Option<u64>,
    /// One strategy per seat. Seats rotate between games.
    pub strategies: Vec<StrategyKind>,
    /// Layout JSON to play every game on, instead of random boards
    pub layout: Option<PathBuf>,
    pub game: GameConfig,
}

impl BenchConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let games = parse_number(&lookup, "SETTLERS_GAMES")?.unwrap_or(100);
        let players = parse_number(&lookup, "SETTLERS_PLAYERS")?.unwrap_or(4);
        if !(2..=4).contains(&players) {
            return Err(ConfigError::PlayerCount(players));
        }
        let seed = parse_number(&lookup, "SETTLERS_SEED")?;

        let listed = lookup("SETTLERS_STRATEGIES").unwrap_or_else(|| "greedy,random".into());
        let kinds = listed
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<StrategyKind>().map_err(ConfigError::UnknownStrategy))
            .collect::<Result<Vec<_>, _>>()?;
        let strategies = match kinds.len() {
            0 => vec![StrategyKind::Greedy; players],
            // A short list repeats around the table
            n if n <= players => kinds.iter().cycle().take(players).copied().collect(),
            n => {
                return Err(ConfigError::StrategyCount {
                    players,
                    strategies: n,
                })
            }
        };

        Ok(Self {
            games,
            players,
            seed,
            strategies,
            layout: lookup("SETTLERS_LAYOUT").map(PathBuf::from),
            game: GameConfig::default(),
        })
    }

    /// Seats for game `index`, rotated so every strategy plays every seat
    pub fn seats_for(&self, index: usize) -> Vec<StrategyKind> {
        let mut seats = self.strategies.clone();
        let len = seats.len().max(1);
        seats.rotate_left(index % len);
        seats
    }

    pub fn game_config(&self, index: usize) -> GameConfig {
        let mut config = self.game.clone();
        config.seed = self.seed.map(|s| s.wrapping_add(index as u64));
        config
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}
