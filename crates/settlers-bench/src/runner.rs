//! Runs many self-play sessions concurrently and tallies the results.

use crate::config::BenchConfig;
use dashmap::DashMap;
use serde::Serialize;
use settlers_core::{Colour, GameSummary, Layout, Session, SessionError, StrategyKind};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, info_span};
use uuid::Uuid;

/// One finished game
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub id: Uuid,
    pub seed: Option<u64>,
    pub seats: Vec<(Colour, StrategyKind)>,
    pub summary: GameSummary,
}

/// Everything the benchmark prints
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub games: usize,
    pub finished: usize,
    pub failed: usize,
    pub average_turns: f64,
    /// Wins per strategy name
    pub wins: BTreeMap<String, u32>,
    pub reports: Vec<GameReport>,
}

/// Shared between the blocking tasks
#[derive(Default)]
struct Tally {
    wins: DashMap<StrategyKind, u32>,
}

impl Tally {
    fn record(&self, report: &GameReport) {
        let Some(winner) = report.summary.winner else {
            return;
        };
        if let Some((_, kind)) = report.seats.iter().find(|(colour, _)| *colour == winner) {
            *self.wins.entry(*kind).or_insert(0) += 1;
        }
    }
}

fn play_one(
    id: Uuid,
    config: &BenchConfig,
    layout: Option<&Layout>,
    index: usize,
) -> Result<GameReport, SessionError> {
    let kinds = config.seats_for(index);
    let game_config = config.game_config(index);
    let seed = game_config.seed;

    let mut session = match layout {
        Some(layout) => Session::with_layout(layout, game_config, &kinds)?,
        None => Session::with_strategies(game_config, &kinds)?,
    };
    let summary = session.play()?;

    let seats = session
        .game()
        .players
        .iter()
        .map(|p| p.colour)
        .zip(kinds)
        .collect();

    Ok(GameReport {
        id,
        seed,
        seats,
        summary,
    })
}

/// Play `config.games` sessions on the blocking pool
pub async fn run(config: Arc<BenchConfig>, layout: Option<Arc<Layout>>) -> anyhow::Result<BenchReport> {
    let tally = Arc::new(Tally::default());
    let mut handles = Vec::with_capacity(config.games);

    for index in 0..config.games {
        let config = Arc::clone(&config);
        let layout = layout.clone();
        let tally = Arc::clone(&tally);

        handles.push(tokio::task::spawn_blocking(move || {
            let game_id = Uuid::new_v4();
            let span = info_span!("game", %game_id, index);
            let _enter = span.enter();

            match play_one(game_id, &config, layout.as_deref(), index) {
                Ok(report) => {
                    tally.record(&report);
                    info!(winner = ?report.summary.winner, turns = report.summary.turns, "game over");
                    Some(report)
                }
                Err(err) => {
                    error!(%err, "game aborted");
                    None
                }
            }
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    let mut failed = 0;
    for handle in handles {
        match handle.await? {
            Some(report) => reports.push(report),
            None => failed += 1,
        }
    }

    let finished = reports.iter().filter(|r| r.summary.winner.is_some()).count();
    let average_turns = if reports.is_empty() {
        0.0
    } else {
        reports.iter().map(|r| r.summary.turns as f64).sum::<f64>() / reports.len() as f64
    };
    let wins = tally
        .wins
        .iter()
        .map(|entry| (entry.key().name().to_string(), *entry.value()))
        .collect();

    Ok(BenchReport {
        games: config.games,
        finished,
        failed,
        average_turns,
        wins,
        reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(games: usize) -> BenchConfig {
        let mut config = BenchConfig::from_lookup(|var| match var {
            "SETTLERS_PLAYERS" => Some("3".into()),
            "SETTLERS_SEED" => Some("21".into()),
            _ => None,
        })
        .unwrap();
        config.games = games;
        config.game.max_turns = 200;
        config
    }

    #[tokio::test]
    async fn test_run_reports_every_game() {
        let report = run(Arc::new(small_config(4)), None).await.unwrap();

        assert_eq!(report.games, 4);
        assert_eq!(report.reports.len() + report.failed, 4);
        assert_eq!(report.wins.values().sum::<u32>() as usize, report.finished);
        for game in &report.reports {
            assert_eq!(game.seats.len(), 3);
        }
    }

    #[test]
    fn test_seeded_games_repeat() {
        let config = small_config(1);
        let first = play_one(Uuid::new_v4(), &config, None, 0).unwrap();
        let second = play_one(Uuid::new_v4(), &config, None, 0).unwrap();
        assert_eq!(first.summary, second.summary);
        assert_eq!(first.seats, second.seats);
    }

    #[test]
    fn test_fixed_layout() {
        let config = small_config(1);
        let layout = settlers_core::Board::standard().encode();
        let report = play_one(Uuid::nil(), &config, Some(&layout), 0).unwrap();
        assert_eq!(report.seed, Some(21));
    }
}
