//! Turn driver connecting a `Game` to one `Strategy` per seat.
//!
//! Strategies only ever see masked views. Opponents are notified after an
//! action succeeded, never before. A seat whose choices keep getting rejected
//! has its turn ended for it once the rejection budget runs out.

use crate::actions::{Action, GameEvent};
use crate::board::{Board, Colour};
use crate::config::GameConfig;
use crate::game::{DiscardError, Game, GameError, GamePhase};
use crate::layout::{Layout, LayoutError};
use crate::strategy::{legal_robber_targets, Strategy, StrategyKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{players} players but {strategies} strategies")]
    SeatMismatch { players: usize, strategies: usize },

    #[error("{colour:?} found no legal initial placement")]
    SetupStalled { colour: Colour },

    #[error("no hex left for {colour:?} to move the robber to")]
    RobberStalled { colour: Colour },

    #[error("{colour:?} made an illegal discard")]
    IllegalDiscard {
        colour: Colour,
        #[source]
        source: DiscardError,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// How a finished (or abandoned) session ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub winner: Option<Colour>,
    pub turns: u32,
    pub victory_points: Vec<(Colour, u32)>,
    pub rejected_actions: u32,
}

fn build_seats(kinds: &[StrategyKind], seed: Option<u64>) -> Vec<Box<dyn Strategy + Send>> {
    kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| kind.build(seed.map(|s| s.wrapping_add(i as u64 + 1))))
        .collect()
}

pub struct Session {
    game: Game,
    /// One strategy per seat, in seat order
    seats: Vec<Box<dyn Strategy + Send>>,
    rejected_actions: u32,
}

impl Session {
    pub fn new(game: Game, seats: Vec<Box<dyn Strategy + Send>>) -> Result<Self, SessionError> {
        if game.player_count() != seats.len() {
            return Err(SessionError::SeatMismatch {
                players: game.player_count(),
                strategies: seats.len(),
            });
        }
        Ok(Self {
            game,
            seats,
            rejected_actions: 0,
        })
    }

    /// A fresh game with built-in strategies. A config seed also seeds every seat.
    pub fn with_strategies(config: GameConfig, kinds: &[StrategyKind]) -> Result<Self, SessionError> {
        let seats = build_seats(kinds, config.seed);
        let game = Game::new(kinds.len(), config)?;
        Self::new(game, seats)
    }

    /// Like [`Session::with_strategies`], on a fixed layout
    pub fn with_layout(
        layout: &Layout,
        config: GameConfig,
        kinds: &[StrategyKind],
    ) -> Result<Self, SessionError> {
        let board = match config.seed {
            Some(seed) => Board::from_layout_with_rng(layout, &mut StdRng::seed_from_u64(seed))?,
            None => Board::from_layout(layout)?,
        };
        let seats = build_seats(kinds, config.seed);
        let game = Game::with_board(board, kinds.len(), config)?;
        Self::new(game, seats)
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    fn seat_of(&self, colour: Colour) -> Result<usize, SessionError> {
        self.game
            .players
            .iter()
            .position(|p| p.colour == colour)
            .ok_or(SessionError::Game(GameError::UnknownPlayer(colour)))
    }

    fn rejection_budget(&self) -> u32 {
        self.game.config().max_rejections_per_turn.max(1)
    }

    /// Setup, then turns until someone wins or the turn limit is hit
    pub fn play(&mut self) -> Result<GameSummary, SessionError> {
        self.play_setup()?;

        let max_turns = self.game.config().max_turns;
        while !self.game.is_finished() && self.game.turn_number <= max_turns {
            self.play_turn()?;
        }

        if !self.game.is_finished() {
            info!(max_turns, "turn limit reached without a winner");
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            winner: self.game.get_winner(),
            turns: self.game.turn_number,
            victory_points: self
                .game
                .players
                .iter()
                .map(|p| (p.colour, self.game.victory_points(p.colour)))
                .collect(),
            rejected_actions: self.rejected_actions,
        }
    }

    // ==================== Setup ====================

    pub fn play_setup(&mut self) -> Result<(), SessionError> {
        for colour in self.game.setup_order() {
            let seat = self.seat_of(colour)?;
            let mut attempts = 0;

            loop {
                let view = self.game.view(colour)?;
                let (vertex, edge) = self.seats[seat].initial_placement(&view);

                match self.game.place_initial(colour, vertex, edge) {
                    Ok(events) => {
                        self.notify(colour, &events);
                        break;
                    }
                    Err(err) => {
                        attempts += 1;
                        self.rejected_actions += 1;
                        debug!(?colour, vertex, edge, %err, "initial placement rejected");
                        if attempts >= self.rejection_budget() {
                            warn!(
                                ?colour,
                                strategy = self.seats[seat].name(),
                                attempts,
                                "no acceptable initial placement"
                            );
                            return Err(SessionError::SetupStalled { colour });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    // ==================== Turns ====================

    /// Roll, resolve a seven, then ask for actions until the turn ends
    pub fn play_turn(&mut self) -> Result<(), SessionError> {
        let colour = self.game.current_player;
        let seat = self.seat_of(colour)?;

        let events = self.game.roll_dice(colour)?;
        self.notify(colour, &events);

        if matches!(self.game.phase, GamePhase::DiscardRequired { .. }) {
            self.resolve_discards()?;
        }
        if self.game.phase == GamePhase::RobberMoveRequired {
            self.resolve_robber(colour, seat)?;
        }

        let mut rejections = 0;
        while self.game.current_player == colour && !self.game.is_finished() {
            let view = self.game.view(colour)?;
            let action = self.seats[seat].choose_action(&view);

            match self.game.apply_action(colour, action) {
                Ok(events) => {
                    debug!(?colour, ?action, "action applied");
                    self.notify(colour, &events);
                }
                Err(err) => {
                    rejections += 1;
                    self.rejected_actions += 1;
                    debug!(?colour, ?action, %err, "action rejected");
                    self.seats[seat].on_rejected(&action, &err);

                    if rejections >= self.rejection_budget() {
                        warn!(
                            ?colour,
                            strategy = self.seats[seat].name(),
                            rejections,
                            "rejection budget exhausted, ending turn"
                        );
                        let events = self.game.apply_action(colour, Action::EndTurn)?;
                        self.notify(colour, &events);
                    }
                }
            }
        }
        Ok(())
    }

    /// Every player over the limit discards. A bad discard ends the session.
    fn resolve_discards(&mut self) -> Result<(), SessionError> {
        for (colour, count) in self.game.pending_discards() {
            let seat = self.seat_of(colour)?;
            let view = self.game.view(colour)?;
            let cards = self.seats[seat].discard(&view, count);

            let events = self.game.discard(colour, &cards).map_err(|err| match err {
                GameError::Discard(source) => SessionError::IllegalDiscard { colour, source },
                other => SessionError::Game(other),
            })?;
            self.notify(colour, &events);
        }
        Ok(())
    }

    fn resolve_robber(&mut self, colour: Colour, seat: usize) -> Result<(), SessionError> {
        for _ in 0..self.rejection_budget() {
            let view = self.game.view(colour)?;
            let (hex, victim) = self.seats[seat].place_robber(&view);

            match self.game.move_robber(colour, hex, victim) {
                Ok(events) => {
                    self.notify(colour, &events);
                    return Ok(());
                }
                Err(err) => {
                    self.rejected_actions += 1;
                    debug!(?colour, hex, ?victim, %err, "robber placement rejected");
                }
            }
        }

        // Budget spent: move the robber without robbing anyone
        let view = self.game.view(colour)?;
        let hex = legal_robber_targets(&view)
            .first()
            .copied()
            .ok_or(SessionError::RobberStalled { colour })?;
        warn!(
            ?colour,
            strategy = self.seats[seat].name(),
            hex,
            "rejection budget exhausted, moving robber for the player"
        );
        let events = self.game.move_robber(colour, hex, None)?;
        self.notify(colour, &events);
        Ok(())
    }

    /// Tell every other seat what happened, as they are allowed to see it
    fn notify(&mut self, actor: Colour, events: &[GameEvent]) {
        if events.is_empty() {
            return;
        }
        let board: Board = self.game.board.masked();
        let colours: Vec<Colour> = self.game.players.iter().map(|p| p.colour).collect();

        for (seat, colour) in colours.into_iter().enumerate() {
            if colour == actor {
                continue;
            }
            for event in events {
                self.seats[seat].on_opponent_action(&event.masked_for(colour), &board);
            }
        }
    }
}
