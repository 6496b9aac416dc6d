//! Core game state machine.
//!
//! `Game` owns the board, the players and the RNG. The turn driver calls
//! [`Game::place_initial`] during setup, then [`Game::roll_dice`],
//! [`Game::discard`] / [`Game::move_robber`] after a seven, and
//! [`Game::apply_action`] for everything a player chooses to do.
//!
//! Every entry point validates fully before it mutates: an `Err` leaves the
//! game exactly as it was.

use crate::actions::{Action, GameEvent};
use crate::board::{Board, BuildingKind, Colour, Port, Resource, RobberError, Structure, ROBBER_ROLL};
use crate::config::GameConfig;
use crate::placement::PlacementError;
use crate::player::{costs, DevelopmentCard, PlayerState, ResourceHand};
use crate::topology::{EdgeIndex, HexIndex, VertexIndex, HEX_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Minimum road length for Longest Road
const MIN_LONGEST_ROAD: u32 = 5;

/// Minimum knights for Largest Army
const MIN_LARGEST_ARMY: u32 = 3;

/// Game phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Initial placement, round 1 forward and round 2 in reverse
    Setup { round: u8 },

    /// Before rolling dice at start of turn
    PreRoll,

    /// A seven was rolled; these players still owe a discard
    DiscardRequired { players_remaining: Vec<Colour> },

    /// The current player must move the robber
    RobberMoveRequired,

    /// Main phase - can trade, build, buy and play cards, end turn
    MainPhase,

    /// Game is over
    Finished { winner: Colour },
}

/// Errors from buying or playing development cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum DevelopmentCardError {
    #[error("you don't have a playable {0:?}")]
    NotOwned(DevelopmentCard),

    #[error("victory point cards cannot be played")]
    NotUsable,

    #[error("desert is not a resource")]
    InvalidArguments,

    #[error("a development card was already played this turn")]
    AlreadyPlayedThisTurn,
}

/// Errors from bank and port trades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum TradeError {
    #[error("cannot trade {give:?} for {receive:?}")]
    InvalidResource { give: Resource, receive: Resource },

    #[error("need {needed} cards to trade, have {held}")]
    CannotAfford { needed: u32, held: u32 },
}

/// A discard that breaks the rules. The driver treats these as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum DiscardError {
    #[error("{0:?} does not need to discard")]
    NotRequired(Colour),

    #[error("must discard exactly {expected} cards, got {actual}")]
    WrongCount { expected: u32, actual: u32 },

    #[error("cannot discard cards that are not in hand")]
    NotInHand,
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum GameError {
    #[error("Not your turn")]
    NotYourTurn,

    #[error("Invalid action for current phase")]
    InvalidPhase,

    #[error("Cannot afford this")]
    CannotAfford,

    #[error("Game is over")]
    GameOver,

    #[error("{0:?} is not playing")]
    UnknownPlayer(Colour),

    #[error("a game needs 2 to 4 players, got {0}")]
    InvalidPlayerCount(usize),

    #[error("dice show {0} and {1}")]
    InvalidRoll(u8, u8),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Robber(#[from] RobberError),

    #[error(transparent)]
    DevelopmentCard(#[from] DevelopmentCardError),

    #[error(transparent)]
    Trade(#[from] TradeError),

    #[error(transparent)]
    Discard(#[from] DiscardError),
}

/// Cards given per card received for `resource`
pub fn trade_rate(ports: &[Port], resource: Resource) -> u32 {
    // Check for 2:1 specific harbor
    if ports.iter().any(|p| p.resource == resource) {
        return 2;
    }
    // Check for 3:1 generic harbor
    if ports.iter().any(|p| p.resource == Resource::Desert) {
        return 3;
    }
    4
}

/// Card rules shared by the engine and the strategy view
pub fn check_playable(
    player: &PlayerState,
    card: DevelopmentCard,
    already_played: bool,
) -> Result<(), DevelopmentCardError> {
    if !card.is_playable() {
        return Err(DevelopmentCardError::NotUsable);
    }
    if already_played {
        return Err(DevelopmentCardError::AlreadyPlayedThisTurn);
    }
    if !player.has_card(card) {
        return Err(DevelopmentCardError::NotOwned(card));
    }
    Ok(())
}

/// What one opponent looks like from across the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpponentView {
    pub colour: Colour,
    pub card_count: u32,
    pub development_card_count: usize,
    pub knights_played: u32,
    /// Without hidden victory point cards
    pub public_victory_points: u32,
}

/// Everything a strategy is allowed to see when it decides
#[derive(Debug, Clone)]
pub struct GameView {
    pub colour: Colour,
    /// Deep copy with the development pile masked
    pub board: Board,
    pub phase: GamePhase,
    pub turn_number: u32,
    pub player: PlayerState,
    pub development_card_played: bool,
    pub victory_points: u32,
    pub victory_points_to_win: u32,
    pub opponents: Vec<OpponentView>,
}

impl GameView {
    pub fn hand(&self) -> &ResourceHand {
        &self.player.hand
    }

    pub fn can_play(&self, card: DevelopmentCard) -> Result<(), DevelopmentCardError> {
        check_playable(&self.player, card, self.development_card_played)
    }

    pub fn trade_rate(&self, resource: Resource) -> u32 {
        trade_rate(&self.board.ports_for(self.colour), resource)
    }

    pub fn opponent(&self, colour: Colour) -> Option<&OpponentView> {
        self.opponents.iter().find(|o| o.colour == colour)
    }
}

/// The complete game state
#[derive(Debug, Clone)]
pub struct Game {
    /// The game board
    pub board: Board,
    /// Seated players in turn order
    pub players: Vec<PlayerState>,
    pub current_player: Colour,
    pub phase: GamePhase,
    /// Turn number (0 during setup, then starts at 1)
    pub turn_number: u32,
    /// Last dice roll
    pub dice_roll: Option<(u8, u8)>,
    /// Whether a development card has been played this turn
    pub development_card_played: bool,
    config: GameConfig,
    /// Placements completed during setup
    setup_step: usize,
    rng: StdRng,
}

impl Game {
    /// A game on a random board. The seed in `config` fixes board, dice and theft.
    pub fn new(player_count: usize, config: GameConfig) -> Result<Self, GameError> {
        let mut rng = Self::rng_for(&config);
        let board = Board::standard_with_rng(&mut rng);
        Self::assemble(board, player_count, config, rng)
    }

    /// A game on a prepared board
    pub fn with_board(board: Board, player_count: usize, config: GameConfig) -> Result<Self, GameError> {
        let rng = Self::rng_for(&config);
        Self::assemble(board, player_count, config, rng)
    }

    fn rng_for(config: &GameConfig) -> StdRng {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn assemble(board: Board, player_count: usize, config: GameConfig, rng: StdRng) -> Result<Self, GameError> {
        if !(2..=Colour::PLAYERS.len()).contains(&player_count) {
            return Err(GameError::InvalidPlayerCount(player_count));
        }

        let players: Vec<PlayerState> = Colour::PLAYERS[..player_count]
            .iter()
            .map(|&colour| PlayerState::new(colour))
            .collect();

        Ok(Self {
            board,
            current_player: players[0].colour,
            players,
            phase: GamePhase::Setup { round: 1 },
            turn_number: 0,
            dice_roll: None,
            development_card_played: false,
            config,
            setup_step: 0,
            rng,
        })
    }

    // ==================== Queries ====================

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn get_player(&self, colour: Colour) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.colour == colour)
    }

    fn index_of(&self, colour: Colour) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.colour == colour)
            .ok_or(GameError::UnknownPlayer(colour))
    }

    fn current_index(&self) -> usize {
        self.players
            .iter()
            .position(|p| p.colour == self.current_player)
            .unwrap_or(0)
    }

    /// Buildings, awards and victory point cards
    pub fn victory_points(&self, colour: Colour) -> u32 {
        match self.get_player(colour) {
            Some(player) => self.public_victory_points(colour) + player.hidden_victory_points(),
            None => 0,
        }
    }

    /// Victory points visible to everyone
    pub fn public_victory_points(&self, colour: Colour) -> u32 {
        let Some(player) = self.get_player(colour) else {
            return 0;
        };
        let settlements = self.board.count(Structure::new(colour, BuildingKind::Settlement)) as u32;
        let cities = self.board.count(Structure::new(colour, BuildingKind::City)) as u32;
        settlements + 2 * cities + player.award_points()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    pub fn get_winner(&self) -> Option<Colour> {
        if let GamePhase::Finished { winner } = self.phase {
            Some(winner)
        } else {
            None
        }
    }

    /// Players still owing a discard, with the number of cards each owes
    pub fn pending_discards(&self) -> Vec<(Colour, u32)> {
        match &self.phase {
            GamePhase::DiscardRequired { players_remaining } => players_remaining
                .iter()
                .filter_map(|c| self.get_player(*c))
                .map(|p| (p.colour, p.hand.total() / 2))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// What `colour` may see of the game
    pub fn view(&self, colour: Colour) -> Result<GameView, GameError> {
        let player = self.get_player(colour).ok_or(GameError::UnknownPlayer(colour))?;
        let opponents = self
            .players
            .iter()
            .filter(|p| p.colour != colour)
            .map(|p| OpponentView {
                colour: p.colour,
                card_count: p.hand.total(),
                development_card_count: p.development_card_count(),
                knights_played: p.knights_played,
                public_victory_points: self.public_victory_points(p.colour),
            })
            .collect();

        Ok(GameView {
            colour,
            board: self.board.masked(),
            phase: self.phase.clone(),
            turn_number: self.turn_number,
            player: player.clone(),
            development_card_played: colour == self.current_player && self.development_card_played,
            victory_points: self.victory_points(colour),
            victory_points_to_win: self.config.victory_points_to_win,
            opponents,
        })
    }

    /// Trade rate for `colour` giving `resource`
    pub fn trade_rate(&self, colour: Colour, resource: Resource) -> u32 {
        trade_rate(&self.board.ports_for(colour), resource)
    }

    fn ensure_turn(&self, colour: Colour) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        self.index_of(colour)?;
        if colour != self.current_player {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    // ==================== Setup Phase ====================

    /// Snake order: forward through the seats, then back again
    pub fn setup_order(&self) -> Vec<Colour> {
        let forward = self.players.iter().map(|p| p.colour);
        forward.clone().chain(forward.rev()).collect()
    }

    /// Place a free settlement and a road touching it. In the second round the
    /// settlement collects one card from each producing hex around it.
    pub fn place_initial(
        &mut self,
        colour: Colour,
        vertex: VertexIndex,
        edge: EdgeIndex,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_turn(colour)?;
        let GamePhase::Setup { round } = self.phase else {
            return Err(GameError::InvalidPhase);
        };

        self.board.check_settlement(colour, None, vertex, false)?;
        let road = self.board.edge(edge).ok_or(PlacementError::InvalidPosition(edge))?;
        if !road.verts.contains(&vertex) {
            return Err(PlacementError::NotConnectedToNetwork.into());
        }

        self.board.place_settlement(colour, None, vertex, false)?;
        if let Err(err) = self.board.place_road(colour, None, edge) {
            self.board.remove_settlement(colour, vertex)?;
            return Err(err.into());
        }
        debug!(?colour, vertex, edge, round, "initial placement");

        let mut events = vec![
            GameEvent::SettlementBuilt {
                player: colour,
                vertex,
            },
            GameEvent::RoadBuilt {
                player: colour,
                edge,
            },
        ];

        if round == 2 {
            let resources: Vec<Resource> = self
                .board
                .hexes_at_vertex(vertex)
                .filter_map(|h| self.board.hex(h))
                .map(|h| h.resource)
                .filter(|r| r.is_card())
                .collect();

            let index = self.index_of(colour)?;
            let mut distributions = Vec::new();
            for resource in resources {
                self.players[index].hand.add(resource, 1);
                distributions.push((colour, resource, 1));
            }
            if !distributions.is_empty() {
                events.push(GameEvent::ResourcesDistributed { distributions });
            }
        }

        self.advance_setup();
        Ok(events)
    }

    fn advance_setup(&mut self) {
        let order = self.setup_order();
        self.setup_step += 1;

        match order.get(self.setup_step) {
            Some(&next) => {
                self.current_player = next;
                let round = if self.setup_step < self.player_count() { 1 } else { 2 };
                self.phase = GamePhase::Setup { round };
            }
            None => {
                self.current_player = self.players[0].colour;
                self.phase = GamePhase::PreRoll;
                self.turn_number = 1;
                info!("setup complete");
            }
        }
    }

    // ==================== Dice Rolling ====================

    /// Roll two dice for the current player
    pub fn roll_dice(&mut self, colour: Colour) -> Result<Vec<GameEvent>, GameError> {
        let die1 = self.rng.gen_range(1..=6);
        let die2 = self.rng.gen_range(1..=6);
        self.apply_roll(colour, (die1, die2))
    }

    /// Resolve a roll with known dice
    pub fn apply_roll(&mut self, colour: Colour, roll: (u8, u8)) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_turn(colour)?;
        if self.phase != GamePhase::PreRoll {
            return Err(GameError::InvalidPhase);
        }
        let (die1, die2) = roll;
        if !(1..=6).contains(&die1) || !(1..=6).contains(&die2) {
            return Err(GameError::InvalidRoll(die1, die2));
        }

        let total = die1 + die2;
        self.dice_roll = Some(roll);
        debug!(?colour, total, "dice rolled");

        let mut events = vec![GameEvent::DiceRolled {
            player: colour,
            roll,
            total,
        }];

        if total == ROBBER_ROLL {
            let threshold = self.config.discard_threshold;
            let must_discard: Vec<Colour> = self
                .players
                .iter()
                .filter(|p| p.hand.total() > threshold)
                .map(|p| p.colour)
                .collect();

            self.phase = if must_discard.is_empty() {
                GamePhase::RobberMoveRequired
            } else {
                GamePhase::DiscardRequired {
                    players_remaining: must_discard,
                }
            };
        } else {
            let mut distributions = Vec::new();
            for (owner, hand) in self.board.get_resources(total) {
                let index = self.index_of(owner)?;
                self.players[index].hand.add_hand(&hand);
                distributions.extend(
                    hand.iter()
                        .filter(|(_, amount)| *amount > 0)
                        .map(|(resource, amount)| (owner, resource, amount)),
                );
            }
            if !distributions.is_empty() {
                events.push(GameEvent::ResourcesDistributed { distributions });
            }
            self.phase = GamePhase::MainPhase;
        }

        Ok(events)
    }

    // ==================== Discard ====================

    /// Discard half a hand after a seven. Any player may owe this, not only
    /// the current one.
    pub fn discard(&mut self, colour: Colour, cards: &ResourceHand) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        let GamePhase::DiscardRequired { players_remaining } = &self.phase else {
            return Err(DiscardError::NotRequired(colour).into());
        };
        if !players_remaining.contains(&colour) {
            return Err(DiscardError::NotRequired(colour).into());
        }

        let index = self.index_of(colour)?;
        let hand = &self.players[index].hand;
        let expected = hand.total() / 2;
        if cards.total() != expected {
            return Err(DiscardError::WrongCount {
                expected,
                actual: cards.total(),
            }
            .into());
        }
        if !hand.contains(cards) {
            return Err(DiscardError::NotInHand.into());
        }

        self.players[index].hand.subtract(cards);
        debug!(?colour, count = expected, "discarded");

        if let GamePhase::DiscardRequired { players_remaining } = &mut self.phase {
            players_remaining.retain(|c| *c != colour);
            if players_remaining.is_empty() {
                self.phase = GamePhase::RobberMoveRequired;
            }
        }

        Ok(vec![GameEvent::CardsDiscarded {
            player: colour,
            count: expected,
        }])
    }

    // ==================== Robber ====================

    /// Move the robber after a seven and rob `victim` if given
    pub fn move_robber(
        &mut self,
        colour: Colour,
        hex: HexIndex,
        victim: Option<Colour>,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_turn(colour)?;
        if self.phase != GamePhase::RobberMoveRequired {
            return Err(GameError::InvalidPhase);
        }

        let events = self.relocate_robber(colour, hex, victim)?;
        self.phase = GamePhase::MainPhase;
        Ok(events)
    }

    fn check_robber_target(
        &self,
        thief: Colour,
        hex: HexIndex,
        victim: Option<Colour>,
    ) -> Result<(), RobberError> {
        if hex >= HEX_COUNT {
            return Err(RobberError::OutOfRange(hex));
        }
        if hex == self.board.robber_pos() {
            return Err(RobberError::SameHexAsCurrent);
        }
        if let Some(victim) = victim {
            if victim == thief {
                return Err(RobberError::SelfSteal);
            }
            if !self.board.colours_adjacent_to_hex(hex).contains(&victim) {
                return Err(RobberError::VictimNotAdjacent(victim));
            }
        }
        Ok(())
    }

    fn relocate_robber(
        &mut self,
        thief: Colour,
        hex: HexIndex,
        victim: Option<Colour>,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.check_robber_target(thief, hex, victim)?;
        let thief_index = self.index_of(thief)?;
        let victim_index = victim.map(|v| self.index_of(v)).transpose()?;

        let from = self.board.robber_pos();
        self.board.set_robber_pos(hex)?;
        debug!(?thief, from, to = hex, "robber moved");

        let mut events = vec![GameEvent::RobberMoved {
            player: thief,
            from,
            to: hex,
        }];

        if let (Some(victim), Some(index)) = (victim, victim_index) {
            let stolen = self.players[index].hand.steal_random(&mut self.rng);
            if let Some(resource) = stolen {
                self.players[thief_index].hand.add(resource, 1);
            }
            events.push(GameEvent::ResourceStolen {
                thief,
                victim,
                resource: stolen,
            });
        }

        Ok(events)
    }

    // ==================== Actions ====================

    /// Apply a player's chosen action
    pub fn apply_action(&mut self, colour: Colour, action: Action) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_turn(colour)?;
        let allowed = match action {
            // Knights may be played before rolling
            Action::UseKnight { .. } => matches!(self.phase, GamePhase::PreRoll | GamePhase::MainPhase),
            _ => self.phase == GamePhase::MainPhase,
        };
        if !allowed {
            return Err(GameError::InvalidPhase);
        }

        let index = self.current_index();
        let mut events = Vec::new();

        match action {
            Action::EndTurn => {
                self.players[index].end_turn();

                let next_player = self.players[(index + 1) % self.player_count()].colour;
                self.current_player = next_player;
                self.turn_number += 1;
                self.dice_roll = None;
                self.development_card_played = false;
                self.phase = GamePhase::PreRoll;

                events.push(GameEvent::TurnEnded {
                    player: colour,
                    next_player,
                });
                // Points gained off-turn count as soon as the turn starts
                events.extend(self.check_win_condition());
                return Ok(events);
            }

            // ==================== Building ====================
            Action::BuildSettlement(vertex) => {
                let hand = self.players[index].hand;
                self.board.place_settlement(colour, Some(&hand), vertex, true)?;
                self.players[index].hand.subtract(&costs::settlement());
                debug!(?colour, vertex, "settlement built");

                events.push(GameEvent::SettlementBuilt {
                    player: colour,
                    vertex,
                });
                // Building can break an opponent's longest road
                events.extend(self.check_longest_road());
            }

            Action::BuildCity(vertex) => {
                let hand = self.players[index].hand;
                self.board.place_city(colour, Some(&hand), vertex)?;
                self.players[index].hand.subtract(&costs::city());
                debug!(?colour, vertex, "city built");

                events.push(GameEvent::CityBuilt {
                    player: colour,
                    vertex,
                });
            }

            Action::BuildRoad(edge) => {
                let hand = self.players[index].hand;
                self.board.place_road(colour, Some(&hand), edge)?;
                self.players[index].hand.subtract(&costs::road());
                debug!(?colour, edge, "road built");

                events.push(GameEvent::RoadBuilt {
                    player: colour,
                    edge,
                });
                events.extend(self.check_longest_road());
            }

            Action::BuyDevCard => {
                let cost = costs::development_card();
                if !self.players[index].hand.can_afford(&cost) {
                    return Err(GameError::CannotAfford);
                }

                match self.board.draw_development_card() {
                    Some(card) => {
                        let player = &mut self.players[index];
                        player.hand.subtract(&cost);
                        player.bought_this_turn.push(card);
                        debug!(?colour, ?card, "development card bought");
                        events.push(GameEvent::DevelopmentCardPurchased {
                            player: colour,
                            card: Some(card),
                        });
                    }
                    None => {
                        debug!(?colour, "development pile is empty");
                        events.push(GameEvent::DevelopmentCardUnavailable { player: colour });
                    }
                }
            }

            // ==================== Development Cards ====================
            Action::UseKnight { hex, victim } => {
                check_playable(&self.players[index], DevelopmentCard::Knight, self.development_card_played)?;
                let robbery = self.relocate_robber(colour, hex, victim)?;

                let player = &mut self.players[index];
                player.remove_card(DevelopmentCard::Knight);
                player.knights_played += 1;
                self.development_card_played = true;

                events.push(GameEvent::KnightPlayed { player: colour });
                events.extend(robbery);
                events.extend(self.check_largest_army());
            }

            Action::UseYearOfPlenty(first, second) => {
                if !first.is_card() || !second.is_card() {
                    return Err(DevelopmentCardError::InvalidArguments.into());
                }
                check_playable(
                    &self.players[index],
                    DevelopmentCard::YearOfPlenty,
                    self.development_card_played,
                )?;

                let player = &mut self.players[index];
                player.remove_card(DevelopmentCard::YearOfPlenty);
                player.hand.add(first, 1);
                player.hand.add(second, 1);
                self.development_card_played = true;

                events.push(GameEvent::YearOfPlentyPlayed {
                    player: colour,
                    resources: (first, second),
                });
            }

            Action::UseRoadBuilding(first, second) => {
                check_playable(
                    &self.players[index],
                    DevelopmentCard::RoadBuilding,
                    self.development_card_played,
                )?;

                self.board.place_road(colour, None, first)?;
                if let Err(err) = self.board.place_road(colour, None, second) {
                    self.board.remove_road(colour, first)?;
                    return Err(err.into());
                }

                self.players[index].remove_card(DevelopmentCard::RoadBuilding);
                self.development_card_played = true;

                events.push(GameEvent::RoadBuildingPlayed {
                    player: colour,
                    edges: (first, second),
                });
                events.extend(self.check_longest_road());
            }

            Action::UseMonopoly(resource) => {
                if !resource.is_card() {
                    return Err(DevelopmentCardError::InvalidArguments.into());
                }
                check_playable(&self.players[index], DevelopmentCard::Monopoly, self.development_card_played)?;

                self.players[index].remove_card(DevelopmentCard::Monopoly);
                self.development_card_played = true;

                // Take all of that resource from other players
                let mut total_stolen = 0;
                for other in self.players.iter_mut().filter(|p| p.colour != colour) {
                    total_stolen += other.hand.take_all(resource);
                }
                self.players[index].hand.add(resource, total_stolen);

                events.push(GameEvent::MonopolyPlayed {
                    player: colour,
                    resource,
                    total_stolen,
                });
            }

            // ==================== Trading ====================
            Action::Trade { give, receive } => {
                if !give.is_card() || !receive.is_card() || give == receive {
                    return Err(TradeError::InvalidResource { give, receive }.into());
                }

                let rate = self.trade_rate(colour, give);
                let player = &mut self.players[index];
                let held = player.hand.get(give);
                if held < rate {
                    return Err(TradeError::CannotAfford { needed: rate, held }.into());
                }

                player.hand.set(give, held - rate);
                player.hand.add(receive, 1);

                events.push(GameEvent::Traded {
                    player: colour,
                    gave: give,
                    gave_count: rate,
                    received: receive,
                });
            }
        }

        events.extend(self.check_win_condition());
        Ok(events)
    }

    // ==================== Awards ====================

    fn check_longest_road(&mut self) -> Vec<GameEvent> {
        let mut longest_length = 0;
        let mut longest_players: Vec<Colour> = Vec::new();

        for player in &self.players {
            let length = self.board.longest_road(player.colour);
            if length >= MIN_LONGEST_ROAD {
                if length > longest_length {
                    longest_length = length;
                    longest_players = vec![player.colour];
                } else if length == longest_length {
                    longest_players.push(player.colour);
                }
            }
        }

        let current_holder = self.players.iter().find(|p| p.has_longest_road).map(|p| p.colour);

        let new_holder = match (longest_players.as_slice(), current_holder) {
            ([single], _) => Some(*single),
            // Ties keep the current holder
            (tied, Some(holder)) if tied.contains(&holder) => Some(holder),
            // Nobody qualifies, or several tie without the holder among them
            _ => None,
        };

        if new_holder == current_holder {
            return Vec::new();
        }

        for player in &mut self.players {
            player.has_longest_road = Some(player.colour) == new_holder;
        }
        debug!(previous = ?current_holder, current = ?new_holder, longest_length, "longest road changed");

        vec![GameEvent::LongestRoadChanged {
            previous: current_holder,
            current: new_holder,
            length: longest_length,
        }]
    }

    fn check_largest_army(&mut self) -> Vec<GameEvent> {
        let current_holder = self.players.iter().find(|p| p.has_largest_army).map(|p| p.colour);
        let holder_knights = current_holder
            .and_then(|c| self.get_player(c))
            .map_or(0, |p| p.knights_played);

        // Strictly more than the holder (and at least the minimum) takes it
        let challenger = self
            .players
            .iter()
            .filter(|p| p.knights_played >= MIN_LARGEST_ARMY && p.knights_played > holder_knights)
            .max_by_key(|p| p.knights_played)
            .map(|p| (p.colour, p.knights_played));

        let Some((leader, knights)) = challenger else {
            return Vec::new();
        };

        for player in &mut self.players {
            player.has_largest_army = player.colour == leader;
        }
        debug!(previous = ?current_holder, current = ?leader, knights, "largest army changed");

        vec![GameEvent::LargestArmyChanged {
            previous: current_holder,
            current: Some(leader),
            knights,
        }]
    }

    /// Only the player whose turn it is can win. Checked after every action
    /// and again when a turn is handed over.
    fn check_win_condition(&mut self) -> Vec<GameEvent> {
        let winner = self.current_player;
        let victory_points = self.victory_points(winner);
        if victory_points < self.config.victory_points_to_win {
            return Vec::new();
        }

        self.phase = GamePhase::Finished { winner };
        info!(?winner, victory_points, turn = self.turn_number, "game won");

        vec![GameEvent::GameWon {
            player: winner,
            victory_points,
        }]
    }
}
