//! Decision strategies that play a seat.
//!
//! This module provides:
//! - The `Strategy` trait every seat is driven through
//! - Helpers enumerating legal choices from a `GameView`
//! - Random: uniformly chosen legal moves
//! - Greedy: dice-probability heuristics (cities, then settlements, then cards)

use crate::actions::{Action, GameEvent};
use crate::board::{Board, BuildingKind, Colour, Resource};
use crate::game::{GameError, GameView};
use crate::player::{costs, DevelopmentCard, ResourceHand};
use crate::topology::{EdgeIndex, HexIndex, VertexIndex, EDGE_COUNT, HEX_COUNT, VERTEX_COUNT};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A player's decision maker. Calls are synchronous and receive a masked view.
pub trait Strategy {
    fn name(&self) -> &str;

    /// Settlement vertex and a road edge touching it
    fn initial_placement(&mut self, view: &GameView) -> (VertexIndex, EdgeIndex);

    /// One action for the main phase. Returning `EndTurn` ends the turn.
    fn choose_action(&mut self, view: &GameView) -> Action;

    /// Where the robber goes after a seven, and whom to rob
    fn place_robber(&mut self, view: &GameView) -> (HexIndex, Option<Colour>);

    /// Exactly `count` cards from the view's hand
    fn discard(&mut self, view: &GameView, count: u32) -> ResourceHand;

    /// Another player's action succeeded
    fn on_opponent_action(&mut self, _event: &GameEvent, _board: &Board) {}

    /// The engine refused our last choice
    fn on_rejected(&mut self, _action: &Action, _error: &GameError) {}
}

/// Built-in strategy kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Random,
    Greedy,
}

impl StrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Greedy => "greedy",
        }
    }

    pub fn build(self, seed: Option<u64>) -> Box<dyn Strategy + Send> {
        match self {
            StrategyKind::Random => Box::new(RandomStrategy::new(seed)),
            StrategyKind::Greedy => Box::new(GreedyStrategy::new(seed)),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(StrategyKind::Random),
            "greedy" => Ok(StrategyKind::Greedy),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

// ==================== Legal Choices ====================

/// Every (settlement, road) pair allowed during setup
pub fn legal_initial_placements(view: &GameView) -> Vec<(VertexIndex, EdgeIndex)> {
    let board = &view.board;
    (0..VERTEX_COUNT)
        .filter(|&v| board.check_settlement(view.colour, None, v, false).is_ok())
        .flat_map(move |v| {
            board
                .vertex_edges(v)
                .filter(move |&e| board.edges()[e].structure.is_empty())
                .map(move |e| (v, e))
        })
        .collect()
}

/// Hexes the robber may move to
pub fn legal_robber_targets(view: &GameView) -> Vec<HexIndex> {
    let robber = view.board.robber_pos();
    (0..HEX_COUNT).filter(|&h| h != robber).collect()
}

/// Opponents with a building on `hex`
pub fn robbable_opponents(view: &GameView, hex: HexIndex) -> Vec<Colour> {
    view.board
        .colours_adjacent_to_hex(hex)
        .into_iter()
        .filter(|&c| c != view.colour)
        .collect()
}

/// The opponent on `hex` holding the most cards
fn richest_victim(view: &GameView, hex: HexIndex) -> Option<Colour> {
    robbable_opponents(view, hex)
        .into_iter()
        .max_by_key(|&c| view.opponent(c).map_or(0, |o| o.card_count))
}

/// Every main-phase action the engine would accept right now, `EndTurn` first
pub fn legal_actions(view: &GameView) -> Vec<Action> {
    let board = &view.board;
    let colour = view.colour;
    let hand = view.hand();
    let mut actions = vec![Action::EndTurn];

    for edge in 0..EDGE_COUNT {
        if board.can_place(BuildingKind::Road, colour, Some(hand), edge, true) {
            actions.push(Action::BuildRoad(edge));
        }
    }
    for vertex in 0..VERTEX_COUNT {
        if board.can_place(BuildingKind::Settlement, colour, Some(hand), vertex, true) {
            actions.push(Action::BuildSettlement(vertex));
        }
        if board.can_place(BuildingKind::City, colour, Some(hand), vertex, false) {
            actions.push(Action::BuildCity(vertex));
        }
    }

    if hand.can_afford(&costs::development_card()) && board.development_cards_remaining() > 0 {
        actions.push(Action::BuyDevCard);
    }

    if view.can_play(DevelopmentCard::Knight).is_ok() {
        for hex in legal_robber_targets(view) {
            actions.push(Action::UseKnight {
                hex,
                victim: richest_victim(view, hex),
            });
        }
    }
    if view.can_play(DevelopmentCard::YearOfPlenty).is_ok() {
        for (i, first) in Resource::CARDS.into_iter().enumerate() {
            for second in Resource::CARDS.into_iter().skip(i) {
                actions.push(Action::UseYearOfPlenty(first, second));
            }
        }
    }
    if view.can_play(DevelopmentCard::Monopoly).is_ok() {
        actions.extend(Resource::CARDS.into_iter().map(Action::UseMonopoly));
    }
    if view.can_play(DevelopmentCard::RoadBuilding).is_ok() {
        actions.extend(road_building_pairs(board, colour));
    }

    for give in Resource::CARDS {
        if hand.get(give) >= view.trade_rate(give) {
            for receive in Resource::CARDS.into_iter().filter(|r| *r != give) {
                actions.push(Action::Trade { give, receive });
            }
        }
    }

    actions
}

/// Pairs of free roads where the second may build on the first
fn road_building_pairs(board: &Board, colour: Colour) -> Vec<Action> {
    let mut pairs = Vec::new();
    for first in 0..EDGE_COUNT {
        if board.check_road(colour, None, first).is_err() {
            continue;
        }
        let mut probe = board.clone();
        if probe.place_road(colour, None, first).is_err() {
            continue;
        }
        for second in 0..EDGE_COUNT {
            if probe.check_road(colour, None, second).is_ok() {
                pairs.push(Action::UseRoadBuilding(first, second));
            }
        }
    }
    pairs
}

// ==================== Random ====================

/// Picks uniformly among legal choices
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: rng_from(seed) }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn initial_placement(&mut self, view: &GameView) -> (VertexIndex, EdgeIndex) {
        let options = legal_initial_placements(view);
        options.choose(&mut self.rng).copied().unwrap_or((0, 0))
    }

    fn choose_action(&mut self, view: &GameView) -> Action {
        let actions = legal_actions(view);
        actions.choose(&mut self.rng).copied().unwrap_or(Action::EndTurn)
    }

    fn place_robber(&mut self, view: &GameView) -> (HexIndex, Option<Colour>) {
        let targets = legal_robber_targets(view);
        let hex = targets.choose(&mut self.rng).copied().unwrap_or(0);
        let victim = robbable_opponents(view, hex).choose(&mut self.rng).copied();
        (hex, victim)
    }

    fn discard(&mut self, view: &GameView, count: u32) -> ResourceHand {
        let mut remaining = *view.hand();
        let mut discard = ResourceHand::new();
        for _ in 0..count {
            if let Some(resource) = remaining.steal_random(&mut self.rng) {
                discard.add(resource, 1);
            }
        }
        discard
    }
}

// ==================== Greedy ====================

/// Score a dice value by how often it rolls
/// 6 and 8 are most valuable, then 5/9, 4/10, 3/11, 2/12
pub fn pip_score(dice_value: u8) -> i32 {
    match dice_value {
        6 | 8 => 5,
        5 | 9 => 4,
        4 | 10 => 3,
        3 | 11 => 2,
        2 | 12 => 1,
        _ => 0,
    }
}

/// Production value of a vertex: pips of its producing, robber-free hexes
pub fn score_vertex(board: &Board, vertex: VertexIndex) -> i32 {
    board
        .hexes_at_vertex(vertex)
        .filter_map(|h| board.hex(h))
        .filter(|h| h.resource.is_card() && !h.has_robber)
        .map(|h| pip_score(h.dice_value))
        .sum()
}

/// Builds where production is best, buys cards when it can't
pub struct GreedyStrategy {
    rng: StdRng,
}

impl GreedyStrategy {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: rng_from(seed) }
    }

    /// Best-scoring vertex among `candidates`
    fn best_vertex(board: &Board, candidates: impl Iterator<Item = VertexIndex>) -> Option<VertexIndex> {
        candidates.max_by_key(|&v| (score_vertex(board, v), std::cmp::Reverse(v)))
    }

    /// Score robber placement: hurt opponents' best hexes, never our own
    fn score_robber_spot(view: &GameView, hex: HexIndex) -> i32 {
        let Some(tile) = view.board.hex(hex) else {
            return -100;
        };

        // Prefer high-value tiles
        let mut score = 2 * pip_score(tile.dice_value) * (tile.resource.is_card() as i32);
        for colour in view.board.colours_adjacent_to_hex(hex) {
            if colour == view.colour {
                score -= 20; // Don't hurt ourselves
            } else {
                score += 5;
            }
        }
        score
    }

    /// A road heading for the best free settlement spot
    fn expansion_road(&self, view: &GameView, actions: &[Action]) -> Option<Action> {
        let board = &view.board;
        actions
            .iter()
            .filter_map(|a| match a {
                Action::BuildRoad(edge) => Some(*edge),
                _ => None,
            })
            .max_by_key(|&edge| {
                board.edges()[edge]
                    .verts
                    .iter()
                    .filter(|&&v| board.check_settlement(view.colour, None, v, false).is_ok())
                    .map(|&v| score_vertex(board, v))
                    .max()
                    .unwrap_or(0)
            })
            .map(Action::BuildRoad)
    }

    /// Trade a surplus for a resource we hold none of
    fn surplus_trade(view: &GameView) -> Option<Action> {
        let hand = view.hand();
        let receive = Resource::CARDS.into_iter().find(|r| hand.get(*r) == 0)?;
        let give = Resource::CARDS
            .into_iter()
            .filter(|r| hand.get(*r) > view.trade_rate(*r))
            .max_by_key(|r| hand.get(*r))?;
        Some(Action::Trade { give, receive })
    }

    /// Whether the robber is sitting on one of our hexes
    fn robbed(view: &GameView) -> bool {
        view.board
            .colours_adjacent_to_hex(view.board.robber_pos())
            .contains(&view.colour)
    }
}

impl Strategy for GreedyStrategy {
    fn name(&self) -> &str {
        "greedy"
    }

    fn initial_placement(&mut self, view: &GameView) -> (VertexIndex, EdgeIndex) {
        let board = &view.board;
        let spots = (0..VERTEX_COUNT).filter(|&v| board.check_settlement(view.colour, None, v, false).is_ok());
        let Some(vertex) = Self::best_vertex(board, spots) else {
            return (0, 0);
        };

        // Point the road at the best spot two steps away
        let edge = board
            .vertex_edges(vertex)
            .filter(|&e| board.edges()[e].structure.is_empty())
            .max_by_key(|&e| {
                let far = board.edges()[e].other_end(vertex);
                board
                    .neighbour_vertices(far)
                    .filter(|&v| v != vertex)
                    .map(|v| score_vertex(board, v))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);

        (vertex, edge)
    }

    fn choose_action(&mut self, view: &GameView) -> Action {
        let actions = legal_actions(view);
        let board = &view.board;

        // Cities first: they double a spot we already chose
        let cities = actions.iter().filter_map(|a| match a {
            Action::BuildCity(v) => Some(*v),
            _ => None,
        });
        if let Some(vertex) = Self::best_vertex(board, cities) {
            return Action::BuildCity(vertex);
        }

        let settlements = actions.iter().filter_map(|a| match a {
            Action::BuildSettlement(v) => Some(*v),
            _ => None,
        });
        if let Some(vertex) = Self::best_vertex(board, settlements) {
            return Action::BuildSettlement(vertex);
        }

        // Chase the robber off our own hex
        if Self::robbed(view) {
            let knight = actions
                .iter()
                .filter(|a| matches!(a, Action::UseKnight { .. }))
                .max_by_key(|a| match a {
                    Action::UseKnight { hex, .. } => Self::score_robber_spot(view, *hex),
                    _ => i32::MIN,
                });
            if let Some(action) = knight {
                return *action;
            }
        }

        if let Some(action) = actions.iter().find(|a| {
            matches!(a, Action::UseRoadBuilding(..) | Action::UseMonopoly(_) | Action::UseYearOfPlenty(..))
        }) {
            return *action;
        }

        if actions.contains(&Action::BuyDevCard) {
            return Action::BuyDevCard;
        }

        // Build roads with 30% chance
        if self.rng.gen_bool(0.3) {
            if let Some(action) = self.expansion_road(view, &actions) {
                return action;
            }
        }

        Self::surplus_trade(view).unwrap_or(Action::EndTurn)
    }

    fn place_robber(&mut self, view: &GameView) -> (HexIndex, Option<Colour>) {
        let hex = legal_robber_targets(view)
            .into_iter()
            .max_by_key(|&h| Self::score_robber_spot(view, h))
            .unwrap_or(0);
        (hex, richest_victim(view, hex))
    }

    /// Discard resources we have the most of
    fn discard(&mut self, view: &GameView, count: u32) -> ResourceHand {
        let mut remaining = *view.hand();
        let mut discard = ResourceHand::new();

        for _ in 0..count {
            let Some((resource, held)) = remaining.iter().max_by_key(|(_, held)| *held) else {
                break;
            };
            if held == 0 {
                break;
            }
            remaining.set(resource, held - 1);
            discard.add(resource, 1);
        }

        discard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Game, GamePhase};

    fn game() -> Game {
        Game::new(3, GameConfig::default().with_seed(31)).unwrap()
    }

    #[test]
    fn test_strategy_kind_parses() {
        assert_eq!("Greedy".parse::<StrategyKind>(), Ok(StrategyKind::Greedy));
        assert_eq!(" random ".parse::<StrategyKind>(), Ok(StrategyKind::Random));
        assert!("minimax".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_initial_placements_are_accepted() {
        let mut game = game();
        let mut strategies = [StrategyKind::Random.build(Some(1)), StrategyKind::Greedy.build(Some(2))];

        for (turn, colour) in game.setup_order().into_iter().enumerate() {
            let view = game.view(colour).unwrap();
            let (vertex, edge) = strategies[turn % 2].initial_placement(&view);
            game.place_initial(colour, vertex, edge).unwrap();
        }
        assert_eq!(game.phase, GamePhase::PreRoll);
    }

    #[test]
    fn test_legal_actions_are_accepted() {
        let mut game = game();
        game.phase = GamePhase::MainPhase;
        game.board.place_settlement(Colour::Red, None, 0, false).unwrap();
        game.board.place_road(Colour::Red, None, 0).unwrap();
        game.players[0].hand = ResourceHand::with_amounts(4, 4, 4, 4, 4);
        game.players[0].development_cards.push(DevelopmentCard::RoadBuilding);

        let view = game.view(Colour::Red).unwrap();
        let actions = legal_actions(&view);
        assert_eq!(actions[0], Action::EndTurn);
        assert!(actions.contains(&Action::BuildCity(0)));
        assert!(actions.contains(&Action::BuyDevCard));
        assert!(actions.iter().any(|a| matches!(a, Action::UseRoadBuilding(..))));

        for action in actions.into_iter().filter(|a| *a != Action::EndTurn) {
            let mut probe = game.clone();
            assert!(
                probe.apply_action(Colour::Red, action).is_ok(),
                "{:?} should be accepted",
                action
            );
        }
    }

    #[test]
    fn test_greedy_prefers_city() {
        let mut game = game();
        game.phase = GamePhase::MainPhase;
        game.board.place_settlement(Colour::Red, None, 0, false).unwrap();
        game.players[0].hand = costs::city();

        let view = game.view(Colour::Red).unwrap();
        let mut greedy = GreedyStrategy::new(Some(3));
        assert_eq!(greedy.choose_action(&view), Action::BuildCity(0));
    }

    #[test]
    fn test_greedy_discards_from_largest_pile() {
        let mut game = game();
        game.players[0].hand = ResourceHand::with_amounts(6, 1, 0, 2, 0);
        let view = game.view(Colour::Red).unwrap();

        let discard = GreedyStrategy::new(Some(4)).discard(&view, 4);
        assert_eq!(discard, ResourceHand::with_amounts(4, 0, 0, 0, 0));
    }

    #[test]
    fn test_random_discard_is_a_sub_hand() {
        let mut game = game();
        game.players[1].hand = ResourceHand::with_amounts(3, 0, 2, 2, 3);
        let view = game.view(Colour::Orange).unwrap();

        let discard = RandomStrategy::new(Some(8)).discard(&view, 5);
        assert_eq!(discard.total(), 5);
        assert!(view.hand().contains(&discard));
    }

    #[test]
    fn test_robber_placement_avoids_own_hexes() {
        let mut game = game();
        let robber = game.board.robber_pos();
        let own = (robber + 1) % HEX_COUNT;
        let corner = game.board.hex(own).unwrap().verts[0];
        game.board.place_settlement(Colour::Red, None, corner, false).unwrap();

        let view = game.view(Colour::Red).unwrap();
        let (hex, victim) = GreedyStrategy::new(None).place_robber(&view);
        assert_ne!(hex, robber);
        assert_ne!(hex, own);
        assert_ne!(victim, Some(Colour::Red));
    }

    #[test]
    fn test_pip_score() {
        assert_eq!(pip_score(6), 5);
        assert_eq!(pip_score(12), 1);
        assert_eq!(pip_score(7), 0);
    }
}
