//! Integration tests for the settlers engine.
//!
//! These exercise the public API from board construction through complete
//! self-play games.

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use settlers_core::*;

fn seeded_board(seed: u64) -> Board {
    Board::standard_with_rng(&mut StdRng::seed_from_u64(seed))
}

/// A seeded board with the desert (and so the robber) moved to `hex`
fn board_with_desert_at(hex: HexIndex) -> Board {
    let mut layout = seeded_board(3).encode();
    let desert = layout
        .resources
        .iter()
        .position(|h| h.resource == Resource::Desert)
        .unwrap();
    layout.resources.swap(desert, hex);
    Board::from_layout_with_rng(&layout, &mut StdRng::seed_from_u64(3)).unwrap()
}

#[test]
fn test_board_dimensions() {
    let board = seeded_board(1);
    assert_eq!(board.hexes().len(), HEX_COUNT);
    assert_eq!(board.vertices().len(), VERTEX_COUNT);
    assert_eq!(board.edges().len(), EDGE_COUNT);
    assert_eq!(board.hexes().iter().filter(|h| h.has_robber).count(), 1);

    // Adjacency is symmetric
    for v in 0..VERTEX_COUNT {
        for n in board.neighbour_vertices(v) {
            assert!(board.neighbour_vertices(n).any(|back| back == v));
        }
    }
}

#[test]
fn test_settlement_and_distance_rule() {
    let mut board = seeded_board(2);

    board.place_settlement(Colour::Red, None, 0, false).unwrap();
    let edge = board.vertex_edges(0).next().unwrap();
    board.place_road(Colour::Red, None, edge).unwrap();

    // Vertex 1 is one edge away from vertex 0
    assert_eq!(
        board.check_settlement(Colour::Blue, None, 1, false),
        Err(PlacementError::TooCloseToAnotherBuilding)
    );
    for n in board.neighbour_vertices(0) {
        assert!(board.vertices()[n].structure.is_empty());
    }
}

#[test]
fn test_sixteenth_road_hits_the_limit() {
    let mut board = seeded_board(4);
    board.place_settlement(Colour::Red, None, 0, false).unwrap();

    for _ in 0..15 {
        let edge = (0..EDGE_COUNT)
            .find(|&e| board.can_place(BuildingKind::Road, Colour::Red, None, e, true))
            .expect("the network always has a free edge to grow into");
        board.place_road(Colour::Red, None, edge).unwrap();
    }
    assert_eq!(board.count(Structure::new(Colour::Red, BuildingKind::Road)), 15);

    let free = (0..EDGE_COUNT)
        .find(|&e| board.edges()[e].structure.is_empty())
        .unwrap();
    assert_eq!(
        board.place_road(Colour::Red, None, free),
        Err(PlacementError::UnitLimitReached)
    );
}

#[test]
fn test_can_place_leaves_the_board_alone() {
    let mut board = seeded_board(5);
    board.place_settlement(Colour::Red, None, 10, false).unwrap();
    let before_layout = board.encode();
    let before_vertices = board.vertices().to_vec();
    let before_edges = board.edges().to_vec();

    let hand = ResourceHand::with_amounts(5, 5, 5, 5, 5);
    for kind in [BuildingKind::Settlement, BuildingKind::City, BuildingKind::Road] {
        for position in 0..EDGE_COUNT + 2 {
            let _ = board.can_place(kind, Colour::Red, Some(&hand), position, true);
            let _ = board.can_place(kind, Colour::Blue, None, position, false);
        }
    }

    assert_eq!(board.encode(), before_layout);
    assert_eq!(board.vertices(), before_vertices.as_slice());
    assert_eq!(board.edges(), before_edges.as_slice());
}

#[test]
fn test_robber_must_move() {
    let mut board = board_with_desert_at(5);
    assert_eq!(board.robber_pos(), 5);

    assert_eq!(board.set_robber_pos(5), Err(RobberError::SameHexAsCurrent));
    assert_eq!(board.set_robber_pos(20), Err(RobberError::OutOfRange(20)));
    assert_eq!(board.robber_pos(), 5);

    board.set_robber_pos(0).unwrap();
    assert_eq!(board.robber_pos(), 0);
}

#[test]
fn test_production_counts_settlements_and_cities() {
    let mut board = seeded_board(6);
    let hex = (0..HEX_COUNT)
        .find(|&h| {
            let hex = &board.hexes()[h];
            hex.resource.is_card() && !hex.has_robber
        })
        .unwrap();
    let (resource, value) = (board.hexes()[hex].resource, board.hexes()[hex].dice_value);
    let corner = board.hexes()[hex].verts[0];

    // Other hexes around the corner may share the number
    let matching = board
        .hexes_at_vertex(corner)
        .filter(|&h| {
            let other = &board.hexes()[h];
            other.resource == resource && other.dice_value == value && !other.has_robber
        })
        .count() as u32;

    board.place_settlement(Colour::White, None, corner, false).unwrap();
    let produced = board.get_resources(value);
    assert_eq!(produced[&Colour::White].get(resource), matching);

    board.place_city(Colour::White, None, corner).unwrap();
    let produced = board.get_resources(value);
    assert_eq!(produced[&Colour::White].get(resource), 2 * matching);

    assert!(board.get_resources(7).is_empty());
}

#[test]
fn test_monopoly_against_two_opponents() {
    let mut game = Game::new(3, GameConfig::default().with_seed(8)).unwrap();
    game.phase = GamePhase::MainPhase;
    game.turn_number = 1;
    game.players[0].development_cards.push(DevelopmentCard::Monopoly);
    game.players[0].hand = ResourceHand::single(Resource::Brick, 1);
    game.players[1].hand = ResourceHand::with_amounts(2, 0, 0, 1, 0);
    game.players[2].hand = ResourceHand::with_amounts(3, 2, 0, 0, 0);

    game.apply_action(Colour::Red, Action::UseMonopoly(Resource::Wood)).unwrap();

    assert_eq!(game.players[0].hand, ResourceHand::with_amounts(5, 0, 1, 0, 0));
    assert_eq!(game.players[1].hand, ResourceHand::with_amounts(0, 0, 0, 1, 0));
    assert_eq!(game.players[2].hand, ResourceHand::with_amounts(0, 2, 0, 0, 0));
}

#[test]
fn test_longest_road_blocked_by_opponent() {
    let mut board = seeded_board(9);
    // Chain 6-7-8-9-1-2
    board.place_settlement(Colour::Red, None, 6, false).unwrap();
    for edge in [12, 13, 14, 7, 1] {
        board.place_road(Colour::Red, None, edge).unwrap();
    }
    assert_eq!(board.longest_road(Colour::Red), 5);

    // Blue settles on vertex 9 and cuts the chain into 3 + 2
    board.place_settlement(Colour::Blue, None, 9, false).unwrap();
    assert_eq!(board.longest_road(Colour::Red), 3);
    assert_eq!(board.longest_road(Colour::Blue), 0);
}

#[test]
fn test_view_hides_the_pile() {
    let game = Game::new(4, GameConfig::default().with_seed(10)).unwrap();
    let view = game.view(Colour::Blue).unwrap();

    assert_eq!(view.board.development_cards().len(), 25);
    assert!(view.board.development_cards().iter().all(Option::is_none));
    assert!(game.board.development_cards().iter().all(Option::is_some));
}

#[test]
fn test_layout_round_trip() {
    let board = seeded_board(11);
    let json = board.encode().to_json().unwrap();
    let decoded = Board::from_layout(&Layout::from_json(&json).unwrap()).unwrap();

    assert_eq!(decoded.encode(), board.encode());
    assert_eq!(decoded.robber_pos(), board.robber_pos());
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let kinds = [StrategyKind::Greedy, StrategyKind::Random, StrategyKind::Greedy];
    let run = || {
        let config = GameConfig::default().with_seed(42);
        let mut session = Session::with_strategies(config, &kinds).unwrap();
        let summary = session.play().unwrap();
        (summary, session.game().board.encode())
    };

    assert_eq!(run(), run());
}

#[test]
fn test_self_play_terminates() {
    for seed in 0..4 {
        let config = GameConfig {
            max_turns: 300,
            ..GameConfig::default().with_seed(seed)
        };
        let kinds = [StrategyKind::Greedy, StrategyKind::Greedy, StrategyKind::Random, StrategyKind::Random];
        let mut session = Session::with_strategies(config, &kinds).unwrap();
        let summary = session.play().unwrap();

        match summary.winner {
            Some(winner) => {
                assert!(session.game().is_finished());
                assert!(session.game().victory_points(winner) >= 10);
            }
            None => assert!(summary.turns > 300),
        }
    }
}

#[test]
fn test_self_play_keeps_the_board_legal() {
    use settlers_core::placement::{MAX_CITIES, MAX_ROADS, MAX_SETTLEMENTS};

    for seed in 10..14 {
        let config = GameConfig {
            max_turns: 200,
            ..GameConfig::default().with_seed(seed)
        };
        let kinds = [StrategyKind::Greedy, StrategyKind::Random, StrategyKind::Greedy, StrategyKind::Random];
        let mut session = Session::with_strategies(config, &kinds).unwrap();
        session.play().unwrap();
        let board = &session.game().board;

        for (index, vertex) in board.vertices().iter().enumerate() {
            if vertex.structure.is_empty() {
                continue;
            }
            for neighbour in board.neighbour_vertices(index) {
                assert!(
                    board.vertex(neighbour).unwrap().structure.is_empty(),
                    "seed {seed}: buildings at {index} and {neighbour}"
                );
            }
        }

        let robbers: Vec<HexIndex> = board
            .hexes()
            .iter()
            .enumerate()
            .filter(|(_, hex)| hex.has_robber)
            .map(|(index, _)| index)
            .collect();
        assert_eq!(robbers, vec![board.robber_pos()]);

        for colour in Colour::PLAYERS {
            assert!(board.count(Structure::new(colour, BuildingKind::Settlement)) <= MAX_SETTLEMENTS);
            assert!(board.count(Structure::new(colour, BuildingKind::City)) <= MAX_CITIES);
            assert!(board.count(Structure::new(colour, BuildingKind::Road)) <= MAX_ROADS);
        }

        // Every road touches its owner's building or another of its roads
        for (index, edge) in board.edges().iter().enumerate() {
            if edge.structure.is_empty() {
                continue;
            }
            let owner = edge.structure.owner;
            let connected = edge.verts.iter().any(|&vertex| {
                board.vertex(vertex).unwrap().structure.owner == owner
                    || board
                        .vertex_edges(vertex)
                        .any(|other| other != index && board.edge(other).unwrap().structure.owner == owner)
            });
            assert!(connected, "seed {seed}: road {index} is isolated");
        }
    }
}
