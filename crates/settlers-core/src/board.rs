//! Game board representation: hexes, vertices, edges and what is built on them.
//!
//! This module contains:
//! - Owner colours, resources and building kinds
//! - The `Hex`, `Vertex` and `Edge` arena entries
//! - Board construction (random layout), production, robber and longest road
//!
//! Placement rules live in [`crate::placement`], the layout description in
//! [`crate::layout`].

use crate::player::{DevelopmentCard, ResourceHand};
use crate::topology::{
    EdgeIndex, HexIndex, Topology, VertexIndex, EDGE_COUNT, FIRST_COASTAL_EDGE, HEX_COUNT,
    VERTEX_COUNT,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Dice total that moves the robber instead of producing
pub const ROBBER_ROLL: u8 = 7;

/// Dice value carried by the desert hex
pub const DESERT_DICE_VALUE: u8 = 7;

/// Dice chits in the order of the letters printed on their backs
const CHIT_SEQUENCE: [u8; 18] = [5, 2, 6, 3, 8, 10, 9, 12, 11, 4, 8, 10, 9, 4, 5, 6, 3, 11];

/// Gaps (in coastal edges) between consecutive ports
const PORT_GAPS: [usize; 9] = [2, 2, 3, 2, 2, 3, 2, 3, 2];

/// Who owns a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Colour {
    /// Placeholder for unowned slots
    #[default]
    None,
    Red,
    Orange,
    Blue,
    White,
}

impl Colour {
    /// Seating order of the four player colours
    pub const PLAYERS: [Colour; 4] = [Colour::Red, Colour::Orange, Colour::Blue, Colour::White];

    /// Whether this is a seated player rather than the unowned placeholder
    pub fn is_player(self) -> bool {
        self != Colour::None
    }
}

/// Resource types, also used to label hexes and ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resource {
    /// No production. Marks the robber's home and the generic 3:1 port
    Desert,
    Wood,
    Wool,
    Brick,
    Ore,
    Grain,
}

impl Resource {
    /// Every resource, desert included
    pub const ALL: [Resource; 6] = [
        Resource::Desert,
        Resource::Wood,
        Resource::Wool,
        Resource::Brick,
        Resource::Ore,
        Resource::Grain,
    ];

    /// The five resources that exist as cards
    pub const CARDS: [Resource; 5] = [
        Resource::Wood,
        Resource::Wool,
        Resource::Brick,
        Resource::Ore,
        Resource::Grain,
    ];

    /// Whether this resource can be held in a hand
    pub fn is_card(self) -> bool {
        self != Resource::Desert
    }
}

/// What a structure is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildingKind {
    #[default]
    Empty,
    Settlement,
    City,
    Road,
    /// Only used to classify affordability; never placed on the board
    DevelopmentCard,
}

impl BuildingKind {
    /// Resource multiplier for production
    pub fn resource_multiplier(self) -> u32 {
        match self {
            BuildingKind::Settlement => 1,
            BuildingKind::City => 2,
            _ => 0,
        }
    }

    /// Victory points for a building on the board
    pub fn victory_points(self) -> u32 {
        self.resource_multiplier()
    }
}

/// A building together with its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Structure {
    pub owner: Colour,
    pub kind: BuildingKind,
}

impl Structure {
    /// Nothing built
    pub const EMPTY: Structure = Structure {
        owner: Colour::None,
        kind: BuildingKind::Empty,
    };

    pub const fn new(owner: Colour, kind: BuildingKind) -> Self {
        Self { owner, kind }
    }

    pub fn is_empty(&self) -> bool {
        *self == Structure::EMPTY
    }

    /// Whether the structure belongs to a player other than `colour`
    pub fn is_owned_by_opponent_of(&self, colour: Colour) -> bool {
        self.owner.is_player() && self.owner != colour
    }
}

/// A harbour on a coastal edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    /// Desert means a generic 3:1 port
    pub resource: Resource,
}

impl Port {
    pub fn new(resource: Resource) -> Self {
        Self { resource }
    }

    /// Cards given per card received
    pub fn rate(&self) -> u32 {
        if self.resource.is_card() {
            2
        } else {
            3
        }
    }
}

/// A tile producing one resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hex {
    pub resource: Resource,
    /// 2-12, or 7 on the desert
    pub dice_value: u8,
    pub has_robber: bool,
    /// Neighbouring hexes: NE, E, SE, SW, W, NW
    pub hexes: [Option<HexIndex>; 6],
    /// Corners: N, NE, SE, S, SW, NW
    pub verts: [VertexIndex; 6],
}

/// A corner where settlements and cities are built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub structure: Structure,
    /// Edges leaving this vertex: N, NE, SE, S, SW, NW. At most three are set.
    pub edges: [Option<EdgeIndex>; 6],
}

/// A side where roads are built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Always `Empty` or a `Road`
    pub structure: Structure,
    pub port: Option<Port>,
    pub verts: [VertexIndex; 2],
}

impl Edge {
    /// The endpoint that isn't `vertex`
    pub fn other_end(&self, vertex: VertexIndex) -> VertexIndex {
        if self.verts[0] == vertex {
            self.verts[1]
        } else {
            self.verts[0]
        }
    }
}

/// Errors from moving the robber or choosing whom to rob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum RobberError {
    #[error("the robber must move to a different hex")]
    SameHexAsCurrent,

    #[error("hex {0} is not on the board")]
    OutOfRange(HexIndex),

    #[error("you cannot steal from yourself")]
    SelfSteal,

    #[error("{0:?} has no building next to the robber")]
    VictimNotAdjacent(Colour),
}

/// The complete game board
#[derive(Debug, Clone)]
pub struct Board {
    hexes: [Hex; HEX_COUNT],
    vertices: [Vertex; VERTEX_COUNT],
    edges: [Edge; EDGE_COUNT],
    /// Draw pile, top of the pile last. `None` entries only appear in masked copies.
    development_cards: Vec<Option<DevelopmentCard>>,
}

impl Board {
    /// Create the standard board with a random layout
    pub fn standard() -> Self {
        let mut rng = rand::thread_rng();
        Self::standard_with_rng(&mut rng)
    }

    /// Create the standard board with a provided RNG.
    /// This allows for deterministic board generation when needed.
    pub fn standard_with_rng<R: Rng>(rng: &mut R) -> Self {
        let mut board = Self::unassigned(rng);

        // 4 grain, 4 wool, 4 wood, 3 ore, 3 brick, 1 desert
        let mut resources: Vec<Resource> = [
            (Resource::Grain, 4),
            (Resource::Wool, 4),
            (Resource::Wood, 4),
            (Resource::Ore, 3),
            (Resource::Brick, 3),
            (Resource::Desert, 1),
        ]
        .into_iter()
        .flat_map(|(resource, count)| std::iter::repeat(resource).take(count))
        .collect();
        resources.shuffle(rng);

        for (hex, resource) in board.hexes.iter_mut().zip(resources) {
            hex.resource = resource;
            if resource == Resource::Desert {
                hex.dice_value = DESERT_DICE_VALUE;
                hex.has_robber = true;
            }
        }

        let producing = board.hexes.iter_mut().filter(|h| h.resource.is_card());
        for (hex, value) in producing.zip(CHIT_SEQUENCE) {
            hex.dice_value = value;
        }

        board.add_random_ports(rng);
        board
    }

    /// The bare graph with no resources, no robber and no ports
    pub(crate) fn unassigned<R: Rng>(rng: &mut R) -> Self {
        let topology = Topology::build();

        let mut deck = DevelopmentCard::standard_deck();
        DevelopmentCard::shuffle_deck(&mut deck, rng);

        Self {
            hexes: std::array::from_fn(|i| Hex {
                resource: Resource::Desert,
                dice_value: 0,
                has_robber: false,
                hexes: topology.hex_neighbours[i],
                verts: topology.hex_vertices[i],
            }),
            vertices: std::array::from_fn(|i| Vertex {
                structure: Structure::EMPTY,
                edges: topology.vertex_edges[i],
            }),
            edges: std::array::from_fn(|i| Edge {
                structure: Structure::EMPTY,
                port: None,
                verts: topology.edge_vertices[i],
            }),
            development_cards: deck.into_iter().map(Some).collect(),
        }
    }

    /// Spread nine ports around the coast with randomised gaps
    fn add_random_ports<R: Rng>(&mut self, rng: &mut R) {
        let mut resources = vec![
            Resource::Grain,
            Resource::Wool,
            Resource::Wood,
            Resource::Ore,
            Resource::Brick,
            Resource::Desert,
            Resource::Desert,
            Resource::Desert,
            Resource::Desert,
        ];
        resources.shuffle(rng);

        let mut gaps = PORT_GAPS;
        gaps.shuffle(rng);
        // Random offset from the start of the coastline
        gaps[0] -= rng.gen_range(0..=gaps[0]);

        let mut travelled = 0;
        for (i, (gap, resource)) in gaps.into_iter().zip(resources).enumerate() {
            travelled += gap;
            let position = FIRST_COASTAL_EDGE + travelled + i;
            self.edges[position].port = Some(Port::new(resource));
        }
    }

    // ==================== Query Methods ====================

    pub fn hexes(&self) -> &[Hex] {
        &self.hexes
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn hex(&self, index: HexIndex) -> Option<&Hex> {
        self.hexes.get(index)
    }

    pub fn vertex(&self, index: VertexIndex) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn edge(&self, index: EdgeIndex) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub(crate) fn hexes_mut(&mut self) -> &mut [Hex; HEX_COUNT] {
        &mut self.hexes
    }

    pub(crate) fn vertex_mut(&mut self, index: VertexIndex) -> &mut Vertex {
        &mut self.vertices[index]
    }

    pub(crate) fn edge_mut(&mut self, index: EdgeIndex) -> &mut Edge {
        &mut self.edges[index]
    }

    /// Edges touching a vertex
    pub fn vertex_edges(&self, vertex: VertexIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.vertices[vertex].edges.iter().flatten().copied()
    }

    /// Vertices exactly one edge away
    pub fn neighbour_vertices(&self, vertex: VertexIndex) -> impl Iterator<Item = VertexIndex> + '_ {
        self.vertex_edges(vertex)
            .map(move |edge| self.edges[edge].other_end(vertex))
    }

    /// Hexes that have `vertex` as a corner
    pub fn hexes_at_vertex(&self, vertex: VertexIndex) -> impl Iterator<Item = HexIndex> + '_ {
        self.hexes
            .iter()
            .enumerate()
            .filter(move |(_, hex)| hex.verts.contains(&vertex))
            .map(|(i, _)| i)
    }

    /// How many copies of `structure` are on the board
    pub fn count(&self, structure: Structure) -> usize {
        let on_vertices = self.vertices.iter().filter(|v| v.structure == structure).count();
        let on_edges = self.edges.iter().filter(|e| e.structure == structure).count();
        on_vertices + on_edges
    }

    /// The hex currently holding the robber
    pub fn robber_pos(&self) -> HexIndex {
        self.hexes
            .iter()
            .position(|hex| hex.has_robber)
            .expect("a board always holds exactly one robber")
    }

    /// Players with a settlement or city on a corner of `hex`
    pub fn colours_adjacent_to_hex(&self, hex: HexIndex) -> Vec<Colour> {
        let mut colours = Vec::new();
        if let Some(hex) = self.hexes.get(hex) {
            for vertex in hex.verts {
                let owner = self.vertices[vertex].structure.owner;
                if owner.is_player() && !colours.contains(&owner) {
                    colours.push(owner);
                }
            }
        }
        colours.sort();
        colours
    }

    /// Ports a player can trade through (building on either end of the port edge)
    pub fn ports_for(&self, colour: Colour) -> Vec<Port> {
        self.edges
            .iter()
            .filter_map(|edge| {
                let port = edge.port?;
                edge.verts
                    .iter()
                    .any(|v| self.vertices[*v].structure.owner == colour)
                    .then_some(port)
            })
            .collect()
    }

    /// Cards left in the development pile
    pub fn development_cards_remaining(&self) -> usize {
        self.development_cards.len()
    }

    /// The draw pile as seen by this copy of the board
    pub fn development_cards(&self) -> &[Option<DevelopmentCard>] {
        &self.development_cards
    }

    /// Take the top card of the pile. `None` when the pile is empty (or masked).
    pub fn draw_development_card(&mut self) -> Option<DevelopmentCard> {
        self.development_cards.pop().flatten()
    }

    /// A deep copy safe to hand to a strategy: the draw order is hidden
    pub fn masked(&self) -> Board {
        let mut copy = self.clone();
        copy.development_cards.iter_mut().for_each(|card| *card = None);
        copy
    }

    // ==================== Robber ====================

    /// Move the robber. It must leave its current hex.
    pub fn set_robber_pos(&mut self, hex: HexIndex) -> Result<(), RobberError> {
        if hex >= HEX_COUNT {
            return Err(RobberError::OutOfRange(hex));
        }
        if hex == self.robber_pos() {
            return Err(RobberError::SameHexAsCurrent);
        }

        for tile in &mut self.hexes {
            tile.has_robber = false;
        }
        self.hexes[hex].has_robber = true;
        Ok(())
    }

    // ==================== Resource Distribution ====================

    /// Resources each player receives for a dice total
    pub fn get_resources(&self, dice_value: u8) -> BTreeMap<Colour, ResourceHand> {
        let mut distribution: BTreeMap<Colour, ResourceHand> = BTreeMap::new();
        if dice_value == ROBBER_ROLL {
            return distribution;
        }

        let producing = self
            .hexes
            .iter()
            .filter(|h| h.dice_value == dice_value && !h.has_robber && h.resource.is_card());

        for hex in producing {
            for vertex in hex.verts {
                let structure = self.vertices[vertex].structure;
                let amount = structure.kind.resource_multiplier();
                if amount > 0 {
                    distribution
                        .entry(structure.owner)
                        .or_default()
                        .add(hex.resource, amount);
                }
            }
        }

        distribution
    }

    // ==================== Longest Road Calculation ====================

    /// Length of the longest simple path through a player's roads.
    ///
    /// Another player's settlement or city splits the network: a path may end
    /// there but never continue through it.
    pub fn longest_road(&self, colour: Colour) -> u32 {
        let road = Structure::new(colour, BuildingKind::Road);
        let mut visited = [false; EDGE_COUNT];
        let mut longest = 0;

        for (index, edge) in self.edges.iter().enumerate() {
            if edge.structure != road {
                continue;
            }
            visited[index] = true;
            for far_end in edge.verts {
                longest = longest.max(1 + self.extend_road(road, far_end, &mut visited));
            }
            visited[index] = false;
        }

        longest
    }

    /// Longest continuation leaving `vertex` along unvisited roads. Each branch
    /// gets the visited set back exactly as it found it.
    fn extend_road(&self, road: Structure, vertex: VertexIndex, visited: &mut [bool; EDGE_COUNT]) -> u32 {
        if self.vertices[vertex].structure.is_owned_by_opponent_of(road.owner) {
            return 0;
        }

        let mut best = 0;
        for edge in self.vertex_edges(vertex) {
            if visited[edge] || self.edges[edge].structure != road {
                continue;
            }
            visited[edge] = true;
            let next = self.edges[edge].other_end(vertex);
            best = best.max(1 + self.extend_road(road, next, visited));
            visited[edge] = false;
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_board(seed: u64) -> Board {
        Board::standard_with_rng(&mut StdRng::seed_from_u64(seed))
    }

    fn road(board: &mut Board, colour: Colour, edge: EdgeIndex) {
        board.edge_mut(edge).structure = Structure::new(colour, BuildingKind::Road);
    }

    fn build(board: &mut Board, colour: Colour, vertex: VertexIndex, kind: BuildingKind) {
        board.vertex_mut(vertex).structure = Structure::new(colour, kind);
    }

    #[test]
    fn test_standard_board_has_fixed_sizes() {
        let board = Board::standard();
        assert_eq!(board.hexes().len(), 19);
        assert_eq!(board.vertices().len(), 54);
        assert_eq!(board.edges().len(), 72);
    }

    #[test]
    fn test_robber_starts_on_desert() {
        for seed in 0..10 {
            let board = seeded_board(seed);
            let robbers = board.hexes().iter().filter(|h| h.has_robber).count();
            assert_eq!(robbers, 1);

            let robber_hex = board.hex(board.robber_pos()).unwrap();
            assert_eq!(robber_hex.resource, Resource::Desert);
            assert_eq!(robber_hex.dice_value, DESERT_DICE_VALUE);
        }
    }

    #[test]
    fn test_standard_board_has_correct_resource_counts() {
        let board = seeded_board(3);
        let count = |r: Resource| board.hexes().iter().filter(|h| h.resource == r).count();

        assert_eq!(count(Resource::Wood), 4);
        assert_eq!(count(Resource::Grain), 4);
        assert_eq!(count(Resource::Wool), 4);
        assert_eq!(count(Resource::Ore), 3);
        assert_eq!(count(Resource::Brick), 3);
        assert_eq!(count(Resource::Desert), 1);
    }

    #[test]
    fn test_standard_board_has_correct_number_distribution() {
        let board = seeded_board(11);
        let mut values: Vec<u8> = board
            .hexes()
            .iter()
            .filter(|h| h.resource.is_card())
            .map(|h| h.dice_value)
            .collect();
        values.sort();

        assert_eq!(
            values,
            vec![2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12]
        );
    }

    #[test]
    fn test_ports_are_on_the_coast() {
        for seed in 0..20 {
            let board = seeded_board(seed);
            let ports: Vec<_> = board
                .edges()
                .iter()
                .enumerate()
                .filter_map(|(i, e)| e.port.map(|p| (i, p)))
                .collect();

            assert_eq!(ports.len(), 9);
            assert!(ports.iter().all(|(i, _)| *i >= FIRST_COASTAL_EDGE));

            let generic = ports.iter().filter(|(_, p)| p.resource == Resource::Desert).count();
            assert_eq!(generic, 4);
            for resource in Resource::CARDS {
                assert!(ports.iter().any(|(_, p)| p.resource == resource));
            }
        }
    }

    #[test]
    fn test_seeded_boards_are_reproducible() {
        let a = seeded_board(42);
        let b = seeded_board(42);
        assert_eq!(a.hexes(), b.hexes());
        assert_eq!(a.edges(), b.edges());
        assert_eq!(a.development_cards(), b.development_cards());
    }

    #[test]
    fn test_set_robber_pos() {
        let mut board = seeded_board(1);
        let start = board.robber_pos();
        let target = (start + 1) % HEX_COUNT;

        assert_eq!(board.set_robber_pos(start), Err(RobberError::SameHexAsCurrent));
        assert_eq!(board.set_robber_pos(20), Err(RobberError::OutOfRange(20)));

        board.set_robber_pos(target).unwrap();
        assert_eq!(board.robber_pos(), target);
        assert_eq!(board.hexes().iter().filter(|h| h.has_robber).count(), 1);
    }

    #[test]
    fn test_resource_distribution() {
        let mut board = seeded_board(5);
        let (index, hex) = board
            .hexes()
            .iter()
            .enumerate()
            .find(|(_, h)| h.resource.is_card())
            .map(|(i, h)| (i, h.clone()))
            .unwrap();

        build(&mut board, Colour::Red, hex.verts[0], BuildingKind::Settlement);
        build(&mut board, Colour::Blue, hex.verts[3], BuildingKind::City);

        let distribution = board.get_resources(hex.dice_value);
        // Another hex with the same number may add more, never less
        assert!(distribution[&Colour::Red].get(hex.resource) >= 1);
        assert!(distribution[&Colour::Blue].get(hex.resource) >= 2);

        board.set_robber_pos(index).unwrap();
        let blocked = board.get_resources(hex.dice_value);
        let red_after = blocked.get(&Colour::Red).map_or(0, |h| h.get(hex.resource));
        assert!(red_after < distribution[&Colour::Red].get(hex.resource));
    }

    #[test]
    fn test_seven_never_produces() {
        let mut board = seeded_board(8);
        for vertex in (0..VERTEX_COUNT).step_by(5) {
            build(&mut board, Colour::Red, vertex, BuildingKind::City);
        }
        // Move the robber off the desert so its 7 is unguarded
        let desert = board.robber_pos();
        board.set_robber_pos((desert + 1) % HEX_COUNT).unwrap();

        assert!(board.get_resources(ROBBER_ROLL).is_empty());
    }

    #[test]
    fn test_masked_copy_hides_draw_pile() {
        let board = seeded_board(2);
        let masked = board.masked();

        assert_eq!(
            masked.development_cards_remaining(),
            board.development_cards_remaining()
        );
        assert!(masked.development_cards().iter().all(Option::is_none));
        assert!(board.development_cards().iter().all(Option::is_some));
        assert_eq!(masked.hexes(), board.hexes());
    }

    #[test]
    fn test_longest_road_chain() {
        let mut board = seeded_board(0);
        // 12 -> 13 -> 14 walk along the middle band: 6-7, 7-8, 8-9
        for edge in [12, 13, 14] {
            road(&mut board, Colour::Red, edge);
        }
        assert_eq!(board.longest_road(Colour::Red), 3);
        assert_eq!(board.longest_road(Colour::Blue), 0);
    }

    #[test]
    fn test_longest_road_fork_takes_best_branch() {
        let mut board = seeded_board(0);
        // Vertex 0 joins edges 0 (to 1), 5 (to 5) and 6 (to 6)
        // Branch A: 0 -> 1 -> 2 (edges 0, 1). Branch B: 0 -> 6 -> 7 -> 8 (edges 6, 12, 13).
        // Stub: 0 -> 5 (edge 5).
        for edge in [0, 1, 5, 6, 12, 13] {
            road(&mut board, Colour::Red, edge);
        }
        // Best simple path runs 2 -> 1 -> 0 -> 6 -> 7 -> 8
        assert_eq!(board.longest_road(Colour::Red), 5);
    }

    #[test]
    fn test_longest_road_does_not_double_back_at_a_fork() {
        let mut board = seeded_board(0);
        // Three roads meeting at vertex 0 form a star: best path uses two of them
        for edge in [0, 5, 6] {
            road(&mut board, Colour::Red, edge);
        }
        assert_eq!(board.longest_road(Colour::Red), 2);
    }

    #[test]
    fn test_longest_road_counts_cycle() {
        let mut board = seeded_board(0);
        for edge in 0..6 {
            road(&mut board, Colour::Red, edge);
        }
        assert_eq!(board.longest_road(Colour::Red), 6);
    }

    #[test]
    fn test_opponent_settlement_breaks_road() {
        let mut board = seeded_board(0);
        // 0-1, 1-2, 2-3, 3-4 around the centre
        for edge in [0, 1, 2, 3] {
            road(&mut board, Colour::Red, edge);
        }
        assert_eq!(board.longest_road(Colour::Red), 4);

        build(&mut board, Colour::Blue, 2, BuildingKind::Settlement);
        assert_eq!(board.longest_road(Colour::Red), 2);

        // Own buildings do not break the road
        build(&mut board, Colour::Red, 2, BuildingKind::City);
        assert_eq!(board.longest_road(Colour::Red), 4);
    }

    #[test]
    fn test_port_access() {
        let mut board = seeded_board(9);
        let edge = board
            .edges()
            .iter()
            .find(|e| e.port.is_some())
            .cloned()
            .unwrap();

        assert!(board.ports_for(Colour::Red).is_empty());
        build(&mut board, Colour::Red, edge.verts[1], BuildingKind::Settlement);
        assert!(board.ports_for(Colour::Red).contains(&edge.port.unwrap()));
        assert!(board.ports_for(Colour::Blue).is_empty());
    }

    #[test]
    fn test_colours_adjacent_to_hex() {
        let mut board = seeded_board(4);
        let verts = board.hex(0).unwrap().verts;
        build(&mut board, Colour::White, verts[0], BuildingKind::Settlement);
        build(&mut board, Colour::Red, verts[2], BuildingKind::City);
        build(&mut board, Colour::White, verts[4], BuildingKind::Settlement);

        assert_eq!(
            board.colours_adjacent_to_hex(0),
            vec![Colour::Red, Colour::White]
        );
    }
}
