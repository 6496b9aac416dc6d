//! Settlers - board topology and rule engine for Catan simulations
//!
//! This crate provides:
//! - The fixed 19-hex board graph with vertex and edge adjacency
//! - Board setup, ports, production and the longest road
//! - Placement rules that can be checked without mutating anything
//! - A game state machine with full rule enforcement
//! - Strategies and a session driver for self-play
//!
//! # Modules
//!
//! - [`topology`]: Index tables for hexes, vertices and edges
//! - [`board`]: Board state, production, robber and road length
//! - [`placement`]: Settlement, city and road rules
//! - [`layout`]: JSON board layouts
//! - [`player`]: Hands, development cards and building costs
//! - [`game`]: Turn phases, dice, trading and victory
//! - [`strategy`]: The decision-maker interface and built-in players
//! - [`session`]: Runs a game between strategies

pub mod actions;
pub mod board;
pub mod config;
pub mod game;
pub mod layout;
pub mod placement;
pub mod player;
pub mod session;
pub mod strategy;
pub mod topology;

// Re-export commonly used types
pub use actions::{Action, GameEvent};
pub use board::{Board, BuildingKind, Colour, Edge, Hex, Port, Resource, RobberError, Structure, Vertex};
pub use config::GameConfig;
pub use game::{Game, GameError, GamePhase, GameView, OpponentView};
pub use layout::{Layout, LayoutError};
pub use placement::PlacementError;
pub use player::{costs, DevelopmentCard, PlayerState, ResourceHand};
pub use session::{GameSummary, Session, SessionError};
pub use strategy::{GreedyStrategy, RandomStrategy, Strategy, StrategyKind};
pub use topology::{EdgeIndex, HexIndex, VertexIndex, EDGE_COUNT, HEX_COUNT, VERTEX_COUNT};
