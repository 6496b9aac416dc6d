//! Placement rules for settlements, cities and roads.
//!
//! Every `place_*` operation first runs the matching `check_*` on `&self` and
//! only then writes the structure, so a rejected placement leaves the board
//! untouched. [`Board::can_place`] exposes the check half on its own.

use crate::board::{Board, BuildingKind, Colour, Structure};
use crate::player::{costs, ResourceHand};
use crate::topology::{EdgeIndex, VertexIndex, EDGE_COUNT, VERTEX_COUNT};
use serde::Serialize;
use thiserror::Error;

/// Pieces each player owns
pub const MAX_SETTLEMENTS: usize = 5;
pub const MAX_CITIES: usize = 4;
pub const MAX_ROADS: usize = 15;

/// Why a structure cannot go where it was asked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum PlacementError {
    #[error("position is already occupied")]
    AlreadyOccupied,

    #[error("too close to another building (distance rule)")]
    TooCloseToAnotherBuilding,

    #[error("not connected to your road network")]
    NotConnectedToNetwork,

    #[error("no settlement of yours to upgrade")]
    NotYourSettlement,

    #[error("no road of yours on that edge")]
    NotYourRoad,

    #[error("no pieces of that kind left")]
    UnitLimitReached,

    #[error("not enough resources")]
    CannotAfford,

    #[error("position {0} is not on the board")]
    InvalidPosition(usize),

    #[error("that cannot be placed on the board")]
    NotPlaceable,
}

fn check_cost(hand: Option<&ResourceHand>, cost: ResourceHand) -> Result<(), PlacementError> {
    match hand {
        Some(hand) if !hand.can_afford(&cost) => Err(PlacementError::CannotAfford),
        _ => Ok(()),
    }
}

fn check_owner(owner: Colour) -> Result<(), PlacementError> {
    if owner.is_player() {
        Ok(())
    } else {
        Err(PlacementError::NotPlaceable)
    }
}

impl Board {
    // ==================== Validation ====================

    /// Whether `owner` may build a settlement at `vertex`.
    /// `hand = None` skips the cost check.
    pub fn check_settlement(
        &self,
        owner: Colour,
        hand: Option<&ResourceHand>,
        vertex: VertexIndex,
        need_road: bool,
    ) -> Result<(), PlacementError> {
        check_owner(owner)?;
        if vertex >= VERTEX_COUNT {
            return Err(PlacementError::InvalidPosition(vertex));
        }
        check_cost(hand, costs::settlement())?;

        if self.count(Structure::new(owner, BuildingKind::Settlement)) >= MAX_SETTLEMENTS {
            return Err(PlacementError::UnitLimitReached);
        }
        if !self.vertices()[vertex].structure.is_empty() {
            return Err(PlacementError::AlreadyOccupied);
        }
        if self
            .neighbour_vertices(vertex)
            .any(|n| !self.vertices()[n].structure.is_empty())
        {
            return Err(PlacementError::TooCloseToAnotherBuilding);
        }
        if need_road && !self.has_road_at(owner, vertex) {
            return Err(PlacementError::NotConnectedToNetwork);
        }
        Ok(())
    }

    /// Whether `owner` may upgrade the settlement at `vertex`
    pub fn check_city(
        &self,
        owner: Colour,
        hand: Option<&ResourceHand>,
        vertex: VertexIndex,
    ) -> Result<(), PlacementError> {
        check_owner(owner)?;
        if vertex >= VERTEX_COUNT {
            return Err(PlacementError::InvalidPosition(vertex));
        }
        check_cost(hand, costs::city())?;

        if self.count(Structure::new(owner, BuildingKind::City)) >= MAX_CITIES {
            return Err(PlacementError::UnitLimitReached);
        }
        if self.vertices()[vertex].structure != Structure::new(owner, BuildingKind::Settlement) {
            return Err(PlacementError::NotYourSettlement);
        }
        Ok(())
    }

    /// Whether `owner` may build a road on `edge`
    pub fn check_road(
        &self,
        owner: Colour,
        hand: Option<&ResourceHand>,
        edge: EdgeIndex,
    ) -> Result<(), PlacementError> {
        check_owner(owner)?;
        if edge >= EDGE_COUNT {
            return Err(PlacementError::InvalidPosition(edge));
        }
        check_cost(hand, costs::road())?;

        if self.count(Structure::new(owner, BuildingKind::Road)) >= MAX_ROADS {
            return Err(PlacementError::UnitLimitReached);
        }
        if !self.edges()[edge].structure.is_empty() {
            return Err(PlacementError::AlreadyOccupied);
        }

        let connected = self.edges()[edge].verts.iter().any(|&v| {
            let building = self.vertices()[v].structure;
            building.owner == owner
                || (!building.is_owned_by_opponent_of(owner) && self.has_road_at(owner, v))
        });
        if !connected {
            return Err(PlacementError::NotConnectedToNetwork);
        }
        Ok(())
    }

    /// Validate any placeable kind without touching the board.
    /// `position` is a vertex for settlements and cities, an edge for roads.
    pub fn check_placement(
        &self,
        kind: BuildingKind,
        owner: Colour,
        hand: Option<&ResourceHand>,
        position: usize,
        need_road: bool,
    ) -> Result<(), PlacementError> {
        match kind {
            BuildingKind::Settlement => self.check_settlement(owner, hand, position, need_road),
            BuildingKind::City => self.check_city(owner, hand, position),
            BuildingKind::Road => self.check_road(owner, hand, position),
            BuildingKind::DevelopmentCard | BuildingKind::Empty => Err(PlacementError::NotPlaceable),
        }
    }

    /// Probe form of [`Board::check_placement`]
    pub fn can_place(
        &self,
        kind: BuildingKind,
        owner: Colour,
        hand: Option<&ResourceHand>,
        position: usize,
        need_road: bool,
    ) -> bool {
        self.check_placement(kind, owner, hand, position, need_road).is_ok()
    }

    /// Whether `owner` has a road touching `vertex`
    fn has_road_at(&self, owner: Colour, vertex: VertexIndex) -> bool {
        let road = Structure::new(owner, BuildingKind::Road);
        self.vertex_edges(vertex).any(|e| self.edges()[e].structure == road)
    }

    // ==================== Placement ====================

    pub fn place_settlement(
        &mut self,
        owner: Colour,
        hand: Option<&ResourceHand>,
        vertex: VertexIndex,
        need_road: bool,
    ) -> Result<(), PlacementError> {
        self.check_settlement(owner, hand, vertex, need_road)?;
        self.vertex_mut(vertex).structure = Structure::new(owner, BuildingKind::Settlement);
        Ok(())
    }

    pub fn place_city(
        &mut self,
        owner: Colour,
        hand: Option<&ResourceHand>,
        vertex: VertexIndex,
    ) -> Result<(), PlacementError> {
        self.check_city(owner, hand, vertex)?;
        self.vertex_mut(vertex).structure = Structure::new(owner, BuildingKind::City);
        Ok(())
    }

    pub fn place_road(
        &mut self,
        owner: Colour,
        hand: Option<&ResourceHand>,
        edge: EdgeIndex,
    ) -> Result<(), PlacementError> {
        self.check_road(owner, hand, edge)?;
        self.edge_mut(edge).structure = Structure::new(owner, BuildingKind::Road);
        Ok(())
    }

    // ==================== Removal ====================

    /// Take back `owner`'s settlement at `vertex`
    pub fn remove_settlement(&mut self, owner: Colour, vertex: VertexIndex) -> Result<(), PlacementError> {
        if vertex >= VERTEX_COUNT {
            return Err(PlacementError::InvalidPosition(vertex));
        }
        if self.vertices()[vertex].structure != Structure::new(owner, BuildingKind::Settlement) {
            return Err(PlacementError::NotYourSettlement);
        }
        self.vertex_mut(vertex).structure = Structure::EMPTY;
        Ok(())
    }

    /// Take back `owner`'s road at `edge`
    pub fn remove_road(&mut self, owner: Colour, edge: EdgeIndex) -> Result<(), PlacementError> {
        if edge >= EDGE_COUNT {
            return Err(PlacementError::InvalidPosition(edge));
        }
        if self.edges()[edge].structure != Structure::new(owner, BuildingKind::Road) {
            return Err(PlacementError::NotYourRoad);
        }
        self.edge_mut(edge).structure = Structure::EMPTY;
        Ok(())
    }
}
