//! Player actions and the events they produce.
//!
//! `Action` is the closed set a strategy may answer with on its turn.
//! `GameEvent` is what the engine reports back after a successful action and
//! what opponents are notified with.

use crate::board::{Colour, Resource};
use crate::player::DevelopmentCard;
use crate::topology::{EdgeIndex, HexIndex, VertexIndex};
use serde::{Deserialize, Serialize};

/// Everything a player can do during the main part of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    // ==================== Turn Management ====================
    EndTurn,

    // ==================== Building ====================
    BuildSettlement(VertexIndex),
    /// Upgrade one of your settlements
    BuildCity(VertexIndex),
    BuildRoad(EdgeIndex),
    BuyDevCard,

    // ==================== Development Cards ====================
    /// Move the robber to `hex` and optionally rob `victim`
    UseKnight {
        hex: HexIndex,
        victim: Option<Colour>,
    },
    /// Take one of each from the bank
    UseYearOfPlenty(Resource, Resource),
    /// Two free roads, both or neither
    UseRoadBuilding(EdgeIndex, EdgeIndex),
    /// Collect every card of one resource from all opponents
    UseMonopoly(Resource),

    // ==================== Trading ====================
    /// Trade with the bank (4:1) or through a port (3:1 or 2:1)
    Trade { give: Resource, receive: Resource },
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Dice were rolled
    DiceRolled {
        player: Colour,
        roll: (u8, u8),
        total: u8,
    },

    /// Resources were handed out, after a roll or for a second setup settlement
    ResourcesDistributed {
        distributions: Vec<(Colour, Resource, u32)>,
    },

    SettlementBuilt {
        player: Colour,
        vertex: VertexIndex,
    },

    CityBuilt {
        player: Colour,
        vertex: VertexIndex,
    },

    RoadBuilt {
        player: Colour,
        edge: EdgeIndex,
    },

    DevelopmentCardPurchased {
        player: Colour,
        card: Option<DevelopmentCard>, // Hidden from other players
    },

    /// The pile was empty; nothing was bought or charged
    DevelopmentCardUnavailable { player: Colour },

    KnightPlayed { player: Colour },

    RoadBuildingPlayed {
        player: Colour,
        edges: (EdgeIndex, EdgeIndex),
    },

    YearOfPlentyPlayed {
        player: Colour,
        resources: (Resource, Resource),
    },

    MonopolyPlayed {
        player: Colour,
        resource: Resource,
        total_stolen: u32,
    },

    RobberMoved {
        player: Colour,
        from: HexIndex,
        to: HexIndex,
    },

    ResourceStolen {
        thief: Colour,
        victim: Colour,
        resource: Option<Resource>, // Hidden from other players
    },

    /// Player had to discard cards
    CardsDiscarded {
        player: Colour,
        count: u32,
    },

    /// Bank or port trade completed
    Traded {
        player: Colour,
        gave: Resource,
        gave_count: u32,
        received: Resource,
    },

    LongestRoadChanged {
        previous: Option<Colour>,
        current: Option<Colour>,
        length: u32,
    },

    LargestArmyChanged {
        previous: Option<Colour>,
        current: Option<Colour>,
        knights: u32,
    },

    TurnEnded {
        player: Colour,
        next_player: Colour,
    },

    GameWon {
        player: Colour,
        victory_points: u32,
    },
}

impl GameEvent {
    /// The event as `viewer` is allowed to see it
    pub fn masked_for(&self, viewer: Colour) -> GameEvent {
        match self {
            GameEvent::ResourceStolen {
                thief,
                victim,
                resource: Some(_),
            } if viewer != *thief && viewer != *victim => GameEvent::ResourceStolen {
                thief: *thief,
                victim: *victim,
                resource: None,
            },
            GameEvent::DevelopmentCardPurchased {
                player,
                card: Some(_),
            } if viewer != *player => GameEvent::DevelopmentCardPurchased {
                player: *player,
                card: None,
            },
            other => other.clone(),
        }
    }
}
