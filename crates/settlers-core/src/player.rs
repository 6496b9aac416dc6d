//! Player state: resource hands, development cards and build costs.

use crate::board::{BuildingKind, Colour, Resource};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Development card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DevelopmentCard {
    Knight,
    VictoryPoint,
    RoadBuilding,
    YearOfPlenty,
    Monopoly,
}

impl DevelopmentCard {
    /// The 25 cards of the standard pile, unshuffled
    pub fn standard_deck() -> Vec<DevelopmentCard> {
        let mut deck = Vec::with_capacity(25);
        deck.extend(std::iter::repeat(DevelopmentCard::Knight).take(14));
        deck.extend(std::iter::repeat(DevelopmentCard::VictoryPoint).take(5));
        deck.extend(std::iter::repeat(DevelopmentCard::RoadBuilding).take(2));
        deck.extend(std::iter::repeat(DevelopmentCard::YearOfPlenty).take(2));
        deck.extend(std::iter::repeat(DevelopmentCard::Monopoly).take(2));
        deck
    }

    pub fn shuffle_deck<R: Rng>(deck: &mut [DevelopmentCard], rng: &mut R) {
        deck.shuffle(rng);
    }

    /// Victory point cards are never played; they just score
    pub fn is_playable(self) -> bool {
        self != DevelopmentCard::VictoryPoint
    }
}

/// Counts of the five card resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub wood: u32,
    pub wool: u32,
    pub brick: u32,
    pub ore: u32,
    pub grain: u32,
}

impl ResourceHand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amounts in `Resource::CARDS` order: wood, wool, brick, ore, grain
    pub fn with_amounts(wood: u32, wool: u32, brick: u32, ore: u32, grain: u32) -> Self {
        Self {
            wood,
            wool,
            brick,
            ore,
            grain,
        }
    }

    /// A hand holding `amount` of one resource
    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::new();
        hand.add(resource, amount);
        hand
    }

    fn slot_mut(&mut self, resource: Resource) -> Option<&mut u32> {
        match resource {
            Resource::Wood => Some(&mut self.wood),
            Resource::Wool => Some(&mut self.wool),
            Resource::Brick => Some(&mut self.brick),
            Resource::Ore => Some(&mut self.ore),
            Resource::Grain => Some(&mut self.grain),
            Resource::Desert => None,
        }
    }

    /// Count of a resource. Desert is never held.
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wood => self.wood,
            Resource::Wool => self.wool,
            Resource::Brick => self.brick,
            Resource::Ore => self.ore,
            Resource::Grain => self.grain,
            Resource::Desert => 0,
        }
    }

    pub fn set(&mut self, resource: Resource, amount: u32) {
        debug_assert!(resource.is_card(), "desert cannot be held");
        if let Some(slot) = self.slot_mut(resource) {
            *slot = amount;
        }
    }

    pub fn add(&mut self, resource: Resource, amount: u32) {
        debug_assert!(resource.is_card(), "desert cannot be held");
        if let Some(slot) = self.slot_mut(resource) {
            *slot += amount;
        }
    }

    pub fn add_hand(&mut self, other: &ResourceHand) {
        for (resource, amount) in other.iter() {
            self.add(resource, amount);
        }
    }

    /// Whether `other` is a sub-multiset of this hand
    pub fn contains(&self, other: &ResourceHand) -> bool {
        other.iter().all(|(resource, amount)| self.get(resource) >= amount)
    }

    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        self.contains(cost)
    }

    /// Remove `cost`. Callers check `can_afford` first.
    pub fn subtract(&mut self, cost: &ResourceHand) {
        assert!(self.can_afford(cost), "cannot subtract more than the hand holds");
        for (resource, amount) in cost.iter() {
            let held = self.get(resource);
            self.set(resource, held - amount);
        }
    }

    /// Remove `cost` if affordable. Returns whether anything was removed.
    pub fn try_subtract(&mut self, cost: &ResourceHand) -> bool {
        if self.can_afford(cost) {
            self.subtract(cost);
            true
        } else {
            false
        }
    }

    /// Take everything of one resource
    pub fn take_all(&mut self, resource: Resource) -> u32 {
        let held = self.get(resource);
        if held > 0 {
            self.set(resource, 0);
        }
        held
    }

    /// Remove one card chosen uniformly among the cards held
    pub fn steal_random<R: Rng>(&mut self, rng: &mut R) -> Option<Resource> {
        let total = self.total();
        if total == 0 {
            return None;
        }

        let mut pick = rng.gen_range(0..total);
        for resource in Resource::CARDS {
            let amount = self.get(resource);
            if pick < amount {
                self.set(resource, amount - 1);
                return Some(resource);
            }
            pick -= amount;
        }
        None
    }

    pub fn total(&self) -> u32 {
        self.wood + self.wool + self.brick + self.ore + self.grain
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// (resource, count) pairs for all five resources
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        Resource::CARDS.into_iter().map(move |r| (r, self.get(r)))
    }
}

/// Building costs
pub mod costs {
    use super::*;

    pub fn road() -> ResourceHand {
        ResourceHand::with_amounts(1, 0, 1, 0, 0)
    }

    pub fn settlement() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 1, 0, 1)
    }

    pub fn city() -> ResourceHand {
        ResourceHand::with_amounts(0, 0, 0, 3, 2)
    }

    pub fn development_card() -> ResourceHand {
        ResourceHand::with_amounts(0, 1, 0, 1, 1)
    }

    /// Cost of any purchasable kind. `Empty` costs nothing and can't be bought.
    pub fn of(kind: BuildingKind) -> Option<ResourceHand> {
        match kind {
            BuildingKind::Road => Some(road()),
            BuildingKind::Settlement => Some(settlement()),
            BuildingKind::City => Some(city()),
            BuildingKind::DevelopmentCard => Some(development_card()),
            BuildingKind::Empty => None,
        }
    }
}

/// Everything a seat holds off the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub colour: Colour,
    pub hand: ResourceHand,
    /// Cards that may be played (or score) this turn
    pub development_cards: Vec<DevelopmentCard>,
    /// Cards bought this turn; unusable until the turn ends
    pub bought_this_turn: Vec<DevelopmentCard>,
    pub knights_played: u32,
    pub has_longest_road: bool,
    pub has_largest_army: bool,
}

impl PlayerState {
    pub fn new(colour: Colour) -> Self {
        Self {
            colour,
            hand: ResourceHand::new(),
            development_cards: Vec::new(),
            bought_this_turn: Vec::new(),
            knights_played: 0,
            has_longest_road: false,
            has_largest_army: false,
        }
    }

    pub fn has_card(&self, card: DevelopmentCard) -> bool {
        self.development_cards.contains(&card)
    }

    /// Remove one copy of a held card. Returns whether it was there.
    pub fn remove_card(&mut self, card: DevelopmentCard) -> bool {
        if let Some(pos) = self.development_cards.iter().position(|c| *c == card) {
            self.development_cards.remove(pos);
            true
        } else {
            false
        }
    }

    /// Hand back a card removed with `remove_card`
    pub fn return_card(&mut self, card: DevelopmentCard) {
        self.development_cards.push(card);
    }

    /// Cards bought this turn become usable
    pub fn end_turn(&mut self) {
        self.development_cards.append(&mut self.bought_this_turn);
    }

    /// Points from victory point cards, including ones bought this turn
    pub fn hidden_victory_points(&self) -> u32 {
        self.development_cards
            .iter()
            .chain(&self.bought_this_turn)
            .filter(|c| **c == DevelopmentCard::VictoryPoint)
            .count() as u32
    }

    /// Points from the longest road and largest army awards
    pub fn award_points(&self) -> u32 {
        2 * (self.has_longest_road as u32) + 2 * (self.has_largest_army as u32)
    }

    pub fn development_card_count(&self) -> usize {
        self.development_cards.len() + self.bought_this_turn.len()
    }
}
