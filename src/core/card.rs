//! Card designs and the per-game card arena.
//!
//! A `CardLibrary` holds the immutable design data shared by every copy of
//! a game (behind an `Arc`). A game state owns one `Card` per physical card;
//! cards refer to each other and to players only through integer ids so that
//! cloning a state is a flat copy.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Index of a physical card in `GameState::cards`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardIdx(pub u16);

impl CardIdx {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a design in the `CardLibrary`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DesignId(pub u16);

impl DesignId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    World,
    Development,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoodType {
    Novelty,
    Rare,
    Gene,
    Alien,
}

impl GoodType {
    pub const ALL: [GoodType; 4] = [GoodType::Novelty, GoodType::Rare, GoodType::Gene, GoodType::Alien];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Cards received when this good is sold.
    #[must_use]
    pub const fn trade_value(self) -> i32 {
        self as i32 + 2
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumeKind {
    /// Consume exactly `count` goods, optionally of one type.
    Goods { count: u8, good_type: Option<GoodType> },
    /// Discard up to `max` hand cards; rewards are per card.
    Hand { max: u8 },
    /// Ante one hand card against a random reveal from the deck.
    Ante,
}

/// A once-per-phase consume power.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsumePower {
    pub kind: ConsumeKind,
    pub vp: i32,
    pub cards: i32,
}

impl ConsumePower {
    #[must_use]
    pub const fn goods(count: u8, good_type: Option<GoodType>, vp: i32, cards: i32) -> Self {
        Self {
            kind: ConsumeKind::Goods { count, good_type },
            vp,
            cards,
        }
    }

    #[must_use]
    pub const fn hand(max: u8, vp: i32) -> Self {
        Self {
            kind: ConsumeKind::Hand { max },
            vp,
            cards: 0,
        }
    }

    #[must_use]
    pub const fn ante() -> Self {
        Self {
            kind: ConsumeKind::Ante,
            vp: 0,
            cards: 0,
        }
    }

    /// Whether `good` may be consumed by this power.
    #[must_use]
    pub fn accepts(&self, good: GoodType) -> bool {
        match self.kind {
            ConsumeKind::Goods { good_type, .. } => good_type.map_or(true, |t| t == good),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDesign {
    pub name: String,
    pub kind: CardKind,
    pub cost: i32,
    pub vp: i32,
    /// Military strength granted while active.
    pub military: i32,
    /// Good produced or received by a world.
    pub good: Option<GoodType>,
    pub military_world: bool,
    /// Windfall worlds receive a good when settled and never produce.
    pub windfall: bool,
    pub consume: Option<ConsumePower>,
    /// Reduces development costs by one when active.
    pub develop_discount: bool,
    /// Can pay for a military world with cards instead of strength.
    pub pay_military: bool,
    /// Prestige gained when placed.
    pub prestige: i32,
    pub copies: u8,
    pub start_world: bool,
}

impl CardDesign {
    pub fn world(name: impl Into<String>, cost: i32, vp: i32) -> Self {
        Self {
            name: name.into(),
            kind: CardKind::World,
            cost,
            vp,
            military: 0,
            good: None,
            military_world: false,
            windfall: false,
            consume: None,
            develop_discount: false,
            pay_military: false,
            prestige: 0,
            copies: 1,
            start_world: false,
        }
    }

    pub fn development(name: impl Into<String>, cost: i32, vp: i32) -> Self {
        Self {
            kind: CardKind::Development,
            ..Self::world(name, cost, vp)
        }
    }

    #[must_use]
    pub fn with_good(mut self, good: GoodType, windfall: bool) -> Self {
        self.good = Some(good);
        self.windfall = windfall;
        self
    }

    #[must_use]
    pub fn military_world(mut self) -> Self {
        self.military_world = true;
        self
    }

    #[must_use]
    pub fn with_military(mut self, strength: i32) -> Self {
        self.military = strength;
        self
    }

    #[must_use]
    pub fn with_consume(mut self, power: ConsumePower) -> Self {
        self.consume = Some(power);
        self
    }

    #[must_use]
    pub fn with_develop_discount(mut self) -> Self {
        self.develop_discount = true;
        self
    }

    #[must_use]
    pub fn with_pay_military(mut self) -> Self {
        self.pay_military = true;
        self
    }

    #[must_use]
    pub fn with_prestige(mut self, prestige: i32) -> Self {
        self.prestige = prestige;
        self
    }

    #[must_use]
    pub fn copies(mut self, copies: u8) -> Self {
        self.copies = copies;
        self
    }

    #[must_use]
    pub fn start_world(mut self) -> Self {
        self.start_world = true;
        self
    }

    /// Whether this world produces goods during the produce phase.
    #[must_use]
    pub fn produces(&self) -> bool {
        self.kind == CardKind::World && self.good.is_some() && !self.windfall
    }
}

/// Immutable design table.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardLibrary {
    designs: Vec<CardDesign>,
}

impl CardLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, design: CardDesign) -> DesignId {
        assert!(self.designs.len() < u16::MAX as usize, "design table full");
        self.designs.push(design);
        DesignId((self.designs.len() - 1) as u16)
    }

    #[must_use]
    pub fn get(&self, id: DesignId) -> &CardDesign {
        &self.designs[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.designs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DesignId, &CardDesign)> {
        self.designs
            .iter()
            .enumerate()
            .map(|(i, d)| (DesignId(i as u16), d))
    }

    /// Designs that can hold a good, in library order.
    pub fn good_holders(&self) -> impl Iterator<Item = (DesignId, &CardDesign)> {
        self.iter().filter(|(_, d)| d.good.is_some())
    }

    /// Total number of physical cards.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.designs.iter().map(|d| d.copies as usize).sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Deck,
    Discard,
    Hand,
    Active,
}

impl Location {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Location::Deck => 0,
            Location::Discard => 1,
            Location::Hand => 2,
            Location::Active => 3,
        }
    }
}

/// One physical card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub design: DesignId,
    pub owner: Option<PlayerId>,
    pub location: Location,
    /// An active world holding a good.
    pub good: bool,
    /// Bit per seat: whether that seat knows this card's identity.
    pub known: u8,
}

impl Card {
    #[must_use]
    pub fn new(design: DesignId) -> Self {
        Self {
            design,
            owner: None,
            location: Location::Deck,
            good: false,
            known: 0,
        }
    }

    #[must_use]
    pub fn known_to(&self, player: PlayerId) -> bool {
        self.known & (1 << player.0) != 0
    }

    #[must_use]
    pub fn in_hand_of(&self, player: PlayerId) -> bool {
        self.location == Location::Hand && self.owner == Some(player)
    }

    #[must_use]
    pub fn active_for(&self, player: PlayerId) -> bool {
        self.location == Location::Active && self.owner == Some(player)
    }
}
