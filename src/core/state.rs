//! Game state: an arena of cards plus per-seat counters.
//!
//! The rules engine owns the real `GameState`. The decision engine only ever
//! mutates copies in hypothetical mode (see `search::simulate`). Cloning is a
//! flat copy of the card and player vectors; the design table is shared and
//! the round history is a persistent vector.
//!
//! ## Hidden cards
//!
//! In a hypothetical copy, cards an observer cannot identify are not real
//! cards at all: they are counted in `Player::fake_hand`. Drawing in a
//! hypothetical state only bumps that counter.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, CardDesign, CardIdx, CardKind, CardLibrary, GoodType, Location};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use super::ruleset::{Action, Phase, Ruleset, Selection};

/// VP chips per player in the shared pool.
pub const VP_PER_PLAYER: i32 = 12;

/// Tableau size that ends the game.
pub const TABLEAU_LIMIT: usize = 12;

/// Bonus for claiming a "first" goal.
pub const GOAL_VP: i32 = 3;

pub type CardList = SmallVec<[CardIdx; 12]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalKind {
    /// First to four active developments.
    Developments,
    /// First to five active worlds.
    Worlds,
    /// First to hold three different good-producing world types.
    GoodTypes,
    /// First to reach four military.
    Military,
}

impl GoalKind {
    pub const ALL: [GoalKind; 4] = [
        GoalKind::Developments,
        GoalKind::Worlds,
        GoalKind::GoodTypes,
        GoalKind::Military,
    ];

    #[must_use]
    pub fn reached(self, state: &GameState, player: PlayerId) -> bool {
        match self {
            GoalKind::Developments => state.count_kind(player, CardKind::Development) >= 4,
            GoalKind::Worlds => state.count_kind(player, CardKind::World) >= 5,
            GoalKind::GoodTypes => state.world_types(player).iter().filter(|&&b| b).count() >= 3,
            GoalKind::Military => state.military(player) >= 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Goal {
    pub kind: GoalKind,
    pub available: bool,
    /// Bit per seat.
    pub claimed: u8,
}

impl Goal {
    #[must_use]
    pub fn claimed_by(&self, player: PlayerId) -> bool {
        self.claimed & (1 << player.0) != 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub selection: Option<Selection>,
    pub prev_selection: Option<Selection>,
    /// VP chips taken from the pool.
    pub vp: i32,
    pub prestige: i32,
    /// Final score, filled in when the game ends.
    pub end_score: i32,
    /// Cards in hand whose identity is hidden from the viewpoint.
    pub fake_hand: i32,
    pub winner: bool,
    /// Prestige bonus granted at the start of the current round.
    pub round_bonus: bool,
    /// Per-phase progress marker owned by the rules engine.
    pub step: u8,
    /// Card placed this phase and not yet paid for.
    pub unpaid: Option<CardIdx>,
    /// Declared takeover target awaiting the defender.
    pub takeover: Option<CardIdx>,
    /// Consume power chosen and not yet resolved.
    pub pending_power: Option<CardIdx>,
    /// Consume powers already used this phase.
    pub used: CardList,
}

/// Actions every seat selected in one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub selections: Vec<Option<Selection>>,
}

#[derive(Clone, Debug)]
pub struct GameState {
    library: Arc<CardLibrary>,
    pub ruleset: Ruleset,
    pub cards: Vec<Card>,
    pub players: PlayerMap<Player>,
    pub vp_pool: i32,
    pub goals: Vec<Goal>,
    pub round: u32,
    /// Phase currently being resolved.
    pub phase: Option<Phase>,
    /// Phases selected by any seat this round.
    pub selected: [bool; 5],
    pub game_over: bool,
    pub rng: GameRng,
    hypothetical: bool,
    viewpoint: Option<PlayerId>,
    pub history: Vector<RoundRecord>,
}

impl GameState {
    /// A fresh game with every card in the deck.
    #[must_use]
    pub fn new(library: Arc<CardLibrary>, ruleset: Ruleset, seed: u64) -> Self {
        let mut cards = Vec::with_capacity(library.card_count());
        for (id, design) in library.iter() {
            for _ in 0..design.copies {
                cards.push(Card::new(id));
            }
        }
        assert!(cards.len() <= u16::MAX as usize, "Too many cards");

        let goals = if ruleset.goals_enabled() {
            GoalKind::ALL
                .iter()
                .map(|&kind| Goal {
                    kind,
                    available: true,
                    claimed: 0,
                })
                .collect()
        } else {
            Vec::new()
        };

        let player_count = ruleset.player_count();
        Self {
            library,
            ruleset,
            cards,
            players: PlayerMap::with_default(player_count),
            vp_pool: VP_PER_PLAYER * player_count as i32,
            goals,
            round: 0,
            phase: None,
            selected: [false; 5],
            game_over: false,
            rng: GameRng::new(seed),
            hypothetical: false,
            viewpoint: None,
            history: Vector::new(),
        }
    }

    #[must_use]
    pub fn library(&self) -> &CardLibrary {
        &self.library
    }

    /// The shared design table, for building encoders.
    #[must_use]
    pub fn shared_library(&self) -> Arc<CardLibrary> {
        Arc::clone(&self.library)
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.ruleset.player_count()
    }

    #[must_use]
    pub fn is_hypothetical(&self) -> bool {
        self.hypothetical
    }

    /// Seat whose knowledge a hypothetical copy is restricted to.
    #[must_use]
    pub fn viewpoint(&self) -> Option<PlayerId> {
        self.viewpoint
    }

    /// Switch a copy into hypothetical mode for `viewpoint`.
    ///
    /// Replaces the RNG with a simulation stream and turns every card the
    /// viewpoint cannot identify in another seat's hand into a hidden card.
    /// Does nothing if the state is already hypothetical.
    pub(crate) fn enter_hypothetical(&mut self, viewpoint: PlayerId, salt: u64) {
        if self.hypothetical {
            return;
        }
        self.hypothetical = true;
        self.viewpoint = Some(viewpoint);
        self.rng = GameRng::simulation(salt);

        for i in 0..self.cards.len() {
            let card = self.cards[i];
            if card.location != Location::Hand || card.known_to(viewpoint) {
                continue;
            }
            if let Some(owner) = card.owner {
                self.players[owner].fake_hand += 1;
                self.cards[i].location = Location::Deck;
                self.cards[i].owner = None;
                self.cards[i].known = 0;
            }
        }
    }

    /// Record `player`'s action selection and mark its phases as selected.
    pub fn select(&mut self, player: PlayerId, selection: Selection) {
        self.players[player].selection = Some(selection);
        for phase in Phase::ALL {
            if selection.selects_phase(phase) {
                self.selected[phase.index()] = true;
            }
        }
    }

    /// Whether `player` picked `action` this round.
    #[must_use]
    pub fn picked(&self, player: PlayerId, action: Action) -> bool {
        self.players[player].selection.is_some_and(|s| s.contains(action))
    }

    /// Start resolving `phase`, clearing per-phase progress for every seat.
    pub fn begin_phase(&mut self, phase: Phase) {
        self.phase = Some(phase);
        for (_, p) in self.players.iter_mut() {
            p.step = 0;
            p.unpaid = None;
            p.takeover = None;
            p.pending_power = None;
            p.used.clear();
        }
    }

    #[must_use]
    pub fn design(&self, card: CardIdx) -> &CardDesign {
        self.library.get(self.cards[card.index()].design)
    }

    #[must_use]
    pub fn card(&self, card: CardIdx) -> &Card {
        &self.cards[card.index()]
    }

    pub fn card_ids(&self) -> impl Iterator<Item = CardIdx> {
        (0..self.cards.len() as u16).map(CardIdx)
    }

    // === Inspectors ===

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> CardList {
        self.card_ids().filter(|&c| self.card(c).in_hand_of(player)).collect()
    }

    /// Real cards plus hidden ones.
    #[must_use]
    pub fn hand_size(&self, player: PlayerId) -> i32 {
        let real = self.cards.iter().filter(|c| c.in_hand_of(player)).count() as i32;
        real + self.players[player].fake_hand
    }

    #[must_use]
    pub fn tableau(&self, player: PlayerId) -> CardList {
        self.card_ids().filter(|&c| self.card(c).active_for(player)).collect()
    }

    #[must_use]
    pub fn tableau_size(&self, player: PlayerId) -> usize {
        self.cards.iter().filter(|c| c.active_for(player)).count()
    }

    #[must_use]
    pub fn count_kind(&self, player: PlayerId, kind: CardKind) -> usize {
        self.cards
            .iter()
            .filter(|c| c.active_for(player) && self.library.get(c.design).kind == kind)
            .count()
    }

    #[must_use]
    pub fn count_location(&self, location: Location) -> usize {
        self.cards.iter().filter(|c| c.location == location).count()
    }

    #[must_use]
    pub fn military(&self, player: PlayerId) -> i32 {
        self.cards
            .iter()
            .filter(|c| c.active_for(player))
            .map(|c| self.library.get(c.design).military)
            .sum()
    }

    /// Active worlds currently holding a good.
    #[must_use]
    pub fn goods(&self, player: PlayerId) -> CardList {
        self.card_ids()
            .filter(|&c| self.card(c).active_for(player) && self.card(c).good)
            .collect()
    }

    #[must_use]
    pub fn good_type(&self, card: CardIdx) -> Option<GoodType> {
        self.design(card).good
    }

    /// Good types currently held.
    #[must_use]
    pub fn good_types(&self, player: PlayerId) -> [bool; 4] {
        let mut out = [false; 4];
        for c in self.goods(player) {
            if let Some(t) = self.good_type(c) {
                out[t.index()] = true;
            }
        }
        out
    }

    /// Good types of active worlds, whether or not they hold a good.
    #[must_use]
    pub fn world_types(&self, player: PlayerId) -> [bool; 4] {
        let mut out = [false; 4];
        for c in self.cards.iter().filter(|c| c.active_for(player)) {
            if let Some(t) = self.library.get(c.design).good {
                out[t.index()] = true;
            }
        }
        out
    }

    #[must_use]
    pub fn has_active(&self, player: PlayerId, pred: impl Fn(&CardDesign) -> bool) -> bool {
        self.cards
            .iter()
            .any(|c| c.active_for(player) && pred(self.library.get(c.design)))
    }

    #[must_use]
    pub fn goal_vp(&self, player: PlayerId) -> i32 {
        self.goals.iter().filter(|g| g.claimed_by(player)).count() as i32 * GOAL_VP
    }

    /// Current score: chips, card VP, goals and prestige.
    #[must_use]
    pub fn score(&self, player: PlayerId) -> i32 {
        let cards: i32 = self
            .cards
            .iter()
            .filter(|c| c.active_for(player))
            .map(|c| self.library.get(c.design).vp)
            .sum();
        let p = &self.players[player];
        p.vp + cards + self.goal_vp(player) + p.prestige
    }

    /// Cards the viewpoint cannot identify: deck cards and unknown cards in
    /// other hands, plus hidden counters.
    #[must_use]
    pub fn unknown_count(&self, viewpoint: PlayerId) -> usize {
        let real = self
            .cards
            .iter()
            .filter(|c| {
                c.location == Location::Deck
                    || (c.location == Location::Hand && c.owner != Some(viewpoint) && !c.known_to(viewpoint))
            })
            .count();
        let hidden: i32 = self
            .players
            .iter()
            .filter(|(p, _)| *p != viewpoint)
            .map(|(_, pl)| pl.fake_hand.max(0))
            .sum();
        real + hidden as usize
    }

    /// Cards in `player`'s hand that `viewpoint` cannot identify.
    #[must_use]
    pub fn hidden_hand(&self, player: PlayerId, viewpoint: PlayerId) -> i32 {
        if player == viewpoint {
            return self.players[player].fake_hand;
        }
        let real = self
            .cards
            .iter()
            .filter(|c| c.in_hand_of(player) && !c.known_to(viewpoint))
            .count() as i32;
        real + self.players[player].fake_hand
    }

    // === Mutators used by rules engines ===

    /// Draw `count` cards for `player`.
    ///
    /// Returns the real cards drawn; in a hypothetical state nothing real is
    /// drawn and the hidden counter grows instead.
    pub fn draw(&mut self, player: PlayerId, count: usize) -> CardList {
        let mut drawn = CardList::new();
        if self.hypothetical {
            self.players[player].fake_hand += count as i32;
            return drawn;
        }
        for _ in 0..count {
            let mut deck: Vec<CardIdx> = self
                .card_ids()
                .filter(|&c| self.card(c).location == Location::Deck)
                .collect();
            if deck.is_empty() {
                self.refill_deck();
                deck = self
                    .card_ids()
                    .filter(|&c| self.card(c).location == Location::Deck)
                    .collect();
                if deck.is_empty() {
                    break;
                }
            }
            let pick = deck[self.rng.gen_range_usize(0..deck.len())];
            self.move_to_hand(pick, player);
            drawn.push(pick);
        }
        drawn
    }

    fn refill_deck(&mut self) {
        for card in self.cards.iter_mut().filter(|c| c.location == Location::Discard) {
            card.location = Location::Deck;
            card.known = 0;
        }
    }

    pub fn move_to_hand(&mut self, card: CardIdx, player: PlayerId) {
        let c = &mut self.cards[card.index()];
        c.owner = Some(player);
        c.location = Location::Hand;
        c.good = false;
        c.known = 1 << player.0;
    }

    /// Discard a card face up.
    pub fn discard(&mut self, card: CardIdx) {
        let all = (1u16 << self.player_count()) - 1;
        let c = &mut self.cards[card.index()];
        c.owner = None;
        c.location = Location::Discard;
        c.good = false;
        c.known = all as u8;
    }

    /// Put a card into `player`'s tableau face up.
    pub fn place(&mut self, card: CardIdx, player: PlayerId) {
        let all = (1u16 << self.player_count()) - 1;
        let c = &mut self.cards[card.index()];
        c.owner = Some(player);
        c.location = Location::Active;
        c.known = all as u8;
    }

    /// Discard hidden cards from `player`'s hand. Returns false if too few.
    pub fn discard_hidden(&mut self, player: PlayerId, count: i32) -> bool {
        let p = &mut self.players[player];
        if p.fake_hand < count {
            return false;
        }
        p.fake_hand -= count;
        true
    }

    /// Take up to `amount` chips from the pool (the pool may go negative;
    /// emptying it ends the game).
    pub fn award_vp(&mut self, player: PlayerId, amount: i32) {
        self.players[player].vp += amount;
        self.vp_pool -= amount;
    }

    pub fn record_round(&mut self) {
        let selections = self.players.values().map(|p| p.selection).collect();
        self.history.push_back(RoundRecord {
            round: self.round,
            selections,
        });
    }
}
