//! Rules of the reference game.

use std::sync::Arc;

use crate::ai::{Decider, DecisionKind, Reply, Request};
use crate::core::{
    Action, CardDesign, CardIdx, CardKind, CardList, ConsumeKind, ConsumePower, GameState, Location, Phase, PlayerId,
    Ruleset, TABLEAU_LIMIT,
};
use crate::error::{Error, Result};
use crate::rules::RulesEngine;

use super::library;

/// Cards a seat may hold at the end of a round.
pub const HAND_LIMIT: i32 = 10;

/// Cards dealt to each seat at setup.
pub const START_HAND: usize = 4;

/// Progress markers kept in `Player::step`.
mod step {
    pub const EXPLORE_SEARCH: u8 = 0;
    pub const EXPLORE_DRAW: u8 = 1;
    pub const EXPLORE_KEEP: u8 = 2;

    pub const DEVELOP_PLACE: u8 = 0;
    pub const DEVELOP_PAY: u8 = 1;

    pub const SETTLE_TAKEOVER: u8 = 0;
    pub const SETTLE_DEFEND: u8 = 1;
    pub const SETTLE_PLACE: u8 = 2;
    pub const SETTLE_PAY: u8 = 3;

    pub const CONSUME_TRADE: u8 = 0;
    pub const CONSUME_POWERS: u8 = 1;

    pub const DONE: u8 = u8::MAX;
}

/// What a prestige search looks for in the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchCategory {
    /// A development costing six.
    BigDevelopment,
    MilitaryWorld,
    WindfallWorld,
    ConsumePower,
    ProductionWorld,
}

impl SearchCategory {
    pub const ALL: [SearchCategory; 5] = [
        SearchCategory::BigDevelopment,
        SearchCategory::MilitaryWorld,
        SearchCategory::WindfallWorld,
        SearchCategory::ConsumePower,
        SearchCategory::ProductionWorld,
    ];

    #[must_use]
    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    #[must_use]
    pub fn matches(self, design: &CardDesign) -> bool {
        match self {
            SearchCategory::BigDevelopment => design.kind == CardKind::Development && design.cost >= 6,
            SearchCategory::MilitaryWorld => design.kind == CardKind::World && design.military_world,
            SearchCategory::WindfallWorld => design.kind == CardKind::World && design.windfall,
            SearchCategory::ConsumePower => design.consume.is_some(),
            SearchCategory::ProductionWorld => design.produces(),
        }
    }
}

/// Table options for a new game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    pub players: u8,
    pub expansion: u8,
    pub advanced: bool,
}

impl Options {
    #[must_use]
    pub fn new(players: u8) -> Self {
        Self {
            players,
            expansion: 0,
            advanced: false,
        }
    }

    #[must_use]
    pub fn with_expansion(mut self, expansion: u8) -> Self {
        self.expansion = expansion;
        self
    }

    /// Two-player game where each seat selects two actions.
    #[must_use]
    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    /// Panics on an unsupported table, like `Ruleset::new`.
    #[must_use]
    pub fn ruleset(&self) -> Ruleset {
        Ruleset::new(self.players, self.expansion, self.advanced)
    }
}

/// Set up a game: one random start world and a starting hand per seat.
#[must_use]
pub fn new_game(options: Options, seed: u64) -> (Galaxy, GameState) {
    let ruleset = options.ruleset();
    let mut state = GameState::new(Arc::new(library::standard()), ruleset, seed);

    let mut starts: Vec<CardIdx> = state.card_ids().filter(|&c| state.design(c).start_world).collect();
    state.rng.shuffle(&mut starts);
    for (player, &world) in PlayerId::all(ruleset.player_count()).zip(&starts) {
        state.place(world, player);
        if state.design(world).windfall {
            state.cards[world.index()].good = true;
        }
    }
    for player in PlayerId::all(ruleset.player_count()) {
        state.draw(player, START_HAND);
    }
    log::debug!("new {ruleset} game with seed {seed}");
    (Galaxy::new(ruleset), state)
}

/// The reference rules engine.
#[derive(Clone, Debug)]
pub struct Galaxy {
    ruleset: Ruleset,
}

// === Inspectors ===

fn illegal(state: &GameState, kind: DecisionKind, player: PlayerId) -> Error {
    log::error!("illegal {kind:?} reply from {player} in round {}", state.round);
    Error::IllegalReply { kind, player }
}

fn require(legal: bool, state: &GameState, kind: DecisionKind, player: PlayerId) -> Result<()> {
    if legal {
        Ok(())
    } else {
        Err(illegal(state, kind, player))
    }
}

fn distinct(cards: &[CardIdx]) -> bool {
    cards.iter().enumerate().all(|(i, c)| !cards[..i].contains(c))
}

fn all_in_hand(state: &GameState, player: PlayerId, cards: &[CardIdx]) -> bool {
    distinct(cards) && cards.iter().all(|&c| state.card(c).in_hand_of(player))
}

fn picked_either(state: &GameState, player: PlayerId, a: Action, b: Action) -> bool {
    state.picked(player, a) || state.picked(player, b)
}

/// Cards owed for a development, after discounts other than its own.
fn develop_cost(state: &GameState, player: PlayerId, card: CardIdx) -> i32 {
    let discount = state
        .tableau(player)
        .iter()
        .filter(|&&c| c != card && state.design(c).develop_discount)
        .count() as i32;
    let bonus = i32::from(picked_either(state, player, Action::Develop, Action::Develop2));
    (state.design(card).cost - discount - bonus).max(0)
}

/// Cards owed for `placed`, and whether a pay-for-military power is used.
fn payment_terms(state: &GameState, player: PlayerId, placed: CardIdx) -> (i32, bool) {
    let design = state.design(placed);
    match design.kind {
        CardKind::Development => (develop_cost(state, player, placed), false),
        CardKind::World if design.military_world => ((design.cost - 1).max(0), true),
        CardKind::World => (design.cost, false),
    }
}

fn pay_military_powers(state: &GameState, player: PlayerId) -> CardList {
    state
        .tableau(player)
        .into_iter()
        .filter(|&c| state.design(c).pay_military)
        .collect()
}

fn can_place(state: &GameState, player: PlayerId, phase: Phase, card: CardIdx) -> bool {
    if !state.card(card).in_hand_of(player) {
        return false;
    }
    let design = state.design(card);
    let spare = state.hand_size(player) - 1;
    match phase {
        Phase::Develop => {
            let id = state.card(card).design;
            let duplicate = state.cards.iter().any(|c| c.active_for(player) && c.design == id);
            design.kind == CardKind::Development && !duplicate && develop_cost(state, player, card) <= spare
        }
        Phase::Settle if design.kind == CardKind::World => {
            if design.military_world {
                state.military(player) >= design.cost
                    || (!pay_military_powers(state, player).is_empty() && design.cost - 1 <= spare)
            } else {
                design.cost <= spare
            }
        }
        _ => false,
    }
}

fn explore_counts(state: &GameState, player: PlayerId) -> (usize, usize) {
    let (mut draw, mut keep) = (2, 1);
    if state.picked(player, Action::Explore5) {
        draw += 5;
    }
    if state.picked(player, Action::Explore11) {
        draw += 1;
        keep += 1;
    }
    (draw, keep)
}

fn can_search(state: &GameState, player: PlayerId) -> bool {
    let p = &state.players[player];
    state.ruleset.prestige_enabled()
        && p.prestige >= 1
        && p.selection.is_some_and(|s| s.selects_phase(Phase::Explore))
}

fn takeover_targets(state: &GameState, player: PlayerId) -> CardList {
    if !state.ruleset.prestige_enabled() || state.military(player) <= 0 {
        return CardList::new();
    }
    state
        .card_ids()
        .filter(|&c| {
            let card = state.card(c);
            let design = state.design(c);
            card.location == Location::Active
                && card.owner.is_some_and(|o| o != player)
                && design.military_world
                && !design.start_world
        })
        .collect()
}

fn eligible_goods(state: &GameState, player: PlayerId, power: &ConsumePower) -> CardList {
    state
        .goods(player)
        .into_iter()
        .filter(|&g| state.good_type(g).is_some_and(|t| power.accepts(t)))
        .collect()
}

/// Consume powers `player` has not used this phase and could use now.
fn usable_powers(state: &GameState, player: PlayerId) -> CardList {
    let used = &state.players[player].used;
    state
        .tableau(player)
        .into_iter()
        .filter(|c| !used.contains(c))
        .filter(|&c| match state.design(c).consume {
            None => false,
            Some(power) => match power.kind {
                ConsumeKind::Goods { count, .. } => eligible_goods(state, player, &power).len() >= usize::from(count),
                ConsumeKind::Hand { .. } => !state.hand(player).is_empty(),
                ConsumeKind::Ante => !state.hand(player).is_empty() && state.count_location(Location::Deck) > 0,
            },
        })
        .collect()
}

fn vp_multiplier(state: &GameState, player: PlayerId) -> i32 {
    if state.picked(player, Action::ConsumeX2) {
        2
    } else {
        1
    }
}

fn pending_consume(state: &GameState, player: PlayerId, power: CardIdx) -> Option<ConsumePower> {
    if state.phase != Some(Phase::Consume) || state.players[player].pending_power != Some(power) {
        return None;
    }
    state.design(power).consume
}

fn finish_power(state: &mut GameState, player: PlayerId, power: CardIdx) {
    let p = &mut state.players[player];
    p.used.push(power);
    p.pending_power = None;
}

fn reward(state: &mut GameState, player: PlayerId, vp: i32, cards: i32) {
    let vp = vp * vp_multiplier(state, player);
    if vp > 0 {
        state.award_vp(player, vp);
    }
    if cards > 0 {
        state.draw(player, cards as usize);
    }
}

/// Close a placement once it is paid for.
fn finish_placement(state: &mut GameState, player: PlayerId) {
    state.players[player].step = step::DONE;
    if state.phase == Some(Phase::Settle) && picked_either(state, player, Action::Settle, Action::Settle2) {
        state.draw(player, 1);
    }
}

impl Galaxy {
    #[must_use]
    pub fn new(ruleset: Ruleset) -> Self {
        Self { ruleset }
    }

    #[must_use]
    pub fn ruleset(&self) -> Ruleset {
        self.ruleset
    }

    fn explore(&self, state: &mut GameState, player: PlayerId, decider: &mut dyn Decider) -> Result<()> {
        loop {
            match state.players[player].step {
                step::EXPLORE_SEARCH => {
                    if !can_search(state, player) {
                        state.players[player].step = step::EXPLORE_DRAW;
                        continue;
                    }
                    let request = Request::new(DecisionKind::SearchCategory)
                        .with_args([SearchCategory::ALL.len() as i32, 0, 0]);
                    let legal = match decider.decide(state, player, &request)? {
                        Reply::Index(category) => self.apply_search(state, player, category),
                        _ => false,
                    };
                    require(legal, state, DecisionKind::SearchCategory, player)?;
                }
                step::EXPLORE_DRAW => {
                    let (draw, keep) = explore_counts(state, player);
                    state.players[player].step = step::EXPLORE_KEEP;
                    if state.is_hypothetical() {
                        state.draw(player, draw);
                        state.discard_hidden(player, (draw - keep) as i32);
                        state.players[player].step = step::DONE;
                        continue;
                    }
                    let drawn = state.draw(player, draw);
                    let excess = drawn.len().saturating_sub(keep);
                    if excess == 0 {
                        state.players[player].step = step::DONE;
                        continue;
                    }
                    let request = Request::new(DecisionKind::Discard)
                        .with_list(drawn.iter().copied())
                        .with_args([excess as i32, 0, 0]);
                    let legal = match decider.decide(state, player, &request)? {
                        Reply::Cards(cards) if cards.len() == excess && cards.iter().all(|c| drawn.contains(c)) => {
                            self.apply_discard(state, player, &cards)
                        }
                        _ => false,
                    };
                    require(legal, state, DecisionKind::Discard, player)?;
                }
                // A copy taken before the keep decision was answered.
                step::EXPLORE_KEEP => state.players[player].step = step::DONE,
                _ => return Ok(()),
            }
        }
    }

    fn develop(&self, state: &mut GameState, player: PlayerId, decider: &mut dyn Decider) -> Result<()> {
        loop {
            match state.players[player].step {
                step::DEVELOP_PLACE => self.offer_placement(state, player, Phase::Develop, decider)?,
                step::DEVELOP_PAY => self.collect_payment(state, player, decider)?,
                _ => return Ok(()),
            }
        }
    }

    fn settle(&self, state: &mut GameState, player: PlayerId, decider: &mut dyn Decider) -> Result<()> {
        loop {
            match state.players[player].step {
                step::SETTLE_TAKEOVER => {
                    let targets = takeover_targets(state, player);
                    if targets.is_empty() {
                        state.players[player].step = step::SETTLE_PLACE;
                        continue;
                    }
                    let request = Request::new(DecisionKind::Takeover).with_list(targets);
                    let legal = match decider.decide(state, player, &request)? {
                        Reply::Card(target) => self.apply_takeover(state, player, target),
                        _ => false,
                    };
                    require(legal, state, DecisionKind::Takeover, player)?;
                }
                step::SETTLE_DEFEND => self.defend_takeover(state, player, decider)?,
                step::SETTLE_PLACE => self.offer_placement(state, player, Phase::Settle, decider)?,
                step::SETTLE_PAY => self.collect_payment(state, player, decider)?,
                _ => return Ok(()),
            }
        }
    }

    fn consume(&self, state: &mut GameState, player: PlayerId, decider: &mut dyn Decider) -> Result<()> {
        loop {
            match state.players[player].step {
                step::CONSUME_TRADE => {
                    let goods = state.goods(player);
                    if goods.is_empty() || !state.picked(player, Action::ConsumeTrade) {
                        state.players[player].step = step::CONSUME_POWERS;
                        continue;
                    }
                    let request = Request::new(DecisionKind::Trade).with_list(goods);
                    let legal = match decider.decide(state, player, &request)? {
                        Reply::Card(Some(good)) => self.apply_trade(state, player, good),
                        _ => false,
                    };
                    require(legal, state, DecisionKind::Trade, player)?;
                }
                step::CONSUME_POWERS => {
                    if let Some(power) = state.players[player].pending_power {
                        self.resolve_power(state, player, power, decider)?;
                        continue;
                    }
                    let powers = usable_powers(state, player);
                    if powers.is_empty() {
                        state.players[player].step = step::DONE;
                        continue;
                    }
                    let request = Request::new(DecisionKind::ConsumePower).with_special(powers);
                    let legal = match decider.decide(state, player, &request)? {
                        Reply::Card(power) => self.apply_consume_power(state, player, power),
                        _ => false,
                    };
                    require(legal, state, DecisionKind::ConsumePower, player)?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn produce(&self, state: &mut GameState, player: PlayerId) {
        if state.players[player].step == step::DONE {
            return;
        }
        let tableau = state.tableau(player);
        for &c in &tableau {
            if state.design(c).produces() {
                state.cards[c.index()].good = true;
            }
        }
        if state.picked(player, Action::Produce) {
            let windfall = tableau
                .iter()
                .copied()
                .find(|&c| state.design(c).windfall && !state.card(c).good);
            if let Some(world) = windfall {
                state.cards[world.index()].good = true;
            }
        }
        state.players[player].step = step::DONE;
    }

    fn offer_placement(
        &self,
        state: &mut GameState,
        player: PlayerId,
        phase: Phase,
        decider: &mut dyn Decider,
    ) -> Result<()> {
        let options: CardList = state
            .hand(player)
            .into_iter()
            .filter(|&c| can_place(state, player, phase, c))
            .collect();
        if options.is_empty() {
            let passed = self.apply_place(state, player, phase, None);
            return require(passed, state, DecisionKind::Place, player);
        }

        let request = Request::new(DecisionKind::Place)
            .with_list(options.iter().copied())
            .with_args([phase.index() as i32, 0, 0]);
        let legal = match decider.decide(state, player, &request)? {
            Reply::Card(None) => self.apply_place(state, player, phase, None),
            Reply::Card(Some(card)) if options.contains(&card) => self.apply_place(state, player, phase, Some(card)),
            _ => false,
        };
        require(legal, state, DecisionKind::Place, player)
    }

    fn collect_payment(&self, state: &mut GameState, player: PlayerId, decider: &mut dyn Decider) -> Result<()> {
        let Some(placed) = state.players[player].unpaid else {
            state.players[player].step = step::DONE;
            return Ok(());
        };
        let (cost, needs_power) = payment_terms(state, player, placed);
        let special = if needs_power {
            pay_military_powers(state, player)
        } else {
            CardList::new()
        };
        let request = Request::new(DecisionKind::Payment)
            .with_list(state.hand(player))
            .with_special(special)
            .with_args([i32::from(placed.0), cost, 0]);
        let legal = match decider.decide(state, player, &request)? {
            Reply::Payment { cards, special } => self.apply_payment(state, player, placed, &cards, &special),
            _ => false,
        };
        require(legal, state, DecisionKind::Payment, player)
    }

    fn defend_takeover(&self, state: &mut GameState, attacker: PlayerId, decider: &mut dyn Decider) -> Result<()> {
        let target = state.players[attacker].takeover;
        let defender = target.and_then(|t| {
            let card = state.card(t);
            card.owner.filter(|&d| d != attacker && card.location == Location::Active)
        });
        let (Some(target), Some(defender)) = (target, defender) else {
            let p = &mut state.players[attacker];
            p.takeover = None;
            p.step = step::SETTLE_PLACE;
            return Ok(());
        };

        let deficit = state.military(attacker) - state.military(defender);
        let hand = state.hand(defender);
        if deficit <= 0 || hand.is_empty() {
            let resolved = self.apply_defend(state, defender, target, &[]);
            return require(resolved, state, DecisionKind::Defend, defender);
        }
        let request = Request::new(DecisionKind::Defend)
            .with_list(hand)
            .with_args([deficit, i32::from(target.0), 0]);
        let legal = match decider.decide(state, defender, &request)? {
            Reply::Cards(cards) => self.apply_defend(state, defender, target, &cards),
            _ => false,
        };
        require(legal, state, DecisionKind::Defend, defender)
    }

    fn resolve_power(
        &self,
        state: &mut GameState,
        player: PlayerId,
        power: CardIdx,
        decider: &mut dyn Decider,
    ) -> Result<()> {
        let Some(consume) = state.design(power).consume else {
            state.players[player].pending_power = None;
            return Ok(());
        };
        let power_arg = i32::from(power.0);
        match consume.kind {
            ConsumeKind::Goods { count, .. } => {
                let request = Request::new(DecisionKind::ConsumeGoods)
                    .with_list(eligible_goods(state, player, &consume))
                    .with_args([i32::from(count), power_arg, 0]);
                let legal = match decider.decide(state, player, &request)? {
                    Reply::Cards(goods) => self.apply_consume(state, player, power, &goods),
                    _ => false,
                };
                require(legal, state, DecisionKind::ConsumeGoods, player)
            }
            ConsumeKind::Hand { max } => {
                let request = Request::new(DecisionKind::ConsumeHand)
                    .with_list(state.hand(player))
                    .with_args([i32::from(max), power_arg, 0]);
                let legal = match decider.decide(state, player, &request)? {
                    Reply::Cards(cards) => self.apply_consume_hand(state, player, power, &cards),
                    _ => false,
                };
                require(legal, state, DecisionKind::ConsumeHand, player)
            }
            ConsumeKind::Ante => {
                let request = Request::new(DecisionKind::Ante)
                    .with_list(state.hand(player))
                    .with_args([power_arg, 0, 0]);
                let legal = match decider.decide(state, player, &request)? {
                    Reply::Card(card) => self.apply_ante(state, player, power, card),
                    _ => false,
                };
                require(legal, state, DecisionKind::Ante, player)
            }
        }
    }
}

impl RulesEngine for Galaxy {
    fn begin_round(&self, state: &mut GameState) {
        state.round += 1;
        state.phase = None;
        state.selected = [false; 5];
        for (_, p) in state.players.iter_mut() {
            p.prev_selection = p.selection.take();
            p.round_bonus = false;
        }
        if !state.ruleset.prestige_enabled() {
            return;
        }

        let top = state.players.values().map(|p| p.prestige).max().unwrap_or(0);
        let leaders: Vec<PlayerId> = state
            .players
            .iter()
            .filter(|(_, p)| p.prestige == top)
            .map(|(id, _)| id)
            .collect();
        if let [leader] = leaders.as_slice() {
            if top > 0 {
                state.players[*leader].round_bonus = true;
                state.award_vp(*leader, 1);
            }
        }
    }

    fn select_actions(&self, state: &mut GameState, decider: &mut dyn Decider) -> Result<()> {
        let request = Request::new(DecisionKind::Action);
        let selections = state.ruleset.selections();
        let mut chosen = Vec::with_capacity(state.player_count());
        for player in PlayerId::all(state.player_count()) {
            match decider.decide(state, player, &request)? {
                Reply::Selection(selection) if selections.contains(&selection) => chosen.push((player, selection)),
                _ => return Err(illegal(state, DecisionKind::Action, player)),
            }
        }
        for (player, selection) in chosen {
            state.select(player, selection);
        }
        Ok(())
    }

    fn resolve_phase(&self, state: &mut GameState, phase: Phase, decider: &mut dyn Decider) -> Result<()> {
        for player in PlayerId::all(state.player_count()) {
            match phase {
                Phase::Explore => self.explore(state, player, decider)?,
                Phase::Develop => self.develop(state, player, decider)?,
                Phase::Settle => self.settle(state, player, decider)?,
                Phase::Consume => self.consume(state, player, decider)?,
                Phase::Produce => self.produce(state, player),
            }
        }
        self.check_goals(state);
        Ok(())
    }

    fn end_round(&self, state: &mut GameState, decider: &mut dyn Decider) -> Result<()> {
        for player in PlayerId::all(state.player_count()) {
            let excess = state.hand_size(player) - HAND_LIMIT;
            if excess <= 0 {
                continue;
            }
            let hidden = excess.min(state.players[player].fake_hand.max(0));
            state.discard_hidden(player, hidden);
            let count = (excess - hidden) as usize;
            if count == 0 {
                continue;
            }
            let request = Request::new(DecisionKind::Discard)
                .with_list(state.hand(player))
                .with_args([count as i32, 0, 0]);
            let legal = match decider.decide(state, player, &request)? {
                Reply::Cards(cards) if cards.len() == count => self.apply_discard(state, player, &cards),
                _ => false,
            };
            require(legal, state, DecisionKind::Discard, player)?;
        }

        self.check_goals(state);
        if self.check_game_end(state) {
            state.game_over = true;
            self.score_game(state);
            if !state.is_hypothetical() {
                let scores: Vec<i32> = state.players.values().map(|p| p.end_score).collect();
                log::info!("game over in round {} with scores {scores:?}", state.round);
            }
        }
        state.record_round();
        Ok(())
    }

    fn check_goals(&self, state: &mut GameState) {
        if !state.ruleset.goals_enabled() {
            return;
        }
        for i in 0..state.goals.len() {
            if !state.goals[i].available {
                continue;
            }
            let kind = state.goals[i].kind;
            let claimed = PlayerId::all(state.player_count())
                .filter(|&p| kind.reached(state, p))
                .fold(0u8, |mask, p| mask | 1 << p.0);
            if claimed != 0 {
                state.goals[i].claimed = claimed;
                state.goals[i].available = false;
            }
        }
    }

    fn check_game_end(&self, state: &GameState) -> bool {
        state.vp_pool <= 0 || PlayerId::all(state.player_count()).any(|p| state.tableau_size(p) >= TABLEAU_LIMIT)
    }

    fn score_game(&self, state: &mut GameState) {
        let players: Vec<PlayerId> = PlayerId::all(state.player_count()).collect();
        let scores: Vec<i32> = players.iter().map(|&p| state.score(p)).collect();
        let tie_breaks: Vec<i32> = players
            .iter()
            .map(|&p| state.goods(p).len() as i32 + state.hand_size(p))
            .collect();

        let best = scores.iter().copied().max().unwrap_or(0);
        let best_tie_break = players
            .iter()
            .filter(|p| scores[p.index()] == best)
            .map(|p| tie_breaks[p.index()])
            .max()
            .unwrap_or(0);
        for &p in &players {
            let i = p.index();
            let player = &mut state.players[p];
            player.end_score = scores[i];
            player.winner = scores[i] == best && tie_breaks[i] == best_tie_break;
        }
    }

    fn apply_discard(&self, state: &mut GameState, player: PlayerId, cards: &[CardIdx]) -> bool {
        if !all_in_hand(state, player, cards) {
            return false;
        }
        for &c in cards {
            state.discard(c);
        }
        if state.phase == Some(Phase::Explore) && state.players[player].step == step::EXPLORE_KEEP {
            state.players[player].step = step::DONE;
        }
        true
    }

    fn apply_place(&self, state: &mut GameState, player: PlayerId, phase: Phase, card: Option<CardIdx>) -> bool {
        let (place_step, pay_step) = match phase {
            Phase::Develop => (step::DEVELOP_PLACE, step::DEVELOP_PAY),
            Phase::Settle => (step::SETTLE_PLACE, step::SETTLE_PAY),
            _ => return false,
        };
        if state.phase != Some(phase) || state.players[player].step != place_step {
            return false;
        }
        let Some(card) = card else {
            state.players[player].step = step::DONE;
            return true;
        };
        if !can_place(state, player, phase, card) {
            return false;
        }

        let design = state.design(card);
        let (windfall, prestige) = (design.windfall, design.prestige);
        let conquered = design.military_world && state.military(player) >= design.cost;
        state.place(card, player);
        if windfall {
            state.cards[card.index()].good = true;
        }
        if state.ruleset.prestige_enabled() {
            state.players[player].prestige += prestige;
        }

        let (cost, _) = payment_terms(state, player, card);
        if conquered || cost == 0 {
            finish_placement(state, player);
        } else {
            let p = &mut state.players[player];
            p.unpaid = Some(card);
            p.step = pay_step;
        }
        true
    }

    fn apply_payment(
        &self,
        state: &mut GameState,
        player: PlayerId,
        placed: CardIdx,
        cards: &[CardIdx],
        special: &[CardIdx],
    ) -> bool {
        if state.players[player].unpaid != Some(placed) || !all_in_hand(state, player, cards) {
            return false;
        }
        let (cost, needs_power) = payment_terms(state, player, placed);
        let power_ok = if needs_power {
            matches!(special, [p] if state.card(*p).active_for(player) && state.design(*p).pay_military)
        } else {
            special.is_empty()
        };
        let paid = cards.len() as i32;
        if !power_ok || paid > cost {
            return false;
        }
        let shortfall = cost - paid;
        if shortfall > 0 && !(state.is_hypothetical() && state.discard_hidden(player, shortfall)) {
            return false;
        }

        for &c in cards {
            state.discard(c);
        }
        state.players[player].unpaid = None;
        finish_placement(state, player);
        true
    }

    fn apply_trade(&self, state: &mut GameState, player: PlayerId, good: CardIdx) -> bool {
        if state.phase != Some(Phase::Consume) || state.players[player].step != step::CONSUME_TRADE {
            return false;
        }
        let card = state.card(good);
        if !card.active_for(player) || !card.good {
            return false;
        }
        let Some(good_type) = state.good_type(good) else {
            return false;
        };
        state.cards[good.index()].good = false;
        state.draw(player, good_type.trade_value() as usize);
        state.players[player].step = step::CONSUME_POWERS;
        true
    }

    fn apply_consume_power(&self, state: &mut GameState, player: PlayerId, power: Option<CardIdx>) -> bool {
        let p = &state.players[player];
        if state.phase != Some(Phase::Consume) || p.step != step::CONSUME_POWERS || p.pending_power.is_some() {
            return false;
        }
        match power {
            None => {
                state.players[player].step = step::DONE;
                true
            }
            Some(power) if usable_powers(state, player).contains(&power) => {
                state.players[player].pending_power = Some(power);
                true
            }
            Some(_) => false,
        }
    }

    fn apply_consume(&self, state: &mut GameState, player: PlayerId, power: CardIdx, goods: &[CardIdx]) -> bool {
        let Some(consume) = pending_consume(state, player, power) else {
            return false;
        };
        let ConsumeKind::Goods { count, .. } = consume.kind else {
            return false;
        };
        let eligible = goods.iter().all(|&g| {
            let card = state.card(g);
            card.active_for(player) && card.good && state.good_type(g).is_some_and(|t| consume.accepts(t))
        });
        if goods.len() != usize::from(count) || !distinct(goods) || !eligible {
            return false;
        }

        for &g in goods {
            state.cards[g.index()].good = false;
        }
        reward(state, player, consume.vp, consume.cards);
        finish_power(state, player, power);
        true
    }

    fn apply_consume_hand(&self, state: &mut GameState, player: PlayerId, power: CardIdx, cards: &[CardIdx]) -> bool {
        let Some(consume) = pending_consume(state, player, power) else {
            return false;
        };
        let ConsumeKind::Hand { max } = consume.kind else {
            return false;
        };
        if cards.len() > usize::from(max) || !all_in_hand(state, player, cards) {
            return false;
        }

        for &c in cards {
            state.discard(c);
        }
        reward(state, player, consume.vp * cards.len() as i32, 0);
        finish_power(state, player, power);
        true
    }

    fn apply_takeover(&self, state: &mut GameState, player: PlayerId, target: Option<CardIdx>) -> bool {
        if state.phase != Some(Phase::Settle) || state.players[player].step != step::SETTLE_TAKEOVER {
            return false;
        }
        match target {
            None => {
                state.players[player].step = step::SETTLE_PLACE;
                true
            }
            Some(target) if takeover_targets(state, player).contains(&target) => {
                let p = &mut state.players[player];
                p.takeover = Some(target);
                p.step = step::SETTLE_DEFEND;
                true
            }
            Some(_) => false,
        }
    }

    fn apply_defend(&self, state: &mut GameState, player: PlayerId, target: CardIdx, cards: &[CardIdx]) -> bool {
        if state.phase != Some(Phase::Settle) {
            return false;
        }
        let attacker = PlayerId::all(state.player_count()).find(|&p| {
            let a = &state.players[p];
            a.takeover == Some(target) && a.step == step::SETTLE_DEFEND
        });
        let Some(attacker) = attacker else {
            return false;
        };
        if state.card(target).owner != Some(player) || !all_in_hand(state, player, cards) {
            return false;
        }

        for &c in cards {
            state.discard(c);
        }
        let defense = state.military(player) + cards.len() as i32;
        if state.military(attacker) > defense {
            state.place(target, attacker);
            if !state.is_hypothetical() {
                log::debug!("{attacker} takes over {} from {player}", state.design(target).name);
            }
        }
        let a = &mut state.players[attacker];
        a.takeover = None;
        a.step = step::SETTLE_PLACE;
        true
    }

    fn apply_search(&self, state: &mut GameState, player: PlayerId, category: i32) -> bool {
        if state.phase != Some(Phase::Explore) || state.players[player].step != step::EXPLORE_SEARCH {
            return false;
        }
        if category < 0 {
            state.players[player].step = step::EXPLORE_DRAW;
            return true;
        }
        let Some(category) = SearchCategory::from_index(category) else {
            return false;
        };
        if !can_search(state, player) {
            return false;
        }

        state.players[player].prestige -= 1;
        let found: Vec<CardIdx> = state
            .card_ids()
            .filter(|&c| state.card(c).location == Location::Deck && category.matches(state.design(c)))
            .collect();
        if !found.is_empty() {
            if state.is_hypothetical() {
                state.players[player].fake_hand += 1;
            } else {
                let card = found[state.rng.gen_range_usize(0..found.len())];
                state.move_to_hand(card, player);
            }
        }
        // Searching replaces the explore draw.
        state.players[player].step = step::DONE;
        true
    }

    fn apply_ante(&self, state: &mut GameState, player: PlayerId, power: CardIdx, card: Option<CardIdx>) -> bool {
        let Some(consume) = pending_consume(state, player, power) else {
            return false;
        };
        if consume.kind != ConsumeKind::Ante {
            return false;
        }
        if let Some(card) = card {
            if !state.card(card).in_hand_of(player) {
                return false;
            }
            let deck: Vec<CardIdx> = state
                .card_ids()
                .filter(|&c| state.card(c).location == Location::Deck)
                .collect();
            if deck.is_empty() {
                return false;
            }
            let reveal = deck[state.rng.gen_range_usize(0..deck.len())];
            let won = state.design(reveal).cost > state.design(card).cost;
            match (won, state.is_hypothetical()) {
                (true, true) => state.players[player].fake_hand += 1,
                (true, false) => state.move_to_hand(reveal, player),
                (false, hypothetical) => {
                    state.discard(card);
                    if !hypothetical {
                        state.discard(reveal);
                    }
                }
            }
        }
        finish_power(state, player, power);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GoalKind, Selection};
    use crate::rules::{play_game, play_round, GameResult};
    use crate::search::simulate;

    /// Takes the first legal option of every decision.
    struct FirstLegal;

    impl Decider for FirstLegal {
        fn decide(&mut self, state: &GameState, player: PlayerId, request: &Request) -> Result<Reply> {
            let take = |n: i32| -> CardList { request.list.iter().copied().take(n.max(0) as usize).collect() };
            Ok(match request.kind {
                DecisionKind::Action => {
                    let selections = state.ruleset.selections();
                    Reply::Selection(selections[(state.round as usize + player.index()) % selections.len()])
                }
                DecisionKind::Discard | DecisionKind::ConsumeGoods => Reply::Cards(take(request.args[0])),
                DecisionKind::Place | DecisionKind::Trade => Reply::Card(request.list.first().copied()),
                DecisionKind::Payment => Reply::Payment {
                    cards: take(request.args[1]),
                    special: request.special.iter().copied().take(1).collect(),
                },
                DecisionKind::ConsumePower => Reply::Card(request.special.first().copied()),
                DecisionKind::ConsumeHand | DecisionKind::Defend => Reply::Cards(CardList::new()),
                DecisionKind::Takeover | DecisionKind::Ante => Reply::Card(None),
                DecisionKind::SearchCategory => Reply::Index(-1),
            })
        }
    }

    struct Cheater;

    impl Decider for Cheater {
        fn decide(&mut self, _: &GameState, _: PlayerId, _: &Request) -> Result<Reply> {
            Ok(Reply::Selection(Selection::single(Action::Develop2)))
        }
    }

    fn named(state: &GameState, name: &str) -> Vec<CardIdx> {
        state.card_ids().filter(|&c| state.design(c).name == name).collect()
    }

    fn seat(i: u8) -> PlayerId {
        PlayerId::new(i)
    }

    #[test]
    fn test_new_game_deals_start_worlds_and_hands() {
        let (_, state) = new_game(Options::new(4), 3);
        for p in PlayerId::all(4) {
            let tableau = state.tableau(p);
            assert_eq!(tableau.len(), 1);
            assert!(state.design(tableau[0]).start_world);
            assert_eq!(state.hand(p).len(), START_HAND);
        }
        assert_eq!(state.round, 0);
    }

    #[test]
    fn test_same_seed_same_deal() {
        let (_, a) = new_game(Options::new(3), 17);
        let (_, b) = new_game(Options::new(3), 17);
        assert_eq!(a.cards, b.cards);
    }

    #[test]
    fn test_full_game_reaches_an_end() {
        for options in [Options::new(2), Options::new(3).with_expansion(2), Options::new(2).advanced()] {
            let (rules, mut state) = new_game(options, 5);
            let result = play_game(&rules, &mut state, &mut FirstLegal, 300).unwrap();
            assert!(state.game_over);
            let result = result.unwrap();
            let top = state.players.values().map(|p| p.end_score).max().unwrap();
            for (p, player) in state.players.iter() {
                assert_eq!(result.is_winner(p), player.winner);
                if player.winner {
                    assert_eq!(player.end_score, top);
                }
            }
            assert_eq!(state.history.len(), state.round as usize);
        }
    }

    #[test]
    fn test_rounds_keep_cards_consistent() {
        let (rules, mut state) = new_game(Options::new(3).with_expansion(1), 9);
        for _ in 0..15 {
            play_round(&rules, &mut state, &mut FirstLegal).unwrap();
            for card in &state.cards {
                let owned = matches!(card.location, Location::Hand | Location::Active);
                assert_eq!(card.owner.is_some(), owned);
                assert!(!card.good || card.location == Location::Active);
            }
            for p in PlayerId::all(3) {
                assert!(state.hand_size(p) <= HAND_LIMIT);
            }
        }
    }

    #[test]
    fn test_illegal_selection_rejected() {
        let (rules, mut state) = new_game(Options::new(2), 1);
        rules.begin_round(&mut state);
        let err = rules.select_actions(&mut state, &mut Cheater).unwrap_err();
        assert!(matches!(err, Error::IllegalReply { kind: DecisionKind::Action, .. }));
        assert!(state.players.values().all(|p| p.selection.is_none()));
    }

    #[test]
    fn test_develop_place_and_pay() {
        let (rules, mut state) = new_game(Options::new(2), 11);
        let p = seat(0);
        let marines = named(&state, "Space Marines")[0];
        state.move_to_hand(marines, p);
        state.select(p, Selection::single(Action::Develop));
        state.begin_phase(Phase::Develop);

        assert!(rules.apply_place(&mut state, p, Phase::Develop, Some(marines)));
        assert_eq!(state.players[p].unpaid, Some(marines));
        assert!(state.card(marines).active_for(p));

        // cost two, one off for selecting Develop
        let hand = state.hand(p);
        assert!(!rules.apply_payment(&mut state.clone(), p, marines, &hand[..2], &[]));
        assert!(!rules.apply_payment(&mut state.clone(), p, marines, &[], &[]));
        assert!(rules.apply_payment(&mut state, p, marines, &hand[..1], &[]));
        assert_eq!(state.players[p].step, step::DONE);
        assert!(state.players[p].unpaid.is_none());
        assert_eq!(state.hand(p).len(), hand.len() - 1);
    }

    #[test]
    fn test_duplicate_development_not_placeable() {
        let (rules, mut state) = new_game(Options::new(2), 11);
        let p = seat(0);
        let credits = named(&state, "Investment Credits");
        state.place(credits[0], p);
        state.move_to_hand(credits[1], p);
        state.begin_phase(Phase::Develop);
        assert!(!rules.apply_place(&mut state, p, Phase::Develop, Some(credits[1])));
    }

    #[test]
    fn test_hidden_cards_cover_shortfall_only_in_copies() {
        let (rules, mut state) = new_game(Options::new(2), 4);
        let p = seat(0);
        let renaissance = named(&state, "Galactic Renaissance")[0];
        state.move_to_hand(renaissance, p);
        state.select(p, Selection::single(Action::Develop));
        state.begin_phase(Phase::Develop);

        let mut sim = simulate(&state, p, 1);
        sim.players[p].fake_hand = 3;
        assert!(rules.apply_place(&mut sim, p, Phase::Develop, Some(renaissance)));
        let hand = sim.hand(p);
        assert!(rules.apply_payment(&mut sim, p, renaissance, &hand[..2], &[]));
        assert_eq!(sim.players[p].fake_hand, 0);

        state.draw(p, 2);
        assert!(rules.apply_place(&mut state, p, Phase::Develop, Some(renaissance)));
        let hand = state.hand(p);
        assert!(!rules.apply_payment(&mut state, p, renaissance, &hand[..2], &[]));
    }

    #[test]
    fn test_resume_payment_mid_phase() {
        let (rules, mut state) = new_game(Options::new(2), 8);
        let p = seat(0);
        let marines = named(&state, "Space Marines")[0];
        state.move_to_hand(marines, p);
        state.select(p, Selection::single(Action::Develop));
        state.begin_phase(Phase::Develop);

        let mut sim = simulate(&state, p, 2);
        assert!(rules.apply_place(&mut sim, p, Phase::Develop, Some(marines)));
        let before = sim.hand_size(p);
        rules.resolve_phase(&mut sim, Phase::Develop, &mut FirstLegal).unwrap();
        assert!(sim.players[p].unpaid.is_none());
        assert_eq!(sim.hand_size(p), before - 1);
        assert!(sim.players.values().all(|pl| pl.step == step::DONE));
    }

    #[test]
    fn test_military_world_needs_strength() {
        let (rules, mut state) = new_game(Options::new(2), 6);
        let p = seat(1);
        let outpost = named(&state, "Rebel Outpost")[0];
        state.move_to_hand(outpost, p);
        state.begin_phase(Phase::Settle);
        state.players[p].step = step::SETTLE_PLACE;
        let mut weak = state.clone();
        assert!(!rules.apply_place(&mut weak, p, Phase::Settle, Some(outpost)));

        for marines in named(&state, "Space Marines") {
            state.place(marines, p);
        }
        state.place(named(&state, "Expedition Force")[0], p);
        assert!(state.military(p) >= 5);
        assert!(rules.apply_place(&mut state, p, Phase::Settle, Some(outpost)));
        assert_eq!(state.players[p].step, step::DONE);
        assert!(state.players[p].unpaid.is_none());
    }

    #[test]
    fn test_trade_draws_by_good_type() {
        let (rules, mut state) = new_game(Options::new(2), 2);
        let p = seat(0);
        let gem = named(&state, "Gem World")[0];
        state.place(gem, p);
        state.cards[gem.index()].good = true;
        state.select(p, Selection::single(Action::ConsumeTrade));
        state.begin_phase(Phase::Consume);

        let before = state.hand_size(p);
        assert!(rules.apply_trade(&mut state, p, gem));
        assert_eq!(state.hand_size(p), before + 3);
        assert!(!state.card(gem).good);
        assert_eq!(state.players[p].step, step::CONSUME_POWERS);
    }

    #[test]
    fn test_consume_doubles_vp() {
        let (rules, mut state) = new_game(Options::new(2), 2);
        let p = seat(0);
        let tourist = named(&state, "Tourist World")[0];
        let spice = named(&state, "Spice World")[0];
        state.place(tourist, p);
        state.place(spice, p);
        state.cards[spice.index()].good = true;
        state.select(p, Selection::single(Action::ConsumeX2));
        state.begin_phase(Phase::Consume);
        state.players[p].step = step::CONSUME_POWERS;

        let vp = state.players[p].vp;
        assert!(rules.apply_consume_power(&mut state, p, Some(tourist)));
        assert!(!rules.apply_consume(&mut state.clone(), p, tourist, &[]));
        assert!(rules.apply_consume(&mut state, p, tourist, &[spice]));
        assert_eq!(state.players[p].vp, vp + 2);
        assert!(state.players[p].used.contains(&tourist));
        assert!(!usable_powers(&state, p).contains(&tourist));
    }

    #[test]
    fn test_consume_hand_pays_per_card() {
        let (rules, mut state) = new_game(Options::new(2), 2);
        let p = seat(1);
        let guild = named(&state, "Merchant Guild")[0];
        state.place(guild, p);
        state.begin_phase(Phase::Consume);
        state.players[p].step = step::CONSUME_POWERS;

        assert!(rules.apply_consume_power(&mut state, p, Some(guild)));
        let hand = state.hand(p);
        assert!(!rules.apply_consume_hand(&mut state.clone(), p, guild, &hand[..3]));
        let vp = state.players[p].vp;
        assert!(rules.apply_consume_hand(&mut state, p, guild, &hand[..2]));
        assert_eq!(state.players[p].vp, vp + 2);
        assert_eq!(state.hand(p).len(), hand.len() - 2);
    }

    #[test]
    fn test_goal_goes_to_first_only() {
        let (rules, mut state) = new_game(Options::new(2).with_expansion(1), 2);
        let devs: Vec<CardIdx> = state
            .card_ids()
            .filter(|&c| state.design(c).kind == CardKind::Development && state.card(c).location == Location::Deck)
            .collect();
        for &d in &devs[..4] {
            state.place(d, seat(0));
        }
        rules.check_goals(&mut state);
        let goal = state.goals.iter().find(|g| g.kind == GoalKind::Developments).unwrap();
        assert!(goal.claimed_by(seat(0)));
        assert!(!goal.available);

        for &d in &devs[4..8] {
            state.place(d, seat(1));
        }
        rules.check_goals(&mut state);
        let goal = state.goals.iter().find(|g| g.kind == GoalKind::Developments).unwrap();
        assert!(!goal.claimed_by(seat(1)));
    }

    #[test]
    fn test_takeover_by_stronger_attacker() {
        let (rules, mut state) = new_game(Options::new(2).with_expansion(2), 2);
        let (attacker, defender) = (seat(0), seat(1));
        for marines in named(&state, "Space Marines") {
            state.place(marines, attacker);
        }
        state.place(named(&state, "Imperium Seat")[0], attacker);
        let outpost = named(&state, "Rebel Outpost")[0];
        state.place(outpost, defender);
        state.begin_phase(Phase::Settle);

        assert!(takeover_targets(&state, attacker).contains(&outpost));
        assert!(!rules.apply_takeover(&mut state.clone(), attacker, Some(state.tableau(attacker)[0])));

        let mut held = state.clone();
        assert!(rules.apply_takeover(&mut state, attacker, Some(outpost)));
        assert_eq!(state.players[attacker].step, step::SETTLE_DEFEND);
        assert!(rules.apply_defend(&mut state, defender, outpost, &[]));
        assert!(state.card(outpost).active_for(attacker));
        assert_eq!(state.players[attacker].step, step::SETTLE_PLACE);

        // enough discards hold the world
        held.draw(defender, 8);
        assert!(rules.apply_takeover(&mut held, attacker, Some(outpost)));
        let deficit = (held.military(attacker) - held.military(defender)) as usize;
        let cards = held.hand(defender);
        assert!(rules.apply_defend(&mut held, defender, outpost, &cards[..deficit]));
        assert!(held.card(outpost).active_for(defender));
    }

    #[test]
    fn test_search_spends_prestige() {
        let (rules, mut state) = new_game(Options::new(2).with_expansion(2), 2);
        let p = seat(0);
        state.players[p].prestige = 1;
        state.select(p, Selection::single(Action::Explore5));
        state.begin_phase(Phase::Explore);

        let before = state.hand_size(p);
        assert!(!rules.apply_search(&mut state.clone(), p, SearchCategory::ALL.len() as i32));
        assert!(rules.apply_search(&mut state, p, 1));
        assert_eq!(state.players[p].prestige, 0);
        assert_eq!(state.hand_size(p), before + 1);
        assert_eq!(state.players[p].step, step::DONE);
        let found = state.hand(p).into_iter().find(|&c| state.design(c).military_world);
        assert!(found.is_some());
    }

    #[test]
    fn test_hypothetical_explore_draws_hidden() {
        let (rules, state) = new_game(Options::new(2), 2);
        let mut sim = simulate(&state, seat(0), 3);
        rules.begin_round(&mut sim);
        sim.select(seat(0), Selection::single(Action::Explore5));
        sim.select(seat(1), Selection::single(Action::Produce));
        sim.begin_phase(Phase::Explore);
        rules.resolve_phase(&mut sim, Phase::Explore, &mut FirstLegal).unwrap();
        assert_eq!(sim.players[seat(0)].fake_hand, 1);
        assert_eq!(sim.hand_size(seat(1)), START_HAND as i32 + 1);
        assert_eq!(sim.count_location(Location::Deck), state.count_location(Location::Deck) + START_HAND);
    }

    #[test]
    fn test_hand_limit_enforced() {
        let (rules, mut state) = new_game(Options::new(2), 2);
        state.draw(seat(0), 9);
        rules.end_round(&mut state, &mut FirstLegal).unwrap();
        assert_eq!(state.hand_size(seat(0)), HAND_LIMIT);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_prestige_leader_bonus() {
        let (rules, mut state) = new_game(Options::new(3).with_expansion(2), 2);
        state.players[seat(2)].prestige = 2;
        state.players[seat(0)].prestige = 1;
        rules.begin_round(&mut state);
        assert!(state.players[seat(2)].round_bonus);
        assert_eq!(state.players[seat(2)].vp, 1);

        state.players[seat(0)].prestige = 2;
        rules.begin_round(&mut state);
        assert!(state.players.values().all(|p| !p.round_bonus));
    }

    #[test]
    fn test_tie_broken_by_goods_and_hand() {
        let (rules, mut state) = new_game(Options::new(2), 2);
        for card in &mut state.cards {
            card.good = false;
        }
        let spice = named(&state, "Spice World")[0];
        state.place(spice, seat(0));
        let gap = state.score(seat(0)) - state.score(seat(1));
        state.players[seat(1)].vp += gap;
        assert_eq!(state.hand_size(seat(0)), state.hand_size(seat(1)));

        let mut shared = state.clone();
        rules.score_game(&mut shared);
        assert_eq!(shared.players[seat(0)].end_score, shared.players[seat(1)].end_score);
        assert!(shared.players.values().all(|p| p.winner));

        state.cards[spice.index()].good = true;
        state.game_over = true;
        rules.score_game(&mut state);
        assert_eq!(GameResult::from_state(&state), Some(GameResult::Winner(seat(0))));
    }

    #[test]
    fn test_game_ends_on_empty_pool() {
        let (rules, mut state) = new_game(Options::new(2), 2);
        assert!(!rules.check_game_end(&state));
        state.award_vp(seat(0), state.vp_pool);
        assert!(rules.check_game_end(&state));
    }

    #[test]
    fn test_search_category_lookup() {
        assert_eq!(SearchCategory::from_index(0), Some(SearchCategory::BigDevelopment));
        assert_eq!(SearchCategory::from_index(-1), None);
        assert_eq!(SearchCategory::from_index(5), None);
    }
}
