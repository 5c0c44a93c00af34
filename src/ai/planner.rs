//! The search-based decider.
//!
//! Every candidate reply is materialized on a hypothetical copy through the
//! rules engine's appliers, the turn is completed (decisions inside the copy
//! come back to this same planner), and the result is scored by the value
//! network. The reply taken is the first candidate scoring within epsilon of
//! the best.
//!
//! Decisions on real states are logged, update the networks and end with a
//! cache flush. Decisions inside hypothetical states only search.

use std::ops::RangeInclusive;

use super::choices::ChoiceRecord;
use super::request::{Decider, DecisionKind, Reply, Request};
use crate::core::{CardIdx, CardList, GameState, Location, PlayerId};
use crate::error::{Error, Result};
use crate::rules::RulesEngine;
use crate::search::{best_subset_in, complete_turn, simulate, Granularity};
use crate::training::Brain;

/// Capacity of the per-decision candidate score table.
pub const MAX_CANDIDATES: usize = 4096;

/// Scores of the candidates of one decision, in enumeration order.
pub(crate) struct Scored<T> {
    entries: Vec<(T, f64)>,
}

impl<T: Clone> Scored<T> {
    pub(crate) fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub(crate) fn push(&mut self, candidate: T, score: f64) -> Result<()> {
        if self.entries.len() == MAX_CANDIDATES {
            log::error!("candidate score table full at {MAX_CANDIDATES}");
            return Err(Error::CapacityExceeded {
                table: "candidate scores",
                capacity: MAX_CANDIDATES,
            });
        }
        log::trace!("candidate {} scored {score:.6}", self.entries.len());
        self.entries.push((candidate, score));
        Ok(())
    }

    pub(crate) fn entries(&self) -> &[(T, f64)] {
        &self.entries
    }

    /// First candidate scoring at least `max - epsilon`.
    pub(crate) fn pick(&self, epsilon: f64) -> Option<(T, f64)> {
        let max = self.entries.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
        self.entries
            .iter()
            .find(|(_, s)| *s >= max - epsilon)
            .cloned()
    }
}

pub struct Planner<'a, R: ?Sized> {
    pub(crate) rules: &'a R,
    pub(crate) brain: &'a mut Brain,
    /// Hypothetical turns currently being completed.
    pub(crate) depth: u32,
}

impl<'a, R: RulesEngine + ?Sized> Planner<'a, R> {
    pub fn new(rules: &'a R, brain: &'a mut Brain) -> Self {
        Self { rules, brain, depth: 0 }
    }

    /// `granularity` when a phase is being resolved; decisions outside the
    /// phase sequence are scored as they stand.
    pub(crate) fn within_phase(state: &GameState, granularity: Granularity) -> Option<Granularity> {
        state.phase.map(|_| granularity)
    }

    /// Materialize one candidate in a hypothetical copy, finish the turn as
    /// far as `granularity` and the depth limit allow, and score it for
    /// `player`. Illegal candidates score `None`.
    pub(crate) fn score_with<F>(
        &mut self,
        state: &GameState,
        player: PlayerId,
        granularity: Option<Granularity>,
        apply: F,
    ) -> Result<Option<f64>>
    where
        F: FnOnce(&R, &mut GameState) -> bool,
    {
        let salt = self.brain.next_salt();
        let mut sim = simulate(state, player, salt);
        if !apply(self.rules, &mut sim) {
            return Ok(None);
        }

        if let Some(granularity) = granularity {
            if self.depth < self.brain.config().search_depth {
                let rules = self.rules;
                self.depth += 1;
                let finished = complete_turn(rules, &mut sim, granularity, self);
                self.depth -= 1;
                finished?;
            }
        }
        self.brain.evaluate(self.rules, &sim, player).map(Some)
    }

    /// Best single-card reply among `options`.
    pub(crate) fn best_option<F>(
        &mut self,
        state: &GameState,
        player: PlayerId,
        options: &[Option<CardIdx>],
        granularity: Option<Granularity>,
        apply: F,
    ) -> Result<Option<Option<CardIdx>>>
    where
        F: Fn(&R, &mut GameState, Option<CardIdx>) -> bool,
    {
        let mut table = Scored::new();
        for &option in options {
            if let Some(score) = self.score_with(state, player, granularity, |rules, sim| apply(rules, sim, option))? {
                table.push(option, score)?;
            }
        }
        Ok(table.pick(self.brain.config().epsilon).map(|(o, _)| o))
    }

    /// Best subset of `items` with a size in `sizes`.
    ///
    /// Long lists are first cut down to the items whose loss hurts least.
    pub(crate) fn best_cards<F>(
        &mut self,
        state: &GameState,
        player: PlayerId,
        items: &[CardIdx],
        sizes: RangeInclusive<usize>,
        granularity: Option<Granularity>,
        apply: F,
    ) -> Result<Option<CardList>>
    where
        F: Fn(&R, &mut GameState, &[CardIdx]) -> bool,
    {
        let keep = self.brain.config().max_subset_items.max(*sizes.end());
        let items = self.prefilter(state, player, items, keep)?;
        let outcome = best_subset_in(&items, sizes, |cards| {
            self.score_with(state, player, granularity, |rules, sim| apply(rules, sim, cards))
        })?;
        log::trace!("subset search scored {} subsets", outcome.materialized);
        Ok(outcome.best.map(|(cards, _)| cards.into_iter().collect()))
    }

    /// Keep the `keep` items whose removal costs `player` least, in their
    /// original order.
    pub(crate) fn prefilter(
        &mut self,
        state: &GameState,
        player: PlayerId,
        items: &[CardIdx],
        keep: usize,
    ) -> Result<Vec<CardIdx>> {
        if items.len() <= keep {
            return Ok(items.to_vec());
        }
        let mut ranked = Vec::with_capacity(items.len());
        for (pos, &card) in items.iter().enumerate() {
            let salt = self.brain.next_salt();
            let mut sim = simulate(state, player, salt);
            give_up(&mut sim, card);
            let score = self.brain.evaluate(self.rules, &sim, player)?;
            ranked.push((pos, card, score));
        }
        ranked.sort_by(|a, b| b.2.total_cmp(&a.2));
        ranked.truncate(keep);
        ranked.sort_by_key(|(pos, _, _)| *pos);
        log::debug!("pruned {} candidates to {keep}", items.len());
        Ok(ranked.into_iter().map(|(_, card, _)| card).collect())
    }

    pub(crate) fn exhausted(&self, state: &GameState, player: PlayerId, kind: DecisionKind) -> Error {
        log::error!("no legal {kind:?} reply for {player} in round {}", state.round);
        Error::SearchExhausted {
            kind,
            player,
            round: state.round,
        }
    }
}

/// Remove a hand card or a good without going through the rules.
fn give_up(state: &mut GameState, card: CardIdx) {
    match state.card(card).location {
        Location::Hand => state.discard(card),
        Location::Active => state.cards[card.index()].good = false,
        _ => {}
    }
}

impl<R: RulesEngine + ?Sized> Decider for Planner<'_, R> {
    fn decide(&mut self, state: &GameState, player: PlayerId, request: &Request) -> Result<Reply> {
        let reply = match request.kind {
            DecisionKind::Action => self.choose_action(state, player)?,
            DecisionKind::Discard => self.choose_discard(state, player, request)?,
            DecisionKind::Place => self.choose_place(state, player, request)?,
            DecisionKind::Payment => self.choose_payment(state, player, request)?,
            DecisionKind::Trade => self.choose_trade(state, player, request)?,
            DecisionKind::ConsumePower => self.choose_consume_power(state, player, request)?,
            DecisionKind::ConsumeGoods => self.choose_consume_goods(state, player, request)?,
            DecisionKind::ConsumeHand => self.choose_consume_hand(state, player, request)?,
            DecisionKind::Takeover => self.choose_takeover(state, player, request)?,
            DecisionKind::Defend => self.choose_defense(state, player, request)?,
            DecisionKind::SearchCategory => self.choose_search(state, player, request)?,
            DecisionKind::Ante => self.choose_ante(state, player, request)?,
        };

        if !state.is_hypothetical() {
            log::debug!("{player} round {} {:?}: {reply:?}", state.round, request.kind);
            self.brain
                .record_choice(player, ChoiceRecord::new(state.round, request, &reply));
            self.brain.end_decision();
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_takes_first_within_epsilon() {
        let mut table = Scored::new();
        table.push('a', 0.5).unwrap();
        table.push('b', 0.50000005).unwrap();
        table.push('c', 0.4).unwrap();
        assert_eq!(table.pick(1e-7).unwrap().0, 'a');
        assert_eq!(table.pick(0.0).unwrap().0, 'b');
    }

    #[test]
    fn test_pick_on_empty_table() {
        let table: Scored<u8> = Scored::new();
        assert!(table.pick(1e-7).is_none());
    }

    #[test]
    fn test_table_capacity_is_fatal() {
        let mut table = Scored::new();
        for i in 0..MAX_CANDIDATES {
            table.push(i, 0.0).unwrap();
        }
        let err = table.push(0, 0.0).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(table.entries().len(), MAX_CANDIDATES);
    }
}
