//! One search routine per decision kind.

use super::planner::{Planner, Scored};
use super::predict::{covering_combos, softmax_target};
use super::request::{DecisionKind, Reply, Request};
use crate::core::{CardIdx, GameState, Phase, PlayerId};
use crate::error::Result;
use crate::rules::RulesEngine;
use crate::search::{best_with_specials, simulate, Granularity};

/// Single-card options followed by declining.
fn with_decline(list: &[CardIdx]) -> Vec<Option<CardIdx>> {
    list.iter().copied().map(Some).chain(std::iter::once(None)).collect()
}

fn count_arg(request: &Request, slot: usize) -> usize {
    request.args[slot].max(0) as usize
}

impl<R: RulesEngine + ?Sized> Planner<'_, R> {
    /// Score every selection against the likely selections of the other
    /// seats and train the predictor toward the result.
    pub(crate) fn choose_action(&mut self, state: &GameState, player: PlayerId) -> Result<Reply> {
        let selections = state.ruleset.selections();
        let opponents: Vec<PlayerId> = player.rotation(state.player_count()).skip(1).collect();

        let view = simulate(state, player, self.brain.next_salt());
        let mut dists = Vec::with_capacity(opponents.len());
        for &opp in &opponents {
            dists.push(self.brain.predictor.predict(&view, opp)?);
        }
        let (coverage, min_threshold) = (self.brain.config().coverage, self.brain.config().min_threshold);
        let (combos, threshold) = covering_combos(&dists, coverage, min_threshold);
        let mass: f64 = combos.iter().map(|c| c.prob).sum();
        log::debug!(
            "{player} action search: {} opponent combos, threshold {threshold}, mass {mass:.3}",
            combos.len()
        );

        let mut table = Scored::new();
        for (index, &selection) in selections.iter().enumerate() {
            let mut total = 0.0;
            let mut legal = false;
            for combo in &combos {
                let scored = self.score_with(state, player, Some(Granularity::Round), |_, sim| {
                    sim.select(player, selection);
                    for (&opp, &choice) in opponents.iter().zip(&combo.choices) {
                        sim.select(opp, selections[choice]);
                    }
                    true
                })?;
                if let Some(score) = scored {
                    total += score * combo.prob;
                    legal = true;
                }
            }
            if legal {
                table.push(index, total / mass.max(f64::MIN_POSITIVE))?;
            }
        }

        let epsilon = self.brain.config().epsilon;
        let Some((chosen, _)) = table.pick(epsilon) else {
            return Err(self.exhausted(state, player, DecisionKind::Action));
        };

        if !state.is_hypothetical() {
            let floor = table.entries().iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
            let mut scores = vec![floor; selections.len()];
            for &(i, s) in table.entries() {
                scores[i] = s;
            }
            let target = softmax_target(&scores, self.brain.config().action_temperature);
            let training = self.brain.config().training;
            self.brain.predictor.observe(&view, player, &target, chosen, training)?;
            self.brain.observe(state, player)?;
        }
        Ok(Reply::Selection(selections[chosen]))
    }

    pub(crate) fn choose_discard(&mut self, state: &GameState, player: PlayerId, request: &Request) -> Result<Reply> {
        let count = count_arg(request, 0);
        let granularity = Self::within_phase(state, Granularity::Phase);
        self.best_cards(state, player, &request.list, count..=count, granularity, |rules, sim, cards| {
            rules.apply_discard(sim, player, cards)
        })?
        .map(Reply::Cards)
        .ok_or_else(|| self.exhausted(state, player, DecisionKind::Discard))
    }

    pub(crate) fn choose_place(&mut self, state: &GameState, player: PlayerId, request: &Request) -> Result<Reply> {
        let phase = if request.args[0] == Phase::Develop.index() as i32 {
            Phase::Develop
        } else {
            Phase::Settle
        };
        let granularity = match phase {
            Phase::Develop => Granularity::ThroughSettle,
            _ => Granularity::Phase,
        };
        let options = with_decline(&request.list);
        self.best_option(
            state,
            player,
            &options,
            Self::within_phase(state, granularity),
            |rules, sim, card| rules.apply_place(sim, player, phase, card),
        )?
        .map(Reply::Card)
        .ok_or_else(|| self.exhausted(state, player, DecisionKind::Place))
    }

    /// Payment is scored as it stands: the turn is already settled by the
    /// placement being paid for.
    pub(crate) fn choose_payment(&mut self, state: &GameState, player: PlayerId, request: &Request) -> Result<Reply> {
        let placed = request.card_arg(0);
        let cost = count_arg(request, 1);
        let keep = self.brain.config().max_subset_items.max(cost);
        let list = self.prefilter(state, player, &request.list, keep)?;
        let max = cost.min(list.len());

        let outcome = best_with_specials(
            request.special.as_slice(),
            list.as_slice(),
            |_| 0..=max,
            |special, cards| {
                self.score_with(state, player, None, |rules, sim| {
                    rules.apply_payment(sim, player, placed, cards, special)
                })
            },
        )?;
        log::trace!("payment search scored {} combinations", outcome.materialized);
        match outcome.best {
            Some((special, cards, _)) => Ok(Reply::Payment {
                cards: cards.into_iter().collect(),
                special: special.into_iter().collect(),
            }),
            None => Err(self.exhausted(state, player, DecisionKind::Payment)),
        }
    }

    pub(crate) fn choose_trade(&mut self, state: &GameState, player: PlayerId, request: &Request) -> Result<Reply> {
        let options: Vec<_> = request.list.iter().copied().map(Some).collect();
        self.best_option(
            state,
            player,
            &options,
            Self::within_phase(state, Granularity::Phase),
            |rules, sim, good| good.map_or(false, |g| rules.apply_trade(sim, player, g)),
        )?
        .map(Reply::Card)
        .ok_or_else(|| self.exhausted(state, player, DecisionKind::Trade))
    }

    pub(crate) fn choose_consume_power(
        &mut self,
        state: &GameState,
        player: PlayerId,
        request: &Request,
    ) -> Result<Reply> {
        let options = with_decline(&request.special);
        self.best_option(
            state,
            player,
            &options,
            Self::within_phase(state, Granularity::Phase),
            |rules, sim, power| rules.apply_consume_power(sim, player, power),
        )?
        .map(Reply::Card)
        .ok_or_else(|| self.exhausted(state, player, DecisionKind::ConsumePower))
    }

    pub(crate) fn choose_consume_goods(
        &mut self,
        state: &GameState,
        player: PlayerId,
        request: &Request,
    ) -> Result<Reply> {
        let count = count_arg(request, 0);
        let power = request.card_arg(1);
        let granularity = Self::within_phase(state, Granularity::Phase);
        self.best_cards(state, player, &request.list, count..=count, granularity, |rules, sim, goods| {
            rules.apply_consume(sim, player, power, goods)
        })?
        .map(Reply::Cards)
        .ok_or_else(|| self.exhausted(state, player, DecisionKind::ConsumeGoods))
    }

    pub(crate) fn choose_consume_hand(
        &mut self,
        state: &GameState,
        player: PlayerId,
        request: &Request,
    ) -> Result<Reply> {
        let max = count_arg(request, 0).min(request.list.len());
        let power = request.card_arg(1);
        let granularity = Self::within_phase(state, Granularity::Phase);
        self.best_cards(state, player, &request.list, 0..=max, granularity, |rules, sim, cards| {
            rules.apply_consume_hand(sim, player, power, cards)
        })?
        .map(Reply::Cards)
        .ok_or_else(|| self.exhausted(state, player, DecisionKind::ConsumeHand))
    }

    pub(crate) fn choose_takeover(&mut self, state: &GameState, player: PlayerId, request: &Request) -> Result<Reply> {
        let options = with_decline(&request.list);
        self.best_option(
            state,
            player,
            &options,
            Self::within_phase(state, Granularity::Phase),
            |rules, sim, target| rules.apply_takeover(sim, player, target),
        )?
        .map(Reply::Card)
        .ok_or_else(|| self.exhausted(state, player, DecisionKind::Takeover))
    }

    /// Discarding more than the shortfall never helps, so sizes stop there.
    pub(crate) fn choose_defense(&mut self, state: &GameState, player: PlayerId, request: &Request) -> Result<Reply> {
        let deficit = count_arg(request, 0).min(request.list.len());
        let target = request.card_arg(1);
        let granularity = Self::within_phase(state, Granularity::Phase);
        self.best_cards(state, player, &request.list, 0..=deficit, granularity, |rules, sim, cards| {
            rules.apply_defend(sim, player, target, cards)
        })?
        .map(Reply::Cards)
        .ok_or_else(|| self.exhausted(state, player, DecisionKind::Defend))
    }

    pub(crate) fn choose_search(&mut self, state: &GameState, player: PlayerId, request: &Request) -> Result<Reply> {
        let categories = request.args[0].max(0);
        let granularity = Self::within_phase(state, Granularity::Phase);
        let mut table = Scored::new();
        for category in (0..categories).chain(std::iter::once(-1)) {
            let scored = self.score_with(state, player, granularity, |rules, sim| {
                rules.apply_search(sim, player, category)
            })?;
            if let Some(score) = scored {
                table.push(category, score)?;
            }
        }
        table
            .pick(self.brain.config().epsilon)
            .map(|(c, _)| Reply::Index(c))
            .ok_or_else(|| self.exhausted(state, player, DecisionKind::SearchCategory))
    }

    pub(crate) fn choose_ante(&mut self, state: &GameState, player: PlayerId, request: &Request) -> Result<Reply> {
        let power = request.card_arg(0);
        let options = with_decline(&request.list);
        self.best_option(state, player, &options, None, |rules, sim, card| {
            rules.apply_ante(sim, player, power, card)
        })?
        .map(Reply::Card)
        .ok_or_else(|| self.exhausted(state, player, DecisionKind::Ante))
    }
}
