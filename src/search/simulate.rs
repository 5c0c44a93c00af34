//! Hypothetical copies of a game and turn completion inside them.

use crate::ai::Decider;
use crate::core::{GameState, Phase, PlayerId};
use crate::error::{Error, Result};
use crate::rules::RulesEngine;

/// How far `complete_turn` advances a hypothetical game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Finish the phase being resolved (or the first selected phase).
    Phase,
    /// Finish phases up to and including Settle.
    ThroughSettle,
    /// Finish every remaining phase and the end-of-round upkeep.
    Round,
}

/// A hypothetical copy of `state` restricted to what `viewpoint` knows.
///
/// Copying a copy keeps its viewpoint and simulation stream.
#[must_use]
pub fn simulate(state: &GameState, viewpoint: PlayerId, salt: u64) -> GameState {
    let mut sim = state.clone();
    sim.enter_hypothetical(viewpoint, salt);
    sim
}

/// Advance a hypothetical game, resolving every remaining decision through
/// `decider`.
pub fn complete_turn<R: RulesEngine + ?Sized>(
    rules: &R,
    state: &mut GameState,
    granularity: Granularity,
    decider: &mut dyn Decider,
) -> Result<()> {
    if !state.is_hypothetical() {
        log::error!("complete_turn on a real state in round {}", state.round);
        return Err(Error::NotHypothetical);
    }
    if state.game_over {
        return Ok(());
    }

    let resume = state.phase;
    let start = resume.map_or(0, Phase::index);
    for phase in &Phase::ALL[start..] {
        let phase = *phase;
        if !state.selected[phase.index()] {
            continue;
        }
        if resume != Some(phase) {
            state.begin_phase(phase);
        }
        rules.resolve_phase(state, phase, decider)?;
        rules.check_goals(state);

        let done = match granularity {
            Granularity::Phase => true,
            Granularity::ThroughSettle => phase >= Phase::Settle,
            Granularity::Round => false,
        };
        if done {
            tally_game_end(rules, state);
            return Ok(());
        }
    }
    state.phase = None;

    if granularity == Granularity::Round {
        rules.end_round(state, decider)?;
        if !state.game_over && state.ruleset.prestige_enabled() {
            rules.begin_round(state);
        }
    } else {
        tally_game_end(rules, state);
    }
    Ok(())
}

/// End and score a copy whose game-end condition already holds, so a turn
/// cut short of round end is still valued as a finished game.
fn tally_game_end<R: RulesEngine + ?Sized>(rules: &R, state: &mut GameState) {
    if !state.game_over && rules.check_game_end(state) {
        log::trace!("hypothetical game ends in round {}", state.round);
        state.game_over = true;
        rules.score_game(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Reply, Request};
    use crate::core::{Action, Selection};
    use crate::games::galaxy;

    struct Refuse;

    impl Decider for Refuse {
        fn decide(&mut self, _: &GameState, _: PlayerId, _: &Request) -> Result<Reply> {
            Ok(Reply::Card(None))
        }
    }

    #[test]
    fn test_real_state_rejected() {
        let (rules, mut state) = galaxy::new_game(galaxy::Options::new(2), 5);
        let err = complete_turn(&rules, &mut state, Granularity::Phase, &mut Refuse).unwrap_err();
        assert!(matches!(err, Error::NotHypothetical));
    }

    #[test]
    fn test_game_over_is_noop() {
        let (rules, state) = galaxy::new_game(galaxy::Options::new(2), 5);
        let mut sim = simulate(&state, PlayerId::new(0), 1);
        sim.game_over = true;
        let before = sim.players.clone();
        complete_turn(&rules, &mut sim, Granularity::Round, &mut Refuse).unwrap();
        assert_eq!(sim.players, before);
    }

    #[test]
    fn test_phase_completion_tallies_game_end() {
        let (rules, state) = galaxy::new_game(galaxy::Options::new(2), 5);
        let mut sim = simulate(&state, PlayerId::new(0), 1);
        let produce = Selection::single(Action::Produce);
        sim.select(PlayerId::new(0), produce);
        sim.select(PlayerId::new(1), produce);
        sim.vp_pool = 0;

        complete_turn(&rules, &mut sim, Granularity::Phase, &mut Refuse).unwrap();
        assert!(sim.game_over);
        assert!(sim.players.values().any(|p| p.winner));
        for seat in PlayerId::all(2) {
            assert_eq!(sim.players[seat].end_score, sim.score(seat));
        }
    }

    #[test]
    fn test_phase_completion_keeps_running_game_open() {
        let (rules, state) = galaxy::new_game(galaxy::Options::new(2), 5);
        let mut sim = simulate(&state, PlayerId::new(0), 1);
        let produce = Selection::single(Action::Produce);
        sim.select(PlayerId::new(0), produce);
        sim.select(PlayerId::new(1), produce);

        complete_turn(&rules, &mut sim, Granularity::Phase, &mut Refuse).unwrap();
        assert!(!sim.game_over);
        assert!(sim.players.values().all(|p| !p.winner));
    }

    #[test]
    fn test_simulate_leaves_original_untouched() {
        let (_, state) = galaxy::new_game(galaxy::Options::new(3), 5);
        let sim = simulate(&state, PlayerId::new(0), 1);
        assert!(sim.is_hypothetical());
        assert!(!state.is_hypothetical());
        assert_eq!(sim.hand_size(PlayerId::new(1)), state.hand_size(PlayerId::new(1)));
        assert!(sim.hand(PlayerId::new(1)).is_empty());

        let again = simulate(&sim, PlayerId::new(2), 9);
        assert_eq!(again.viewpoint(), Some(PlayerId::new(0)));
    }
}
