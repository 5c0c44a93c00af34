//! Rules engine trait consumed by the decision engine.
//!
//! The decision engine never interprets game rules itself. It needs:
//! - phase resolvers to finish a turn in a hypothetical copy,
//! - appliers that mutate a state for one concrete choice and report
//!   whether that choice was legal,
//! - goal, game-end and scoring hooks.
//!
//! Pure inspectors (counts, military, goods) live on `GameState`.

use crate::ai::Decider;
use crate::core::{CardIdx, GameState, Phase, PlayerId};
use crate::error::Result;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    Winner(PlayerId),
    /// Shared victory after tie breaks.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
        }
    }

    /// Read the winner flags set by `RulesEngine::score_game`.
    #[must_use]
    pub fn from_state(state: &GameState) -> Option<Self> {
        if !state.game_over {
            return None;
        }
        let winners: Vec<_> = state.players.iter().filter(|(_, p)| p.winner).map(|(id, _)| id).collect();
        match winners.as_slice() {
            [] => None,
            [one] => Some(GameResult::Winner(*one)),
            _ => Some(GameResult::Winners(winners)),
        }
    }
}

/// Game rules, as seen by the decision engine.
///
/// Every `apply_*` returns `false` without a meaningful mutation when the
/// choice is illegal; callers discard the state in that case.
pub trait RulesEngine {
    /// Grant start-of-round bonuses (prestige leader). No decisions.
    fn begin_round(&self, state: &mut GameState);

    /// Ask every seat for its action selection.
    fn select_actions(&self, state: &mut GameState, decider: &mut dyn Decider) -> Result<()>;

    /// Resolve one phase for all seats.
    fn resolve_phase(&self, state: &mut GameState, phase: Phase, decider: &mut dyn Decider) -> Result<()>;

    /// End-of-round upkeep: hand limit, goals, game end, scoring.
    fn end_round(&self, state: &mut GameState, decider: &mut dyn Decider) -> Result<()>;

    /// Award goals whose condition is now met.
    fn check_goals(&self, state: &mut GameState);

    /// Whether the game-end condition holds.
    fn check_game_end(&self, state: &GameState) -> bool;

    /// Fill in `end_score` and winner flags.
    fn score_game(&self, state: &mut GameState);

    fn apply_discard(&self, state: &mut GameState, player: PlayerId, cards: &[CardIdx]) -> bool;

    fn apply_place(&self, state: &mut GameState, player: PlayerId, phase: Phase, card: Option<CardIdx>) -> bool;

    fn apply_payment(
        &self,
        state: &mut GameState,
        player: PlayerId,
        placed: CardIdx,
        cards: &[CardIdx],
        special: &[CardIdx],
    ) -> bool;

    fn apply_trade(&self, state: &mut GameState, player: PlayerId, good: CardIdx) -> bool;

    /// Choose the next consume power to use, or stop consuming with `None`.
    fn apply_consume_power(&self, state: &mut GameState, player: PlayerId, power: Option<CardIdx>) -> bool;

    fn apply_consume(&self, state: &mut GameState, player: PlayerId, power: CardIdx, goods: &[CardIdx]) -> bool;

    fn apply_consume_hand(&self, state: &mut GameState, player: PlayerId, power: CardIdx, cards: &[CardIdx]) -> bool;

    fn apply_takeover(&self, state: &mut GameState, player: PlayerId, target: Option<CardIdx>) -> bool {
        let _ = (state, player);
        target.is_none()
    }

    fn apply_defend(&self, state: &mut GameState, player: PlayerId, target: CardIdx, cards: &[CardIdx]) -> bool {
        let _ = (state, player, target);
        cards.is_empty()
    }

    fn apply_search(&self, state: &mut GameState, player: PlayerId, category: i32) -> bool {
        let _ = (state, player);
        category < 0
    }

    fn apply_ante(&self, state: &mut GameState, player: PlayerId, power: CardIdx, card: Option<CardIdx>) -> bool {
        let _ = (state, player, power);
        card.is_none()
    }
}

/// Play one full round on a real state.
pub fn play_round<R: RulesEngine + ?Sized>(rules: &R, state: &mut GameState, decider: &mut dyn Decider) -> Result<()> {
    if state.game_over {
        return Ok(());
    }
    rules.begin_round(state);
    rules.select_actions(state, decider)?;
    for phase in Phase::ALL {
        if state.selected[phase.index()] {
            state.begin_phase(phase);
            rules.resolve_phase(state, phase, decider)?;
        }
    }
    state.phase = None;
    rules.end_round(state, decider)
}

/// Play rounds until the game ends or `max_rounds` have been played.
///
/// Returns `None` if the round cap was hit first.
pub fn play_game<R: RulesEngine + ?Sized>(
    rules: &R,
    state: &mut GameState,
    decider: &mut dyn Decider,
    max_rounds: u32,
) -> Result<Option<GameResult>> {
    for _ in 0..max_rounds {
        play_round(rules, state, decider)?;
        if state.game_over {
            break;
        }
    }
    Ok(GameResult::from_state(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let shared = GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)]);
        assert!(shared.is_winner(PlayerId::new(2)));
        assert!(!shared.is_winner(PlayerId::new(1)));
    }
}
