//! Ruleset shape, phases and action cards.
//!
//! A `Ruleset` (player count, expansion level, advanced flag) fixes the
//! feature layout and the predictor's output space. Networks are built and
//! persisted per ruleset.

use serde::{Deserialize, Serialize};

/// The shape a pair of networks is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ruleset {
    pub players: u8,
    /// 0 = base game, 1 = goals, 2 = goals and prestige.
    pub expansion: u8,
    /// Two-player advanced game: each player selects two actions.
    pub advanced: bool,
}

impl Ruleset {
    pub const MAX_PLAYERS: u8 = 6;
    pub const MAX_EXPANSION: u8 = 2;

    #[must_use]
    pub fn new(players: u8, expansion: u8, advanced: bool) -> Self {
        assert!(
            (2..=Self::MAX_PLAYERS).contains(&players),
            "Player count must be 2-{}",
            Self::MAX_PLAYERS
        );
        assert!(expansion <= Self::MAX_EXPANSION, "Unknown expansion level {expansion}");
        assert!(!advanced || players == 2, "Advanced game is two-player only");
        Self {
            players,
            expansion,
            advanced,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players as usize
    }

    #[must_use]
    pub fn goals_enabled(&self) -> bool {
        self.expansion >= 1
    }

    #[must_use]
    pub fn prestige_enabled(&self) -> bool {
        self.expansion >= 2
    }

    /// Action cards available to each player.
    #[must_use]
    pub fn actions(&self) -> &'static [Action] {
        if self.advanced {
            &Action::ALL
        } else {
            &Action::BASIC
        }
    }

    /// Every legal selection, in predictor output order.
    #[must_use]
    pub fn selections(&self) -> Vec<Selection> {
        let actions = self.actions();
        if !self.advanced {
            return actions.iter().map(|&a| Selection::single(a)).collect();
        }
        let mut out = Vec::with_capacity(actions.len() * (actions.len() - 1) / 2);
        for (i, &a) in actions.iter().enumerate() {
            for &b in &actions[i + 1..] {
                out.push(Selection::pair(a, b));
            }
        }
        out
    }

    /// File-name stem for persisted weights, e.g. `3p.e1` or `2p.e0.adv`.
    #[must_use]
    pub fn stem(&self) -> String {
        let adv = if self.advanced { ".adv" } else { "" };
        format!("{}p.e{}{}", self.players, self.expansion, adv)
    }
}

impl std::fmt::Display for Ruleset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stem())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Explore,
    Develop,
    Settle,
    Consume,
    Produce,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Explore,
        Phase::Develop,
        Phase::Settle,
        Phase::Consume,
        Phase::Produce,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Explore: draw five extra cards.
    Explore5,
    /// Explore: draw one extra card and keep one extra.
    Explore11,
    Develop,
    Develop2,
    Settle,
    Settle2,
    ConsumeTrade,
    ConsumeX2,
    Produce,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Explore5,
        Action::Explore11,
        Action::Develop,
        Action::Develop2,
        Action::Settle,
        Action::Settle2,
        Action::ConsumeTrade,
        Action::ConsumeX2,
        Action::Produce,
    ];

    pub const BASIC: [Action; 7] = [
        Action::Explore5,
        Action::Explore11,
        Action::Develop,
        Action::Settle,
        Action::ConsumeTrade,
        Action::ConsumeX2,
        Action::Produce,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            Action::Explore5 | Action::Explore11 => Phase::Explore,
            Action::Develop | Action::Develop2 => Phase::Develop,
            Action::Settle | Action::Settle2 => Phase::Settle,
            Action::ConsumeTrade | Action::ConsumeX2 => Phase::Consume,
            Action::Produce => Phase::Produce,
        }
    }
}

/// The action card(s) one player selects for a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub first: Action,
    pub second: Option<Action>,
}

impl Selection {
    #[must_use]
    pub const fn single(action: Action) -> Self {
        Self {
            first: action,
            second: None,
        }
    }

    #[must_use]
    pub const fn pair(first: Action, second: Action) -> Self {
        Self {
            first,
            second: Some(second),
        }
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> {
        std::iter::once(self.first).chain(self.second)
    }

    #[must_use]
    pub fn contains(&self, action: Action) -> bool {
        self.actions().any(|a| a == action)
    }

    #[must_use]
    pub fn selects_phase(&self, phase: Phase) -> bool {
        self.actions().any(|a| a.phase() == phase)
    }
}
