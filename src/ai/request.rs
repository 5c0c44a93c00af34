//! The decision dispatch surface.
//!
//! A rules engine asks for every choice through `Decider::decide`, passing a
//! `Request` whose slots are interpreted per `DecisionKind`:
//!
//! | kind            | `list`              | `special`         | `args`                          |
//! |-----------------|---------------------|-------------------|---------------------------------|
//! | `Action`        | -                   | -                 | -                               |
//! | `Discard`       | discardable cards   | -                 | `[count, 0, 0]`                 |
//! | `Place`         | placeable cards     | -                 | `[phase, 0, 0]`                 |
//! | `Payment`       | cards usable to pay | paying powers     | `[placed, cost, 0]`             |
//! | `Trade`         | goods for sale      | -                 | -                               |
//! | `ConsumePower`  | -                   | unused powers     | -                               |
//! | `ConsumeGoods`  | eligible goods      | -                 | `[count, power, 0]`             |
//! | `ConsumeHand`   | hand cards          | -                 | `[max, power, 0]`               |
//! | `Takeover`      | target worlds       | -                 | -                               |
//! | `Defend`        | hand cards          | -                 | `[deficit, target, 0]`          |
//! | `SearchCategory`| -                   | -                 | `[categories, 0, 0]`            |
//! | `Ante`          | anteable cards      | -                 | `[power, 0, 0]`                 |

use serde::{Deserialize, Serialize};

use crate::core::{CardIdx, CardList, GameState, PlayerId, Selection};
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    Action,
    Discard,
    Place,
    Payment,
    Trade,
    ConsumePower,
    ConsumeGoods,
    ConsumeHand,
    Takeover,
    Defend,
    SearchCategory,
    Ante,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub kind: DecisionKind,
    pub list: CardList,
    pub special: CardList,
    pub args: [i32; 3],
}

impl Request {
    #[must_use]
    pub fn new(kind: DecisionKind) -> Self {
        Self {
            kind,
            list: CardList::new(),
            special: CardList::new(),
            args: [0; 3],
        }
    }

    #[must_use]
    pub fn with_list(mut self, list: impl IntoIterator<Item = CardIdx>) -> Self {
        self.list = list.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_special(mut self, special: impl IntoIterator<Item = CardIdx>) -> Self {
        self.special = special.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: [i32; 3]) -> Self {
        self.args = args;
        self
    }

    /// A card id carried in an argument slot.
    #[must_use]
    pub fn card_arg(&self, slot: usize) -> CardIdx {
        CardIdx(self.args[slot] as u16)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    Selection(Selection),
    /// One card, or none to decline.
    Card(Option<CardIdx>),
    Cards(CardList),
    Payment { cards: CardList, special: CardList },
    Index(i32),
}

impl Reply {
    #[must_use]
    pub fn cards(&self) -> &[CardIdx] {
        match self {
            Reply::Cards(c) | Reply::Payment { cards: c, .. } => c,
            _ => &[],
        }
    }

    #[must_use]
    pub fn special(&self) -> &[CardIdx] {
        match self {
            Reply::Payment { special, .. } => special,
            _ => &[],
        }
    }
}

/// Anything that can answer a decision for a seat.
pub trait Decider {
    fn decide(&mut self, state: &GameState, player: PlayerId, request: &Request) -> Result<Reply>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Action;

    #[test]
    fn test_request_builder() {
        let req = Request::new(DecisionKind::Payment)
            .with_list([CardIdx(1), CardIdx(2)])
            .with_special([CardIdx(9)])
            .with_args([5, 3, 0]);
        assert_eq!(req.list.len(), 2);
        assert_eq!(req.special.as_slice(), &[CardIdx(9)]);
        assert_eq!(req.card_arg(0), CardIdx(5));
    }

    #[test]
    fn test_reply_accessors() {
        let reply = Reply::Payment {
            cards: [CardIdx(1)].into_iter().collect(),
            special: [CardIdx(2)].into_iter().collect(),
        };
        assert_eq!(reply.cards(), &[CardIdx(1)]);
        assert_eq!(reply.special(), &[CardIdx(2)]);
        assert!(Reply::Selection(Selection::single(Action::Produce)).cards().is_empty());
    }

    #[test]
    fn test_reply_serialization() {
        let reply = Reply::Cards([CardIdx(3), CardIdx(4)].into_iter().collect());
        let json = serde_json::to_string(&reply).unwrap();
        let back: Reply = serde_json::from_str(&json).unwrap();
        assert_eq!(reply, back);
    }
}
