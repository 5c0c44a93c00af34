//! Per-seat record of the decisions made in a real game.

use serde::{Deserialize, Serialize};

use super::request::{DecisionKind, Reply, Request};
use crate::core::CardList;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    pub round: u32,
    pub kind: DecisionKind,
    pub reply: Reply,
    /// Candidates offered.
    pub list: CardList,
    /// Candidates taken, in offer order.
    pub chosen: CardList,
}

impl ChoiceRecord {
    #[must_use]
    pub fn new(round: u32, request: &Request, reply: &Reply) -> Self {
        let taken: CardList = match reply {
            Reply::Card(Some(c)) => [*c].into_iter().collect(),
            _ => reply.cards().iter().copied().collect(),
        };
        let chosen = request.list.iter().copied().filter(|c| taken.contains(c)).collect();
        Self {
            round,
            kind: request.kind,
            reply: reply.clone(),
            list: request.list.clone(),
            chosen,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceLog {
    records: Vec<ChoiceRecord>,
}

impl ChoiceLog {
    pub fn push(&mut self, record: ChoiceRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn records(&self) -> &[ChoiceRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records of one decision kind.
    pub fn of_kind(&self, kind: DecisionKind) -> impl Iterator<Item = &ChoiceRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }
}
