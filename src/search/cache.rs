//! Evaluation cache keyed by the observable state of a game.
//!
//! Two states with equal keys must evaluate identically, so the key covers
//! everything the value encoder and the score nudges read: per card its owner,
//! location, good flag and whether the viewpoint can identify it; per seat the
//! VP chips, prestige and hidden-card counter; the goals; the VP pool; the
//! game-over flag and the viewpoint itself.
//!
//! The table is a fixed array of bucket heads with chained entries in an
//! arena. Scores start as `None` and are filled in by the evaluator.

use std::hash::Hasher;

use rustc_hash::FxHasher;
use smallvec::SmallVec;

use crate::core::{GameState, PlayerId};

const NO_OWNER: u8 = 7;

/// Serialized cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateKey(SmallVec<[u8; 256]>);

impl StateKey {
    #[must_use]
    pub fn new(state: &GameState, viewpoint: PlayerId) -> Self {
        let mut bytes = SmallVec::with_capacity(state.cards.len() + state.player_count() * 12 + 16);

        for card in &state.cards {
            let owner = card.owner.map_or(NO_OWNER, |p| p.0);
            let byte = (owner << 4)
                | (card.location.code() << 2)
                | (u8::from(card.good) << 1)
                | u8::from(card.known_to(viewpoint));
            bytes.push(byte);
        }
        for (_, p) in state.players.iter() {
            bytes.extend_from_slice(&p.vp.to_le_bytes());
            bytes.extend_from_slice(&p.prestige.to_le_bytes());
            bytes.extend_from_slice(&p.fake_hand.to_le_bytes());
        }
        for goal in &state.goals {
            bytes.push(u8::from(goal.available));
            bytes.push(goal.claimed);
        }
        bytes.extend_from_slice(&state.vp_pool.to_le_bytes());
        bytes.push(u8::from(state.game_over));
        bytes.push(viewpoint.0);
        Self(bytes)
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Fx hash of the key bytes, finished with the murmur3 avalanche so the
    /// low bits are usable as a bucket index.
    #[must_use]
    pub fn hash64(&self) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write(self.0.as_slice());
        fmix64(hasher.finish())
    }
}

fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

struct Entry {
    key: StateKey,
    score: Option<f64>,
    next: Option<usize>,
}

/// Chained hash table of evaluation results.
pub struct EvalCache {
    heads: Vec<Option<usize>>,
    entries: Vec<Entry>,
    hits: u64,
    misses: u64,
}

impl EvalCache {
    #[must_use]
    pub fn new(buckets: usize) -> Self {
        assert!(buckets > 0, "Cache needs at least one bucket");
        Self {
            heads: vec![None; buckets],
            entries: Vec::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Find the slot for `state` as seen by `viewpoint`, creating an empty one
    /// on first sight. A filled slot counts as a hit.
    pub fn lookup_or_create(&mut self, state: &GameState, viewpoint: PlayerId) -> &mut Option<f64> {
        let key = StateKey::new(state, viewpoint);
        let bucket = (key.hash64() % self.heads.len() as u64) as usize;

        let mut cursor = self.heads[bucket];
        while let Some(i) = cursor {
            if self.entries[i].key == key {
                if self.entries[i].score.is_some() {
                    self.hits += 1;
                } else {
                    self.misses += 1;
                }
                return &mut self.entries[i].score;
            }
            cursor = self.entries[i].next;
        }

        self.misses += 1;
        let index = self.entries.len();
        self.entries.push(Entry {
            key,
            score: None,
            next: self.heads[bucket],
        });
        self.heads[bucket] = Some(index);
        &mut self.entries[index].score
    }

    /// Drop every entry. Counters survive.
    pub fn clear(&mut self) {
        self.heads.iter_mut().for_each(|h| *h = None);
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
