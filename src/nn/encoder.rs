//! Feature extraction for the value network and the action predictor.
//!
//! Both encoders lay players out relative to a viewpoint (slot 0). A
//! `FeatureVector` remembers the `LayoutId` it was built for, so a vector can
//! never be fed to a network built for a different ruleset or encoder.
//!
//! Values and input names come from the same code path: the layout is
//! discovered by encoding a blank game with name collection switched on.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHasher;

use crate::core::{CardKind, CardLibrary, GameState, GoodType, Location, PlayerId, Ruleset};

/// Identifies one feature layout (encoder kind, ruleset and card set).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    layout: LayoutId,
    values: Vec<f64>,
}

impl FeatureVector {
    #[must_use]
    pub fn new(layout: LayoutId, values: Vec<f64>) -> Self {
        Self { layout, values }
    }

    #[must_use]
    pub fn layout(&self) -> LayoutId {
        self.layout
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureLayout {
    pub id: LayoutId,
    pub names: Vec<String>,
}

impl FeatureLayout {
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncoderKind {
    /// Win-probability network; one output per seat.
    Eval,
    /// Action predictor; one output per legal selection.
    Predict,
}

const POOL_STEPS: [i32; 8] = [0, 2, 4, 6, 8, 10, 12, 15];
const TABLEAU_STEPS: [i32; 4] = [8, 9, 10, 11];
const GOODS_STEPS: [i32; 4] = [1, 2, 3, 4];
const HAND_STEPS: [i32; 6] = [1, 2, 4, 6, 8, 10];
const DEVELOP_STEPS: [i32; 6] = [1, 2, 3, 4, 5, 6];
const WORLD_STEPS: [i32; 7] = [1, 2, 3, 4, 5, 6, 7];
const MILITARY_STEPS: [i32; 6] = [1, 2, 3, 4, 6, 8];
const SCORE_STEPS: [i32; 8] = [5, 10, 15, 20, 25, 30, 40, 50];
const PRESTIGE_STEPS: [i32; 4] = [1, 2, 3, 5];
const BEHIND_STEPS: [i32; 5] = [1, 3, 5, 8, 12];

/// Collects values and, optionally, their names.
struct Emit<'a> {
    values: &'a mut Vec<f64>,
    names: Option<&'a mut Vec<String>>,
}

impl Emit<'_> {
    fn value(&mut self, name: impl FnOnce() -> String, value: f64) {
        self.values.push(value);
        if let Some(names) = self.names.as_deref_mut() {
            names.push(name());
        }
    }

    fn flag(&mut self, name: impl FnOnce() -> String, on: bool) {
        self.value(name, if on { 1.0 } else { 0.0 });
    }

    fn thresholds(&mut self, label: &str, value: i32, steps: &[i32]) {
        for &k in steps {
            self.flag(|| format!("{label} >= {k}"), value >= k);
        }
    }
}

/// Per-design card counts for one seat, gathered in a single pass.
struct SeatCards {
    active: Vec<bool>,
    known_hand: Vec<bool>,
    holds_good: Vec<bool>,
}

#[derive(Clone, Debug)]
pub struct Encoder {
    kind: EncoderKind,
    ruleset: Ruleset,
    library: Arc<CardLibrary>,
    layout: FeatureLayout,
}

impl Encoder {
    #[must_use]
    pub fn eval(library: Arc<CardLibrary>, ruleset: Ruleset) -> Self {
        Self::new(EncoderKind::Eval, library, ruleset)
    }

    #[must_use]
    pub fn predictor(library: Arc<CardLibrary>, ruleset: Ruleset) -> Self {
        Self::new(EncoderKind::Predict, library, ruleset)
    }

    fn new(kind: EncoderKind, library: Arc<CardLibrary>, ruleset: Ruleset) -> Self {
        let mut hasher = FxHasher::default();
        kind.hash(&mut hasher);
        ruleset.hash(&mut hasher);
        library.len().hash(&mut hasher);
        for (id, design) in library.iter() {
            id.hash(&mut hasher);
            design.kind.hash(&mut hasher);
            design.good.hash(&mut hasher);
        }
        let id = LayoutId(hasher.finish());

        let mut encoder = Self {
            kind,
            ruleset,
            library,
            layout: FeatureLayout { id, names: Vec::new() },
        };

        let blank = GameState::new(Arc::clone(&encoder.library), ruleset, 0);
        let mut values = Vec::new();
        let mut names = Vec::new();
        encoder.extract(
            &blank,
            PlayerId::new(0),
            &mut Emit {
                values: &mut values,
                names: Some(&mut names),
            },
        );
        encoder.layout.names = names;
        encoder
    }

    #[must_use]
    pub fn kind(&self) -> EncoderKind {
        self.kind
    }

    #[must_use]
    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    #[must_use]
    pub fn inputs(&self) -> usize {
        self.layout.len()
    }

    /// Network outputs matching this encoder.
    #[must_use]
    pub fn outputs(&self) -> usize {
        match self.kind {
            EncoderKind::Eval => self.ruleset.player_count(),
            EncoderKind::Predict => self.ruleset.selections().len(),
        }
    }

    /// Encode `state` as seen from `viewpoint`.
    #[must_use]
    pub fn encode(&self, state: &GameState, viewpoint: PlayerId) -> FeatureVector {
        let mut values = Vec::with_capacity(self.layout.len());
        self.extract(
            state,
            viewpoint,
            &mut Emit {
                values: &mut values,
                names: None,
            },
        );
        debug_assert_eq!(values.len(), self.layout.len());
        FeatureVector::new(self.layout.id, values)
    }

    fn extract(&self, state: &GameState, viewpoint: PlayerId, out: &mut Emit<'_>) {
        let n = state.player_count();
        let designs = self.library.len();

        out.flag(|| "game over".into(), state.game_over);
        for k in POOL_STEPS {
            out.flag(|| format!("pool <= {k}"), state.vp_pool <= k);
        }
        let max_tableau = PlayerId::all(n).map(|p| state.tableau_size(p)).max().unwrap_or(0) as i32;
        out.thresholds("max tableau", max_tableau, &TABLEAU_STEPS);
        for goal in &state.goals {
            out.flag(|| format!("goal {:?} available", goal.kind), goal.available);
        }

        // Unknown cards per design and in total, as the viewpoint sees them.
        let mut unknown_of = vec![0usize; designs];
        let mut seats: Vec<SeatCards> = (0..n)
            .map(|_| SeatCards {
                active: vec![false; designs],
                known_hand: vec![false; designs],
                holds_good: vec![false; designs],
            })
            .collect();
        for card in &state.cards {
            let d = card.design.index();
            match (card.location, card.owner) {
                (Location::Active, Some(owner)) => {
                    seats[owner.index()].active[d] = true;
                    if card.good {
                        seats[owner.index()].holds_good[d] = true;
                    }
                }
                (Location::Hand, Some(owner)) if owner == viewpoint || card.known_to(viewpoint) => {
                    seats[owner.index()].known_hand[d] = true;
                }
                (Location::Hand, Some(_)) | (Location::Deck, _) => unknown_of[d] += 1,
                _ => {}
            }
        }
        let unknown_total = state.unknown_count(viewpoint).max(1) as f64;
        let leader = PlayerId::all(n).map(|p| state.score(p)).max().unwrap_or(0);

        for (slot, player) in viewpoint.rotation(n).enumerate() {
            let seat = &seats[player.index()];
            let pl = &state.players[player];
            let hidden = state.hidden_hand(player, viewpoint).max(0) as f64;

            for (id, design) in self.library.iter() {
                let d = id.index();
                out.flag(|| format!("p{slot} active {}", design.name), seat.active[d]);
            }
            for (id, design) in self.library.iter() {
                let d = id.index();
                let mass = if seat.known_hand[d] {
                    1.0
                } else {
                    (hidden * unknown_of[d] as f64 / unknown_total).min(1.0)
                };
                out.value(|| format!("p{slot} hand {}", design.name), mass);
            }
            for (id, design) in self.library.good_holders() {
                out.flag(|| format!("p{slot} good on {}", design.name), seat.holds_good[id.index()]);
            }

            out.thresholds(&format!("p{slot} goods"), state.goods(player).len() as i32, &GOODS_STEPS);
            out.thresholds(&format!("p{slot} hand"), state.hand_size(player), &HAND_STEPS);
            out.thresholds(
                &format!("p{slot} developments"),
                state.count_kind(player, CardKind::Development) as i32,
                &DEVELOP_STEPS,
            );
            out.thresholds(
                &format!("p{slot} worlds"),
                state.count_kind(player, CardKind::World) as i32,
                &WORLD_STEPS,
            );
            out.thresholds(&format!("p{slot} military"), state.military(player), &MILITARY_STEPS);

            let types = state.good_types(player);
            for good in GoodType::ALL {
                out.flag(|| format!("p{slot} holds {good:?}"), types[good.index()]);
            }
            for goal in &state.goals {
                out.flag(|| format!("p{slot} claimed {:?}", goal.kind), goal.claimed_by(player));
            }
            if self.ruleset.prestige_enabled() {
                out.thresholds(&format!("p{slot} prestige"), pl.prestige, &PRESTIGE_STEPS);
            }

            // The predictor never sees its own seat's score context.
            if self.kind == EncoderKind::Eval || slot != 0 {
                let score = state.score(player);
                out.thresholds(&format!("p{slot} score"), score, &SCORE_STEPS);
                out.thresholds(&format!("p{slot} behind"), leader - score, &BEHIND_STEPS);
            }

            match self.kind {
                EncoderKind::Eval => out.flag(|| format!("p{slot} winner"), pl.winner),
                EncoderKind::Predict => {
                    for &action in self.ruleset.actions() {
                        let picked = pl.prev_selection.is_some_and(|s| s.contains(action));
                        out.flag(|| format!("p{slot} last {action:?}"), picked);
                    }
                }
            }
        }
    }
}
