//! Evaluation cache keys: every observable field must reach the key.

use galaxy_ai::core::{GameRng, GameState, Location, PlayerId};
use galaxy_ai::games::galaxy::{self, Options};
use galaxy_ai::nn::{Encoder, NetShape, Network};
use galaxy_ai::search::{evaluate, simulate, EvalCache, StateKey, ValueModel};
use proptest::prelude::*;

fn game(players: u8, seed: u64) -> GameState {
    galaxy::new_game(Options::new(players).with_expansion(2), seed).1
}

fn perturb(state: &mut GameState, field: u8, seat: PlayerId, delta: i32) {
    match field {
        0 => state.players[seat].vp += delta,
        1 => state.players[seat].prestige += delta,
        2 => state.players[seat].fake_hand += delta,
        3 => state.vp_pool -= delta,
        _ => {
            let card = state
                .card_ids()
                .find(|&c| state.card(c).location == Location::Deck)
                .unwrap();
            state.cards[card.index()].location = Location::Discard;
        }
    }
}

proptest! {
    #[test]
    fn prop_single_field_change_changes_key(
        seed in 0u64..500,
        players in 2u8..=4,
        seat in 0u8..4,
        field in 0u8..5,
        delta in 1i32..5,
    ) {
        let state = game(players, seed);
        let seat = PlayerId::new(seat % players);
        let viewpoint = PlayerId::new(0);

        let mut changed = state.clone();
        perturb(&mut changed, field, seat, delta);
        prop_assert_ne!(StateKey::new(&state, viewpoint), StateKey::new(&changed, viewpoint));
    }

    #[test]
    fn prop_equal_states_share_key(seed in 0u64..500, players in 2u8..=6) {
        let a = game(players, seed);
        let b = game(players, seed);
        for seat in PlayerId::all(players as usize) {
            let ka = StateKey::new(&a, seat);
            let kb = StateKey::new(&b, seat);
            prop_assert_eq!(ka.hash64(), kb.hash64());
            prop_assert_eq!(ka, kb);
        }
    }
}

#[test]
fn test_hidden_hands_key_by_count_not_identity() {
    let state = game(2, 3);
    let viewpoint = PlayerId::new(0);
    let opponent = PlayerId::new(1);

    let a = simulate(&state, viewpoint, 1);
    let mut b = simulate(&state, viewpoint, 2);
    assert_eq!(StateKey::new(&a, viewpoint), StateKey::new(&b, viewpoint));

    b.players[opponent].fake_hand += 1;
    assert_ne!(StateKey::new(&a, viewpoint), StateKey::new(&b, viewpoint));
}

#[test]
fn test_cache_hit_after_fill() {
    let state = game(3, 21);
    let mut cache = EvalCache::new(64);

    for seat in PlayerId::all(3) {
        let slot = cache.lookup_or_create(&state, seat);
        assert!(slot.is_none());
        *slot = Some(f64::from(seat.0) / 10.0);
    }
    assert_eq!(cache.misses(), 3);

    assert_eq!(*cache.lookup_or_create(&state, PlayerId::new(2)), Some(0.2));
    assert_eq!(cache.hits(), 1);
    assert_eq!(cache.len(), 3);

    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.lookup_or_create(&state, PlayerId::new(2)).is_none());
}

#[test]
fn test_unkeyed_fields_reuse_cached_value() {
    let (rules, state) = galaxy::new_game(Options::new(2).with_expansion(1), 40);
    let encoder = Encoder::eval(state.shared_library(), state.ruleset);
    let shape = NetShape::new(encoder.inputs(), 6, encoder.outputs());
    let network = Network::build(shape, encoder.layout().id, 0.01, 4);
    let mut model = ValueModel::new(encoder, network);
    let mut cache = EvalCache::new(64);
    let viewpoint = PlayerId::new(0);

    let first = evaluate(&rules, &mut model, &mut cache, &state, viewpoint).unwrap();

    let mut other = state.clone();
    other.round += 3;
    other.rng = GameRng::new(999);
    other.players[PlayerId::new(1)].step = 2;
    let second = evaluate(&rules, &mut model, &mut cache, &other, viewpoint).unwrap();

    assert_eq!(first, second);
    assert_eq!(model.forwards, 1);
    assert_eq!(cache.hits(), 1);
}
