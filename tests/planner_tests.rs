//! End-to-end tests of the planner driving the reference ruleset.

use galaxy_ai::ai::{Decider, DecisionKind, Planner, Reply, Request};
use galaxy_ai::core::{GameState, Location, PlayerId};
use galaxy_ai::games::galaxy::{self, Galaxy, Options};
use galaxy_ai::search::{complete_turn, simulate, Granularity, StateKey};
use galaxy_ai::{play_round, AiConfig, BrainRegistry, RulesEngine};

fn small_config() -> AiConfig {
    AiConfig::default().with_hidden(8, 8).with_seed(3)
}

fn setup(options: Options, seed: u64) -> (Galaxy, GameState, BrainRegistry) {
    let (rules, state) = galaxy::new_game(options, seed);
    let registry = BrainRegistry::new(small_config()).unwrap();
    (rules, state, registry)
}

/// Hand and tableau cards have an owner; deck and discard cards do not.
fn owners_consistent(state: &GameState) -> bool {
    state.cards.iter().all(|card| match card.location {
        Location::Hand | Location::Active => card.owner.is_some(),
        Location::Deck | Location::Discard => card.owner.is_none(),
    })
}

// =============================================================================
// Real Decisions
// =============================================================================

#[test]
fn test_action_choice_is_logged_once() {
    let (rules, mut state, mut registry) = setup(Options::new(2), 8);
    rules.begin_round(&mut state);
    let before = StateKey::new(&state, PlayerId::new(0));

    let brain = registry.initialize(state.ruleset, state.shared_library());
    brain.begin_game();
    let reply = {
        let mut planner = Planner::new(&rules, brain);
        planner
            .decide(&state, PlayerId::new(0), &Request::new(DecisionKind::Action))
            .unwrap()
    };

    let Reply::Selection(selection) = reply else {
        panic!("expected a selection, got {reply:?}");
    };
    assert!(state.ruleset.selections().contains(&selection));

    let brain = registry.brain(state.ruleset).unwrap();
    let log = brain.choices(PlayerId::new(0));
    assert_eq!(log.len(), 1);
    assert_eq!(log.records()[0].kind, DecisionKind::Action);
    assert!(brain.choices(PlayerId::new(1)).is_empty());
    assert_eq!(brain.stats().decisions, 1);

    assert!(!state.is_hypothetical());
    assert_eq!(StateKey::new(&state, PlayerId::new(0)), before);
}

#[test]
fn test_hypothetical_decisions_are_not_logged() {
    let (rules, mut state, mut registry) = setup(Options::new(2), 9);
    rules.begin_round(&mut state);
    let sim = simulate(&state, PlayerId::new(1), 77);

    let brain = registry.initialize(state.ruleset, state.shared_library());
    brain.begin_game();
    {
        let mut planner = Planner::new(&rules, brain);
        planner
            .decide(&sim, PlayerId::new(1), &Request::new(DecisionKind::Action))
            .unwrap();
    }

    let brain = registry.brain(state.ruleset).unwrap();
    assert!(brain.choices(PlayerId::new(1)).is_empty());
    assert_eq!(brain.stats().decisions, 0);
}

#[test]
fn test_planner_plays_full_rounds() {
    let (rules, mut state, mut registry) = setup(Options::new(3).with_expansion(1), 4);
    assert!(owners_consistent(&state));

    let brain = registry.initialize(state.ruleset, state.shared_library());
    brain.begin_game();
    let mut planner = Planner::new(&rules, brain);
    for _ in 0..2 {
        play_round(&rules, &mut state, &mut planner).unwrap();
    }

    assert_eq!(state.round, 2);
    assert_eq!(state.history.len(), 2);
    assert!(owners_consistent(&state));
    for seat in PlayerId::all(3) {
        assert_eq!(state.players[seat].fake_hand, 0);
        assert!(state.hand_size(seat) <= galaxy::HAND_LIMIT);
        assert!(state.players[seat].prev_selection.is_some());
    }
}

#[test]
fn test_advanced_game_selects_pairs() {
    let (rules, mut state, mut registry) = setup(Options::new(2).advanced(), 12);

    let brain = registry.initialize(state.ruleset, state.shared_library());
    brain.begin_game();
    {
        let mut planner = Planner::new(&rules, brain);
        play_round(&rules, &mut state, &mut planner).unwrap();
    }

    let record = state.history.back().unwrap();
    for selection in record.selections.iter().flatten() {
        assert!(state.ruleset.selections().contains(selection));
    }
    let brain = registry.brain(state.ruleset).unwrap();
    assert_eq!(brain.choices(PlayerId::new(0)).of_kind(DecisionKind::Action).count(), 1);
}

// =============================================================================
// Hypothetical Play
// =============================================================================

#[test]
fn test_completing_a_copy_leaves_real_state_alone() {
    let (rules, mut state, mut registry) = setup(Options::new(2), 15);
    rules.begin_round(&mut state);
    let before = StateKey::new(&state, PlayerId::new(1));
    let selections = state.ruleset.selections();

    let mut sim = simulate(&state, PlayerId::new(0), 5);
    sim.select(PlayerId::new(0), selections[0]);
    sim.select(PlayerId::new(1), selections[selections.len() - 1]);

    let brain = registry.initialize(state.ruleset, state.shared_library());
    let mut planner = Planner::new(&rules, brain);
    complete_turn(&rules, &mut sim, Granularity::Round, &mut planner).unwrap();

    assert!(sim.is_hypothetical());
    assert_eq!(sim.viewpoint(), Some(PlayerId::new(0)));
    assert_eq!(sim.phase, None);
    assert_eq!(StateKey::new(&state, PlayerId::new(1)), before);
    assert!(!state.is_hypothetical());
}

#[test]
fn test_copy_of_copy_keeps_viewpoint() {
    let (_, state, _) = setup(Options::new(4), 2);
    let sim = simulate(&state, PlayerId::new(2), 1);
    let nested = simulate(&sim, PlayerId::new(0), 2);
    assert_eq!(nested.viewpoint(), Some(PlayerId::new(2)));
    assert_eq!(
        nested.players[PlayerId::new(1)].fake_hand,
        sim.players[PlayerId::new(1)].fake_hand
    );
}

#[test]
fn test_complete_turn_refuses_real_state() {
    let (rules, mut state, mut registry) = setup(Options::new(2), 1);
    let brain = registry.initialize(state.ruleset, state.shared_library());
    let mut planner = Planner::new(&rules, brain);
    let err = complete_turn(&rules, &mut state, Granularity::Phase, &mut planner).unwrap_err();
    assert!(matches!(err, galaxy_ai::Error::NotHypothetical));
}
