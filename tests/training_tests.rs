//! Integration tests for online training, self-play and brain persistence.

use galaxy_ai::core::PlayerId;
use galaxy_ai::games::galaxy::{self, Options};
use galaxy_ai::training::{outcome_target, Brain};
use galaxy_ai::{AiConfig, BrainRegistry, RulesEngine, SelfPlayConfig, SelfPlayWorker};

fn small_config() -> AiConfig {
    AiConfig::default().with_hidden(8, 8).with_seed(11)
}

// =============================================================================
// Game-Over Training
// =============================================================================

#[test]
fn test_final_training_favours_the_winner() {
    let (rules, state) = galaxy::new_game(Options::new(2), 30);
    let config = small_config().with_learning_rate(0.05);
    let mut brain = Brain::bootstrap(state.ruleset, state.shared_library(), &config);
    let (a, b) = (PlayerId::new(0), PlayerId::new(1));

    brain.observe(&state, a).unwrap();

    let mut end = state.clone();
    end.players[a].vp = 10;
    end.players[b].vp = 6;
    end.game_over = true;
    rules.score_game(&mut end);
    assert!(end.players[a].winner);
    assert_eq!(outcome_target(&end, a), vec![1.0, 0.0]);

    let before = brain.evaluate(&rules, &end, a).unwrap();
    brain.notify_game_over(&end, a).unwrap();
    let after = brain.evaluate(&rules, &end, a).unwrap();
    assert!(after > before, "{after} <= {before}");
}

#[test]
fn test_shared_win_splits_target() {
    let (rules, state) = galaxy::new_game(Options::new(3), 31);
    let mut end = state.clone();
    end.game_over = true;
    rules.score_game(&mut end);
    end.players[PlayerId::new(0)].winner = true;
    end.players[PlayerId::new(2)].winner = true;
    end.players[PlayerId::new(1)].winner = false;

    let target = outcome_target(&end, PlayerId::new(1));
    assert_eq!(target, vec![0.0, 0.5, 0.5]);
}

#[test]
fn test_training_disabled_keeps_counters() {
    let (rules, state) = galaxy::new_game(Options::new(2), 32);
    let config = small_config().with_training(false);
    let mut brain = Brain::bootstrap(state.ruleset, state.shared_library(), &config);

    brain.observe(&state, PlayerId::new(0)).unwrap();
    let mut end = state.clone();
    end.game_over = true;
    rules.score_game(&mut end);
    brain.notify_game_over(&end, PlayerId::new(0)).unwrap();

    assert_eq!(brain.value_network().iterations(), 0);
    assert_eq!(brain.value_network().sample_count(), 0);
}

// =============================================================================
// Self-Play
// =============================================================================

#[test]
fn test_self_play_records_capped_games() {
    let (rules, _) = galaxy::new_game(Options::new(2), 0);
    let mut registry = BrainRegistry::new(small_config()).unwrap();
    let worker = SelfPlayWorker::new(&rules, SelfPlayConfig::new().with_max_rounds(2).with_seed_offset(100));

    let records = worker
        .play_games(|seed| galaxy::new_game(Options::new(2), seed).1, 2, &mut registry)
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].seed, 100);
    assert_eq!(records[1].seed, 101);
    for record in &records {
        assert!(record.rounds <= 2);
        assert_eq!(record.scores.len(), 2);
        if record.result.is_none() {
            assert_eq!(record.rounds, 2);
        }
    }

    let stats = registry.stats();
    assert_eq!(stats.len(), 1);
    assert!(stats[0].decisions > 0);
    assert!(stats[0].evaluations > 0);
}

#[test]
fn test_self_play_trains_value_network() {
    let (rules, mut state) = galaxy::new_game(Options::new(2), 5);
    let mut registry = BrainRegistry::new(small_config()).unwrap();
    let worker = SelfPlayWorker::new(&rules, SelfPlayConfig::new().with_max_rounds(3));

    worker.play_game(&mut state, 5, &mut registry).unwrap();

    let brain = registry.brain(state.ruleset).unwrap();
    assert!(brain.value_network().iterations() > 0);
    assert!(brain.predictor_network().iterations() > 0);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_registry_reloads_saved_weights() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config().with_weights_dir(dir.path());
    let (rules, mut state) = galaxy::new_game(Options::new(2).with_expansion(1), 6);

    let iterations = {
        let mut registry = BrainRegistry::new(config.clone()).unwrap();
        let worker = SelfPlayWorker::new(&rules, SelfPlayConfig::new().with_max_rounds(2));
        worker.play_game(&mut state, 6, &mut registry).unwrap();
        registry.shutdown().unwrap();
        registry.brain(state.ruleset).unwrap().value_network().iterations()
    };
    assert!(dir.path().join(format!("eval.{}.net", state.ruleset.stem())).exists());
    assert!(dir.path().join(format!("role.{}.net", state.ruleset.stem())).exists());

    let mut fresh = BrainRegistry::new(config).unwrap();
    let brain = fresh.initialize(state.ruleset, state.shared_library());
    assert_eq!(brain.value_network().iterations(), iterations);
}

#[test]
fn test_config_file_drives_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ai.json");
    std::fs::write(&path, r#"{ "eval_hidden": 6, "predict_hidden": 4, "training": false }"#).unwrap();

    let config = AiConfig::from_json_file(&path).unwrap();
    let (_, state) = galaxy::new_game(Options::new(2), 1);
    let mut registry = BrainRegistry::new(config).unwrap();
    let brain = registry.initialize(state.ruleset, state.shared_library());
    assert_eq!(brain.value_network().shape().hidden, 6);
    assert_eq!(brain.predictor_network().shape().hidden, 4);
    assert!(!brain.config().training);
}
