use std::collections::HashSet;
use std::sync::Arc;
use swipematch_autoplay::{
    run_session, write_json, write_text, AutoplayConfig, AutoplayError, RunStatus, Simulator,
};
use swipematch_core::{
    EngineConfig, EscalationPolicy, PoolTier, Program, RefillMode, SwipeDirection,
};
use swipematch_data::builtin_catalog;

macro_rules! sweep_case {
    ($name:ident, $policy:expr, $ratio:expr, $gestures:expr) => {
        #[test]
        fn $name() {
            let catalog = Arc::new(builtin_catalog().catalog);
            for seed in 0..25u64 {
                for program in Program::ALL {
                    let config = AutoplayConfig {
                        seed,
                        right_ratio: $ratio,
                        use_gestures: $gestures,
                        ..AutoplayConfig::default()
                    };
                    let result = run_session(
                        Arc::clone(&catalog),
                        EngineConfig::with_policy($policy),
                        program,
                        config,
                    )
                    .expect("session runs");
                    assert_eq!(result.status, RunStatus::Completed, "seed {seed} {program}");
                    assert_eq!(result.matches.len(), 5);
                    let matched: HashSet<&str> = result
                        .steps
                        .iter()
                        .filter(|step| step.direction == Some(SwipeDirection::Right))
                        .map(|step| step.card_id.as_str())
                        .collect();
                    assert_eq!(matched.len(), 5, "matches must be distinct");
                }
            }
        }
    };
}

sweep_case!(ladder_generous_swiper, EscalationPolicy::Ladder, 500, false);
sweep_case!(ladder_picky_swiper, EscalationPolicy::Ladder, 30, false);
sweep_case!(priority_generous_swiper, EscalationPolicy::Priority, 500, false);
sweep_case!(priority_picky_swiper, EscalationPolicy::Priority, 30, false);
sweep_case!(ladder_with_gestures, EscalationPolicy::Ladder, 300, true);

#[test]
fn picky_ladder_sessions_reach_the_global_pool() {
    let catalog = Arc::new(builtin_catalog().catalog);
    let config = AutoplayConfig {
        seed: 4,
        right_ratio: 0,
        max_swipes: 150,
        ..AutoplayConfig::default()
    };
    let result = run_session(
        catalog,
        EngineConfig::default(),
        Program::HealthCare,
        config,
    )
    .expect("session runs");
    assert_eq!(result.status, RunStatus::MaxSwipes);
    assert_eq!(result.summary.final_tier, PoolTier::Global);
    let ids: HashSet<&str> = result.steps.iter().map(|step| step.card_id.as_str()).collect();
    assert_eq!(ids.len(), result.steps.len(), "no card is shown twice");
}

#[test]
fn deferred_refills_are_completed_by_the_simulator() {
    let catalog = Arc::new(builtin_catalog().catalog);
    let engine = EngineConfig {
        refill_mode: RefillMode::Deferred,
        ..EngineConfig::default()
    };
    let config = AutoplayConfig {
        seed: 12,
        right_ratio: 100,
        ..AutoplayConfig::default()
    };
    let result = run_session(catalog, engine, Program::Business, config).expect("session runs");
    assert_eq!(result.status, RunStatus::Completed);
    assert!(result.summary.refills >= 1);
}

#[test]
fn same_seed_gives_same_trace() {
    let catalog = Arc::new(builtin_catalog().catalog);
    let play = || {
        run_session(
            Arc::clone(&catalog),
            EngineConfig::default(),
            Program::Others,
            AutoplayConfig {
                seed: 77,
                ..AutoplayConfig::default()
            },
        )
        .expect("session runs")
    };
    let first: Vec<String> = play().steps.into_iter().map(|step| step.card_id).collect();
    let second: Vec<String> = play().steps.into_iter().map(|step| step.card_id).collect();
    assert_eq!(first, second);
}

#[test]
fn zero_swipe_budget_is_rejected() {
    let catalog = Arc::new(builtin_catalog().catalog);
    let config = AutoplayConfig {
        max_swipes: 0,
        ..AutoplayConfig::default()
    };
    let result = Simulator::new(catalog, EngineConfig::default(), Program::Others, config);
    assert!(matches!(result, Err(AutoplayError::Config(_))));
}

#[test]
fn reports_are_written() {
    let catalog = Arc::new(builtin_catalog().catalog);
    let result = run_session(
        catalog,
        EngineConfig::default(),
        Program::Business,
        AutoplayConfig::default(),
    )
    .expect("session runs");
    let dir = tempfile::tempdir().expect("tempdir");
    let json_path = dir.path().join("out").join("session.json");
    let text_path = dir.path().join("out").join("session.txt");
    write_json(&json_path, &result).expect("json");
    write_text(&text_path, &result).expect("text");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).expect("read json"))
            .expect("parse json");
    assert_eq!(json["status"], "Completed");
    let text = std::fs::read_to_string(&text_path).expect("read text");
    assert!(text.starts_with("status: Completed"));
    assert!(text.contains("matches:"));
}
