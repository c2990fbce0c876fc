use std::collections::HashSet;
use std::sync::Arc;
use swipematch_core::{
    Archetype, ArchetypeProfile, ArchetypeRule, ArchetypeRules, ArchetypeTable, Audience,
    Catalog, CatalogError, DragRelease, EngineConfig, EscalationPolicy, Event, EventBus, ImagePool,
    PartialCard, PoolTemplate, PoolTier, Program, RefillMode, SessionError, SessionPhase,
    SwipeDirection, SwipeSession, SynthFallbacks,
};

fn catalog(primary: &[(&str, Audience)], curated: &[&str]) -> Arc<Catalog> {
    let mut catalog = Catalog {
        primary: Vec::new(),
        curated_titles: curated.iter().map(|title| title.to_string()).collect(),
        rules: ArchetypeRules::new(
            vec![ArchetypeRule {
                keywords: vec!["nurse".into()],
                archetype: Archetype::Caregiver,
            }],
            Archetype::Specialist,
        ),
        archetypes: ArchetypeTable::new(
            Archetype::ALL
                .into_iter()
                .map(|archetype| ArchetypeProfile {
                    archetype,
                    bio: Some("Bio.".to_string()),
                    skills: vec!["Skill".to_string()],
                    compatibility: vec!["Growth".to_string()],
                    fun_fact: Some("Fact.".to_string()),
                    image: None,
                })
                .collect(),
        ),
        images: ImagePool::new(vec!["https://img/1.jpg".to_string()]),
        fallbacks: SynthFallbacks::default(),
        curated_template: PoolTemplate::curated(),
        global_template: PoolTemplate::global(),
    };
    let synth = catalog.synth();
    let cards = primary
        .iter()
        .enumerate()
        .map(|(index, (id, audience))| {
            let partial = PartialCard {
                id: Some(id.to_string()),
                audience: Some(*audience),
                ..PartialCard::titled(format!("Role {id}"))
            };
            synth.synthesize(partial, index)
        })
        .collect();
    catalog.primary = cards;
    Arc::new(catalog)
}

fn mixed_catalog() -> Arc<Catalog> {
    catalog(
        &[
            ("hc-01", Audience::Program(Program::HealthCare)),
            ("bz-01", Audience::Program(Program::Business)),
            ("bz-02", Audience::Program(Program::Business)),
            ("ht-01", Audience::Program(Program::HospitalityTourism)),
            ("ot-01", Audience::Program(Program::Others)),
            ("ot-02", Audience::Program(Program::Others)),
            ("bz-03", Audience::Program(Program::Business)),
        ],
        &["Executive Chef", "Ward Nurse", "Data Curator"],
    )
}

fn seen_before(events: &[Event], id: &str, upto: usize) -> bool {
    events[..upto]
        .iter()
        .any(|event| matches!(event, Event::CardSwiped { id: swiped, .. } if swiped == id))
}

#[test]
fn five_right_swipes_complete_in_order() {
    let catalog = catalog(
        &[
            ("a", Audience::Any),
            ("b", Audience::Any),
            ("c", Audience::Any),
            ("d", Audience::Any),
            ("e", Audience::Any),
            ("f", Audience::Any),
            ("g", Audience::Any),
        ],
        &[],
    );
    let mut events = EventBus::default();
    let mut session = SwipeSession::new(
        catalog,
        EngineConfig::default(),
        Program::Business,
        11,
        &mut events,
    )
    .expect("session");
    let mut order = Vec::new();
    for _ in 0..5 {
        let result = session
            .swipe(SwipeDirection::Right, &mut events)
            .expect("swipe");
        order.push(result.card.id);
    }
    assert_eq!(session.phase(), SessionPhase::Completed);
    assert!(session.deck().is_empty());
    assert!(session.top().is_none());
    let matched: Vec<String> = session.matches().iter().map(|card| card.id.clone()).collect();
    assert_eq!(matched, order);
    assert_eq!(
        session.swipe(SwipeDirection::Right, &mut events),
        Err(SessionError::InvalidPhase(SessionPhase::Completed))
    );
    let completed = events
        .drain()
        .filter(|event| matches!(event, Event::SessionCompleted { .. }))
        .count();
    assert_eq!(completed, 1);
    assert_eq!(session.into_matches().map(|cards| cards.len()), Some(5));
}

#[test]
fn single_health_card_refills_from_ladder() {
    let mut events = EventBus::default();
    let mut session = SwipeSession::new(
        mixed_catalog(),
        EngineConfig::default(),
        Program::HealthCare,
        3,
        &mut events,
    )
    .expect("session");
    assert_eq!(session.deck().len(), 1);
    let first = session
        .swipe(SwipeDirection::Left, &mut events)
        .expect("swipe");
    assert_eq!(first.card.id, "hc-01");
    assert_eq!(session.phase(), SessionPhase::Active);
    assert_eq!(session.tier(), PoolTier::Curated);
    assert_eq!(session.deck().len(), 3);
    assert!(!session.deck().contains("hc-01"));
}

#[test]
fn single_health_card_refills_from_other_programs() {
    let mut events = EventBus::default();
    let mut session = SwipeSession::new(
        mixed_catalog(),
        EngineConfig::with_policy(EscalationPolicy::Priority),
        Program::HealthCare,
        3,
        &mut events,
    )
    .expect("session");
    session
        .swipe(SwipeDirection::Right, &mut events)
        .expect("swipe");
    assert_eq!(session.tier(), PoolTier::OtherPrograms);
    assert_eq!(session.deck().len(), 6);
    assert!(!session.deck().contains("hc-01"));
}

#[test]
fn priority_rejects_tiny_catalogs() {
    let mut events = EventBus::default();
    let result = SwipeSession::new(
        catalog(&[("a", Audience::Any)], &[]),
        EngineConfig::with_policy(EscalationPolicy::Priority),
        Program::Others,
        1,
        &mut events,
    );
    assert_eq!(
        result.err(),
        Some(SessionError::CatalogTooSmall {
            available: 1,
            required: 6,
        })
    );
}

#[test]
fn deferred_refill_rejects_swipes_until_restocked() {
    let config = EngineConfig {
        refill_mode: RefillMode::Deferred,
        ..EngineConfig::default()
    };
    let mut events = EventBus::default();
    let mut session = SwipeSession::new(
        mixed_catalog(),
        config,
        Program::HealthCare,
        5,
        &mut events,
    )
    .expect("session");
    session
        .swipe(SwipeDirection::Left, &mut events)
        .expect("swipe");
    assert_eq!(session.phase(), SessionPhase::Refilling);
    assert!(session.top().is_none());
    assert_eq!(
        session.swipe(SwipeDirection::Right, &mut events),
        Err(SessionError::InvalidPhase(SessionPhase::Refilling))
    );
    assert_eq!(session.swipes(), 1);
    assert_eq!(session.refill(&mut events), Ok(PoolTier::Curated));
    assert_eq!(session.phase(), SessionPhase::Active);
    assert!(session.top().is_some());
    assert_eq!(
        session.refill(&mut events),
        Err(SessionError::InvalidPhase(SessionPhase::Active))
    );
}

#[test]
fn primary_id_in_the_global_namespace_does_not_stall_the_ladder() {
    let catalog = catalog(&[("global-1", Audience::Any)], &[]);
    assert!(matches!(
        catalog.validate(),
        Err(CatalogError::ReservedId { .. })
    ));
    for refill_mode in [RefillMode::Immediate, RefillMode::Deferred] {
        let config = EngineConfig {
            global_batch_size: 1,
            refill_mode,
            ..EngineConfig::default()
        };
        let mut events = EventBus::default();
        let mut session =
            SwipeSession::new(catalog.clone(), config, Program::Others, 3, &mut events)
                .expect("session");
        let result = session
            .swipe(SwipeDirection::Right, &mut events)
            .expect("swipe lands");
        assert_eq!(result.card.id, "global-1");
        assert_eq!(session.matches().len(), 1);
        if refill_mode == RefillMode::Deferred {
            assert_eq!(session.refill(&mut events), Ok(PoolTier::Global));
        }
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.tier(), PoolTier::Global);
        assert_eq!(session.top().map(|card| card.id.as_str()), Some("global-2"));
    }
}

#[test]
fn snap_back_gesture_keeps_the_card() {
    let mut events = EventBus::default();
    let mut session = SwipeSession::new(
        mixed_catalog(),
        EngineConfig::default(),
        Program::Business,
        9,
        &mut events,
    )
    .expect("session");
    let before = session.top().map(|card| card.id.clone());
    let snapped = session
        .swipe_gesture(
            DragRelease {
                offset_x: 40.0,
                velocity_x: -120.0,
            },
            &mut events,
        )
        .expect("gesture");
    assert!(snapped.is_none());
    assert_eq!(session.top().map(|card| card.id.clone()), before);
    let flung = session
        .swipe_gesture(
            DragRelease {
                offset_x: 10.0,
                velocity_x: 900.0,
            },
            &mut events,
        )
        .expect("gesture")
        .expect("swiped");
    assert_eq!(flung.direction, SwipeDirection::Right);
    assert_eq!(session.matches().len(), 1);
}

fn run_to_completion(policy: EscalationPolicy, program: Program, seed: u64) {
    let mut events = EventBus::default();
    let mut session = SwipeSession::new(
        mixed_catalog(),
        EngineConfig::with_policy(policy),
        program,
        seed,
        &mut events,
    )
    .expect("session");
    let mut log = Vec::new();
    let mut step = 0u64;
    let mut safety_net = false;
    while !session.is_complete() {
        assert_eq!(session.phase(), SessionPhase::Active);
        assert!(session.top().is_some(), "active deck must not be empty");
        step += 1;
        // Right on every seventh swipe keeps the session going for a while.
        let direction = if (step + seed) % 7 == 0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        };
        session.swipe(direction, &mut events).expect("swipe");
        safety_net |= session.tier() == PoolTier::SafetyNet;
        log.extend(events.drain());
        assert!(step < 10_000, "session did not terminate");
    }

    let matched: HashSet<&str> = session.matches().iter().map(|card| card.id.as_str()).collect();
    assert_eq!(session.matches().len(), 5);
    assert_eq!(matched.len(), 5);

    if !safety_net {
        for (index, event) in log.iter().enumerate() {
            if let Event::CardSwiped { id, .. } = event {
                assert!(!seen_before(&log, id, index), "{id} presented twice");
            }
        }
    }
}

#[test]
fn ladder_sessions_terminate_without_repeats() {
    for seed in 0..40 {
        for program in Program::ALL {
            run_to_completion(EscalationPolicy::Ladder, program, seed);
        }
    }
}

#[test]
fn priority_sessions_terminate_with_unique_matches() {
    for seed in 0..40 {
        for program in Program::ALL {
            run_to_completion(EscalationPolicy::Priority, program, seed);
        }
    }
}

#[test]
fn same_seed_replays_the_same_session() {
    let play = |seed: u64| {
        let mut events = EventBus::default();
        let mut session = SwipeSession::new(
            mixed_catalog(),
            EngineConfig::default(),
            Program::Business,
            seed,
            &mut events,
        )
        .expect("session");
        let mut ids = Vec::new();
        while !session.is_complete() {
            let result = session
                .swipe(SwipeDirection::Right, &mut events)
                .expect("swipe");
            ids.push(result.card.id);
        }
        ids
    };
    assert_eq!(play(21), play(21));
}
