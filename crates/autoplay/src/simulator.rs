use crate::{
    AutoplayConfig, AutoplayError, RunStatus, SessionResult, StepRecord, SummaryStats,
    SwipePolicy,
};
use std::sync::Arc;
use swipematch_core::{
    CandidateCard, Catalog, EngineConfig, Event, EventBus, Program, SessionPhase, SwipeSession,
};
use tracing::debug;

#[derive(Debug)]
pub struct Simulator {
    pub session: SwipeSession,
    pub events: EventBus,
    policy: SwipePolicy,
    config: AutoplayConfig,
    steps: Vec<StepRecord>,
    snap_backs: u32,
}

impl Simulator {
    pub fn new(
        catalog: Arc<Catalog>,
        engine: EngineConfig,
        program: Program,
        config: AutoplayConfig,
    ) -> Result<Self, AutoplayError> {
        Self::with_generated(catalog, engine, program, Vec::new(), config)
    }

    pub fn with_generated(
        catalog: Arc<Catalog>,
        engine: EngineConfig,
        program: Program,
        generated: Vec<CandidateCard>,
        config: AutoplayConfig,
    ) -> Result<Self, AutoplayError> {
        if config.max_swipes == 0 {
            return Err(AutoplayError::Config("max_swipes must be at least 1".to_string()));
        }
        let mut events = EventBus::default();
        let session = SwipeSession::with_generated(
            catalog,
            engine,
            program,
            generated,
            config.seed,
            &mut events,
        )?;
        // Decisions use their own stream so the deck order only depends on the seed.
        let policy = SwipePolicy::new(config.seed.rotate_left(17) ^ 0x5EED, config.right_ratio);
        events.drain().for_each(drop);
        Ok(Self {
            session,
            events,
            policy,
            config,
            steps: Vec::new(),
            snap_backs: 0,
        })
    }

    /// One decision on the top card. Deferred refills are completed first
    /// without waiting.
    pub fn step(&mut self) -> Result<(), AutoplayError> {
        if self.session.phase() == SessionPhase::Refilling {
            self.session.refill(&mut self.events)?;
        }
        let Some(card) = self.session.top().cloned() else {
            return Ok(());
        };
        let tier_before = self.session.tier();
        let refills_before = self.session.refills();
        let direction = if self.config.use_gestures {
            let release = self.policy.drag();
            self.session
                .swipe_gesture(release, &mut self.events)?
                .map(|result| result.direction)
        } else {
            let direction = self.policy.decide();
            Some(self.session.swipe(direction, &mut self.events)?.direction)
        };
        if direction.is_none() {
            self.snap_backs += 1;
        }
        let event_count = self.count_events();
        self.steps.push(StepRecord {
            step: self.steps.len() as u32 + 1,
            card_id: card.id,
            title: card.title,
            archetype: card.archetype.label().to_string(),
            tier_before,
            direction,
            matches_after: self.session.matches().len(),
            tier_after: self.session.tier(),
            refilled: self.session.refills() > refills_before,
            event_count,
        });
        Ok(())
    }

    fn count_events(&mut self) -> usize {
        let mut count = 0;
        for event in self.events.drain() {
            if let Event::DeckRefilled { tier, cards } = &event {
                debug!(?tier, cards, "autoplay refill");
            }
            count += 1;
        }
        count
    }

    pub fn run(mut self) -> Result<SessionResult, AutoplayError> {
        let mut attempts = 0u32;
        while !self.session.is_complete() && attempts < self.config.max_swipes {
            self.step()?;
            attempts += 1;
        }
        let status = if self.session.is_complete() {
            RunStatus::Completed
        } else {
            RunStatus::MaxSwipes
        };
        let summary = self.session.summary();
        Ok(SessionResult {
            status,
            seed: self.config.seed,
            program: self.session.program(),
            policy: self.session.config().policy,
            matches: summary.matches,
            skills: summary.skills,
            summary: SummaryStats {
                swipes: self.session.swipes(),
                snap_backs: self.snap_backs,
                refills: self.session.refills(),
                final_tier: self.session.tier(),
            },
            steps: self.steps,
        })
    }
}

pub fn run_session(
    catalog: Arc<Catalog>,
    engine: EngineConfig,
    program: Program,
    config: AutoplayConfig,
) -> Result<SessionResult, AutoplayError> {
    Simulator::new(catalog, engine, program, config)?.run()
}
