use crate::{
    CandidateCard, Catalog, Deck, EngineConfig, EscalationPolicy, Event, EventBus, PoolTier,
    Program, RefillMode, RngState, SessionPhase, SwipeDirection,
};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

mod refill;
mod summary;
mod swipe;

pub use refill::{plan_refill, RefillContext, RefillPlan};
pub use summary::{summarize, MatchLine, MatchSummary, SKILL_SUMMARY_LIMIT};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid phase: {0:?}")]
    InvalidPhase(SessionPhase),
    #[error("no card available")]
    EmptyDeck,
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    #[error("catalog has {available} cards, priority policy needs at least {required}")]
    CatalogTooSmall { available: usize, required: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwipeResult {
    pub card: CandidateCard,
    pub direction: SwipeDirection,
    pub matches: usize,
    pub phase: SessionPhase,
}

/// One swiping session. Owns the deck, the match list and the set of ids
/// already presented; everything else is shared, read-only catalog data.
#[derive(Debug)]
pub struct SwipeSession {
    catalog: Arc<Catalog>,
    config: EngineConfig,
    program: Program,
    rng: RngState,
    phase: SessionPhase,
    tier: PoolTier,
    deck: Deck,
    matches: Vec<CandidateCard>,
    seen: HashSet<String>,
    last_swiped: Option<String>,
    next_variant: u64,
    swipes: u32,
    refills: u32,
}

impl SwipeSession {
    pub fn new(
        catalog: Arc<Catalog>,
        config: EngineConfig,
        program: Program,
        seed: u64,
        events: &mut EventBus,
    ) -> Result<Self, SessionError> {
        Self::with_generated(catalog, config, program, Vec::new(), seed, events)
    }

    /// Like [`SwipeSession::new`], with profile-specific cards shuffled into
    /// the first deck alongside the program's primary cards.
    pub fn with_generated(
        catalog: Arc<Catalog>,
        config: EngineConfig,
        program: Program,
        generated: Vec<CandidateCard>,
        seed: u64,
        events: &mut EventBus,
    ) -> Result<Self, SessionError> {
        config.validate().map_err(SessionError::InvalidConfig)?;
        if config.policy == EscalationPolicy::Priority {
            let required = config.match_cap + 1;
            if catalog.primary.len() < required {
                return Err(SessionError::CatalogTooSmall {
                    available: catalog.primary.len(),
                    required,
                });
            }
        }
        let mut session = Self {
            catalog,
            config,
            program,
            rng: RngState::from_seed(seed),
            phase: SessionPhase::Priming,
            tier: PoolTier::Primary,
            deck: Deck::default(),
            matches: Vec::new(),
            seen: HashSet::new(),
            last_swiped: None,
            next_variant: 1,
            swipes: 0,
            refills: 0,
        };
        session.prime(generated, events)?;
        Ok(session)
    }

    fn prime(
        &mut self,
        generated: Vec<CandidateCard>,
        events: &mut EventBus,
    ) -> Result<(), SessionError> {
        let mut cards = self.catalog.primary_for(self.program);
        let mut ids: HashSet<String> = cards.iter().map(|card| card.id.clone()).collect();
        let mut generated_count = 0;
        for card in generated {
            if ids.insert(card.id.clone()) {
                cards.push(card);
                generated_count += 1;
            }
        }
        self.deck = Deck::shuffled(cards, &mut self.rng);
        debug!(
            program = self.program.label(),
            cards = self.deck.len(),
            generated = generated_count,
            policy = self.config.policy.label(),
            "session primed"
        );
        events.push(Event::SessionPrimed {
            cards: self.deck.len(),
            generated: generated_count,
        });
        if self.deck.is_empty() {
            self.begin_refill(events)
        } else {
            self.phase = SessionPhase::Active;
            Ok(())
        }
    }

    fn begin_refill(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        self.phase = SessionPhase::Refilling;
        events.push(Event::DeckExhausted {
            tier: self.tier,
            matches: self.matches.len(),
        });
        match self.config.refill_mode {
            RefillMode::Immediate => self.refill(events).map(|_| ()),
            RefillMode::Deferred => Ok(()),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn tier(&self) -> PoolTier {
        self.tier
    }

    pub fn program(&self) -> Program {
        self.program
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Card currently presented. `None` unless the session is `Active`.
    pub fn top(&self) -> Option<&CandidateCard> {
        if self.phase.accepts_swipes() {
            self.deck.top()
        } else {
            None
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn matches(&self) -> &[CandidateCard] {
        &self.matches
    }

    pub fn seen(&self) -> &HashSet<String> {
        &self.seen
    }

    pub fn swipes(&self) -> u32 {
        self.swipes
    }

    pub fn refills(&self) -> u32 {
        self.refills
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    pub fn summary(&self) -> MatchSummary {
        summarize(&self.matches, SKILL_SUMMARY_LIMIT)
    }

    /// The final match list, once the session has completed.
    pub fn into_matches(self) -> Option<Vec<CandidateCard>> {
        if self.phase == SessionPhase::Completed {
            Some(self.matches)
        } else {
            None
        }
    }
}
