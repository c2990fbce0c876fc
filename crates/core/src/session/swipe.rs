use super::{plan_refill, RefillContext, SessionError, SwipeResult, SwipeSession};
use crate::{DragRelease, Event, EventBus, PoolTier, SessionPhase, SwipeDirection};
use tracing::{debug, info, warn};

impl SwipeSession {
    /// Decide on the top card. Only accepted while `Active`: swipes that
    /// arrive during a refill or after completion are rejected untouched.
    pub fn swipe(
        &mut self,
        direction: SwipeDirection,
        events: &mut EventBus,
    ) -> Result<SwipeResult, SessionError> {
        if !self.phase.accepts_swipes() {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        let card = self.deck.pop().ok_or(SessionError::EmptyDeck)?;
        self.swipes = self.swipes.saturating_add(1);
        self.seen.insert(card.id.clone());
        self.last_swiped = Some(card.id.clone());
        events.push(Event::CardSwiped {
            id: card.id.clone(),
            direction,
        });

        if direction == SwipeDirection::Right {
            debug_assert!(self.matches.iter().all(|matched| matched.id != card.id));
            self.matches.push(card.clone());
            events.push(Event::CardMatched {
                id: card.id.clone(),
                matches: self.matches.len(),
            });
            if self.matches.len() >= self.config.match_cap {
                self.complete(events);
                return Ok(self.result(card, direction));
            }
        }

        // The swipe has landed either way; a failed restock leaves the
        // session in `Refilling` for the driver to retry.
        if self.deck.is_empty() {
            if let Err(err) = self.begin_refill(events) {
                debug!(error = %err, "restock after swipe failed");
            }
        }
        Ok(self.result(card, direction))
    }

    /// Swipe from a released drag. `Ok(None)` means the card snapped back.
    pub fn swipe_gesture(
        &mut self,
        release: DragRelease,
        events: &mut EventBus,
    ) -> Result<Option<SwipeResult>, SessionError> {
        if !self.phase.accepts_swipes() {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        match self.config.gesture.classify(release) {
            Some(direction) => self.swipe(direction, events).map(Some),
            None => Ok(None),
        }
    }

    /// Restock an exhausted deck and resume. Called internally in immediate
    /// mode; deferred drivers call it once their loading delay has passed.
    pub fn refill(&mut self, events: &mut EventBus) -> Result<PoolTier, SessionError> {
        if self.phase != SessionPhase::Refilling {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        let ctx = RefillContext {
            program: self.program,
            tier: self.tier,
            seen: &self.seen,
            matches: &self.matches,
            last_swiped: self.last_swiped.as_deref(),
            next_variant: self.next_variant,
        };
        let plan = plan_refill(&self.catalog, &self.config, &ctx, &mut self.rng);
        self.next_variant = plan.next_variant;
        if plan.cards.is_empty() {
            warn!(tier = ?self.tier, "every pool is exhausted");
            return Err(SessionError::EmptyDeck);
        }
        self.tier = self.tier.max(plan.tier);
        self.refills = self.refills.saturating_add(1);
        debug!(
            tier = ?self.tier,
            cards = plan.cards.len(),
            matches = self.matches.len(),
            "deck refilled"
        );
        events.push(Event::DeckRefilled {
            tier: self.tier,
            cards: plan.cards.len(),
        });
        self.deck.cards = plan.cards;
        self.phase = SessionPhase::Active;
        Ok(self.tier)
    }

    fn complete(&mut self, events: &mut EventBus) {
        self.phase = SessionPhase::Completed;
        self.deck.cards.clear();
        let ids: Vec<String> = self.matches.iter().map(|card| card.id.clone()).collect();
        info!(
            swipes = self.swipes,
            refills = self.refills,
            tier = ?self.tier,
            "session completed"
        );
        events.push(Event::SessionCompleted {
            ids,
            swipes: self.swipes,
        });
    }

    fn result(&self, card: crate::CandidateCard, direction: SwipeDirection) -> SwipeResult {
        SwipeResult {
            card,
            direction,
            matches: self.matches.len(),
            phase: self.phase,
        }
    }
}
