use crate::{PoolTier, SwipeDirection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    SessionPrimed {
        cards: usize,
        generated: usize,
    },
    CardSwiped {
        id: String,
        direction: SwipeDirection,
    },
    CardMatched {
        id: String,
        matches: usize,
    },
    DeckExhausted {
        tier: PoolTier,
        matches: usize,
    },
    DeckRefilled {
        tier: PoolTier,
        cards: usize,
    },
    SessionCompleted {
        ids: Vec<String>,
        swipes: u32,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
