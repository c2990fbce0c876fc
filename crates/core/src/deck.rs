use crate::{CandidateCard, RngState};

/// Stack of cards awaiting a decision. The top of the stack is the last
/// element; swipes pop from the end.
#[derive(Debug, Default, Clone)]
pub struct Deck {
    pub cards: Vec<CandidateCard>,
}

impl Deck {
    pub fn new(cards: Vec<CandidateCard>) -> Self {
        Self { cards }
    }

    pub fn shuffled(mut cards: Vec<CandidateCard>, rng: &mut RngState) -> Self {
        rng.shuffle(&mut cards);
        Self { cards }
    }

    pub fn top(&self) -> Option<&CandidateCard> {
        self.cards.last()
    }

    pub fn pop(&mut self) -> Option<CandidateCard> {
        self.cards.pop()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::{card, catalog};
    use crate::Audience;

    fn deck_of(ids: &[&str]) -> Deck {
        let catalog = catalog(
            ids.iter().map(|id| card(id, Audience::Any)).collect(),
            &[],
        );
        Deck::new(catalog.primary)
    }

    #[test]
    fn pops_from_the_end() {
        let mut deck = deck_of(&["a", "b", "c"]);
        assert_eq!(deck.top().map(|card| card.id.as_str()), Some("c"));
        assert_eq!(deck.pop().map(|card| card.id), Some("c".to_string()));
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.top().map(|card| card.id.as_str()), Some("b"));
    }

    #[test]
    fn empty_deck_has_no_top() {
        let mut deck = Deck::default();
        assert!(deck.is_empty());
        assert!(deck.top().is_none());
        assert!(deck.pop().is_none());
    }
}
