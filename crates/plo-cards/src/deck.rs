use super::card::Card;
use super::hand::Hand;
use super::hole::Hole;
use rand::Rng;
use rand::seq::SliceRandom;

/// An ordered deck of cards.
///
/// Shuffling is an explicit Fisher-Yates pass over an injected random
/// source, so tables own their RNG and tests can seed a deterministic one.
/// Dealing pops from the top and never reshuffles behind the caller's back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A fresh 52-card deck in canonical order.
    pub fn new() -> Self {
        Self {
            cards: (0..52u8).map(Card::from).collect(),
        }
    }
    /// The cards remaining after removing `dead` from the universe.
    /// Order is canonical; shuffle before sampling runouts.
    pub fn without(dead: &Hand) -> Self {
        Self {
            cards: dead.complement().collect(),
        }
    }
    pub fn size(&self) -> usize {
        self.cards.len()
    }
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
    /// Fisher-Yates shuffle over the injected source.
    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.cards.shuffle(rng);
    }
    /// Deals the top card.
    pub fn draw(&mut self) -> Card {
        self.cards.pop().expect("deal from non-empty deck")
    }
    /// Deals the top n cards.
    pub fn deal(&mut self, n: usize) -> Vec<Card> {
        debug_assert!(n <= self.cards.len());
        (0..n).map(|_| self.draw()).collect()
    }
    /// Deals four cards as a player's hole cards.
    pub fn hole(&mut self) -> Hole {
        let cards: [Card; 4] = [self.draw(), self.draw(), self.draw(), self.draw()];
        Hole::from(cards)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// An explicit card order; the back of the vector is dealt first.
impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}
